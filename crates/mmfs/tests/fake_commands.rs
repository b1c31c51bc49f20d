//! Runs the gateway against stand-in commands instead of SpectrumScale.
#![cfg(unix)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use acl::{AclGateway, GatewayError};
use mmfs::{MmfsConfig, MmfsGateway};

const ACL: &str = "user::rwxc\ngroup::r-x-\nother::----\n";

fn script(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, format!("#!/bin/sh\n{body}\n")).expect("write script");
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).expect("chmod script");
    path
}

fn echo_gateway() -> MmfsGateway {
    MmfsGateway::new(MmfsConfig::default().with_mmgetacl("/bin/echo"))
}

#[test]
fn fetch_returns_command_stdout() {
    let temp = tempfile::tempdir().expect("tempdir");
    let gateway = echo_gateway();

    let text = gateway.fetch_access_acl(temp.path()).expect("fetch access");
    assert_eq!(text, format!("{}\n", temp.path().display()));

    let text = gateway.fetch_default_acl(temp.path()).expect("fetch default");
    assert_eq!(text, format!("-d {}\n", temp.path().display()));
}

#[test]
fn fetch_of_missing_path_is_not_found() {
    let temp = tempfile::tempdir().expect("tempdir");
    let missing = temp.path().join("missing");
    let error = echo_gateway()
        .fetch_access_acl(&missing)
        .expect_err("missing path");
    assert!(matches!(error, GatewayError::NotFound { ref path } if path == &missing));
}

#[test]
fn default_fetch_on_file_is_not_directory() {
    let temp = tempfile::tempdir().expect("tempdir");
    let file = temp.path().join("data.csv");
    fs::write(&file, b"x").expect("write file");
    let error = echo_gateway()
        .fetch_default_acl(&file)
        .expect_err("file has no default ACL");
    assert!(matches!(error, GatewayError::NotDirectory { .. }));
}

#[test]
fn failing_fetch_reports_stderr() {
    let temp = tempfile::tempdir().expect("tempdir");
    let bin = tempfile::tempdir().expect("bin dir");
    let mmgetacl = script(bin.path(), "mmgetacl", "echo 'File is not in GPFS' >&2\nexit 22");
    let gateway = MmfsGateway::new(MmfsConfig::default().with_mmgetacl(&mmgetacl));

    let error = gateway
        .fetch_access_acl(temp.path())
        .expect_err("command fails");
    match error {
        GatewayError::Fetch { path, reason } => {
            assert_eq!(path, temp.path());
            assert!(reason.contains("File is not in GPFS"), "{reason}");
            assert!(reason.contains("mmgetacl"), "{reason}");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn apply_passes_acl_file_to_mmputacl() {
    let target = tempfile::tempdir().expect("target");
    let bin = tempfile::tempdir().expect("bin dir");
    let captured = bin.path().join("captured");
    let args = bin.path().join("args");
    let body = format!(
        "echo \"$@\" > '{args}'\nwhile [ $# -gt 0 ]; do\n  if [ \"$1\" = -i ]; then cp \"$2\" '{captured}'; fi\n  shift\ndone",
        args = args.display(),
        captured = captured.display(),
    );
    let mmputacl = script(bin.path(), "mmputacl", &body);
    let gateway = MmfsGateway::new(MmfsConfig::default().with_mmputacl(&mmputacl));

    gateway
        .apply_default_acl(target.path(), ACL)
        .expect("apply default");

    assert_eq!(fs::read_to_string(&captured).expect("captured ACL"), ACL);
    let args = fs::read_to_string(&args).expect("captured args");
    assert!(args.starts_with("-d -i "), "{args}");
    assert!(args.trim_end().ends_with(&target.path().display().to_string()));
}

#[test]
fn apply_failure_is_reported() {
    let target = tempfile::tempdir().expect("target");
    let gateway = MmfsGateway::new(MmfsConfig::default().with_mmputacl("/bin/false"));
    let error = gateway
        .apply_access_acl(target.path(), ACL)
        .expect_err("command fails");
    assert!(matches!(error, GatewayError::Apply { .. }));
    assert!(error.to_string().contains("failed to apply ACL"));
}

#[test]
fn dry_run_does_not_run_mmputacl() {
    let target = tempfile::tempdir().expect("target");
    let gateway = MmfsGateway::new(
        MmfsConfig::default()
            .with_mmputacl("/bin/false")
            .with_dry_run(true),
    );
    gateway
        .apply_access_acl(target.path(), ACL)
        .expect("dry run succeeds");
}

#[test]
fn temp_files_are_created_in_configured_directory_and_removed() {
    let target = tempfile::tempdir().expect("target");
    let scratch = tempfile::tempdir().expect("scratch");
    let gateway = MmfsGateway::new(
        MmfsConfig::default()
            .with_mmputacl("/bin/true")
            .with_temp_dir(scratch.path()),
    );
    gateway
        .apply_access_acl(target.path(), ACL)
        .expect("apply access");
    let leftover = fs::read_dir(scratch.path()).expect("read scratch").count();
    assert_eq!(leftover, 0);
}
