use super::*;
use std::fs;
use std::path::{Path, PathBuf};

fn relative_paths(walker: Walker) -> Vec<PathBuf> {
    walker
        .map(|entry| entry.expect("walker entry"))
        .filter(|entry| !entry.is_root())
        .map(|entry| entry.relative_path().to_path_buf())
        .collect()
}

fn fileset() -> (tempfile::TempDir, PathBuf) {
    let temp = tempfile::tempdir().expect("tempdir");
    let root = temp.path().join("fileset");
    fs::create_dir_all(root.join("alpha/raw")).expect("create alpha");
    fs::create_dir(root.join("beta")).expect("create beta");
    fs::write(root.join("alpha/raw/run1.dat"), b"data").expect("write run1");
    fs::write(root.join("alpha/README"), b"data").expect("write readme");
    fs::write(root.join("zeta.txt"), b"data").expect("write zeta");
    (temp, root)
}

#[test]
fn missing_root_fails_build() {
    let error = match WalkBuilder::new("/nonexistent/gpfs/fileset").build() {
        Ok(_) => panic!("missing root should fail"),
        Err(error) => error,
    };
    assert!(matches!(error.kind(), WalkErrorKind::Root { .. }));
    assert_eq!(error.path(), Path::new("/nonexistent/gpfs/fileset"));
}

#[test]
fn single_file_yields_only_root() {
    let temp = tempfile::tempdir().expect("tempdir");
    let file = temp.path().join("report.pdf");
    fs::write(&file, b"contents").expect("write");

    let mut walker = WalkBuilder::new(&file).build().expect("build walker");
    let entry = walker.next().expect("entry").expect("entry ok");
    assert!(entry.is_root());
    assert!(!entry.is_dir());
    assert_eq!(entry.full_path(), file);
    assert!(walker.next().is_none());
}

#[test]
fn entries_are_sorted_depth_first() {
    let (_temp, root) = fileset();
    let paths = relative_paths(WalkBuilder::new(&root).build().expect("build walker"));
    assert_eq!(
        paths,
        vec![
            PathBuf::from("alpha"),
            PathBuf::from("alpha/README"),
            PathBuf::from("alpha/raw"),
            PathBuf::from("alpha/raw/run1.dat"),
            PathBuf::from("beta"),
            PathBuf::from("zeta.txt"),
        ]
    );
}

#[test]
fn include_root_false_skips_root() {
    let (_temp, root) = fileset();
    let mut walker = WalkBuilder::new(&root)
        .include_root(false)
        .build()
        .expect("build walker");
    let first = walker.next().expect("first").expect("first ok");
    assert!(!first.is_root());
    assert_eq!(first.relative_path(), Path::new("alpha"));
}

#[test]
fn depth_and_directory_flags() {
    let (_temp, root) = fileset();
    let entries: Vec<WalkEntry> = WalkBuilder::new(&root)
        .build()
        .expect("build walker")
        .map(|entry| entry.expect("entry"))
        .collect();

    let root_entry = &entries[0];
    assert!(root_entry.is_root());
    assert!(root_entry.is_dir());
    assert_eq!(root_entry.depth(), 0);
    assert!(root_entry.file_name().is_none());

    let run = entries
        .iter()
        .find(|entry| entry.relative_path() == Path::new("alpha/raw/run1.dat"))
        .expect("run1 entry");
    assert_eq!(run.depth(), 3);
    assert!(!run.is_dir());
    assert_eq!(run.file_name(), Some(std::ffi::OsStr::new("run1.dat")));
    assert_eq!(run.full_path(), root.join("alpha/raw/run1.dat"));
}

#[cfg(unix)]
#[test]
fn symlinked_directory_not_entered_by_default() {
    use std::os::unix::fs::symlink;

    let temp = tempfile::tempdir().expect("tempdir");
    let root = temp.path().join("root");
    let target = temp.path().join("target");
    fs::create_dir(&root).expect("create root");
    fs::create_dir(&target).expect("create target");
    fs::write(target.join("inner.txt"), b"data").expect("write inner");
    symlink(&target, root.join("link")).expect("create symlink");

    let entries: Vec<WalkEntry> = WalkBuilder::new(&root)
        .include_root(false)
        .build()
        .expect("build walker")
        .map(|entry| entry.expect("entry"))
        .collect();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].relative_path(), Path::new("link"));
    assert!(!entries[0].is_dir());
}

#[cfg(unix)]
#[test]
fn symlinked_directory_entered_when_following() {
    use std::os::unix::fs::symlink;

    let temp = tempfile::tempdir().expect("tempdir");
    let root = temp.path().join("root");
    let target = temp.path().join("target");
    fs::create_dir(&root).expect("create root");
    fs::create_dir(&target).expect("create target");
    fs::write(target.join("inner.txt"), b"data").expect("write inner");
    symlink(&target, root.join("link")).expect("create symlink");

    let walker = WalkBuilder::new(&root)
        .follow_symlinks(true)
        .build()
        .expect("build walker");
    assert_eq!(
        relative_paths(walker),
        vec![PathBuf::from("link"), PathBuf::from("link/inner.txt")]
    );
}

#[cfg(unix)]
#[test]
fn root_symlink_keeps_link_paths() {
    use std::os::unix::fs::symlink;

    let temp = tempfile::tempdir().expect("tempdir");
    let target = temp.path().join("target");
    fs::create_dir(&target).expect("create target");
    fs::write(target.join("file.txt"), b"data").expect("write file");
    let link = temp.path().join("link");
    symlink(&target, &link).expect("create symlink");

    let mut walker = WalkBuilder::new(&link)
        .follow_symlinks(true)
        .build()
        .expect("build walker");
    let root = walker.next().expect("root entry").expect("root ok");
    assert!(root.metadata().file_type().is_symlink());
    assert!(root.is_dir());

    let child = walker.next().expect("child entry").expect("child ok");
    assert_eq!(child.full_path(), link.join("file.txt"));
    assert!(walker.next().is_none());
}

#[cfg(unix)]
#[test]
fn symlink_cycles_are_entered_once() {
    use std::os::unix::fs::symlink;

    let temp = tempfile::tempdir().expect("tempdir");
    let root = temp.path().join("root");
    fs::create_dir(&root).expect("create root");
    symlink(&root, root.join("self")).expect("create symlink");

    let walker = WalkBuilder::new(&root)
        .follow_symlinks(true)
        .build()
        .expect("build walker");
    assert_eq!(relative_paths(walker), vec![PathBuf::from("self")]);
}

#[cfg(unix)]
#[test]
fn dangling_symlink_is_a_plain_entry() {
    use std::os::unix::fs::symlink;

    let temp = tempfile::tempdir().expect("tempdir");
    let root = temp.path().join("root");
    fs::create_dir(&root).expect("create root");
    symlink(temp.path().join("gone"), root.join("stale")).expect("create symlink");

    let walker = WalkBuilder::new(&root)
        .follow_symlinks(true)
        .build()
        .expect("build walker");
    assert_eq!(relative_paths(walker), vec![PathBuf::from("stale")]);
}
