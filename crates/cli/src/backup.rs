//! The `ssacl-backup` front-end.
//!
//! Reads a file listing in which each line ends with ` -- PATH`, fetches the
//! ACL of every listed path and prints one JSON snapshot per line. The sixth
//! whitespace-separated field starting with `d` marks a directory, whose
//! default ACL is fetched as well.

use std::ffi::OsString;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use acl::{AclGateway, AclTarget, ObjectKind, fetch_model};
use clap::{Arg, ArgAction, Command as ClapCommand, builder::OsStringValueParser};
use logging::{VerbosityConfig, trace_name, trace_skip};
use mmfs::{MmfsConfig, MmfsGateway};
use rayon::prelude::*;

use crate::error::{PathError, UsageError};
use crate::exit_code::ExitCode;
use crate::frontend::{
    Processed, finish, init_logging, parse_verbosity, report, take_path, usage_failure,
};

const PROGRAM_NAME: &str = "ssacl-backup";
const PATH_SEPARATOR: &str = " -- ";

/// One path named by the listing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct ListingEntry {
    pub(crate) path: PathBuf,
    pub(crate) directory: bool,
}

/// Parses one listing line. Lines without a ` -- ` separator or with an
/// empty path yield `None`.
pub(crate) fn parse_listing_line(line: &str) -> Option<ListingEntry> {
    let start = line.find(PATH_SEPARATOR)? + PATH_SEPARATOR.len();
    let path = line[start..].trim_end();
    if path.is_empty() {
        return None;
    }
    let directory = line
        .split_whitespace()
        .nth(5)
        .is_some_and(|field| field.starts_with('d'));
    Some(ListingEntry {
        path: PathBuf::from(path),
        directory,
    })
}

#[derive(Debug)]
struct BackupArgs {
    show_help: bool,
    show_version: bool,
    listing: Option<PathBuf>,
    verbosity: VerbosityConfig,
    mmfs: MmfsConfig,
}

fn clap_command() -> ClapCommand {
    ClapCommand::new(PROGRAM_NAME)
        .about("Print the ACL of every path in a file listing as JSON lines.")
        .override_usage(format!("{PROGRAM_NAME} -f LISTING [OPTIONS]"))
        .disable_help_flag(true)
        .disable_version_flag(true)
        .arg(
            Arg::new("help")
                .long("help")
                .short('h')
                .help("Show this help message and exit.")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("version")
                .long("version")
                .short('V')
                .help("Output version information and exit.")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("filename")
                .long("filename")
                .short('f')
                .value_name("LISTING")
                .help("File listing to back up; each line ends with ' -- PATH'.")
                .num_args(1)
                .value_parser(OsStringValueParser::new()),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .help("Increase verbosity; repeat for more detail.")
                .action(ArgAction::Count),
        )
        .arg(
            Arg::new("info")
                .long("info")
                .value_name("FLAGS")
                .help("Fine-grained informational output (name, skip, stats).")
                .action(ArgAction::Append),
        )
        .arg(
            Arg::new("debug")
                .long("debug")
                .value_name("FLAGS")
                .help("Fine-grained debug output (acl, cmd, codec, exit).")
                .action(ArgAction::Append),
        )
        .arg(
            Arg::new("mmgetacl")
                .long("mmgetacl")
                .value_name("PATH")
                .help("Location of mmgetacl (default: $SSACL_MMGETACL or /usr/lpp/mmfs/bin/mmgetacl).")
                .num_args(1)
                .value_parser(OsStringValueParser::new()),
        )
}

fn parse_backup_args<I, S>(arguments: I) -> Result<BackupArgs, UsageError>
where
    I: IntoIterator<Item = S>,
    S: Into<OsString>,
{
    let mut args: Vec<OsString> = arguments.into_iter().map(Into::into).collect();
    if args.is_empty() {
        args.push(OsString::from(PROGRAM_NAME));
    }
    let mut matches = clap_command().try_get_matches_from(args)?;

    let show_help = matches.get_flag("help");
    let show_version = matches.get_flag("version");
    let verbosity = parse_verbosity(&mut matches)?;
    let mut mmfs = MmfsConfig::from_env();
    if let Some(path) = take_path(&mut matches, "mmgetacl") {
        mmfs = mmfs.with_mmgetacl(path);
    }
    let listing = take_path(&mut matches, "filename").map(PathBuf::from);
    if listing.is_none() && !show_help && !show_version {
        return Err(UsageError::MissingListing);
    }

    Ok(BackupArgs {
        show_help,
        show_version,
        listing,
        verbosity,
        mmfs,
    })
}

/// Runs `ssacl-backup` against the real GPFS tools and returns its exit
/// status.
pub fn run_backup<I, S, Out, Err>(arguments: I, stdout: &mut Out, stderr: &mut Err) -> i32
where
    I: IntoIterator<Item = S>,
    S: Into<OsString>,
    Out: Write,
    Err: Write,
{
    match parse_backup_args(arguments) {
        Ok(parsed) => {
            let gateway = MmfsGateway::new(parsed.mmfs.clone());
            execute(&parsed, &gateway, stdout, stderr)
        }
        Err(error) => usage_failure(PROGRAM_NAME, &error, stderr),
    }
}

/// Runs `ssacl-backup` against `gateway` instead of the GPFS tools.
pub fn run_backup_with_gateway<I, S, G, Out, Err>(
    arguments: I,
    gateway: &G,
    stdout: &mut Out,
    stderr: &mut Err,
) -> i32
where
    I: IntoIterator<Item = S>,
    S: Into<OsString>,
    G: AclGateway + ?Sized,
    Out: Write,
    Err: Write,
{
    match parse_backup_args(arguments) {
        Ok(parsed) => execute(&parsed, gateway, stdout, stderr),
        Err(error) => usage_failure(PROGRAM_NAME, &error, stderr),
    }
}

fn execute<G, Out, Err>(
    parsed: &BackupArgs,
    gateway: &G,
    stdout: &mut Out,
    stderr: &mut Err,
) -> i32
where
    G: AclGateway + ?Sized,
    Out: Write,
    Err: Write,
{
    if parsed.show_help {
        let _ = write!(stdout, "{}", clap_command().render_help());
        return ExitCode::Ok.as_i32();
    }
    if parsed.show_version {
        let _ = writeln!(stdout, "{PROGRAM_NAME} {}", env!("CARGO_PKG_VERSION"));
        return ExitCode::Ok.as_i32();
    }
    let Some(listing) = parsed.listing.as_deref() else {
        return usage_failure(PROGRAM_NAME, &UsageError::MissingListing, stderr);
    };

    init_logging(parsed.verbosity.clone());
    let entries = match read_listing(listing) {
        Ok(entries) => entries,
        Err(error) => {
            let _ = writeln!(stderr, "{PROGRAM_NAME} error: {error}");
            return finish(ExitCode::PartialFailure);
        }
    };

    let results = entries
        .into_par_iter()
        .map(|entry| back_up(entry, gateway))
        .collect::<Vec<_>>();
    let stats = report(PROGRAM_NAME, results, stdout, stderr);
    finish(stats.exit_code())
}

fn read_listing(listing: &Path) -> Result<Vec<ListingEntry>, PathError> {
    let text = fs::read_to_string(listing).map_err(|error| PathError::probe(listing, error))?;
    let mut entries = Vec::new();
    for (index, line) in text.lines().enumerate() {
        match parse_listing_line(line) {
            Some(entry) => entries.push(entry),
            None if line.trim().is_empty() => {}
            None => {
                trace_skip!(line = index + 1, "listing line has no ' -- PATH' part");
            }
        }
    }
    Ok(entries)
}

fn back_up<G>(entry: ListingEntry, gateway: &G) -> Result<Processed, PathError>
where
    G: AclGateway + ?Sized,
{
    trace_name!("{}", entry.path.display());
    let kind = if entry.directory {
        ObjectKind::Directory
    } else {
        ObjectKind::File
    };
    let model = fetch_model(gateway, AclTarget::new(&entry.path, kind), entry.directory)
        .map_err(|error| PathError::exchange(&entry.path, error))?;
    let mut line = serde_json::to_string(&model.snapshot())
        .map_err(|error| PathError::json(&entry.path, error))?;
    line.push('\n');
    Ok(Processed::Done {
        changed: false,
        output: Some(line),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_support::Fileset;

    const DIR_LINE: &str =
        "4096 2 0 drwxr-x--- 3 drwxr-x--- smithj staff -- /gpfs/fs1/projects/alpha  ";

    #[test]
    fn listing_line_takes_the_path_after_the_separator() {
        let entry = parse_listing_line(DIR_LINE).expect("entry");
        assert_eq!(entry.path, Path::new("/gpfs/fs1/projects/alpha"));
        assert!(entry.directory);
    }

    #[test]
    fn listing_line_keeps_spaces_inside_the_path() {
        let entry = parse_listing_line("1 1 0 x 0 -rw-r----- a b -- /gpfs/my file.txt\n")
            .expect("entry");
        assert_eq!(entry.path, Path::new("/gpfs/my file.txt"));
        assert!(!entry.directory);
    }

    #[test]
    fn listing_line_without_separator_is_ignored() {
        assert_eq!(parse_listing_line("no separator here"), None);
        assert_eq!(parse_listing_line("1 2 3 --   "), None);
    }

    #[test]
    fn short_lines_are_files() {
        let entry = parse_listing_line("x -- /gpfs/f").expect("entry");
        assert!(!entry.directory);
    }

    fn listing_for(fileset: &Fileset, lines: &[(&str, bool)]) -> PathBuf {
        let mut text = String::new();
        for (relative, directory) in lines {
            let mode = if *directory { "drwxr-x---" } else { "-rw-r-----" };
            let path = fileset.root().join(relative);
            text.push_str(&format!("1 1 0 0 0 {mode} u g -- {}\n", path.display()));
        }
        let listing = fileset.root().join("listing.txt");
        fs::write(&listing, text).expect("write listing");
        listing
    }

    fn backup(args: &[&OsString], fileset: &Fileset) -> (i32, String, String) {
        let mut all = vec![OsString::from(PROGRAM_NAME)];
        all.extend(args.iter().map(|arg| (*arg).clone()));
        let mut stdout = Vec::new();
        let mut stderr = Vec::new();
        let code = run_backup_with_gateway(all, fileset.gateway(), &mut stdout, &mut stderr);
        (
            code,
            String::from_utf8(stdout).expect("utf8 stdout"),
            String::from_utf8(stderr).expect("utf8 stderr"),
        )
    }

    #[test]
    fn backs_up_each_listed_path_as_json() {
        let fileset = Fileset::new().expect("fileset");
        fileset.directory("alpha").expect("alpha");
        fileset.file("alpha/README").expect("readme");
        let listing = listing_for(&fileset, &[("alpha", true), ("alpha/README", false)]);

        let flag = OsString::from("-f");
        let listing = listing.into_os_string();
        let (code, stdout, stderr) = backup(&[&flag, &listing], &fileset);

        assert_eq!(code, 0, "{stderr}");
        let lines: Vec<serde_json::Value> = stdout
            .lines()
            .map(|line| serde_json::from_str(line).expect("json line"))
            .collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["type"], "d");
        assert!(lines[0].get("default").is_some());
        assert_eq!(lines[1]["type"], "f");
        assert!(lines[1].get("default").is_none());
        assert!(
            lines[1]["path"]
                .as_str()
                .expect("path string")
                .ends_with("README")
        );
    }

    #[test]
    fn missing_paths_fail_without_stopping_the_backup() {
        let fileset = Fileset::new().expect("fileset");
        fileset.file("kept").expect("kept");
        let listing = listing_for(&fileset, &[("gone", false), ("kept", false)]);

        let flag = OsString::from("--filename");
        let listing = listing.into_os_string();
        let (code, stdout, stderr) = backup(&[&flag, &listing], &fileset);

        assert_eq!(code, 23);
        assert_eq!(stdout.lines().count(), 1);
        assert!(stderr.starts_with("ssacl-backup error: "), "{stderr}");
        assert!(stderr.contains("gone"));
    }

    #[test]
    fn missing_listing_option_is_a_usage_error() {
        let fileset = Fileset::new().expect("fileset");
        let verbose = OsString::from("-v");
        let (code, stdout, stderr) = backup(&[&verbose], &fileset);
        assert_eq!(code, 1);
        assert!(stdout.is_empty());
        assert!(stderr.contains("a listing file must be given with -f"));
    }

    #[test]
    fn unreadable_listing_is_a_failure() {
        let fileset = Fileset::new().expect("fileset");
        let flag = OsString::from("-f");
        let listing = fileset.root().join("absent.txt").into_os_string();
        let (code, _, stderr) = backup(&[&flag, &listing], &fileset);
        assert_eq!(code, 23);
        assert!(stderr.contains("cannot access"), "{stderr}");
    }
}
