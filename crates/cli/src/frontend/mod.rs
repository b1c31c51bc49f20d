//! The `ssacl` front-end: argument parsing, path expansion and reporting.

use std::ffi::OsString;
use std::io::Write;

use acl::AclGateway;
use logging::{VerbosityConfig, trace_exit};
use mmfs::MmfsGateway;
use tracing_subscriber::EnvFilter;

mod arguments;
mod command_builder;
mod edits;
mod execution;

pub(crate) use arguments::{parse_verbosity, take_path};
pub(crate) use execution::{Processed, report};

use arguments::{PROGRAM_NAME, ParsedArgs, parse_args};
use command_builder::clap_command;
use execution::{plan_tasks, process_tasks};

use crate::exit_code::ExitCode;

/// Runs `ssacl` against the real GPFS tools and returns its exit status.
///
/// `arguments` includes the program name. Listings go to `stdout`;
/// diagnostics and per-path failures go to `stderr`.
pub fn run<I, S, Out, Err>(arguments: I, stdout: &mut Out, stderr: &mut Err) -> i32
where
    I: IntoIterator<Item = S>,
    S: Into<OsString>,
    Out: Write,
    Err: Write,
{
    match parse_args(arguments) {
        Ok(parsed) => {
            let gateway = MmfsGateway::new(parsed.mmfs.clone());
            execute(&parsed, &gateway, stdout, stderr)
        }
        Err(error) => usage_failure(PROGRAM_NAME, &error, stderr),
    }
}

/// Runs `ssacl` against `gateway` instead of the GPFS tools.
///
/// `--mmgetacl`, `--mmputacl` and `--dry-run` are parsed but have no
/// effect, since they configure the default gateway.
pub fn run_with_gateway<I, S, G, Out, Err>(
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
    match parse_args(arguments) {
        Ok(parsed) => execute(&parsed, gateway, stdout, stderr),
        Err(error) => usage_failure(PROGRAM_NAME, &error, stderr),
    }
}

fn execute<G, Out, Err>(
    parsed: &ParsedArgs,
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
        let help = clap_command(PROGRAM_NAME).render_help();
        let _ = write!(stdout, "{help}");
        return ExitCode::Ok.as_i32();
    }
    if parsed.show_version {
        let _ = writeln!(stdout, "{PROGRAM_NAME} {}", env!("CARGO_PKG_VERSION"));
        return ExitCode::Ok.as_i32();
    }

    init_logging(parsed.verbosity.clone());
    if parsed.dry_run {
        tracing::warn!(target: "ssacl::apply", "dry run: no ACL will be changed");
    }

    let tasks = plan_tasks(parsed);
    let results = match process_tasks(tasks, gateway, parsed) {
        Ok(results) => results,
        Err(error) => {
            let _ = writeln!(stderr, "{PROGRAM_NAME} error: cannot start worker threads: {error}");
            return finish(ExitCode::PartialFailure);
        }
    };
    let stats = report(PROGRAM_NAME, results, stdout, stderr);
    finish(stats.exit_code())
}

/// Installs the stderr subscriber. `RUST_LOG`, when set, filters further.
pub(crate) fn init_logging(config: VerbosityConfig) {
    if std::env::var_os("RUST_LOG").is_some() {
        logging::init_tracing_with_filter(config, EnvFilter::from_default_env());
    } else {
        logging::init_tracing(config);
    }
}

pub(crate) fn usage_failure<Err: Write>(
    program: &str,
    error: &crate::error::UsageError,
    stderr: &mut Err,
) -> i32 {
    let _ = writeln!(stderr, "{program} error: {error}");
    let _ = writeln!(stderr, "Try '{program} --help' for more information.");
    finish(ExitCode::Syntax)
}

pub(crate) fn finish(code: ExitCode) -> i32 {
    trace_exit!("exiting with {code}");
    code.as_i32()
}
