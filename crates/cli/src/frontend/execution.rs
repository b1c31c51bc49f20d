use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use acl::{AclError, AclGateway, AclKind, AclModel, AclTarget, ObjectKind, apply_model, fetch_model};
use logging::{trace_name, trace_skip, trace_stats};
use rayon::ThreadPoolBuilder;
use rayon::prelude::*;
use walk::WalkBuilder;

use super::arguments::ParsedArgs;
use crate::error::PathError;
use crate::exit_code::ExitCode;

/// One unit of work, in the order results are reported.
#[derive(Debug)]
pub(crate) enum Task {
    /// A path named on the command line.
    Operand(PathBuf),
    /// A path found below a directory operand.
    Entry { path: PathBuf, directory: bool },
    /// Traversal failed below an operand.
    Failed(PathError),
}

/// What happened to one path.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Processed {
    /// Fetched, possibly edited and applied, possibly printed.
    Done { changed: bool, output: Option<String> },
    /// Default edits do not apply to this non-directory entry.
    Skipped,
}

/// Counters for the end-of-run summary.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct Stats {
    pub(crate) processed: usize,
    pub(crate) changed: usize,
    pub(crate) skipped: usize,
    pub(crate) failed: usize,
}

impl Stats {
    pub(crate) fn exit_code(self) -> ExitCode {
        if self.failed == 0 {
            ExitCode::Ok
        } else {
            ExitCode::PartialFailure
        }
    }
}

/// Expands the operands into tasks. Recursion walks each directory operand
/// in sorted order; symlinks found below an operand are not followed or
/// edited.
pub(crate) fn plan_tasks(args: &ParsedArgs) -> Vec<Task> {
    let mut tasks = Vec::new();
    for operand in &args.paths {
        tasks.push(Task::Operand(operand.clone()));
        if args.recursive && operand.is_dir() {
            expand(operand, &mut tasks);
        }
    }
    tasks
}

fn expand(operand: &Path, tasks: &mut Vec<Task>) {
    let walker = match WalkBuilder::new(operand).include_root(false).build() {
        Ok(walker) => walker,
        Err(error) => {
            tasks.push(Task::Failed(PathError::walk(error)));
            return;
        }
    };
    for entry in walker {
        match entry {
            Ok(entry) if entry.metadata().file_type().is_symlink() => {
                trace_skip!(path = %entry.full_path().display(), "not following symlink");
            }
            Ok(entry) => tasks.push(Task::Entry {
                directory: entry.is_dir(),
                path: operand.join(entry.relative_path()),
            }),
            Err(error) => tasks.push(Task::Failed(PathError::walk(error))),
        }
    }
}

/// Processes every task, in parallel, and returns the results in task order.
pub(crate) fn process_tasks<G>(
    tasks: Vec<Task>,
    gateway: &G,
    args: &ParsedArgs,
) -> Result<Vec<Result<Processed, PathError>>, rayon::ThreadPoolBuildError>
where
    G: AclGateway + ?Sized,
{
    let work = || {
        tasks
            .into_par_iter()
            .map(|task| process(task, gateway, args))
            .collect::<Vec<_>>()
    };
    match args.jobs {
        Some(threads) => Ok(ThreadPoolBuilder::new()
            .num_threads(threads)
            .build()?
            .install(work)),
        None => Ok(work()),
    }
}

fn process<G>(task: Task, gateway: &G, args: &ParsedArgs) -> Result<Processed, PathError>
where
    G: AclGateway + ?Sized,
{
    let (path, directory, operand) = match task {
        Task::Operand(path) => {
            let metadata = fs::metadata(&path).map_err(|error| PathError::probe(&path, error))?;
            (path, metadata.is_dir(), true)
        }
        Task::Entry { path, directory } => (path, directory, false),
        Task::Failed(error) => return Err(error),
    };
    trace_name!("{}", path.display());

    let edits_default = args.default_acl && !args.edits.is_empty();
    if edits_default && !directory {
        if operand {
            return Err(PathError::acl(&path, AclError::NotDirectory { path: path.clone() }));
        }
        trace_skip!(
            path = %path.display(),
            "default ACL edits apply only to directories"
        );
        return Ok(Processed::Skipped);
    }

    let kind = if directory {
        ObjectKind::Directory
    } else {
        ObjectKind::File
    };
    let mut model = fetch_model(gateway, AclTarget::new(&path, kind), true)
        .map_err(|error| PathError::exchange(&path, error))?;

    let changed = !args.edits.is_empty();
    if changed {
        let collection = if args.default_acl {
            AclKind::Default
        } else {
            AclKind::Access
        };
        args.edits
            .apply(&mut model, collection)
            .map_err(|error| PathError::acl(&path, error))?;
        apply_model(gateway, &model, collection)
            .map_err(|error| PathError::exchange(&path, error))?;
    }

    let output = render(&model, args)?;
    Ok(Processed::Done { changed, output })
}

fn render(model: &AclModel, args: &ParsedArgs) -> Result<Option<String>, PathError> {
    let path = model.target().path();
    if args.json {
        let mut line = serde_json::to_string(&model.snapshot())
            .map_err(|error| PathError::json(path, error))?;
        line.push('\n');
        Ok(Some(line))
    } else if args.lists() {
        Ok(Some(format!("# file: {}\n{}\n", path.display(), model.encode())))
    } else {
        Ok(None)
    }
}

/// Writes outputs to `stdout` and failures to `stderr`, in task order.
pub(crate) fn report<Out, Err>(
    program: &str,
    results: Vec<Result<Processed, PathError>>,
    stdout: &mut Out,
    stderr: &mut Err,
) -> Stats
where
    Out: Write,
    Err: Write,
{
    let mut stats = Stats::default();
    for result in results {
        match result {
            Ok(Processed::Done { changed, output }) => {
                stats.processed += 1;
                if changed {
                    stats.changed += 1;
                }
                if let Some(output) = output {
                    let _ = stdout.write_all(output.as_bytes());
                }
            }
            Ok(Processed::Skipped) => stats.skipped += 1,
            Err(error) => {
                stats.failed += 1;
                let _ = writeln!(stderr, "{program} error: {error}");
            }
        }
    }
    let _ = stdout.flush();
    trace_stats!(
        processed = stats.processed,
        changed = stats.changed,
        skipped = stats.skipped,
        failed = stats.failed,
        "processed {} paths, {} changed, {} skipped, {} failed",
        stats.processed,
        stats.changed,
        stats.skipped,
        stats.failed
    );
    stats
}
