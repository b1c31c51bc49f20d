#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `cli` implements the `ssacl` and `ssacl-backup` command-line tools. The
//! binaries forward their arguments and standard streams to [`run`] and
//! [`run_backup`] and exit with the returned status.
//!
//! # Design
//!
//! - Arguments are parsed with `clap` into an explicit options value; the
//!   gateway locations default to `SSACL_MMGETACL` and `SSACL_MMPUTACL`.
//! - Operands are expanded into tasks (walking directories under
//!   `--recursive`) and processed in parallel with `rayon`. Each task owns
//!   its ACL model.
//! - Results are written in operand order: listings and JSON lines to
//!   stdout, `ssacl error: ...` lines to stderr.
//! - [`run_with_gateway`] and [`run_backup_with_gateway`] accept any
//!   [`acl::AclGateway`], so the whole flow can be exercised without GPFS.
//!
//! # Invariants
//!
//! - A usage error processes nothing and returns [`ExitCode::Syntax`].
//! - A failing path never stops the others; the run then returns
//!   [`ExitCode::PartialFailure`].
//!
//! # Errors
//!
//! Command-line problems are [`UsageError`] values. Failures tied to one
//! path are [`PathError`] values carrying a [`PathFailure`].
//!
//! # Examples
//!
//! ```
//! let mut stdout = Vec::new();
//! let mut stderr = Vec::new();
//! let status = cli::run(["ssacl", "--version"], &mut stdout, &mut stderr);
//! assert_eq!(status, 0);
//! assert!(String::from_utf8(stdout).unwrap().starts_with("ssacl "));
//! ```

mod backup;
mod error;
mod exit_code;
mod frontend;

pub use backup::{run_backup, run_backup_with_gateway};
pub use error::{PathError, PathFailure, UsageError};
pub use exit_code::ExitCode;
pub use frontend::{run, run_with_gateway};

/// Converts a numeric status into a process exit code, clamping to
/// `0..=255`.
#[must_use]
pub fn exit_code_from(status: i32) -> std::process::ExitCode {
    let clamped = status.clamp(0, 255);
    std::process::ExitCode::from(u8::try_from(clamped).unwrap_or(u8::MAX))
}
