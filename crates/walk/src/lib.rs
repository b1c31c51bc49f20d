#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `walk` enumerates the entries below a directory for recursive ACL edits.
//! Entries come out depth first with each directory's contents sorted, so a
//! recursive run visits paths in the same order on every filesystem.
//!
//! # Design
//!
//! - [`WalkBuilder`] sets whether directory symlinks are followed and whether
//!   the root is yielded.
//! - [`Walker`] is an [`Iterator`] of `Result<WalkEntry, WalkError>`.
//! - [`WalkEntry::is_dir`] tells callers whether default ACL edits apply.
//!
//! # Invariants
//!
//! - Each directory is entered at most once, even through symlink cycles.
//! - An unreadable directory produces one `Err` item; the walk continues.
//!
//! # Errors
//!
//! [`WalkBuilder::build`] fails only when the root cannot be inspected.
//! Every [`WalkError`] carries the path involved.
//!
//! # Examples
//!
//! ```
//! use walk::WalkBuilder;
//! use std::fs;
//! use std::path::PathBuf;
//!
//! # fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let temp = tempfile::tempdir()?;
//! let root = temp.path().join("projects");
//! fs::create_dir_all(root.join("alpha"))?;
//! fs::write(root.join("alpha/notes.txt"), b"data")?;
//!
//! let paths = WalkBuilder::new(&root)
//!     .include_root(false)
//!     .build()?
//!     .map(|entry| entry.map(|entry| entry.relative_path().to_path_buf()))
//!     .collect::<Result<Vec<_>, _>>()?;
//! assert_eq!(paths, [PathBuf::from("alpha"), PathBuf::from("alpha/notes.txt")]);
//! # Ok(())
//! # }
//! # demo().unwrap();
//! ```

mod builder;
mod entry;
mod error;
mod walker;

#[cfg(test)]
mod tests;

pub use builder::WalkBuilder;
pub use entry::WalkEntry;
pub use error::{WalkError, WalkErrorKind};
pub use walker::Walker;
