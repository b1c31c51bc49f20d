#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `mmfs` connects the ACL model to a SpectrumScale (GPFS) filesystem. It
//! implements [`acl::AclGateway`] by running the `mmgetacl` and `mmputacl`
//! commands that ship with SpectrumScale.
//!
//! # Design
//!
//! - [`MmfsConfig`] holds the command locations, the dry-run switch and an
//!   optional directory for temporary ACL files. Locations default to
//!   `/usr/lpp/mmfs/bin` and can be overridden through `SSACL_MMGETACL` and
//!   `SSACL_MMPUTACL`.
//! - [`MmfsGateway`] checks the path first, then runs the command with its
//!   output captured. Every command is logged under the `cmd` debug flag.
//!
//! # Errors
//!
//! Failures are [`acl::GatewayError`] values: `NotFound` and `NotDirectory`
//! from the path check, `Fetch` or `Apply` when a command exits non-zero
//! (with the command line, status and stderr), and `Io` when a command or
//! temporary file cannot be created.
//!
//! # Examples
//!
//! ```no_run
//! use acl::AclGateway;
//! use mmfs::{MmfsConfig, MmfsGateway};
//! use std::path::Path;
//!
//! let gateway = MmfsGateway::new(MmfsConfig::from_env());
//! let text = gateway.fetch_access_acl(Path::new("/gpfs/fs1/projects"))?;
//! print!("{text}");
//! # Ok::<(), acl::GatewayError>(())
//! ```

mod command;
mod config;
mod gateway;

pub use config::{DEFAULT_MMGETACL, DEFAULT_MMPUTACL, ENV_MMGETACL, ENV_MMPUTACL, MmfsConfig};
pub use gateway::MmfsGateway;
