#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `logging` maps `-v`, `--info` and `--debug` options onto `tracing`
//! events. Library crates emit events through the `trace_*` macros, each of
//! which fixes a target such as `ssacl::cmd`. The binary builds a
//! [`VerbosityConfig`] from its options and installs a subscriber that shows
//! only the events the configuration enables.
//!
//! # Design
//!
//! - [`InfoFlag`] and [`DebugFlag`] name the output categories.
//!   [`InfoLevels`] and [`DebugLevels`] hold a level per flag.
//! - [`VerbosityConfig::from_verbose_level`] gives the defaults for each
//!   `-v` count; `apply_info_flag` and `apply_debug_flag` adjust single
//!   flags from tokens like `name2` or `cmd`.
//! - With the `tracing` feature, `VerbosityFilter` decides per event and
//!   `init_tracing` installs a formatting layer on stderr.
//!
//! # Invariants
//!
//! - Warnings and errors are never filtered out.
//! - Events outside the known targets are dropped.
//!
//! # Examples
//!
//! ```
//! use logging::VerbosityConfig;
//!
//! let mut config = VerbosityConfig::from_verbose_level(1);
//! config.apply_debug_flag("cmd2").unwrap();
//! assert_eq!(config.info.apply, 1);
//! assert_eq!(config.debug.cmd, 2);
//! ```

mod config;
mod levels;
#[cfg(feature = "tracing")]
mod tracing_bridge;
mod tracing_macros;

pub use config::VerbosityConfig;
pub use levels::{DebugFlag, DebugLevels, InfoFlag, InfoLevels};
#[cfg(feature = "tracing")]
pub use tracing_bridge::{VerbosityFilter, init_tracing, init_tracing_with_filter, verbosity_layer};
