//! Bridge between the tracing crate and the info/debug flag system.
//!
//! Library crates emit ordinary `tracing` events under `ssacl::*` targets
//! (see the `trace_*` macros). This module decides which of those events are
//! shown, based on a [`VerbosityConfig`], and installs the subscriber that
//! writes them to stderr.
//!
//! # Filtering
//!
//! - `ERROR` and `WARN` events always pass.
//! - Other events pass when the flag their target maps to is at least the
//!   level the event's severity requires: `INFO` and `DEBUG` need 1, `TRACE`
//!   needs 2.
//! - Events whose target maps to no flag are dropped.
//!
//! # Usage
//!
//! ```rust,ignore
//! use logging::{VerbosityConfig, init_tracing};
//!
//! init_tracing(VerbosityConfig::from_verbose_level(2));
//! tracing::debug!(target: "ssacl::cmd", "running mmgetacl");
//! ```

use super::config::VerbosityConfig;
use super::levels::{DebugFlag, InfoFlag};
use tracing::{Level, Metadata, Subscriber};
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::layer::{Context, Filter, Layer};
use tracing_subscriber::registry::LookupSpan;

/// Per-layer filter mapping event targets to verbosity flags.
#[derive(Clone, Debug)]
pub struct VerbosityFilter {
    config: VerbosityConfig,
}

impl VerbosityFilter {
    /// Create a filter for the given verbosity configuration.
    #[must_use]
    pub const fn new(config: VerbosityConfig) -> Self {
        Self { config }
    }

    /// Map a tracing target to an info flag.
    fn target_to_info_flag(target: &str) -> Option<InfoFlag> {
        match target.rsplit("::").next()? {
            "apply" => Some(InfoFlag::Apply),
            "name" => Some(InfoFlag::Name),
            "skip" => Some(InfoFlag::Skip),
            "stats" => Some(InfoFlag::Stats),
            _ => None,
        }
    }

    /// Map a tracing target to a debug flag.
    fn target_to_debug_flag(target: &str) -> Option<DebugFlag> {
        match target.rsplit("::").next()? {
            "acl" => Some(DebugFlag::Acl),
            "cmd" => Some(DebugFlag::Cmd),
            "codec" => Some(DebugFlag::Codec),
            "exit" => Some(DebugFlag::Exit),
            "walk" => Some(DebugFlag::Walk),
            _ => None,
        }
    }

    /// Map a tracing level to the flag level required to show it.
    const fn level_to_verbosity_level(level: &Level) -> u8 {
        match *level {
            Level::ERROR | Level::WARN | Level::INFO | Level::DEBUG => 1,
            Level::TRACE => 2,
        }
    }

    /// Returns `true` if an event with this target and level should be shown.
    #[must_use]
    pub fn allows(&self, target: &str, level: &Level) -> bool {
        if *level <= Level::WARN {
            return true;
        }

        let required = Self::level_to_verbosity_level(level);
        if let Some(flag) = Self::target_to_debug_flag(target) {
            return self.config.debug.get(flag) >= required;
        }
        Self::target_to_info_flag(target).is_some_and(|flag| self.config.info.get(flag) >= required)
    }
}

impl<S> Filter<S> for VerbosityFilter {
    fn enabled(&self, metadata: &Metadata<'_>, _cx: &Context<'_, S>) -> bool {
        // Spans carry no output of their own.
        metadata.is_span() || self.allows(metadata.target(), metadata.level())
    }
}

/// Build the stderr-style formatting layer, filtered by `config`.
///
/// `writer` receives each rendered line. [`init_tracing`] passes stderr;
/// tests can pass an in-memory buffer.
pub fn verbosity_layer<S, W>(config: VerbosityConfig, writer: W) -> impl Layer<S>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    tracing_subscriber::fmt::layer()
        .with_writer(writer)
        .with_ansi(false)
        .without_time()
        .with_target(false)
        .with_filter(VerbosityFilter::new(config))
}

/// Initialize tracing with the given verbosity configuration.
///
/// Returns `false` if a global subscriber was already installed, in which
/// case the existing one stays in place.
pub fn init_tracing(config: VerbosityConfig) -> bool {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    tracing_subscriber::registry()
        .with(verbosity_layer(config, std::io::stderr))
        .try_init()
        .is_ok()
}

/// Initialize tracing with an extra filter layer in front of the verbosity
/// filter, typically an `EnvFilter` built from `RUST_LOG`.
///
/// # Example
///
/// ```rust,ignore
/// use logging::{VerbosityConfig, init_tracing_with_filter};
/// use tracing_subscriber::EnvFilter;
///
/// let config = VerbosityConfig::from_verbose_level(2);
/// init_tracing_with_filter(config, EnvFilter::from_default_env());
/// ```
pub fn init_tracing_with_filter<F>(config: VerbosityConfig, filter: F) -> bool
where
    F: Layer<tracing_subscriber::Registry> + Send + Sync + 'static,
{
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    tracing_subscriber::registry()
        .with(filter)
        .with(verbosity_layer(config, std::io::stderr))
        .try_init()
        .is_ok()
}
