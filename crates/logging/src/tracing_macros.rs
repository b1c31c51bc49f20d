//! Convenience macros for ssacl tracing targets.
//!
//! Each macro forwards to a standard `tracing` macro with a fixed target, so
//! callers pick a verbosity flag by picking a macro. Calling crates must
//! depend on `tracing` directly.

/// Report an ACL change that was applied or would be applied.
///
/// # Example
/// ```ignore
/// trace_apply!("updated access ACL of {}", path.display());
/// ```
#[macro_export]
macro_rules! trace_apply {
    ($($arg:tt)*) => {
        ::tracing::info!(target: "ssacl::apply", $($arg)*);
    };
}

/// Report a path as it is processed.
///
/// # Example
/// ```ignore
/// trace_name!("{}", path.display());
/// ```
#[macro_export]
macro_rules! trace_name {
    ($($arg:tt)*) => {
        ::tracing::info!(target: "ssacl::name", $($arg)*);
    };
}

/// Report an entry skipped during recursion.
///
/// # Example
/// ```ignore
/// trace_skip!("skipping default ACL edit on non-directory {}", path.display());
/// ```
#[macro_export]
macro_rules! trace_skip {
    ($($arg:tt)*) => {
        ::tracing::info!(target: "ssacl::skip", $($arg)*);
    };
}

/// Report end-of-run statistics.
///
/// # Example
/// ```ignore
/// trace_stats!("processed {} paths", count);
/// ```
#[macro_export]
macro_rules! trace_stats {
    ($($arg:tt)*) => {
        ::tracing::info!(target: "ssacl::stats", $($arg)*);
    };
}

/// Emit an ACL model diagnostic.
///
/// # Example
/// ```ignore
/// trace_acl!("mask pinned at {}", mask);
/// ```
#[macro_export]
macro_rules! trace_acl {
    ($($arg:tt)*) => {
        ::tracing::debug!(target: "ssacl::acl", $($arg)*);
    };
}

/// Emit an external command diagnostic.
///
/// # Example
/// ```ignore
/// trace_cmd!("running {}", command_line);
/// ```
#[macro_export]
macro_rules! trace_cmd {
    ($($arg:tt)*) => {
        ::tracing::debug!(target: "ssacl::cmd", $($arg)*);
    };
}

/// Emit a text codec diagnostic.
///
/// # Example
/// ```ignore
/// trace_codec!("decoded {} lines", count);
/// ```
#[macro_export]
macro_rules! trace_codec {
    ($($arg:tt)*) => {
        ::tracing::debug!(target: "ssacl::codec", $($arg)*);
    };
}

/// Emit a traversal diagnostic.
///
/// # Example
/// ```ignore
/// trace_walk!("entering {}", path.display());
/// ```
#[macro_export]
macro_rules! trace_walk {
    ($($arg:tt)*) => {
        ::tracing::debug!(target: "ssacl::walk", $($arg)*);
    };
}

/// Emit an exit status diagnostic.
///
/// # Example
/// ```ignore
/// trace_exit!("exiting with status {}", code);
/// ```
#[macro_export]
macro_rules! trace_exit {
    ($($arg:tt)*) => {
        ::tracing::debug!(target: "ssacl::exit", $($arg)*);
    };
}
