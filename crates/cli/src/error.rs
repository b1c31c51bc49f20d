//! Errors reported by the front-ends.

use std::error::Error;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use acl::{AclError, ExchangeError, GatewayError};
use walk::WalkError;

/// A problem with the command line. Nothing is processed.
#[derive(Debug, thiserror::Error)]
pub enum UsageError {
    /// clap rejected the arguments.
    #[error("{}", clap_message(.0))]
    Clap(#[from] clap::Error),
    /// An option value could not be parsed.
    #[error("invalid value '{value}' for {option}: {reason}")]
    InvalidValue {
        /// The option, as typed by the user.
        option: &'static str,
        /// The rejected value.
        value: String,
        /// Why it was rejected.
        reason: String,
    },
    /// A `--info` or `--debug` token was not recognised.
    #[error("{0}")]
    Verbosity(String),
    /// No path operands were given.
    #[error("no paths given")]
    MissingPaths,
    /// `ssacl-backup` was run without `-f`.
    #[error("a listing file must be given with -f")]
    MissingListing,
}

fn clap_message(error: &clap::Error) -> String {
    let rendered = error.to_string();
    let first = rendered.lines().next().unwrap_or_default();
    first.strip_prefix("error: ").unwrap_or(first).to_owned()
}

/// What went wrong with one path.
#[derive(Debug)]
pub enum PathFailure {
    /// The path could not be inspected.
    Probe(io::Error),
    /// The ACL text or an edit was invalid.
    Acl(AclError),
    /// The gateway failed.
    Gateway(GatewayError),
    /// Traversal below the path failed.
    Walk(WalkError),
    /// The JSON rendering failed.
    Json(serde_json::Error),
}

/// A failure tied to one processed path. Other paths are unaffected.
#[derive(Debug)]
pub struct PathError {
    path: PathBuf,
    failure: PathFailure,
}

impl PathError {
    pub(crate) fn new(path: impl Into<PathBuf>, failure: PathFailure) -> Self {
        Self {
            path: path.into(),
            failure,
        }
    }

    pub(crate) fn probe(path: impl Into<PathBuf>, error: io::Error) -> Self {
        Self::new(path, PathFailure::Probe(error))
    }

    pub(crate) fn acl(path: impl Into<PathBuf>, error: AclError) -> Self {
        Self::new(path, PathFailure::Acl(error))
    }

    pub(crate) fn exchange(path: impl Into<PathBuf>, error: ExchangeError) -> Self {
        match error {
            ExchangeError::Acl(error) => Self::acl(path, error),
            ExchangeError::Gateway(error) => Self::new(path, PathFailure::Gateway(error)),
        }
    }

    pub(crate) fn json(path: impl Into<PathBuf>, error: serde_json::Error) -> Self {
        Self::new(path, PathFailure::Json(error))
    }

    pub(crate) fn walk(error: WalkError) -> Self {
        Self::new(error.path().to_path_buf(), PathFailure::Walk(error))
    }

    /// The path that failed.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The underlying failure.
    #[must_use]
    pub const fn failure(&self) -> &PathFailure {
        &self.failure
    }
}

impl fmt::Display for PathError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.failure {
            PathFailure::Probe(error) => {
                write!(f, "cannot access '{}': {}", self.path.display(), error)
            }
            PathFailure::Acl(
                error @ (AclError::NotDirectory { .. }
                | AclError::EntryNotFound { .. }
                | AclError::MissingTargetCollection { .. }),
            ) => write!(f, "{error}"),
            PathFailure::Acl(error) => write!(f, "'{}': {}", self.path.display(), error),
            PathFailure::Gateway(error) => write!(f, "{error}"),
            PathFailure::Walk(error) => write!(f, "{error}"),
            PathFailure::Json(error) => {
                write!(f, "cannot render '{}' as JSON: {}", self.path.display(), error)
            }
        }
    }
}

impl Error for PathError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match &self.failure {
            PathFailure::Probe(error) => Some(error),
            PathFailure::Acl(error) => Some(error),
            PathFailure::Gateway(error) => Some(error),
            PathFailure::Walk(error) => Some(error),
            PathFailure::Json(error) => Some(error),
        }
    }
}
