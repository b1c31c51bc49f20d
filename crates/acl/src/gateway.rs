//! The seam between the ACL model and whatever stores ACLs.

use std::io;
use std::path::{Path, PathBuf};

use logging::trace_acl;

use crate::codec::decode_default;
use crate::entry::AclKind;
use crate::error::AclError;
use crate::model::{AclModel, AclSet, AclTarget};

/// Fetches and applies ACL text for filesystem paths.
///
/// Implementations exchange text in the format understood by
/// [`AclModel::decode`], one collection at a time and without `default:`
/// prefixes. They must be usable from several worker threads at once.
pub trait AclGateway: Send + Sync {
    /// Returns the access ACL text of `path`.
    fn fetch_access_acl(&self, path: &Path) -> Result<String, GatewayError>;

    /// Returns the default ACL text of the directory `path`.
    fn fetch_default_acl(&self, path: &Path) -> Result<String, GatewayError>;

    /// Replaces the access ACL of `path` with `text`.
    fn apply_access_acl(&self, path: &Path, text: &str) -> Result<(), GatewayError>;

    /// Replaces the default ACL of the directory `path` with `text`.
    fn apply_default_acl(&self, path: &Path, text: &str) -> Result<(), GatewayError>;
}

impl<G: AclGateway + ?Sized> AclGateway for &G {
    fn fetch_access_acl(&self, path: &Path) -> Result<String, GatewayError> {
        (**self).fetch_access_acl(path)
    }

    fn fetch_default_acl(&self, path: &Path) -> Result<String, GatewayError> {
        (**self).fetch_default_acl(path)
    }

    fn apply_access_acl(&self, path: &Path, text: &str) -> Result<(), GatewayError> {
        (**self).apply_access_acl(path, text)
    }

    fn apply_default_acl(&self, path: &Path, text: &str) -> Result<(), GatewayError> {
        (**self).apply_default_acl(path, text)
    }
}

/// Failures reported by an [`AclGateway`].
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// The path does not exist.
    #[error("'{}' does not exist", .path.display())]
    NotFound {
        /// The missing path.
        path: PathBuf,
    },
    /// A default ACL was requested for something that is not a directory.
    #[error("'{}' is not a directory", .path.display())]
    NotDirectory {
        /// The offending path.
        path: PathBuf,
    },
    /// Reading the ACL failed.
    #[error("failed to read ACL of '{}': {reason}", .path.display())]
    Fetch {
        /// The path whose ACL was requested.
        path: PathBuf,
        /// What the backend reported.
        reason: String,
    },
    /// Writing the ACL failed.
    #[error("failed to apply ACL to '{}': {reason}", .path.display())]
    Apply {
        /// The path whose ACL was being replaced.
        path: PathBuf,
        /// What the backend reported.
        reason: String,
    },
    /// An I/O error while talking to the backend.
    #[error("I/O error for '{}': {source}", .path.display())]
    Io {
        /// The path being processed.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: io::Error,
    },
}

impl GatewayError {
    /// The path the failure concerns.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::NotFound { path }
            | Self::NotDirectory { path }
            | Self::Fetch { path, .. }
            | Self::Apply { path, .. }
            | Self::Io { path, .. } => path,
        }
    }
}

/// Errors from the fetch, decode, edit and apply workflow.
#[derive(Debug, thiserror::Error)]
pub enum ExchangeError {
    /// The ACL text or the requested edit was invalid.
    #[error(transparent)]
    Acl(#[from] AclError),
    /// The gateway failed.
    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

/// Fetches and decodes the ACL of `target`.
///
/// The default collection is fetched only when `with_default` is set and the
/// target is a directory.
pub fn fetch_model<G: AclGateway + ?Sized>(
    gateway: &G,
    target: AclTarget,
    with_default: bool,
) -> Result<AclModel, ExchangeError> {
    let text = gateway.fetch_access_acl(target.path())?;
    let fetch_default = with_default && target.is_directory();
    let path = target.path().to_path_buf();
    let mut model = AclModel::decode(target, &text)?;
    if fetch_default {
        let text = gateway.fetch_default_acl(&path)?;
        model.load_default(&text)?;
    }
    trace_acl!(
        path = %path.display(),
        default = fetch_default,
        "fetched ACL"
    );
    Ok(model)
}

/// Fetches the default ACL of the directory holding `path`.
///
/// This is the collection a new entry at `path` inherits, so `path` itself
/// need not exist. Relative paths are resolved against the current
/// directory and the root counts as its own parent.
pub fn fetch_parent_default<G: AclGateway + ?Sized>(
    gateway: &G,
    path: &Path,
) -> Result<AclSet, ExchangeError> {
    let absolute = std::path::absolute(path).map_err(|source| GatewayError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let parent = absolute.parent().unwrap_or(&absolute);
    let text = gateway.fetch_default_acl(parent)?;
    let (_, set) = decode_default(&text)?;
    trace_acl!(
        path = %path.display(),
        parent = %parent.display(),
        "fetched parent default ACL"
    );
    Ok(set)
}

/// Encodes one collection of `model` and hands it to the gateway.
pub fn apply_model<G: AclGateway + ?Sized>(
    gateway: &G,
    model: &AclModel,
    kind: AclKind,
) -> Result<(), ExchangeError> {
    let text = model.encode_collection(kind)?;
    let path = model.target().path();
    match kind {
        AclKind::Access => gateway.apply_access_acl(path, &text)?,
        AclKind::Default => gateway.apply_default_acl(path, &text)?,
    }
    trace_acl!(path = %path.display(), kind = %kind, "applied ACL");
    Ok(())
}
