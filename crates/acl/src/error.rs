//! Error types for ACL decoding and editing.

use std::fmt;
use std::path::PathBuf;

use crate::entry::{AclKind, Principal};
use crate::perms::PermsError;

/// A line of ACL text referenced by a decode error.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LineRef {
    /// One-based line number.
    pub number: usize,
    /// The line as it appeared in the input, without its terminator.
    pub text: String,
}

impl LineRef {
    pub(crate) fn new(number: usize, text: &str) -> Self {
        Self {
            number,
            text: text.to_owned(),
        }
    }
}

impl fmt::Display for LineRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: '{}'", self.number, self.text)
    }
}

fn located(at: &Option<LineRef>) -> String {
    at.as_ref().map_or_else(String::new, |at| format!(" at {at}"))
}

/// Errors raised while decoding ACL text or editing an [`AclModel`](crate::AclModel).
///
/// Every variant is a usage or data error; none is retried.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum AclError {
    /// A permission field is not four characters drawn from `[r-][w-][x-][c-]`.
    #[error("invalid permission string '{perms}'{}", located(.at))]
    InvalidPermissionFormat {
        /// The rejected permission text.
        perms: String,
        /// Where it appeared, when it came from decoded text.
        at: Option<LineRef>,
    },
    /// A line matches no entry form.
    #[error("unrecognized ACL {at}")]
    UnrecognizedAclLine {
        /// The offending line.
        at: LineRef,
    },
    /// `user::`, `group::`, `other::` or `mask::` occurs twice in one collection.
    #[error("duplicate {entry} entry at {at}")]
    DuplicateSingletonEntry {
        /// The repeated entry prefix, for example `mask::`.
        entry: &'static str,
        /// The second occurrence.
        at: LineRef,
    },
    /// The same named user or group occurs twice in one collection.
    #[error("duplicate entry for {principal} at {at}")]
    DuplicateNamedEntry {
        /// The repeated principal.
        principal: Principal,
        /// The second occurrence.
        at: LineRef,
    },
    /// The default ACL of a directory was edited before it was loaded.
    #[error("{kind} ACL of '{}' has not been loaded", .path.display())]
    MissingTargetCollection {
        /// Target path.
        path: PathBuf,
        /// The collection that was addressed.
        kind: AclKind,
    },
    /// A named entry to remove does not exist.
    #[error("{kind} ACL of '{}' has no entry for {principal}", .path.display())]
    EntryNotFound {
        /// Target path.
        path: PathBuf,
        /// The collection searched.
        kind: AclKind,
        /// The principal that was not found.
        principal: Principal,
    },
    /// A default ACL was addressed on something that is not a directory.
    #[error("'{}' is not a directory; default ACLs apply only to directories", .path.display())]
    NotDirectory {
        /// Target path.
        path: PathBuf,
    },
    /// A user or group qualifier cannot be written to ACL text.
    #[error("invalid user or group name '{name}'")]
    InvalidPrincipal {
        /// The rejected name.
        name: String,
    },
}

impl AclError {
    /// The offending line for decode errors.
    #[must_use]
    pub const fn line(&self) -> Option<&LineRef> {
        match self {
            Self::InvalidPermissionFormat { at, .. } => at.as_ref(),
            Self::UnrecognizedAclLine { at }
            | Self::DuplicateSingletonEntry { at, .. }
            | Self::DuplicateNamedEntry { at, .. } => Some(at),
            Self::MissingTargetCollection { .. }
            | Self::EntryNotFound { .. }
            | Self::NotDirectory { .. }
            | Self::InvalidPrincipal { .. } => None,
        }
    }
}

impl From<PermsError> for AclError {
    fn from(error: PermsError) -> Self {
        Self::InvalidPermissionFormat {
            perms: error.text().to_owned(),
            at: None,
        }
    }
}
