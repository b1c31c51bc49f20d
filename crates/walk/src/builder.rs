use crate::error::WalkError;
use crate::walker::Walker;
use std::path::PathBuf;

/// Configures a traversal below one path operand.
///
/// Used by `ssacl --recursive` to reach every entry under a directory whose
/// ACL is being edited.
#[derive(Clone, Debug)]
pub struct WalkBuilder {
    root: PathBuf,
    follow_symlinks: bool,
    include_root: bool,
}

impl WalkBuilder {
    /// Creates a builder for a traversal rooted at `root`.
    #[must_use]
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self {
            root: root.into(),
            follow_symlinks: false,
            include_root: true,
        }
    }

    /// Configures whether symlinks to directories are descended into.
    ///
    /// The symlink entry itself is always yielded. When enabled, its target's
    /// contents follow it under the symlink's relative path. Canonical paths
    /// are tracked so a link back to an ancestor is entered only once.
    #[must_use]
    pub const fn follow_symlinks(mut self, follow: bool) -> Self {
        self.follow_symlinks = follow;
        self
    }

    /// Controls whether the root itself is the first yielded entry.
    #[must_use]
    pub const fn include_root(mut self, include: bool) -> Self {
        self.include_root = include;
        self
    }

    /// Builds a [`Walker`], failing only when the root cannot be inspected.
    pub fn build(self) -> Result<Walker, WalkError> {
        Walker::new(self.root, self.follow_symlinks, self.include_root)
    }
}
