use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};

/// One filesystem entry reached by a [`crate::Walker`].
#[derive(Debug)]
pub struct WalkEntry {
    pub(crate) full_path: PathBuf,
    pub(crate) relative_path: PathBuf,
    pub(crate) metadata: fs::Metadata,
    pub(crate) depth: usize,
    pub(crate) is_root: bool,
    pub(crate) descends: bool,
}

impl WalkEntry {
    /// Path to hand to the ACL gateway.
    #[must_use]
    pub fn full_path(&self) -> &Path {
        &self.full_path
    }

    /// Path relative to the traversal root. Empty for the root.
    #[must_use]
    pub fn relative_path(&self) -> &Path {
        &self.relative_path
    }

    /// Metadata of the entry itself, without following a final symlink.
    #[must_use]
    pub fn metadata(&self) -> &fs::Metadata {
        &self.metadata
    }

    /// Whether the entry is a directory.
    ///
    /// A symlink counts as a directory only when symlinks are followed and
    /// its target is one. This decides whether default ACL edits apply.
    ///
    /// # Examples
    ///
    /// ```
    /// use walk::WalkBuilder;
    /// # fn demo() -> Result<(), Box<dyn std::error::Error>> {
    /// let temp = tempfile::tempdir()?;
    /// std::fs::write(temp.path().join("data.csv"), b"x")?;
    /// let mut walker = WalkBuilder::new(temp.path()).build()?;
    /// assert!(walker.next().unwrap()?.is_dir());
    /// assert!(!walker.next().unwrap()?.is_dir());
    /// # Ok(())
    /// # }
    /// # demo().unwrap();
    /// ```
    #[must_use]
    pub const fn is_dir(&self) -> bool {
        self.descends
    }

    /// Final component of the relative path; `None` for the root.
    #[must_use]
    pub fn file_name(&self) -> Option<&OsStr> {
        if self.is_root {
            None
        } else {
            self.relative_path.file_name()
        }
    }

    /// Depth below the root, which has depth `0`.
    #[must_use]
    pub const fn depth(&self) -> usize {
        self.depth
    }

    /// Whether this entry is the traversal root.
    #[must_use]
    pub const fn is_root(&self) -> bool {
        self.is_root
    }
}
