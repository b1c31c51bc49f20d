use std::error::Error;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

/// A traversal failure, always tied to the path that caused it.
#[derive(Debug)]
pub struct WalkError {
    kind: WalkErrorKind,
}

impl WalkError {
    pub(crate) const fn new(kind: WalkErrorKind) -> Self {
        Self { kind }
    }

    pub(crate) const fn root(path: PathBuf, source: io::Error) -> Self {
        Self::new(WalkErrorKind::Root { path, source })
    }

    pub(crate) const fn read_dir(path: PathBuf, source: io::Error) -> Self {
        Self::new(WalkErrorKind::ReadDir { path, source })
    }

    pub(crate) const fn metadata(path: PathBuf, source: io::Error) -> Self {
        Self::new(WalkErrorKind::Metadata { path, source })
    }

    pub(crate) const fn canonicalize(path: PathBuf, source: io::Error) -> Self {
        Self::new(WalkErrorKind::Canonicalize { path, source })
    }

    /// Returns the specific failure.
    #[must_use]
    pub const fn kind(&self) -> &WalkErrorKind {
        &self.kind
    }

    /// Returns the path the failure concerns.
    ///
    /// # Examples
    ///
    /// ```
    /// use walk::WalkBuilder;
    ///
    /// let error = match WalkBuilder::new("./no_such_gpfs_fileset").build() {
    ///     Ok(_) => panic!("missing root yields error"),
    ///     Err(error) => error,
    /// };
    /// assert!(error.path().ends_with("no_such_gpfs_fileset"));
    /// ```
    #[must_use]
    pub fn path(&self) -> &Path {
        self.kind.path()
    }
}

impl fmt::Display for WalkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            WalkErrorKind::Root { path, source } => {
                write!(f, "cannot access '{}': {}", path.display(), source)
            }
            WalkErrorKind::ReadDir { path, source } => {
                write!(f, "cannot read directory '{}': {}", path.display(), source)
            }
            WalkErrorKind::Metadata { path, source } => {
                write!(f, "cannot stat '{}': {}", path.display(), source)
            }
            WalkErrorKind::Canonicalize { path, source } => {
                write!(f, "cannot resolve '{}': {}", path.display(), source)
            }
        }
    }
}

impl Error for WalkError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match &self.kind {
            WalkErrorKind::Root { source, .. }
            | WalkErrorKind::ReadDir { source, .. }
            | WalkErrorKind::Metadata { source, .. }
            | WalkErrorKind::Canonicalize { source, .. } => Some(source),
        }
    }
}

/// Classification of traversal failures.
#[derive(Debug)]
pub enum WalkErrorKind {
    /// The traversal root could not be inspected. Fatal for the walk.
    Root {
        /// The root path.
        path: PathBuf,
        /// Underlying error.
        source: io::Error,
    },
    /// A directory's listing could not be read. Its contents are skipped.
    ReadDir {
        /// The unreadable directory.
        path: PathBuf,
        /// Underlying error.
        source: io::Error,
    },
    /// An entry vanished or could not be inspected.
    Metadata {
        /// The entry path.
        path: PathBuf,
        /// Underlying error.
        source: io::Error,
    },
    /// A followed directory could not be resolved for cycle detection.
    Canonicalize {
        /// The directory path.
        path: PathBuf,
        /// Underlying error.
        source: io::Error,
    },
}

impl WalkErrorKind {
    /// Returns the path tied to the failure.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::Root { path, .. }
            | Self::ReadDir { path, .. }
            | Self::Metadata { path, .. }
            | Self::Canonicalize { path, .. } => path,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn denied() -> io::Error {
        io::Error::from(io::ErrorKind::PermissionDenied)
    }

    #[test]
    fn every_kind_reports_its_path() {
        let errors = [
            WalkError::root(PathBuf::from("/gpfs/fs1"), denied()),
            WalkError::read_dir(PathBuf::from("/gpfs/fs1"), denied()),
            WalkError::metadata(PathBuf::from("/gpfs/fs1"), denied()),
            WalkError::canonicalize(PathBuf::from("/gpfs/fs1"), denied()),
        ];
        for error in &errors {
            assert_eq!(error.path(), Path::new("/gpfs/fs1"));
            assert_eq!(error.kind().path(), Path::new("/gpfs/fs1"));
        }
    }

    #[test]
    fn display_names_the_operation() {
        let error = WalkError::read_dir(
            PathBuf::from("/gpfs/fs1/projects"),
            io::Error::other("Permission denied"),
        );
        assert_eq!(
            error.to_string(),
            "cannot read directory '/gpfs/fs1/projects': Permission denied"
        );

        let error = WalkError::root(PathBuf::from("missing"), io::Error::other("gone"));
        assert_eq!(error.to_string(), "cannot access 'missing': gone");
    }

    #[test]
    fn source_is_the_io_error() {
        let error = WalkError::metadata(PathBuf::from("x"), io::Error::other("inner"));
        let source = error
            .source()
            .and_then(|err| err.downcast_ref::<io::Error>())
            .expect("walk error exposes io::Error");
        assert_eq!(source.to_string(), "inner");
    }
}
