//! Shared fixtures for ssacl tests.
//!
//! [`MemoryGateway`] stands in for SpectrumScale: it keeps ACL text per path
//! in memory and records every apply. [`Fileset`] builds a real directory
//! tree in a temporary directory and registers each entry with a gateway, so
//! code that probes the filesystem and code that talks to the gateway see
//! the same paths.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use acl::{AclGateway, AclKind, GatewayError};
use tempfile::TempDir;

/// Access ACL of a file as `mmgetacl` prints it.
pub const FILE_ACL: &str = "\
#owner:smithj
#group:staff
user::rw-c
group::r---
other::----
";

/// Access ACL of a directory carrying one named group.
pub const DIRECTORY_ACL: &str = "\
#owner:smithj
#group:staff
user::rwxc
group::r-x-
other::----
mask::r-x-
group:nfsnobody:r-x- #effective:r-x-
";

/// Default ACL of a directory as `mmgetacl -d` prints it.
pub const DEFAULT_ACL: &str = "\
#owner:smithj
#group:staff
user::rwxc
group::r-x-
other::----
";

/// One call to an apply method.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Applied {
    /// Target path.
    pub path: PathBuf,
    /// Which collection was replaced.
    pub kind: AclKind,
    /// The text handed to the gateway.
    pub text: String,
}

#[derive(Clone, Debug)]
struct Node {
    directory: bool,
    access: String,
    default: Option<String>,
}

/// In-memory [`AclGateway`].
#[derive(Debug, Default)]
pub struct MemoryGateway {
    nodes: Mutex<HashMap<PathBuf, Node>>,
    failures: Mutex<HashMap<PathBuf, String>>,
    applied: Mutex<Vec<Applied>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl MemoryGateway {
    /// An empty gateway: every path is `NotFound`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a file with the given access ACL text.
    #[must_use]
    pub fn with_file(self, path: impl Into<PathBuf>, access: &str) -> Self {
        self.insert_file(path, access);
        self
    }

    /// Adds a directory with the given access and default ACL texts.
    #[must_use]
    pub fn with_directory(self, path: impl Into<PathBuf>, access: &str, default: &str) -> Self {
        self.insert_directory(path, access, default);
        self
    }

    /// Makes every fetch and apply for `path` fail with `reason`.
    #[must_use]
    pub fn failing(self, path: impl Into<PathBuf>, reason: &str) -> Self {
        lock(&self.failures).insert(path.into(), reason.to_owned());
        self
    }

    /// Adds or replaces a file.
    pub fn insert_file(&self, path: impl Into<PathBuf>, access: &str) {
        let node = Node {
            directory: false,
            access: access.to_owned(),
            default: None,
        };
        lock(&self.nodes).insert(path.into(), node);
    }

    /// Adds or replaces a directory.
    pub fn insert_directory(&self, path: impl Into<PathBuf>, access: &str, default: &str) {
        let node = Node {
            directory: true,
            access: access.to_owned(),
            default: Some(default.to_owned()),
        };
        lock(&self.nodes).insert(path.into(), node);
    }

    /// Current access ACL text of `path`.
    #[must_use]
    pub fn access_text(&self, path: &Path) -> Option<String> {
        lock(&self.nodes).get(path).map(|node| node.access.clone())
    }

    /// Current default ACL text of `path`.
    #[must_use]
    pub fn default_text(&self, path: &Path) -> Option<String> {
        lock(&self.nodes)
            .get(path)
            .and_then(|node| node.default.clone())
    }

    /// Every apply so far, in call order.
    #[must_use]
    pub fn applied(&self) -> Vec<Applied> {
        lock(&self.applied).clone()
    }

    fn check(&self, path: &Path, kind: AclKind) -> Result<(), GatewayError> {
        let nodes = lock(&self.nodes);
        let node = nodes.get(path).ok_or_else(|| GatewayError::NotFound {
            path: path.to_path_buf(),
        })?;
        if kind == AclKind::Default && !node.directory {
            return Err(GatewayError::NotDirectory {
                path: path.to_path_buf(),
            });
        }
        Ok(())
    }

    fn failure(&self, path: &Path) -> Option<String> {
        lock(&self.failures).get(path).cloned()
    }

    fn fetch(&self, path: &Path, kind: AclKind) -> Result<String, GatewayError> {
        self.check(path, kind)?;
        if let Some(reason) = self.failure(path) {
            return Err(GatewayError::Fetch {
                path: path.to_path_buf(),
                reason,
            });
        }
        let nodes = lock(&self.nodes);
        let node = &nodes[path];
        Ok(match kind {
            AclKind::Access => node.access.clone(),
            AclKind::Default => node.default.clone().unwrap_or_default(),
        })
    }

    fn apply(&self, path: &Path, text: &str, kind: AclKind) -> Result<(), GatewayError> {
        self.check(path, kind)?;
        if let Some(reason) = self.failure(path) {
            return Err(GatewayError::Apply {
                path: path.to_path_buf(),
                reason,
            });
        }
        if let Some(node) = lock(&self.nodes).get_mut(path) {
            match kind {
                AclKind::Access => node.access = text.to_owned(),
                AclKind::Default => node.default = Some(text.to_owned()),
            }
        }
        lock(&self.applied).push(Applied {
            path: path.to_path_buf(),
            kind,
            text: text.to_owned(),
        });
        Ok(())
    }
}

impl AclGateway for MemoryGateway {
    fn fetch_access_acl(&self, path: &Path) -> Result<String, GatewayError> {
        self.fetch(path, AclKind::Access)
    }

    fn fetch_default_acl(&self, path: &Path) -> Result<String, GatewayError> {
        self.fetch(path, AclKind::Default)
    }

    fn apply_access_acl(&self, path: &Path, text: &str) -> Result<(), GatewayError> {
        self.apply(path, text, AclKind::Access)
    }

    fn apply_default_acl(&self, path: &Path, text: &str) -> Result<(), GatewayError> {
        self.apply(path, text, AclKind::Default)
    }
}

/// A temporary directory tree whose entries are registered with a
/// [`MemoryGateway`].
///
/// Files get [`FILE_ACL`]; directories get [`DIRECTORY_ACL`] and
/// [`DEFAULT_ACL`]. The root is a registered directory.
#[derive(Debug)]
pub struct Fileset {
    dir: TempDir,
    gateway: MemoryGateway,
}

impl Fileset {
    /// Creates an empty fileset.
    pub fn new() -> io::Result<Self> {
        let dir = tempfile::tempdir()?;
        let gateway = MemoryGateway::new();
        gateway.insert_directory(dir.path(), DIRECTORY_ACL, DEFAULT_ACL);
        Ok(Self { dir, gateway })
    }

    /// The fileset root.
    #[must_use]
    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    /// The gateway holding the fileset's ACLs.
    #[must_use]
    pub const fn gateway(&self) -> &MemoryGateway {
        &self.gateway
    }

    /// Creates a file below the root, with parents, and registers it.
    pub fn file(&self, relative: impl AsRef<Path>) -> io::Result<PathBuf> {
        let path = self.root().join(relative);
        if let Some(parent) = path.parent() {
            self.create_dirs(parent)?;
        }
        fs::write(&path, b"")?;
        self.gateway.insert_file(&path, FILE_ACL);
        Ok(path)
    }

    /// Creates a directory below the root, with parents, and registers it.
    pub fn directory(&self, relative: impl AsRef<Path>) -> io::Result<PathBuf> {
        let path = self.root().join(relative);
        self.create_dirs(&path)?;
        Ok(path)
    }

    fn create_dirs(&self, path: &Path) -> io::Result<()> {
        fs::create_dir_all(path)?;
        for ancestor in path.ancestors() {
            if ancestor == self.root() || !ancestor.starts_with(self.root()) {
                break;
            }
            if self.gateway.access_text(ancestor).is_none() {
                self.gateway
                    .insert_directory(ancestor, DIRECTORY_ACL, DEFAULT_ACL);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_gateway_round_trips_text() {
        let gateway = MemoryGateway::new().with_directory("/gpfs/d", DIRECTORY_ACL, DEFAULT_ACL);
        let path = Path::new("/gpfs/d");
        assert_eq!(gateway.fetch_access_acl(path).expect("fetch"), DIRECTORY_ACL);
        gateway
            .apply_default_acl(path, "user::rwxc\n")
            .expect("apply");
        assert_eq!(gateway.default_text(path).as_deref(), Some("user::rwxc\n"));
        assert_eq!(gateway.applied().len(), 1);
        assert_eq!(gateway.applied()[0].kind, AclKind::Default);
    }

    #[test]
    fn memory_gateway_reports_missing_and_non_directories() {
        let gateway = MemoryGateway::new().with_file("/gpfs/f", FILE_ACL);
        assert!(matches!(
            gateway.fetch_access_acl(Path::new("/gpfs/other")),
            Err(GatewayError::NotFound { .. })
        ));
        assert!(matches!(
            gateway.fetch_default_acl(Path::new("/gpfs/f")),
            Err(GatewayError::NotDirectory { .. })
        ));
    }

    #[test]
    fn failures_apply_to_fetch_and_apply() {
        let gateway = MemoryGateway::new()
            .with_file("/gpfs/f", FILE_ACL)
            .failing("/gpfs/f", "disk quota exceeded");
        assert!(matches!(
            gateway.fetch_access_acl(Path::new("/gpfs/f")),
            Err(GatewayError::Fetch { .. })
        ));
        assert!(matches!(
            gateway.apply_access_acl(Path::new("/gpfs/f"), FILE_ACL),
            Err(GatewayError::Apply { .. })
        ));
        assert!(gateway.applied().is_empty());
    }

    #[test]
    fn fileset_registers_created_entries() {
        let fileset = Fileset::new().expect("fileset");
        let file = fileset.file("alpha/raw/run1.dat").expect("file");
        assert!(file.is_file());
        let gateway = fileset.gateway();
        assert_eq!(gateway.access_text(&file).as_deref(), Some(FILE_ACL));
        let raw = fileset.root().join("alpha/raw");
        assert_eq!(gateway.default_text(&raw).as_deref(), Some(DEFAULT_ACL));
        assert!(gateway.access_text(&fileset.root().join("alpha")).is_some());
    }
}
