//! Locations of the SpectrumScale commands and run options.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Install location of `mmgetacl` on SpectrumScale nodes.
pub const DEFAULT_MMGETACL: &str = "/usr/lpp/mmfs/bin/mmgetacl";
/// Install location of `mmputacl` on SpectrumScale nodes.
pub const DEFAULT_MMPUTACL: &str = "/usr/lpp/mmfs/bin/mmputacl";
/// Environment variable overriding [`DEFAULT_MMGETACL`].
pub const ENV_MMGETACL: &str = "SSACL_MMGETACL";
/// Environment variable overriding [`DEFAULT_MMPUTACL`].
pub const ENV_MMPUTACL: &str = "SSACL_MMPUTACL";

/// Settings for [`crate::MmfsGateway`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MmfsConfig {
    mmgetacl: PathBuf,
    mmputacl: PathBuf,
    dry_run: bool,
    temp_dir: Option<PathBuf>,
}

impl Default for MmfsConfig {
    fn default() -> Self {
        Self {
            mmgetacl: PathBuf::from(DEFAULT_MMGETACL),
            mmputacl: PathBuf::from(DEFAULT_MMPUTACL),
            dry_run: false,
            temp_dir: None,
        }
    }
}

impl MmfsConfig {
    /// Defaults, with command paths taken from the environment when set.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var_os(name))
    }

    /// Like [`MmfsConfig::from_env`], reading variables through `lookup`.
    ///
    /// Empty values are ignored.
    #[must_use]
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<OsString>,
    {
        let mut config = Self::default();
        let set = |name: &str| lookup(name).filter(|value| !value.is_empty());
        if let Some(path) = set(ENV_MMGETACL) {
            config.mmgetacl = PathBuf::from(path);
        }
        if let Some(path) = set(ENV_MMPUTACL) {
            config.mmputacl = PathBuf::from(path);
        }
        config
    }

    /// Uses `path` as the `mmgetacl` command.
    #[must_use]
    pub fn with_mmgetacl<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.mmgetacl = path.into();
        self
    }

    /// Uses `path` as the `mmputacl` command.
    #[must_use]
    pub fn with_mmputacl<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.mmputacl = path.into();
        self
    }

    /// In dry-run mode apply commands are logged instead of run.
    #[must_use]
    pub const fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Directory for the ACL files handed to `mmputacl`. Defaults to the
    /// system temporary directory.
    #[must_use]
    pub fn with_temp_dir<P: Into<PathBuf>>(mut self, dir: P) -> Self {
        self.temp_dir = Some(dir.into());
        self
    }

    /// The `mmgetacl` command.
    #[must_use]
    pub fn mmgetacl(&self) -> &Path {
        &self.mmgetacl
    }

    /// The `mmputacl` command.
    #[must_use]
    pub fn mmputacl(&self) -> &Path {
        &self.mmputacl
    }

    /// Whether apply commands are only logged.
    #[must_use]
    pub const fn dry_run(&self) -> bool {
        self.dry_run
    }

    /// The configured temporary directory, if any.
    #[must_use]
    pub fn temp_dir(&self) -> Option<&Path> {
        self.temp_dir.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_gpfs_install() {
        let config = MmfsConfig::default();
        assert_eq!(config.mmgetacl(), Path::new("/usr/lpp/mmfs/bin/mmgetacl"));
        assert_eq!(config.mmputacl(), Path::new("/usr/lpp/mmfs/bin/mmputacl"));
        assert!(!config.dry_run());
        assert!(config.temp_dir().is_none());
    }

    #[test]
    fn environment_overrides_defaults() {
        let config = MmfsConfig::from_lookup(|name| match name {
            ENV_MMGETACL => Some(OsString::from("/opt/fake/mmgetacl")),
            ENV_MMPUTACL => Some(OsString::new()),
            _ => None,
        });
        assert_eq!(config.mmgetacl(), Path::new("/opt/fake/mmgetacl"));
        assert_eq!(config.mmputacl(), Path::new(DEFAULT_MMPUTACL));
    }

    #[test]
    fn builder_methods_override_environment() {
        let config = MmfsConfig::from_lookup(|_| Some(OsString::from("/env/cmd")))
            .with_mmputacl("/flag/mmputacl")
            .with_dry_run(true)
            .with_temp_dir("/var/tmp");
        assert_eq!(config.mmgetacl(), Path::new("/env/cmd"));
        assert_eq!(config.mmputacl(), Path::new("/flag/mmputacl"));
        assert!(config.dry_run());
        assert_eq!(config.temp_dir(), Some(Path::new("/var/tmp")));
    }
}
