use std::fs;
use std::io::{self, Write};
use std::path::Path;

use acl::{AclGateway, AclKind, GatewayError};
use logging::trace_apply;
use tempfile::NamedTempFile;

use crate::command::CommandLine;
use crate::config::MmfsConfig;

/// [`AclGateway`] that shells out to `mmgetacl` and `mmputacl`.
///
/// Fetches run `mmgetacl [-d] PATH` and return its stdout. Applies write the
/// text to a temporary file and run `mmputacl [-d] -i FILE PATH`. The
/// temporary file is removed once the command finishes.
#[derive(Clone, Debug, Default)]
pub struct MmfsGateway {
    config: MmfsConfig,
}

impl MmfsGateway {
    /// Creates a gateway using `config`.
    #[must_use]
    pub const fn new(config: MmfsConfig) -> Self {
        Self { config }
    }

    /// The gateway's settings.
    #[must_use]
    pub const fn config(&self) -> &MmfsConfig {
        &self.config
    }

    fn fetch(&self, path: &Path, kind: AclKind) -> Result<String, GatewayError> {
        probe(path, kind)?;
        let command = with_kind(CommandLine::new(self.config.mmgetacl()), kind).arg(path);
        let captured = command.run().map_err(|source| GatewayError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        if !captured.status.success() {
            return Err(GatewayError::Fetch {
                path: path.to_path_buf(),
                reason: captured.failure(&command),
            });
        }
        Ok(captured.stdout)
    }

    fn apply(&self, path: &Path, text: &str, kind: AclKind) -> Result<(), GatewayError> {
        probe(path, kind)?;
        let io_error = |source: io::Error| GatewayError::Io {
            path: path.to_path_buf(),
            source,
        };

        let mut file = self.acl_file().map_err(io_error)?;
        file.write_all(text.as_bytes())
            .and_then(|()| file.flush())
            .map_err(io_error)?;

        let command = with_kind(CommandLine::new(self.config.mmputacl()), kind)
            .arg("-i")
            .arg(file.path())
            .arg(path);

        if self.config.dry_run() {
            trace_apply!(command = %command, "dry run, not applying {kind} ACL");
            tracing::trace!(target: "ssacl::apply", acl = text, "ACL text");
            return Ok(());
        }

        let captured = command.run().map_err(io_error)?;
        if !captured.status.success() {
            return Err(GatewayError::Apply {
                path: path.to_path_buf(),
                reason: captured.failure(&command),
            });
        }
        trace_apply!(path = %path.display(), "applied {kind} ACL");
        Ok(())
    }

    fn acl_file(&self) -> io::Result<NamedTempFile> {
        let mut builder = tempfile::Builder::new();
        builder.prefix("ssacl-").suffix(".acl");
        match self.config.temp_dir() {
            Some(dir) => builder.tempfile_in(dir),
            None => builder.tempfile(),
        }
    }
}

impl AclGateway for MmfsGateway {
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

fn with_kind(command: CommandLine, kind: AclKind) -> CommandLine {
    match kind {
        AclKind::Access => command,
        AclKind::Default => command.arg("-d"),
    }
}

/// Checks the path before running anything, so a missing path or a default
/// request on a file gets a precise error instead of the command's stderr.
fn probe(path: &Path, kind: AclKind) -> Result<(), GatewayError> {
    let metadata = fs::metadata(path).map_err(|source| {
        if source.kind() == io::ErrorKind::NotFound {
            GatewayError::NotFound {
                path: path.to_path_buf(),
            }
        } else {
            GatewayError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;
    if kind == AclKind::Default && !metadata.is_dir() {
        return Err(GatewayError::NotDirectory {
            path: path.to_path_buf(),
        });
    }
    Ok(())
}
