//! Running one SpectrumScale command and capturing what it printed.

use std::ffi::OsString;
use std::fmt;
use std::io;
use std::path::Path;
use std::process::{Command, ExitStatus};

use logging::trace_cmd;

/// A program with its arguments, kept for logging and error messages.
pub(crate) struct CommandLine {
    program: OsString,
    args: Vec<OsString>,
}

impl CommandLine {
    pub(crate) fn new(program: &Path) -> Self {
        Self {
            program: program.as_os_str().to_owned(),
            args: Vec::new(),
        }
    }

    pub(crate) fn arg<S: Into<OsString>>(mut self, arg: S) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Runs the command to completion with stdout and stderr captured.
    pub(crate) fn run(&self) -> io::Result<Captured> {
        trace_cmd!(command = %self, "running");
        let output = Command::new(&self.program).args(&self.args).output()?;
        let captured = Captured {
            status: output.status,
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };
        trace_cmd!(
            command = %self,
            status = %captured.status,
            stderr = captured.stderr.trim_end(),
            "finished"
        );
        tracing::trace!(target: "ssacl::cmd", stdout = %captured.stdout, "command output");
        Ok(captured)
    }
}

impl fmt::Display for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program.to_string_lossy())?;
        for arg in &self.args {
            write!(f, " {}", arg.to_string_lossy())?;
        }
        Ok(())
    }
}

pub(crate) struct Captured {
    pub(crate) status: ExitStatus,
    pub(crate) stdout: String,
    pub(crate) stderr: String,
}

impl Captured {
    /// Failure description: the command line, its status and what it wrote
    /// to stderr.
    pub(crate) fn failure(&self, command: &CommandLine) -> String {
        let stderr = self.stderr.trim();
        if stderr.is_empty() {
            format!("{command} exited with {}", self.status)
        } else {
            format!("{command} exited with {}: {stderr}", self.status)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_joins_program_and_arguments() {
        let command = CommandLine::new(Path::new("/usr/lpp/mmfs/bin/mmputacl"))
            .arg("-d")
            .arg("-i")
            .arg("/tmp/acl.txt")
            .arg("/gpfs/fs1/projects");
        assert_eq!(
            command.to_string(),
            "/usr/lpp/mmfs/bin/mmputacl -d -i /tmp/acl.txt /gpfs/fs1/projects"
        );
    }

    #[cfg(unix)]
    #[test]
    fn run_captures_output_and_status() {
        let command = CommandLine::new(Path::new("/bin/sh"))
            .arg("-c")
            .arg("echo out; echo err >&2; exit 3");
        let captured = command.run().expect("run sh");
        assert_eq!(captured.stdout, "out\n");
        assert_eq!(captured.stderr, "err\n");
        assert_eq!(captured.status.code(), Some(3));
        let message = captured.failure(&command);
        assert!(message.starts_with("/bin/sh -c"));
        assert!(message.ends_with(": err"));
    }
}
