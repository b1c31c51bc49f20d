//! Process exit statuses for the ssacl tools.
//!
//! # Examples
//!
//! ```
//! use cli::ExitCode;
//!
//! let code = ExitCode::PartialFailure;
//! assert_eq!(code.as_i32(), 23);
//! assert_eq!(code.description(), "some paths failed");
//! ```

use std::fmt;

/// Exit statuses returned by `ssacl` and `ssacl-backup`.
///
/// A usage error (`1`) processes nothing; a partial failure (`23`) means
/// the remaining paths were still handled.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum ExitCode {
    /// Every path was processed.
    Ok = 0,

    /// The command line was invalid; nothing was processed.
    Syntax = 1,

    /// At least one path failed; the others were processed.
    PartialFailure = 23,
}

impl ExitCode {
    /// Returns the numeric status.
    #[must_use]
    pub const fn as_i32(self) -> i32 {
        self as i32
    }

    /// Returns a short description of the status.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::Ok => "success",
            Self::Syntax => "syntax or usage error",
            Self::PartialFailure => "some paths failed",
        }
    }

    /// Whether this status reports success.
    #[must_use]
    pub const fn is_success(self) -> bool {
        matches!(self, Self::Ok)
    }
}

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.description(), self.as_i32())
    }
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> Self {
        code.as_i32()
    }
}

impl From<ExitCode> for std::process::ExitCode {
    fn from(code: ExitCode) -> Self {
        // All variants fit in u8.
        Self::from(code.as_i32() as u8)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_values_are_stable() {
        assert_eq!(ExitCode::Ok.as_i32(), 0);
        assert_eq!(ExitCode::Syntax.as_i32(), 1);
        assert_eq!(ExitCode::PartialFailure.as_i32(), 23);
    }

    #[test]
    fn display_includes_number() {
        assert_eq!(ExitCode::Syntax.to_string(), "syntax or usage error (1)");
        assert!(ExitCode::Ok.is_success());
        assert!(!ExitCode::PartialFailure.is_success());
        assert_eq!(i32::from(ExitCode::PartialFailure), 23);
    }
}
