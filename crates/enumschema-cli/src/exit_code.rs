//! Process exit codes.

use enumschema_core::Error;
use std::fmt;

/// CLI exit code with semantic meaning.
///
/// # Examples
///
/// ```
/// use enumschema_cli::ExitCode;
///
/// assert_eq!(ExitCode::SUCCESS.as_i32(), 0);
/// assert!(!ExitCode::ERROR.is_success());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ExitCode(i32);

impl ExitCode {
    /// Successful execution (exit code 0).
    pub const SUCCESS: Self = Self(0);

    /// Generation failed (exit code 1).
    pub const ERROR: Self = Self(1);

    /// Invalid input or configuration (exit code 2).
    pub const INVALID_INPUT: Self = Self(2);

    /// Picks the exit code for a failed run.
    ///
    /// Configuration and load errors are invalid input; everything else,
    /// including errors that did not come from generation, is a general
    /// error.
    #[must_use]
    pub fn from_error(err: &anyhow::Error) -> Self {
        match err.downcast_ref::<Error>() {
            Some(e) if e.is_config_error() => Self::INVALID_INPUT,
            _ => Self::ERROR,
        }
    }

    /// Returns the exit code as an integer.
    #[must_use]
    pub const fn as_i32(&self) -> i32 {
        self.0
    }

    /// Checks if the exit code represents success.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.0 == 0
    }
}

impl Default for ExitCode {
    fn default() -> Self {
        Self::SUCCESS
    }
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> Self {
        code.0
    }
}

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
