//! Exit codes for the pd-core CLI.
//!
//! Exit code ranges:
//! - 0: Success
//! - 10-19: User/environment errors (recoverable by user action)
//! - 20-29: Internal errors

use crate::LogError;

/// Exit codes for pd-core runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Every input line was logged.
    Clean = 0,

    /// Invalid redaction or logging configuration.
    ConfigError = 10,

    /// An input line could not be parsed as a row.
    InputError = 11,

    /// I/O error reading input or config.
    IoError = 21,
}

impl ExitCode {
    /// Convert to i32 for process exit.
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    pub fn is_success(self) -> bool {
        self == ExitCode::Clean
    }

    /// Get the code name as a string constant.
    pub fn code_name(&self) -> &'static str {
        match self {
            ExitCode::Clean => "OK_CLEAN",
            ExitCode::ConfigError => "ERR_CONFIG",
            ExitCode::InputError => "ERR_INPUT",
            ExitCode::IoError => "ERR_IO",
        }
    }
}

impl From<&LogError> for ExitCode {
    fn from(err: &LogError) -> Self {
        match err {
            LogError::Redaction(pd_redact::RedactionError::IoError(_)) | LogError::Io(_) => {
                ExitCode::IoError
            }
            LogError::Redaction(_) | LogError::Init(_) => ExitCode::ConfigError,
            LogError::Row { .. } => ExitCode::InputError,
        }
    }
}

impl std::fmt::Display for ExitCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.code_name(), self.as_i32())
    }
}
