//! Error types for pd-core.

use pd_redact::RedactionError;
use thiserror::Error;

/// Result type for pd-core operations.
pub type Result<T> = std::result::Result<T, LogError>;

/// Errors raised while configuring logging or reading input rows.
///
/// Emitting a record never produces one of these.
#[derive(Error, Debug)]
pub enum LogError {
    /// The redaction config could not be built.
    #[error("redaction config error: {0}")]
    Redaction(#[from] RedactionError),

    /// A global subscriber is already installed.
    #[error("logging init failed: {0}")]
    Init(String),

    /// An input line is not a valid user row.
    #[error("invalid row at line {line}: {source}")]
    Row {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    /// I/O error while reading input.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
