//! Error types for redaction configuration.

use thiserror::Error;

/// Result type for redaction operations.
pub type Result<T> = std::result::Result<T, RedactionError>;

/// Errors raised while building a redaction configuration.
///
/// Applying a built filter never fails; every variant here surfaces at
/// construction time.
#[derive(Error, Debug)]
pub enum RedactionError {
    /// No field names were supplied.
    #[error("field set is empty")]
    EmptyFieldSet,

    /// A field name cannot be used as a `key=` prefix.
    #[error("invalid field name: {0:?}")]
    InvalidFieldName(String),

    /// The separator is empty.
    #[error("separator must not be empty")]
    InvalidSeparator,

    /// The redaction marker contains the separator.
    #[error("redaction marker {0:?} must not contain the separator")]
    InvalidRedaction(String),

    /// Failed to compile the field pattern.
    #[error("pattern error: {0}")]
    PatternError(String),

    /// I/O error while reading or writing a config file.
    #[error("io error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON parsing error, including a field list of the wrong shape.
    #[error("json error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl From<regex::Error> for RedactionError {
    fn from(err: regex::Error) -> Self {
        RedactionError::PatternError(err.to_string())
    }
}
