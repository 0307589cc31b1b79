//! Redacting log output for personal data.
//!
//! Builds on `pd-redact` to provide:
//! - Log records, levels, and a formatter stack whose outer layer redacts
//!   sensitive `key=value` pairs before rendering
//! - Explicitly constructed loggers and a tracing layer
//! - User-row rendering and a JSON-lines row reader for the CLI

pub mod error;
pub mod exit_codes;
pub mod logging;
pub mod rows;

pub use error::{LogError, Result};
pub use exit_codes::ExitCode;
pub use logging::{get_logger, get_logger_with, init_logging, LOGGER_NAME};
pub use rows::{log_rows, JsonRowReader, UserRow, USER_FIELDS};
