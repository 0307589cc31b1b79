//! Redacting logging for personal data.
//!
//! Two ways to emit redacted lines:
//! - An explicitly constructed [`Logger`] (see [`get_logger`]) for code that
//!   logs user rows directly
//! - A tracing [`RedactingLayer`] installed by [`init_logging`] so ordinary
//!   `tracing` events are redacted the same way
//!
//! # Usage
//!
//! ```no_run
//! use pd_core::logging::get_logger;
//!
//! let logger = get_logger();
//! logger.info("name=Bob; email=bob@example.com; ip=10.0.0.1;");
//! // [HOLBERTON] user_data INFO 2024-01-15 10:30:05,042: name=***; email=***; ip=10.0.0.1;
//! ```
//!
//! # Design Notes
//!
//! - All log output goes to stderr
//! - Formatters rewrite the record's message in place, so later handlers
//!   never see the unredacted text
//! - No global logger table; each call to [`get_logger`] builds a new logger

pub mod config;
pub mod formatter;
pub mod layer;
pub mod logger;
pub mod record;

pub use config::{LogConfig, LogFormat, LogLevel};
pub use formatter::{
    JsonFormatter, RecordFormatter, RedactingFormatter, TemplateFormatter, DEFAULT_TAG,
    TIMESTAMP_FORMAT,
};
pub use layer::RedactingLayer;
pub use logger::{Logger, StreamHandler};
pub use record::{Level, LogRecord};

use std::io::Write;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use crate::{LogError, Result};

/// Name of the logger returned by [`get_logger`].
pub const LOGGER_NAME: &str = "user_data";

/// Build the user-data logger: INFO threshold, one stderr handler that
/// redacts the PII fields.
pub fn get_logger() -> Logger {
    Logger::new(LOGGER_NAME, LogLevel::Info).with_handler(StreamHandler::stderr(
        RedactingFormatter::pii(),
    ))
}

/// Build the user-data logger from `config`, writing to `writer`.
pub fn get_logger_with<W>(config: &LogConfig, writer: W) -> Result<Logger>
where
    W: Write + Send + 'static,
{
    let formatter = config.build_formatter()?;
    Ok(Logger::new(LOGGER_NAME, config.level)
        .with_handler(StreamHandler::from_boxed(formatter, Box::new(writer))))
}

/// Install the redacting tracing layer as the global subscriber.
///
/// Respects RUST_LOG directives when set, unless PD_LOG is also set (PD_LOG
/// takes precedence, as in [`LogConfig::from_env`]); otherwise filters at
/// `config.level`. Fails if a global subscriber is already installed or the
/// redaction config is invalid.
pub fn init_logging(config: &LogConfig) -> Result<()> {
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let filter = env_filter(
        config,
        std::env::var_os("PD_LOG").is_some(),
        rust_log.as_deref(),
    );
    let layer = RedactingLayer::stderr(config.build_formatter()?);

    tracing_subscriber::registry()
        .with(filter)
        .with(layer)
        .try_init()
        .map_err(|e| LogError::Init(e.to_string()))
}

fn env_filter(config: &LogConfig, pd_log_set: bool, rust_log: Option<&str>) -> EnvFilter {
    let fallback = || EnvFilter::new(config.level.to_string());
    match rust_log {
        Some(directives) if !pd_log_set => {
            EnvFilter::try_new(directives).unwrap_or_else(|_| fallback())
        }
        _ => fallback(),
    }
}
