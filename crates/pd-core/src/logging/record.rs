//! Log records and severity levels.
//!
//! A [`LogRecord`] is created at the logging call site and handed to each
//! handler in turn. Formatters read it and may rewrite its message.

use chrono::{DateTime, Local};
use pd_redact::SEPARATOR;
use serde::{Deserialize, Serialize};

/// Severity of a record, ordered from least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl Level {
    /// Upper-case name used in rendered lines.
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Trace => "TRACE",
            Level::Debug => "DEBUG",
            Level::Info => "INFO",
            Level::Warn => "WARNING",
            Level::Error => "ERROR",
        }
    }
}

impl std::fmt::Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<tracing::Level> for Level {
    fn from(level: tracing::Level) -> Self {
        match level {
            tracing::Level::TRACE => Level::Trace,
            tracing::Level::DEBUG => Level::Debug,
            tracing::Level::INFO => Level::Info,
            tracing::Level::WARN => Level::Warn,
            tracing::Level::ERROR => Level::Error,
        }
    }
}

/// A single log record.
#[derive(Debug, Clone)]
pub struct LogRecord {
    /// Name of the logger (or tracing target) that produced the record.
    pub name: String,
    /// Severity.
    pub level: Level,
    /// Creation time.
    pub timestamp: DateTime<Local>,
    /// Message text without the structured fields.
    pub message: String,
    /// Structured `key=value` fields, interpolated after the message.
    pub fields: Vec<(String, String)>,
}

impl LogRecord {
    /// Create a record timestamped now.
    pub fn new(name: impl Into<String>, level: Level, message: impl Into<String>) -> Self {
        LogRecord {
            name: name.into(),
            level,
            timestamp: Local::now(),
            message: message.into(),
            fields: Vec::new(),
        }
    }

    /// Override the timestamp.
    pub fn with_timestamp(mut self, timestamp: DateTime<Local>) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Append a structured field.
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.push((key.into(), value.into()));
        self
    }

    /// The fully rendered message: the text followed by each field as
    /// `key=value;`, space separated.
    pub fn get_message(&self) -> String {
        if self.fields.is_empty() {
            return self.message.clone();
        }

        let rendered = self
            .fields
            .iter()
            .map(|(k, v)| format!("{}={}{}", k, v, SEPARATOR))
            .collect::<Vec<_>>()
            .join(" ");

        if self.message.is_empty() {
            rendered
        } else {
            format!("{} {}", self.message, rendered)
        }
    }

    /// Replace the message. Structured fields are considered folded into
    /// `message` and are cleared.
    pub fn set_message(&mut self, message: String) {
        self.message = message;
        self.fields.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_ordering() {
        assert!(Level::Trace < Level::Debug);
        assert!(Level::Debug < Level::Info);
        assert!(Level::Info < Level::Warn);
        assert!(Level::Warn < Level::Error);
    }

    #[test]
    fn test_level_display() {
        assert_eq!(Level::Info.to_string(), "INFO");
        assert_eq!(Level::Warn.to_string(), "WARNING");
        assert_eq!(Level::Error.to_string(), "ERROR");
    }

    #[test]
    fn test_level_serialization() {
        assert_eq!(serde_json::to_string(&Level::Info).unwrap(), "\"info\"");
        assert_eq!(serde_json::to_string(&Level::Warn).unwrap(), "\"warn\"");
    }

    #[test]
    fn test_level_from_tracing() {
        assert_eq!(Level::from(tracing::Level::INFO), Level::Info);
        assert_eq!(Level::from(tracing::Level::DEBUG), Level::Debug);
        assert_eq!(Level::from(tracing::Level::WARN), Level::Warn);
        assert_eq!(Level::from(tracing::Level::ERROR), Level::Error);
        assert_eq!(Level::from(tracing::Level::TRACE), Level::Trace);
    }

    #[test]
    fn test_get_message_plain() {
        let record = LogRecord::new("user_data", Level::Info, "name=Bob;");
        assert_eq!(record.get_message(), "name=Bob;");
    }

    #[test]
    fn test_get_message_with_fields() {
        let record = LogRecord::new("user_data", Level::Info, "login")
            .with_field("email", "bob@x.com")
            .with_field("ip", "10.0.0.1");
        assert_eq!(record.get_message(), "login email=bob@x.com; ip=10.0.0.1;");
    }

    #[test]
    fn test_get_message_fields_only() {
        let record = LogRecord::new("user_data", Level::Info, "").with_field("ssn", "1");
        assert_eq!(record.get_message(), "ssn=1;");
    }

    #[test]
    fn test_set_message_clears_fields() {
        let mut record = LogRecord::new("user_data", Level::Info, "a").with_field("k", "v");
        record.set_message("b".to_string());
        assert_eq!(record.message, "b");
        assert!(record.fields.is_empty());
        assert_eq!(record.get_message(), "b");
    }
}
