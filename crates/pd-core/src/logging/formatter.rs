//! Record formatters.
//!
//! A formatter turns a [`LogRecord`] into one output line. The redacting
//! formatter wraps any other formatter: it rewrites the record's message
//! first and then delegates rendering to the wrapped one.

use pd_redact::{FieldFilter, RedactionConfig, RedactionError, REDACTION, SEPARATOR};
use std::borrow::Cow;
use std::sync::Arc;

use super::record::LogRecord;

/// Tag printed at the start of every template line.
pub const DEFAULT_TAG: &str = "HOLBERTON";

/// `strftime` pattern for template timestamps (millisecond precision).
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S,%3f";

/// Something that renders a record to a single line.
///
/// Takes the record mutably so wrappers can rewrite it before rendering.
pub trait RecordFormatter: Send + Sync {
    fn format(&self, record: &mut LogRecord) -> String;
}

impl<F: RecordFormatter + ?Sized> RecordFormatter for Box<F> {
    fn format(&self, record: &mut LogRecord) -> String {
        (**self).format(record)
    }
}

impl<F: RecordFormatter + ?Sized> RecordFormatter for Arc<F> {
    fn format(&self, record: &mut LogRecord) -> String {
        (**self).format(record)
    }
}

/// Renders `[<tag>] <name> <LEVEL> <YYYY-MM-DD HH:MM:SS,mmm>: <message>`.
///
/// Line breaks in the message are written as `\r` and `\n` escapes so one
/// record is always one line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateFormatter {
    tag: String,
}

impl TemplateFormatter {
    pub fn new(tag: impl Into<String>) -> Self {
        TemplateFormatter { tag: tag.into() }
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }
}

impl Default for TemplateFormatter {
    fn default() -> Self {
        TemplateFormatter::new(DEFAULT_TAG)
    }
}

impl RecordFormatter for TemplateFormatter {
    fn format(&self, record: &mut LogRecord) -> String {
        format!(
            "[{}] {} {} {}: {}",
            self.tag,
            record.name,
            record.level,
            record.timestamp.format(TIMESTAMP_FORMAT),
            escape_line_breaks(&record.get_message())
        )
    }
}

fn escape_line_breaks(message: &str) -> Cow<'_, str> {
    if !message.contains(['\r', '\n']) {
        return Cow::Borrowed(message);
    }
    Cow::Owned(message.replace('\r', "\\r").replace('\n', "\\n"))
}

/// Renders one JSON object per record with `ts`, `level`, `name`, `message`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JsonFormatter;

impl RecordFormatter for JsonFormatter {
    fn format(&self, record: &mut LogRecord) -> String {
        let obj = serde_json::json!({
            "ts": record.timestamp.to_rfc3339(),
            "level": record.level,
            "name": record.name,
            "message": record.get_message(),
        });
        serde_json::to_string(&obj).unwrap_or_default()
    }
}

/// Redacts sensitive field values, then delegates to a base formatter.
///
/// The record's message is replaced by its redacted form before the base
/// formatter runs, so any handler that sees the record afterwards only ever
/// observes redacted text.
#[derive(Debug, Clone)]
pub struct RedactingFormatter<F = TemplateFormatter> {
    filter: FieldFilter,
    base: F,
}

impl RedactingFormatter<TemplateFormatter> {
    /// Redact `fields` and render with the default template.
    pub fn new<I, S>(fields: I) -> Result<Self, RedactionError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::with_base(fields, TemplateFormatter::default())
    }

    /// Redact the PII field set and render with the default template.
    pub fn pii() -> Self {
        Self::from_filter(FieldFilter::pii().clone(), TemplateFormatter::default())
    }
}

impl<F: RecordFormatter> RedactingFormatter<F> {
    /// Redact `fields` with `***` and `;`, rendering through `base`.
    pub fn with_base<I, S>(fields: I, base: F) -> Result<Self, RedactionError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let filter = FieldFilter::new(fields, REDACTION, SEPARATOR)?;
        Ok(Self::from_filter(filter, base))
    }

    /// Build from a redaction config file's contents.
    pub fn from_config(config: &RedactionConfig, base: F) -> Result<Self, RedactionError> {
        Ok(Self::from_filter(config.build_filter()?, base))
    }

    pub fn from_filter(filter: FieldFilter, base: F) -> Self {
        RedactingFormatter { filter, base }
    }

    /// The redacted field names.
    pub fn fields(&self) -> &[String] {
        self.filter.fields()
    }

    pub fn filter(&self) -> &FieldFilter {
        &self.filter
    }

    pub fn base(&self) -> &F {
        &self.base
    }
}

impl<F: RecordFormatter> RecordFormatter for RedactingFormatter<F> {
    fn format(&self, record: &mut LogRecord) -> String {
        let message = record.get_message();
        let redacted = self.filter.apply(&message).into_owned();
        record.set_message(redacted);
        self.base.format(record)
    }
}
