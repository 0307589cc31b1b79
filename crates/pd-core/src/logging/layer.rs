//! Tracing layer that routes events through a redacting formatter.
//!
//! Each event becomes a [`LogRecord`] named after the event target. Fields
//! recorded on enclosing spans are interpolated before the event's own
//! fields, so `info_span!("row", email = %email)` is redacted like any
//! message text.

use std::io::{self, Write};
use std::sync::Mutex;

use tracing::span::{Attributes, Id, Record};
use tracing::{Event, Subscriber};
use tracing_subscriber::layer::Context;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::Layer;

use super::formatter::RecordFormatter;
use super::record::LogRecord;

/// Fields recorded on a span, kept in its extensions.
#[derive(Debug, Clone, Default)]
struct SpanFields(Vec<(String, String)>);

/// Collects the message and remaining fields of an event or span.
#[derive(Default)]
struct RecordVisitor {
    message: Option<String>,
    fields: Vec<(String, String)>,
}

impl RecordVisitor {
    fn push(&mut self, name: &str, value: String) {
        if name == "message" {
            self.message = Some(value);
        } else {
            self.fields.push((name.to_string(), value));
        }
    }
}

impl tracing::field::Visit for RecordVisitor {
    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        self.push(field.name(), value.to_string());
    }

    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        self.push(field.name(), format!("{:?}", value));
    }
}

/// Tracing layer writing one redacted line per event.
pub struct RedactingLayer<W = io::Stderr> {
    formatter: Box<dyn RecordFormatter>,
    writer: Mutex<W>,
}

impl RedactingLayer<io::Stderr> {
    /// Layer writing to stderr.
    pub fn stderr(formatter: Box<dyn RecordFormatter>) -> Self {
        RedactingLayer::new(formatter, io::stderr())
    }
}

impl<W: Write> RedactingLayer<W> {
    pub fn new(formatter: Box<dyn RecordFormatter>, writer: W) -> Self {
        RedactingLayer {
            formatter,
            writer: Mutex::new(writer),
        }
    }
}

impl<S, W> Layer<S> for RedactingLayer<W>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    W: Write + Send + 'static,
{
    fn on_new_span(&self, attrs: &Attributes<'_>, id: &Id, ctx: Context<'_, S>) {
        let mut visitor = RecordVisitor::default();
        attrs.record(&mut visitor);

        if let Some(span) = ctx.span(id) {
            span.extensions_mut().insert(SpanFields(visitor.fields));
        }
    }

    fn on_record(&self, id: &Id, values: &Record<'_>, ctx: Context<'_, S>) {
        let mut visitor = RecordVisitor::default();
        values.record(&mut visitor);

        if let Some(span) = ctx.span(id) {
            let mut extensions = span.extensions_mut();
            if let Some(fields) = extensions.get_mut::<SpanFields>() {
                fields.0.extend(visitor.fields);
            } else {
                extensions.insert(SpanFields(visitor.fields));
            }
        }
    }

    fn on_event(&self, event: &Event<'_>, ctx: Context<'_, S>) {
        let mut fields = Vec::new();
        if let Some(scope) = ctx.event_scope(event) {
            for span in scope.from_root() {
                if let Some(span_fields) = span.extensions().get::<SpanFields>() {
                    fields.extend(span_fields.0.iter().cloned());
                }
            }
        }

        let mut visitor = RecordVisitor::default();
        event.record(&mut visitor);
        fields.extend(visitor.fields);

        let metadata = event.metadata();
        let mut record = LogRecord::new(
            metadata.target(),
            (*metadata.level()).into(),
            visitor.message.unwrap_or_default(),
        );
        record.fields = fields;

        let line = self.formatter.format(&mut record);
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writeln!(writer, "{}", line);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::formatter::{JsonFormatter, RedactingFormatter};
    use std::sync::Arc;
    use tracing_subscriber::layer::SubscriberExt;

    struct BufWriter(Arc<Mutex<Vec<u8>>>);

    impl Write for BufWriter {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().write(buf)
        }
        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn capture<F: FnOnce()>(formatter: Box<dyn RecordFormatter>, f: F) -> String {
        let buffer = Arc::new(Mutex::new(Vec::new()));
        let layer = RedactingLayer::new(formatter, BufWriter(buffer.clone()));
        let subscriber = tracing_subscriber::registry().with(layer);

        tracing::subscriber::with_default(subscriber, f);

        let output = buffer.lock().unwrap();
        String::from_utf8_lossy(&output).into_owned()
    }

    #[test]
    fn test_message_redacted() {
        let out = capture(Box::new(RedactingFormatter::pii()), || {
            tracing::info!(target: "user_data", "name=Bob;email=bob@x.com;");
        });
        assert!(out.starts_with("[HOLBERTON] user_data INFO "));
        assert!(out.trim_end().ends_with(": name=***;email=***;"));
    }

    #[test]
    fn test_interpolated_message_redacted() {
        let ssn = "123-45-6789";
        let out = capture(Box::new(RedactingFormatter::pii()), || {
            tracing::warn!(target: "user_data", "ssn={}; phone=555;", ssn);
        });
        assert!(!out.contains(ssn));
        assert!(out.contains(" WARNING "));
        assert!(out.contains("ssn=***; phone=***;"));
    }

    #[test]
    fn test_event_fields_redacted() {
        let out = capture(Box::new(RedactingFormatter::pii()), || {
            tracing::info!(target: "user_data", email = "bob@x.com", attempts = 3, "login");
        });
        assert!(out.contains(": login email=***; attempts=3;"));
    }

    #[test]
    fn test_span_fields_redacted() {
        let out = capture(Box::new(RedactingFormatter::pii()), || {
            let span = tracing::info_span!("row", password = "hunter2");
            let _guard = span.enter();
            tracing::info!(target: "user_data", ip = "10.0.0.1", "fetched");
        });
        assert!(!out.contains("hunter2"));
        assert!(out.contains(": fetched password=***; ip=10.0.0.1;"));
    }

    #[test]
    fn test_span_record_redacted() {
        let out = capture(Box::new(RedactingFormatter::pii()), || {
            let span = tracing::info_span!("row", name = tracing::field::Empty);
            span.record("name", "Bob");
            let _guard = span.enter();
            tracing::info!(target: "user_data", "done");
        });
        assert!(out.contains(": done name=***;"));
    }

    #[test]
    fn test_jsonl_output() {
        let formatter = RedactingFormatter::with_base(["ssn"], JsonFormatter).unwrap();
        let out = capture(Box::new(formatter), || {
            tracing::error!(target: "audit", "ssn=1;");
        });
        let parsed: serde_json::Value = serde_json::from_str(out.trim()).unwrap();
        assert_eq!(parsed["message"], "ssn=***;");
        assert_eq!(parsed["level"], "error");
        assert_eq!(parsed["name"], "audit");
    }

    #[test]
    fn test_one_line_per_event() {
        let out = capture(Box::new(RedactingFormatter::pii()), || {
            tracing::info!(target: "user_data", "a");
            tracing::info!(target: "user_data", "b");
        });
        assert_eq!(out.lines().count(), 2);
    }
}
