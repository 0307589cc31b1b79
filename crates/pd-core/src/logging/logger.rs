//! Explicitly constructed loggers.
//!
//! There is no name-keyed registry: a [`Logger`] is an ordinary value that
//! owns its handlers, so independent instances never share state.

use std::io::{self, Write};
use std::sync::Mutex;

use super::config::LogLevel;
use super::formatter::RecordFormatter;
use super::record::{Level, LogRecord};

/// Formats records and writes one line per record to a writer.
pub struct StreamHandler {
    formatter: Box<dyn RecordFormatter>,
    writer: Mutex<Box<dyn Write + Send>>,
}

impl StreamHandler {
    pub fn new<F, W>(formatter: F, writer: W) -> Self
    where
        F: RecordFormatter + 'static,
        W: Write + Send + 'static,
    {
        Self::from_boxed(Box::new(formatter), Box::new(writer))
    }

    /// Handler writing to stderr.
    pub fn stderr<F: RecordFormatter + 'static>(formatter: F) -> Self {
        Self::new(formatter, io::stderr())
    }

    pub fn from_boxed(formatter: Box<dyn RecordFormatter>, writer: Box<dyn Write + Send>) -> Self {
        StreamHandler {
            formatter,
            writer: Mutex::new(writer),
        }
    }

    /// Format `record` and write it out.
    ///
    /// Write failures are dropped; logging never aborts the caller.
    pub fn emit(&self, record: &mut LogRecord) {
        let line = self.formatter.format(record);
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writeln!(writer, "{}", line);
            let _ = writer.flush();
        }
    }
}

impl std::fmt::Debug for StreamHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StreamHandler").finish_non_exhaustive()
    }
}

/// A named logger with a level threshold and a list of handlers.
#[derive(Debug)]
pub struct Logger {
    name: String,
    level: LogLevel,
    handlers: Vec<StreamHandler>,
}

impl Logger {
    /// Create a logger with no handlers.
    pub fn new(name: impl Into<String>, level: LogLevel) -> Self {
        Logger {
            name: name.into(),
            level,
            handlers: Vec::new(),
        }
    }

    pub fn with_handler(mut self, handler: StreamHandler) -> Self {
        self.handlers.push(handler);
        self
    }

    pub fn add_handler(&mut self, handler: StreamHandler) {
        self.handlers.push(handler);
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn level(&self) -> LogLevel {
        self.level
    }

    pub fn set_level(&mut self, level: LogLevel) {
        self.level = level;
    }

    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_enabled(&self, level: Level) -> bool {
        self.level.allows(level)
    }

    /// Log a message at `level`.
    pub fn log(&self, level: Level, message: impl Into<String>) {
        if self.is_enabled(level) {
            self.handle(LogRecord::new(self.name.as_str(), level, message));
        }
    }

    /// Log a message with structured `key=value` fields.
    pub fn log_fields<I, K, V>(&self, level: Level, message: impl Into<String>, fields: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        if !self.is_enabled(level) {
            return;
        }
        let mut record = LogRecord::new(self.name.as_str(), level, message);
        record
            .fields
            .extend(fields.into_iter().map(|(k, v)| (k.into(), v.into())));
        self.handle(record);
    }

    /// Pass `record` through every handler in order and return it.
    ///
    /// Handlers share the record, so later handlers see any rewrite an
    /// earlier formatter made.
    pub fn handle(&self, mut record: LogRecord) -> LogRecord {
        for handler in &self.handlers {
            handler.emit(&mut record);
        }
        record
    }

    pub fn debug(&self, message: impl Into<String>) {
        self.log(Level::Debug, message);
    }

    pub fn info(&self, message: impl Into<String>) {
        self.log(Level::Info, message);
    }

    pub fn warn(&self, message: impl Into<String>) {
        self.log(Level::Warn, message);
    }

    pub fn error(&self, message: impl Into<String>) {
        self.log(Level::Error, message);
    }
}
