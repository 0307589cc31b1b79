//! User rows and their rendering into log messages.
//!
//! A row carries the eight columns of the users table. Rows arrive from any
//! source (the CLI reads them as JSON lines) and are logged as
//! `name=...; email=...; ...; user_agent=...;`.

use std::io::{BufRead, Lines};

use pd_redact::SEPARATOR;
use serde::{Deserialize, Serialize};

use crate::logging::Logger;
use crate::{LogError, Result};

/// Column names, in rendering order.
pub const USER_FIELDS: [&str; 8] = [
    "name",
    "email",
    "phone",
    "ssn",
    "password",
    "ip",
    "last_login",
    "user_agent",
];

/// One row of the users table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRow {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub ssn: String,
    pub password: String,
    pub ip: String,
    pub last_login: String,
    pub user_agent: String,
}

impl UserRow {
    /// Column values in [`USER_FIELDS`] order.
    pub fn values(&self) -> [&str; 8] {
        [
            self.name.as_str(),
            self.email.as_str(),
            self.phone.as_str(),
            self.ssn.as_str(),
            self.password.as_str(),
            self.ip.as_str(),
            self.last_login.as_str(),
            self.user_agent.as_str(),
        ]
    }

    /// Render as `key=value;` pairs joined by a space.
    pub fn to_message(&self) -> String {
        USER_FIELDS
            .iter()
            .zip(self.values())
            .map(|(key, value)| format!("{}={}{}", key, value, SEPARATOR))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Reads one JSON-encoded [`UserRow`] per line. Blank lines are skipped.
pub struct JsonRowReader<R> {
    lines: Lines<R>,
    line: usize,
}

impl<R: BufRead> JsonRowReader<R> {
    pub fn new(reader: R) -> Self {
        JsonRowReader {
            lines: reader.lines(),
            line: 0,
        }
    }
}

impl<R: BufRead> Iterator for JsonRowReader<R> {
    type Item = Result<UserRow>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let text = match self.lines.next()? {
                Ok(text) => text,
                Err(e) => return Some(Err(LogError::Io(e))),
            };
            self.line += 1;

            if text.trim().is_empty() {
                continue;
            }

            return Some(
                serde_json::from_str(&text).map_err(|source| LogError::Row {
                    line: self.line,
                    source,
                }),
            );
        }
    }
}

/// Log every row at INFO. Returns how many rows were logged.
pub fn log_rows<I>(logger: &Logger, rows: I) -> usize
where
    I: IntoIterator<Item = UserRow>,
{
    let mut count = 0;
    for row in rows {
        logger.info(row.to_message());
        count += 1;
    }
    tracing::debug!(target: "pd_core::rows", count, "rows logged");
    count
}
