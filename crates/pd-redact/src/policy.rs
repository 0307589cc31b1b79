//! Redaction configuration.
//!
//! Defines which fields are redacted, the marker, and the pair separator.
//! Loadable from JSON so a deployment can extend the field set without a
//! rebuild.

use crate::{FieldFilter, Result, PII_FIELDS, REDACTION, SEPARATOR};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Schema version for the config file.
pub const CONFIG_SCHEMA_VERSION: &str = "1.0.0";

/// Redaction configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedactionConfig {
    /// Schema version.
    #[serde(default = "default_schema_version")]
    pub schema_version: String,

    /// Field names whose values are redacted.
    #[serde(default = "default_fields")]
    pub fields: Vec<String>,

    /// Marker substituted for redacted values.
    #[serde(default = "default_redaction")]
    pub redaction: String,

    /// Pair terminator.
    #[serde(default = "default_separator")]
    pub separator: String,
}

fn default_schema_version() -> String {
    CONFIG_SCHEMA_VERSION.to_string()
}

fn default_fields() -> Vec<String> {
    PII_FIELDS.iter().map(|f| f.to_string()).collect()
}

fn default_redaction() -> String {
    REDACTION.to_string()
}

fn default_separator() -> String {
    SEPARATOR.to_string()
}

impl Default for RedactionConfig {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            fields: default_fields(),
            redaction: default_redaction(),
            separator: default_separator(),
        }
    }
}

impl RedactionConfig {
    /// Config for an explicit field set with the default marker and separator.
    pub fn with_fields<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            fields: fields.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Parse a config from JSON text.
    pub fn from_json(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Load config from a file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Save config to a file.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Compile this config into a [`FieldFilter`].
    pub fn build_filter(&self) -> Result<FieldFilter> {
        FieldFilter::new(&self.fields, &self.redaction, &self.separator)
    }
}
