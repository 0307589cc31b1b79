//! Sensitive field names and the fixed redaction tokens.

use crate::{RedactionError, Result};

/// Fields treated as personally identifiable information.
pub const PII_FIELDS: [&str; 5] = ["name", "email", "phone", "ssn", "password"];

/// Marker substituted for a redacted value.
pub const REDACTION: &str = "***";

/// Terminator of one `key=value` pair.
pub const SEPARATOR: &str = ";";

/// Check that `name` can be used as a `key=` prefix with `separator`.
///
/// A field name must be non-empty and must not contain `=`, whitespace, or
/// the separator itself.
pub fn validate_field_name(name: &str, separator: &str) -> Result<()> {
    let invalid = name.is_empty()
        || name.contains('=')
        || name.chars().any(char::is_whitespace)
        || (!separator.is_empty() && name.contains(separator));

    if invalid {
        return Err(RedactionError::InvalidFieldName(name.to_string()));
    }
    Ok(())
}

/// Regex class body for characters that may form part of a key. A field
/// match preceded by one of these is a suffix of a longer key and does not
/// count.
pub(crate) const KEY_CHAR_CLASS: &str = r"\p{Alphabetic}\p{N}_.\-";
