//! The field redactor.
//!
//! [`filter_datum`] is the one-shot form; [`FieldFilter`] compiles the pattern
//! once and is what long-lived formatters hold.

use std::borrow::Cow;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::fields::KEY_CHAR_CLASS;
use crate::{validate_field_name, RedactionError, Result, PII_FIELDS, REDACTION, SEPARATOR};

static PII_FILTER: Lazy<FieldFilter> = Lazy::new(|| {
    FieldFilter::new(PII_FIELDS, REDACTION, SEPARATOR).expect("PII field set is valid")
});

/// Replace the value of every `<field>=<value><separator>` occurrence with
/// `redaction`.
///
/// Values are matched non-greedily, so each one ends at the first separator
/// that follows it. A field only matches at a key boundary: `name` leaves
/// `username=root;` alone. A trailing pair with no terminating separator is
/// not touched.
///
/// This never fails. Empty field names are skipped, and an empty separator
/// or empty field set returns the message unchanged.
pub fn filter_datum<I, S>(fields: I, redaction: &str, message: &str, separator: &str) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let fields: Vec<String> = fields
        .into_iter()
        .map(|f| f.as_ref().to_string())
        .filter(|f| !f.is_empty())
        .collect();

    if fields.is_empty() || separator.is_empty() {
        return message.to_string();
    }

    match FieldFilter::compile(fields, redaction, separator) {
        Ok(filter) => filter.apply(message).into_owned(),
        // Only reachable when the pattern exceeds the regex size limit.
        // Nothing of the original message is emitted in that case.
        Err(_) => redaction.to_string(),
    }
}

/// A compiled redactor for a fixed field set, marker, and separator.
#[derive(Debug, Clone)]
pub struct FieldFilter {
    fields: Vec<String>,
    redaction: String,
    separator: String,
    pattern: Regex,
}

impl FieldFilter {
    /// Build a filter, validating every field name.
    ///
    /// Duplicate names are collapsed. Fails on an empty field set, an empty
    /// separator, a field name that cannot form a `key=` prefix, or a marker
    /// that contains the separator.
    pub fn new<I, S>(fields: I, redaction: &str, separator: &str) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        if separator.is_empty() {
            return Err(RedactionError::InvalidSeparator);
        }
        if redaction.contains(separator) {
            return Err(RedactionError::InvalidRedaction(redaction.to_string()));
        }

        let mut names: Vec<String> = Vec::new();
        for field in fields {
            let field = field.as_ref();
            validate_field_name(field, separator)?;
            if !names.iter().any(|n| n == field) {
                names.push(field.to_string());
            }
        }

        if names.is_empty() {
            return Err(RedactionError::EmptyFieldSet);
        }

        Self::compile(names, redaction, separator)
    }

    /// The shared filter for [`PII_FIELDS`] with the default marker and separator.
    pub fn pii() -> &'static FieldFilter {
        &PII_FILTER
    }

    fn compile(fields: Vec<String>, redaction: &str, separator: &str) -> Result<Self> {
        let keys = fields
            .iter()
            .map(|f| regex::escape(f))
            .collect::<Vec<_>>()
            .join("|");
        let separator_pattern = regex::escape(separator);
        // A key counts at the start of the message, right after a separator,
        // or after any character that cannot be part of a longer key.
        let pattern = Regex::new(&format!(
            "(?s)(?:^|{sep}|[^{class}])(?:{keys})=(?P<value>.*?){sep}",
            sep = separator_pattern,
            class = KEY_CHAR_CLASS,
            keys = keys,
        ))?;

        Ok(Self {
            fields,
            redaction: redaction.to_string(),
            separator: separator.to_string(),
            pattern,
        })
    }

    /// Redact `message`.
    ///
    /// Returns the input borrowed when nothing needed replacing.
    pub fn apply<'a>(&self, message: &'a str) -> Cow<'a, str> {
        let mut out: Option<String> = None;
        let mut copied = 0;
        let mut pos = 0;

        while pos < message.len() {
            let Some(caps) = self.pattern.captures_at(message, pos) else {
                break;
            };
            let Some(value) = caps.name("value") else {
                break;
            };

            if value.as_str() != self.redaction {
                let buf = out.get_or_insert_with(|| String::with_capacity(message.len()));
                buf.push_str(&message[copied..value.start()]);
                buf.push_str(&self.redaction);
                copied = value.end();
            }
            // Resume at the terminating separator so it can open the next key.
            pos = value.end();
        }

        match out {
            None => Cow::Borrowed(message),
            Some(mut buf) => {
                buf.push_str(&message[copied..]);
                Cow::Owned(buf)
            }
        }
    }

    /// Whether `field` is one of the redacted field names.
    pub fn contains(&self, field: &str) -> bool {
        self.fields.iter().any(|f| f == field)
    }

    /// The redacted field names, in configuration order.
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    /// The marker substituted for redacted values.
    pub fn redaction(&self) -> &str {
        &self.redaction
    }

    /// The pair terminator.
    pub fn separator(&self) -> &str {
        &self.separator
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pii() -> &'static FieldFilter {
        FieldFilter::pii()
    }

    #[test]
    fn test_redacts_all_listed_fields() {
        let out = filter_datum(
            ["name", "email", "password"],
            "***",
            "name=Bob;email=bob@x.com;password=hunter2;",
            ";",
        );
        assert_eq!(out, "name=***;email=***;password=***;");
    }

    #[test]
    fn test_preserves_spacing_and_other_fields() {
        let out = filter_datum(["ssn"], "***", "phone=555-1234; ssn=123-45-6789; ", "; ");
        assert_eq!(out, "phone=555-1234; ssn=***; ");
    }

    #[test]
    fn test_non_greedy_value() {
        let out = filter_datum(["name"], "***", "name=Bob;note=a;b;", ";");
        assert_eq!(out, "name=***;note=a;b;");
    }

    #[test]
    fn test_substring_key_not_redacted() {
        let out = filter_datum(["name"], "***", "username=root;name=Bob;", ";");
        assert_eq!(out, "username=root;name=***;");

        let out = filter_datum(["name"], "***", "user_name=root;", ";");
        assert_eq!(out, "user_name=root;");
    }

    #[test]
    fn test_repeated_field() {
        let out = filter_datum(["ssn"], "XX", "ssn=1;ssn=2;ssn=3;", ";");
        assert_eq!(out, "ssn=XX;ssn=XX;ssn=XX;");
    }

    #[test]
    fn test_field_order_irrelevant() {
        let a = filter_datum(["email", "name"], "***", "name=a;email=b;", ";");
        let b = filter_datum(["name", "email"], "***", "name=a;email=b;", ";");
        assert_eq!(a, b);
        assert_eq!(a, "name=***;email=***;");
    }

    #[test]
    fn test_absent_fields_ignored() {
        let msg = "ip=10.0.0.1;user_agent=curl;";
        assert_eq!(filter_datum(PII_FIELDS, "***", msg, ";"), msg);
    }

    #[test]
    fn test_trailing_pair_without_separator_untouched() {
        let out = filter_datum(["email"], "***", "name=Bob;email=bob@x.com", ";");
        assert_eq!(out, "name=Bob;email=bob@x.com");
    }

    #[test]
    fn test_value_with_newline() {
        let out = filter_datum(["password"], "***", "password=hunter\n2;ip=1;", ";");
        assert_eq!(out, "password=***;ip=1;");
    }

    #[test]
    fn test_value_with_crlf() {
        assert_eq!(pii().apply("ssn=123\r\n45;"), "ssn=***;");
        assert_eq!(pii().apply("ip=1;\nname=Bob;"), "ip=1;\nname=***;");
    }

    #[test]
    fn test_adjacent_pairs_after_separator() {
        assert_eq!(pii().apply("name=a;;email=b;"), "name=***;;email=***;");
        assert_eq!(pii().apply("xname=a;name=b;"), "xname=a;name=***;");
        assert_eq!(pii().apply("xname=a name=b;"), "xname=a name=***;");
    }

    #[test]
    fn test_many_key_suffixes_stay_fast() {
        let msg = format!("{}x;", "xname=".repeat(16 * 1024));
        let start = std::time::Instant::now();
        let out = pii().apply(&msg);
        assert_eq!(out, msg);
        assert!(
            start.elapsed() < std::time::Duration::from_secs(5),
            "took {:?}",
            start.elapsed()
        );
    }

    #[test]
    fn test_many_pairs_stay_fast() {
        let msg = "name=Bob;ip=1;".repeat(8 * 1024);
        let start = std::time::Instant::now();
        let out = pii().apply(&msg);
        assert_eq!(out, "name=***;ip=1;".repeat(8 * 1024));
        assert!(start.elapsed() < std::time::Duration::from_secs(5));
    }

    #[test]
    fn test_empty_value() {
        let out = filter_datum(["password"], "***", "password=;ip=1;", ";");
        assert_eq!(out, "password=***;ip=1;");
    }

    #[test]
    fn test_empty_inputs_passthrough() {
        assert_eq!(filter_datum(Vec::<String>::new(), "***", "name=a;", ";"), "name=a;");
        assert_eq!(filter_datum([""], "***", "name=a;", ";"), "name=a;");
        assert_eq!(filter_datum(["name"], "***", "name=a;", ""), "name=a;");
        assert_eq!(filter_datum(["name"], "***", "", ";"), "");
    }

    #[test]
    fn test_regex_metacharacters_escaped() {
        let out = filter_datum(["a.b"], "***", "a.b=1|axb=2|", "|");
        assert_eq!(out, "a.b=***|axb=2|");
    }

    #[test]
    fn test_idempotent() {
        let msg = "name=Bob; email=bob@x.com; phone=555; ssn=1; password=pw; ip=1.2.3.4;";
        let once = pii().apply(msg).into_owned();
        let twice = pii().apply(&once).into_owned();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_unchanged_is_borrowed() {
        assert!(matches!(pii().apply("hello world"), Cow::Borrowed(_)));
        assert!(matches!(pii().apply("name=***;"), Cow::Borrowed(_)));
        assert!(matches!(pii().apply("name=Bob;"), Cow::Owned(_)));
    }

    #[test]
    fn test_multibyte_text() {
        let out = pii().apply("név=Ádám;name=Zoë;émail=x;");
        assert_eq!(out, "név=Ádám;name=***;émail=x;");
    }

    #[test]
    fn test_new_rejects_empty_set() {
        let err = FieldFilter::new(Vec::<&str>::new(), REDACTION, SEPARATOR).unwrap_err();
        assert!(matches!(err, RedactionError::EmptyFieldSet));
    }

    #[test]
    fn test_new_rejects_bad_name() {
        let err = FieldFilter::new(["name", ""], REDACTION, SEPARATOR).unwrap_err();
        assert!(matches!(err, RedactionError::InvalidFieldName(_)));
    }

    #[test]
    fn test_new_rejects_empty_separator() {
        let err = FieldFilter::new(["name"], REDACTION, "").unwrap_err();
        assert!(matches!(err, RedactionError::InvalidSeparator));
    }

    #[test]
    fn test_new_rejects_marker_with_separator() {
        let err = FieldFilter::new(["name"], "a;b", ";").unwrap_err();
        assert!(matches!(err, RedactionError::InvalidRedaction(ref m) if m == "a;b"));
        assert!(FieldFilter::new(["name"], "a;b", "|").is_ok());
    }

    #[test]
    fn test_custom_marker_idempotent() {
        let filter = FieldFilter::new(["name"], "[gone]", ";").unwrap();
        let once = filter.apply("name=Bob;").into_owned();
        assert_eq!(once, "name=[gone];");
        assert_eq!(filter.apply(&once), once);
    }

    #[test]
    fn test_new_dedupes() {
        let filter = FieldFilter::new(["ssn", "ssn", "email"], REDACTION, SEPARATOR).unwrap();
        assert_eq!(filter.fields(), &["ssn".to_string(), "email".to_string()]);
        assert!(filter.contains("email"));
        assert!(!filter.contains("name"));
    }

    #[test]
    fn test_accessors() {
        let filter = pii();
        assert_eq!(filter.redaction(), REDACTION);
        assert_eq!(filter.separator(), SEPARATOR);
        assert_eq!(filter.fields().len(), PII_FIELDS.len());
    }

    #[test]
    fn test_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<FieldFilter>();
    }
}
