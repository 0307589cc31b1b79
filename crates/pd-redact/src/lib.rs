//! Field-based redaction of structured log messages.
//!
//! Log messages in this workspace follow a loose `key=value<separator>`
//! convention (for example `name=Bob; email=bob@example.com;`). This crate
//! replaces the values of a configured set of sensitive keys with a fixed
//! marker while leaving everything else, including spacing and separators,
//! untouched.
//!
//! # Key Features
//!
//! - **Non-greedy matching**: a value ends at the first following separator.
//! - **Key boundaries**: `name` never matches inside `username=`.
//! - **Idempotent**: redacting an already redacted message is a no-op.
//! - **Compile once**: [`FieldFilter`] builds a single pattern for the whole
//!   field set and is `Send + Sync`, so one instance serves every thread.
//!
//! # Example
//!
//! ```
//! use pd_redact::{filter_datum, FieldFilter, PII_FIELDS, REDACTION, SEPARATOR};
//!
//! let out = filter_datum(["ssn"], "***", "phone=555-1234; ssn=123-45-6789; ", "; ");
//! assert_eq!(out, "phone=555-1234; ssn=***; ");
//!
//! let filter = FieldFilter::new(PII_FIELDS, REDACTION, SEPARATOR).unwrap();
//! assert_eq!(filter.apply("name=Bob;username=root;"), "name=***;username=root;");
//! ```

pub mod error;
pub mod fields;
pub mod filter;
pub mod policy;

pub use error::{RedactionError, Result};
pub use fields::{validate_field_name, PII_FIELDS, REDACTION, SEPARATOR};
pub use filter::{filter_datum, FieldFilter};
pub use policy::{RedactionConfig, CONFIG_SCHEMA_VERSION};
