//! Validation and canonicalization of Envoy access log operator templates.
//!
//! Layers, leaves first:
//! - `catalog`: compiled-in operator and alias tables
//! - `template`: tokenizer for `%OPERATOR(args):N%` references
//! - `validate`: per-operator argument and truncation rules
//! - `fields`: JSON field list resolution
//! - `extensions`: optional Envoy formatter extensions a config needs
//! - `config`: the access log configuration tying them together

pub mod catalog;
pub mod config;
pub mod error;
pub mod extensions;
pub mod fields;
pub mod template;
pub mod validate;

pub use config::{AccessLogConfig, AccessLogLevel, DEFAULT_FIELDS, DEFAULT_FORMAT, FormatKind};
pub use error::ValidationError;
pub use extensions::{FormatSource, required_extensions};
pub use fields::{FieldMap, canonicalize};
pub use template::{Token, tokenize};
pub use validate::{validate_format_string, validate_operators, violations};

pub type Result<T> = anyhow::Result<T>;
