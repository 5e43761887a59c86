//! Optional Envoy formatter extensions a configuration needs loaded.
//!
//! Most operators are built into Envoy. A few are provided by formatter
//! extensions which the bootstrap must enable explicitly.

use crate::fields::FieldMap;
use crate::template::tokenize;
use std::collections::BTreeSet;

pub const REQ_WITHOUT_QUERY_EXTENSION: &str = "envoy.formatter.req_without_query";
pub const METADATA_EXTENSION: &str = "envoy.formatter.metadata";

// operator -> extension providing it
const EXTENSION_OPERATORS: &[(&str, &str)] = &[
    ("REQ_WITHOUT_QUERY", REQ_WITHOUT_QUERY_EXTENSION),
    ("METADATA", METADATA_EXTENSION),
];

/// The templates to scan, by access log format kind.
#[derive(Debug, Clone, Copy)]
pub enum FormatSource<'a> {
    /// A single text format string.
    Envoy(&'a str),
    /// Resolved JSON fields; every value is scanned.
    Json(&'a FieldMap),
}

/// Names of the formatter extensions required by `source`.
pub fn required_extensions(source: FormatSource<'_>) -> BTreeSet<String> {
    let mut out = BTreeSet::new();
    match source {
        FormatSource::Envoy(format) => scan(format, &mut out),
        FormatSource::Json(fields) => {
            for template in fields.values() {
                scan(template, &mut out);
            }
        }
    }
    if !out.is_empty() {
        tracing::debug!(extensions = ?out, "formatter extensions required");
    }
    out
}

// Matches whole operator names, so DYNAMIC_METADATA does not count as METADATA.
fn scan(template: &str, out: &mut BTreeSet<String>) {
    for token in tokenize(template) {
        for (operator, extension) in EXTENSION_OPERATORS {
            if token.operator_name == *operator {
                out.insert(extension.to_string());
            }
        }
    }
}
