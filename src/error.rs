//! Errors returned when an access log configuration is rejected.

use thiserror::Error;

/// Why a format string or JSON field list was rejected.
///
/// These describe authoring mistakes; none of them is retryable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Operator not present in either catalog.
    #[error("invalid access log format: unknown operator {0:?}")]
    UnknownOperator(String),

    /// Complex operator used without its mandatory `(...)` argument.
    #[error("invalid access log format: operator {0:?} requires an argument")]
    MissingRequiredArgument(String),

    /// `:<digits>` suffix on an operator that cannot be truncated.
    #[error("invalid access log format: operator {0:?} does not support truncation")]
    TruncationNotAllowed(String),

    #[error("invalid access log format: must end in newline")]
    MissingTrailingNewline,

    /// JSON field that is neither an alias, a simple operator, nor `key=value`.
    #[error("invalid JSON log field name {0:?}")]
    InvalidFieldName(String),
}

/// A name that does not match any variant of a lowercase keyword enum.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind} {value:?}, expected one of: {expected}")]
pub struct ParseKeywordError {
    pub kind: &'static str,
    pub value: String,
    pub expected: &'static str,
}
