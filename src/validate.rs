//! Operator validation for Envoy format strings.
//!
//! Two entry points share the per-token rules:
//! - [`validate_format_string`] for a whole text format (also needs a trailing newline)
//! - [`validate_operators`] for a single template, e.g. a JSON field value

use crate::catalog::{self, OperatorClass};
use crate::error::ValidationError;
use crate::template::{Token, tokenize};

/// Validate a complete Envoy text format string.
///
/// An empty string is accepted and means "use the default format". Anything
/// else must pass the operator rules and end in `\n`, otherwise Envoy would
/// write every entry on one line.
pub fn validate_format_string(format: &str) -> Result<(), ValidationError> {
    if format.is_empty() {
        return Ok(());
    }

    validate_operators(format)?;

    if !format.ends_with('\n') {
        tracing::debug!(format, "format string does not end in newline");
        return Err(ValidationError::MissingTrailingNewline);
    }
    Ok(())
}

/// Check every operator in `template`, stopping at the first violation.
pub fn validate_operators(template: &str) -> Result<(), ValidationError> {
    tokenize(template).iter().try_for_each(check_token)
}

/// Check a single token against the catalog.
///
/// Simple operators are accepted whatever arguments or truncation they carry.
pub fn check_token(token: &Token<'_>) -> Result<(), ValidationError> {
    if token.is_literal_percent() {
        return Ok(());
    }

    let name = token.operator_name;
    let Some(op) = catalog::lookup(name) else {
        tracing::debug!(operator = name, token = token.whole_match, "unknown operator");
        return Err(ValidationError::UnknownOperator(name.to_string()));
    };

    if op.class == OperatorClass::Complex {
        if !op.args_optional && !token.has_args() {
            tracing::debug!(operator = name, "missing required argument");
            return Err(ValidationError::MissingRequiredArgument(name.to_string()));
        }
        if op.truncate_disallowed && token.has_truncation() {
            tracing::debug!(operator = name, truncation = token.truncation, "truncation not allowed");
            return Err(ValidationError::TruncationNotAllowed(name.to_string()));
        }
    }

    tracing::trace!(operator = name, class = %op.class, "operator accepted");
    Ok(())
}

/// Every violation in `format`, in order, the trailing newline check last.
///
/// Empty when [`validate_format_string`] would succeed.
pub fn violations(format: &str) -> Vec<ValidationError> {
    let mut out: Vec<ValidationError> = tokenize(format)
        .iter()
        .filter_map(|token| check_token(token).err())
        .collect();

    if !format.is_empty() && !format.ends_with('\n') {
        out.push(ValidationError::MissingTrailingNewline);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::operators;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_and_literal_strings() {
        assert_eq!(validate_format_string(""), Ok(()));
        assert_eq!(validate_format_string("just a string\n"), Ok(()));
        assert_eq!(
            validate_format_string("just a string"),
            Err(ValidationError::MissingTrailingNewline)
        );
    }

    #[test]
    fn every_simple_operator_validates() {
        for op in operators().filter(|op| op.is_simple()) {
            let format = format!("%{}%\n", op.name);
            assert_eq!(validate_format_string(&format), Ok(()), "{format}");
        }
    }

    #[test]
    fn required_arguments() {
        for op in operators().filter(|op| !op.is_simple() && !op.args_optional) {
            assert_eq!(
                validate_operators(&format!("%{}%", op.name)),
                Err(ValidationError::MissingRequiredArgument(op.name.to_string()))
            );
            assert_eq!(validate_operators(&format!("%{}(X):10%", op.name)), Ok(()));
        }
    }

    #[test]
    fn start_time_truncation() {
        assert_eq!(
            validate_format_string("%START_TIME(%s):3%\n"),
            Err(ValidationError::TruncationNotAllowed("START_TIME".into()))
        );
        assert_eq!(
            validate_format_string("%START_TIME:3%\n"),
            Err(ValidationError::TruncationNotAllowed("START_TIME".into()))
        );
        assert_eq!(validate_format_string("%START_TIME(%s)%\n"), Ok(()));
        assert_eq!(validate_format_string("%START_TIME%\n"), Ok(()));
    }

    #[test]
    fn unknown_operator() {
        assert_eq!(
            validate_format_string("%DOG%\n"),
            Err(ValidationError::UnknownOperator("DOG".into()))
        );
    }

    #[test]
    fn operator_errors_win_over_newline() {
        assert_eq!(
            validate_format_string("%DOG%"),
            Err(ValidationError::UnknownOperator("DOG".into()))
        );
    }

    #[test]
    fn simple_operators_are_permissive() {
        assert_eq!(validate_operators("%DURATION(foo):4%"), Ok(()));
    }

    #[test]
    fn literal_percent_is_skipped() {
        assert_eq!(validate_format_string("100%% of %DURATION%\n"), Ok(()));
    }

    #[test]
    fn collects_all_violations() {
        assert_eq!(
            violations("%DOG% %REQ% %START_TIME:1% %DURATION%"),
            vec![
                ValidationError::UnknownOperator("DOG".into()),
                ValidationError::MissingRequiredArgument("REQ".into()),
                ValidationError::TruncationNotAllowed("START_TIME".into()),
                ValidationError::MissingTrailingNewline,
            ]
        );
        assert!(violations("").is_empty());
        assert!(violations("%REQ(:METHOD)%\n").is_empty());
    }
}
