//! JSON log field lists.
//!
//! Each entry is either a bare field name (`method`, `grpc_status_number`)
//! or a custom `key=template` pair. Resolution happens first and validation
//! second, so an unknown name only fails once the whole map is checked.

use crate::catalog;
use crate::error::ValidationError;
use crate::validate::validate_operators;
use std::collections::BTreeMap;

/// Field key -> Envoy template, as handed to Envoy's JSON formatter.
pub type FieldMap = BTreeMap<String, String>;

/// How a field entry got its template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldSource {
    /// `key=template`, value taken verbatim.
    Literal,
    /// Bare name found in the alias table.
    Alias,
    /// Bare name that is a simple operator in any case.
    Operator,
    /// Nothing matched; the template is empty.
    Unresolved,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedField {
    pub key: String,
    pub template: String,
    pub source: FieldSource,
}

/// Resolve one field list entry.
///
/// Priority: `key=template` (split on the first `=`), then the alias table,
/// then simple operators (`grpc_status` -> `%GRPC_STATUS%`). An entry
/// matching none of these resolves to an empty template.
pub fn resolve_field(item: &str) -> ResolvedField {
    let (key, template, source) = if let Some((key, value)) = item.split_once('=') {
        (key, value.to_string(), FieldSource::Literal)
    } else if let Some(template) = catalog::lookup_alias(item) {
        (item, template.to_string(), FieldSource::Alias)
    } else {
        let upper = item.to_ascii_uppercase();
        if catalog::lookup_simple(&upper) {
            (item, format!("%{upper}%"), FieldSource::Operator)
        } else {
            (item, String::new(), FieldSource::Unresolved)
        }
    };

    tracing::trace!(key, %template, ?source, "resolved JSON log field");
    ResolvedField {
        key: key.to_string(),
        template,
        source,
    }
}

/// Resolve every entry into a [`FieldMap`]. Later duplicates overwrite
/// earlier ones.
pub fn canonicalize<S: AsRef<str>>(items: &[S]) -> FieldMap {
    items
        .iter()
        .map(|item| resolve_field(item.as_ref()))
        .map(|field| (field.key, field.template))
        .collect()
}

/// Resolve and validate a field list.
pub fn validate<S: AsRef<str>>(items: &[S]) -> Result<(), ValidationError> {
    validate_field_map(&canonicalize(items))
}

/// Validate an already resolved map, stopping at the first bad entry.
pub fn validate_field_map(fields: &FieldMap) -> Result<(), ValidationError> {
    fields
        .iter()
        .try_for_each(|(key, template)| validate_field(key, template))
}

/// Validate one resolved entry. Field values are not subject to the trailing
/// newline rule.
pub fn validate_field(key: &str, template: &str) -> Result<(), ValidationError> {
    if template.is_empty() {
        tracing::debug!(key, "JSON log field did not resolve");
        return Err(ValidationError::InvalidFieldName(key.to_string()));
    }
    if catalog::is_alias_template(template) {
        return Ok(());
    }
    validate_operators(template)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn map(entries: &[(&str, &str)]) -> FieldMap {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn resolves_aliases() {
        assert_eq!(
            canonicalize(&["method"]),
            map(&[("method", "%REQ(:METHOD)%")])
        );
        assert_eq!(resolve_field("@timestamp").source, FieldSource::Alias);
    }

    #[test]
    fn literal_values_are_verbatim() {
        assert_eq!(canonicalize(&["dog=pug"]), map(&[("dog", "pug")]));
        assert_eq!(
            canonicalize(&["method=%REQ(:METHOD)%=x"]),
            map(&[("method", "%REQ(:METHOD)%=x")])
        );
        assert_eq!(validate(&["dog=pug"]), Ok(()));
    }

    #[test]
    fn literal_key_shadows_alias() {
        assert_eq!(
            canonicalize(&["path=%REQ(:PATH)%"]),
            map(&[("path", "%REQ(:PATH)%")])
        );
    }

    #[test]
    fn synthesizes_simple_operators_case_insensitively() {
        assert_eq!(
            canonicalize(&["grpc_status_number", "Bytes_Sent"]),
            map(&[
                ("Bytes_Sent", "%BYTES_SENT%"),
                ("grpc_status_number", "%GRPC_STATUS_NUMBER%"),
            ])
        );
        assert_eq!(validate(&["grpc_status_number"]), Ok(()));
    }

    #[test]
    fn complex_operator_names_do_not_synthesize() {
        let field = resolve_field("req");
        assert_eq!(field.source, FieldSource::Unresolved);
        assert_eq!(field.template, "");
    }

    #[test]
    fn unknown_names_fail_validation() {
        assert_eq!(
            validate(&["method", "dog"]),
            Err(ValidationError::InvalidFieldName("dog".into()))
        );
    }

    #[test]
    fn empty_literal_value_fails() {
        assert_eq!(
            validate(&["dog="]),
            Err(ValidationError::InvalidFieldName("dog".into()))
        );
    }

    #[test]
    fn literal_templates_are_checked() {
        assert_eq!(
            validate(&["pod=%ENVIRONMENT(ENVOY_POD_NAME)%"]),
            Ok(())
        );
        assert_eq!(
            validate(&["when=%START_TIME(%s):3%"]),
            Err(ValidationError::TruncationNotAllowed("START_TIME".into()))
        );
        assert_eq!(
            validate(&["x=%DOG%"]),
            Err(ValidationError::UnknownOperator("DOG".into()))
        );
    }

    #[test]
    fn later_duplicates_win() {
        assert_eq!(canonicalize(&["dog", "dog=pug"]), map(&[("dog", "pug")]));
        assert_eq!(validate(&["dog", "dog=pug"]), Ok(()));
    }

    #[test]
    fn canonicalization_is_idempotent() {
        let first = canonicalize(&["@timestamp", "method", "duration", "dog=pug"]);
        let items: Vec<String> = first.iter().map(|(k, v)| format!("{k}={v}")).collect();
        assert_eq!(canonicalize(&items), first);
    }
}
