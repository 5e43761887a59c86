//! Access log configuration, as read from the controller's config file.
//!
//! JSON shape:
//! {
//!   "format": "json",                         // "envoy" (default) or "json"
//!   "formatString": "%REQ(:METHOD)%\n",        // envoy only, "" => DEFAULT_FORMAT
//!   "jsonFields": ["@timestamp", "dog=pug"],  // json only, defaults to DEFAULT_FIELDS
//!   "level": "info"                           // info | error | critical | disabled
//! }

use crate::Result;
use crate::error::{ParseKeywordError, ValidationError};
use crate::extensions::{self, FormatSource};
use crate::fields::{self, FieldMap};
use crate::validate::validate_format_string;

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::fs;
use std::str::FromStr;

/// Envoy's stock text access log format.
pub const DEFAULT_FORMAT: &str = concat!(
    r#"[%START_TIME%] "%REQ(:METHOD)% %REQ(X-ENVOY-ORIGINAL-PATH?:PATH)% %PROTOCOL%" "#,
    r#"%RESPONSE_CODE% %RESPONSE_FLAGS% %BYTES_RECEIVED% %BYTES_SENT% %DURATION% "#,
    r#"%RESP(X-ENVOY-UPSTREAM-SERVICE-TIME)% "%REQ(X-FORWARDED-FOR)%" "%REQ(USER-AGENT)%" "#,
    r#""%REQ(X-REQUEST-ID)%" "%REQ(:AUTHORITY)%" "%UPSTREAM_HOST%""#,
    "\n",
);

/// Fields logged when a JSON access log does not list its own.
pub const DEFAULT_FIELDS: &[&str] = &[
    "@timestamp",
    "authority",
    "bytes_received",
    "bytes_sent",
    "downstream_local_address",
    "downstream_remote_address",
    "duration",
    "method",
    "path",
    "protocol",
    "request_id",
    "requested_server_name",
    "response_code",
    "response_flags",
    "uber_trace_id",
    "upstream_cluster",
    "upstream_host",
    "upstream_local_address",
    "upstream_service_time",
    "user_agent",
    "x_forwarded_for",
    "grpc_status",
    "grpc_status_number",
];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FormatKind {
    /// Text lines built from `formatString`.
    #[default]
    Envoy,
    /// JSON objects built from `jsonFields`.
    Json,
}

impl FormatKind {
    fn as_str(&self) -> &'static str {
        match self {
            Self::Envoy => "envoy",
            Self::Json => "json",
        }
    }
}

impl fmt::Display for FormatKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FormatKind {
    type Err = ParseKeywordError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "envoy" => Ok(Self::Envoy),
            "json" => Ok(Self::Json),
            _ => Err(ParseKeywordError {
                kind: "access log format",
                value: s.to_string(),
                expected: "envoy, json",
            }),
        }
    }
}

/// Which requests get logged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessLogLevel {
    /// Every request.
    #[default]
    Info,
    /// Responses with a 5xx or 4xx code.
    Error,
    /// Responses with a 5xx code.
    Critical,
    Disabled,
}

impl AccessLogLevel {
    fn as_str(&self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Error => "error",
            Self::Critical => "critical",
            Self::Disabled => "disabled",
        }
    }
}

impl fmt::Display for AccessLogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AccessLogLevel {
    type Err = ParseKeywordError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "info" => Ok(Self::Info),
            "error" => Ok(Self::Error),
            "critical" => Ok(Self::Critical),
            "disabled" => Ok(Self::Disabled),
            _ => Err(ParseKeywordError {
                kind: "access log level",
                value: s.to_string(),
                expected: "info, error, critical, disabled",
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct AccessLogConfig {
    #[serde(default)]
    pub format: FormatKind,

    #[serde(default)]
    pub format_string: String,

    #[serde(default = "default_json_fields")]
    pub json_fields: Vec<String>,

    #[serde(default)]
    pub level: AccessLogLevel,
}

fn default_json_fields() -> Vec<String> {
    DEFAULT_FIELDS.iter().map(|s| s.to_string()).collect()
}

impl Default for AccessLogConfig {
    fn default() -> Self {
        Self {
            format: FormatKind::default(),
            format_string: String::new(),
            json_fields: default_json_fields(),
            level: AccessLogLevel::default(),
        }
    }
}

impl AccessLogConfig {
    /// Read and parse a JSON config file. The result is not validated yet.
    pub fn from_json_file(path: &str) -> Result<Self> {
        let text =
            fs::read_to_string(path).with_context(|| format!("read config file {}", path))?;
        let config: Self = serde_json::from_str(&text)
            .with_context(|| format!("parse access log config {}", path))?;
        tracing::debug!(path, format = %config.format, level = %config.level, "loaded access log config");
        Ok(config)
    }

    /// Validate the format string and the JSON field list; the first error wins.
    pub fn validate(&self) -> std::result::Result<(), ValidationError> {
        validate_format_string(&self.format_string)?;
        fields::validate(&self.json_fields)
    }

    /// The format string Envoy will use.
    pub fn effective_format_string(&self) -> &str {
        if self.format_string.is_empty() {
            DEFAULT_FORMAT
        } else {
            &self.format_string
        }
    }

    pub fn field_map(&self) -> FieldMap {
        fields::canonicalize(&self.json_fields)
    }

    /// Formatter extensions needed by whichever format is active.
    pub fn required_extensions(&self) -> BTreeSet<String> {
        match self.format {
            FormatKind::Envoy => extensions::required_extensions(FormatSource::Envoy(
                self.effective_format_string(),
            )),
            FormatKind::Json => {
                let fields = self.field_map();
                extensions::required_extensions(FormatSource::Json(&fields))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn defaults_are_valid() {
        let config = AccessLogConfig::default();
        assert_eq!(config.validate(), Ok(()));
        assert_eq!(validate_format_string(DEFAULT_FORMAT), Ok(()));
        assert_eq!(config.effective_format_string(), DEFAULT_FORMAT);
        assert!(config.required_extensions().is_empty());
    }

    #[test]
    fn every_default_field_resolves() {
        let fields = AccessLogConfig::default().field_map();
        assert_eq!(fields.len(), DEFAULT_FIELDS.len());
        assert!(fields.values().all(|t| !t.is_empty()));
    }

    #[test]
    fn deserialize_with_defaults() {
        let config: AccessLogConfig = serde_json::from_str(r#"{"format": "json"}"#).unwrap();
        assert_eq!(config.format, FormatKind::Json);
        assert_eq!(config.level, AccessLogLevel::Info);
        assert_eq!(config.json_fields, default_json_fields());
    }

    #[test]
    fn deserialize_full() {
        let config: AccessLogConfig = serde_json::from_str(
            r#"{
                "format": "envoy",
                "formatString": "%REQ_WITHOUT_QUERY(:PATH)%\n",
                "jsonFields": ["method"],
                "level": "critical"
            }"#,
        )
        .unwrap();
        assert_eq!(config.level, AccessLogLevel::Critical);
        assert_eq!(config.validate(), Ok(()));
        assert_eq!(
            config.required_extensions(),
            BTreeSet::from([extensions::REQ_WITHOUT_QUERY_EXTENSION.to_string()])
        );
    }

    #[test]
    fn rejects_unknown_keywords() {
        assert!(serde_json::from_str::<AccessLogConfig>(r#"{"format": "xml"}"#).is_err());
        assert!(serde_json::from_str::<AccessLogConfig>(r#"{"level": "debug"}"#).is_err());
        assert!(serde_json::from_str::<AccessLogConfig>(r#"{"colour": "red"}"#).is_err());
    }

    #[test]
    fn json_extensions_come_from_fields() {
        let config = AccessLogConfig {
            format: FormatKind::Json,
            format_string: "%REQ_WITHOUT_QUERY(:PATH)%\n".into(),
            json_fields: vec!["meta=%METADATA(ROUTE:ns:key)%".into()],
            ..Default::default()
        };
        assert_eq!(
            config.required_extensions(),
            BTreeSet::from([extensions::METADATA_EXTENSION.to_string()])
        );
    }

    #[test]
    fn field_errors_are_reported() {
        let config = AccessLogConfig {
            json_fields: vec!["method".into(), "dog".into()],
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err(ValidationError::InvalidFieldName("dog".into()))
        );
    }

    #[test]
    fn keywords_parse_from_str() {
        assert_eq!("json".parse::<FormatKind>(), Ok(FormatKind::Json));
        assert_eq!("disabled".parse::<AccessLogLevel>(), Ok(AccessLogLevel::Disabled));
        let err = "Info".parse::<AccessLogLevel>().unwrap_err();
        assert_eq!(
            err.to_string(),
            r#"unknown access log level "Info", expected one of: info, error, critical, disabled"#
        );
    }
}
