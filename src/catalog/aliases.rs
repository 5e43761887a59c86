//! Short JSON log field names and the Envoy templates they stand for.
//!
//! Field names missing here can still resolve when they name a simple
//! operator (`bytes_sent` -> `%BYTES_SENT%`); see [`crate::fields`].

use std::collections::BTreeMap;
use std::sync::LazyLock;

const ALIASES: &[(&str, &str)] = &[
    ("@timestamp", "%START_TIME%"),
    ("ts", "%START_TIME%"),
    ("authority", "%REQ(:AUTHORITY)%"),
    ("method", "%REQ(:METHOD)%"),
    ("path", "%REQ(X-ENVOY-ORIGINAL-PATH?:PATH)%"),
    ("request_id", "%REQ(X-REQUEST-ID)%"),
    ("uber_trace_id", "%REQ(UBER-TRACE-ID)%"),
    ("upstream_service_time", "%RESP(X-ENVOY-UPSTREAM-SERVICE-TIME)%"),
    ("user_agent", "%REQ(USER-AGENT)%"),
    ("x_forwarded_for", "%REQ(X-FORWARDED-FOR)%"),
    ("x_trace_id", "%REQ(X-TRACE-ID)%"),
    ("grpc_status", "%GRPC_STATUS%"),
];

static ALIAS_TABLE: LazyLock<BTreeMap<&'static str, &'static str>> =
    LazyLock::new(|| ALIASES.iter().copied().collect());

/// Canonical template for field `name`. Matching is exact.
pub fn lookup_alias(name: &str) -> Option<&'static str> {
    ALIAS_TABLE.get(name).copied()
}

/// Whether `template` is, verbatim, one of the alias templates.
pub fn is_alias_template(template: &str) -> bool {
    ALIAS_TABLE.values().any(|t| *t == template)
}
