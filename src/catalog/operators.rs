//! Envoy access log command operators.
//!
//! Simple operators take no arguments (`%DURATION%`). Complex operators take a
//! parenthesized argument (`%REQ(:METHOD)%`), which may be optional, and may
//! refuse a `:<digits>` truncation suffix.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::LazyLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum OperatorClass {
    Simple,
    Complex,
}

impl fmt::Display for OperatorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Simple => f.write_str("simple"),
            Self::Complex => f.write_str("complex"),
        }
    }
}

/// A recognized operator and the constraints the validator enforces on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OperatorDefinition {
    pub name: &'static str,
    pub class: OperatorClass,
    /// Complex only: the operator may appear without `(...)`.
    pub args_optional: bool,
    /// The operator must not carry a `:<digits>` suffix.
    pub truncate_disallowed: bool,
}

impl OperatorDefinition {
    const fn simple(name: &'static str) -> Self {
        Self {
            name,
            class: OperatorClass::Simple,
            args_optional: false,
            truncate_disallowed: false,
        }
    }

    const fn complex(name: &'static str) -> Self {
        Self {
            name,
            class: OperatorClass::Complex,
            args_optional: false,
            truncate_disallowed: false,
        }
    }

    const fn args_optional(mut self) -> Self {
        self.args_optional = true;
        self
    }

    const fn truncate_disallowed(mut self) -> Self {
        self.truncate_disallowed = true;
        self
    }

    pub fn is_simple(&self) -> bool {
        self.class == OperatorClass::Simple
    }
}

const SIMPLE_OPERATORS: &[&str] = &[
    "BYTES_RECEIVED",
    "BYTES_SENT",
    "CONNECTION_ID",
    "CONNECTION_TERMINATION_DETAILS",
    "DOWNSTREAM_DIRECT_REMOTE_ADDRESS",
    "DOWNSTREAM_DIRECT_REMOTE_ADDRESS_WITHOUT_PORT",
    "DOWNSTREAM_DIRECT_REMOTE_PORT",
    "DOWNSTREAM_LOCAL_ADDRESS",
    "DOWNSTREAM_LOCAL_ADDRESS_WITHOUT_PORT",
    "DOWNSTREAM_LOCAL_DNS_SAN",
    "DOWNSTREAM_LOCAL_PORT",
    "DOWNSTREAM_LOCAL_SUBJECT",
    "DOWNSTREAM_LOCAL_URI_SAN",
    "DOWNSTREAM_PEER_CERT",
    "DOWNSTREAM_PEER_CERT_V_END",
    "DOWNSTREAM_PEER_CERT_V_START",
    "DOWNSTREAM_PEER_DNS_SAN",
    "DOWNSTREAM_PEER_FINGERPRINT_1",
    "DOWNSTREAM_PEER_FINGERPRINT_256",
    "DOWNSTREAM_PEER_ISSUER",
    "DOWNSTREAM_PEER_SERIAL",
    "DOWNSTREAM_PEER_SUBJECT",
    "DOWNSTREAM_PEER_URI_SAN",
    "DOWNSTREAM_REMOTE_ADDRESS",
    "DOWNSTREAM_REMOTE_ADDRESS_WITHOUT_PORT",
    "DOWNSTREAM_REMOTE_PORT",
    "DOWNSTREAM_TLS_CIPHER",
    "DOWNSTREAM_TLS_SESSION_ID",
    "DOWNSTREAM_TLS_VERSION",
    "DURATION",
    "GRPC_STATUS",
    "GRPC_STATUS_NUMBER",
    "HOSTNAME",
    "LOCAL_REPLY_BODY",
    "PROTOCOL",
    "REQUEST_DURATION",
    "REQUEST_TX_DURATION",
    "REQUESTED_SERVER_NAME",
    "RESPONSE_CODE",
    "RESPONSE_CODE_DETAILS",
    "RESPONSE_DURATION",
    "RESPONSE_FLAGS",
    "RESPONSE_TX_DURATION",
    "ROUTE_NAME",
    "UPSTREAM_CLUSTER",
    "UPSTREAM_HOST",
    "UPSTREAM_LOCAL_ADDRESS",
    "UPSTREAM_REMOTE_ADDRESS",
    "UPSTREAM_REQUEST_ATTEMPT_COUNT",
    "UPSTREAM_TRANSPORT_FAILURE_REASON",
    "UPSTREAM_WIRE_BYTES_RECEIVED",
    "UPSTREAM_WIRE_BYTES_SENT",
    "VIRTUAL_CLUSTER_NAME",
];

const COMPLEX_OPERATORS: &[OperatorDefinition] = &[
    OperatorDefinition::complex("CLUSTER_METADATA"),
    OperatorDefinition::complex("DYNAMIC_METADATA"),
    OperatorDefinition::complex("ENVIRONMENT"),
    OperatorDefinition::complex("FILTER_STATE"),
    OperatorDefinition::complex("METADATA"),
    OperatorDefinition::complex("REQ"),
    OperatorDefinition::complex("REQ_WITHOUT_QUERY"),
    OperatorDefinition::complex("RESP"),
    // strftime-style argument; Envoy cannot truncate a timestamp.
    OperatorDefinition::complex("START_TIME")
        .args_optional()
        .truncate_disallowed(),
    OperatorDefinition::complex("TRAILER"),
    OperatorDefinition::complex("UPSTREAM_FILTER_STATE"),
    OperatorDefinition::complex("UPSTREAM_METADATA"),
];

static CATALOG: LazyLock<BTreeMap<&'static str, OperatorDefinition>> = LazyLock::new(|| {
    SIMPLE_OPERATORS
        .iter()
        .map(|name| (*name, OperatorDefinition::simple(*name)))
        .chain(COMPLEX_OPERATORS.iter().map(|op| (op.name, *op)))
        .collect()
});

/// Whether `name` (already uppercase) is a simple operator.
pub fn lookup_simple(name: &str) -> bool {
    CATALOG.get(name).is_some_and(OperatorDefinition::is_simple)
}

/// The definition of complex operator `name` (already uppercase), if any.
pub fn lookup_complex(name: &str) -> Option<OperatorDefinition> {
    CATALOG.get(name).filter(|op| !op.is_simple()).copied()
}

/// The definition of `name` in either catalog.
pub fn lookup(name: &str) -> Option<OperatorDefinition> {
    CATALOG.get(name).copied()
}

/// Every recognized operator, ordered by name.
pub fn operators() -> impl Iterator<Item = OperatorDefinition> {
    CATALOG.values().copied()
}
