//! Catalog layer: compiled-in operator and alias tables.
//!
//! Both tables are built once on first use and never mutated afterwards, so
//! lookups are safe from any thread without locking. It owns:
//! - the operator catalog (simple vs. complex operators and their constraints)
//! - the alias table (short JSON field names -> canonical templates)

pub mod aliases;
pub mod operators;

pub use aliases::{is_alias_template, lookup_alias};
pub use operators::{
    OperatorClass, OperatorDefinition, lookup, lookup_complex, lookup_simple, operators,
};
