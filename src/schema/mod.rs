//! Schema subsystem for formcheck
//!
//! Describes what a record must look like: the field values it carries, the
//! per-field rule sets, and the caller-supplied hooks that run inside them.
//!
//! # Design Principles
//!
//! - Rule sets are immutable during a run
//! - Declaration order is evaluation order
//! - Single-or-list members are normalized to ordered lists at the boundary
//! - Sync and async hooks share one awaitable signature

mod hooks;
mod loader;
mod types;
mod value;

pub use hooks::{Predicate, Supplier, TestOutcome, Transform};
pub use loader::{record_from_json, SchemaLoader};
pub use types::{DefaultValue, Required, RuleSet, Schema};
pub use value::{format_number, lookup, parse_leading_float, FieldValue, Record};
