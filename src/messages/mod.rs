//! Validation messages
//!
//! Localized default messages for the nine error codes, caller catalogs,
//! and the precedence rules that pick the final string for a failed field.

mod catalog;
mod resolver;

pub use catalog::{Catalog, Language, MessageSource};
pub use resolver::resolve_message;
