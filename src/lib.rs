//! formcheck - declarative validation of form records
//!
//! A schema maps field names to rule sets. `validate` runs every field
//! through its rules in declaration order and reports, per field, either
//! one error code with a localized message or the field's final value.
//!
//! ```ignore
//! use formcheck::{validate, MessageSource, Record, Required, RuleSet, Schema};
//!
//! let schema = Schema::new()
//!     .field("email", RuleSet::new().required(true).max_length(120))
//!     .field("age", RuleSet::new().required(Required::default_value(18)));
//! let result = validate(&schema, &data, &MessageSource::default()).await?;
//! ```

pub mod cli;
pub mod config;
pub mod errors;
pub mod messages;
pub mod observability;
pub mod schema;
pub mod validator;

pub use errors::{ErrorCode, FormError, FormResult, HookError, HookResult, HookStage};
pub use messages::{Catalog, Language, MessageSource};
pub use schema::{
    DefaultValue, FieldValue, Predicate, Record, Required, RuleSet, Schema, SchemaLoader,
    Supplier, TestOutcome, Transform,
};
pub use validator::{validate, FormValidator, ValidationResult};
