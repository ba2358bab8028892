//! Validation engine
//!
//! Runs every schema field through its rule pipeline, in declaration order,
//! against a read-only input record. Per-field failures are collected into
//! the returned `ValidationResult`. A broken schema, catalog or hook aborts
//! the run with a `FormError` instead.

mod pipeline;
mod required;
mod result;

pub use result::ValidationResult;

use tracing::{debug, instrument, trace};

use crate::errors::FormResult;
use crate::messages::{resolve_message, MessageSource};
use crate::schema::{lookup, Record, Schema};
use pipeline::{FieldPipeline, Rejection, Verdict};
use result::Accumulator;

/// Validates records against one schema and message source.
///
/// Holds no per-run state; concurrent runs are independent.
#[derive(Debug, Clone, Copy)]
pub struct FormValidator<'a> {
    schema: &'a Schema,
    messages: &'a MessageSource,
}

impl<'a> FormValidator<'a> {
    pub fn new(schema: &'a Schema, messages: &'a MessageSource) -> Self {
        Self { schema, messages }
    }

    /// Validates `data`, never mutating it or the schema.
    #[instrument(skip_all, fields(fields = self.schema.len()))]
    pub async fn validate(&self, data: &Record) -> FormResult<ValidationResult> {
        self.schema.validate_structure()?;

        let mut acc = Accumulator::default();
        for (field, rules) in self.schema.iter() {
            match FieldPipeline::new(field, rules, data).run().await? {
                Verdict::Accept(value) => {
                    trace!(field, kind = value.kind(), value = %value, "field accepted");
                    acc.accept(field, value);
                }
                Verdict::Reject(Rejection { code, literal }) => {
                    let message = resolve_message(rules, code, self.messages, literal)?;
                    debug!(field, kind = lookup(data, field).kind(), code = %code, "field rejected");
                    acc.reject(field, code, message);
                }
            }
        }

        let result = acc.finish();
        debug!(
            errors = result.errors.len(),
            valid = result.is_valid,
            "validation finished"
        );
        Ok(result)
    }
}

/// Validates `data` against `schema`, taking default messages from `messages`.
pub async fn validate(
    schema: &Schema,
    data: &Record,
    messages: &MessageSource,
) -> FormResult<ValidationResult> {
    FormValidator::new(schema, messages).validate(data).await
}
