//! Required-policy resolution
//!
//! Consulted only when the normalized value is empty. A non-empty value
//! always proceeds, whatever the directive says.

use crate::errors::{FormError, FormResult, HookStage};
use crate::schema::{lookup, DefaultValue, FieldValue, Record, Required};

/// What the pipeline does next for an empty (or non-empty) value.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum RequiredOutcome {
    /// Continue with the remaining steps
    Proceed,
    /// Stop with `required`
    Missing,
    /// Commit this value and skip every remaining step
    Defaulted(FieldValue),
}

pub(crate) async fn resolve_required(
    field: &str,
    required: &Required,
    value: &FieldValue,
    data: &Record,
) -> FormResult<RequiredOutcome> {
    if !value.is_empty() {
        return Ok(RequiredOutcome::Proceed);
    }

    match required {
        Required::Unconditional(false) => Ok(RequiredOutcome::Proceed),
        Required::Unconditional(true) => Ok(RequiredOutcome::Missing),
        Required::Defaulted(DefaultValue::Literal(default)) => {
            Ok(RequiredOutcome::Defaulted(default.clone()))
        }
        Required::Defaulted(DefaultValue::Supplier(supplier)) => supplier
            .supply()
            .await
            .map(RequiredOutcome::Defaulted)
            .map_err(|e| FormError::hook(field, HookStage::Default, e)),
        Required::Conditional {
            if_filled,
            if_not_filled,
        } => {
            // Reads the raw input record, never transformed output.
            if if_filled.iter().any(|other| !lookup(data, other).is_empty()) {
                return Ok(RequiredOutcome::Missing);
            }
            if if_not_filled.iter().any(|other| lookup(data, other).is_empty()) {
                return Ok(RequiredOutcome::Missing);
            }
            Ok(RequiredOutcome::Proceed)
        }
    }
}
