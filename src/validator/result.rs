//! Validation result and its accumulator

use std::collections::BTreeMap;

use serde::Serialize;

use crate::errors::ErrorCode;
use crate::schema::FieldValue;

/// Outcome of one validation run.
///
/// Every schema field lands in exactly one of `errors` (with its message in
/// `messages`) or `result`.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: BTreeMap<String, ErrorCode>,
    pub messages: BTreeMap<String, String>,
    pub result: BTreeMap<String, FieldValue>,
}

impl ValidationResult {
    pub fn error(&self, field: &str) -> Option<ErrorCode> {
        self.errors.get(field).copied()
    }

    pub fn message(&self, field: &str) -> Option<&str> {
        self.messages.get(field).map(String::as_str)
    }

    pub fn value(&self, field: &str) -> Option<&FieldValue> {
        self.result.get(field)
    }
}

/// Per-run output maps, filled as each field finishes.
#[derive(Debug, Default)]
pub(crate) struct Accumulator {
    errors: BTreeMap<String, ErrorCode>,
    messages: BTreeMap<String, String>,
    result: BTreeMap<String, FieldValue>,
}

impl Accumulator {
    pub(crate) fn accept(&mut self, field: &str, value: FieldValue) {
        self.result.insert(field.to_string(), value);
    }

    pub(crate) fn reject(&mut self, field: &str, code: ErrorCode, message: String) {
        self.errors.insert(field.to_string(), code);
        self.messages.insert(field.to_string(), message);
    }

    /// Closes the run. Validity is derived here, once.
    pub(crate) fn finish(self) -> ValidationResult {
        ValidationResult {
            is_valid: self.errors.is_empty(),
            errors: self.errors,
            messages: self.messages,
            result: self.result,
        }
    }
}
