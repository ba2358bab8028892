//! Error types for formcheck
//!
//! Two classes of failure exist and they never mix:
//! - `ErrorCode`: a field failed one of its rules. Expected, data-driven,
//!   reported inside `ValidationResult`.
//! - `FormError`: the schema, catalog or a hook is broken. Unexpected,
//!   aborts the whole invocation.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Reason a single field failed validation.
///
/// Exactly one code is recorded per failing field: the first rule that
/// fails in evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ErrorCode {
    /// Empty value for a required field
    Required,
    /// Below the numeric minimum, or not a number
    Min,
    /// Above the numeric maximum, or not a number
    Max,
    /// Trimmed text shorter than allowed
    MinLength,
    /// Trimmed text longer than allowed
    MaxLength,
    /// Differs from the referenced field's raw input
    Equal,
    /// Falsy value for an acceptance field
    Checked,
    /// A pattern did not match
    Regexp,
    /// A custom predicate rejected the value
    Test,
}

impl ErrorCode {
    /// All codes, in catalog order.
    pub const ALL: [ErrorCode; 9] = [
        ErrorCode::Required,
        ErrorCode::Min,
        ErrorCode::Max,
        ErrorCode::MinLength,
        ErrorCode::MaxLength,
        ErrorCode::Equal,
        ErrorCode::Regexp,
        ErrorCode::Test,
        ErrorCode::Checked,
    ];

    /// Returns the wire name of the code
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::Required => "required",
            ErrorCode::Min => "min",
            ErrorCode::Max => "max",
            ErrorCode::MinLength => "minLength",
            ErrorCode::MaxLength => "maxLength",
            ErrorCode::Equal => "equal",
            ErrorCode::Checked => "checked",
            ErrorCode::Regexp => "regexp",
            ErrorCode::Test => "test",
        }
    }

    /// Position of this code inside `ALL`, used to index message tables.
    pub(crate) fn index(&self) -> usize {
        match self {
            ErrorCode::Required => 0,
            ErrorCode::Min => 1,
            ErrorCode::Max => 2,
            ErrorCode::MinLength => 3,
            ErrorCode::MaxLength => 4,
            ErrorCode::Equal => 5,
            ErrorCode::Regexp => 6,
            ErrorCode::Test => 7,
            ErrorCode::Checked => 8,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ErrorCode {
    type Err = FormError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ErrorCode::ALL
            .iter()
            .copied()
            .find(|code| code.as_str() == s)
            .ok_or_else(|| FormError::UnknownErrorCode(s.to_string()))
    }
}

/// Stage of the field pipeline a hook belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookStage {
    /// Default-value supplier of a `required` directive
    Default,
    /// Transform applied before the checks
    OnBefore,
    /// Custom predicate
    Test,
    /// Transform applied after the checks
    OnAfter,
}

impl fmt::Display for HookStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            HookStage::Default => "default",
            HookStage::OnBefore => "onBefore",
            HookStage::Test => "test",
            HookStage::OnAfter => "onAfter",
        };
        f.write_str(name)
    }
}

/// Failure reported by a caller-supplied transform, predicate or supplier.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct HookError {
    message: String,
}

impl HookError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Result type for hooks
pub type HookResult<T> = Result<T, HookError>;

/// Configuration or runtime error. Never used for validation failures.
#[derive(Debug, Error)]
pub enum FormError {
    #[error("unknown language tag '{0}'")]
    UnknownLanguage(String),

    #[error("unknown error code '{0}'")]
    UnknownErrorCode(String),

    #[error("message catalog has no entry for '{0}'")]
    MissingCatalogEntry(ErrorCode),

    #[error("malformed rules for field '{field}': {reason}")]
    MalformedRule { field: String, reason: String },

    #[error("field '{0}' is declared more than once")]
    DuplicateField(String),

    #[error("invalid pattern for field '{field}': {source}")]
    InvalidPattern {
        field: String,
        #[source]
        source: regex::Error,
    },

    #[error("unsupported value for field '{field}': {reason}")]
    UnsupportedValue { field: String, reason: String },

    #[error("{stage} hook failed for field '{field}': {source}")]
    Hook {
        field: String,
        stage: HookStage,
        #[source]
        source: HookError,
    },
}

impl FormError {
    /// Stable machine-readable code
    pub fn code(&self) -> &'static str {
        match self {
            FormError::UnknownLanguage(_) => "FORM_UNKNOWN_LANGUAGE",
            FormError::UnknownErrorCode(_) => "FORM_UNKNOWN_ERROR_CODE",
            FormError::MissingCatalogEntry(_) => "FORM_MISSING_CATALOG_ENTRY",
            FormError::MalformedRule { .. } => "FORM_MALFORMED_RULE",
            FormError::DuplicateField(_) => "FORM_DUPLICATE_FIELD",
            FormError::InvalidPattern { .. } => "FORM_INVALID_PATTERN",
            FormError::UnsupportedValue { .. } => "FORM_UNSUPPORTED_VALUE",
            FormError::Hook { .. } => "FORM_HOOK_FAILED",
        }
    }

    pub(crate) fn malformed(field: impl Into<String>, reason: impl Into<String>) -> Self {
        FormError::MalformedRule {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn hook(field: impl Into<String>, stage: HookStage, source: HookError) -> Self {
        FormError::Hook {
            field: field.into(),
            stage,
            source,
        }
    }
}

/// Result type for formcheck operations
pub type FormResult<T> = Result<T, FormError>;
