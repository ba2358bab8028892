//! Rule sets and schemas
//!
//! A schema is an ordered list of (field, rule set) pairs. Declaration order
//! drives evaluation order. Rule sets are immutable once handed to the
//! validator.

use std::collections::{BTreeMap, HashSet};

use regex::Regex;

use super::hooks::{Predicate, Supplier, Transform};
use super::value::FieldValue;
use crate::errors::{ErrorCode, FormError, FormResult};

/// Value committed for an empty field under a `default` directive.
#[derive(Debug, Clone)]
pub enum DefaultValue {
    /// Used as-is
    Literal(FieldValue),
    /// Invoked (and awaited) once per run
    Supplier(Supplier),
}

/// The `required` directive.
#[derive(Debug, Clone)]
pub enum Required {
    /// `true` rejects an empty value, `false` accepts it
    Unconditional(bool),
    /// An empty value is replaced by the default and the field is done
    Defaulted(DefaultValue),
    /// An empty value is rejected when any `if_filled` field has a value,
    /// or when any `if_not_filled` field is empty
    Conditional {
        if_filled: Vec<String>,
        if_not_filled: Vec<String>,
    },
}

impl Default for Required {
    fn default() -> Self {
        Required::Unconditional(false)
    }
}

impl From<bool> for Required {
    fn from(required: bool) -> Self {
        Required::Unconditional(required)
    }
}

impl Required {
    /// Empty input becomes `value`.
    pub fn default_value(value: impl Into<FieldValue>) -> Self {
        Required::Defaulted(DefaultValue::Literal(value.into()))
    }

    /// Empty input becomes whatever `supplier` produces.
    pub fn default_with(supplier: Supplier) -> Self {
        Required::Defaulted(DefaultValue::Supplier(supplier))
    }

    /// Required whenever any of `fields` is filled.
    pub fn if_filled<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Required::Conditional {
            if_filled: fields.into_iter().map(Into::into).collect(),
            if_not_filled: Vec::new(),
        }
    }

    /// Required whenever any of `fields` is empty.
    pub fn if_not_filled<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Required::Conditional {
            if_filled: Vec::new(),
            if_not_filled: fields.into_iter().map(Into::into).collect(),
        }
    }

    /// Adds `ifNotFilled` references to a conditional directive.
    ///
    /// Any other directive is turned into a conditional one.
    pub fn and_if_not_filled<I, S>(self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let extra = fields.into_iter().map(Into::into);
        match self {
            Required::Conditional {
                if_filled,
                mut if_not_filled,
            } => {
                if_not_filled.extend(extra);
                Required::Conditional {
                    if_filled,
                    if_not_filled,
                }
            }
            _ => Required::Conditional {
                if_filled: Vec::new(),
                if_not_filled: extra.collect(),
            },
        }
    }
}

/// Checks and transforms for one field.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    pub required: Required,
    /// Inclusive numeric lower bound
    pub min: Option<f64>,
    /// Inclusive numeric upper bound
    pub max: Option<f64>,
    /// Inclusive lower bound on trimmed character count
    pub min_length: Option<usize>,
    /// Inclusive upper bound on trimmed character count
    pub max_length: Option<usize>,
    /// Field whose raw input must strictly equal this value
    pub equal: Option<String>,
    /// Patterns that must all match the trimmed text
    pub regexp: Vec<Regex>,
    /// Value must be truthy
    pub checked: bool,
    pub test: Vec<Predicate>,
    pub on_before: Vec<Transform>,
    pub on_after: Vec<Transform>,
    /// Keep surrounding whitespace on text values
    pub untrimmed: bool,
    /// Per-code message overrides
    pub messages: BTreeMap<ErrorCode, String>,
}

impl RuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn required(mut self, required: impl Into<Required>) -> Self {
        self.required = required.into();
        self
    }

    pub fn min(mut self, min: f64) -> Self {
        self.min = Some(min);
        self
    }

    pub fn max(mut self, max: f64) -> Self {
        self.max = Some(max);
        self
    }

    pub fn min_length(mut self, len: usize) -> Self {
        self.min_length = Some(len);
        self
    }

    pub fn max_length(mut self, len: usize) -> Self {
        self.max_length = Some(len);
        self
    }

    pub fn equal(mut self, field: impl Into<String>) -> Self {
        self.equal = Some(field.into());
        self
    }

    /// Appends a pattern. Patterns are tested in the order added.
    pub fn regexp(mut self, pattern: Regex) -> Self {
        self.regexp.push(pattern);
        self
    }

    pub fn checked(mut self, checked: bool) -> Self {
        self.checked = checked;
        self
    }

    /// Appends a predicate. Predicates run in the order added.
    pub fn test(mut self, predicate: Predicate) -> Self {
        self.test.push(predicate);
        self
    }

    /// Appends a transform run before the checks.
    pub fn on_before(mut self, transform: Transform) -> Self {
        self.on_before.push(transform);
        self
    }

    /// Appends a transform run after the checks pass.
    pub fn on_after(mut self, transform: Transform) -> Self {
        self.on_after.push(transform);
        self
    }

    pub fn untrimmed(mut self, untrimmed: bool) -> Self {
        self.untrimmed = untrimmed;
        self
    }

    /// Overrides the message for one error code.
    pub fn message(mut self, code: ErrorCode, message: impl Into<String>) -> Self {
        self.messages.insert(code, message.into());
        self
    }
}

/// Ordered mapping from field name to rule set.
#[derive(Debug, Clone, Default)]
pub struct Schema {
    fields: Vec<(String, RuleSet)>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a field declaration (builder form).
    pub fn field(mut self, name: impl Into<String>, rules: RuleSet) -> Self {
        self.fields.push((name.into(), rules));
        self
    }

    /// Appends a field declaration, rejecting a name already declared.
    pub fn insert(&mut self, name: impl Into<String>, rules: RuleSet) -> FormResult<()> {
        let name = name.into();
        if self.get(&name).is_some() {
            return Err(FormError::DuplicateField(name));
        }
        self.fields.push((name, rules));
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&RuleSet> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, rules)| rules)
    }

    /// Fields in declaration order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &RuleSet)> {
        self.fields.iter().map(|(name, rules)| (name.as_str(), rules))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Validates the schema itself (not a record).
    ///
    /// Rejects duplicate field names and conditional `required` directives
    /// that reference no field.
    pub fn validate_structure(&self) -> FormResult<()> {
        let mut seen = HashSet::new();
        for (name, rules) in &self.fields {
            if !seen.insert(name.as_str()) {
                return Err(FormError::DuplicateField(name.clone()));
            }
            if let Required::Conditional {
                if_filled,
                if_not_filled,
            } = &rules.required
            {
                if if_filled.is_empty() && if_not_filled.is_empty() {
                    return Err(FormError::malformed(
                        name.as_str(),
                        "conditional required directive names no fields",
                    ));
                }
            }
        }
        Ok(())
    }
}
