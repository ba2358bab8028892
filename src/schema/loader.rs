//! Declarative schemas in JSON
//!
//! A JSON schema is an object whose keys are field names, in declaration
//! order, and whose values are rule objects:
//!
//! ```json
//! {
//!   "email": { "required": true, "regexp": "^[^@]+@[^@]+$" },
//!   "phone": { "required": { "ifNotFilled": "email" }, "minLength": 8 },
//!   "age":   { "required": { "default": 18 }, "min": 0 }
//! }
//! ```
//!
//! Only data can be declared here. Transforms, predicates and default
//! suppliers exist in the Rust API alone.

use std::collections::BTreeMap;

use regex::Regex;
use serde::Deserialize;
use serde_json::{Map, Value};

use super::types::{Required, RuleSet, Schema};
use super::value::{FieldValue, Record};
use crate::errors::{ErrorCode, FormError, FormResult};

/// One pattern or field name, or a list of them.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

impl OneOrMany {
    fn into_vec(self) -> Vec<String> {
        match self {
            OneOrMany::One(item) => vec![item],
            OneOrMany::Many(items) => items,
        }
    }
}

/// Wire form of a rule set
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct RuleSpec {
    #[serde(default)]
    required: Value,
    min: Option<f64>,
    max: Option<f64>,
    min_length: Option<usize>,
    max_length: Option<usize>,
    equal: Option<String>,
    regexp: Option<OneOrMany>,
    #[serde(default)]
    checked: bool,
    #[serde(default)]
    untrimmed: bool,
    #[serde(default)]
    messages: BTreeMap<String, String>,
}

/// Builds schemas and records from JSON.
pub struct SchemaLoader;

impl SchemaLoader {
    /// Builds a schema from a JSON object, keeping key order.
    pub fn from_json(value: &Value) -> FormResult<Schema> {
        let fields = value
            .as_object()
            .ok_or_else(|| FormError::malformed("$root", "schema must be a JSON object"))?;
        Self::from_map(fields)
    }

    pub fn from_map(fields: &Map<String, Value>) -> FormResult<Schema> {
        let mut schema = Schema::new();
        for (name, rules) in fields {
            schema.insert(name.as_str(), Self::rule_set(name, rules)?)?;
        }
        schema.validate_structure()?;
        Ok(schema)
    }

    fn rule_set(field: &str, value: &Value) -> FormResult<RuleSet> {
        let spec = RuleSpec::deserialize(value)
            .map_err(|e| FormError::malformed(field, e.to_string()))?;

        let mut rules = RuleSet {
            required: parse_required(field, spec.required)?,
            min: spec.min,
            max: spec.max,
            min_length: spec.min_length,
            max_length: spec.max_length,
            equal: spec.equal,
            checked: spec.checked,
            untrimmed: spec.untrimmed,
            ..RuleSet::default()
        };

        for pattern in spec.regexp.map(OneOrMany::into_vec).unwrap_or_default() {
            let regex = Regex::new(&pattern).map_err(|source| FormError::InvalidPattern {
                field: field.to_string(),
                source,
            })?;
            rules.regexp.push(regex);
        }

        for (code, message) in spec.messages {
            rules.messages.insert(code.parse::<ErrorCode>()?, message);
        }

        Ok(rules)
    }
}

/// Interprets the three shapes of `required`.
fn parse_required(field: &str, value: Value) -> FormResult<Required> {
    match value {
        Value::Null => Ok(Required::default()),
        Value::Bool(required) => Ok(Required::from(required)),
        Value::Object(mut directive) => {
            if let Some(default) = directive.remove("default") {
                if !directive.is_empty() {
                    return Err(FormError::malformed(
                        field,
                        "'default' cannot be combined with other required keys",
                    ));
                }
                let value = FieldValue::try_from(default).map_err(|reason| {
                    FormError::UnsupportedValue {
                        field: field.to_string(),
                        reason,
                    }
                })?;
                return Ok(Required::default_value(value));
            }

            let if_filled = field_list(field, directive.remove("ifFilled"))?;
            let if_not_filled = field_list(field, directive.remove("ifNotFilled"))?;

            if let Some(key) = directive.keys().next() {
                return Err(FormError::malformed(
                    field,
                    format!("unknown required key '{}'", key),
                ));
            }
            if if_filled.is_empty() && if_not_filled.is_empty() {
                return Err(FormError::malformed(
                    field,
                    "required object needs 'default', 'ifFilled' or 'ifNotFilled'",
                ));
            }

            Ok(Required::Conditional {
                if_filled,
                if_not_filled,
            })
        }
        other => Err(FormError::malformed(
            field,
            format!("required must be a boolean or an object, got {}", other),
        )),
    }
}

fn field_list(field: &str, value: Option<Value>) -> FormResult<Vec<String>> {
    match value {
        None => Ok(Vec::new()),
        Some(value) => OneOrMany::deserialize(value)
            .map(OneOrMany::into_vec)
            .map_err(|_| FormError::malformed(field, "field references must be a string or a list of strings")),
    }
}

/// Converts a JSON object into a data record.
pub fn record_from_json(value: &Value) -> FormResult<Record> {
    let object = value.as_object().ok_or_else(|| FormError::UnsupportedValue {
        field: "$root".to_string(),
        reason: "data must be a JSON object".to_string(),
    })?;

    object
        .iter()
        .map(|(name, value)| {
            FieldValue::try_from(value.clone())
                .map(|v| (name.clone(), v))
                .map_err(|reason| FormError::UnsupportedValue {
                    field: name.clone(),
                    reason,
                })
        })
        .collect()
}
