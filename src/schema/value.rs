//! Field values
//!
//! A record holds flat scalar values only: text, numbers, booleans, `null`
//! and the absent value. Emptiness, truthiness and the text form used by the
//! length and pattern checks are all defined here.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Serialize, Serializer};
use serde_json::Value;

/// A single input or output value.
#[derive(Debug, Clone, PartialEq, Default, serde::Deserialize)]
#[serde(try_from = "Value")]
pub enum FieldValue {
    /// Field absent from the record
    #[default]
    Undefined,
    /// Explicit null
    Null,
    Bool(bool),
    Number(f64),
    String(String),
}

/// A data record: field name to value. Missing names read as `Undefined`.
pub type Record = BTreeMap<String, FieldValue>;

static UNDEFINED: FieldValue = FieldValue::Undefined;

/// Looks up a field, treating a missing entry as `Undefined`.
pub fn lookup<'a>(record: &'a Record, field: &str) -> &'a FieldValue {
    record.get(field).unwrap_or(&UNDEFINED)
}

impl FieldValue {
    /// Empty means absent, null, or text that is blank once trimmed.
    pub fn is_empty(&self) -> bool {
        match self {
            FieldValue::Undefined | FieldValue::Null => true,
            FieldValue::String(s) => s.trim().is_empty(),
            FieldValue::Bool(_) | FieldValue::Number(_) => false,
        }
    }

    /// Truthiness used by the `checked` rule.
    pub fn is_truthy(&self) -> bool {
        match self {
            FieldValue::Undefined | FieldValue::Null => false,
            FieldValue::Bool(b) => *b,
            FieldValue::Number(n) => *n != 0.0 && !n.is_nan(),
            FieldValue::String(s) => !s.is_empty(),
        }
    }

    /// Returns a copy with surrounding whitespace removed from text values.
    pub fn trimmed(&self) -> FieldValue {
        match self {
            FieldValue::String(s) => FieldValue::String(s.trim().to_string()),
            other => other.clone(),
        }
    }

    /// Trimmed text form of a string or number; `None` for every other kind.
    ///
    /// Bounds, length and pattern checks only run when this is `Some`.
    pub fn text(&self) -> Option<String> {
        match self {
            FieldValue::String(s) => Some(s.trim().to_string()),
            FieldValue::Number(n) => Some(format_number(*n)),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn is_undefined(&self) -> bool {
        matches!(self, FieldValue::Undefined)
    }

    /// Kind name for diagnostics
    pub fn kind(&self) -> &'static str {
        match self {
            FieldValue::Undefined => "undefined",
            FieldValue::Null => "null",
            FieldValue::Bool(_) => "boolean",
            FieldValue::Number(_) => "number",
            FieldValue::String(_) => "string",
        }
    }

    /// Converts to JSON. `Undefined` becomes `null`.
    pub fn to_json(&self) -> Value {
        match self {
            FieldValue::Undefined | FieldValue::Null => Value::Null,
            FieldValue::Bool(b) => Value::Bool(*b),
            FieldValue::Number(n) => number_to_json(*n),
            FieldValue::String(s) => Value::String(s.clone()),
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Undefined => f.write_str("undefined"),
            FieldValue::Null => f.write_str("null"),
            FieldValue::Bool(b) => write!(f, "{}", b),
            FieldValue::Number(n) => f.write_str(&format_number(*n)),
            FieldValue::String(s) => f.write_str(s),
        }
    }
}

impl TryFrom<Value> for FieldValue {
    type Error = String;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Null => Ok(FieldValue::Null),
            Value::Bool(b) => Ok(FieldValue::Bool(b)),
            Value::Number(n) => n
                .as_f64()
                .map(FieldValue::Number)
                .ok_or_else(|| format!("number {} is not representable", n)),
            Value::String(s) => Ok(FieldValue::String(s)),
            Value::Array(_) => Err("arrays are not supported".to_string()),
            Value::Object(_) => Err("objects are not supported".to_string()),
        }
    }
}

impl Serialize for FieldValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::String(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::String(s)
    }
}

impl From<f64> for FieldValue {
    fn from(n: f64) -> Self {
        FieldValue::Number(n)
    }
}

impl From<i64> for FieldValue {
    fn from(n: i64) -> Self {
        FieldValue::Number(n as f64)
    }
}

impl From<i32> for FieldValue {
    fn from(n: i32) -> Self {
        FieldValue::Number(f64::from(n))
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        FieldValue::Bool(b)
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(FieldValue::Null, Into::into)
    }
}

/// Largest integer an f64 holds exactly.
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

fn number_to_json(n: f64) -> Value {
    if n.fract() == 0.0 && n.abs() <= MAX_SAFE_INTEGER {
        Value::from(n as i64)
    } else {
        serde_json::Number::from_f64(n).map_or(Value::Null, Value::Number)
    }
}

/// Shortest decimal text for a number: integral values print without a
/// fractional part, non-finite values print as `NaN` / `Infinity`, and
/// magnitudes from `1e21` up or below `1e-6` use exponent form.
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n.is_infinite() {
        if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string()
    } else if n == 0.0 {
        "0".to_string()
    } else if n.abs() >= 1e21 || n.abs() < 1e-6 {
        exponent_form(n)
    } else if n.fract() == 0.0 {
        format!("{:.0}", n)
    } else {
        format!("{}", n)
    }
}

/// `1e+21` / `1.5e-7`: shortest mantissa, explicitly signed exponent.
fn exponent_form(n: f64) -> String {
    let formatted = format!("{:e}", n);
    match formatted.split_once('e') {
        Some((mantissa, exponent)) if !exponent.starts_with('-') => {
            format!("{}e+{}", mantissa, exponent)
        }
        _ => formatted,
    }
}

/// Parses the longest leading decimal number of `text`.
///
/// Trailing garbage is ignored (`"12px"` is 12). Returns `None` when no
/// digits lead the text.
pub fn parse_leading_float(text: &str) -> Option<f64> {
    let s = text.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end = 1;
    }
    if s[end..].starts_with("Infinity") {
        return Some(if bytes[0] == b'-' {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        });
    }

    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - int_start;

    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        digits += frac_end - frac_start;
        if digits > 0 {
            end = frac_end;
        }
    }
    if digits == 0 {
        return None;
    }

    if end < bytes.len() && (bytes[end] == b'e' || bytes[end] == b'E') {
        let mut exp_end = end + 1;
        if exp_end < bytes.len() && (bytes[exp_end] == b'+' || bytes[exp_end] == b'-') {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    s[..end].parse::<f64>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_values() {
        assert!(FieldValue::Undefined.is_empty());
        assert!(FieldValue::Null.is_empty());
        assert!(FieldValue::from("").is_empty());
        assert!(FieldValue::from("   \t").is_empty());
        assert!(!FieldValue::from(" x ").is_empty());
        assert!(!FieldValue::from(0).is_empty());
        assert!(!FieldValue::from(false).is_empty());
    }

    #[test]
    fn test_truthiness() {
        assert!(FieldValue::from(true).is_truthy());
        assert!(FieldValue::from("no").is_truthy());
        assert!(FieldValue::from(1).is_truthy());
        assert!(!FieldValue::from(false).is_truthy());
        assert!(!FieldValue::from(0).is_truthy());
        assert!(!FieldValue::Number(f64::NAN).is_truthy());
        assert!(!FieldValue::from("").is_truthy());
        assert!(!FieldValue::Null.is_truthy());
        assert!(!FieldValue::Undefined.is_truthy());
    }

    #[test]
    fn test_strict_equality() {
        assert_eq!(FieldValue::from("1"), FieldValue::from("1"));
        assert_ne!(FieldValue::from("1"), FieldValue::from(1));
        assert_ne!(FieldValue::Null, FieldValue::Undefined);
        assert_ne!(FieldValue::Number(f64::NAN), FieldValue::Number(f64::NAN));
    }

    #[test]
    fn test_text_form() {
        assert_eq!(FieldValue::from("  abc ").text().as_deref(), Some("abc"));
        assert_eq!(FieldValue::from(18).text().as_deref(), Some("18"));
        assert_eq!(FieldValue::from(2.5).text().as_deref(), Some("2.5"));
        assert_eq!(FieldValue::from(true).text(), None);
        assert_eq!(FieldValue::Null.text(), None);
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(-0.0), "0");
        assert_eq!(format_number(-12.0), "-12");
        assert_eq!(format_number(0.25), "0.25");
        assert_eq!(format_number(f64::NAN), "NaN");
        assert_eq!(format_number(f64::NEG_INFINITY), "-Infinity");
    }

    #[test]
    fn test_kind_names() {
        assert_eq!(FieldValue::Undefined.kind(), "undefined");
        assert_eq!(FieldValue::Null.kind(), "null");
        assert_eq!(FieldValue::from(true).kind(), "boolean");
        assert_eq!(FieldValue::from(1).kind(), "number");
        assert_eq!(FieldValue::from("x").kind(), "string");
    }

    #[test]
    fn test_format_number_exponent_ranges() {
        assert_eq!(format_number(1e21), "1e+21");
        assert_eq!(format_number(-1.5e21), "-1.5e+21");
        assert_eq!(format_number(1e-7), "1e-7");
        assert_eq!(format_number(2.5e-8), "2.5e-8");
        assert_eq!(format_number(1e20), "100000000000000000000");
        assert_eq!(format_number(0.000001), "0.000001");
    }

    #[test]
    fn test_parse_leading_float() {
        assert_eq!(parse_leading_float("42"), Some(42.0));
        assert_eq!(parse_leading_float("-3.5"), Some(-3.5));
        assert_eq!(parse_leading_float(".5"), Some(0.5));
        assert_eq!(parse_leading_float("12px"), Some(12.0));
        assert_eq!(parse_leading_float("1e3"), Some(1000.0));
        assert_eq!(parse_leading_float("1e"), Some(1.0));
        assert_eq!(parse_leading_float("Infinity"), Some(f64::INFINITY));
        assert_eq!(parse_leading_float("abc"), None);
        assert_eq!(parse_leading_float(""), None);
        assert_eq!(parse_leading_float("."), None);
        assert_eq!(parse_leading_float("-"), None);
    }

    #[test]
    fn test_json_conversion() {
        let value: FieldValue = serde_json::from_value(json!(18)).unwrap();
        assert_eq!(value, FieldValue::Number(18.0));
        assert_eq!(value.to_json(), json!(18));
        assert_eq!(FieldValue::Number(1.5).to_json(), json!(1.5));
        assert_eq!(FieldValue::Undefined.to_json(), json!(null));

        let err = serde_json::from_value::<FieldValue>(json!([1, 2]));
        assert!(err.is_err());
    }

    #[test]
    fn test_lookup_missing_is_undefined() {
        let mut record = Record::new();
        record.insert("a".into(), FieldValue::from("x"));
        assert_eq!(lookup(&record, "a"), &FieldValue::from("x"));
        assert!(lookup(&record, "b").is_undefined());
    }
}
