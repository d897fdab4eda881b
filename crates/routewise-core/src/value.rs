//! # Change Values — Tagged Payload Shapes
//!
//! Audit-log payloads are untyped JSON. Rather than have every formatter
//! re-inspect raw JSON to work out what it is holding, each `oldValue` and
//! `newValue` is classified once at ingestion into a closed set of variants.
//!
//! | JSON input                         | Variant       |
//! |------------------------------------|---------------|
//! | missing, `null`                    | `Absent`      |
//! | `true` / `false`                   | `Bool`        |
//! | number                             | `Number`      |
//! | 24-hex string                      | `Reference`   |
//! | RFC 3339 / `YYYY-MM-DD` string     | `DateLike`    |
//! | any other string                   | `Text`        |
//! | object                             | `Composite`   |
//! | array                              | `Collection`  |
//!
//! Composites are stored in a `BTreeMap`, so structural equality ignores the
//! key order of the source JSON.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde_json::{Number, Value};

use crate::identity::ObjectId;
use crate::temporal::parse_date_like;

/// A classified change payload.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ChangeValue {
    /// No value: the field was added or removed.
    #[default]
    Absent,
    /// A boolean flag.
    Bool(bool),
    /// A JSON number, kept exact.
    Number(Number),
    /// Free text.
    Text(String),
    /// A 24-hex identifier of another entity.
    Reference(ObjectId),
    /// A parseable date or datetime, with its original text.
    DateLike {
        /// The parsed instant.
        at: DateTime<Utc>,
        /// The string as it appeared in the payload.
        raw: String,
    },
    /// A nested object.
    Composite(BTreeMap<String, ChangeValue>),
    /// An array.
    Collection(Vec<ChangeValue>),
}

impl ChangeValue {
    /// Classify a JSON value.
    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::Null => Self::Absent,
            Value::Bool(b) => Self::Bool(*b),
            Value::Number(n) => Self::Number(n.clone()),
            Value::String(s) => Self::from_text(s),
            Value::Array(items) => Self::Collection(items.iter().map(Self::from_json).collect()),
            Value::Object(map) => Self::Composite(
                map.iter()
                    .map(|(k, v)| (k.clone(), Self::from_json(v)))
                    .collect(),
            ),
        }
    }

    /// Classify a string payload.
    pub fn from_text(s: &str) -> Self {
        if let Some(id) = ObjectId::parse(s) {
            return Self::Reference(id);
        }
        match parse_date_like(s) {
            Some(at) => Self::DateLike {
                at,
                raw: s.to_string(),
            },
            None => Self::Text(s.to_string()),
        }
    }

    /// Convert back to JSON. `DateLike` values yield their raw text.
    pub fn to_json(&self) -> Value {
        match self {
            Self::Absent => Value::Null,
            Self::Bool(b) => Value::Bool(*b),
            Self::Number(n) => Value::Number(n.clone()),
            Self::Text(s) => Value::String(s.clone()),
            Self::Reference(id) => Value::String(id.to_string()),
            Self::DateLike { raw, .. } => Value::String(raw.clone()),
            Self::Composite(map) => Value::Object(
                map.iter()
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect(),
            ),
            Self::Collection(items) => Value::Array(items.iter().map(Self::to_json).collect()),
        }
    }

    /// Nullish or blank text. Empty collections are *not* empty here; they
    /// render as "None" further down the formatter chain.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Absent => true,
            Self::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// Whether a value is present at all.
    pub fn is_present(&self) -> bool {
        !matches!(self, Self::Absent)
    }

    /// Look up a key of a composite. Returns `None` for other variants and
    /// for keys holding `Absent`.
    pub fn get(&self, key: &str) -> Option<&ChangeValue> {
        match self {
            Self::Composite(map) => map.get(key).filter(|v| v.is_present()),
            _ => None,
        }
    }

    /// First present key out of `keys`.
    pub fn get_any(&self, keys: &[&str]) -> Option<&ChangeValue> {
        keys.iter().find_map(|k| self.get(k))
    }

    /// Non-blank text of a scalar-ish value: text, reference, raw date text,
    /// or a number/bool rendered with `to_string`.
    pub fn as_text(&self) -> Option<String> {
        let text = match self {
            Self::Text(s) => s.trim().to_string(),
            Self::Reference(id) => id.to_string(),
            Self::DateLike { raw, .. } => raw.clone(),
            Self::Number(n) => n.to_string(),
            Self::Bool(b) => b.to_string(),
            _ => return None,
        };
        (!text.is_empty()).then_some(text)
    }

    /// Text of `key` inside a composite.
    pub fn text_of(&self, key: &str) -> Option<String> {
        self.get(key).and_then(Self::as_text)
    }

    /// The value as a finite float, accepting numeric strings.
    pub fn as_f64(&self) -> Option<f64> {
        let n = match self {
            Self::Number(n) => n.as_f64(),
            Self::Text(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        };
        n.filter(|n| n.is_finite())
    }

    /// The parsed instant of a date-like value.
    pub fn as_datetime(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::DateLike { at, .. } => Some(*at),
            _ => None,
        }
    }

    /// Boolean payload.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Elements of a collection.
    pub fn as_collection(&self) -> Option<&[ChangeValue]> {
        match self {
            Self::Collection(items) => Some(items),
            _ => None,
        }
    }

    /// Whether this is a nested object.
    pub fn is_composite(&self) -> bool {
        matches!(self, Self::Composite(_))
    }

    /// Whether this is an array.
    pub fn is_collection(&self) -> bool {
        matches!(self, Self::Collection(_))
    }

    /// Short type name used in log lines.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Absent => "absent",
            Self::Bool(_) => "bool",
            Self::Number(_) => "number",
            Self::Text(_) => "text",
            Self::Reference(_) => "reference",
            Self::DateLike { .. } => "date",
            Self::Composite(_) => "composite",
            Self::Collection(_) => "collection",
        }
    }
}

impl From<&Value> for ChangeValue {
    fn from(value: &Value) -> Self {
        Self::from_json(value)
    }
}

impl From<Value> for ChangeValue {
    fn from(value: Value) -> Self {
        Self::from_json(&value)
    }
}

/// JSON type name for error messages.
pub fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_classification() {
        assert_eq!(ChangeValue::from_json(&json!(null)), ChangeValue::Absent);
        assert_eq!(ChangeValue::from_json(&json!(true)), ChangeValue::Bool(true));
        assert!(matches!(ChangeValue::from_json(&json!(50)), ChangeValue::Number(_)));
        assert!(matches!(
            ChangeValue::from_json(&json!("65a1f0c2e4b0a1b2c3d4e5f6")),
            ChangeValue::Reference(_)
        ));
        assert!(matches!(
            ChangeValue::from_json(&json!("2024-01-01")),
            ChangeValue::DateLike { .. }
        ));
        assert_eq!(
            ChangeValue::from_json(&json!("D1")),
            ChangeValue::Text("D1".into())
        );
        assert!(ChangeValue::from_json(&json!({"a": 1})).is_composite());
        assert!(ChangeValue::from_json(&json!([1, 2])).is_collection());
    }

    #[test]
    fn test_composite_equality_ignores_key_order() {
        let a: ChangeValue = serde_json::from_str::<Value>(r#"{"street":"A","city":"B"}"#)
            .unwrap()
            .into();
        let b: ChangeValue = serde_json::from_str::<Value>(r#"{"city":"B","street":"A"}"#)
            .unwrap()
            .into();
        assert_eq!(a, b);
    }

    #[test]
    fn test_is_empty() {
        assert!(ChangeValue::Absent.is_empty());
        assert!(ChangeValue::Text("   ".into()).is_empty());
        assert!(!ChangeValue::Collection(vec![]).is_empty());
        assert!(!ChangeValue::Bool(false).is_empty());
    }

    #[test]
    fn test_get_skips_absent_keys() {
        let v = ChangeValue::from_json(&json!({"name": null, "firstName": "Ann"}));
        assert!(v.get("name").is_none());
        assert_eq!(v.text_of("firstName").as_deref(), Some("Ann"));
        assert_eq!(
            v.get_any(&["name", "firstName"]).and_then(ChangeValue::as_text),
            Some("Ann".into())
        );
    }

    #[test]
    fn test_to_json_preserves_raw_dates() {
        let input = json!({"when": "2024-01-01T10:00:00+01:00", "n": 3});
        assert_eq!(ChangeValue::from_json(&input).to_json(), input);
    }

    #[test]
    fn test_as_f64_accepts_numeric_text() {
        assert_eq!(ChangeValue::Text("12.5".into()).as_f64(), Some(12.5));
        assert_eq!(ChangeValue::from_json(&json!(20)).as_f64(), Some(20.0));
        assert_eq!(ChangeValue::Text("abc".into()).as_f64(), None);
        assert_eq!(ChangeValue::Text("inf".into()).as_f64(), None);
        assert_eq!(ChangeValue::Text("NaN".into()).as_f64(), None);
    }
}
