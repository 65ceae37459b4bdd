//! # Record — Opaque Block Payload
//!
//! A `Record` is the caller-supplied payload stored in a block. The chain
//! never interprets its fields; it only needs a canonical byte encoding
//! for hashing. Field values form a closed JSON-like tree without floats,
//! so every `Record` canonicalizes without error.
//!
//! Untyped JSON enters through [`Record::try_from_json`], which applies the
//! float rejection rule at the boundary.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::canonical::CanonicalBytes;
use crate::error::CanonicalizationError;

/// A single value inside a [`Record`].
///
/// Mirrors the JSON data model minus floating-point numbers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// JSON `null`.
    Null,
    /// JSON `true` / `false`.
    Boolean(bool),
    /// A signed integer.
    Integer(i64),
    /// A UTF-8 string.
    Text(String),
    /// An ordered list of values.
    List(Vec<FieldValue>),
    /// A nested map of named values.
    Map(BTreeMap<String, FieldValue>),
}

impl FieldValue {
    /// Convert an untyped JSON value, rejecting floats anywhere in the tree.
    ///
    /// Unsigned integers above `i64::MAX` are not representable as
    /// `Integer` and are rejected the same way floats are.
    pub fn try_from_json(value: Value) -> Result<Self, CanonicalizationError> {
        match value {
            Value::Null => Ok(Self::Null),
            Value::Bool(b) => Ok(Self::Boolean(b)),
            Value::String(s) => Ok(Self::Text(s)),
            Value::Number(n) => match n.as_i64() {
                Some(i) => Ok(Self::Integer(i)),
                None => Err(CanonicalizationError::FloatRejected(
                    n.as_f64().unwrap_or(f64::NAN),
                )),
            },
            Value::Array(items) => items
                .into_iter()
                .map(Self::try_from_json)
                .collect::<Result<Vec<_>, _>>()
                .map(Self::List),
            Value::Object(map) => map
                .into_iter()
                .map(|(k, v)| Ok((k, Self::try_from_json(v)?)))
                .collect::<Result<BTreeMap<_, _>, _>>()
                .map(Self::Map),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<i64> for FieldValue {
    fn from(n: i64) -> Self {
        Self::Integer(n)
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        Self::Boolean(b)
    }
}

/// Outcome of screening a prescription before it is stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    /// Accepted for the chain.
    Legitimate,
    /// Flagged for potential misuse.
    Flagged,
}

impl Status {
    /// Returns the status string stored in prescription records.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Legitimate => "legitimate",
            Self::Flagged => "flagged",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An opaque mapping of named fields.
///
/// Keys are kept sorted; canonical encoding re-sorts them by UTF-16 code
/// units as RFC 8785 requires.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(BTreeMap<String, FieldValue>);

impl Record {
    /// Create an empty record.
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Builder-style field insertion.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// The five-field prescription record.
    pub fn prescription(
        patient_id: impl Into<String>,
        medication: impl Into<String>,
        quantity: i64,
        dosage: i64,
        status: Status,
    ) -> Self {
        let patient_id: String = patient_id.into();
        let medication: String = medication.into();
        Self::new()
            .with("patient_id", patient_id)
            .with("medication", medication)
            .with("quantity", quantity)
            .with("dosage", dosage)
            .with("status", status.as_str())
    }

    /// Build a record from an untyped JSON object.
    ///
    /// # Errors
    ///
    /// `NotAnObject` if the top-level value is not an object;
    /// `FloatRejected` if any nested number is not an `i64`.
    pub fn try_from_json(value: Value) -> Result<Self, CanonicalizationError> {
        match value {
            Value::Object(map) => map
                .into_iter()
                .map(|(k, v)| Ok((k, FieldValue::try_from_json(v)?)))
                .collect::<Result<BTreeMap<_, _>, _>>()
                .map(Self),
            Value::Null => Err(CanonicalizationError::NotAnObject("null")),
            Value::Bool(_) => Err(CanonicalizationError::NotAnObject("boolean")),
            Value::Number(_) => Err(CanonicalizationError::NotAnObject("number")),
            Value::String(_) => Err(CanonicalizationError::NotAnObject("string")),
            Value::Array(_) => Err(CanonicalizationError::NotAnObject("array")),
        }
    }

    /// Look up a field.
    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.0.get(key)
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the record has no fields.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Convert into the canonical value tree.
    pub fn into_value(self) -> FieldValue {
        FieldValue::Map(self.0)
    }

    /// Insert or replace a field.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<FieldValue>) {
        self.0.insert(key.into(), value.into());
    }
}

impl fmt::Display for Record {
    /// Renders the record as its compact canonical JSON form.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bytes = CanonicalBytes::from_record(self).map_err(|_| fmt::Error)?;
        f.write_str(bytes.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn prescription_has_five_fields() {
        let r = Record::prescription("patient_1", "medication_1", 6, 15, Status::Legitimate);
        assert_eq!(r.len(), 5);
        assert_eq!(r.get("quantity"), Some(&FieldValue::Integer(6)));
        assert_eq!(r.get("status"), Some(&FieldValue::Text("legitimate".into())));
    }

    #[test]
    fn display_is_sorted_compact_json() {
        let r = Record::new().with("b", 2i64).with("a", "x");
        assert_eq!(r.to_string(), r#"{"a":"x","b":2}"#);
    }

    #[test]
    fn from_json_object() {
        let r = Record::try_from_json(json!({"patient_id": "p1", "quantity": 4, "tags": [1, true, null]}))
            .unwrap();
        assert_eq!(r.len(), 3);
        assert_eq!(
            r.get("tags"),
            Some(&FieldValue::List(vec![
                FieldValue::Integer(1),
                FieldValue::Boolean(true),
                FieldValue::Null
            ]))
        );
    }

    #[test]
    fn from_json_rejects_float() {
        let err = Record::try_from_json(json!({"dosage": 2.5})).unwrap_err();
        match err {
            CanonicalizationError::FloatRejected(f) => assert_eq!(f, 2.5),
            other => panic!("expected FloatRejected, got: {other}"),
        }
    }

    #[test]
    fn from_json_rejects_nested_float() {
        assert!(Record::try_from_json(json!({"a": {"b": [{"c": 3.25}]}})).is_err());
    }

    #[test]
    fn from_json_rejects_non_object() {
        assert!(matches!(
            Record::try_from_json(json!([1, 2])),
            Err(CanonicalizationError::NotAnObject("array"))
        ));
        assert!(matches!(
            Record::try_from_json(json!("text")),
            Err(CanonicalizationError::NotAnObject("string"))
        ));
    }

    #[test]
    fn serde_roundtrip_preserves_fields() {
        let r = Record::prescription("patient_3", "medication_3", 4, 10, Status::Flagged);
        let s = serde_json::to_string(&r).unwrap();
        let back: Record = serde_json::from_str(&s).unwrap();
        assert_eq!(r, back);
    }

    #[test]
    fn status_strings() {
        assert_eq!(Status::Legitimate.to_string(), "legitimate");
        assert_eq!(Status::Flagged.to_string(), "flagged");
    }
}
