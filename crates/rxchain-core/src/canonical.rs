//! # Canonical Serialization — JCS-Compatible Byte Production
//!
//! This module defines `CanonicalBytes`, the sole construction path for bytes
//! used in digest computation across rxchain.
//!
//! ## Security Invariant
//!
//! The `CanonicalBytes` newtype has a private inner field. The only way to
//! construct it is through [`CanonicalBytes::new()`], which converts to a
//! JSON value, rejects floats, and serializes with RFC 8785 (JSON
//! Canonicalization Scheme) via `serde_jcs`. Every digest in the system is
//! computed over that one encoding at block creation and at validation.
//!
//! A [`Record`] is a float-free [`FieldValue`] tree with string keys, so
//! canonicalizing one never fails.

use serde::Serialize;
use serde_json::Value;

use crate::error::CanonicalizationError;
use crate::record::Record;

/// Bytes produced exclusively by JCS canonicalization.
///
/// # Invariants
///
/// - Constructed only via [`CanonicalBytes::new()`] or
///   [`CanonicalBytes::from_record()`].
/// - Float values are rejected before serialization.
/// - Object keys are sorted, separators are compact.
/// - The byte sequence is valid UTF-8 JSON.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CanonicalBytes(String);

impl CanonicalBytes {
    /// Construct canonical bytes from any serializable value.
    ///
    /// # Errors
    ///
    /// `FloatRejected` if the value contains a float.
    /// `SerializationFailed` if the value cannot be represented as JSON.
    pub fn new(obj: &impl Serialize) -> Result<Self, CanonicalizationError> {
        let value = serde_json::to_value(obj)?;
        let checked = reject_floats(value)?;
        Ok(Self(serde_jcs::to_string(&checked)?))
    }

    /// Canonicalize a record as a JSON object.
    pub fn from_record(record: &Record) -> Result<Self, CanonicalizationError> {
        Self::new(record)
    }

    /// Access the canonical bytes for digest computation.
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    /// The canonical form as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the length of the canonical byte sequence.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the canonical byte sequence is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl AsRef<[u8]> for CanonicalBytes {
    fn as_ref(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

/// Walk a JSON tree and refuse any number that is not an `i64` or `u64`.
fn reject_floats(value: Value) -> Result<Value, CanonicalizationError> {
    match value {
        Value::Null | Value::Bool(_) | Value::String(_) => Ok(value),
        Value::Number(ref n) => {
            if !n.is_i64() && !n.is_u64() {
                if let Some(f) = n.as_f64() {
                    return Err(CanonicalizationError::FloatRejected(f));
                }
            }
            Ok(value)
        }
        Value::Object(map) => {
            let mut checked = serde_json::Map::new();
            for (k, v) in map {
                checked.insert(k, reject_floats(v)?);
            }
            Ok(Value::Object(checked))
        }
        Value::Array(arr) => {
            let checked: Result<Vec<_>, _> = arr.into_iter().map(reject_floats).collect();
            Ok(Value::Array(checked?))
        }
    }
}
