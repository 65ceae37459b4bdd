//! # Error Types
//!
//! Errors raised at the edges of the core types: canonicalizing arbitrary
//! serializable values, ingesting untyped JSON into a
//! [`Record`](crate::Record), parsing digests, parsing timestamps.
//! All errors use `thiserror` for derive-based `Display` and `Error`
//! implementations.

use thiserror::Error;

/// Top-level error type for rxchain core primitives.
#[derive(Error, Debug)]
pub enum RxChainError {
    /// A digest string could not be decoded.
    #[error("invalid digest: {0}")]
    InvalidDigest(String),

    /// A timestamp string could not be parsed or was not UTC.
    #[error("invalid timestamp: {0}")]
    InvalidTimestamp(String),
}

/// Error during canonicalization or JSON ingestion.
#[derive(Error, Debug)]
pub enum CanonicalizationError {
    /// Float values are not permitted in canonical representations.
    /// Quantities must be strings or integers.
    #[error("float values are not permitted in canonical representations; use string or integer: {0}")]
    FloatRejected(f64),

    /// A record must be a JSON object at its top level.
    #[error("record payload must be a JSON object, got {0}")]
    NotAnObject(&'static str),

    /// The value could not be represented as JSON.
    #[error("serialization failed: {0}")]
    SerializationFailed(#[from] serde_json::Error),
}
