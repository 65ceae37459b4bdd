//! # Temporal Types — UTC-Only Timestamps
//!
//! Defines `Timestamp`, the `created_at` stamp of a block.
//!
//! ## Security Invariant
//!
//! A block's digest covers the string form of its timestamp, so that form
//! must be a pure function of the instant. Timestamps are UTC only, carry
//! exactly microsecond precision, and always render as
//! `YYYY-MM-DDTHH:MM:SS.ffffffZ`. Local offsets would produce different
//! canonical bytes for the same instant.
//!
//! Non-UTC inputs are **rejected** by [`Timestamp::parse()`].

use chrono::{DateTime, Timelike, Utc};
use serde::{Deserialize, Serialize};

use crate::error::RxChainError;

/// A UTC-only timestamp, truncated to microseconds.
///
/// # Construction
///
/// - [`Timestamp::now()`]: current UTC time, truncated.
/// - [`Timestamp::from_utc()`]: from a `DateTime<Utc>`, truncating below microseconds.
/// - [`Timestamp::parse()`]: from an RFC 3339 string with `Z` suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Create a timestamp from the current wall-clock time.
    pub fn now() -> Self {
        Self(truncate_to_micros(Utc::now()))
    }

    /// Create a timestamp from a `chrono::DateTime<Utc>`.
    pub fn from_utc(dt: DateTime<Utc>) -> Self {
        Self(truncate_to_micros(dt))
    }

    /// Parse a timestamp from an RFC 3339 string.
    ///
    /// Only the `Z` suffix is accepted; explicit offsets, even `+00:00`,
    /// are rejected so that a parsed value re-renders to the same string
    /// class it came from.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTimestamp` if the string is not RFC 3339 or is not
    /// expressed in UTC with `Z`.
    pub fn parse(s: &str) -> Result<Self, RxChainError> {
        if !s.ends_with('Z') {
            return Err(RxChainError::InvalidTimestamp(format!(
                "timestamp must use Z suffix (UTC only), got: {s:?}"
            )));
        }
        let dt = DateTime::parse_from_rfc3339(s).map_err(|e| {
            RxChainError::InvalidTimestamp(format!("invalid RFC 3339 timestamp {s:?}: {e}"))
        })?;
        Ok(Self(truncate_to_micros(dt.with_timezone(&Utc))))
    }

    /// Create a timestamp from Unix epoch seconds.
    pub fn from_epoch_secs(secs: i64) -> Result<Self, RxChainError> {
        DateTime::from_timestamp(secs, 0)
            .map(Self)
            .ok_or_else(|| RxChainError::InvalidTimestamp(format!("invalid Unix timestamp: {secs}")))
    }

    /// Access the inner `DateTime<Utc>`.
    pub fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }

    /// Render as ISO 8601 with microseconds and Z suffix
    /// (e.g. `2026-01-15T12:00:00.000000Z`).
    pub fn to_iso8601(&self) -> String {
        self.0.format("%Y-%m-%dT%H:%M:%S%.6fZ").to_string()
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_iso8601())
    }
}

/// Drop sub-microsecond precision.
fn truncate_to_micros(dt: DateTime<Utc>) -> DateTime<Utc> {
    let micros = dt.nanosecond() / 1_000;
    dt.with_nanosecond(micros * 1_000).unwrap_or(dt)
}
