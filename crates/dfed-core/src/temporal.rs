//! # Temporal Types
//!
//! UTC-only timestamp type for federation messages. All timestamps are stored
//! in UTC with second-level precision and a `Z` suffix in serialized form.
//!
//! ## Design Decision
//!
//! The wire format carries timestamps as ISO 8601 text with whole-second
//! precision. Subseconds are truncated when a [`Timestamp`] is *constructed*,
//! not when it is rendered, so two timestamps that serialize identically are
//! always equal and decoding a serialized entity reproduces the original
//! value exactly.

use chrono::{DateTime, Timelike, Utc};
use serde::{Deserialize, Serialize};

use crate::error::IdentityError;

/// A UTC timestamp with second-level precision.
///
/// Serializes to ISO 8601 format with `Z` suffix (e.g., `2026-01-15T12:00:00Z`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Create a timestamp representing the current UTC time, truncated to
    /// whole seconds.
    pub fn now() -> Self {
        Self(truncate(Utc::now()))
    }

    /// Create a timestamp from a `chrono::DateTime<Utc>`, truncating any
    /// subsecond component.
    pub fn from_datetime(dt: DateTime<Utc>) -> Self {
        Self(truncate(dt))
    }

    /// Parse an ISO 8601 / RFC 3339 string into a timestamp.
    ///
    /// Offsets other than `Z` are accepted and converted to UTC.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::InvalidTimestamp`] if the string does not
    /// parse as an RFC 3339 datetime.
    pub fn parse(s: &str) -> Result<Self, IdentityError> {
        let parsed = DateTime::parse_from_rfc3339(s).map_err(|e| {
            IdentityError::InvalidTimestamp {
                value: s.to_string(),
                reason: e.to_string(),
            }
        })?;
        Ok(Self(truncate(parsed.with_timezone(&Utc))))
    }

    /// Access the underlying `chrono::DateTime<Utc>`.
    pub fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }

    /// Return the timestamp as an ISO 8601 string with Z suffix.
    pub fn to_canonical_string(&self) -> String {
        self.0.format("%Y-%m-%dT%H:%M:%SZ").to_string()
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_canonical_string())
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(dt: DateTime<Utc>) -> Self {
        Self::from_datetime(dt)
    }
}

/// Zero nanoseconds is always a representable time of day.
fn truncate(dt: DateTime<Utc>) -> DateTime<Utc> {
    dt.with_nanosecond(0).unwrap_or(dt)
}
