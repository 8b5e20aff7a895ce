//! Column encodings shared by the SQLite repositories.
//!
//! Timestamps are stored as fixed-width RFC 3339 UTC text at second
//! precision (`2024-05-01T08:00:00Z`), so lexical order in SQL matches
//! chronological order.

use chrono::{DateTime, SecondsFormat, Utc};

use crate::error::{HealthError, Result};

pub fn encode_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Secs, true)
}

pub fn decode_timestamp(column: &str, raw: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|parsed| parsed.with_timezone(&Utc))
        .map_err(|e| HealthError::Storage(format!("invalid {column} timestamp '{raw}': {e}")))
}

/// Round to two decimals, matching what reports display
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
