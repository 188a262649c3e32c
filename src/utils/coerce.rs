//! Coercion Utilities
//!
//! Total conversions from loosely typed JSON values into the crate's
//! canonical types. Every helper returns `None` for shapes it cannot read
//! rather than erroring, so upstream feeds can never take the service down.

use chrono::{DateTime, TimeZone, Utc};
use serde_json::Value;

/// Epoch values at or above this magnitude are read as milliseconds.
/// 100_000_000_000 seconds is past the year 5000, so no second-resolution
/// timestamp from a live feed will ever reach it.
const EPOCH_MILLIS_CUTOFF: i64 = 100_000_000_000;

/// Reads a number from a JSON value, accepting numeric strings
///
/// Non-finite results (NaN, infinity) are rejected so downstream sums stay
/// well-defined.
pub fn coerce_f64(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };

    number.filter(|n| n.is_finite())
}

/// Reads a string from a JSON value, stringifying bare numbers
///
/// Relational backends ship numeric identifiers where document stores ship
/// strings; both are accepted.
pub fn coerce_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        }
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Reads a boolean from a JSON value, accepting string and 0/1 encodings
pub fn coerce_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::String(s) => match s.trim().to_lowercase().as_str() {
            "true" => Some(true),
            "false" => Some(false),
            _ => None,
        },
        Value::Number(n) => n.as_i64().map(|n| n != 0),
        _ => None,
    }
}

/// Reads a timestamp from a JSON value
///
/// Accepts RFC 3339 strings, epoch seconds, and epoch milliseconds, the
/// three encodings observed across the reward backends. Malformed dates
/// become `None`.
pub fn coerce_datetime(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(s) => DateTime::parse_from_rfc3339(s.trim())
            .ok()
            .map(|dt| dt.with_timezone(&Utc)),
        Value::Number(n) => {
            let epoch = n.as_i64()?;
            if epoch.abs() >= EPOCH_MILLIS_CUTOFF {
                Utc.timestamp_millis_opt(epoch).single()
            } else {
                Utc.timestamp_opt(epoch, 0).single()
            }
        }
        _ => None,
    }
}
