//! Timestamps, durations and duration parsing
//!
//! Timestamps are plain `i64` ticks. Every stage only compares and subtracts
//! them, so any consistent unit works; the string parser below assumes one
//! tick is one nanosecond, which matches Polars `Datetime(ns)` columns.

use crate::error::{Error, Result};
use serde::{Deserialize, Deserializer};

/// Point in time, in ticks
pub type Timestamp = i64;

/// Length of time, in ticks
pub type Duration = i64;

/// Nanoseconds per second
pub const NANOS_PER_SECOND: Duration = 1_000_000_000;

/// Parse a duration such as `"1s"`, `"250ms"`, `"5m"`, `"1.5h"` or `"2d"` into nanoseconds.
///
/// Accepted units: `ns`, `us`, `ms`, `s`, `m`, `h`, `d`. Whitespace between the
/// number and the unit is allowed, case is ignored.
pub fn parse_duration(text: &str) -> Result<Duration> {
    let normalized = text.trim().to_ascii_lowercase();
    let split = normalized
        .find(|c: char| !(c.is_ascii_digit() || c == '.'))
        .ok_or_else(|| invalid_duration(text))?;
    let (number, unit) = normalized.split_at(split);
    if number.is_empty() {
        return Err(invalid_duration(text));
    }

    let value: f64 = number.parse().map_err(|_| invalid_duration(text))?;
    let scale: f64 = match unit.trim() {
        "ns" => 1.0,
        "us" => 1e3,
        "ms" => 1e6,
        "s" => 1e9,
        "m" => 60.0 * 1e9,
        "h" => 3_600.0 * 1e9,
        "d" => 86_400.0 * 1e9,
        _ => return Err(invalid_duration(text)),
    };

    let nanos = value * scale;
    if !nanos.is_finite() || nanos > i64::MAX as f64 {
        return Err(invalid_duration(text));
    }
    Ok(nanos.round() as Duration)
}

fn invalid_duration(text: &str) -> Error {
    Error::InvalidConfiguration(format!(
        "invalid duration '{text}': expected a number followed by ns/us/ms/s/m/h/d (e.g. '1s', '5m', '1h')"
    ))
}

/// Serde helper: a duration given either as integer ticks or as a duration string.
pub fn deserialize_duration<'de, D>(deserializer: D) -> std::result::Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Ticks(i64),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Ticks(ticks) => Ok(ticks),
        Raw::Text(text) => parse_duration(&text).map_err(serde::de::Error::custom),
    }
}
