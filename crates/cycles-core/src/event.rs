//! Typed signal events
//!
//! Events arrive from an external source in long format: one row per
//! `(timestamp, signal_id)` carrying exactly one populated value.

use crate::error::{Error, Result};
use crate::time::Timestamp;
use std::collections::HashMap;
use std::fmt;

/// A single observed value
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

/// The kind of a [`Value`], without its payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ValueKind {
    Bool,
    Int,
    Float,
    Str,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueKind::Bool => write!(f, "boolean"),
            ValueKind::Int => write!(f, "integer"),
            ValueKind::Float => write!(f, "float"),
            ValueKind::Str => write!(f, "string"),
        }
    }
}

impl Value {
    /// Kind of this value
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Bool(_) => ValueKind::Bool,
            Value::Int(_) => ValueKind::Int,
            Value::Float(_) => ValueKind::Float,
            Value::Str(_) => ValueKind::Str,
        }
    }

    /// Whether the value is an integer or a float
    pub fn is_numeric(&self) -> bool {
        matches!(self, Value::Int(_) | Value::Float(_))
    }

    /// Numeric view of the value (integers are widened)
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(v) => Some(*v as f64),
            Value::Float(v) => Some(*v),
            _ => None,
        }
    }

    /// Boolean view of the value; integers are treated as `!= 0`
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(v) => Some(*v),
            Value::Int(v) => Some(*v != 0),
            _ => None,
        }
    }

    /// Integer view of the value
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// Whether moving from `previous` to `self` is a significant change.
    ///
    /// Numeric pairs change when `|self - previous| > threshold`, so a
    /// threshold of `0.0` is a strict not-equal test. Booleans, strings and
    /// pairs of different non-numeric kinds change on any difference; the
    /// threshold does not apply to them. A NaN on exactly one side counts as a
    /// change, NaN to NaN does not. Two integers are compared exactly.
    pub fn differs_from(&self, previous: &Value, threshold: f64) -> bool {
        if let (Value::Int(current), Value::Int(prev)) = (self, previous) {
            return current != prev && current.abs_diff(*prev) as f64 > threshold;
        }
        match (self.as_f64(), previous.as_f64()) {
            (Some(current), Some(prev)) => {
                match (current.is_nan(), prev.is_nan()) {
                    (true, true) => false,
                    (true, false) | (false, true) => true,
                    (false, false) => (current - prev).abs() > threshold,
                }
            }
            _ => self != previous,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(v) => write!(f, "{v}"),
            Value::Int(v) => write!(f, "{v}"),
            Value::Float(v) => write!(f, "{v}"),
            Value::Str(v) => write!(f, "{v:?}"),
        }
    }
}

/// One timestamped observation of a signal
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    /// When the value was observed
    pub timestamp: Timestamp,
    /// Signal the value belongs to
    pub signal_id: String,
    /// The observed value
    pub value: Value,
    /// Whether the row was recorded because the value changed
    pub is_delta: bool,
}

impl Event {
    /// Create a new event
    pub fn new(timestamp: Timestamp, signal_id: impl Into<String>, value: Value) -> Self {
        Self {
            timestamp,
            signal_id: signal_id.into(),
            value,
            is_delta: false,
        }
    }

    /// Boolean event
    pub fn bool(timestamp: Timestamp, signal_id: impl Into<String>, value: bool) -> Self {
        Self::new(timestamp, signal_id, Value::Bool(value))
    }

    /// Integer event
    pub fn int(timestamp: Timestamp, signal_id: impl Into<String>, value: i64) -> Self {
        Self::new(timestamp, signal_id, Value::Int(value))
    }

    /// Float event
    pub fn float(timestamp: Timestamp, signal_id: impl Into<String>, value: f64) -> Self {
        Self::new(timestamp, signal_id, Value::Float(value))
    }

    /// String event
    pub fn string(timestamp: Timestamp, signal_id: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(timestamp, signal_id, Value::Str(value.into()))
    }

    /// Mark the event as a delta record
    pub fn with_delta(mut self, is_delta: bool) -> Self {
        self.is_delta = is_delta;
        self
    }
}

/// Events of one signal, in input order
pub fn signal_events<'a>(events: &'a [Event], signal_id: &str) -> Vec<&'a Event> {
    events.iter().filter(|e| e.signal_id == signal_id).collect()
}

/// Check that the timestamps of `signal_id` are strictly increasing.
pub fn ensure_strictly_increasing(events: &[&Event], signal_id: &str) -> Result<()> {
    for (i, pair) in events.windows(2).enumerate() {
        if pair[1].timestamp <= pair[0].timestamp {
            return Err(Error::unsorted_timestamps(
                signal_id,
                i + 1,
                pair[0].timestamp,
                pair[1].timestamp,
            ));
        }
    }
    Ok(())
}

/// Check the ordering precondition for every signal in a mixed event table.
pub fn ensure_sorted_per_signal(events: &[Event]) -> Result<()> {
    let mut last_seen: HashMap<&str, Timestamp> = HashMap::new();
    for (i, event) in events.iter().enumerate() {
        if let Some(previous) = last_seen.insert(event.signal_id.as_str(), event.timestamp) {
            if event.timestamp <= previous {
                return Err(Error::unsorted_timestamps(&event.signal_id, i, previous, event.timestamp));
            }
        }
    }
    Ok(())
}
