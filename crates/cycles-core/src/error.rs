//! Error types for cycle extraction and processing
//!
//! Provides a unified error type for all cycles-* crates. Data-quality findings
//! (unmatched boundaries, incomplete cycles, overlaps) are never errors; they
//! are annotations or warnings on the produced tables.

use crate::time::Timestamp;
use thiserror::Error;

/// Core error type for cycle operations
#[derive(Error, Debug)]
pub enum Error {
    /// Input violates a precondition (unsorted timestamps, missing signal, wrong value type)
    #[error("Malformed input: {0}")]
    MalformedInput(String),

    /// Configuration rejected at construction time
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Invalid parameter passed to an operation
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// IO error (for configuration files)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration could not be (de)serialized
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Timestamps of a signal are not strictly increasing
    pub fn unsorted_timestamps(
        signal_id: &str,
        index: usize,
        previous: Timestamp,
        current: Timestamp,
    ) -> Self {
        Self::MalformedInput(format!(
            "timestamps of signal '{signal_id}' are not strictly increasing at row {index}: {current} follows {previous}"
        ))
    }

    /// A signal required by the configured strategy has no events
    pub fn missing_signal(signal_id: &str, strategy: &str) -> Self {
        Self::MalformedInput(format!(
            "strategy {strategy} requires signal '{signal_id}' but the input contains no events for it"
        ))
    }

    /// A value of the wrong kind for the configured strategy
    pub fn unexpected_value(signal_id: &str, expected: &str, got: &str, timestamp: Timestamp) -> Self {
        Self::MalformedInput(format!(
            "signal '{signal_id}' at {timestamp}: expected {expected} value, got {got}"
        ))
    }
}
