//! Core types for cycle extraction
//!
//! This crate holds the in-memory contracts shared by every stage of the
//! cycle engine:
//!
//! - [`Event`] / [`Value`]: the typed, time-ordered input stream
//! - [`BoundaryMarker`]: start/end markers derived from the stream
//! - [`Cycle`] / [`CycleState`]: rows of the cycle table and their annotations
//! - [`CycleConfig`] / [`Strategy`] / [`OverlapPolicy`]: validated configuration
//! - [`Error`] / [`Result`]: the shared error taxonomy
//!
//! # Example
//!
//! ```rust
//! use cycles_core::{CycleConfig, Strategy, parse_duration};
//!
//! let config = CycleConfig::builder(Strategy::StateChange { signal: "mode".into() })
//!     .duration_bounds(parse_duration("5s").unwrap(), parse_duration("2m").unwrap())
//!     .build()
//!     .unwrap();
//! assert!(config.strategy.is_contiguous());
//! ```

pub mod config;
pub mod cycle;
pub mod error;
pub mod event;
pub mod marker;
pub mod time;

pub use config::{
    validate_duration_bounds, CycleConfig, CycleConfigBuilder, IncompletePolicy, OverlapPolicy,
    Strategy, StrategyKind,
};
pub use cycle::{Cycle, CycleId, CycleState, ValidationIssue};
pub use error::{Error, Result};
pub use event::{ensure_sorted_per_signal, ensure_strictly_increasing, signal_events, Event, Value, ValueKind};
pub use marker::{BoundaryMarker, MarkerKind};
pub use time::{parse_duration, Duration, Timestamp, NANOS_PER_SECOND};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
