//! Boundary detection and cycle assembly
//!
//! This crate turns a time-ordered stream of typed signal events into a cycle
//! table.
//!
//! # Strategies
//!
//! ## Paired (start matched with a later end)
//! - **PersistentState**: rising edge starts, falling edge ends
//! - **TriggerEdge**: each pulse ends the previous cycle and starts the next
//! - **SeparateStartEnd**: rising edges of two different signals
//! - **StepSequence**: an integer step entering `start_step` / `end_step`
//!
//! ## Contiguous (each cycle ends at the next start)
//! - **StateChange**: any change of a discrete value
//! - **ValueChangeThreshold**: a numeric change larger than a threshold
//! - **PersistentState** with `close_on_next_start`
//!
//! Assembly never drops a start marker: a start without an end becomes an
//! incomplete cycle and is counted in [`AssemblyStats::unmatched_starts`].
//!
//! # Usage
//!
//! ```rust
//! use cycles_core::{CycleConfig, Event, Strategy};
//! use cycles_extract::CycleExtractor;
//!
//! let mut config = CycleConfig::new(Strategy::ValueChangeThreshold { signal: "temp".into() });
//! config.value_change_threshold = 2.0;
//!
//! let events: Vec<Event> = [10.0, 10.5, 13.0, 13.4, 20.0]
//!     .iter()
//!     .enumerate()
//!     .map(|(t, &v)| Event::float(t as i64, "temp", v))
//!     .collect();
//!
//! let extraction = CycleExtractor::new(config).unwrap().extract(&events).unwrap();
//! let starts: Vec<i64> = extraction.cycles.iter().map(|c| c.start_time).collect();
//! assert_eq!(starts, vec![0, 2, 4]);
//! ```

pub mod assembler;
pub mod detector;
pub mod extractor;
pub mod stats;
pub mod strategies;
pub mod suggest;
pub mod traits;

pub use assembler::{CycleAssembler, Extraction};
pub use detector::BoundaryDetector;
pub use extractor::CycleExtractor;
pub use stats::{AssemblyStats, AssemblyWarning};
pub use strategies::{
    PersistentStateDetector, SeparateStartEndDetector, StateChangeDetector, StepSequenceDetector,
    TriggerEdgeDetector, ValueChangeDetector,
};
pub use suggest::{suggest_strategies, DataCharacteristics, Recommendation, StrategySuggestions};
pub use traits::BoundaryStrategy;
