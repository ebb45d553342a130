//! Cycle segmentation for timestamped signal streams
//!
//! Splits a stream of events into repeating cycles using one of six boundary
//! strategies, assembles and validates the cycle table, resolves overlapping
//! cycles and assigns arbitrary data points to the cycle that owns them.
//!
//! This crate re-exports the workspace crates:
//!
//! - [`core`]: events, cycles, configuration and the error type
//! - [`extract`]: boundary detection, cycle assembly, extraction statistics
//! - [`process`]: validation, overlap resolution, interval index, joining
//! - `polars` (feature `polars`): DataFrame adapters
//!
//! # Example
//!
//! ```rust
//! use cycle_stats::core::{CycleConfig, Event, Strategy};
//! use cycle_stats::process::CyclePipeline;
//!
//! let events = vec![
//!     Event::bool(0, "running", true),
//!     Event::bool(10, "running", false),
//!     Event::bool(20, "running", true),
//!     Event::bool(30, "running", false),
//!     Event::float(5, "force", 2.5),
//! ];
//! let config = CycleConfig::new(Strategy::PersistentState {
//!     signal: "running".into(),
//!     close_on_next_start: false,
//! });
//! let out = CyclePipeline::new(config)?.run(&events)?;
//! assert_eq!(out.cycles.len(), 2);
//! assert_eq!(out.index.lookup(5), Some(0));
//! # Ok::<(), cycle_stats::core::Error>(())
//! ```

pub use cycles_core as core;
pub use cycles_extract as extract;
#[cfg(feature = "polars")]
pub use cycles_polars as polars;
pub use cycles_process as process;

pub use cycles_core::{Cycle, CycleConfig, Error, Event, Result, Strategy};
pub use cycles_extract::CycleExtractor;
pub use cycles_process::{CycleDataJoiner, CyclePipeline, IntervalIndex};
