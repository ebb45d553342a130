//! Polars integration for cycle segmentation
//!
//! Reads long-format event frames into events, writes cycle tables,
//! extraction statistics and per-cycle aggregates back as DataFrames, and
//! tags arbitrary timestamped frames with the cycle that owns each row.
//!
//! # Example
//!
//! ```rust,ignore
//! use cycles_core::{CycleConfig, Strategy};
//! use cycles_polars::{cycles_from_frame, extract_cycles, CycleFrameExt, EventColumns};
//! use cycles_process::IntervalIndex;
//! use polars::prelude::*;
//!
//! let events = df![
//!     "systime" => [0i64, 10, 20, 30],
//!     "uuid" => ["running"; 4],
//!     "value_bool" => [true, false, true, false],
//! ]?;
//! let config = CycleConfig::new(Strategy::PersistentState {
//!     signal: "running".into(),
//!     close_on_next_start: false,
//! });
//! let out = extract_cycles(&events, &config, &EventColumns::default())?;
//! let index = IntervalIndex::new(&cycles_from_frame(&out.cycles)?);
//!
//! let readings = df!["systime" => [5i64, 15, 25]]?;
//! let tagged = readings.assign_cycles(&index, "systime")?;
//! ```

mod assign;
mod columns;
mod error;
mod events;
mod tables;
mod traits;

pub use assign::{extract_cycles, FrameExtraction};
pub use error::{Error, Result};
pub use tables::{aggregates_to_frame, cycles_from_frame, cycles_to_frame, stats_to_frame};
pub use traits::*;
