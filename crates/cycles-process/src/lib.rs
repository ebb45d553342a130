//! Processing of assembled cycle tables
//!
//! Stages consume the cycle table read-only and return new annotated copies:
//!
//! - [`CycleValidator`]: duration bounds, never removes rows
//! - [`OverlapResolver`]: overlap detection and policy-driven pruning
//! - [`IntervalIndex`]: point lookup of the cycle owning a timestamp
//! - [`CycleDataJoiner`]: grouping, per-cycle aggregates, reference
//!   comparison and golden-cycle ranking
//! - [`CyclePipeline`]: all of the above driven by one [`cycles_core::CycleConfig`]
//!
//! With the `parallel` feature, validation, batch lookup and aggregation have
//! rayon variants that return the same results as the sequential paths.
//!
//! # Example
//!
//! ```rust
//! use cycles_core::{Cycle, OverlapPolicy};
//! use cycles_process::{IntervalIndex, OverlapResolver};
//!
//! let cycles = vec![Cycle::complete(0, 0, 10), Cycle::complete(1, 5, 15)];
//! let resolved = OverlapResolver::new(OverlapPolicy::KeepLongest).resolve(&cycles);
//! assert_eq!(resolved.report.dropped, vec![1]);
//!
//! let index = IntervalIndex::new(&resolved.cycles);
//! assert_eq!(index.lookup(12), None);
//! assert_eq!(index.lookup(7), Some(0));
//! ```

pub mod golden;
pub mod interval_index;
pub mod joiner;
pub mod overlap;
pub mod pipeline;
pub mod validator;

pub use golden::{rank_golden_cycles, GoldenCriteria, GoldenCycle, GoldenMethod};
pub use interval_index::{IndexEntry, IntervalIndex, Lookup, OPEN_END};
pub use joiner::{signal_ids, CycleAggregates, CycleDataJoiner, CycleGroups, ReferenceComparison, SignalAggregate};
pub use overlap::{detect_overlaps, resolve_overlaps, OverlapReport, OverlapResolution, OverlapResolver};
pub use pipeline::{CyclePipeline, PipelineOutput};
pub use validator::{validate, CycleValidator, Validation, ValidationReport};
