//! Statistics and warnings produced by one assembly run

use cycles_core::{CycleId, StrategyKind, Timestamp};
use serde::Serialize;
use std::fmt;
use uuid::Uuid;

/// A non-fatal data-quality finding of the assembler
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssemblyWarning {
    /// An end marker with no open start before it
    UnmatchedEnd { timestamp: Timestamp, signal_id: String },
    /// A start that never found a later end
    UnmatchedStart { cycle_id: CycleId, timestamp: Timestamp },
    /// End markers that contiguous assembly does not use
    IgnoredEnds { count: usize },
    /// The supplied dataset end lies before the last start, so it cannot close it
    DatasetEndBeforeStart { dataset_end: Timestamp, start: Timestamp },
}

impl fmt::Display for AssemblyWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssemblyWarning::UnmatchedEnd {
                timestamp,
                signal_id,
            } => write!(
                f,
                "unmatched end at {timestamp} on signal '{signal_id}': no open start precedes it"
            ),
            AssemblyWarning::UnmatchedStart {
                cycle_id,
                timestamp,
            } => write!(
                f,
                "start at {timestamp} has no matching end; cycle {cycle_id} kept as incomplete"
            ),
            AssemblyWarning::IgnoredEnds { count } => write!(
                f,
                "{count} end marker(s) ignored by contiguous assembly"
            ),
            AssemblyWarning::DatasetEndBeforeStart { dataset_end, start } => write!(
                f,
                "dataset end {dataset_end} precedes the last start {start}; last cycle kept as incomplete"
            ),
        }
    }
}

/// Immutable summary of one assembly call
#[derive(Debug, Clone, Serialize)]
pub struct AssemblyStats {
    run_id: Uuid,
    strategy: StrategyKind,
    total_starts: usize,
    total_ends: usize,
    complete_cycles: usize,
    incomplete_cycles: usize,
    unmatched_starts: usize,
    unmatched_ends: usize,
    warnings: Vec<String>,
}

impl AssemblyStats {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        strategy: StrategyKind,
        total_starts: usize,
        total_ends: usize,
        complete_cycles: usize,
        incomplete_cycles: usize,
        unmatched_starts: usize,
        unmatched_ends: usize,
        warnings: &[AssemblyWarning],
    ) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            strategy,
            total_starts,
            total_ends,
            complete_cycles,
            incomplete_cycles,
            unmatched_starts,
            unmatched_ends,
            warnings: warnings.iter().map(ToString::to_string).collect(),
        }
    }

    /// Unique id of the assembly run
    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    pub fn strategy(&self) -> StrategyKind {
        self.strategy
    }

    pub fn total_starts(&self) -> usize {
        self.total_starts
    }

    pub fn total_ends(&self) -> usize {
        self.total_ends
    }

    pub fn complete_cycles(&self) -> usize {
        self.complete_cycles
    }

    pub fn incomplete_cycles(&self) -> usize {
        self.incomplete_cycles
    }

    pub fn unmatched_starts(&self) -> usize {
        self.unmatched_starts
    }

    pub fn unmatched_ends(&self) -> usize {
        self.unmatched_ends
    }

    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// Total number of cycles in the table
    pub fn total_cycles(&self) -> usize {
        self.complete_cycles + self.incomplete_cycles
    }

    /// `complete / (complete + incomplete)`, 0.0 when there are no cycles
    pub fn success_rate(&self) -> f64 {
        match self.total_cycles() {
            0 => 0.0,
            total => self.complete_cycles as f64 / total as f64,
        }
    }
}

impl fmt::Display for AssemblyStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Cycle Assembly ({}):", self.strategy)?;
        writeln!(f, "  Run: {}", self.run_id)?;
        writeln!(f, "  Starts / ends: {} / {}", self.total_starts, self.total_ends)?;
        writeln!(
            f,
            "  Complete / incomplete: {} / {}",
            self.complete_cycles, self.incomplete_cycles
        )?;
        writeln!(
            f,
            "  Unmatched starts / ends: {} / {}",
            self.unmatched_starts, self.unmatched_ends
        )?;
        writeln!(f, "  Success rate: {:.1}%", self.success_rate() * 100.0)?;
        for warning in &self.warnings {
            writeln!(f, "  warning: {warning}")?;
        }
        Ok(())
    }
}
