//! The cycle table row and its annotations

use crate::time::{Duration, Timestamp};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a cycle, unique within one assembly run
pub type CycleId = u64;

/// Outcome of matching a start marker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleState {
    /// Start matched with an end
    Complete { start: Timestamp, end: Timestamp },
    /// Start without a matching end
    Incomplete { start: Timestamp },
}

impl CycleState {
    pub fn start(&self) -> Timestamp {
        match self {
            CycleState::Complete { start, .. } | CycleState::Incomplete { start } => *start,
        }
    }
}

/// Why a cycle failed validation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationIssue {
    IncompleteCycle,
    TooShort,
    TooLong,
}

impl ValidationIssue {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValidationIssue::IncompleteCycle => "incomplete_cycle",
            ValidationIssue::TooShort => "too_short",
            ValidationIssue::TooLong => "too_long",
        }
    }

    /// Parse the snake_case name produced by [`ValidationIssue::as_str`]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "incomplete_cycle" => Some(ValidationIssue::IncompleteCycle),
            "too_short" => Some(ValidationIssue::TooShort),
            "too_long" => Some(ValidationIssue::TooLong),
            _ => None,
        }
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of the cycle table
///
/// `start_time` is always set. A complete cycle has `end_time >= start_time`.
/// The optional annotations stay `None` until the corresponding stage runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cycle {
    pub cycle_id: CycleId,
    pub start_time: Timestamp,
    pub end_time: Option<Timestamp>,
    pub is_complete: bool,
    pub duration: Option<Duration>,
    pub is_valid: Option<bool>,
    pub validation_issue: Option<ValidationIssue>,
    pub has_overlap: Option<bool>,
}

impl Cycle {
    /// Materialize a cycle from a matching outcome
    pub fn from_state(cycle_id: CycleId, state: CycleState) -> Self {
        match state {
            CycleState::Complete { start, end } => Self::complete(cycle_id, start, end),
            CycleState::Incomplete { start } => Self::incomplete(cycle_id, start),
        }
    }

    /// Complete cycle over `[start, end)`
    pub fn complete(cycle_id: CycleId, start: Timestamp, end: Timestamp) -> Self {
        debug_assert!(end >= start, "cycle {cycle_id} ends before it starts");
        Self {
            cycle_id,
            start_time: start,
            end_time: Some(end),
            is_complete: true,
            duration: Some(end - start),
            is_valid: None,
            validation_issue: None,
            has_overlap: None,
        }
    }

    /// Cycle with a start and no end
    pub fn incomplete(cycle_id: CycleId, start: Timestamp) -> Self {
        Self {
            cycle_id,
            start_time: start,
            end_time: None,
            is_complete: false,
            duration: None,
            is_valid: None,
            validation_issue: None,
            has_overlap: None,
        }
    }

    /// The matching outcome this row represents
    pub fn state(&self) -> CycleState {
        match (self.is_complete, self.end_time) {
            (true, Some(end)) => CycleState::Complete {
                start: self.start_time,
                end,
            },
            _ => CycleState::Incomplete {
                start: self.start_time,
            },
        }
    }

    /// `end - start` for complete cycles
    pub fn span(&self) -> Option<Duration> {
        match self.state() {
            CycleState::Complete { start, end } => Some(end - start),
            CycleState::Incomplete { .. } => None,
        }
    }

    /// Whether `t` lies in `[start, end)`; incomplete cycles contain nothing
    pub fn contains(&self, t: Timestamp) -> bool {
        match self.state() {
            CycleState::Complete { start, end } => start <= t && t < end,
            CycleState::Incomplete { .. } => false,
        }
    }

    /// Whether two complete cycles overlap: `a.start < b.end && b.start < a.end`
    ///
    /// Zero-length cycles are empty and overlap nothing.
    pub fn overlaps(&self, other: &Cycle) -> bool {
        match (self.state(), other.state()) {
            (
                CycleState::Complete { start: a0, end: a1 },
                CycleState::Complete { start: b0, end: b1 },
            ) => a0 < a1 && b0 < b1 && a0 < b1 && b0 < a1,
            _ => false,
        }
    }
}

impl fmt::Display for Cycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.end_time {
            Some(end) if self.is_complete => {
                write!(f, "Cycle {} [{}, {})", self.cycle_id, self.start_time, end)
            }
            _ => write!(f, "Cycle {} [{}, ..) incomplete", self.cycle_id, self.start_time),
        }
    }
}
