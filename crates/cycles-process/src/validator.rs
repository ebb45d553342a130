//! Duration validation of assembled cycles
//!
//! Validation annotates; it never removes a row. Each call returns new
//! annotated copies, so running it twice with the same bounds gives the same
//! table.

use cycles_core::{
    validate_duration_bounds, Cycle, CycleConfig, CycleState, Duration, Result, ValidationIssue,
};
use serde::Serialize;
use std::fmt;
use tracing::{info, instrument, warn};

/// Counts of each validation outcome
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub total: usize,
    pub valid: usize,
    pub incomplete: usize,
    pub too_short: usize,
    pub too_long: usize,
}

impl ValidationReport {
    /// Tally the annotations of an already validated table
    pub fn from_cycles(cycles: &[Cycle]) -> Self {
        let mut report = ValidationReport {
            total: cycles.len(),
            ..Default::default()
        };
        for cycle in cycles {
            match (cycle.is_valid, cycle.validation_issue) {
                (Some(true), _) => report.valid += 1,
                (_, Some(ValidationIssue::IncompleteCycle)) => report.incomplete += 1,
                (_, Some(ValidationIssue::TooShort)) => report.too_short += 1,
                (_, Some(ValidationIssue::TooLong)) => report.too_long += 1,
                _ => {}
            }
        }
        report
    }

    pub fn invalid(&self) -> usize {
        self.incomplete + self.too_short + self.too_long
    }

    /// Fraction of valid cycles, 0.0 for an empty table
    pub fn valid_rate(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.valid as f64 / self.total as f64
        }
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} of {} cycles valid ({} incomplete, {} too short, {} too long)",
            self.valid, self.total, self.incomplete, self.too_short, self.too_long
        )
    }
}

/// Annotated cycle table and its summary
#[derive(Debug, Clone)]
pub struct Validation {
    pub cycles: Vec<Cycle>,
    pub report: ValidationReport,
}

/// Checks cycle durations against `[min_duration, max_duration]`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CycleValidator {
    min_duration: Duration,
    max_duration: Duration,
}

impl CycleValidator {
    /// Validator for the given bounds; `min_duration > max_duration` is rejected
    pub fn new(min_duration: Duration, max_duration: Duration) -> Result<Self> {
        validate_duration_bounds(min_duration, max_duration)?;
        Ok(Self {
            min_duration,
            max_duration,
        })
    }

    pub fn from_config(config: &CycleConfig) -> Result<Self> {
        Self::new(config.min_duration, config.max_duration)
    }

    pub fn min_duration(&self) -> Duration {
        self.min_duration
    }

    pub fn max_duration(&self) -> Duration {
        self.max_duration
    }

    /// Annotated copy of one cycle
    pub fn annotate(&self, cycle: &Cycle) -> Cycle {
        let mut out = cycle.clone();
        match cycle.state() {
            CycleState::Incomplete { .. } => {
                out.is_valid = Some(false);
                out.validation_issue = Some(ValidationIssue::IncompleteCycle);
            }
            CycleState::Complete { start, end } => {
                let duration = end - start;
                out.duration = Some(duration);
                let issue = if duration < self.min_duration {
                    Some(ValidationIssue::TooShort)
                } else if duration > self.max_duration {
                    Some(ValidationIssue::TooLong)
                } else {
                    None
                };
                out.is_valid = Some(issue.is_none());
                out.validation_issue = issue;
            }
        }
        out
    }

    /// Annotate every cycle, preserving order and count
    #[instrument(skip(self, cycles), fields(cycles = cycles.len()))]
    pub fn validate(&self, cycles: &[Cycle]) -> Validation {
        let annotated: Vec<Cycle> = cycles.iter().map(|c| self.annotate(c)).collect();
        self.finish(annotated)
    }

    /// Same result as [`CycleValidator::validate`], computed on the rayon pool
    #[cfg(feature = "parallel")]
    #[instrument(skip(self, cycles), fields(cycles = cycles.len()))]
    pub fn validate_parallel(&self, cycles: &[Cycle]) -> Validation {
        use rayon::prelude::*;

        let annotated: Vec<Cycle> = cycles.par_iter().map(|c| self.annotate(c)).collect();
        self.finish(annotated)
    }

    fn finish(&self, cycles: Vec<Cycle>) -> Validation {
        let report = ValidationReport::from_cycles(&cycles);
        if report.invalid() > 0 {
            warn!(
                incomplete = report.incomplete,
                too_short = report.too_short,
                too_long = report.too_long,
                "cycles failed validation"
            );
        }
        info!(valid = report.valid, total = report.total, "validated cycles");
        Validation { cycles, report }
    }
}

/// Annotate `cycles` against `[min_duration, max_duration]`
pub fn validate(cycles: &[Cycle], min_duration: Duration, max_duration: Duration) -> Result<Vec<Cycle>> {
    Ok(CycleValidator::new(min_duration, max_duration)?
        .validate(cycles)
        .cycles)
}
