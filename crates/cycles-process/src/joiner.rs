//! Associate arbitrary events with their owning cycle and summarize per cycle

use crate::golden::{rank_golden_cycles, GoldenCriteria, GoldenCycle};
use crate::interval_index::{IntervalIndex, Lookup};
use cycles_core::{Cycle, CycleId, Duration, Error, Event, IncompletePolicy, Result, Timestamp, Value};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, info, instrument, warn};

/// Events grouped by owning cycle
#[derive(Debug, Clone, Default)]
pub struct CycleGroups<'a> {
    groups: BTreeMap<CycleId, Vec<&'a Event>>,
    unassigned: Vec<&'a Event>,
    ambiguous: usize,
}

impl<'a> CycleGroups<'a> {
    /// Events of one cycle, in input order
    pub fn get(&self, cycle_id: CycleId) -> &[&'a Event] {
        self.groups.get(&cycle_id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// `(cycle_id, events)` in ascending id order
    pub fn iter(&self) -> impl Iterator<Item = (CycleId, &[&'a Event])> {
        self.groups.iter().map(|(&id, events)| (id, events.as_slice()))
    }

    /// Number of cycles with at least one event
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Events no cycle contains
    pub fn unassigned(&self) -> &[&'a Event] {
        &self.unassigned
    }

    /// Events that more than one cycle contains
    pub fn ambiguous(&self) -> usize {
        self.ambiguous
    }

    pub fn assigned(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }
}

/// Summary of one signal within one cycle
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SignalAggregate {
    Numeric {
        count: usize,
        min: f64,
        mean: f64,
        max: f64,
        /// Sample standard deviation, `None` below two values
        std: Option<f64>,
    },
    Categorical {
        count: usize,
        first: String,
        last: String,
    },
}

impl SignalAggregate {
    fn from_values(values: &[&Value]) -> Option<Self> {
        let first = values.first()?;
        let last = values.last()?;
        if values.iter().all(|v| v.is_numeric()) {
            let numbers: Vec<f64> = values
                .iter()
                .filter_map(|v| v.as_f64())
                .filter(|x| !x.is_nan())
                .collect();
            if let Some(summary) = NumericSummary::of(&numbers) {
                return Some(SignalAggregate::Numeric {
                    count: summary.count,
                    min: summary.min,
                    mean: summary.mean,
                    max: summary.max,
                    std: summary.std,
                });
            }
        }
        Some(SignalAggregate::Categorical {
            count: values.len(),
            first: label(first),
            last: label(last),
        })
    }

    pub fn count(&self) -> usize {
        match self {
            SignalAggregate::Numeric { count, .. } | SignalAggregate::Categorical { count, .. } => {
                *count
            }
        }
    }

    pub fn mean(&self) -> Option<f64> {
        match self {
            SignalAggregate::Numeric { mean, .. } => Some(*mean),
            SignalAggregate::Categorical { .. } => None,
        }
    }
}

fn label(value: &Value) -> String {
    match value {
        Value::Str(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Per-cycle statistics row
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CycleAggregates {
    pub cycle_id: CycleId,
    pub start_time: Timestamp,
    pub end_time: Option<Timestamp>,
    pub duration: Option<Duration>,
    pub event_count: usize,
    /// Keyed by signal id
    pub signals: BTreeMap<String, SignalAggregate>,
}

impl CycleAggregates {
    pub fn distinct_signals(&self) -> usize {
        self.signals.len()
    }

    pub fn signal(&self, signal_id: &str) -> Option<&SignalAggregate> {
        self.signals.get(signal_id)
    }
}

/// One cycle compared against a reference cycle on one signal
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReferenceComparison {
    pub cycle_id: CycleId,
    pub is_reference: bool,
    pub mean: f64,
    pub std: Option<f64>,
    pub deviation_from_reference: f64,
    /// `None` when the reference mean is zero
    pub deviation_pct: Option<f64>,
    /// `None` when the reference std is zero or undefined
    pub variability_ratio: Option<f64>,
}

/// Count, extremes, mean and sample std of a numeric sample
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct NumericSummary {
    pub count: usize,
    pub min: f64,
    pub mean: f64,
    pub max: f64,
    pub std: Option<f64>,
}

impl NumericSummary {
    pub(crate) fn of(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        let n = values.len() as f64;
        let mean = values.iter().sum::<f64>() / n;
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let std = (values.len() > 1).then(|| {
            let ss: f64 = values.iter().map(|x| (x - mean).powi(2)).sum();
            (ss / (n - 1.0)).sqrt()
        });
        Some(Self {
            count: values.len(),
            min,
            mean,
            max,
            std,
        })
    }
}

/// Finite numeric values of `signal_id` among `events`
pub(crate) fn numeric_values(events: &[&Event], signal_id: &str) -> Vec<f64> {
    events
        .iter()
        .filter(|e| e.signal_id == signal_id)
        .filter_map(|e| e.value.as_f64())
        .filter(|x| !x.is_nan())
        .collect()
}

/// Joins value events to a cycle table through an [`IntervalIndex`]
#[derive(Debug, Clone)]
pub struct CycleDataJoiner {
    cycles: Vec<Cycle>,
    index: IntervalIndex,
}

impl CycleDataJoiner {
    /// Joiner over `cycles`, indexing complete cycles only
    pub fn new(cycles: Vec<Cycle>) -> Self {
        Self::with_policy(cycles, IncompletePolicy::Exclude)
    }

    pub fn with_policy(cycles: Vec<Cycle>, policy: IncompletePolicy) -> Self {
        let index = IntervalIndex::with_policy(&cycles, policy);
        Self { cycles, index }
    }

    /// Joiner reusing an index built over the same cycles
    pub fn with_index(cycles: Vec<Cycle>, index: IntervalIndex) -> Self {
        Self { cycles, index }
    }

    pub fn cycles(&self) -> &[Cycle] {
        &self.cycles
    }

    pub fn index(&self) -> &IntervalIndex {
        &self.index
    }

    fn cycle(&self, cycle_id: CycleId) -> Option<&Cycle> {
        self.cycles.iter().find(|c| c.cycle_id == cycle_id)
    }

    /// Lookup result for every event, in input order
    pub fn assign(&self, events: &[Event]) -> Vec<Lookup> {
        events
            .iter()
            .map(|e| self.index.lookup_detailed(e.timestamp))
            .collect()
    }

    /// Group events by owning cycle
    #[instrument(skip(self, events), fields(events = events.len()))]
    pub fn split_by_cycle<'a>(&self, events: &'a [Event]) -> CycleGroups<'a> {
        let mut groups = CycleGroups::default();
        for event in events {
            match self.index.lookup_detailed(event.timestamp) {
                Lookup::Assigned {
                    cycle_id,
                    ambiguous,
                } => {
                    if ambiguous {
                        groups.ambiguous += 1;
                    }
                    groups.groups.entry(cycle_id).or_default().push(event);
                }
                Lookup::Unassigned => groups.unassigned.push(event),
            }
        }
        if groups.ambiguous > 0 {
            warn!(
                ambiguous = groups.ambiguous,
                "events fall into more than one cycle; earliest cycle used"
            );
        }
        debug!(
            cycles = groups.len(),
            assigned = groups.assigned(),
            unassigned = groups.unassigned.len(),
            "grouped events by cycle"
        );
        groups
    }

    /// One statistics row per cycle of the table, in table order
    #[instrument(skip(self, events), fields(events = events.len()))]
    pub fn aggregate(&self, events: &[Event]) -> Vec<CycleAggregates> {
        let groups = self.split_by_cycle(events);
        let rows: Vec<CycleAggregates> = self
            .cycles
            .iter()
            .map(|c| aggregate_cycle(c, groups.get(c.cycle_id)))
            .collect();
        info!(cycles = rows.len(), "computed cycle statistics");
        rows
    }

    /// Same result as [`CycleDataJoiner::aggregate`], computed on the rayon pool
    #[cfg(feature = "parallel")]
    #[instrument(skip(self, events), fields(events = events.len()))]
    pub fn aggregate_parallel(&self, events: &[Event]) -> Vec<CycleAggregates> {
        use rayon::prelude::*;

        let groups = self.split_by_cycle(events);
        self.cycles
            .par_iter()
            .map(|c| aggregate_cycle(c, groups.get(c.cycle_id)))
            .collect()
    }

    /// Compare every cycle with data on `signal_id` against `reference_id`
    #[instrument(skip(self, events), fields(events = events.len()))]
    pub fn compare_to_reference(
        &self,
        events: &[Event],
        reference_id: CycleId,
        signal_id: &str,
    ) -> Result<Vec<ReferenceComparison>> {
        if self.cycle(reference_id).is_none() {
            return Err(Error::InvalidParameter(format!(
                "reference cycle {reference_id} is not in the cycle table"
            )));
        }
        let groups = self.split_by_cycle(events);
        let reference = NumericSummary::of(&numeric_values(groups.get(reference_id), signal_id))
            .ok_or_else(|| {
                Error::InvalidParameter(format!(
                    "reference cycle {reference_id} has no numeric values for '{signal_id}'"
                ))
            })?;

        let comparisons: Vec<ReferenceComparison> = self
            .cycles
            .iter()
            .filter_map(|c| {
                let summary = NumericSummary::of(&numeric_values(groups.get(c.cycle_id), signal_id))?;
                let deviation = summary.mean - reference.mean;
                Some(ReferenceComparison {
                    cycle_id: c.cycle_id,
                    is_reference: c.cycle_id == reference_id,
                    mean: summary.mean,
                    std: summary.std,
                    deviation_from_reference: deviation,
                    deviation_pct: (reference.mean != 0.0)
                        .then(|| deviation / reference.mean * 100.0),
                    variability_ratio: match (summary.std, reference.std) {
                        (Some(s), Some(r)) if r != 0.0 => Some(s / r),
                        _ => None,
                    },
                })
            })
            .collect();
        info!(
            compared = comparisons.len(),
            reference_id, "compared cycles against reference"
        );
        Ok(comparisons)
    }

    /// Rank the best cycles on one signal
    pub fn golden_cycles(&self, events: &[Event], criteria: &GoldenCriteria) -> Result<Vec<GoldenCycle>> {
        let groups = self.split_by_cycle(events);
        rank_golden_cycles(&self.cycles, &groups, criteria)
    }
}

fn aggregate_cycle(cycle: &Cycle, events: &[&Event]) -> CycleAggregates {
    let mut by_signal: BTreeMap<&str, Vec<&Value>> = BTreeMap::new();
    for event in events {
        by_signal
            .entry(event.signal_id.as_str())
            .or_default()
            .push(&event.value);
    }
    let signals = by_signal
        .into_iter()
        .filter_map(|(signal, values)| {
            SignalAggregate::from_values(&values).map(|agg| (signal.to_string(), agg))
        })
        .collect();
    CycleAggregates {
        cycle_id: cycle.cycle_id,
        start_time: cycle.start_time,
        end_time: cycle.end_time,
        duration: cycle.span(),
        event_count: events.len(),
        signals,
    }
}

/// Signals seen across a set of aggregate rows
pub fn signal_ids(rows: &[CycleAggregates]) -> BTreeSet<&str> {
    rows.iter()
        .flat_map(|r| r.signals.keys().map(String::as_str))
        .collect()
}
