//! Cycle assembly: turn an ordered marker sequence into the cycle table
//!
//! Two modes exist. Contiguous strategies partition the timeline, so each
//! cycle ends where the next one starts. Paired strategies match every start
//! with the first later end in a single two-cursor scan. In both modes every
//! start marker becomes exactly one cycle, complete or incomplete.

use crate::stats::{AssemblyStats, AssemblyWarning};
use cycles_core::{
    BoundaryMarker, Cycle, CycleConfig, CycleId, CycleState, Error, Result, StrategyKind,
    Timestamp,
};
use tracing::{debug, info, instrument, warn};

/// The cycle table together with the statistics of the run that built it
#[derive(Debug, Clone)]
pub struct Extraction {
    pub cycles: Vec<Cycle>,
    pub stats: AssemblyStats,
}

/// Matches start markers with end markers
#[derive(Debug, Clone)]
pub struct CycleAssembler {
    strategy: StrategyKind,
    contiguous: bool,
    dataset_end: Option<Timestamp>,
    first_cycle_id: CycleId,
}

impl CycleAssembler {
    /// Assembler for the strategy and bounds in `config`
    pub fn new(config: &CycleConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            strategy: config.strategy.kind(),
            contiguous: config.strategy.is_contiguous(),
            dataset_end: config.dataset_end,
            first_cycle_id: config.first_cycle_id,
        })
    }

    /// Assembler where each cycle ends at the next start
    pub fn contiguous(strategy: StrategyKind) -> Self {
        Self {
            strategy,
            contiguous: true,
            dataset_end: None,
            first_cycle_id: 0,
        }
    }

    /// Assembler that pairs starts with ends
    pub fn paired(strategy: StrategyKind) -> Self {
        Self {
            strategy,
            contiguous: false,
            dataset_end: None,
            first_cycle_id: 0,
        }
    }

    /// Close the last contiguous cycle at `dataset_end`
    pub fn with_dataset_end(mut self, dataset_end: Timestamp) -> Self {
        self.dataset_end = Some(dataset_end);
        self
    }

    pub fn with_first_cycle_id(mut self, first_cycle_id: CycleId) -> Self {
        self.first_cycle_id = first_cycle_id;
        self
    }

    pub fn is_contiguous(&self) -> bool {
        self.contiguous
    }

    /// Build the cycle table from markers ordered by `(timestamp, kind)`
    #[instrument(skip(self, markers), fields(strategy = %self.strategy, markers = markers.len()))]
    pub fn assemble(&self, markers: &[BoundaryMarker]) -> Result<Extraction> {
        check_marker_order(markers)?;

        let starts: Vec<&BoundaryMarker> = markers.iter().filter(|m| m.is_start()).collect();
        let ends: Vec<&BoundaryMarker> = markers.iter().filter(|m| !m.is_start()).collect();

        let mut warnings = Vec::new();
        let (states, unmatched_ends) = if self.contiguous {
            if !ends.is_empty() {
                warnings.push(AssemblyWarning::IgnoredEnds { count: ends.len() });
            }
            (self.partition(&starts, &mut warnings), ends.len())
        } else {
            pair(&starts, &ends, &mut warnings)
        };

        check_id_range(self.first_cycle_id, starts.len())?;
        let cycles: Vec<Cycle> = states
            .into_iter()
            .enumerate()
            .map(|(i, state)| Cycle::from_state(self.first_cycle_id + i as CycleId, state))
            .collect();

        if !self.contiguous {
            for cycle in cycles.iter().filter(|c| !c.is_complete) {
                warnings.push(AssemblyWarning::UnmatchedStart {
                    cycle_id: cycle.cycle_id,
                    timestamp: cycle.start_time,
                });
            }
        }

        let complete = cycles.iter().filter(|c| c.is_complete).count();
        let incomplete = cycles.len() - complete;
        let stats = AssemblyStats::new(
            self.strategy,
            starts.len(),
            ends.len(),
            complete,
            incomplete,
            incomplete,
            unmatched_ends,
            &warnings,
        );
        debug_assert_eq!(stats.total_starts(), stats.total_cycles());

        if !self.contiguous && (incomplete > 0 || unmatched_ends > 0) {
            warn!(
                unmatched_starts = incomplete,
                unmatched_ends, "unmatched boundaries during assembly"
            );
        }
        info!(
            cycles = cycles.len(),
            complete,
            incomplete,
            success_rate = stats.success_rate(),
            "assembled cycles"
        );

        Ok(Extraction { cycles, stats })
    }

    fn partition(
        &self,
        starts: &[&BoundaryMarker],
        warnings: &mut Vec<AssemblyWarning>,
    ) -> Vec<CycleState> {
        let mut states: Vec<CycleState> = starts
            .windows(2)
            .map(|pair| CycleState::Complete {
                start: pair[0].timestamp,
                end: pair[1].timestamp,
            })
            .collect();

        if let Some(last) = starts.last() {
            let start = last.timestamp;
            let state = match self.dataset_end {
                Some(end) if end >= start => CycleState::Complete { start, end },
                Some(dataset_end) => {
                    warnings.push(AssemblyWarning::DatasetEndBeforeStart { dataset_end, start });
                    CycleState::Incomplete { start }
                }
                None => {
                    debug!(start, "last contiguous cycle left open");
                    CycleState::Incomplete { start }
                }
            };
            states.push(state);
        }
        states
    }
}

/// Two-cursor match of starts with the first strictly later end.
///
/// Returns one state per start, in start order, and the number of ends that
/// matched nothing.
fn pair(
    starts: &[&BoundaryMarker],
    ends: &[&BoundaryMarker],
    warnings: &mut Vec<AssemblyWarning>,
) -> (Vec<CycleState>, usize) {
    let mut states = Vec::with_capacity(starts.len());
    let mut unmatched_ends = 0;
    let mut s = 0;
    let mut e = 0;

    while s < starts.len() || e < ends.len() {
        match (starts.get(s), ends.get(e)) {
            (Some(start), Some(end)) if end.timestamp <= start.timestamp => {
                // Every earlier start is already matched
                warnings.push(unmatched_end(end));
                unmatched_ends += 1;
                e += 1;
            }
            (Some(start), Some(end)) => {
                states.push(CycleState::Complete {
                    start: start.timestamp,
                    end: end.timestamp,
                });
                s += 1;
                e += 1;
            }
            (Some(start), None) => {
                states.push(CycleState::Incomplete {
                    start: start.timestamp,
                });
                s += 1;
            }
            (None, Some(end)) => {
                warnings.push(unmatched_end(end));
                unmatched_ends += 1;
                e += 1;
            }
            (None, None) => break,
        }
    }
    (states, unmatched_ends)
}

fn unmatched_end(end: &BoundaryMarker) -> AssemblyWarning {
    AssemblyWarning::UnmatchedEnd {
        timestamp: end.timestamp,
        signal_id: end.signal_id.clone(),
    }
}

/// Ids `first..first + count` must all fit in a `CycleId`
fn check_id_range(first: CycleId, count: usize) -> Result<()> {
    let Some(last_offset) = count.checked_sub(1) else {
        return Ok(());
    };
    match CycleId::try_from(last_offset)
        .ok()
        .and_then(|offset| first.checked_add(offset))
    {
        Some(_) => Ok(()),
        None => Err(Error::InvalidConfiguration(format!(
            "first_cycle_id {first} leaves no room for {count} cycle ids"
        ))),
    }
}

fn check_marker_order(markers: &[BoundaryMarker]) -> Result<()> {
    for (i, pair) in markers.windows(2).enumerate() {
        if pair[1].order_key() < pair[0].order_key() {
            return Err(Error::MalformedInput(format!(
                "boundary markers out of order at position {}: {} follows {}",
                i + 1,
                pair[1],
                pair[0]
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use cycles_core::MarkerKind;

    fn markers(layout: &[(Timestamp, MarkerKind)]) -> Vec<BoundaryMarker> {
        layout.iter()
            .map(|&(t, kind)| match kind {
                MarkerKind::Start => BoundaryMarker::start(t, "s"),
                MarkerKind::End => BoundaryMarker::end(t, "e"),
            })
            .collect()
    }

    #[test]
    fn test_paired_with_trailing_start() {
        use MarkerKind::*;
        let input = markers(&[(0, Start), (8, End), (10, Start), (22, End), (25, Start)]);
        let out = CycleAssembler::paired(StrategyKind::PersistentState)
            .assemble(&input)
            .unwrap();
        assert_eq!(out.cycles.len(), 3);
        assert_eq!(out.cycles[0].state(), CycleState::Complete { start: 0, end: 8 });
        assert_eq!(out.cycles[1].state(), CycleState::Complete { start: 10, end: 22 });
        assert_eq!(out.cycles[2].state(), CycleState::Incomplete { start: 25 });
        assert_eq!(out.stats.unmatched_starts(), 1);
        assert_eq!(out.stats.unmatched_ends(), 0);
    }

    #[test]
    fn test_leading_and_trailing_ends_are_unmatched() {
        use MarkerKind::*;
        let input = markers(&[(1, End), (2, Start), (5, End), (6, End)]);
        let out = CycleAssembler::paired(StrategyKind::SeparateStartEnd)
            .assemble(&input)
            .unwrap();
        assert_eq!(out.cycles.len(), 1);
        assert_eq!(out.cycles[0].state(), CycleState::Complete { start: 2, end: 5 });
        assert_eq!(out.stats.unmatched_ends(), 2);
        assert_eq!(out.stats.warnings().len(), 2);
    }

    #[test]
    fn test_end_at_start_timestamp_does_not_close_it() {
        use MarkerKind::*;
        let input = markers(&[(5, End), (5, Start), (9, End)]);
        let out = CycleAssembler::paired(StrategyKind::TriggerEdge)
            .assemble(&input)
            .unwrap();
        assert_eq!(out.cycles.len(), 1);
        assert_eq!(out.cycles[0].end_time, Some(9));
        assert_eq!(out.stats.unmatched_ends(), 1);
    }

    #[test]
    fn test_starts_without_ends_all_kept() {
        use MarkerKind::*;
        let input = markers(&[(0, Start), (3, Start), (7, Start)]);
        let out = CycleAssembler::paired(StrategyKind::StepSequence)
            .assemble(&input)
            .unwrap();
        assert_eq!(out.cycles.len(), 3);
        assert!(out.cycles.iter().all(|c| !c.is_complete));
        assert_eq!(out.stats.unmatched_starts(), 3);
        assert_eq!(out.stats.success_rate(), 0.0);
    }

    #[test]
    fn test_contiguous_partition_and_dataset_end() {
        use MarkerKind::*;
        let input = markers(&[(0, Start), (4, Start), (9, Start)]);
        let open = CycleAssembler::contiguous(StrategyKind::StateChange)
            .assemble(&input)
            .unwrap();
        assert_eq!(open.cycles[0].state(), CycleState::Complete { start: 0, end: 4 });
        assert_eq!(open.cycles[1].state(), CycleState::Complete { start: 4, end: 9 });
        assert_eq!(open.cycles[2].state(), CycleState::Incomplete { start: 9 });

        let closed = CycleAssembler::contiguous(StrategyKind::StateChange)
            .with_dataset_end(12)
            .assemble(&input)
            .unwrap();
        assert_eq!(closed.cycles[2].state(), CycleState::Complete { start: 9, end: 12 });
        assert_eq!(closed.stats.incomplete_cycles(), 0);

        let early = CycleAssembler::contiguous(StrategyKind::StateChange)
            .with_dataset_end(5)
            .assemble(&input)
            .unwrap();
        assert!(!early.cycles[2].is_complete);
        assert_eq!(early.stats.warnings().len(), 1);
    }

    #[test]
    fn test_ids_start_at_configured_value() {
        use MarkerKind::*;
        let input = markers(&[(0, Start), (4, Start)]);
        let out = CycleAssembler::contiguous(StrategyKind::ValueChangeThreshold)
            .with_first_cycle_id(100)
            .assemble(&input)
            .unwrap();
        let ids: Vec<CycleId> = out.cycles.iter().map(|c| c.cycle_id).collect();
        assert_eq!(ids, vec![100, 101]);
    }

    #[test]
    fn test_cycle_ids_past_max_rejected() {
        use MarkerKind::*;
        let input = markers(&[(0, Start), (4, Start)]);
        let err = CycleAssembler::contiguous(StrategyKind::StateChange)
            .with_first_cycle_id(CycleId::MAX)
            .assemble(&input)
            .unwrap_err();
        assert!(matches!(err, Error::InvalidConfiguration(_)));

        let out = CycleAssembler::contiguous(StrategyKind::StateChange)
            .with_first_cycle_id(CycleId::MAX - 1)
            .assemble(&input)
            .unwrap();
        let ids: Vec<CycleId> = out.cycles.iter().map(|c| c.cycle_id).collect();
        assert_eq!(ids, vec![CycleId::MAX - 1, CycleId::MAX]);
    }

    #[test]
    fn test_out_of_order_markers_rejected() {
        use MarkerKind::*;
        let input = markers(&[(5, Start), (3, End)]);
        let err = CycleAssembler::paired(StrategyKind::TriggerEdge)
            .assemble(&input)
            .unwrap_err();
        assert!(matches!(err, Error::MalformedInput(_)));
    }

    #[test]
    fn test_empty_markers() {
        let out = CycleAssembler::contiguous(StrategyKind::StateChange)
            .assemble(&[])
            .unwrap();
        assert!(out.cycles.is_empty());
        assert_eq!(out.stats.total_starts(), 0);
    }
}
