//! Static dispatch over the closed set of boundary strategies

use crate::strategies::{
    PersistentStateDetector, SeparateStartEndDetector, StateChangeDetector, StepSequenceDetector,
    TriggerEdgeDetector, ValueChangeDetector,
};
use crate::traits::BoundaryStrategy;
use cycles_core::{BoundaryMarker, CycleConfig, Event, Result, Strategy, StrategyKind};
use tracing::{debug, instrument};

/// Boundary detector for one configured strategy
#[derive(Debug, Clone)]
pub enum BoundaryDetector {
    PersistentState(PersistentStateDetector),
    TriggerEdge(TriggerEdgeDetector),
    SeparateStartEnd(SeparateStartEndDetector),
    StepSequence(StepSequenceDetector),
    StateChange(StateChangeDetector),
    ValueChangeThreshold(ValueChangeDetector),
}

impl BoundaryDetector {
    /// Build the detector for `config`, rejecting invalid configurations
    pub fn new(config: &CycleConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::from_strategy(&config.strategy, config.value_change_threshold))
    }

    fn from_strategy(strategy: &Strategy, threshold: f64) -> Self {
        match strategy {
            Strategy::PersistentState {
                signal,
                close_on_next_start,
            } => {
                let detector = PersistentStateDetector::new(signal.as_str());
                BoundaryDetector::PersistentState(if *close_on_next_start {
                    detector.closing_on_next_start()
                } else {
                    detector
                })
            }
            Strategy::TriggerEdge { signal } => {
                BoundaryDetector::TriggerEdge(TriggerEdgeDetector::new(signal.as_str()))
            }
            Strategy::SeparateStartEnd {
                start_signal,
                end_signal,
            } => BoundaryDetector::SeparateStartEnd(SeparateStartEndDetector::new(
                start_signal.as_str(),
                end_signal.as_str(),
            )),
            Strategy::StepSequence {
                signal,
                start_step,
                end_step,
            } => BoundaryDetector::StepSequence(StepSequenceDetector::new(
                signal.as_str(),
                *start_step,
                *end_step,
            )),
            Strategy::StateChange { signal } => {
                BoundaryDetector::StateChange(StateChangeDetector::new(signal.as_str()))
            }
            Strategy::ValueChangeThreshold { signal } => BoundaryDetector::ValueChangeThreshold(
                ValueChangeDetector::new(signal.as_str(), threshold),
            ),
        }
    }

    fn inner(&self) -> &dyn BoundaryStrategy {
        match self {
            BoundaryDetector::PersistentState(d) => d,
            BoundaryDetector::TriggerEdge(d) => d,
            BoundaryDetector::SeparateStartEnd(d) => d,
            BoundaryDetector::StepSequence(d) => d,
            BoundaryDetector::StateChange(d) => d,
            BoundaryDetector::ValueChangeThreshold(d) => d,
        }
    }

    /// Whether cycles partition the timeline (each end is the next start)
    pub fn is_contiguous(&self) -> bool {
        match self {
            BoundaryDetector::PersistentState(d) => d.closes_on_next_start(),
            BoundaryDetector::StateChange(_) | BoundaryDetector::ValueChangeThreshold(_) => true,
            BoundaryDetector::TriggerEdge(_)
            | BoundaryDetector::SeparateStartEnd(_)
            | BoundaryDetector::StepSequence(_) => false,
        }
    }

    /// Markers ordered by `(timestamp, kind)` with `End` before `Start`
    #[instrument(skip(self, events), fields(strategy = %self.kind(), events = events.len()))]
    pub fn detect(&self, events: &[Event]) -> Result<Vec<BoundaryMarker>> {
        let markers = self.inner().detect_markers(events)?;
        debug!(
            markers = markers.len(),
            starts = markers.iter().filter(|m| m.is_start()).count(),
            "boundary detection finished"
        );
        Ok(markers)
    }
}

impl BoundaryStrategy for BoundaryDetector {
    fn kind(&self) -> StrategyKind {
        self.inner().kind()
    }

    fn required_signals(&self) -> Vec<&str> {
        self.inner().required_signals()
    }

    fn requires_presence(&self) -> bool {
        self.inner().requires_presence()
    }

    fn detect_markers(&self, events: &[Event]) -> Result<Vec<BoundaryMarker>> {
        self.detect(events)
    }
}
