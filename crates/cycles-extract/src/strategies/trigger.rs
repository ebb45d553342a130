//! Trigger-edge cycles: consecutive pulses delimit cycles

use super::edges::rising_edges;
use crate::traits::{select_signal, BoundaryStrategy};
use cycles_core::{BoundaryMarker, Event, Result, StrategyKind};

/// Pulse `i` ends cycle `i - 1` and starts cycle `i`
#[derive(Debug, Clone)]
pub struct TriggerEdgeDetector {
    signal: String,
}

impl TriggerEdgeDetector {
    pub fn new(signal: impl Into<String>) -> Self {
        Self { signal: signal.into() }
    }
}

impl BoundaryStrategy for TriggerEdgeDetector {
    fn kind(&self) -> StrategyKind {
        StrategyKind::TriggerEdge
    }

    fn required_signals(&self) -> Vec<&str> {
        vec![self.signal.as_str()]
    }

    fn requires_presence(&self) -> bool {
        true
    }

    fn detect_markers(&self, events: &[Event]) -> Result<Vec<BoundaryMarker>> {
        let selected = select_signal(events, &self.signal, self.kind(), self.requires_presence())?;
        let pulses = rising_edges(&selected)?;

        let mut markers = Vec::with_capacity(pulses.len() * 2);
        for (i, &t) in pulses.iter().enumerate() {
            // End sorts before Start at the same instant
            if i > 0 {
                markers.push(BoundaryMarker::end(t, self.signal.as_str()));
            }
            markers.push(BoundaryMarker::start(t, self.signal.as_str()));
        }
        Ok(markers)
    }
}
