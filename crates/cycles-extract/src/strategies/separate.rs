//! Separate start and end signals

use super::edges::rising_edges;
use crate::traits::{select_signal, sort_markers, BoundaryStrategy};
use cycles_core::{BoundaryMarker, Event, Result, StrategyKind};

/// Rising edge of the start signal starts, rising edge of the end signal ends
#[derive(Debug, Clone)]
pub struct SeparateStartEndDetector {
    start_signal: String,
    end_signal: String,
}

impl SeparateStartEndDetector {
    pub fn new(start_signal: impl Into<String>, end_signal: impl Into<String>) -> Self {
        Self {
            start_signal: start_signal.into(),
            end_signal: end_signal.into(),
        }
    }
}

impl BoundaryStrategy for SeparateStartEndDetector {
    fn kind(&self) -> StrategyKind {
        StrategyKind::SeparateStartEnd
    }

    fn required_signals(&self) -> Vec<&str> {
        vec![self.start_signal.as_str(), self.end_signal.as_str()]
    }

    fn requires_presence(&self) -> bool {
        true
    }

    fn detect_markers(&self, events: &[Event]) -> Result<Vec<BoundaryMarker>> {
        let starts = select_signal(events, &self.start_signal, self.kind(), true)?;
        let ends = select_signal(events, &self.end_signal, self.kind(), true)?;

        let mut markers: Vec<BoundaryMarker> = rising_edges(&starts)?
            .into_iter()
            .map(|t| BoundaryMarker::start(t, self.start_signal.as_str()))
            .chain(
                rising_edges(&ends)?
                    .into_iter()
                    .map(|t| BoundaryMarker::end(t, self.end_signal.as_str())),
            )
            .collect();
        sort_markers(&mut markers);
        Ok(markers)
    }
}
