//! Step-sequence cycles driven by an integer step counter

use crate::traits::{select_signal, BoundaryStrategy};
use cycles_core::{BoundaryMarker, Error, Event, Result, StrategyKind};

/// The step becoming `start_step` starts a cycle, becoming `end_step` ends it
#[derive(Debug, Clone)]
pub struct StepSequenceDetector {
    signal: String,
    start_step: i64,
    end_step: i64,
}

impl StepSequenceDetector {
    pub fn new(signal: impl Into<String>, start_step: i64, end_step: i64) -> Self {
        Self {
            signal: signal.into(),
            start_step,
            end_step,
        }
    }
}

impl BoundaryStrategy for StepSequenceDetector {
    fn kind(&self) -> StrategyKind {
        StrategyKind::StepSequence
    }

    fn required_signals(&self) -> Vec<&str> {
        vec![self.signal.as_str()]
    }

    fn requires_presence(&self) -> bool {
        true
    }

    fn detect_markers(&self, events: &[Event]) -> Result<Vec<BoundaryMarker>> {
        let selected = select_signal(events, &self.signal, self.kind(), self.requires_presence())?;

        let mut markers = Vec::new();
        let mut previous: Option<i64> = None;
        for event in selected {
            let step = event.value.as_int().ok_or_else(|| {
                Error::unexpected_value(
                    &event.signal_id,
                    "integer",
                    &event.value.kind().to_string(),
                    event.timestamp,
                )
            })?;
            if previous != Some(step) {
                if step == self.start_step {
                    markers.push(BoundaryMarker::start(event.timestamp, self.signal.as_str()));
                } else if step == self.end_step {
                    markers.push(BoundaryMarker::end(event.timestamp, self.signal.as_str()));
                }
            }
            previous = Some(step);
        }
        Ok(markers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cycles_core::MarkerKind;

    #[test]
    fn test_steps_entering_start_and_end() {
        let steps = [(0, 0), (1, 1), (2, 1), (3, 2), (4, 3), (5, 3), (6, 0), (7, 1), (8, 3)];
        let events: Vec<Event> = steps.iter().map(|&(t, s)| Event::int(t, "step", s)).collect();
        let markers = StepSequenceDetector::new("step", 1, 3).detect_markers(&events).unwrap();
        let keys: Vec<(i64, MarkerKind)> = markers.iter().map(|m| m.order_key()).collect();
        assert_eq!(
            keys,
            vec![
                (1, MarkerKind::Start),
                (4, MarkerKind::End),
                (7, MarkerKind::Start),
                (8, MarkerKind::End),
            ]
        );
    }

    #[test]
    fn test_non_integer_step_is_malformed() {
        let events = vec![Event::int(0, "step", 1), Event::string(1, "step", "two")];
        let err = StepSequenceDetector::new("step", 1, 2).detect_markers(&events).unwrap_err();
        assert!(matches!(err, Error::MalformedInput(_)));
    }
}
