//! Persistent-state cycles: the signal stays high for the whole cycle

use super::edges::{edges, Edge};
use crate::traits::{select_signal, BoundaryStrategy};
use cycles_core::{BoundaryMarker, Event, Result, StrategyKind};

/// Rising edge starts a cycle, falling edge ends it
#[derive(Debug, Clone)]
pub struct PersistentStateDetector {
    signal: String,
    close_on_next_start: bool,
}

impl PersistentStateDetector {
    pub fn new(signal: impl Into<String>) -> Self {
        Self {
            signal: signal.into(),
            close_on_next_start: false,
        }
    }

    /// Ignore falling edges; each cycle lasts until the next rising edge
    pub fn closing_on_next_start(mut self) -> Self {
        self.close_on_next_start = true;
        self
    }

    pub fn closes_on_next_start(&self) -> bool {
        self.close_on_next_start
    }
}

impl BoundaryStrategy for PersistentStateDetector {
    fn kind(&self) -> StrategyKind {
        StrategyKind::PersistentState
    }

    fn required_signals(&self) -> Vec<&str> {
        vec![self.signal.as_str()]
    }

    fn requires_presence(&self) -> bool {
        !self.close_on_next_start
    }

    fn detect_markers(&self, events: &[Event]) -> Result<Vec<BoundaryMarker>> {
        let selected = select_signal(events, &self.signal, self.kind(), self.requires_presence())?;
        let markers = edges(&selected)?
            .into_iter()
            .filter_map(|edge| match edge {
                Edge::Rising(t) => Some(BoundaryMarker::start(t, self.signal.as_str())),
                Edge::Falling(t) if !self.close_on_next_start => {
                    Some(BoundaryMarker::end(t, self.signal.as_str()))
                }
                Edge::Falling(_) => None,
            })
            .collect();
        Ok(markers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cycles_core::{Error, MarkerKind};

    #[test]
    fn test_rising_and_falling_edges() {
        let events: Vec<Event> = [(0, true), (8, false), (10, true), (15, true), (22, false), (25, true)]
            .iter()
            .map(|&(t, v)| Event::bool(t, "press", v))
            .collect();
        let markers = PersistentStateDetector::new("press").detect_markers(&events).unwrap();
        let kinds: Vec<(i64, MarkerKind)> = markers.iter().map(|m| m.order_key()).collect();
        assert_eq!(
            kinds,
            vec![
                (0, MarkerKind::Start),
                (8, MarkerKind::End),
                (10, MarkerKind::Start),
                (22, MarkerKind::End),
                (25, MarkerKind::Start),
            ]
        );
    }

    #[test]
    fn test_close_on_next_start_drops_ends() {
        let events: Vec<Event> = [(0, true), (8, false), (10, true)]
            .iter()
            .map(|&(t, v)| Event::bool(t, "press", v))
            .collect();
        let markers = PersistentStateDetector::new("press")
            .closing_on_next_start()
            .detect_markers(&events)
            .unwrap();
        assert!(markers.iter().all(|m| m.is_start()));
        assert_eq!(markers.len(), 2);
    }

    #[test]
    fn test_absent_signal_depends_on_mode() {
        let events = vec![Event::bool(0, "other", true)];
        assert!(matches!(
            PersistentStateDetector::new("press").detect_markers(&events),
            Err(Error::MalformedInput(_))
        ));
        let markers = PersistentStateDetector::new("press")
            .closing_on_next_start()
            .detect_markers(&events)
            .unwrap();
        assert!(markers.is_empty());
    }
}
