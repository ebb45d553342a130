//! Contiguous-partition strategies: a new cycle starts whenever the value changes

use crate::traits::{select_signal, BoundaryStrategy};
use cycles_core::{BoundaryMarker, Event, Result, StrategyKind};

/// Start markers at the first sample and at every significant change
fn change_points(events: &[&Event], signal: &str, threshold: f64) -> Vec<BoundaryMarker> {
    let mut markers = Vec::new();
    let mut previous = None;
    for event in events {
        let significant = match previous {
            None => true,
            Some(prev) => event.value.differs_from(prev, threshold),
        };
        if significant {
            markers.push(BoundaryMarker::start(event.timestamp, signal));
        }
        previous = Some(&event.value);
    }
    markers
}

/// Any change of a discrete value starts a new cycle
#[derive(Debug, Clone)]
pub struct StateChangeDetector {
    signal: String,
}

impl StateChangeDetector {
    pub fn new(signal: impl Into<String>) -> Self {
        Self { signal: signal.into() }
    }
}

impl BoundaryStrategy for StateChangeDetector {
    fn kind(&self) -> StrategyKind {
        StrategyKind::StateChange
    }

    fn required_signals(&self) -> Vec<&str> {
        vec![self.signal.as_str()]
    }

    fn requires_presence(&self) -> bool {
        false
    }

    fn detect_markers(&self, events: &[Event]) -> Result<Vec<BoundaryMarker>> {
        let selected = select_signal(events, &self.signal, self.kind(), self.requires_presence())?;
        Ok(change_points(&selected, &self.signal, 0.0))
    }
}

/// A numeric change larger than the threshold starts a new cycle
///
/// The comparison is against the previous sample, not the previous boundary.
/// Boolean and string values ignore the threshold.
#[derive(Debug, Clone)]
pub struct ValueChangeDetector {
    signal: String,
    threshold: f64,
}

impl ValueChangeDetector {
    pub fn new(signal: impl Into<String>, threshold: f64) -> Self {
        Self {
            signal: signal.into(),
            threshold: threshold.abs(),
        }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }
}

impl BoundaryStrategy for ValueChangeDetector {
    fn kind(&self) -> StrategyKind {
        StrategyKind::ValueChangeThreshold
    }

    fn required_signals(&self) -> Vec<&str> {
        vec![self.signal.as_str()]
    }

    fn requires_presence(&self) -> bool {
        false
    }

    fn detect_markers(&self, events: &[Event]) -> Result<Vec<BoundaryMarker>> {
        let selected = select_signal(events, &self.signal, self.kind(), self.requires_presence())?;
        Ok(change_points(&selected, &self.signal, self.threshold))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn starts(markers: &[BoundaryMarker]) -> Vec<i64> {
        markers.iter().map(|m| m.timestamp).collect()
    }

    #[test]
    fn test_threshold_filters_small_changes() {
        let values = [10.0, 10.5, 13.0, 13.4, 20.0];
        let events: Vec<Event> = values
            .iter()
            .enumerate()
            .map(|(t, &v)| Event::float(t as i64, "temp", v))
            .collect();
        let markers = ValueChangeDetector::new("temp", 2.0).detect_markers(&events).unwrap();
        assert_eq!(starts(&markers), vec![0, 2, 4]);
        assert!(markers.iter().all(|m| m.is_start()));
    }

    #[test]
    fn test_zero_threshold_marks_every_change() {
        let values = [1.0, 1.0, 1.5, 1.5, 1.0];
        let events: Vec<Event> = values
            .iter()
            .enumerate()
            .map(|(t, &v)| Event::float(t as i64, "temp", v))
            .collect();
        let markers = ValueChangeDetector::new("temp", 0.0).detect_markers(&events).unwrap();
        assert_eq!(starts(&markers), vec![0, 2, 4]);
    }

    #[test]
    fn test_state_change_on_strings() {
        let states = ["idle", "run", "run", "fault", "idle"];
        let events: Vec<Event> = states
            .iter()
            .enumerate()
            .map(|(t, &s)| Event::string(t as i64 * 10, "mode", s))
            .collect();
        let markers = StateChangeDetector::new("mode").detect_markers(&events).unwrap();
        assert_eq!(starts(&markers), vec![0, 10, 30, 40]);
    }

    #[test]
    fn test_unsorted_input_is_rejected() {
        let events = vec![Event::int(5, "mode", 1), Event::int(3, "mode", 2)];
        assert!(StateChangeDetector::new("mode").detect_markers(&events).is_err());
    }
}
