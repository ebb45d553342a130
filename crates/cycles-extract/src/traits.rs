//! Core trait for boundary detection strategies
//!
//! Every strategy reads one or two signals out of a mixed event table and
//! turns their transitions into an ordered marker sequence. The set of
//! strategies is closed; [`crate::BoundaryDetector`] dispatches over them
//! statically.

use cycles_core::{
    ensure_strictly_increasing, signal_events, BoundaryMarker, Error, Event, Result, StrategyKind,
};

/// A boundary detection strategy
pub trait BoundaryStrategy {
    /// Which strategy this is
    fn kind(&self) -> StrategyKind;

    /// Signals the strategy reads
    fn required_signals(&self) -> Vec<&str>;

    /// Whether every required signal must be present in the input
    ///
    /// Paired strategies cannot pair anything without their signals, so a
    /// missing one is malformed input rather than an empty result.
    fn requires_presence(&self) -> bool;

    /// Produce markers ordered by `(timestamp, kind)`
    fn detect_markers(&self, events: &[Event]) -> Result<Vec<BoundaryMarker>>;
}

/// Events of `signal_id`, checked for strictly increasing timestamps
pub(crate) fn select_signal<'a>(
    events: &'a [Event],
    signal_id: &str,
    kind: StrategyKind,
    required: bool,
) -> Result<Vec<&'a Event>> {
    let selected = signal_events(events, signal_id);
    if required && selected.is_empty() {
        return Err(Error::missing_signal(signal_id, kind.name()));
    }
    ensure_strictly_increasing(&selected, signal_id)?;
    Ok(selected)
}

/// Sort markers into the canonical `(timestamp, kind)` order
pub(crate) fn sort_markers(markers: &mut [BoundaryMarker]) {
    markers.sort_by_key(|m| m.order_key());
}
