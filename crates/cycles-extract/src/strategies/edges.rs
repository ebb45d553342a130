//! Edge extraction over boolean level signals

use cycles_core::{Error, Event, Result, Timestamp};

/// A level transition of a boolean signal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Edge {
    Rising(Timestamp),
    Falling(Timestamp),
}

/// Boolean level of an event; integers count as `!= 0`
pub(crate) fn level(event: &Event) -> Result<bool> {
    event.value.as_bool().ok_or_else(|| {
        Error::unexpected_value(
            &event.signal_id,
            "boolean",
            &event.value.kind().to_string(),
            event.timestamp,
        )
    })
}

/// Transitions of a boolean signal.
///
/// The level before the first sample is taken as `false`, so a signal that
/// starts high opens with a rising edge. Repeated samples at the same level
/// produce nothing.
pub(crate) fn edges(events: &[&Event]) -> Result<Vec<Edge>> {
    let mut out = Vec::new();
    let mut previous = false;
    for event in events {
        let current = level(event)?;
        match (previous, current) {
            (false, true) => out.push(Edge::Rising(event.timestamp)),
            (true, false) => out.push(Edge::Falling(event.timestamp)),
            _ => {}
        }
        previous = current;
    }
    Ok(out)
}

/// Timestamps of rising edges only
pub(crate) fn rising_edges(events: &[&Event]) -> Result<Vec<Timestamp>> {
    Ok(edges(events)?
        .into_iter()
        .filter_map(|edge| match edge {
            Edge::Rising(t) => Some(t),
            Edge::Falling(_) => None,
        })
        .collect())
}
