//! Boundary markers produced by boundary detection

use crate::time::Timestamp;
use std::fmt;

/// Whether a marker opens or closes a cycle
///
/// `End` sorts before `Start` so that, at a shared timestamp, the previous
/// cycle is closed before the next one opens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MarkerKind {
    End,
    Start,
}

impl fmt::Display for MarkerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MarkerKind::Start => write!(f, "start"),
            MarkerKind::End => write!(f, "end"),
        }
    }
}

/// A derived start or end boundary
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundaryMarker {
    pub timestamp: Timestamp,
    pub kind: MarkerKind,
    /// Signal whose transition produced the marker
    pub signal_id: String,
}

impl BoundaryMarker {
    pub fn start(timestamp: Timestamp, signal_id: impl Into<String>) -> Self {
        Self {
            timestamp,
            kind: MarkerKind::Start,
            signal_id: signal_id.into(),
        }
    }

    pub fn end(timestamp: Timestamp, signal_id: impl Into<String>) -> Self {
        Self {
            timestamp,
            kind: MarkerKind::End,
            signal_id: signal_id.into(),
        }
    }

    pub fn is_start(&self) -> bool {
        self.kind == MarkerKind::Start
    }

    /// Sort key used for the ordered marker sequence
    pub fn order_key(&self) -> (Timestamp, MarkerKind) {
        (self.timestamp, self.kind)
    }
}

impl fmt::Display for BoundaryMarker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{} ({})", self.kind, self.timestamp, self.signal_id)
    }
}
