//! Detection and assembly behind one configured entry point

use crate::assembler::{CycleAssembler, Extraction};
use crate::detector::BoundaryDetector;
use cycles_core::{CycleConfig, Event, Result};
use tracing::instrument;

/// Runs boundary detection followed by assembly for one configuration
///
/// ```rust
/// use cycles_core::{CycleConfig, Event, Strategy};
/// use cycles_extract::CycleExtractor;
///
/// let config = CycleConfig::new(Strategy::PersistentState {
///     signal: "running".into(),
///     close_on_next_start: false,
/// });
/// let events = vec![
///     Event::bool(0, "running", true),
///     Event::bool(8, "running", false),
///     Event::bool(10, "running", true),
/// ];
/// let extraction = CycleExtractor::new(config).unwrap().extract(&events).unwrap();
/// assert_eq!(extraction.cycles.len(), 2);
/// assert_eq!(extraction.stats.unmatched_starts(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct CycleExtractor {
    config: CycleConfig,
    detector: BoundaryDetector,
    assembler: CycleAssembler,
}

impl CycleExtractor {
    pub fn new(config: CycleConfig) -> Result<Self> {
        let detector = BoundaryDetector::new(&config)?;
        let assembler = CycleAssembler::new(&config)?;
        Ok(Self {
            config,
            detector,
            assembler,
        })
    }

    pub fn config(&self) -> &CycleConfig {
        &self.config
    }

    pub fn detector(&self) -> &BoundaryDetector {
        &self.detector
    }

    pub fn assembler(&self) -> &CycleAssembler {
        &self.assembler
    }

    /// Detect boundaries in `events` and assemble them into cycles
    #[instrument(skip(self, events), fields(events = events.len()))]
    pub fn extract(&self, events: &[Event]) -> Result<Extraction> {
        let markers = self.detector.detect(events)?;
        self.assembler.assemble(&markers)
    }
}
