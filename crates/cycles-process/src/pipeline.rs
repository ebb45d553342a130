//! Config-driven run of every stage: extract, validate, resolve overlaps, index

use crate::interval_index::IntervalIndex;
use crate::joiner::CycleDataJoiner;
use crate::overlap::{OverlapReport, OverlapResolver};
use crate::validator::{CycleValidator, ValidationReport};
use cycles_core::{Cycle, CycleConfig, Event, Result};
use cycles_extract::{AssemblyStats, CycleExtractor};
use tracing::{info, instrument};

/// Every table and report produced by one pipeline run
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    /// Table as assembled, before any annotation
    pub assembled: Vec<Cycle>,
    pub stats: AssemblyStats,
    pub validation: ValidationReport,
    pub overlaps: OverlapReport,
    /// Validated, overlap-annotated and (under a keep policy) pruned table
    pub cycles: Vec<Cycle>,
    pub index: IntervalIndex,
}

impl PipelineOutput {
    /// Joiner over the final table, reusing the built index
    pub fn joiner(&self) -> CycleDataJoiner {
        CycleDataJoiner::with_index(self.cycles.clone(), self.index.clone())
    }
}

/// Extraction followed by validation, overlap handling and indexing
#[derive(Debug, Clone)]
pub struct CyclePipeline {
    extractor: CycleExtractor,
    validator: CycleValidator,
    resolver: OverlapResolver,
}

impl CyclePipeline {
    pub fn new(config: CycleConfig) -> Result<Self> {
        let validator = CycleValidator::from_config(&config)?;
        let resolver = OverlapResolver::from_config(&config);
        let extractor = CycleExtractor::new(config)?;
        Ok(Self {
            extractor,
            validator,
            resolver,
        })
    }

    pub fn config(&self) -> &CycleConfig {
        self.extractor.config()
    }

    #[instrument(skip(self, events), fields(events = events.len()))]
    pub fn run(&self, events: &[Event]) -> Result<PipelineOutput> {
        let extraction = self.extractor.extract(events)?;

        #[cfg(feature = "parallel")]
        let validation = self.validator.validate_parallel(&extraction.cycles);
        #[cfg(not(feature = "parallel"))]
        let validation = self.validator.validate(&extraction.cycles);

        let resolution = self.resolver.resolve(&validation.cycles);
        let index = IntervalIndex::with_policy(
            &resolution.cycles,
            self.extractor.config().incomplete_policy(),
        );

        info!(
            assembled = extraction.cycles.len(),
            valid = validation.report.valid,
            kept = resolution.cycles.len(),
            indexed = index.len(),
            "pipeline finished"
        );
        Ok(PipelineOutput {
            assembled: extraction.cycles,
            stats: extraction.stats,
            validation: validation.report,
            overlaps: resolution.report,
            cycles: resolution.cycles,
            index,
        })
    }
}
