//! Frame-level cycle assignment and extraction

use crate::columns::{column, timestamps};
use crate::tables::cycles_to_frame;
use crate::{CycleFrameExt, EventColumns, EventFrameExt, Result};
use cycles_core::CycleConfig;
use cycles_extract::{AssemblyStats, CycleExtractor};
use cycles_process::IntervalIndex;
use polars::prelude::*;
use tracing::{info, instrument};

impl CycleFrameExt for DataFrame {
    #[instrument(skip(self, index), fields(rows = self.height(), cycles = index.len()))]
    fn assign_cycles(&self, index: &IntervalIndex, time_column: &str) -> Result<DataFrame> {
        let times = timestamps(column(self, time_column)?)?;
        let ids: Vec<Option<u64>> = times
            .into_iter()
            .map(|t| t.and_then(|t| index.lookup(t)))
            .collect();
        let assigned = ids.iter().filter(|id| id.is_some()).count();
        info!(assigned, unassigned = ids.len() - assigned, "assigned rows to cycles");

        let mut out = self.clone();
        out.with_column(Series::new("cycle_id".into(), ids))?;
        Ok(out)
    }
}

/// Cycle table and statistics extracted from an event frame
#[derive(Debug, Clone)]
pub struct FrameExtraction {
    /// Cycle table in the layout of [`cycles_to_frame`]
    pub cycles: DataFrame,
    pub stats: AssemblyStats,
}

/// Run the extractor configured by `config` over a long-format event frame
pub fn extract_cycles(
    df: &DataFrame,
    config: &CycleConfig,
    columns: &EventColumns,
) -> Result<FrameExtraction> {
    let events = df.to_events(columns)?;
    let extraction = CycleExtractor::new(config.clone())?.extract(&events)?;
    Ok(FrameExtraction {
        cycles: cycles_to_frame(&extraction.cycles)?,
        stats: extraction.stats,
    })
}
