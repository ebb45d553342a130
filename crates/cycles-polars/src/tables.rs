//! Cycle tables, extraction statistics and aggregates as DataFrames

use crate::columns::{booleans, column, integers, or_nulls, strings, unsigned};
use crate::{Error, Result};
use cycles_core::{Cycle, ValidationIssue};
use cycles_extract::AssemblyStats;
use cycles_process::{signal_ids, CycleAggregates, SignalAggregate};
use polars::prelude::*;

/// Cycle table with one row per cycle
///
/// Columns: `cycle_id` (UInt64), `start_time`, `end_time`, `duration`
/// (Int64, nullable), `is_complete`, `is_valid`, `has_overlap` (Boolean,
/// nullable) and `validation_issue` (String, nullable).
pub fn cycles_to_frame(cycles: &[Cycle]) -> Result<DataFrame> {
    let ids: Vec<u64> = cycles.iter().map(|c| c.cycle_id).collect();
    let starts: Vec<i64> = cycles.iter().map(|c| c.start_time).collect();
    let ends: Vec<Option<i64>> = cycles.iter().map(|c| c.end_time).collect();
    let durations: Vec<Option<i64>> = cycles.iter().map(|c| c.duration).collect();
    let complete: Vec<bool> = cycles.iter().map(|c| c.is_complete).collect();
    let valid: Vec<Option<bool>> = cycles.iter().map(|c| c.is_valid).collect();
    let overlap: Vec<Option<bool>> = cycles.iter().map(|c| c.has_overlap).collect();
    let issues: Vec<Option<&str>> = cycles
        .iter()
        .map(|c| c.validation_issue.map(|i| i.as_str()))
        .collect();

    Ok(DataFrame::new(vec![
        Series::new("cycle_id".into(), ids).into(),
        Series::new("start_time".into(), starts).into(),
        Series::new("end_time".into(), ends).into(),
        Series::new("duration".into(), durations).into(),
        Series::new("is_complete".into(), complete).into(),
        Series::new("is_valid".into(), valid).into(),
        Series::new("validation_issue".into(), issues).into(),
        Series::new("has_overlap".into(), overlap).into(),
    ])?)
}

/// Read a cycle table back from a frame
///
/// `cycle_id` and `start_time` are required. A missing `is_complete` column
/// is derived from `end_time`; annotation columns default to null. Durations
/// are recomputed from the bounds.
pub fn cycles_from_frame(df: &DataFrame) -> Result<Vec<Cycle>> {
    let ids = unsigned(column(df, "cycle_id")?)?;
    let starts = integers(column(df, "start_time")?)?;
    let ends = or_nulls(df, "end_time", integers)?;
    let complete = or_nulls(df, "is_complete", booleans)?;
    let valid = or_nulls(df, "is_valid", booleans)?;
    let issues = or_nulls(df, "validation_issue", strings)?;
    let overlap = or_nulls(df, "has_overlap", booleans)?;

    let mut cycles = Vec::with_capacity(df.height());
    for row in 0..df.height() {
        let cycle_id = ids[row].ok_or_else(|| Error::malformed_row(row, "null cycle_id"))?;
        let start = starts[row].ok_or_else(|| Error::malformed_row(row, "null start_time"))?;
        let mut cycle = match (complete[row].unwrap_or(ends[row].is_some()), ends[row]) {
            (true, Some(end)) if end >= start => Cycle::complete(cycle_id, start, end),
            (true, Some(end)) => {
                return Err(Error::malformed_row(
                    row,
                    format!("end_time {end} precedes start_time {start}"),
                ))
            }
            (true, None) => {
                return Err(Error::malformed_row(row, "complete cycle without end_time"))
            }
            (false, _) => Cycle::incomplete(cycle_id, start),
        };
        cycle.is_valid = valid[row];
        cycle.has_overlap = overlap[row];
        cycle.validation_issue = match issues[row].as_deref() {
            Some(name) => Some(ValidationIssue::from_name(name).ok_or_else(|| {
                Error::malformed_row(row, format!("unknown validation issue {name:?}"))
            })?),
            None => None,
        };
        cycles.push(cycle);
    }
    Ok(cycles)
}

/// Single-row frame of extraction statistics
pub fn stats_to_frame(stats: &AssemblyStats) -> Result<DataFrame> {
    let count = |n: usize| vec![n as u64];
    Ok(DataFrame::new(vec![
        Series::new("run_id".into(), vec![stats.run_id().to_string()]).into(),
        Series::new("strategy".into(), vec![stats.strategy().name()]).into(),
        Series::new("total_starts".into(), count(stats.total_starts())).into(),
        Series::new("total_ends".into(), count(stats.total_ends())).into(),
        Series::new("complete_cycles".into(), count(stats.complete_cycles())).into(),
        Series::new("incomplete_cycles".into(), count(stats.incomplete_cycles())).into(),
        Series::new("unmatched_starts".into(), count(stats.unmatched_starts())).into(),
        Series::new("unmatched_ends".into(), count(stats.unmatched_ends())).into(),
        Series::new("total_cycles".into(), count(stats.total_cycles())).into(),
        Series::new("success_rate".into(), vec![stats.success_rate()]).into(),
        Series::new("warnings".into(), vec![stats.warnings().join("\n")]).into(),
    ])?)
}

/// Wide per-cycle statistics frame
///
/// Fixed columns `cycle_id, start_time, end_time, duration, event_count,
/// distinct_signals` are followed, per signal in name order, by
/// `{signal}_count` and then `{signal}_min/_mean/_max/_std` for numeric
/// signals or `{signal}_first/_last` for categorical ones. A signal that is
/// numeric in some cycles and categorical in others gets both groups.
pub fn aggregates_to_frame(rows: &[CycleAggregates]) -> Result<DataFrame> {
    let mut columns: Vec<Column> = vec![
        Series::new(
            "cycle_id".into(),
            rows.iter().map(|r| r.cycle_id).collect::<Vec<u64>>(),
        )
        .into(),
        Series::new(
            "start_time".into(),
            rows.iter().map(|r| r.start_time).collect::<Vec<i64>>(),
        )
        .into(),
        Series::new(
            "end_time".into(),
            rows.iter().map(|r| r.end_time).collect::<Vec<Option<i64>>>(),
        )
        .into(),
        Series::new(
            "duration".into(),
            rows.iter().map(|r| r.duration).collect::<Vec<Option<i64>>>(),
        )
        .into(),
        Series::new(
            "event_count".into(),
            rows.iter().map(|r| r.event_count as u64).collect::<Vec<u64>>(),
        )
        .into(),
        Series::new(
            "distinct_signals".into(),
            rows.iter()
                .map(|r| r.distinct_signals() as u64)
                .collect::<Vec<u64>>(),
        )
        .into(),
    ];

    for signal in signal_ids(rows) {
        let aggregates: Vec<Option<&SignalAggregate>> = rows.iter().map(|r| r.signal(signal)).collect();
        let counts: Vec<Option<u64>> = aggregates
            .iter()
            .map(|a| a.map(|a| a.count() as u64))
            .collect();
        columns.push(Series::new(format!("{signal}_count").into(), counts).into());

        if aggregates
            .iter()
            .any(|a| matches!(a, Some(SignalAggregate::Numeric { .. })))
        {
            let numeric = |pick: fn(f64, f64, f64, Option<f64>) -> Option<f64>| -> Vec<Option<f64>> {
                aggregates
                    .iter()
                    .map(|a| match a {
                        Some(SignalAggregate::Numeric {
                            min, mean, max, std, ..
                        }) => pick(*min, *mean, *max, *std),
                        _ => None,
                    })
                    .collect()
            };
            columns.push(Series::new(format!("{signal}_min").into(), numeric(|min, _, _, _| Some(min))).into());
            columns.push(Series::new(format!("{signal}_mean").into(), numeric(|_, mean, _, _| Some(mean))).into());
            columns.push(Series::new(format!("{signal}_max").into(), numeric(|_, _, max, _| Some(max))).into());
            columns.push(Series::new(format!("{signal}_std").into(), numeric(|_, _, _, std| std)).into());
        }

        if aggregates
            .iter()
            .any(|a| matches!(a, Some(SignalAggregate::Categorical { .. })))
        {
            let mut firsts: Vec<Option<&str>> = Vec::with_capacity(rows.len());
            let mut lasts: Vec<Option<&str>> = Vec::with_capacity(rows.len());
            for aggregate in &aggregates {
                match aggregate {
                    Some(SignalAggregate::Categorical { first, last, .. }) => {
                        firsts.push(Some(first.as_str()));
                        lasts.push(Some(last.as_str()));
                    }
                    _ => {
                        firsts.push(None);
                        lasts.push(None);
                    }
                }
            }
            columns.push(Series::new(format!("{signal}_first").into(), firsts).into());
            columns.push(Series::new(format!("{signal}_last").into(), lasts).into());
        }
    }

    Ok(DataFrame::new(columns)?)
}
