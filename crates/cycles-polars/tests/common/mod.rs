//! Common test utilities for cycles-polars tests

#![allow(dead_code)]

use cycles_core::{CycleConfig, Strategy};
use polars::prelude::*;

/// Long-format frame: a boolean `running` signal with a `force` reading in each half
pub fn machine_frame() -> DataFrame {
    DataFrame::new(vec![
        Series::new(
            "systime".into(),
            vec![0i64, 2, 5, 7, 10, 12, 20, 23, 30],
        )
        .into(),
        Series::new(
            "uuid".into(),
            vec![
                "running", "force", "force", "mode", "running", "force", "running", "force",
                "running",
            ],
        )
        .into(),
        Series::new(
            "value_bool".into(),
            vec![
                Some(true), None, None, None, Some(false), None, Some(true), None, Some(false),
            ],
        )
        .into(),
        Series::new(
            "value_double".into(),
            vec![None, Some(4.0), Some(6.0), None, None, Some(1.0), None, Some(8.0), None],
        )
        .into(),
        Series::new(
            "value_string".into(),
            vec![None, None, None, Some("auto"), None, None, None, None, None],
        )
        .into(),
    ])
    .unwrap()
}

pub fn running_config() -> CycleConfig {
    CycleConfig::new(Strategy::PersistentState {
        signal: "running".into(),
        close_on_next_start: false,
    })
}

pub fn u64_column(df: &DataFrame, name: &str) -> Vec<Option<u64>> {
    df.column(name).unwrap().u64().unwrap().iter().collect()
}
