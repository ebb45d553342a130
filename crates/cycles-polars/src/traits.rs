//! Extension traits for cycle segmentation on Polars DataFrames

use crate::Result;
use cycles_core::Event;
use cycles_process::IntervalIndex;
use polars::prelude::*;

/// Column names of a long-format event frame
///
/// Every row carries a timestamp, a signal id and exactly one populated
/// value column. The delta flag column is optional.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventColumns {
    pub timestamp: String,
    pub signal_id: String,
    pub value_bool: String,
    pub value_integer: String,
    pub value_double: String,
    pub value_string: String,
    pub is_delta: String,
}

impl Default for EventColumns {
    fn default() -> Self {
        Self {
            timestamp: "systime".into(),
            signal_id: "uuid".into(),
            value_bool: "value_bool".into(),
            value_integer: "value_integer".into(),
            value_double: "value_double".into(),
            value_string: "value_string".into(),
            is_delta: "is_delta".into(),
        }
    }
}

impl EventColumns {
    /// Override the timestamp column name
    pub fn with_timestamp(mut self, name: impl Into<String>) -> Self {
        self.timestamp = name.into();
        self
    }

    /// Override the signal id column name
    pub fn with_signal_id(mut self, name: impl Into<String>) -> Self {
        self.signal_id = name.into();
        self
    }
}

/// Conversion of a long-format event frame into [`Event`]s
pub trait EventFrameExt {
    /// Read every row as an event, in row order
    ///
    /// Timestamps may be any integer type or `Datetime`; datetimes are
    /// converted to nanoseconds. Value columns that are absent count as
    /// all-null. A row with zero or several populated value columns, or a
    /// null timestamp or signal id, is malformed.
    fn to_events(&self, columns: &EventColumns) -> Result<Vec<Event>>;
}

/// Frame-level assignment of rows to cycles
pub trait CycleFrameExt {
    /// Copy of the frame with a nullable `cycle_id` column appended
    ///
    /// Rows whose timestamp falls in no cycle, or is null, get a null id.
    fn assign_cycles(&self, index: &IntervalIndex, time_column: &str) -> Result<DataFrame>;
}
