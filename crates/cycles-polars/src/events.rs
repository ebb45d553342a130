//! Long-format event frames

use crate::columns::{booleans, column, floats, integers, or_nulls, strings, timestamps};
use crate::{Error, EventColumns, EventFrameExt, Result};
use cycles_core::{ensure_sorted_per_signal, Event, Value};
use polars::prelude::*;
use tracing::{debug, instrument};

impl EventFrameExt for DataFrame {
    #[instrument(skip(self, columns), fields(rows = self.height()))]
    fn to_events(&self, columns: &EventColumns) -> Result<Vec<Event>> {
        let times = timestamps(column(self, &columns.timestamp)?)?;
        let signals = strings(column(self, &columns.signal_id)?)?;
        let bools = or_nulls(self, &columns.value_bool, booleans)?;
        let ints = or_nulls(self, &columns.value_integer, integers)?;
        let doubles = or_nulls(self, &columns.value_double, floats)?;
        let texts = or_nulls(self, &columns.value_string, strings)?;
        let deltas = or_nulls(self, &columns.is_delta, booleans)?;

        let mut events = Vec::with_capacity(self.height());
        for (row, (((((time, signal), b), i), d), s)) in times
            .into_iter()
            .zip(signals)
            .zip(bools)
            .zip(ints)
            .zip(doubles)
            .zip(texts)
            .enumerate()
        {
            let timestamp = time.ok_or_else(|| Error::malformed_row(row, "null timestamp"))?;
            let signal_id = signal.ok_or_else(|| Error::malformed_row(row, "null signal id"))?;
            let value = match (b, i, d, s) {
                (Some(v), None, None, None) => Value::Bool(v),
                (None, Some(v), None, None) => Value::Int(v),
                (None, None, Some(v), None) => Value::Float(v),
                (None, None, None, Some(v)) => Value::Str(v),
                (None, None, None, None) => {
                    return Err(Error::malformed_row(row, "no value column populated"))
                }
                _ => {
                    return Err(Error::malformed_row(
                        row,
                        "more than one value column populated",
                    ))
                }
            };
            let is_delta = deltas[row].unwrap_or(false);
            events.push(Event::new(timestamp, signal_id, value).with_delta(is_delta));
        }

        ensure_sorted_per_signal(&events)?;
        debug!(events = events.len(), "read event frame");
        Ok(events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame() -> DataFrame {
        DataFrame::new(vec![
            Series::new("systime".into(), vec![1i64, 2, 3]).into(),
            Series::new("uuid".into(), vec!["run", "run", "temp"]).into(),
            Series::new("value_bool".into(), vec![Some(true), Some(false), None]).into(),
            Series::new("value_double".into(), vec![None, None, Some(21.5)]).into(),
        ])
        .unwrap()
    }

    #[test]
    fn test_missing_value_columns_are_null() {
        let events = frame().to_events(&EventColumns::default()).unwrap();
        assert_eq!(events.len(), 3);
        assert_eq!(events[0].value, Value::Bool(true));
        assert_eq!(events[2].value, Value::Float(21.5));
        assert!(events.iter().all(|e| !e.is_delta));
    }

    #[test]
    fn test_two_populated_values_rejected() {
        let mut df = frame();
        df.with_column(Series::new("value_integer".into(), vec![Some(1i64), None, Some(2)]))
            .unwrap();
        let err = df.to_events(&EventColumns::default()).unwrap_err();
        assert!(err.to_string().contains("row 2"));
    }

    #[test]
    fn test_unsorted_signal_rejected() {
        let df = DataFrame::new(vec![
            Series::new("systime".into(), vec![5i64, 1, 3]).into(),
            Series::new("uuid".into(), vec!["run", "temp", "run"]).into(),
            Series::new("value_bool".into(), vec![Some(true), None, Some(false)]).into(),
            Series::new("value_double".into(), vec![None, Some(1.0), None]).into(),
        ])
        .unwrap();
        let err = df.to_events(&EventColumns::default()).unwrap_err();
        assert!(matches!(err, Error::Cycles(cycles_core::Error::MalformedInput(_))));
        assert!(err.to_string().contains("run"));
    }

    #[test]
    fn test_missing_timestamp_column() {
        let columns = EventColumns::default().with_timestamp("ts");
        assert!(matches!(
            frame().to_events(&columns),
            Err(Error::InvalidColumn(name)) if name == "ts"
        ));
    }
}
