//! Typed access to frame columns

use crate::{Error, Result};
use cycles_core::Timestamp;
use polars::prelude::*;

pub(crate) fn column<'a>(df: &'a DataFrame, name: &str) -> Result<&'a Column> {
    df.column(name)
        .map_err(|_| Error::InvalidColumn(name.to_string()))
}

pub(crate) fn optional_column<'a>(df: &'a DataFrame, name: &str) -> Option<&'a Column> {
    df.column(name).ok()
}

fn mismatch(column: &Column, expected: &str) -> Error {
    Error::TypeMismatch {
        column: column.name().to_string(),
        expected: expected.to_string(),
        got: format!("{:?}", column.dtype()),
    }
}

/// Integer or datetime column as nanosecond timestamps
pub(crate) fn timestamps(column: &Column) -> Result<Vec<Option<Timestamp>>> {
    let scale = match column.dtype() {
        DataType::Datetime(TimeUnit::Nanoseconds, _) => 1,
        DataType::Datetime(TimeUnit::Microseconds, _) => 1_000,
        DataType::Datetime(TimeUnit::Milliseconds, _) => 1_000_000,
        dt if dt.is_integer() => 1,
        _ => return Err(mismatch(column, "integer or datetime")),
    };
    let ints = column.cast(&DataType::Int64)?;
    let scaled = ints
        .i64()?
        .iter()
        .enumerate()
        .map(|(row, v)| match v {
            Some(t) => t.checked_mul(scale).map(Some).ok_or_else(|| {
                Error::malformed_row(row, format!("timestamp {t} overflows nanoseconds"))
            }),
            None => Ok(None),
        })
        .collect();
    scaled
}

pub(crate) fn integers(column: &Column) -> Result<Vec<Option<i64>>> {
    if !column.dtype().is_integer() {
        return Err(mismatch(column, "integer"));
    }
    let ints = column.cast(&DataType::Int64)?;
    let values = ints.i64()?.iter().collect();
    Ok(values)
}

pub(crate) fn unsigned(column: &Column) -> Result<Vec<Option<u64>>> {
    if !column.dtype().is_integer() {
        return Err(mismatch(column, "integer"));
    }
    let ints = column.cast(&DataType::UInt64)?;
    let values = ints.u64()?.iter().collect();
    Ok(values)
}

pub(crate) fn floats(column: &Column) -> Result<Vec<Option<f64>>> {
    match column.dtype() {
        DataType::Float64 => Ok(column.f64()?.iter().collect()),
        DataType::Float32 => {
            let wide = column.cast(&DataType::Float64)?;
            let values = wide.f64()?.iter().collect();
            Ok(values)
        }
        _ => Err(mismatch(column, "float")),
    }
}

pub(crate) fn booleans(column: &Column) -> Result<Vec<Option<bool>>> {
    match column.dtype() {
        DataType::Boolean => Ok(column.bool()?.iter().collect()),
        _ => Err(mismatch(column, "boolean")),
    }
}

pub(crate) fn strings(column: &Column) -> Result<Vec<Option<String>>> {
    match column.dtype() {
        DataType::String => Ok(column
            .str()?
            .iter()
            .map(|s| s.map(str::to_string))
            .collect()),
        _ => Err(mismatch(column, "string")),
    }
}

/// Reads an optional column, all-null when absent
pub(crate) fn or_nulls<T>(
    df: &DataFrame,
    name: &str,
    read: impl Fn(&Column) -> Result<Vec<Option<T>>>,
) -> Result<Vec<Option<T>>> {
    match optional_column(df, name) {
        Some(column) => read(column),
        None => Ok(std::iter::repeat_with(|| None).take(df.height()).collect()),
    }
}
