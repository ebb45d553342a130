//! Error types for cycles-polars

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    #[error("Cycle error: {0}")]
    Cycles(#[from] cycles_core::Error),

    #[error("Invalid column: {0}")]
    InvalidColumn(String),

    #[error("Type mismatch in column {column}: expected {expected}, got {got}")]
    TypeMismatch {
        column: String,
        expected: String,
        got: String,
    },
}

impl Error {
    /// Row-level data problem, reported as malformed input
    pub fn malformed_row(row: usize, reason: impl std::fmt::Display) -> Self {
        Error::Cycles(cycles_core::Error::MalformedInput(format!("row {row}: {reason}")))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
