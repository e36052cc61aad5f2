use std::path::PathBuf;

use arrow::error::ArrowError;
use parquet::errors::ParquetError;
use thiserror::Error;

/// Everything that can go wrong while loading, reshaping or summarising a table.
#[derive(Error, Debug)]
pub enum TableError {
    #[error("file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// A row whose field count disagrees with the declared columns.
    #[error("row {row}: expected {expected} fields, found {found}")]
    Format {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("malformed input: {0}")]
    Malformed(String),
    #[error("column not found: '{0}'")]
    Key(String),
    #[error("duplicate column name: '{0}'")]
    DuplicateColumn(String),
    #[error("cannot aggregate column '{0}': no values")]
    EmptyInput(String),
    #[error("column '{column}', row {row}: '{value}' is not numeric")]
    NotNumeric {
        column: String,
        row: usize,
        value: String,
    },
    #[error("unsupported file extension: .{0}")]
    UnsupportedFormat(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Arrow error: {0}")]
    Arrow(#[from] ArrowError),
    #[error("Parquet error: {0}")]
    Parquet(#[from] ParquetError),
}

pub type Result<T> = std::result::Result<T, TableError>;
