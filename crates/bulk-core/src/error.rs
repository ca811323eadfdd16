//! Error types for bulk-core

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in bulk-core
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid configuration, raised before any file is touched
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Failed to read a file
    #[error("failed to read file '{path}': {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse CSV
    #[error("failed to parse CSV '{path}': {message}")]
    CsvParse { path: PathBuf, message: String },

    /// CSV parsing error from the csv crate
    #[error("CSV error in '{path}': {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// CSV writing error from the csv crate
    #[error("CSV write error: {0}")]
    CsvWrite(#[from] csv::Error),

    /// Directory traversal error
    #[error("failed to traverse directory: {0}")]
    WalkDir(#[from] walkdir::Error),

    /// A table was built with the same column name twice
    #[error("duplicate column '{0}'")]
    DuplicateColumn(String),

    /// A row does not match the width of its table
    #[error("row has {found} cells, table has {expected} columns")]
    RowWidth { expected: usize, found: usize },

    /// A provenance column already exists in the source data
    #[error("column '{column}' in '{path}' collides with a provenance column")]
    ColumnCollision { path: PathBuf, column: String },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
