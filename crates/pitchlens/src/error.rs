//! Error types for the Pitchlens library.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for Pitchlens operations.
///
/// Remote inference failures are not represented here: they are carried as
/// [`crate::llm::InferenceError`] inside each analysis result so that a
/// failed generation never aborts the surrounding workflow.
#[derive(Debug, Error)]
pub enum PitchlensError {
    /// Error reading or accessing a file.
    #[error("IO error for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error from the CSV library.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Empty file or no data rows.
    #[error("Empty data: {0}")]
    EmptyData(String),

    /// A required column is absent from an uploaded table.
    #[error("Missing column '{column}' in {table} table")]
    MissingColumn { table: String, column: String },

    /// A cell could not be read as the type its column requires.
    #[error("Invalid value '{value}' in column '{column}' at row {row}")]
    InvalidValue {
        row: usize,
        column: String,
        value: String,
    },

    /// The requested identifier is not present in the table.
    #[error("Player ID '{0}' not found")]
    PlayerNotFound(String),

    /// A table slot has not been loaded yet.
    #[error("No data loaded for {0}")]
    NotLoaded(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Rendered output was not valid UTF-8.
    #[error("Encoding error: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for Pitchlens operations.
pub type Result<T> = std::result::Result<T, PitchlensError>;
