//! Error types for the Cartwise library.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for Cartwise operations.
///
/// An empty filter or ranking result is never an error; those stages
/// return empty vectors.
#[derive(Debug, Error)]
pub enum CartwiseError {
    /// Error reading or accessing a file.
    #[error("IO error for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A cell could not be parsed into the type its column requires.
    #[error("Parse error at row {row}, column '{column}': {message}")]
    Parse {
        row: usize,
        column: String,
        message: String,
    },

    /// Error from the CSV library.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Invalid delimiter detected or specified.
    #[error("Invalid delimiter: {0}")]
    InvalidDelimiter(String),

    /// Empty file or no columns to read.
    #[error("Empty data: {0}")]
    EmptyData(String),

    /// A product's summed quantity does not fit in an `i64`.
    #[error("Quantity total for '{product}' does not fit in a 64-bit integer")]
    QuantityOverflow { product: String },

    /// Required columns are missing from an input table.
    #[error("Schema error in {table} table: missing column(s) {}", missing.join(", "))]
    Schema { table: String, missing: Vec<String> },

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Regex compilation error.
    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),
}

impl CartwiseError {
    /// Names of the missing columns, if this is a schema error.
    pub fn missing_columns(&self) -> &[String] {
        match self {
            CartwiseError::Schema { missing, .. } => missing,
            _ => &[],
        }
    }
}

/// Result type alias for Cartwise operations.
pub type Result<T> = std::result::Result<T, CartwiseError>;
