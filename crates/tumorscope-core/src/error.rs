use thiserror::Error;

/// Reasons an uploaded CSV cannot be turned into a single feature row.
///
/// Every variant is caused by the client's file, so all of them map to
/// `400 Bad Request` at the HTTP layer.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SampleError {
    #[error("No columns to parse from file.")]
    NoColumns,

    #[error("Malformed CSV: {0}")]
    Malformed(String),

    #[error("CSV file is empty.")]
    Empty,

    #[error("Expected 1 row, found {0} rows.")]
    RowCount(usize),

    #[error("Expected {expected} gene columns, got {got}.")]
    ColumnCount { expected: usize, got: usize },

    #[error("Non-numeric value in column '{column}': {message}")]
    NonNumeric { column: String, message: String },

    #[error("Missing value in column '{column}'.")]
    MissingValue { column: String },

    #[error("Non-finite value in column '{column}'.")]
    NonFinite { column: String },
}
