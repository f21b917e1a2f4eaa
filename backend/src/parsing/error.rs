//! Error types for dataset loading.

/// Result type for dataset loading.
pub type LoadResult<T> = Result<T, DataLoadError>;

/// The source could not be turned into a [`Dataset`](crate::models::Dataset).
///
/// A failed load never touches the active dataset.
#[derive(Debug, thiserror::Error)]
pub enum DataLoadError {
    /// The source file or stream could not be read.
    #[error("Failed to read dataset: {0}")]
    Io(#[from] std::io::Error),

    /// The bytes are not valid CSV (bad quoting, ragged rows, invalid UTF-8).
    #[error("Malformed CSV: {0}")]
    Csv(#[from] csv::Error),

    /// A column the analytics depend on is absent from the header.
    #[error("Dataset is missing required column '{0}'")]
    MissingColumn(&'static str),

    /// A cell could not be converted to the column's type.
    #[error("Invalid value {value:?} in column '{column}' at line {line}")]
    InvalidValue {
        line: u64,
        column: &'static str,
        value: String,
    },

    /// The reservation status date is empty or not a recognised date format.
    #[error("Unparseable reservation_status_date {value:?} at line {line}")]
    InvalidDate { line: u64, value: String },
}

impl DataLoadError {
    /// Short machine-readable code for API responses.
    pub fn code(&self) -> &'static str {
        match self {
            DataLoadError::Io(_) => "DATASET_UNREADABLE",
            DataLoadError::Csv(_) => "MALFORMED_CSV",
            DataLoadError::MissingColumn(_) => "MISSING_COLUMN",
            DataLoadError::InvalidValue { .. } => "INVALID_VALUE",
            DataLoadError::InvalidDate { .. } => "INVALID_DATE",
        }
    }
}
