//! Error types for dataset loaders

use thiserror::Error;

/// Error type for dataset loaders
#[derive(Error, Debug)]
pub enum Error {
    /// Core library error
    #[error("Core error: {0}")]
    Core(#[from] tally_core::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV format error
    #[cfg(feature = "csv")]
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON format error
    #[cfg(feature = "json")]
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Unsupported file format
    #[error("Unsupported format: {0}")]
    Unsupported(String),
}

/// Result type for dataset loaders
pub type Result<T> = std::result::Result<T, Error>;

impl From<Error> for tally_core::Error {
    fn from(err: Error) -> Self {
        match err {
            Error::Core(inner) => inner,
            other => tally_core::Error::DataUnavailable(other.to_string()),
        }
    }
}
