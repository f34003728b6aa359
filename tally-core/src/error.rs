//! Error types for aggregation pipelines

use thiserror::Error;

/// Result type for aggregation pipeline operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for aggregation pipeline operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A stage or aggregator was configured with an argument outside its contract
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The sequence was already consumed by a terminal operation
    #[error("Illegal state: {0}")]
    IllegalState(String),

    /// An aggregator without a seed or sentinel received no elements
    #[error("Empty aggregation: {0}")]
    EmptyAggregation(String),

    /// A map-building aggregator found two values for one key and has no merge policy
    #[error("Duplicate key: {0}")]
    DuplicateKey(String),

    /// The dataset backing a loader is missing or corrupt
    #[error("Data unavailable: {0}")]
    DataUnavailable(String),
}

impl Error {
    /// Whether this error was raised by the external dataset loader rather than the pipeline
    pub fn is_data_unavailable(&self) -> bool {
        matches!(self, Error::DataUnavailable(_))
    }
}
