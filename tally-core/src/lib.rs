//! Lazy sequences and composable aggregators
//!
//! This crate provides the evaluation core of the tally pipeline: a
//! single-pass [`Sequence`] with filter/map/flat-map/limit/skip stages, the
//! [`Aggregator`] trait that terminates it, and a library of aggregators in
//! [`collectors`] that nest inside one another (grouping, partitioning,
//! joining, statistics, teeing). Records come from a [`DatasetLoader`].

#![warn(missing_docs)]

pub mod aggregator;
pub mod collectors;
pub mod error;
pub mod record;
#[cfg(feature = "parallel")]
pub mod schedule;
pub mod sequence;
pub mod source;

// Re-export key types for convenience
pub use aggregator::Aggregator;
pub use error::{Error, Result};
pub use record::Car;
#[cfg(feature = "parallel")]
pub use schedule::ParallelConfig;
pub use sequence::{iterate, Sequence};
pub use source::{DatasetLoader, InMemoryLoader};

/// Everything needed to build and evaluate a pipeline
pub mod prelude {
    pub use crate::aggregator::Aggregator;
    pub use crate::collectors::*;
    pub use crate::error::{Error, Result};
    pub use crate::record::Car;
    #[cfg(feature = "parallel")]
    pub use crate::schedule::ParallelConfig;
    pub use crate::sequence::{iterate, Sequence};
    pub use crate::source::{DatasetLoader, InMemoryLoader};
}
