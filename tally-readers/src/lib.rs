//! Dataset loaders for tally pipelines
//!
//! This crate reads record files into [`tally_core::Sequence`]s through the
//! [`DatasetLoader`] contract. JSON arrays and delimited text are supported,
//! with the format chosen from the file extension or set explicitly in
//! [`LoaderOptions`].

#![warn(missing_docs)]

mod error;
#[cfg(any(feature = "csv", feature = "json"))]
mod factory;

#[cfg(feature = "csv")]
pub mod csv;

#[cfg(feature = "json")]
pub mod json;

#[cfg(feature = "json")]
pub mod mock_data;

pub mod common;

pub use common::{FileFormat, LoaderOptions};
pub use error::{Error, Result};
#[cfg(any(feature = "csv", feature = "json"))]
pub use factory::{loader_for_path, RecordLoader};

#[cfg(feature = "csv")]
pub use crate::csv::CsvLoader;
#[cfg(feature = "json")]
pub use json::JsonLoader;

// Re-export core types
pub use tally_core::{DatasetLoader, Result as CoreResult};
