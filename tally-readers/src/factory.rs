//! Loader selection by file format

use std::path::PathBuf;

use serde::de::DeserializeOwned;
use tally_core::DatasetLoader;
use tracing::debug;

use crate::common::{FileFormat, LoaderOptions};
use crate::error::{Error, Result};

#[cfg(feature = "csv")]
use crate::csv::CsvLoader;
#[cfg(feature = "json")]
use crate::json::JsonLoader;

/// A loader for any supported record file format
#[derive(Debug, Clone)]
pub enum RecordLoader<T> {
    /// JSON array of records
    #[cfg(feature = "json")]
    Json(JsonLoader<T>),

    /// Delimited text
    #[cfg(feature = "csv")]
    Csv(CsvLoader<T>),
}

impl<T: DeserializeOwned> RecordLoader<T> {
    /// Select a loader from the explicit or detected format in `options`
    pub fn from_options(options: LoaderOptions) -> Result<Self> {
        let format = options.resolved_format().ok_or_else(|| {
            Error::Unsupported(format!(
                "cannot detect record format of {}",
                options.path.display()
            ))
        })?;

        debug!(path = %options.path.display(), %format, "selected record loader");

        match format {
            #[cfg(feature = "json")]
            FileFormat::Json => Ok(Self::Json(JsonLoader::new(options.path))),
            #[cfg(feature = "csv")]
            FileFormat::Csv => Ok(Self::Csv(CsvLoader::new(options))),
            #[allow(unreachable_patterns)]
            other => Err(Error::Unsupported(format!("{other} support is not enabled"))),
        }
    }

    /// The detected format of this loader
    pub fn format(&self) -> FileFormat {
        match self {
            #[cfg(feature = "json")]
            Self::Json(_) => FileFormat::Json,
            #[cfg(feature = "csv")]
            Self::Csv(_) => FileFormat::Csv,
        }
    }
}

impl<T: DeserializeOwned> DatasetLoader for RecordLoader<T> {
    type Record = T;

    fn load_records(&self) -> tally_core::Result<Vec<T>> {
        match self {
            #[cfg(feature = "json")]
            Self::Json(loader) => loader.load_records(),
            #[cfg(feature = "csv")]
            Self::Csv(loader) => loader.load_records(),
        }
    }
}

/// Create a loader for `path`, choosing the format from its extension
pub fn loader_for_path<T: DeserializeOwned>(path: impl Into<PathBuf>) -> Result<RecordLoader<T>> {
    RecordLoader::from_options(LoaderOptions::new(path))
}
