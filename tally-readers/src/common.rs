//! Loader options and file format detection

use std::fmt;
use std::path::{Path, PathBuf};

/// Record file formats understood by the loaders
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileFormat {
    /// A JSON array of records
    Json,

    /// Delimited text with one record per line
    Csv,
}

impl FileFormat {
    /// Detect the format of a file based on its extension
    pub fn detect_from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?.to_lowercase();

        match extension.as_str() {
            "json" => Some(Self::Json),
            // TSV is just a CSV with tabs
            "csv" | "tsv" => Some(Self::Csv),
            _ => None,
        }
    }
}

impl fmt::Display for FileFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json => f.write_str("json"),
            Self::Csv => f.write_str("csv"),
        }
    }
}

/// Options for file loaders
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoaderOptions {
    /// File to read
    pub path: PathBuf,

    /// Explicit format, overriding detection from the extension
    pub format: Option<FileFormat>,

    /// Field delimiter for delimited text
    pub delimiter: u8,

    /// Whether delimited text starts with a header row
    pub has_header: bool,

    /// Whether to trim whitespace around delimited fields
    pub trim: bool,
}

impl LoaderOptions {
    /// Options for `path`, with a tab delimiter for `.tsv` files
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let is_tsv = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("tsv"));

        Self {
            path,
            format: None,
            delimiter: if is_tsv { b'\t' } else { b',' },
            has_header: true,
            trim: false,
        }
    }

    /// Force a format instead of detecting it
    #[must_use]
    pub fn with_format(mut self, format: FileFormat) -> Self {
        self.format = Some(format);
        self
    }

    /// Set the field delimiter
    #[must_use]
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Set whether a header row is present
    #[must_use]
    pub fn with_header(mut self, has_header: bool) -> Self {
        self.has_header = has_header;
        self
    }

    /// Set whether fields are trimmed
    #[must_use]
    pub fn with_trim(mut self, trim: bool) -> Self {
        self.trim = trim;
        self
    }

    /// The explicit format, or the one detected from the path
    pub fn resolved_format(&self) -> Option<FileFormat> {
        self.format.or_else(|| FileFormat::detect_from_path(&self.path))
    }
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;

    #[test_case("cars.json", Some(FileFormat::Json) ; "json")]
    #[test_case("cars.CSV", Some(FileFormat::Csv) ; "uppercase csv")]
    #[test_case("cars.tsv", Some(FileFormat::Csv) ; "tsv")]
    #[test_case("cars.parquet", None ; "unknown extension")]
    #[test_case("cars", None ; "no extension")]
    fn detect_format(path: &str, expected: Option<FileFormat>) {
        assert_eq!(FileFormat::detect_from_path(Path::new(path)), expected);
    }

    #[test]
    fn tsv_defaults_to_tabs() {
        assert_eq!(LoaderOptions::new("cars.tsv").delimiter, b'\t');
        assert_eq!(LoaderOptions::new("cars.csv").delimiter, b',');
    }

    #[test]
    fn explicit_format_wins() {
        let options = LoaderOptions::new("cars.txt");
        assert_eq!(options.resolved_format(), None);

        let options = options.with_format(FileFormat::Csv).with_delimiter(b';');
        assert_eq!(options.resolved_format(), Some(FileFormat::Csv));
        assert_eq!(options.delimiter, b';');
    }
}
