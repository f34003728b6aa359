//! JSON record files

use std::fs::File;
use std::io::{BufReader, Read};
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use tally_core::DatasetLoader;
use tracing::{debug, warn};

use crate::error::Result;

/// Loads a JSON array of records from a file
#[derive(Debug)]
pub struct JsonLoader<T> {
    path: PathBuf,
    _record: PhantomData<fn() -> T>,
}

impl<T> Clone for JsonLoader<T> {
    fn clone(&self) -> Self {
        Self {
            path: self.path.clone(),
            _record: PhantomData,
        }
    }
}

impl<T: DeserializeOwned> JsonLoader<T> {
    /// Create a loader for the file at `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            _record: PhantomData,
        }
    }

    /// The file this loader reads
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read and parse every record in the file
    pub fn read(&self) -> Result<Vec<T>> {
        let file = File::open(&self.path)?;
        let records = Self::read_from(BufReader::new(file))?;

        debug!(path = %self.path.display(), records = records.len(), "loaded json records");
        Ok(records)
    }

    /// Parse a JSON array of records from any reader
    pub fn read_from<R: Read>(reader: R) -> Result<Vec<T>> {
        Ok(serde_json::from_reader(reader)?)
    }
}

impl<T: DeserializeOwned> DatasetLoader for JsonLoader<T> {
    type Record = T;

    fn load_records(&self) -> tally_core::Result<Vec<T>> {
        self.read().map_err(|e| {
            warn!(path = %self.path.display(), error = %e, "failed to load json records");
            e.into()
        })
    }
}

#[cfg(test)]
mod tests {
    use std::io::{Cursor, Write};

    use proptest::prelude::*;
    use tally_core::Car;
    use tempfile::NamedTempFile;

    use super::*;
    use crate::error::Error;

    #[test]
    fn parses_record_array() {
        let data = r#"[
            {"id": 1, "model": "Corolla", "color": "Green", "year": 2004, "price": 12350.75},
            {"id": 2, "model": "Fiesta", "color": "Blue", "year": 2011, "price": 7250.5}
        ]"#;

        let cars = JsonLoader::<Car>::read_from(Cursor::new(data)).unwrap();

        assert_eq!(cars.len(), 2);
        assert_eq!(cars[0], Car::new(1, "Corolla", "Green", 2004, 12_350.75));
        assert_eq!(cars[1].color(), "Blue");
    }

    #[test]
    fn loads_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(
            br#"[
                {"id": 7, "model": "Leaf", "color": "Yellow", "year": 2019, "price": 16300.0}
            ]"#,
        )
        .unwrap();

        let loader = JsonLoader::<Car>::new(file.path());
        let cars = loader.load_records().unwrap();

        assert_eq!(cars, vec![Car::new(7, "Leaf", "Yellow", 2019, 16_300.0)]);
    }

    #[test]
    fn cloned_loader_reads_same_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(
            br#"[
                {"id": 1, "model": "Golf", "color": "Red", "year": 2008, "price": 5100.0}
            ]"#,
        )
        .unwrap();

        let loader = JsonLoader::<Car>::new(file.path());
        let copy = loader.clone();

        assert_eq!(copy.path(), loader.path());
        assert_eq!(copy.load_records().unwrap(), loader.load_records().unwrap());
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let err = JsonLoader::<Car>::read_from(Cursor::new("[{\"id\": 1,")).unwrap_err();
        assert!(matches!(err, Error::Json(_)));
    }

    #[test]
    fn missing_file_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let loader = JsonLoader::<Car>::new(dir.path().join("missing.json"));

        assert!(matches!(loader.read(), Err(Error::Io(_))));
        assert!(loader.load_records().unwrap_err().is_data_unavailable());
    }

    fn any_car() -> impl Strategy<Value = Car> {
        (
            any::<i32>(),
            "[A-Za-z][A-Za-z0-9 ]{0,12}",
            "[A-Za-z]{1,10}",
            1900..2100i32,
            -4_000_000..4_000_000i32,
        )
            .prop_map(|(id, model, color, year, quarters)| {
                Car::new(id, model, color, year, f64::from(quarters) / 4.0)
            })
    }

    proptest! {
        #[test]
        fn serialized_cars_read_back(cars in prop::collection::vec(any_car(), 0..20)) {
            let text = serde_json::to_string(&cars).unwrap();
            let parsed = JsonLoader::<Car>::read_from(Cursor::new(text)).unwrap();
            prop_assert_eq!(parsed, cars);
        }
    }
}
