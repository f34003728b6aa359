//! CSV loader implementation

use std::fs::File;
use std::io::{BufReader, Read};
use std::marker::PhantomData;

use csv::{ReaderBuilder, Trim};
use serde::de::DeserializeOwned;
use tally_core::DatasetLoader;
use tracing::{debug, warn};

use crate::common::LoaderOptions;
use crate::error::Result;

/// Loads delimited text records from a file
#[derive(Debug)]
pub struct CsvLoader<T> {
    options: LoaderOptions,
    _record: PhantomData<fn() -> T>,
}

impl<T> Clone for CsvLoader<T> {
    fn clone(&self) -> Self {
        Self {
            options: self.options.clone(),
            _record: PhantomData,
        }
    }
}

impl<T: DeserializeOwned> CsvLoader<T> {
    /// Create a loader; the delimiter, header flag and trimming come from `options`
    pub fn new(options: LoaderOptions) -> Self {
        Self {
            options,
            _record: PhantomData,
        }
    }

    /// Loader options
    pub fn options(&self) -> &LoaderOptions {
        &self.options
    }

    /// Read and parse every record in the configured file
    pub fn read(&self) -> Result<Vec<T>> {
        let file = File::open(&self.options.path)?;
        let records = self.read_from(BufReader::new(file))?;

        debug!(
            path = %self.options.path.display(),
            records = records.len(),
            "loaded csv records"
        );
        Ok(records)
    }

    /// Parse records from any reader using the configured dialect
    pub fn read_from<R: Read>(&self, reader: R) -> Result<Vec<T>> {
        let mut csv_reader = ReaderBuilder::new()
            .delimiter(self.options.delimiter)
            .has_headers(self.options.has_header)
            .trim(if self.options.trim { Trim::All } else { Trim::None })
            .from_reader(reader);

        let mut records = Vec::new();
        for record in csv_reader.deserialize() {
            records.push(record?);
        }
        Ok(records)
    }
}

impl<T: DeserializeOwned> DatasetLoader for CsvLoader<T> {
    type Record = T;

    fn load_records(&self) -> tally_core::Result<Vec<T>> {
        self.read().map_err(|e| {
            warn!(
                path = %self.options.path.display(),
                error = %e,
                "failed to load csv records"
            );
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
    use test_case::test_case;

    use super::*;
    use crate::error::Error;

    fn loader(options: LoaderOptions) -> CsvLoader<Car> {
        CsvLoader::new(options)
    }

    #[test]
    fn reads_rows_in_order() {
        let data = "\
id,model,color,year,price
1,Corolla,Green,2004,12350.75
2,Fiesta,Blue,2011,7250.5
";
        let cars = loader(LoaderOptions::new("cars.csv"))
            .read_from(Cursor::new(data))
            .unwrap();

        assert_eq!(
            cars,
            vec![
                Car::new(1, "Corolla", "Green", 2004, 12_350.75),
                Car::new(2, "Fiesta", "Blue", 2011, 7_250.5),
            ]
        );
    }

    #[test_case(b';', "id;model;color;year;price\n5;Rio;Red;2009;5005.16\n" ; "semicolon")]
    #[test_case(b'\t', "id\tmodel\tcolor\tyear\tprice\n5\tRio\tRed\t2009\t5005.16\n" ; "tab")]
    fn custom_delimiters(delimiter: u8, data: &str) {
        let options = LoaderOptions::new("cars.txt").with_delimiter(delimiter);
        let cars = loader(options).read_from(Cursor::new(data)).unwrap();

        assert_eq!(cars, vec![Car::new(5, "Rio", "Red", 2009, 5_005.16)]);
    }

    #[test]
    fn headerless_rows_are_positional() {
        let options = LoaderOptions::new("cars.csv").with_header(false);
        let cars = loader(options)
            .read_from(Cursor::new("9,Impreza,Green,2013,11800.6\n"))
            .unwrap();

        assert_eq!(cars[0].model(), "Impreza");
    }

    #[test]
    fn trimming_strips_padding() {
        let data = "id, model, color, year, price\n1, Corolla, Green, 2004, 12350.75\n";

        let trimmed = loader(LoaderOptions::new("cars.csv").with_trim(true))
            .read_from(Cursor::new(data))
            .unwrap();
        assert_eq!(trimmed[0].color(), "Green");

        let untrimmed = loader(LoaderOptions::new("cars.csv")).read_from(Cursor::new(data));
        assert!(matches!(untrimmed, Err(Error::Csv(_))));
    }

    #[test]
    fn loads_tsv_file() {
        let mut file = tempfile::Builder::new().suffix(".tsv").tempfile().unwrap();
        file.write_all(b"id\tmodel\tcolor\tyear\tprice\n3\tCivic\tPink\t1999\t4300\n")
            .unwrap();

        let cars = loader(LoaderOptions::new(file.path())).load_records().unwrap();
        assert_eq!(cars, vec![Car::new(3, "Civic", "Pink", 1999, 4_300.0)]);
    }

    #[test]
    fn bad_field_is_unavailable() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"id,model,color,year,price\none,Civic,Pink,1999,4300\n")
            .unwrap();

        let options = LoaderOptions::new(file.path()).with_format(crate::FileFormat::Csv);
        let err = loader(options).load_records().unwrap_err();
        assert!(err.is_data_unavailable());
    }

    fn any_car() -> impl Strategy<Value = Car> {
        (
            any::<i32>(),
            "[A-Za-z][A-Za-z0-9 ,\"]{0,12}",
            "[A-Za-z]{1,10}",
            1900..2100i32,
            -4_000_000..4_000_000i32,
        )
            .prop_map(|(id, model, color, year, quarters)| {
                Car::new(id, model, color, year, f64::from(quarters) / 4.0)
            })
    }

    fn write_rows(cars: &[Car], delimiter: u8) -> Vec<u8> {
        let mut writer = ::csv::WriterBuilder::new()
            .delimiter(delimiter)
            .from_writer(Vec::new());
        for car in cars {
            writer.serialize(car).unwrap();
        }
        writer.into_inner().unwrap()
    }

    proptest! {
        #[test]
        fn written_rows_read_back(
            cars in prop::collection::vec(any_car(), 0..20),
            delimiter in prop::sample::select(vec![b',', b';', b'\t']),
        ) {
            let bytes = write_rows(&cars, delimiter);
            let options = LoaderOptions::new("cars.csv").with_delimiter(delimiter);
            let parsed = loader(options).read_from(Cursor::new(bytes)).unwrap();
            prop_assert_eq!(parsed, cars);
        }
    }
}
