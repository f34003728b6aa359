//! The bundled car listings fixture

use std::path::PathBuf;

use tally_core::{Car, DatasetLoader};

use crate::json::JsonLoader;

/// Location of the bundled car listings
pub fn cars_path() -> PathBuf {
    PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/data/cars.json"))
}

/// A loader over the bundled car listings
pub fn cars_loader() -> JsonLoader<Car> {
    JsonLoader::new(cars_path())
}

/// Load the bundled car listings, in file order
pub fn cars() -> tally_core::Result<Vec<Car>> {
    cars_loader().load_records()
}
