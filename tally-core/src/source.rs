//! Dataset loader contract and the in-memory loader

use std::vec::IntoIter;

use tracing::trace;

use crate::error::Result;
use crate::sequence::Sequence;

/// A provider of an ordered, finite collection of records.
///
/// Implementations report any failure to produce records as
/// [`Error::DataUnavailable`](crate::Error::DataUnavailable).
pub trait DatasetLoader {
    /// The type of records produced by this loader
    type Record;

    /// Load every record, in source order
    fn load_records(&self) -> Result<Vec<Self::Record>>;

    /// Load the records and wrap them in a fresh sequence
    fn sequence(&self) -> Result<Sequence<IntoIter<Self::Record>>> {
        Ok(Sequence::new(self.load_records()?))
    }

    /// Provides a hint about the number of records (if known)
    fn size_hint(&self) -> Option<usize> {
        None
    }
}

/// A loader over records already held in memory
#[derive(Debug, Clone, Default)]
pub struct InMemoryLoader<T> {
    records: Vec<T>,
}

impl<T: Clone> InMemoryLoader<T> {
    /// Create a loader that yields clones of `records`
    pub fn new(records: Vec<T>) -> Self {
        Self { records }
    }

    /// The records this loader yields
    pub fn records(&self) -> &[T] {
        &self.records
    }
}

impl<T: Clone> From<Vec<T>> for InMemoryLoader<T> {
    fn from(records: Vec<T>) -> Self {
        Self::new(records)
    }
}

impl<T: Clone> DatasetLoader for InMemoryLoader<T> {
    type Record = T;

    fn load_records(&self) -> Result<Vec<T>> {
        trace!(records = self.records.len(), "loading in-memory records");
        Ok(self.records.clone())
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.records.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collectors::{counting, joining_with, mapping};
    use crate::error::Error;
    use crate::record::Car;

    struct Unreachable;

    impl DatasetLoader for Unreachable {
        type Record = Car;

        fn load_records(&self) -> Result<Vec<Car>> {
            Err(Error::DataUnavailable("connection refused".into()))
        }
    }

    #[test]
    fn in_memory_sequences_are_independent() {
        let loader = InMemoryLoader::new(vec![
            Car::new(1, "Civic", "Green", 2004, 12_000.0),
            Car::new(2, "Golf", "Blue", 2011, 18_500.0),
        ]);

        let mut first = loader.sequence().unwrap();
        assert_eq!(first.count().unwrap(), 2);

        let models = mapping(|c: Car| c.model().to_owned(), joining_with("/"));
        let joined = loader.sequence().unwrap().collect(&models).unwrap();
        assert_eq!(joined, "Civic/Golf");
        assert_eq!(loader.size_hint(), Some(2));
    }

    #[test]
    fn failing_loader_reports_unavailable() {
        let loader = Unreachable;

        let err = loader.sequence().err().unwrap();
        assert!(err.is_data_unavailable());
        assert_eq!(loader.size_hint(), None);
    }

    #[test]
    fn empty_loader_counts_zero() {
        let loader: InMemoryLoader<i32> = Vec::new().into();
        assert_eq!(loader.sequence().unwrap().collect(&counting()).unwrap(), 0);
    }
}
