//! Delimited text record files
//!
//! Each line after the optional header is deserialized into one record with
//! serde, matching columns to fields by header name.

mod reader;

pub use reader::CsvLoader;
