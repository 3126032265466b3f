//! File formats for offline inputs and exported results.
//!
//! - `csv` - per-year attribute tables and flattened result frames

mod csv;

pub use csv::{read_attribute_csv, write_csv, CsvFetcher};
