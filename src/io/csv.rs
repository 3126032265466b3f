//! CSV reading and writing.

use std::{fs::File, path::{Path, PathBuf}};

use anyhow::{Context, Result};
use polars::prelude::*;

use crate::{
    series::{YearFetcher, YearRequest},
    table::{columns, AttributeTable},
};

/// Read an attribute table from CSV.
///
/// Every column is read as text so that identifiers keep their leading zeros,
/// then attribute columns are cast to f64. Unparsable values become null.
pub fn read_attribute_csv(path: &Path) -> Result<DataFrame> {
    let file = File::open(path)
        .with_context(|| format!("[io::csv] Failed to open CSV file: {}", path.display()))?;
    let mut df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .into_reader_with_file_handle(file)
        .finish()
        .with_context(|| format!("[io::csv] Failed to read CSV from {:?}", path))?;

    for name in columns::data_columns(&df) {
        let column = df.column(&name)?.cast(&DataType::Float64)?;
        df.with_column(column)?;
    }
    Ok(df)
}

/// Write a frame, e.g. [`TimeSeriesResult::to_dataframe`](crate::TimeSeriesResult::to_dataframe), to CSV.
pub fn write_csv(df: &mut DataFrame, path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("[io::csv] Failed to create CSV file: {}", path.display()))?;
    CsvWriter::new(file)
        .finish(df)
        .with_context(|| format!("[io::csv] Failed to write CSV to {:?}", path))
}

/// Offline fetcher reading one `<year>.csv` per year from a directory.
///
/// Each requested variable is looked up by its reported name, then by its
/// code, and renamed to the reported name. CSV tables carry no geometry.
#[derive(Debug, Clone)]
pub struct CsvFetcher {
    dir: PathBuf,
}

impl CsvFetcher {
    pub fn new(dir: impl Into<PathBuf>) -> Self { Self { dir: dir.into() } }

    /// Path of the table for `year`.
    pub fn path(&self, year: i32) -> PathBuf { self.dir.join(format!("{year}.csv")) }
}

impl YearFetcher for CsvFetcher {
    fn fetch_year(&self, request: &YearRequest<'_>) -> Result<AttributeTable> {
        let path = self.path(request.year);
        let df = read_attribute_csv(&path)?;

        let mut selected = columns::key_columns(&df).into_iter()
            .map(|name| df.column(name).cloned())
            .collect::<PolarsResult<Vec<Column>>>()?;

        for variable in request.variables {
            let column = df.column(&variable.name)
                .or_else(|_| df.column(&variable.code))
                .with_context(|| format!("[io::csv] {} has no column for {}", path.display(), variable.code))?;
            selected.push(column.clone().with_name(variable.name.as_str().into()));
        }

        if request.include_geometry {
            log::debug!("{} carries no geometry", path.display());
        }

        AttributeTable::new(DataFrame::new(selected)?, None)
            .with_context(|| format!("[io::csv] Invalid attribute table in {}", path.display()))
    }
}
