use anyhow::Result;
use polars::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{
    error::TimeSeriesError,
    geom::Geometries,
    table::columns,
    types::YearVar,
};

/// Layout of an assembled time series.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputShape {
    /// One row per unit, one column per (year, variable).
    #[default]
    Wide,
    /// One row per (unit, variable, year) with a single `estimate` column.
    Tidy,
}

/// One row per geographic unit, with attribute columns keyed by (year, variable).
#[derive(Debug, Clone)]
pub struct WideTable {
    pub(crate) keys: DataFrame,
    pub(crate) columns: Vec<(YearVar, Vec<Option<f64>>)>,
    pub(crate) geoms: Option<Geometries>,
}

impl WideTable {
    /// Get the number of rows.
    #[inline] pub fn len(&self) -> usize { self.keys.height() }

    /// Check if there are no rows.
    #[inline] pub fn is_empty(&self) -> bool { self.keys.height() == 0 }

    /// Identifier columns (`GEOID` and any of `NAME`, `state`, `county`), one row per unit.
    #[inline] pub fn keys(&self) -> &DataFrame { &self.keys }

    /// Geometry, carried once for all years.
    #[inline] pub fn geoms(&self) -> Option<&Geometries> { self.geoms.as_ref() }

    /// Attribute column keys, chronologically, in each year's column order.
    pub fn column_keys(&self) -> impl Iterator<Item = &YearVar> {
        self.columns.iter().map(|(key, _)| key)
    }

    /// Values of one (year, variable) column, in row order.
    pub fn get(&self, key: &YearVar) -> Option<&[Option<f64>]> {
        self.columns.iter()
            .find(|(candidate, _)| candidate == key)
            .map(|(_, values)| values.as_slice())
    }

    /// Years present in the column keys, ascending.
    pub fn years(&self) -> Vec<i32> {
        let mut years: Vec<i32> = self.column_keys().map(|key| key.year).collect();
        years.dedup();
        years
    }

    /// Distinct variable names, in first-seen order.
    pub fn variables(&self) -> Vec<String> {
        let mut variables: Vec<String> = Vec::new();
        for key in self.column_keys() {
            if !variables.contains(&key.variable) {
                variables.push(key.variable.clone());
            }
        }
        variables
    }

    /// GEOIDs in row order.
    pub fn geo_ids(&self) -> Result<Vec<String>> {
        Ok(columns::str_values(&self.keys, columns::GEOID)?
            .into_iter()
            .map(|geo_id| geo_id.unwrap_or_default())
            .collect())
    }

    /// Flatten into a single frame, naming attribute columns `{variable}_{year}`.
    pub fn to_dataframe(&self) -> Result<DataFrame> {
        let mut df = self.keys.clone();
        for (key, values) in &self.columns {
            df.with_column(Column::new(key.column_name().into(), values))?;
        }
        Ok(df)
    }
}

/// One row per (unit, variable, year).
#[derive(Debug, Clone)]
pub struct TidyTable {
    pub(crate) data: DataFrame,
    pub(crate) geoms: Option<Geometries>,
}

impl TidyTable {
    /// Get the number of rows.
    #[inline] pub fn len(&self) -> usize { self.data.height() }

    /// Check if there are no rows.
    #[inline] pub fn is_empty(&self) -> bool { self.data.height() == 0 }

    /// Key columns followed by `variable`, `estimate` and `year`.
    #[inline] pub fn data(&self) -> &DataFrame { &self.data }

    /// Geometry of each row's unit, if geometry was requested.
    #[inline] pub fn geoms(&self) -> Option<&Geometries> { self.geoms.as_ref() }
}

/// A harmonized multi-year table, in the requested shape.
#[derive(Debug, Clone)]
pub enum TimeSeriesResult {
    Wide(WideTable),
    Tidy(TidyTable),
}

impl TimeSeriesResult {
    #[inline] pub fn len(&self) -> usize {
        match self {
            TimeSeriesResult::Wide(wide) => wide.len(),
            TimeSeriesResult::Tidy(tidy) => tidy.len(),
        }
    }

    #[inline] pub fn is_empty(&self) -> bool { self.len() == 0 }

    /// Borrow the wide table, or fail with `NotWide`.
    pub fn as_wide(&self) -> Result<&WideTable, TimeSeriesError> {
        match self {
            TimeSeriesResult::Wide(wide) => Ok(wide),
            TimeSeriesResult::Tidy(_) => Err(TimeSeriesError::NotWide),
        }
    }

    /// Geometry, if the series carries any.
    pub fn geoms(&self) -> Option<&Geometries> {
        match self {
            TimeSeriesResult::Wide(wide) => wide.geoms(),
            TimeSeriesResult::Tidy(tidy) => tidy.geoms(),
        }
    }

    /// The result as one flat frame (wide columns named `{variable}_{year}`).
    pub fn to_dataframe(&self) -> Result<DataFrame> {
        match self {
            TimeSeriesResult::Wide(wide) => wide.to_dataframe(),
            TimeSeriesResult::Tidy(tidy) => Ok(tidy.data.clone()),
        }
    }
}
