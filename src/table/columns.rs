use anyhow::{Context, Result};
use polars::prelude::*;

pub const GEOID: &str = "GEOID";
pub const NAME: &str = "NAME";
pub const GEOMETRY: &str = "geometry";

/// Identifier columns carried through joins, in output order.
pub const KEY_COLUMNS: [&str; 4] = [GEOID, NAME, "state", "county"];

/// Identifier and metadata columns that never hold attribute values.
pub const RESERVED_COLUMNS: [&str; 13] = [
    GEOID,
    NAME,
    GEOMETRY,
    "state",
    "county",
    "tract",
    "block group",
    "variable",
    "estimate",
    "moe",
    "summary_var",
    "summary_est",
    "summary_moe",
];

/// Check whether a column holds attribute values rather than identifiers.
#[inline]
pub fn is_data_column(name: &str) -> bool { !RESERVED_COLUMNS.contains(&name) }

/// Names of all attribute columns of `df`, in frame order.
pub fn data_columns(df: &DataFrame) -> Vec<String> {
    df.get_column_names().into_iter()
        .map(|name| name.as_str())
        .filter(|name| is_data_column(name))
        .map(str::to_string)
        .collect()
}

/// Names of the key columns present in `df`, in `KEY_COLUMNS` order.
pub fn key_columns(df: &DataFrame) -> Vec<&'static str> {
    KEY_COLUMNS.into_iter()
        .filter(|name| df.column(name).is_ok())
        .collect()
}

/// Read a column as nullable f64, casting numeric or textual columns as needed.
pub fn f64_values(df: &DataFrame, name: &str) -> Result<Vec<Option<f64>>> {
    let column = df.column(name)
        .with_context(|| format!("missing column {name:?}"))?;

    let column = if column.dtype() != &DataType::Float64 {
        column.cast(&DataType::Float64)
            .with_context(|| format!("column {name:?} is not numeric"))?
    } else {
        column.clone()
    };

    Ok(column.f64()?.into_iter().collect())
}

/// Read a column as nullable strings.
pub fn str_values(df: &DataFrame, name: &str) -> Result<Vec<Option<String>>> {
    let column = df.column(name)
        .with_context(|| format!("missing column {name:?}"))?;

    let column = if column.dtype() != &DataType::String {
        column.cast(&DataType::String)?
    } else {
        column.clone()
    };

    Ok(column.str()?.into_iter()
        .map(|value| value.map(str::to_string))
        .collect())
}
