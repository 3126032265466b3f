use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::TimeSeriesError;

/// Census data product a time series is drawn from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Dataset {
    /// ACS 5-year estimates.
    #[default]
    Acs5,
    /// ACS 1-year estimates.
    Acs1,
    /// Decennial census.
    Decennial,
}

impl Dataset {
    pub fn to_str(&self) -> &'static str {
        match self {
            Dataset::Acs5 => "acs5",
            Dataset::Acs1 => "acs1",
            Dataset::Decennial => "decennial",
        }
    }

    /// The survey name to request for `year`. Decennial tables moved from
    /// summary file 1 to the redistricting (PL 94-171) file in 2020.
    pub fn survey(&self, year: i32) -> &'static str {
        match self {
            Dataset::Decennial if year >= 2020 => "pl",
            Dataset::Decennial => "sf1",
            other => other.to_str(),
        }
    }
}

impl fmt::Display for Dataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_str())
    }
}

impl FromStr for Dataset {
    type Err = TimeSeriesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "acs5" => Ok(Dataset::Acs5),
            "acs1" => Ok(Dataset::Acs1),
            "decennial" => Ok(Dataset::Decennial),
            _ => Err(TimeSeriesError::UnknownDataset(s.to_string())),
        }
    }
}

impl TryFrom<String> for Dataset {
    type Error = TimeSeriesError;

    fn try_from(value: String) -> Result<Self, Self::Error> { value.parse() }
}

impl From<Dataset> for String {
    fn from(dataset: Dataset) -> Self { dataset.to_str().to_string() }
}
