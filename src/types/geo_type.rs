use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::TimeSeriesError;

/// How reliably a geography level keeps its boundaries between vintages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stability {
    /// Boundaries never change (census regions, divisions, states).
    Permanent,
    /// Boundaries rarely change, so short spans can be treated as identical.
    ShortSpan,
    /// Boundaries are redrawn every decennial census or more often.
    Redrawn,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum GeographyLevel {
    Region,     // Highest-level entity
    Division,   // Division -> Region
    State,      // State -> Division
    County,     // County -> State
    Tract,      // Tract -> County
    Group,      // Group -> Tract
    Block,      // Lowest-level entity
    Place,      // Place -> State
    Zcta,       // Zip code tabulation area
}

impl GeographyLevel {
    pub fn to_str(&self) -> &'static str {
        match self {
            GeographyLevel::Region => "region",
            GeographyLevel::Division => "division",
            GeographyLevel::State => "state",
            GeographyLevel::County => "county",
            GeographyLevel::Tract => "tract",
            GeographyLevel::Group => "block group",
            GeographyLevel::Block => "block",
            GeographyLevel::Place => "place",
            GeographyLevel::Zcta => "zcta",
        }
    }

    pub fn stability(&self) -> Stability {
        match self {
            GeographyLevel::Region | GeographyLevel::Division | GeographyLevel::State => Stability::Permanent,
            GeographyLevel::County => Stability::ShortSpan,
            _ => Stability::Redrawn,
        }
    }

    pub fn order() -> [GeographyLevel; 9] {
        [
            GeographyLevel::Region,
            GeographyLevel::Division,
            GeographyLevel::State,
            GeographyLevel::County,
            GeographyLevel::Tract,
            GeographyLevel::Group,
            GeographyLevel::Block,
            GeographyLevel::Place,
            GeographyLevel::Zcta,
        ]
    }
}

impl fmt::Display for GeographyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_str())
    }
}

impl FromStr for GeographyLevel {
    type Err = TimeSeriesError;

    /// Case-insensitive; accepts "block group", "block_group" and "bg" for block groups.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('_', " ");
        match normalized.as_str() {
            "block group" | "bg" | "group" => Ok(GeographyLevel::Group),
            "zip code tabulation area" => Ok(GeographyLevel::Zcta),
            other => GeographyLevel::order().into_iter()
                .find(|level| level.to_str() == other)
                .ok_or_else(|| TimeSeriesError::UnknownGeography(s.to_string())),
        }
    }
}

impl TryFrom<String> for GeographyLevel {
    type Error = TimeSeriesError;

    fn try_from(value: String) -> Result<Self, Self::Error> { value.parse() }
}

impl From<GeographyLevel> for String {
    fn from(level: GeographyLevel) -> Self { level.to_str().to_string() }
}
