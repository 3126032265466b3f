use serde::{Deserialize, Serialize};

use crate::{
    error::TimeSeriesError,
    geom::Crs,
    series::{HarmonizePolicy, OutputShape},
    types::{Dataset, GeographyLevel, VariableSpec},
};

fn default_true() -> bool { true }

fn default_crs() -> String { Crs::default().to_string() }

/// Parameters of one time series call.
///
/// Defaults: ACS 5-year, base year = latest year, geometry on, wide output,
/// areas measured in EPSG:3857.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSeriesRequest {
    pub geography: GeographyLevel,
    pub variables: VariableSpec,
    pub years: Vec<i32>,
    #[serde(default)]
    pub dataset: Dataset,
    #[serde(default)]
    pub base_year: Option<i32>,
    /// Columns to reallocate as counts. Unlisted columns default to additive.
    #[serde(default)]
    pub additive_variables: Option<Vec<String>>,
    /// Columns to reallocate as rates, medians or shares.
    #[serde(default)]
    pub rate_variables: Option<Vec<String>>,
    #[serde(default = "default_true")]
    pub include_geometry: bool,
    #[serde(default)]
    pub output: OutputShape,
    /// Planar CRS in which overlap areas are measured.
    #[serde(default = "default_crs")]
    pub crs: String,
    #[serde(default)]
    pub policy: HarmonizePolicy,
}

impl TimeSeriesRequest {
    pub fn new(geography: GeographyLevel, variables: impl Into<VariableSpec>, years: impl Into<Vec<i32>>) -> Self {
        Self {
            geography,
            variables: variables.into(),
            years: years.into(),
            dataset: Dataset::default(),
            base_year: None,
            additive_variables: None,
            rate_variables: None,
            include_geometry: true,
            output: OutputShape::default(),
            crs: default_crs(),
            policy: HarmonizePolicy::default(),
        }
    }

    /// Parse a request from JSON, e.g.
    /// `{"geography": "tract", "variables": {"total_pop": "B01003_001"}, "years": [2015, 2020]}`.
    pub fn from_json(json: &str) -> Result<Self, TimeSeriesError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn dataset(mut self, dataset: Dataset) -> Self { self.dataset = dataset; self }

    pub fn base_year(mut self, year: i32) -> Self { self.base_year = Some(year); self }

    pub fn additive_variables(mut self, names: &[&str]) -> Self {
        self.additive_variables = Some(names.iter().map(|s| s.to_string()).collect());
        self
    }

    pub fn rate_variables(mut self, names: &[&str]) -> Self {
        self.rate_variables = Some(names.iter().map(|s| s.to_string()).collect());
        self
    }

    pub fn include_geometry(mut self, include: bool) -> Self { self.include_geometry = include; self }

    pub fn output(mut self, output: OutputShape) -> Self { self.output = output; self }

    pub fn crs(mut self, crs: impl Into<String>) -> Self { self.crs = crs.into(); self }

    pub fn policy(mut self, policy: HarmonizePolicy) -> Self { self.policy = policy; self }

    /// Check the request and resolve the base year and CRS.
    pub fn validate(&self) -> Result<(i32, Crs), TimeSeriesError> {
        let Some(&latest) = self.years.iter().max() else { return Err(TimeSeriesError::NoYears) };

        let base_year = self.base_year.unwrap_or(latest);
        if !self.years.contains(&base_year) {
            return Err(TimeSeriesError::BaseYearNotInYears(base_year));
        }

        Ok((base_year, self.crs.parse()?))
    }
}
