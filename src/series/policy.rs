use serde::{Deserialize, Serialize};

/// Additive totals may drift this many percent during reallocation before a warning is raised.
pub const DEFAULT_CONSERVATION_TOLERANCE_PCT: f64 = 5.0;

/// County boundaries are treated as unchanged across spans shorter than this many years.
pub const DEFAULT_STABLE_COUNTY_SPAN: i32 = 20;

/// Heuristic thresholds used while harmonizing a time series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HarmonizePolicy {
    pub conservation_tolerance_pct: f64,
    pub stable_county_span: i32,
}

impl Default for HarmonizePolicy {
    fn default() -> Self {
        Self {
            conservation_tolerance_pct: DEFAULT_CONSERVATION_TOLERANCE_PCT,
            stable_county_span: DEFAULT_STABLE_COUNTY_SPAN,
        }
    }
}
