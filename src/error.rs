use thiserror::Error;

/// Errors surfaced by the public time series entry points.
///
/// Configuration errors are raised before any data is fetched. Fetch errors
/// carry the failing year and the fetcher's own error unchanged.
#[derive(Debug, Error)]
pub enum TimeSeriesError {
    #[error("at least one year must be specified")]
    NoYears,

    #[error("base year {0} must be included in years list")]
    BaseYearNotInYears(i32),

    #[error("base period {0} not found in data")]
    BasePeriodNotFound(i32),

    #[error("comparison period {0} not found in data")]
    ComparisonPeriodNotFound(i32),

    #[error("base and comparison period are both {0}")]
    SamePeriod(i32),

    #[error("data must be a wide time series keyed by (year, variable) columns")]
    NotWide,

    #[error("no variable code specified for {alias:?} in {year}")]
    MissingYearCode {
        alias: String,
        year: i32,
    },

    #[error("unknown geography {0:?}")]
    UnknownGeography(String),

    #[error("unknown dataset {0:?}")]
    UnknownDataset(String),

    #[error("unsupported CRS {0:?}")]
    UnsupportedCrs(String),

    #[error("failed to fetch data for {year}: {source}")]
    Fetch {
        year: i32,
        #[source]
        source: anyhow::Error,
    },

    #[error("invalid time series request: {0}")]
    Config(#[from] serde_json::Error),

    #[error(transparent)]
    Polars(#[from] polars::error::PolarsError),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl TimeSeriesError {
    /// True for errors caused by the request itself rather than by data or I/O.
    pub fn is_config(&self) -> bool {
        matches!(
            self,
            TimeSeriesError::NoYears
                | TimeSeriesError::BaseYearNotInYears(_)
                | TimeSeriesError::BasePeriodNotFound(_)
                | TimeSeriesError::ComparisonPeriodNotFound(_)
                | TimeSeriesError::SamePeriod(_)
                | TimeSeriesError::NotWide
                | TimeSeriesError::MissingYearCode { .. }
                | TimeSeriesError::UnknownGeography(_)
                | TimeSeriesError::UnknownDataset(_)
                | TimeSeriesError::UnsupportedCrs(_)
                | TimeSeriesError::Config(_)
        )
    }
}
