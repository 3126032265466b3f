#![doc = "Harmonized multi-year census time series"]
mod error;
mod geom;
mod io;
mod series;
mod table;
mod types;
mod warn;

#[doc(inline)]
pub use error::TimeSeriesError;

#[doc(inline)]
pub use geom::{Crs, Geometries};

#[doc(inline)]
pub use io::{read_attribute_csv, write_csv, CsvFetcher};

#[doc(inline)]
pub use series::{
    assemble, classify, compare_time_periods, default_interpolator, get_time_series,
    needs_interpolation, validate, CompareOptions, Comparison, ConservationReport,
    HarmonizePolicy, Interpolator, OutputShape, TidyTable, TimeSeries, TimeSeriesRequest,
    TimeSeriesResult, Unavailable, VariableClasses, WideTable, YearFetcher, YearRequest,
    DEFAULT_CONSERVATION_TOLERANCE_PCT, DEFAULT_STABLE_COUNTY_SPAN,
};

#[cfg(feature = "interpolation")]
#[doc(inline)]
pub use series::AreaWeighted;

#[doc(inline)]
pub use table::{columns, AttributeTable};

#[doc(inline)]
pub use types::{Dataset, GeographyLevel, Stability, Variable, VariableSpec, YearCodes, YearVar};

#[doc(inline)]
pub use warn::{CollectingSink, LogSink, Warning, WarningSink};
