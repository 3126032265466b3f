mod assemble;
mod classify;
mod compare;
mod fetch;
mod interpolate;
mod pipeline;
mod policy;
mod request;
mod result;
mod stability;
mod validate;

pub use assemble::assemble;
pub use classify::{classify, VariableClasses};
pub use compare::{compare_time_periods, CompareOptions, Comparison};
pub use fetch::{YearFetcher, YearRequest};
#[cfg(feature = "interpolation")]
pub use interpolate::AreaWeighted;
pub use interpolate::{default_interpolator, Interpolator, Unavailable};
pub use pipeline::{get_time_series, TimeSeries};
pub use policy::{HarmonizePolicy, DEFAULT_CONSERVATION_TOLERANCE_PCT, DEFAULT_STABLE_COUNTY_SPAN};
pub use request::TimeSeriesRequest;
pub use result::{OutputShape, TidyTable, TimeSeriesResult, WideTable};
pub use stability::needs_interpolation;
pub use validate::{validate, ConservationReport};
