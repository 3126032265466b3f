use std::{cell::RefCell, fmt};

/// An advisory condition: the call still succeeds, but the caller should know.
#[derive(Debug, Clone, PartialEq)]
pub enum Warning {
    /// Boundaries change over the requested span but no interpolation engine is available.
    InterpolationUnavailable,
    /// Boundaries change over the requested span but geometry was not requested.
    GeometryNotRequested,
    /// Reallocating `year` failed; that year is reported on its own boundaries.
    InterpolationFailed { year: i32, reason: String },
    /// An additive total moved by more than the conservation tolerance.
    ConservationAnomaly {
        year: i32,
        variable: String,
        source_total: f64,
        interpolated_total: f64,
        pct_diff: f64,
    },
    /// Classification hints naming columns that are not in the data.
    MissingHintVariables { names: Vec<String> },
    /// Columns not named by either hint list; they are treated as additive.
    UnclassifiedVariables { names: Vec<String> },
    /// Columns named by both hint lists; they are treated as additive.
    ConflictingHints { names: Vec<String> },
    /// Null additive values that were reallocated as zero.
    NullValues { variable: String, count: usize },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::InterpolationUnavailable => write!(f, "area interpolation is unavailable; proceeding without it, \
                results may be inaccurate for geographies with changing boundaries"),
            Warning::GeometryNotRequested => write!(f, "geometry was not requested; skipping area interpolation, \
                results may be inaccurate for geographies with changing boundaries"),
            Warning::InterpolationFailed { year, reason } =>
                write!(f, "area interpolation failed for {year}: {reason}; using original boundaries"),
            Warning::ConservationAnomaly { year, variable, source_total, interpolated_total, pct_diff } =>
                write!(f, "large difference in total for {variable} ({year}): \
                    {source_total:.0} -> {interpolated_total:.0} ({pct_diff:.1}% change)"),
            Warning::MissingHintVariables { names } =>
                write!(f, "some specified variables not found in data: {}", names.join(", ")),
            Warning::UnclassifiedVariables { names } =>
                write!(f, "variables not classified, treating as additive: {}", names.join(", ")),
            Warning::ConflictingHints { names } =>
                write!(f, "variables listed as both additive and rate-like, treating as additive: {}", names.join(", ")),
            Warning::NullValues { variable, count } =>
                write!(f, "{count} null values in {variable} reallocated as zero"),
        }
    }
}

/// Destination for advisory warnings raised while building a time series.
pub trait WarningSink {
    fn warn(&self, warning: Warning);
}

/// Forwards every warning to the `log` facade.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

impl WarningSink for LogSink {
    fn warn(&self, warning: Warning) {
        log::warn!("{warning}");
    }
}

/// Keeps every warning in memory, in the order raised.
#[derive(Debug, Default)]
pub struct CollectingSink {
    warnings: RefCell<Vec<Warning>>,
}

impl CollectingSink {
    pub fn new() -> Self { Self::default() }

    /// Snapshot of the warnings raised so far.
    pub fn warnings(&self) -> Vec<Warning> { self.warnings.borrow().clone() }

    /// Drain the collected warnings.
    pub fn take(&self) -> Vec<Warning> { self.warnings.borrow_mut().drain(..).collect() }

    #[inline] pub fn is_empty(&self) -> bool { self.warnings.borrow().is_empty() }
}

impl WarningSink for CollectingSink {
    fn warn(&self, warning: Warning) {
        self.warnings.borrow_mut().push(warning);
    }
}

impl<S: WarningSink + ?Sized> WarningSink for &S {
    fn warn(&self, warning: Warning) { (**self).warn(warning) }
}
