use std::fmt;

/// Column key of a wide time series: one attribute observed in one year.
///
/// Ordered by year first so that iterating a sorted set of keys walks the
/// series chronologically.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct YearVar {
    pub year: i32,
    pub variable: String,
}

impl YearVar {
    pub fn new(year: i32, variable: impl Into<String>) -> Self {
        Self { year, variable: variable.into() }
    }

    /// Flat column name used when the key has to become a single string.
    pub fn column_name(&self) -> String { format!("{}_{}", self.variable, self.year) }
}

impl fmt::Display for YearVar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.year, self.variable)
    }
}

impl<S: Into<String>> From<(i32, S)> for YearVar {
    fn from((year, variable): (i32, S)) -> Self { Self::new(year, variable) }
}
