use ahash::AHashSet;

use crate::warn::{Warning, WarningSink};

/// How each attribute column is reallocated across changed boundaries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VariableClasses {
    /// Counts and totals, redistributed in proportion to overlap area.
    pub additive: Vec<String>,
    /// Medians, rates and shares, blended by area-weighted averaging.
    pub rate: Vec<String>,
}

impl VariableClasses {
    /// All classified columns, additive first.
    pub fn all(&self) -> impl Iterator<Item = &str> {
        self.additive.iter().chain(&self.rate).map(String::as_str)
    }
}

/// Partition `data_columns` into additive and rate-like variables.
///
/// With no hints every column is additive. With hints, unlisted columns fall
/// back to additive and hinted columns absent from the data are dropped, each
/// with a warning. A column named by both hints is additive. Both output lists
/// follow the order of `data_columns`.
pub fn classify(
    data_columns: &[String],
    additive_hint: Option<&[String]>,
    rate_hint: Option<&[String]>,
    sink: &dyn WarningSink,
) -> VariableClasses {
    if additive_hint.is_none() && rate_hint.is_none() {
        return VariableClasses { additive: data_columns.to_vec(), rate: Vec::new() };
    }

    let additive_hint: AHashSet<&str> = additive_hint.unwrap_or_default().iter().map(String::as_str).collect();
    let rate_hint: AHashSet<&str> = rate_hint.unwrap_or_default().iter().map(String::as_str).collect();
    let available: AHashSet<&str> = data_columns.iter().map(String::as_str).collect();

    // Hint order is not meaningful, but warnings should be stable.
    let mut missing: Vec<String> = additive_hint.union(&rate_hint)
        .filter(|name| !available.contains(*name))
        .map(|name| name.to_string())
        .collect();
    missing.sort();
    if !missing.is_empty() {
        sink.warn(Warning::MissingHintVariables { names: missing });
    }

    let mut classes = VariableClasses::default();
    let mut unclassified = Vec::new();
    let mut conflicting = Vec::new();

    for column in data_columns {
        match (additive_hint.contains(column.as_str()), rate_hint.contains(column.as_str())) {
            (true, true) => {
                conflicting.push(column.clone());
                classes.additive.push(column.clone());
            }
            (true, false) => classes.additive.push(column.clone()),
            (false, true) => classes.rate.push(column.clone()),
            (false, false) => {
                unclassified.push(column.clone());
                classes.additive.push(column.clone());
            }
        }
    }

    if !conflicting.is_empty() {
        sink.warn(Warning::ConflictingHints { names: conflicting });
    }
    if !unclassified.is_empty() {
        sink.warn(Warning::UnclassifiedVariables { names: unclassified });
    }

    classes
}
