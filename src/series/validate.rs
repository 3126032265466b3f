use anyhow::Result;

use crate::{table::AttributeTable, warn::{Warning, WarningSink}};

/// Totals of one additive variable before and after reallocation.
#[derive(Debug, Clone, PartialEq)]
pub struct ConservationReport {
    pub variable: String,
    pub source_total: f64,
    pub interpolated_total: f64,
    /// Absolute change as a percentage of the source total; None unless that total is positive.
    pub pct_diff: Option<f64>,
}

impl ConservationReport {
    fn new(variable: &str, source_total: f64, interpolated_total: f64) -> Self {
        let pct_diff = (source_total > 0.0)
            .then(|| (interpolated_total - source_total).abs() / source_total * 100.0);
        Self { variable: variable.to_string(), source_total, interpolated_total, pct_diff }
    }
}

/// Compare additive totals of `source` and `interpolated`, warning for every
/// variable that moved by more than `tolerance_pct` percent. Variables missing
/// from either table are skipped. Advisory only: never fails on a large change.
pub fn validate(
    year: i32,
    source: &AttributeTable,
    interpolated: &AttributeTable,
    additive: &[String],
    tolerance_pct: f64,
    sink: &dyn WarningSink,
) -> Result<Vec<ConservationReport>> {
    let (source_columns, interpolated_columns) = (source.data_columns(), interpolated.data_columns());
    let mut reports = Vec::with_capacity(additive.len());

    for variable in additive {
        if !source_columns.contains(variable) || !interpolated_columns.contains(variable) { continue }

        let report = ConservationReport::new(variable, source.sum(variable)?, interpolated.sum(variable)?);
        if let Some(pct_diff) = report.pct_diff.filter(|pct| *pct > tolerance_pct) {
            sink.warn(Warning::ConservationAnomaly {
                year,
                variable: variable.clone(),
                source_total: report.source_total,
                interpolated_total: report.interpolated_total,
                pct_diff,
            });
        }
        reports.push(report);
    }

    Ok(reports)
}
