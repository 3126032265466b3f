use polars::prelude::*;

use crate::{
    error::TimeSeriesError,
    geom::Geometries,
    series::{TimeSeriesResult, WideTable},
    types::YearVar,
};

/// Which derived columns a period comparison adds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompareOptions {
    pub change: bool,
    pub pct_change: bool,
}

impl Default for CompareOptions {
    fn default() -> Self { Self { change: true, pct_change: true } }
}

/// Two periods of a wide time series side by side, with derived change columns.
#[derive(Debug, Clone)]
pub struct Comparison {
    pub data: DataFrame,
    pub geoms: Option<Geometries>,
}

/// Compare two periods of a wide time series.
///
/// Fails with `NotWide` for tidy results. See [`WideTable::compare`].
pub fn compare_time_periods(
    result: &TimeSeriesResult,
    base_period: i32,
    comparison_period: i32,
    variables: Option<&[String]>,
    options: CompareOptions,
) -> Result<Comparison, TimeSeriesError> {
    result.as_wide()?.compare(base_period, comparison_period, variables, options)
}

impl WideTable {
    /// Compare `base_period` against `comparison_period`.
    ///
    /// For each variable present in both periods, emits `{var}_{base}` and
    /// `{var}_{comparison}`, then optionally `{var}_change` and
    /// `{var}_pct_change`. Percent change is null where the base is zero.
    /// Variables missing from either period are skipped. With no explicit
    /// list, every variable of the table is compared.
    pub fn compare(
        &self,
        base_period: i32,
        comparison_period: i32,
        variables: Option<&[String]>,
        options: CompareOptions,
    ) -> Result<Comparison, TimeSeriesError> {
        let years = self.years();
        if !years.contains(&base_period) {
            return Err(TimeSeriesError::BasePeriodNotFound(base_period));
        }
        if !years.contains(&comparison_period) {
            return Err(TimeSeriesError::ComparisonPeriodNotFound(comparison_period));
        }
        if base_period == comparison_period {
            return Err(TimeSeriesError::SamePeriod(base_period));
        }

        let variables = match variables {
            Some(variables) => variables.to_vec(),
            None => self.variables(),
        };

        let mut data = self.keys.clone();
        for variable in &variables {
            let (Some(base), Some(comparison)) = (
                self.get(&YearVar::new(base_period, variable.as_str())),
                self.get(&YearVar::new(comparison_period, variable.as_str())),
            ) else { continue };

            data.with_column(Column::new(format!("{variable}_{base_period}").into(), base))?;
            data.with_column(Column::new(format!("{variable}_{comparison_period}").into(), comparison))?;

            if options.change {
                let change: Vec<Option<f64>> = base.iter().zip(comparison)
                    .map(|(b, c)| Some(c.as_ref()? - b.as_ref()?))
                    .collect();
                data.with_column(Column::new(format!("{variable}_change").into(), change))?;
            }

            if options.pct_change {
                let pct_change: Vec<Option<f64>> = base.iter().zip(comparison)
                    .map(|(b, c)| pct_change(*b, *c))
                    .collect();
                data.with_column(Column::new(format!("{variable}_pct_change").into(), pct_change))?;
            }
        }

        Ok(Comparison { data, geoms: self.geoms.clone() })
    }
}

/// `(c - b) / b * 100`, or None when either side is missing or the result is not finite.
fn pct_change(base: Option<f64>, comparison: Option<f64>) -> Option<f64> {
    let pct = (comparison? - base?) / base? * 100.0;
    pct.is_finite().then_some(pct)
}
