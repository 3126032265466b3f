use std::collections::BTreeMap;

use anyhow::Result;

use crate::{
    error::TimeSeriesError,
    geom::{Crs, Geometries},
    series::{
        assemble, classify, default_interpolator, validate, Interpolator, TimeSeriesRequest,
        TimeSeriesResult, YearFetcher, YearRequest,
    },
    table::AttributeTable,
    warn::{LogSink, Warning, WarningSink},
};

/// Fetch a time series with the default interpolator, logging warnings.
pub fn get_time_series(fetcher: impl YearFetcher, request: &TimeSeriesRequest) -> Result<TimeSeriesResult, TimeSeriesError> {
    TimeSeries::new(fetcher).get(request)
}

/// Builds harmonized multi-year tables from a per-year fetcher.
///
/// Every year is fetched, then, if the geography's boundaries may have moved
/// across the requested span, every non-base year is reallocated onto the
/// base year's units before the years are assembled.
pub struct TimeSeries<F, S = LogSink> {
    fetcher: F,
    interpolator: Box<dyn Interpolator>,
    sink: S,
}

impl<F: YearFetcher> TimeSeries<F> {
    pub fn new(fetcher: F) -> Self {
        Self { fetcher, interpolator: default_interpolator(), sink: LogSink }
    }
}

impl<F: YearFetcher, S: WarningSink> TimeSeries<F, S> {
    /// Replace the interpolation engine.
    pub fn with_interpolator(mut self, interpolator: impl Interpolator + 'static) -> Self {
        self.interpolator = Box::new(interpolator);
        self
    }

    /// Route warnings to `sink` instead of the log.
    pub fn with_sink<T: WarningSink>(self, sink: T) -> TimeSeries<F, T> {
        TimeSeries { fetcher: self.fetcher, interpolator: self.interpolator, sink }
    }

    pub fn get(&self, request: &TimeSeriesRequest) -> Result<TimeSeriesResult, TimeSeriesError> {
        let (base_year, crs) = request.validate()?;

        let mut distinct = request.years.clone();
        distinct.sort_unstable();
        distinct.dedup();

        let needed = distinct.len() > 1 && request.policy.needs_interpolation(request.geography, &distinct);
        let harmonize = needed && self.interpolator.is_available() && request.include_geometry;
        if needed && !self.interpolator.is_available() {
            self.sink.warn(Warning::InterpolationUnavailable);
        } else if needed && !request.include_geometry {
            self.sink.warn(Warning::GeometryNotRequested);
        }

        let mut yearly = BTreeMap::new();
        for &year in &request.years {
            if yearly.contains_key(&year) { continue }

            let variables = request.variables.resolve(year)?;
            log::info!("collecting data for {year}");
            let table = self.fetcher
                .fetch_year(&YearRequest {
                    geography: request.geography,
                    variables: &variables,
                    year,
                    dataset: request.dataset,
                    survey: request.dataset.survey(year),
                    include_geometry: request.include_geometry,
                })
                .map_err(|source| TimeSeriesError::Fetch { year, source })?;
            yearly.insert(year, table);
        }

        if harmonize {
            self.harmonize(&mut yearly, base_year, &crs, request);
        }

        Ok(assemble(&yearly, request.output)?)
    }

    /// Reallocate every non-base year onto the base year's units in place.
    /// A year that cannot be reallocated keeps its own units, with a warning.
    fn harmonize(&self, yearly: &mut BTreeMap<i32, AttributeTable>, base_year: i32, crs: &Crs, request: &TimeSeriesRequest) {
        let Some(base) = yearly.get(&base_year) else { return };
        let others: Vec<i32> = yearly.keys().copied().filter(|&year| year != base_year).collect();

        let base_geoms = base.geoms().cloned();
        let target = match base.to_crs(crs) {
            Ok(target) => target,
            Err(err) => {
                for year in others {
                    self.sink.warn(Warning::InterpolationFailed { year, reason: format!("{err:#}") });
                }
                return;
            }
        };

        for year in others {
            log::info!("interpolating {year} onto {base_year} boundaries");
            let Some(source) = yearly.get(&year) else { continue };
            match self.reallocate(year, source, &target, crs, base_geoms.clone(), request) {
                Ok(table) => { yearly.insert(year, table); }
                Err(err) => self.sink.warn(Warning::InterpolationFailed { year, reason: format!("{err:#}") }),
            }
        }
    }

    /// Reallocate one year onto `target`, check its totals, and swap in the
    /// base year's unprojected geometry.
    fn reallocate(
        &self,
        year: i32,
        source: &AttributeTable,
        target: &AttributeTable,
        crs: &Crs,
        base_geoms: Option<Geometries>,
        request: &TimeSeriesRequest,
    ) -> Result<AttributeTable> {
        let source = source.to_crs(crs)?;
        let classes = classify(
            &source.data_columns(),
            request.additive_variables.as_deref(),
            request.rate_variables.as_deref(),
            &self.sink,
        );

        let interpolated = self.interpolator.interpolate(&source, target, &classes, &self.sink)?;
        let reports = validate(
            year, &source, &interpolated, &classes.additive,
            request.policy.conservation_tolerance_pct, &self.sink,
        )?;
        for report in &reports {
            log::debug!("{year} {}: {} -> {}", report.variable, report.source_total, report.interpolated_total);
        }

        interpolated.with_geoms(base_geoms)
    }
}
