use anyhow::Result;

use crate::{
    table::AttributeTable,
    types::{Dataset, GeographyLevel, Variable},
};

/// Everything a fetcher needs to produce one year's table.
#[derive(Debug, Clone, Copy)]
pub struct YearRequest<'a> {
    pub geography: GeographyLevel,
    pub variables: &'a [Variable],
    pub year: i32,
    pub dataset: Dataset,
    /// Survey name for this year, e.g. `"acs5"` or `"pl"`.
    pub survey: &'static str,
    pub include_geometry: bool,
}

/// Source of per-year attribute tables, typically backed by the census API.
///
/// Implementations must return one row per `GEOID`, already restricted to the
/// caller's geographic scope, with one numeric column per requested variable
/// named after `Variable::name`, and geometry when `include_geometry` is set.
pub trait YearFetcher {
    fn fetch_year(&self, request: &YearRequest<'_>) -> Result<AttributeTable>;
}

impl<F> YearFetcher for F
where
    F: Fn(&YearRequest<'_>) -> Result<AttributeTable>,
{
    fn fetch_year(&self, request: &YearRequest<'_>) -> Result<AttributeTable> { self(request) }
}
