use ahash::AHashSet;
use anyhow::{bail, ensure, Context, Result};
use polars::prelude::*;

use crate::{geom::{Crs, Geometries}, table::columns};

/// One year's attribute table: one row per geographic unit, keyed by `GEOID`.
///
/// Attributes live in a polars frame. Geometry, when present, is kept beside
/// the frame with one shape per row, in row order.
#[derive(Debug, Clone)]
pub struct AttributeTable {
    data: DataFrame,
    geoms: Option<Geometries>,
}

impl AttributeTable {
    /// Wrap a frame and optional row-aligned geometry.
    /// Fails if `GEOID` is missing or repeated, or if geometry rows do not line up.
    pub fn new(data: DataFrame, geoms: Option<Geometries>) -> Result<Self> {
        let geo_ids = columns::str_values(&data, columns::GEOID)
            .context("attribute table needs a GEOID column")?;

        let mut seen = AHashSet::with_capacity(geo_ids.len());
        for geo_id in &geo_ids {
            let Some(geo_id) = geo_id else { bail!("attribute table has a null GEOID") };
            ensure!(seen.insert(geo_id.as_str()), "GEOID {geo_id} appears more than once");
        }

        if let Some(geoms) = &geoms {
            ensure!(geoms.len() == data.height(),
                "geometry has {} rows but data has {}", geoms.len(), data.height());
        }

        Ok(Self { data, geoms })
    }

    /// Get the number of rows.
    #[inline] pub fn len(&self) -> usize { self.data.height() }

    /// Check if there are no rows.
    #[inline] pub fn is_empty(&self) -> bool { self.data.height() == 0 }

    /// Get a reference to the attribute frame.
    #[inline] pub fn data(&self) -> &DataFrame { &self.data }

    /// Get a reference to the geometry, if any.
    #[inline] pub fn geoms(&self) -> Option<&Geometries> { self.geoms.as_ref() }

    /// GEOIDs in row order.
    pub fn geo_ids(&self) -> Result<Vec<String>> {
        Ok(columns::str_values(&self.data, columns::GEOID)?
            .into_iter()
            .map(|geo_id| geo_id.unwrap_or_default())
            .collect())
    }

    /// Names of the attribute columns, excluding identifiers and metadata.
    pub fn data_columns(&self) -> Vec<String> { columns::data_columns(&self.data) }

    /// Names of the identifier columns present (`GEOID`, `NAME`, `state`, `county`).
    pub fn key_columns(&self) -> Vec<&'static str> { columns::key_columns(&self.data) }

    /// Values of an attribute column as nullable f64.
    pub fn values(&self, name: &str) -> Result<Vec<Option<f64>>> { columns::f64_values(&self.data, name) }

    /// Values of a text column, e.g. `NAME`.
    pub fn text(&self, name: &str) -> Result<Vec<Option<String>>> { columns::str_values(&self.data, name) }

    /// Sum of a column, skipping nulls.
    pub fn sum(&self, name: &str) -> Result<f64> {
        Ok(self.values(name)?.into_iter().flatten().sum())
    }

    /// Replace the geometry, keeping the attribute frame.
    pub fn with_geoms(self, geoms: Option<Geometries>) -> Result<Self> {
        Self::new(self.data, geoms)
    }

    /// Frame with only the key columns, in row order.
    pub fn keys(&self) -> Result<DataFrame> {
        Ok(self.data.select(self.key_columns())?)
    }

    /// Reproject the geometry into `crs`. Fails if the table has no geometry.
    pub fn to_crs(&self, crs: &Crs) -> Result<Self> {
        let geoms = self.geoms.as_ref()
            .context("cannot reproject a table without geometry")?;
        Ok(Self { data: self.data.clone(), geoms: Some(geoms.to_crs(crs)?) })
    }
}

#[cfg(test)]
mod tests {
    use geo::{coord, MultiPolygon, Rect};
    use polars::prelude::*;

    use super::AttributeTable;
    use crate::geom::{Crs, Geometries};

    fn frame(geo_ids: &[&str], pop: &[Option<f64>]) -> DataFrame {
        DataFrame::new(vec![
            Column::new("GEOID".into(), geo_ids),
            Column::new("NAME".into(), geo_ids.iter().map(|g| format!("Tract {g}")).collect::<Vec<_>>()),
            Column::new("total_pop".into(), pop),
        ]).unwrap()
    }

    #[test]
    fn rejects_duplicate_geoids() {
        let err = AttributeTable::new(frame(&["01", "01"], &[Some(1.0), Some(2.0)]), None).unwrap_err();
        assert!(err.to_string().contains("01"));
    }

    #[test]
    fn rejects_misaligned_geometry() {
        let geoms = Geometries::new(vec![MultiPolygon::new(vec![
            Rect::new(coord! { x: 0.0, y: 0.0 }, coord! { x: 1.0, y: 1.0 }).to_polygon()
        ])], Crs::WEB_MERCATOR);
        assert!(AttributeTable::new(frame(&["01", "02"], &[Some(1.0), Some(2.0)]), Some(geoms)).is_err());
    }

    #[test]
    fn sum_skips_nulls() {
        let table = AttributeTable::new(frame(&["01", "02", "03"], &[Some(1.0), None, Some(2.5)]), None).unwrap();
        assert_eq!(table.sum("total_pop").unwrap(), 3.5);
        assert_eq!(table.data_columns(), vec!["total_pop"]);
        assert_eq!(table.keys().unwrap().width(), 2);
    }

    #[test]
    fn reprojecting_without_geometry_fails() {
        let table = AttributeTable::new(frame(&["01"], &[Some(1.0)]), None).unwrap();
        assert!(table.to_crs(&Crs::WEB_MERCATOR).is_err());
    }
}
