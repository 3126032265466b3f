use anyhow::Result;

use crate::{
    series::VariableClasses,
    table::AttributeTable,
    warn::{Warning, WarningSink},
};

/// Reallocates one year's attributes onto another year's units.
pub trait Interpolator {
    /// Whether this interpolator actually reallocates anything.
    fn is_available(&self) -> bool { true }

    /// Reallocate the classified columns of `source` onto the units of `target`.
    ///
    /// Both tables must carry geometry in the same planar CRS. The result has
    /// exactly `target`'s rows, key columns and geometry.
    fn interpolate(
        &self,
        source: &AttributeTable,
        target: &AttributeTable,
        classes: &VariableClasses,
        sink: &dyn WarningSink,
    ) -> Result<AttributeTable>;
}

/// The interpolator to use in this build: area-weighted when the
/// `interpolation` feature is enabled, otherwise the pass-through.
pub fn default_interpolator() -> Box<dyn Interpolator> {
    #[cfg(feature = "interpolation")]
    { Box::new(AreaWeighted) }

    #[cfg(not(feature = "interpolation"))]
    { Box::new(Unavailable) }
}

/// Stand-in used when no interpolation engine is compiled in. Returns the
/// source table unchanged and warns every time it is asked to reallocate.
#[derive(Debug, Clone, Copy, Default)]
pub struct Unavailable;

impl Interpolator for Unavailable {
    fn is_available(&self) -> bool { false }

    fn interpolate(
        &self,
        source: &AttributeTable,
        _target: &AttributeTable,
        _classes: &VariableClasses,
        sink: &dyn WarningSink,
    ) -> Result<AttributeTable> {
        sink.warn(Warning::InterpolationUnavailable);
        Ok(source.clone())
    }
}

#[cfg(feature = "interpolation")]
pub use area::AreaWeighted;

#[cfg(feature = "interpolation")]
mod area {
    use anyhow::{anyhow, ensure, Context, Result};
    use polars::prelude::*;

    use crate::{
        geom::Geometries,
        series::VariableClasses,
        table::AttributeTable,
        warn::{Warning, WarningSink},
    };
    use super::Interpolator;

    /// Area-weighted reallocation.
    ///
    /// Additive target value: sum over overlapping sources of
    /// `value * overlap / source_area`.
    /// Rate-like target value: sum over overlapping sources of
    /// `value * overlap / target_area`.
    #[derive(Debug, Clone, Copy, Default)]
    pub struct AreaWeighted;

    impl Interpolator for AreaWeighted {
        fn interpolate(
            &self,
            source: &AttributeTable,
            target: &AttributeTable,
            classes: &VariableClasses,
            sink: &dyn WarningSink,
        ) -> Result<AttributeTable> {
            let source_geoms = source.geoms().context("source table has no geometry")?;
            let target_geoms = target.geoms().context("target table has no geometry")?;
            ensure!(source_geoms.crs() == target_geoms.crs(),
                "source is in {} but target is in {}", source_geoms.crs(), target_geoms.crs());

            let source_areas = checked_areas(source_geoms, &source.geo_ids()?, "source")?;
            let target_areas = checked_areas(target_geoms, &target.geo_ids()?, "target")?;
            let overlaps = target_geoms.overlap_areas(source_geoms);

            let mut data = target.keys()?;

            for name in &classes.additive {
                let values = source.values(name)?;
                let nulls = values.iter().filter(|value| value.is_none()).count();
                if nulls > 0 {
                    sink.warn(Warning::NullValues { variable: name.clone(), count: nulls });
                }

                let reallocated: Vec<Option<f64>> = overlaps.iter()
                    .map(|per_target| Some(per_target.iter()
                        .map(|&(j, area)| values[j].unwrap_or(0.0) * (area / source_areas[j]))
                        .sum::<f64>()))
                    .collect();
                data.with_column(Column::new(name.as_str().into(), reallocated))?;
            }

            for name in &classes.rate {
                let values = source.values(name)?;

                let blended: Vec<Option<f64>> = overlaps.iter().zip(&target_areas)
                    .map(|(per_target, &target_area)| {
                        let mut covered = false;
                        let total = per_target.iter()
                            .filter_map(|&(j, area)| values[j].map(|value| {
                                covered = true;
                                value * (area / target_area)
                            }))
                            .sum::<f64>();
                        covered.then_some(total)
                    })
                    .collect();
                data.with_column(Column::new(name.as_str().into(), blended))?;
            }

            AttributeTable::new(data, Some(target_geoms.clone()))
        }
    }

    /// Areas of every row, failing on empty or degenerate shapes.
    fn checked_areas(geoms: &Geometries, geo_ids: &[String], role: &str) -> Result<Vec<f64>> {
        let areas = geoms.areas();
        if let Some(row) = areas.iter().position(|area| !area.is_finite() || *area <= 0.0) {
            let geo_id = geo_ids.get(row).map(String::as_str).unwrap_or("?");
            return Err(anyhow!("{role} unit {geo_id} has degenerate geometry (area {})", areas[row]));
        }
        Ok(areas)
    }
}

#[cfg(all(test, feature = "interpolation"))]
mod tests {
    use geo::{coord, MultiPolygon, Rect};
    use polars::prelude::*;

    use super::*;
    use crate::{geom::{Crs, Geometries}, warn::CollectingSink};

    fn rect(x0: f64, y0: f64, x1: f64, y1: f64) -> MultiPolygon<f64> {
        MultiPolygon::new(vec![Rect::new(coord! { x: x0, y: y0 }, coord! { x: x1, y: y1 }).to_polygon()])
    }

    fn table(geo_ids: &[&str], columns: &[(&str, &[Option<f64>])], shapes: Vec<MultiPolygon<f64>>) -> AttributeTable {
        let mut data = vec![Column::new("GEOID".into(), geo_ids)];
        for (name, values) in columns {
            data.push(Column::new((*name).into(), *values));
        }
        AttributeTable::new(DataFrame::new(data).unwrap(), Some(Geometries::new(shapes, Crs::WEB_MERCATOR))).unwrap()
    }

    fn classes(additive: &[&str], rate: &[&str]) -> VariableClasses {
        VariableClasses {
            additive: additive.iter().map(|s| s.to_string()).collect(),
            rate: rate.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn identical_geometry_reproduces_values() {
        let shapes = vec![rect(0.0, 0.0, 1.0, 1.0), rect(1.0, 0.0, 3.0, 1.0), rect(0.0, 1.0, 3.0, 4.0)];
        let pop: &[Option<f64>] = &[Some(120.0), Some(45.0), Some(9000.0)];
        let income: &[Option<f64>] = &[Some(51000.0), Some(72000.0), Some(38500.0)];
        let source = table(&["a", "b", "c"], &[("pop", pop), ("income", income)], shapes.clone());
        let target = table(&["a", "b", "c"], &[], shapes);

        let result = AreaWeighted
            .interpolate(&source, &target, &classes(&["pop"], &["income"]), &CollectingSink::new())
            .unwrap();

        assert_eq!(result.geo_ids().unwrap(), vec!["a", "b", "c"]);
        assert_eq!(result.values("pop").unwrap(), pop.to_vec());
        assert_eq!(result.values("income").unwrap(), income.to_vec());
    }

    #[test]
    fn crossing_strips_split_mass_in_half() {
        // Two horizontal source strips under two vertical target strips.
        let source = table(
            &["s1", "s2"],
            &[("pop", &[Some(1000.0), Some(2000.0)])],
            vec![rect(0.0, 0.0, 2.0, 1.0), rect(0.0, 1.0, 2.0, 2.0)],
        );
        let target = table(&["t1", "t2"], &[], vec![rect(0.0, 0.0, 1.0, 2.0), rect(1.0, 0.0, 2.0, 2.0)]);

        let result = AreaWeighted
            .interpolate(&source, &target, &classes(&["pop"], &[]), &CollectingSink::new())
            .unwrap();

        for value in result.values("pop").unwrap() {
            assert!((value.unwrap() - 1500.0).abs() < 1e-9);
        }
        assert!((result.sum("pop").unwrap() - 3000.0).abs() < 1e-9);
    }

    #[test]
    fn rate_values_are_blended_by_target_coverage() {
        // One target covering two equal sources: the rate is their mean.
        let source = table(
            &["s1", "s2"],
            &[("median_income", &[Some(40000.0), Some(60000.0)])],
            vec![rect(0.0, 0.0, 1.0, 1.0), rect(1.0, 0.0, 2.0, 1.0)],
        );
        let target = table(&["t"], &[], vec![rect(0.0, 0.0, 2.0, 1.0)]);

        let result = AreaWeighted
            .interpolate(&source, &target, &classes(&[], &["median_income"]), &CollectingSink::new())
            .unwrap();

        assert!((result.values("median_income").unwrap()[0].unwrap() - 50000.0).abs() < 1e-6);
    }

    #[test]
    fn uncovered_targets_get_zero_mass_and_null_rate() {
        let source = table(&["s"], &[("pop", &[Some(10.0)]), ("rate", &[Some(0.5)])], vec![rect(0.0, 0.0, 1.0, 1.0)]);
        let target = table(&["t"], &[], vec![rect(5.0, 5.0, 6.0, 6.0)]);

        let result = AreaWeighted
            .interpolate(&source, &target, &classes(&["pop"], &["rate"]), &CollectingSink::new())
            .unwrap();

        assert_eq!(result.values("pop").unwrap(), vec![Some(0.0)]);
        assert_eq!(result.values("rate").unwrap(), vec![None]);
    }

    #[test]
    fn null_additive_values_warn_and_count_as_zero() {
        let shapes = vec![rect(0.0, 0.0, 1.0, 1.0), rect(1.0, 0.0, 2.0, 1.0)];
        let source = table(&["a", "b"], &[("pop", &[Some(7.0), None])], shapes.clone());
        let target = table(&["a", "b"], &[], shapes);
        let sink = CollectingSink::new();

        let result = AreaWeighted.interpolate(&source, &target, &classes(&["pop"], &[]), &sink).unwrap();

        assert_eq!(result.values("pop").unwrap(), vec![Some(7.0), Some(0.0)]);
        assert_eq!(sink.warnings(), vec![Warning::NullValues { variable: "pop".into(), count: 1 }]);
    }

    #[test]
    fn degenerate_source_geometry_is_an_error() {
        let source = table(&["flat"], &[("pop", &[Some(1.0)])], vec![rect(0.0, 0.0, 1.0, 0.0)]);
        let target = table(&["t"], &[], vec![rect(0.0, 0.0, 1.0, 1.0)]);

        let err = AreaWeighted
            .interpolate(&source, &target, &classes(&["pop"], &[]), &CollectingSink::new())
            .unwrap_err();
        assert!(err.to_string().contains("flat"));
    }

    #[test]
    fn unavailable_passes_source_through_with_warning() {
        let source = table(&["s"], &[("pop", &[Some(10.0)])], vec![rect(0.0, 0.0, 1.0, 1.0)]);
        let target = table(&["t"], &[], vec![rect(0.0, 0.0, 2.0, 2.0)]);
        let sink = CollectingSink::new();

        let result = Unavailable.interpolate(&source, &target, &classes(&["pop"], &[]), &sink).unwrap();

        assert_eq!(result.geo_ids().unwrap(), vec!["s"]);
        assert_eq!(sink.warnings(), vec![Warning::InterpolationUnavailable]);
    }
}
