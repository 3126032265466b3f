use std::collections::BTreeMap;

use ahash::AHashMap;
use anyhow::Result;
use geo::MultiPolygon;
use polars::prelude::*;

use crate::{
    geom::{Crs, Geometries},
    series::{OutputShape, TidyTable, TimeSeriesResult, WideTable},
    table::{columns, AttributeTable},
    types::YearVar,
};

/// Merge per-year tables into one time series of the requested shape.
///
/// Tables are expected to hold one row per `GEOID`. Key columns and geometry
/// of each unit come from the most recent year that contains it; geometry is
/// reprojected to the CRS of the most recent year that has any.
pub fn assemble(yearly: &BTreeMap<i32, AttributeTable>, shape: OutputShape) -> Result<TimeSeriesResult> {
    Ok(match shape {
        OutputShape::Wide => TimeSeriesResult::Wide(assemble_wide(yearly)?),
        OutputShape::Tidy => TimeSeriesResult::Tidy(assemble_tidy(yearly)?),
    })
}

/// Key columns present in any year, in output order.
fn present_keys(yearly: &BTreeMap<i32, AttributeTable>) -> Vec<&'static str> {
    columns::KEY_COLUMNS.into_iter()
        .filter(|name| yearly.values().any(|table| table.key_columns().contains(name)))
        .collect()
}

/// Every year's geometry in one CRS, that of the most recent year with geometry.
fn conformed_geoms(yearly: &BTreeMap<i32, AttributeTable>) -> Result<Option<(Crs, BTreeMap<i32, Geometries>)>> {
    let Some(crs) = yearly.values().rev().find_map(|table| table.geoms()).map(|geoms| geoms.crs().clone())
    else { return Ok(None) };

    let mut conformed = BTreeMap::new();
    for (&year, table) in yearly {
        let Some(geoms) = table.geoms() else { continue };
        let geoms = if geoms.crs() == &crs { geoms.clone() } else { geoms.to_crs(&crs)? };
        conformed.insert(year, geoms);
    }
    Ok(Some((crs, conformed)))
}

/// Text values of each of `keys` in `table`; None for keys the table lacks.
fn key_values(table: &AttributeTable, keys: &[&str]) -> Result<Vec<Option<Vec<Option<String>>>>> {
    let present = table.key_columns();
    keys.iter()
        .map(|name| present.contains(name).then(|| table.text(name)).transpose())
        .collect()
}

fn keys_frame(keys: &[&str], values: Vec<Vec<Option<String>>>) -> Result<DataFrame> {
    Ok(DataFrame::new(keys.iter().zip(values)
        .map(|(name, values)| Column::new((*name).into(), values))
        .collect())?)
}

/// Outer join on GEOID, with attribute columns relabeled as (year, variable).
fn assemble_wide(yearly: &BTreeMap<i32, AttributeTable>) -> Result<WideTable> {
    let keys = present_keys(yearly);
    let geoms = conformed_geoms(yearly)?;

    let mut index: AHashMap<String, usize> = AHashMap::new();
    let mut key_columns: Vec<Vec<Option<String>>> = vec![Vec::new(); keys.len()];
    let mut geom_source: Vec<Option<(i32, usize)>> = Vec::new();
    let mut slots_by_year: BTreeMap<i32, Vec<usize>> = BTreeMap::new();

    // Seed rows newest first so the latest vintage supplies names and geometry.
    for (&year, table) in yearly.iter().rev() {
        let values = key_values(table, &keys)?;
        let has_geoms = geoms.as_ref().is_some_and(|(_, geoms)| geoms.contains_key(&year));
        let mut slots = Vec::with_capacity(table.len());

        for (row, geo_id) in table.geo_ids()?.into_iter().enumerate() {
            let slot = match index.get(&geo_id) {
                Some(&slot) => slot,
                None => {
                    let slot = index.len();
                    index.insert(geo_id, slot);
                    key_columns.iter_mut().for_each(|column| column.push(None));
                    geom_source.push(None);
                    slot
                }
            };

            for (column, values) in key_columns.iter_mut().zip(&values) {
                if let Some(values) = values {
                    if column[slot].is_none() { column[slot] = values[row].clone() }
                }
            }
            if has_geoms && geom_source[slot].is_none() {
                geom_source[slot] = Some((year, row));
            }
            slots.push(slot);
        }
        slots_by_year.insert(year, slots);
    }

    let height = index.len();
    let mut columns = Vec::new();
    for (&year, table) in yearly {
        let slots = &slots_by_year[&year];
        for variable in table.data_columns() {
            let mut values = vec![None; height];
            for (row, value) in table.values(&variable)?.into_iter().enumerate() {
                values[slots[row]] = value;
            }
            columns.push((YearVar::new(year, variable), values));
        }
    }

    let geoms = geoms.map(|(crs, geoms)| Geometries::new(
        geom_source.iter()
            .map(|source| source
                .and_then(|(year, row)| geoms.get(&year).map(|g| g.shapes()[row].clone()))
                .unwrap_or_else(|| MultiPolygon::new(vec![])))
            .collect(),
        crs,
    ));

    Ok(WideTable { keys: keys_frame(&keys, key_columns)?, columns, geoms })
}

/// Melt each year into (variable, estimate) rows, stamp the year, and stack.
fn assemble_tidy(yearly: &BTreeMap<i32, AttributeTable>) -> Result<TidyTable> {
    let keys = present_keys(yearly);
    let geoms = conformed_geoms(yearly)?;

    let mut key_columns: Vec<Vec<Option<String>>> = vec![Vec::new(); keys.len()];
    let mut variables: Vec<String> = Vec::new();
    let mut estimates: Vec<Option<f64>> = Vec::new();
    let mut years: Vec<i32> = Vec::new();
    let mut shapes: Vec<MultiPolygon<f64>> = Vec::new();

    for (&year, table) in yearly {
        let values = key_values(table, &keys)?;
        let year_geoms = geoms.as_ref().and_then(|(_, geoms)| geoms.get(&year));

        for variable in table.data_columns() {
            for (row, estimate) in table.values(&variable)?.into_iter().enumerate() {
                for (column, values) in key_columns.iter_mut().zip(&values) {
                    column.push(values.as_ref().and_then(|values| values[row].clone()));
                }
                if geoms.is_some() {
                    shapes.push(year_geoms
                        .map(|g| g.shapes()[row].clone())
                        .unwrap_or_else(|| MultiPolygon::new(vec![])));
                }
                variables.push(variable.clone());
                estimates.push(estimate);
                years.push(year);
            }
        }
    }

    let mut data = keys_frame(&keys, key_columns)?;
    data.with_column(Column::new("variable".into(), variables))?;
    data.with_column(Column::new("estimate".into(), estimates))?;
    data.with_column(Column::new("year".into(), years))?;

    let geoms = geoms.map(|(crs, _)| Geometries::new(shapes, crs));

    Ok(TidyTable { data, geoms })
}

#[cfg(test)]
mod tests {
    use geo::{coord, Rect};

    use super::*;
    use crate::table::columns;

    fn square(x: f64) -> MultiPolygon<f64> {
        MultiPolygon::new(vec![Rect::new(coord! { x: x, y: 0.0 }, coord! { x: x + 1.0, y: 1.0 }).to_polygon()])
    }

    fn table(geo_ids: &[&str], columns: &[(&str, Vec<f64>)], with_geoms: bool) -> AttributeTable {
        let mut data = vec![
            Column::new("GEOID".into(), geo_ids),
            Column::new("NAME".into(), geo_ids.iter().map(|g| format!("Tract {g}")).collect::<Vec<_>>()),
        ];
        for (name, values) in columns {
            data.push(Column::new((*name).into(), values));
        }
        let geoms = with_geoms.then(|| Geometries::new(
            (0..geo_ids.len()).map(|i| square(i as f64)).collect(),
            Crs::NAD83,
        ));
        AttributeTable::new(DataFrame::new(data).unwrap(), geoms).unwrap()
    }

    fn two_years(with_geoms: bool) -> BTreeMap<i32, AttributeTable> {
        BTreeMap::from([
            (2010, table(&["01", "02"], &[("total_pop", vec![100.0, 200.0])], with_geoms)),
            (2020, table(&["01", "02"], &[("total_pop", vec![110.0, 190.0]), ("households", vec![40.0, 80.0])], with_geoms)),
        ])
    }

    #[test]
    fn wide_keys_columns_by_year_and_variable() {
        let TimeSeriesResult::Wide(wide) = assemble(&two_years(true), OutputShape::Wide).unwrap() else { panic!() };

        assert_eq!(wide.len(), 2);
        assert_eq!(wide.column_keys().count(), 3);
        assert_eq!(wide.get(&YearVar::new(2010, "total_pop")).unwrap(), &[Some(100.0), Some(200.0)]);
        assert_eq!(wide.get(&YearVar::new(2020, "total_pop")).unwrap(), &[Some(110.0), Some(190.0)]);
        assert_eq!(wide.years(), vec![2010, 2020]);
        assert_eq!(wide.keys().get_column_names().len(), 2);
        assert_eq!(wide.geoms().unwrap().len(), 2);
    }

    #[test]
    fn wide_outer_join_fills_missing_units_with_null() {
        let yearly = BTreeMap::from([
            (2015, table(&["01", "03"], &[("pop", vec![1.0, 3.0])], false)),
            (2020, table(&["01", "02"], &[("pop", vec![10.0, 20.0])], false)),
        ]);
        let TimeSeriesResult::Wide(wide) = assemble(&yearly, OutputShape::Wide).unwrap() else { panic!() };

        assert_eq!(wide.geo_ids().unwrap(), vec!["01", "02", "03"]);
        assert_eq!(wide.get(&YearVar::new(2015, "pop")).unwrap(), &[Some(1.0), None, Some(3.0)]);
        assert_eq!(wide.get(&YearVar::new(2020, "pop")).unwrap(), &[Some(10.0), Some(20.0), None]);
        assert!(wide.geoms().is_none());
    }

    #[test]
    fn tidy_row_count_is_units_times_variables() {
        let TimeSeriesResult::Tidy(tidy) = assemble(&two_years(true), OutputShape::Tidy).unwrap() else { panic!() };

        // 2 units x 1 variable + 2 units x 2 variables
        assert_eq!(tidy.len(), 6);
        assert_eq!(tidy.geoms().unwrap().len(), 6);

        let names: Vec<_> = tidy.data().get_column_names().into_iter().map(|n| n.to_string()).collect();
        assert_eq!(names, vec!["GEOID", "NAME", "variable", "estimate", "year"]);

        let years = tidy.data().column("year").unwrap().i32().unwrap().into_no_null_iter().collect::<Vec<_>>();
        assert_eq!(years, vec![2010, 2010, 2020, 2020, 2020, 2020]);
        let estimates = columns::f64_values(tidy.data(), "estimate").unwrap();
        assert_eq!(estimates[2..4], [Some(110.0), Some(190.0)]);
    }

    #[test]
    fn tidy_without_geometry() {
        let TimeSeriesResult::Tidy(tidy) = assemble(&two_years(false), OutputShape::Tidy).unwrap() else { panic!() };
        assert_eq!(tidy.len(), 6);
        assert!(tidy.geoms().is_none());
    }
}
