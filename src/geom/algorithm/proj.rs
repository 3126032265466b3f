use anyhow::{anyhow, Context, Result};
use geo::{Coord, MapCoords};
use proj4rs::{proj::Proj as Proj4, transform::transform};

use crate::geom::{Crs, Geometries};

/// Build a proj4rs projection for a CRS.
fn projection(crs: &Crs) -> Result<Proj4> {
    let proj_string = crs.proj4();
    Proj4::from_proj_string(&proj_string)
        .with_context(|| anyhow!("failed to build PROJ.4: {proj_string}"))
}

impl Geometries {
    /// Reproject shapes into `target`. A no-op clone when already in `target`.
    pub fn to_crs(&self, target: &Crs) -> Result<Geometries> {
        let source = self.crs();
        if source == target { return Ok(self.clone()) }

        let from = projection(source)?;
        let to = projection(target)?;
        let (from_degrees, to_degrees) = (source.is_geographic(), target.is_geographic());

        // proj4rs works in radians for lon/lat systems.
        let projected = self.shapes().iter()
            .map(|shape| shape.try_map_coords(|coord: Coord<f64>| {
                let mut point = if from_degrees {
                    (coord.x.to_radians(), coord.y.to_radians(), 0.0)
                } else {
                    (coord.x, coord.y, 0.0)
                };
                transform(&from, &to, &mut point).map_err(|e| format!("{e:?}"))?;
                Ok::<_, String>(if to_degrees {
                    Coord { x: point.0.to_degrees(), y: point.1.to_degrees() }
                } else {
                    Coord { x: point.0, y: point.1 }
                })
            }))
            .collect::<Result<Vec<_>, String>>()
            .map_err(|e| anyhow!("CRS transform {source} -> {target} failed: {e}"))?;

        Ok(Geometries::new(projected, target.clone()))
    }
}

#[cfg(test)]
mod tests {
    use geo::{coord, BoundingRect, MultiPolygon, Rect};

    use crate::geom::{Crs, Geometries};

    fn lonlat_square() -> Geometries {
        Geometries::new(vec![MultiPolygon::new(vec![
            Rect::new(coord! { x: -77.1, y: 38.8 }, coord! { x: -77.0, y: 38.9 }).to_polygon()
        ])], Crs::WGS84)
    }

    fn extent(geoms: &Geometries) -> Rect<f64> {
        geoms.shapes()[0].bounding_rect().unwrap()
    }

    #[test]
    fn same_crs_is_identity() {
        let geoms = lonlat_square();
        assert_eq!(geoms.to_crs(&Crs::WGS84).unwrap(), geoms);
    }

    #[test]
    fn lonlat_to_mercator_gives_meters() {
        let projected = lonlat_square().to_crs(&Crs::WEB_MERCATOR).unwrap();
        assert_eq!(projected.crs(), &Crs::WEB_MERCATOR);

        // -77.1 degrees of longitude on the web mercator sphere.
        assert!((extent(&projected).min().x - -8_582_732.74).abs() < 1.0);
        assert!(projected.areas()[0] > 1.0e8);
    }

    #[test]
    fn round_trip_returns_close_to_start() {
        let geoms = lonlat_square();
        let back = geoms.to_crs(&Crs::CONUS_ALBERS).unwrap().to_crs(&Crs::WGS84).unwrap();
        let (a, b) = (extent(&geoms), extent(&back));
        assert!((a.min().x - b.min().x).abs() < 1e-6);
        assert!((a.max().y - b.max().y).abs() < 1e-6);
    }

    #[test]
    fn proj4_definitions_reproject_like_their_epsg_code() {
        let by_code = lonlat_square().to_crs(&Crs::CONUS_ALBERS).unwrap();
        let by_definition = lonlat_square().to_crs(&Crs::from_proj4(
            "+proj=aea +lat_0=23 +lon_0=-96 +lat_1=29.5 +lat_2=45.5 +x_0=0 +y_0=0 +datum=NAD83 +units=m +no_defs"
        ).unwrap()).unwrap();

        assert!((extent(&by_code).min().x - extent(&by_definition).min().x).abs() < 1e-6);
        assert!((by_code.areas()[0] - by_definition.areas()[0]).abs() < 1.0);
    }
}
