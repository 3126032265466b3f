use geo::{Area, BoundingRect, MultiPolygon};
use rstar::{RTree, AABB};

use crate::geom::{bbox::BoundingBox, Crs};

/// Geometries holds one MultiPolygon per table row, with an R-tree over their bounds.
#[derive(Debug, Clone)]
pub struct Geometries {
    shapes: Vec<MultiPolygon<f64>>,
    rtree: RTree<BoundingBox>,
    crs: Crs,
}

impl Geometries {
    /// Construct a Geometries object from one MultiPolygon per row.
    /// Empty shapes are kept in place but never returned by spatial queries.
    pub fn new(shapes: Vec<MultiPolygon<f64>>, crs: Crs) -> Self {
        Self {
            rtree: RTree::bulk_load(
                shapes.iter().enumerate()
                    .filter_map(|(row, shape)| shape.bounding_rect().map(|rect| BoundingBox::new(row, rect)))
                    .collect()
            ),
            shapes,
            crs,
        }
    }

    /// Get the number of rows.
    #[inline] pub fn len(&self) -> usize { self.shapes.len() }

    /// Check if there are no rows.
    #[inline] pub fn is_empty(&self) -> bool { self.shapes.is_empty() }

    /// Get a reference to the list of MultiPolygons.
    #[inline] pub fn shapes(&self) -> &[MultiPolygon<f64>] { &self.shapes }

    /// The CRS these shapes are expressed in.
    #[inline] pub fn crs(&self) -> &Crs { &self.crs }

    /// Query the R-tree for rows whose bounds intersect the given envelope.
    #[inline]
    pub(super) fn query(&self, envelope: &AABB<[f64; 2]>) -> impl Iterator<Item = usize> + '_ {
        self.rtree.locate_in_envelope_intersecting(envelope).map(|bb| bb.row())
    }

    /// Planar area of each shape, in squared CRS units.
    pub fn areas(&self) -> Vec<f64> {
        self.shapes.iter().map(|shape| shape.unsigned_area()).collect()
    }
}

impl PartialEq for Geometries {
    fn eq(&self, other: &Self) -> bool {
        self.crs == other.crs && self.shapes == other.shapes
    }
}

#[cfg(test)]
mod tests {
    use geo::{coord, MultiPolygon, Rect};

    use super::Geometries;
    use crate::geom::Crs;

    fn square(x: f64, y: f64, size: f64) -> MultiPolygon<f64> {
        MultiPolygon::new(vec![
            Rect::new(coord! { x: x, y: y }, coord! { x: x + size, y: y + size }).to_polygon()
        ])
    }

    #[test]
    fn areas_in_crs_units() {
        let geoms = Geometries::new(vec![square(0.0, 0.0, 1.0), square(1.0, 0.0, 2.0)], Crs::WEB_MERCATOR);
        assert_eq!(geoms.areas(), vec![1.0, 4.0]);
    }

    #[test]
    fn empty_shapes_keep_their_row() {
        let geoms = Geometries::new(vec![MultiPolygon::new(vec![]), square(0.0, 0.0, 1.0)], Crs::WEB_MERCATOR);
        assert_eq!(geoms.len(), 2);
        assert_eq!(geoms.areas(), vec![0.0, 1.0]);
    }
}
