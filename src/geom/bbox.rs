use geo::Rect;
use rstar::{RTreeObject, AABB};

/// The bounding rectangle of one row's shape, as stored in the R-tree.
#[derive(Debug, Clone)]
pub(super) struct BoundingBox {
    row: usize, // Row of the corresponding MultiPolygon
    bbox: Rect<f64>,
}

impl BoundingBox {
    pub(super) fn new(row: usize, bbox: Rect<f64>) -> Self {
        Self { row, bbox }
    }

    /// Get the row of the corresponding MultiPolygon.
    #[inline] pub(super) fn row(&self) -> usize { self.row }
}

impl RTreeObject for BoundingBox {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_corners(self.bbox.min().into(), self.bbox.max().into())
    }
}
