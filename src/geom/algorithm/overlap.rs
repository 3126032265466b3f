use geo::{Area, BooleanOps, BoundingRect};
use rstar::AABB;
use smallvec::SmallVec;

use crate::geom::Geometries;

/// Rows of another Geometries overlapping one shape, with the shared area.
pub(crate) type Overlaps = SmallVec<[(usize, f64); 4]>;

impl Geometries {
    /// For each shape in `self`, find the rows of `other` whose interiors it
    /// shares, and the area of each intersection. Pure boundary touches have
    /// zero area and are left out.
    pub(crate) fn overlap_areas(&self, other: &Geometries) -> Vec<Overlaps> {
        self.shapes().iter()
            .map(|shape| {
                let Some(rect) = shape.bounding_rect() else { return Overlaps::new() };
                let envelope = AABB::from_corners(rect.min().into(), rect.max().into());

                other.query(&envelope)
                    .filter_map(|j| {
                        let candidate = &other.shapes()[j];
                        // Unchanged boundaries are common between vintages; skip the overlay.
                        let area = if candidate == shape {
                            shape.unsigned_area()
                        } else {
                            shape.intersection(candidate).unsigned_area()
                        };
                        (area > 0.0).then_some((j, area))
                    })
                    .collect()
            })
            .collect()
    }
}
