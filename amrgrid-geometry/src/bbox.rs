use crate::Point;
use serde::{Deserialize, Serialize};

/// Axis-aligned box in grid units. Bounds are inclusive on both ends.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min: Point,
    pub max: Point,
}

impl BoundingBox {
    pub const fn new(min: Point, max: Point) -> Self {
        Self { min, max }
    }

    /// Box from the flat `(xmin, xmax, ymin, ymax, zmin, zmax)` ordering used by
    /// the geometry table.
    pub const fn from_extents(
        xmin: f64,
        xmax: f64,
        ymin: f64,
        ymax: f64,
        zmin: f64,
        zmax: f64,
    ) -> Self {
        Self {
            min: Point::new(xmin, ymin, zmin),
            max: Point::new(xmax, ymax, zmax),
        }
    }

    /// Cube of half-width `half_width` centered on `center`.
    pub fn around(center: Point, half_width: f64) -> Self {
        Self {
            min: center.offset(-half_width),
            max: center.offset(half_width),
        }
    }

    pub fn center(&self) -> Point {
        self.min.midpoint(&self.max)
    }

    pub fn edge_lengths(&self) -> [f64; 3] {
        [
            self.max.x - self.min.x,
            self.max.y - self.min.y,
            self.max.z - self.min.z,
        ]
    }

    pub fn contains(&self, p: &Point) -> bool {
        p.x >= self.min.x
            && p.x <= self.max.x
            && p.y >= self.min.y
            && p.y <= self.max.y
            && p.z >= self.min.z
            && p.z <= self.max.z
    }

    /// Closed overlap test: boxes that only share a face still overlap.
    pub fn overlaps(&self, other: &BoundingBox) -> bool {
        self.max.x >= other.min.x
            && self.min.x <= other.max.x
            && self.max.y >= other.min.y
            && self.min.y <= other.max.y
            && self.max.z >= other.min.z
            && self.min.z <= other.max.z
    }
}
