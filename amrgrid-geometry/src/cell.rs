use crate::{BoundingBox, Point};
use serde::{Deserialize, Serialize};

/// Row identifier shared by the geometry and properties tables.
pub type CellId = i64;

/// One AMR leaf cell.
///
/// Center and size are derived once at construction and cached. `size` is the
/// edge length along x, which is the edge length of every axis for the cubic
/// cells an AMR hierarchy produces.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    id: CellId,
    bounds: BoundingBox,
    center: Point,
    size: f64,
}

impl Cell {
    pub fn from_bounds(id: CellId, bounds: BoundingBox) -> Self {
        Self {
            id,
            center: bounds.center(),
            size: bounds.max.x - bounds.min.x,
            bounds,
        }
    }

    /// Cubic cell with edge `size` centered on `center`.
    pub fn from_center(size: f64, center: Point, id: CellId) -> Self {
        let half = size / 2.0;
        Self {
            id,
            bounds: BoundingBox::around(center, half),
            center,
            size,
        }
    }

    pub fn id(&self) -> CellId {
        self.id
    }

    pub fn bounds(&self) -> &BoundingBox {
        &self.bounds
    }

    pub fn min(&self) -> Point {
        self.bounds.min
    }

    pub fn max(&self) -> Point {
        self.bounds.max
    }

    pub fn center(&self) -> Point {
        self.center
    }

    pub fn size(&self) -> f64 {
        self.size
    }

    pub fn edge_lengths(&self) -> [f64; 3] {
        self.bounds.edge_lengths()
    }

    /// Distance from the cell center (not the nearest face) to `p`.
    pub fn distance_to_point(&self, p: &Point) -> f64 {
        self.center.distance(p)
    }

    pub fn contains(&self, p: &Point) -> bool {
        self.bounds.contains(p)
    }

    pub fn overlaps(&self, region: &BoundingBox) -> bool {
        self.bounds.overlaps(region)
    }
}
