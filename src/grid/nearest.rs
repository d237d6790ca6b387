use amrgrid_geometry::{Cell, Point};

/// Starting distance for the nearest-cell scan, in grid units. A candidate
/// farther than this from the point is never selected.
pub const SELECTION_RADIUS: f64 = 1.0;

/// Half-width of the candidate search box, in units of the minimum cell size.
pub const CANDIDATE_HALF_WIDTH: f64 = 0.5;

/// Linear scan for the candidate whose center is closest to `point`.
///
/// A candidate replaces the current best when its distance is `<=` the best
/// so far, so the later candidate in scan order wins an exact tie. Returns
/// `None` when the slice is empty or every center lies beyond
/// [`SELECTION_RADIUS`].
pub fn select_nearest<'a>(candidates: &'a [Cell], point: &Point) -> Option<&'a Cell> {
    let mut best = None;
    let mut best_distance = SELECTION_RADIUS;
    for cell in candidates {
        let d = cell.distance_to_point(point);
        if d <= best_distance {
            best_distance = d;
            best = Some(cell);
        }
    }
    best
}
