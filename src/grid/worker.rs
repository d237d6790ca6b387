use super::GridInner;
use super::nearest::{CANDIDATE_HALF_WIDTH, select_nearest};
use crate::db::StoreRow;
use crate::db::schema::{geometry_columns as gc, property_columns as pc};
use crate::error::GridError;
use amrgrid_geometry::{BoundingBox, Cell, CellId, LocalProperties, Point};
use std::sync::Arc;
use tracing::trace;

/// Query handle pinned to one connection lane of a [`super::Grid`].
///
/// Cloning is cheap; clones share the lane. Give each concurrent caller its
/// own worker (see [`super::Grid::workers`]) to spread load over the lanes.
#[derive(Clone)]
pub struct GridWorker {
    inner: Arc<GridInner>,
    index: usize,
}

impl GridWorker {
    pub(super) fn new(inner: Arc<GridInner>, index: usize) -> Self {
        Self { inner, index }
    }

    /// Lane this worker's queries run on.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn min_cell_size(&self) -> f64 {
        self.inner.min_cell_size
    }

    /// Every stored cell whose extent overlaps `region`, in store order.
    pub async fn cells_in_region(&self, region: &BoundingBox) -> Result<Vec<Cell>, GridError> {
        let rows = self
            .inner
            .adapter
            .query(self.index, self.inner.statements.region(region))
            .await?;
        rows.iter().map(cell_from_row).collect()
    }

    /// Cells overlapping a cube of half-width `0.5 × min_cell_size` around
    /// `point`.
    ///
    /// The radius is fixed by the finest level, so near a coarse/fine boundary
    /// the truly nearest center can fall outside the box.
    pub async fn nearest_neighbor_candidates(
        &self,
        point: impl Into<Point>,
    ) -> Result<Vec<Cell>, GridError> {
        let point = point.into();
        let region = BoundingBox::around(point, CANDIDATE_HALF_WIDTH * self.inner.min_cell_size);
        self.cells_in_region(&region).await
    }

    /// Candidate with the closest center; see [`super::select_nearest`] for
    /// tie-breaking. Fails with `PointNotFound` when no candidate qualifies.
    pub async fn select_nearest(&self, point: impl Into<Point>) -> Result<Cell, GridError> {
        let point = point.into();
        let candidates = self.nearest_neighbor_candidates(point).await?;
        let chosen = select_nearest(&candidates, &point).copied();
        trace!(
            lane = self.index,
            candidates = candidates.len(),
            cell = chosen.map(|c| c.id()),
            "Nearest cell selection"
        );
        chosen.ok_or(GridError::PointNotFound {
            x: point.x,
            y: point.y,
            z: point.z,
        })
    }

    pub async fn cell_by_id(&self, id: CellId) -> Result<Cell, GridError> {
        let rows = self
            .inner
            .adapter
            .query(self.index, self.inner.statements.cell_by_id(id))
            .await?;
        rows.first()
            .map(cell_from_row)
            .ok_or(GridError::CellNotFound(id))?
    }

    /// Properties of every cell overlapping `region`: one region query, then
    /// one property query per cell, in region order.
    pub async fn properties_in_region(
        &self,
        region: &BoundingBox,
    ) -> Result<Vec<LocalProperties>, GridError> {
        let cells = self.cells_in_region(region).await?;
        let mut props = Vec::with_capacity(cells.len());
        for cell in &cells {
            props.push(self.properties_by_id(cell.id()).await?);
        }
        Ok(props)
    }

    /// Properties of the nearest cell to `point`, in simulation units.
    pub async fn properties_at_point(
        &self,
        point: impl Into<Point>,
    ) -> Result<LocalProperties, GridError> {
        let cell = self.select_nearest(point).await?;
        self.properties_by_id(cell.id()).await
    }

    pub async fn properties_by_id(&self, id: CellId) -> Result<LocalProperties, GridError> {
        if self.inner.adapter.is_closed() {
            return Err(GridError::Closed);
        }
        if let Some(hit) = self
            .inner
            .property_cache
            .as_ref()
            .and_then(|cache| cache.get(&id))
        {
            return Ok(hit);
        }

        let rows = self
            .inner
            .adapter
            .query(self.index, self.inner.statements.properties_by_id(id))
            .await?;
        let props = rows
            .first()
            .map(properties_from_row)
            .ok_or(GridError::PropertiesNotFound(id))??;

        if let Some(cache) = &self.inner.property_cache {
            cache.insert(id, props);
        }
        Ok(props)
    }

    pub async fn density_at_point(&self, point: impl Into<Point>) -> Result<f64, GridError> {
        Ok(self.properties_at_point(point).await?.density)
    }

    pub async fn field_at_point(&self, point: impl Into<Point>) -> Result<[f64; 3], GridError> {
        Ok(self.properties_at_point(point).await?.magnetic_field())
    }

    /// Number of cells in the geometry table.
    ///
    /// `COUNT(*)` always yields a row, so an empty result means contention
    /// outlasted the retry policy; that is `CountUnavailable`.
    pub async fn size(&self) -> Result<u64, GridError> {
        let rows = self
            .inner
            .adapter
            .query(self.index, self.inner.statements.count())
            .await?;
        let count = rows
            .first()
            .ok_or(GridError::CountUnavailable)?
            .integer(0)?;
        u64::try_from(count).map_err(|_| GridError::Malformed(format!("negative cell count {count}")))
    }
}

fn cell_from_row(row: &StoreRow) -> Result<Cell, GridError> {
    let bounds = BoundingBox::from_extents(
        row.real(gc::MIN_X)?,
        row.real(gc::MAX_X)?,
        row.real(gc::MIN_Y)?,
        row.real(gc::MAX_Y)?,
        row.real(gc::MIN_Z)?,
        row.real(gc::MAX_Z)?,
    );
    Ok(Cell::from_bounds(row.integer(gc::ID)?, bounds))
}

fn properties_from_row(row: &StoreRow) -> Result<LocalProperties, GridError> {
    Ok(LocalProperties::new(
        row.real(pc::DENSITY)?,
        row.real(pc::BX)?,
        row.real(pc::BY)?,
        row.real(pc::BZ)?,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(cols: &[&str]) -> StoreRow {
        StoreRow::new(cols.iter().map(ToString::to_string).collect())
    }

    #[test]
    fn geometry_row_builds_cell() {
        let cell = cell_from_row(&row(&["5", "0", "0.5", "0.25", "0.75", "0.5", "1"])).unwrap();
        assert_eq!(cell.id(), 5);
        assert_eq!(cell.center(), Point::new(0.25, 0.5, 0.75));
        assert_eq!(cell.size(), 0.5);
    }

    #[test]
    fn short_geometry_row_is_malformed() {
        assert!(matches!(
            cell_from_row(&row(&["5", "0", "0.5"])),
            Err(GridError::Malformed(_))
        ));
    }

    #[test]
    fn property_row_is_positional() {
        let props = properties_from_row(&row(&["2", "1", "0", "-1"])).unwrap();
        assert_eq!(props, LocalProperties::new(2.0, 1.0, 0.0, -1.0));
    }
}
