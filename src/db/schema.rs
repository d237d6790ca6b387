//! Statement text for the read-only grid schema.
//!
//! Geometry table: `(id INTEGER, minX, maxX, minY, maxY, minZ, maxZ REAL)`,
//! one row per leaf cell. Properties table: `(density, Bx, By, Bz REAL)`,
//! addressed by `rowid` equal to the geometry `id`.
//!
//! Table names come from validated configuration; every coordinate and id is
//! a bound parameter.

use super::row::StoreQuery;
use crate::config::StoreConfig;
use amrgrid_geometry::{BoundingBox, CellId};
use std::sync::Arc;

/// Column positions of a geometry row as selected by [`GridStatements`].
pub mod geometry_columns {
    pub const ID: usize = 0;
    pub const MIN_X: usize = 1;
    pub const MAX_X: usize = 2;
    pub const MIN_Y: usize = 3;
    pub const MAX_Y: usize = 4;
    pub const MIN_Z: usize = 5;
    pub const MAX_Z: usize = 6;
}

/// Column positions of a properties row.
pub mod property_columns {
    pub const DENSITY: usize = 0;
    pub const BX: usize = 1;
    pub const BY: usize = 2;
    pub const BZ: usize = 3;
}

#[derive(Debug, Clone)]
pub struct GridStatements {
    region: Arc<str>,
    cell_by_id: Arc<str>,
    properties_by_id: Arc<str>,
    count: Arc<str>,
}

impl GridStatements {
    /// Builds statement text. `config` must have passed [`StoreConfig::validate`].
    pub fn new(config: &StoreConfig) -> Self {
        let geometry = &config.geometry_table;
        let properties = &config.properties_table;
        let columns = "id, minX, maxX, minY, maxY, minZ, maxZ";

        Self {
            region: format!(
                "SELECT {columns} FROM {geometry} \
                 WHERE maxX >= ? AND minX <= ? \
                 AND maxY >= ? AND minY <= ? \
                 AND maxZ >= ? AND minZ <= ?"
            )
            .into(),
            cell_by_id: format!("SELECT {columns} FROM {geometry} WHERE id = ? LIMIT 1").into(),
            properties_by_id: format!("SELECT * FROM {properties} WHERE rowid = ? LIMIT 1")
                .into(),
            count: format!("SELECT COUNT(*) FROM {geometry}").into(),
        }
    }

    /// Cells whose extent overlaps `region` (faces touching count).
    pub fn region(&self, region: &BoundingBox) -> StoreQuery {
        StoreQuery::new(self.region.clone())
            .bind_real(region.min.x)
            .bind_real(region.max.x)
            .bind_real(region.min.y)
            .bind_real(region.max.y)
            .bind_real(region.min.z)
            .bind_real(region.max.z)
    }

    pub fn cell_by_id(&self, id: CellId) -> StoreQuery {
        StoreQuery::new(self.cell_by_id.clone()).bind_integer(id)
    }

    pub fn properties_by_id(&self, id: CellId) -> StoreQuery {
        StoreQuery::new(self.properties_by_id.clone()).bind_integer(id)
    }

    pub fn count(&self) -> StoreQuery {
        StoreQuery::new(self.count.clone())
    }
}
