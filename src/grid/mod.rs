//! Grid query engine.
//!
//! A [`Grid`] owns the store adapter and is shared by cloning; the adapter is
//! torn down once, by the first [`Grid::close`] (or when the last handle is
//! dropped). Queries go through a [`GridWorker`], which pins every statement
//! it issues to one connection lane.

pub mod nearest;
mod worker;

pub use nearest::{CANDIDATE_HALF_WIDTH, SELECTION_RADIUS, select_nearest};
pub use worker::GridWorker;

use crate::config::{Config, StoreConfig};
use crate::db::{GridStatements, StoreAdapter};
use crate::error::GridError;
use amrgrid_geometry::{CellId, LocalProperties};
use moka::sync::Cache;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

pub(crate) struct GridInner {
    adapter: StoreAdapter,
    statements: GridStatements,
    max_refinement_level: u32,
    min_cell_size: f64,
    property_cache: Option<Cache<CellId, LocalProperties>>,
}

#[derive(Clone)]
pub struct Grid {
    inner: Arc<GridInner>,
}

impl Grid {
    /// Opens the grid file read-only with `config.workers` connection lanes.
    pub async fn open(
        path: impl AsRef<Path>,
        max_refinement_level: u32,
        config: &StoreConfig,
    ) -> Result<Self, GridError> {
        let adapter = StoreAdapter::open(path.as_ref(), config).await?;
        let property_cache = (config.property_cache_capacity > 0).then(|| {
            Cache::builder()
                .max_capacity(config.property_cache_capacity)
                .build()
        });

        let min_cell_size = min_cell_size(max_refinement_level);
        info!(
            max_refinement_level,
            min_cell_size,
            cache_capacity = config.property_cache_capacity,
            "AMR grid ready"
        );

        Ok(Self {
            inner: Arc::new(GridInner {
                adapter,
                statements: GridStatements::new(config),
                max_refinement_level,
                min_cell_size,
                property_cache,
            }),
        })
    }

    /// Opens the grid described by the `basic` and `store` tables.
    pub async fn from_config(config: &Config) -> Result<Self, GridError> {
        Self::open(
            &config.basic.database_path,
            config.basic.max_refinement_level,
            &config.store,
        )
        .await
    }

    /// Query handle bound to connection lane `index`.
    pub fn worker(&self, index: usize) -> Result<GridWorker, GridError> {
        self.inner.adapter.check_worker(index)?;
        Ok(GridWorker::new(self.inner.clone(), index))
    }

    /// One query handle per connection lane.
    pub fn workers(&self) -> Vec<GridWorker> {
        (0..self.num_workers())
            .map(|index| GridWorker::new(self.inner.clone(), index))
            .collect()
    }

    pub fn num_workers(&self) -> usize {
        self.inner.adapter.workers()
    }

    pub fn max_refinement_level(&self) -> u32 {
        self.inner.max_refinement_level
    }

    /// Finest cell edge, `1 / 2^level`.
    pub fn min_cell_size(&self) -> f64 {
        self.inner.min_cell_size
    }

    pub fn is_closed(&self) -> bool {
        self.inner.adapter.is_closed()
    }

    /// Releases every connection. Safe to call repeatedly and from any clone;
    /// only the first call closes anything.
    pub async fn close(&self) -> Result<(), GridError> {
        if let Some(cache) = &self.inner.property_cache {
            cache.invalidate_all();
        }
        self.inner.adapter.close().await
    }
}

pub(crate) fn min_cell_size(max_refinement_level: u32) -> f64 {
    i32::try_from(max_refinement_level).map_or(0.0, |level| 0.5_f64.powi(level))
}
