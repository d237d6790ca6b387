use super::actor::{self, LaneArgs, LaneHandle};
use super::row::{StoreQuery, StoreRow};
use crate::config::StoreConfig;
use crate::error::GridError;
use sqlx::sqlite::SqliteConnectOptions;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{info, warn};

/// Read-only access to the grid file through one connection per worker lane.
pub struct StoreAdapter {
    path: String,
    lanes: Vec<LaneHandle>,
    closed: AtomicBool,
}

impl StoreAdapter {
    /// Opens `config.workers` independent read-only connections.
    ///
    /// If any lane fails to connect, the lanes already opened are closed and
    /// the whole open fails.
    pub async fn open(path: &Path, config: &StoreConfig) -> Result<Self, GridError> {
        config.validate()?;
        let shown = path.display().to_string();

        let options = SqliteConnectOptions::new()
            .filename(path)
            .read_only(true)
            .create_if_missing(false)
            .busy_timeout(config.busy_timeout());

        let mut lanes = Vec::with_capacity(config.workers);
        for lane in 0..config.workers {
            let args = LaneArgs {
                lane,
                options: options.clone(),
                retry: config.retry_policy(),
            };
            match actor::spawn(args).await {
                Ok(handle) => lanes.push(handle),
                Err(message) => {
                    for opened in &lanes {
                        if let Err(e) = opened.close().await {
                            warn!(lane = opened.lane(), error = %e, "Failed to close lane after open failure");
                        }
                    }
                    return Err(GridError::Open {
                        path: shown,
                        message,
                    });
                }
            }
        }

        info!(path = %shown, workers = lanes.len(), "Grid store opened read-only");
        Ok(Self {
            path: shown,
            lanes,
            closed: AtomicBool::new(false),
        })
    }

    pub fn workers(&self) -> usize {
        self.lanes.len()
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    pub fn check_worker(&self, worker: usize) -> Result<(), GridError> {
        if worker < self.lanes.len() {
            Ok(())
        } else {
            Err(GridError::InvalidWorker {
                index: worker,
                workers: self.lanes.len(),
            })
        }
    }

    /// Runs `query` on the connection owned by `worker`.
    pub async fn query(&self, worker: usize, query: StoreQuery) -> Result<Vec<StoreRow>, GridError> {
        if self.is_closed() {
            return Err(GridError::Closed);
        }
        self.check_worker(worker)?;
        match self.lanes[worker].query(query).await {
            // A lane stopped by a concurrent close reports as closed.
            Err(GridError::RactorError(_)) if self.is_closed() => Err(GridError::Closed),
            other => other,
        }
    }

    /// Closes every lane. Only the first call does any work.
    ///
    /// Every lane is attempted even if one fails; the first failure is
    /// returned and the adapter stays closed regardless.
    pub async fn close(&self) -> Result<(), GridError> {
        if self.closed.swap(true, Ordering::AcqRel) {
            return Ok(());
        }

        let mut first_err = None;
        for lane in &self.lanes {
            if let Err(e) = lane.close().await {
                warn!(lane = lane.lane(), error = %e, "Failed to close connection lane");
                first_err.get_or_insert(e);
            }
        }

        info!(path = %self.path, "Grid store closed");
        match first_err {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

impl Drop for StoreAdapter {
    fn drop(&mut self) {
        if !self.is_closed() {
            for lane in &self.lanes {
                lane.stop();
            }
        }
    }
}
