use amrgrid_geometry::CellId;
use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum GridError {
    #[error("Failed to open grid store {path}: {message}")]
    Open { path: String, message: String },

    #[error("Store error: {0}")]
    Store(String),

    #[error("No cell with id {0}")]
    CellNotFound(CellId),

    #[error("No properties stored for cell {0}")]
    PropertiesNotFound(CellId),

    #[error("No cell within reach of ({x}, {y}, {z})")]
    PointNotFound { x: f64, y: f64, z: f64 },

    #[error("Grid is closed")]
    Closed,

    #[error("Malformed row: {0}")]
    Malformed(String),

    /// The count query yielded no row: the store stayed BUSY/LOCKED through
    /// every retry.
    #[error("Cell count unavailable: store contended")]
    CountUnavailable,

    #[error("Worker {index} out of range (grid has {workers} workers)")]
    InvalidWorker { index: usize, workers: usize },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Ractor error: {0}")]
    RactorError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl GridError {
    /// True for every "no row matched" condition.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            GridError::CellNotFound(_)
                | GridError::PropertiesNotFound(_)
                | GridError::PointNotFound { .. }
        )
    }
}

pub trait IsRetryable {
    fn is_retryable(&self) -> bool;
}
