use super::row::StoreRow;
use crate::error::{GridError, IsRetryable};
use thiserror::Error as ThisError;

const SQLITE_BUSY: u32 = 5;
const SQLITE_LOCKED: u32 = 6;

/// Outcome of one failed query attempt on a lane connection.
#[derive(Debug, ThisError)]
pub(crate) enum StoreFailure {
    /// BUSY/LOCKED. Carries the rows stepped before the store pushed back.
    #[error("store contention ({code}): {message}")]
    Contention {
        code: String,
        message: String,
        partial: Vec<StoreRow>,
    },

    #[error("{0}")]
    Engine(String),

    #[error("{0}")]
    Malformed(String),
}

impl StoreFailure {
    pub(crate) fn from_sqlx(err: sqlx::Error, partial: Vec<StoreRow>) -> Self {
        if let sqlx::Error::Database(db) = &err {
            let code = db.code().map(|c| c.into_owned()).unwrap_or_default();
            let contended = match code.parse::<u32>() {
                Ok(c) => is_contention_code(c),
                Err(_) => is_contention_message(db.message()),
            };
            if contended {
                return StoreFailure::Contention {
                    code,
                    message: db.message().to_string(),
                    partial,
                };
            }
            return StoreFailure::Engine(db.message().to_string());
        }
        StoreFailure::Engine(err.to_string())
    }

    /// Rows to hand back once retries are exhausted.
    pub(crate) fn into_partial(self) -> Result<Vec<StoreRow>, GridError> {
        match self {
            StoreFailure::Contention { partial, .. } => Ok(partial),
            StoreFailure::Engine(message) => Err(GridError::Store(message)),
            StoreFailure::Malformed(message) => Err(GridError::Malformed(message)),
        }
    }
}

impl IsRetryable for StoreFailure {
    fn is_retryable(&self) -> bool {
        matches!(self, StoreFailure::Contention { .. })
    }
}

/// Extended result codes keep the primary code in the low byte.
fn is_contention_code(code: u32) -> bool {
    matches!(code & 0xff, SQLITE_BUSY | SQLITE_LOCKED)
}

fn is_contention_message(message: &str) -> bool {
    let lower = message.to_ascii_lowercase();
    lower.contains("database is locked")
        || lower.contains("database table is locked")
        || lower.contains("busy")
}
