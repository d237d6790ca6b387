use crate::error::GridError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Backing store configuration: connection lanes, contention retry, table names.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StoreConfig {
    /// Number of worker lanes; each owns one read-only connection.
    /// `1` shares a single connection between all callers.
    /// TOML: `store.workers`. Default: `1`.
    #[serde(default = "default_workers")]
    pub workers: usize,

    /// Sleep between attempts while the store reports BUSY/LOCKED.
    /// TOML: `store.retry_interval_ms`. Default: `50`.
    #[serde(default = "default_retry_interval_ms")]
    pub retry_interval_ms: u64,

    /// Total attempts (first try included) before a contended query gives up
    /// and returns the rows it has.
    /// TOML: `store.retry_max_attempts`. Default: `200`.
    #[serde(default = "default_retry_max_attempts")]
    pub retry_max_attempts: u32,

    /// SQLite's own busy handler timeout. `0` hands every BUSY straight to the
    /// retry policy above.
    /// TOML: `store.busy_timeout_ms`. Default: `0`.
    #[serde(default)]
    pub busy_timeout_ms: u64,

    /// Geometry table: `(id, minX, maxX, minY, maxY, minZ, maxZ)`.
    /// TOML: `store.geometry_table`. Default: `Cell_tree`.
    #[serde(default = "default_geometry_table")]
    pub geometry_table: String,

    /// Properties table: `(density, Bx, By, Bz)` addressed by rowid.
    /// TOML: `store.properties_table`. Default: `Cell`.
    #[serde(default = "default_properties_table")]
    pub properties_table: String,

    /// Entries kept in the per-grid property cache; `0` disables it.
    /// TOML: `store.property_cache_capacity`. Default: `0`.
    #[serde(default)]
    pub property_cache_capacity: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            workers: default_workers(),
            retry_interval_ms: default_retry_interval_ms(),
            retry_max_attempts: default_retry_max_attempts(),
            busy_timeout_ms: 0,
            geometry_table: default_geometry_table(),
            properties_table: default_properties_table(),
            property_cache_capacity: 0,
        }
    }
}

impl StoreConfig {
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            interval: Duration::from_millis(self.retry_interval_ms),
            max_attempts: self.retry_max_attempts.max(1),
        }
    }

    pub fn busy_timeout(&self) -> Duration {
        Duration::from_millis(self.busy_timeout_ms)
    }

    pub fn validate(&self) -> Result<(), GridError> {
        if self.workers == 0 {
            return Err(GridError::InvalidConfig(
                "store.workers must be at least 1".to_string(),
            ));
        }
        for (key, name) in [
            ("store.geometry_table", &self.geometry_table),
            ("store.properties_table", &self.properties_table),
        ] {
            if !is_plain_identifier(name) {
                return Err(GridError::InvalidConfig(format!(
                    "{key} must be a plain SQL identifier, got {name:?}"
                )));
            }
        }
        Ok(())
    }
}

/// Bounded retry for BUSY/LOCKED contention.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub interval: Duration,
    /// Total attempts, first try included. Never zero.
    pub max_attempts: u32,
}

/// Table names end up in statement text, so only `[A-Za-z_][A-Za-z0-9_]*` is accepted.
fn is_plain_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn default_workers() -> usize {
    1
}

fn default_retry_interval_ms() -> u64 {
    50
}

fn default_retry_max_attempts() -> u32 {
    200
}

fn default_geometry_table() -> String {
    "Cell_tree".to_string()
}

fn default_properties_table() -> String {
    "Cell".to_string()
}
