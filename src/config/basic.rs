use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Basic (core) configuration managed by Figment.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BasicConfig {
    /// Path of the SQLite grid file. Opened read-only; never created.
    /// TOML: `basic.database_path`. Default: `grid.db`.
    #[serde(default = "default_database_path")]
    pub database_path: PathBuf,

    /// Maximum refinement level of the grid; the finest cell edge is `1 / 2^level`.
    /// TOML: `basic.max_refinement_level`. Default: `10`.
    #[serde(default = "default_max_refinement_level")]
    pub max_refinement_level: u32,

    /// Log level for tracing subscriber initialization (e.g., "error", "warn", "info", "debug", "trace").
    /// TOML: `basic.loglevel`. Default: `info`.
    #[serde(default = "default_loglevel")]
    pub loglevel: String,
}

impl Default for BasicConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            max_refinement_level: default_max_refinement_level(),
            loglevel: default_loglevel(),
        }
    }
}

fn default_database_path() -> PathBuf {
    PathBuf::from("grid.db")
}

fn default_max_refinement_level() -> u32 {
    10
}

fn default_loglevel() -> String {
    "info".to_string()
}
