mod basic;
mod sample;
mod store;

pub use basic::BasicConfig;
pub use sample::SampleConfig;
pub use store::{RetryPolicy, StoreConfig};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::{path::PathBuf, sync::LazyLock};

/// Application configuration managed by Figment.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    /// Grid file and logging (see `basic` table in amrgrid.toml).
    #[serde(default)]
    pub basic: BasicConfig,

    /// Connection lanes, retry policy and table names (see `store` table).
    #[serde(default)]
    pub store: StoreConfig,

    /// Uniform sampling run performed by the binary (see `sample` table).
    #[serde(default)]
    pub sample: SampleConfig,
}

const DEFAULT_CONFIG_FILE: &str = "amrgrid.toml";
const ENV_PREFIX: &str = "AMRGRID_";

impl Config {
    /// Builds a Figment that merges defaults, `amrgrid.toml` if present, and
    /// `AMRGRID_`-prefixed environment variables (`AMRGRID_STORE__WORKERS=4`).
    pub fn figment() -> Figment {
        let figment = Figment::new().merge(Serialized::defaults(Config::default()));
        let figment = if PathBuf::from(DEFAULT_CONFIG_FILE).is_file() {
            figment.merge(Toml::file(DEFAULT_CONFIG_FILE))
        } else {
            figment
        };
        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    pub fn load() -> Result<Self, figment::Error> {
        Self::figment().extract()
    }

    /// Loads configuration and panics on extraction failure. Intended for
    /// binaries only.
    pub fn from_optional_toml() -> Self {
        Self::load().unwrap_or_else(|err| {
            panic!("failed to extract configuration (defaults + optional {DEFAULT_CONFIG_FILE}): {err}")
        })
    }
}

/// Global, lazily-initialized configuration instance.
pub static CONFIG: LazyLock<Config> = LazyLock::new(Config::from_optional_toml);
