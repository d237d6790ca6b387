use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Uniform sampling run performed by the `amrgrid` binary.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SampleConfig {
    /// Output file of little-endian `f32` field triples.
    /// TOML: `sample.output_path`. Default: `field.bin`.
    #[serde(default = "default_output_path")]
    pub output_path: PathBuf,

    /// Points per axis; the run samples `resolution³` points.
    /// TOML: `sample.resolution`. Default: `64`.
    #[serde(default = "default_resolution")]
    pub resolution: u32,

    /// Factor applied to each field component before writing.
    /// TOML: `sample.field_factor`. Default: `1.0`.
    #[serde(default = "default_field_factor")]
    pub field_factor: f64,
}

impl Default for SampleConfig {
    fn default() -> Self {
        Self {
            output_path: default_output_path(),
            resolution: default_resolution(),
            field_factor: default_field_factor(),
        }
    }
}

fn default_output_path() -> PathBuf {
    PathBuf::from("field.bin")
}

fn default_resolution() -> u32 {
    64
}

fn default_field_factor() -> f64 {
    1.0
}
