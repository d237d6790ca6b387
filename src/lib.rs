pub mod config;
pub mod db;
pub mod error;
pub mod field;
pub mod grid;
pub mod sample;

pub use amrgrid_geometry::{BoundingBox, Cell, CellId, LocalProperties, Point, UnitFactors};
pub use error::GridError;
pub use field::{BaryonDensity, MagneticField};
pub use grid::{Grid, GridWorker};
