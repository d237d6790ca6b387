//! Point samplers for a propagation code: the magnetic field vector and the
//! baryon density of the nearest cell, optionally scaled to physical units.

use crate::error::GridError;
use crate::grid::GridWorker;
use amrgrid_geometry::{Point, UnitFactors};

pub struct MagneticField {
    worker: GridWorker,
    units: UnitFactors,
}

impl MagneticField {
    /// Field in simulation units.
    pub fn new(worker: GridWorker) -> Self {
        Self::with_units(worker, UnitFactors::IDENTITY)
    }

    pub fn with_units(worker: GridWorker, units: UnitFactors) -> Self {
        Self { worker, units }
    }

    /// `(Bx, By, Bz)` of the nearest cell to a grid-unit position. Each sample
    /// is converted exactly once.
    pub async fn field(&self, position: impl Into<Point>) -> Result<[f64; 3], GridError> {
        let props = self.worker.properties_at_point(position).await?;
        Ok(self.units.converted(props).magnetic_field())
    }

    pub async fn strength(&self, position: impl Into<Point>) -> Result<f64, GridError> {
        let props = self.worker.properties_at_point(position).await?;
        Ok(self.units.converted(props).btot())
    }
}

pub struct BaryonDensity {
    worker: GridWorker,
    units: UnitFactors,
}

impl BaryonDensity {
    pub fn new(worker: GridWorker) -> Self {
        Self::with_units(worker, UnitFactors::IDENTITY)
    }

    pub fn with_units(worker: GridWorker, units: UnitFactors) -> Self {
        Self { worker, units }
    }

    pub async fn density(&self, position: impl Into<Point>) -> Result<f64, GridError> {
        let props = self.worker.properties_at_point(position).await?;
        Ok(self.units.converted(props).density)
    }
}
