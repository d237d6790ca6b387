use serde::{Deserialize, Serialize};

/// Physical sample attached to one cell, in simulation units unless converted.
///
/// `Default` is the zero sample; it is a placeholder and carries no data.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LocalProperties {
    pub density: f64,
    pub bx: f64,
    pub by: f64,
    pub bz: f64,
}

impl LocalProperties {
    pub const fn new(density: f64, bx: f64, by: f64, bz: f64) -> Self {
        Self {
            density,
            bx,
            by,
            bz,
        }
    }

    pub fn magnetic_field(&self) -> [f64; 3] {
        [self.bx, self.by, self.bz]
    }

    /// Field strength `sqrt(Bx² + By² + Bz²)`.
    pub fn btot(&self) -> f64 {
        (self.bx * self.bx + self.by * self.by + self.bz * self.bz).sqrt()
    }

    /// Scale density and field from simulation to physical units, in place.
    ///
    /// The length factor is accepted so callers can pass a full factor set, but neither
    /// density nor field depends on it. Each call multiplies again: converting
    /// twice scales density by `density²`.
    pub fn convert_units(&mut self, _length: f64, density: f64, field: f64) {
        self.density *= density;
        self.bx *= field;
        self.by *= field;
        self.bz *= field;
    }
}

/// Conversion factors from simulation units to physical units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UnitFactors {
    pub length: f64,
    pub density: f64,
    pub magnetic_field: f64,
}

impl Default for UnitFactors {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl UnitFactors {
    pub const IDENTITY: Self = Self {
        length: 1.0,
        density: 1.0,
        magnetic_field: 1.0,
    };

    pub const fn new(length: f64, density: f64, magnetic_field: f64) -> Self {
        Self {
            length,
            density,
            magnetic_field,
        }
    }

    pub fn apply(&self, props: &mut LocalProperties) {
        props.convert_units(self.length, self.density, self.magnetic_field);
    }

    pub fn converted(&self, mut props: LocalProperties) -> LocalProperties {
        self.apply(&mut props);
        props
    }
}
