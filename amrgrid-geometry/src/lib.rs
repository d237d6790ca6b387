pub mod bbox;
pub mod cell;
pub mod point;
pub mod properties;

pub use bbox::BoundingBox;
pub use cell::{Cell, CellId};
pub use point::Point;
pub use properties::{LocalProperties, UnitFactors};
