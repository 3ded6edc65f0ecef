//! Fundamental types for the RELA field engine.

use nalgebra::Point3;
use serde::{Deserialize, Serialize};

/// Required input column: distance to the observed object (non-negative).
pub const DISTANCE_COLUMN: &str = "distance";

/// Required input column: free-text category label.
pub const LABEL_COLUMN: &str = "label";

/// Derived column: inverse-distance voltage.
pub const VOLTAGE_COLUMN: &str = "voltage";

/// Derived column: integer phase constant from the label.
pub const MODULUS_COLUMN: &str = "modulus";

/// Derived column: first difference of voltage across row order.
pub const CURRENT_COLUMN: &str = "semantic_current";

/// Integer phase constant derived from an observation label.
///
/// Used for color-coding and grouping; the full keyword table lives in
/// `rela-signal`.
pub type PhaseModulus = i64;

/// One point of a spiral trace in engine coordinates.
///
/// `x`/`y` are the Cartesian projection of (radius, angle); `z` carries the
/// semantic-current depth axis and is `0` for flat (2D) projections.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpiralPoint {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl SpiralPoint {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// A point on the z = 0 plane, for flat projections.
    pub fn flat(x: f64, y: f64) -> Self {
        Self::new(x, y, 0.0)
    }

    /// Distance from the spiral axis.
    pub fn radius(&self) -> f64 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    pub fn to_nalgebra(&self) -> Point3<f64> {
        Point3::new(self.x, self.y, self.z)
    }

    pub fn from_nalgebra(p: Point3<f64>) -> Self {
        Self::new(p.x, p.y, p.z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_radius() {
        let p = SpiralPoint::new(3.0, 4.0, -1.0);
        assert!((p.radius() - 5.0).abs() < 1e-10);
    }

    #[test]
    fn test_nalgebra_roundtrip() {
        let p = SpiralPoint::new(0.5, -0.25, 2.0);
        let back = SpiralPoint::from_nalgebra(p.to_nalgebra());
        assert_eq!(p, back);
    }
}
