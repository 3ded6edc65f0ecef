//! Inverse-distance voltage signal.
//!
//! Voltage is a proxy for closeness: `V = scale / (distance + ε)`, where the
//! small positive `ε` keeps a zero-distance observation finite. Two scaling
//! conventions coexist in the field data this engine was built against, so
//! both are supported as explicit modes rather than one being guessed
//! canonical.

use serde::{Deserialize, Serialize};

/// How raw voltage relates to the configured scale factor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoltageScaling {
    /// `1 / (distance + ε)` with no clamp. The default convention.
    Unscaled,

    /// `scale / (distance + ε)`, clamped to `[0, scale]` so near-zero
    /// distances cannot dominate the radius axis.
    Clamped,
}

/// Parameters of the inverse-distance curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VoltageCurve {
    /// Positive scale factor. Ignored (treated as `1`) in unscaled mode.
    pub scale: f64,

    /// Small positive zero-distance guard.
    pub epsilon: f64,

    /// Scaling convention.
    pub scaling: VoltageScaling,
}

impl Default for VoltageCurve {
    fn default() -> Self {
        Self {
            scale: 1.0,
            epsilon: 0.1,
            scaling: VoltageScaling::Unscaled,
        }
    }
}

impl VoltageCurve {
    pub fn new() -> Self {
        Self::default()
    }

    /// The scaled-and-clamped variant with the given scale factor.
    pub fn clamped(scale: f64) -> Self {
        Self {
            scale,
            scaling: VoltageScaling::Clamped,
            ..Self::default()
        }
    }

    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    /// Voltage for a single distance observation.
    ///
    /// Strictly positive and strictly decreasing over valid `distance >= 0`.
    /// Invalid distances (negative or non-finite) fall back to `0.0` rather
    /// than failing the row.
    pub fn voltage(&self, distance: f64) -> f64 {
        if !distance.is_finite() || distance < 0.0 {
            return 0.0;
        }
        match self.scaling {
            VoltageScaling::Unscaled => 1.0 / (distance + self.epsilon),
            VoltageScaling::Clamped => {
                (self.scale / (distance + self.epsilon)).clamp(0.0, self.scale)
            }
        }
    }

    /// Upper bound of the curve: the voltage of a zero-distance observation.
    pub fn peak(&self) -> f64 {
        self.voltage(0.0)
    }
}
