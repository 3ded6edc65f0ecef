//! Spiral coordinate mapping.
//!
//! Row index becomes angle, voltage becomes radius, semantic current becomes
//! the depth axis. The projection is the classic polar construction:
//!
//! `θ_i = i · total_sweep / (n - 1)`, `x = r · cos θ`, `y = r · sin θ`
//!
//! so closer objects (higher voltage) sit further from the spiral axis.

use std::f64::consts::TAU;

use num_complex::Complex;

use rela_core::{
    PhaseModulus, Result, SpiralPoint, Table, CURRENT_COLUMN, MODULUS_COLUMN, VOLTAGE_COLUMN,
};

/// Evenly spread angles over `sweep_turns` full revolutions.
///
/// A single row sits at `θ = 0`; with more rows the last one lands exactly
/// on the full sweep.
pub fn assign_angles(n: usize, sweep_turns: f64) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![0.0],
        _ => {
            let step = sweep_turns * TAU / (n - 1) as f64;
            (0..n).map(|i| i as f64 * step).collect()
        }
    }
}

/// Axis-aligned bounds of a full trace.
///
/// Computed once over all rows and shared by every frame of an animation so
/// the axes do not jump as the prefix grows.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TraceBounds {
    pub x: (f64, f64),
    pub y: (f64, f64),
    pub z: (f64, f64),
}

fn padded(min: f64, max: f64) -> (f64, f64) {
    let (mut min, mut max) = (min, max);
    if (max - min).abs() < 1e-9 {
        min -= 0.5;
        max += 0.5;
    }
    let pad = 0.05 * (max - min);
    (min - pad, max + pad)
}

/// Complete spiral trace for a derived table.
///
/// Points and phase moduli are parallel, in row order; frames render a
/// strictly growing prefix of both.
#[derive(Debug, Clone)]
pub struct SpiralTrace {
    points: Vec<SpiralPoint>,
    moduli: Vec<PhaseModulus>,
}

impl SpiralTrace {
    /// Map the derived signals onto spiral coordinates.
    pub fn from_signals(
        voltage: &[f64],
        current: &[f64],
        moduli: &[PhaseModulus],
        sweep_turns: f64,
    ) -> Self {
        let angles = assign_angles(voltage.len(), sweep_turns);
        let points = voltage
            .iter()
            .zip(&angles)
            .zip(current)
            .map(|((&r, &theta), &z)| {
                let xy = Complex::from_polar(r, theta);
                SpiralPoint::new(xy.re, xy.im, z)
            })
            .collect();
        Self {
            points,
            moduli: moduli.to_vec(),
        }
    }

    /// Read the derived columns off an augmented table.
    ///
    /// The renderer consumes the deriver's output, so `voltage`, `modulus`,
    /// and `semantic_current` must all be present.
    pub fn from_table(table: &Table, sweep_turns: f64) -> Result<Self> {
        let voltage = numeric_column(table, VOLTAGE_COLUMN)?;
        let current = numeric_column(table, CURRENT_COLUMN)?;
        let moduli: Vec<PhaseModulus> = numeric_column(table, MODULUS_COLUMN)?
            .into_iter()
            .map(|m| m as PhaseModulus)
            .collect();
        Ok(Self::from_signals(&voltage, &current, &moduli, sweep_turns))
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[SpiralPoint] {
        &self.points
    }

    pub fn moduli(&self) -> &[PhaseModulus] {
        &self.moduli
    }

    /// The first `k` rows of the trace (clamped to its length).
    pub fn prefix(&self, k: usize) -> (&[SpiralPoint], &[PhaseModulus]) {
        let k = k.min(self.points.len());
        (&self.points[..k], &self.moduli[..k])
    }

    /// Padded bounds over the whole trace.
    pub fn bounds(&self) -> TraceBounds {
        let mut x = (f64::INFINITY, f64::NEG_INFINITY);
        let mut y = x;
        let mut z = x;
        for p in &self.points {
            x = (x.0.min(p.x), x.1.max(p.x));
            y = (y.0.min(p.y), y.1.max(p.y));
            z = (z.0.min(p.z), z.1.max(p.z));
        }
        if self.points.is_empty() {
            x = (0.0, 0.0);
            y = (0.0, 0.0);
            z = (0.0, 0.0);
        }
        TraceBounds {
            x: padded(x.0, x.1),
            y: padded(y.0, y.1),
            z: padded(z.0, z.1),
        }
    }
}

fn numeric_column(table: &Table, name: &str) -> Result<Vec<f64>> {
    let cells = table
        .column(name)
        .ok_or_else(|| rela_core::Error::MissingColumn {
            column: name.to_string(),
        })?;
    Ok(cells.iter().map(|v| v.as_f64().unwrap_or(0.0)).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_angle_assignment() {
        assert!(assign_angles(0, 2.0).is_empty());
        assert_eq!(assign_angles(1, 2.0), vec![0.0]);

        let angles = assign_angles(5, 2.0);
        assert_eq!(angles.len(), 5);
        assert_eq!(angles[0], 0.0);
        assert!((angles[4] - 2.0 * TAU).abs() < 1e-10);
        // Evenly spaced.
        let step = angles[1] - angles[0];
        for pair in angles.windows(2) {
            assert!((pair[1] - pair[0] - step).abs() < 1e-10);
        }
    }

    #[test]
    fn test_polar_projection() {
        // Two rows, one full turn: the second row comes back to angle 2π.
        let trace = SpiralTrace::from_signals(&[2.0, 3.0], &[0.0, 1.0], &[500, 5000], 1.0);
        let p = trace.points();

        assert!((p[0].x - 2.0).abs() < 1e-10);
        assert!(p[0].y.abs() < 1e-10);
        assert!((p[1].x - 3.0).abs() < 1e-9);
        assert!(p[1].y.abs() < 1e-9);
        assert_eq!(p[1].z, 1.0);
        assert_eq!(trace.moduli(), [500, 5000]);
    }

    #[test]
    fn test_radius_is_voltage() {
        let voltage = [10.0, 0.1, 3.3];
        let trace = SpiralTrace::from_signals(&voltage, &[0.0; 3], &[500; 3], 4.0);
        for (p, v) in trace.points().iter().zip(voltage) {
            assert!((p.radius() - v).abs() < 1e-9);
        }
    }

    #[test]
    fn test_prefix_clamps() {
        let trace = SpiralTrace::from_signals(&[1.0, 2.0], &[0.0, 1.0], &[100, 200], 2.0);
        let (points, moduli) = trace.prefix(10);
        assert_eq!(points.len(), 2);
        assert_eq!(moduli.len(), 2);
        let (points, _) = trace.prefix(1);
        assert_eq!(points.len(), 1);
    }

    #[test]
    fn test_bounds_cover_all_points_with_padding() {
        let trace = SpiralTrace::from_signals(&[1.0, 5.0, 2.0], &[-1.0, 0.5, 3.0], &[500; 3], 2.0);
        let bounds = trace.bounds();
        for p in trace.points() {
            assert!(p.x > bounds.x.0 && p.x < bounds.x.1);
            assert!(p.y > bounds.y.0 && p.y < bounds.y.1);
            assert!(p.z > bounds.z.0 && p.z < bounds.z.1);
        }
    }

    #[test]
    fn test_degenerate_bounds_widen() {
        let trace = SpiralTrace::from_signals(&[1.0], &[0.0], &[500], 2.0);
        let bounds = trace.bounds();
        assert!(bounds.z.1 > bounds.z.0);
        assert!(bounds.y.1 > bounds.y.0);
    }
}
