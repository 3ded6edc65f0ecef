//! Perceptually-ordered color scales and the per-animation phase legend.
//!
//! One legend is computed from the full table and reused for every frame of
//! an animation, so a given modulus keeps the same color from the first
//! frame to the last.

use plotters::style::RGBColor;
use serde::{Deserialize, Serialize};

use rela_core::PhaseModulus;

/// Palette used to colorize phase moduli.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorScale {
    /// Perceptually-uniform Viridis gradient. The default.
    #[default]
    Viridis,

    /// "Turbo" inspired gradient with warm highlights.
    Turbo,

    /// Plain monochrome luminance.
    Grayscale,
}

/// Viridis anchor points, dark purple through yellow.
const VIRIDIS_ANCHORS: [[f64; 3]; 5] = [
    [68.0, 1.0, 84.0],
    [59.0, 82.0, 139.0],
    [33.0, 145.0, 140.0],
    [94.0, 201.0, 98.0],
    [253.0, 231.0, 37.0],
];

impl ColorScale {
    /// Parse a palette name; `None` for unknown names.
    pub fn parse(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "viridis" => Some(Self::Viridis),
            "turbo" => Some(Self::Turbo),
            "grayscale" | "greyscale" => Some(Self::Grayscale),
            _ => None,
        }
    }

    pub fn canonical_name(&self) -> &'static str {
        match self {
            Self::Viridis => "viridis",
            Self::Turbo => "turbo",
            Self::Grayscale => "grayscale",
        }
    }

    /// Color at normalized position `t ∈ [0, 1]`.
    pub fn map(&self, t: f64) -> RGBColor {
        let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
        match self {
            Self::Viridis => lerp_anchors(&VIRIDIS_ANCHORS, t),
            Self::Turbo => {
                // Lightweight polynomial fit for the Turbo color map.
                let r = 34.61
                    + t * (1172.33
                        + t * (-10793.56 + t * (33300.12 + t * (-38394.49 + t * 14825.05))));
                let g = 23.31
                    + t * (557.33 + t * (-1224.52 + t * (3934.66 + t * (-4372.56 + t * 1641.93))));
                let b = 27.2
                    + t * (321.15 + t * (-1449.66 + t * (2144.05 + t * (-1177.27 + t * 234.125))));
                RGBColor(
                    r.clamp(0.0, 255.0) as u8,
                    g.clamp(0.0, 255.0) as u8,
                    b.clamp(0.0, 255.0) as u8,
                )
            }
            Self::Grayscale => {
                let luminance = (t * 255.0) as u8;
                RGBColor(luminance, luminance, luminance)
            }
        }
    }
}

fn lerp_anchors(anchors: &[[f64; 3]], t: f64) -> RGBColor {
    let scaled = t * (anchors.len() - 1) as f64;
    let i = (scaled.floor() as usize).min(anchors.len() - 2);
    let frac = scaled - i as f64;
    let (a, b) = (anchors[i], anchors[i + 1]);
    let channel = |k: usize| (a[k] + (b[k] - a[k]) * frac).round().clamp(0.0, 255.0) as u8;
    RGBColor(channel(0), channel(1), channel(2))
}

/// One legend row: the phase modulus and the sRGB color it renders as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegendEntry {
    pub modulus: PhaseModulus,
    pub rgb: [u8; 3],
}

/// Stable modulus → color assignment for one render.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhaseLegend {
    scale: ColorScale,
    min: f64,
    max: f64,
    entries: Vec<LegendEntry>,
}

impl PhaseLegend {
    /// Build the legend from every modulus of the full table.
    ///
    /// Moduli are normalized by value over the observed range; a table with
    /// a single distinct phase sits in the middle of the scale.
    pub fn from_moduli(moduli: &[PhaseModulus], scale: ColorScale) -> Self {
        let mut distinct: Vec<PhaseModulus> = moduli.to_vec();
        distinct.sort_unstable();
        distinct.dedup();

        let min = distinct.first().copied().unwrap_or(0) as f64;
        let max = distinct.last().copied().unwrap_or(0) as f64;

        let mut legend = Self {
            scale,
            min,
            max,
            entries: Vec::new(),
        };
        let entries = distinct
            .into_iter()
            .map(|modulus| {
                let color = legend.color_for(modulus);
                LegendEntry {
                    modulus,
                    rgb: [color.0, color.1, color.2],
                }
            })
            .collect();
        legend.entries = entries;
        legend
    }

    fn normalize(&self, modulus: PhaseModulus) -> f64 {
        if self.max > self.min {
            (modulus as f64 - self.min) / (self.max - self.min)
        } else {
            0.5
        }
    }

    /// Render color for a modulus, identical across every frame.
    pub fn color_for(&self, modulus: PhaseModulus) -> RGBColor {
        self.scale.map(self.normalize(modulus))
    }

    pub fn scale(&self) -> ColorScale {
        self.scale
    }

    pub fn entries(&self) -> &[LegendEntry] {
        &self.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_roundtrip() {
        for scale in [ColorScale::Viridis, ColorScale::Turbo, ColorScale::Grayscale] {
            assert_eq!(ColorScale::parse(scale.canonical_name()), Some(scale));
        }
        assert_eq!(ColorScale::parse("Greyscale"), Some(ColorScale::Grayscale));
        assert_eq!(ColorScale::parse("plasma"), None);
    }

    #[test]
    fn test_viridis_endpoints() {
        let low = ColorScale::Viridis.map(0.0);
        let high = ColorScale::Viridis.map(1.0);
        // Dark purple start, yellow end.
        assert_eq!((low.0, low.1, low.2), (68, 1, 84));
        assert_eq!((high.0, high.1, high.2), (253, 231, 37));
    }

    #[test]
    fn test_map_clamps() {
        let scale = ColorScale::Grayscale;
        assert_eq!(scale.map(-1.0), scale.map(0.0));
        assert_eq!(scale.map(2.0), scale.map(1.0));
        assert_eq!(scale.map(f64::NAN), scale.map(0.0));
    }

    #[test]
    fn test_legend_entries_are_distinct_and_sorted() {
        let legend = PhaseLegend::from_moduli(&[5000, 100, 500, 100, 5000], ColorScale::Viridis);
        let moduli: Vec<_> = legend.entries().iter().map(|e| e.modulus).collect();
        assert_eq!(moduli, vec![100, 500, 5000]);
    }

    #[test]
    fn test_legend_is_stable_across_builds() {
        let moduli = [1000, 100, 5000, 200, 500];
        let a = PhaseLegend::from_moduli(&moduli, ColorScale::Viridis);
        let b = PhaseLegend::from_moduli(&moduli, ColorScale::Viridis);
        assert_eq!(a, b);
        for entry in a.entries() {
            let c = a.color_for(entry.modulus);
            assert_eq!([c.0, c.1, c.2], entry.rgb);
        }
    }

    #[test]
    fn test_single_phase_sits_mid_scale() {
        let legend = PhaseLegend::from_moduli(&[500, 500], ColorScale::Grayscale);
        let c = legend.color_for(500);
        assert_eq!(c.0, 127);
    }

    #[test]
    fn test_extremes_map_to_scale_ends() {
        let legend = PhaseLegend::from_moduli(&[100, 5000], ColorScale::Grayscale);
        assert_eq!(legend.color_for(100).0, 0);
        assert_eq!(legend.color_for(5000).0, 255);
    }
}
