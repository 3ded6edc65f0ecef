//! End-to-end pipeline: decode, derive, render.

use std::io::Read;

use rela_core::{Result, Table};
use rela_signal::{Derived, SignalDeriver};
use rela_spiral::{Animation, RenderContext, SpiralRenderer, StaticRender};

use crate::config::RelaConfig;

/// The full RELA pipeline: signal derivation feeding the spiral renderer.
///
/// Data flows strictly one way — raw table → deriver → augmented table →
/// renderer → artifacts — with no feedback loop and no shared mutable state
/// between the two stages. The pipeline itself is stateless and can be
/// reused across tables.
pub struct RelaPipeline {
    deriver: SignalDeriver,
    renderer: SpiralRenderer,
}

impl RelaPipeline {
    pub fn new(config: RelaConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            deriver: SignalDeriver::new(config.signal),
            renderer: SpiralRenderer::new(config.spiral)?,
        })
    }

    /// Derive signals for an in-memory table.
    pub fn derive(&self, table: &Table) -> Result<Derived> {
        let derived = self.deriver.derive(table)?;
        tracing::info!(
            rows = derived.table.len(),
            warnings = derived.warnings.len(),
            "signals derived"
        );
        Ok(derived)
    }

    /// Decode a CSV stream and derive signals for it.
    pub fn derive_csv<R: Read>(&self, reader: R) -> Result<Derived> {
        let table = Table::from_csv(reader)?;
        self.derive(&table)
    }

    /// Render one static spiral from a derived table.
    pub fn render_static(&self, derived: &Derived, ctx: &RenderContext) -> Result<StaticRender> {
        self.renderer.render_static(&derived.table, ctx)
    }

    /// Render the animated spiral from a derived table.
    ///
    /// `Ok(None)` means the table was too short for a single frame; no
    /// artifact is produced.
    pub fn render_animation(
        &self,
        derived: &Derived,
        ctx: &RenderContext,
    ) -> Result<Option<Animation>> {
        self.renderer.render_animation(&derived.table, ctx)
    }
}

impl Default for RelaPipeline {
    fn default() -> Self {
        Self::new(RelaConfig::default()).expect("default configuration is valid")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rela_core::{CURRENT_COLUMN, MODULUS_COLUMN, VOLTAGE_COLUMN};
    use rela_spiral::AnimationStatus;

    fn csv_rows(rows: usize) -> Vec<u8> {
        let labels = ["Car", "zone", "crosswalk", "stop sign", "pedestrian"];
        let mut csv = b"distance,label\n".to_vec();
        for i in 0..rows {
            let line = format!("{:.1},{}\n", i as f64 * 0.7, labels[i % labels.len()]);
            csv.extend_from_slice(line.as_bytes());
        }
        csv
    }

    #[test]
    fn test_csv_to_signals() {
        let pipeline = RelaPipeline::default();
        let derived = pipeline
            .derive_csv(&b"distance,label\n0.0,Car\n9.9,zone\n"[..])
            .unwrap();

        let voltage: Vec<f64> = derived
            .table
            .column(VOLTAGE_COLUMN)
            .unwrap()
            .iter()
            .map(|v| v.as_f64().unwrap())
            .collect();
        assert!((voltage[0] - 10.0).abs() < 1e-10);
        assert!((voltage[1] - 0.1).abs() < 1e-10);

        assert!(derived.table.column_index(MODULUS_COLUMN).is_some());
        assert!(derived.table.column_index(CURRENT_COLUMN).is_some());
    }

    #[test]
    fn test_missing_label_column_fails_whole_table() {
        let pipeline = RelaPipeline::default();
        let err = pipeline.derive_csv(&b"distance\n1.0\n"[..]).unwrap_err();
        assert!(matches!(err, rela_core::Error::MissingColumn { .. }));
    }

    #[test]
    fn test_end_to_end_animation() {
        let out = tempfile::tempdir().unwrap();
        let mut config = RelaConfig::default();
        config.spiral.width = 160;
        config.spiral.height = 120;
        let pipeline = RelaPipeline::new(config).unwrap();

        let derived = pipeline.derive_csv(&csv_rows(12)[..]).unwrap();
        let ctx = RenderContext::new(out.path());
        let animation = pipeline
            .render_animation(&derived, &ctx)
            .unwrap()
            .expect("12 rows animate");

        assert_eq!(animation.frame_count, 2);
        assert_eq!(animation.status, AnimationStatus::Complete);
        assert!(animation.gif.exists());
    }

    #[test]
    fn test_short_input_yields_no_artifact() {
        let out = tempfile::tempdir().unwrap();
        let pipeline = RelaPipeline::default();
        let derived = pipeline.derive_csv(&csv_rows(4)[..]).unwrap();
        let ctx = RenderContext::new(out.path());
        assert!(pipeline.render_animation(&derived, &ctx).unwrap().is_none());
    }
}
