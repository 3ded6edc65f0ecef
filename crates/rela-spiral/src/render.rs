//! Spiral rendering: static plots and animated frame runs.
//!
//! An animated run walks the fixed state sequence
//! `Idle → DerivingFrames → Assembling → Done`. Every frame is rasterized
//! independently from a strictly growing prefix of the shared trace and is
//! immutable once written; assembly concatenates whatever frames exist in
//! sequence order.

use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use plotters::prelude::*;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use rela_core::{Error, Result, PhaseModulus, SpiralPoint, Table};

use crate::assemble::{assemble_gif, assemble_video};
use crate::colormap::{ColorScale, PhaseLegend};
use crate::coords::{SpiralTrace, TraceBounds};
use crate::frames::{prefix_lengths, FrameDir};

/// Spiral projection mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Projection {
    /// Scatter on the x/y plane only.
    Flat,

    /// Helix with semantic current on the depth axis. The default: the
    /// extra revolutions plus depth keep overlapping loops apart.
    #[default]
    Helical,
}

/// What to do when a single frame fails to rasterize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FrameErrorPolicy {
    /// Abort the whole run on the first failed frame. The default.
    #[default]
    Abort,

    /// Skip the frame and keep going. Skips are recorded in the result and
    /// the run is marked incomplete, never silently treated as whole.
    Skip,
}

/// Render phase, for progress logs and diagnosing where a run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderPhase {
    Idle,
    DerivingFrames,
    Assembling,
    Done,
}

/// Renderer configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Spiral revolutions over the whole table.
    pub sweep_turns: f64,

    /// Prefix length of the first animation frame.
    pub frame_start: usize,

    /// Prefix growth per frame.
    pub frame_stride: usize,

    /// Animation playback rate, frames per second.
    pub playback_fps: f64,

    pub color_scale: ColorScale,
    pub projection: Projection,

    /// Raster size in pixels.
    pub width: u32,
    pub height: u32,

    pub frame_error_policy: FrameErrorPolicy,

    /// Rasterize frames across worker threads. Frames are independent given
    /// the shared trace; sequence-indexed file names fix assembly order
    /// regardless of completion order.
    pub parallel: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            sweep_turns: 4.0,
            frame_start: 10,
            frame_stride: 5,
            playback_fps: 10.0,
            color_scale: ColorScale::default(),
            projection: Projection::default(),
            width: 800,
            height: 600,
            frame_error_policy: FrameErrorPolicy::default(),
            parallel: false,
        }
    }
}

impl RenderConfig {
    /// Flat preset: fewer revolutions, since there is no depth axis to
    /// separate overlapping loops.
    pub fn flat() -> Self {
        Self {
            sweep_turns: 2.0,
            projection: Projection::Flat,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.sweep_turns > 0.0) {
            return Err(Error::Config(format!("sweep_turns must be positive, got {}", self.sweep_turns)));
        }
        if self.frame_start < 1 || self.frame_stride < 1 {
            return Err(Error::Config(format!(
                "frame cadence must be at least 1, got start={} stride={}",
                self.frame_start, self.frame_stride
            )));
        }
        if !(self.playback_fps > 0.0) {
            return Err(Error::Config(format!("playback_fps must be positive, got {}", self.playback_fps)));
        }
        if self.width == 0 || self.height == 0 {
            return Err(Error::Config(format!("raster size must be nonzero, got {}x{}", self.width, self.height)));
        }
        Ok(())
    }
}

/// Where a render run writes, plus its cancellation signal.
///
/// Passed explicitly so the renderer holds no implicit working-directory
/// state between runs.
#[derive(Debug, Clone)]
pub struct RenderContext {
    /// Directory artifacts are written under; created if absent.
    pub output_dir: PathBuf,

    /// Keep the per-run frame directory after assembly. The frame sequence
    /// is part of the animated output contract, so this defaults to `true`;
    /// failed runs are always cleaned up regardless.
    pub keep_frames: bool,

    /// Checked between frames; a cancelled run returns its partial output
    /// explicitly marked incomplete.
    pub cancel: Option<Arc<AtomicBool>>,
}

impl RenderContext {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            keep_frames: true,
            cancel: None,
        }
    }

    pub fn with_keep_frames(mut self, keep: bool) -> Self {
        self.keep_frames = keep;
        self
    }

    pub fn with_cancel(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    fn cancelled(&self) -> bool {
        self.cancel
            .as_ref()
            .map(|flag| flag.load(Ordering::Relaxed))
            .unwrap_or(false)
    }
}

/// Completion state of an animated render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnimationStatus {
    Complete,
    /// Some frames failed and were skipped under [`FrameErrorPolicy::Skip`].
    PartialSkipped,
    /// The run was cancelled between frames.
    Cancelled,
}

/// Result of a static render.
#[derive(Debug, Clone)]
pub struct StaticRender {
    pub image: PathBuf,
    pub legend: PhaseLegend,
}

/// Result of an animated render, also persisted as `render_report.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Animation {
    pub gif: PathBuf,

    /// Best-effort secondary artifact; `None` when the encoder was
    /// unavailable or failed.
    pub video: Option<PathBuf>,

    /// Directory of the ordered frame rasters, when kept.
    pub frames_dir: Option<PathBuf>,

    pub frame_count: usize,

    /// Sequence indices skipped under [`FrameErrorPolicy::Skip`].
    pub skipped_frames: Vec<usize>,

    pub status: AnimationStatus,
    pub legend: PhaseLegend,
    pub completed_at: DateTime<Utc>,
}

impl Animation {
    pub fn is_complete(&self) -> bool {
        matches!(self.status, AnimationStatus::Complete)
    }
}

/// Maps an augmented table onto spiral coordinates and produces a static
/// plot or an animated frame sequence plus assembled artifacts.
#[derive(Debug, Clone)]
pub struct SpiralRenderer {
    config: RenderConfig,
}

impl SpiralRenderer {
    pub fn new(config: RenderConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Render all rows into one raster and write the legend sidecar next to
    /// it.
    pub fn render_static(&self, table: &Table, ctx: &RenderContext) -> Result<StaticRender> {
        std::fs::create_dir_all(&ctx.output_dir)?;

        let trace = SpiralTrace::from_table(table, self.config.sweep_turns)?;
        let legend = PhaseLegend::from_moduli(trace.moduli(), self.config.color_scale);
        let bounds = trace.bounds();

        let image = ctx.output_dir.join("spiral.png");
        self.rasterize(&trace, trace.len(), &image, &legend, &bounds, 0)?;

        let legend_path = ctx.output_dir.join("spiral_legend.json");
        serde_json::to_writer_pretty(File::create(&legend_path)?, &legend)?;

        tracing::info!(image = %image.display(), rows = trace.len(), "static spiral rendered");
        Ok(StaticRender { image, legend })
    }

    /// Run the animated pipeline.
    ///
    /// Returns `Ok(None)` when fewer than `frame_start` rows are available:
    /// no artifact is produced and that condition is signaled, not an error.
    pub fn render_animation(&self, table: &Table, ctx: &RenderContext) -> Result<Option<Animation>> {
        let trace = SpiralTrace::from_table(table, self.config.sweep_turns)?;
        let legend = PhaseLegend::from_moduli(trace.moduli(), self.config.color_scale);
        let bounds = trace.bounds();

        let prefixes = prefix_lengths(trace.len(), self.config.frame_start, self.config.frame_stride);
        if prefixes.is_empty() {
            tracing::warn!(
                rows = trace.len(),
                frame_start = self.config.frame_start,
                "not enough rows to animate, no artifact produced"
            );
            return Ok(None);
        }

        std::fs::create_dir_all(&ctx.output_dir)?;
        let mut frame_dir = FrameDir::create(ctx.output_dir.join("spiral_frames"))?;

        tracing::debug!(phase = ?RenderPhase::DerivingFrames, frames = prefixes.len(), "rasterizing spiral frames");
        let (written, skipped, cancelled) =
            self.rasterize_frames(&trace, &legend, &bounds, &prefixes, &frame_dir, ctx)?;

        if written.is_empty() {
            tracing::warn!("no frames rasterized, no artifact produced");
            return Ok(None);
        }

        tracing::debug!(phase = ?RenderPhase::Assembling, frames = written.len(), "assembling artifacts");
        let gif = ctx.output_dir.join("spiral_animation.gif");
        assemble_gif(&written, &gif, self.config.playback_fps)?;

        let video_path = ctx.output_dir.join("spiral_animation.mp4");
        let video = match assemble_video(frame_dir.path(), &video_path, self.config.playback_fps) {
            Ok(()) => Some(video_path),
            Err(err) => {
                tracing::warn!(%err, "secondary video artifact skipped");
                None
            }
        };

        let status = if cancelled {
            AnimationStatus::Cancelled
        } else if !skipped.is_empty() {
            AnimationStatus::PartialSkipped
        } else {
            AnimationStatus::Complete
        };

        let frames_dir = if ctx.keep_frames {
            frame_dir.persist();
            Some(frame_dir.path().to_path_buf())
        } else {
            None
        };

        let animation = Animation {
            gif,
            video,
            frames_dir,
            frame_count: written.len(),
            skipped_frames: skipped,
            status,
            legend,
            completed_at: Utc::now(),
        };

        let report_path = ctx.output_dir.join("render_report.json");
        serde_json::to_writer_pretty(File::create(&report_path)?, &animation)?;

        tracing::info!(
            phase = ?RenderPhase::Done,
            frames = animation.frame_count,
            ?status,
            "spiral animation assembled"
        );
        Ok(Some(animation))
    }

    /// Rasterize every planned frame, honoring the cancellation flag and the
    /// frame-error policy. Returns written frame paths in sequence order,
    /// skipped sequence indices, and whether the run was cancelled.
    #[allow(clippy::type_complexity)]
    fn rasterize_frames(
        &self,
        trace: &SpiralTrace,
        legend: &PhaseLegend,
        bounds: &TraceBounds,
        prefixes: &[usize],
        frame_dir: &FrameDir,
        ctx: &RenderContext,
    ) -> Result<(Vec<PathBuf>, Vec<usize>, bool)> {
        let mut written = Vec::new();
        let mut skipped = Vec::new();
        let mut cancelled = false;
        let mut first_error: Option<Error> = None;

        // `None` marks a frame that was never attempted because the run was
        // cancelled; outcome order matches sequence order either way.
        let outcomes: Vec<Option<(usize, Result<PathBuf>)>> = if self.config.parallel {
            prefixes
                .par_iter()
                .enumerate()
                .map(|(index, &len)| {
                    if ctx.cancelled() {
                        return None;
                    }
                    let path = frame_dir.frame_path(index);
                    Some((
                        index,
                        self.rasterize(trace, len, &path, legend, bounds, index).map(|()| path),
                    ))
                })
                .collect()
        } else {
            let mut sequential = Vec::with_capacity(prefixes.len());
            for (index, &len) in prefixes.iter().enumerate() {
                if ctx.cancelled() {
                    sequential.push(None);
                    break;
                }
                let path = frame_dir.frame_path(index);
                let outcome = self.rasterize(trace, len, &path, legend, bounds, index).map(|()| path);
                let failed = outcome.is_err();
                sequential.push(Some((index, outcome)));
                if failed && self.config.frame_error_policy == FrameErrorPolicy::Abort {
                    break;
                }
            }
            sequential
        };

        for outcome in outcomes {
            match outcome {
                None => cancelled = true,
                Some((_, Ok(path))) => written.push(path),
                Some((index, Err(err))) => match self.config.frame_error_policy {
                    FrameErrorPolicy::Abort => {
                        first_error.get_or_insert(err);
                    }
                    FrameErrorPolicy::Skip => {
                        tracing::warn!(frame = index, %err, "skipping failed frame");
                        skipped.push(index);
                    }
                },
            }
        }

        if let Some(err) = first_error {
            // The frame-dir guard cleans up partial output on this path.
            return Err(err);
        }
        if cancelled {
            tracing::warn!(frames_done = written.len(), "render cancelled, partial output marked incomplete");
        }
        Ok((written, skipped, cancelled))
    }

    fn rasterize(
        &self,
        trace: &SpiralTrace,
        prefix: usize,
        path: &Path,
        legend: &PhaseLegend,
        bounds: &TraceBounds,
        frame_index: usize,
    ) -> Result<()> {
        let (points, moduli) = trace.prefix(prefix);
        let size = (self.config.width, self.config.height);
        let drawn = match self.config.projection {
            Projection::Helical => draw_helical(points, moduli, legend, bounds, path, size),
            Projection::Flat => draw_flat(points, moduli, legend, bounds, path, size),
        };
        drawn.map_err(|e| Error::Render {
            frame_index,
            message: e.to_string(),
        })
    }
}

type DrawResult = std::result::Result<(), Box<dyn std::error::Error>>;

const TRAIL: RGBAColor = RGBAColor(50, 50, 200, 0.3);

fn draw_helical(
    points: &[SpiralPoint],
    moduli: &[PhaseModulus],
    legend: &PhaseLegend,
    bounds: &TraceBounds,
    path: &Path,
    (width, height): (u32, u32),
) -> DrawResult {
    let root = BitMapBackend::new(path, (width, height)).into_drawing_area();
    root.fill(&WHITE)?;

    // Vertical chart axis carries the semantic current.
    let mut chart = ChartBuilder::on(&root).margin(12).build_cartesian_3d(
        bounds.x.0..bounds.x.1,
        bounds.z.0..bounds.z.1,
        bounds.y.0..bounds.y.1,
    )?;

    chart.draw_series(LineSeries::new(
        points.iter().map(|p| (p.x, p.z, p.y)),
        TRAIL.stroke_width(2),
    ))?;
    chart.draw_series(
        points
            .iter()
            .zip(moduli)
            .map(|(p, m)| Circle::new((p.x, p.z, p.y), 4, legend.color_for(*m).filled())),
    )?;

    root.present()?;
    Ok(())
}

fn draw_flat(
    points: &[SpiralPoint],
    moduli: &[PhaseModulus],
    legend: &PhaseLegend,
    bounds: &TraceBounds,
    path: &Path,
    (width, height): (u32, u32),
) -> DrawResult {
    let root = BitMapBackend::new(path, (width, height)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .margin(12)
        .build_cartesian_2d(bounds.x.0..bounds.x.1, bounds.y.0..bounds.y.1)?;

    chart.draw_series(LineSeries::new(
        points.iter().map(|p| (p.x, p.y)),
        TRAIL.stroke_width(2),
    ))?;
    chart.draw_series(
        points
            .iter()
            .zip(moduli)
            .map(|(p, m)| Circle::new((p.x, p.y), 4, legend.color_for(*m).filled())),
    )?;

    root.present()?;
    Ok(())
}
