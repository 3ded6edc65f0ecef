//! # Rela-Spiral
//!
//! Spiral renderer for the RELA field engine: maps an ordered, augmented
//! observation table onto spiral coordinates and produces either one static
//! plot or an animated frame sequence assembled into a GIF (plus a
//! best-effort video).
//!
//! ## Coordinate mapping
//!
//! - angle: row index spread evenly over a configurable number of
//!   revolutions
//! - radius: voltage, so closer objects sit further out
//! - depth (helical projection): semantic current
//! - color: phase modulus through a perceptually-ordered scale, with one
//!   legend shared by every frame of a run
//!
//! ## Frame runs
//!
//! Animated renders walk `Idle → DerivingFrames → Assembling → Done`: each
//! frame covers a strictly growing prefix of rows, is rasterized
//! independently into a scoped frame directory, and is immutable once
//! written. Data flows strictly one way from the deriver's table to the
//! artifacts; the renderer keeps no state between runs.

pub mod assemble;
pub mod colormap;
pub mod coords;
pub mod frames;
pub mod render;

pub use assemble::*;
pub use colormap::*;
pub use coords::*;
pub use frames::*;
pub use render::*;
