//! # Rela-Pipeline
//!
//! End-to-end RELA field pipeline: decode an observation table from CSV,
//! derive the voltage / modulus / semantic-current signals, and hand the
//! augmented table to the spiral renderer.
//!
//! The surrounding application (upload widgets, dashboards, download
//! buttons) is an external collaborator: it calls [`RelaPipeline`] with a
//! table and consumes the returned columns and artifacts. Nothing in this
//! crate manages user interaction or owns files beyond the render outputs.

pub mod config;
pub mod pipeline;

pub use config::*;
pub use pipeline::*;
