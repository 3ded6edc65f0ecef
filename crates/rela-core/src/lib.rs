//! # Rela-Core
//!
//! Core types and utilities for the RELA (Recursive Entangled Logic
//! Analytics) field engine: the in-memory observation table, the spiral
//! point geometry, and the error taxonomy shared by the signal deriver and
//! the spiral renderer.

pub mod error;
pub mod table;
pub mod types;

pub use error::{Error, Result};
pub use table::*;
pub use types::*;
