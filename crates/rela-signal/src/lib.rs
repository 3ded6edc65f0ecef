//! # Rela-Signal
//!
//! Signal deriver for the RELA field engine: converts raw distance/label
//! observations into the three derived signals the spiral renderer consumes.
//!
//! ## Signals
//!
//! 1. **Voltage**: `scale / (distance + ε)` — a proxy for closeness of the
//!    observed object; radius grows as objects approach.
//! 2. **Modulus**: integer phase constant matched from the label against a
//!    fixed ordered keyword table.
//! 3. **Semantic current**: first difference of voltage across consecutive
//!    rows — a proxy for rate-of-change of closeness.
//!
//! The deriver is pure and stateless: given the same table, it produces the
//! same augmented table, bit for bit. Per-row input problems are recovered
//! via documented fallbacks and surfaced as warnings, never as errors; only
//! missing structure (a required column absent) fails a table.

pub mod current;
pub mod deriver;
pub mod modulus;
pub mod summary;
pub mod voltage;

pub use current::*;
pub use deriver::*;
pub use modulus::*;
pub use summary::*;
pub use voltage::*;
