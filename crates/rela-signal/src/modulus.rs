//! Label to phase-constant mapping for recursive phase logic.
//!
//! The mapping is exposed as data rather than per-call branching so the
//! keyword table can be audited and extended independently of the matcher.

use rela_core::PhaseModulus;

/// Phase for labels matching no keyword.
pub const DEFAULT_PHASE: PhaseModulus = 500;

/// Ordered keyword table. Matching is case-insensitive substring
/// containment, first match wins, so a label containing several keywords
/// resolves deterministically to the earliest entry.
pub const PHASE_TABLE: &[(&str, PhaseModulus)] = &[
    ("crosswalk", 1000),
    ("zone", 100),
    ("car", 5000),
    ("stop", 200),
    ("pedestrian", 500),
];

/// Phase constant for an observation label.
///
/// Pure function of the lower-cased label: identical labels always map to
/// identical moduli, and unmatched labels always return [`DEFAULT_PHASE`].
pub fn assign_modulus(label: &str) -> PhaseModulus {
    let label = label.to_lowercase();
    PHASE_TABLE
        .iter()
        .find(|(keyword, _)| label.contains(*keyword))
        .map(|(_, phase)| *phase)
        .unwrap_or(DEFAULT_PHASE)
}
