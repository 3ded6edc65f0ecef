//! Signal derivation over observation tables.
//!
//! The deriver is the only component that touches raw input cells. Missing
//! structure (a required column absent) fails the whole table immediately;
//! malformed individual cells never do. They fall back to documented
//! defaults — `0.0` voltage, [`DEFAULT_PHASE`](crate::modulus::DEFAULT_PHASE)
//! modulus — and are reported as warnings alongside the augmented table.

use rela_core::{
    PhaseModulus, Result, Table, Value, CURRENT_COLUMN, DISTANCE_COLUMN, LABEL_COLUMN,
    MODULUS_COLUMN, VOLTAGE_COLUMN,
};
use serde::{Deserialize, Serialize};

use crate::current::semantic_current;
use crate::modulus::{assign_modulus, DEFAULT_PHASE};
use crate::voltage::VoltageCurve;

/// A recovered per-row input problem.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowWarning {
    /// Zero-based row index.
    pub row: usize,

    /// Column the fallback applied to.
    pub column: String,

    pub message: String,
}

/// Augmented table plus the warnings collected while deriving it.
#[derive(Debug, Clone)]
pub struct Derived {
    pub table: Table,
    pub warnings: Vec<RowWarning>,
}

/// Derives voltage, modulus phase, and semantic current from an observation
/// table, in row order.
///
/// Re-running on the same input yields bit-identical output: derivation is a
/// pure function of the table's content and order.
#[derive(Debug, Clone, Default)]
pub struct SignalDeriver {
    curve: VoltageCurve,
}

impl SignalDeriver {
    pub fn new(curve: VoltageCurve) -> Self {
        Self { curve }
    }

    pub fn curve(&self) -> &VoltageCurve {
        &self.curve
    }

    /// Derive the three signals and append them as columns, in order:
    /// `voltage`, `modulus`, `semantic_current`. Original columns pass
    /// through untouched and row order is preserved.
    ///
    /// Fails only on missing structure: absence of `distance` or `label`
    /// returns [`rela_core::Error::MissingColumn`] and no output is
    /// produced. Degenerate values (zero distances, empty labels) are not
    /// errors.
    pub fn derive(&self, table: &Table) -> Result<Derived> {
        let distance_col = table.require_column(DISTANCE_COLUMN)?;
        let label_col = table.require_column(LABEL_COLUMN)?;

        let mut warnings = Vec::new();
        let mut voltages: Vec<f64> = Vec::with_capacity(table.len());
        let mut moduli: Vec<PhaseModulus> = Vec::with_capacity(table.len());

        for (i, row) in table.rows().iter().enumerate() {
            voltages.push(self.row_voltage(i, &row[distance_col], &mut warnings));
            moduli.push(self.row_modulus(i, &row[label_col], &mut warnings));
        }

        let current = semantic_current(&voltages);

        let mut augmented = table.clone();
        augmented.push_column(VOLTAGE_COLUMN, voltages.into_iter().map(Value::Float).collect())?;
        augmented.push_column(MODULUS_COLUMN, moduli.into_iter().map(Value::Int).collect())?;
        augmented.push_column(CURRENT_COLUMN, current.into_iter().map(Value::Float).collect())?;

        Ok(Derived {
            table: augmented,
            warnings,
        })
    }

    fn row_voltage(&self, row: usize, cell: &Value, warnings: &mut Vec<RowWarning>) -> f64 {
        match cell.as_f64() {
            Some(d) if d.is_finite() && d >= 0.0 => self.curve.voltage(d),
            _ => {
                tracing::warn!(row, "unusable distance value, voltage falls back to 0");
                warnings.push(RowWarning {
                    row,
                    column: DISTANCE_COLUMN.to_string(),
                    message: format!("unusable distance {cell:?}, voltage falls back to 0"),
                });
                0.0
            }
        }
    }

    fn row_modulus(
        &self,
        row: usize,
        cell: &Value,
        warnings: &mut Vec<RowWarning>,
    ) -> PhaseModulus {
        match cell.as_text() {
            Some(label) => assign_modulus(label),
            None => {
                tracing::warn!(row, "non-text label, modulus falls back to default");
                warnings.push(RowWarning {
                    row,
                    column: LABEL_COLUMN.to_string(),
                    message: format!("non-text label {cell:?}, modulus falls back to default"),
                });
                DEFAULT_PHASE
            }
        }
    }
}
