//! Aggregate statistics over a derived table.

use serde::{Deserialize, Serialize};

use rela_core::{Result, Table, CURRENT_COLUMN, MODULUS_COLUMN, VOLTAGE_COLUMN};

/// Statistical summary of a derived field table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldSummary {
    pub rows: usize,

    /// Mean voltage across all rows.
    pub mean_voltage: f64,

    /// Largest semantic-current swing (signed; the most positive ΔV).
    pub peak_current: f64,

    /// Number of distinct phase moduli present.
    pub phase_count: usize,
}

impl FieldSummary {
    /// Summarize a table carrying the three derived columns.
    pub fn from_table(table: &Table) -> Result<Self> {
        let voltage = numeric(table, VOLTAGE_COLUMN)?;
        let current = numeric(table, CURRENT_COLUMN)?;
        let modulus = numeric(table, MODULUS_COLUMN)?;

        if voltage.is_empty() {
            return Ok(Self::default());
        }

        let mean_voltage = voltage.iter().sum::<f64>() / voltage.len() as f64;
        let peak_current = current.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        let mut phases: Vec<i64> = modulus.iter().map(|m| *m as i64).collect();
        phases.sort_unstable();
        phases.dedup();

        Ok(Self {
            rows: voltage.len(),
            mean_voltage,
            peak_current,
            phase_count: phases.len(),
        })
    }
}

fn numeric(table: &Table, name: &str) -> Result<Vec<f64>> {
    let col = table.require_column(name)?;
    Ok(table
        .rows()
        .iter()
        .map(|row| row[col].as_f64().unwrap_or(0.0))
        .collect())
}
