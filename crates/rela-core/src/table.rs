//! In-memory tabular data for labeled distance observations.
//!
//! The engine works on complete tables, not live streams: a table is decoded
//! once (from CSV or built in memory), augmented by the signal deriver, and
//! handed to the spiral renderer. Columns the engine does not recognize pass
//! through untouched.

use std::fmt;
use std::io::{Read, Write};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A single table cell.
///
/// CSV decoding is permissive: anything that parses as a number becomes
/// numeric, blank cells become `Empty`, everything else stays text. Consumers
/// that need a number use [`Value::as_f64`] and apply their own fallback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Float(f64),
    Int(i64),
    Text(String),
    Empty,
}

impl Value {
    /// Parse a raw CSV field into the closest-fitting value.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Value::Empty;
        }
        if let Ok(i) = trimmed.parse::<i64>() {
            return Value::Int(i);
        }
        if let Ok(f) = trimmed.parse::<f64>() {
            return Value::Float(f);
        }
        Value::Text(trimmed.to_string())
    }

    /// Numeric view of the cell, if it has one.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Text view of the cell, if it has one.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Value::Empty)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Float(v) => write!(f, "{v}"),
            Value::Int(v) => write!(f, "{v}"),
            Value::Text(v) => write!(f, "{v}"),
            Value::Empty => Ok(()),
        }
    }
}

/// Column-ordered, row-major table.
///
/// Row order is significant: the semantic-current signal is a first
/// difference across consecutive rows, so reordering rows changes results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl Table {
    /// Create an empty table with the given column names.
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// Append a row. The row must have exactly one cell per column.
    pub fn push_row(&mut self, row: Vec<Value>) -> Result<()> {
        if row.len() != self.columns.len() {
            return Err(Error::Schema(format!(
                "row has {} cells, table has {} columns",
                row.len(),
                self.columns.len()
            )));
        }
        self.rows.push(row);
        Ok(())
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of a column by name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Position of a column that must exist.
    pub fn require_column(&self, name: &str) -> Result<usize> {
        self.column_index(name).ok_or_else(|| Error::MissingColumn {
            column: name.to_string(),
        })
    }

    /// Cell at (row, column name), if both exist.
    pub fn get(&self, row: usize, column: &str) -> Option<&Value> {
        let col = self.column_index(column)?;
        self.rows.get(row).and_then(|r| r.get(col))
    }

    /// All cells of a named column, in row order.
    pub fn column(&self, name: &str) -> Option<Vec<&Value>> {
        let col = self.column_index(name)?;
        Some(self.rows.iter().map(|r| &r[col]).collect())
    }

    /// Append a derived column. The value vector must cover every row.
    pub fn push_column(&mut self, name: &str, values: Vec<Value>) -> Result<()> {
        if self.column_index(name).is_some() {
            return Err(Error::Schema(format!("column '{name}' already exists")));
        }
        if values.len() != self.rows.len() {
            return Err(Error::Schema(format!(
                "column '{name}' has {} values, table has {} rows",
                values.len(),
                self.rows.len()
            )));
        }
        self.columns.push(name.to_string());
        for (row, value) in self.rows.iter_mut().zip(values) {
            row.push(value);
        }
        Ok(())
    }

    /// Decode a table from CSV. The first record is the header.
    pub fn from_csv<R: Read>(reader: R) -> Result<Self> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let columns: Vec<String> = rdr.headers()?.iter().map(|h| h.to_string()).collect();
        if columns.is_empty() {
            return Err(Error::Csv("input has no header row".into()));
        }

        let mut table = Table::new(columns);
        for record in rdr.records() {
            let record = record?;
            let row: Vec<Value> = record.iter().map(Value::parse).collect();
            table.push_row(row)?;
        }
        Ok(table)
    }

    /// Decode a table from an in-memory CSV byte stream.
    pub fn from_csv_bytes(bytes: &[u8]) -> Result<Self> {
        Self::from_csv(bytes)
    }

    /// Encode the table back to CSV, header first, rows in order.
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<()> {
        let mut wtr = csv::Writer::from_writer(writer);
        wtr.write_record(&self.columns)?;
        for row in &self.rows {
            wtr.write_record(row.iter().map(|v| v.to_string()))?;
        }
        wtr.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_csv() -> &'static [u8] {
        b"distance,label,note\n0.0,Car,first\n9.9,zone,\n"
    }

    #[test]
    fn test_value_parsing() {
        assert_eq!(Value::parse("9.9"), Value::Float(9.9));
        assert_eq!(Value::parse("5000"), Value::Int(5000));
        assert_eq!(Value::parse(" Car "), Value::Text("Car".into()));
        assert_eq!(Value::parse(""), Value::Empty);
        assert_eq!(Value::Int(5000).as_f64(), Some(5000.0));
        assert_eq!(Value::Text("Car".into()).as_f64(), None);
    }

    #[test]
    fn test_csv_decode() {
        let table = Table::from_csv_bytes(sample_csv()).unwrap();
        assert_eq!(table.columns(), ["distance", "label", "note"]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.get(0, "distance"), Some(&Value::Float(0.0)));
        assert_eq!(table.get(1, "label"), Some(&Value::Text("zone".into())));
        assert_eq!(table.get(1, "note"), Some(&Value::Empty));
    }

    #[test]
    fn test_require_column() {
        let table = Table::from_csv_bytes(sample_csv()).unwrap();
        assert!(table.require_column("distance").is_ok());
        let err = table.require_column("voltage").unwrap_err();
        assert!(matches!(
            err,
            crate::Error::MissingColumn { ref column } if column == "voltage"
        ));
    }

    #[test]
    fn test_push_column_arity() {
        let mut table = Table::from_csv_bytes(sample_csv()).unwrap();
        let err = table.push_column("voltage", vec![Value::Float(1.0)]);
        assert!(err.is_err());

        table
            .push_column("voltage", vec![Value::Float(10.0), Value::Float(0.1)])
            .unwrap();
        assert_eq!(table.get(0, "voltage"), Some(&Value::Float(10.0)));
    }

    #[test]
    fn test_duplicate_column_rejected() {
        let mut table = Table::from_csv_bytes(sample_csv()).unwrap();
        let err = table.push_column("label", vec![Value::Empty, Value::Empty]);
        assert!(err.is_err());
    }

    #[test]
    fn test_ragged_row_rejected() {
        let mut table = Table::new(vec!["a".into(), "b".into()]);
        assert!(table.push_row(vec![Value::Int(1)]).is_err());
    }

    #[test]
    fn test_csv_roundtrip_preserves_order() {
        let table = Table::from_csv_bytes(sample_csv()).unwrap();
        let mut out = Vec::new();
        table.write_csv(&mut out).unwrap();
        let again = Table::from_csv_bytes(&out).unwrap();
        assert_eq!(again.columns(), table.columns());
        assert_eq!(again.len(), table.len());
        assert_eq!(again.get(0, "label"), Some(&Value::Text("Car".into())));
    }
}
