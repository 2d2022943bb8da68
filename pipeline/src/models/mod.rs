//! Domain models for the population pipeline.
//!
//! - [`Cell`] - One table cell: missing, integer or text
//! - [`Table`] - Header plus rows, the shape shared by raw and cleaned files
//! - [`LongRecord`] - One (label, state) observation after melting
//! - [`StatePopulationRecord`] - One row of the final per-state summary

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

// =============================================================================
// Cell
// =============================================================================

/// A single table cell.
///
/// Loaded files only produce [`Cell::Missing`] and [`Cell::Text`]; cleaning
/// turns numeric columns into [`Cell::Int`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum Cell {
    Missing,
    Int(i64),
    Text(String),
}

impl Cell {
    /// Build a cell from a raw field; empty or blank fields are missing.
    pub fn from_field(field: &str) -> Self {
        if field.trim().is_empty() {
            Cell::Missing
        } else {
            Cell::Text(field.to_string())
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Cell::Missing)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Missing => Ok(()),
            Cell::Int(n) => write!(f, "{}", n),
            Cell::Text(s) => f.write_str(s),
        }
    }
}

// =============================================================================
// Table
// =============================================================================

/// A header row plus data rows. Every row has exactly `columns.len()` cells.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl Table {
    /// Build a table, padding short rows with missing cells and truncating long ones.
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Cell>>) -> Self {
        let width = columns.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, Cell::Missing);
                row
            })
            .collect();
        Self { columns, rows }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    /// `(rows, columns)`
    pub fn shape(&self) -> (usize, usize) {
        (self.rows.len(), self.columns.len())
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn into_parts(self) -> (Vec<String>, Vec<Vec<Cell>>) {
        (self.columns, self.rows)
    }

    /// Rows as JSON objects keyed by column name (missing cells become `null`).
    pub fn to_json_records(&self) -> Vec<Value> {
        self.rows
            .iter()
            .map(|row| {
                let obj: Map<String, Value> = self
                    .columns
                    .iter()
                    .zip(row)
                    .map(|(col, cell)| {
                        (col.clone(), serde_json::to_value(cell).unwrap_or(Value::Null))
                    })
                    .collect();
                Value::Object(obj)
            })
            .collect()
    }
}

// =============================================================================
// Long / summary records
// =============================================================================

/// One observation produced by melting a wide table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LongRecord {
    pub label: String,
    pub state: String,
    pub state_population: i64,
}

/// One row of the final per-state summary.
///
/// Serialized field names are the output file header.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatePopulationRecord {
    pub state: String,
    pub state_population: i64,
    /// Same value on every row of one summary.
    pub us_avg_population: i64,
    /// `None` when the average is zero.
    #[serde(rename = "PercentDiffFromUSAvg")]
    pub percent_diff_from_us_avg: Option<f64>,
    /// 1 = most populous.
    #[serde(rename = "Population_Rank")]
    pub population_rank: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_field() {
        assert_eq!(Cell::from_field(""), Cell::Missing);
        assert_eq!(Cell::from_field("   "), Cell::Missing);
        assert_eq!(Cell::from_field("1,234"), Cell::Text("1,234".into()));
    }

    #[test]
    fn test_cell_display() {
        assert_eq!(Cell::Missing.to_string(), "");
        assert_eq!(Cell::Int(-42).to_string(), "-42");
        assert_eq!(Cell::Text("Total".into()).to_string(), "Total");
    }

    #[test]
    fn test_table_pads_and_truncates_rows() {
        let table = Table::new(
            vec!["a".into(), "b".into()],
            vec![
                vec![Cell::Int(1)],
                vec![Cell::Int(1), Cell::Int(2), Cell::Int(3)],
            ],
        );
        assert_eq!(table.shape(), (2, 2));
        assert_eq!(table.rows()[0], vec![Cell::Int(1), Cell::Missing]);
        assert_eq!(table.rows()[1], vec![Cell::Int(1), Cell::Int(2)]);
    }

    #[test]
    fn test_to_json_records() {
        let table = Table::new(
            vec!["label".into(), "texas".into(), "ohio".into()],
            vec![vec![Cell::Text("Total".into()), Cell::Int(5), Cell::Missing]],
        );
        let records = table.to_json_records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["label"], "Total");
        assert_eq!(records[0]["texas"], 5);
        assert!(records[0]["ohio"].is_null());
    }
}
