//! In-memory tabular data read from an OpSim source.
//!
//! # Responsibility
//! - Hold one table as ordered column names plus ordered rows.
//! - Provide the column lookups needed by classification and filtering.
//!
//! # Invariants
//! - Every row has exactly `columns.len()` cells.
//! - Row order is the order the source returned them in.

use crate::db::{DbError, DbResult};
use crate::model::value::Value;
use serde::{Deserialize, Serialize};

/// Named table with positional rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    pub name: String,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

impl Table {
    pub fn new(name: impl Into<String>, columns: Vec<String>) -> Self {
        Self {
            name: name.into(),
            columns,
            rows: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Appends a row, rejecting width mismatches.
    pub fn push_row(&mut self, row: Vec<Value>) -> DbResult<()> {
        if row.len() != self.columns.len() {
            return Err(DbError::RowWidth {
                table: self.name.clone(),
                expected: self.columns.len(),
                found: row.len(),
            });
        }
        self.rows.push(row);
        Ok(())
    }

    /// Finds a column position, matching names case-insensitively like SQLite.
    pub fn column_index(&self, column: &str) -> Option<usize> {
        self.columns
            .iter()
            .position(|name| name == column)
            .or_else(|| {
                self.columns
                    .iter()
                    .position(|name| name.eq_ignore_ascii_case(column))
            })
    }

    /// Like [`Table::column_index`], but a missing column is a data-source fault.
    pub fn require_column(&self, column: &str) -> DbResult<usize> {
        self.column_index(column)
            .ok_or_else(|| DbError::MissingColumn {
                table: self.name.clone(),
                column: column.to_string(),
            })
    }

    /// Reads one column as integers.
    ///
    /// # Errors
    /// - `MissingColumn` when the column does not exist.
    /// - `InvalidValue` when any cell is not an integer.
    pub fn integer_column(&self, column: &str) -> DbResult<Vec<i64>> {
        let idx = self.require_column(column)?;
        self.rows
            .iter()
            .map(|row| integer_cell(&self.name, column, &row[idx]))
            .collect()
    }

    /// Keeps only rows whose `column` value equals one of `ids`.
    ///
    /// Matching follows SQLite's `IN` comparison: integers match by value,
    /// reals match when they equal an id numerically, and null, text or
    /// blob cells never match.
    ///
    /// # Errors
    /// - `MissingColumn` when the column does not exist.
    pub fn retain_integer_in(&mut self, column: &str, ids: &[i64]) -> DbResult<()> {
        let idx = self.require_column(column)?;
        self.rows.retain(|row| matches_any_id(&row[idx], ids));
        Ok(())
    }
}

fn matches_any_id(value: &Value, ids: &[i64]) -> bool {
    match value {
        Value::Integer(v) => ids.contains(v),
        Value::Real(r) => ids.iter().any(|&id| id as f64 == *r),
        Value::Null | Value::Text(_) | Value::Blob(_) => false,
    }
}

pub(crate) fn integer_cell(table: &str, column: &str, value: &Value) -> DbResult<i64> {
    value.as_integer().ok_or_else(|| DbError::InvalidValue {
        table: table.to_string(),
        column: column.to_string(),
        message: format!("expected integer, found {}", value.kind()),
    })
}
