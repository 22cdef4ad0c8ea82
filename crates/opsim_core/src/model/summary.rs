//! Pointing-summary table indexed by observation id.
//!
//! # Responsibility
//! - Turn a raw `Summary` table into an `obsHistID`-indexed table.
//! - Deduplicate observations when requested.
//!
//! # Invariants
//! - `index.len() == rows.len()`.
//! - The index column is removed from `columns`.
//! - When built with dedup, every observation id appears once; the first
//!   occurrence wins and source order is kept.

use crate::db::{DbError, DbResult};
use crate::model::table::{integer_cell, Table};
use crate::model::value::Value;
use std::collections::hash_map::Entry;
use std::collections::HashMap;

/// Column holding the unique observation identifier.
pub const OBS_HIST_ID_COLUMN: &str = "obsHistID";
/// Foreign key into the `Proposal` table.
pub const PROP_ID_COLUMN: &str = "PROPID";

/// Summary rows keyed by `obsHistID`.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryTable {
    columns: Vec<String>,
    index: Vec<i64>,
    rows: Vec<Vec<Value>>,
    // first row position for each observation id
    positions: HashMap<i64, usize>,
}

impl SummaryTable {
    /// Indexes `table` by `obsHistID`, optionally dropping duplicate ids.
    ///
    /// # Errors
    /// - `MissingColumn` when the table has no `obsHistID` column.
    /// - `InvalidValue` when an observation id is not an integer.
    pub fn from_table(table: Table, deduplicate: bool) -> DbResult<Self> {
        let key_idx = table.require_column(OBS_HIST_ID_COLUMN)?;
        let Table {
            name,
            mut columns,
            rows: raw_rows,
        } = table;
        columns.remove(key_idx);

        let mut index = Vec::with_capacity(raw_rows.len());
        let mut rows = Vec::with_capacity(raw_rows.len());
        let mut positions = HashMap::with_capacity(raw_rows.len());

        for mut row in raw_rows {
            let obs_hist_id = integer_cell(&name, OBS_HIST_ID_COLUMN, &row[key_idx])?;
            match positions.entry(obs_hist_id) {
                Entry::Occupied(_) if deduplicate => continue,
                Entry::Occupied(_) => {}
                Entry::Vacant(slot) => {
                    slot.insert(rows.len());
                }
            }
            row.remove(key_idx);
            index.push(obs_hist_id);
            rows.push(row);
        }

        Ok(Self {
            columns,
            index,
            rows,
            positions,
        })
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Observation ids in row order.
    pub fn index(&self) -> &[i64] {
        &self.index
    }

    /// Data column names, excluding the index.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    /// Returns whether every observation id occurs exactly once.
    pub fn is_unique(&self) -> bool {
        self.positions.len() == self.index.len()
    }

    /// Returns the first row for `obs_hist_id`.
    pub fn get(&self, obs_hist_id: i64) -> Option<&[Value]> {
        self.positions
            .get(&obs_hist_id)
            .map(|&pos| self.rows[pos].as_slice())
    }

    /// Returns a single cell by observation id and column name.
    pub fn value(&self, obs_hist_id: i64, column: &str) -> Option<&Value> {
        let idx = self.column_index(column)?;
        self.get(obs_hist_id).map(|row| &row[idx])
    }

    pub fn column_index(&self, column: &str) -> Option<usize> {
        self.columns
            .iter()
            .position(|name| name.eq_ignore_ascii_case(column))
    }

    /// Flattens back into a plain `Summary` table with `obsHistID` as the
    /// first column.
    pub fn to_table(&self) -> Table {
        let mut columns = Vec::with_capacity(self.columns.len() + 1);
        columns.push(OBS_HIST_ID_COLUMN.to_string());
        columns.extend(self.columns.iter().cloned());

        let rows = self
            .index
            .iter()
            .zip(&self.rows)
            .map(|(&obs_hist_id, row)| {
                let mut full = Vec::with_capacity(row.len() + 1);
                full.push(Value::Integer(obs_hist_id));
                full.extend(row.iter().cloned());
                full
            })
            .collect();

        Table {
            name: "Summary".to_string(),
            columns,
            rows,
        }
    }

    /// Reads one data column as integers, in row order.
    pub fn integer_column(&self, column: &str) -> DbResult<Vec<i64>> {
        let idx = self
            .column_index(column)
            .ok_or_else(|| DbError::MissingColumn {
                table: "Summary".to_string(),
                column: column.to_string(),
            })?;
        self.rows
            .iter()
            .map(|row| integer_cell("Summary", column, &row[idx]))
            .collect()
    }
}
