//! SQLite-backed OpSim source.

use super::OpSimSource;
use crate::db::read::{query_table, read_table};
use crate::db::DbResult;
use crate::model::proposal::PROPOSAL_TABLE;
use crate::model::subset::SummaryFilter;
use crate::model::summary::PROP_ID_COLUMN;
use crate::model::table::Table;
use rusqlite::types::Value as SqlValue;
use rusqlite::{params_from_iter, Connection};

pub const SUMMARY_TABLE: &str = "Summary";

/// Reads OpSim tables through a borrowed connection.
pub struct SqliteOpSimSource<'conn> {
    conn: &'conn Connection,
    label: String,
}

impl<'conn> SqliteOpSimSource<'conn> {
    pub fn new(conn: &'conn Connection, label: impl Into<String>) -> Self {
        Self {
            conn,
            label: label.into(),
        }
    }
}

impl OpSimSource for SqliteOpSimSource<'_> {
    fn describe(&self) -> String {
        self.label.clone()
    }

    fn read_proposals(&self) -> DbResult<Table> {
        read_table(self.conn, PROPOSAL_TABLE)
    }

    fn read_summary(&self, filter: &SummaryFilter) -> DbResult<Table> {
        match filter {
            SummaryFilter::All => read_table(self.conn, SUMMARY_TABLE),
            SummaryFilter::ProposalIn(ids) => {
                let sql = summary_query(ids.len());
                let bind_values = ids.iter().map(|&id| SqlValue::Integer(id));
                query_table(self.conn, SUMMARY_TABLE, &sql, params_from_iter(bind_values))
            }
        }
    }
}

fn summary_query(id_count: usize) -> String {
    let mut sql = format!("SELECT * FROM {SUMMARY_TABLE} WHERE {PROP_ID_COLUMN}");
    if id_count == 1 {
        sql.push_str(" = ?");
    } else {
        let placeholders = vec!["?"; id_count].join(", ");
        sql.push_str(&format!(" IN ({placeholders})"));
    }
    sql
}
