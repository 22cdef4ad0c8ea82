//! Query execution into in-memory tables.

use super::DbResult;
use crate::model::table::Table;
use crate::model::value::Value;
use rusqlite::{Connection, Params};

/// Runs `sql` and collects every result row into a [`Table`] named `name`.
///
/// Column names come from the statement, so `SELECT *` keeps the source
/// schema and column order.
pub fn query_table<P: Params>(
    conn: &Connection,
    name: &str,
    sql: &str,
    params: P,
) -> DbResult<Table> {
    let mut stmt = conn.prepare(sql)?;
    let columns = stmt
        .column_names()
        .into_iter()
        .map(str::to_string)
        .collect::<Vec<_>>();
    let width = columns.len();
    let mut table = Table::new(name, columns);

    let mut rows = stmt.query(params)?;
    while let Some(row) = rows.next()? {
        let mut cells = Vec::with_capacity(width);
        for idx in 0..width {
            cells.push(Value::from(row.get_ref(idx)?));
        }
        table.rows.push(cells);
    }

    Ok(table)
}

/// Reads a whole table in storage order.
pub fn read_table(conn: &Connection, name: &str) -> DbResult<Table> {
    let sql = format!("SELECT * FROM \"{}\"", name.replace('"', "\"\""));
    query_table(conn, name, &sql, [])
}
