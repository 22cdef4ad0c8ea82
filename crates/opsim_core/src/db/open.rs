//! Connection bootstrap for OpSim databases.
//!
//! # Responsibility
//! - Open the SQLite target named by a [`DatabaseUrl`].
//! - Configure the connection for read-only use.
//!
//! # Invariants
//! - File databases are opened read-only and never created.
//! - Returned connections have `query_only=ON`.

use super::url::{DatabaseUrl, DbTarget};
use super::DbResult;
use log::{error, info};
use rusqlite::{Connection, OpenFlags};
use std::time::{Duration, Instant};

/// Opens the database behind `url` for reading.
///
/// # Side effects
/// - Emits `db_open` logging events with duration and status.
pub fn open_source(url: &DatabaseUrl) -> DbResult<Connection> {
    let started_at = Instant::now();
    let mode = match url.target() {
        DbTarget::File(_) => "file",
        DbTarget::Memory => "memory",
    };
    info!("event=db_open module=db status=start mode={mode}");

    let opened = match url.target() {
        DbTarget::File(path) => Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        ),
        DbTarget::Memory => Connection::open_in_memory(),
    };
    let conn = match opened {
        Ok(conn) => conn,
        Err(err) => {
            error!(
                "event=db_open module=db status=error mode={mode} duration_ms={} error_code=db_open_failed error={}",
                started_at.elapsed().as_millis(),
                err
            );
            return Err(err.into());
        }
    };

    match configure_connection(&conn) {
        Ok(()) => {
            info!(
                "event=db_open module=db status=ok mode={mode} duration_ms={}",
                started_at.elapsed().as_millis()
            );
            Ok(conn)
        }
        Err(err) => {
            error!(
                "event=db_open module=db status=error mode={mode} duration_ms={} error_code=db_configure_failed error={}",
                started_at.elapsed().as_millis(),
                err
            );
            Err(err)
        }
    }
}

fn configure_connection(conn: &Connection) -> DbResult<()> {
    conn.execute_batch("PRAGMA query_only = ON;")?;
    conn.busy_timeout(Duration::from_secs(5))?;
    Ok(())
}
