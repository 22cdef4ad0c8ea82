//! SQLite access for OpSim output databases.
//!
//! # Responsibility
//! - Resolve database identifiers into connection targets.
//! - Open read-only connections scoped to a single load.
//! - Read whole tables or filtered queries into [`crate::model::table::Table`].
//!
//! # Invariants
//! - Nothing in this module writes to an OpSim database.
//! - Storage errors propagate unchanged inside [`DbError::Sqlite`].

use std::error::Error;
use std::fmt::{Display, Formatter};

mod open;
pub mod read;
pub mod url;

pub use open::open_source;
pub use url::{DatabaseUrl, DbTarget};

pub type DbResult<T> = Result<T, DbError>;

/// Data-source fault: connection, schema or decoding failure.
#[derive(Debug)]
pub enum DbError {
    Sqlite(rusqlite::Error),
    UnsupportedDriver(String),
    MissingColumn {
        table: String,
        column: String,
    },
    InvalidValue {
        table: String,
        column: String,
        message: String,
    },
    RowWidth {
        table: String,
        expected: usize,
        found: usize,
    },
    Io(std::io::Error),
    Snapshot(serde_json::Error),
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::UnsupportedDriver(driver) => {
                write!(f, "database driver `{driver}` is not supported; expected sqlite")
            }
            Self::MissingColumn { table, column } => {
                write!(f, "table `{table}` has no column `{column}`")
            }
            Self::InvalidValue {
                table,
                column,
                message,
            } => write!(f, "invalid value in {table}.{column}: {message}"),
            Self::RowWidth {
                table,
                expected,
                found,
            } => write!(
                f,
                "row in `{table}` has {found} cells but the table has {expected} columns"
            ),
            Self::Io(err) => write!(f, "{err}"),
            Self::Snapshot(err) => write!(f, "invalid snapshot: {err}"),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::Io(err) => Some(err),
            Self::Snapshot(err) => Some(err),
            Self::UnsupportedDriver(_)
            | Self::MissingColumn { .. }
            | Self::InvalidValue { .. }
            | Self::RowWidth { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}

impl From<std::io::Error> for DbError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for DbError {
    fn from(value: serde_json::Error) -> Self {
        Self::Snapshot(value)
    }
}
