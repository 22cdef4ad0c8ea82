//! Database identifier resolution.
//!
//! Accepts either a bare file path or an SQLAlchemy-style URL
//! (`sqlite:///relative.db`, `sqlite:////abs/path.db`, `sqlite://`).
//!
//! # Invariants
//! - A bare path is prefixed with `sqlite:///`.
//! - Only the `sqlite` driver (optionally `sqlite+<dbapi>`) is accepted.

use super::{DbError, DbResult};
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

const DEFAULT_SCHEME_PREFIX: &str = "sqlite:///";
const SQLITE_DRIVER: &str = "sqlite";

static DRIVER_PREFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<scheme>[A-Za-z][A-Za-z0-9+.\-]*)://(?P<rest>.*)$")
        .expect("driver prefix pattern is valid")
});

/// Where a resolved URL points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DbTarget {
    File(PathBuf),
    Memory,
}

/// Resolved database URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseUrl {
    url: String,
    target: DbTarget,
}

impl DatabaseUrl {
    /// Resolves a database name or URL.
    ///
    /// # Errors
    /// - `UnsupportedDriver` when the URL names a driver other than sqlite.
    pub fn parse(name: &str) -> DbResult<Self> {
        let name = name.trim();
        let Some(caps) = DRIVER_PREFIX.captures(name) else {
            return Ok(Self {
                url: format!("{DEFAULT_SCHEME_PREFIX}{name}"),
                target: target_for_path(name),
            });
        };

        let scheme = caps["scheme"].to_ascii_lowercase();
        let driver = scheme.split('+').next().unwrap_or_default();
        if driver != SQLITE_DRIVER {
            return Err(DbError::UnsupportedDriver(scheme));
        }

        // sqlalchemy puts connect arguments after `?`; none apply here.
        let rest = caps["rest"].split('?').next().unwrap_or_default();
        let path = rest.strip_prefix('/').unwrap_or(rest);

        Ok(Self {
            url: name.to_string(),
            target: target_for_path(path),
        })
    }

    /// Builds the URL for a file path, always treating it as a path.
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        Self {
            url: format!("{DEFAULT_SCHEME_PREFIX}{}", path.display()),
            target: DbTarget::File(path.to_path_buf()),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.url
    }

    pub fn target(&self) -> &DbTarget {
        &self.target
    }
}

fn target_for_path(path: &str) -> DbTarget {
    if path.is_empty() || path == ":memory:" {
        DbTarget::Memory
    } else {
        DbTarget::File(PathBuf::from(path))
    }
}

impl Display for DatabaseUrl {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.url)
    }
}
