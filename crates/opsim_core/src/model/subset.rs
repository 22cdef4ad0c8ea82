//! Subset and file-format selectors.
//!
//! # Responsibility
//! - Parse user-facing selector names before any data access happens.
//! - Translate a subset into the proposal filter the sources apply.
//!
//! # Invariants
//! - Parsing is case-insensitive and trims surrounding whitespace.
//! - Only `Subset::All` skips observation deduplication.

use crate::model::proposal::ProposalIds;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Rejected selector value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionError {
    UnsupportedSubset(String),
    UnsupportedFormat(String),
}

impl Display for SelectionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnsupportedSubset(name) => write!(
                f,
                "subset `{name}` not implemented; expected one of {}",
                Subset::ALLOWED.join("|")
            ),
            Self::UnsupportedFormat(name) => write!(
                f,
                "file format `{name}` not implemented; expected sqlite|snapshot|ascii"
            ),
        }
    }
}

impl Error for SelectionError {}

/// Named selection over the `Summary` table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Subset {
    /// Every row, duplicates kept. Staging read for building snapshots.
    All,
    /// Every row, one per observation.
    UniqueAll,
    Ddf,
    Wfd,
    /// WFD and DDF rows together.
    #[default]
    Combined,
}

/// Proposal predicate a source applies when reading `Summary`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SummaryFilter {
    /// Read the whole table.
    All,
    /// Keep rows whose `PROPID` is one of these ids.
    ProposalIn(Vec<i64>),
}

impl Subset {
    /// Accepted subset names, in lower case.
    pub const ALLOWED: [&'static str; 5] = ["_all", "ddf", "wfd", "combined", "unique_all"];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::All => "_all",
            Self::UniqueAll => "unique_all",
            Self::Ddf => "ddf",
            Self::Wfd => "wfd",
            Self::Combined => "combined",
        }
    }

    /// Whether loaded rows are reduced to one per `obsHistID`.
    pub fn deduplicates(self) -> bool {
        !matches!(self, Self::All)
    }

    pub fn summary_filter(self, ids: &ProposalIds) -> SummaryFilter {
        match self {
            Self::All | Self::UniqueAll => SummaryFilter::All,
            Self::Ddf => SummaryFilter::ProposalIn(vec![ids.ddf]),
            Self::Wfd => SummaryFilter::ProposalIn(vec![ids.wfd]),
            Self::Combined => SummaryFilter::ProposalIn(vec![ids.wfd, ids.ddf]),
        }
    }
}

impl FromStr for Subset {
    type Err = SelectionError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "_all" => Ok(Self::All),
            "unique_all" => Ok(Self::UniqueAll),
            "ddf" => Ok(Self::Ddf),
            "wfd" => Ok(Self::Wfd),
            "combined" => Ok(Self::Combined),
            _ => Err(SelectionError::UnsupportedSubset(value.to_string())),
        }
    }
}

impl Display for Subset {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Serialized forms an OpSim output can be read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileFormat {
    /// OpSim SQLite database.
    Sqlite,
    /// JSON snapshot written by [`crate::repo::snapshot::Snapshot::write`].
    Snapshot,
    /// Legacy plain-text OpSim output; recognized but not readable.
    Ascii,
}

impl FileFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Sqlite => "sqlite",
            Self::Snapshot => "snapshot",
            Self::Ascii => "ascii",
        }
    }
}

impl FromStr for FileFormat {
    type Err = SelectionError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "sqlite" | "sqlitedb" => Ok(Self::Sqlite),
            "snapshot" | "json" => Ok(Self::Snapshot),
            "ascii" => Ok(Self::Ascii),
            _ => Err(SelectionError::UnsupportedFormat(value.to_string())),
        }
    }
}

impl Display for FileFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
