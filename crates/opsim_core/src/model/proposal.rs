//! Proposal rows and the WFD/DDF category mapping.
//!
//! # Invariants
//! - `ProposalIds` always carries both categories; a partial mapping is
//!   never constructed.

use crate::db::{DbError, DbResult};
use crate::model::table::{integer_cell, Table};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

pub const PROPOSAL_TABLE: &str = "Proposal";
pub const PROPOSAL_ID_COLUMN: &str = "propID";
pub const PROPOSAL_CONF_COLUMN: &str = "propConf";

/// One row of the `Proposal` table, reduced to what classification needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProposalRow {
    pub prop_id: i64,
    /// Path or name of the proposal configuration file.
    pub prop_conf: String,
}

impl ProposalRow {
    pub fn new(prop_id: i64, prop_conf: impl Into<String>) -> Self {
        Self {
            prop_id,
            prop_conf: prop_conf.into(),
        }
    }
}

/// Extracts `(propID, propConf)` pairs from a loaded proposal table.
///
/// # Errors
/// - `MissingColumn` when either column is absent.
/// - `InvalidValue` when `propID` is not an integer or `propConf` is not text.
pub fn proposal_rows(table: &Table) -> DbResult<Vec<ProposalRow>> {
    let id_idx = table.require_column(PROPOSAL_ID_COLUMN)?;
    let conf_idx = table.require_column(PROPOSAL_CONF_COLUMN)?;

    table
        .rows
        .iter()
        .map(|row| {
            let prop_id = integer_cell(&table.name, PROPOSAL_ID_COLUMN, &row[id_idx])?;
            let prop_conf = row[conf_idx]
                .as_text()
                .ok_or_else(|| DbError::InvalidValue {
                    table: table.name.clone(),
                    column: PROPOSAL_CONF_COLUMN.to_string(),
                    message: format!("expected text, found {}", row[conf_idx].kind()),
                })?;
            Ok(ProposalRow::new(prop_id, prop_conf))
        })
        .collect()
}

/// Observing-program categories the loader distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProposalCategory {
    /// Wide-fast-deep main survey.
    Wfd,
    /// Deep-drilling cosmology fields.
    Ddf,
}

impl ProposalCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Wfd => "wfd",
            Self::Ddf => "ddf",
        }
    }
}

impl Display for ProposalCategory {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Proposal ids of the WFD and DDF programs.
///
/// Serializes as `{"wfd": <id>, "ddf": <id>}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProposalIds {
    pub wfd: i64,
    pub ddf: i64,
}

impl ProposalIds {
    pub fn get(&self, category: ProposalCategory) -> i64 {
        match category {
            ProposalCategory::Wfd => self.wfd,
            ProposalCategory::Ddf => self.ddf,
        }
    }
}
