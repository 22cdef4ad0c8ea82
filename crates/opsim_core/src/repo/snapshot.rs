//! JSON snapshots of an OpSim run.
//!
//! # Responsibility
//! - Capture the raw `Proposal` and `Summary` tables once (the `_all`
//!   staging read) and persist them to a single file.
//! - Serve every subset back from that file without the database.
//!
//! # Invariants
//! - The stored summary is never deduplicated, so any subset can be rebuilt.
//! - A snapshot with mismatched row widths or an unknown version is rejected
//!   on read.

use super::OpSimSource;
use crate::db::{DbError, DbResult};
use crate::model::subset::SummaryFilter;
use crate::model::summary::PROP_ID_COLUMN;
use crate::model::table::Table;
use log::info;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

const SNAPSHOT_VERSION: u32 = 1;

/// Serialized copy of the tables an OpSim load reads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub version: u32,
    /// Description of the source the tables were captured from.
    pub source: String,
    pub proposals: Table,
    pub summary: Table,
}

impl Snapshot {
    /// Reads the full proposal and summary tables from `source`.
    pub fn capture(source: &dyn OpSimSource) -> DbResult<Self> {
        let proposals = source.read_proposals()?;
        let summary = source.read_summary(&SummaryFilter::All)?;
        info!(
            "event=snapshot_capture module=repo status=ok proposals={} summary_rows={}",
            proposals.len(),
            summary.len()
        );
        Ok(Self {
            version: SNAPSHOT_VERSION,
            source: source.describe(),
            proposals,
            summary,
        })
    }

    pub fn write(&self, path: impl AsRef<Path>) -> DbResult<()> {
        let path = path.as_ref();
        let mut writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer(&mut writer, self)?;
        writer.flush()?;
        info!(
            "event=snapshot_write module=repo status=ok path={}",
            path.display()
        );
        Ok(())
    }

    pub fn read(path: impl AsRef<Path>) -> DbResult<Self> {
        let reader = BufReader::new(File::open(path.as_ref())?);
        let snapshot: Self = serde_json::from_reader(reader)?;
        snapshot.validate()?;
        Ok(snapshot)
    }

    fn validate(&self) -> DbResult<()> {
        if self.version != SNAPSHOT_VERSION {
            return Err(DbError::InvalidValue {
                table: "snapshot".to_string(),
                column: "version".to_string(),
                message: format!(
                    "unsupported snapshot version {}; expected {SNAPSHOT_VERSION}",
                    self.version
                ),
            });
        }
        for table in [&self.proposals, &self.summary] {
            if let Some(row) = table.rows.iter().find(|row| row.len() != table.columns.len()) {
                return Err(DbError::RowWidth {
                    table: table.name.clone(),
                    expected: table.columns.len(),
                    found: row.len(),
                });
            }
        }
        Ok(())
    }
}

impl OpSimSource for Snapshot {
    fn describe(&self) -> String {
        format!("snapshot of {}", self.source)
    }

    fn read_proposals(&self) -> DbResult<Table> {
        Ok(self.proposals.clone())
    }

    fn read_summary(&self, filter: &SummaryFilter) -> DbResult<Table> {
        let mut summary = self.summary.clone();
        if let SummaryFilter::ProposalIn(ids) = filter {
            summary.retain_integer_in(PROP_ID_COLUMN, ids)?;
        }
        Ok(summary)
    }
}
