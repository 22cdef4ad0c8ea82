//! Sources of OpSim tables.
//!
//! # Responsibility
//! - Define the read contract the loader depends on.
//! - Keep SQL and snapshot details out of subset/classification logic.
//!
//! # Invariants
//! - `read_summary` returns raw rows: no deduplication, no indexing.
//! - `SummaryFilter::ProposalIn` keeps exactly the rows whose `PROPID` is
//!   listed, for every source.

use crate::db::DbResult;
use crate::model::subset::SummaryFilter;
use crate::model::table::Table;

pub mod snapshot;
pub mod sqlite_source;

/// Read access to the `Proposal` and `Summary` tables of one OpSim run.
pub trait OpSimSource {
    /// Human-readable source name for diagnostics.
    fn describe(&self) -> String;
    fn read_proposals(&self) -> DbResult<Table>;
    fn read_summary(&self, filter: &SummaryFilter) -> DbResult<Table>;
}
