//! Data access for OpSim survey-simulation output.
//! Loads pointing summaries from OpSim SQLite databases or JSON snapshots,
//! filtered to the WFD/DDF proposal subsets.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use db::{DatabaseUrl, DbError, DbResult};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::proposal::{ProposalCategory, ProposalIds, ProposalRow};
pub use model::subset::{FileFormat, SelectionError, Subset};
pub use model::summary::SummaryTable;
pub use model::table::Table;
pub use model::value::Value;
pub use repo::snapshot::Snapshot;
pub use repo::sqlite_source::SqliteOpSimSource;
pub use repo::OpSimSource;
pub use service::classifier::{classify_proposals, ClassifyError};
pub use service::loader::{opsim_output_from_file, LoadError, LoadResult, OpSimOutput};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
