//! OpSim summary loading use-cases.
//!
//! # Responsibility
//! - Validate the requested subset before any data access.
//! - Classify proposals, read the matching summary rows and index them.
//! - Package the result as an immutable [`OpSimOutput`].
//!
//! # Invariants
//! - Every load opens its own connection and drops it before returning.
//! - A load returns a complete output or an error, never partial state.
//! - Every subset except `_all` yields one row per `obsHistID`.

use crate::db::{open_source, DatabaseUrl, DbError};
use crate::model::proposal::{proposal_rows, ProposalIds};
use crate::model::subset::{FileFormat, SelectionError, Subset};
use crate::model::summary::SummaryTable;
use crate::model::table::Table;
use crate::repo::snapshot::Snapshot;
use crate::repo::sqlite_source::SqliteOpSimSource;
use crate::repo::OpSimSource;
use crate::service::classifier::{classify_proposals, ClassifyError};
use log::{error, info};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::Path;
use std::time::Instant;

pub type LoadResult<T> = Result<T, LoadError>;

/// Failure of a summary load.
#[derive(Debug)]
pub enum LoadError {
    /// Unknown subset or file format; raised before touching the source.
    Selection(SelectionError),
    /// Proposal table violates the one-WFD/one-DDF invariant.
    Classify(ClassifyError),
    /// Connection, schema or decoding failure from the source.
    Db(DbError),
    FormatNotImplemented(FileFormat),
}

impl Display for LoadError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Selection(err) => write!(f, "{err}"),
            Self::Classify(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::FormatNotImplemented(format) => {
                write!(f, "reading `{format}` OpSim output is not implemented")
            }
        }
    }
}

impl Error for LoadError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Selection(err) => Some(err),
            Self::Classify(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::FormatNotImplemented(_) => None,
        }
    }
}

impl From<SelectionError> for LoadError {
    fn from(value: SelectionError) -> Self {
        Self::Selection(value)
    }
}

impl From<ClassifyError> for LoadError {
    fn from(value: ClassifyError) -> Self {
        Self::Classify(value)
    }
}

impl From<DbError> for LoadError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

/// Loaded OpSim output: indexed summary rows plus the proposal metadata
/// used to select them.
#[derive(Debug, Clone)]
pub struct OpSimOutput {
    summary: SummaryTable,
    prop_ids: ProposalIds,
    proposal_table: Table,
    subset: Subset,
}

impl OpSimOutput {
    /// Loads `subset` from an OpSim SQLite database.
    ///
    /// `db_name` is a file path or a `sqlite://` URL; bare paths get the
    /// `sqlite:///` prefix. The subset is validated before any connection is
    /// attempted.
    ///
    /// # Side effects
    /// - Opens and closes one read-only connection.
    /// - Logs `event=db_read ... reading from database <url>` at `info`,
    ///   followed by `summary_load` events. Nothing is printed; call
    ///   [`crate::init_logging`] to see these lines.
    pub fn from_opsim_db(db_name: &str, subset: &str) -> LoadResult<Self> {
        let subset: Subset = subset.parse()?;
        let url = DatabaseUrl::parse(db_name)?;
        Self::from_database_url(&url, subset)
    }

    /// Loads `subset` from an already resolved database URL.
    pub fn from_database_url(url: &DatabaseUrl, subset: Subset) -> LoadResult<Self> {
        info!("event=db_read module=service status=start reading from database {url}");
        let conn = open_source(url)?;
        let source = SqliteOpSimSource::new(&conn, url.as_str());
        Self::from_source(&source, subset)
    }

    /// Runs classification, filtering and indexing against any source.
    pub fn from_source(source: &dyn OpSimSource, subset: Subset) -> LoadResult<Self> {
        let started_at = Instant::now();
        let source_name = source.describe();
        info!("event=summary_load module=service status=start source={source_name} subset={subset}");

        match load(source, subset) {
            Ok(output) => {
                info!(
                    "event=summary_load module=service status=ok source={source_name} subset={subset} rows={} wfd={} ddf={} duration_ms={}",
                    output.summary.len(),
                    output.prop_ids.wfd,
                    output.prop_ids.ddf,
                    started_at.elapsed().as_millis()
                );
                Ok(output)
            }
            Err(err) => {
                error!(
                    "event=summary_load module=service status=error source={source_name} subset={subset} duration_ms={} error={}",
                    started_at.elapsed().as_millis(),
                    err
                );
                Err(err)
            }
        }
    }

    /// Subset names accepted by the loaders.
    pub fn allowed_subsets() -> &'static [&'static str] {
        &Subset::ALLOWED
    }

    /// Summary rows indexed by `obsHistID`.
    pub fn summary(&self) -> &SummaryTable {
        &self.summary
    }

    pub fn prop_ids(&self) -> &ProposalIds {
        &self.prop_ids
    }

    /// Full `Proposal` table as read from the source.
    pub fn proposal_table(&self) -> &Table {
        &self.proposal_table
    }

    pub fn subset(&self) -> Subset {
        self.subset
    }
}

fn load(source: &dyn OpSimSource, subset: Subset) -> LoadResult<OpSimOutput> {
    let proposal_table = source.read_proposals()?;
    let prop_ids = classify_proposals(&proposal_rows(&proposal_table)?)?;

    let raw_summary = source.read_summary(&subset.summary_filter(&prop_ids))?;
    let summary = SummaryTable::from_table(raw_summary, subset.deduplicates())?;

    Ok(OpSimOutput {
        summary,
        prop_ids,
        proposal_table,
        subset,
    })
}

/// Loads `subset` from a serialized OpSim output of the given format.
///
/// - `sqlite`: `path` is opened as a database, as in
///   [`OpSimOutput::from_opsim_db`].
/// - `snapshot`: `path` is a file written by [`Snapshot::write`]; subsets are
///   rebuilt in memory.
/// - `ascii`: recognized, but not readable.
///
/// Format and subset are validated before the file is touched.
pub fn opsim_output_from_file(
    path: impl AsRef<Path>,
    format: &str,
    subset: &str,
) -> LoadResult<OpSimOutput> {
    let format: FileFormat = format.parse()?;
    let subset: Subset = subset.parse()?;
    let path = path.as_ref();

    match format {
        FileFormat::Sqlite => OpSimOutput::from_database_url(&DatabaseUrl::from_path(path), subset),
        FileFormat::Snapshot => {
            info!(
                "event=snapshot_read module=service status=start path={}",
                path.display()
            );
            let snapshot = Snapshot::read(path)?;
            OpSimOutput::from_source(&snapshot, subset)
        }
        FileFormat::Ascii => Err(LoadError::FormatNotImplemented(format)),
    }
}
