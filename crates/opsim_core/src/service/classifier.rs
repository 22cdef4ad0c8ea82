//! Proposal classification into WFD and DDF.
//!
//! # Invariants
//! - Matching is a case-insensitive substring test on `propConf`.
//! - A row matching "universal" is WFD and is not tested for DDF.
//! - Exactly one row per category, or classification fails.

use crate::model::proposal::{ProposalCategory, ProposalIds, ProposalRow};
use std::error::Error;
use std::fmt::{Display, Formatter};

const WFD_MARKER: &str = "universal";
const DDF_MARKER: &str = "ddcosmology";

pub type ClassifyResult<T> = Result<T, ClassifyError>;

/// Proposal table does not name exactly one WFD and one DDF program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClassifyError {
    DuplicateCategory {
        category: ProposalCategory,
        first: i64,
        second: i64,
    },
    UnexpectedClassification {
        wfd: Option<i64>,
        ddf: Option<i64>,
    },
}

impl Display for ClassifyError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DuplicateCategory {
                category,
                first,
                second,
            } => write!(
                f,
                "multiple propIDs for {} found: {first} and {second}",
                category.as_str().to_ascii_uppercase()
            ),
            Self::UnexpectedClassification { wfd, ddf } => write!(
                f,
                "unexpected proposal classification: wfd={} ddf={}",
                describe_slot(*wfd),
                describe_slot(*ddf)
            ),
        }
    }
}

impl Error for ClassifyError {}

/// Returns the category a proposal configuration belongs to, if any.
pub fn categorize(prop_conf: &str) -> Option<ProposalCategory> {
    let conf = prop_conf.to_lowercase();
    if conf.contains(WFD_MARKER) {
        Some(ProposalCategory::Wfd)
    } else if conf.contains(DDF_MARKER) {
        Some(ProposalCategory::Ddf)
    } else {
        None
    }
}

/// Maps the WFD and DDF categories to their proposal ids.
///
/// # Errors
/// - `DuplicateCategory` on the second row matching an assigned category.
/// - `UnexpectedClassification` when either category has no row.
pub fn classify_proposals(rows: &[ProposalRow]) -> ClassifyResult<ProposalIds> {
    let mut wfd = None;
    let mut ddf = None;

    for row in rows {
        let Some(category) = categorize(&row.prop_conf) else {
            continue;
        };
        let slot = match category {
            ProposalCategory::Wfd => &mut wfd,
            ProposalCategory::Ddf => &mut ddf,
        };
        if let Some(first) = *slot {
            return Err(ClassifyError::DuplicateCategory {
                category,
                first,
                second: row.prop_id,
            });
        }
        *slot = Some(row.prop_id);
    }

    match (wfd, ddf) {
        (Some(wfd), Some(ddf)) => Ok(ProposalIds { wfd, ddf }),
        (wfd, ddf) => Err(ClassifyError::UnexpectedClassification { wfd, ddf }),
    }
}

fn describe_slot(slot: Option<i64>) -> String {
    slot.map_or_else(|| "missing".to_string(), |id| id.to_string())
}
