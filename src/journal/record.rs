//! Journal record data structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::backup::{ArchiveStatus, RunOutcome, UnitReport};

/// A single finished run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunRecord {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,

    /// Name of the entry under the output root
    pub entry_name: String,

    /// Whether the entry ended up as an archive
    pub archived: bool,

    /// The configured date format had to be replaced
    #[serde(default)]
    pub used_fallback_name: bool,

    pub units: Vec<UnitReport>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub pruned: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub remaining_worlds: Vec<String>,
}

impl RunRecord {
    pub fn is_success(&self) -> bool {
        self.units.iter().all(|u| !u.is_failed())
    }

    pub fn failed_units(&self) -> usize {
        self.units.iter().filter(|u| u.is_failed()).count()
    }
}

impl From<&RunOutcome> for RunRecord {
    fn from(outcome: &RunOutcome) -> Self {
        Self {
            started_at: outcome.started_at,
            finished_at: outcome.finished_at,
            entry_name: outcome.entry_name.clone(),
            archived: matches!(
                outcome.archive,
                ArchiveStatus::Archived(_) | ArchiveStatus::ArchivedSourceKept { .. }
            ),
            used_fallback_name: outcome.used_fallback_name,
            units: outcome.units.clone(),
            pruned: outcome.pruned.clone(),
            remaining_worlds: outcome.remaining_worlds.clone(),
        }
    }
}
