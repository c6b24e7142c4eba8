//! Result values reported by a backup run

use std::fmt;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::copier::CopyStats;

/// A unit of work within a run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "name", rename_all = "snake_case")]
pub enum UnitKind {
    /// The whole server directory
    Full,
    World(String),
    /// The world step as a whole, reported only when it is skipped
    Worlds,
    Extensions,
}

impl fmt::Display for UnitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnitKind::Full => write!(f, "full backup"),
            UnitKind::World(name) => write!(f, "world '{}'", name),
            UnitKind::Worlds => write!(f, "worlds"),
            UnitKind::Extensions => write!(f, "extensions"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "detail", rename_all = "snake_case")]
pub enum UnitStatus {
    Succeeded(CopyStats),
    Failed(String),
    Skipped(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitReport {
    pub unit: UnitKind,
    pub status: UnitStatus,
}

impl UnitReport {
    pub fn is_failed(&self) -> bool {
        matches!(self.status, UnitStatus::Failed(_))
    }
}

/// What happened to the compression step
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "detail", rename_all = "snake_case")]
pub enum ArchiveStatus {
    /// Compression disabled in the configuration
    NotRequested,
    /// Compression enabled but no unit produced any output
    NothingToArchive,
    /// Archive written and the uncompressed directory removed
    Archived(PathBuf),
    /// Archive written but the uncompressed directory could not be removed
    ArchivedSourceKept { archive: PathBuf, reason: String },
    /// No archive; the uncompressed directory is kept
    Failed(String),
}

/// Everything a run did, unit by unit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunOutcome {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    /// Name of the entry created under the output root
    pub entry_name: String,
    /// Uncompressed destination directory of the run
    pub destination: PathBuf,
    /// The configured date format was unusable
    pub used_fallback_name: bool,
    pub units: Vec<UnitReport>,
    pub archive: ArchiveStatus,
    /// Names removed by the retention pruner
    pub pruned: Vec<String>,
    /// Worlds never attempted
    pub remaining_worlds: Vec<String>,
}

impl RunOutcome {
    /// Units that failed
    pub fn failures(&self) -> impl Iterator<Item = &UnitReport> {
        self.units.iter().filter(|u| u.is_failed())
    }

    pub fn status_of(&self, unit: &UnitKind) -> Option<&UnitStatus> {
        self.units
            .iter()
            .find(|u| &u.unit == unit)
            .map(|u| &u.status)
    }

    /// No unit and no compression step failed
    pub fn is_success(&self) -> bool {
        self.failures().next().is_none() && !matches!(self.archive, ArchiveStatus::Failed(_))
    }

    /// Path of the entry as it exists after the run
    pub fn entry_path(&self) -> &PathBuf {
        match &self.archive {
            ArchiveStatus::Archived(path) => path,
            _ => &self.destination,
        }
    }

    pub fn summary(&self) -> String {
        let succeeded = self
            .units
            .iter()
            .filter(|u| matches!(u.status, UnitStatus::Succeeded(_)))
            .count();
        let failed = self.failures().count();
        let skipped = self.units.len() - succeeded - failed;

        format!(
            "{}: {} succeeded, {} failed, {} skipped; {} old backup(s) removed",
            self.entry_name,
            succeeded,
            failed,
            skipped,
            self.pruned.len()
        )
    }
}
