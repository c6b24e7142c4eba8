//! Retention policy for the backup output root
//!
//! Every direct child of the output root is a backup entry, whether it is a
//! finished archive or a plain directory. Pruning keeps the `max_backups`
//! most recently modified entries and deletes the rest.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use walkdir::WalkDir;

use super::archiver::ARCHIVE_EXTENSION;
use crate::error::{BackupError, BackupResult};
use crate::logging::{send_log, LogLevel};
use crate::messages::Messages;

/// One timestamped unit of output under the backup root
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackupEntry {
    /// File or directory name, which encodes the run timestamp
    pub name: String,
    pub path: PathBuf,
    pub modified: DateTime<Utc>,
    pub is_archive: bool,
}

/// List the direct children of `root` in name order
///
/// A missing root yields an empty list.
pub fn list_candidates(root: &Path) -> BackupResult<Vec<BackupEntry>> {
    if !root.exists() {
        return Ok(Vec::new());
    }

    let mut entries = Vec::new();
    for entry in fs::read_dir(root).map_err(|e| BackupError::io(root, e))? {
        let entry = entry.map_err(|e| BackupError::io(root, e))?;
        let path = entry.path();
        let metadata = fs::symlink_metadata(&path).map_err(|e| BackupError::io(&path, e))?;
        let modified = metadata.modified().map_err(|e| BackupError::io(&path, e))?;

        entries.push(BackupEntry {
            name: entry.file_name().to_string_lossy().to_string(),
            is_archive: metadata.is_file()
                && path.extension().map_or(false, |ext| ext == ARCHIVE_EXTENSION),
            path,
            modified: modified.into(),
        });
    }

    entries.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(entries)
}

/// List backup entries newest first
pub fn list_entries(root: &Path) -> BackupResult<Vec<BackupEntry>> {
    let mut entries = list_candidates(root)?;
    entries.sort_by(|a, b| b.modified.cmp(&a.modified));
    Ok(entries)
}

/// Size on disk of an entry; directories are summed recursively
pub fn entry_size(entry: &BackupEntry) -> u64 {
    WalkDir::new(&entry.path)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .filter_map(|e| e.metadata().ok())
        .map(|m| m.len())
        .sum()
}

/// Pick the entries that fall outside the newest `max_backups`
///
/// The newest entry is pulled out of the candidate set `max_backups` times;
/// whatever remains is returned in its original order. On equal
/// modification times the entry seen first wins a keep slot.
pub fn select_for_deletion(
    mut candidates: Vec<BackupEntry>,
    max_backups: usize,
) -> Vec<BackupEntry> {
    if candidates.len() <= max_backups {
        return Vec::new();
    }

    for _ in 0..max_backups {
        let mut newest = 0;
        for (index, candidate) in candidates.iter().enumerate().skip(1) {
            if candidate.modified > candidates[newest].modified {
                newest = index;
            }
        }
        candidates.remove(newest);
    }

    candidates
}

/// Delete the oldest entries of `backup_root` beyond `max_backups`
///
/// Returns the names actually deleted. Listing and deletion failures are
/// logged; one failed deletion does not stop the others.
pub fn prune(backup_root: &Path, max_backups: usize, messages: &Messages) -> Vec<String> {
    let candidates = match list_candidates(backup_root) {
        Ok(candidates) => candidates,
        Err(e) => {
            send_log(
                LogLevel::Warning,
                &format!("Could not list backups for pruning: {}", e),
                true,
            );
            return Vec::new();
        }
    };

    let doomed = select_for_deletion(candidates, max_backups);
    if doomed.is_empty() {
        tracing::debug!(max_backups, "retention limit not exceeded");
        return Vec::new();
    }

    let names: Vec<&str> = doomed.iter().map(|e| e.name.as_str()).collect();
    send_log(LogLevel::Info, &messages.get("removeold"), false);
    send_log(LogLevel::Info, &format!("[{}]", names.join(", ")), false);

    delete_entries(doomed)
}

/// Delete each entry independently, returning the names that went away
fn delete_entries(doomed: Vec<BackupEntry>) -> Vec<String> {
    let mut deleted = Vec::new();
    for entry in doomed {
        match delete_entry(&entry) {
            Ok(()) => deleted.push(entry.name),
            Err(e) => send_log(
                LogLevel::Warning,
                &format!("Failed to delete old backup {}: {}", entry.name, e),
                true,
            ),
        }
    }

    deleted
}

fn delete_entry(entry: &BackupEntry) -> BackupResult<()> {
    let metadata = fs::symlink_metadata(&entry.path).map_err(|e| BackupError::io(&entry.path, e))?;
    let result = if metadata.is_dir() {
        fs::remove_dir_all(&entry.path)
    } else {
        fs::remove_file(&entry.path)
    };
    result.map_err(|e| BackupError::io(&entry.path, e))
}
