//! Recursive directory copy with top-level filtering

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use serde::{Deserialize, Serialize};
use walkdir::WalkDir;

use super::filter::PathFilter;
use crate::error::{BackupError, BackupResult};

/// Counters for one copy invocation
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CopyStats {
    pub files: u64,
    pub directories: u64,
    pub bytes: u64,
    /// Special files and dangling or directory symlinks left out
    pub skipped: u64,
}

/// Copy the directory `source` to `destination`
///
/// `destination` must not exist yet; an existing target is reported as
/// [`BackupError::DestinationExists`] instead of merging the two trees.
/// `filter` is consulted only for the direct children of `source`. Once a
/// child directory is accepted its whole subtree is copied. With
/// `recursive == false` only the direct children are visited.
///
/// Symlinks are not followed while walking. A symlink to a regular file is
/// copied as the file's content; anything else that is not a plain file or
/// directory is skipped with a warning.
pub fn copy_tree(
    source: &Path,
    destination: &Path,
    filter: &PathFilter,
    recursive: bool,
) -> BackupResult<CopyStats> {
    let source_meta = fs::metadata(source).map_err(|e| BackupError::io(source, e))?;
    if !source_meta.is_dir() {
        return Err(BackupError::io(source, "source is not a directory"));
    }

    if fs::symlink_metadata(destination).is_ok() {
        return Err(BackupError::DestinationExists(destination.to_path_buf()));
    }
    if let Some(parent) = destination.parent() {
        fs::create_dir_all(parent).map_err(|e| BackupError::io(parent, e))?;
    }
    create_dir(destination)?;

    let mut stats = CopyStats::default();

    let mut walker = WalkDir::new(source)
        .min_depth(1)
        .follow_links(false)
        .sort_by_file_name();
    if !recursive {
        walker = walker.max_depth(1);
    }

    // The destination may live below the source (full backups); never descend into it.
    let entries = walker.into_iter().filter_entry(|entry| {
        entry.path() != destination
            && (entry.depth() != 1 || filter.accept_name(entry.file_name()))
    });

    for entry in entries {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(source).to_path_buf();
            BackupError::io(path, e)
        })?;

        let relative = entry
            .path()
            .strip_prefix(source)
            .map_err(|e| BackupError::io(entry.path(), e))?;
        let target = destination.join(relative);
        let file_type = entry.file_type();

        if file_type.is_dir() {
            create_dir(&target)?;
            stats.directories += 1;
        } else if file_type.is_file() {
            stats.bytes += copy_file(entry.path(), &target)?;
            stats.files += 1;
        } else if file_type.is_symlink() {
            match fs::metadata(entry.path()) {
                Ok(meta) if meta.is_file() => {
                    stats.bytes += copy_file(entry.path(), &target)?;
                    stats.files += 1;
                }
                _ => {
                    tracing::warn!(
                        path = %entry.path().display(),
                        "skipping symlink that does not point to a regular file"
                    );
                    stats.skipped += 1;
                }
            }
        } else {
            tracing::warn!(path = %entry.path().display(), "skipping special file");
            stats.skipped += 1;
        }
    }

    tracing::debug!(
        source = %source.display(),
        destination = %destination.display(),
        files = stats.files,
        directories = stats.directories,
        bytes = stats.bytes,
        "copied tree"
    );

    Ok(stats)
}

fn create_dir(path: &Path) -> BackupResult<()> {
    fs::create_dir(path).map_err(|e| {
        if e.kind() == ErrorKind::AlreadyExists {
            BackupError::DestinationExists(path.to_path_buf())
        } else {
            BackupError::io(path, e)
        }
    })
}

fn copy_file(source: &Path, target: &Path) -> BackupResult<u64> {
    fs::copy(source, target).map_err(|e| BackupError::io(source, e))
}
