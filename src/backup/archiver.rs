//! Directory-to-archive conversion
//!
//! Archives are ZIP files (Deflate). The archive is first written next to its
//! final location with a `.tmp` suffix and renamed into place once complete,
//! so a failed compression never leaves a truncated `.zip` behind. The
//! source directory is never touched here; deleting it is the caller's call.

use std::ffi::OsString;
use std::fs::{self, File, OpenOptions};
use std::io::{self, BufWriter, ErrorKind};
use std::path::{Path, PathBuf};

use walkdir::WalkDir;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::error::{BackupError, BackupResult};

/// File extension of finished archives
pub const ARCHIVE_EXTENSION: &str = "zip";

/// Path of the archive written for `base`: `base` + `.zip`
pub fn archive_path_for(base: &Path) -> PathBuf {
    let mut name: OsString = base.as_os_str().to_os_string();
    name.push(".");
    name.push(ARCHIVE_EXTENSION);
    PathBuf::from(name)
}

/// Compress `source_dir` into `<archive_base>.zip`
///
/// Entry names are the paths relative to `source_dir`, `/`-separated, with
/// an explicit entry for every directory so empty folders survive. Returns
/// the path of the finished archive.
pub fn compress_tree(source_dir: &Path, archive_base: &Path) -> BackupResult<PathBuf> {
    let source_meta = fs::metadata(source_dir).map_err(|e| BackupError::io(source_dir, e))?;
    if !source_meta.is_dir() {
        return Err(BackupError::io(source_dir, "source is not a directory"));
    }

    let archive_path = archive_path_for(archive_base);
    if fs::symlink_metadata(&archive_path).is_ok() {
        return Err(BackupError::DestinationExists(archive_path));
    }

    let mut temp_name = archive_path.as_os_str().to_os_string();
    temp_name.push(".tmp");
    let temp_path = PathBuf::from(temp_name);

    let result = write_archive(source_dir, &temp_path).and_then(|()| {
        fs::rename(&temp_path, &archive_path).map_err(|e| BackupError::io(&archive_path, e))
    });

    if let Err(err) = result {
        let _ = fs::remove_file(&temp_path);
        return Err(err);
    }

    tracing::debug!(archive = %archive_path.display(), "archive written");
    Ok(archive_path)
}

fn write_archive(source_dir: &Path, temp_path: &Path) -> BackupResult<()> {
    let file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(temp_path)
        .map_err(|e| {
            if e.kind() == ErrorKind::AlreadyExists {
                BackupError::DestinationExists(temp_path.to_path_buf())
            } else {
                BackupError::io(temp_path, e)
            }
        })?;

    let mut zip = ZipWriter::new(BufWriter::new(file));
    let options = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .large_file(true);

    for entry in WalkDir::new(source_dir)
        .min_depth(1)
        .follow_links(false)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(source_dir).to_path_buf();
            BackupError::io(path, e)
        })?;
        let path = entry.path();

        let relative = path
            .strip_prefix(source_dir)
            .map_err(|e| BackupError::io(path, e))?;
        let name = entry_name(relative);

        let is_file = if entry.file_type().is_symlink() {
            fs::metadata(path).map(|m| m.is_file()).unwrap_or(false)
        } else {
            entry.file_type().is_file()
        };

        if entry.file_type().is_dir() {
            zip.add_directory(name, options)?;
        } else if is_file {
            zip.start_file(name, options)?;
            let mut source = File::open(path).map_err(|e| BackupError::io(path, e))?;
            io::copy(&mut source, &mut zip).map_err(|e| BackupError::io(path, e))?;
        } else {
            tracing::warn!(path = %path.display(), "not archiving unsupported file type");
        }
    }

    let writer = zip.finish()?;
    let file = writer
        .into_inner()
        .map_err(|e| BackupError::io(temp_path, e.error()))?;
    file.sync_all().map_err(|e| BackupError::io(temp_path, e))?;

    Ok(())
}

fn entry_name(relative: &Path) -> String {
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
