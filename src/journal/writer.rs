//! Append-only run journal
//!
//! Each record is written as one JSON line and flushed immediately.

use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use crate::error::{BackupError, BackupResult};
use crate::logging::{send_log, LogLevel};

use super::record::RunRecord;

/// Handles the `runs.jsonl` journal file
pub struct RunJournal {
    path: PathBuf,
}

impl RunJournal {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Append one record
    pub fn append(&self, record: &RunRecord) -> BackupResult<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| BackupError::io(parent, e))?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| BackupError::io(&self.path, e))?;

        let json = serde_json::to_string(record)
            .map_err(|e| BackupError::Json(format!("Failed to serialize run record: {}", e)))?;

        writeln!(file, "{}", json).map_err(|e| BackupError::io(&self.path, e))?;
        file.flush().map_err(|e| BackupError::io(&self.path, e))?;

        Ok(())
    }

    /// Append one record; a failure is only logged
    ///
    /// Returns whether the record was written.
    pub fn record(&self, record: &RunRecord) -> bool {
        match self.append(record) {
            Ok(()) => true,
            Err(e) => {
                send_log(
                    LogLevel::Warning,
                    &format!("Could not write run journal: {}", e),
                    false,
                );
                false
            }
        }
    }

    /// All records, oldest first
    pub fn read_all(&self) -> BackupResult<Vec<RunRecord>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let file = File::open(&self.path).map_err(|e| BackupError::io(&self.path, e))?;
        let reader = BufReader::new(file);
        let mut records = Vec::new();

        for (line_num, line) in reader.lines().enumerate() {
            let line = line.map_err(|e| BackupError::io(&self.path, e))?;
            if line.trim().is_empty() {
                continue;
            }

            let record: RunRecord = serde_json::from_str(&line).map_err(|e| {
                BackupError::Json(format!(
                    "Failed to parse run record at line {}: {}",
                    line_num + 1,
                    e
                ))
            })?;
            records.push(record);
        }

        Ok(records)
    }

    /// The most recent `count` records, oldest first
    pub fn read_recent(&self, count: usize) -> BackupResult<Vec<RunRecord>> {
        let mut records = self.read_all()?;
        let start = records.len().saturating_sub(count);
        Ok(records.split_off(start))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
