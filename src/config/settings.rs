//! User settings for server-backup
//!
//! The settings file is a flat JSON object whose keys match the host
//! configuration keys (`backuppath`, `zipbackup`, ...), so an existing plugin
//! configuration can be carried over by renaming the file.

use serde::{Deserialize, Serialize};

use super::paths::ToolPaths;
use super::run::ConfigSource;
use crate::error::BackupError;
use crate::file_io::{read_json, write_json_atomic};

/// Persistent backup settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Output root for backup entries
    #[serde(rename = "backuppath")]
    pub backup_path: String,

    /// Compress each finished backup into a single archive
    #[serde(rename = "zipbackup")]
    pub zip_backup: bool,

    /// Copy the configured worlds (selective mode)
    #[serde(rename = "backupworlds")]
    pub backup_worlds: bool,

    /// Copy the extensions directory (selective mode)
    #[serde(rename = "backupplugins")]
    pub backup_plugins: bool,

    /// Copy the whole server directory instead of worlds and extensions
    #[serde(rename = "backupeverything")]
    pub backup_everything: bool,

    /// Semicolon-delimited extension names to leave out
    #[serde(rename = "skipplugins")]
    pub skip_plugins: String,

    /// strftime pattern used to name each backup entry
    #[serde(rename = "dateformat")]
    pub date_format: String,

    /// Number of backup entries to keep; negative disables pruning
    #[serde(rename = "maxbackups")]
    pub max_backups: i64,

    /// Re-enable autosave once the backup has finished
    #[serde(rename = "enableautosave")]
    pub enable_autosave: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            backup_path: "backups".to_string(),
            zip_backup: true,
            backup_worlds: true,
            backup_plugins: true,
            backup_everything: false,
            skip_plugins: String::new(),
            date_format: "%d%m%Y-%H%M%S".to_string(),
            max_backups: 10,
            enable_autosave: true,
        }
    }
}

impl Settings {
    /// Load settings from disk, or create default settings if file doesn't exist
    pub fn load_or_create(paths: &ToolPaths) -> Result<Self, BackupError> {
        let settings_path = paths.settings_file();
        // Don't save defaults - let caller decide when to persist
        read_json(&settings_path)
    }

    /// Save settings to disk
    pub fn save(&self, paths: &ToolPaths) -> Result<(), BackupError> {
        paths.ensure_directories()?;
        write_json_atomic(paths.settings_file(), self)
    }
}

impl ConfigSource for Settings {
    fn get_string(&self, key: &str) -> Option<String> {
        match key {
            "backuppath" => Some(self.backup_path.clone()),
            "skipplugins" => Some(self.skip_plugins.clone()),
            "dateformat" => Some(self.date_format.clone()),
            _ => None,
        }
    }

    fn get_bool(&self, key: &str) -> Option<bool> {
        match key {
            "zipbackup" => Some(self.zip_backup),
            "backupworlds" => Some(self.backup_worlds),
            "backupplugins" => Some(self.backup_plugins),
            "backupeverything" => Some(self.backup_everything),
            "enableautosave" => Some(self.enable_autosave),
            _ => None,
        }
    }

    fn get_int(&self, key: &str) -> Option<i64> {
        match key {
            "maxbackups" => Some(self.max_backups),
            _ => None,
        }
    }
}
