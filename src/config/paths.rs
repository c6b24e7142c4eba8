//! Path management for server-backup
//!
//! ## Path Resolution Order
//!
//! 1. `SERVER_BACKUP_HOME` environment variable (if set)
//! 2. `<server root>/.server-backup`

use std::path::{Path, PathBuf};

use crate::error::BackupError;

/// Name of the tool directory created under the server root
pub const TOOL_DIR_NAME: &str = ".server-backup";

/// Manages the paths used by the tool itself (not the backup output)
#[derive(Debug, Clone)]
pub struct ToolPaths {
    /// Base directory for settings, messages and the run journal
    base_dir: PathBuf,
}

impl ToolPaths {
    /// Resolve the tool directory for a server root
    pub fn new(server_root: &Path) -> Self {
        let base_dir = match std::env::var_os("SERVER_BACKUP_HOME") {
            Some(custom) if !custom.is_empty() => PathBuf::from(custom),
            _ => server_root.join(TOOL_DIR_NAME),
        };

        Self { base_dir }
    }

    /// Create ToolPaths with a custom base directory (useful for testing)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Get the path to the settings file
    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    /// Get the path to the localized message table
    pub fn messages_file(&self) -> PathBuf {
        self.base_dir.join("messages.json")
    }

    /// Get the path to the run journal
    pub fn journal_file(&self) -> PathBuf {
        self.base_dir.join("runs.jsonl")
    }

    /// Ensure the tool directory exists
    pub fn ensure_directories(&self) -> Result<(), BackupError> {
        std::fs::create_dir_all(&self.base_dir).map_err(|e| BackupError::io(&self.base_dir, e))
    }

    /// Check if the tool has been initialized (config file exists)
    pub fn is_initialized(&self) -> bool {
        self.settings_file().exists()
    }
}
