//! Localized message table
//!
//! Messages are looked up by id. The built-in English table can be
//! overridden entry by entry from `messages.json`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::config::ToolPaths;
use crate::error::BackupError;
use crate::file_io::{read_json, write_json_atomic};

/// Placeholder replaced by [`Messages::get_with`]
pub const ARG_PLACEHOLDER: &str = "{arg}";

const DEFAULTS: &[(&str, &str)] = &[
    ("backupstarted", "Starting backup..."),
    ("backupfailed", "An error occurred during backup. Please check the server log."),
    ("backupfinished", "Backup finished."),
    ("skipworlds", "Skipping world backup, no worlds queued or world backup disabled."),
    ("skipplugins", "Skipping plugin backup, plugin backup disabled."),
    ("disabledplugins", "These plugins are excluded from the backup:"),
    ("removeold", "Removing the following old backups:"),
    ("errordateformat", "Invalid date format in config, using the default format."),
    ("errorcreatetemp", "Failed to copy world {arg} into the backup."),
];

/// Message lookup keyed by id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Messages {
    table: BTreeMap<String, String>,
}

impl Default for Messages {
    fn default() -> Self {
        Self {
            table: DEFAULTS
                .iter()
                .map(|(id, text)| (id.to_string(), text.to_string()))
                .collect(),
        }
    }
}

impl Messages {
    /// Load the built-in table, overlaid with `messages.json` when present
    pub fn load(paths: &ToolPaths) -> Result<Self, BackupError> {
        let overrides: BTreeMap<String, String> = read_json(paths.messages_file())?;
        let mut messages = Self::default();
        messages.table.extend(overrides);
        Ok(messages)
    }

    /// Write the full table so operators can edit it
    pub fn save(&self, paths: &ToolPaths) -> Result<(), BackupError> {
        paths.ensure_directories()?;
        write_json_atomic(paths.messages_file(), self)
    }

    /// Replace or add a single message
    pub fn set(&mut self, id: impl Into<String>, text: impl Into<String>) {
        self.table.insert(id.into(), text.into());
    }

    /// Look up a message; unknown ids produce a visible marker
    pub fn get(&self, id: &str) -> String {
        self.table
            .get(id)
            .cloned()
            .unwrap_or_else(|| format!("<missing message: {}>", id))
    }

    /// Look up a message and substitute its argument
    pub fn get_with(&self, id: &str, arg: &str) -> String {
        self.get(id).replace(ARG_PLACEHOLDER, arg)
    }
}
