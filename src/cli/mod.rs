//! CLI command handlers
//!
//! Bridges the clap argument parsing in the binary with the backup engine.

pub mod backup;
pub mod config;
pub mod console;

use std::path::{Path, PathBuf};

use crate::config::{Settings, ToolPaths};
use crate::error::BackupResult;
use crate::messages::Messages;

pub use backup::{handle_history, handle_list, handle_prune, handle_run};
pub use config::handle_config;
pub use console::{discover_worlds, scan_extensions, ConsoleHost};

/// Everything a command needs about the server it operates on
pub struct CliContext {
    pub server_root: PathBuf,
    pub paths: ToolPaths,
    pub settings: Settings,
    pub messages: Messages,
}

impl CliContext {
    /// Resolve tool paths and load settings and messages for `server_root`
    pub fn load(server_root: &Path) -> BackupResult<Self> {
        let paths = ToolPaths::new(server_root);
        let settings = Settings::load_or_create(&paths)?;
        let messages = Messages::load(&paths)?;

        Ok(Self {
            server_root: server_root.to_path_buf(),
            paths,
            settings,
            messages,
        })
    }

    /// Output root with relative settings resolved against the server root
    pub fn output_root(&self) -> PathBuf {
        let configured = PathBuf::from(&self.settings.backup_path);
        if configured.is_absolute() {
            configured
        } else {
            self.server_root.join(configured)
        }
    }
}
