//! Console host used by the standalone binary
//!
//! There is no game server attached: nobody is online, there is no
//! permission system, and broadcasts and console commands are echoed to
//! stdout so an operator running the tool by hand still sees them.

use std::fs;
use std::path::{Path, PathBuf};

use crate::host::{ExtensionStatus, Host};

/// File extension of an installed extension archive
const EXTENSION_FILE_EXTENSION: &str = "jar";

/// Suffix marking an extension archive the server will not load
const DISABLED_SUFFIX: &str = ".disabled";

pub struct ConsoleHost {
    extensions_dir: PathBuf,
}

impl ConsoleHost {
    pub fn new(extensions_dir: impl Into<PathBuf>) -> Self {
        Self {
            extensions_dir: extensions_dir.into(),
        }
    }
}

impl Host for ConsoleHost {
    fn online_users(&self) -> Vec<String> {
        Vec::new()
    }

    fn has_permission(&self, _user: &str, _node: &str) -> bool {
        false
    }

    fn send_message(&self, user: &str, message: &str) {
        println!("[to {}] {}", user, message);
    }

    fn broadcast(&self, message: &str) {
        println!("[broadcast] {}", message);
    }

    fn dispatch_command(&self, command: &str) {
        tracing::info!(command, "no server attached, console command not sent");
    }

    fn has_permission_system(&self) -> bool {
        false
    }

    fn loaded_extensions(&self) -> Vec<ExtensionStatus> {
        scan_extensions(&self.extensions_dir)
    }
}

/// Extensions installed as archives directly under `dir`
///
/// `Name.jar` is reported enabled, `Name.jar.disabled` disabled.
pub fn scan_extensions(dir: &Path) -> Vec<ExtensionStatus> {
    let Ok(read_dir) = fs::read_dir(dir) else {
        return Vec::new();
    };

    let mut extensions: Vec<ExtensionStatus> = read_dir
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().map(|t| t.is_file()).unwrap_or(false))
        .filter_map(|entry| {
            let file_name = entry.file_name().to_string_lossy().into_owned();
            let (archive, enabled) = match file_name.strip_suffix(DISABLED_SUFFIX) {
                Some(archive) => (archive.to_string(), false),
                None => (file_name, true),
            };
            let name = archive.strip_suffix(&format!(".{}", EXTENSION_FILE_EXTENSION))?;
            Some(ExtensionStatus::new(name, enabled))
        })
        .collect();

    extensions.sort_by(|a, b| a.name.cmp(&b.name));
    extensions
}

/// World directories directly under `server_root`, in name order
///
/// A world is any directory holding a `level.dat`.
pub fn discover_worlds(server_root: &Path) -> Vec<String> {
    let Ok(read_dir) = fs::read_dir(server_root) else {
        return Vec::new();
    };

    let mut worlds: Vec<String> = read_dir
        .filter_map(Result::ok)
        .filter(|entry| entry.path().join("level.dat").is_file())
        .map(|entry| entry.file_name().to_string_lossy().into_owned())
        .collect();

    worlds.sort();
    worlds
}
