//! Configuration module for server-backup
//!
//! This module provides configuration management including:
//! - Tool directory resolution
//! - Settings persistence using the host configuration keys
//! - The immutable per-run configuration snapshot

pub mod paths;
pub mod run;
pub mod settings;

pub use paths::ToolPaths;
pub use run::{ConfigSource, RunConfiguration};
pub use settings::Settings;
