//! server-backup - point-in-time backups for a running game server
//!
//! Copies world data and installed extensions (or the whole server
//! directory) into a timestamped entry, optionally compresses it into a ZIP
//! archive and prunes the oldest entries beyond a configured count.
//!
//! # Architecture
//!
//! - `backup`: copy, archive, retention and the run orchestrator
//! - `config`: settings file, tool paths and the per-run snapshot
//! - `host`: the host process seam and its primary-context task queue
//! - `journal`: append-only record of finished runs
//! - `messages`: localized user-facing strings
//! - `logging`: the log sink over `tracing`
//! - `cli`: the standalone console host and its commands
//! - `error`: custom error types
//!
//! # Example
//!
//! ```rust,ignore
//! use server_backup::config::{RunConfiguration, Settings, ToolPaths};
//!
//! let paths = ToolPaths::new(server_root);
//! let settings = Settings::load_or_create(&paths)?;
//! let config = RunConfiguration::from_source(&settings);
//! ```

pub mod backup;
pub mod cli;
pub mod config;
pub mod error;
pub mod file_io;
pub mod host;
pub mod journal;
pub mod logging;
pub mod messages;

pub use error::{BackupError, BackupResult};
