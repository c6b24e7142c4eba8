//! Backup engine
//!
//! Copies server data into a timestamped entry under the output root,
//! optionally compresses it and enforces a retention count.
//!
//! # Architecture
//!
//! - `filter`: top-level entry predicates used while copying
//! - `copier`: recursive directory copy
//! - `archiver`: directory to ZIP archive conversion
//! - `retention`: listing and pruning of old entries
//! - `naming`: entry names from the configured date format
//! - `orchestrator`: drives one run and its worker thread
//! - `completion`: tasks handed back to the host context
//!
//! # Layout
//!
//! A run produces `{backuppath}/{timestamp}/` holding one directory per
//! world plus `extensions/`, or a mirror of the server directory in full
//! mode. With compression enabled this becomes `{backuppath}/{timestamp}.zip`.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use server_backup::backup::{spawn_backup, BackupContext, BackupOrchestrator, WorldQueue};
//! use server_backup::host::TaskQueue;
//!
//! let queue = TaskQueue::new();
//! let orchestrator = BackupOrchestrator::new(
//!     config,
//!     messages,
//!     BackupContext::new("/srv/minecraft").with_extensions(host.loaded_extensions()),
//!     Arc::new(queue.handle()),
//! );
//!
//! let outcome = spawn_backup(orchestrator, WorldQueue::new(["world"]))?.join()?;
//! queue.run_pending(&host);
//! println!("{}", outcome.summary());
//! ```

mod archiver;
mod completion;
mod copier;
mod filter;
mod naming;
mod orchestrator;
mod outcome;
mod queue;
mod retention;

pub use archiver::{archive_path_for, compress_tree, ARCHIVE_EXTENSION};
pub use completion::{completion_task, failure_broadcast_task, AUTOSAVE_ON_COMMAND};
pub use copier::{copy_tree, CopyStats};
pub use filter::PathFilter;
pub use naming::{entry_name_or_fallback, format_entry_name, matches_fallback_shape, FALLBACK_DATE_FORMAT};
pub use orchestrator::{
    spawn_backup, BackupContext, BackupHandle, BackupOrchestrator, DEFAULT_EXTENSIONS_DIR,
    EXTENSIONS_ENTRY_DIR,
};
pub use outcome::{ArchiveStatus, RunOutcome, UnitKind, UnitReport, UnitStatus};
pub use queue::WorldQueue;
pub use retention::{
    entry_size, list_candidates, list_entries, prune, select_for_deletion, BackupEntry,
};
