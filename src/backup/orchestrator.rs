//! Backup run orchestration
//!
//! A run copies the configured data into a fresh timestamped entry under the
//! output root, optionally compresses it, prunes old entries and finally
//! hands a completion task back to the host. Every step reports a value in
//! the returned [`RunOutcome`]; nothing here panics or propagates an error
//! past [`BackupOrchestrator::run`].

use std::fs;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use chrono::{DateTime, Local, Utc};

use super::archiver::compress_tree;
use super::completion::{completion_task, failure_broadcast_task};
use super::copier::{copy_tree, CopyStats};
use super::filter::PathFilter;
use super::naming::entry_name_or_fallback;
use super::outcome::{ArchiveStatus, RunOutcome, UnitKind, UnitReport, UnitStatus};
use super::queue::WorldQueue;
use super::retention::prune;
use crate::config::RunConfiguration;
use crate::error::{BackupError, BackupResult};
use crate::host::{ExtensionStatus, Scheduler};
use crate::logging::{send_log, LogLevel};
use crate::messages::Messages;

/// Directory of the server root holding installed extensions
pub const DEFAULT_EXTENSIONS_DIR: &str = "plugins";

/// Name of the extensions subtree inside a backup entry
pub const EXTENSIONS_ENTRY_DIR: &str = "extensions";

/// Where the server lives and what the host reported before the run
#[derive(Debug, Clone)]
pub struct BackupContext {
    pub server_root: PathBuf,
    pub extensions_dir: PathBuf,
    /// Snapshot of [`crate::host::Host::loaded_extensions`]
    pub extensions: Vec<ExtensionStatus>,
}

impl BackupContext {
    /// Context for a server at `server_root` with extensions under `plugins/`
    pub fn new(server_root: impl Into<PathBuf>) -> Self {
        let server_root = server_root.into();
        let server_root = fs::canonicalize(&server_root).unwrap_or(server_root);
        Self {
            extensions_dir: server_root.join(DEFAULT_EXTENSIONS_DIR),
            server_root,
            extensions: Vec::new(),
        }
    }

    pub fn with_extensions(mut self, extensions: Vec<ExtensionStatus>) -> Self {
        self.extensions = extensions;
        self
    }
}

/// Drives one backup run
pub struct BackupOrchestrator {
    config: RunConfiguration,
    messages: Messages,
    context: BackupContext,
    scheduler: Arc<dyn Scheduler>,
}

impl BackupOrchestrator {
    pub fn new(
        config: RunConfiguration,
        messages: Messages,
        context: BackupContext,
        scheduler: Arc<dyn Scheduler>,
    ) -> Self {
        Self {
            config,
            messages,
            context,
            scheduler,
        }
    }

    /// Absolute output root; relative settings resolve against the server root
    ///
    /// `.` and `..` components are resolved lexically.
    pub fn output_root(&self) -> PathBuf {
        if self.config.output_root.is_absolute() {
            normalize(&self.config.output_root)
        } else {
            normalize(&self.context.server_root.join(&self.config.output_root))
        }
    }

    /// Run a backup named after the current local time
    pub fn run(&self, worlds: &mut WorldQueue) -> RunOutcome {
        self.run_at(Local::now(), worlds)
    }

    /// Run a backup whose entry is named after `now`
    pub fn run_at(&self, now: DateTime<Local>, worlds: &mut WorldQueue) -> RunOutcome {
        let started_at = Utc::now();
        send_log(LogLevel::Info, &self.messages.get("backupstarted"), false);

        let (entry_name, used_fallback_name) =
            entry_name_or_fallback(&now, &self.config.date_format);
        if used_fallback_name {
            send_log(LogLevel::Warning, &self.messages.get("errordateformat"), true);
        }

        let output_root = self.output_root();
        let destination = output_root.join(&entry_name);
        tracing::debug!(destination = %destination.display(), "backup destination");

        let units = if self.config.full_backup {
            vec![self.backup_everything(&destination)]
        } else {
            let mut units = self.backup_worlds(&destination, worlds);
            units.push(self.backup_extensions(&destination));
            units
        };

        let archive = self.compress(&destination, &entry_name);

        let pruned = match self.config.max_backups {
            Some(max) => prune(&output_root, max, &self.messages),
            None => {
                tracing::info!("retention disabled, keeping every backup");
                Vec::new()
            }
        };

        self.scheduler.schedule(completion_task(
            self.config.enable_autosave,
            self.messages.get("backupfinished"),
        ));

        RunOutcome {
            started_at,
            finished_at: Utc::now(),
            entry_name,
            destination,
            used_fallback_name,
            units,
            archive,
            pruned,
            remaining_worlds: worlds.remaining(),
        }
    }

    fn backup_everything(&self, destination: &Path) -> UnitReport {
        let filter = self.output_exclusion();
        let status = match copy_tree(&self.context.server_root, destination, &filter, true) {
            Ok(stats) => UnitStatus::Succeeded(stats),
            Err(e) => {
                send_log(LogLevel::Severe, &format!("Full backup failed: {}", e), true);
                self.broadcast_failure();
                UnitStatus::Failed(e.to_string())
            }
        };

        UnitReport {
            unit: UnitKind::Full,
            status,
        }
    }

    /// Filter that keeps the output root out of a full backup
    ///
    /// Only an output root below the server root needs excluding, and then
    /// only the top-level entry that contains it.
    fn output_exclusion(&self) -> PathFilter {
        let output_root = self.output_root();
        let Ok(relative) = output_root.strip_prefix(&self.context.server_root) else {
            return PathFilter::AcceptAll;
        };

        match relative.components().next() {
            Some(Component::Normal(name)) => {
                PathFilter::exclude_name(name.to_string_lossy().into_owned())
            }
            _ => PathFilter::AcceptAll,
        }
    }

    fn backup_worlds(&self, destination: &Path, worlds: &mut WorldQueue) -> Vec<UnitReport> {
        if !self.config.backup_worlds || worlds.is_empty() {
            send_log(LogLevel::Info, &self.messages.get("skipworlds"), true);
            let reason = if self.config.backup_worlds {
                "no worlds queued"
            } else {
                "world backup disabled"
            };
            return vec![UnitReport {
                unit: UnitKind::Worlds,
                status: UnitStatus::Skipped(reason.to_string()),
            }];
        }

        let mut units = Vec::with_capacity(worlds.len());
        while let Some(world) = worlds.next_world() {
            let status = match self.copy_world(&world, destination) {
                Ok(stats) => {
                    tracing::debug!(world = %world, files = stats.files, "world copied");
                    UnitStatus::Succeeded(stats)
                }
                Err(e) => {
                    send_log(
                        LogLevel::Severe,
                        &self.messages.get_with("errorcreatetemp", &world),
                        true,
                    );
                    send_log(LogLevel::Severe, &e.to_string(), false);
                    self.broadcast_failure();
                    UnitStatus::Failed(e.to_string())
                }
            };
            units.push(UnitReport {
                unit: UnitKind::World(world),
                status,
            });
        }
        units
    }

    fn copy_world(&self, world: &str, destination: &Path) -> BackupResult<CopyStats> {
        let mut components = Path::new(world).components();
        let single_name = matches!(
            (components.next(), components.next()),
            (Some(Component::Normal(_)), None)
        );
        if !single_name {
            return Err(BackupError::Config(format!(
                "world name '{}' is not a plain directory name",
                world
            )));
        }

        copy_tree(
            &self.context.server_root.join(world),
            &destination.join(world),
            &PathFilter::AcceptAll,
            true,
        )
    }

    fn backup_extensions(&self, destination: &Path) -> UnitReport {
        if !self.config.backup_extensions {
            send_log(LogLevel::Info, &self.messages.get("skipplugins"), true);
            return UnitReport {
                unit: UnitKind::Extensions,
                status: UnitStatus::Skipped("extension backup disabled".to_string()),
            };
        }

        let filter = PathFilter::exclude_set(&self.config.extension_skip_list);
        let excluded = filter.excluded_names();
        send_log(LogLevel::Info, &self.messages.get("disabledplugins"), false);
        send_log(LogLevel::Info, &self.audit_skip_list(&excluded), false);

        let status = match copy_tree(
            &self.context.extensions_dir,
            &destination.join(EXTENSIONS_ENTRY_DIR),
            &filter,
            true,
        ) {
            Ok(stats) => UnitStatus::Succeeded(stats),
            Err(e) => {
                send_log(
                    LogLevel::Severe,
                    &format!("Extension backup failed: {}", e),
                    true,
                );
                self.broadcast_failure();
                UnitStatus::Failed(e.to_string())
            }
        };

        UnitReport {
            unit: UnitKind::Extensions,
            status,
        }
    }

    /// Skipped names annotated with their state on the host
    fn audit_skip_list(&self, excluded: &[&str]) -> String {
        let annotated: Vec<String> = excluded
            .iter()
            .map(|name| {
                let state = match self.context.extensions.iter().find(|e| e.name == *name) {
                    Some(ext) if ext.enabled => "enabled",
                    Some(_) => "disabled",
                    None => "not loaded",
                };
                format!("{} ({})", name, state)
            })
            .collect();
        format!("[{}]", annotated.join(", "))
    }

    fn compress(&self, destination: &Path, entry_name: &str) -> ArchiveStatus {
        if !self.config.compress {
            return ArchiveStatus::NotRequested;
        }
        if !destination.is_dir() {
            tracing::warn!(entry = entry_name, "nothing was copied, skipping compression");
            return ArchiveStatus::NothingToArchive;
        }

        let archive = match compress_tree(destination, destination) {
            Ok(archive) => archive,
            Err(e) => {
                send_log(
                    LogLevel::Severe,
                    &format!("Failed to compress backup {}: {}", entry_name, e),
                    true,
                );
                return ArchiveStatus::Failed(e.to_string());
            }
        };

        match fs::remove_dir_all(destination) {
            Ok(()) => ArchiveStatus::Archived(archive),
            Err(e) => {
                send_log(
                    LogLevel::Warning,
                    &format!(
                        "Archived {} but could not remove the uncompressed copy: {}",
                        entry_name, e
                    ),
                    true,
                );
                ArchiveStatus::ArchivedSourceKept {
                    archive,
                    reason: e.to_string(),
                }
            }
        }
    }

    fn broadcast_failure(&self) {
        self.scheduler
            .schedule(failure_broadcast_task(self.messages.get("backupfailed")));
    }
}

/// Resolve `.` and `..` in `path` without touching the disk
fn normalize(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !normalized.pop() {
                    normalized.push(component);
                }
            }
            other => normalized.push(other),
        }
    }
    normalized
}

/// A run in progress on its worker thread
pub struct BackupHandle {
    handle: JoinHandle<RunOutcome>,
}

impl BackupHandle {
    /// Wait for the run to finish
    pub fn join(self) -> BackupResult<RunOutcome> {
        self.handle
            .join()
            .map_err(|_| BackupError::Worker("backup worker panicked".to_string()))
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

/// Start `orchestrator` on a dedicated worker thread
///
/// The caller must not start another run before this one finishes.
pub fn spawn_backup(
    orchestrator: BackupOrchestrator,
    mut worlds: WorldQueue,
) -> BackupResult<BackupHandle> {
    let handle = thread::Builder::new()
        .name("server-backup".to_string())
        .spawn(move || orchestrator.run(&mut worlds))
        .map_err(|e| BackupError::Worker(format!("failed to start backup worker: {}", e)))?;

    Ok(BackupHandle { handle })
}
