//! Backup CLI commands

use std::sync::Arc;

use chrono::{DateTime, Local, Utc};
use tabled::settings::Style;
use tabled::{Table, Tabled};

use super::console::{discover_worlds, ConsoleHost};
use super::CliContext;
use crate::backup::{
    entry_size, list_entries, prune, spawn_backup, ArchiveStatus, BackupContext,
    BackupOrchestrator, RunOutcome, UnitStatus, WorldQueue, DEFAULT_EXTENSIONS_DIR,
};
use crate::config::RunConfiguration;
use crate::error::BackupResult;
use crate::host::{Host, TaskQueue};
use crate::journal::{RunJournal, RunRecord};

/// Run one backup and wait for it
///
/// With no `worlds` given, every world directory under the server root is
/// queued.
pub fn handle_run(ctx: &CliContext, worlds: Vec<String>) -> BackupResult<RunOutcome> {
    let config = RunConfiguration::from_source(&ctx.settings);
    let host = ConsoleHost::new(ctx.server_root.join(DEFAULT_EXTENSIONS_DIR));

    let worlds = if worlds.is_empty() {
        discover_worlds(&ctx.server_root)
    } else {
        worlds
    };
    tracing::debug!(?worlds, "queued worlds");

    let queue = TaskQueue::new();
    let context = BackupContext::new(&ctx.server_root).with_extensions(host.loaded_extensions());
    let orchestrator = BackupOrchestrator::new(
        config,
        ctx.messages.clone(),
        context,
        Arc::new(queue.handle()),
    );

    let outcome = spawn_backup(orchestrator, WorldQueue::new(worlds))?.join()?;
    queue.run_pending(&host);

    print_outcome(&outcome);
    RunJournal::new(ctx.paths.journal_file()).record(&RunRecord::from(&outcome));

    Ok(outcome)
}

fn print_outcome(outcome: &RunOutcome) {
    println!("Backup {}", outcome.summary());
    println!("Location: {}", outcome.entry_path().display());

    for unit in &outcome.units {
        match &unit.status {
            UnitStatus::Succeeded(stats) => println!(
                "  ok      {} ({} files, {})",
                unit.unit,
                stats.files,
                format_size(stats.bytes)
            ),
            UnitStatus::Skipped(reason) => println!("  skipped {} ({})", unit.unit, reason),
            UnitStatus::Failed(reason) => println!("  FAILED  {}: {}", unit.unit, reason),
        }
    }

    match &outcome.archive {
        ArchiveStatus::Failed(reason) => println!("  FAILED  compression: {}", reason),
        ArchiveStatus::ArchivedSourceKept { reason, .. } => {
            println!("  warning uncompressed copy kept: {}", reason)
        }
        _ => {}
    }

    if !outcome.pruned.is_empty() {
        println!("Removed: {}", outcome.pruned.join(", "));
    }
}

#[derive(Tabled)]
struct EntryRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Kind")]
    kind: &'static str,
    #[tabled(rename = "Modified")]
    modified: String,
    #[tabled(rename = "Age")]
    age: String,
    #[tabled(rename = "Size")]
    size: String,
}

/// Print the backup entries, newest first
pub fn handle_list(ctx: &CliContext) -> BackupResult<()> {
    let root = ctx.output_root();
    let entries = list_entries(&root)?;

    if entries.is_empty() {
        println!("No backups found in {}.", root.display());
        println!("Create one with: server-backup run");
        return Ok(());
    }

    let now = Utc::now();
    let rows: Vec<EntryRow> = entries
        .iter()
        .map(|entry| EntryRow {
            name: entry.name.clone(),
            kind: if entry.is_archive { "archive" } else { "directory" },
            modified: entry
                .modified
                .with_timezone(&Local)
                .format("%Y-%m-%d %H:%M:%S")
                .to_string(),
            age: format_age(now, entry.modified),
            size: format_size(entry_size(entry)),
        })
        .collect();

    println!("{}", Table::new(rows).with(Style::rounded()));
    println!("Total: {} backup(s)", entries.len());
    Ok(())
}

/// Apply the retention count outside of a run
pub fn handle_prune(ctx: &CliContext, max: Option<usize>) -> BackupResult<Vec<String>> {
    let max = match max.or_else(|| usize::try_from(ctx.settings.max_backups).ok()) {
        Some(max) => max,
        None => {
            println!("Retention is disabled (maxbackups < 0); nothing pruned.");
            return Ok(Vec::new());
        }
    };

    let deleted = prune(&ctx.output_root(), max, &ctx.messages);
    if deleted.is_empty() {
        println!("No backups to prune (keeping {}).", max);
    } else {
        println!("Deleted {} backup(s): {}", deleted.len(), deleted.join(", "));
    }
    Ok(deleted)
}

#[derive(Tabled)]
struct RunRow {
    #[tabled(rename = "Started")]
    started: String,
    #[tabled(rename = "Entry")]
    entry: String,
    #[tabled(rename = "Archived")]
    archived: &'static str,
    #[tabled(rename = "Units")]
    units: usize,
    #[tabled(rename = "Failed")]
    failed: usize,
    #[tabled(rename = "Pruned")]
    pruned: usize,
}

/// Print the most recent journal records
pub fn handle_history(ctx: &CliContext, limit: usize) -> BackupResult<()> {
    let records = RunJournal::new(ctx.paths.journal_file()).read_recent(limit)?;

    if records.is_empty() {
        println!("No runs recorded yet.");
        return Ok(());
    }

    let rows: Vec<RunRow> = records
        .iter()
        .rev()
        .map(|record| RunRow {
            started: record
                .started_at
                .with_timezone(&Local)
                .format("%Y-%m-%d %H:%M:%S")
                .to_string(),
            entry: record.entry_name.clone(),
            archived: if record.archived { "yes" } else { "no" },
            units: record.units.len(),
            failed: record.failed_units(),
            pruned: record.pruned.len(),
        })
        .collect();

    println!("{}", Table::new(rows).with(Style::rounded()));
    Ok(())
}

/// Format the time elapsed since `then` in human-readable form
fn format_age(now: DateTime<Utc>, then: DateTime<Utc>) -> String {
    let minutes = now.signed_duration_since(then).num_minutes().max(0);

    if minutes < 60 {
        format!("{}m", minutes)
    } else if minutes < 60 * 24 {
        format!("{}h", minutes / 60)
    } else {
        format!("{}d", minutes / (60 * 24))
    }
}

/// Format a file size in human-readable form
fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.1} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(512), "512 B");
        assert_eq!(format_size(2048), "2.0 KB");
        assert_eq!(format_size(5 * 1024 * 1024), "5.0 MB");
    }

    #[test]
    fn test_format_age() {
        let now = Utc::now();
        assert_eq!(format_age(now, now - Duration::minutes(5)), "5m");
        assert_eq!(format_age(now, now - Duration::hours(3)), "3h");
        assert_eq!(format_age(now, now - Duration::days(2)), "2d");
        assert_eq!(format_age(now, now + Duration::minutes(1)), "0m");
    }
}
