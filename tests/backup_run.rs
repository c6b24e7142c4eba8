//! End-to-end runs of the backup engine against a scratch server directory

use std::fs::{self, File};
use std::io::Read;
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::{Duration, SystemTime};

use server_backup::backup::{
    list_candidates, matches_fallback_shape, spawn_backup, ArchiveStatus, BackupContext,
    BackupOrchestrator, UnitKind, UnitStatus, WorldQueue, AUTOSAVE_ON_COMMAND,
};
use server_backup::config::{RunConfiguration, Settings};
use server_backup::host::{ExtensionStatus, Host, TaskQueue};
use server_backup::messages::Messages;
use tempfile::TempDir;
use zip::ZipArchive;

#[derive(Default)]
struct TestHost {
    broadcasts: Mutex<Vec<String>>,
    commands: Mutex<Vec<String>>,
}

impl Host for TestHost {
    fn online_users(&self) -> Vec<String> {
        Vec::new()
    }

    fn has_permission(&self, _user: &str, _node: &str) -> bool {
        false
    }

    fn send_message(&self, _user: &str, _message: &str) {}

    fn broadcast(&self, message: &str) {
        self.broadcasts.lock().unwrap().push(message.to_string());
    }

    fn dispatch_command(&self, command: &str) {
        self.commands.lock().unwrap().push(command.to_string());
    }

    fn has_permission_system(&self) -> bool {
        false
    }

    fn loaded_extensions(&self) -> Vec<ExtensionStatus> {
        vec![
            ExtensionStatus::new("Essentials", true),
            ExtensionStatus::new("secretPlugin", false),
        ]
    }
}

fn write(path: &Path, contents: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

fn set_mtime(path: &Path, seconds_since_epoch: u64) {
    File::options()
        .write(true)
        .open(path)
        .unwrap()
        .set_modified(SystemTime::UNIX_EPOCH + Duration::from_secs(seconds_since_epoch))
        .unwrap();
}

fn server() -> TempDir {
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    write(&root.join("world/level.dat"), "overworld");
    write(&root.join("world/region/r.0.0.mca"), "overworld chunks");
    write(&root.join("world_nether/level.dat"), "nether");
    write(&root.join("world_nether/DIM-1/region/r.0.0.mca"), "nether chunks");
    write(&root.join("plugins/Essentials/config.yml"), "motd: hi");
    write(&root.join("plugins/secretPlugin/secret.txt"), "hunter2");
    write(&root.join("server.properties"), "level-name=world");
    temp
}

fn settings() -> Settings {
    Settings {
        zip_backup: true,
        backup_worlds: true,
        backup_plugins: true,
        backup_everything: false,
        skip_plugins: "secretPlugin;".to_string(),
        max_backups: 2,
        ..Settings::default()
    }
}

fn orchestrator(
    root: &Path,
    settings: &Settings,
    queue: &TaskQueue,
    host: &TestHost,
) -> BackupOrchestrator {
    BackupOrchestrator::new(
        RunConfiguration::from_source(settings),
        Messages::default(),
        BackupContext::new(root).with_extensions(host.loaded_extensions()),
        Arc::new(queue.handle()),
    )
}

fn read_entry(archive: &mut ZipArchive<File>, name: &str) -> String {
    let mut contents = String::new();
    archive
        .by_name(name)
        .unwrap()
        .read_to_string(&mut contents)
        .unwrap();
    contents
}

#[test]
fn selective_zip_run_with_retention() {
    let temp = server();
    let root = temp.path();
    let backups = root.join("backups");
    write(&backups.join("01012020-000000.zip"), "oldest");
    write(&backups.join("02012020-000000.zip"), "older");
    set_mtime(&backups.join("01012020-000000.zip"), 1_577_836_800);
    set_mtime(&backups.join("02012020-000000.zip"), 1_577_923_200);

    let host = TestHost::default();
    let queue = TaskQueue::new();
    let orchestrator = orchestrator(root, &settings(), &queue, &host);

    let handle = spawn_backup(orchestrator, WorldQueue::new(["world", "world_nether"])).unwrap();
    let outcome = handle.join().unwrap();

    assert!(outcome.is_success(), "{:?}", outcome);
    assert!(outcome.remaining_worlds.is_empty());
    assert!(matches!(
        outcome.status_of(&UnitKind::World("world_nether".into())),
        Some(UnitStatus::Succeeded(_))
    ));

    let archive_path = match &outcome.archive {
        ArchiveStatus::Archived(path) => path.clone(),
        other => panic!("expected an archive, got {:?}", other),
    };
    assert_eq!(
        archive_path.file_name().unwrap().to_string_lossy(),
        format!("{}.zip", outcome.entry_name)
    );
    assert!(!outcome.destination.exists());

    let mut archive = ZipArchive::new(File::open(&archive_path).unwrap()).unwrap();
    assert_eq!(read_entry(&mut archive, "world/region/r.0.0.mca"), "overworld chunks");
    assert_eq!(
        read_entry(&mut archive, "world_nether/DIM-1/region/r.0.0.mca"),
        "nether chunks"
    );
    assert_eq!(read_entry(&mut archive, "extensions/Essentials/config.yml"), "motd: hi");
    let names: Vec<String> = archive.file_names().map(str::to_string).collect();
    assert!(!names.iter().any(|n| n.contains("secretPlugin")));
    assert!(!names.iter().any(|n| n.contains("server.properties")));

    assert_eq!(outcome.pruned, vec!["01012020-000000.zip"]);
    let remaining: Vec<String> = list_candidates(&backups)
        .unwrap()
        .into_iter()
        .map(|e| e.name)
        .collect();
    assert_eq!(remaining.len(), 2);
    assert!(remaining.contains(&"02012020-000000.zip".to_string()));

    // Completion runs only once the host drains its queue
    assert!(host.commands.lock().unwrap().is_empty());
    assert_eq!(queue.run_pending(&host), 1);
    assert_eq!(*host.commands.lock().unwrap(), vec![AUTOSAVE_ON_COMMAND]);
    assert_eq!(
        *host.broadcasts.lock().unwrap(),
        vec![Messages::default().get("backupfinished")]
    );
}

#[test]
fn invalid_date_format_falls_back() {
    let temp = server();
    let host = TestHost::default();
    let queue = TaskQueue::new();
    let settings = Settings {
        zip_backup: false,
        date_format: "%Y/%Q".to_string(),
        max_backups: -1,
        ..Settings::default()
    };

    let orchestrator = orchestrator(temp.path(), &settings, &queue, &host);
    let mut worlds = WorldQueue::new(["world"]);
    let outcome = orchestrator.run(&mut worlds);

    assert!(outcome.used_fallback_name);
    assert!(matches_fallback_shape(&outcome.entry_name));
    assert!(outcome.destination.join("world/level.dat").is_file());
    assert!(worlds.is_empty());
}

#[test]
fn disabled_units_are_skipped_and_pruning_disabled() {
    let temp = server();
    let backups = temp.path().join("backups");
    for name in ["a", "b", "c"] {
        fs::create_dir_all(backups.join(name)).unwrap();
    }
    let host = TestHost::default();
    let queue = TaskQueue::new();
    let settings = Settings {
        zip_backup: true,
        backup_worlds: false,
        backup_plugins: false,
        max_backups: -1,
        enable_autosave: false,
        ..Settings::default()
    };

    let orchestrator = orchestrator(temp.path(), &settings, &queue, &host);
    let outcome = orchestrator.run(&mut WorldQueue::new(["world"]));

    assert!(outcome.is_success());
    assert_eq!(outcome.archive, ArchiveStatus::NothingToArchive);
    assert!(outcome.pruned.is_empty());
    assert_eq!(outcome.remaining_worlds, vec!["world"]);
    assert_eq!(list_candidates(&backups).unwrap().len(), 3);

    queue.run_pending(&host);
    assert!(host.commands.lock().unwrap().is_empty());
}

#[test]
fn full_backup_archive_mirrors_server() {
    let temp = server();
    let host = TestHost::default();
    let queue = TaskQueue::new();
    let settings = Settings {
        backup_everything: true,
        ..Settings::default()
    };

    let orchestrator = orchestrator(temp.path(), &settings, &queue, &host);
    let outcome = orchestrator.run(&mut WorldQueue::default());

    assert!(outcome.is_success(), "{:?}", outcome);
    let mut archive = ZipArchive::new(File::open(outcome.entry_path()).unwrap()).unwrap();
    assert_eq!(read_entry(&mut archive, "server.properties"), "level-name=world");
    assert_eq!(read_entry(&mut archive, "plugins/secretPlugin/secret.txt"), "hunter2");
    assert!(!archive.file_names().any(|n| n.starts_with("backups")));
}
