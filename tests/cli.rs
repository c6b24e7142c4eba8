//! Command-line behaviour of the server-backup binary

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn cmd(server_root: &Path) -> Command {
    let mut cmd = Command::cargo_bin("server-backup").unwrap();
    cmd.env_remove("SERVER_BACKUP_HOME")
        .env_remove("SERVER_BACKUP_ROOT")
        .env_remove("RUST_LOG")
        .arg("--server-root")
        .arg(server_root);
    cmd
}

fn server() -> TempDir {
    let temp = TempDir::new().unwrap();
    fs::create_dir_all(temp.path().join("world")).unwrap();
    fs::write(temp.path().join("world/level.dat"), "overworld").unwrap();
    fs::create_dir_all(temp.path().join("plugins/Essentials")).unwrap();
    fs::write(temp.path().join("plugins/Essentials.jar"), "jar").unwrap();
    temp
}

#[test]
fn list_without_backups() {
    let temp = server();

    cmd(temp.path())
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("No backups found"));
}

#[test]
fn config_init_writes_defaults() {
    let temp = server();

    cmd(temp.path())
        .args(["config", "--init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Wrote settings"))
        .stdout(predicate::str::contains("maxbackups:       10"));

    let settings = fs::read_to_string(temp.path().join(".server-backup/config.json")).unwrap();
    assert!(settings.contains("\"backuppath\": \"backups\""));
    assert!(temp.path().join(".server-backup/messages.json").is_file());

    cmd(temp.path())
        .args(["config", "--init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("leaving them unchanged"));
}

#[test]
fn run_then_list_and_history() {
    let temp = server();

    cmd(temp.path())
        .arg("run")
        .assert()
        .success()
        .stdout(predicate::str::contains("2 succeeded, 0 failed"))
        .stdout(predicate::str::contains("[broadcast] Backup finished."));

    let entries: Vec<_> = fs::read_dir(temp.path().join("backups")).unwrap().collect();
    assert_eq!(entries.len(), 1);

    cmd(temp.path())
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("archive"))
        .stdout(predicate::str::contains("Total: 1 backup(s)"));

    cmd(temp.path())
        .arg("history")
        .assert()
        .success()
        .stdout(predicate::str::contains("Entry"));
}

#[test]
fn run_with_missing_world_fails() {
    let temp = server();

    cmd(temp.path())
        .args(["run", "--world", "world", "--world", "nowhere"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("FAILED  world 'nowhere'"));

    cmd(temp.path())
        .args(["history", "--limit", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Failed"));
}

#[test]
fn prune_keeps_newest() {
    let temp = server();
    let backups = temp.path().join("backups");
    for name in ["one", "two", "three"] {
        fs::create_dir_all(backups.join(name)).unwrap();
    }

    cmd(temp.path())
        .args(["prune", "--max", "3"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No backups to prune"));

    cmd(temp.path())
        .args(["prune", "--max", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Deleted 2 backup(s)"));

    assert_eq!(fs::read_dir(&backups).unwrap().count(), 1);
}
