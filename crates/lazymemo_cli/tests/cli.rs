//! End-to-end tests for the `lazymemo` binary.

use assert_cmd::Command;
use predicates::prelude::*;
use std::path::Path;

const CONFIG_VARS: &[&str] = &[
    "DB_HOST",
    "DB_USER",
    "DB_PASSWORD",
    "DB_NAME",
    "DB_TIMEOUT_MS",
    "LAZYMEMO_LOG_LEVEL",
    "LAZYMEMO_LOG_DIR",
];

fn lazymemo(data_dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("lazymemo").unwrap();
    for var in CONFIG_VARS {
        cmd.env_remove(var);
    }
    cmd.current_dir(data_dir).env("DB_DATA_DIR", data_dir);
    cmd
}

#[test]
fn help_lists_commands() {
    let dir = tempfile::tempdir().unwrap();
    lazymemo(dir.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("add").and(predicate::str::contains("rm")));
}

#[test]
fn init_creates_database_file() {
    let dir = tempfile::tempdir().unwrap();
    lazymemo(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Schema ready"));

    assert!(dir.path().join("test_db.sqlite3").exists());
}

#[test]
fn list_on_fresh_store_prints_no_memos() {
    let dir = tempfile::tempdir().unwrap();
    lazymemo(dir.path())
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("No memos."));
}

#[test]
fn add_show_edit_rm_flow() {
    let dir = tempfile::tempdir().unwrap();

    lazymemo(dir.path())
        .args(["add", "--title", "Groceries", "--content", "Milk, eggs"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created memo 1"));

    lazymemo(dir.path())
        .args(["--json", "show", "1"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("\"title\": \"Groceries\"")
                .and(predicate::str::contains("\"create_date\": null")),
        );

    lazymemo(dir.path())
        .args([
            "edit",
            "1",
            "--title",
            "Groceries v2",
            "--content",
            "Milk, eggs, bread",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Updated memo 1"));

    lazymemo(dir.path())
        .args(["show", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Groceries v2").and(predicate::str::contains("bread")));

    lazymemo(dir.path())
        .args(["rm", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Deleted memo 1"));

    lazymemo(dir.path()).args(["rm", "1"]).assert().code(3);
}

#[test]
fn add_with_date_is_listed_with_date() {
    let dir = tempfile::tempdir().unwrap();

    lazymemo(dir.path())
        .args(["add", "-t", "Trip", "-c", "Pack charger", "--date", "2024-03-01"])
        .assert()
        .success();

    lazymemo(dir.path())
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("1\t2024-03-01\tTrip"));
}

#[test]
fn find_by_title_matches_exactly() {
    let dir = tempfile::tempdir().unwrap();
    for title in ["daily", "daily log"] {
        lazymemo(dir.path())
            .args(["add", "--title", title, "--content", "x"])
            .assert()
            .success();
    }

    lazymemo(dir.path())
        .args(["find", "--title", "daily"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("1\t-\tdaily\n")
                .and(predicate::str::contains("daily log").not()),
        );
}

#[test]
fn blank_title_is_a_bad_request() {
    let dir = tempfile::tempdir().unwrap();
    lazymemo(dir.path())
        .args(["add", "--title", "  ", "--content", "body"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("title must not be empty"));
}

#[test]
fn missing_memo_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    lazymemo(dir.path()).args(["show", "42"]).assert().code(3);
    lazymemo(dir.path()).args(["rm", "42"]).assert().code(3);
}

#[test]
fn edit_of_missing_memo_succeeds_with_warning() {
    let dir = tempfile::tempdir().unwrap();
    lazymemo(dir.path())
        .args(["edit", "42", "--title", "t", "--content", "c"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Updated memo 42"))
        .stderr(predicate::str::contains("no_row_matched"));

    lazymemo(dir.path()).args(["show", "42"]).assert().code(3);
}

#[test]
fn edit_with_json_reports_update_flag() {
    let dir = tempfile::tempdir().unwrap();
    lazymemo(dir.path())
        .args(["add", "--title", "Groceries", "--content", "Milk"])
        .assert()
        .success();

    lazymemo(dir.path())
        .args(["--json", "edit", "1", "-t", "Groceries v2", "-c", "Milk, bread"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"updated\": true"));
}

#[test]
fn malformed_env_file_aborts_startup() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join(".env"),
        "DB_NAME=prod_memos\nDB_PASSWORD='unterminated\n",
    )
    .unwrap();

    lazymemo(dir.path())
        .arg("list")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("invalid configuration"));

    assert!(!dir.path().join("prod_memos.sqlite3").exists());
}

#[test]
fn remote_host_aborts_startup() {
    let dir = tempfile::tempdir().unwrap();
    lazymemo(dir.path())
        .env("DB_HOST", "db.internal")
        .arg("list")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("schema initialization failed"));
}
