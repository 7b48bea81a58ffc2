//! End-to-end CLI tests against a throwaway data root.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn crst(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("crst").unwrap();
    cmd.env("CRST_HOME", home.path());
    cmd
}

#[test]
fn question_is_recorded_and_uuid_printed() {
    let home = TempDir::new().unwrap();

    crst(&home)
        .args(["question", "What is ownership?"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Question recorded"));

    let csv = std::fs::read_to_string(home.path().join("questions/questions.csv")).unwrap();
    assert!(csv.starts_with("uuid,timestamp,username,content,session_uuid\n"));
    assert!(csv.contains("What is ownership?"));
}

#[test]
fn empty_content_is_rejected() {
    let home = TempDir::new().unwrap();

    crst(&home)
        .args(["question", "   "])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot be empty"));
}

#[test]
fn thought_with_tags_round_trips() {
    let home = TempDir::new().unwrap();

    crst(&home)
        .args(["thought", "Lifetimes name borrows", "--tags", "rust,borrowing"])
        .assert()
        .success()
        .stdout(predicate::str::contains("rust, borrowing"));

    let csv = std::fs::read_to_string(home.path().join("thoughts/thoughts.csv")).unwrap();
    assert!(csv.contains("\"rust,borrowing\""));
}

#[test]
fn answer_rejects_malformed_question_uuid() {
    let home = TempDir::new().unwrap();

    crst(&home)
        .args(["answer", "It moves.", "--question-uuid", "nonsense"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid question UUID"));
}

#[test]
fn backup_create_and_list() {
    let home = TempDir::new().unwrap();

    crst(&home)
        .args(["question", "Persist me"])
        .assert()
        .success();

    crst(&home)
        .args(["backup", "create", "--name", "first"])
        .assert()
        .success()
        .stdout(predicate::str::contains("first.zip"));

    crst(&home)
        .args(["backup", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("first"));

    crst(&home)
        .args(["backup", "create", "--name", "first"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn backup_restore_by_name() {
    let home = TempDir::new().unwrap();

    crst(&home)
        .args(["question", "Before backup"])
        .assert()
        .success();
    crst(&home)
        .args(["backup", "create", "--name", "snap"])
        .assert()
        .success();
    crst(&home)
        .args(["question", "After backup"])
        .assert()
        .success();

    crst(&home)
        .args(["backup", "restore", "snap"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Restored from"));

    let csv = std::fs::read_to_string(home.path().join("questions/questions.csv")).unwrap();
    assert!(csv.contains("Before backup"));
    assert!(!csv.contains("After backup"));
}

#[test]
fn default_config_is_written_on_first_run() {
    let home = TempDir::new().unwrap();

    crst(&home).args(["backup", "list"]).assert().success();

    let config = std::fs::read_to_string(home.path().join("config.yaml")).unwrap();
    assert!(config.contains("ai:"));
    assert!(config.contains("search:"));
}
