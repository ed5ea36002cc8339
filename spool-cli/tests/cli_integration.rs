//! Integration tests for the spool CLI

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn spool() -> Command {
    Command::cargo_bin("spool").unwrap()
}

#[test]
fn chunk_short_text_is_a_single_unnumbered_chunk() {
    spool()
        .arg("chunk")
        .write_stdin("Just a short update.")
        .assert()
        .success()
        .stdout(predicate::str::contains("Just a short update."))
        .stdout(predicate::str::contains("1/1").not());
}

#[test]
fn chunk_long_text_numbers_the_chunks() {
    let text = "word ".repeat(200);
    spool()
        .arg("chunk")
        .write_stdin(text)
        .assert()
        .success()
        .stdout(predicate::str::contains(" 1/"));
}

#[test]
fn chunk_reads_files_and_emits_json() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("input.txt");
    fs::write(&path, "alpha beta gamma").unwrap();

    let output = spool()
        .arg("chunk")
        .arg(&path)
        .args(["--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let chunks: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let chunks = chunks.as_array().unwrap();
    assert_eq!(chunks.len(), 1);
    assert_eq!(chunks[0]["text"], "alpha beta gamma");
    assert_eq!(chunks[0]["character_count"], 16);
}

#[test]
fn chunk_respects_a_custom_separator() {
    spool()
        .arg("chunk")
        .args(["--limit", "9", "--separator", " | "])
        .write_stdin("alpha beta!")
        .assert()
        .success()
        .stdout(predicate::str::contains("alpha 1/2 | beta! 2/2"));
}

#[test]
fn chunk_rejects_a_bad_template() {
    spool()
        .arg("chunk")
        .args(["--template", "no placeholders"])
        .write_stdin("some text")
        .assert()
        .failure()
        .stderr(predicate::str::contains("numbering template"));
}

#[test]
fn validate_accepts_a_postable_thread() {
    spool()
        .arg("validate")
        .write_stdin("a perfectly reasonable thread")
        .assert()
        .success()
        .stdout(predicate::str::contains("ready to post"));
}

#[test]
fn validate_rejects_an_overlong_thread() {
    let text = "word ".repeat(400);
    spool()
        .arg("validate")
        .args(["--limit", "30"])
        .write_stdin(text)
        .assert()
        .failure()
        .stderr(predicate::str::contains("recommended maximum"));
}

#[test]
fn validate_rejects_empty_input() {
    spool()
        .arg("validate")
        .write_stdin("   ")
        .assert()
        .failure()
        .stderr(predicate::str::contains("no chunks to post"));
}

#[test]
fn post_refuses_to_run_without_confirmation() {
    spool()
        .arg("post")
        .env("SPOOL_CONSUMER_KEY", "k")
        .env("SPOOL_CONSUMER_SECRET", "s")
        .env("SPOOL_ACCESS_TOKEN", "t")
        .env("SPOOL_ACCESS_TOKEN_SECRET", "ts")
        .write_stdin("hello world")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--yes"));
}

#[test]
fn post_requires_credentials() {
    spool()
        .arg("post")
        .arg("--yes")
        .env_remove("SPOOL_CONSUMER_KEY")
        .env_remove("SPOOL_CONSUMER_SECRET")
        .env_remove("SPOOL_ACCESS_TOKEN")
        .env_remove("SPOOL_ACCESS_TOKEN_SECRET")
        .write_stdin("hello world")
        .assert()
        .failure()
        .stderr(predicate::str::contains("consumer-key"));
}
