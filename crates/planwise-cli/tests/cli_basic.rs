//! Basic CLI E2E tests.
//!
//! Tests invoke the built binary with PLANWISE_DATA_DIR pointing at a
//! fresh temporary directory, so they never touch real user data.

use std::path::Path;
use std::process::Command;

/// Run a CLI command and return (stdout, stderr, exit code).
fn run_cli(data_dir: &Path, args: &[&str]) -> (String, String, i32) {
    let output = Command::new(env!("CARGO_BIN_EXE_planwise"))
        .args(args)
        .env("PLANWISE_DATA_DIR", data_dir)
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (stdout, stderr, code)
}

fn run_ok(data_dir: &Path, args: &[&str]) -> String {
    let (stdout, stderr, code) = run_cli(data_dir, args);
    assert_eq!(code, 0, "{args:?} failed: {stderr}");
    stdout
}

fn run_json(data_dir: &Path, args: &[&str]) -> serde_json::Value {
    let stdout = run_ok(data_dir, args);
    serde_json::from_str(&stdout).expect("Failed to parse JSON output")
}

fn today() -> chrono::NaiveDate {
    chrono::Local::now().date_naive()
}

#[test]
fn test_task_lifecycle() {
    let dir = tempfile::tempdir().unwrap();
    let data = dir.path();

    let out = run_ok(
        data,
        &[
            "task", "add", "Buy milk", "--category", "Personal", "--date", "2030-05-04",
            "--time", "18:30", "--reminder", "15m", "--subtask", "Check fridge",
        ],
    );
    assert!(out.contains("Task created:"));

    let tasks = run_json(data, &["task", "list", "--json"]);
    let tasks = tasks.as_array().unwrap();
    assert_eq!(tasks.len(), 1);
    let id = tasks[0]["id"].as_str().unwrap().to_string();
    assert_eq!(tasks[0]["title"], "Buy milk");
    assert_eq!(tasks[0]["priority"], "medium");
    assert_eq!(tasks[0]["subtasks"][0]["title"], "Check fridge");
    assert!(tasks[0]["reminderTime"].is_string());

    run_ok(data, &["task", "done", &id]);
    let task = run_json(data, &["task", "get", &id]);
    assert_eq!(task["isCompleted"], true);

    let hits = run_json(data, &["task", "search", "MILK", "--json"]);
    assert_eq!(hits.as_array().unwrap().len(), 1);

    run_ok(data, &["task", "update", &id, "--title", "Buy oat milk"]);
    let task = run_json(data, &["task", "get", &id]);
    assert_eq!(task["title"], "Buy oat milk");

    run_ok(data, &["task", "delete", &id]);
    let (_, stderr, code) = run_cli(data, &["task", "get", &id]);
    assert_eq!(code, 1);
    assert!(stderr.contains("not found"));
}

#[test]
fn test_task_add_rejects_bad_input() {
    let dir = tempfile::tempdir().unwrap();
    let (_, _, code) = run_cli(dir.path(), &["task", "add", "X", "--date", "tomorrow"]);
    assert_ne!(code, 0);
    let (_, _, code) = run_cli(
        dir.path(),
        &["task", "add", "X", "--date", "2030-01-01", "--priority", "urgent"],
    );
    assert_ne!(code, 0);
}

#[test]
fn test_routine_create_and_remove() {
    let dir = tempfile::tempdir().unwrap();
    let data = dir.path();
    let start = today().format("%Y-%m-%d").to_string();
    let until = (today() + chrono::Days::new(4)).format("%Y-%m-%d").to_string();

    let out = run_ok(
        data,
        &[
            "routine", "create", "Stretch", "--repeat", "daily", "--date", &start,
            "--until", &until, "--time", "07:00", "--subtask", "Hamstrings",
        ],
    );
    assert!(out.contains("5 instances"), "unexpected output: {out}");

    let tasks = run_json(data, &["task", "list", "--json"]);
    let tasks = tasks.as_array().unwrap();
    assert_eq!(tasks.len(), 5);
    let routine_id = tasks[0]["routineId"].as_str().unwrap().to_string();
    assert!(tasks.iter().all(|t| t["routineId"] == routine_id.as_str()));
    assert!(tasks.iter().all(|t| t["subtasks"][0]["title"] == "Hamstrings"));
    assert_ne!(tasks[0]["subtasks"][0]["id"], tasks[1]["subtasks"][0]["id"]);

    run_ok(data, &["routine", "remove", &routine_id]);
    let tasks = run_json(data, &["task", "list", "--json"]);
    assert!(tasks.as_array().unwrap().is_empty());
}

#[test]
fn test_routine_rejects_short_interval() {
    let dir = tempfile::tempdir().unwrap();
    let start = today().format("%Y-%m-%d").to_string();
    let (_, stderr, code) = run_cli(
        dir.path(),
        &["routine", "create", "Water", "--repeat", "interval", "--every", "1", "--date", &start],
    );
    assert_eq!(code, 1);
    assert!(stderr.contains("Invalid recurrence rule"));
}

#[test]
fn test_suggest_and_accept() {
    let dir = tempfile::tempdir().unwrap();
    let data = dir.path();

    // With no history, "no recent health activity" always fires.
    let suggestions = run_json(data, &["suggest", "--json"]);
    let suggestions = suggestions.as_array().unwrap();
    assert!(!suggestions.is_empty() && suggestions.len() <= 5);
    assert!(suggestions
        .iter()
        .any(|s| s["title"] == "Workout / Walk"));

    let accepted = run_json(data, &["suggest", "--accept", "1", "--json"]);
    assert_eq!(accepted.as_array().unwrap().len(), 1);
    let tasks = run_json(data, &["task", "list", "--json"]);
    assert_eq!(tasks.as_array().unwrap().len(), 1);
    assert_eq!(tasks[0]["priority"], "medium");

    let (_, _, code) = run_cli(data, &["suggest", "--accept", "9"]);
    assert_eq!(code, 1);
}

#[test]
fn test_category_commands() {
    let dir = tempfile::tempdir().unwrap();
    let data = dir.path();

    let categories = run_json(data, &["category", "list", "--json"]);
    assert_eq!(categories.as_array().unwrap().len(), 5);

    run_ok(data, &["category", "add", "Errands"]);
    let categories = run_json(data, &["category", "list", "--json"]);
    let categories = categories.as_array().unwrap();
    assert_eq!(categories.len(), 6);
    let errands = categories
        .iter()
        .find(|c| c["label"] == "Errands")
        .unwrap();
    let id = errands["id"].as_str().unwrap().to_string();

    run_ok(data, &["category", "delete", &id]);
    let (_, _, code) = run_cli(data, &["category", "delete", &id]);
    assert_eq!(code, 1);
}

#[test]
fn test_stats_json() {
    let dir = tempfile::tempdir().unwrap();
    let data = dir.path();
    let start = today().format("%Y-%m-%d").to_string();
    run_ok(data, &["task", "add", "Report", "--category", "Work", "--date", &start]);

    let stats = run_json(data, &["stats", "--json"]);
    assert_eq!(stats["completion"]["total"], 1);
    assert_eq!(stats["completion"]["rate"], 0);
    assert_eq!(stats["week"].as_array().unwrap().len(), 7);
    assert_eq!(stats["by_category"][0]["label"], "Work");
}

#[test]
fn test_remind_is_quiet_without_due_reminders() {
    let dir = tempfile::tempdir().unwrap();
    let out = run_ok(dir.path(), &["remind"]);
    assert!(out.is_empty());
}

#[test]
fn test_config_get_set() {
    let dir = tempfile::tempdir().unwrap();
    let data = dir.path();

    assert_eq!(run_ok(data, &["config", "get", "routine.horizon_months"]).trim(), "3");
    run_ok(data, &["config", "set", "routine.horizon_months", "6"]);
    assert_eq!(run_ok(data, &["config", "get", "routine.horizon_months"]).trim(), "6");

    let listing = run_ok(data, &["config", "list"]);
    assert!(listing.contains("suggestions.social_category = Social"));

    let (_, stderr, code) = run_cli(data, &["config", "set", "routine.nope", "1"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("Unknown configuration key"));
    assert!(data.join("config.toml").exists());
}

#[test]
fn test_note_commands() {
    let dir = tempfile::tempdir().unwrap();
    let data = dir.path();

    let out = run_ok(data, &["note", "add", "Groceries", "--content", "oat milk"]);
    assert!(out.contains("Note created:"));
    run_ok(data, &["note", "add", "", "--content", "call the plumber"]);
    let (_, _, code) = run_cli(data, &["note", "add", " "]);
    assert_eq!(code, 1);

    let notes = run_json(data, &["note", "list", "--json"]);
    assert_eq!(notes.as_array().unwrap().len(), 2);

    let hits = run_json(data, &["note", "list", "--search", "MILK", "--json"]);
    let hits = hits.as_array().unwrap();
    assert_eq!(hits.len(), 1);
    let id = hits[0]["id"].as_str().unwrap().to_string();
    assert!(hits[0]["updatedAt"].is_string());

    let listing = run_ok(data, &["note", "list"]);
    assert!(listing.contains("Untitled Note"));

    run_ok(data, &["note", "update", &id, "--content", "oat milk, bread"]);
    let note = run_json(data, &["note", "get", &id]);
    assert_eq!(note["title"], "Groceries");
    assert_eq!(note["content"], "oat milk, bread");

    run_ok(data, &["note", "delete", &id]);
    let (_, stderr, code) = run_cli(data, &["note", "get", &id]);
    assert_eq!(code, 1);
    assert!(stderr.contains("not found"));
}
