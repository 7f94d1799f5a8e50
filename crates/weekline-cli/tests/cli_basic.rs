//! Basic CLI E2E tests.
//!
//! Tests invoke the built binary against temporary task and config files.

use std::path::Path;
use std::process::Command;

use tempfile::TempDir;

/// Run a CLI command and return (stdout, stderr, exit code).
fn run_cli(args: &[&str]) -> (String, String, i32) {
    let output = Command::new(env!("CARGO_BIN_EXE_weekline"))
        .args(args)
        .env("WEEKLINE_LOG", "off")
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (stdout, stderr, code)
}

const TASKS: &str = r#"[
    {"id": "A", "title": "Planning", "startDate": "2026-10-20T09:00:00Z", "endDate": "2026-10-20T10:00:00Z"},
    {"id": "B", "title": "Review", "start_date": "2026-10-20T09:30:00Z", "end_date": "2026-10-20T10:30:00Z"},
    {"id": "bad", "title": "Broken", "end": "not-a-date"}
]"#;

struct Fixture {
    dir: TempDir,
}

impl Fixture {
    fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("tasks.json"), TASKS).unwrap();
        Self { dir }
    }

    fn tasks(&self) -> String {
        self.dir.path().join("tasks.json").display().to_string()
    }

    fn config(&self) -> String {
        self.dir.path().join("config.toml").display().to_string()
    }

    fn read_tasks(&self) -> serde_json::Value {
        let raw = std::fs::read_to_string(Path::new(&self.tasks())).unwrap();
        serde_json::from_str(&raw).unwrap()
    }
}

#[test]
fn test_layout_text() {
    let fx = Fixture::new();
    let (stdout, _, code) = run_cli(&[
        "layout", "--tasks", &fx.tasks(), "--date", "2026-10-20", "--config", &fx.config(),
    ]);
    assert_eq!(code, 0, "layout failed");
    assert!(stdout.contains("Tue 2026-10-20  [2 columns]"));
    assert!(stdout.contains("09:00-10:00  col 0"));
    assert!(stdout.contains("09:30-10:30  col 1"));
    assert!(stdout.contains("skipped bad"));
}

#[test]
fn test_layout_json() {
    let fx = Fixture::new();
    let (stdout, _, code) = run_cli(&[
        "layout",
        "--tasks",
        &fx.tasks(),
        "--date",
        "2026-10-20",
        "--json",
        "--config",
        &fx.config(),
    ]);
    assert_eq!(code, 0, "layout --json failed");

    let parsed: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    let days = parsed["days"].as_array().unwrap();
    assert_eq!(days.len(), 7);
    assert_eq!(days[2]["date"], "2026-10-20");
    assert_eq!(days[2]["tasks"][1]["column"], 1);
    assert_eq!(parsed["dropped"][0]["task_id"], "bad");
}

#[test]
fn test_reschedule_persists() {
    let fx = Fixture::new();
    let (stdout, _, code) = run_cli(&[
        "reschedule", "--tasks", &fx.tasks(), "--task", "A", "--day", "2026-10-21", "--hour", "14",
        "--quarter", "1", "--config", &fx.config(),
    ]);
    assert_eq!(code, 0, "reschedule failed");

    let result: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(result["kind"], "reschedule");
    assert_eq!(result["interval"]["start"], "2026-10-21T14:15:00Z");

    let tasks = fx.read_tasks();
    assert_eq!(tasks[0]["start"], "2026-10-21T14:15:00+00:00");
    assert_eq!(tasks[0]["end"], "2026-10-21T15:15:00+00:00");
}

#[test]
fn test_resize_dry_run_leaves_file_untouched() {
    let fx = Fixture::new();
    let before = fx.read_tasks();
    let (stdout, _, code) = run_cli(&[
        "resize", "--tasks", &fx.tasks(), "--task", "A", "--edge", "end", "--pixels", "-50",
        "--dry-run", "--config", &fx.config(),
    ]);
    assert_eq!(code, 0, "resize failed");

    let result: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(result["kind"], "resize");
    assert_eq!(result["interval"]["end"], "2026-10-20T09:15:00Z");
    assert_eq!(fx.read_tasks(), before);
}

#[test]
fn test_resize_huge_delta_is_bounded() {
    let fx = Fixture::new();
    let (stdout, _, code) = run_cli(&[
        "resize", "--tasks", &fx.tasks(), "--task", "A", "--edge", "end", "--pixels", "1e20",
        "--dry-run", "--config", &fx.config(),
    ]);
    assert_eq!(code, 0, "resize failed");

    let result: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(result["interval"]["end"], "2026-10-21T10:00:00Z");
}

#[test]
fn test_unknown_task_fails() {
    let fx = Fixture::new();
    let (_, stderr, code) = run_cli(&[
        "resize", "--tasks", &fx.tasks(), "--task", "nope", "--edge", "start", "--pixels", "15",
        "--config", &fx.config(),
    ]);
    assert_ne!(code, 0);
    assert!(stderr.contains("Task not found: nope"));
}

#[test]
fn test_config_set_and_get() {
    let fx = Fixture::new();
    let config = fx.config();
    let (_, _, code) =
        run_cli(&["config", "set", "grid.hour_height_px", "48", "--config", &config]);
    assert_eq!(code, 0, "config set failed");

    let (stdout, _, code) = run_cli(&["config", "get", "grid.hour_height_px", "--config", &config]);
    assert_eq!(code, 0, "config get failed");
    assert_eq!(stdout.trim(), "48.0");

    let (_, _, code) = run_cli(&["config", "set", "grid.quarter_count", "0", "--config", &config]);
    assert_ne!(code, 0);
}
