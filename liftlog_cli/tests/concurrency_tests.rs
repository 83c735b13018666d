//! Concurrency tests for the liftlog binary.
//!
//! These tests verify that multiple processes can safely:
//! - Log different workouts into the same data directory at once
//! - Delete and log workouts side by side without losing rows

use assert_cmd::Command;
use std::fs;
use std::path::{Path, PathBuf};
use std::thread;
use tempfile::TempDir;

fn setup_test_dir() -> TempDir {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let data_dir = temp_dir.path().join("data");
    let config = format!(
        "[data]\ndata_dir = {:?}\n\n[program]\nkind = \"linear\"\n",
        data_dir.display().to_string()
    );
    fs::write(temp_dir.path().join("config.toml"), config).expect("Failed to write config");
    temp_dir
}

fn cli(dir: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("liftlog"));
    cmd.arg("--config").arg(dir.join("config.toml"));
    cmd
}

fn stored_ids(dir: &Path) -> Vec<String> {
    let contents = fs::read_to_string(dir.join("data").join("completed_workouts.json"))
        .expect("Failed to read workouts");
    let rows: Vec<serde_json::Value> =
        serde_json::from_str(&contents).expect("Workouts file is not JSON");
    rows.iter()
        .map(|r| r["id"].as_str().unwrap_or_default().to_string())
        .collect()
}

fn log_weeks(dir: PathBuf, day: &'static str, weeks: std::ops::RangeInclusive<u32>) {
    for week in weeks {
        cli(&dir)
            .args(["log", day, "--week", &week.to_string(), "face-pull:15@20"])
            .assert()
            .success();
    }
}

#[test]
fn test_concurrent_workout_logging() {
    let temp_dir = setup_test_dir();
    let dir = temp_dir.path().to_path_buf();

    let handles: Vec<_> = ["1", "2", "3"]
        .into_iter()
        .map(|day| {
            let dir = dir.clone();
            thread::spawn(move || log_weeks(dir, day, 1..=6))
        })
        .collect();
    for handle in handles {
        handle.join().expect("Logging thread panicked");
    }

    let mut ids = stored_ids(&dir);
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), 18, "Expected 18 workouts, got {:?}", ids);
}

#[test]
fn test_concurrent_reset_and_logging() {
    let temp_dir = setup_test_dir();
    let dir = temp_dir.path().to_path_buf();
    log_weeks(dir.clone(), "1", 1..=5);

    let resetter = {
        let dir = dir.clone();
        thread::spawn(move || {
            for week in 1..=5 {
                cli(&dir)
                    .args(["reset", "1", "--week", &week.to_string()])
                    .assert()
                    .success();
            }
        })
    };
    let logger = {
        let dir = dir.clone();
        thread::spawn(move || log_weeks(dir, "2", 1..=5))
    };
    resetter.join().expect("Reset thread panicked");
    logger.join().expect("Logging thread panicked");

    let ids = stored_ids(&dir);
    assert_eq!(ids.len(), 5, "Expected 5 workouts, got {:?}", ids);
    assert!(ids.iter().all(|id| id.ends_with("-day-2")));
}
