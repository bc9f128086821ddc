//! Integration tests for the Conductor CLI

use assert_cmd::cargo;
use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Get a Command for the conductor binary
fn conductor() -> Command {
    Command::new(cargo::cargo_bin!("conductor"))
}

/// Run `setup` in a fresh temp project
fn set_up_project() -> TempDir {
    let temp = TempDir::new().unwrap();
    conductor()
        .arg("--project")
        .arg(temp.path())
        .arg("setup")
        .assert()
        .success();
    temp
}

/// Id of the only track directory in the project
fn only_track_id(project: &Path) -> String {
    let entries: Vec<_> = fs::read_dir(project.join("conductor/tracks"))
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
        .collect();
    assert_eq!(entries.len(), 1);
    entries[0].clone()
}

#[test]
fn test_help() {
    conductor()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("context-driven development"));
}

#[test]
fn test_version() {
    conductor()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("0.1.0"));
}

#[test]
fn test_setup_creates_structure() {
    let temp = TempDir::new().unwrap();

    conductor()
        .arg("--project")
        .arg(temp.path())
        .arg("setup")
        .assert()
        .success()
        .stdout(predicate::str::contains("greenfield"))
        .stdout(predicate::str::contains("Conductor is set up"));

    assert!(temp.path().join("conductor/product.md").exists());
    assert!(temp.path().join("conductor/tech-stack.md").exists());
    assert!(temp.path().join("conductor/workflow.md").exists());
    assert!(temp.path().join("conductor/tracks.md").exists());
    assert!(temp.path().join("conductor/code_styleguides").is_dir());
    assert!(temp.path().join("conductor/archive").is_dir());

    let state = fs::read_to_string(temp.path().join("conductor/setup_state.json")).unwrap();
    assert!(state.contains("last_successful_step"));
}

#[test]
fn test_setup_keeps_existing_documents() {
    let temp = TempDir::new().unwrap();
    fs::create_dir_all(temp.path().join("conductor")).unwrap();
    fs::write(temp.path().join("conductor/product.md"), "# My product\n").unwrap();
    fs::write(temp.path().join("Cargo.toml"), "[package]\n").unwrap();

    conductor()
        .arg("--project")
        .arg(temp.path())
        .arg("setup")
        .assert()
        .success()
        .stdout(predicate::str::contains("brownfield"));

    let product = fs::read_to_string(temp.path().join("conductor/product.md")).unwrap();
    assert_eq!(product, "# My product\n");
}

#[test]
fn test_status_before_setup() {
    let temp = TempDir::new().unwrap();

    conductor()
        .arg("--project")
        .arg(temp.path())
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("not set up"));
}

#[test]
fn test_status_json_counts_tracks() {
    let temp = set_up_project();
    let tracks = "# Project Tracks\n\n---\n\n## [~] Track: Login\n\n---\n\n## [x] Track: Dark mode\n";
    fs::write(temp.path().join("conductor/tracks.md"), tracks).unwrap();

    let output = conductor()
        .arg("--project")
        .arg(temp.path())
        .arg("status")
        .arg("--json")
        .output()
        .unwrap();
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["setup_complete"], true);
    assert_eq!(report["tracks"]["total"], 2);
    assert_eq!(report["tracks"]["in_progress"], 1);
    assert_eq!(report["tracks"]["completed"], 1);
    assert_eq!(report["tracks"]["pending"], 0);
    assert_eq!(report["current_track"]["description"], "Login");
}

#[test]
fn test_new_track_and_list() {
    let temp = set_up_project();

    conductor()
        .arg("--project")
        .arg(temp.path())
        .args(["new-track", "User login page", "--type", "feature"])
        .args(["--phase", "Phase 1: Tests"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created track"))
        .stdout(predicate::str::contains("user_login_page_"));

    let track_id = only_track_id(temp.path());
    let track_dir = temp.path().join("conductor/tracks").join(&track_id);
    assert!(track_dir.join("metadata.json").exists());
    assert!(track_dir.join("spec.md").exists());
    assert!(track_dir.join("plan.md").exists());

    conductor()
        .arg("--project")
        .arg(temp.path())
        .args(["tracks", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"description\": \"User login page\""))
        .stdout(predicate::str::contains("\"status\": \"pending\""));

    conductor()
        .arg("--project")
        .arg(temp.path())
        .args(["next-task", &track_id])
        .assert()
        .success()
        .stdout(predicate::str::contains("User Manual Verification 'Phase 1: Tests'"));
}

#[test]
fn test_track_status_updates_document() {
    let temp = set_up_project();
    conductor()
        .arg("--project")
        .arg(temp.path())
        .args(["new-track", "Dark mode"])
        .assert()
        .success();

    conductor()
        .arg("--project")
        .arg(temp.path())
        .args(["track-status", "Dark mode", "in_progress"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Updated:"));

    let tracks = fs::read_to_string(temp.path().join("conductor/tracks.md")).unwrap();
    assert!(tracks.contains("## [~] Track: Dark mode"));
}

#[test]
fn test_task_status_with_commit() {
    let temp = set_up_project();
    let plan_dir = temp.path().join("conductor/tracks/login_20260101");
    fs::create_dir_all(&plan_dir).unwrap();
    fs::write(
        plan_dir.join("plan.md"),
        "## Phase 1\n- [ ] Build login\n- [x] Write tests\n",
    )
    .unwrap();

    conductor()
        .arg("--project")
        .arg(temp.path())
        .args(["task-status", "login_20260101", "Build login", "complete"])
        .args(["--commit", "abcdef1234567"])
        .assert()
        .success();

    let plan = fs::read_to_string(plan_dir.join("plan.md")).unwrap();
    assert_eq!(
        plan,
        "## Phase 1\n- [x] Build login [abcdef1]\n- [x] Write tests\n"
    );

    conductor()
        .arg("--project")
        .arg(temp.path())
        .args(["next-task", "login_20260101"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No pending tasks"));
}

#[test]
fn test_tasks_shows_phase_progress() {
    let temp = set_up_project();
    let plan_dir = temp.path().join("conductor/tracks/login_20260101");
    fs::create_dir_all(&plan_dir).unwrap();
    fs::write(
        plan_dir.join("plan.md"),
        "## Phase 1\n- [x] Write tests\n- [ ] Build login\n## Phase 2\n- [x] Deploy\n",
    )
    .unwrap();

    conductor()
        .arg("--project")
        .arg(temp.path())
        .args(["tasks", "login_20260101"])
        .assert()
        .success()
        .stdout(predicate::str::contains("(1/2)"))
        .stdout(predicate::str::contains("(1/1)"))
        .stdout(predicate::str::contains("Build login"));
}

#[test]
fn test_task_status_no_match_leaves_plan() {
    let temp = set_up_project();
    let plan_dir = temp.path().join("conductor/tracks/login_20260101");
    fs::create_dir_all(&plan_dir).unwrap();
    let original = "## Phase 1\n- [ ] Build login";
    fs::write(plan_dir.join("plan.md"), original).unwrap();

    conductor()
        .arg("--project")
        .arg(temp.path())
        .args(["task-status", "login_20260101", "Deploy", "complete"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("No status line matches"));

    assert_eq!(fs::read_to_string(plan_dir.join("plan.md")).unwrap(), original);
}

#[test]
fn test_invalid_status_is_rejected() {
    let temp = set_up_project();

    conductor()
        .arg("--project")
        .arg(temp.path())
        .args(["track-status", "Anything", "started-ish"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid status"));
}

#[test]
fn test_duplicate_track_is_a_user_error() {
    let temp = set_up_project();
    let new_track = || {
        conductor()
            .arg("--project")
            .arg(temp.path())
            .args(["new-track", "Dark mode"])
            .assert()
    };

    new_track().success();
    new_track()
        .failure()
        .code(3)
        .stderr(predicate::str::contains("Track already exists"));
}
