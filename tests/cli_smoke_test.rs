// Binary-level smoke tests for the covgate CLI.

use assert_cmd::Command;
use git2::{Repository, Signature};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn covgate() -> Command {
    let mut cmd = Command::cargo_bin("covgate").expect("binary builds");
    // Keep runs hermetic regardless of the environment the tests run in.
    cmd.env_remove("GITHUB_ACTIONS")
        .env_remove("CI")
        .env_remove("COVGATE_STRICT")
        .env_remove("COVGATE_THRESHOLD_LINES")
        .env_remove("COVGATE_THRESHOLD_BRANCHES")
        .env_remove("COVGATE_THRESHOLD_FUNCTIONS")
        .env_remove("COVGATE_THRESHOLD_STATEMENTS");
    cmd
}

fn stdout_of(output: std::process::Output) -> String {
    String::from_utf8(output.stdout).expect("utf8 stdout")
}

fn write(dir: &Path, relative: &str, contents: &str) {
    let path = dir.join(relative);
    fs::create_dir_all(path.parent().expect("parent")).expect("mkdir");
    fs::write(path, contents).expect("write file");
}

fn commit_all(repo: &Repository, message: &str) {
    let mut index = repo.index().expect("index");
    index
        .add_all(["*"], git2::IndexAddOption::DEFAULT, None)
        .expect("add all");
    index.write().expect("write index");
    let tree_id = index.write_tree().expect("write tree");
    let tree = repo.find_tree(tree_id).expect("find tree");
    let sig = Signature::now("covgate", "covgate@example.com").expect("signature");
    let parent = repo.head().ok().and_then(|head| head.peel_to_commit().ok());
    let parents: Vec<&git2::Commit> = parent.iter().collect();
    repo.commit(Some("HEAD"), &sig, &sig, message, &tree, &parents)
        .expect("commit");
}

#[test]
fn help_lists_subcommands() {
    let output = covgate().arg("--help").output().expect("runs");
    assert!(output.status.success());
    let stdout = stdout_of(output);
    assert!(stdout.contains("check"));
    assert!(stdout.contains("init"));
    assert!(stdout.contains("total"));
}

#[test]
fn init_writes_a_parseable_config_once() {
    let dir = TempDir::new().expect("tempdir");

    covgate()
        .arg("init")
        .current_dir(dir.path())
        .assert()
        .success();

    let contents = fs::read_to_string(dir.path().join(".covgate.toml")).expect("config exists");
    assert!(contents.contains("preset"));
    toml::from_str::<toml::Value>(&contents).expect("config parses as TOML");

    // A second init without --force refuses to overwrite.
    covgate()
        .arg("init")
        .current_dir(dir.path())
        .assert()
        .failure();

    covgate()
        .args(["init", "--force"])
        .current_dir(dir.path())
        .assert()
        .success();
}

#[test]
fn total_prints_whole_project_coverage() {
    let dir = TempDir::new().expect("tempdir");
    write(
        dir.path(),
        "coverage/lcov.info",
        "SF:src/a.rs\nLF:8\nLH:6\nend_of_record\nSF:src/b.rs\nLF:8\nLH:6\nend_of_record\n",
    );

    let output = covgate()
        .args(["total", "--coverage-file", "coverage/lcov.info"])
        .current_dir(dir.path())
        .output()
        .expect("runs");

    assert!(output.status.success());
    let stdout = stdout_of(output);
    assert!(stdout.contains("Whole-project coverage"));
    assert!(stdout.contains("75%"));
    assert!(stdout.contains("(12/16)"));
}

#[test]
fn total_fails_for_a_missing_report() {
    let dir = TempDir::new().expect("tempdir");
    covgate()
        .args(["total", "--coverage-file", "nope/lcov.info"])
        .current_dir(dir.path())
        .assert()
        .failure();
}

#[test]
fn check_passes_on_a_covered_staged_change() {
    let dir = TempDir::new().expect("tempdir");
    let repo = Repository::init(dir.path()).expect("init repo");

    write(dir.path(), "src/lib.rs", "pub fn covered() {}\n");
    commit_all(&repo, "initial");

    // Stage a change and provide coverage for it. Relative SF paths match
    // through the suffix fallback.
    write(dir.path(), "src/lib.rs", "pub fn covered() { let _ = 1; }\n");
    let mut index = repo.index().expect("index");
    index.add_path(Path::new("src/lib.rs")).expect("add");
    index.write().expect("write index");

    write(
        dir.path(),
        "coverage/lcov.info",
        "SF:src/lib.rs\nLF:10\nLH:9\nBRF:2\nBRH:2\nFNF:1\nFNH:1\nend_of_record\n",
    );

    let output = covgate()
        .args([
            "check",
            ".",
            "--mode",
            "staged",
            "--format",
            "json",
            "--strict",
        ])
        .current_dir(dir.path())
        .output()
        .expect("runs");

    assert!(output.status.success());
    let report: serde_json::Value =
        serde_json::from_str(&stdout_of(output)).expect("json report");
    assert_eq!(report["passed"], serde_json::Value::Bool(true));
    assert_eq!(report["changed_files"][0], "src/lib.rs");
    assert_eq!(report["incremental"]["summary"]["lines"]["pct"], 90.0);
}

#[test]
fn strict_check_exits_nonzero_on_a_poorly_covered_change() {
    let dir = TempDir::new().expect("tempdir");
    let repo = Repository::init(dir.path()).expect("init repo");

    write(dir.path(), "src/lib.rs", "pub fn uncovered() {}\n");
    commit_all(&repo, "initial");

    write(dir.path(), "src/lib.rs", "pub fn uncovered() { let _ = 1; }\n");
    let mut index = repo.index().expect("index");
    index.add_path(Path::new("src/lib.rs")).expect("add");
    index.write().expect("write index");

    write(
        dir.path(),
        "coverage/lcov.info",
        "SF:src/lib.rs\nLF:10\nLH:1\nend_of_record\n",
    );

    covgate()
        .args(["check", ".", "--mode", "staged", "--strict"])
        .current_dir(dir.path())
        .assert()
        .failure();

    // Without strict mode the gate reports but does not block.
    covgate()
        .args(["check", ".", "--mode", "staged"])
        .current_dir(dir.path())
        .assert()
        .success();
}

#[test]
fn check_with_no_staged_changes_passes_vacuously() {
    let dir = TempDir::new().expect("tempdir");
    let repo = Repository::init(dir.path()).expect("init repo");

    write(dir.path(), "src/lib.rs", "pub fn f() {}\n");
    commit_all(&repo, "initial");

    let output = covgate()
        .args([
            "check",
            ".",
            "--mode",
            "staged",
            "--format",
            "json",
            "--strict",
        ])
        .current_dir(dir.path())
        .output()
        .expect("runs");

    assert!(output.status.success());
    let report: serde_json::Value =
        serde_json::from_str(&stdout_of(output)).expect("json report");
    assert_eq!(report["passed"], serde_json::Value::Bool(true));
    assert_eq!(report["changed_files"], serde_json::json!([]));
    assert_eq!(report["incremental"]["summary"]["lines"]["pct"], 100.0);
}

#[test]
fn check_fails_cleanly_without_a_coverage_file() {
    let dir = TempDir::new().expect("tempdir");
    let repo = Repository::init(dir.path()).expect("init repo");

    write(dir.path(), "src/lib.rs", "pub fn f() {}\n");
    commit_all(&repo, "initial");

    write(dir.path(), "src/lib.rs", "pub fn f() { let _ = 1; }\n");
    let mut index = repo.index().expect("index");
    index.add_path(Path::new("src/lib.rs")).expect("add");
    index.write().expect("write index");

    let output = covgate()
        .args(["check", ".", "--mode", "staged"])
        .current_dir(dir.path())
        .output()
        .expect("runs");

    assert!(!output.status.success());
    let stderr = String::from_utf8(output.stderr).expect("utf8 stderr");
    assert!(stderr.contains("coverage file not found"));
}
