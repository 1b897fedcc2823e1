#![allow(deprecated)]
use assert_cmd::Command;
use predicates::prelude::*;
use statusline_core::width::strip_ansi;
use std::path::Path;
use tempfile::TempDir;

const ERROR_LINE: &str = r"^\[Statusline Error: .+\]\n$";

fn statusline() -> Command {
    let mut cmd = Command::cargo_bin("statusline").unwrap();
    cmd.env_remove("STATUSLINE_CONFIG")
        .args(["--no-host-tool", "--hide-host"]);
    cmd
}

fn session(dir: &Path, model: &str) -> String {
    serde_json::json!({
        "session_id": "s-1",
        "cwd": dir.to_string_lossy(),
        "model": { "id": "m", "display_name": model },
    })
    .to_string()
}

fn stdout_of(cmd: &mut Command) -> String {
    let output = cmd.output().unwrap();
    assert!(output.status.success());
    strip_ansi(&String::from_utf8_lossy(&output.stdout)).into_owned()
}

// ---------------------------------------------------------------------------
// Failure boundary
// ---------------------------------------------------------------------------

#[test]
fn invalid_json_prints_one_error_line_and_exits_zero() {
    statusline()
        .write_stdin("this is not json")
        .assert()
        .success()
        .stdout(predicate::str::is_match(ERROR_LINE).unwrap());
}

#[test]
fn empty_stdin_is_an_error_line() {
    statusline()
        .write_stdin("")
        .assert()
        .success()
        .stdout(predicate::str::is_match(ERROR_LINE).unwrap());
}

#[test]
fn invalid_emoji_width_is_an_error_line() {
    statusline()
        .args(["--emoji-width", "3"])
        .write_stdin("{}")
        .assert()
        .success()
        .stdout(predicate::str::is_match(ERROR_LINE).unwrap())
        .stdout(predicate::str::contains("emoji_width"));
}

#[test]
fn bad_config_file_is_an_error_line() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("statusline.yaml");
    std::fs::write(&path, "emoji_width: 7\n").unwrap();

    statusline()
        .arg("--config")
        .arg(&path)
        .write_stdin("{}")
        .assert()
        .success()
        .stdout(predicate::str::is_match(ERROR_LINE).unwrap());
}

#[test]
fn unknown_flag_is_an_error_line() {
    statusline()
        .arg("--no-such-flag")
        .write_stdin("{}")
        .assert()
        .success()
        .stdout(predicate::str::is_match(ERROR_LINE).unwrap());
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

#[test]
fn outside_a_repository_renders_single_box_row() {
    let dir = TempDir::new().unwrap();
    let out = stdout_of(statusline().write_stdin(session(dir.path(), "Sonnet")));

    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines.len(), 4, "{out}");
    assert!(lines[0].contains("Sonnet"));
    assert!(lines[1].starts_with('┌'));
    assert!(lines[2].contains("no git repository"));
    assert!(lines[3].starts_with('└'));
}

#[test]
fn missing_model_renders_unknown() {
    let dir = TempDir::new().unwrap();
    let input = serde_json::json!({ "cwd": dir.path().to_string_lossy() }).to_string();
    let out = stdout_of(statusline().write_stdin(input));
    assert!(out.contains("Unknown"));
}

#[test]
fn config_file_values_apply() {
    let dir = TempDir::new().unwrap();
    let work = dir.path().join("a/b/c");
    std::fs::create_dir_all(&work).unwrap();
    let config = dir.path().join("statusline.yaml");
    std::fs::write(&config, "path_segments: 1\nemoji_width: 1\n").unwrap();

    let out = stdout_of(
        statusline()
            .arg("--config")
            .arg(&config)
            .write_stdin(session(&work, "Opus")),
    );
    assert!(out.contains("…/c"), "{out}");
}

#[test]
fn json_flag_prints_snapshot() {
    let dir = TempDir::new().unwrap();
    let out = stdout_of(
        statusline()
            .arg("--json")
            .write_stdin(session(dir.path(), "Haiku")),
    );
    let value: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(value["model"], "Haiku");
    assert!(value["git"].is_null());
}

// ---------------------------------------------------------------------------
// Logging
// ---------------------------------------------------------------------------

#[test]
fn rust_log_level_enables_debug_on_stderr() {
    let dir = TempDir::new().unwrap();
    statusline()
        .env("RUST_LOG", "debug")
        .write_stdin(session(dir.path(), "Opus"))
        .assert()
        .success()
        .stderr(predicate::str::contains("rendering statusline"));
}

#[test]
fn default_log_level_keeps_stderr_quiet() {
    let dir = TempDir::new().unwrap();
    statusline()
        .env_remove("RUST_LOG")
        .write_stdin(session(dir.path(), "Opus"))
        .assert()
        .success()
        .stderr(predicate::str::is_empty());
}

// ---------------------------------------------------------------------------
// Real git repository
// ---------------------------------------------------------------------------

fn git(dir: &Path, args: &[&str]) {
    let status = std::process::Command::new("git")
        .args([
            "-c",
            "user.name=Statusline Test",
            "-c",
            "user.email=test@example.com",
            "-c",
            "commit.gpgsign=false",
        ])
        .args(args)
        .current_dir(dir)
        .status()
        .unwrap();
    assert!(status.success(), "git {args:?} failed");
}

#[test]
fn git_repository_renders_change_rows() {
    if which::which("git").is_err() {
        eprintln!("git not on PATH; skipping");
        return;
    }

    let dir = TempDir::new().unwrap();
    let repo = dir.path();
    git(repo, &["init", "-q"]);
    git(repo, &["symbolic-ref", "HEAD", "refs/heads/main"]);
    std::fs::write(repo.join("tracked.txt"), "one\ntwo\n").unwrap();
    git(repo, &["add", "tracked.txt"]);
    git(repo, &["commit", "-q", "-m", "initial"]);

    // Unstaged edit, staged addition, untracked file.
    std::fs::write(repo.join("tracked.txt"), "one\ntwo\nthree\n").unwrap();
    std::fs::write(repo.join("staged.txt"), "s\n").unwrap();
    git(repo, &["add", "staged.txt"]);
    std::fs::write(repo.join("notes.txt"), "a\nb\n").unwrap();

    let out = stdout_of(statusline().write_stdin(session(repo, "Opus")));
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines.len(), 7, "{out}");
    assert!(lines[2].contains("main"), "{out}");
    assert!(lines[2].contains("00:0"), "{out}");
    assert!(lines[4].contains("unstaged"));
    assert!(lines[4].contains("~1"), "{out}");
    // One numstat line plus the two lines of the untracked file.
    assert!(lines[4].contains("+3 -0"), "{out}");
    assert!(lines[5].contains("staged"));
    assert!(lines[5].contains("+1"), "{out}");
}
