//! Integration tests for the kusion-livediff CLI
//!
//! These drive the compiled binary end-to-end against a fake preview tool.

use std::path::{Path, PathBuf};
use std::process::Command;

const UPDATE_ORDER: &str = r#"{"stepKeys":["r1","ghost"],"changeSteps":{"r1":{"id":"r1","action":"Update","from":{"a":1},"to":{"a":2}}}}"#;

/// Get the path to the kusion-livediff binary
fn livediff_binary() -> PathBuf {
    let mut path = std::env::current_exe().unwrap();
    path.pop(); // Remove test executable name
    path.pop(); // Remove deps directory

    path.push("kusion-livediff");

    if cfg!(windows) {
        path.set_extension("exe");
    }

    path
}

/// Run kusion-livediff with an empty config file and return output
fn run_livediff(dir: &Path, args: &[&str]) -> std::process::Output {
    let config = dir.join("livediff.yaml");
    std::fs::write(&config, "").unwrap();

    Command::new(livediff_binary())
        .arg("--config")
        .arg(&config)
        .args(args)
        .env_remove("KUSION_BIN")
        .output()
        .expect("Failed to execute kusion-livediff")
}

/// A stack directory with a fake preview tool that prints `stdout`/`stderr`
fn fake_stack(stdout: &str, stderr: &str, exit_code: i32) -> (tempfile::TempDir, String) {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("stack.yaml"), "name: dev\n").unwrap();
    std::fs::write(dir.path().join("stdout.txt"), stdout).unwrap();
    std::fs::write(dir.path().join("stderr.txt"), stderr).unwrap();

    let script = dir.path().join("fake-kusion.sh");
    std::fs::write(
        &script,
        format!(
            "echo \"$@\" > args.txt\ncat stdout.txt\ncat stderr.txt >&2\nexit {}\n",
            exit_code
        ),
    )
    .unwrap();

    let bin = format!("sh {}", script.display());
    (dir, bin)
}

#[test]
fn test_version() {
    let dir = tempfile::tempdir().unwrap();
    let output = run_livediff(dir.path(), &["--version"]);

    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("kusion-livediff"));
}

#[test]
fn test_help() {
    let dir = tempfile::tempdir().unwrap();
    let output = run_livediff(dir.path(), &["--help"]);

    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Usage:"));
    assert!(stdout.contains("diff"));
    assert!(stdout.contains("preview"));
}

#[cfg(unix)]
#[test]
fn test_preview_prints_runtime_snapshot() {
    let (dir, bin) = fake_stack(UPDATE_ORDER, "", 0);
    let path = dir.path().to_str().unwrap();

    let output = run_livediff(
        dir.path(),
        &["preview", "--path", path, "--side", "runtime", "--kusion-bin", &bin],
    );

    assert!(output.status.success(), "{:?}", output);
    assert_eq!(String::from_utf8_lossy(&output.stdout), "r1:\n  a: 1\n");

    let args = std::fs::read_to_string(dir.path().join("args.txt")).unwrap();
    assert_eq!(args.trim(), "preview -w dev --output json");
}

#[cfg(unix)]
#[test]
fn test_preview_json_with_name_override() {
    let (dir, bin) = fake_stack(UPDATE_ORDER, "", 0);
    let path = dir.path().to_str().unwrap();

    let output = run_livediff(
        dir.path(),
        &[
            "preview", "--path", path, "--name", "prod", "--side", "spec", "--format", "json",
            "--kusion-bin", &bin,
        ],
    );

    assert!(output.status.success(), "{:?}", output);
    let printed: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("preview should print JSON");
    assert_eq!(printed, serde_json::json!({"r1": {"a": 2}}));

    let args = std::fs::read_to_string(dir.path().join("args.txt")).unwrap();
    assert_eq!(args.trim(), "preview -w prod --output json");
}

#[cfg(unix)]
#[test]
fn test_diff_renders_both_sides() {
    let (dir, bin) = fake_stack(UPDATE_ORDER, "", 0);
    let path = dir.path().to_str().unwrap();

    let output = run_livediff(dir.path(), &["diff", "--path", path, "--kusion-bin", &bin]);

    assert!(output.status.success(), "{:?}", output);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("dev (Runtime) ↔ (Spec)"));
    assert!(stdout.contains("-  a: 1"));
    assert!(stdout.contains("+  a: 2"));
}

#[cfg(unix)]
#[test]
fn test_valid_output_wins_over_tool_error() {
    let (dir, bin) = fake_stack(UPDATE_ORDER, "warning: something odd", 1);
    let path = dir.path().to_str().unwrap();

    let output = run_livediff(dir.path(), &["preview", "--path", path, "--kusion-bin", &bin]);

    assert!(output.status.success(), "{:?}", output);
    assert!(String::from_utf8_lossy(&output.stdout).contains("status:"));
}

#[cfg(unix)]
#[test]
fn test_malformed_output_fails_and_reports_raw_output() {
    let (dir, bin) = fake_stack("Error: stack dev not found", "exit status 1", 1);
    let path = dir.path().to_str().unwrap();

    let output = run_livediff(dir.path(), &["diff", "--path", path, "--kusion-bin", &bin]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Error: stack dev not found"));
    assert!(stderr.contains("Failed to preview stack dev"));
    assert!(!String::from_utf8_lossy(&output.stdout).contains("(Runtime) ↔ (Spec)"));
}

#[cfg(unix)]
#[test]
fn test_empty_output_means_no_changes() {
    let (dir, bin) = fake_stack("", "", 0);
    let path = dir.path().to_str().unwrap();

    let output = run_livediff(
        dir.path(),
        &["preview", "--path", path, "--format", "json", "--kusion-bin", &bin],
    );

    assert!(output.status.success(), "{:?}", output);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("\"status\": {}"));
    assert!(stdout.contains("\"spec\": {}"));
}

#[test]
fn test_missing_stack_file_fails() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().to_str().unwrap();

    let output = run_livediff(dir.path(), &["diff", "--path", path]);

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("No stack.yaml found"));
}

#[test]
fn test_missing_preview_tool_fails() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("stack.yaml"), "name: dev\n").unwrap();
    let path = dir.path().to_str().unwrap();

    let output = run_livediff(
        dir.path(),
        &["preview", "--path", path, "--kusion-bin", "kusion-livediff-missing-tool"],
    );

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Could not run"));
}
