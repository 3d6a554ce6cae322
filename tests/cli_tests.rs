//! CLI integration tests.
//!
//! Tests the dtf-json commands by invoking the binary as a subprocess.

use std::io::Write;
use std::process::{Command, Stdio};

fn binary_path() -> std::path::PathBuf {
    // Find the binary in the target directory
    let mut path = std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(|p| p.to_path_buf()))
        .unwrap_or_default();

    // Navigate out of the deps directory to the main binary location
    if path.ends_with("deps") {
        path.pop();
    }

    if cfg!(windows) {
        path.join("dtf-json.exe")
    } else {
        path.join("dtf-json")
    }
}

fn run_command(args: &[&str], input: &str) -> (i32, String, String) {
    let binary = binary_path();
    let mut child = Command::new(&binary)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap_or_else(|e| panic!("Failed to spawn dtf-json at {:?}: {}", binary, e));

    {
        let stdin = child.stdin.as_mut().unwrap();
        stdin.write_all(input.as_bytes()).unwrap();
    }

    let output = child.wait_with_output().unwrap();
    let code = output.status.code().unwrap_or(-1);
    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    (code, stdout, stderr)
}

fn run_format(input: &str) -> (i32, String, String) {
    run_command(&["format"], input)
}

fn run_check(input: &str) -> (i32, String, String) {
    run_command(&["check"], input)
}

// ============================================================================
// Format Command Tests
// ============================================================================

#[test]
fn cli_format_pretty_prints() {
    let (code, stdout, _stderr) = run_format(r#"{"b": [1, 2], "a": {"c": 3.50}}"#);
    assert_eq!(code, 0, "Expected success exit code");
    assert_eq!(
        stdout,
        "{\n\t\"b\": [ 1, 2 ],\n\t\"a\": {\n\t\t\"c\": 3.5\n\t}\n}\n"
    );
}

#[test]
fn cli_format_empty_object() {
    let (code, stdout, _stderr) = run_format("{}");
    assert_eq!(code, 0, "Expected success exit code");
    assert_eq!(stdout, "{}\n");
}

#[test]
fn cli_format_explicit_stdin_dash() {
    let (code, stdout, _stderr) = run_command(&["format", "-"], r#"{"a":1}"#);
    assert_eq!(code, 0, "Expected success exit code");
    assert_eq!(stdout, "{\n\t\"a\": 1\n}\n");
}

#[test]
fn cli_format_reads_file() {
    let path = std::env::temp_dir().join(format!("dtf-json-cli-{}.json", std::process::id()));
    std::fs::write(&path, r#"{"from": "file"}"#).unwrap();

    let (code, stdout, _stderr) = run_command(&["format", path.to_str().unwrap()], "");
    std::fs::remove_file(&path).ok();

    assert_eq!(code, 0, "Expected success exit code");
    assert_eq!(stdout, "{\n\t\"from\": \"file\"\n}\n");
}

#[test]
fn cli_format_invalid_input() {
    let (code, stdout, stderr) = run_format(r#"{"a": }"#);
    assert_eq!(code, 1, "Expected failure exit code");
    assert!(stdout.is_empty(), "Expected no document: {}", stdout);
    assert!(
        stderr.contains("E101_UnexpectedCharacter (101)"),
        "Expected error name and code: {}",
        stderr
    );
}

#[test]
fn cli_format_missing_file() {
    let (code, _stdout, stderr) = run_command(&["format", "/nonexistent/dtf-json/input.json"], "");
    assert_eq!(code, 2, "Expected I/O failure exit code");
    assert!(
        stderr.contains("cannot read input"),
        "Expected read error: {}",
        stderr
    );
}

// ============================================================================
// Check Command Tests
// ============================================================================

#[test]
fn cli_check_valid() {
    let (code, stdout, _stderr) = run_check(r#"{"ok": true}"#);
    assert_eq!(code, 0, "Expected success exit code");
    assert_eq!(stdout.trim(), "ok");
}

#[test]
fn cli_check_missing_root() {
    let (code, stdout, _stderr) = run_check("[1, 2, 3]");
    assert_eq!(code, 1, "Expected failure exit code");
    assert!(
        stdout.contains("E100_MissingRoot (100)"),
        "Expected E100 error: {}",
        stdout
    );
}

#[test]
fn cli_check_unterminated_object() {
    let (code, stdout, _stderr) = run_check(r#"{"a": 1"#);
    assert_eq!(code, 1, "Expected failure exit code");
    assert!(stdout.contains("103"), "Expected E103 error code: {}", stdout);
}

#[test]
fn cli_check_duplicate_keys_allowed_by_default() {
    let (code, stdout, _stderr) = run_check(r#"{"a": 1, "a": 2}"#);
    assert_eq!(code, 0, "Expected success exit code");
    assert_eq!(stdout.trim(), "ok");
}

#[test]
fn cli_check_reject_duplicate_keys() {
    let (code, stdout, _stderr) = run_command(
        &["check", "--reject-duplicate-keys"],
        r#"{"a": 1, "a": 2}"#,
    );
    assert_eq!(code, 1, "Expected failure exit code");
    assert!(
        stdout.contains("E112_DuplicateKey"),
        "Expected E112 error: {}",
        stdout
    );
}

#[test]
fn cli_check_max_depth() {
    let input = r#"{"a": {"b": {}}}"#;

    let (code, _stdout, _stderr) = run_command(&["check", "--max-depth", "3"], input);
    assert_eq!(code, 0, "Expected success exit code");

    let (code, stdout, _stderr) = run_command(&["check", "--max-depth", "2"], input);
    assert_eq!(code, 1, "Expected failure exit code");
    assert!(stdout.contains("111"), "Expected E111 error code: {}", stdout);
}

#[test]
fn cli_check_max_depth_is_clamped() {
    let depth = 50_000;
    let input = format!("{{{}{}", r#""a": {"#.repeat(depth - 1), "}".repeat(depth));

    let (code, stdout, stderr) = run_command(&["check", "--max-depth", "100000"], &input);
    assert_eq!(code, 1, "Expected failure exit code, stderr: {}", stderr);
    assert!(
        stdout.contains("E111_NestingTooDeep (111)"),
        "Expected E111 error: {}",
        stdout
    );
    assert!(stdout.contains("192"), "Expected clamped limit: {}", stdout);
}

#[test]
fn cli_format_escape_keys() {
    let input = r#"{"a\/b": 1}"#;

    let (_code, stdout, _stderr) = run_format(input);
    assert!(stdout.contains(r#""a\/b""#), "Expected raw key: {}", stdout);

    let (code, stdout, _stderr) = run_command(&["format", "--escape-keys"], input);
    assert_eq!(code, 0, "Expected success exit code");
    assert!(stdout.contains(r#""a/b""#), "Expected escaped key: {}", stdout);
}

// ============================================================================
// Version Command Tests
// ============================================================================

#[test]
fn cli_version() {
    let (code, stdout, _stderr) = run_command(&["version"], "");
    assert_eq!(code, 0, "Expected success exit code");
    assert!(stdout.contains("dtf-json v"), "Expected version: {}", stdout);
}

#[test]
fn cli_no_command_prints_usage_hint() {
    let (code, stdout, _stderr) = run_command(&[], "");
    assert_eq!(code, 0, "Expected success exit code");
    assert!(stdout.contains("--help"), "Expected usage hint: {}", stdout);
}
