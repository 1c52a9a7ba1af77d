//! CLI integration tests
//!
//! Spawn the built binary and verify the process-level contract:
//!
//! | Exit Code | Meaning |
//! |-----------|---------|
//! | 0 | Report written; stdout carries `SUCCESS: <path>` then the path |
//! | 1 | Missing arguments (usage on stdout) or failure (`ERROR:` on stderr) |

use std::path::Path;
use std::process::{Command, Output};

const WORKED_EXAMPLE: &str =
    r#"{"teamName":"Alpha","monthName":"March","year":2026,"gpData":[{"name":"Jo","score":19,"prevScore":16}]}"#;

fn run_fmreport(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_fmreport"))
        .args(args)
        .output()
        .expect("failed to execute fmreport")
}

#[test]
fn success_prints_path_and_exits_zero() {
    let dir = tempfile::tempdir().unwrap();
    let output_path = dir.path().join("report.xlsx");
    let output_str = output_path.to_str().unwrap();

    let output = run_fmreport(&[WORKED_EXAMPLE, output_str]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains(&format!("SUCCESS: {output_str}")));
    assert!(stdout.lines().any(|line| line == output_str));
    assert!(output_path.exists());
}

#[test]
fn accepts_payload_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let payload_path = dir.path().join("payload.json");
    std::fs::write(&payload_path, WORKED_EXAMPLE).unwrap();
    let output_path = dir.path().join("report.xlsx");

    let output = run_fmreport(&[
        payload_path.to_str().unwrap(),
        output_path.to_str().unwrap(),
    ]);

    assert!(output.status.success());
    assert!(output_path.exists());
}

#[test]
fn missing_arguments_print_usage_and_exit_one() {
    let output = run_fmreport(&[]);
    assert_eq!(output.status.code(), Some(1));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Usage:"));

    let output = run_fmreport(&[WORKED_EXAMPLE]);
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn invalid_json_reports_error_and_exits_one() {
    let dir = tempfile::tempdir().unwrap();
    let output_path = dir.path().join("report.xlsx");

    let output = run_fmreport(&["{ not json", output_path.to_str().unwrap()]);

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("ERROR:"));
    assert!(!output_path.exists());
}

#[test]
fn unwritable_output_reports_error() {
    let output = run_fmreport(&[WORKED_EXAMPLE, "/nonexistent-dir/report.xlsx"]);

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("ERROR:"));
}

#[test]
fn nonexistent_template_is_ignored() {
    let dir = tempfile::tempdir().unwrap();
    let output_path = dir.path().join("report.xlsx");
    let template_path = dir.path().join("missing_template.xlsx");
    assert!(!Path::new(&template_path).exists());

    let output = run_fmreport(&[
        WORKED_EXAMPLE,
        output_path.to_str().unwrap(),
        template_path.to_str().unwrap(),
    ]);

    assert!(output.status.success());
    assert!(output_path.exists());
}
