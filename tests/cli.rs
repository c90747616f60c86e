//! Runs the built binary. These hold whether or not tesseract is installed:
//! a missing file fails either at the engine check or at decode time.

use std::process::{Command, Output};

fn run(args: &[&str]) -> Output {
    let dir = tempfile::tempdir().expect("temp dir");
    let config = dir.path().join("config.json");

    Command::new(env!("CARGO_BIN_EXE_image-ocr"))
        .arg("--config")
        .arg(&config)
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("run image-ocr")
}

#[test]
fn missing_image_prints_error_and_exits_zero() {
    let output = run(&["/definitely/not/here.png"]);

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.starts_with("Error: "), "got: {:?}", stdout);
    assert!(stdout.ends_with('\n'));
}

#[test]
fn stdout_holds_only_the_result_line() {
    let output = run(&["/definitely/not/here.png"]);

    let stdout = String::from_utf8(output.stdout).unwrap();
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 1, "got: {:?}", stdout);
    assert!(lines[0].starts_with("Error: "), "got: {:?}", stdout);
    assert_eq!(stdout, format!("{}\n", lines[0]));
}

#[test]
fn strict_mode_exits_nonzero_on_failure() {
    let output = run(&["/definitely/not/here.png", "eng", "--strict"]);

    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn json_mode_reports_tagged_error() {
    let output = run(&["/definitely/not/here.png", "--json"]);

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    let report: serde_json::Value = serde_json::from_str(&stdout)
        .unwrap_or_else(|e| panic!("stdout is not one JSON report ({}): {:?}", e, stdout));
    assert_eq!(report["status"], "error");
    assert!(report["kind"] == "decode" || report["kind"] == "engine_unavailable");
}

#[test]
fn missing_image_argument_is_usage_error() {
    let output = run(&[]);

    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn config_path_prints_override() {
    let output = run(&["config", "path"]);

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.trim_end().ends_with("config.json"));
}
