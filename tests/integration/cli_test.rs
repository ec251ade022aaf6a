//! Runs the built binary in one-shot mode.

use std::io::Write;
use std::process::{Command, Output};
use tempfile::NamedTempFile;

fn sandbox(args: &[&str]) -> Output {
    let config = NamedTempFile::new().unwrap();
    Command::new(env!("CARGO_BIN_EXE_sql-sandbox"))
        .arg("--config")
        .arg(config.path())
        .args(args)
        .env("RUST_LOG", "warn")
        .output()
        .unwrap()
}

#[test]
fn test_execute_json() {
    let output = sandbox(&[
        "--format",
        "json",
        "-e",
        "SELECT COUNT(*) AS n FROM employees",
    ]);
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    let value: serde_json::Value = serde_json::from_str(stdout.trim()).unwrap();
    assert_eq!(value["outcome"]["success"], true);
    assert_eq!(value["outcome"]["rows"]["rows"][0]["n"], 10);
    assert_eq!(value["navigation"]["active_view"], "results");
}

#[test]
fn test_failed_statement_sets_exit_status() {
    let output = sandbox(&["-e", "SELEC * FROM x"]);
    assert!(!output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("Error: SQL error:"), "{stdout}");
}

#[test]
fn test_empty_store_with_seed() {
    let mut seed = NamedTempFile::new().unwrap();
    writeln!(seed, "CREATE TABLE notes (body TEXT); INSERT INTO notes VALUES ('hi');").unwrap();

    let output = sandbox(&[
        "--empty",
        "--seed",
        seed.path().to_str().unwrap(),
        "--default-table",
        "notes",
        "-e",
        "INSERT INTO notes VALUES ('there')",
    ]);
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.starts_with("OK: INSERT"), "{stdout}");
    assert!(stdout.contains("== notes =="), "{stdout}");
    assert!(stdout.contains("| there |"), "{stdout}");
}

#[test]
fn test_script_file() {
    let mut script = NamedTempFile::new().unwrap();
    writeln!(script, "TRUNCATE TABLE projects;\n.view projects\n").unwrap();

    let output = sandbox(&["--script", script.path().to_str().unwrap()]);
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("OK: TRUNCATE ·"), "{stdout}");
    assert!(stdout.contains("(no rows)"), "{stdout}");
}

#[test]
fn test_empty_store_starts_on_results() {
    let output = sandbox(&["--empty", "-e", "INSERT INTO nope VALUES (1)"]);
    assert!(!output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("Error: SQL error: no such table: nope"), "{stdout}");
    assert!(!stdout.contains("employees"), "{stdout}");

    let output = sandbox(&["--empty", "--format", "json", "-e", "SELECT 1 AS a WHERE 0"]);
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    let value: serde_json::Value = serde_json::from_str(stdout.trim()).unwrap();
    assert_eq!(value["navigation"]["active_view"], "results");
    assert_eq!(value["outcome"]["rows"]["rows"], serde_json::json!([]));
}

#[test]
fn test_missing_default_table_falls_back_to_first_table() {
    let output = sandbox(&[
        "--default-table",
        "nope",
        "-e",
        "DELETE FROM projects WHERE 0",
    ]);
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("== departments =="), "{stdout}");
}

#[test]
fn test_first_result_set_is_shown() {
    let output = sandbox(&["-e", "SELECT 1 AS a WHERE 0; SELECT 2 AS a"]);
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("(no rows)"), "{stdout}");
    assert!(!stdout.contains("| 2 |"), "{stdout}");
}
