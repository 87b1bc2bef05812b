//! Command-line integration tests
//!
//! None of these reach a database: they cover argument handling and the
//! exit code contract (0 on success, non-zero on any error).

use std::process::{Command, Output};

fn awaycal(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_awaycal"))
        .args(args)
        .env_remove("AWAYCAL_CONFIG")
        .env_remove("RUST_LOG")
        .current_dir(env!("CARGO_MANIFEST_DIR"))
        .output()
        .expect("failed to execute awaycal")
}

#[test]
fn help_lists_subcommands() {
    let output = awaycal(&["--help"]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    for command in ["export", "agents", "calendars"] {
        assert!(stdout.contains(command), "missing {command} in:\n{stdout}");
    }
}

#[test]
fn export_help_shows_formats() {
    let output = awaycal(&["export", "--help"]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("xlsx"));
    assert!(stdout.contains("text"));
}

#[test]
fn missing_config_file_fails() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("missing.toml");

    let output = awaycal(&["--config", missing.to_str().unwrap(), "calendars"]);
    assert!(!output.status.success());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("cannot read configuration file"), "{stderr}");
}

#[test]
fn invalid_config_file_fails() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("awaycal.toml");
    std::fs::write(&path, "calender_id = 3\n").unwrap();

    let output = awaycal(&["--config", path.to_str().unwrap(), "agents"]);
    assert!(!output.status.success());
}

#[test]
fn unknown_format_is_rejected() {
    let output = awaycal(&["export", "--format", "xls"]);
    assert!(!output.status.success());
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn unknown_locale_is_rejected() {
    let output = awaycal(&["--locale", "fr", "export"]);
    assert!(!output.status.success());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("unknown locale"), "{stderr}");
}

#[test]
fn unreachable_database_fails() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("calendar.xlsx");

    let output = awaycal(&[
        "--db-host",
        "127.0.0.1",
        "--db-port",
        "1",
        "export",
        "--year",
        "2025",
        "--output",
        out.to_str().unwrap(),
    ]);
    assert!(!output.status.success());
    assert!(!out.exists());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("connecting to"), "{stderr}");
}
