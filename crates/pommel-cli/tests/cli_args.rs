//! Process-level checks of the binary: exit codes and printed surfaces.

use std::process::Command;

fn pommel() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_pommel"));
    // Inherited ENV/BROWSER/... vars must not leak into resolution.
    cmd.env_clear();
    cmd
}

#[test]
fn malformed_browser_env_var_exits_with_config_code() {
    let output = pommel().env("BROWSER", "opera").arg("config").output().unwrap();
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn unknown_browser_flag_is_a_usage_error() {
    let output = pommel()
        .args(["--browser", "opera", "list"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn config_prints_resolved_values_with_password_masked() {
    let output = pommel()
        .args(["config", "--env", "staging", "--password", "hunter2"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("\"environment\": \"staging\""));
    assert!(stdout.contains("\"password\": \"***\""));
    assert!(!stdout.contains("hunter2"));
}

#[test]
fn list_prints_the_registered_scenarios() {
    let output = pommel().arg("list").output().unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("login_valid_credentials_shows_dashboard"));
    assert!(stdout.contains("search_nonexistent_shows_no_results"));
    assert!(stdout.contains("[smoke, search, login]"));
}
