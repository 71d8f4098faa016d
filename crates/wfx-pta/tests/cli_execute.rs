#![cfg(all(unix, feature = "cli"))]

use std::process::{Command, Output};
use std::time::{Duration, Instant};

/// Run with the direct link, replacing the firmware tool with `exec`.
fn execute(exec: &str, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_wfx-pta"))
        .env_remove("WFX_PTA_LINK")
        .env_remove("WFX_PTA_TIMEOUT")
        .args(["-x", "--link", "direct", "--exec", exec])
        .args(args)
        .output()
        .expect("wfx-pta should run")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

// `#` turns the escaped frame appended by the dispatcher into a shell comment.

#[test]
fn success_prints_only_the_status() {
    let output = execute("echo 0 #", &["state", "ON"]);
    assert_eq!(output.status.code(), Some(0));
    assert_eq!(stdout(&output), "HI_STATUS_SUCCESS (0)\n");
}

#[test]
fn refusal_exits_with_firmware_code_and_shows_frame() {
    let output = execute("echo 2 #", &["--format", "pretty", "state", "ON"]);
    assert_eq!(output.status.code(), Some(2));
    assert_eq!(
        stdout(&output),
        "Sent = \\x08\\x00\\x2d\\x00\\x01\\x00\\x00\\x00\nStatus = HI_INVALID_PARAMETER (2)\n"
    );
}

#[test]
fn unsupported_message_exits_four() {
    let output = execute("echo 4 #", &["priority", "BALANCED"]);
    assert_eq!(output.status.code(), Some(4));
}

#[test]
fn unknown_reply_exits_one() {
    let output = execute("echo busy #", &["state", "OFF"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stdout(&output).contains("unknown reply \"busy\""));
}

#[test]
fn frame_is_passed_to_the_exec_command() {
    let output = execute("printf '%s' ", &["--format", "json", "state", "ON"]);
    let report: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("json output should parse");

    assert_eq!(report["sent"], true);
    assert_eq!(report["status"]["name"], "UNKNOWN");
    assert_eq!(
        report["status"]["reply"],
        "\\x08\\x00\\x2d\\x00\\x01\\x00\\x00\\x00"
    );
}

#[test]
fn slow_target_times_out() {
    let started = Instant::now();
    let output = execute("sleep 5 #", &["--timeout", "200ms", "state", "ON"]);

    assert_eq!(output.status.code(), Some(124));
    assert!(started.elapsed() < Duration::from_secs(4));
    assert!(output.stdout.is_empty());
}

#[test]
fn verbose_failure_shows_the_frame_on_stderr() {
    let output = execute("sleep 5 #", &["-v", "--timeout", "100ms", "state", "ON"]);
    assert_eq!(output.status.code(), Some(124));
    assert!(String::from_utf8_lossy(&output.stderr)
        .contains("Sent = \\x08\\x00\\x2d\\x00\\x01\\x00\\x00\\x00"));
}

#[test]
fn uart_without_port_is_usage_error() {
    let output = Command::new(env!("CARGO_BIN_EXE_wfx-pta"))
        .env_remove("WFX_PTA_PORT")
        .args(["-x", "--link", "uart", "state", "ON"])
        .output()
        .expect("wfx-pta should run");
    assert_eq!(output.status.code(), Some(64));
}

#[test]
fn selftest_sends_three_commands() {
    let output = execute("echo 0 #", &["--format", "json", "selftest"]);
    assert_eq!(output.status.code(), Some(0));

    let steps: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("json output should parse");
    let steps = steps.as_array().expect("steps should be an array");
    let commands: Vec<_> = steps.iter().map(|step| step["command"].clone()).collect();
    assert_eq!(commands, ["settings", "priority", "state"]);
    assert_eq!(steps[2]["frame"], "\\x08\\x00\\x2d\\x00\\x00\\x00\\x00\\x00");
}
