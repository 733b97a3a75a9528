//! Cross-process behavior of named guards, driven through the CLI binary.

use serial_test::serial;
use std::io::{BufRead, BufReader, Lines};
use std::path::Path;
use std::process::{Child, ChildStdout, Command, Output, Stdio};
use std::time::{Duration, Instant};
use tempfile::TempDir;

const BIN: &str = env!("CARGO_BIN_EXE_muxguard");

/// A child process holding a guard. Keeps its stdout open so the child never
/// hits a broken pipe while it holds.
struct Holder {
    child: Child,
    _stdout: Lines<BufReader<ChildStdout>>,
}

impl Holder {
    fn kill(mut self) {
        self.child.kill().unwrap();
        self.child.wait().unwrap();
    }

    fn wait(mut self) -> i32 {
        self.child.wait().unwrap().code().unwrap()
    }
}

/// Spawn `muxguard <args>` and wait until it reports holding the guard.
fn spawn_holder(lock_dir: &Path, args: &[&str], ready_prefix: &str) -> Holder {
    let mut child = Command::new(BIN)
        .arg("--lock-dir")
        .arg(lock_dir)
        .args(args)
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .unwrap();

    let mut lines = BufReader::new(child.stdout.take().unwrap()).lines();
    loop {
        let line = lines
            .next()
            .expect("holder exited before acquiring")
            .unwrap();
        if line.starts_with(ready_prefix) {
            break;
        }
    }

    Holder {
        child,
        _stdout: lines,
    }
}

fn muxguard(lock_dir: &Path, args: &[&str]) -> Output {
    Command::new(BIN)
        .arg("--lock-dir")
        .arg(lock_dir)
        .args(args)
        .output()
        .unwrap()
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
#[serial]
fn held_guard_times_out_in_other_process() {
    let temp_dir = TempDir::new().unwrap();
    let dir = temp_dir.path();

    let holder = spawn_holder(
        dir,
        &["acquire", "shared", "--hold-ms", "30000"],
        "Acquired guard",
    );

    let start = Instant::now();
    let output = muxguard(dir, &["acquire", "shared", "--timeout-ms", "200"]);
    assert_eq!(output.status.code(), Some(2));
    assert!(start.elapsed() >= Duration::from_millis(200));
    assert!(stderr(&output).starts_with("Error: guard is busy"));

    // A different name is unaffected.
    let output = muxguard(dir, &["acquire", "other", "--timeout-ms", "0"]);
    assert_eq!(output.status.code(), Some(0));

    let output = muxguard(dir, &["list"]);
    let listing = stdout(&output);
    assert!(listing.contains("shared:"));
    assert!(listing.contains("State:      held"));

    holder.kill();
}

#[test]
#[serial]
fn waiter_acquires_after_holder_releases() {
    let temp_dir = TempDir::new().unwrap();
    let dir = temp_dir.path();

    let holder = spawn_holder(
        dir,
        &["acquire", "handoff", "--hold-ms", "300"],
        "Acquired guard",
    );

    let output = muxguard(dir, &["acquire", "handoff", "--timeout-ms", "20000"]);
    assert_eq!(output.status.code(), Some(0));
    let text = stdout(&output);
    assert!(text.contains("Acquired guard: handoff"));
    assert!(!text.contains("Recovered"));

    assert_eq!(holder.wait(), 0);
}

#[test]
#[serial]
fn killed_holder_is_recovered() {
    let temp_dir = TempDir::new().unwrap();
    let dir = temp_dir.path();

    let holder = spawn_holder(
        dir,
        &["acquire", "fragile", "--hold-ms", "30000"],
        "Acquired guard",
    );
    holder.kill();

    let output = muxguard(dir, &["list"]);
    assert!(stdout(&output).contains("State:      abandoned"));

    let output = muxguard(dir, &["acquire", "fragile", "--timeout-ms", "5000"]);
    assert_eq!(output.status.code(), Some(0));
    let text = stdout(&output);
    assert!(text.contains("Recovered abandoned guard: fragile"));
    assert!(text.contains("Previous PID:"));

    // The recovering process released cleanly, so the next one starts fresh.
    let output = muxguard(dir, &["acquire", "fragile", "--timeout-ms", "0"]);
    assert!(stdout(&output).contains("Acquired guard: fragile"));
}

#[test]
#[serial]
fn clear_removes_abandoned_metadata() {
    let temp_dir = TempDir::new().unwrap();
    let dir = temp_dir.path();

    let holder = spawn_holder(
        dir,
        &["acquire", "stale", "--hold-ms", "30000"],
        "Acquired guard",
    );

    let output = muxguard(dir, &["clear", "stale", "--force"]);
    assert_eq!(output.status.code(), Some(2));

    holder.kill();

    let output = muxguard(dir, &["clear", "stale"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("--force"));

    let output = muxguard(dir, &["clear", "stale", "--force"]);
    assert_eq!(output.status.code(), Some(0));
    assert!(stdout(&output).contains("Cleared guard: stale"));

    let output = muxguard(dir, &["list"]);
    assert!(stdout(&output).contains("State:      free"));
}

#[test]
#[serial]
fn second_instance_is_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let dir = temp_dir.path();

    let first = spawn_holder(
        dir,
        &["single-instance", "my-app", "--hold-ms", "30000"],
        "No other instance running",
    );

    let output = muxguard(dir, &["single-instance", "my-app"]);
    assert_eq!(output.status.code(), Some(5));
    assert!(stderr(&output).contains("another instance is already running: my-app"));

    first.kill();

    let output = muxguard(dir, &["single-instance", "my-app"]);
    assert_eq!(output.status.code(), Some(0));
}

#[test]
#[serial]
fn run_single_scenario_from_cli() {
    let temp_dir = TempDir::new().unwrap();
    let dir = temp_dir.path();

    let output = muxguard(dir, &["run", "9"]);
    assert_eq!(output.status.code(), Some(0));
    let text = stdout(&output);
    assert!(text.contains("Scenario 9: producer-consumer"));
    assert_eq!(text.matches("consumed: 123").count(), 1);

    let output = muxguard(dir, &["run", "42"]);
    assert_eq!(output.status.code(), Some(1));
}
