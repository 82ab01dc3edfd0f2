//! The binary driven through a pipe instead of a terminal.

use std::fs;
use std::io::Write;
use std::path::Path;
use std::process::{Command, Output, Stdio};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

fn run_piped(dir: &Path, input: &str) -> Output {
    let config = dir.join("config.toml");
    fs::write(
        &config,
        format!("data_dir = {:?}\n", dir.join("data").display().to_string()),
    )
    .unwrap();

    let mut child = Command::new(env!("CARGO_BIN_EXE_mdshell"))
        .env("MDSHELL_CONFIG", &config)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();
    child
        .stdin
        .take()
        .unwrap()
        .write_all(input.as_bytes())
        .unwrap();

    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let _ = tx.send(child.wait_with_output());
    });
    rx.recv_timeout(Duration::from_secs(10))
        .expect("mdshell did not exit")
        .unwrap()
}

#[test]
fn test_piped_session_lists_profiles() {
    let dir = tempfile::tempdir().unwrap();
    let output = run_piped(dir.path(), "profile create work\nprofile list\n");
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.ends_with("Profiles:\nprimary\nwork\n"), "{stdout}");
}

#[test]
fn test_piped_confirmation_reads_next_line() {
    let dir = tempfile::tempdir().unwrap();
    let output = run_piped(
        dir.path(),
        "profile create work\nprofile delete work\nyes\nprofile list\n",
    );
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("Profile 'work' has been deleted"), "{stdout}");
    assert!(stdout.ends_with("Profiles:\nprimary\n"), "{stdout}");
}
