use std::process::{Command, Output};

fn run_probe(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_hello-probe"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to launch hello-probe")
}

fn stdout_lines(output: &Output) -> Vec<String> {
    String::from_utf8(output.stdout.clone())
        .unwrap()
        .lines()
        .map(str::to_string)
        .collect()
}

fn memory_value(line: &str) -> u64 {
    let value = line
        .strip_prefix("Memory usage: ")
        .and_then(|rest| rest.strip_suffix(" KB"))
        .unwrap_or_else(|| panic!("unexpected memory line: {:?}", line));
    assert!(
        !value.is_empty() && value.chars().all(|c| c.is_ascii_digit()),
        "memory value is not a non-negative integer: {:?}",
        value
    );
    value.parse().unwrap()
}

fn assert_contract(output: &Output) -> u64 {
    assert_eq!(output.status.code(), Some(0));

    let lines = stdout_lines(output);
    assert_eq!(lines.len(), 3, "stdout was {:?}", lines);
    assert_eq!(lines[0], "Hello, World!");
    assert_eq!(lines[1], "Sum: 15");
    memory_value(&lines[2])
}

#[test]
fn test_no_arguments() {
    let output = run_probe(&[]);
    let kb = assert_contract(&output);

    if cfg!(unix) {
        assert!(kb > 0);
    }
}

#[test]
fn test_extraneous_arguments_are_ignored() {
    for args in [
        vec!["foo", "bar"],
        vec!["--help"],
        vec!["--version"],
        vec!["-x", "--definitely-not-a-flag=1", "42"],
    ] {
        let output = run_probe(&args);
        assert_contract(&output);
    }
}

#[test]
fn test_repeated_runs_give_same_lines() {
    let first = run_probe(&[]);
    let second = run_probe(&[]);
    assert_contract(&first);
    assert_contract(&second);

    let first_lines = stdout_lines(&first);
    let second_lines = stdout_lines(&second);
    assert_eq!(first_lines[..2], second_lines[..2]);
}

#[test]
fn test_diagnostic_options_leave_stdout_alone() {
    let output = run_probe(&["--verbose", "--monitor", "--log-format", "json"]);
    assert_contract(&output);
    assert!(!output.stderr.is_empty());
}

#[test]
fn test_sysinfo_probe_reports_memory() {
    let output = run_probe(&["--probe", "sysinfo"]);
    assert!(assert_contract(&output) > 0);
}

#[test]
fn test_quiet_by_default() {
    let output = run_probe(&[]);
    assert_contract(&output);
    assert!(output.stderr.is_empty(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
}

#[cfg(target_os = "linux")]
#[test]
fn test_unwritable_stdout_still_exits_zero() {
    let full = std::fs::OpenOptions::new()
        .write(true)
        .open("/dev/full")
        .unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_hello-probe"))
        .env_remove("RUST_LOG")
        .stdout(full)
        .stderr(std::process::Stdio::piped())
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(0));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Report not delivered"), "stderr: {}", stderr);
}
