use std::path::PathBuf;
use std::process::{Command, Output};

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn loopjump(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_loopjump"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute loopjump")
}

fn stdout_of(output: &Output) -> String {
    assert!(
        output.status.success(),
        "Command failed with status: {:?}\nstderr: {}",
        output.status,
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).into_owned()
}

/// Value printed after `label:` on its own line
fn field<'a>(stdout: &'a str, label: &str) -> &'a str {
    stdout
        .lines()
        .map(str::trim)
        .find_map(|line| line.strip_prefix(label))
        .map(|rest| rest.trim_start_matches(':').trim())
        .unwrap_or_else(|| panic!("no '{}' line in output:\n{}", label, stdout))
}

#[test]
fn test_run_counts_to_ten() {
    let program = fixture("count_to_ten.txt");
    let stdout = stdout_of(&loopjump(&["run", program.to_str().unwrap()]));

    assert_eq!(field(&stdout, "Registers"), "[100, 10, 1, 0, 0, 0]");
    assert_eq!(field(&stdout, "Halted"), "true");
    assert_eq!(field(&stdout, "Steps"), "41");
}

#[test]
fn test_accelerate_agrees_with_run() {
    let program = fixture("count_to_ten.txt");
    let path = program.to_str().unwrap();
    let plain = stdout_of(&loopjump(&["run", path]));
    let fast = stdout_of(&loopjump(&["accelerate", path, "--replay-budget", "5"]));

    assert_eq!(field(&fast, "Registers"), field(&plain, "Registers"));
    assert_eq!(field(&fast, "Halted"), "true");

    let concrete: u64 = field(&fast, "Concrete steps").parse().unwrap();
    assert!(concrete < 41, "expected fewer than 41 concrete steps, got {}", concrete);
}

#[test]
fn test_accelerate_long_loop() {
    let program = fixture("count_to_million.txt");
    let stdout = stdout_of(&loopjump(&[
        "accelerate",
        program.to_str().unwrap(),
        "--replay-budget",
        "5",
        "--show-patterns",
    ]));

    assert_eq!(field(&stdout, "Registers"), "[100, 1000000, 1, 0, 0, 0]");
    let skipped: u64 = field(&stdout, "Iterations skipped").parse().unwrap();
    assert!(skipped > 500_000);
    assert!(stdout.contains("Patterns ("));
    assert!(stdout.contains("library version"));
    assert!(stdout.contains("[0] Pattern("));
}

#[test]
fn test_discover_prints_pattern() {
    let program = fixture("count_to_ten.txt");
    let stdout = stdout_of(&loopjump(&[
        "discover",
        program.to_str().unwrap(),
        "--registers",
        "1,1,0,0,0,0",
    ]));

    assert!(stdout.contains("Pattern found:"), "stdout: {}", stdout);
    assert_eq!(field(&stdout, "shift"), "[0, 1, 0, 0, 0, 0]");
}

#[test]
fn test_discover_without_pattern() {
    let program = fixture("count_to_ten.txt");
    let stdout = stdout_of(&loopjump(&["discover", program.to_str().unwrap()]));
    assert!(stdout.contains("No pattern found"));
    assert_eq!(field(&stdout, "Steps probed"), "12");
}

#[test]
fn test_unknown_opcode_fails() {
    let program = fixture("unknown_opcode.txt");
    let output = loopjump(&["run", program.to_str().unwrap()]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("line 3"), "stderr: {}", stderr);
    assert!(stderr.contains("unknown opcode"), "stderr: {}", stderr);
}

#[test]
fn test_wrong_register_count_fails() {
    let program = fixture("count_to_ten.txt");
    let output = loopjump(&["run", program.to_str().unwrap(), "--registers", "1,2,3"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("expected 6 register values"), "stderr: {}", stderr);
}

#[test]
fn test_missing_file_fails() {
    let output = loopjump(&["run", "/nonexistent/program.txt"]);
    assert!(!output.status.success());
}
