use std::process::Command;

#[test]
fn cli_compiles_without_warnings() {
    let status = Command::new(env!("CARGO"))
        .current_dir(env!("CARGO_MANIFEST_DIR"))
        .args(["check", "--quiet", "--bin", "grid-snake"])
        .status()
        .expect("failed to invoke cargo check for grid-snake CLI binary");

    assert!(status.success(), "cargo check --bin grid-snake should succeed");
}

#[test]
fn seeded_run_prints_a_summary() {
    let output = Command::new(env!("CARGO_BIN_EXE_grid-snake"))
        .args([
            "--width", "10", "--height", "10", "--seed", "3", "--ticks", "50",
        ])
        .output()
        .expect("failed to run grid-snake");

    assert!(output.status.success(), "grid-snake exited with {}", output.status);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Wall collision"), "stdout: {stdout}");
    assert!(stdout.contains("episode 1: score"), "stdout: {stdout}");
    assert!(stdout.contains("ticks 5 (over)"), "stdout: {stdout}");
}

#[test]
fn unreadable_config_fails() {
    let output = Command::new(env!("CARGO_BIN_EXE_grid-snake"))
        .args(["--config", "/nonexistent/grid-snake.toml"])
        .output()
        .expect("failed to run grid-snake");

    assert!(!output.status.success());
}
