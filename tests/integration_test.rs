use std::fs;
use std::process::Command;

#[test]
fn test_runtime_table_generation() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let output_path = dir.path().join("runtime.txt");

    let output = Command::new(env!("CARGO_BIN_EXE_parmr"))
        .args(["--min-size", "4", "--max-size", "400", "--steps", "5", "-r", "1", "-j", "2", "-q"])
        .arg("-o")
        .arg(&output_path)
        .output()
        .expect("Failed to execute parmr");

    if !output.status.success() {
        eprintln!("stdout: {}", String::from_utf8_lossy(&output.stdout));
        eprintln!("stderr: {}", String::from_utf8_lossy(&output.stderr));
        panic!("parmr failed");
    }

    let contents = fs::read_to_string(&output_path).expect("Failed to read runtime table");
    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(lines.len(), 5, "One row per sample size");

    // size column plus four timings
    let first: Vec<&str> = lines[0].split('\t').collect();
    assert_eq!(first.len(), 5);
    assert_eq!(first[0], "4");
    assert_eq!(lines[4].split('\t').next(), Some("400"));
    for timing in &first[1..] {
        let value: f64 = timing.parse().expect("Timing is not a number");
        assert!(value >= 0.0);
    }
}

#[test]
fn test_rejects_inverted_size_range() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");

    let output = Command::new(env!("CARGO_BIN_EXE_parmr"))
        .args(["--min-size", "100", "--max-size", "10", "-q"])
        .arg("-o")
        .arg(dir.path().join("runtime.txt"))
        .output()
        .expect("Failed to execute parmr");

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("below minimum"));
}

#[test]
fn test_rejects_zero_min_chunk_size() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");

    let output = Command::new(env!("CARGO_BIN_EXE_parmr"))
        .args(["--min-chunk-size", "0", "-q"])
        .arg("-o")
        .arg(dir.path().join("runtime.txt"))
        .output()
        .expect("Failed to execute parmr");

    assert!(!output.status.success());
}
