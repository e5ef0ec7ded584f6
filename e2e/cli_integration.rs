// e2e/cli_integration.rs — CLI integration tests.
//
// Tests the `gt1z` binary as a black-box tool using std::process::Command.
// Covers mode dispatch, suffix-based output naming, the overwrite policy,
// verify exit codes, and the help/version flags.

use std::fs;
use std::path::PathBuf;
use std::process::Command;

use tempfile::TempDir;

/// Locate the `gt1z` binary produced by Cargo.
fn gt1z_bin() -> PathBuf {
    // CARGO_BIN_EXE_gt1z is set by Cargo when running integration tests.
    // Fall back to walking up from the test binary location.
    if let Ok(p) = std::env::var("CARGO_BIN_EXE_gt1z") {
        return PathBuf::from(p);
    }
    let mut p = std::env::current_exe().unwrap();
    p.pop();
    if p.ends_with("deps") {
        p.pop();
    }
    p.push("gt1z");
    p
}

/// Create a TempDir containing a small GT1 file.
fn make_temp_input() -> (TempDir, PathBuf) {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("prog.gt1");
    let mut gt1 = vec![0x02, 0x00, 0x00];
    gt1.extend((0..=255u16).map(|i| (i % 7) as u8 * 31));
    gt1.extend_from_slice(&[0x00, 0x02, 0x00]);
    fs::write(&input, gt1).unwrap();
    (dir, input)
}

// ── 1. Compress / decompress / verify round trip ─────────────────────────────

#[test]
fn cli_round_trip_with_suffix_naming() {
    let (dir, input) = make_temp_input();
    let original = fs::read(&input).unwrap();

    // Compress: output name derived by swapping .gt1 for .gt1z.
    let status = Command::new(gt1z_bin())
        .arg(input.to_str().unwrap())
        .current_dir(dir.path())
        .status()
        .expect("failed to run gt1z");
    assert!(status.success(), "compress should exit 0");
    let compressed = dir.path().join("prog.gt1z");
    assert!(compressed.exists(), "derived output file should exist");

    // Verify against the source.
    let status = Command::new(gt1z_bin())
        .args(["-v", compressed.to_str().unwrap(), input.to_str().unwrap()])
        .status()
        .expect("failed to run gt1z -v");
    assert!(status.success(), "verify should exit 0");

    // Decompress to an explicit filename.
    let roundtrip = dir.path().join("back.gt1");
    let status = Command::new(gt1z_bin())
        .args([
            "-d",
            compressed.to_str().unwrap(),
            roundtrip.to_str().unwrap(),
        ])
        .status()
        .expect("failed to run gt1z -d");
    assert!(status.success(), "decompress should exit 0");
    assert_eq!(fs::read(&roundtrip).unwrap(), original);
}

// ── 2. Overwrite policy ──────────────────────────────────────────────────────

#[test]
fn cli_refuses_to_overwrite_without_force() {
    let (dir, input) = make_temp_input();
    let output = dir.path().join("prog.gt1z");
    fs::write(&output, b"sentinel").unwrap();

    let out = Command::new(gt1z_bin())
        .arg(input.to_str().unwrap())
        .current_dir(dir.path())
        .output()
        .expect("failed to run gt1z");
    assert!(!out.status.success(), "should refuse to overwrite");
    assert_eq!(fs::read(&output).unwrap(), b"sentinel");
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(
        stderr.contains("not overwriting"),
        "stderr should name the refusal; got: {stderr}"
    );

    // -f overrides.
    let status = Command::new(gt1z_bin())
        .args(["-f", input.to_str().unwrap()])
        .current_dir(dir.path())
        .status()
        .expect("failed to run gt1z -f");
    assert!(status.success(), "-f should allow the overwrite");
    assert_ne!(fs::read(&output).unwrap(), b"sentinel");
}

// ── 3. Verify failure exit code ──────────────────────────────────────────────

#[test]
fn cli_verify_mismatch_exits_nonzero() {
    let (dir, input) = make_temp_input();
    let status = Command::new(gt1z_bin())
        .arg(input.to_str().unwrap())
        .current_dir(dir.path())
        .status()
        .unwrap();
    assert!(status.success());

    // Damage the reference.
    let other = dir.path().join("other.gt1");
    let mut bytes = fs::read(&input).unwrap();
    bytes[4] ^= 0x80;
    fs::write(&other, bytes).unwrap();

    let compressed = dir.path().join("prog.gt1z");
    let out = Command::new(gt1z_bin())
        .args(["-v", compressed.to_str().unwrap(), other.to_str().unwrap()])
        .output()
        .unwrap();
    assert!(!out.status.success(), "mismatch should exit non-zero");
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("does not match"), "got: {stderr}");
}

// ── 4. Corrupt input ─────────────────────────────────────────────────────────

#[test]
fn cli_reports_corrupt_input() {
    let dir = TempDir::new().unwrap();
    let bogus = dir.path().join("bogus.gt1z");
    fs::write(&bogus, [0x12, 0x34, 0x56]).unwrap();
    let out = Command::new(gt1z_bin())
        .args(["-d", bogus.to_str().unwrap()])
        .current_dir(dir.path())
        .output()
        .unwrap();
    assert!(!out.status.success());
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("corrupted data"), "got: {stderr}");
}

// ── 5. Usage errors ──────────────────────────────────────────────────────────

#[test]
fn cli_conflicting_modes_exit_nonzero() {
    let out = Command::new(gt1z_bin())
        .args(["-c", "-d", "prog.gt1"])
        .output()
        .unwrap();
    assert!(!out.status.success());
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("conflicting options"), "got: {stderr}");
}

#[test]
fn cli_missing_input_prints_usage() {
    let out = Command::new(gt1z_bin()).output().unwrap();
    assert!(!out.status.success());
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("Usage"), "got: {stderr}");
}

// ── 6. Help and version ──────────────────────────────────────────────────────

#[test]
fn cli_version_flag() {
    let out = Command::new(gt1z_bin()).arg("--version").output().unwrap();
    assert!(out.status.success());
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("1.0.0"), "got: {stdout}");
}

#[test]
fn cli_help_flag() {
    let out = Command::new(gt1z_bin()).arg("-h").output().unwrap();
    assert!(out.status.success());
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("Usage"), "got: {stderr}");
}

// ── 7. Relocatable warning ───────────────────────────────────────────────────

#[test]
fn cli_warns_when_not_relocatable() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("split.gt1");
    let mut gt1 = vec![0x02, 0x00, 0x02, 0x11, 0x22];
    gt1.extend_from_slice(&[0x05, 0x00, 0x02, 0x33, 0x44]);
    gt1.extend_from_slice(&[0x00, 0x02, 0x00]);
    fs::write(&input, gt1).unwrap();

    let out = Command::new(gt1z_bin())
        .args(["-r", input.to_str().unwrap()])
        .current_dir(dir.path())
        .output()
        .unwrap();
    assert!(out.status.success());
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("not relocatable"), "got: {stderr}");
}
