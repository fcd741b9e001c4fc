use predicates::prelude::*;

use std::fs;
use tempfile::TempDir;

/// Deterministic xorshift noise standing in for encrypted content.
fn noise(len: usize) -> Vec<u8> {
    let mut state: u64 = 0x853c49e6748fea9b;
    let mut data = Vec::with_capacity(len);
    for _ in 0..len {
        state ^= state << 13;
        state ^= state >> 7;
        state ^= state << 17;
        data.push((state >> 32) as u8);
    }
    data
}

fn fixture_dir() -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("index.php"),
        "<?php\n// perfectly ordinary page\necho render_template('home');\n",
    )
    .unwrap();
    fs::write(dir.path().join("notes.txt"), "meeting notes, nothing to see here at all").unwrap();
    fs::write(dir.path().join("payload.bin"), noise(8192)).unwrap();
    dir
}

/// Test that the binary runs and shows help
#[test]
fn test_help_command() {
    #[allow(deprecated)]
    assert_cmd::Command::cargo_bin("stray")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Statistical scanner"));
}

/// Test that the binary shows version
#[test]
fn test_version_command() {
    #[allow(deprecated)]
    assert_cmd::Command::cargo_bin("stray")
        .unwrap()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("stray"));
}

/// Test scan of a nonexistent directory
#[test]
fn test_nonexistent_directory_fails() {
    #[allow(deprecated)]
    assert_cmd::Command::cargo_bin("stray")
        .unwrap()
        .args(["-e", "/nonexistent/path"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("does not exist"));
}

/// Test that running without any metric selected is a configuration error
#[test]
fn test_no_metrics_fails() {
    let dir = TempDir::new().unwrap();

    #[allow(deprecated)]
    assert_cmd::Command::cargo_bin("stray")
        .unwrap()
        .arg(dir.path().to_str().unwrap())
        .assert()
        .failure()
        .stderr(predicate::str::contains("no metrics selected"));
}

/// Test that a broken filename filter is rejected before scanning
#[test]
fn test_invalid_filter_fails() {
    let dir = TempDir::new().unwrap();

    #[allow(deprecated)]
    assert_cmd::Command::cargo_bin("stray")
        .unwrap()
        .args(["-e", dir.path().to_str().unwrap(), "[unclosed"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid filename filter"));
}

/// Test that zero block size is rejected before scanning
#[test]
fn test_zero_block_size_fails() {
    let dir = TempDir::new().unwrap();

    #[allow(deprecated)]
    assert_cmd::Command::cargo_bin("stray")
        .unwrap()
        .args(["-e", "-b", "0", dir.path().to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("block size"));
}

/// Entropy ranking puts the random payload on top of the table
#[test]
fn test_entropy_ranking_finds_the_payload() {
    let dir = fixture_dir();

    #[allow(deprecated)]
    assert_cmd::Command::cargo_bin("stray")
        .unwrap()
        .args(["-e", dir.path().to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("entropy results"))
        .stdout(predicate::str::contains("payload.bin"))
        .stdout(predicate::str::contains("Top cumulative ranked files"));
}

/// The full battery runs and produces one table per metric
#[test]
fn test_all_battery_prints_each_metric() {
    let dir = fixture_dir();

    #[allow(deprecated)]
    assert_cmd::Command::cargo_bin("stray")
        .unwrap()
        .args(["-a", dir.path().to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("index-of-coincidence results"))
        .stdout(predicate::str::contains("entropy results"))
        .stdout(predicate::str::contains("longest-token results"))
        .stdout(predicate::str::contains("signature results"))
        .stdout(predicate::str::contains("strict-signature results"));
}

/// The filename filter narrows the scan
#[test]
fn test_filename_filter_limits_scope() {
    let dir = fixture_dir();

    #[allow(deprecated)]
    assert_cmd::Command::cargo_bin("stray")
        .unwrap()
        .args(["-e", dir.path().to_str().unwrap(), r"\.php$"])
        .assert()
        .success()
        .stdout(predicate::str::contains("index.php"))
        .stdout(predicate::str::contains("payload.bin").not());
}

/// Alarm mode reports flagged files instead of rankings
#[test]
fn test_alarm_mode_flags_outliers() {
    let dir = TempDir::new().unwrap();
    for i in 0..6 {
        fs::write(
            dir.path().join(format!("page{i}.php")),
            "<?php echo 'the same ordinary page body, repeated verbatim'; ?>",
        )
        .unwrap();
    }
    fs::write(dir.path().join("dropper.php"), noise(4096)).unwrap();

    #[allow(deprecated)]
    assert_cmd::Command::cargo_bin("stray")
        .unwrap()
        .args(["-e", "-m", "1.5", dir.path().to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Flagged files for"))
        .stdout(predicate::str::contains("dropper.php"))
        .stdout(predicate::str::contains("Top cumulative ranked files").not());
}

/// Block mode reports byte positions alongside values
#[test]
fn test_block_mode_reports_positions() {
    let dir = TempDir::new().unwrap();
    let mut data = vec![b'a'; 4096];
    data.extend(noise(4096));
    fs::write(dir.path().join("stowaway.php"), data).unwrap();

    #[allow(deprecated)]
    assert_cmd::Command::cargo_bin("stray")
        .unwrap()
        .args(["-e", "-b", "4096", dir.path().to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("at byte 4096"));
}

/// CSV export writes the score matrix
#[test]
fn test_csv_export() {
    let dir = fixture_dir();
    let csv_path = dir.path().join("scores.csv");

    #[allow(deprecated)]
    assert_cmd::Command::cargo_bin("stray")
        .unwrap()
        .args([
            "-e",
            "-z",
            "-c",
            csv_path.to_str().unwrap(),
            dir.path().to_str().unwrap(),
            r"\.(php|txt)$",
        ])
        .assert()
        .success()
        .stderr(predicate::str::contains("CSV written to"));

    let content = fs::read_to_string(&csv_path).unwrap();
    let mut lines = content.lines();
    assert_eq!(lines.next().unwrap(), "filename,entropy,compression-ratio");
    assert_eq!(lines.count(), 2);
}

/// JSON mode emits the whole report on stdout
#[test]
fn test_json_report() {
    let dir = fixture_dir();

    #[allow(deprecated)]
    assert_cmd::Command::cargo_bin("stray")
        .unwrap()
        .args(["-e", "--json", dir.path().to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"files_scanned\": 3"))
        .stdout(predicate::str::contains("\"leaderboard\""))
        .stdout(predicate::str::contains("payload.bin"));
}
