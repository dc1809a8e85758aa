use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn metagrep() -> Command {
    let mut cmd = Command::cargo_bin("metagrep").unwrap();
    cmd.env("NO_COLOR", "1");
    cmd
}

#[test]
fn test_basic_search() -> Result<(), Box<dyn std::error::Error>> {
    let temp_dir = TempDir::new()?;
    fs::write(
        temp_dir.path().join("notes.txt"),
        "first line\nthe pattern lives here\nlast line\n",
    )?;

    metagrep()
        .arg("pattern")
        .arg(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Found"))
        .stdout(predicate::str::contains("the pattern lives here"));

    Ok(())
}

#[test]
fn test_no_matches_exits_with_one() -> Result<(), Box<dyn std::error::Error>> {
    let temp_dir = TempDir::new()?;
    fs::write(temp_dir.path().join("notes.txt"), "nothing to see\n")?;

    metagrep()
        .arg("absent")
        .arg(temp_dir.path())
        .assert()
        .code(1)
        .stdout(predicate::str::contains("No matches found"));

    Ok(())
}

#[test]
fn test_invalid_regex_exits_with_two() -> Result<(), Box<dyn std::error::Error>> {
    let temp_dir = TempDir::new()?;
    fs::write(temp_dir.path().join("notes.txt"), "text\n")?;

    metagrep()
        .arg("--regex")
        .arg("(unclosed")
        .arg(temp_dir.path())
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Invalid pattern"));

    Ok(())
}

#[test]
fn test_json_output() -> Result<(), Box<dyn std::error::Error>> {
    let temp_dir = TempDir::new()?;
    fs::write(temp_dir.path().join("a.txt"), "hello world\nfoo hello\n")?;

    let output = metagrep()
        .arg("hello")
        .arg(temp_dir.path())
        .arg("-C")
        .arg("1")
        .arg("--format")
        .arg("json")
        .output()?;
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout)?;
    let matches = report["matches"].as_array().unwrap();
    assert_eq!(matches.len(), 2);
    assert_eq!(matches[0]["line_number"], 1);
    assert_eq!(matches[0]["context_after"][0], "foo hello");
    assert_eq!(matches[1]["context_before"][0], "hello world");

    Ok(())
}

#[test]
fn test_extension_and_exclude_filters() -> Result<(), Box<dyn std::error::Error>> {
    let temp_dir = TempDir::new()?;
    fs::create_dir_all(temp_dir.path().join("build"))?;
    fs::write(temp_dir.path().join("main.rs"), "needle\n")?;
    fs::write(temp_dir.path().join("notes.md"), "needle\n")?;
    fs::write(temp_dir.path().join("build/gen.rs"), "needle\n")?;

    metagrep()
        .arg("needle")
        .arg(temp_dir.path())
        .arg("--extensions")
        .arg("rs")
        .arg("--exclude")
        .arg("/build/")
        .arg("--format")
        .arg("json")
        .assert()
        .success()
        .stdout(predicate::str::contains("main.rs"))
        .stdout(predicate::str::contains("notes.md").not())
        .stdout(predicate::str::contains("gen.rs").not());

    Ok(())
}

#[test]
fn test_stats_and_log_file() -> Result<(), Box<dyn std::error::Error>> {
    let temp_dir = TempDir::new()?;
    fs::write(temp_dir.path().join("a.txt"), "needle\n")?;
    let log_path = temp_dir.path().join("logs/metagrep.log");

    metagrep()
        .arg("needle")
        .arg(temp_dir.path())
        .arg("--stats")
        .arg("--verbose")
        .arg("--log")
        .arg(&log_path)
        .assert()
        .success()
        .stderr(predicate::str::contains("Files scanned"));

    let log = fs::read_to_string(&log_path)?;
    assert!(log.contains("Searching"));

    Ok(())
}

#[test]
fn test_missing_pattern_is_a_usage_error() {
    metagrep().assert().code(2);
}
