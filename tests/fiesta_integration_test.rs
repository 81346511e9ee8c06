use anyhow::Result;
use clap::Parser;
use error_fiesta::core::probes::{self, DEFAULT_MISSING_FILE};
use error_fiesta::core::report::{render_fiesta, ReportFormat};
use error_fiesta::domain::model::{FaultKind, Outcome};
use error_fiesta::{CliConfig, FiestaRunner, TomlConfig};
use std::process::Command;
use tempfile::TempDir;

#[test]
fn test_every_category_is_caught_once_per_run() -> Result<()> {
    let config = CliConfig::parse_from(["error-fiesta"]);
    let report = FiestaRunner::new(config).quiet().run()?;

    assert_eq!(report.total(), probes::catalog().len());
    assert!(report.all_matched());

    let value_errors = report
        .entries
        .iter()
        .filter(|e| e.expected == FaultKind::Value)
        .count();
    assert_eq!(value_errors, 2);
    Ok(())
}

#[test]
fn test_missing_file_probe_uses_configured_path() -> Result<()> {
    let dir = TempDir::new()?;
    let missing = dir.path().join("still-not-here.txt");
    let missing = missing.to_str().unwrap_or(DEFAULT_MISSING_FILE);

    let config = CliConfig::parse_from([
        "error-fiesta",
        "--only",
        "FileNotFoundError",
        "--missing-file",
        missing,
    ]);
    let report = FiestaRunner::new(config).quiet().run()?;

    assert_eq!(report.total(), 1);
    assert!(report.all_matched());
    Ok(())
}

#[test]
fn test_existing_file_is_reported_as_not_raised() -> Result<()> {
    let dir = TempDir::new()?;
    let present = dir.path().join("present.txt");
    std::fs::write(&present, "here")?;

    let config = CliConfig::parse_from([
        "error-fiesta",
        "--only",
        "FileNotFoundError",
        "--missing-file",
        present.to_str().unwrap_or_default(),
    ]);
    let report = FiestaRunner::new(config).quiet().run()?;

    assert_eq!(report.entries[0].outcome, Outcome::NotRaised);
    assert_eq!(report.not_raised(), 1);

    let summary = render_fiesta(&report, ReportFormat::Text)?;
    assert!(summary.contains("NO EXCEPTION (unexpected)"));
    Ok(())
}

#[test]
fn test_toml_selection_drives_runner() -> Result<()> {
    let file = TomlConfig::from_toml_str(
        r#"
[probes]
only = ["RecursionError", "MemoryError"]
recursion_limit = 7
"#,
    )?;
    let report = FiestaRunner::new(file).quiet().run()?;

    let names: Vec<_> = report.entries.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, vec!["RecursionError", "MemoryError"]);
    match &report.entries[0].outcome {
        Outcome::Caught { fault } => assert!(fault.message.contains("(7)")),
        Outcome::NotRaised => panic!("recursion probe did not raise"),
    }
    Ok(())
}

#[test]
fn test_binary_prints_summary() -> Result<()> {
    let output = Command::new(env!("CARGO_BIN_EXE_error-fiesta"))
        .args(["--only", "ZeroDivisionError,StopIteration", "--strict"])
        .output()?;

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout)?;
    assert!(stdout.contains("--- Running test: ZeroDivisionError ---"));
    assert!(stdout.contains("[CAUGHT] ZeroDivisionError -> ZeroDivisionError: division by zero"));
    assert!(stdout.contains("=== SUMMARY ==="));
    assert!(stdout.contains("Total tests run: 2"));
    Ok(())
}

#[test]
fn test_binary_strict_mode_fails_when_nothing_is_raised() -> Result<()> {
    let dir = TempDir::new()?;
    let present = dir.path().join("present.txt");
    std::fs::write(&present, "here")?;

    let strict = Command::new(env!("CARGO_BIN_EXE_error-fiesta"))
        .args(["--strict", "--only", "FileNotFoundError", "--missing-file"])
        .arg(&present)
        .output()?;
    assert_eq!(strict.status.code(), Some(1));
    assert!(String::from_utf8(strict.stdout)?.contains("NO EXCEPTION (unexpected)"));

    let lenient = Command::new(env!("CARGO_BIN_EXE_error-fiesta"))
        .args(["--only", "FileNotFoundError", "--missing-file"])
        .arg(&present)
        .output()?;
    assert_eq!(lenient.status.code(), Some(0));
    Ok(())
}

#[test]
fn test_binary_text_report_to_file_keeps_stdout_clean() -> Result<()> {
    let dir = TempDir::new()?;
    let report_path = dir.path().join("fiesta.txt");

    let output = Command::new(env!("CARGO_BIN_EXE_error-fiesta"))
        .args(["--only", "KeyError", "--output"])
        .arg(&report_path)
        .output()?;
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout)?;
    assert!(!stdout.contains("--- Running test"));
    assert!(!stdout.contains("[CAUGHT]"));

    let report = std::fs::read_to_string(&report_path)?;
    assert!(report.contains("=== SUMMARY ==="));
    assert!(report.contains("KeyError: 'missing'"));
    Ok(())
}

#[test]
fn test_binary_writes_csv_report() -> Result<()> {
    let dir = TempDir::new()?;
    let report_path = dir.path().join("fiesta.csv");

    let status = Command::new(env!("CARGO_BIN_EXE_error-fiesta"))
        .args(["--format", "csv", "--output"])
        .arg(&report_path)
        .status()?;
    assert!(status.success());

    let csv = std::fs::read_to_string(&report_path)?;
    assert!(csv.starts_with("name,expected,result,matched"));
    assert_eq!(csv.lines().count(), 26);
    assert!(csv.lines().skip(1).all(|line| line.ends_with(",true")));
    Ok(())
}

#[test]
fn test_binary_rejects_unknown_probe() -> Result<()> {
    let output = Command::new(env!("CARGO_BIN_EXE_error-fiesta"))
        .env_remove("RUST_LOG")
        .args(["--only", "NoSuchError"])
        .output()?;

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8(output.stderr)?;
    assert!(stderr.contains("There is no probe called 'NoSuchError'"));
    assert!(stderr.contains("Suggestion: Run without --only"));
    Ok(())
}
