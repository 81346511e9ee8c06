use crate::core::Storage;
use crate::domain::model::{FiestaReport, ScoreCard};
use crate::utils::error::{FiestaError, Result};
use crate::utils::validation::validate_one_of;
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    #[default]
    Text,
    Json,
    Csv,
}

impl ReportFormat {
    pub const NAMES: [&'static str; 3] = ["text", "json", "csv"];
}

impl FromStr for ReportFormat {
    type Err = FiestaError;

    fn from_str(s: &str) -> Result<Self> {
        let name = s.to_lowercase();
        validate_one_of("format", &name, &Self::NAMES)?;
        Ok(match name.as_str() {
            "json" => Self::Json,
            "csv" => Self::Csv,
            _ => Self::Text,
        })
    }
}

pub fn render_fiesta(report: &FiestaReport, format: ReportFormat) -> Result<String> {
    match format {
        ReportFormat::Text => Ok(fiesta_summary(report)),
        ReportFormat::Json => Ok(serde_json::to_string_pretty(report)? + "\n"),
        ReportFormat::Csv => {
            let mut writer = csv::Writer::from_writer(Vec::new());
            writer.write_record(["name", "expected", "result", "matched"])?;
            for entry in &report.entries {
                writer.write_record([
                    entry.name.as_str(),
                    entry.expected.name(),
                    entry.result_text().as_str(),
                    if entry.matched() { "true" } else { "false" },
                ])?;
            }
            finish_csv(writer)
        }
    }
}

/// The console summary printed after all probes have run.
pub fn fiesta_summary(report: &FiestaReport) -> String {
    let mut out = String::from("\n=== SUMMARY ===\n");
    for entry in &report.entries {
        let _ = writeln!(out, "{:30} -> {}", entry.name, entry.result_text());
    }
    let _ = writeln!(out, "\nTotal tests run: {}", report.total());
    let _ = writeln!(
        out,
        "Caught: {}, Mismatched: {}, Not raised: {}",
        report.caught(),
        report.mismatched(),
        report.not_raised()
    );
    out
}

pub fn render_score_card(card: &ScoreCard, format: ReportFormat) -> Result<String> {
    match format {
        ReportFormat::Text => {
            let mut out = String::new();
            for (i, scored) in card.results.iter().enumerate() {
                if i > 0 {
                    out.push('\n');
                }
                let b = &scored.breakdown;
                let _ = writeln!(out, "=== {} ===", scored.name);
                let _ = writeln!(out, "Base Score: {}", b.base_score);
                let _ = writeln!(out, "Commits: {}", b.commits);
                let _ = writeln!(out, "Speed Bonus: {}", b.speed_bonus);
                let _ = writeln!(out, "Efficiency Penalty: {}", b.efficiency_penalty);
                let _ = writeln!(out, "Final Score: {}", b.final_score);
            }
            Ok(out)
        }
        ReportFormat::Json => Ok(serde_json::to_string_pretty(card)? + "\n"),
        ReportFormat::Csv => {
            let mut writer = csv::Writer::from_writer(Vec::new());
            writer.write_record([
                "name",
                "base_score",
                "commits",
                "speed_bonus",
                "efficiency_penalty",
                "final_score",
            ])?;
            for scored in &card.results {
                let b = &scored.breakdown;
                writer.write_record([
                    scored.name.clone(),
                    b.base_score.to_string(),
                    b.commits.to_string(),
                    b.speed_bonus.to_string(),
                    b.efficiency_penalty.to_string(),
                    b.final_score.to_string(),
                ])?;
            }
            finish_csv(writer)
        }
    }
}

/// Writes the rendered report to `output` through `storage`, or to stdout.
pub fn deliver<S: Storage>(storage: &S, output: Option<&str>, rendered: &str) -> Result<()> {
    match output {
        Some(path) => {
            storage.write_file(path, rendered.as_bytes())?;
            tracing::info!("📁 Report saved to: {}", path);
        }
        None => print!("{}", rendered),
    }
    Ok(())
}

fn finish_csv(writer: csv::Writer<Vec<u8>>) -> Result<String> {
    let bytes = writer
        .into_inner()
        .map_err(|e| FiestaError::IoError(e.into_error()))?;
    String::from_utf8(bytes).map_err(|e| FiestaError::ConfigError {
        message: format!("CSV output is not valid UTF-8: {}", e),
    })
}
