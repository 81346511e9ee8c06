use crate::config::toml_config::{TomlConfig, MAX_RECURSION_LIMIT};
use crate::core::probes::{self, DEFAULT_MISSING_FILE, DEFAULT_RECURSION_LIMIT};
use crate::core::report::ReportFormat;
use crate::core::ConfigProvider;
use crate::utils::error::{FiestaError, Result};
use crate::utils::validation::{self, Validate};
use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[command(name = "error-fiesta")]
#[command(about = "Trigger a catalog of runtime errors and report what was caught")]
pub struct CliConfig {
    /// Path to an optional TOML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Depth at which the recursion probe gives up
    #[arg(long)]
    pub recursion_limit: Option<usize>,

    /// File the file-not-found probe tries to open
    #[arg(long)]
    pub missing_file: Option<String>,

    /// Only run these probes (comma separated)
    #[arg(long, value_delimiter = ',')]
    pub only: Vec<String>,

    /// Exit non-zero when a probe is not raised or raises the wrong category
    #[arg(long)]
    pub strict: bool,

    /// Report format: text, json or csv
    #[arg(long, default_value = "text")]
    pub format: ReportFormat,

    /// Write the report to this file instead of stdout
    #[arg(short, long)]
    pub output: Option<String>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub log_json: bool,

    #[arg(long, help = "Log CPU and memory usage per probe")]
    pub monitor: bool,
}

impl CliConfig {
    /// Fills every option not given on the command line from the config file.
    pub fn apply_file(&mut self, file: &TomlConfig) {
        if let Some(section) = &file.probes {
            if self.recursion_limit.is_none() {
                self.recursion_limit = section.recursion_limit;
            }
            if self.missing_file.is_none() {
                self.missing_file = section.missing_file.clone();
            }
            if self.only.is_empty() {
                self.only = section.only.clone().unwrap_or_default();
            }
            self.strict |= section.strict.unwrap_or(false);
        }
        self.monitor |= file.monitoring_enabled();
    }
}

impl ConfigProvider for CliConfig {
    fn recursion_limit(&self) -> usize {
        self.recursion_limit.unwrap_or(DEFAULT_RECURSION_LIMIT)
    }

    fn missing_file(&self) -> &str {
        self.missing_file.as_deref().unwrap_or(DEFAULT_MISSING_FILE)
    }

    fn selected_probes(&self) -> &[String] {
        &self.only
    }

    fn strict(&self) -> bool {
        self.strict
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_range(
            "recursion_limit",
            self.recursion_limit(),
            1,
            MAX_RECURSION_LIMIT,
        )?;
        validation::validate_path("missing_file", self.missing_file())?;
        if let Some(output) = &self.output {
            validation::validate_path("output", output)?;
        }
        for name in &self.only {
            if probes::find(name).is_none() {
                return Err(FiestaError::UnknownProbe { name: name.clone() });
            }
        }
        Ok(())
    }
}
