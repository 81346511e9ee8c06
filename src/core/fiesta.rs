use crate::core::probes::{self, Probe, ProbeContext};
use crate::core::ConfigProvider;
use crate::domain::model::{FiestaReport, Outcome, ReportEntry};
use crate::utils::error::{FiestaError, Result};
use crate::utils::monitor::SystemMonitor;

pub struct FiestaRunner<C: ConfigProvider> {
    config: C,
    monitor: SystemMonitor,
    echo: bool,
}

impl<C: ConfigProvider> FiestaRunner<C> {
    pub fn new(config: C) -> Self {
        Self {
            config,
            monitor: SystemMonitor::new(false),
            echo: true,
        }
    }

    pub fn new_with_monitoring(config: C, monitor_enabled: bool) -> Self {
        Self {
            config,
            monitor: SystemMonitor::new(monitor_enabled),
            echo: true,
        }
    }

    /// Suppress the per-probe console lines; the report is still returned.
    pub fn quiet(mut self) -> Self {
        self.echo = false;
        self
    }

    /// Resolves the configured selection against the catalog, keeping catalog order.
    pub fn selected_probes(&self) -> Result<Vec<Probe>> {
        let selected = self.config.selected_probes();
        let catalog = probes::catalog();
        if selected.is_empty() {
            return Ok(catalog);
        }

        if let Some(unknown) = selected
            .iter()
            .find(|name| !catalog.iter().any(|p| p.name == name.as_str()))
        {
            return Err(FiestaError::UnknownProbe {
                name: unknown.clone(),
            });
        }

        Ok(catalog
            .into_iter()
            .filter(|p| selected.iter().any(|name| name == p.name))
            .collect())
    }

    pub fn run(&mut self) -> Result<FiestaReport> {
        let probes = self.selected_probes()?;
        let ctx = ProbeContext {
            recursion_limit: self.config.recursion_limit(),
            missing_file: self.config.missing_file().to_string(),
        };

        tracing::info!("Running {} probes", probes.len());
        self.monitor.log_stats("Start");

        let mut entries = Vec::with_capacity(probes.len());
        for probe in &probes {
            entries.push(self.run_probe(probe, &ctx));
        }

        self.monitor.log_final_stats();

        let report = FiestaReport {
            generated_at: chrono::Utc::now(),
            entries,
        };
        tracing::info!(
            "Probes finished: {} caught, {} mismatched, {} not raised",
            report.caught(),
            report.mismatched(),
            report.not_raised()
        );
        Ok(report)
    }

    fn run_probe(&mut self, probe: &Probe, ctx: &ProbeContext) -> ReportEntry {
        if self.echo {
            println!("\n--- Running test: {} ---", probe.name);
        }

        let outcome = match probe.run(ctx) {
            Ok(()) => {
                if self.echo {
                    println!("[WARN] {} did not raise an exception.", probe.name);
                }
                tracing::warn!("{} did not raise an exception", probe.name);
                Outcome::NotRaised
            }
            Err(fault) => {
                if self.echo {
                    println!("[CAUGHT] {} -> {}", probe.name, fault);
                }
                if fault.kind != probe.expected {
                    tracing::warn!(
                        "{} raised {} instead of {}",
                        probe.name,
                        fault.kind,
                        probe.expected
                    );
                } else {
                    tracing::debug!("{} caught {}", probe.name, fault.kind);
                }
                Outcome::Caught { fault }
            }
        };

        self.monitor.log_stats(probe.name);

        ReportEntry {
            name: probe.name.to_string(),
            expected: probe.expected,
            outcome,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::probes::{DEFAULT_MISSING_FILE, DEFAULT_RECURSION_LIMIT};

    struct TestConfig {
        only: Vec<String>,
    }

    impl ConfigProvider for TestConfig {
        fn recursion_limit(&self) -> usize {
            DEFAULT_RECURSION_LIMIT
        }

        fn missing_file(&self) -> &str {
            DEFAULT_MISSING_FILE
        }

        fn selected_probes(&self) -> &[String] {
            &self.only
        }

        fn strict(&self) -> bool {
            true
        }
    }

    #[test]
    fn test_full_run_matches_every_probe() {
        let mut runner = FiestaRunner::new(TestConfig { only: vec![] }).quiet();
        let report = runner.run().unwrap();
        assert_eq!(report.total(), 25);
        assert_eq!(report.not_raised(), 0);
        assert!(report.all_matched());
        assert_eq!(report.entries[0].name, "SyntaxError");
        assert_eq!(report.entries[24].name, "Extra ValueError (slice)");
    }

    #[test]
    fn test_selection_keeps_catalog_order() {
        let config = TestConfig {
            only: vec!["KeyError".to_string(), "SyntaxError".to_string()],
        };
        let mut runner = FiestaRunner::new(config).quiet();
        let report = runner.run().unwrap();
        let names: Vec<_> = report.entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["SyntaxError", "KeyError"]);
    }

    #[test]
    fn test_unknown_probe_is_rejected() {
        let config = TestConfig {
            only: vec!["NoSuchError".to_string()],
        };
        let mut runner = FiestaRunner::new(config).quiet();
        let err = runner.run().unwrap_err();
        assert!(matches!(err, FiestaError::UnknownProbe { name } if name == "NoSuchError"));
    }
}
