use clap::Parser;
use error_fiesta::core::report::{deliver, render_fiesta};
use error_fiesta::core::ConfigProvider;
use error_fiesta::utils::{logger, validation::Validate};
use error_fiesta::{CliConfig, FiestaError, FiestaRunner, LocalStorage, ReportFormat, TomlConfig};

fn main() {
    let mut config = CliConfig::parse();

    // 初始化日誌
    if config.log_json {
        logger::init_json_logger(config.verbose);
    } else {
        logger::init_cli_logger(config.verbose);
    }

    tracing::info!("🎉 Starting error fiesta");

    if let Some(path) = config.config.clone() {
        tracing::info!("📁 Loading configuration from: {}", path);
        match TomlConfig::from_file(&path).and_then(|file| file.validate().map(|()| file)) {
            Ok(file) => config.apply_file(&file),
            Err(e) => fail(&e),
        }
    }

    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    // 驗證配置
    if let Err(e) = config.validate() {
        fail(&e);
    }

    let strict = config.strict();
    let format = config.format;
    let output = config.output.clone();
    let monitor_enabled = config.monitor;

    if monitor_enabled {
        tracing::info!("🔍 System monitoring enabled");
    }

    let mut runner = FiestaRunner::new_with_monitoring(config, monitor_enabled);
    // progress lines only accompany a text report on stdout
    if format != ReportFormat::Text || output.is_some() {
        runner = runner.quiet();
    }

    let report = match runner.run() {
        Ok(report) => report,
        Err(e) => fail(&e),
    };

    let rendered = match render_fiesta(&report, format) {
        Ok(rendered) => rendered,
        Err(e) => fail(&e),
    };

    if let Err(e) = deliver(&LocalStorage::default(), output.as_deref(), &rendered) {
        fail(&e);
    }

    if strict && !report.all_matched() {
        tracing::error!(
            "❌ {} probes mismatched, {} not raised",
            report.mismatched(),
            report.not_raised()
        );
        std::process::exit(1);
    }
}

fn fail(e: &FiestaError) -> ! {
    tracing::error!(
        "❌ Error fiesta failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());
    std::process::exit(e.exit_code().max(1));
}
