use clap::Parser;
use error_fiesta::core::report::{deliver, render_score_card};
use error_fiesta::utils::{logger, validation::Validate};
use error_fiesta::{FiestaError, LocalStorage, ReportFormat, Scorer, TomlConfig};

#[derive(Parser)]
#[command(name = "score-card")]
#[command(about = "Score builds from base score, commit count and build time")]
struct Args {
    /// Path to a TOML file with [scoring] rules and cases
    #[arg(short, long)]
    config: Option<String>,

    /// Report format: text, json or csv
    #[arg(long, default_value = "text")]
    format: ReportFormat,

    /// Write the score card to this file instead of stdout
    #[arg(short, long)]
    output: Option<String>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Emit logs as JSON
    #[arg(long)]
    log_json: bool,
}

fn main() {
    let args = Args::parse();

    if args.log_json {
        logger::init_json_logger(args.verbose);
    } else {
        logger::init_cli_logger(args.verbose);
    }

    // 沒有指定檔案時使用內建規則與案例
    let config = match &args.config {
        Some(path) => {
            tracing::info!("📁 Loading configuration from: {}", path);
            match TomlConfig::from_file(path) {
                Ok(config) => config,
                Err(e) => fail(&e),
            }
        }
        None => TomlConfig::default(),
    };

    if let Err(e) = config.validate() {
        fail(&e);
    }

    let scorer = Scorer::new(config.score_rules());
    tracing::debug!("Score rules: {:?}", scorer.rules());

    let rendered = scorer
        .score_cases(&config.score_cases())
        .and_then(|card| render_score_card(&card, args.format));

    let rendered = match rendered {
        Ok(rendered) => rendered,
        Err(e) => fail(&e),
    };

    if let Err(e) = deliver(&LocalStorage::default(), args.output.as_deref(), &rendered) {
        fail(&e);
    }
}

fn fail(e: &FiestaError) -> ! {
    tracing::error!(
        "❌ Scoring failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());
    std::process::exit(e.exit_code().max(1));
}
