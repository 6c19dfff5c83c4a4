use anyhow::{Context, Result};
use chat_stats::config::{AppConfig, ConfigOverrides};
use chat_stats::logging::{init_logging, OperationTimer};
use chat_stats::pipeline::{Analyzer, Audience, Step};
use clap::{Parser, Subcommand};
use std::io::Write;
use std::path::PathBuf;
use tracing::{error, info};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Configuration file (any format the config crate reads)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Chat export CSV
    #[arg(short, long, global = true)]
    input: Option<PathBuf>,

    /// Stop-word list, one word per line
    #[arg(long, global = true)]
    stop_words: Option<PathBuf>,

    /// TTF/OTF font used for chart text
    #[arg(long, global = true)]
    font: Option<PathBuf>,

    /// Directory the charts are written to
    #[arg(short, long, global = true)]
    output_dir: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render every chart, or a single step
    Run {
        /// Step to run
        #[arg(short, long, value_enum, default_value = "all")]
        step: Step,
    },
    /// Print the most active day and month
    Peaks,
    /// Print the most frequent words
    Words {
        /// Whose messages to count
        #[arg(short, long, value_enum, default_value = "all")]
        audience: Audience,

        /// Number of words
        #[arg(short, long)]
        limit: Option<usize>,
    },
    /// Write every aggregation as JSON
    Summary {
        /// Output file, defaults to summary.json in the output directory
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Print the default configuration as YAML
    InitConfig {
        /// Write to a file instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let overrides = ConfigOverrides {
        chat_csv: cli.input.clone(),
        stop_words: cli.stop_words.clone(),
        font: cli.font.clone(),
        output_dir: cli.output_dir.clone(),
        log_level: cli.log_level.clone(),
    };

    // Load configuration
    let config = AppConfig::load(cli.config.as_deref(), &overrides)?;

    // Initialize logging; the guard flushes the log file on exit
    let _log_guard = init_logging(
        Some(&config.get_log_level()),
        config.log_file(),
        config.logging.format == "json",
    )
    .context("Failed to initialize logging")?;

    info!("Starting chat-stats");

    let result = dispatch(cli.command, config);
    if let Err(e) = &result {
        error!("{e:#}");
    }
    result
}

fn dispatch(command: Commands, config: AppConfig) -> Result<()> {
    match command {
        Commands::InitConfig { out } => init_config(out),
        Commands::Run { step } => {
            let timer = OperationTimer::new("run");
            let mut analyzer = Analyzer::new(config).context("Failed to prepare analysis")?;
            analyzer
                .run(step)
                .with_context(|| format!("Step {} failed", step.name()))?;
            timer.finish();
            Ok(())
        }
        Commands::Peaks => {
            let analyzer = Analyzer::new(config).context("Failed to prepare analysis")?;
            analyzer.print_peaks(&mut std::io::stdout().lock())?;
            Ok(())
        }
        Commands::Words { audience, limit } => {
            let limit = limit.unwrap_or(config.analysis.top_words);
            let mut analyzer = Analyzer::new(config).context("Failed to prepare analysis")?;
            let words = analyzer.top_words(audience, limit)?;

            let mut stdout = std::io::stdout().lock();
            for (word, count) in words {
                writeln!(stdout, "{word}\t{count}")?;
            }
            Ok(())
        }
        Commands::Summary { out } => {
            let path = out.unwrap_or_else(|| config.output.directory.join("summary.json"));
            let mut analyzer = Analyzer::new(config).context("Failed to prepare analysis")?;
            analyzer
                .write_summary(&path)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            Ok(())
        }
    }
}

fn init_config(out: Option<PathBuf>) -> Result<()> {
    let yaml = AppConfig::default().to_yaml()?;
    match out {
        Some(path) => {
            std::fs::write(&path, yaml)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!("Wrote default configuration to {}", path.display());
        }
        None => std::io::stdout().lock().write_all(yaml.as_bytes())?,
    }
    Ok(())
}
