use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tokio::io::BufReader;
use tracing::debug;

use pay_cli::{App, OutputFormat, Overrides, Settings, logging};

// ─── CLI definition ──────────────────────────────────────────────────────────

/// Take-home pay calculator.
///
/// Breaks an annual gross salary down into weekly, biweekly, monthly and
/// annual gross income, taxes and net income. Without `--salary`, reads one
/// salary per line from stdin until `q` or end of input.
#[derive(Debug, Parser)]
#[command(name = "take-home-pay", version)]
struct Cli {
    /// Annual gross salary, e.g. `52000` or `52,000`.
    #[arg(short, long)]
    salary: Option<String>,

    /// JSON record (`{"salary": 52000}`) to load before interactive editing.
    #[arg(long)]
    record: Option<PathBuf>,

    /// TOML config file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Calculator backend (`brackets` or `fixture`).
    #[arg(long)]
    backend: Option<String>,

    /// Digits shown after the decimal point.
    #[arg(long)]
    decimal_places: Option<u32>,

    /// Log level used when `RUST_LOG` is not set.
    #[arg(long)]
    log_level: Option<String>,

    /// Append log output to this file.
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Print the state as JSON instead of a table.
    #[arg(long)]
    json: bool,
}

// ─── entry point ─────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let overrides = Overrides {
        backend: cli.backend,
        decimal_places: cli.decimal_places,
        log_level: cli.log_level,
        log_file: cli.log_file,
    };
    let settings =
        Settings::load(cli.config.as_deref(), &overrides).context("failed to load config")?;

    logging::init_logging(&settings.logging.level);
    if let Some(path) = &settings.logging.file {
        logging::enable_file_logging(path)?;
    }
    debug!(?settings, "settings resolved");

    let format = if cli.json {
        OutputFormat::Json
    } else {
        OutputFormat::Table
    };
    let app = App::build(&settings, format).await?;

    if let Some(salary) = cli.salary {
        println!("{}", app.run_once(&salary).await?);
        return Ok(if app.state().has_error() {
            ExitCode::FAILURE
        } else {
            ExitCode::SUCCESS
        });
    }

    if let Some(record) = &cli.record {
        println!("{}", app.load_record(record).await?);
    }

    let stdin = BufReader::new(tokio::io::stdin());
    app.run_interactive(stdin, &mut io::stdout()).await?;

    Ok(ExitCode::SUCCESS)
}
