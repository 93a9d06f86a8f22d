//! Tickerlist CLI — download equity listings and write them as JSON or CSV.
//!
//! Commands:
//! - `spy`: S&P 500 constituents, filtered to tickers with a live quote
//! - `ndx`: Nasdaq-100 constituents, filtered the same way
//! - `all`: Alpha Vantage listing dump split into active stocks and ETFs

use anyhow::{Context, Result};
use clap::builder::BoolishValueParser;
use clap::{ArgAction, Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use tickerlist_core::config::{Config, IndexSource};
use tickerlist_core::pipeline::{run_all, run_index, IndexExport};
use tickerlist_core::{ListingError, OutputFormat, StderrProgress};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "tickerlist",
    about = "Tickerlist CLI — S&P 500, Nasdaq-100 and full-market ticker lists"
)]
struct Cli {
    /// TOML config file (HTTP settings, source tables, provider URLs).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// S&P 500 constituents with a live quote.
    Spy(IndexArgs),
    /// Nasdaq-100 constituents with a live quote.
    Ndx(IndexArgs),
    /// Full Alpha Vantage listing: writes stock.csv, stock.json, etf.csv, etf.json.
    All {
        /// Directory for the raw dump and the four output files.
        #[arg(long, default_value = ".")]
        output_dir: PathBuf,
    },
}

#[derive(Args)]
struct IndexArgs {
    /// Output format: json or csv.
    #[arg(long, default_value = "json")]
    format: String,

    /// Output path. Defaults to spy_companies.json / ndx_companies.json,
    /// whatever the format.
    #[arg(long)]
    file: Option<PathBuf>,

    /// Write symbols only, without display names.
    #[arg(
        long = "ticker-only",
        alias = "ticker_only",
        num_args = 0..=1,
        default_value = "false",
        default_missing_value = "true",
        action = ArgAction::Set,
        value_parser = BoolishValueParser::new()
    )]
    ticker_only: bool,

    /// Override the page URL.
    #[arg(long)]
    url: Option<String>,

    /// Override which table on the page holds the constituents (0-based).
    #[arg(long)]
    table_index: Option<usize>,

    /// Override the ticker column header.
    #[arg(long)]
    column: Option<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing();
    load_dotenv();

    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Spy(args) => run_index_cmd(IndexSource::Spy, args, &config),
        Commands::Ndx(args) => run_index_cmd(IndexSource::Ndx, args, &config),
        Commands::All { output_dir } => run_all_cmd(config, &output_dir),
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

/// A missing `.env` is normal; a present but unreadable one is reported.
fn load_dotenv() {
    match dotenvy::dotenv() {
        Ok(path) => tracing::debug!(path = %path.display(), "loaded .env"),
        Err(dotenvy::Error::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => tracing::warn!(error = %e, "failed to load .env"),
    }
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => {
            tracing::debug!(path = %path.display(), "loading config");
            Config::from_file(path)
                .with_context(|| format!("failed to load config {}", path.display()))
        }
        None => Ok(Config::default()),
    }
}

fn run_index_cmd(source: IndexSource, args: IndexArgs, config: &Config) -> Result<()> {
    // Reject a bad format before any network traffic
    let format: OutputFormat = args.format.parse()?;

    let mut job = IndexExport::new(source, config);
    job.spec = job.spec.with_overrides(args.url, args.table_index, args.column);
    job.format = format;
    job.ticker_only = args.ticker_only;
    job.file = args.file.unwrap_or_else(|| source.default_file());

    let summary = run_index(config, &job, &StderrProgress)
        .with_context(|| format!("{} export failed", source.name()))?;

    println!(
        "Wrote {}/{} active tickers to {}",
        summary.written,
        summary.fetched,
        summary.path.display()
    );
    Ok(())
}

fn run_all_cmd(config: Config, output_dir: &Path) -> Result<()> {
    let config = config.with_api_key(std::env::var("API_KEY").ok());

    let summary = match run_all(&config, output_dir) {
        Ok(summary) => summary,
        Err(ListingError::UnexpectedResponseFormat { content_type }) => {
            eprintln!("Unexpected content type from alphavantage: {content_type}");
            std::process::exit(1);
        }
        Err(e) => return Err(e).context("all export failed"),
    };

    println!("File saved as {}", summary.saved_to.display());
    println!(
        "{} rows: {} active stocks, {} active ETFs",
        summary.rows, summary.stocks, summary.etfs
    );
    for file in &summary.files {
        println!("  {}", file.display());
    }
    Ok(())
}
