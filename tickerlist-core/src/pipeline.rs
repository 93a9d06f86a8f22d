//! Pipelines behind the CLI commands.
//!
//! - `spy` / `ndx`: fetch the index table → classify each ticker → write one file
//! - `all`: download the listing-status dump → split active stocks / ETFs → write four files
//!
//! Output is written once, after the whole batch succeeded.

use std::path::{Path, PathBuf};

use tracing::info;

use crate::bulk::split_active;
use crate::classify::{classify_all, ClassifyProgress};
use crate::config::{AlphaVantageConfig, Config, IndexSource, SourceSpec};
use crate::data::{
    fetch_index_tickers, fetch_listing_status, HttpClient, ListingError, QuoteLookup, YahooLookup,
};
use crate::export::{write_csv, write_json, write_records, OutputFormat};

/// One `spy` / `ndx` run.
#[derive(Debug, Clone)]
pub struct IndexExport {
    pub source: IndexSource,
    pub spec: SourceSpec,
    pub format: OutputFormat,
    pub file: PathBuf,
    pub ticker_only: bool,
}

impl IndexExport {
    /// Defaults for a source: JSON, the source's default file name, names included.
    pub fn new(source: IndexSource, config: &Config) -> Self {
        Self {
            source,
            spec: config.source(source).clone(),
            format: OutputFormat::Json,
            file: source.default_file(),
            ticker_only: false,
        }
    }
}

/// What an index export produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportSummary {
    pub fetched: usize,
    pub written: usize,
    pub path: PathBuf,
}

/// Fetch, classify and write one index-membership list.
pub fn export_index(
    client: &HttpClient,
    lookup: &dyn QuoteLookup,
    job: &IndexExport,
    progress: &dyn ClassifyProgress,
) -> Result<ExportSummary, ListingError> {
    let tickers = fetch_index_tickers(client, &job.spec)?;
    let records = classify_all(lookup, &tickers, !job.ticker_only, progress)?;

    write_records(&records, &job.file, job.format, job.ticker_only)?;
    info!(
        source = job.source.name(),
        format = %job.format,
        path = %job.file.display(),
        records = records.len(),
        "wrote listing"
    );

    Ok(ExportSummary {
        fetched: tickers.len(),
        written: records.len(),
        path: job.file.clone(),
    })
}

/// Build the HTTP client and Yahoo lookup from `config`, then run [`export_index`].
pub fn run_index(
    config: &Config,
    job: &IndexExport,
    progress: &dyn ClassifyProgress,
) -> Result<ExportSummary, ListingError> {
    let client = HttpClient::new(&config.http)?;
    let lookup = YahooLookup::new(client.clone(), &config.yahoo)?;
    export_index(&client, &lookup, job, progress)
}

/// What the `all` command produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulkSummary {
    pub saved_to: PathBuf,
    pub rows: usize,
    pub stocks: usize,
    pub etfs: usize,
    pub files: Vec<PathBuf>,
}

/// Download the listing dump and write `stock.{csv,json}` and `etf.{csv,json}` under `out_dir`.
///
/// An unexpected content type fails before anything is written.
pub fn export_all(
    client: &HttpClient,
    config: &AlphaVantageConfig,
    out_dir: &Path,
) -> Result<BulkSummary, ListingError> {
    let download = fetch_listing_status(client, config, out_dir)?;
    let split = split_active(&download.rows);

    let mut files = Vec::with_capacity(4);
    for (stem, records) in [("stock", &split.stocks), ("etf", &split.etfs)] {
        let csv_path = out_dir.join(format!("{stem}.csv"));
        write_csv(records, &csv_path, false)?;
        files.push(csv_path);

        let json_path = out_dir.join(format!("{stem}.json"));
        write_json(records, &json_path)?;
        files.push(json_path);
    }

    info!(
        rows = download.rows.len(),
        stocks = split.stocks.len(),
        etfs = split.etfs.len(),
        "wrote bulk listings"
    );

    Ok(BulkSummary {
        saved_to: download.saved_to,
        rows: download.rows.len(),
        stocks: split.stocks.len(),
        etfs: split.etfs.len(),
        files,
    })
}

/// Build the HTTP client from `config`, then run [`export_all`].
pub fn run_all(config: &Config, out_dir: &Path) -> Result<BulkSummary, ListingError> {
    let client = HttpClient::new(&config.http)?;
    export_all(&client, &config.alphavantage, out_dir)
}
