//! JSON and CSV export of listing records.
//!
//! - **JSON**: array of objects, keys in alphabetical order, 4-space indent
//! - **CSV**: `symbol,name` with header, or a bare symbol column in ticker-only mode
//!
//! Writers overwrite the target unconditionally. The readers load files
//! written by these writers back into records.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::Serialize;

use crate::data::ListingError;
use crate::domain::ListingRecord;

/// Output file format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Csv,
}

impl FromStr for OutputFormat {
    type Err = ListingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "csv" => Ok(OutputFormat::Csv),
            other => Err(ListingError::InvalidConfiguration(format!(
                "unknown format '{other}' (expected json or csv)"
            ))),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Json => f.write_str("json"),
            OutputFormat::Csv => f.write_str("csv"),
        }
    }
}

// ─── JSON ───────────────────────────────────────────────────────────

/// Serialize records as a pretty JSON array with 4-space indentation.
pub fn render_json(records: &[ListingRecord]) -> Result<String, ListingError> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    records.serialize(&mut ser)?;
    String::from_utf8(buf)
        .map_err(|e| ListingError::InvalidConfiguration(format!("JSON output is not UTF-8: {e}")))
}

pub fn write_json(records: &[ListingRecord], path: &Path) -> Result<(), ListingError> {
    let json = render_json(records)?;
    std::fs::write(path, json)?;
    Ok(())
}

pub fn read_json(path: &Path) -> Result<Vec<ListingRecord>, ListingError> {
    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

// ─── CSV ────────────────────────────────────────────────────────────

/// Render records as CSV.
///
/// Ticker-only: one symbol per line, no header. Otherwise a `symbol,name`
/// header followed by one row per record; a missing name is an empty field.
pub fn render_csv(records: &[ListingRecord], ticker_only: bool) -> Result<String, ListingError> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    if ticker_only {
        for r in records {
            wtr.write_record([r.symbol.as_str()])?;
        }
    } else {
        wtr.write_record(["symbol", "name"])?;
        for r in records {
            wtr.write_record([r.symbol.as_str(), r.name.as_deref().unwrap_or("")])?;
        }
    }

    let data = wtr
        .into_inner()
        .map_err(|e| ListingError::Io(e.into_error()))?;
    String::from_utf8(data)
        .map_err(|e| ListingError::InvalidConfiguration(format!("CSV output is not UTF-8: {e}")))
}

pub fn write_csv(
    records: &[ListingRecord],
    path: &Path,
    ticker_only: bool,
) -> Result<(), ListingError> {
    let csv = render_csv(records, ticker_only)?;
    std::fs::write(path, csv)?;
    Ok(())
}

pub fn read_csv(path: &Path, ticker_only: bool) -> Result<Vec<ListingRecord>, ListingError> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(!ticker_only)
        .flexible(ticker_only)
        .from_path(path)?;

    let mut records = Vec::new();
    for row in rdr.records() {
        let row = row?;
        let symbol = row.get(0).unwrap_or_default().to_string();
        let name = if ticker_only {
            None
        } else {
            row.get(1).filter(|n| !n.is_empty()).map(str::to_string)
        };
        records.push(ListingRecord::named(symbol, name));
    }
    Ok(records)
}

/// Write `records` to `path` in the given format.
pub fn write_records(
    records: &[ListingRecord],
    path: &Path,
    format: OutputFormat,
    ticker_only: bool,
) -> Result<(), ListingError> {
    match format {
        OutputFormat::Json => write_json(records, path),
        OutputFormat::Csv => write_csv(records, path, ticker_only),
    }
}
