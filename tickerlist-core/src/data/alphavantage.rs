//! Alpha Vantage `LISTING_STATUS` bulk download.
//!
//! The endpoint answers with a CSV attachment (`Content-Type` containing
//! `download`). Anything else, typically a JSON note about the API key or the
//! rate limit, is reported as `UnexpectedResponseFormat` and nothing is
//! written.

use super::http::HttpClient;
use super::provider::ListingError;
use crate::config::AlphaVantageConfig;
use crate::domain::ListingStatusRow;
use reqwest::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use reqwest::Url;
use std::path::{Path, PathBuf};
use tracing::info;

const FALLBACK_FILENAME: &str = "listing_status.csv";

/// The saved raw dump and its parsed rows.
#[derive(Debug, Clone)]
pub struct BulkDownload {
    pub saved_to: PathBuf,
    pub rows: Vec<ListingStatusRow>,
}

/// Download the listing-status dump, save it under `out_dir` and parse it.
pub fn fetch_listing_status(
    client: &HttpClient,
    config: &AlphaVantageConfig,
    out_dir: &Path,
) -> Result<BulkDownload, ListingError> {
    let api_key = config.require_api_key()?;
    let url = listing_status_url(&config.base_url, api_key)?;

    let resp = client
        .get(url.as_str())
        .map_err(|e| ListingError::SourceUnavailable(format!("listing status: {e}")))?;

    let status = resp.status();
    if !status.is_success() {
        return Err(ListingError::SourceUnavailable(format!(
            "HTTP {status} from listing status endpoint"
        )));
    }

    let content_type = header_str(&resp, CONTENT_TYPE).unwrap_or_default();
    if !content_type.contains("download") {
        return Err(ListingError::UnexpectedResponseFormat {
            content_type: if content_type.is_empty() {
                "<none>".into()
            } else {
                content_type
            },
        });
    }

    let filename = header_str(&resp, CONTENT_DISPOSITION)
        .as_deref()
        .map(attachment_filename)
        .unwrap_or_else(|| FALLBACK_FILENAME.to_string());

    let bytes = resp
        .bytes()
        .map_err(|e| ListingError::SourceUnavailable(format!("read listing status body: {e}")))?;

    let saved_to = out_dir.join(filename);
    std::fs::write(&saved_to, &bytes)?;
    info!(path = %saved_to.display(), bytes = bytes.len(), "File saved as {}", saved_to.display());

    let rows = parse_listing_csv(&bytes)?;
    Ok(BulkDownload { saved_to, rows })
}

fn listing_status_url(base_url: &str, api_key: &str) -> Result<Url, ListingError> {
    let mut url = Url::parse(base_url).map_err(|e| {
        ListingError::InvalidConfiguration(format!("alphavantage base_url {base_url}: {e}"))
    })?;
    url.set_path("/query");
    url.query_pairs_mut()
        .append_pair("function", "LISTING_STATUS")
        .append_pair("apikey", api_key);
    Ok(url)
}

fn header_str(
    resp: &reqwest::blocking::Response,
    name: reqwest::header::HeaderName,
) -> Option<String> {
    resp.headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

/// File name from a `Content-Disposition` value, without directory parts.
fn attachment_filename(disposition: &str) -> String {
    let raw = disposition
        .rsplit("filename=")
        .next()
        .unwrap_or_default()
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .trim_matches('"');

    Path::new(raw)
        .file_name()
        .and_then(|n| n.to_str())
        .filter(|n| !n.is_empty() && disposition.contains("filename="))
        .map(str::to_string)
        .unwrap_or_else(|| FALLBACK_FILENAME.to_string())
}

/// Parse the listing-status CSV, keeping file order.
pub fn parse_listing_csv(bytes: &[u8]) -> Result<Vec<ListingStatusRow>, ListingError> {
    let mut rdr = csv::Reader::from_reader(bytes);
    rdr.deserialize()
        .collect::<Result<Vec<ListingStatusRow>, _>>()
        .map_err(|e| ListingError::SourceUnavailable(format!("malformed listing status CSV: {e}")))
}
