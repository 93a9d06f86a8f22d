//! Index-membership lists scraped from reference pages.

use super::html_table::extract_column;
use super::http::HttpClient;
use super::provider::ListingError;
use crate::config::SourceSpec;
use tracing::info;

/// Fetch the page named by `spec` and return its ticker column, in page order.
///
/// Transport failures after retries, non-2xx responses and missing tables or
/// columns all surface as `SourceUnavailable`.
pub fn fetch_index_tickers(
    client: &HttpClient,
    spec: &SourceSpec,
) -> Result<Vec<String>, ListingError> {
    let resp = client
        .get(&spec.url)
        .map_err(|e| ListingError::SourceUnavailable(format!("{}: {e}", spec.url)))?;

    let status = resp.status();
    if !status.is_success() {
        return Err(ListingError::SourceUnavailable(format!(
            "HTTP {status} for {}",
            spec.url
        )));
    }

    let body = resp
        .text()
        .map_err(|e| ListingError::SourceUnavailable(format!("read body of {}: {e}", spec.url)))?;

    let tickers = extract_column(&body, spec.table_index, &spec.column)?;
    info!(
        url = %spec.url,
        table = spec.table_index,
        column = %spec.column,
        count = tickers.len(),
        "fetched index membership"
    );
    Ok(tickers)
}
