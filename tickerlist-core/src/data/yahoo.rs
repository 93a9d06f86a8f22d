//! Yahoo Finance quote lookup.
//!
//! Reads the `meta` block of the v8 chart API for a one-day range. The block
//! carries the current-session `regularMarketPrice` and the display names,
//! which is all the classifier needs.
//!
//! Yahoo Finance has no official API and is subject to unannounced format changes.

use super::http::HttpClient;
use super::provider::{ListingError, QuoteLookup, QuoteSnapshot};
use crate::config::YahooConfig;
use reqwest::StatusCode;
use reqwest::Url;
use serde::Deserialize;
use tracing::debug;

/// Yahoo Finance v8 chart API response.
#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: ChartResult,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    result: Option<Vec<ChartData>>,
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartData {
    meta: ChartMeta,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChartMeta {
    regular_market_price: Option<f64>,
    long_name: Option<String>,
    short_name: Option<String>,
}

/// Yahoo Finance lookup.
pub struct YahooLookup {
    client: HttpClient,
    base_url: Url,
}

impl YahooLookup {
    pub fn new(client: HttpClient, config: &YahooConfig) -> Result<Self, ListingError> {
        let base_url = Url::parse(&config.base_url).map_err(|e| {
            ListingError::InvalidConfiguration(format!("yahoo base_url {}: {e}", config.base_url))
        })?;
        Ok(Self { client, base_url })
    }

    /// Build the chart API URL for a symbol.
    fn chart_url(&self, symbol: &str) -> Result<Url, ListingError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| {
                ListingError::InvalidConfiguration(format!(
                    "yahoo base_url cannot take a path: {}",
                    self.base_url
                ))
            })?
            .pop_if_empty()
            .extend(["v8", "finance", "chart", symbol]);
        url.query_pairs_mut()
            .append_pair("range", "1d")
            .append_pair("interval", "1d");
        Ok(url)
    }

    /// Turn the chart API response into a snapshot.
    fn parse_response(symbol: &str, resp: ChartResponse) -> Result<QuoteSnapshot, ListingError> {
        let result = match resp.chart.result {
            Some(result) => result,
            None => {
                return Err(match resp.chart.error {
                    Some(err) if err.code == "Not Found" => ListingError::LookupMiss {
                        symbol: symbol.to_string(),
                    },
                    Some(err) => ListingError::Http(format!("{}: {}", err.code, err.description)),
                    None => ListingError::Http("empty chart result with no error".into()),
                })
            }
        };

        let data = result.into_iter().next().ok_or_else(|| ListingError::LookupMiss {
            symbol: symbol.to_string(),
        })?;

        Ok(QuoteSnapshot {
            regular_market_price: data.meta.regular_market_price,
            long_name: data.meta.long_name,
            short_name: data.meta.short_name,
        })
    }
}

impl QuoteLookup for YahooLookup {
    fn name(&self) -> &str {
        "yahoo_finance"
    }

    fn snapshot(&self, symbol: &str) -> Result<QuoteSnapshot, ListingError> {
        let url = self.chart_url(symbol)?;
        let resp = self.client.get(url.as_str())?;
        let status = resp.status();

        if status == StatusCode::NOT_FOUND {
            debug!(symbol, "chart lookup returned 404");
            return Err(ListingError::LookupMiss {
                symbol: symbol.to_string(),
            });
        }

        if !status.is_success() {
            return Err(ListingError::Http(format!("HTTP {status} for {symbol}")));
        }

        let chart: ChartResponse = resp.json().map_err(|e| {
            ListingError::Http(format!("failed to parse chart response for {symbol}: {e}"))
        })?;

        Self::parse_response(symbol, chart)
    }
}
