//! Lookup trait and structured error types.
//!
//! The QuoteLookup trait abstracts over the market-data source used to decide
//! whether a ticker is live, so the classifier can be driven by a mock in tests.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Structured error types for listing operations.
///
/// Displayable as-is in CLI output.
#[derive(Debug, Error)]
pub enum ListingError {
    #[error("source unavailable: {0}")]
    SourceUnavailable(String),

    #[error("no market data for symbol: {symbol}")]
    LookupMiss { symbol: String },

    #[error("unexpected content type from listing endpoint: {content_type}")]
    UnexpectedResponseFormat { content_type: String },

    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("rate limited by provider (retry after {retry_after_secs}s)")]
    RateLimited { retry_after_secs: u64 },

    #[error("network unreachable: {0}")]
    NetworkUnreachable(String),

    #[error("http error: {0}")]
    Http(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ListingError {
    /// True for the one failure the classifier recovers from.
    pub fn is_lookup_miss(&self) -> bool {
        matches!(self, ListingError::LookupMiss { .. })
    }
}

/// Current-session fields a lookup reports for one ticker.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QuoteSnapshot {
    pub regular_market_price: Option<f64>,
    pub long_name: Option<String>,
    pub short_name: Option<String>,
}

impl QuoteSnapshot {
    /// A ticker is active when the lookup reports a current-session price.
    pub fn is_active(&self) -> bool {
        self.regular_market_price.is_some()
    }
}

/// Trait for market-data lookups (Yahoo Finance, mocks).
///
/// Implementations return `ListingError::LookupMiss` when the source has no
/// data for the symbol. Every other error is treated as fatal by the caller.
pub trait QuoteLookup: Send + Sync {
    /// Human-readable name of this lookup.
    fn name(&self) -> &str;

    /// Fetch the current-session snapshot for a symbol.
    fn snapshot(&self, symbol: &str) -> Result<QuoteSnapshot, ListingError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_miss_is_recognized() {
        let err = ListingError::LookupMiss {
            symbol: "ZZZZ".into(),
        };
        assert!(err.is_lookup_miss());
        assert!(!ListingError::NetworkUnreachable("down".into()).is_lookup_miss());
    }

    #[test]
    fn unexpected_format_names_content_type() {
        let err = ListingError::UnexpectedResponseFormat {
            content_type: "text/html".into(),
        };
        assert!(err.to_string().contains("text/html"));
    }

    #[test]
    fn snapshot_without_price_is_inactive() {
        let snap = QuoteSnapshot {
            long_name: Some("Gone Corp".into()),
            ..Default::default()
        };
        assert!(!snap.is_active());
    }
}
