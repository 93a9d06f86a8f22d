//! Data sources and market-data lookup.

pub mod alphavantage;
pub mod html_table;
pub mod http;
pub mod provider;
pub mod wikipedia;
pub mod yahoo;

pub use alphavantage::{fetch_listing_status, BulkDownload};
pub use http::HttpClient;
pub use provider::{ListingError, QuoteLookup, QuoteSnapshot};
pub use wikipedia::fetch_index_tickers;
pub use yahoo::YahooLookup;
