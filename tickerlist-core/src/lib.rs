//! Tickerlist Core — listing sources, liveness lookup, bulk filter, export.
//!
//! This crate contains everything behind the `tickerlist` CLI:
//! - Listing records and the Alpha Vantage listing-status row
//! - Configuration (HTTP, per-source table selection, provider base URLs)
//! - Blocking HTTP client with retry/backoff
//! - Sources: Wikipedia index-membership tables and the Alpha Vantage bulk dump
//! - Yahoo Finance quote lookup and the per-ticker classifier
//! - Bulk filter for active stocks and ETFs
//! - JSON and CSV export
//! - Pipelines tying the pieces together for the `spy`, `ndx` and `all` commands

pub mod bulk;
pub mod classify;
pub mod config;
pub mod data;
pub mod domain;
pub mod export;
pub mod pipeline;

pub use classify::{classify, classify_all, ClassifyProgress, NoProgress, StderrProgress};
pub use config::{AlphaVantageConfig, Config, HttpConfig, IndexSource, SourceSpec};
pub use data::ListingError;
pub use domain::{ListingRecord, ListingStatusRow};
pub use export::OutputFormat;
