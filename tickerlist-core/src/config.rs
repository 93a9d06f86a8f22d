//! Serializable run configuration.
//!
//! Every section is optional in the TOML file; anything left out falls back to
//! the built-in defaults. A `[sources.*]` table replaces the whole source
//! definition, so it must carry `url`, `table_index` and `column`.
//!
//! The Alpha Vantage API key is never read from the file. Callers inject it
//! with [`Config::with_api_key`].

use crate::data::ListingError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub http: HttpConfig,
    pub sources: SourcesConfig,
    pub yahoo: YahooConfig,
    pub alphavantage: AlphaVantageConfig,
}

impl Config {
    /// Load a configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ListingError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ListingError::InvalidConfiguration(format!("read {}: {e}", path.display()))
        })?;
        Self::from_toml(&content)
    }

    /// Parse a configuration from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ListingError> {
        toml::from_str(content)
            .map_err(|e| ListingError::InvalidConfiguration(format!("parse config TOML: {e}")))
    }

    /// Attach the Alpha Vantage API key.
    pub fn with_api_key(mut self, api_key: Option<String>) -> Self {
        self.alphavantage.api_key = api_key.filter(|k| !k.trim().is_empty());
        self
    }

    /// Source definition for an index-membership command.
    pub fn source(&self, index: IndexSource) -> &SourceSpec {
        match index {
            IndexSource::Spy => &self.sources.spy,
            IndexSource::Ndx => &self.sources.ndx,
        }
    }
}

/// HTTP client settings shared by every request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub timeout_secs: u64,
    /// Retries after the first attempt for transient failures (connect, timeout, 429, 5xx).
    pub max_retries: u32,
    /// Delay before the first retry; doubles on every further attempt.
    pub base_delay_ms: u64,
    pub user_agent: String,
}

impl HttpConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn base_delay(&self) -> Duration {
        Duration::from_millis(self.base_delay_ms)
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            max_retries: 3,
            base_delay_ms: 500,
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36".into(),
        }
    }
}

/// Where an index-membership list lives and how to find its ticker column.
///
/// `table_index` counts the page's displayed, non-empty `<table>`s in
/// document order, starting at 0. It is tied to the current page layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceSpec {
    pub url: String,
    pub table_index: usize,
    pub column: String,
}

impl SourceSpec {
    pub fn spy() -> Self {
        Self {
            url: "https://en.wikipedia.org/wiki/List_of_S%26P_500_companies".into(),
            table_index: 0,
            column: "Symbol".into(),
        }
    }

    pub fn ndx() -> Self {
        Self {
            url: "https://en.wikipedia.org/wiki/Nasdaq-100".into(),
            table_index: 4,
            column: "Ticker".into(),
        }
    }

    /// Apply per-run overrides from the command line.
    pub fn with_overrides(
        mut self,
        url: Option<String>,
        table_index: Option<usize>,
        column: Option<String>,
    ) -> Self {
        if let Some(url) = url {
            self.url = url;
        }
        if let Some(idx) = table_index {
            self.table_index = idx;
        }
        if let Some(column) = column {
            self.column = column;
        }
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourcesConfig {
    #[serde(default = "SourceSpec::spy")]
    pub spy: SourceSpec,
    #[serde(default = "SourceSpec::ndx")]
    pub ndx: SourceSpec,
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            spy: SourceSpec::spy(),
            ndx: SourceSpec::ndx(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct YahooConfig {
    pub base_url: String,
}

impl Default for YahooConfig {
    fn default() -> Self {
        Self {
            base_url: "https://query2.finance.yahoo.com".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlphaVantageConfig {
    pub base_url: String,
    #[serde(skip)]
    pub api_key: Option<String>,
}

impl AlphaVantageConfig {
    pub fn require_api_key(&self) -> Result<&str, ListingError> {
        self.api_key.as_deref().ok_or_else(|| {
            ListingError::InvalidConfiguration("API_KEY is not set (environment or .env)".into())
        })
    }
}

impl Default for AlphaVantageConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.alphavantage.co".into(),
            api_key: None,
        }
    }
}

/// The index-membership lists the CLI knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexSource {
    /// S&P 500 constituents.
    Spy,
    /// Nasdaq-100 constituents.
    Ndx,
}

impl IndexSource {
    pub fn name(&self) -> &'static str {
        match self {
            IndexSource::Spy => "spy",
            IndexSource::Ndx => "ndx",
        }
    }

    pub fn default_file(&self) -> PathBuf {
        match self {
            IndexSource::Spy => PathBuf::from("spy_companies.json"),
            IndexSource::Ndx => PathBuf::from("ndx_companies.json"),
        }
    }
}
