//! Blocking HTTP client with retry and exponential backoff.
//!
//! Transient failures (connect errors, timeouts, HTTP 429 and 5xx) are retried
//! up to `max_retries` times. Every other response is handed back to the
//! caller, which decides what a 404 or a wrong content type means for its
//! endpoint.

use super::provider::ListingError;
use crate::config::HttpConfig;
use reqwest::blocking::{Client, Response};
use reqwest::StatusCode;
use std::time::Duration;
use tracing::{debug, warn};

/// Shared blocking client for sources and lookups. Clones share one connection pool.
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    max_retries: u32,
    base_delay: Duration,
}

impl HttpClient {
    pub fn new(config: &HttpConfig) -> Result<Self, ListingError> {
        let client = Client::builder()
            .timeout(config.timeout())
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(|e| ListingError::Http(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            max_retries: config.max_retries,
            base_delay: config.base_delay(),
        })
    }

    /// GET `url`, retrying transient failures.
    pub fn get(&self, url: &str) -> Result<Response, ListingError> {
        let target = loggable(url);
        let mut last_error = None;

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                let delay = backoff_delay(self.base_delay, attempt);
                warn!(%target, attempt, ?delay, "retrying request");
                std::thread::sleep(delay);
            }

            debug!(%target, attempt, "GET");
            match self.client.get(url).send() {
                Ok(resp) => {
                    let status = resp.status();

                    if status == StatusCode::TOO_MANY_REQUESTS {
                        let retry_after = resp
                            .headers()
                            .get(reqwest::header::RETRY_AFTER)
                            .and_then(|v| v.to_str().ok())
                            .and_then(|v| v.parse::<u64>().ok())
                            .unwrap_or(60);
                        last_error = Some(ListingError::RateLimited {
                            retry_after_secs: retry_after,
                        });
                        continue;
                    }

                    if status.is_server_error() {
                        last_error =
                            Some(ListingError::Http(format!("HTTP {status} for {target}")));
                        continue;
                    }

                    return Ok(resp);
                }
                Err(e) => {
                    if e.is_connect() || e.is_timeout() {
                        last_error = Some(ListingError::NetworkUnreachable(e.to_string()));
                        continue;
                    }
                    return Err(ListingError::NetworkUnreachable(e.to_string()));
                }
            }
        }

        Err(last_error.unwrap_or_else(|| ListingError::Http("max retries exceeded".into())))
    }
}

/// `base * 2^(attempt-1)`, saturating instead of overflowing for large retry counts.
fn backoff_delay(base: Duration, attempt: u32) -> Duration {
    base.saturating_mul(2u32.saturating_pow(attempt.saturating_sub(1)))
}

/// Host and path only; query strings can carry API keys.
fn loggable(url: &str) -> String {
    match reqwest::Url::parse(url) {
        Ok(u) => format!("{}{}", u.host_str().unwrap_or_default(), u.path()),
        Err(_) => "<invalid url>".into(),
    }
}
