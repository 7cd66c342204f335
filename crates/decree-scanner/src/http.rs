//! HTTP access to decree documents.
//!
//! [`HttpClient`] is built once per process and shared by every enrichment
//! worker. Retries for transient failures happen inside [`HttpClient::get_text`],
//! so callers see either a body or a final error.

use crate::error::{Result, ScanError};
use decree_core::HttpConfig;
use reqwest::{Client, StatusCode};
use std::time::Duration;

/// Statuses retried with backoff.
pub const TRANSIENT_STATUSES: [u16; 5] = [429, 500, 502, 503, 504];

/// Source of decree document text.
#[async_trait::async_trait]
pub trait DocumentFetcher: Send + Sync {
    /// Fetch the document at `url` as text.
    async fn fetch(&self, url: &str) -> Result<String>;
}

/// Retry schedule for transient failures.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Retries after the first attempt
    pub max_retries: u32,
    /// Delay before the first retry, doubled for each following one
    pub base_delay: Duration,
    /// Statuses considered transient
    pub statuses: Vec<u16>,
}

impl RetryPolicy {
    /// Delay before retry number `attempt` (zero-based).
    #[must_use]
    pub fn backoff(&self, attempt: u32) -> Duration {
        self.base_delay.saturating_mul(2u32.saturating_pow(attempt))
    }

    /// Whether a response with `status` should be retried.
    #[must_use]
    pub fn is_transient(&self, status: StatusCode) -> bool {
        self.statuses.contains(&status.as_u16())
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay: Duration::from_millis(500),
            statuses: TRANSIENT_STATUSES.to_vec(),
        }
    }
}

/// Pooled HTTP client with connect/read timeouts and retry policy.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    retry: RetryPolicy,
}

impl HttpClient {
    /// Build a client whose connection pool holds `pool_size` idle connections per host.
    pub fn new(config: &HttpConfig, pool_size: usize) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .read_timeout(Duration::from_secs(config.read_timeout_secs))
            .pool_max_idle_per_host(pool_size)
            .user_agent(config.user_agent.clone())
            .build()?;

        Ok(Self {
            client,
            retry: RetryPolicy {
                max_retries: config.max_retries,
                base_delay: Duration::from_millis(config.backoff_ms),
                ..RetryPolicy::default()
            },
        })
    }

    /// Replace the retry policy.
    #[must_use]
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// GET `url` and return its body.
    ///
    /// Transient statuses and connection failures are retried with
    /// exponential backoff. Any other non-2xx status, or a transient one
    /// after the last retry, is returned as `ScanError::HttpStatus`.
    pub async fn get_text(&self, url: &str) -> Result<String> {
        let mut attempt = 0;
        loop {
            match self.client.get(url).send().await {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        return Ok(response.text().await?);
                    }
                    if !self.retry.is_transient(status) || attempt >= self.retry.max_retries {
                        return Err(ScanError::HttpStatus {
                            url: url.to_string(),
                            status: status.as_u16(),
                        });
                    }
                    tracing::debug!("HTTP {} for {}, retrying", status.as_u16(), url);
                }
                Err(e) if e.is_connect() && attempt < self.retry.max_retries => {
                    tracing::debug!("Connection to {} failed ({}), retrying", url, e);
                }
                Err(e) => return Err(e.into()),
            }

            let delay = self.retry.backoff(attempt);
            attempt += 1;
            tracing::warn!(
                "Fetch of {} failed (attempt {}/{}), retrying in {:?}",
                url,
                attempt,
                self.retry.max_retries + 1,
                delay
            );
            tokio::time::sleep(delay).await;
        }
    }
}

#[async_trait::async_trait]
impl DocumentFetcher for HttpClient {
    async fn fetch(&self, url: &str) -> Result<String> {
        self.get_text(url).await
    }
}
