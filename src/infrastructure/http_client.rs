//! HTTP client for page fetching
//!
//! Wraps a shared `reqwest::Client` configured with the browser user agent
//! and request timeouts. Callers go through the [`PageFetcher`] trait so the
//! pipelines can be driven by a fake in tests.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{
    Client,
    header::{HeaderMap, HeaderValue, USER_AGENT},
};
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

use crate::infrastructure::config::HttpConfig;

/// Failure to obtain a response or its body
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("failed to read response body from {url}: {source}")]
    Body {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

/// A fetched page. `body` is only read for successful statuses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedPage {
    pub url: String,
    pub status: u16,
    pub body: String,
}

impl FetchedPage {
    pub fn new(url: impl Into<String>, status: u16, body: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            status,
            body: body.into(),
        }
    }

    /// Any 2xx status
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Exactly 200 OK
    pub fn is_ok(&self) -> bool {
        self.status == 200
    }
}

/// Source of HTML pages
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Issue one GET for `url`. Transport failures are errors; HTTP error
    /// statuses are returned as pages for the caller to classify.
    async fn fetch(&self, url: &str) -> Result<FetchedPage, FetchError>;
}

/// `reqwest`-backed page fetcher. Cloning shares the connection pool.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    /// Create a client from configuration.
    ///
    /// `max_idle_per_host` sizes the connection pool; the profile fetcher
    /// passes its concurrency limit.
    pub fn new(config: &HttpConfig, max_idle_per_host: usize) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&config.user_agent).context("Invalid user agent")?,
        );

        let client = Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_seconds))
            .connect_timeout(Duration::from_secs(config.connect_timeout_seconds))
            .pool_max_idle_per_host(max_idle_per_host)
            .redirect(if config.follow_redirects {
                reqwest::redirect::Policy::limited(10)
            } else {
                reqwest::redirect::Policy::none()
            })
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client })
    }
}

#[async_trait]
impl PageFetcher for HttpClient {
    async fn fetch(&self, url: &str) -> Result<FetchedPage, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| FetchError::Transport {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            debug!("Non-success status {} for {}", status, url);
            return Ok(FetchedPage::new(url, status.as_u16(), String::new()));
        }

        let body = response.text().await.map_err(|source| FetchError::Body {
            url: url.to_string(),
            source,
        })?;

        debug!("Fetched {} ({} chars)", url, body.len());
        Ok(FetchedPage::new(url, status.as_u16(), body))
    }
}
