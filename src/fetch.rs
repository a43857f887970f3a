//! HTTP page fetching.
//!
//! Route handlers talk to the network only through the [`Fetcher`] trait so
//! the pipeline can be driven by canned pages in tests. [`HttpFetcher`] is the
//! production implementation over a shared `reqwest::Client`.

use crate::config::Config;
use crate::error::FetchError;
use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, REFERER, USER_AGENT};
use std::time::{Duration, Instant};
use tracing::{debug, instrument, warn};

/// Headers sent with every page request.
///
/// Portals serve trimmed or blocked pages to clients that do not look like a
/// browser, so all four are always set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestHeaders {
    pub user_agent: String,
    pub accept: String,
    pub accept_language: String,
    pub referer: String,
}

impl RequestHeaders {
    /// Browser-like headers for a listing page.
    pub fn listing(config: &Config, referer: &str) -> Self {
        Self {
            user_agent: config.user_agent.clone(),
            accept: config.accept.clone(),
            accept_language: config.accept_language.clone(),
            referer: referer.to_string(),
        }
    }

    /// Headers for an article page, sent with the listing as referer.
    pub fn detail(config: &Config, referer: &str) -> Self {
        Self {
            user_agent: config.detail_user_agent.clone(),
            accept: config.accept.clone(),
            accept_language: config.accept_language.clone(),
            referer: referer.to_string(),
        }
    }
}

/// Fetch a page body as text.
///
/// Implementations return an error for transport failures and for any
/// non-2xx status.
pub trait Fetcher {
    async fn fetch(&self, url: &str, headers: &RequestHeaders) -> Result<String, FetchError>;
}

/// [`Fetcher`] backed by `reqwest`.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new(config: &Config) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;
        Ok(Self { client })
    }
}

impl Fetcher for HttpFetcher {
    #[instrument(level = "debug", skip_all, fields(%url))]
    async fn fetch(&self, url: &str, headers: &RequestHeaders) -> Result<String, FetchError> {
        let t0 = Instant::now();
        let response = self
            .client
            .get(url)
            .header(USER_AGENT, &headers.user_agent)
            .header(ACCEPT, &headers.accept)
            .header(ACCEPT_LANGUAGE, &headers.accept_language)
            .header(REFERER, &headers.referer)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            warn!(status = status.as_u16(), elapsed_ms = t0.elapsed().as_millis() as u64, "Non-success status");
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        debug!(
            bytes = body.len(),
            elapsed_ms = t0.elapsed().as_millis() as u64,
            "Fetched page"
        );
        Ok(body)
    }
}
