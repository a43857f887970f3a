//! Canned-page [`Fetcher`] for tests.

use crate::error::FetchError;
use crate::fetch::{Fetcher, RequestHeaders};
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

/// Serves registered pages and statuses, records every request.
///
/// Unregistered URLs answer 404.
#[derive(Default)]
pub struct FakeFetcher {
    pages: HashMap<String, Result<String, u16>>,
    delays: HashMap<String, Duration>,
    requests: Mutex<Vec<(String, RequestHeaders)>>,
}

impl FakeFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(mut self, url: &str, body: &str) -> Self {
        self.pages.insert(url.to_string(), Ok(body.to_string()));
        self
    }

    pub fn status(mut self, url: &str, status: u16) -> Self {
        self.pages.insert(url.to_string(), Err(status));
        self
    }

    pub fn delay(mut self, url: &str, delay: Duration) -> Self {
        self.delays.insert(url.to_string(), delay);
        self
    }

    pub fn calls(&self, url: &str) -> usize {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|(u, _)| u == url)
            .count()
    }

    pub fn total_calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    /// Headers of the most recent request for `url`.
    pub fn headers_for(&self, url: &str) -> Option<RequestHeaders> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|(u, _)| u == url)
            .map(|(_, h)| h.clone())
    }
}

impl Fetcher for FakeFetcher {
    async fn fetch(&self, url: &str, headers: &RequestHeaders) -> Result<String, FetchError> {
        self.requests
            .lock()
            .unwrap()
            .push((url.to_string(), headers.clone()));

        if let Some(delay) = self.delays.get(url) {
            tokio::time::sleep(*delay).await;
        }

        match self.pages.get(url) {
            Some(Ok(body)) => Ok(body.clone()),
            Some(Err(status)) => Err(FetchError::Status {
                url: url.to_string(),
                status: *status,
            }),
            None => Err(FetchError::Status {
                url: url.to_string(),
                status: 404,
            }),
        }
    }
}
