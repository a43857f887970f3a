//! Error types for fetching, scraping and configuration.
//!
//! Only bad route parameters and a failed listing fetch abort a request.
//! Everything else (empty listings, bad candidates, failed detail pages)
//! degrades to partial or empty results and never reaches these types.

use thiserror::Error;

/// Errors from the HTTP fetch layer.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The server answered with a non-2xx status.
    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    /// Connection, TLS, timeout or body decoding failure.
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Fatal errors for a single feed request.
#[derive(Debug, Error)]
pub enum ScrapeError {
    /// A required route parameter was absent or blank.
    #[error("missing required parameter `{0}`")]
    MissingParameter(&'static str),

    /// A route parameter cannot be used to build the listing URL.
    #[error("invalid value {value:?} for parameter `{name}`")]
    InvalidParameter { name: &'static str, value: String },

    /// The category or search page could not be fetched.
    #[error("failed to fetch {site} listing {url}: {source}")]
    ListingFetch {
        site: &'static str,
        url: String,
        #[source]
        source: FetchError,
    },

    /// A route built a URL that does not parse.
    #[error("invalid url {url}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
}

/// Errors loading the YAML configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {path}: {source}")]
    Yaml {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },
}
