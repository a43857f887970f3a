//! # Portal Feeds
//!
//! Scrapes Japanese news portals into normalized article feeds. Each route
//! fetches a listing page, extracts article summaries with a cascade of
//! selector strategies, enriches every item from its own article page, and
//! prints the resulting feed as JSON.
//!
//! ## Routes
//!
//! - `jacom [CATEGORY]`: JA.com 農業協同組合新聞 category listings
//! - `nikkei-search KEYWORD [VOLUME]`: 日本経済新聞 keyword search
//! - `routes`: route metadata
//!
//! ## Usage
//!
//! ```sh
//! portal_feeds jacom kome --limit 10 --pretty
//! RUST_LOG=debug portal_feeds nikkei-search AI
//! ```
//!
//! ## Architecture
//!
//! 1. **Listing**: fetch the category or search page (fatal on failure)
//! 2. **Extraction**: first selector strategy with results wins, date-text scan last
//! 3. **Enrichment**: article pages fetched concurrently, memoized per URL,
//!    failures keep the listing data
//! 4. **Output**: feed JSON to stdout or `--output`

use clap::Parser;
use std::error::Error;
use tracing::{debug, error, info, instrument};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod cache;
mod cli;
mod config;
mod dates;
mod enrich;
mod error;
mod extract;
mod fetch;
mod models;
mod normalize;
mod outputs;
mod pipeline;
mod scrapers;
#[cfg(test)]
mod test_support;
mod utils;

use cli::{Cli, Command};
use config::Config;
use error::ScrapeError;
use fetch::HttpFetcher;
use models::Feed;
use outputs::json;
use pipeline::Scraper;
use scrapers::jacom::JacomRequest;
use scrapers::nikkei::NikkeiSearchRequest;

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init (stderr, stdout carries the feed) ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    let args = Cli::parse();
    debug!(?args, "Parsed CLI arguments");

    let config = match Config::load(args.config.as_deref()).await {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "Failed to load configuration");
            return Err(e.into());
        }
    };

    let result = match args.command.clone() {
        Command::Routes => json::write(&scrapers::routes(), args.output.as_deref(), args.pretty).await,
        Command::Jacom { category, limit } => {
            let scraper = Scraper::new(HttpFetcher::new(&config)?, config);
            let feed = scrapers::jacom::handle(&scraper, &JacomRequest { category, limit }).await;
            emit(feed, &args).await
        }
        Command::NikkeiSearch { keyword, volume } => {
            let scraper = Scraper::new(HttpFetcher::new(&config)?, config);
            let request = NikkeiSearchRequest { keyword, volume };
            let feed = scrapers::nikkei::handle(&scraper, &request).await;
            emit(feed, &args).await
        }
    };

    let elapsed = start_time.elapsed();
    info!(?elapsed, ok = result.is_ok(), "Execution complete");
    result
}

/// Write a finished feed, or log and return the request failure.
async fn emit(feed: Result<Feed, ScrapeError>, args: &Cli) -> Result<(), Box<dyn Error>> {
    match feed {
        Ok(feed) => {
            info!(title = %feed.title, items = feed.item.len(), "Feed ready");
            json::write(&feed, args.output.as_deref(), args.pretty).await
        }
        Err(e) => {
            error!(error = %e, "Feed request failed");
            Err(e.into())
        }
    }
}
