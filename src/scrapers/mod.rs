//! Site routes that turn a request into a feed.
//!
//! Each submodule describes one portal: where its listing lives, which
//! selector strategies recognise its layouts, and how to read its article
//! pages. The shared [`crate::pipeline::Scraper`] does the rest.
//!
//! # Supported Sources
//!
//! | Source | Module | Route | Notes |
//! |--------|--------|-------|-------|
//! | JA.com 農業協同組合新聞 | [`jacom`] | `/jacom/:category?` | Category listings, defaults to `kome` |
//! | 日本経済新聞 | [`nikkei`] | `/nikkei/search/:keyword/:volume?` | Keyword search, keyword required |

use serde::Serialize;

const TRADITIONAL_MEDIA: &[&str] = &["traditional-media"];

pub mod jacom;
pub mod nikkei;

/// A site grouping several routes.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Namespace {
    pub name: &'static str,
    pub url: &'static str,
    pub description: &'static str,
}

/// One route parameter and what it means.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Parameter {
    pub name: &'static str,
    pub description: &'static str,
}

/// Maps pages on the source site to the route serving them, so a browser
/// helper can suggest a feed for the page being viewed.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Radar {
    /// Source site patterns, `host/path` with `:param` placeholders.
    pub source: &'static [&'static str],
    /// Route path (relative to the namespace) the placeholders fill in.
    pub target: &'static str,
}

/// Metadata describing a route, printed by the `routes` command.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct RouteInfo {
    pub namespace: Namespace,
    pub path: &'static str,
    /// Directory categories the route is listed under.
    pub categories: &'static [&'static str],
    pub name: &'static str,
    pub example: &'static str,
    pub url: &'static str,
    pub description: &'static str,
    pub parameters: &'static [Parameter],
    pub radar: &'static [Radar],
}

/// Every route this binary serves.
pub fn routes() -> Vec<RouteInfo> {
    vec![jacom::ROUTE, nikkei::ROUTE]
}
