//! Data models for scraped listings, enriched items and assembled feeds.
//!
//! This module defines the core data structures used throughout the application:
//! - [`ListingItem`]: One article summary as found on a listing page
//! - [`EnrichedItem`]: A listing item overlaid with detail-page data
//! - [`Enrichment`]: Outcome of a best-effort detail fetch
//! - [`Feed`]: The collection returned for a single request
//!
//! Field names serialize as `pubDate` and `item` to match what feed renderers
//! downstream expect.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An article summary extracted from a category or search page.
///
/// `title` and `link` are always non-empty; candidates that cannot provide
/// both never become a `ListingItem`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ListingItem {
    /// Headline text, whitespace-collapsed.
    pub title: String,
    /// Absolute article URL.
    pub link: String,
    /// Publication time, when the listing shows one that parses.
    #[serde(rename = "pubDate", default, skip_serializing_if = "Option::is_none")]
    pub pub_date: Option<DateTime<Utc>>,
    /// Category or tag labels in document order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub category: Vec<String>,
    /// Listing-level summary text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A listing item after detail enrichment.
///
/// Enrichment only overlays: a field the detail page did not provide keeps
/// its listing-level value.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct EnrichedItem {
    pub title: String,
    pub link: String,
    #[serde(rename = "pubDate", default, skip_serializing_if = "Option::is_none")]
    pub pub_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub category: Vec<String>,
    /// Full article HTML when the detail page yielded a content container,
    /// otherwise the listing summary.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
}

impl From<ListingItem> for EnrichedItem {
    fn from(item: ListingItem) -> Self {
        Self {
            title: item.title,
            link: item.link,
            pub_date: item.pub_date,
            category: item.category,
            description: item.description,
            author: None,
        }
    }
}

/// Outcome of enriching one item.
///
/// Failures are values, not errors: the caller logs the reason and keeps the
/// listing-level item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Enrichment {
    /// The detail page was fetched and parsed; fields found there were overlaid.
    Enriched(EnrichedItem),
    /// Nothing was fetched or the fetch failed; the item is as listed.
    Unchanged { item: EnrichedItem, reason: String },
}

impl Enrichment {
    pub fn item(&self) -> &EnrichedItem {
        match self {
            Enrichment::Enriched(item) => item,
            Enrichment::Unchanged { item, .. } => item,
        }
    }

    pub fn into_item(self) -> EnrichedItem {
        match self {
            Enrichment::Enriched(item) => item,
            Enrichment::Unchanged { item, .. } => item,
        }
    }

    pub fn is_enriched(&self) -> bool {
        matches!(self, Enrichment::Enriched(_))
    }
}

/// Top-level feed metadata supplied by a route handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedMeta {
    pub title: String,
    pub link: String,
    pub description: String,
}

/// The feed produced for one request.
///
/// Constructed once per request and handed straight to the output layer.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Feed {
    pub title: String,
    pub link: String,
    pub description: String,
    pub item: Vec<EnrichedItem>,
}

impl Feed {
    /// Wrap enriched items with feed metadata.
    pub fn assemble(item: Vec<EnrichedItem>, meta: FeedMeta) -> Self {
        Self {
            title: meta.title,
            link: meta.link,
            description: meta.description,
            item,
        }
    }
}
