//! Best-effort detail enrichment.
//!
//! Each listing item's own page is fetched and, where the page yields them,
//! the full content HTML, a precise publish time and the author are overlaid
//! onto the item. Failures never propagate: they come back as
//! [`Enrichment::Unchanged`] with the reason, and the item keeps its listing
//! data.

use crate::dates::parse_date;
use crate::fetch::{Fetcher, RequestHeaders};
use crate::models::{EnrichedItem, Enrichment, ListingItem};
use crate::normalize::{element_text, selector};
use scraper::Html;
use tracing::{debug, instrument, warn};

/// Where to read one field on a detail page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldRule {
    pub selector: &'static str,
    /// Attribute to read; `None` reads the element text.
    pub attr: Option<&'static str>,
}

impl FieldRule {
    pub const fn text(selector: &'static str) -> Self {
        Self { selector, attr: None }
    }

    pub const fn attr(selector: &'static str, attr: &'static str) -> Self {
        Self {
            selector,
            attr: Some(attr),
        }
    }

    /// First non-empty value across matching elements.
    fn read(&self, document: &Html) -> Option<String> {
        let sel = selector(self.selector)?;
        document
            .select(&sel)
            .map(|el| match self.attr {
                Some(attr) => el.value().attr(attr).unwrap_or_default().trim().to_string(),
                None => element_text(&el),
            })
            .find(|value| !value.is_empty())
    }
}

/// Selectors for a site's article pages, each list in priority order.
#[derive(Debug, Clone, Copy)]
pub struct DetailRules {
    /// Containers whose inner HTML becomes the description.
    pub content: &'static [&'static str],
    pub published: &'static [FieldRule],
    pub author: &'static [FieldRule],
}

impl DetailRules {
    fn first(rules: &[FieldRule], document: &Html) -> Option<String> {
        rules.iter().find_map(|rule| rule.read(document))
    }

    fn content_html(&self, document: &Html) -> Option<String> {
        self.content
            .iter()
            .filter_map(|css| selector(css))
            .find_map(|sel| {
                document
                    .select(&sel)
                    .next()
                    .map(|el| el.inner_html())
                    .filter(|html| !html.trim().is_empty())
            })
    }

    /// Overlay whatever the detail page provides onto `item`.
    ///
    /// Fields the page does not yield, or yields unparsably, are left alone.
    pub fn apply(&self, mut item: EnrichedItem, page_html: &str) -> EnrichedItem {
        let document = Html::parse_document(page_html);

        if let Some(content) = self.content_html(&document) {
            item.description = Some(content);
        }
        if let Some(published) = Self::first(self.published, &document).and_then(|t| parse_date(&t, None)) {
            item.pub_date = Some(published);
        }
        if let Some(author) = Self::first(self.author, &document) {
            item.author = Some(author);
        }
        item
    }
}

/// Fetch `item`'s page and overlay its details.
///
/// Items whose link is the listing page itself are returned without a
/// fetch, since there is nothing more specific to read.
#[instrument(level = "debug", skip_all, fields(link = %item.link))]
pub async fn enrich<F: Fetcher>(
    fetcher: &F,
    item: ListingItem,
    listing_url: &str,
    headers: &RequestHeaders,
    rules: &DetailRules,
) -> Enrichment {
    let item = EnrichedItem::from(item);

    if item.link == listing_url {
        debug!("Link is the listing page; skipping detail fetch");
        return Enrichment::Unchanged {
            item,
            reason: "link is the listing page".to_string(),
        };
    }

    match fetcher.fetch(&item.link, headers).await {
        Ok(body) => {
            let enriched = rules.apply(item, &body);
            debug!(
                has_author = enriched.author.is_some(),
                has_date = enriched.pub_date.is_some(),
                "Enriched item"
            );
            Enrichment::Enriched(enriched)
        }
        Err(e) => {
            warn!(link = %item.link, error = %e, "Detail fetch failed; keeping listing data");
            Enrichment::Unchanged {
                item,
                reason: e.to_string(),
            }
        }
    }
}
