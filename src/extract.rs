//! Listing extraction with ordered fallback strategies.
//!
//! Listing pages change layout often, so each route supplies a list of
//! [`Strategy`] values in priority order. The first strategy that yields at
//! least one valid item wins. [`Strategy::DateTextScan`] is the last resort
//! for pages none of the structural selectors recognise.

use std::collections::HashSet;

use crate::dates::{DateHint, find_japanese_date};
use crate::models::ListingItem;
use crate::normalize::{RawCandidate, SelectorRules, candidate_from_node, normalize, selector};
use crate::utils::collapse_whitespace;
use scraper::{ElementRef, Html};
use tracing::{debug, info, instrument};
use url::Url;

/// Elements whose text is never article content.
const NON_CONTENT_TAGS: &[&str] = &["script", "style", "noscript", "template"];

/// One way of locating article nodes on a listing page.
#[derive(Debug, Clone, Copy)]
pub enum Strategy {
    /// Class-based selectors for a known layout.
    Structural(SelectorRules),
    /// Find the innermost elements whose text contains a `YYYY年M月D日` date
    /// plus some other text. Blocks without a link point at the listing page.
    DateTextScan,
}

impl Strategy {
    pub fn name(&self) -> &'static str {
        match self {
            Strategy::Structural(rules) => rules.name,
            Strategy::DateTextScan => "date-text-scan",
        }
    }

    /// Raw candidates in document order. `base` stands in for the link of
    /// text blocks that carry none.
    pub fn candidates(&self, document: &Html, base: &Url) -> Vec<RawCandidate> {
        match self {
            Strategy::Structural(rules) => structural_candidates(document, rules),
            Strategy::DateTextScan => date_text_candidates(document, base),
        }
    }
}

fn structural_candidates(document: &Html, rules: &SelectorRules) -> Vec<RawCandidate> {
    let Some(items) = selector(rules.items) else {
        return Vec::new();
    };
    document
        .select(&items)
        .map(|node| candidate_from_node(&node, rules))
        .collect()
}

fn first_link(el: &ElementRef<'_>) -> Option<String> {
    if el.value().name() == "a" {
        if let Some(href) = el.value().attr("href") {
            return Some(href.to_string());
        }
    }
    let anchors = selector("a[href]")?;
    el.select(&anchors)
        .next()
        .and_then(|a| a.value().attr("href").map(str::to_string))
}

/// Text of `el` without the contents of script-like descendants.
fn visible_text(el: &ElementRef<'_>) -> String {
    fn collect(el: &ElementRef<'_>, out: &mut String) {
        for child in el.children() {
            if let Some(text) = child.value().as_text() {
                out.push_str(text);
            } else if let Some(child) = ElementRef::wrap(child) {
                if !NON_CONTENT_TAGS.contains(&child.value().name()) {
                    collect(&child, out);
                }
            }
        }
    }

    let mut out = String::new();
    collect(el, &mut out);
    collapse_whitespace(&out)
}

/// A dated block: its visible text, the date found in it and the text left
/// once the date is removed.
struct DatedBlock {
    text: String,
    date: String,
    title: String,
}

fn dated_block(el: &ElementRef<'_>) -> Option<DatedBlock> {
    if NON_CONTENT_TAGS.contains(&el.value().name()) {
        return None;
    }
    let text = visible_text(el);
    let date = find_japanese_date(&text)?.to_string();
    let title = collapse_whitespace(&text.replacen(date.as_str(), "", 1));
    Some(DatedBlock { text, date, title })
}

fn date_text_candidates(document: &Html, base: &Url) -> Vec<RawCandidate> {
    let Some(all) = selector("body *") else {
        return Vec::new();
    };

    // A block whose text is only the date is a label inside an item, not the
    // item itself.
    let qualifying: Vec<(ElementRef<'_>, DatedBlock)> = document
        .select(&all)
        .filter_map(|el| dated_block(&el).map(|block| (el, block)))
        .filter(|(_, block)| !block.title.is_empty())
        .collect();
    let ids: Vec<_> = qualifying.iter().map(|(el, _)| el.id()).collect();

    qualifying
        .into_iter()
        .filter(|(el, _)| !el.descendants().skip(1).any(|n| ids.contains(&n.id())))
        .map(|(el, block)| text_block_candidate(&el, block, base))
        .collect()
}

fn text_block_candidate(el: &ElementRef<'_>, block: DatedBlock, base: &Url) -> RawCandidate {
    RawCandidate {
        title: Some(block.title),
        href: first_link(el).or_else(|| Some(base.to_string())),
        date_text: Some(block.date),
        date_hint: Some(DateHint::JapaneseYmd),
        categories: Vec::new(),
        description: Some(block.text),
    }
}

/// Extract up to `limit` listing items from `page_html`.
///
/// Strategies run in order until one produces a non-empty set of valid
/// items. Repeated links keep their first occurrence, except links back to
/// `base`, which several linkless blocks may share. An empty result is a
/// normal outcome, not an error.
#[instrument(level = "debug", skip_all, fields(base = %base, limit = limit))]
pub fn extract_listing(
    page_html: &str,
    base: &Url,
    limit: usize,
    strategies: &[Strategy],
) -> Vec<ListingItem> {
    let document = Html::parse_document(page_html);

    for strategy in strategies {
        let candidates = strategy.candidates(&document, base);
        let found = candidates.len();
        let mut seen = HashSet::new();
        let mut items: Vec<ListingItem> = candidates
            .into_iter()
            .filter_map(|raw| normalize(raw, base))
            .filter(|item| item.link == base.as_str() || seen.insert(item.link.clone()))
            .collect();

        if items.is_empty() {
            debug!(strategy = strategy.name(), candidates = found, "Strategy yielded no items");
            continue;
        }

        items.truncate(limit);
        info!(
            strategy = strategy.name(),
            candidates = found,
            count = items.len(),
            "Extracted listing items"
        );
        return items;
    }

    info!("No strategy matched the listing page");
    Vec::new()
}
