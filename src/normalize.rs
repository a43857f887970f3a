//! Turning matched DOM nodes into [`ListingItem`]s.
//!
//! Extraction happens in two steps. A strategy pulls raw strings out of each
//! matched node into a [`RawCandidate`]; [`normalize`] then validates them,
//! resolves the link and parses the date. A candidate without a usable title
//! and link is dropped.

use crate::dates::{DateHint, contains_japanese_date, parse_date};
use crate::models::ListingItem;
use crate::utils::{collapse_whitespace, resolve_link};
use itertools::Itertools;
use scraper::{ElementRef, Selector};
use tracing::warn;
use url::Url;

/// Placeholder title ("untitled") that some listings print for entries
/// without a headline. Candidates carrying it are never emitted.
pub const UNTITLED: &str = "無標題";

/// Strings extracted from one candidate node, before validation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawCandidate {
    pub title: Option<String>,
    pub href: Option<String>,
    pub date_text: Option<String>,
    pub date_hint: Option<DateHint>,
    pub categories: Vec<String>,
    pub description: Option<String>,
}

/// Selectors describing one structural layout of a listing page.
///
/// Sub-selector lists are in priority order: the first selector with a match
/// wins, regardless of document order between selectors.
#[derive(Debug, Clone, Copy)]
pub struct SelectorRules {
    pub name: &'static str,
    /// Matches one node per article.
    pub items: &'static str,
    /// Anchors carrying the title text and `href`.
    pub title: &'static [&'static str],
    pub date: &'static [&'static str],
    pub category: &'static [&'static str],
    pub summary: &'static [&'static str],
    /// Use the title as description when no summary is found.
    pub summary_falls_back_to_title: bool,
}

/// Parse a CSS selector, logging instead of panicking on a bad one.
pub fn selector(css: &str) -> Option<Selector> {
    match Selector::parse(css) {
        Ok(sel) => Some(sel),
        Err(e) => {
            warn!(css, error = %e, "Invalid selector skipped");
            None
        }
    }
}

/// Collapsed text content of an element.
pub fn element_text(el: &ElementRef<'_>) -> String {
    collapse_whitespace(&el.text().collect::<String>())
}

fn first_text(node: &ElementRef<'_>, selectors: &[&str]) -> Option<String> {
    selectors
        .iter()
        .filter_map(|css| selector(css))
        .flat_map(|sel| node.select(&sel).map(|el| element_text(&el)).collect::<Vec<_>>())
        .find(|text| !text.is_empty())
}

/// Pull the raw fields for one article node according to `rules`.
pub fn candidate_from_node(node: &ElementRef<'_>, rules: &SelectorRules) -> RawCandidate {
    let anchor = rules
        .title
        .iter()
        .filter_map(|css| selector(css))
        .find_map(|sel| node.select(&sel).next());

    let title = anchor.as_ref().map(element_text).filter(|t| !t.is_empty());
    let href = anchor.and_then(|a| a.value().attr("href").map(str::to_string));

    let date_text = rules
        .date
        .iter()
        .filter_map(|css| selector(css))
        .flat_map(|sel| {
            node.select(&sel)
                .map(|el| match el.value().attr("datetime") {
                    Some(dt) if !dt.trim().is_empty() => dt.trim().to_string(),
                    _ => element_text(&el),
                })
                .collect::<Vec<_>>()
        })
        .find(|text| !text.is_empty());

    let categories = rules
        .category
        .iter()
        .filter_map(|css| selector(css))
        .flat_map(|sel| node.select(&sel).map(|el| element_text(&el)).collect::<Vec<_>>())
        .filter(|label| !label.is_empty())
        .unique()
        .collect();

    let description = first_text(node, rules.summary).or_else(|| {
        if rules.summary_falls_back_to_title {
            title.clone()
        } else {
            None
        }
    });

    RawCandidate {
        title,
        href,
        date_text,
        date_hint: None,
        categories,
        description,
    }
}

/// Validate a candidate and build a listing item.
///
/// Returns `None` when the title is missing, blank or [`UNTITLED`], or the
/// link cannot be resolved to an absolute HTTP(S) URL. An unparsable date
/// only clears `pub_date`.
pub fn normalize(raw: RawCandidate, base: &Url) -> Option<ListingItem> {
    let title = raw
        .title
        .map(|t| collapse_whitespace(&t))
        .filter(|t| !t.is_empty() && t != UNTITLED)?;
    let link = resolve_link(base, raw.href.as_deref()?)?;

    let pub_date = raw.date_text.as_deref().and_then(|text| {
        let hint = raw
            .date_hint
            .or_else(|| contains_japanese_date(text).then_some(DateHint::JapaneseYmd));
        parse_date(text, hint)
    });

    Some(ListingItem {
        title,
        link,
        pub_date,
        category: raw.categories,
        description: raw.description.filter(|d| !d.trim().is_empty()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use scraper::Html;

    const RULES: SelectorRules = SelectorRules {
        name: "test",
        items: ".item",
        title: &["h2 a", ".title a", "a"],
        date: &[".date", "time"],
        category: &[".tag"],
        summary: &[".summary"],
        summary_falls_back_to_title: false,
    };

    fn first_candidate(html: &str, rules: &SelectorRules) -> RawCandidate {
        let doc = Html::parse_document(html);
        let items = selector(rules.items).unwrap();
        let node = doc.select(&items).next().unwrap();
        candidate_from_node(&node, rules)
    }

    fn base() -> Url {
        Url::parse("https://example.test").unwrap()
    }

    #[test]
    fn test_title_selector_priority_beats_document_order() {
        let raw = first_candidate(
            r#"<div class="item"><a href="/other">関連</a><h2><a href="/news/1"> 米価 の 動向 </a></h2></div>"#,
            &RULES,
        );
        assert_eq!(raw.title.as_deref(), Some("米価 の 動向"));
        assert_eq!(raw.href.as_deref(), Some("/news/1"));
    }

    #[test]
    fn test_categories_are_deduplicated() {
        let raw = first_candidate(
            r#"<div class="item"><a href="/n">t</a><span class="tag">米</span><span class="tag">米</span><span class="tag">野菜</span></div>"#,
            &RULES,
        );
        assert_eq!(raw.categories, vec!["米".to_string(), "野菜".to_string()]);
    }

    #[test]
    fn test_time_datetime_attribute_preferred() {
        let raw = first_candidate(
            r#"<div class="item"><a href="/n">t</a><time datetime="2025-05-01T09:00:00+09:00">5月1日</time></div>"#,
            &RULES,
        );
        assert_eq!(raw.date_text.as_deref(), Some("2025-05-01T09:00:00+09:00"));
    }

    #[test]
    fn test_summary_fallback_to_title() {
        let rules = SelectorRules {
            summary_falls_back_to_title: true,
            ..RULES
        };
        let raw = first_candidate(r#"<div class="item"><a href="/n">見出し</a></div>"#, &rules);
        assert_eq!(raw.description.as_deref(), Some("見出し"));
    }

    #[test]
    fn test_normalize_resolves_relative_link() {
        let item = normalize(
            RawCandidate {
                title: Some("t".to_string()),
                href: Some("/news/123".to_string()),
                ..Default::default()
            },
            &base(),
        )
        .unwrap();
        assert_eq!(item.link, "https://example.test/news/123");
    }

    #[test]
    fn test_normalize_parses_japanese_date() {
        let item = normalize(
            RawCandidate {
                title: Some("t".to_string()),
                href: Some("/n".to_string()),
                date_text: Some("2025年5月1日".to_string()),
                ..Default::default()
            },
            &base(),
        )
        .unwrap();
        assert_eq!(
            item.pub_date,
            Some(Utc.with_ymd_and_hms(2025, 4, 30, 15, 0, 0).unwrap())
        );
    }

    #[test]
    fn test_normalize_unparsable_date_keeps_item() {
        let item = normalize(
            RawCandidate {
                title: Some("t".to_string()),
                href: Some("/n".to_string()),
                date_text: Some("先週".to_string()),
                ..Default::default()
            },
            &base(),
        )
        .unwrap();
        assert!(item.pub_date.is_none());
    }

    #[test]
    fn test_normalize_drops_missing_title_or_link() {
        let no_title = RawCandidate {
            href: Some("/n".to_string()),
            ..Default::default()
        };
        let blank_title = RawCandidate {
            title: Some("  ".to_string()),
            href: Some("/n".to_string()),
            ..Default::default()
        };
        let untitled = RawCandidate {
            title: Some(UNTITLED.to_string()),
            href: Some("/n".to_string()),
            ..Default::default()
        };
        let no_link = RawCandidate {
            title: Some("t".to_string()),
            ..Default::default()
        };
        for raw in [no_title, blank_title, untitled, no_link] {
            assert!(normalize(raw, &base()).is_none());
        }
    }
}
