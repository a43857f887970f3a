//! Utility functions for link resolution and text cleanup.
//!
//! This module provides helper functions used throughout the application:
//! - Resolving scraped `href` values to absolute URLs
//! - Collapsing scraped text into single-spaced strings
//! - Truncating long bodies for log output

use url::Url;

/// Resolve a scraped `href` against the page it came from.
///
/// Fragments are dropped so `#` and `#top` resolve to the page itself.
/// Non-HTTP schemes (`javascript:`, `mailto:`) yield `None`.
///
/// # Examples
///
/// ```ignore
/// let base = Url::parse("https://example.test").unwrap();
/// assert_eq!(resolve_link(&base, "/news/123").as_deref(), Some("https://example.test/news/123"));
/// ```
pub fn resolve_link(base: &Url, href: &str) -> Option<String> {
    let href = href.trim();
    if href.is_empty() {
        return None;
    }

    let mut url = base.join(href).ok()?;
    if !matches!(url.scheme(), "http" | "https") {
        return None;
    }
    url.set_fragment(None);
    Some(url.to_string())
}

/// Collapse runs of whitespace (including full-width spaces) into one ASCII
/// space and trim the ends.
pub fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Truncate a string for logging purposes.
///
/// Long strings are cut at a character boundary no later than `max` bytes,
/// with an ellipsis and the dropped byte count appended.
pub fn truncate_for_log(s: &str, max: usize) -> String {
    if s.len() <= max {
        return s.to_string();
    }
    let mut cut = max;
    while !s.is_char_boundary(cut) {
        cut -= 1;
    }
    format!("{}…(+{} bytes)", &s[..cut], s.len() - cut)
}
