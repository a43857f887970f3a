//! 日本経済新聞 keyword search.
//!
//! Search results come from `https://www.nikkei.com/search?keyword=…&volume=…`.
//! The result markup has gone through at least two layouts: the `m-miM04`
//! module list and a generic article list. Both are tried, followed by the
//! date-text scan.

use super::{Namespace, Parameter, Radar, RouteInfo};
use crate::enrich::{DetailRules, FieldRule};
use crate::error::ScrapeError;
use crate::extract::Strategy;
use crate::fetch::Fetcher;
use crate::models::{Feed, FeedMeta};
use crate::normalize::SelectorRules;
use crate::pipeline::{ListingPlan, Scraper};
use tracing::instrument;
use url::Url;

pub const BASE_URL: &str = "https://www.nikkei.com";
pub const DEFAULT_VOLUME: usize = 10;

pub const NAMESPACE: Namespace = Namespace {
    name: "日本経済新聞",
    url: "www.nikkei.com",
    description: "日本経済新聞の記事検索",
};

pub const ROUTE: RouteInfo = RouteInfo {
    namespace: NAMESPACE,
    path: "/nikkei/search/:keyword/:volume?",
    categories: super::TRADITIONAL_MEDIA,
    name: "検索",
    example: "/nikkei/search/がん治療",
    url: "www.nikkei.com/search",
    description: "日本経済新聞のキーワード検索",
    parameters: &[
        Parameter {
            name: "keyword",
            description: "検索キーワード。例: がん治療、AI、経済",
        },
        Parameter {
            name: "volume",
            description: "取得件数。既定値は 10",
        },
    ],
    radar: &[Radar {
        source: &["www.nikkei.com/search"],
        target: "/search/:keyword",
    }],
};

const STRATEGIES: &[Strategy] = &[
    Strategy::Structural(SelectorRules {
        name: "nikkei-search-results",
        items: r#".m-miM04_item, .searchresult-item, [class*="searchResult"]"#,
        title: &["h3 a", ".m-miM04_title a", r#"a[class*="title"]"#],
        date: &[".m-miM04_date", ".searchresult-date", r#"[class*="date"]"#],
        category: &[],
        summary: &[".m-miM04_text", ".searchresult-summary", r#"[class*="summary"]"#],
        summary_falls_back_to_title: true,
    }),
    Strategy::Structural(SelectorRules {
        name: "nikkei-article-list",
        items: r#"article, .article-item, [class*="article"]"#,
        title: &["a"],
        date: &["time", r#"[class*="date"]"#],
        category: &[],
        summary: &[],
        summary_falls_back_to_title: true,
    }),
    Strategy::DateTextScan,
];

static DETAIL: DetailRules = DetailRules {
    content: &[
        r#"section[class^="container_"]"#,
        ".article-body",
        r#"[class*="content"]"#,
    ],
    published: &[FieldRule::attr(
        r#"meta[property="article:published_time"]"#,
        "content",
    )],
    author: &[
        FieldRule::attr(r#"meta[property="author"]"#, "content"),
        FieldRule::text(".author"),
        FieldRule::text(r#"[class*="author"]"#),
    ],
};

/// A keyword search request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NikkeiSearchRequest {
    pub keyword: Option<String>,
    /// Number of results requested, also the item cap.
    pub volume: Option<usize>,
}

impl NikkeiSearchRequest {
    /// The trimmed keyword, or an error when it is absent or blank.
    pub fn keyword(&self) -> Result<&str, ScrapeError> {
        self.keyword
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .ok_or(ScrapeError::MissingParameter("keyword"))
    }

    pub fn volume(&self) -> usize {
        self.volume.unwrap_or(DEFAULT_VOLUME)
    }
}

/// Build the search URL, percent-encoding the keyword.
pub fn search_url(keyword: &str, volume: usize) -> Result<Url, ScrapeError> {
    let url = format!(
        "{BASE_URL}/search?keyword={}&volume={volume}",
        urlencoding::encode(keyword)
    );
    Url::parse(&url).map_err(|source| ScrapeError::InvalidUrl { url, source })
}

/// Build the listing plan for `request`.
pub fn plan(request: &NikkeiSearchRequest) -> Result<ListingPlan<'static>, ScrapeError> {
    let keyword = request.keyword()?;
    let volume = request.volume();
    let listing_url = search_url(keyword, volume)?;

    Ok(ListingPlan {
        site: "Nikkei",
        listing_referer: BASE_URL.to_string(),
        detail_referer: BASE_URL.to_string(),
        limit: volume,
        strategies: STRATEGIES,
        detail_rules: &DETAIL,
        meta: FeedMeta {
            title: format!("日本経済新聞 - 検索: {keyword}"),
            link: listing_url.to_string(),
            description: format!("キーワード「{keyword}」の検索結果"),
        },
        listing_url,
    })
}

/// Search Nikkei and return the results as a feed.
///
/// Fails before any request is made when the keyword is missing.
#[instrument(level = "info", skip(scraper))]
pub async fn handle<F: Fetcher>(
    scraper: &Scraper<F>,
    request: &NikkeiSearchRequest,
) -> Result<Feed, ScrapeError> {
    scraper.run(plan(request)?).await
}
