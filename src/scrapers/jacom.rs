//! JA.com (農業協同組合新聞) category listings.
//!
//! Category pages live at `https://www.jacom.or.jp/{category}/`. The site has
//! used several list layouts; when none of them match, the date-text scan
//! picks up blocks such as `2025年5月1日 見出し`.

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

pub const BASE_URL: &str = "https://www.jacom.or.jp";
pub const DEFAULT_CATEGORY: &str = "kome";
pub const DEFAULT_LIMIT: usize = 20;

pub const NAMESPACE: Namespace = Namespace {
    name: "JA.com 農業協同組合新聞",
    url: "jacom.or.jp",
    description: "JA.com 農業協同組合新聞の各カテゴリのニュース",
};

pub const ROUTE: RouteInfo = RouteInfo {
    namespace: NAMESPACE,
    path: "/jacom/:category?",
    categories: super::TRADITIONAL_MEDIA,
    name: "ニュースカテゴリ",
    example: "/jacom/kome",
    url: "jacom.or.jp",
    description: "JA.com 農業協同組合新聞のカテゴリ別購読",
    parameters: &[
        Parameter {
            name: "category",
            description: "カテゴリ。例: kome（米）、yasai（野菜）。既定値は kome",
        },
        Parameter {
            name: "limit",
            description: "最大件数。既定値は 20",
        },
    ],
    radar: &[Radar {
        source: &["jacom.or.jp/:category/", "jacom.or.jp/"],
        target: "/:category",
    }],
};

const STRATEGIES: &[Strategy] = &[
    Strategy::Structural(SelectorRules {
        name: "jacom-article-list",
        items: ".article-list .article-item, .news-list .news-item, .content-area .item",
        title: &["h2 a", "h3 a", ".title a", "a"],
        date: &[".date", ".time", ".publish-date", "time"],
        category: &[".category", ".tag", ".label"],
        summary: &[],
        summary_falls_back_to_title: false,
    }),
    Strategy::DateTextScan,
];

static DETAIL: DetailRules = DetailRules {
    content: &[".article-content", ".content", ".main-content", ".post-content"],
    published: &[
        FieldRule::attr(r#"meta[property="article:published_time"]"#, "content"),
        FieldRule::attr(".publish-date, .date, time", "datetime"),
    ],
    author: &[
        FieldRule::text(".author"),
        FieldRule::text(".writer"),
        FieldRule::text(".byline"),
    ],
};

/// A request for one category listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JacomRequest {
    pub category: Option<String>,
    pub limit: Option<usize>,
}

impl JacomRequest {
    pub fn category(&self) -> &str {
        self.category
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .unwrap_or(DEFAULT_CATEGORY)
    }

    pub fn limit(&self) -> usize {
        self.limit.unwrap_or(DEFAULT_LIMIT)
    }
}

/// The listing URL for `category`, which always becomes a single path
/// segment under [`BASE_URL`].
pub fn category_url(category: &str) -> Result<Url, ScrapeError> {
    let segment = category.trim_matches('/');
    if matches!(segment, "" | "." | "..") {
        return Err(ScrapeError::InvalidParameter {
            name: "category",
            value: category.to_string(),
        });
    }

    let mut url = Url::parse(BASE_URL).map_err(|source| ScrapeError::InvalidUrl {
        url: BASE_URL.to_string(),
        source,
    })?;
    url.path_segments_mut()
        .map_err(|()| ScrapeError::InvalidParameter {
            name: "category",
            value: category.to_string(),
        })?
        .pop_if_empty()
        .push(segment)
        .push("");
    Ok(url)
}

/// Build the listing plan for `request`.
pub fn plan(request: &JacomRequest) -> Result<ListingPlan<'static>, ScrapeError> {
    let category = request.category();
    let url = category_url(category)?;

    Ok(ListingPlan {
        site: "JA.com",
        listing_referer: BASE_URL.to_string(),
        detail_referer: url.to_string(),
        limit: request.limit(),
        strategies: STRATEGIES,
        detail_rules: &DETAIL,
        meta: FeedMeta {
            title: format!("JA.com 農業協同組合新聞 - {category}"),
            link: url.to_string(),
            description: format!("JA.com {category} カテゴリのニュース"),
        },
        listing_url: url,
    })
}

/// Scrape one JA.com category into a feed.
#[instrument(level = "info", skip(scraper))]
pub async fn handle<F: Fetcher>(scraper: &Scraper<F>, request: &JacomRequest) -> Result<Feed, ScrapeError> {
    scraper.run(plan(request)?).await
}
