//! The listing → enrichment → feed pipeline shared by every route.
//!
//! A route describes its site in a [`ListingPlan`]; [`Scraper::run`] fetches
//! the listing once, extracts items, enriches them all concurrently through
//! the per-URL cache and assembles the feed.

use crate::cache::DetailCache;
use crate::config::Config;
use crate::enrich::{DetailRules, enrich};
use crate::error::ScrapeError;
use crate::extract::{Strategy, extract_listing};
use crate::fetch::{Fetcher, RequestHeaders};
use crate::models::{EnrichedItem, Enrichment, Feed, FeedMeta, ListingItem};
use crate::utils::truncate_for_log;
use futures::future::join_all;
use tracing::{debug, info, instrument};
use url::Url;

/// Everything a route decides about one request.
#[derive(Debug, Clone)]
pub struct ListingPlan<'a> {
    /// Site label used in logs and errors.
    pub site: &'static str,
    pub listing_url: Url,
    /// Referer for the listing request.
    pub listing_referer: String,
    /// Referer for article requests.
    pub detail_referer: String,
    pub limit: usize,
    pub strategies: &'a [Strategy],
    pub detail_rules: &'a DetailRules,
    pub meta: FeedMeta,
}

/// Runs listing plans against a [`Fetcher`], memoizing article fetches.
///
/// The cache outlives individual requests, so repeated requests for the same
/// article within the TTL reuse the first result.
pub struct Scraper<F> {
    fetcher: F,
    cache: DetailCache<Enrichment>,
    config: Config,
}

impl<F: Fetcher> Scraper<F> {
    pub fn new(fetcher: F, config: Config) -> Self {
        let cache = DetailCache::new(config.cache_ttl());
        Self {
            fetcher,
            cache,
            config,
        }
    }

    #[cfg(test)]
    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    #[cfg(test)]
    pub fn cache(&self) -> &DetailCache<Enrichment> {
        &self.cache
    }

    /// Fetch, extract, enrich and assemble one feed.
    ///
    /// Only the listing fetch can fail the request.
    #[instrument(level = "info", skip_all, fields(site = plan.site, url = %plan.listing_url))]
    pub async fn run(&self, plan: ListingPlan<'_>) -> Result<Feed, ScrapeError> {
        let listing_url = plan.listing_url.to_string();
        let headers = RequestHeaders::listing(&self.config, &plan.listing_referer);

        let page = self
            .fetcher
            .fetch(&listing_url, &headers)
            .await
            .map_err(|source| ScrapeError::ListingFetch {
                site: plan.site,
                url: listing_url.clone(),
                source,
            })?;
        debug!(preview = %truncate_for_log(&page, 200), "Fetched listing page");

        let items = extract_listing(&page, &plan.listing_url, plan.limit, plan.strategies);
        let enriched = self.enrich_all(items, &plan).await;

        info!(count = enriched.len(), "Assembled feed");
        Ok(Feed::assemble(enriched, plan.meta))
    }

    /// Enrich every item concurrently, preserving listing order.
    pub async fn enrich_all(&self, items: Vec<ListingItem>, plan: &ListingPlan<'_>) -> Vec<EnrichedItem> {
        let listing_url = plan.listing_url.to_string();
        let headers = RequestHeaders::detail(&self.config, &plan.detail_referer);

        let outcomes = join_all(items.into_iter().map(|item| {
            let key = item.link.clone();
            let listing_url = listing_url.as_str();
            let headers = &headers;
            async move {
                let produce = || enrich(&self.fetcher, item, listing_url, headers, plan.detail_rules);
                // Items pointing back at the listing carry their own text and
                // must not share one cache slot.
                if key == listing_url {
                    produce().await
                } else {
                    self.cache.try_get(&key, produce).await
                }
            }
        }))
        .await;

        for outcome in outcomes.iter().filter(|o| !o.is_enriched()) {
            debug!(link = %outcome.item().link, "Item kept as listed");
        }

        let enriched = outcomes.iter().filter(|o| o.is_enriched()).count();
        info!(
            total = outcomes.len(),
            enriched,
            unchanged = outcomes.len() - enriched,
            "Detail enrichment finished"
        );

        outcomes.into_iter().map(Enrichment::into_item).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enrich::FieldRule;
    use crate::normalize::SelectorRules;
    use crate::test_support::FakeFetcher;
    use pretty_assertions::assert_eq;
    use std::time::Duration;

    const STRATEGIES: &[Strategy] = &[
        Strategy::Structural(SelectorRules {
            name: "news-list",
            items: ".news-list .news-item",
            title: &["h3 a", "a"],
            date: &[".date"],
            category: &[],
            summary: &[],
            summary_falls_back_to_title: false,
        }),
        Strategy::DateTextScan,
    ];

    static DETAIL: DetailRules = DetailRules {
        content: &[".article-content"],
        published: &[FieldRule::attr(
            r#"meta[property="article:published_time"]"#,
            "content",
        )],
        author: &[FieldRule::text(".author")],
    };

    const LISTING: &str = "https://example.test/news/";

    fn plan() -> ListingPlan<'static> {
        ListingPlan {
            site: "Example",
            listing_url: Url::parse(LISTING).unwrap(),
            listing_referer: "https://example.test".to_string(),
            detail_referer: LISTING.to_string(),
            limit: 20,
            strategies: STRATEGIES,
            detail_rules: &DETAIL,
            meta: FeedMeta {
                title: "Example news".to_string(),
                link: LISTING.to_string(),
                description: "test feed".to_string(),
            },
        }
    }

    fn listing_page(n: usize) -> String {
        let items: String = (1..=n)
            .map(|i| {
                format!(
                    r#"<li class="news-item"><h3><a href="/news/{i}">記事{i}</a></h3><span class="date">2025年5月{i}日</span></li>"#
                )
            })
            .collect();
        format!(r#"<html><body><ul class="news-list">{items}</ul></body></html>"#)
    }

    fn detail_page(i: usize) -> String {
        format!(
            r#"<html><body><div class="article-content"><p>本文{i}</p></div><span class="author">記者{i}</span></body></html>"#
        )
    }

    #[tokio::test]
    async fn test_run_enriches_all_items() {
        let fetcher = (1..=3).fold(FakeFetcher::new().page(LISTING, &listing_page(3)), |f, i| {
            f.page(&format!("https://example.test/news/{i}"), &detail_page(i))
        });
        let scraper = Scraper::new(fetcher, Config::default());

        let feed = scraper.run(plan()).await.unwrap();
        assert_eq!(feed.title, "Example news");
        assert_eq!(feed.item.len(), 3);
        assert_eq!(feed.item[1].description.as_deref(), Some("<p>本文2</p>"));
        assert_eq!(feed.item[1].author.as_deref(), Some("記者2"));
        assert!(feed.item.iter().all(|i| i.pub_date.is_some()));
    }

    #[tokio::test]
    async fn test_order_independent_of_completion_timing() {
        let fetcher = (1..=3)
            .fold(FakeFetcher::new().page(LISTING, &listing_page(3)), |f, i| {
                f.page(&format!("https://example.test/news/{i}"), &detail_page(i))
            })
            .delay("https://example.test/news/1", Duration::from_millis(60))
            .delay("https://example.test/news/2", Duration::from_millis(30));
        let scraper = Scraper::new(fetcher, Config::default());

        let feed = scraper.run(plan()).await.unwrap();
        let links: Vec<_> = feed.item.iter().map(|i| i.link.as_str()).collect();
        assert_eq!(
            links,
            vec![
                "https://example.test/news/1",
                "https://example.test/news/2",
                "https://example.test/news/3",
            ]
        );
    }

    #[tokio::test]
    async fn test_failed_detail_keeps_listing_item() {
        let fetcher = FakeFetcher::new()
            .page(LISTING, &listing_page(2))
            .page("https://example.test/news/1", &detail_page(1))
            .status("https://example.test/news/2", 500);
        let scraper = Scraper::new(fetcher, Config::default());

        let feed = scraper.run(plan()).await.unwrap();
        assert_eq!(feed.item.len(), 2);
        let failed = &feed.item[1];
        assert_eq!(failed.title, "記事2");
        assert_eq!(failed.link, "https://example.test/news/2");
        assert!(failed.pub_date.is_some());
        assert!(failed.author.is_none());
        assert!(failed.description.is_none());
        assert!(!serde_json::to_string(failed).unwrap().contains("author"));
    }

    #[tokio::test]
    async fn test_listing_failure_is_fatal() {
        let fetcher = FakeFetcher::new().status(LISTING, 503);
        let scraper = Scraper::new(fetcher, Config::default());

        let err = scraper.run(plan()).await.unwrap_err();
        assert!(matches!(err, ScrapeError::ListingFetch { .. }));
        assert!(err.to_string().contains("503"));
    }

    #[tokio::test]
    async fn test_empty_listing_returns_empty_feed_with_meta() {
        let fetcher = FakeFetcher::new().page(LISTING, "<html><body><p>記事はありません</p></body></html>");
        let scraper = Scraper::new(fetcher, Config::default());

        let feed = scraper.run(plan()).await.unwrap();
        assert!(feed.item.is_empty());
        assert_eq!(feed.link, LISTING);
        assert_eq!(feed.description, "test feed");
    }

    #[tokio::test]
    async fn test_repeat_run_is_byte_equal_and_cached() {
        let fetcher = (1..=2).fold(FakeFetcher::new().page(LISTING, &listing_page(2)), |f, i| {
            f.page(&format!("https://example.test/news/{i}"), &detail_page(i))
        });
        let scraper = Scraper::new(fetcher, Config::default());

        let first = serde_json::to_string(&scraper.run(plan()).await.unwrap()).unwrap();
        let second = serde_json::to_string(&scraper.run(plan()).await.unwrap()).unwrap();

        assert_eq!(first, second);
        assert_eq!(scraper.fetcher.calls("https://example.test/news/1"), 1);
        assert_eq!(scraper.fetcher.calls(LISTING), 2);
    }

    #[tokio::test]
    async fn test_linkless_blocks_stay_distinct_without_fetch() {
        let page = r#"<html><body><div>
            <p>2025年5月1日 田植えの季節です</p>
            <p>2025年5月2日 肥料価格の改定</p>
        </div></body></html>"#;
        let scraper = Scraper::new(FakeFetcher::new().page(LISTING, page), Config::default());

        for _ in 0..2 {
            let feed = scraper.run(plan()).await.unwrap();
            let titles: Vec<_> = feed.item.iter().map(|i| i.title.as_str()).collect();
            assert_eq!(titles, vec!["田植えの季節です", "肥料価格の改定"]);
            assert!(feed.item.iter().all(|i| i.link == LISTING));
            assert_eq!(
                feed.item[1].description.as_deref(),
                Some("2025年5月2日 肥料価格の改定")
            );
        }

        assert_eq!(scraper.fetcher.total_calls(), 2);
        assert_eq!(scraper.cache().len().await, 0);
    }

    #[tokio::test]
    async fn test_prepopulated_cache_skips_fetch() {
        let fetcher = FakeFetcher::new().page(LISTING, &listing_page(1));
        let scraper = Scraper::new(fetcher, Config::default());

        let cached = EnrichedItem {
            title: "記事1".to_string(),
            link: "https://example.test/news/1".to_string(),
            pub_date: None,
            category: vec![],
            description: Some("<p>cached</p>".to_string()),
            author: Some("記者".to_string()),
        };
        scraper
            .cache()
            .insert(&cached.link, Enrichment::Enriched(cached.clone()))
            .await;

        let feed = scraper.run(plan()).await.unwrap();
        assert_eq!(feed.item, vec![cached]);
        assert_eq!(scraper.fetcher.calls("https://example.test/news/1"), 0);
    }
}
