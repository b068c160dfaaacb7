use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sn_core::{FetchError, RawItem};
use tracing::{info, warn};

use super::{utils, FetchConfig, FetchStrategy};
use crate::http::PageSource;

/// Feeds stay reachable more often than the sites' HTML front pages.
pub const DEFAULT_FEEDS: &[FeedEndpoint] = &[
    FeedEndpoint { name: "KrebsOnSecurity", url: "https://krebsonsecurity.com/feed/" },
    FeedEndpoint { name: "DarkReading", url: "https://www.darkreading.com/rss.xml" },
    FeedEndpoint { name: "Threatpost", url: "https://threatpost.com/feed/" },
    FeedEndpoint { name: "CSOOnline", url: "https://www.csoonline.com/index.rss" },
    FeedEndpoint { name: "SecurityAffairs", url: "https://securityaffairs.co/wordpress/feed" },
];

/// Reading more feeds stops once this many items were collected.
const ENOUGH_ITEMS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeedEndpoint {
    pub name: &'static str,
    pub url: &'static str,
}

pub struct RssFeedStrategy {
    pages: Arc<dyn PageSource>,
    feeds: Vec<FeedEndpoint>,
    config: FetchConfig,
}

impl RssFeedStrategy {
    pub fn new(pages: Arc<dyn PageSource>, config: FetchConfig) -> Self {
        Self::with_feeds(pages, config, DEFAULT_FEEDS.to_vec())
    }

    pub fn with_feeds(pages: Arc<dyn PageSource>, config: FetchConfig, feeds: Vec<FeedEndpoint>) -> Self {
        Self { pages, feeds, config }
    }

    async fn read_feed(&self, feed: &FeedEndpoint, now: DateTime<Utc>) -> Result<Vec<RawItem>, FetchError> {
        let body = self.pages.get_text(feed.url).await?;
        parse_feed(&body, feed, &self.config, now)
    }
}

/// Turns one RSS/Atom document into items. Entries without a date are stamped with `now`.
pub fn parse_feed(
    body: &str,
    feed: &FeedEndpoint,
    config: &FetchConfig,
    now: DateTime<Utc>,
) -> Result<Vec<RawItem>, FetchError> {
    let parsed = feed_rs::parser::parse(body.as_bytes()).map_err(|e| FetchError::Parse {
        url: feed.url.to_string(),
        reason: e.to_string(),
    })?;

    let items = parsed
        .entries
        .into_iter()
        .take(config.per_endpoint_limit)
        .filter_map(|entry| {
            let href = entry.links.first().map(|l| l.href.clone()).or_else(|| {
                entry.id.starts_with("http").then(|| entry.id.clone())
            })?;
            let title = entry.title.map(|t| t.content)?;
            let summary = entry
                .summary
                .map(|s| s.content)
                .or_else(|| entry.content.and_then(|c| c.body))
                .and_then(|html| utils::strip_html(&html));
            let published_at = entry.published.or(entry.updated).unwrap_or(now);

            utils::build_item(config, feed.name, feed.url, &href, &title, summary.as_deref(), Some(published_at))
        })
        .collect();

    Ok(items)
}

#[async_trait]
impl FetchStrategy for RssFeedStrategy {
    fn name(&self) -> &str {
        "rss_feeds"
    }

    async fn fetch(&self) -> Result<Vec<RawItem>, FetchError> {
        let now = Utc::now();
        let mut collected = Vec::new();
        let mut failures = 0;

        for feed in &self.feeds {
            info!("📡 Reading RSS feed {}", feed.name);
            match self.read_feed(feed, now).await {
                Ok(items) => {
                    if items.is_empty() {
                        warn!(feed = feed.name, "No usable entries");
                    } else {
                        info!(feed = feed.name, count = items.len(), "Parsed feed entries");
                    }
                    collected.extend(items);
                    if collected.len() >= ENOUGH_ITEMS {
                        break;
                    }
                }
                Err(e) => {
                    failures += 1;
                    warn!(feed = feed.name, error = %e, "Failed to read feed");
                }
            }
        }

        if failures == self.feeds.len() && !self.feeds.is_empty() {
            return Err(FetchError::AllEndpointsFailed {
                strategy: self.name().to_string(),
                count: failures,
            });
        }

        Ok(utils::finalize(collected, &self.config))
    }
}
