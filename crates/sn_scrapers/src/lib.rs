use std::sync::Arc;

pub mod http;
pub mod scrapers;

pub use http::{HttpFetcher, PageSource, RetryPolicy};
pub use scrapers::hackernews::HackerNewsStrategy;
pub use scrapers::rss::RssFeedStrategy;
pub use scrapers::security_news::SecurityNewsStrategy;
pub use scrapers::{FetchConfig, FetchStrategy};

/// The cascade in priority order: feeds, then front pages, then The Hacker News.
pub fn default_strategies(pages: Arc<dyn PageSource>, config: FetchConfig) -> Vec<Arc<dyn FetchStrategy>> {
    vec![
        Arc::new(RssFeedStrategy::new(pages.clone(), config.clone())),
        Arc::new(SecurityNewsStrategy::new(pages.clone(), config.clone())),
        Arc::new(HackerNewsStrategy::new(pages, config)),
    ]
}

pub mod prelude {
    pub use super::scrapers::FetchStrategy;
    pub use sn_core::{FetchError, RawItem};
}
