use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use lazy_static::lazy_static;
use scraper::{ElementRef, Html, Selector};
use sn_core::{FetchError, RawItem};
use tracing::{info, warn};

use super::{utils, FetchConfig, FetchStrategy};
use crate::http::PageSource;

pub const DEFAULT_SITES: &[NewsSite] = &[
    NewsSite {
        name: "BleepingComputer",
        url: "https://www.bleepingcomputer.com/",
        container: "article.bc_latest_news_text",
    },
    NewsSite {
        name: "SecurityWeek",
        url: "https://www.securityweek.com/",
        container: "div.post",
    },
    NewsSite {
        name: "InfoSecurity Magazine",
        url: "https://www.infosecurity-magazine.com/",
        container: "article",
    },
];

lazy_static! {
    static ref LINK: Selector = Selector::parse("a[href]").expect("valid selector");
    static ref HEADINGS: [Selector; 3] = [
        Selector::parse("h1").expect("valid selector"),
        Selector::parse("h2").expect("valid selector"),
        Selector::parse("h3").expect("valid selector"),
    ];
    static ref PARAGRAPH: Selector = Selector::parse("p").expect("valid selector");
}

/// A news front page and the CSS selector of its article cards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewsSite {
    pub name: &'static str,
    pub url: &'static str,
    pub container: &'static str,
}

pub struct SecurityNewsStrategy {
    pages: Arc<dyn PageSource>,
    sites: Vec<NewsSite>,
    config: FetchConfig,
}

impl SecurityNewsStrategy {
    pub fn new(pages: Arc<dyn PageSource>, config: FetchConfig) -> Self {
        Self::with_sites(pages, config, DEFAULT_SITES.to_vec())
    }

    pub fn with_sites(pages: Arc<dyn PageSource>, config: FetchConfig, sites: Vec<NewsSite>) -> Self {
        Self { pages, sites, config }
    }
}

fn extract_card(
    card: ElementRef,
    site: &NewsSite,
    config: &FetchConfig,
    now: DateTime<Utc>,
) -> Option<RawItem> {
    let link = card.select(&LINK).next()?;
    let href = link.value().attr("href")?;
    let heading = HEADINGS
        .iter()
        .find_map(|selector| card.select(selector).next())
        .unwrap_or(link);
    let title = heading.text().collect::<String>();
    let summary = card.select(&PARAGRAPH).next().map(|p| p.text().collect::<String>());

    // Front pages carry no reliable dates; cards are stamped with the fetch time.
    utils::build_item(config, site.name, site.url, href, &title, summary.as_deref(), Some(now))
}

/// Extracts article cards from a front page.
pub fn parse_listing(
    html: &str,
    site: &NewsSite,
    config: &FetchConfig,
    now: DateTime<Utc>,
) -> Result<Vec<RawItem>, FetchError> {
    let container = Selector::parse(site.container).map_err(|e| FetchError::Parse {
        url: site.url.to_string(),
        reason: format!("bad selector {}: {:?}", site.container, e),
    })?;
    let document = Html::parse_document(html);

    Ok(document
        .select(&container)
        .take(config.per_endpoint_limit)
        .filter_map(|card| extract_card(card, site, config, now))
        .collect())
}

#[async_trait]
impl FetchStrategy for SecurityNewsStrategy {
    fn name(&self) -> &str {
        "security_news"
    }

    async fn fetch(&self) -> Result<Vec<RawItem>, FetchError> {
        let now = Utc::now();
        let mut failures = 0;

        for site in &self.sites {
            info!("🔍 Trying source {}", site.name);
            let parsed = match self.pages.get_text(site.url).await {
                Ok(html) => parse_listing(&html, site, &self.config, now),
                Err(e) => Err(e),
            };

            match parsed {
                Ok(items) if !items.is_empty() => {
                    info!(source = site.name, count = items.len(), "Found articles");
                    return Ok(utils::finalize(items, &self.config));
                }
                Ok(_) => warn!(source = site.name, "No article cards matched"),
                Err(e) => {
                    failures += 1;
                    warn!(source = site.name, error = %e, "Failed to parse source");
                }
            }
        }

        if failures == self.sites.len() && !self.sites.is_empty() {
            return Err(FetchError::AllEndpointsFailed {
                strategy: self.name().to_string(),
                count: failures,
            });
        }
        warn!("No articles found from any source");
        Ok(Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scrapers::test_support::CannedPages;
    use chrono::TimeZone;

    const SITE_A: NewsSite = NewsSite { name: "SiteA", url: "https://a.test/", container: "div.card" };
    const SITE_B: NewsSite = NewsSite { name: "SiteB", url: "https://b.test/", container: "article" };

    const LISTING: &str = r#"
        <html><body>
          <div class="card">
            <a href="/news/one"><img src="x.png"></a>
            <h3>Chrome zero-day exploited in the wild</h3>
            <h2>Browser security</h2>
            <p>Google shipped   an emergency fix.</p>
          </div>
          <div class="card">
            <a href="https://a.test/news/two">Ransomware operators target VMware ESXi hosts</a>
          </div>
          <div class="card">
            <a href="/news/three"><h2>Tiny</h2></a>
          </div>
          <div class="card"><h2>No link in this card at all</h2></div>
        </body></html>
    "#;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 8, 10, 8, 0, 0).unwrap()
    }

    #[test]
    fn test_parse_listing() {
        let items = parse_listing(LISTING, &SITE_A, &FetchConfig::default(), now()).unwrap();
        assert_eq!(items.len(), 2);

        assert_eq!(items[0].url, "https://a.test/news/one");
        // h2 outranks h3 regardless of document order
        assert_eq!(items[0].title, "Browser security");
        assert_eq!(items[0].summary.as_deref(), Some("Google shipped an emergency fix."));
        assert_eq!(items[0].published_at, Some(now()));

        assert_eq!(items[1].title, "Ransomware operators target VMware ESXi hosts");
        assert_eq!(items[1].summary, None);
    }

    #[test]
    fn test_container_limit() {
        let cards: String = (0..15)
            .map(|i| format!(r#"<article><a href="/p/{}">Security headline number {}</a></article>"#, i, i))
            .collect();
        let html = format!("<html><body>{}</body></html>", cards);
        let items = parse_listing(&html, &SITE_B, &FetchConfig::default(), now()).unwrap();
        assert_eq!(items.len(), 10);
    }

    #[tokio::test]
    async fn test_stops_at_first_productive_site() {
        let pages = Arc::new(
            CannedPages::default()
                .with(SITE_A.url, "<html><body><p>maintenance</p></body></html>")
                .with(SITE_B.url, r#"<article><a href="/x">Critical flaw in Fortinet appliances</a></article>"#),
        );
        let strategy = SecurityNewsStrategy::with_sites(
            pages.clone(),
            FetchConfig::default(),
            vec![SITE_A, SITE_B, SITE_A],
        );

        let items = strategy.fetch().await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].source, "SiteB");
        assert_eq!(pages.requests().len(), 2);
    }

    #[tokio::test]
    async fn test_unreachable_sites() {
        let strategy = SecurityNewsStrategy::with_sites(
            Arc::new(CannedPages::default()),
            FetchConfig::default(),
            vec![SITE_A, SITE_B],
        );
        assert!(matches!(
            strategy.fetch().await,
            Err(FetchError::AllEndpointsFailed { count: 2, .. })
        ));
    }
}
