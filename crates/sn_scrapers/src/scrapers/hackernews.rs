use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use lazy_static::lazy_static;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use sn_core::{FetchError, RawItem};
use tracing::{debug, info, warn};

use super::{utils, FetchConfig, FetchStrategy};
use crate::http::PageSource;

pub const HACKER_NEWS_URL: &str = "https://thehackernews.com/";
const SOURCE_NAME: &str = "TheHackerNews";
const MAX_CANDIDATES: usize = 15;
const MIN_PARAGRAPH_LEN: usize = 30;

lazy_static! {
    static ref ARTICLE_PATH: Regex = Regex::new(r"/(\d{4})/(\d{2})/").expect("valid regex");
    static ref TEXT_DATES: Vec<Regex> = vec![
        Regex::new(r"([A-Z][a-z]+\s+\d{1,2},\s+\d{4})").expect("valid regex"),
        Regex::new(r"(\d{1,2}\s+[A-Z][a-z]+\s+\d{4})").expect("valid regex"),
        Regex::new(r"(\d{4}-\d{2}-\d{2})").expect("valid regex"),
    ];
    static ref CONTAINERS: Vec<Selector> = selectors(&[
        "div.body-post",
        "article",
        "div.story-link",
        "div.clear.home-right",
    ]);
    static ref ANCHOR: Selector = Selector::parse("a[href]").expect("valid selector");
    static ref CARD_TITLES: Vec<Selector> = selectors(&["h2", "h3"]);
    static ref PARAGRAPH: Selector = Selector::parse("p").expect("valid selector");
    static ref BODIES: Vec<Selector> = selectors(&[
        "div.articlebody",
        "div.story-body",
        "article",
        "div.post-body",
        "div.entry-content",
    ]);
    static ref PAGE_TITLES: Vec<Selector> = selectors(&["h1.story-title", "h1.entry-title", "h1", "title"]);
    static ref DATE_METAS: Vec<Selector> = selectors(&[
        "meta[property='article:published_time']",
        "meta[name='publishdate']",
        "meta[property='og:published_time']",
    ]);
    static ref TIME: Selector = Selector::parse("time").expect("valid selector");
}

fn selectors(raw: &[&str]) -> Vec<Selector> {
    raw.iter().filter_map(|s| Selector::parse(s).ok()).collect()
}

fn first_match<'a>(scope: ElementRef<'a>, candidates: &[Selector]) -> Option<ElementRef<'a>> {
    candidates.iter().find_map(|selector| scope.select(selector).next())
}

fn element_text(element: ElementRef) -> Option<String> {
    utils::clean_text(&element.text().collect::<String>())
}

/// A link found on the front page, before its article page is read.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub url: String,
    pub title: Option<String>,
    pub summary: Option<String>,
}

/// What an article page adds on top of the listing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ArticleDetails {
    pub title: Option<String>,
    pub summary: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
}

fn candidate_from_card(card: ElementRef, base: &str) -> Option<Candidate> {
    let link = card
        .select(&ANCHOR)
        .find(|a| a.value().attr("href").map_or(false, |h| ARTICLE_PATH.is_match(h)))
        .or_else(|| card.select(&ANCHOR).next())?;
    let url = utils::resolve_url(base, link.value().attr("href")?).ok()?;
    let title = first_match(card, &CARD_TITLES).or(Some(link)).and_then(element_text);
    let summary = card.select(&PARAGRAPH).next().and_then(element_text);
    Some(Candidate { url, title, summary })
}

/// Collects at most 15 article links from the front page. Card markup is
/// tried first; bare `/YYYY/MM/` anchors are the fallback.
pub fn parse_listing(html: &str, base: &str) -> Vec<Candidate> {
    let document = Html::parse_document(html);
    let root = document.root_element();

    let cards: Vec<ElementRef> = CONTAINERS
        .iter()
        .map(|selector| root.select(selector).collect::<Vec<_>>())
        .find(|found| !found.is_empty())
        .unwrap_or_default();

    let mut candidates: Vec<Candidate> = if cards.is_empty() {
        root.select(&ANCHOR)
            .filter(|a| a.value().attr("href").map_or(false, |h| ARTICLE_PATH.is_match(h)))
            .filter_map(|a| {
                let url = utils::resolve_url(base, a.value().attr("href")?).ok()?;
                Some(Candidate { url, title: element_text(a), summary: None })
            })
            .collect()
    } else {
        cards.into_iter().filter_map(|card| candidate_from_card(card, base)).collect()
    };

    let mut seen = std::collections::HashSet::new();
    candidates.retain(|c| seen.insert(c.url.clone()));
    candidates.truncate(MAX_CANDIDATES);
    candidates
}

fn date_from_url(url: &str) -> Option<DateTime<Utc>> {
    let caps = ARTICLE_PATH.captures(url)?;
    let year = caps.get(1)?.as_str().parse().ok()?;
    let month = caps.get(2)?.as_str().parse().ok()?;
    Utc.with_ymd_and_hms(year, month, 1, 0, 0, 0).single()
}

/// Reads title, lead paragraph and publish date from an article page.
pub fn parse_article_page(html: &str, url: &str) -> ArticleDetails {
    let document = Html::parse_document(html);
    let root = document.root_element();
    let body = first_match(root, &BODIES).unwrap_or(root);

    let title = first_match(root, &PAGE_TITLES).and_then(element_text);

    let summary = body
        .select(&PARAGRAPH)
        .filter_map(element_text)
        .find(|text| text.chars().count() > MIN_PARAGRAPH_LEN)
        .or_else(|| element_text(body));

    let published_at = DATE_METAS
        .iter()
        .filter_map(|selector| root.select(selector).next())
        .filter_map(|meta| meta.value().attr("content"))
        .find_map(utils::parse_date)
        .or_else(|| {
            let time = root.select(&TIME).next()?;
            time.value()
                .attr("datetime")
                .and_then(utils::parse_date)
                .or_else(|| element_text(time).as_deref().and_then(utils::parse_date))
        })
        .or_else(|| date_from_url(url))
        .or_else(|| {
            let text = root.text().collect::<String>();
            TEXT_DATES
                .iter()
                .filter_map(|re| re.captures(&text))
                .find_map(|caps| caps.get(1).and_then(|m| utils::parse_date(m.as_str())))
        });

    ArticleDetails { title, summary, published_at }
}

pub struct HackerNewsStrategy {
    pages: Arc<dyn PageSource>,
    config: FetchConfig,
    listing_url: String,
    page_delay: Duration,
}

impl HackerNewsStrategy {
    pub fn new(pages: Arc<dyn PageSource>, config: FetchConfig) -> Self {
        Self {
            pages,
            config,
            listing_url: HACKER_NEWS_URL.to_string(),
            page_delay: Duration::from_secs(1),
        }
    }

    pub fn with_listing_url(mut self, url: impl Into<String>) -> Self {
        self.listing_url = url.into();
        self
    }

    async fn details(&self, url: &str) -> Option<ArticleDetails> {
        match self.pages.get_text(url).await {
            Ok(html) => Some(parse_article_page(&html, url)),
            Err(e) => {
                warn!(url = %url, error = %e, "Failed to read article page, keeping listing data");
                None
            }
        }
    }
}

#[async_trait]
impl FetchStrategy for HackerNewsStrategy {
    fn name(&self) -> &str {
        "hackernews"
    }

    async fn fetch(&self) -> Result<Vec<RawItem>, FetchError> {
        let now = Utc::now();
        let html = self.pages.get_text(&self.listing_url).await?;
        let candidates = parse_listing(&html, &self.listing_url);
        info!("📰 Found {} candidate articles on The Hacker News", candidates.len());

        let mut items = Vec::new();
        for (i, candidate) in candidates.into_iter().enumerate() {
            if i > 0 {
                tokio::time::sleep(self.page_delay).await;
            }
            debug!(url = %candidate.url, "Reading article {}/{}", i + 1, MAX_CANDIDATES);

            let details = self.details(&candidate.url).await.unwrap_or_default();
            let title = details.title.or(candidate.title).unwrap_or_default();
            let summary = details.summary.or(candidate.summary);
            let published_at = details.published_at.unwrap_or(now);

            if let Some(item) = utils::build_item(
                &self.config,
                SOURCE_NAME,
                &self.listing_url,
                &candidate.url,
                &title,
                summary.as_deref(),
                Some(published_at),
            ) {
                items.push(item);
            }
        }

        info!("Parsed {} articles from The Hacker News", items.len());
        Ok(utils::finalize(items, &self.config))
    }
}
