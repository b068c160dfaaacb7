use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use sn_core::{FetchError, RawItem};

pub mod hackernews;
pub mod rss;
pub mod security_news;

/// One family of upstream sources.
#[async_trait]
pub trait FetchStrategy: Send + Sync {
    /// Name used in logs and metrics
    fn name(&self) -> &str;

    /// Returns validated items, newest first. Fails only if no endpoint could be read.
    async fn fetch(&self) -> Result<Vec<RawItem>, FetchError>;
}

#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Items published before this instant are dropped
    pub min_published: DateTime<Utc>,
    pub min_title_len: usize,
    pub max_summary_len: usize,
    /// Entries or containers read per endpoint
    pub per_endpoint_limit: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            min_published: Utc.with_ymd_and_hms(2025, 8, 1, 0, 0, 0).single().unwrap_or_default(),
            min_title_len: 10,
            max_summary_len: 300,
            per_endpoint_limit: 10,
        }
    }
}

impl FetchConfig {
    pub fn with_min_date(mut self, date: NaiveDate) -> Self {
        if let Some(midnight) = date.and_hms_opt(0, 0, 0) {
            self.min_published = Utc.from_utc_datetime(&midnight);
        }
        self
    }
}

/// Common utilities for scrapers
pub(crate) mod utils {
    use super::*;
    use chrono::NaiveDateTime;
    use scraper::Html;
    use url::Url;

    const SUMMARY_ELLIPSIS: &str = "...";

    /// Collapses runs of whitespace; empty results become `None`.
    pub fn clean_text(text: &str) -> Option<String> {
        let cleaned = text.split_whitespace().collect::<Vec<_>>().join(" ");
        if cleaned.is_empty() {
            None
        } else {
            Some(cleaned)
        }
    }

    /// Drops markup and entities from an HTML snippet
    pub fn strip_html(fragment: &str) -> Option<String> {
        let parsed = Html::parse_fragment(fragment);
        clean_text(&parsed.root_element().text().collect::<String>())
    }

    pub fn truncate_summary(text: &str, max_len: usize) -> String {
        if text.chars().count() <= max_len {
            return text.to_string();
        }
        let keep = max_len.saturating_sub(SUMMARY_ELLIPSIS.len());
        let mut truncated: String = text.chars().take(keep).collect();
        truncated.push_str(SUMMARY_ELLIPSIS);
        truncated
    }

    pub fn resolve_url(base: &str, href: &str) -> Result<String, FetchError> {
        let href = href.trim();
        let resolved = match Url::parse(href) {
            Ok(url) => url,
            Err(_) => Url::parse(base)
                .and_then(|b| b.join(href))
                .map_err(|e| FetchError::InvalidUrl(format!("{} (base {}): {}", href, base, e)))?,
        };
        match resolved.scheme() {
            "http" | "https" => Ok(resolved.to_string()),
            other => Err(FetchError::InvalidUrl(format!("{}: unsupported scheme {}", href, other))),
        }
    }

    /// Builds a `RawItem` if the title is long enough and the URL resolves.
    pub fn build_item(
        config: &FetchConfig,
        source: &str,
        base: &str,
        href: &str,
        title: &str,
        summary: Option<&str>,
        published_at: Option<DateTime<Utc>>,
    ) -> Option<RawItem> {
        let title = clean_text(title)?;
        if title.chars().count() < config.min_title_len {
            return None;
        }
        let url = resolve_url(base, href).ok()?;
        let summary = summary
            .and_then(clean_text)
            .map(|s| truncate_summary(&s, config.max_summary_len));

        Some(RawItem {
            source: source.to_string(),
            url,
            title,
            summary,
            published_at,
        })
    }

    /// Applies the date cutoff, removes duplicate URLs and orders newest first.
    /// Undated items are kept and placed after dated ones; ties keep fetch order.
    pub fn finalize(items: Vec<RawItem>, config: &FetchConfig) -> Vec<RawItem> {
        let mut seen = std::collections::HashSet::new();
        let mut kept: Vec<RawItem> = items
            .into_iter()
            .filter(|item| item.published_at.map_or(true, |at| at >= config.min_published))
            .filter(|item| seen.insert(item.url.clone()))
            .collect();
        kept.sort_by(|a, b| b.published_at.cmp(&a.published_at));
        kept
    }

    pub fn parse_date(raw: &str) -> Option<DateTime<Utc>> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(dt.with_timezone(&Utc));
        }
        if let Ok(dt) = DateTime::parse_from_rfc2822(raw) {
            return Some(dt.with_timezone(&Utc));
        }
        if let Ok(dt) = DateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%z") {
            return Some(dt.with_timezone(&Utc));
        }
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S") {
            return Some(Utc.from_utc_datetime(&naive));
        }

        const DATE_FORMATS: &[&str] = &[
            "%Y-%m-%d",
            "%B %d, %Y",
            "%b %d, %Y",
            "%d %B %Y",
            "%d %b %Y",
            "%b %d %Y",
            "%B %d %Y",
        ];
        DATE_FORMATS
            .iter()
            .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .map(|naive| Utc.from_utc_datetime(&naive))
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use sn_core::FetchError;

    use crate::http::PageSource;

    /// Serves canned bodies; unknown URLs answer 503.
    #[derive(Default)]
    pub struct CannedPages {
        pages: HashMap<String, String>,
        pub requested: Mutex<Vec<String>>,
    }

    impl CannedPages {
        pub fn with(mut self, url: &str, body: &str) -> Self {
            self.pages.insert(url.to_string(), body.to_string());
            self
        }

        pub fn requests(&self) -> Vec<String> {
            self.requested.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl PageSource for CannedPages {
        async fn get_text(&self, url: &str) -> Result<String, FetchError> {
            self.requested.lock().unwrap().push(url.to_string());
            self.pages.get(url).cloned().ok_or_else(|| FetchError::Status {
                url: url.to_string(),
                status: 503,
            })
        }
    }
}
