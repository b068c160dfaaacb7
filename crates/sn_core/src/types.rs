use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A candidate item as produced by a fetch strategy. Never stored as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawItem {
    pub source: String,
    pub url: String,
    pub title: String,
    pub summary: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    General,
    Vulnerability,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::General => "general",
            Category::Vulnerability => "vulnerabilities",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "general" => Ok(Category::General),
            "vulnerabilities" | "vulnerability" => Ok(Category::Vulnerability),
            other => Err(format!("Unknown category: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryState {
    Unsent,
    Pending,
    Sent,
}

impl DeliveryState {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeliveryState::Unsent => "unsent",
            DeliveryState::Pending => "pending",
            DeliveryState::Sent => "sent",
        }
    }
}

impl fmt::Display for DeliveryState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DeliveryState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "unsent" => Ok(DeliveryState::Unsent),
            "pending" => Ok(DeliveryState::Pending),
            "sent" => Ok(DeliveryState::Sent),
            other => Err(format!("Unknown delivery state: {}", other)),
        }
    }
}

/// Text in both its source form and its translated form. When translation
/// was skipped or failed both sides hold the original.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslatedText {
    pub original: String,
    pub translated: String,
}

impl TranslatedText {
    pub fn untranslated(text: &str) -> Self {
        Self {
            original: text.to_string(),
            translated: text.to_string(),
        }
    }

    pub fn was_translated(&self) -> bool {
        self.original != self.translated
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranslatedItem {
    pub item: RawItem,
    pub title: TranslatedText,
    pub summary: Option<TranslatedText>,
}

/// A classified and translated item ready to be persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewArticle {
    pub url: String,
    pub title: String,
    pub title_original: String,
    pub title_translated: String,
    pub summary: Option<String>,
    pub summary_original: Option<String>,
    pub summary_translated: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
    pub ingested_at: DateTime<Utc>,
    pub category: Category,
    pub source: String,
}

impl NewArticle {
    pub fn from_translated(
        translated: TranslatedItem,
        category: Category,
        ingested_at: DateTime<Utc>,
    ) -> Self {
        let TranslatedItem { item, title, summary } = translated;
        Self {
            url: item.url,
            title: title.translated.clone(),
            title_original: title.original,
            title_translated: title.translated,
            summary: summary.as_ref().map(|s| s.translated.clone()),
            summary_original: summary.as_ref().map(|s| s.original.clone()),
            summary_translated: summary.map(|s| s.translated),
            published_at: item.published_at,
            ingested_at,
            category,
            source: item.source,
        }
    }

    pub fn into_article(self, id: i64) -> Article {
        Article {
            id,
            url: self.url,
            title: self.title,
            title_original: self.title_original,
            title_translated: self.title_translated,
            summary: self.summary,
            summary_original: self.summary_original,
            summary_translated: self.summary_translated,
            published_at: self.published_at,
            ingested_at: self.ingested_at,
            sent_at: None,
            delivery_state: DeliveryState::Unsent,
            delivery_attempts: 0,
            category: self.category,
            source: self.source,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    pub id: i64,
    pub url: String,
    pub title: String,
    pub title_original: String,
    pub title_translated: String,
    pub summary: Option<String>,
    pub summary_original: Option<String>,
    pub summary_translated: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
    pub ingested_at: DateTime<Utc>,
    pub sent_at: Option<DateTime<Utc>>,
    pub delivery_state: DeliveryState,
    /// Failed sends so far
    #[serde(default)]
    pub delivery_attempts: u32,
    pub category: Category,
    pub source: String,
}

impl Article {
    pub fn is_sent(&self) -> bool {
        self.delivery_state == DeliveryState::Sent
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw() -> RawItem {
        RawItem {
            source: "KrebsOnSecurity".to_string(),
            url: "https://krebsonsecurity.com/2025/08/story/".to_string(),
            title: "Patch Tuesday fixes zero-day".to_string(),
            summary: Some("Microsoft shipped fixes".to_string()),
            published_at: None,
        }
    }

    #[test]
    fn test_new_article_keeps_both_languages() {
        let translated = TranslatedItem {
            item: raw(),
            title: TranslatedText {
                original: "Patch Tuesday fixes zero-day".to_string(),
                translated: "Вторник патчей".to_string(),
            },
            summary: Some(TranslatedText::untranslated("Microsoft shipped fixes")),
        };

        let article = NewArticle::from_translated(translated, Category::Vulnerability, Utc::now());
        assert_eq!(article.title, "Вторник патчей");
        assert_eq!(article.title_original, "Patch Tuesday fixes zero-day");
        assert_eq!(article.summary_original.as_deref(), Some("Microsoft shipped fixes"));
        assert_eq!(article.summary_translated.as_deref(), Some("Microsoft shipped fixes"));

        let stored = article.into_article(7);
        assert_eq!(stored.delivery_state, DeliveryState::Unsent);
        assert!(stored.sent_at.is_none());
    }

    #[test]
    fn test_enum_round_trip_through_strings() {
        assert_eq!("vulnerabilities".parse::<Category>().unwrap(), Category::Vulnerability);
        assert_eq!(Category::General.to_string(), "general");
        assert_eq!("pending".parse::<DeliveryState>().unwrap(), DeliveryState::Pending);
        assert!("archived".parse::<DeliveryState>().is_err());
    }
}
