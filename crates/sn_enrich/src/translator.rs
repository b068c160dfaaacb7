use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use moka::future::Cache;
use serde::Serialize;
use sn_core::{PipelineMetrics, RawItem, TranslatedItem, TranslatedText, TranslationProvider};
use tracing::{debug, error, info, warn};

#[derive(Debug, Clone)]
pub struct TranslatorConfig {
    pub source_language: String,
    pub target_language: String,
    /// Texts shorter than this (in characters, after trimming) are passed through
    pub min_length: usize,
    /// Entries kept per provider
    pub cache_capacity: u64,
}

impl Default for TranslatorConfig {
    fn default() -> Self {
        Self {
            source_language: "auto".to_string(),
            target_language: "ru".to_string(),
            min_length: 10,
            cache_capacity: 1000,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub entries: u64,
    pub providers: Vec<String>,
    pub source_language: String,
    pub target_language: String,
}

struct CachedProvider {
    provider: Arc<dyn TranslationProvider>,
    cache: Cache<String, String>,
}

/// Ordered provider chain with one memo cache per provider.
///
/// Provider failures never reach the caller: when every provider fails the
/// original text comes back unchanged.
pub struct Translator {
    chain: Vec<CachedProvider>,
    config: TranslatorConfig,
    metrics: Arc<PipelineMetrics>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl Translator {
    pub fn new(
        providers: Vec<Arc<dyn TranslationProvider>>,
        config: TranslatorConfig,
        metrics: Arc<PipelineMetrics>,
    ) -> Self {
        if providers.is_empty() {
            error!("No translation providers configured, articles will keep their original text");
        }
        let chain = providers
            .into_iter()
            .map(|provider| {
                info!("🌐 Translation provider enabled: {}", provider.name());
                CachedProvider {
                    provider,
                    cache: Cache::builder().max_capacity(config.cache_capacity).build(),
                }
            })
            .collect();

        Self {
            chain,
            config,
            metrics,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    pub fn config(&self) -> &TranslatorConfig {
        &self.config
    }

    pub async fn translate(&self, text: &str) -> TranslatedText {
        if text.trim().chars().count() < self.config.min_length {
            return TranslatedText::untranslated(text);
        }

        for link in &self.chain {
            let name = link.provider.name();
            if let Some(cached) = link.cache.get(text).await {
                self.hits.fetch_add(1, Ordering::Relaxed);
                debug!(provider = name, "Translation cache hit");
                self.metrics.translation(true);
                return TranslatedText {
                    original: text.to_string(),
                    translated: cached,
                };
            }
            self.misses.fetch_add(1, Ordering::Relaxed);

            match link.provider.translate(text).await {
                Ok(translated) if !translated.trim().is_empty() => {
                    debug!(provider = name, "Translated text");
                    link.cache.insert(text.to_string(), translated.clone()).await;
                    self.metrics.translation(true);
                    return TranslatedText {
                        original: text.to_string(),
                        translated,
                    };
                }
                Ok(_) => warn!(provider = name, "Provider returned an empty translation"),
                Err(e) => warn!(provider = name, error = %e, "Translation attempt failed"),
            }
        }

        if !self.chain.is_empty() {
            error!("All translation attempts failed, keeping original text");
        }
        self.metrics.translation(false);
        TranslatedText::untranslated(text)
    }

    /// Translates title and summary concurrently, keeping both forms of each.
    pub async fn translate_item(&self, item: RawItem) -> TranslatedItem {
        let (title, summary) = tokio::join!(self.translate(&item.title), async {
            match item.summary.as_deref() {
                Some(summary) => Some(self.translate(summary).await),
                None => None,
            }
        });
        TranslatedItem { item, title, summary }
    }

    pub async fn cache_stats(&self) -> CacheStats {
        let mut entries = 0;
        for link in &self.chain {
            link.cache.run_pending_tasks().await;
            entries += link.cache.entry_count();
        }
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            entries,
            providers: self.chain.iter().map(|l| l.provider.name().to_string()).collect(),
            source_language: self.config.source_language.clone(),
            target_language: self.config.target_language.clone(),
        }
    }
}
