//! One ingestion cycle: fetch cascade, dedup, classify, translate, persist, deliver.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use sn_core::{
    Article, ArticleStore, ChatSink, CycleError, Destination, NewArticle, PipelineMetrics, RawItem,
    StorageError,
};
use sn_enrich::{Classifier, Translator};
use sn_scrapers::FetchStrategy;
use tracing::{debug, error, info, warn};

use crate::delivery::DeliveryGate;
use crate::format::{admin_notification, format_article};

const MIN_DISPATCH_DELAY: Duration = Duration::from_secs(1);
const RECORD_RETRY_DELAY: Duration = Duration::from_millis(500);

#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Raw items considered per cycle
    pub max_per_fetch: usize,
    /// The cascade moves to the next strategy while fewer items than this were collected
    pub cascade_threshold: usize,
    /// Pause between two chat messages, never below one second
    pub dispatch_delay: Duration,
    /// Undelivered articles older than this are swept up after each cycle
    pub pending_grace: chrono::Duration,
    pub pending_batch: usize,
    pub retention_days: i64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            max_per_fetch: 10,
            cascade_threshold: 5,
            dispatch_delay: Duration::from_secs(2),
            pending_grace: chrono::Duration::hours(1),
            pending_batch: 20,
            retention_days: 30,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CycleReport {
    pub fetched: usize,
    pub strategies_used: Vec<String>,
    pub already_known: usize,
    pub ingested: usize,
    pub deferred: usize,
    pub delivered: usize,
    pub failed_deliveries: usize,
    pub redelivered: usize,
    /// Sent to the chat but the sent mark could not be stored
    pub unrecorded: usize,
}

#[derive(Debug, Default)]
struct DispatchTally {
    sent: usize,
    failed: usize,
    unrecorded: usize,
}

pub struct CycleRunner {
    strategies: Vec<Arc<dyn FetchStrategy>>,
    classifier: Classifier,
    translator: Arc<Translator>,
    store: Arc<dyn ArticleStore>,
    sink: Arc<dyn ChatSink>,
    gate: DeliveryGate,
    admin: Option<Destination>,
    metrics: Arc<PipelineMetrics>,
    config: PipelineConfig,
}

impl CycleRunner {
    pub fn new(
        strategies: Vec<Arc<dyn FetchStrategy>>,
        translator: Arc<Translator>,
        store: Arc<dyn ArticleStore>,
        sink: Arc<dyn ChatSink>,
        gate: DeliveryGate,
        metrics: Arc<PipelineMetrics>,
    ) -> Self {
        Self {
            strategies,
            classifier: Classifier::new(),
            translator,
            store,
            sink,
            gate,
            admin: None,
            metrics,
            config: PipelineConfig::default(),
        }
    }

    pub fn with_admin(mut self, admin: Option<Destination>) -> Self {
        self.admin = admin;
        self
    }

    pub fn with_config(mut self, config: PipelineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn store(&self) -> &Arc<dyn ArticleStore> {
        &self.store
    }

    pub fn translator(&self) -> &Arc<Translator> {
        &self.translator
    }

    pub fn metrics(&self) -> &Arc<PipelineMetrics> {
        &self.metrics
    }

    pub async fn run_cycle(&self) -> Result<CycleReport, CycleError> {
        self.run_cycle_at(Utc::now()).await
    }

    /// Runs a full cycle with `now` as the ingestion time and quiet-window clock.
    /// Only a failed cascade or a failed batch commit ends the cycle early.
    pub async fn run_cycle_at(&self, now: DateTime<Utc>) -> Result<CycleReport, CycleError> {
        info!("🚀 Starting news cycle");
        let started = std::time::Instant::now();
        let mut report = CycleReport::default();

        let items = match self.fetch_cascade(&mut report).await {
            Ok(items) => items,
            Err(e) => return Err(self.fail(e).await),
        };

        let created = match self.ingest(items, now, &mut report).await {
            Ok(created) => created,
            Err(e) => return Err(self.fail(e).await),
        };

        self.deliver(&created, now, &mut report).await;

        self.metrics.cycle_succeeded();
        info!(
            fetched = report.fetched,
            ingested = report.ingested,
            delivered = report.delivered,
            deferred = report.deferred,
            redelivered = report.redelivered,
            "✅ Cycle completed in {:.1}s",
            started.elapsed().as_secs_f64()
        );
        Ok(report)
    }

    /// Walks the strategies in order until enough unique items were collected.
    async fn fetch_cascade(&self, report: &mut CycleReport) -> Result<Vec<RawItem>, CycleError> {
        let mut merged: Vec<RawItem> = Vec::new();
        let mut seen = HashSet::new();
        let mut failures = Vec::new();

        for strategy in &self.strategies {
            if merged.len() >= self.config.cascade_threshold {
                break;
            }
            let name = strategy.name().to_string();
            match strategy.fetch().await {
                Ok(items) => {
                    let before = merged.len();
                    merged.extend(items.into_iter().filter(|item| seen.insert(item.url.clone())));
                    info!(strategy = %name, new = merged.len() - before, total = merged.len(), "Fetched items");
                    report.strategies_used.push(name);
                }
                Err(e) => {
                    warn!(strategy = %name, error = %e, "Fetch strategy failed");
                    self.metrics.fetch_failed(&name);
                    failures.push(format!("{}: {}", name, e));
                }
            }
        }

        if !self.strategies.is_empty() && failures.len() == self.strategies.len() {
            return Err(CycleError::AllSourcesFailed(failures));
        }
        report.fetched = merged.len();
        Ok(merged)
    }

    async fn ingest(
        &self,
        items: Vec<RawItem>,
        now: DateTime<Utc>,
        report: &mut CycleReport,
    ) -> Result<Vec<Article>, CycleError> {
        let mut batch = Vec::new();

        for item in items.into_iter().take(self.config.max_per_fetch) {
            match self.store.exists(&item.url).await {
                Ok(true) => {
                    report.already_known += 1;
                    continue;
                }
                Ok(false) => {}
                Err(e) => {
                    warn!(url = %item.url, error = %e, "Dedup check failed, skipping item");
                    continue;
                }
            }

            let category = self
                .classifier
                .categorize(&item.title, item.summary.as_deref(), &item.url);
            let scores = self.classifier.scores(&item.title, item.summary.as_deref());
            debug!(
                url = %item.url,
                %category,
                vulnerability = scores.vulnerability,
                general = scores.general,
                "Classified"
            );
            let translated = self.translator.translate_item(item).await;
            batch.push(NewArticle::from_translated(translated, category, now));
        }

        let created = self.store.insert_batch(batch).await?;
        self.metrics.add_ingested(created.len());
        report.ingested = created.len();
        Ok(created)
    }

    async fn deliver(&self, created: &[Article], now: DateTime<Utc>, report: &mut CycleReport) {
        if self.gate.is_quiet(now) {
            info!("🌙 Quiet hours, deferring {} new articles", created.len());
            for article in created {
                match self.store.mark_pending(article.id).await {
                    Ok(()) => report.deferred += 1,
                    Err(e) => warn!(id = article.id, error = %e, "Failed to mark article pending"),
                }
            }
            return;
        }

        let fresh = self.dispatch(created).await;
        report.delivered = fresh.sent;
        report.failed_deliveries = fresh.failed;
        report.unrecorded = fresh.unrecorded;

        let cutoff = now - self.config.pending_grace;
        match self.store.undelivered_before(cutoff, self.config.pending_batch).await {
            Ok(due) if !due.is_empty() => {
                info!("📬 Delivering {} deferred articles", due.len());
                let swept = self.dispatch(&due).await;
                report.redelivered = swept.sent;
                report.failed_deliveries += swept.failed;
                report.unrecorded += swept.unrecorded;
            }
            Ok(_) => {}
            Err(e) => warn!(error = %e, "Failed to load deferred articles"),
        }
    }

    /// Sends articles one by one. A failed send leaves the article undelivered
    /// and counts against it, so the sweep tries untouched articles first.
    async fn dispatch(&self, articles: &[Article]) -> DispatchTally {
        let delay = self.config.dispatch_delay.max(MIN_DISPATCH_DELAY);
        let mut tally = DispatchTally::default();

        for (i, article) in articles.iter().enumerate() {
            if i > 0 {
                tokio::time::sleep(delay).await;
            }
            let destination = self.gate.destination_for(article.category);

            match self.sink.send(&destination, &format_article(article)).await {
                Ok(()) => {
                    tally.sent += 1;
                    self.metrics.dispatch(true);
                    info!(id = article.id, chat_id = destination.chat_id, category = %article.category, "Article sent");
                    if !self.record_sent(article.id).await {
                        tally.unrecorded += 1;
                    }
                }
                Err(e) => {
                    tally.failed += 1;
                    self.metrics.dispatch(false);
                    error!(id = article.id, chat_id = destination.chat_id, error = %e, "Failed to send article");
                    if let Err(e) = self.store.record_failed_attempt(article.id).await {
                        warn!(id = article.id, error = %e, "Failed to record delivery attempt");
                    }
                }
            }
        }
        tally
    }

    /// Marks a delivered article as sent, retrying once. Returns false when the
    /// mark was lost and the article may go out again.
    async fn record_sent(&self, id: i64) -> bool {
        if let Err(e) = self.store.mark_sent(id, Utc::now()).await {
            warn!(id, error = %e, "Failed to mark article sent, retrying");
            tokio::time::sleep(RECORD_RETRY_DELAY).await;
            if let Err(e) = self.store.mark_sent(id, Utc::now()).await {
                error!(id, error = %e, "Article sent but not recorded, it may be sent again");
                return false;
            }
        }
        true
    }

    async fn fail(&self, e: CycleError) -> CycleError {
        self.metrics.cycle_failed();
        error!(error = %e, "❌ News cycle failed");
        self.notify_admin(&format!("❌ Parsing error:\n{}", e)).await;
        e
    }

    pub async fn notify_admin(&self, message: &str) {
        let Some(admin) = self.admin else {
            return;
        };
        if let Err(e) = self.sink.send(&admin, &admin_notification(message)).await {
            warn!(error = %e, "Failed to notify admin");
        }
    }

    /// Retention sweep relative to `now`
    pub async fn cleanup_at(&self, now: DateTime<Utc>) -> Result<u64, StorageError> {
        let cutoff = now - chrono::Duration::days(self.config.retention_days);
        let deleted = self.store.delete_ingested_before(cutoff).await?;
        info!("🧹 Cleanup removed {} articles ingested before {}", deleted, cutoff.format("%Y-%m-%d"));
        Ok(deleted)
    }

    pub async fn cleanup(&self) -> Result<u64, StorageError> {
        self.cleanup_at(Utc::now()).await
    }
}
