use std::cmp::Ordering;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sn_core::{Article, ArticleStore, DeliveryState, NewArticle, StorageError};
use tokio::sync::RwLock;

#[derive(Debug, Default)]
struct MemoryStore {
    next_id: i64,
    articles: Vec<Article>,
    closed: bool,
}

impl MemoryStore {
    fn check_open(&self) -> Result<(), StorageError> {
        if self.closed {
            Err(StorageError::Closed)
        } else {
            Ok(())
        }
    }

    fn find_mut(&mut self, id: i64) -> Result<&mut Article, StorageError> {
        self.articles
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or(StorageError::NotFound(id))
    }

    fn select(&self, keep: impl Fn(&Article) -> bool) -> Vec<Article> {
        self.articles.iter().filter(|a| keep(a)).cloned().collect()
    }
}

/// Newest publish date first, undated last, then insertion order.
fn by_publish_date(a: &Article, b: &Article) -> Ordering {
    b.published_at.cmp(&a.published_at).then(a.id.cmp(&b.id))
}

fn take(mut selected: Vec<Article>, limit: usize, order: impl Fn(&Article, &Article) -> Ordering) -> Vec<Article> {
    selected.sort_by(order);
    selected.truncate(limit);
    selected
}

/// Process-local store, used for `memory://` and in tests.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStorage {
    store: Arc<RwLock<MemoryStore>>,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.store.read().await.articles.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    pub async fn all(&self) -> Vec<Article> {
        self.store.read().await.articles.clone()
    }
}

#[async_trait]
impl ArticleStore for InMemoryStorage {
    async fn exists(&self, url: &str) -> Result<bool, StorageError> {
        let store = self.store.read().await;
        store.check_open()?;
        Ok(store.articles.iter().any(|a| a.url == url))
    }

    async fn insert_batch(&self, batch: Vec<NewArticle>) -> Result<Vec<Article>, StorageError> {
        let mut store = self.store.write().await;
        store.check_open()?;

        let mut created = Vec::new();
        for new in batch {
            if store.articles.iter().any(|a| a.url == new.url) {
                continue;
            }
            store.next_id += 1;
            let article = new.into_article(store.next_id);
            store.articles.push(article.clone());
            created.push(article);
        }
        Ok(created)
    }

    async fn get_by_url(&self, url: &str) -> Result<Option<Article>, StorageError> {
        let store = self.store.read().await;
        store.check_open()?;
        Ok(store.articles.iter().find(|a| a.url == url).cloned())
    }

    async fn mark_sent(&self, id: i64, at: DateTime<Utc>) -> Result<(), StorageError> {
        let mut store = self.store.write().await;
        store.check_open()?;
        let article = store.find_mut(id)?;
        article.delivery_state = DeliveryState::Sent;
        article.sent_at = Some(at);
        Ok(())
    }

    async fn mark_pending(&self, id: i64) -> Result<(), StorageError> {
        let mut store = self.store.write().await;
        store.check_open()?;
        let article = store.find_mut(id)?;
        article.delivery_state = DeliveryState::Pending;
        article.sent_at = None;
        Ok(())
    }

    async fn record_failed_attempt(&self, id: i64) -> Result<(), StorageError> {
        let mut store = self.store.write().await;
        store.check_open()?;
        store.find_mut(id)?.delivery_attempts += 1;
        Ok(())
    }

    async fn undelivered_before(
        &self,
        cutoff: DateTime<Utc>,
        limit: usize,
    ) -> Result<Vec<Article>, StorageError> {
        let store = self.store.read().await;
        store.check_open()?;
        let due = store.select(|a| !a.is_sent() && a.ingested_at < cutoff);
        Ok(take(due, limit, |a, b| {
            a.delivery_attempts.cmp(&b.delivery_attempts).then_with(|| by_publish_date(a, b))
        }))
    }

    async fn latest(&self, limit: usize) -> Result<Vec<Article>, StorageError> {
        let store = self.store.read().await;
        store.check_open()?;
        Ok(take(store.select(|_| true), limit, by_publish_date))
    }

    async fn delete_ingested_before(&self, cutoff: DateTime<Utc>) -> Result<u64, StorageError> {
        let mut store = self.store.write().await;
        store.check_open()?;
        let before = store.articles.len();
        store.articles.retain(|a| a.ingested_at >= cutoff);
        Ok((before - store.articles.len()) as u64)
    }

    async fn close(&self) {
        self.store.write().await.closed = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use sn_core::Category;

    fn new_article(url: &str, published_day: Option<u32>, ingested_at: DateTime<Utc>) -> NewArticle {
        NewArticle {
            url: url.to_string(),
            title: "Заголовок".to_string(),
            title_original: "Headline".to_string(),
            title_translated: "Заголовок".to_string(),
            summary: None,
            summary_original: None,
            summary_translated: None,
            published_at: published_day.map(|d| Utc.with_ymd_and_hms(2025, 8, d, 12, 0, 0).unwrap()),
            ingested_at,
            category: Category::General,
            source: "test".to_string(),
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 8, 20, 12, 0, 0).unwrap()
    }

    #[tokio::test]
    async fn test_insert_batch_skips_known_urls() {
        let storage = InMemoryStorage::new();
        let first = storage
            .insert_batch(vec![new_article("https://a.test/1", Some(1), now())])
            .await
            .unwrap();
        assert_eq!(first.len(), 1);
        assert_eq!(first[0].delivery_state, DeliveryState::Unsent);

        let second = storage
            .insert_batch(vec![
                new_article("https://a.test/1", Some(1), now()),
                new_article("https://a.test/2", Some(2), now()),
                new_article("https://a.test/2", Some(2), now()),
            ])
            .await
            .unwrap();
        assert_eq!(second.len(), 1);
        assert_eq!(second[0].url, "https://a.test/2");
        assert_eq!(storage.len().await, 2);
        assert!(storage.exists("https://a.test/2").await.unwrap());
    }

    #[tokio::test]
    async fn test_delivery_transitions() {
        let storage = InMemoryStorage::new();
        let created = storage
            .insert_batch(vec![new_article("https://a.test/1", Some(1), now())])
            .await
            .unwrap();
        let id = created[0].id;

        storage.mark_pending(id).await.unwrap();
        let pending = storage.get_by_url("https://a.test/1").await.unwrap().unwrap();
        assert_eq!(pending.delivery_state, DeliveryState::Pending);
        assert_eq!(pending.sent_at, None);

        storage.mark_sent(id, now()).await.unwrap();
        let sent = storage.get_by_url("https://a.test/1").await.unwrap().unwrap();
        assert!(sent.is_sent());
        assert_eq!(sent.sent_at, Some(now()));

        assert!(matches!(storage.mark_sent(999, now()).await, Err(StorageError::NotFound(999))));
    }

    #[tokio::test]
    async fn test_undelivered_before_orders_by_publish_date() {
        let storage = InMemoryStorage::new();
        let old = now() - Duration::hours(2);
        let created = storage
            .insert_batch(vec![
                new_article("https://a.test/undated", None, old),
                new_article("https://a.test/early", Some(3), old),
                new_article("https://a.test/late", Some(9), old),
                new_article("https://a.test/fresh", Some(10), now()),
                new_article("https://a.test/sent", Some(11), old),
            ])
            .await
            .unwrap();
        storage.mark_sent(created[4].id, now()).await.unwrap();

        let due = storage.undelivered_before(now() - Duration::hours(1), 20).await.unwrap();
        let urls: Vec<_> = due.iter().map(|a| a.url.as_str()).collect();
        assert_eq!(urls, vec!["https://a.test/late", "https://a.test/early", "https://a.test/undated"]);

        let limited = storage.undelivered_before(now(), 1).await.unwrap();
        assert_eq!(limited.len(), 1);
        assert_eq!(storage.latest(10).await.unwrap()[0].url, "https://a.test/sent");
    }

    #[tokio::test]
    async fn test_failed_attempts_move_to_the_back_of_the_sweep() {
        let storage = InMemoryStorage::new();
        let old = now() - Duration::hours(2);
        let created = storage
            .insert_batch(vec![
                new_article("https://a.test/stuck", Some(9), old),
                new_article("https://a.test/waiting", Some(3), old),
            ])
            .await
            .unwrap();
        storage.record_failed_attempt(created[0].id).await.unwrap();
        storage.record_failed_attempt(created[0].id).await.unwrap();

        let due = storage.undelivered_before(now(), 1).await.unwrap();
        assert_eq!(due[0].url, "https://a.test/waiting");

        let stuck = storage.get_by_url("https://a.test/stuck").await.unwrap().unwrap();
        assert_eq!(stuck.delivery_attempts, 2);
        assert!(matches!(storage.record_failed_attempt(999).await, Err(StorageError::NotFound(999))));
    }

    #[tokio::test]
    async fn test_retention_ignores_delivery_state() {
        let storage = InMemoryStorage::new();
        let created = storage
            .insert_batch(vec![
                new_article("https://a.test/old-sent", Some(1), now() - Duration::days(31)),
                new_article("https://a.test/old-unsent", Some(1), now() - Duration::days(40)),
                new_article("https://a.test/recent", Some(1), now() - Duration::days(29)),
            ])
            .await
            .unwrap();
        storage.mark_sent(created[0].id, now()).await.unwrap();

        let deleted = storage.delete_ingested_before(now() - Duration::days(30)).await.unwrap();
        assert_eq!(deleted, 2);
        assert_eq!(storage.len().await, 1);
        assert!(storage.exists("https://a.test/recent").await.unwrap());
    }

    #[tokio::test]
    async fn test_closed_store_rejects_calls() {
        let storage = InMemoryStorage::new();
        storage.close().await;
        assert!(matches!(storage.exists("https://a.test/1").await, Err(StorageError::Closed)));
    }
}
