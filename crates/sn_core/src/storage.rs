use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::StorageError;
use crate::types::{Article, NewArticle};

#[async_trait]
pub trait ArticleStore: Send + Sync {
    /// Returns true if an article with this URL was already ingested
    async fn exists(&self, url: &str) -> Result<bool, StorageError>;

    /// Stores a whole cycle batch in one transaction. URLs that already
    /// exist are skipped; only the newly created rows are returned.
    async fn insert_batch(&self, batch: Vec<NewArticle>) -> Result<Vec<Article>, StorageError>;

    async fn get_by_url(&self, url: &str) -> Result<Option<Article>, StorageError>;

    /// Marks an article delivered at `at`
    async fn mark_sent(&self, id: i64, at: DateTime<Utc>) -> Result<(), StorageError>;

    /// Defers an article: state becomes pending and `sent_at` is cleared
    async fn mark_pending(&self, id: i64) -> Result<(), StorageError>;

    /// Counts a failed send so the article moves behind untried ones in the sweep
    async fn record_failed_attempt(&self, id: i64) -> Result<(), StorageError>;

    /// Articles not yet sent that were ingested before `cutoff`: fewest failed
    /// attempts first, then newest publish date
    async fn undelivered_before(
        &self,
        cutoff: DateTime<Utc>,
        limit: usize,
    ) -> Result<Vec<Article>, StorageError>;

    /// Most recently published articles, any delivery state
    async fn latest(&self, limit: usize) -> Result<Vec<Article>, StorageError>;

    /// Retention sweep. Deletes regardless of delivery state.
    async fn delete_ingested_before(&self, cutoff: DateTime<Utc>) -> Result<u64, StorageError>;

    /// Releases connections held by the backend
    async fn close(&self) {}
}
