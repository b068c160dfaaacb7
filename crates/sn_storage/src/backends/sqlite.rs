use std::path::Path;
use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use sn_core::{Article, ArticleStore, Category, DeliveryState, NewArticle, StorageError};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::Row;
use tracing::{debug, info};

const MIGRATIONS: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS articles (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        url TEXT NOT NULL UNIQUE,
        title TEXT NOT NULL,
        title_original TEXT NOT NULL,
        title_translated TEXT NOT NULL,
        summary TEXT,
        summary_original TEXT,
        summary_translated TEXT,
        published_at TEXT,
        ingested_at TEXT NOT NULL,
        sent_at TEXT,
        delivery_state TEXT NOT NULL DEFAULT 'unsent',
        category TEXT NOT NULL,
        source TEXT NOT NULL
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_delivery_published ON articles (delivery_state, published_at)",
    "CREATE INDEX IF NOT EXISTS idx_category_delivery ON articles (category, delivery_state)",
    "CREATE INDEX IF NOT EXISTS idx_ingested_at ON articles (ingested_at)",
];

/// Columns added after the first release, applied when missing.
const ADDED_COLUMNS: &[(&str, &str)] = &[("delivery_attempts", "INTEGER NOT NULL DEFAULT 0")];

const COLUMNS: &str = "id, url, title, title_original, title_translated, summary, summary_original, \
                       summary_translated, published_at, ingested_at, sent_at, delivery_state, delivery_attempts, \
                       category, source";

/// Fixed-width UTC text so that string order matches time order.
fn timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, StorageError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| StorageError::Corrupt(format!("timestamp {}: {}", raw, e)))
}

fn db_error(context: &str) -> impl FnOnce(sqlx::Error) -> StorageError + '_ {
    move |e| StorageError::Database(format!("{}: {}", context, e))
}

fn row_to_article(row: &SqliteRow) -> Result<Article, StorageError> {
    let optional_time = |column: &str| -> Result<Option<DateTime<Utc>>, StorageError> {
        row.get::<Option<String>, _>(column)
            .as_deref()
            .map(parse_timestamp)
            .transpose()
    };

    Ok(Article {
        id: row.get("id"),
        url: row.get("url"),
        title: row.get("title"),
        title_original: row.get("title_original"),
        title_translated: row.get("title_translated"),
        summary: row.get("summary"),
        summary_original: row.get("summary_original"),
        summary_translated: row.get("summary_translated"),
        published_at: optional_time("published_at")?,
        ingested_at: parse_timestamp(&row.get::<String, _>("ingested_at"))?,
        sent_at: optional_time("sent_at")?,
        delivery_state: DeliveryState::from_str(&row.get::<String, _>("delivery_state"))
            .map_err(StorageError::Corrupt)?,
        delivery_attempts: row.get::<i64, _>("delivery_attempts").max(0) as u32,
        category: Category::from_str(&row.get::<String, _>("category")).map_err(StorageError::Corrupt)?,
        source: row.get("source"),
    })
}

pub struct SQLiteStorage {
    pool: SqlitePool,
}

impl SQLiteStorage {
    /// Connects to a `sqlite:` URL, creating the file if needed, and runs migrations.
    pub async fn connect(url: &str) -> Result<Self, StorageError> {
        let options = SqliteConnectOptions::from_str(url)
            .map_err(db_error("Invalid database URL"))?
            .create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .map_err(db_error("Failed to connect to database"))?;

        for (i, migration) in MIGRATIONS.iter().enumerate() {
            sqlx::query(migration)
                .execute(&pool)
                .await
                .map_err(|e| StorageError::Database(format!("Failed to run migration {}: {}", i, e)))?;
        }
        for (column, definition) in ADDED_COLUMNS {
            let present: i64 =
                sqlx::query_scalar("SELECT COUNT(*) FROM pragma_table_info('articles') WHERE name = ?")
                    .bind(column)
                    .fetch_one(&pool)
                    .await
                    .map_err(db_error("Failed to inspect articles table"))?;
            if present == 0 {
                sqlx::query(&format!("ALTER TABLE articles ADD COLUMN {} {}", column, definition))
                    .execute(&pool)
                    .await
                    .map_err(db_error("Failed to add column"))?;
                info!("Added column articles.{}", column);
            }
        }
        info!("SQLite storage ready ({} migrations)", MIGRATIONS.len());

        Ok(Self { pool })
    }

    pub async fn new_with_path(db_path: &Path) -> Result<Self, StorageError> {
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| StorageError::Database(format!("Failed to create database directory: {}", e)))?;
        }
        Self::connect(&format!("sqlite:{}", db_path.display())).await
    }

    async fn select(&self, sql: &str, bind_cutoff: Option<String>, limit: usize) -> Result<Vec<Article>, StorageError> {
        let mut query = sqlx::query(sql);
        if let Some(cutoff) = bind_cutoff {
            query = query.bind(cutoff);
        }
        let rows = query
            .bind(limit as i64)
            .fetch_all(&self.pool)
            .await
            .map_err(db_error("Failed to load articles"))?;
        rows.iter().map(row_to_article).collect()
    }
}

#[async_trait]
impl ArticleStore for SQLiteStorage {
    async fn exists(&self, url: &str) -> Result<bool, StorageError> {
        let row = sqlx::query("SELECT 1 FROM articles WHERE url = ? LIMIT 1")
            .bind(url)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("Failed to check article"))?;
        Ok(row.is_some())
    }

    async fn insert_batch(&self, batch: Vec<NewArticle>) -> Result<Vec<Article>, StorageError> {
        let mut tx = self.pool.begin().await.map_err(db_error("Failed to open transaction"))?;
        let mut created = Vec::new();

        for new in batch {
            let result = sqlx::query(
                r#"
                INSERT INTO articles
                (url, title, title_original, title_translated, summary, summary_original,
                 summary_translated, published_at, ingested_at, sent_at, delivery_state, category, source)
                VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, NULL, ?, ?, ?)
                ON CONFLICT(url) DO NOTHING
                "#,
            )
            .bind(&new.url)
            .bind(&new.title)
            .bind(&new.title_original)
            .bind(&new.title_translated)
            .bind(new.summary.as_deref())
            .bind(new.summary_original.as_deref())
            .bind(new.summary_translated.as_deref())
            .bind(new.published_at.map(timestamp))
            .bind(timestamp(new.ingested_at))
            .bind(DeliveryState::Unsent.as_str())
            .bind(new.category.as_str())
            .bind(&new.source)
            .execute(&mut *tx)
            .await
            .map_err(db_error("Failed to store article"))?;

            if result.rows_affected() == 0 {
                debug!(url = %new.url, "Article already stored");
                continue;
            }
            created.push(new.into_article(result.last_insert_rowid()));
        }

        tx.commit().await.map_err(db_error("Failed to commit batch"))?;
        Ok(created)
    }

    async fn get_by_url(&self, url: &str) -> Result<Option<Article>, StorageError> {
        let sql = format!("SELECT {} FROM articles WHERE url = ?", COLUMNS);
        let row = sqlx::query(&sql)
            .bind(url)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("Failed to load article"))?;
        row.as_ref().map(row_to_article).transpose()
    }

    async fn mark_sent(&self, id: i64, at: DateTime<Utc>) -> Result<(), StorageError> {
        let result = sqlx::query("UPDATE articles SET delivery_state = ?, sent_at = ? WHERE id = ?")
            .bind(DeliveryState::Sent.as_str())
            .bind(timestamp(at))
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_error("Failed to mark article sent"))?;
        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound(id));
        }
        Ok(())
    }

    async fn mark_pending(&self, id: i64) -> Result<(), StorageError> {
        let result = sqlx::query("UPDATE articles SET delivery_state = ?, sent_at = NULL WHERE id = ?")
            .bind(DeliveryState::Pending.as_str())
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_error("Failed to mark article pending"))?;
        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound(id));
        }
        Ok(())
    }

    async fn record_failed_attempt(&self, id: i64) -> Result<(), StorageError> {
        let result = sqlx::query("UPDATE articles SET delivery_attempts = delivery_attempts + 1 WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_error("Failed to record delivery attempt"))?;
        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound(id));
        }
        Ok(())
    }

    async fn undelivered_before(
        &self,
        cutoff: DateTime<Utc>,
        limit: usize,
    ) -> Result<Vec<Article>, StorageError> {
        let sql = format!(
            "SELECT {} FROM articles WHERE delivery_state != 'sent' AND ingested_at < ? \
             ORDER BY delivery_attempts ASC, published_at DESC, id ASC LIMIT ?",
            COLUMNS
        );
        self.select(&sql, Some(timestamp(cutoff)), limit).await
    }

    async fn latest(&self, limit: usize) -> Result<Vec<Article>, StorageError> {
        let sql = format!("SELECT {} FROM articles ORDER BY published_at DESC, id ASC LIMIT ?", COLUMNS);
        self.select(&sql, None, limit).await
    }

    async fn delete_ingested_before(&self, cutoff: DateTime<Utc>) -> Result<u64, StorageError> {
        let result = sqlx::query("DELETE FROM articles WHERE ingested_at < ?")
            .bind(timestamp(cutoff))
            .execute(&self.pool)
            .await
            .map_err(db_error("Failed to delete old articles"))?;
        Ok(result.rows_affected())
    }

    async fn close(&self) {
        self.pool.close().await;
        info!("SQLite storage closed");
    }
}
