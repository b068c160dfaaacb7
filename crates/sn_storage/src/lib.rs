use std::sync::Arc;

use sn_core::{ArticleStore, StorageError};
use tracing::info;

pub mod backends;

pub use backends::*;

/// Opens the backend named by a `DATABASE_URL`-style string.
///
/// `memory://` gives a process-local store; `sqlite:` URLs need the `sqlite` feature.
pub async fn create_storage(url: &str) -> Result<Arc<dyn ArticleStore>, StorageError> {
    if url.starts_with("memory://") {
        info!("💾 Using in-memory article storage");
        return Ok(Arc::new(InMemoryStorage::new()));
    }

    #[cfg(feature = "sqlite")]
    if url.starts_with("sqlite:") {
        info!("💾 Using SQLite article storage at {}", url);
        return Ok(Arc::new(SQLiteStorage::connect(url).await?));
    }

    Err(StorageError::Database(format!("Unsupported storage URL: {}", url)))
}

pub mod prelude {
    pub use super::backends::*;
    pub use super::create_storage;
}
