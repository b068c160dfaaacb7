pub mod delivery;
pub mod error;
pub mod metrics;
pub mod storage;
pub mod translation;
pub mod types;

pub use delivery::{ChatSink, Destination};
pub use error::{
    CycleError, DeliveryError, Error, FetchError, SchedulerFault, StorageError, TranslationError,
};
pub use metrics::{MetricsSnapshot, PipelineMetrics};
pub use storage::ArticleStore;
pub use translation::TranslationProvider;
pub use types::{Article, Category, DeliveryState, NewArticle, RawItem, TranslatedItem, TranslatedText};

pub type Result<T> = std::result::Result<T, Error>;

pub mod prelude {
    pub use crate::{Article, ArticleStore, Category, ChatSink, Error, RawItem, Result};
}
