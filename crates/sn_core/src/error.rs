use thiserror::Error;

/// Failure of one fetch attempt or of a whole fetch strategy.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("HTTP error fetching {url}: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("HTTP status {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("Failed to parse {url}: {reason}")]
    Parse { url: String, reason: String },

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("All {count} endpoints of {strategy} failed")]
    AllEndpointsFailed { strategy: String, count: usize },
}

impl FetchError {
    /// Connection errors, timeouts, 5xx and 429 are worth another attempt.
    pub fn is_retryable(&self) -> bool {
        match self {
            FetchError::Http { source, .. } => {
                source.is_timeout() || source.is_connect() || source.is_request()
            }
            FetchError::Status { status, .. } => *status >= 500 || *status == 429,
            _ => false,
        }
    }
}

#[derive(Error, Debug)]
pub enum TranslationError {
    #[error("{provider} request failed: {source}")]
    Http {
        provider: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{provider} returned status {status}")]
    Status { provider: String, status: u16 },

    #[error("{provider} returned an empty translation")]
    Empty { provider: String },

    #[error("{provider} returned an unexpected payload: {reason}")]
    Payload { provider: String, reason: String },
}

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Article {0} not found")]
    NotFound(i64),

    #[error("Invalid stored value: {0}")]
    Corrupt(String),

    #[error("Storage is closed")]
    Closed,
}

#[derive(Error, Debug)]
pub enum DeliveryError {
    #[error("Chat request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Chat API rejected message ({status}): {description}")]
    Rejected { status: u16, description: String },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchedulerFault {
    #[error("Scheduler job loop '{0}' exited while the scheduler was running")]
    LoopExited(String),
}

/// Errors that end a cycle early. Everything else is absorbed where it happens.
#[derive(Error, Debug)]
pub enum CycleError {
    #[error("All fetch strategies failed: {}", .0.join("; "))]
    AllSourcesFailed(Vec<String>),

    #[error("Persistence failed: {0}")]
    Persistence(#[from] StorageError),
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    #[error("Translation error: {0}")]
    Translation(#[from] TranslationError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Delivery error: {0}")]
    Delivery(#[from] DeliveryError),

    #[error("Scheduler fault: {0}")]
    Scheduler(#[from] SchedulerFault),

    #[error("Cycle error: {0}")]
    Cycle(#[from] CycleError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("External error: {0}")]
    External(#[from] anyhow::Error),
}
