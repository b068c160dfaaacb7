use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::DeliveryError;

/// A chat destination, optionally narrowed to a forum thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Destination {
    pub chat_id: i64,
    pub thread_id: Option<i64>,
}

impl Destination {
    pub fn new(chat_id: i64) -> Self {
        Self { chat_id, thread_id: None }
    }

    pub fn with_thread(mut self, thread_id: Option<i64>) -> Self {
        self.thread_id = thread_id;
        self
    }
}

#[async_trait]
pub trait ChatSink: Send + Sync {
    /// Pushes one already formatted message
    async fn send(&self, destination: &Destination, text: &str) -> Result<(), DeliveryError>;
}
