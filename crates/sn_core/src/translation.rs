use async_trait::async_trait;

use crate::error::TranslationError;

#[async_trait]
pub trait TranslationProvider: Send + Sync {
    /// Short provider name used in logs and metrics
    fn name(&self) -> &str;

    /// Translates `text` into the provider's configured target language
    async fn translate(&self, text: &str) -> Result<String, TranslationError>;
}
