//! Concrete translation backends, tried in the order they are configured.

mod google;
mod microsoft;
mod openai;

pub use google::GoogleTranslateProvider;
pub use microsoft::MicrosoftTranslatorProvider;
pub use openai::OpenAiTranslatorProvider;

use sn_core::TranslationError;

async fn checked_json<T: serde::de::DeserializeOwned>(
    provider: &str,
    response: Result<reqwest::Response, reqwest::Error>,
) -> Result<T, TranslationError> {
    let response = response.map_err(|e| TranslationError::Http {
        provider: provider.to_string(),
        source: e,
    })?;
    let status = response.status();
    if !status.is_success() {
        return Err(TranslationError::Status {
            provider: provider.to_string(),
            status: status.as_u16(),
        });
    }
    response.json::<T>().await.map_err(|e| TranslationError::Payload {
        provider: provider.to_string(),
        reason: e.to_string(),
    })
}

fn non_empty(provider: &str, text: String) -> Result<String, TranslationError> {
    if text.trim().is_empty() {
        Err(TranslationError::Empty { provider: provider.to_string() })
    } else {
        Ok(text)
    }
}
