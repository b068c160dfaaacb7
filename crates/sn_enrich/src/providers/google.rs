use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use sn_core::{TranslationError, TranslationProvider};

use super::{checked_json, non_empty};

const ENDPOINT: &str = "https://translate.googleapis.com/translate_a/single";
const NAME: &str = "google";

/// The keyless web endpoint. Good enough for headlines, rate limited when abused.
#[derive(Debug, Clone)]
pub struct GoogleTranslateProvider {
    client: Client,
    source: String,
    target: String,
}

impl GoogleTranslateProvider {
    pub fn new(client: Client, source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            client,
            source: source.into(),
            target: target.into(),
        }
    }
}

/// The response is a nested array; the first element lists `[translated, original, ...]` segments.
pub(crate) fn parse_response(body: &Value) -> Result<String, TranslationError> {
    let segments = body
        .get(0)
        .and_then(Value::as_array)
        .ok_or_else(|| TranslationError::Payload {
            provider: NAME.to_string(),
            reason: "missing segment list".to_string(),
        })?;

    let text: String = segments
        .iter()
        .filter_map(|segment| segment.get(0).and_then(Value::as_str))
        .collect();
    non_empty(NAME, text)
}

#[async_trait]
impl TranslationProvider for GoogleTranslateProvider {
    fn name(&self) -> &str {
        NAME
    }

    async fn translate(&self, text: &str) -> Result<String, TranslationError> {
        let response = self
            .client
            .get(ENDPOINT)
            .query(&[
                ("client", "gtx"),
                ("sl", self.source.as_str()),
                ("tl", self.target.as_str()),
                ("dt", "t"),
                ("q", text),
            ])
            .send()
            .await;
        let body: Value = checked_json(NAME, response).await?;
        parse_response(&body)
    }
}
