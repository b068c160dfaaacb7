use std::fmt;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use sn_core::{TranslationError, TranslationProvider};

use super::{checked_json, non_empty};

const ENDPOINT: &str = "https://api.cognitive.microsofttranslator.com/translate";
const NAME: &str = "microsoft";

pub struct MicrosoftTranslatorProvider {
    client: Client,
    api_key: String,
    region: Option<String>,
    source: String,
    target: String,
}

impl fmt::Debug for MicrosoftTranslatorProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MicrosoftTranslatorProvider")
            .field("api_key", &"<redacted>")
            .field("region", &self.region)
            .field("source", &self.source)
            .field("target", &self.target)
            .finish()
    }
}

#[derive(Serialize)]
struct TranslateRequest<'a> {
    #[serde(rename = "Text")]
    text: &'a str,
}

#[derive(Deserialize)]
pub(crate) struct TranslateResult {
    translations: Vec<Translation>,
}

#[derive(Deserialize)]
struct Translation {
    text: String,
}

impl MicrosoftTranslatorProvider {
    pub fn new(client: Client, api_key: String, source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            client,
            api_key,
            region: None,
            source: source.into(),
            target: target.into(),
        }
    }

    pub fn with_region(mut self, region: Option<String>) -> Self {
        self.region = region;
        self
    }
}

pub(crate) fn parse_response(results: Vec<TranslateResult>) -> Result<String, TranslationError> {
    let text = results
        .into_iter()
        .next()
        .and_then(|r| r.translations.into_iter().next())
        .map(|t| t.text)
        .unwrap_or_default();
    non_empty(NAME, text)
}

#[async_trait]
impl TranslationProvider for MicrosoftTranslatorProvider {
    fn name(&self) -> &str {
        NAME
    }

    async fn translate(&self, text: &str) -> Result<String, TranslationError> {
        let mut query = vec![("api-version", "3.0"), ("to", self.target.as_str())];
        if self.source != "auto" {
            query.push(("from", self.source.as_str()));
        }

        let mut request = self
            .client
            .post(ENDPOINT)
            .query(&query)
            .header("Ocp-Apim-Subscription-Key", &self.api_key)
            .json(&[TranslateRequest { text }]);
        if let Some(region) = &self.region {
            request = request.header("Ocp-Apim-Subscription-Region", region);
        }

        let results: Vec<TranslateResult> = checked_json(NAME, request.send().await).await?;
        parse_response(results)
    }
}
