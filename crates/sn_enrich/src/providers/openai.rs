use std::fmt;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use sn_core::{TranslationError, TranslationProvider};

use super::{checked_json, non_empty};

const ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";
const DEFAULT_MODEL: &str = "gpt-4o-mini";
const NAME: &str = "openai";

pub struct OpenAiTranslatorProvider {
    client: Client,
    api_key: String,
    model: String,
    source: String,
    target: String,
}

impl fmt::Debug for OpenAiTranslatorProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenAiTranslatorProvider")
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("target", &self.target)
            .finish()
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Deserialize)]
pub(crate) struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessageResponse,
}

#[derive(Deserialize)]
struct ChatMessageResponse {
    content: Option<String>,
}

impl OpenAiTranslatorProvider {
    pub fn new(client: Client, api_key: String, source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            client,
            api_key,
            model: DEFAULT_MODEL.to_string(),
            source: source.into(),
            target: target.into(),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    fn instructions(&self) -> String {
        let from = if self.source == "auto" {
            String::new()
        } else {
            format!(" from language '{}'", self.source)
        };
        format!(
            "Translate the user's text{} into language '{}'. Reply with the translation only.",
            from, self.target
        )
    }
}

pub(crate) fn parse_response(response: ChatResponse) -> Result<String, TranslationError> {
    let text = response
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .map(|c| c.trim().to_string())
        .unwrap_or_default();
    non_empty(NAME, text)
}

#[async_trait]
impl TranslationProvider for OpenAiTranslatorProvider {
    fn name(&self) -> &str {
        NAME
    }

    async fn translate(&self, text: &str) -> Result<String, TranslationError> {
        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage { role: "system", content: self.instructions() },
                ChatMessage { role: "user", content: text.to_string() },
            ],
            temperature: 0.0,
        };

        let response = self
            .client
            .post(ENDPOINT)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await;
        let body: ChatResponse = checked_json(NAME, response).await?;
        parse_response(body)
    }
}
