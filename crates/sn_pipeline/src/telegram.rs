use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use sn_core::{ChatSink, DeliveryError, Destination};
use tracing::debug;

const API_BASE: &str = "https://api.telegram.org";
const MAX_ERROR_BODY: usize = 200;

/// Pushes messages through the Bot API `sendMessage` method.
pub struct TelegramSink {
    client: Client,
    token: String,
    api_base: String,
}

impl fmt::Debug for TelegramSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TelegramSink")
            .field("token", &"<redacted>")
            .field("api_base", &self.api_base)
            .finish()
    }
}

#[derive(Debug, Serialize, PartialEq)]
struct SendMessage<'a> {
    chat_id: i64,
    text: &'a str,
    parse_mode: &'static str,
    disable_web_page_preview: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    message_thread_id: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
}

impl TelegramSink {
    pub fn new(token: impl Into<String>, timeout: Duration) -> Result<Self, DeliveryError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            token: token.into(),
            api_base: API_BASE.to_string(),
        })
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/bot{}/{}", self.api_base.trim_end_matches('/'), self.token, method)
    }
}

fn payload<'a>(destination: &Destination, text: &'a str) -> SendMessage<'a> {
    SendMessage {
        chat_id: destination.chat_id,
        text,
        parse_mode: "Markdown",
        disable_web_page_preview: true,
        message_thread_id: destination.thread_id,
    }
}

#[async_trait]
impl ChatSink for TelegramSink {
    async fn send(&self, destination: &Destination, text: &str) -> Result<(), DeliveryError> {
        debug!(chat_id = destination.chat_id, thread_id = ?destination.thread_id, "sendMessage");
        let response = self
            .client
            .post(self.method_url("sendMessage"))
            .json(&payload(destination, text))
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        check_response(status, &body)
    }
}

/// Gateways in front of the Bot API answer 5xx and 429 with HTML, so the
/// status decides first and the JSON body only supplies the description.
fn check_response(status: StatusCode, body: &str) -> Result<(), DeliveryError> {
    let parsed = serde_json::from_str::<ApiResponse>(body);
    let rejected = |description: String| DeliveryError::Rejected {
        status: status.as_u16(),
        description,
    };

    if !status.is_success() {
        let description = match parsed {
            Ok(ApiResponse { description: Some(description), .. }) => description,
            _ => snippet(body),
        };
        return Err(rejected(description));
    }

    match parsed {
        Ok(response) if response.ok => Ok(()),
        Ok(response) => Err(rejected(response.description.unwrap_or_else(|| "no description".to_string()))),
        Err(e) => Err(rejected(format!("unreadable response ({}): {}", e, snippet(body)))),
    }
}

fn snippet(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return "empty body".to_string();
    }
    trimmed.chars().take(MAX_ERROR_BODY).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_payload_includes_thread_only_when_set() {
        let plain = serde_json::to_value(payload(&Destination::new(-1001), "hi")).unwrap();
        assert_eq!(
            plain,
            json!({"chat_id": -1001, "text": "hi", "parse_mode": "Markdown", "disable_web_page_preview": true})
        );

        let threaded = serde_json::to_value(payload(&Destination::new(-1001).with_thread(Some(42)), "hi")).unwrap();
        assert_eq!(threaded["message_thread_id"], 42);
    }

    #[test]
    fn test_non_json_error_keeps_status() {
        let err = check_response(StatusCode::BAD_GATEWAY, "<html><body>502 Bad Gateway</body></html>").unwrap_err();
        match err {
            DeliveryError::Rejected { status, description } => {
                assert_eq!(status, 502);
                assert!(description.contains("502 Bad Gateway"));
            }
            other => panic!("unexpected error: {:?}", other),
        }

        let err = check_response(StatusCode::TOO_MANY_REQUESTS, "").unwrap_err();
        assert!(matches!(err, DeliveryError::Rejected { status: 429, ref description } if description == "empty body"));
    }

    #[test]
    fn test_api_errors_use_description() {
        let body = r#"{"ok":false,"error_code":400,"description":"Bad Request: can't parse entities"}"#;
        let err = check_response(StatusCode::BAD_REQUEST, body).unwrap_err();
        assert!(matches!(
            err,
            DeliveryError::Rejected { status: 400, ref description } if description.starts_with("Bad Request")
        ));

        let err = check_response(StatusCode::OK, r#"{"ok":false}"#).unwrap_err();
        assert!(matches!(err, DeliveryError::Rejected { status: 200, .. }));
        assert!(check_response(StatusCode::OK, r#"{"ok":true,"result":{}}"#).is_ok());
        assert!(check_response(StatusCode::OK, "not json").is_err());
    }

    #[test]
    fn test_token_stays_out_of_debug_output() {
        let sink = TelegramSink::new("123:secret", Duration::from_secs(5))
            .unwrap()
            .with_api_base("http://localhost:9/");
        assert_eq!(sink.method_url("sendMessage"), "http://localhost:9/bot123:secret/sendMessage");
        assert!(!format!("{:?}", sink).contains("secret"));
    }
}
