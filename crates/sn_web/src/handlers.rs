use axum::{
    extract::{Query, State},
    http::{header, HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use serde_json::json;
use sha2::{Digest, Sha256};
use sn_pipeline::TriggerOutcome;
use tracing::{error, info, warn};

use crate::AppState;

const BANNER: &str = "Security news pipeline API";
const DEFAULT_LATEST: usize = 5;
const MAX_LATEST: usize = 50;

const ENDPOINTS: &[(&str, &str)] = &[
    ("GET /health", "liveness"),
    ("GET /metrics", "pipeline counters"),
    ("GET /status", "scheduler, metrics, translation cache and quiet hours"),
    ("GET /latest?limit=N", "most recently published articles"),
    ("POST /parse", "start a cycle now, needs the API key"),
];

#[derive(Debug, Default, Deserialize)]
pub struct KeyQuery {
    pub key: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct LatestQuery {
    pub limit: Option<usize>,
}

impl LatestQuery {
    fn limit(&self) -> usize {
        self.limit.unwrap_or(DEFAULT_LATEST).clamp(1, MAX_LATEST)
    }
}

/// Bearer header wins over the `key` query parameter.
fn provided_key(headers: &HeaderMap, query: &KeyQuery) -> Option<String> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|key| !key.is_empty())
        .map(str::to_string)
        .or_else(|| query.key.clone().filter(|key| !key.is_empty()))
}

/// Compares fixed-size digests so the timing does not depend on the key length.
fn keys_match(provided: &str, expected: &str) -> bool {
    let a = Sha256::digest(provided.as_bytes());
    let b = Sha256::digest(expected.as_bytes());
    a.iter().zip(b.iter()).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

pub async fn root() -> impl IntoResponse {
    let endpoints: serde_json::Map<String, serde_json::Value> = ENDPOINTS
        .iter()
        .map(|(route, about)| (route.to_string(), json!(about)))
        .collect();
    Json(json!({
        "service": BANNER,
        "endpoints": endpoints,
    }))
}

pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "status": "healthy",
        "environment": state.environment,
    }))
}

pub async fn metrics(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.metrics.snapshot())
}

pub async fn parse(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<KeyQuery>,
) -> impl IntoResponse {
    let authorized = provided_key(&headers, &query)
        .map(|key| keys_match(&key, &state.api_key))
        .unwrap_or(false);
    if !authorized {
        warn!("Unauthorized parse request: invalid or missing API key");
        return (StatusCode::UNAUTHORIZED, Json(json!({"error": "Unauthorized"})));
    }

    let outcome = state.scheduler.trigger().await;
    let (status, message) = match outcome {
        TriggerOutcome::Started => {
            info!("🚀 Manual parse triggered via API");
            (StatusCode::OK, "Parsing started successfully")
        }
        TriggerOutcome::AlreadyRunning => (StatusCode::OK, "Parsing is already in progress"),
        TriggerOutcome::Unavailable => {
            warn!("Parse request refused: scheduler is not running");
            (StatusCode::SERVICE_UNAVAILABLE, "Scheduler not running")
        }
    };
    (status, Json(json!({"status": outcome, "message": message})))
}

pub async fn status(State(state): State<AppState>) -> impl IntoResponse {
    let scheduler = state.scheduler.status().await;
    let translation_cache = state.translator.cache_stats().await;
    Json(json!({
        "scheduler": scheduler,
        "metrics": state.metrics.snapshot(),
        "translation_cache": translation_cache,
        "quiet_window": state.quiet_window.map(|window| window.info()),
    }))
}

pub async fn latest(State(state): State<AppState>, Query(query): Query<LatestQuery>) -> impl IntoResponse {
    match state.store.latest(query.limit()).await {
        Ok(articles) => (
            StatusCode::OK,
            Json(json!({
                "count": articles.len(),
                "articles": articles,
            })),
        ),
        Err(e) => {
            error!(error = %e, "Failed to load latest articles");
            (StatusCode::SERVICE_UNAVAILABLE, Json(json!({"error": e.to_string()})))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_provided_key_prefers_header() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer abc"));
        let query = KeyQuery { key: Some("xyz".to_string()) };
        assert_eq!(provided_key(&headers, &query).as_deref(), Some("abc"));

        assert_eq!(provided_key(&HeaderMap::new(), &query).as_deref(), Some("xyz"));
        assert_eq!(provided_key(&HeaderMap::new(), &KeyQuery::default()), None);
    }

    #[test]
    fn test_non_bearer_header_is_ignored() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Basic abc"));
        assert_eq!(provided_key(&headers, &KeyQuery::default()), None);
    }

    #[test]
    fn test_latest_limit_is_clamped() {
        assert_eq!(LatestQuery::default().limit(), 5);
        assert_eq!(LatestQuery { limit: Some(0) }.limit(), 1);
        assert_eq!(LatestQuery { limit: Some(500) }.limit(), 50);
    }

    #[test]
    fn test_keys_match() {
        assert!(keys_match("secret", "secret"));
        assert!(!keys_match("secret", "secret2"));
        assert!(!keys_match("", "secret"));
    }
}
