use std::future::Future;
use std::net::SocketAddr;

use axum::{routing::get, Router};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

pub mod handlers;
pub mod state;

pub use state::AppState;

pub fn create_app(state: AppState) -> Router {
    let cors = CorsLayer::permissive();

    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        .route("/metrics", get(handlers::metrics))
        .route("/parse", get(handlers::parse).post(handlers::parse))
        .route("/status", get(handlers::status))
        .route("/latest", get(handlers::latest))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serves the API on `0.0.0.0:port` until `shutdown` resolves.
pub async fn serve<F>(port: u16, state: AppState, shutdown: F) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("🌐 API server listening on {}", addr);
    info!("Manual trigger: POST http://localhost:{}/parse with Authorization: Bearer <PARSE_API_KEY>", port);
    axum::serve(listener, create_app(state))
        .with_graceful_shutdown(shutdown)
        .await
}

pub mod prelude {
    pub use crate::{create_app, serve, AppState};
    pub use sn_core::{Error, Result};
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use serde_json::Value;
    use chrono::{TimeZone, Utc};
    use sn_core::{ArticleStore, Category, CycleError, NewArticle, PipelineMetrics, StorageError};
    use sn_enrich::{Translator, TranslatorConfig};
    use sn_pipeline::{CycleJob, CycleReport, CycleScheduler, QuietWindow, SchedulerConfig};
    use sn_storage::InMemoryStorage;
    use std::sync::Arc;
    use std::time::Duration;
    use tower::ServiceExt;

    struct NapJob;

    #[async_trait]
    impl CycleJob for NapJob {
        async fn run(&self) -> Result<CycleReport, CycleError> {
            tokio::time::sleep(Duration::from_secs(30)).await;
            Ok(CycleReport::default())
        }

        async fn cleanup(&self) -> Result<u64, StorageError> {
            Ok(0)
        }

        async fn shutdown(&self) {}
    }

    fn app_state() -> AppState {
        let metrics = Arc::new(PipelineMetrics::new());
        let config = SchedulerConfig {
            run_on_start: false,
            ..Default::default()
        };
        AppState {
            scheduler: CycleScheduler::new(Arc::new(NapJob), config, metrics.clone()),
            translator: Arc::new(Translator::new(Vec::new(), TranslatorConfig::default(), metrics.clone())),
            metrics,
            store: Arc::new(InMemoryStorage::new()),
            api_key: "letmein".to_string(),
            environment: "test".to_string(),
            quiet_window: QuietWindow::in_zone(22, 10, "Europe/Moscow").ok(),
        }
    }

    fn stored(url: &str, day: u32) -> NewArticle {
        NewArticle {
            url: url.to_string(),
            title: "Утечка данных".to_string(),
            title_original: "Data breach".to_string(),
            title_translated: "Утечка данных".to_string(),
            summary: None,
            summary_original: None,
            summary_translated: None,
            published_at: Some(Utc.with_ymd_and_hms(2025, 8, day, 8, 0, 0).unwrap()),
            ingested_at: Utc.with_ymd_and_hms(2025, 8, 20, 8, 0, 0).unwrap(),
            category: Category::General,
            source: "SecurityWeek".to_string(),
        }
    }

    async fn call(app: &Router, method: &str, uri: &str, bearer: Option<&str>) -> (StatusCode, Value) {
        let mut request = Request::builder().method(method).uri(uri);
        if let Some(key) = bearer {
            request = request.header("authorization", format!("Bearer {}", key));
        }
        let response = app
            .clone()
            .oneshot(request.body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = serde_json::from_slice(&body).unwrap_or(Value::Null);
        (status, json)
    }

    #[tokio::test(start_paused = true)]
    async fn test_health() {
        let app = create_app(app_state());
        let (status, body) = call(&app, "GET", "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["environment"], "test");
    }

    #[tokio::test(start_paused = true)]
    async fn test_parse_requires_key() {
        let state = app_state();
        state.scheduler.start().await;
        let app = create_app(state);

        let (status, _) = call(&app, "POST", "/parse", None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        let (status, _) = call(&app, "POST", "/parse", Some("wrong")).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        let (status, _) = call(&app, "GET", "/parse?key=nope", None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test(start_paused = true)]
    async fn test_parse_single_flight_over_http() {
        let state = app_state();
        state.scheduler.start().await;
        let app = create_app(state.clone());

        let (status, body) = call(&app, "POST", "/parse", Some("letmein")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "started");

        let (status, body) = call(&app, "GET", "/parse?key=letmein", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "already_running");

        state.scheduler.stop().await;
        let (status, body) = call(&app, "POST", "/parse", Some("letmein")).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["status"], "unavailable");
    }

    #[tokio::test(start_paused = true)]
    async fn test_status_reports_jobs_and_metrics() {
        let state = app_state();
        state.scheduler.start().await;
        let app = create_app(state.clone());

        let (status, body) = call(&app, "GET", "/status", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["scheduler"]["running"], true);
        let jobs = body["scheduler"]["jobs"].as_array().unwrap();
        assert!(jobs.iter().any(|job| job["id"] == "parse_news" && job["next_run"].is_string()));
        assert_eq!(body["metrics"]["cycles_ok"], 0);
        assert_eq!(body["translation_cache"]["entries"], 0);
        assert_eq!(body["quiet_window"]["timezone"], "Europe/Moscow");
        state.scheduler.stop().await;
    }

    #[tokio::test]
    async fn test_latest_articles() {
        let state = app_state();
        state
            .store
            .insert_batch(vec![
                stored("https://a.test/1", 1),
                stored("https://a.test/2", 3),
                stored("https://a.test/3", 2),
            ])
            .await
            .unwrap();
        let app = create_app(state);

        let (status, body) = call(&app, "GET", "/latest?limit=2", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["count"], 2);
        assert_eq!(body["articles"][0]["url"], "https://a.test/2");
        assert_eq!(body["articles"][1]["url"], "https://a.test/3");

        let (_, body) = call(&app, "GET", "/latest", None).await;
        assert_eq!(body["count"], 3);
    }

    #[tokio::test]
    async fn test_latest_reports_storage_failure() {
        let state = app_state();
        state.store.close().await;
        let app = create_app(state);

        let (status, body) = call(&app, "GET", "/latest", None).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn test_root_lists_endpoints() {
        let app = create_app(app_state());
        let (status, body) = call(&app, "GET", "/", None).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["endpoints"]["GET /latest?limit=N"].is_string());
    }
}
