//! The single network primitive every fetch strategy goes through.

use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use rand::Rng;
use reqwest::header::{self, HeaderMap, HeaderValue};
use reqwest::{Client, Proxy};
use sn_core::FetchError;
use tracing::{debug, warn};

const USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/121.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.2 Safari/605.1.15",
    "Mozilla/5.0 (X11; Linux x86_64; rv:122.0) Gecko/20100101 Firefox/122.0",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:122.0) Gecko/20100101 Firefox/122.0",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
];

/// Bounded exponential backoff.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
    pub factor: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(30),
            factor: 2,
        }
    }
}

impl RetryPolicy {
    /// Delay to wait after the given (1-based) failed attempt.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1);
        let multiplier = self.factor.saturating_pow(exponent);
        self.base_delay
            .checked_mul(multiplier)
            .unwrap_or(self.max_delay)
            .min(self.max_delay)
    }

    pub fn is_retryable_status(status: reqwest::StatusCode) -> bool {
        status.is_server_error() || status == reqwest::StatusCode::TOO_MANY_REQUESTS
    }

    pub fn should_retry(&self, attempt: u32, error: &FetchError) -> bool {
        attempt < self.max_attempts && error.is_retryable()
    }
}

/// Runs `op` until it succeeds, fails permanently, or the policy runs out of attempts.
/// `op` receives the 1-based attempt number.
pub async fn with_retry<T, F, Fut>(policy: &RetryPolicy, url: &str, mut op: F) -> Result<T, FetchError>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, FetchError>>,
{
    let mut attempt = 0;
    loop {
        attempt += 1;
        match op(attempt).await {
            Ok(value) => return Ok(value),
            Err(e) if policy.should_retry(attempt, &e) => {
                let delay = policy.delay_for(attempt);
                warn!(url = %url, attempt, error = %e, "Retrying in {:?}", delay);
                tokio::time::sleep(delay).await;
            }
            Err(e) => return Err(e),
        }
    }
}

/// Anything that can turn a URL into a response body.
#[async_trait]
pub trait PageSource: Send + Sync {
    async fn get_text(&self, url: &str) -> Result<String, FetchError>;
}

pub struct HttpFetcher {
    client: Client,
    policy: RetryPolicy,
    next_agent: AtomicUsize,
}

impl HttpFetcher {
    pub fn new(timeout: Duration, proxy: Option<&str>, policy: RetryPolicy) -> Result<Self, FetchError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::ACCEPT,
            HeaderValue::from_static(
                "text/html,application/xhtml+xml,application/xml;q=0.9,application/rss+xml;q=0.9,*/*;q=0.8",
            ),
        );
        headers.insert(header::ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));
        headers.insert(header::CACHE_CONTROL, HeaderValue::from_static("max-age=0"));
        headers.insert(header::UPGRADE_INSECURE_REQUESTS, HeaderValue::from_static("1"));

        let mut builder = Client::builder().timeout(timeout).default_headers(headers);
        if let Some(proxy_url) = proxy {
            let proxy = Proxy::all(proxy_url)
                .map_err(|e| FetchError::InvalidUrl(format!("proxy {}: {}", proxy_url, e)))?;
            builder = builder.proxy(proxy);
        }
        let client = builder.build().map_err(|e| FetchError::Http {
            url: String::new(),
            source: e,
        })?;

        Ok(Self {
            client,
            policy,
            next_agent: AtomicUsize::new(rand::thread_rng().gen_range(0..USER_AGENTS.len())),
        })
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    fn user_agent(&self) -> &'static str {
        let index = self.next_agent.fetch_add(1, Ordering::Relaxed);
        USER_AGENTS[index % USER_AGENTS.len()]
    }

    async fn get_once(&self, url: &str) -> Result<String, FetchError> {
        let agent = self.user_agent();
        debug!(url = %url, agent, "GET");
        let response = self
            .client
            .get(url)
            .header(header::USER_AGENT, agent)
            .send()
            .await
            .map_err(|e| FetchError::Http { url: url.to_string(), source: e })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        response
            .text()
            .await
            .map_err(|e| FetchError::Http { url: url.to_string(), source: e })
    }
}

#[async_trait]
impl PageSource for HttpFetcher {
    async fn get_text(&self, url: &str) -> Result<String, FetchError> {
        with_retry(&self.policy, url, |_| self.get_once(url)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicU32;

    fn status(code: u16) -> FetchError {
        FetchError::Status { url: "https://a.test".to_string(), status: code }
    }

    #[test]
    fn test_backoff_grows_and_caps() {
        let policy = RetryPolicy {
            max_attempts: 6,
            base_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(5),
            factor: 2,
        };
        assert_eq!(policy.delay_for(1), Duration::from_secs(1));
        assert_eq!(policy.delay_for(2), Duration::from_secs(2));
        assert_eq!(policy.delay_for(3), Duration::from_secs(4));
        assert_eq!(policy.delay_for(4), Duration::from_secs(5));
        assert_eq!(policy.delay_for(40), Duration::from_secs(5));
    }

    #[test]
    fn test_retryable_statuses() {
        assert!(RetryPolicy::is_retryable_status(reqwest::StatusCode::BAD_GATEWAY));
        assert!(RetryPolicy::is_retryable_status(reqwest::StatusCode::TOO_MANY_REQUESTS));
        assert!(!RetryPolicy::is_retryable_status(reqwest::StatusCode::NOT_FOUND));
        assert!(!RetryPolicy::is_retryable_status(reqwest::StatusCode::FORBIDDEN));
    }

    #[tokio::test(start_paused = true)]
    async fn test_retries_server_errors_until_success() {
        let calls = AtomicU32::new(0);
        let result = with_retry(&RetryPolicy::default(), "https://a.test", |attempt| {
            calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if attempt < 3 {
                    Err(status(503))
                } else {
                    Ok("body".to_string())
                }
            }
        })
        .await;

        assert_eq!(result.unwrap(), "body");
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_gives_up_after_max_attempts() {
        let calls = AtomicU32::new(0);
        let result: Result<String, _> = with_retry(&RetryPolicy::default(), "https://a.test", |_| {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(status(500)) }
        })
        .await;

        assert!(matches!(result, Err(FetchError::Status { status: 500, .. })));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_client_errors_are_not_retried() {
        let calls = AtomicU32::new(0);
        let result: Result<String, _> = with_retry(&RetryPolicy::default(), "https://a.test", |_| {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(status(404)) }
        })
        .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_user_agent_rotates_between_attempts() {
        let fetcher = HttpFetcher::new(Duration::from_secs(5), None, RetryPolicy::default()).unwrap();
        let first = fetcher.user_agent();
        let second = fetcher.user_agent();
        assert_ne!(first, second);
    }
}
