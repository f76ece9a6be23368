//! HTTP fetcher implementation
//!
//! This module handles all plain HTTP requests for the crawler, including:
//! - Building the HTTP client with the configured user agent
//! - Bounded retries with a fixed backoff for required pages
//! - Single-attempt downloads for best-effort assets

use crate::config::HttpConfig;
use crate::TaduError;
use reqwest::Client;
use std::fmt;
use std::time::Duration;

/// Why a single attempt failed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptError {
    /// The server answered with a non-success status
    Status(u16),

    /// The request never produced a usable response
    Transport(String),
}

impl fmt::Display for AttemptError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Status(code) => write!(f, "HTTP {}", code),
            Self::Transport(message) => write!(f, "{}", message),
        }
    }
}

/// Retry settings for one fetch
///
/// Retries happen at a fixed interval, with no jitter and no growth.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub timeout: Duration,
    pub max_attempts: u32,
    pub backoff: Duration,
}

impl RetryPolicy {
    pub fn from_config(config: &HttpConfig) -> Self {
        Self {
            timeout: config.fetch_timeout(),
            max_attempts: config.max_attempts.max(1),
            backoff: config.backoff(),
        }
    }
}

/// Builds an HTTP client with proper configuration
///
/// The configured user agent is sent on every request; timeouts are set per
/// request so page and asset fetches can differ.
///
/// # Example
///
/// ```no_run
/// use tadu_crawler::config::HttpConfig;
/// use tadu_crawler::crawler::build_http_client;
///
/// let client = build_http_client(&HttpConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &HttpConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.clone())
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Bounded-retry HTTP GET
#[derive(Debug, Clone)]
pub struct RetryingFetcher {
    client: Client,
    policy: RetryPolicy,
    image_timeout: Duration,
}

impl RetryingFetcher {
    pub fn new(client: Client, config: &HttpConfig) -> Self {
        Self {
            client,
            policy: RetryPolicy::from_config(config),
            image_timeout: config.image_timeout(),
        }
    }

    pub fn policy(&self) -> RetryPolicy {
        self.policy
    }

    /// Fetches a required page body with the configured retry policy
    pub async fn fetch(&self, url: &str) -> Result<String, TaduError> {
        self.fetch_with(url, self.policy).await
    }

    /// Fetches a required page body with an explicit retry policy
    ///
    /// # Retry Logic
    ///
    /// | Condition | Action |
    /// |-----------|--------|
    /// | 2xx | Return body |
    /// | Non-2xx status | Wait `backoff`, retry |
    /// | Transport error / timeout | Wait `backoff`, retry |
    /// | `max_attempts` failures | `FetchExhausted` |
    pub async fn fetch_with(&self, url: &str, policy: RetryPolicy) -> Result<String, TaduError> {
        let max_attempts = policy.max_attempts.max(1);

        for attempt in 1..=max_attempts {
            match self.attempt(url, policy.timeout).await {
                Ok(body) => return Ok(body),
                Err(e) => {
                    tracing::warn!(
                        "Network error for {}: {} (attempt {}/{})",
                        url,
                        e,
                        attempt,
                        max_attempts
                    );
                }
            }

            if attempt < max_attempts && !policy.backoff.is_zero() {
                tokio::time::sleep(policy.backoff).await;
            }
        }

        Err(TaduError::FetchExhausted {
            url: url.to_string(),
            attempts: max_attempts,
        })
    }

    /// Downloads an asset in a single attempt
    ///
    /// Assets are best effort, so this never retries; the caller decides
    /// what a failure means.
    pub async fn fetch_asset(&self, url: &str) -> Result<Vec<u8>, TaduError> {
        let asset_error = |message: String| TaduError::AssetFetchFailed {
            url: url.to_string(),
            message,
        };

        let response = self
            .client
            .get(url)
            .timeout(self.image_timeout)
            .send()
            .await
            .map_err(|e| asset_error(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(asset_error(format!("HTTP {}", status.as_u16())));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| asset_error(e.to_string()))?;

        Ok(bytes.to_vec())
    }

    async fn attempt(&self, url: &str, timeout: Duration) -> Result<String, AttemptError> {
        let response = self
            .client
            .get(url)
            .timeout(timeout)
            .send()
            .await
            .map_err(classify_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(AttemptError::Status(status.as_u16()));
        }

        response.text().await.map_err(classify_transport_error)
    }
}

fn classify_transport_error(e: reqwest::Error) -> AttemptError {
    if e.is_timeout() {
        AttemptError::Transport("Request timeout".to_string())
    } else if e.is_connect() {
        AttemptError::Transport("Connection refused".to_string())
    } else {
        AttemptError::Transport(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_config() -> HttpConfig {
        HttpConfig {
            backoff_secs: 0,
            ..HttpConfig::default()
        }
    }

    fn test_fetcher() -> RetryingFetcher {
        let config = test_config();
        let client = build_http_client(&config).unwrap();
        RetryingFetcher::new(client, &config)
    }

    #[test]
    fn test_build_http_client() {
        assert!(build_http_client(&HttpConfig::default()).is_ok());
    }

    #[test]
    fn test_policy_from_config() {
        let policy = RetryPolicy::from_config(&HttpConfig::default());
        assert_eq!(policy.max_attempts, 3);
        assert_eq!(policy.backoff, Duration::from_secs(2));
        assert_eq!(policy.timeout, Duration::from_secs(60));
    }

    #[tokio::test]
    async fn test_fetch_success_sends_user_agent() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/page"))
            .and(header(
                "user-agent",
                "Mozilla/5.0 (compatible; TaduIDBot/1.0)",
            ))
            .respond_with(ResponseTemplate::new(200).set_body_string("hello"))
            .expect(1)
            .mount(&server)
            .await;

        let body = test_fetcher()
            .fetch(&format!("{}/page", server.uri()))
            .await
            .unwrap();
        assert_eq!(body, "hello");
    }

    #[tokio::test]
    async fn test_fetch_exhausts_after_max_attempts() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/down"))
            .respond_with(ResponseTemplate::new(503))
            .expect(3)
            .mount(&server)
            .await;

        let url = format!("{}/down", server.uri());
        let err = test_fetcher().fetch(&url).await.unwrap_err();

        match err {
            TaduError::FetchExhausted { url: failed, attempts } => {
                assert_eq!(failed, url);
                assert_eq!(attempts, 3);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_fetch_recovers_after_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/flaky"))
            .respond_with(ResponseTemplate::new(500))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/flaky"))
            .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
            .mount(&server)
            .await;

        let body = test_fetcher()
            .fetch(&format!("{}/flaky", server.uri()))
            .await
            .unwrap();
        assert_eq!(body, "ok");
    }

    #[tokio::test]
    async fn test_fetch_with_single_attempt() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .expect(1)
            .mount(&server)
            .await;

        let fetcher = test_fetcher();
        let policy = RetryPolicy {
            max_attempts: 1,
            ..fetcher.policy()
        };
        let result = fetcher
            .fetch_with(&format!("{}/missing", server.uri()), policy)
            .await;
        assert!(matches!(
            result,
            Err(TaduError::FetchExhausted { attempts: 1, .. })
        ));
    }

    #[tokio::test]
    async fn test_fetch_asset_does_not_retry() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/cover.jpg"))
            .respond_with(ResponseTemplate::new(500))
            .expect(1)
            .mount(&server)
            .await;

        let result = test_fetcher()
            .fetch_asset(&format!("{}/cover.jpg", server.uri()))
            .await;
        assert!(matches!(result, Err(TaduError::AssetFetchFailed { .. })));
    }

    #[tokio::test]
    async fn test_fetch_asset_bytes() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/cover.png"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![0x89, 0x50, 0x4e, 0x47]))
            .mount(&server)
            .await;

        let bytes = test_fetcher()
            .fetch_asset(&format!("{}/cover.png", server.uri()))
            .await
            .unwrap();
        assert_eq!(bytes, vec![0x89, 0x50, 0x4e, 0x47]);
    }
}
