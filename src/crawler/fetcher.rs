//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building the HTTP client with the crawler's user agent
//! - GET requests with redirect following
//! - Retry logic for transient failures
//! - Error classification

use crate::config::{CrawlerConfig, UserAgentConfig};
use reqwest::{redirect::Policy, Client, StatusCode};
use std::time::Duration;
use url::Url;

/// Maximum number of redirect hops followed for one request
pub const MAX_REDIRECTS: usize = 10;

/// Result of a fetch operation
#[derive(Debug)]
pub enum FetchResult {
    /// Successfully fetched an HTML page
    Success {
        /// Final URL after redirects; relative links resolve against it
        final_url: Url,
        status_code: u16,
        body: String,
    },

    /// Page is not HTML (Content-Type mismatch)
    ContentMismatch { content_type: String },

    /// Non-success HTTP status after retries
    HttpError { status_code: u16 },

    /// Connection failure, timeout or unreadable body after retries
    NetworkError { error: String },
}

impl FetchResult {
    /// Short classification stored alongside failures
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Success { .. } => "success",
            Self::ContentMismatch { .. } => "content_mismatch",
            Self::HttpError { .. } => "http_error",
            Self::NetworkError { .. } => "network_error",
        }
    }

    pub fn is_rate_limited(&self) -> bool {
        matches!(self, Self::HttpError { status_code: 429 })
    }
}

/// Retry settings derived from the crawler configuration
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub delay: Duration,
}

impl From<&CrawlerConfig> for RetryPolicy {
    fn from(config: &CrawlerConfig) -> Self {
        Self {
            max_retries: config.max_retries,
            delay: Duration::from_millis(config.retry_delay),
        }
    }
}

/// Builds an HTTP client with proper configuration
///
/// # Example
///
/// ```no_run
/// use game_crawler::config::UserAgentConfig;
/// use game_crawler::crawler::build_http_client;
///
/// let config = UserAgentConfig {
///     crawler_name: "GameCrawler".to_string(),
///     crawler_version: "1.0".to_string(),
///     contact_url: "https://example.com/about".to_string(),
///     contact_email: "admin@example.com".to_string(),
/// };
///
/// let client = build_http_client(&config, 30).unwrap();
/// ```
pub fn build_http_client(
    config: &UserAgentConfig,
    timeout_secs: u64,
) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.header_value())
        .timeout(Duration::from_secs(timeout_secs))
        .connect_timeout(Duration::from_secs(10))
        .redirect(Policy::limited(MAX_REDIRECTS))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches a URL, retrying transient failures
///
/// # Retry Logic
///
/// | Condition | Action |
/// |-----------|--------|
/// | HTTP 404 | Immediate failure |
/// | HTTP 429 | Immediate failure, host is backed off by the scheduler |
/// | HTTP 5xx | Retry up to `max_retries` times |
/// | Timeout | Retry up to `max_retries` times |
/// | Other 4xx | Immediate failure |
/// | Connection refused | Immediate failure |
/// | Redirect chain > 10 | Immediate failure |
pub async fn fetch_url(client: &Client, url: &Url, retry: RetryPolicy) -> FetchResult {
    let mut attempt = 0;

    loop {
        let (result, retryable) = fetch_once(client, url).await;

        if !retryable || attempt >= retry.max_retries {
            return result;
        }

        attempt += 1;
        tracing::debug!(
            url = %url,
            attempt,
            max_retries = retry.max_retries,
            "Retrying after {:?}: {:?}",
            retry.delay,
            result
        );
        tokio::time::sleep(retry.delay).await;
    }
}

/// Sends one GET request; the flag tells whether the failure is retryable
async fn fetch_once(client: &Client, url: &Url) -> (FetchResult, bool) {
    let response = match client.get(url.clone()).send().await {
        Ok(response) => response,
        Err(e) => return classify_error(&e),
    };

    let status = response.status();

    if status == StatusCode::NOT_FOUND || status == StatusCode::TOO_MANY_REQUESTS {
        return (
            FetchResult::HttpError {
                status_code: status.as_u16(),
            },
            false,
        );
    }

    if !status.is_success() {
        return (
            FetchResult::HttpError {
                status_code: status.as_u16(),
            },
            status.is_server_error(),
        );
    }

    let content_type = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();

    if !content_type.is_empty() && !content_type.contains("text/html") {
        return (FetchResult::ContentMismatch { content_type }, false);
    }

    let final_url = response.url().clone();

    match response.text().await {
        Ok(body) => (
            FetchResult::Success {
                final_url,
                status_code: status.as_u16(),
                body,
            },
            false,
        ),
        Err(e) => classify_error(&e),
    }
}

fn classify_error(e: &reqwest::Error) -> (FetchResult, bool) {
    if e.is_timeout() {
        (
            FetchResult::NetworkError {
                error: "Request timeout".to_string(),
            },
            true,
        )
    } else if e.is_redirect() {
        (
            FetchResult::NetworkError {
                error: format!("Too many redirects: {}", e),
            },
            false,
        )
    } else if e.is_connect() {
        (
            FetchResult::NetworkError {
                error: format!("Connection failed: {}", e),
            },
            false,
        )
    } else {
        (
            FetchResult::NetworkError {
                error: e.to_string(),
            },
            false,
        )
    }
}
