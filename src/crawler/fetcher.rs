//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler:
//! - Building the HTTP client with the configured user agent and timeouts
//! - GET requests with the client's default redirect policy, no retry
//! - Error classification into a [`FetchResult`]
//!
//! The rest of the crate only sees the [`PageFetcher`] trait, so tests can swap the
//! network for an in-memory page graph.

use crate::config::Config;
use crate::state::PageFailure;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client, StatusCode};
use std::time::Duration;
use url::Url;

/// A response received from a server
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// Final URL after redirects
    pub final_url: Url,

    /// HTTP status code
    pub status_code: u16,

    /// Content-Type header value, if the server sent one
    pub content_type: Option<String>,

    /// Page body; empty for non-200 responses
    pub body: String,

    pub fetched_at: DateTime<Utc>,
}

impl FetchedPage {
    /// Returns true for a 200 response
    pub fn is_ok(&self) -> bool {
        self.status_code == StatusCode::OK.as_u16()
    }
}

/// Result of a fetch operation
#[derive(Debug, Clone)]
pub enum FetchResult {
    /// The server answered (any status code)
    Response(FetchedPage),

    /// Network error (connection refused, timeout, etc.)
    NetworkError {
        /// Error description
        error: String,
    },
}

impl FetchResult {
    /// Returns the page for a 200 response, or the failure otherwise
    pub fn into_ok_page(self) -> Result<FetchedPage, PageFailure> {
        match self {
            Self::Response(page) if page.is_ok() => Ok(page),
            Self::Response(page) => Err(PageFailure::HttpStatus(page.status_code)),
            Self::NetworkError { error } => Err(PageFailure::Network(error)),
        }
    }
}

/// Capability to fetch one URL
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &Url) -> FetchResult;
}

/// Builds an HTTP client with proper configuration
///
/// # Example
///
/// ```no_run
/// use webquery::config::Config;
/// use webquery::crawler::build_http_client;
///
/// let client = build_http_client(&Config::default()).unwrap();
/// ```
pub fn build_http_client(config: &Config) -> Result<Client, reqwest::Error> {
    let timeout = config.crawler.fetch_timeout();

    Client::builder()
        .user_agent(config.user_agent.header_value())
        .timeout(timeout)
        .connect_timeout(timeout.min(Duration::from_secs(10)))
        .gzip(true)
        .brotli(true)
        .build()
}

/// [`PageFetcher`] backed by a reqwest client
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Builds the client from configuration
    pub fn from_config(config: &Config) -> Result<Self, reqwest::Error> {
        Ok(Self::new(build_http_client(config)?))
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &Url) -> FetchResult {
        fetch_url(&self.client, url).await
    }
}

/// Fetches a URL and classifies the result
///
/// | Condition | Result |
/// |-----------|--------|
/// | HTTP 200 | `Response` with body |
/// | Other status | `Response` without body |
/// | Timeout | `NetworkError` |
/// | Connection refused, DNS, TLS | `NetworkError` |
/// | Body read failure | `NetworkError` |
pub async fn fetch_url(client: &Client, url: &Url) -> FetchResult {
    let response = match client.get(url.clone()).send().await {
        Ok(response) => response,
        Err(e) => return classify_error(url, e),
    };

    let status = response.status();
    let final_url = response.url().clone();
    let content_type = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    if status != StatusCode::OK {
        tracing::debug!("{} answered with HTTP {}", url, status.as_u16());
        return FetchResult::Response(FetchedPage {
            final_url,
            status_code: status.as_u16(),
            content_type,
            body: String::new(),
            fetched_at: Utc::now(),
        });
    }

    match response.text().await {
        Ok(body) => FetchResult::Response(FetchedPage {
            final_url,
            status_code: status.as_u16(),
            content_type,
            body,
            fetched_at: Utc::now(),
        }),
        Err(e) => classify_error(url, e),
    }
}

fn classify_error(url: &Url, e: reqwest::Error) -> FetchResult {
    let error = if e.is_timeout() {
        "Request timeout".to_string()
    } else if e.is_connect() {
        "Connection refused".to_string()
    } else if e.is_redirect() {
        "Too many redirects".to_string()
    } else {
        e.to_string()
    };
    tracing::debug!("Fetching {} failed: {}", url, error);
    FetchResult::NetworkError { error }
}
