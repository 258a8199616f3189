//! In-memory page graph used by unit tests

use crate::crawler::fetcher::{FetchResult, FetchedPage, PageFetcher};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::time::Duration;
use url::Url;

#[derive(Debug, Clone)]
struct Canned {
    status_code: u16,
    content_type: Option<String>,
    body: String,
}

/// Serves canned responses and counts fetches per URL
///
/// URLs without a canned response fail with a network error. Individual URLs can be
/// made slow or made to panic the fetching task.
#[derive(Debug, Default)]
pub(crate) struct StaticFetcher {
    responses: HashMap<String, Canned>,
    delays: HashMap<String, Duration>,
    panics: HashSet<String>,
    fetches: Mutex<HashMap<String, usize>>,
}

fn key(url: &str) -> String {
    Url::parse(url).expect("test URL").to_string()
}

impl StaticFetcher {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Registers an HTML page answered with 200
    pub(crate) fn page(self, url: &str, html: &str) -> Self {
        self.response(url, 200, Some("text/html; charset=utf-8"), html)
    }

    /// Registers an empty response with the given status
    pub(crate) fn status(self, url: &str, status_code: u16) -> Self {
        self.response(url, status_code, None, "")
    }

    pub(crate) fn response(
        mut self,
        url: &str,
        status_code: u16,
        content_type: Option<&str>,
        body: &str,
    ) -> Self {
        self.responses.insert(
            key(url),
            Canned {
                status_code,
                content_type: content_type.map(str::to_string),
                body: body.to_string(),
            },
        );
        self
    }

    /// Answers `url` only after `delay`
    pub(crate) fn delay(mut self, url: &str, delay: Duration) -> Self {
        self.delays.insert(key(url), delay);
        self
    }

    /// Panics whenever `url` is fetched
    pub(crate) fn panic_on(mut self, url: &str) -> Self {
        self.panics.insert(key(url));
        self
    }

    pub(crate) fn fetch_count(&self, url: &str) -> usize {
        self.fetches
            .lock()
            .unwrap()
            .get(&key(url))
            .copied()
            .unwrap_or(0)
    }

    pub(crate) fn total_fetches(&self) -> usize {
        self.fetches.lock().unwrap().values().sum()
    }
}

#[async_trait]
impl PageFetcher for StaticFetcher {
    async fn fetch(&self, url: &Url) -> FetchResult {
        *self
            .fetches
            .lock()
            .unwrap()
            .entry(url.to_string())
            .or_insert(0) += 1;

        if self.panics.contains(url.as_str()) {
            panic!("fetcher told to panic on {}", url);
        }
        if let Some(delay) = self.delays.get(url.as_str()) {
            tokio::time::sleep(*delay).await;
        }

        match self.responses.get(url.as_str()) {
            Some(canned) => {
                let body = if canned.status_code == 200 {
                    canned.body.clone()
                } else {
                    String::new()
                };
                FetchResult::Response(FetchedPage {
                    final_url: url.clone(),
                    status_code: canned.status_code,
                    content_type: canned.content_type.clone(),
                    body,
                    fetched_at: Utc::now(),
                })
            }
            None => FetchResult::NetworkError {
                error: "Connection refused".to_string(),
            },
        }
    }
}
