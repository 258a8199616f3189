//! Crawler module for page fetching and link discovery
//!
//! This module contains the crawling side of ingestion:
//! - HTTP fetching behind the `PageFetcher` trait
//! - HTML parsing and anchor extraction
//! - The link extractor (fetch one page, list its hrefs)
//! - The sitemap builder (depth-bounded, deduplicated link expansion)

mod fetcher;
mod links;
mod parser;
pub(crate) mod pool;
mod sitemap;

#[cfg(test)]
pub(crate) mod testing;

pub use fetcher::{build_http_client, fetch_url, FetchResult, FetchedPage, HttpFetcher, PageFetcher};
pub use links::{fetch_links, PageLinks};
pub use parser::{extract_hrefs_simple, parse_html, ParsedPage};
pub use sitemap::{LinkFetchResult, Sitemap, SitemapBuilder, SitemapEntry, SitemapNode};

use crate::config::Config;
use std::sync::Arc;
use url::Url;

/// Builds a sitemap for `seed` with the crawler settings from `config`
///
/// Uses `config.crawler.max_depth` as the depth budget. The deadline, when
/// configured, starts counting now.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use webquery::config::Config;
/// use webquery::crawler::{build_sitemap, HttpFetcher};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = Config::default();
/// let fetcher = Arc::new(HttpFetcher::from_config(&config)?);
/// let seed = webquery::url::parse_seed("https://example.com/")?;
/// let sitemap = build_sitemap(&config, fetcher, &seed).await;
/// println!("{}", sitemap.to_xml()?);
/// # Ok(())
/// # }
/// ```
pub async fn build_sitemap(config: &Config, fetcher: Arc<dyn PageFetcher>, seed: &Url) -> Sitemap {
    let deadline = config
        .crawler
        .crawl_deadline()
        .map(|d| tokio::time::Instant::now() + d);

    SitemapBuilder::new(fetcher)
        .with_max_pages(config.crawler.max_pages)
        .with_concurrency(config.crawler.max_concurrent_fetches)
        .with_deadline(deadline)
        .build(seed, config.crawler.max_depth)
        .await
}
