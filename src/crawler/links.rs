//! Link extractor: fetch one page and list the hrefs it contains

use crate::crawler::fetcher::{FetchedPage, PageFetcher};
use crate::crawler::parser::extract_hrefs_simple;
use crate::state::PageFailure;
use url::Url;

/// The hrefs found on one fetched page
#[derive(Debug, Clone)]
pub struct PageLinks {
    /// The page that was fetched
    pub url: Url,

    /// Unresolved anchor hrefs, `mailto:` excluded
    pub hrefs: Vec<String>,

    /// Set when the page could not be fetched; `hrefs` is then empty
    pub failure: Option<PageFailure>,

    /// The 200 response the hrefs were read from
    pub page: Option<FetchedPage>,
}

impl PageLinks {
    fn failed(url: &Url, failure: PageFailure) -> Self {
        Self {
            url: url.clone(),
            hrefs: Vec::new(),
            failure: Some(failure),
            page: None,
        }
    }
}

/// Fetches a page and returns the hrefs of its anchors
///
/// Any response other than HTTP 200, and any network error, yields an empty list.
/// The failure is logged and recorded on the result, never raised, so the caller can
/// keep crawling other branches.
pub async fn fetch_links(fetcher: &dyn PageFetcher, url: &Url) -> PageLinks {
    let page = match fetcher.fetch(url).await.into_ok_page() {
        Ok(page) => page,
        Err(failure) => {
            tracing::warn!("Failed to retrieve links from {}: {}", url, failure);
            return PageLinks::failed(url, failure);
        }
    };

    let hrefs = extract_hrefs_simple(&page.body);
    tracing::debug!("Found {} links on {}", hrefs.len(), url);

    PageLinks {
        url: url.clone(),
        hrefs,
        failure: None,
        page: Some(page),
    }
}
