//! Sitemap builder
//!
//! Builds the tree of URLs reachable from a seed within a depth budget. Each node
//! stores its *remaining* depth: the seed carries the full budget, its children one
//! less, and nodes at depth 0 are leaves that are never fetched for links.
//!
//! Expansion runs one level at a time. All nodes of a level are fetched concurrently,
//! then their links are attached in frontier order, so the tree only depends on the
//! page graph and not on which fetch finished first. A URL is attached the first time
//! it is discovered and never again; because levels are expanded in hop order, that
//! first discovery is always at the smallest hop distance from the seed.
//!
//! The response of every link fetch is kept on the sitemap, so content extraction
//! can reuse it instead of requesting the page a second time.

use crate::crawler::fetcher::{FetchedPage, PageFetcher};
use crate::crawler::links::{fetch_links, PageLinks};
use crate::crawler::pool::run_bounded;
use crate::url::{resolve_href, visit_key};
use crate::WebQueryError;
use serde::Serialize;
use crate::state::PageFailure;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::time::Instant;
use url::Url;

/// Namespace of the sitemaps.org protocol
const SITEMAP_XMLNS: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";

/// One URL of the sitemap tree
#[derive(Debug, Clone)]
pub struct SitemapNode {
    pub url: Url,

    /// Remaining depth budget; 0 means the node is not expanded
    pub depth: u32,

    children: Vec<usize>,
}

/// A flattened sitemap entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SitemapEntry {
    pub url: Url,
    pub depth: u32,
}

/// 200 response of a link fetch, or why there was none
pub type LinkFetchResult = Result<FetchedPage, PageFailure>;

/// Tree of discovered URLs rooted at the seed
///
/// Nodes live in an arena; index 0 is the seed.
#[derive(Debug, Clone)]
pub struct Sitemap {
    nodes: Vec<SitemapNode>,
    truncated: bool,
    failed_fetches: usize,

    /// Link fetch results keyed by visit key; leaves and unstarted nodes are absent
    fetched: HashMap<String, LinkFetchResult>,
}

/// What happened to one link fetch of a level
enum LinkFetch {
    Done(PageLinks),
    NotStarted,
    TimedOut,
}

#[derive(Serialize)]
#[serde(rename = "urlset")]
struct UrlSet<'a> {
    #[serde(rename = "@xmlns")]
    xmlns: &'static str,
    url: Vec<UrlElement<'a>>,
}

#[derive(Serialize)]
struct UrlElement<'a> {
    loc: &'a str,
}

impl Sitemap {
    /// Creates a sitemap holding only the seed
    pub fn new(seed: Url, depth: u32) -> Self {
        Self {
            nodes: vec![SitemapNode {
                url: seed,
                depth,
                children: Vec::new(),
            }],
            truncated: false,
            failed_fetches: 0,
            fetched: HashMap::new(),
        }
    }

    pub fn root(&self) -> &SitemapNode {
        &self.nodes[0]
    }

    /// Number of nodes, seed included
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false: a sitemap contains at least its seed
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// True when the page budget or the deadline stopped the expansion early
    pub fn is_truncated(&self) -> bool {
        self.truncated
    }

    /// Number of pages whose links could not be retrieved
    pub fn failed_fetches(&self) -> usize {
        self.failed_fetches
    }

    /// Children of a node, in the order their links appeared on the page
    pub fn children<'a>(&'a self, node: &'a SitemapNode) -> impl Iterator<Item = &'a SitemapNode> + 'a {
        node.children.iter().map(move |&i| &self.nodes[i])
    }

    /// The link fetch result recorded for `url`, if it was fetched
    pub fn fetched(&self, url: &Url) -> Option<&LinkFetchResult> {
        self.fetched.get(&visit_key(url))
    }

    /// Moves the recorded link fetch results out of the sitemap
    pub fn take_fetched(&mut self) -> HashMap<String, LinkFetchResult> {
        std::mem::take(&mut self.fetched)
    }

    fn push_child(&mut self, parent: usize, url: Url, depth: u32) -> usize {
        let index = self.nodes.len();
        self.nodes.push(SitemapNode {
            url,
            depth,
            children: Vec::new(),
        });
        self.nodes[parent].children.push(index);
        index
    }

    /// Flattens the tree in document order (pre-order: parent, then each subtree)
    pub fn entries(&self) -> Vec<SitemapEntry> {
        let mut entries = Vec::with_capacity(self.nodes.len());
        let mut stack = vec![0usize];

        while let Some(index) = stack.pop() {
            let node = &self.nodes[index];
            entries.push(SitemapEntry {
                url: node.url.clone(),
                depth: node.depth,
            });
            stack.extend(node.children.iter().rev());
        }

        entries
    }

    /// Flattened URL strings in document order
    pub fn flatten(&self) -> Vec<String> {
        self.entries()
            .into_iter()
            .map(|entry| entry.url.to_string())
            .collect()
    }

    /// Renders the sitemap as a sitemaps.org `urlset` document
    pub fn to_xml(&self) -> Result<String, WebQueryError> {
        let entries = self.entries();
        let urlset = UrlSet {
            xmlns: SITEMAP_XMLNS,
            url: entries
                .iter()
                .map(|entry| UrlElement {
                    loc: entry.url.as_str(),
                })
                .collect(),
        };

        quick_xml::se::to_string(&urlset).map_err(|e| WebQueryError::Sitemap(e.to_string()))
    }
}

/// Builds sitemaps by following links from a seed
pub struct SitemapBuilder {
    fetcher: Arc<dyn PageFetcher>,
    max_pages: usize,
    concurrency: usize,
    deadline: Option<Instant>,
}

impl SitemapBuilder {
    pub fn new(fetcher: Arc<dyn PageFetcher>) -> Self {
        Self {
            fetcher,
            max_pages: usize::MAX,
            concurrency: 1,
            deadline: None,
        }
    }

    /// Caps the number of nodes (seed included)
    pub fn with_max_pages(mut self, max_pages: usize) -> Self {
        self.max_pages = max_pages.max(1);
        self
    }

    /// Number of link fetches allowed in flight at once
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Stops expanding once the deadline has passed
    pub fn with_deadline(mut self, deadline: Option<Instant>) -> Self {
        self.deadline = deadline;
        self
    }

    fn deadline_passed(&self) -> bool {
        self.deadline.is_some_and(|d| Instant::now() >= d)
    }

    /// Crawls from `seed` following links up to `depth` hops
    ///
    /// `depth == 0` returns the seed alone without fetching anything.
    pub async fn build(&self, seed: &Url, depth: u32) -> Sitemap {
        let mut sitemap = Sitemap::new(seed.clone(), depth);
        let mut discovered: HashSet<String> = HashSet::from([visit_key(seed)]);
        let mut frontier: Vec<usize> = if depth > 0 { vec![0] } else { Vec::new() };

        while !frontier.is_empty() {
            if self.deadline_passed() {
                tracing::warn!(
                    "Crawl deadline reached with {} pages left to expand",
                    frontier.len()
                );
                sitemap.truncated = true;
                break;
            }

            let urls: Vec<Url> = frontier
                .iter()
                .map(|&i| sitemap.nodes[i].url.clone())
                .collect();
            let pages = self.fetch_level(urls).await;

            let mut next = Vec::new();
            'level: for (&parent, fetch) in frontier.iter().zip(pages) {
                let base = sitemap.nodes[parent].url.clone();
                let key = visit_key(&base);

                let page = match fetch {
                    Some(LinkFetch::Done(page)) => page,
                    Some(LinkFetch::NotStarted) => {
                        sitemap.truncated = true;
                        continue;
                    }
                    Some(LinkFetch::TimedOut) => {
                        tracing::warn!("Crawl deadline reached while fetching {}", base);
                        sitemap.truncated = true;
                        sitemap.fetched.insert(key, Err(PageFailure::DeadlineExceeded));
                        continue;
                    }
                    None => {
                        sitemap.failed_fetches += 1;
                        sitemap.fetched.insert(
                            key,
                            Err(PageFailure::Network("link fetch worker failed".to_string())),
                        );
                        continue;
                    }
                };

                let hrefs = page.hrefs;
                match (page.failure, page.page) {
                    (Some(failure), _) => {
                        sitemap.failed_fetches += 1;
                        sitemap.fetched.insert(key, Err(failure));
                        continue;
                    }
                    (None, Some(fetched)) => {
                        sitemap.fetched.insert(key, Ok(fetched));
                    }
                    (None, None) => {}
                }

                let child_depth = sitemap.nodes[parent].depth - 1;

                for href in &hrefs {
                    let Some(url) = resolve_href(&base, href) else {
                        tracing::trace!("Dropping unresolvable href '{}' on {}", href, base);
                        continue;
                    };

                    if !discovered.insert(visit_key(&url)) {
                        continue;
                    }

                    if sitemap.nodes.len() >= self.max_pages {
                        tracing::warn!(
                            "Page budget of {} reached, sitemap truncated",
                            self.max_pages
                        );
                        sitemap.truncated = true;
                        break 'level;
                    }

                    let child = sitemap.push_child(parent, url, child_depth);
                    if child_depth > 0 {
                        next.push(child);
                    }
                }
            }

            if sitemap.truncated {
                break;
            }
            frontier = next;
        }

        tracing::info!(
            "Sitemap for {} has {} pages ({} link fetches failed)",
            seed,
            sitemap.len(),
            sitemap.failed_fetches
        );

        sitemap
    }

    /// Fetches the links of every URL of one level
    ///
    /// A slot is None when its worker died.
    async fn fetch_level(&self, urls: Vec<Url>) -> Vec<Option<LinkFetch>> {
        let deadline = self.deadline;

        run_bounded(urls, self.concurrency, |url| {
            let fetcher = Arc::clone(&self.fetcher);
            async move {
                let Some(deadline) = deadline else {
                    return LinkFetch::Done(fetch_links(fetcher.as_ref(), &url).await);
                };
                if Instant::now() >= deadline {
                    return LinkFetch::NotStarted;
                }
                match tokio::time::timeout_at(deadline, fetch_links(fetcher.as_ref(), &url)).await {
                    Ok(links) => LinkFetch::Done(links),
                    Err(_) => LinkFetch::TimedOut,
                }
            }
        })
        .await
    }
}
