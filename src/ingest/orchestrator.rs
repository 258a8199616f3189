//! Ingestion orchestrator - seed-to-corpus coordination
//!
//! One orchestrator owns one [`CrawlState`]. Every `ingest` call on it:
//! - Validates the seed and short-circuits if it was already processed
//! - Builds the sitemap (crawling phase)
//! - Claims every unvisited sitemap URL and extracts its text (extracting phase)
//! - Records each result in the crawl state and returns an [`IngestReport`]

use crate::config::{validate, Config};
use crate::crawler::pool::run_bounded;
use crate::crawler::{HttpFetcher, LinkFetchResult, PageFetcher, SitemapBuilder};
use crate::extractor::{extract_content, extract_from_page, ExtractedDocument};
use crate::ingest::report::{IngestReport, IngestStatus, PageReport};
use crate::state::{CrawlState, PageFailure, PageOutcome};
use crate::url::{parse_seed, visit_key};
use crate::WebQueryError;
use chrono::Utc;
use std::fmt;
use std::sync::Arc;
use tokio::time::Instant;
use url::Url;

/// Phases of one ingestion run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunPhase {
    Idle,
    Crawling,
    Extracting,
    Done,
}

impl RunPhase {
    /// Returns true if `next` directly follows this phase
    pub fn can_advance_to(&self, next: RunPhase) -> bool {
        matches!(
            (self, next),
            (Self::Idle, Self::Crawling)
                | (Self::Idle, Self::Done)
                | (Self::Crawling, Self::Extracting)
                | (Self::Extracting, Self::Done)
        )
    }
}

impl fmt::Display for RunPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Crawling => "crawling",
            Self::Extracting => "extracting",
            Self::Done => "done",
        };
        f.write_str(name)
    }
}

/// What happened to the extraction of one claimed page
enum Extraction {
    Finished(Result<ExtractedDocument, PageFailure>),

    /// The deadline had passed before the page was requested
    NotStarted,

    /// The deadline passed while the request was in flight
    TimedOut,
}

/// Tracks the phase of the run in progress
struct PhaseTracker<'a> {
    seed: &'a Url,
    phase: RunPhase,
}

impl<'a> PhaseTracker<'a> {
    fn new(seed: &'a Url) -> Self {
        Self {
            seed,
            phase: RunPhase::Idle,
        }
    }

    fn advance(&mut self, next: RunPhase) {
        debug_assert!(
            self.phase.can_advance_to(next),
            "invalid phase transition {} -> {}",
            self.phase,
            next
        );
        tracing::debug!("Ingest of {}: {} -> {}", self.seed, self.phase, next);
        self.phase = next;
    }
}

/// Main ingestion coordinator
pub struct Orchestrator {
    config: Arc<Config>,
    fetcher: Arc<dyn PageFetcher>,
    state: CrawlState,
}

impl Orchestrator {
    /// Creates an orchestrator that fetches over HTTP
    ///
    /// # Returns
    ///
    /// * `Ok(Orchestrator)` - Configuration is valid and the HTTP client was built
    /// * `Err(WebQueryError)` - Invalid configuration or HTTP client construction failure
    pub fn new(config: Config) -> Result<Self, WebQueryError> {
        validate(&config)?;
        let fetcher = HttpFetcher::from_config(&config)?;
        Ok(Self::with_fetcher(config, Arc::new(fetcher)))
    }

    /// Creates an orchestrator on top of any fetcher
    pub fn with_fetcher(config: Config, fetcher: Arc<dyn PageFetcher>) -> Self {
        Self {
            config: Arc::new(config),
            fetcher,
            state: CrawlState::new(),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The visited-set shared by every run of this orchestrator
    pub fn state(&self) -> &CrawlState {
        &self.state
    }

    /// Crawls `url`, extracts every page and aggregates the text
    ///
    /// Page-level failures end up in the report; only an invalid seed is an error.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use webquery::{Config, Orchestrator};
    ///
    /// # async fn example() -> Result<(), webquery::WebQueryError> {
    /// let orchestrator = Orchestrator::new(Config::default())?;
    /// let report = orchestrator.ingest("https://example.com/").await?;
    /// println!("{}: {} chars", report.status, report.corpus().len());
    /// # Ok(())
    /// # }
    /// ```
    pub async fn ingest(&self, url: &str) -> Result<IngestReport, WebQueryError> {
        let seed = parse_seed(url).map_err(|source| WebQueryError::InvalidSeed {
            url: url.to_string(),
            source,
        })?;
        let mut phase = PhaseTracker::new(&seed);

        if self.state.contains(&visit_key(&seed)) {
            tracing::info!("Link {} has already been processed. Skipping.", seed);
            phase.advance(RunPhase::Done);
            return Ok(IngestReport::skipped(seed.clone()));
        }

        let started_at = Utc::now();
        let crawler = &self.config.crawler;
        let deadline = crawler.crawl_deadline().map(|d| Instant::now() + d);

        phase.advance(RunPhase::Crawling);
        let mut sitemap = SitemapBuilder::new(Arc::clone(&self.fetcher))
            .with_max_pages(crawler.max_pages)
            .with_concurrency(crawler.max_concurrent_fetches)
            .with_deadline(deadline)
            .build(&seed, crawler.max_depth)
            .await;

        phase.advance(RunPhase::Extracting);
        let entries = sitemap.entries();
        let mut fetched = sitemap.take_fetched();
        let mut outcomes: Vec<Option<PageOutcome>> = vec![None; entries.len()];

        // Claims happen here, in sitemap order, before any worker starts
        let mut claimed: Vec<(usize, Url)> = Vec::new();
        let mut pending: Vec<(Url, Option<LinkFetchResult>)> = Vec::new();
        for (index, entry) in entries.iter().enumerate() {
            let key = visit_key(&entry.url);
            if self.state.claim(&key) {
                claimed.push((index, entry.url.clone()));
                pending.push((entry.url.clone(), fetched.remove(&key)));
            } else {
                tracing::debug!("Link {} has already been processed. Skipping.", entry.url);
                outcomes[index] = Some(PageOutcome::Skipped);
            }
        }

        let results = self.extract_all(pending, deadline).await;

        let mut documents: Vec<ExtractedDocument> = Vec::new();
        for ((index, url), result) in claimed.iter().zip(results) {
            let outcome = self.record(url, result, &mut documents);
            tracing::debug!("{}\t{}", outcome.label(), url);
            outcomes[*index] = Some(outcome);
        }

        let pages: Vec<PageReport> = entries
            .into_iter()
            .zip(outcomes)
            .map(|(entry, outcome)| PageReport {
                url: entry.url,
                depth: entry.depth,
                outcome: outcome.unwrap_or(PageOutcome::Skipped),
            })
            .collect();

        let status = IngestStatus::from_outcomes(pages.iter().map(|p| &p.outcome));
        let cut_by_deadline = pages.iter().any(|p| {
            matches!(
                p.outcome,
                PageOutcome::BudgetExhausted | PageOutcome::Failed(PageFailure::DeadlineExceeded)
            )
        });
        phase.advance(RunPhase::Done);

        let report = IngestReport {
            seed,
            status,
            started_at,
            finished_at: Utc::now(),
            truncated: sitemap.is_truncated() || cut_by_deadline,
            pages,
            documents,
        };

        tracing::info!(
            "Ingest of {} finished: {} ({} extracted, {} failed, {} skipped)",
            report.seed,
            report.status,
            report.extracted_count(),
            report.failed_count(),
            report.skipped_count()
        );

        Ok(report)
    }

    /// Runs the content extractor over the claimed pages on the bounded pool
    ///
    /// Pages expanded during crawling are extracted from the response already
    /// fetched for their links; only the others are requested again. A slot is None
    /// when its worker died.
    async fn extract_all(
        &self,
        pages: Vec<(Url, Option<LinkFetchResult>)>,
        deadline: Option<Instant>,
    ) -> Vec<Option<Extraction>> {
        run_bounded(pages, self.config.crawler.max_concurrent_fetches, |(url, prefetched)| {
            let fetcher = Arc::clone(&self.fetcher);
            async move {
                match prefetched {
                    Some(Ok(page)) => return Extraction::Finished(extract_from_page(&url, &page)),
                    Some(Err(failure)) => return Extraction::Finished(Err(failure)),
                    None => {}
                }

                let Some(deadline) = deadline else {
                    return Extraction::Finished(extract_content(fetcher.as_ref(), &url).await);
                };
                if Instant::now() >= deadline {
                    return Extraction::NotStarted;
                }
                match tokio::time::timeout_at(deadline, extract_content(fetcher.as_ref(), &url)).await {
                    Ok(result) => Extraction::Finished(result),
                    Err(_) => Extraction::TimedOut,
                }
            }
        })
        .await
    }

    /// Stores the result of one extraction in the crawl state
    fn record(
        &self,
        url: &Url,
        result: Option<Extraction>,
        documents: &mut Vec<ExtractedDocument>,
    ) -> PageOutcome {
        let key = visit_key(url);

        match result {
            Some(Extraction::Finished(Ok(document))) => {
                self.state.complete(&key, true);
                let chars = document.text.chars().count();
                tracing::debug!("Extracted {} chars from {}", chars, url);
                documents.push(document);
                PageOutcome::Extracted { chars }
            }
            Some(Extraction::Finished(Err(failure))) => {
                tracing::warn!("Failed to extract content from {}: {}. Skipping.", url, failure);
                self.state.complete(&key, false);
                PageOutcome::Failed(failure)
            }
            Some(Extraction::TimedOut) => {
                tracing::warn!("Crawl deadline reached while extracting {}", url);
                self.state.complete(&key, false);
                PageOutcome::Failed(PageFailure::DeadlineExceeded)
            }
            Some(Extraction::NotStarted) => {
                self.state.release(&key);
                PageOutcome::BudgetExhausted
            }
            None => {
                self.state.complete(&key, false);
                PageOutcome::Failed(PageFailure::Network("extraction worker failed".to_string()))
            }
        }
    }
}
