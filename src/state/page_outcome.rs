/// Outcome definitions for pages handled during an ingestion run
///
/// Every URL of the flattened sitemap ends up with exactly one outcome.
use std::fmt;

/// Why a page fetch or extraction produced nothing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageFailure {
    /// The server answered with a non-200 status
    HttpStatus(u16),

    /// The request never produced a response (connection refused, timeout, DNS ...)
    Network(String),

    /// The response is not a text document
    NotHtml(String),

    /// The page was fetched but nothing readable was left after extraction
    ExtractionEmpty,

    /// The crawl deadline passed while the request was in flight
    DeadlineExceeded,
}

impl fmt::Display for PageFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::HttpStatus(code) => write!(f, "HTTP {}", code),
            Self::Network(error) => write!(f, "network error: {}", error),
            Self::NotHtml(content_type) => write!(f, "not a text document ({})", content_type),
            Self::ExtractionEmpty => write!(f, "no extractable text"),
            Self::DeadlineExceeded => write!(f, "crawl deadline reached mid-request"),
        }
    }
}

/// Represents what happened to one sitemap URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageOutcome {
    /// Text was extracted and added to the corpus
    Extracted {
        /// Number of characters contributed to the corpus
        chars: usize,
    },

    /// The page was attempted but contributed nothing
    Failed(PageFailure),

    /// The URL was already claimed by this orchestrator
    Skipped,

    /// The crawl deadline passed before the page was started
    BudgetExhausted,
}

impl PageOutcome {
    /// Returns true if the page contributed to the corpus
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Extracted { .. })
    }

    /// Returns true if the page was attempted and failed
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failed(_))
    }

    /// Returns true if no attempt was made for this page in this run
    pub fn is_skipped(&self) -> bool {
        matches!(self, Self::Skipped | Self::BudgetExhausted)
    }

    /// Short label used in per-page log lines
    pub fn label(&self) -> &'static str {
        match self {
            Self::Extracted { .. } => "extracted",
            Self::Failed(PageFailure::HttpStatus(_)) => "http_error",
            Self::Failed(PageFailure::Network(_)) => "network_error",
            Self::Failed(PageFailure::NotHtml(_)) => "not_html",
            Self::Failed(PageFailure::ExtractionEmpty) => "extraction_empty",
            Self::Failed(PageFailure::DeadlineExceeded) => "deadline_exceeded",
            Self::Skipped => "skipped",
            Self::BudgetExhausted => "budget_exhausted",
        }
    }
}

impl fmt::Display for PageOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Extracted { chars } => write!(f, "extracted ({} chars)", chars),
            Self::Failed(reason) => write!(f, "failed: {}", reason),
            Self::Skipped => write!(f, "skipped (already processed)"),
            Self::BudgetExhausted => write!(f, "not started (crawl deadline reached)"),
        }
    }
}
