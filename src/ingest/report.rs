//! Structured result of one ingestion run

use crate::extractor::ExtractedDocument;
use crate::state::PageOutcome;
use chrono::{DateTime, Utc};
use std::fmt;
use url::Url;

/// Coarse status of an ingestion run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IngestStatus {
    /// At least one page was extracted and none failed
    Success,

    /// Some pages were extracted, some failed
    Partial,

    /// Pages were attempted and none could be extracted
    Failed,

    /// Every URL had already been processed by this orchestrator
    Skipped,
}

impl IngestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "Success",
            Self::Partial => "Partial",
            Self::Failed => "Failed",
            Self::Skipped => "Skipped",
        }
    }

    /// Returns true when the run contributed text to the corpus
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success | Self::Partial)
    }

    /// Derives the run status from per-page outcomes
    ///
    /// Pages the deadline kept from starting count against the run like failures.
    /// Only a run where every URL was already processed reports `Skipped`.
    pub fn from_outcomes<'a>(outcomes: impl IntoIterator<Item = &'a PageOutcome>) -> Self {
        let (mut extracted, mut missed) = (0usize, 0usize);
        for outcome in outcomes {
            match outcome {
                PageOutcome::Extracted { .. } => extracted += 1,
                PageOutcome::Failed(_) | PageOutcome::BudgetExhausted => missed += 1,
                PageOutcome::Skipped => {}
            }
        }

        match (extracted, missed) {
            (0, 0) => Self::Skipped,
            (0, _) => Self::Failed,
            (_, 0) => Self::Success,
            _ => Self::Partial,
        }
    }
}

impl fmt::Display for IngestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of one sitemap URL
#[derive(Debug, Clone)]
pub struct PageReport {
    pub url: Url,

    /// Remaining depth of the sitemap node
    pub depth: u32,

    pub outcome: PageOutcome,
}

/// Everything an ingestion run produced
#[derive(Debug, Clone)]
pub struct IngestReport {
    pub seed: Url,
    pub status: IngestStatus,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,

    /// True when the page budget or the deadline cut the run short
    pub truncated: bool,

    /// One entry per flattened sitemap URL, in sitemap order
    pub pages: Vec<PageReport>,

    /// Extracted documents, in sitemap order
    pub documents: Vec<ExtractedDocument>,
}

impl IngestReport {
    /// Report for a seed that was already processed
    pub(crate) fn skipped(seed: Url) -> Self {
        let now = Utc::now();
        Self {
            seed,
            status: IngestStatus::Skipped,
            started_at: now,
            finished_at: now,
            truncated: false,
            pages: Vec::new(),
            documents: Vec::new(),
        }
    }

    /// Aggregated corpus text: every document followed by a newline
    pub fn corpus(&self) -> String {
        let mut corpus = String::new();
        for document in &self.documents {
            corpus.push_str(&document.text);
            corpus.push('\n');
        }
        corpus
    }

    pub fn extracted_count(&self) -> usize {
        self.pages.iter().filter(|p| p.outcome.is_success()).count()
    }

    pub fn failed_count(&self) -> usize {
        self.pages.iter().filter(|p| p.outcome.is_failure()).count()
    }

    pub fn skipped_count(&self) -> usize {
        self.pages.iter().filter(|p| p.outcome.is_skipped()).count()
    }

    /// Looks up the outcome recorded for a URL
    pub fn outcome_for(&self, url: &str) -> Option<&PageOutcome> {
        self.pages
            .iter()
            .find(|p| p.url.as_str() == url)
            .map(|p| &p.outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::PageFailure;

    fn extracted() -> PageOutcome {
        PageOutcome::Extracted { chars: 5 }
    }

    fn failed() -> PageOutcome {
        PageOutcome::Failed(PageFailure::HttpStatus(500))
    }

    #[test]
    fn test_status_from_outcomes() {
        assert_eq!(
            IngestStatus::from_outcomes(&[extracted(), extracted()]),
            IngestStatus::Success
        );
        assert_eq!(
            IngestStatus::from_outcomes(&[extracted(), failed(), PageOutcome::Skipped]),
            IngestStatus::Partial
        );
        assert_eq!(
            IngestStatus::from_outcomes(&[failed(), PageOutcome::Skipped]),
            IngestStatus::Failed
        );
        assert_eq!(
            IngestStatus::from_outcomes(&[PageOutcome::Skipped, PageOutcome::Skipped]),
            IngestStatus::Skipped
        );
    }

    #[test]
    fn test_deadline_cut_run_is_not_skipped() {
        assert_eq!(
            IngestStatus::from_outcomes(&[PageOutcome::Skipped, PageOutcome::BudgetExhausted]),
            IngestStatus::Failed
        );
        assert_eq!(
            IngestStatus::from_outcomes(&[extracted(), PageOutcome::BudgetExhausted]),
            IngestStatus::Partial
        );
        assert_eq!(
            IngestStatus::from_outcomes(&[PageOutcome::Failed(PageFailure::DeadlineExceeded)]),
            IngestStatus::Failed
        );
    }

    #[test]
    fn test_status_strings() {
        assert_eq!(IngestStatus::Success.as_str(), "Success");
        assert_eq!(IngestStatus::Skipped.to_string(), "Skipped");
        assert!(IngestStatus::Partial.is_success());
        assert!(!IngestStatus::Failed.is_success());
    }

    #[test]
    fn test_corpus_joins_documents() {
        let url = Url::parse("https://example.com/").unwrap();
        let mut report = IngestReport::skipped(url.clone());
        for text in ["first", "second"] {
            report.documents.push(ExtractedDocument {
                url: url.clone(),
                final_url: url.clone(),
                title: None,
                text: text.to_string(),
                fetched_at: Utc::now(),
            });
        }
        assert_eq!(report.corpus(), "first\nsecond\n");
    }

    #[test]
    fn test_skipped_report_is_empty() {
        let report = IngestReport::skipped(Url::parse("https://example.com/").unwrap());
        assert_eq!(report.status, IngestStatus::Skipped);
        assert!(report.pages.is_empty());
        assert_eq!(report.corpus(), "");
    }
}
