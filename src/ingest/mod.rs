//! Ingestion: crawl a seed, extract every page, aggregate the corpus

mod orchestrator;
mod report;

pub use orchestrator::{Orchestrator, RunPhase};
pub use report::{IngestReport, IngestStatus, PageReport};

use crate::config::Config;

/// Runs one ingestion with the default configuration on a fresh orchestrator
///
/// The API key is accepted for callers that pass one along and is not used.
pub async fn extract_text_from_url(
    url: &str,
    _api_key: Option<&str>,
) -> crate::Result<IngestReport> {
    let orchestrator = Orchestrator::new(Config::default())?;
    orchestrator.ingest(url).await
}
