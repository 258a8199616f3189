//! State module for tracking ingestion progress
//!
//! # Components
//!
//! - `CrawlState`: the visited-set owned by one orchestrator, shared across its runs
//! - `PageOutcome`: what happened to each URL of a run (extracted, failed, skipped)

mod crawl_state;
mod page_outcome;

// Re-export main types
pub use crawl_state::{CrawlState, VisitStatus};
pub use page_outcome::{PageFailure, PageOutcome};
