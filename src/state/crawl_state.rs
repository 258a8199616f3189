//! Visited-set shared by every ingestion run of one orchestrator

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// What the orchestrator knows about a URL it has seen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VisitStatus {
    /// Claimed for extraction, result not yet recorded
    Claimed,

    /// Text was extracted
    Extracted,

    /// Extraction was attempted and failed; never retried
    Attempted,
}

/// Tracks every URL processed (or being processed) by one orchestrator
///
/// Keys are normalized URL strings. A URL enters the set exactly once, through
/// [`CrawlState::claim`]; later calls only refine its [`VisitStatus`].
#[derive(Debug, Default)]
pub struct CrawlState {
    visited: Mutex<HashMap<String, VisitStatus>>,
}

impl CrawlState {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, VisitStatus>> {
        // A panic while holding the lock cannot leave the map half-updated
        self.visited.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns true if the URL was claimed at any point
    pub fn contains(&self, key: &str) -> bool {
        self.lock().contains_key(key)
    }

    /// Atomically checks and inserts a URL
    ///
    /// Returns true if the caller now owns the URL, false if it was already present.
    pub fn claim(&self, key: &str) -> bool {
        let mut visited = self.lock();
        if visited.contains_key(key) {
            return false;
        }
        visited.insert(key.to_string(), VisitStatus::Claimed);
        true
    }

    /// Records the result of processing a claimed URL
    ///
    /// Inserting a URL that was never claimed counts as claiming it.
    pub fn complete(&self, key: &str, extracted: bool) {
        let status = if extracted {
            VisitStatus::Extracted
        } else {
            VisitStatus::Attempted
        };
        self.lock().insert(key.to_string(), status);
    }

    /// Drops a claim whose work never started
    ///
    /// Only `Claimed` entries are removed; finished URLs stay in the set.
    pub fn release(&self, key: &str) {
        let mut visited = self.lock();
        if visited.get(key) == Some(&VisitStatus::Claimed) {
            visited.remove(key);
        }
    }

    /// Returns the status of a URL, if it was seen
    pub fn status(&self, key: &str) -> Option<VisitStatus> {
        self.lock().get(key).copied()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Returns the number of URLs with the given status
    pub fn count(&self, status: VisitStatus) -> usize {
        self.lock().values().filter(|s| **s == status).count()
    }
}
