//! In-memory corpus cache
//!
//! Keeps recently used corpora keyed by corpus id. The cache holds at most
//! `max-entries` corpora; inserting into a full cache evicts the least recently
//! used entry.

use crate::config::CacheConfig;
use crate::corpus::{CorpusResult, CorpusStore};
use chrono::{DateTime, Utc};
use std::collections::HashMap;

/// A cached corpus with its bookkeeping
#[derive(Debug, Clone)]
struct CachedCorpus {
    text: String,

    /// When this entry was inserted
    cached_at: DateTime<Utc>,

    /// Monotonic use counter, higher is more recent
    last_used: u64,
}

#[derive(Debug)]
pub struct CorpusCache {
    entries: HashMap<String, CachedCorpus>,
    max_entries: usize,
    clock: u64,
}

impl CorpusCache {
    /// Creates a cache holding at most `max_entries` corpora (at least one)
    pub fn new(max_entries: usize) -> Self {
        Self {
            entries: HashMap::new(),
            max_entries: max_entries.max(1),
            clock: 0,
        }
    }

    pub fn from_config(config: &CacheConfig) -> Self {
        Self::new(config.max_entries)
    }

    fn tick(&mut self) -> u64 {
        self.clock += 1;
        self.clock
    }

    /// Inserts or replaces the corpus for `id`
    pub fn insert(&mut self, id: &str, text: String) {
        if !self.entries.contains_key(id) && self.entries.len() >= self.max_entries {
            self.evict_least_recent();
        }

        let last_used = self.tick();
        self.entries.insert(
            id.to_string(),
            CachedCorpus {
                text,
                cached_at: Utc::now(),
                last_used,
            },
        );
    }

    /// Returns the cached corpus and marks it as recently used
    pub fn get(&mut self, id: &str) -> Option<&str> {
        let now = self.tick();
        let entry = self.entries.get_mut(id)?;
        entry.last_used = now;
        Some(entry.text.as_str())
    }

    /// Returns true if `id` is cached, without touching its recency
    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    pub fn remove(&mut self, id: &str) -> Option<String> {
        self.entries.remove(id).map(|entry| entry.text)
    }

    /// When the corpus for `id` was cached
    pub fn cached_at(&self, id: &str) -> Option<DateTime<Utc>> {
        self.entries.get(id).map(|entry| entry.cached_at)
    }

    /// Returns the corpus for `id`, loading it from `store` on a miss
    ///
    /// # Returns
    ///
    /// * `Ok(Some(text))` - Cached or freshly loaded corpus
    /// * `Ok(None)` - Neither the cache nor the store knows `id`
    /// * `Err(CorpusError)` - The store failed or `id` is invalid
    pub fn get_or_load(
        &mut self,
        id: &str,
        store: &dyn CorpusStore,
    ) -> CorpusResult<Option<String>> {
        if let Some(text) = self.get(id) {
            return Ok(Some(text.to_string()));
        }

        let Some(text) = store.get(id)? else {
            return Ok(None);
        };

        tracing::debug!("Corpus '{}' loaded from store", id);
        self.insert(id, text.clone());
        Ok(Some(text))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.max_entries
    }

    fn evict_least_recent(&mut self) {
        let oldest = self
            .entries
            .iter()
            .min_by_key(|(_, entry)| entry.last_used)
            .map(|(id, _)| id.clone());

        if let Some(id) = oldest {
            tracing::debug!("Evicting corpus '{}' from cache", id);
            self.entries.remove(&id);
        }
    }
}
