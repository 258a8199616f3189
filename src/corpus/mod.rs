//! Corpus assembly, persistence and caching
//!
//! A corpus is the plain text handed to a text-generation model as context. It is
//! assembled from free text, plain-text files and ingested URLs, stored under an
//! identifier and kept in a bounded in-memory cache for repeated lookups.

mod builder;
mod cache;
mod source;
mod store;

pub use builder::CorpusBuilder;
pub use cache::CorpusCache;
pub use source::read_text_file;
pub use store::{CorpusStore, FsCorpusStore};

use thiserror::Error;

/// Errors raised while assembling or storing a corpus
#[derive(Debug, Error)]
pub enum CorpusError {
    #[error("Unsupported source format: {0}")]
    UnsupportedFormat(String),

    #[error("Invalid corpus id '{0}': only ASCII letters, digits, '-' and '_' are allowed")]
    InvalidId(String),

    #[error("Corpus not found: {0}")]
    NotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for corpus operations
pub type CorpusResult<T> = Result<T, CorpusError>;

/// Checks that `id` is usable as a corpus identifier
pub fn validate_id(id: &str) -> CorpusResult<()> {
    let valid = !id.is_empty()
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');

    if valid {
        Ok(())
    } else {
        Err(CorpusError::InvalidId(id.to_string()))
    }
}
