//! WebQuery: seed-to-corpus web ingestion
//!
//! This crate crawls a website from a seed URL up to a bounded depth, extracts the
//! readable text of every discovered page and aggregates it into a single corpus
//! that can be handed to a text-generation model as context.

pub mod config;
pub mod corpus;
pub mod crawler;
pub mod extractor;
pub mod ingest;
pub mod state;
pub mod url;

use thiserror::Error;

/// Main error type for WebQuery operations
#[derive(Debug, Error)]
pub enum WebQueryError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Invalid seed URL '{url}': {source}")]
    InvalidSeed { url: String, source: UrlError },

    #[error("URL error: {0}")]
    UrlError(#[from] UrlError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Corpus error: {0}")]
    Corpus(#[from] corpus::CorpusError),

    #[error("Sitemap rendering error: {0}")]
    Sitemap(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing host in URL")]
    MissingHost,
}

/// Result type alias for WebQuery operations
pub type Result<T> = std::result::Result<T, WebQueryError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::Config;
pub use ingest::{extract_text_from_url, IngestReport, IngestStatus, Orchestrator};
pub use state::{CrawlState, PageOutcome};
pub use url::{parse_seed, resolve_href};
