//! Configuration module for WebQuery
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! A missing key takes its default, so an empty file is a valid configuration.
//!
//! # Example
//!
//! ```no_run
//! use webquery::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("webquery.toml")).unwrap();
//! println!("Crawler will use max depth: {}", config.crawler.max_depth);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{CacheConfig, Config, CrawlerConfig, OutputConfig, UserAgentConfig};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
pub use validation::validate;
