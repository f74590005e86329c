//! Forumharvest: a resumable forum scraper for file-hoster download links
//!
//! This crate crawls a paginated web forum, extracts posts that carry
//! file-hosting download links, verifies that at least one link per post is
//! still reachable, and persists results incrementally so repeated runs never
//! re-fetch already-visited pages.

pub mod config;
pub mod discogs;
pub mod extract;
pub mod liveness;
pub mod pages;
pub mod scan;
pub mod store;
pub mod url;

use thiserror::Error;

/// Main error type for forumharvest operations
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Invalid page spec term: {term}")]
    PageSpec { term: String },

    #[error("HTTP status {status} for {url}")]
    HttpStatus { url: String, status: u16 },

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

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
}

/// Errors from the JSON-file post and visited-URL stores
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error for {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("JSON error for {path}: {source}")]
    Json {
        path: String,
        source: serde_json::Error,
    },
}

/// Result type alias for forumharvest operations
pub type Result<T> = std::result::Result<T, HarvestError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for store operations
pub type StoreResult<T> = std::result::Result<T, StoreError>;

// Re-export commonly used types
pub use config::Config;
pub use extract::Post;
pub use scan::{Orchestrator, Outcome, Progress, ScanReport};
pub use url::strip_session_id;
