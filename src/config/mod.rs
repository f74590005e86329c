//! Configuration module for forumharvest
//!
//! Handles loading, parsing, and validating TOML configuration files. Every
//! section carries defaults matching the forum the scraper was written for,
//! so a config file only needs to override what differs.

mod parser;
mod types;
mod validation;

pub use types::{Config, ForumConfig, ScraperConfig, StorageConfig, UserAgentConfig};

pub use parser::{compute_config_hash, load_config, load_config_with_hash};
