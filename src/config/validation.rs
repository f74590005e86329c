use crate::config::types::{Config, ForumConfig, ScraperConfig, StorageConfig};
use crate::ConfigError;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_scraper_config(&config.scraper)?;
    validate_forum_config(&config.forum)?;
    validate_storage_config(&config.storage)?;

    if config.user_agent.browser_identity.trim().is_empty() {
        return Err(ConfigError::Validation(
            "browser_identity cannot be empty".to_string(),
        ));
    }

    Ok(())
}

fn validate_scraper_config(config: &ScraperConfig) -> Result<(), ConfigError> {
    if config.workers < 1 || config.workers > 32 {
        return Err(ConfigError::Validation(format!(
            "workers must be between 1 and 32, got {}",
            config.workers
        )));
    }

    if config.fetch_timeout_secs < 1 {
        return Err(ConfigError::Validation(
            "fetch_timeout_secs must be >= 1".to_string(),
        ));
    }

    if config.connect_timeout_secs < 1 {
        return Err(ConfigError::Validation(
            "connect_timeout_secs must be >= 1".to_string(),
        ));
    }

    if config.probe_timeout_secs < 1 {
        return Err(ConfigError::Validation(
            "probe_timeout_secs must be >= 1".to_string(),
        ));
    }

    Ok(())
}

fn validate_forum_config(config: &ForumConfig) -> Result<(), ConfigError> {
    if config.board_page_size < 1 || config.topic_page_size < 1 {
        return Err(ConfigError::Validation(format!(
            "page sizes must be >= 1, got board={} topic={}",
            config.board_page_size, config.topic_page_size
        )));
    }

    let selectors = [
        ("nav-selector", &config.nav_selector),
        ("nav-fallback-selector", &config.nav_fallback_selector),
        ("post-selector", &config.post_selector),
        ("subject-selector", &config.subject_selector),
        ("author-selector", &config.author_selector),
        ("board-row-selector", &config.board_row_selector),
    ];
    for (name, selector) in selectors {
        if selector.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "{} cannot be empty",
                name
            )));
        }
        if scraper::Selector::parse(selector).is_err() {
            return Err(ConfigError::Validation(format!(
                "{} is not a valid selector: '{}'",
                name, selector
            )));
        }
    }

    Ok(())
}

fn validate_storage_config(config: &StorageConfig) -> Result<(), ConfigError> {
    if config.posts_path.trim().is_empty() || config.visited_path.trim().is_empty() {
        return Err(ConfigError::Validation(
            "storage paths cannot be empty".to_string(),
        ));
    }

    if config.posts_path == config.visited_path {
        return Err(ConfigError::Validation(
            "posts-path and visited-path must be different files".to_string(),
        ));
    }

    Ok(())
}
