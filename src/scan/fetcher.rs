//! HTTP client construction and page fetching
//!
//! Two clients are used: a page client with generous timeouts for forum and
//! catalog pages, and a short-timeout probe client for liveness checks.

use crate::config::{ScraperConfig, UserAgentConfig};
use crate::url::strip_session_id;
use crate::{HarvestError, Result};
use reqwest::Client;
use std::time::Duration;

/// Builds the HTTP client used for page fetches
pub fn build_page_client(
    user_agent: &UserAgentConfig,
    scraper: &ScraperConfig,
) -> std::result::Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(user_agent.browser_identity.clone())
        .timeout(Duration::from_secs(scraper.fetch_timeout_secs))
        .connect_timeout(Duration::from_secs(scraper.connect_timeout_secs))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Builds the short-timeout HTTP client used for liveness probes
pub fn build_probe_client(
    user_agent: &UserAgentConfig,
    scraper: &ScraperConfig,
) -> std::result::Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(user_agent.browser_identity.clone())
        .timeout(Duration::from_secs(scraper.probe_timeout_secs))
        .connect_timeout(Duration::from_secs(scraper.probe_timeout_secs))
        // Redirect statuses are liveness signals; following them would hide
        // the 302 some hosters answer with.
        .redirect(reqwest::redirect::Policy::none())
        .build()
}

/// Fetches a page and returns its body
///
/// The URL is session-id-normalized before going on the wire. Non-success
/// statuses are reported as errors; the caller decides whether that is fatal
/// (page-spec resolution) or degradable (pagination discovery).
pub async fn fetch_html(client: &Client, url: &str) -> Result<String> {
    let clean_url = strip_session_id(url);

    let response = client
        .get(&clean_url)
        .send()
        .await
        .map_err(HarvestError::Reqwest)?;

    let status = response.status();
    if !status.is_success() {
        return Err(HarvestError::HttpStatus {
            url: clean_url,
            status: status.as_u16(),
        });
    }

    Ok(response.text().await?)
}
