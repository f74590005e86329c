//! Album-title resolution for catalog cross-reference links
//!
//! Most release URLs carry the title in their slug, which resolves without
//! touching the network. Only slug-less URLs are fetched, politely delayed,
//! and scraped from the release heading. Successful resolutions are memoized
//! for the lifetime of the resolver, so repeated links across posts cost one
//! lookup; misses may be transient and are retried.

use regex::Regex;
use reqwest::Client;
use scraper::{Html, Selector};
use std::collections::HashMap;
use std::sync::OnceLock;
use std::time::Duration;
use tokio::sync::Mutex;

const RELEASE_HEADING_SELECTOR: &str = "h1.MuiTypography-headLineXL";

fn release_slug_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"/release/\d+-([^/?#]+)").expect("valid regex"))
}

/// Resolves catalog release links to album titles
pub struct DiscogsResolver {
    client: Client,
    cache: Mutex<HashMap<String, String>>,
    delay: Duration,
}

impl DiscogsResolver {
    pub fn new(client: Client, delay: Duration) -> Self {
        Self {
            client,
            cache: Mutex::new(HashMap::new()),
            delay,
        }
    }

    /// Resolves one release link
    ///
    /// Successful resolutions are memoized by the exact link string; a miss
    /// may be transient and is retried on the next encounter.
    pub async fn resolve(&self, url: &str) -> Option<String> {
        if let Some(cached) = self.cache.lock().await.get(url) {
            return Some(cached.clone());
        }

        let title = self.lookup(url).await;
        if let Some(title) = &title {
            self.cache
                .lock()
                .await
                .insert(url.to_string(), title.clone());
        }
        title
    }

    /// Resolves a post's catalog links, keeping the ones that yield a title
    pub async fn resolve_all(&self, urls: &[String]) -> Vec<String> {
        let mut titles = Vec::new();
        for url in urls {
            if let Some(title) = self.resolve(url).await {
                titles.push(title);
            }
        }
        titles
    }

    async fn lookup(&self, url: &str) -> Option<String> {
        if let Some(title) = title_from_slug(url) {
            return Some(title);
        }

        let title = match self.fetch_release_page(url).await {
            Ok(body) => title_from_document(&body),
            Err(e) => {
                tracing::debug!("Catalog lookup failed for {}: {}", url, e);
                None
            }
        };
        // Rate-limit courtesy applies only when the network was touched.
        tokio::time::sleep(self.delay).await;
        title
    }

    async fn fetch_release_page(&self, url: &str) -> reqwest::Result<String> {
        self.client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await
    }
}

/// Reads the album title out of the URL slug, when present
fn title_from_slug(url: &str) -> Option<String> {
    let slug = release_slug_re().captures(url)?.get(1)?.as_str();
    let title = slug.replace('-', " ").trim().to_string();
    if title.is_empty() {
        None
    } else {
        Some(title)
    }
}

/// Reads the album title out of a fetched release page
///
/// Release headings read "Artist – Title"; only the part after the en-dash
/// is the album title.
fn title_from_document(html: &str) -> Option<String> {
    let document = Html::parse_document(html);
    let selector = Selector::parse(RELEASE_HEADING_SELECTOR).ok()?;
    let heading = document
        .select(&selector)
        .next()?
        .text()
        .collect::<String>();

    let title = match heading.split_once('–') {
        Some((_, after)) => after.trim().to_string(),
        None => heading.trim().to_string(),
    };
    if title.is_empty() {
        None
    } else {
        Some(title)
    }
}
