//! Pagination discovery and page-URL construction
//!
//! The forum paginates by item offset, not page number: page N of a topic
//! lives at `<base><(N-1)*15>.html`, page N of a board replaces the offset
//! segment with `(N-1)*40`. Total page counts are discovered from the first
//! page's navigation links, with a body-text fallback for topics.

use crate::config::ForumConfig;
use crate::scan::fetcher::fetch_html;
use crate::url::strip_session_id;
use regex::Regex;
use reqwest::Client;
use scraper::{Html, Selector};
use std::sync::OnceLock;
use url::Url;

/// The two levels of paginated forum resources
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    /// A board page lists topics
    Board,
    /// A topic page lists posts
    Topic,
}

fn topic_offset_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\.\d+\.html$").expect("valid regex"))
}

fn board_offset_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\.\d+").expect("valid regex"))
}

fn page_of_total_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[Pp]ágina\s+\d+\s+de\s+(\d+)").expect("valid regex"))
}

/// Strips the trailing page offset from a canonical topic URL
///
/// `.../topic,189337.17475.html` becomes `.../topic,189337.`; appending an
/// offset plus `.html` yields a concrete page URL.
pub fn topic_base_url(topic_url: &str) -> String {
    let clean = strip_session_id(topic_url);
    if topic_offset_re().is_match(&clean) {
        return topic_offset_re().replace(&clean, ".").into_owned();
    }
    // Canonical first-page URLs omit the offset segment entirely.
    match clean.strip_suffix(".html") {
        Some(stem) => format!("{}.", stem),
        None => clean,
    }
}

/// Builds the URL of one topic page
pub fn topic_page_url(base_url: &str, page: u32, page_size: u32) -> String {
    let offset = (page - 1) * page_size;
    format!("{}{}.html", base_url, offset)
}

/// Builds the URL of one board page by rewriting the offset segment
pub fn board_page_url(board_url: &str, page: u32, page_size: u32) -> String {
    let offset = (page - 1) * page_size;
    board_offset_re()
        .replace(board_url, format!(".{}", offset))
        .into_owned()
}

/// Determines how many pages a resource has
///
/// Fetches the resource's first page and reads its pagination controls. Any
/// fetch failure degrades to a single page: pagination discovery must never
/// abort a scan.
pub async fn total_pages(
    client: &Client,
    rules: &ForumConfig,
    url: &str,
    kind: ResourceKind,
) -> u32 {
    let first_page = match kind {
        ResourceKind::Topic => topic_page_url(&topic_base_url(url), 1, rules.topic_page_size),
        ResourceKind::Board => strip_session_id(url),
    };

    match fetch_html(client, &first_page).await {
        Ok(body) => count_pages_in_document(&body, rules, kind),
        Err(e) => {
            tracing::warn!("Pagination discovery failed for {}: {}, assuming 1 page", first_page, e);
            1
        }
    }
}

/// Counts pages from a fetched first page
pub fn count_pages_in_document(html: &str, rules: &ForumConfig, kind: ResourceKind) -> u32 {
    let document = Html::parse_document(html);

    let nav_texts = |selector: &str| -> Vec<String> {
        match Selector::parse(selector) {
            Ok(sel) => document
                .select(&sel)
                .map(|el| el.text().collect::<String>().trim().to_string())
                .collect(),
            Err(_) => Vec::new(),
        }
    };

    let mut links = nav_texts(&rules.nav_selector);

    match kind {
        ResourceKind::Board => {
            // Boards render every page number; the largest wins.
            links
                .iter()
                .filter_map(|text| text.parse::<u32>().ok())
                .max()
                .unwrap_or(1)
        }
        ResourceKind::Topic => {
            if links.is_empty() {
                links = nav_texts(&rules.nav_fallback_selector);
            }

            if links.is_empty() {
                return count_pages_from_body(&document);
            }

            // The last link is usually the highest page number; when it is a
            // "next" control, the second-to-last holds the number instead.
            if let Some(last) = links.last() {
                if let Ok(n) = last.parse::<u32>() {
                    return n;
                }
            }
            if links.len() > 1 {
                if let Ok(n) = links[links.len() - 2].parse::<u32>() {
                    return n;
                }
            }
            1
        }
    }
}

/// Scans the page body for a localized "page X of N" phrase
fn count_pages_from_body(document: &Html) -> u32 {
    let body_text = document.root_element().text().collect::<String>();
    page_of_total_re()
        .captures(&body_text)
        .and_then(|caps| caps[1].parse().ok())
        .unwrap_or(1)
}

/// Extracts topic root URLs from one board page
///
/// Takes the first link of each topic row, resolves it against the page URL,
/// and strips session ids. Dedup across pages is the caller's concern.
pub fn topics_on_board_page(html: &str, rules: &ForumConfig, page_url: &str) -> Vec<String> {
    let document = Html::parse_document(html);
    let mut topics = Vec::new();

    let Ok(row_selector) = Selector::parse(&rules.board_row_selector) else {
        return topics;
    };
    let Ok(link_selector) = Selector::parse("a[href]") else {
        return topics;
    };
    let base = Url::parse(page_url).ok();

    for row in document.select(&row_selector) {
        let Some(link) = row.select(&link_selector).next() else {
            continue;
        };
        let Some(href) = link.value().attr("href") else {
            continue;
        };

        let absolute = match &base {
            Some(base) => base
                .join(href)
                .map(|u| u.to_string())
                .unwrap_or_else(|_| href.to_string()),
            None => href.to_string(),
        };
        topics.push(strip_session_id(&absolute));
    }

    topics
}
