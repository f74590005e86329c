//! HTML-to-candidate extraction
//!
//! Parses one fetched topic page into candidate posts. Extraction is fully
//! synchronous; enrichment that needs the network (liveness, album titles)
//! happens later so the parsed DOM never lives across a suspension point.

use crate::config::ForumConfig;
use crate::extract::hoster;
use crate::url::strip_session_id;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::sync::OnceLock;

/// A post block before enrichment
///
/// Holds everything the DOM alone can provide. Blocks without download links
/// are never turned into candidates.
#[derive(Debug, Clone)]
pub struct Candidate {
    pub id: String,
    pub reference: String,
    pub author: String,
    pub text: String,
    pub quotes: Vec<String>,
    pub download_links: Vec<String>,
    pub discogs_links: Vec<String>,
    pub images: Vec<String>,
}

fn image_host_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(postimg|imgur|iili)").expect("valid regex"))
}

fn image_ext_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\.(jpg|jpeg|png|gif)$").expect("valid regex"))
}

struct CompiledRules {
    post: Selector,
    subject: Selector,
    author: Selector,
    anchor: Selector,
    image: Selector,
}

impl CompiledRules {
    fn new(rules: &ForumConfig) -> Option<Self> {
        Some(Self {
            post: Selector::parse(&rules.post_selector).ok()?,
            subject: Selector::parse(&rules.subject_selector).ok()?,
            author: Selector::parse(&rules.author_selector).ok()?,
            anchor: Selector::parse("a[href]").ok()?,
            image: Selector::parse("img[src]").ok()?,
        })
    }
}

/// Extracts all candidate posts from one page
pub fn extract_candidates(html: &str, rules: &ForumConfig) -> Vec<Candidate> {
    let Some(compiled) = CompiledRules::new(rules) else {
        tracing::warn!("Invalid forum selectors, skipping page");
        return Vec::new();
    };

    let document = Html::parse_document(html);
    let mut candidates = Vec::new();

    for block in document.select(&compiled.post) {
        if let Some(candidate) = extract_candidate(block, rules, &compiled) {
            candidates.push(candidate);
        }
    }

    candidates
}

fn extract_candidate(
    block: ElementRef,
    rules: &ForumConfig,
    compiled: &CompiledRules,
) -> Option<Candidate> {
    // Anchors inside quoted sub-blocks would double-count links the quoted
    // post already carries.
    let hrefs: Vec<String> = block
        .select(&compiled.anchor)
        .filter(|a| !inside_quote(*a, block, &rules.quote_class))
        .filter_map(|a| a.value().attr("href").map(str::to_string))
        .collect();

    let download_links = dedup_keep_order(
        hrefs
            .iter()
            .filter(|href| hoster::is_hoster_link(href))
            .cloned(),
    );
    if download_links.is_empty() {
        return None;
    }

    let discogs_links: Vec<String> = hrefs
        .iter()
        .filter(|href| href.contains("discogs.com"))
        .cloned()
        .collect();

    let quotes: Vec<String> = hrefs
        .iter()
        .filter(|href| {
            href.contains(&rules.quote_link_host) && href.contains(&rules.quote_link_marker)
        })
        .cloned()
        .collect();

    let mut images: Vec<String> = hrefs
        .iter()
        .filter(|href| image_host_re().is_match(href) || image_ext_re().is_match(href))
        .cloned()
        .collect();
    // Embedded images are collected from the whole block; quoted smileys and
    // banners are as visible as unquoted ones.
    images.extend(
        block
            .select(&compiled.image)
            .filter_map(|img| img.value().attr("src"))
            .filter(|src| !is_smiley(src, &rules.smiley_path))
            .map(str::to_string),
    );

    let subject = block
        .parent()
        .and_then(ElementRef::wrap)
        .and_then(|parent| parent.select(&compiled.subject).next());

    let id = subject
        .and_then(|link| link.value().attr("href"))
        .map(strip_session_id)
        .unwrap_or_default();
    let reference = subject.map(element_text).unwrap_or_default();

    let author = closest(block, "tr")
        .and_then(|row| row.select(&compiled.author).next())
        .map(element_text)
        .unwrap_or_else(|| "unknown".to_string());

    Some(Candidate {
        id,
        reference,
        author,
        text: element_text(block),
        quotes,
        download_links,
        discogs_links,
        images,
    })
}

/// True when the element sits inside a quoted sub-block of `root`
fn inside_quote(element: ElementRef, root: ElementRef, quote_class: &str) -> bool {
    let root_id = root.id();
    element
        .ancestors()
        .take_while(|node| node.id() != root_id)
        .filter_map(ElementRef::wrap)
        .any(|ancestor| ancestor.value().classes().any(|c| c == quote_class))
}

/// Nearest ancestor element with the given tag name
fn closest<'a>(element: ElementRef<'a>, name: &str) -> Option<ElementRef<'a>> {
    element
        .ancestors()
        .filter_map(ElementRef::wrap)
        .find(|e| e.value().name() == name)
}

/// Whitespace-normalized text content of an element
fn element_text(element: ElementRef) -> String {
    element
        .text()
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn is_smiley(src: &str, smiley_path: &str) -> bool {
    src.contains(smiley_path) && src.ends_with(".gif")
}

fn dedup_keep_order(links: impl Iterator<Item = String>) -> Vec<String> {
    let mut seen = Vec::new();
    for link in links {
        if !seen.contains(&link) {
            seen.push(link);
        }
    }
    seen
}
