use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};

/// A scraped forum message carrying at least one download link
///
/// Identity and equality are defined solely by `id`: two posts with the same
/// id are the same entity for deduplication, regardless of other fields. A
/// post is fully enriched (hoster tag, album titles, liveness) during
/// construction and never mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    /// Normalized subject-link URL identifying the post
    pub id: String,

    /// Thread subject text
    pub reference: String,

    /// Post author, `"unknown"` when the forum omits it
    pub author: String,

    /// Raw message body text
    pub text: String,

    /// Permalinks to earlier posts this one quotes
    pub quotes: Vec<String>,

    /// Hoster URLs, ordered by appearance, deduplicated by the extractor
    #[serde(rename = "downloadLinks")]
    pub download_links: Vec<String>,

    /// Catalog cross-reference links
    #[serde(rename = "discogs")]
    pub discogs_links: Vec<String>,

    /// Image links and embedded image sources
    pub images: Vec<String>,

    /// Album titles resolved from the catalog links
    #[serde(rename = "albumTitles")]
    pub album_titles: Vec<String>,

    /// Dominant file-hosting provider tag
    pub hoster: String,

    /// Whether a download link probed alive at extraction time
    #[serde(rename = "linkAlive")]
    pub link_alive: bool,
}

impl Post {
    /// True when the message body is a reshare opening with a quote banner
    pub fn is_quote_only(&self) -> bool {
        let lower = self.text.to_lowercase();
        lower.starts_with("cita") || lower.starts_with("quote")
    }
}

impl PartialEq for Post {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Post {}

impl Hash for Post {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn post(id: &str, author: &str) -> Post {
        Post {
            id: id.to_string(),
            reference: "ref".to_string(),
            author: author.to_string(),
            text: String::new(),
            quotes: vec![],
            download_links: vec!["https://mega.nz/file/a#b".to_string()],
            discogs_links: vec![],
            images: vec![],
            album_titles: vec![],
            hoster: "mega.nz".to_string(),
            link_alive: true,
        }
    }

    #[test]
    fn test_equality_by_id_only() {
        assert_eq!(post("p1", "alice"), post("p1", "bob"));
        assert_ne!(post("p1", "alice"), post("p2", "alice"));
    }

    #[test]
    fn test_dedup_in_hash_set() {
        let mut set = HashSet::new();
        set.insert(post("p1", "alice"));
        set.insert(post("p1", "bob"));
        set.insert(post("p2", "alice"));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_quote_only_detection() {
        let mut p = post("p1", "alice");
        p.text = "Cita de: dj_tester en ayer".to_string();
        assert!(p.is_quote_only());
        p.text = "Quote from: someone".to_string();
        assert!(p.is_quote_only());
        p.text = "New rip, enjoy".to_string();
        assert!(!p.is_quote_only());
    }

    #[test]
    fn test_json_field_names() {
        let json = serde_json::to_value(post("p1", "alice")).unwrap();
        assert!(json.get("downloadLinks").is_some());
        assert!(json.get("albumTitles").is_some());
        assert!(json.get("discogs").is_some());
        assert!(json.get("linkAlive").is_some());
        assert!(json.get("download_links").is_none());
    }
}
