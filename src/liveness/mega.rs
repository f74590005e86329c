//! mega.nz liveness lookups
//!
//! Mega exposes no plain status page; liveness is checked through its
//! request-dispatch API. A file link resolves through a `g` (get) command, a
//! folder link through an `f` (fetch nodes) command. The API answers with a
//! JSON array: a leading negative number is an error code, an object means
//! the node exists.

use rand::Rng;
use regex::Regex;
use reqwest::Client;
use serde_json::json;
use std::sync::OnceLock;

/// Production request-dispatch endpoint
pub const MEGA_API_BASE: &str = "https://g.api.mega.co.nz";

fn mega_link_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^https://mega\.nz/(file|folder)/([\w-]+)#([\w-]+)$").expect("valid regex")
    })
}

/// A parsed mega.nz share link
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MegaLookup {
    File { id: String },
    Folder { id: String },
}

impl MegaLookup {
    /// Parses a share URL; links without the decryption key fragment are
    /// rejected.
    pub fn from_url(url: &str) -> Option<Self> {
        let caps = mega_link_re().captures(url)?;
        let id = caps[2].to_string();
        match &caps[1] {
            "file" => Some(MegaLookup::File { id }),
            "folder" => Some(MegaLookup::Folder { id }),
            _ => None,
        }
    }

    fn node_id(&self) -> &str {
        match self {
            MegaLookup::File { id } | MegaLookup::Folder { id } => id,
        }
    }

    fn request_body(&self) -> serde_json::Value {
        match self {
            MegaLookup::File { id } => json!([{"a": "g", "p": id}]),
            MegaLookup::Folder { .. } => json!([{"a": "f", "c": 1, "r": 1, "ca": 1}]),
        }
    }
}

/// Probes a mega.nz link through the request-dispatch API
///
/// Unparseable links, transport errors and error-code responses all read as
/// dead.
pub async fn probe_mega(client: &Client, api_base: &str, url: &str) -> bool {
    let Some(lookup) = MegaLookup::from_url(url) else {
        tracing::debug!("Not a canonical mega.nz share link: {}", url);
        return false;
    };

    let correlation: u64 = rand::thread_rng().gen_range(0..10_000_000_000);
    let endpoint = format!("{}/cs?id={}&n={}", api_base, correlation, lookup.node_id());

    let response = match client.post(&endpoint).json(&lookup.request_body()).send().await {
        Ok(response) => response,
        Err(e) => {
            tracing::debug!("mega.nz probe failed for {}: {}", url, e);
            return false;
        }
    };

    match response.text().await {
        Ok(body) => classify_response(&body) == ProbeOutcome::Alive,
        Err(e) => {
            tracing::debug!("mega.nz probe body unreadable for {}: {}", url, e);
            false
        }
    }
}

/// What an API response says about the probed node
///
/// `Unknown` covers malformed bodies and is treated as dead by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ProbeOutcome {
    Alive,
    Dead,
    Unknown,
}

fn classify_response(body: &str) -> ProbeOutcome {
    let trimmed = body.trim_start();
    if trimmed.starts_with("[-") {
        ProbeOutcome::Dead
    } else if trimmed.starts_with("[{") {
        ProbeOutcome::Alive
    } else {
        ProbeOutcome::Unknown
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_file_link() {
        let lookup = MegaLookup::from_url("https://mega.nz/file/AbC123-_#keyKEY-123");
        assert_eq!(
            lookup,
            Some(MegaLookup::File {
                id: "AbC123-_".to_string()
            })
        );
    }

    #[test]
    fn test_parse_folder_link() {
        let lookup = MegaLookup::from_url("https://mega.nz/folder/xYz#k");
        assert_eq!(
            lookup,
            Some(MegaLookup::Folder {
                id: "xYz".to_string()
            })
        );
    }

    #[test]
    fn test_link_without_key_rejected() {
        assert_eq!(MegaLookup::from_url("https://mega.nz/file/AbC123"), None);
    }

    #[test]
    fn test_legacy_link_rejected() {
        assert_eq!(MegaLookup::from_url("https://mega.nz/#!AbC!key"), None);
    }

    #[test]
    fn test_file_request_body() {
        let lookup = MegaLookup::File {
            id: "node1".to_string(),
        };
        assert_eq!(lookup.request_body(), json!([{"a": "g", "p": "node1"}]));
    }

    #[test]
    fn test_folder_request_body() {
        let lookup = MegaLookup::Folder {
            id: "node2".to_string(),
        };
        assert_eq!(
            lookup.request_body(),
            json!([{"a": "f", "c": 1, "r": 1, "ca": 1}])
        );
    }

    #[test]
    fn test_response_classification() {
        assert_eq!(
            classify_response(r#"[{"g":"https://..."}]"#),
            ProbeOutcome::Alive
        );
        assert_eq!(classify_response("[-9]"), ProbeOutcome::Dead);
        assert_eq!(classify_response("-3"), ProbeOutcome::Unknown);
        assert_eq!(classify_response(""), ProbeOutcome::Unknown);
    }
}
