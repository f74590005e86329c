//! Hoster keyword table and dominant-hoster classification
//!
//! A link belongs to a hoster when its URL contains the hoster's keyword,
//! case-insensitively. One link may count toward several hosters; the table
//! also carries each hoster's liveness-check policy.

/// Sentinel tag for posts whose links match no known hoster
pub const UNKNOWN_HOSTER: &str = "unknown";

/// How a hoster's links are checked for liveness
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LivenessPolicy {
    /// No reliable check endpoint; always reported alive
    AlwaysAlive,
    /// HEAD probe; alive iff the status is in the accepted set
    Head(&'static [u16]),
    /// The mega.nz request-dispatch protocol
    Mega,
}

/// One known file-hosting provider
#[derive(Debug, Clone, Copy)]
pub struct HosterRule {
    pub keyword: &'static str,
    pub policy: LivenessPolicy,
}

/// Known hosters, in tie-break priority order
pub const HOSTERS: &[HosterRule] = &[
    HosterRule {
        keyword: "swisstransfer",
        policy: LivenessPolicy::AlwaysAlive,
    },
    HosterRule {
        keyword: "mega.nz",
        policy: LivenessPolicy::Mega,
    },
    HosterRule {
        keyword: "terabox",
        policy: LivenessPolicy::Head(&[200, 302]),
    },
    HosterRule {
        keyword: "mediafire",
        policy: LivenessPolicy::Head(&[200]),
    },
    HosterRule {
        keyword: "rapidgator",
        policy: LivenessPolicy::Head(&[200, 302]),
    },
    HosterRule {
        keyword: "drive",
        policy: LivenessPolicy::AlwaysAlive,
    },
    HosterRule {
        keyword: "dropbox",
        policy: LivenessPolicy::AlwaysAlive,
    },
    HosterRule {
        keyword: "wetransfer",
        policy: LivenessPolicy::AlwaysAlive,
    },
];

/// Returns true when the URL matches any known hoster keyword
pub fn is_hoster_link(href: &str) -> bool {
    let lower = href.to_lowercase();
    HOSTERS.iter().any(|h| lower.contains(h.keyword))
}

/// Picks the dominant hoster for a set of download links
///
/// Counts case-insensitive keyword hits per hoster and returns the one with
/// the most. Ties are broken by table order, which keeps the result
/// deterministic across runs. No match yields [`UNKNOWN_HOSTER`].
pub fn classify(links: &[String]) -> &'static str {
    let mut counts = vec![0usize; HOSTERS.len()];

    for link in links {
        let lower = link.to_lowercase();
        for (i, hoster) in HOSTERS.iter().enumerate() {
            if lower.contains(hoster.keyword) {
                counts[i] += 1;
            }
        }
    }

    let mut best: Option<usize> = None;
    for (i, &count) in counts.iter().enumerate() {
        if count > 0 && best.map_or(true, |b| count > counts[b]) {
            best = Some(i);
        }
    }

    best.map_or(UNKNOWN_HOSTER, |i| HOSTERS[i].keyword)
}

/// Looks up the liveness policy for a hoster tag
///
/// Unknown tags get [`LivenessPolicy::AlwaysAlive`]: a classification miss
/// must never suppress a post that carries links.
pub fn policy_for(tag: &str) -> LivenessPolicy {
    HOSTERS
        .iter()
        .find(|h| h.keyword.eq_ignore_ascii_case(tag))
        .map(|h| h.policy)
        .unwrap_or(LivenessPolicy::AlwaysAlive)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn links(urls: &[&str]) -> Vec<String> {
        urls.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_classify_single_hoster() {
        let result = classify(&links(&["https://www.mediafire.com/file/abc"]));
        assert_eq!(result, "mediafire");
    }

    #[test]
    fn test_classify_majority_wins() {
        let result = classify(&links(&[
            "https://mega.nz/file/a#k",
            "https://mega.nz/file/b#k",
            "https://www.mediafire.com/file/c",
        ]));
        assert_eq!(result, "mega.nz");
    }

    #[test]
    fn test_classify_case_insensitive() {
        let result = classify(&links(&["https://MEGA.NZ/file/a#k"]));
        assert_eq!(result, "mega.nz");
    }

    #[test]
    fn test_classify_tie_broken_by_table_order() {
        // mega.nz precedes mediafire in the table
        let result = classify(&links(&[
            "https://www.mediafire.com/file/c",
            "https://mega.nz/file/a#k",
        ]));
        assert_eq!(result, "mega.nz");
    }

    #[test]
    fn test_classify_empty_is_unknown() {
        assert_eq!(classify(&[]), UNKNOWN_HOSTER);
    }

    #[test]
    fn test_classify_no_match_is_unknown() {
        let result = classify(&links(&["https://example.com/file.zip"]));
        assert_eq!(result, UNKNOWN_HOSTER);
    }

    #[test]
    fn test_one_link_counts_toward_multiple_hosters() {
        // "drive" appears inside this dropbox-ish URL as well
        let result = classify(&links(&[
            "https://dropbox.com/drive/x",
            "https://drive.google.com/d/y",
        ]));
        // drive gets 2 hits, dropbox 1
        assert_eq!(result, "drive");
    }

    #[test]
    fn test_policy_lookup() {
        assert_eq!(policy_for("mediafire"), LivenessPolicy::Head(&[200]));
        assert_eq!(policy_for("mega.nz"), LivenessPolicy::Mega);
        assert_eq!(policy_for("swisstransfer"), LivenessPolicy::AlwaysAlive);
        assert_eq!(policy_for(UNKNOWN_HOSTER), LivenessPolicy::AlwaysAlive);
        assert_eq!(policy_for("never-heard-of-it"), LivenessPolicy::AlwaysAlive);
    }

    #[test]
    fn test_is_hoster_link() {
        assert!(is_hoster_link("https://rapidgator.net/file/1"));
        assert!(!is_hoster_link("https://example.com/"));
    }
}
