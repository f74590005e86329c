//! Post extraction from forum pages
//!
//! `extractor` parses page HTML into [`Candidate`]s, `hoster` classifies
//! their download links, and [`Post`] is the enriched, persistable result.

mod extractor;
mod hoster;
mod post;

pub use extractor::{extract_candidates, Candidate};
pub use hoster::{
    classify, is_hoster_link, policy_for, HosterRule, LivenessPolicy, HOSTERS, UNKNOWN_HOSTER,
};
pub use post::Post;
