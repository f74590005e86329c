//! Download-link liveness probing
//!
//! Each hoster carries a [`LivenessPolicy`] describing how (or whether) its
//! links can be checked. Probing never fails a scan: every error path reads
//! as "dead" and the post is persisted either way.

mod mega;

pub use mega::{MegaLookup, MEGA_API_BASE};

use crate::extract::{policy_for, LivenessPolicy};
use reqwest::header::ACCEPT;
use reqwest::Client;
use tokio_util::sync::CancellationToken;

/// Probes download links according to their hoster's policy
pub struct LivenessChecker {
    client: Client,
    mega_api_base: String,
}

impl LivenessChecker {
    pub fn new(client: Client) -> Self {
        Self::with_mega_api(client, MEGA_API_BASE)
    }

    /// Overrides the mega.nz API endpoint, mainly for tests
    pub fn with_mega_api(client: Client, mega_api_base: impl Into<String>) -> Self {
        Self {
            client,
            mega_api_base: mega_api_base.into(),
        }
    }

    /// Checks one link under the given hoster's policy
    pub async fn check(&self, url: &str, hoster: &str) -> bool {
        match policy_for(hoster) {
            LivenessPolicy::AlwaysAlive => true,
            LivenessPolicy::Head(accepted) => self.head_probe(url, accepted).await,
            LivenessPolicy::Mega => {
                mega::probe_mega(&self.client, &self.mega_api_base, url).await
            }
        }
    }

    /// True when any of the post's links probes alive
    ///
    /// Links are checked in order and probing stops at the first live one.
    /// The token is consulted before each probe; a stop request never waits
    /// out the remaining probe timeouts.
    pub async fn any_alive(
        &self,
        links: &[String],
        hoster: &str,
        cancel: &CancellationToken,
    ) -> bool {
        for link in links {
            if cancel.is_cancelled() {
                return false;
            }
            if self.check(link, hoster).await {
                return true;
            }
        }
        false
    }

    async fn head_probe(&self, url: &str, accepted: &[u16]) -> bool {
        match self.client.head(url).header(ACCEPT, "*/*").send().await {
            Ok(response) => accepted.contains(&response.status().as_u16()),
            Err(e) => {
                tracing::debug!("Liveness probe failed for {}: {}", url, e);
                false
            }
        }
    }
}
