//! Scan orchestration
//!
//! The [`Orchestrator`] owns the HTTP clients, the stores and the probing
//! machinery, turns user input into concrete page URLs, and drives a
//! cancellable worker pool over them. Results are persisted on every
//! run-ending path, including cancellation.

use crate::config::{Config, ForumConfig};
use crate::discogs::DiscogsResolver;
use crate::extract::{self, Candidate, Post};
use crate::liveness::LivenessChecker;
use crate::pages::{self, ResourceKind};
use crate::scan::fetcher::{build_page_client, build_probe_client, fetch_html};
use crate::store::{PostStore, VisitedStore};
use crate::url::strip_session_id;
use crate::Result;
use reqwest::Client;
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, Mutex, Semaphore};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

/// One progress event, emitted after each page finishes or is skipped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub percent: u32,
    pub processed: usize,
    pub total: usize,
}

/// How a scan run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Every pending page was processed
    Completed { new_posts: usize },
    /// All requested pages were already visited
    NothingToDo,
    /// Cancelled mid-run; partial results were persisted
    Stopped,
}

/// Result of one scan run
#[derive(Debug)]
pub struct ScanReport {
    pub outcome: Outcome,
    /// Posts extracted during this run, before merging with the store
    pub posts: Vec<Post>,
}

/// Everything a page worker needs, shared across the pool
struct WorkerCtx {
    client: Client,
    forum: ForumConfig,
    liveness: LivenessChecker,
    discogs: DiscogsResolver,
}

/// Drives resumable, concurrent scans over forum pages
pub struct Orchestrator {
    config: Config,
    page_client: Client,
    ctx: Arc<WorkerCtx>,
    posts: PostStore,
    visited: VisitedStore,
    cancel: Mutex<CancellationToken>,
}

impl Orchestrator {
    pub fn new(config: Config) -> Result<Self> {
        let page_client = build_page_client(&config.user_agent, &config.scraper)?;
        let probe_client = build_probe_client(&config.user_agent, &config.scraper)?;

        let ctx = Arc::new(WorkerCtx {
            client: page_client.clone(),
            forum: config.forum.clone(),
            liveness: LivenessChecker::new(probe_client),
            discogs: DiscogsResolver::new(
                page_client.clone(),
                Duration::from_millis(config.scraper.catalog_delay_ms),
            ),
        });

        Ok(Self {
            posts: PostStore::new(&config.storage.posts_path),
            visited: VisitedStore::new(&config.storage.visited_path),
            page_client,
            ctx,
            cancel: Mutex::new(CancellationToken::new()),
            config,
        })
    }

    /// Expands a topic URL and page expression into concrete page URLs
    pub async fn resolve_topic_pages(&self, topic_url: &str, spec: &str) -> Result<Vec<String>> {
        let total = pages::total_pages(
            &self.page_client,
            &self.config.forum,
            topic_url,
            ResourceKind::Topic,
        )
        .await;
        let base = pages::topic_base_url(topic_url);
        let numbers = pages::resolve_page_spec(spec, total)?;

        Ok(numbers
            .into_iter()
            .map(|page| pages::topic_page_url(&base, page, self.config.forum.topic_page_size))
            .collect())
    }

    /// Expands a board URL into page URLs of every topic it lists
    ///
    /// Board pages selected by `board_spec` are fetched to collect topic
    /// roots; each topic is then expanded with `topic_spec`. A board page
    /// that fails to fetch is logged and skipped.
    pub async fn resolve_board(
        &self,
        board_url: &str,
        board_spec: &str,
        topic_spec: &str,
    ) -> Result<Vec<String>> {
        let clean = strip_session_id(board_url);
        let total = pages::total_pages(
            &self.page_client,
            &self.config.forum,
            &clean,
            ResourceKind::Board,
        )
        .await;
        let board_pages = pages::resolve_page_spec(board_spec, total)?;

        let mut topics: Vec<String> = Vec::new();
        for page in board_pages {
            let page_url =
                pages::board_page_url(&clean, page, self.config.forum.board_page_size);
            match fetch_html(&self.page_client, &page_url).await {
                Ok(body) => {
                    for topic in pages::topics_on_board_page(&body, &self.config.forum, &page_url)
                    {
                        if !topics.contains(&topic) {
                            topics.push(topic);
                        }
                    }
                }
                Err(e) => tracing::warn!("Skipping board page {}: {}", page_url, e),
            }
        }
        tracing::info!("Board expansion found {} topics", topics.len());

        let mut urls = Vec::new();
        for topic in &topics {
            urls.extend(self.resolve_topic_pages(topic, topic_spec).await?);
        }
        Ok(urls)
    }

    /// Requests cancellation of the scan in flight
    pub async fn stop(&self) {
        self.cancel.lock().await.cancel();
    }

    /// Arms a fresh cancellation token for the next run
    pub async fn reset(&self) {
        *self.cancel.lock().await = CancellationToken::new();
    }

    /// Scans the given page URLs, skipping the ones already visited
    ///
    /// Progress events are emitted on `progress_tx`; a dropped receiver is
    /// ignored. The visited set and new posts are persisted whether the run
    /// completes, stops or fails.
    pub async fn run_scan(
        &self,
        urls: &[String],
        progress_tx: mpsc::UnboundedSender<Progress>,
    ) -> Result<ScanReport> {
        let all_urls = normalize_urls(urls);
        let total = all_urls.len();

        let already_visited = self.visited.load().await?;
        let pending: Vec<String> = all_urls
            .iter()
            .filter(|url| !already_visited.contains(*url))
            .cloned()
            .collect();
        let skipped = total - pending.len();

        if pending.is_empty() {
            tracing::info!("All {} requested pages already visited", total);
            self.visited.merge_save(&already_visited).await?;
            let _ = progress_tx.send(Progress {
                percent: 100,
                processed: total,
                total,
            });
            return Ok(ScanReport {
                outcome: Outcome::NothingToDo,
                posts: Vec::new(),
            });
        }

        tracing::info!(
            "Scanning {} pages ({} already visited)",
            pending.len(),
            skipped
        );

        let cancel = self.cancel.lock().await.clone();
        let semaphore = Arc::new(Semaphore::new(self.config.scraper.workers as usize));
        let collected = Arc::new(Mutex::new(Vec::<Post>::new()));
        let newly_visited = Arc::new(Mutex::new(HashSet::<String>::new()));
        let done = Arc::new(AtomicUsize::new(skipped));

        let mut workers = JoinSet::new();
        for url in pending {
            let ctx = Arc::clone(&self.ctx);
            let cancel = cancel.clone();
            let semaphore = Arc::clone(&semaphore);
            let collected = Arc::clone(&collected);
            let newly_visited = Arc::clone(&newly_visited);
            let done = Arc::clone(&done);
            let progress_tx = progress_tx.clone();

            workers.spawn(async move {
                let Ok(_permit) = semaphore.acquire_owned().await else {
                    return;
                };
                if cancel.is_cancelled() {
                    return;
                }

                match process_page(&ctx, &url, &cancel).await {
                    Ok(posts) => {
                        tracing::debug!("{}: {} posts with live links", url, posts.len());
                        collected.lock().await.extend(posts);
                        newly_visited.lock().await.insert(url);
                    }
                    Err(e) => tracing::error!("Scan failed for {}: {}", url, e),
                }

                let processed = done.fetch_add(1, Ordering::SeqCst) + 1;
                let _ = progress_tx.send(Progress {
                    percent: (processed * 100 / total) as u32,
                    processed,
                    total,
                });
            });
        }
        while workers.join_next().await.is_some() {}

        let stopped = cancel.is_cancelled();
        let run_posts = dedup_posts(std::mem::take(&mut *collected.lock().await));
        let run_visited = std::mem::take(&mut *newly_visited.lock().await);

        // The visited flush comes first and is attempted even when saving
        // posts fails afterwards.
        let visited_result = self.visited.merge_save(&run_visited).await;
        let posts_result = self.posts.merge_save(&run_posts).await;
        visited_result?;
        let new_posts = posts_result?;

        let reshares = run_posts.iter().filter(|p| p.is_quote_only()).count();
        if reshares > 0 {
            tracing::debug!("{} of the extracted posts are quote-only reshares", reshares);
        }

        let outcome = if stopped {
            tracing::info!("Scan stopped, {} pages persisted", run_visited.len());
            Outcome::Stopped
        } else {
            tracing::info!("Scan complete, {} new posts", new_posts);
            Outcome::Completed { new_posts }
        };

        Ok(ScanReport {
            outcome,
            posts: run_posts,
        })
    }

    pub async fn load_posts(&self) -> Result<Vec<Post>> {
        Ok(self.posts.load().await?)
    }

    /// Merges posts into the store without truncating what is already there
    pub async fn save_posts(&self, posts: &[Post]) -> Result<usize> {
        Ok(self.posts.merge_save(posts).await?)
    }

    pub async fn load_visited(&self) -> Result<HashSet<String>> {
        Ok(self.visited.load().await?)
    }

    pub async fn save_visited(&self, visited: &HashSet<String>) -> Result<usize> {
        Ok(self.visited.merge_save(visited).await?)
    }
}

/// Fetches one page and turns its candidates into enriched posts
async fn process_page(
    ctx: &WorkerCtx,
    url: &str,
    cancel: &CancellationToken,
) -> Result<Vec<Post>> {
    let body = fetch_html(&ctx.client, url).await?;
    let candidates = extract::extract_candidates(&body, &ctx.forum);

    let mut posts = Vec::new();
    for candidate in candidates {
        if cancel.is_cancelled() {
            break;
        }
        if let Some(post) = enrich(ctx, candidate, cancel).await {
            posts.push(post);
        }
    }
    Ok(posts)
}

/// Classifies, resolves album titles and gates on liveness
///
/// A candidate whose links all probe dead is dropped; persisted posts always
/// carry `link_alive = true`. The token short-circuits the probe loop so a
/// stop request does not wait on further probe timeouts.
async fn enrich(
    ctx: &WorkerCtx,
    candidate: Candidate,
    cancel: &CancellationToken,
) -> Option<Post> {
    let hoster = extract::classify(&candidate.download_links).to_string();
    let album_titles = ctx.discogs.resolve_all(&candidate.discogs_links).await;

    if !ctx
        .liveness
        .any_alive(&candidate.download_links, &hoster, cancel)
        .await
    {
        tracing::debug!("Dropping {} ({}): no live link", candidate.id, hoster);
        return None;
    }

    Some(Post {
        id: candidate.id,
        reference: candidate.reference,
        author: candidate.author,
        text: candidate.text,
        quotes: candidate.quotes,
        download_links: candidate.download_links,
        discogs_links: candidate.discogs_links,
        images: candidate.images,
        album_titles,
        hoster,
        link_alive: true,
    })
}

/// Session-strips and order-preservingly dedups the requested URLs
fn normalize_urls(urls: &[String]) -> Vec<String> {
    let mut normalized = Vec::new();
    for url in urls {
        let clean = strip_session_id(url);
        if !normalized.contains(&clean) {
            normalized.push(clean);
        }
    }
    normalized
}

/// Drops same-id duplicates, keeping the first occurrence
fn dedup_posts(posts: Vec<Post>) -> Vec<Post> {
    let mut seen = HashSet::new();
    posts
        .into_iter()
        .filter(|post| seen.insert(post.id.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn urls(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_normalize_urls_strips_and_dedups() {
        let input = urls(&[
            "https://forum.example/topic,1.0.html?PHPSESSID=abc",
            "https://forum.example/topic,1.0.html",
            "https://forum.example/topic,1.15.html",
        ]);
        assert_eq!(
            normalize_urls(&input),
            urls(&[
                "https://forum.example/topic,1.0.html",
                "https://forum.example/topic,1.15.html",
            ])
        );
    }

    #[test]
    fn test_dedup_posts_keeps_first() {
        let mut a = test_post("p1");
        a.author = "first".to_string();
        let mut b = test_post("p1");
        b.author = "second".to_string();
        let c = test_post("p2");

        let deduped = dedup_posts(vec![a, b, c]);
        assert_eq!(deduped.len(), 2);
        assert_eq!(deduped[0].author, "first");
    }

    fn test_post(id: &str) -> Post {
        Post {
            id: id.to_string(),
            reference: String::new(),
            author: String::new(),
            text: String::new(),
            quotes: vec![],
            download_links: vec![],
            discogs_links: vec![],
            images: vec![],
            album_titles: vec![],
            hoster: "unknown".to_string(),
            link_alive: true,
        }
    }
}
