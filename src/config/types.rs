use serde::Deserialize;

/// Main configuration structure for forumharvest
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub scraper: ScraperConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub forum: ForumConfig,
    pub storage: StorageConfig,
}

/// Scan behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScraperConfig {
    /// Number of concurrent page workers
    pub workers: u32,

    /// Total timeout for page fetches (seconds)
    #[serde(rename = "fetch-timeout-secs")]
    pub fetch_timeout_secs: u64,

    /// Connect timeout for page fetches (seconds)
    #[serde(rename = "connect-timeout-secs")]
    pub connect_timeout_secs: u64,

    /// Connect+read timeout for liveness probes (seconds)
    #[serde(rename = "probe-timeout-secs")]
    pub probe_timeout_secs: u64,

    /// Politeness delay after each catalog page fetch (milliseconds)
    #[serde(rename = "catalog-delay-ms")]
    pub catalog_delay_ms: u64,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            workers: 3,
            fetch_timeout_secs: 15,
            connect_timeout_secs: 10,
            probe_timeout_secs: 5,
            catalog_delay_ms: 500,
        }
    }
}

/// Outbound identity configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UserAgentConfig {
    /// Browser-like identity sent with every request
    #[serde(rename = "browser-identity")]
    pub browser_identity: String,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            browser_identity:
                "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36".to_string(),
        }
    }
}

/// Forum layout rules
///
/// The page-numbering scheme and DOM selectors are specific to one forum's
/// layout; they are grouped here so an implementer can adapt them without
/// touching the extraction code.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ForumConfig {
    /// Topics listed per board page
    #[serde(rename = "board-page-size")]
    pub board_page_size: u32,

    /// Posts listed per topic page
    #[serde(rename = "topic-page-size")]
    pub topic_page_size: u32,

    /// Selector for page navigation links
    #[serde(rename = "nav-selector")]
    pub nav_selector: String,

    /// Fallback selectors when the primary navigation links are absent
    #[serde(rename = "nav-fallback-selector")]
    pub nav_fallback_selector: String,

    /// Selector for one post block
    #[serde(rename = "post-selector")]
    pub post_selector: String,

    /// Class marking a quoted-message sub-block inside a post
    #[serde(rename = "quote-class")]
    pub quote_class: String,

    /// Selector for the subject link of a post, relative to its container
    #[serde(rename = "subject-selector")]
    pub subject_selector: String,

    /// Selector for the author link, relative to the post's table row
    #[serde(rename = "author-selector")]
    pub author_selector: String,

    /// Selector for a topic row on a board page
    #[serde(rename = "board-row-selector")]
    pub board_row_selector: String,

    /// Host whose message permalinks count as quote references
    #[serde(rename = "quote-link-host")]
    pub quote_link_host: String,

    /// Path fragment identifying a message permalink
    #[serde(rename = "quote-link-marker")]
    pub quote_link_marker: String,

    /// Path prefix of decorative smiley assets to exclude from images
    #[serde(rename = "smiley-path")]
    pub smiley_path: String,
}

impl Default for ForumConfig {
    fn default() -> Self {
        Self {
            board_page_size: 40,
            topic_page_size: 15,
            nav_selector: "a.navPages".to_string(),
            nav_fallback_selector: ".pagelinks a, .pagination a".to_string(),
            post_selector: "div.post".to_string(),
            quote_class: "bbc_standard_quote".to_string(),
            subject_selector: "div[id^=subject_] a".to_string(),
            author_selector: "td[valign=top][rowspan] div > b > span > a".to_string(),
            board_row_selector: "td.windowbg".to_string(),
            quote_link_host: "makinamania.net".to_string(),
            quote_link_marker: "msg".to_string(),
            smiley_path: "makinamania.com/Smileys".to_string(),
        }
    }
}

/// Persistence paths
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Path to the JSON post store
    #[serde(rename = "posts-path")]
    pub posts_path: String,

    /// Path to the JSON visited-URL store
    #[serde(rename = "visited-path")]
    pub visited_path: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            posts_path: "resources/posts.json".to_string(),
            visited_path: "resources/scanned.json".to_string(),
        }
    }
}
