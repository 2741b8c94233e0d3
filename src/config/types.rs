use serde::Deserialize;

/// Main configuration structure for Arxiv-Trawler
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub output: OutputConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Base domain (scheme + host) that relative links resolve against
    #[serde(rename = "base-domain", default = "default_base_domain")]
    pub base_domain: String,

    /// Maximum number of page fetches in one crawl run
    #[serde(rename = "visit-cap", default = "default_visit_cap")]
    pub visit_cap: u32,

    /// Per-request timeout in seconds (HTML and PDF fetches)
    #[serde(rename = "fetch-timeout-secs", default = "default_fetch_timeout")]
    pub fetch_timeout_secs: u64,

    /// Maximum stored length of an archive description
    #[serde(rename = "description-max-len", default = "default_description_max")]
    pub description_max_len: usize,

    /// Track visited URLs and skip revisits. Off by default: the original
    /// design bounds work purely via the visit cap.
    #[serde(rename = "dedup-visited", default)]
    pub dedup_visited: bool,
}

fn default_base_domain() -> String {
    "https://arxiv.org".to_string()
}

fn default_visit_cap() -> u32 {
    50
}

fn default_fetch_timeout() -> u64 {
    30
}

fn default_description_max() -> usize {
    500
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    #[serde(rename = "contact")]
    pub contact: String,
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    #[serde(rename = "database-path")]
    pub database_path: String,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            base_domain: default_base_domain(),
            visit_cap: default_visit_cap(),
            fetch_timeout_secs: default_fetch_timeout(),
            description_max_len: default_description_max(),
            dedup_visited: false,
        }
    }
}
