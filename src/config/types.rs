use serde::Deserialize;

/// Main configuration structure for the game crawler
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
    pub output: OutputConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Maximum number of concurrent page fetches
    #[serde(rename = "max-concurrent-pages-open")]
    pub max_concurrent_pages_open: u32,

    /// Minimum time between requests to the same host (milliseconds)
    #[serde(rename = "minimum-time-on-page")]
    pub minimum_time_on_page: u64,

    /// Retries for server errors and timeouts
    #[serde(rename = "max-retries", default = "default_max_retries")]
    pub max_retries: u32,

    /// Delay between retries (milliseconds)
    #[serde(rename = "retry-delay", default = "default_retry_delay")]
    pub retry_delay: u64,

    /// Whole-request timeout (seconds)
    #[serde(rename = "request-timeout", default = "default_request_timeout")]
    pub request_timeout: u64,

    /// Whether robots.txt is fetched and honored per host
    #[serde(rename = "respect-robots", default = "default_true")]
    pub respect_robots: bool,
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url")]
    pub contact_url: String,

    /// Email address for crawler-related contact
    #[serde(rename = "contact-email")]
    pub contact_email: String,
}

impl UserAgentConfig {
    /// Formats the header value: `Name/Version (+ContactURL; ContactEmail)`
    pub fn header_value(&self) -> String {
        format!(
            "{}/{} (+{}; {})",
            self.crawler_name, self.crawler_version, self.contact_url, self.contact_email
        )
    }
}

/// The catalog being crawled: seed scheme and domain restriction
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogConfig {
    /// Listing root; seeds are `<base-url><platform>/` and `<base-url><platform>/<letter>`
    #[serde(rename = "base-url", default = "default_base_url")]
    pub base_url: String,

    /// Platform identifiers used to build the seed frontier
    #[serde(default = "default_platforms")]
    pub platforms: Vec<String>,

    /// Domain patterns (e.g., "example.com" or "*.example.com") the crawl may visit
    #[serde(rename = "allowed-domains", default = "default_allowed_domains")]
    pub allowed_domains: Vec<String>,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            platforms: default_platforms(),
            allowed_domains: default_allowed_domains(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Path to the SQLite database file
    #[serde(rename = "database-path")]
    pub database_path: String,

    /// Directory for `games.jsonl` and `reviews.jsonl`
    #[serde(rename = "jsonl-dir", default)]
    pub jsonl_dir: Option<String>,

    /// File receiving warnings and errors
    #[serde(rename = "error-log", default)]
    pub error_log: Option<String>,
}

fn default_max_retries() -> u32 {
    3
}

fn default_retry_delay() -> u64 {
    5000
}

fn default_request_timeout() -> u64 {
    30
}

fn default_true() -> bool {
    true
}

fn default_base_url() -> String {
    "http://www.metacritic.com/browse/games/title/".to_string()
}

fn default_platforms() -> Vec<String> {
    ["ps4", "xboxone", "ps3", "xbox360", "pc", "wii-u", "3ds", "vita"]
        .iter()
        .map(|p| p.to_string())
        .collect()
}

fn default_allowed_domains() -> Vec<String> {
    vec!["*.metacritic.com".to_string()]
}
