use serde::Deserialize;
use std::time::Duration;

/// Main configuration structure for Lianjia-Harvest
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub site: SiteConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub crawl: CrawlConfig,
    #[serde(default)]
    pub frontier: FrontierConfigs,
}

/// Target site layout
#[derive(Debug, Clone, Deserialize)]
pub struct SiteConfig {
    /// Scheme and host of the site, without a trailing slash
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Path of the seed page listing all areas
    #[serde(rename = "seed-path", default = "default_listing_path")]
    pub seed_path: String,

    /// Path prefix shared by all listing detail URLs
    #[serde(rename = "listing-path", default = "default_listing_path")]
    pub listing_path: String,

    /// Domain patterns (e.g., "lianjia.com" or "*.lianjia.com") the crawler may visit
    #[serde(rename = "allowed-domains", default)]
    pub allowed_domains: Vec<String>,
}

impl SiteConfig {
    /// Returns the absolute seed URL
    pub fn seed_url(&self) -> String {
        format!("{}{}", self.base_url, self.seed_path)
    }
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
    /// Format: CrawlerName/Version (+ContactURL; ContactEmail)
    pub fn header_value(&self) -> String {
        format!(
            "{}/{} (+{}; {})",
            self.crawler_name, self.crawler_version, self.contact_url, self.contact_email
        )
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Path to the CSV file receiving one row per listing
    #[serde(rename = "csv-path", default = "default_csv_path")]
    pub csv_path: String,

    /// Directory for dated log files (`--no-log-file` turns them off)
    #[serde(rename = "log-dir", default = "default_log_dir")]
    pub log_dir: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            csv_path: default_csv_path(),
            log_dir: default_log_dir(),
        }
    }
}

/// Crawl-wide behavior
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlConfig {
    /// Per-request timeout in seconds
    #[serde(rename = "request-timeout-secs", default = "default_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Skip listing detail URLs that were already queued
    #[serde(rename = "dedup-listings", default = "default_true")]
    pub dedup_listings: bool,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: default_timeout_secs(),
            dedup_listings: true,
        }
    }
}

/// Settings of the four frontiers, keyed by the URLs they hold
#[derive(Debug, Clone, Deserialize)]
pub struct FrontierConfigs {
    #[serde(default = "FrontierConfig::area")]
    pub area: FrontierConfig,

    #[serde(rename = "sub-area", default = "FrontierConfig::sub_area")]
    pub sub_area: FrontierConfig,

    #[serde(default = "FrontierConfig::page")]
    pub page: FrontierConfig,

    #[serde(default = "FrontierConfig::detail")]
    pub detail: FrontierConfig,
}

impl Default for FrontierConfigs {
    fn default() -> Self {
        Self {
            area: FrontierConfig::area(),
            sub_area: FrontierConfig::sub_area(),
            page: FrontierConfig::page(),
            detail: FrontierConfig::detail(),
        }
    }
}

/// Capacity and drain settings for one frontier
#[derive(Debug, Clone, Deserialize)]
pub struct FrontierConfig {
    /// Maximum number of pending URLs
    pub capacity: usize,

    /// Number of concurrent workers draining this frontier
    #[serde(default = "default_workers")]
    pub workers: usize,

    /// Minimum time between two requests of the same worker (milliseconds)
    #[serde(rename = "delay-ms", default = "default_delay_ms")]
    pub delay_ms: u64,
}

impl FrontierConfig {
    fn with_capacity(capacity: usize, workers: usize) -> Self {
        Self {
            capacity,
            workers,
            delay_ms: default_delay_ms(),
        }
    }

    pub fn area() -> Self {
        Self::with_capacity(20, 1)
    }

    pub fn sub_area() -> Self {
        Self::with_capacity(300, default_workers())
    }

    pub fn page() -> Self {
        Self::with_capacity(5000, default_workers())
    }

    pub fn detail() -> Self {
        Self::with_capacity(100_000, default_workers())
    }

    /// Per-worker delay as a Duration
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

fn default_listing_path() -> String {
    "/ershoufang/".to_string()
}

fn default_csv_path() -> String {
    "output/output.csv".to_string()
}

fn default_log_dir() -> String {
    "log".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_workers() -> usize {
    5
}

fn default_delay_ms() -> u64 {
    2000
}

fn default_true() -> bool {
    true
}
