//! Lianjia-Harvest: a staged listing crawler
//!
//! This crate walks a second-hand housing site in five dependent stages
//! (areas, sub-areas, listing pages, listing links, listing details) and
//! writes one CSV row per listing.

pub mod config;
pub mod crawler;
pub mod extract;
pub mod model;
pub mod output;
pub mod state;
pub mod url;

use thiserror::Error;

/// Main error type for Lianjia-Harvest operations
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid CSS selector '{selector}': {message}")]
    Selector { selector: String, message: String },

    #[error("Invalid URL pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Invalid domain pattern: {0}")]
    InvalidPattern(String),
}

/// Result type alias for Lianjia-Harvest operations
pub type Result<T> = std::result::Result<T, HarvestError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{run_crawl, Pipeline};
pub use model::House;
pub use output::CrawlSummary;
pub use state::Stage;
