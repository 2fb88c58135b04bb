//! Configuration module for Lianjia-Harvest
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//!
//! # Example
//!
//! ```no_run
//! use lianjia_harvest::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("lianjia.toml")).unwrap();
//! println!("Seed URL: {}", config.site.seed_url());
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, CrawlConfig, FrontierConfig, FrontierConfigs, OutputConfig, SiteConfig,
    UserAgentConfig,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
