//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building HTTP clients with proper user agent strings
//! - Refusing hosts outside the allowed domains
//! - Redirect handling
//! - Error classification

use crate::config::UserAgentConfig;
use crate::url::is_allowed;
use reqwest::{redirect::Policy, Client};
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Maximum redirect hops followed for one request
const MAX_REDIRECTS: usize = 10;

/// Reasons a fetch produced no document
///
/// None of these are fatal: the frontier logs them and drops the URL.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Host of '{url}' is not in the allowed domains")]
    Disallowed { url: String },

    #[error("HTTP {status_code} for {url}")]
    Http { url: String, status_code: u16 },

    #[error("Network error for {url}: {error}")]
    Network { url: String, error: String },
}

/// A successfully fetched page
#[derive(Debug)]
pub struct FetchedPage {
    /// Final URL after redirects
    pub final_url: String,
    /// HTTP status code
    pub status_code: u16,
    /// Page body content
    pub body: String,
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The user agent configuration
/// * `timeout` - Per-request timeout
///
/// # Example
///
/// ```no_run
/// use lianjia_harvest::config::UserAgentConfig;
/// use lianjia_harvest::crawler::build_http_client;
/// use std::time::Duration;
///
/// let config = UserAgentConfig {
///     crawler_name: "LianjiaHarvest".to_string(),
///     crawler_version: "0.1".to_string(),
///     contact_url: "https://example.com/about".to_string(),
///     contact_email: "admin@example.com".to_string(),
/// };
///
/// let client = build_http_client(&config, Duration::from_secs(30)).unwrap();
/// ```
pub fn build_http_client(
    config: &UserAgentConfig,
    timeout: Duration,
) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.header_value())
        .timeout(timeout)
        .connect_timeout(Duration::from_secs(10))
        .redirect(Policy::limited(MAX_REDIRECTS))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches documents for every stage, restricted to the allowed domains
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
    allowed_domains: Vec<String>,
}

impl Fetcher {
    pub fn new(client: Client, allowed_domains: Vec<String>) -> Self {
        Self {
            client,
            allowed_domains,
        }
    }

    /// Fetches a URL and returns its body
    ///
    /// Redirects are followed by the client. The final URL is checked
    /// against the allowed domains as well as the requested one.
    ///
    /// | Condition | Result |
    /// |-----------|--------|
    /// | Unparseable URL | `InvalidUrl` |
    /// | Host not allowed | `Disallowed` |
    /// | Non-2xx status | `Http` |
    /// | Timeout, connection or body failure | `Network` |
    pub async fn fetch(&self, url: &str) -> Result<FetchedPage, FetchError> {
        let parsed = Url::parse(url).map_err(|e| FetchError::InvalidUrl {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

        if !is_allowed(&parsed, &self.allowed_domains) {
            return Err(FetchError::Disallowed {
                url: url.to_string(),
            });
        }

        let response = self
            .client
            .get(parsed)
            .send()
            .await
            .map_err(|e| network_error(url, e))?;

        let status = response.status();
        let final_url = response.url().clone();

        if !is_allowed(&final_url, &self.allowed_domains) {
            return Err(FetchError::Disallowed {
                url: final_url.to_string(),
            });
        }

        if !status.is_success() {
            return Err(FetchError::Http {
                url: url.to_string(),
                status_code: status.as_u16(),
            });
        }

        let body = response.text().await.map_err(|e| network_error(url, e))?;

        Ok(FetchedPage {
            final_url: final_url.to_string(),
            status_code: status.as_u16(),
            body,
        })
    }
}

fn network_error(url: &str, e: reqwest::Error) -> FetchError {
    let error = if e.is_timeout() {
        "Request timeout".to_string()
    } else if e.is_connect() {
        "Connection refused".to_string()
    } else if e.is_redirect() {
        format!("Redirect chain exceeded {} hops", MAX_REDIRECTS)
    } else {
        e.to_string()
    };

    FetchError::Network {
        url: url.to_string(),
        error,
    }
}
