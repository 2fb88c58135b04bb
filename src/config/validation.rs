use crate::config::types::{Config, FrontierConfig, OutputConfig, SiteConfig, UserAgentConfig};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_site_config(&config.site)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_output_config(&config.output)?;

    if config.crawl.request_timeout_secs == 0 {
        return Err(ConfigError::Validation(
            "request_timeout_secs must be >= 1".to_string(),
        ));
    }

    validate_frontier_config("area", &config.frontier.area)?;
    validate_frontier_config("sub-area", &config.frontier.sub_area)?;
    validate_frontier_config("page", &config.frontier.page)?;
    validate_frontier_config("detail", &config.frontier.detail)?;
    Ok(())
}

/// Validates the site layout
fn validate_site_config(config: &SiteConfig) -> Result<(), ConfigError> {
    let url = Url::parse(&config.base_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid base_url: {}", e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "base_url '{}' must use http or https",
            config.base_url
        )));
    }

    if url.host_str().is_none() {
        return Err(ConfigError::InvalidUrl(format!(
            "base_url '{}' has no host",
            config.base_url
        )));
    }

    // Paths are appended verbatim, so the base must not carry one
    if config.base_url.ends_with('/') || url.path() != "/" {
        return Err(ConfigError::Validation(format!(
            "base_url '{}' must not contain a path or trailing slash",
            config.base_url
        )));
    }

    for (name, path) in [
        ("seed_path", &config.seed_path),
        ("listing_path", &config.listing_path),
    ] {
        if !path.starts_with('/') {
            return Err(ConfigError::Validation(format!(
                "{} must start with '/', got '{}'",
                name, path
            )));
        }
    }

    if config.allowed_domains.is_empty() {
        return Err(ConfigError::Validation(
            "allowed_domains must list at least one domain".to_string(),
        ));
    }

    for pattern in &config.allowed_domains {
        validate_domain_pattern(pattern)?;
    }

    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    // Validate crawler name: non-empty, alphanumeric + hyphens only
    if config.crawler_name.is_empty() {
        return Err(ConfigError::Validation(
            "crawler_name cannot be empty".to_string(),
        ));
    }

    if !config
        .crawler_name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-')
    {
        return Err(ConfigError::Validation(format!(
            "crawler_name must contain only alphanumeric characters and hyphens, got '{}'",
            config.crawler_name
        )));
    }

    Url::parse(&config.contact_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid contact_url: {}", e)))?;

    validate_email(&config.contact_email)?;

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.csv_path.is_empty() {
        return Err(ConfigError::Validation(
            "csv_path cannot be empty".to_string(),
        ));
    }

    if config.log_dir.is_empty() {
        return Err(ConfigError::Validation(
            "log_dir cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates one frontier's capacity and worker settings
fn validate_frontier_config(name: &str, config: &FrontierConfig) -> Result<(), ConfigError> {
    if config.capacity < 1 {
        return Err(ConfigError::Validation(format!(
            "frontier.{}.capacity must be >= 1, got {}",
            name, config.capacity
        )));
    }

    if config.workers < 1 || config.workers > 100 {
        return Err(ConfigError::Validation(format!(
            "frontier.{}.workers must be between 1 and 100, got {}",
            name, config.workers
        )));
    }

    Ok(())
}

/// Validates a domain pattern (supports wildcards)
fn validate_domain_pattern(pattern: &str) -> Result<(), ConfigError> {
    if pattern.is_empty() {
        return Err(ConfigError::InvalidPattern(
            "Domain pattern cannot be empty".to_string(),
        ));
    }

    match pattern.strip_prefix("*.") {
        Some(domain) => validate_domain_string(domain),
        None => validate_domain_string(pattern),
    }
}

/// Validates a domain string (without wildcard prefix)
fn validate_domain_string(domain: &str) -> Result<(), ConfigError> {
    if domain.is_empty() {
        return Err(ConfigError::InvalidPattern(
            "Domain cannot be empty".to_string(),
        ));
    }

    if !domain
        .chars()
        .all(|c| c.is_alphanumeric() || c == '.' || c == '-')
    {
        return Err(ConfigError::InvalidPattern(format!(
            "Domain '{}' contains invalid characters",
            domain
        )));
    }

    if domain.starts_with('.')
        || domain.ends_with('.')
        || domain.starts_with('-')
        || domain.ends_with('-')
    {
        return Err(ConfigError::InvalidPattern(format!(
            "Domain '{}' cannot start or end with '.' or '-'",
            domain
        )));
    }

    if domain.contains("..") {
        return Err(ConfigError::InvalidPattern(format!(
            "Domain '{}' cannot contain consecutive dots",
            domain
        )));
    }

    if !domain.contains('.') {
        return Err(ConfigError::InvalidPattern(format!(
            "Domain '{}' must contain at least one dot (e.g., 'lianjia.com')",
            domain
        )));
    }

    Ok(())
}

/// Basic email validation
fn validate_email(email: &str) -> Result<(), ConfigError> {
    let invalid = || ConfigError::Validation(format!("Invalid email format: '{}'", email));

    let (local, domain) = email.split_once('@').ok_or_else(invalid)?;
    if local.is_empty() || domain.is_empty() || domain.contains('@') || !domain.contains('.') {
        return Err(invalid());
    }

    Ok(())
}
