//! URL handling module for Lianjia-Harvest
//!
//! This module provides domain extraction, wildcard matching against the
//! allowed-domain list, URL joining, and the structural pattern that
//! accepts listing detail links.

mod domain;
mod listing;
mod matcher;

// Re-export main functions
pub use domain::extract_domain;
pub use listing::ListingUrlPattern;
pub use matcher::matches_wildcard;

use url::Url;

/// Checks whether a URL's host matches any of the allowed domain patterns
///
/// # Examples
///
/// ```
/// use lianjia_harvest::url::is_allowed;
/// use url::Url;
///
/// let allowed = vec!["lianjia.com".to_string(), "bj.lianjia.com".to_string()];
/// let url = Url::parse("https://bj.lianjia.com/ershoufang/").unwrap();
/// assert!(is_allowed(&url, &allowed));
///
/// let url = Url::parse("https://sh.lianjia.com/ershoufang/").unwrap();
/// assert!(!is_allowed(&url, &allowed));
/// ```
pub fn is_allowed(url: &Url, allowed_domains: &[String]) -> bool {
    match extract_domain(url) {
        Some(domain) => allowed_domains
            .iter()
            .any(|pattern| matches_wildcard(pattern, &domain)),
        None => false,
    }
}

/// Joins a site base URL and an href suffix by plain concatenation
///
/// Hrefs on the area blocks are site-relative (`/ershoufang/dongcheng/`),
/// so the base must not end with a slash.
pub fn join_suffix(base_url: &str, suffix: &str) -> String {
    format!("{}{}", base_url, suffix)
}

/// Builds the URL of page `index` below a sub-area URL
///
/// # Examples
///
/// ```
/// use lianjia_harvest::url::page_url;
///
/// assert_eq!(
///     page_url("https://bj.lianjia.com/ershoufang/andingmen/", 2),
///     "https://bj.lianjia.com/ershoufang/andingmen/pg2/"
/// );
/// ```
pub fn page_url(sub_area_url: &str, index: u32) -> String {
    format!("{}pg{}/", sub_area_url, index)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn allowed() -> Vec<String> {
        vec!["lianjia.com".to_string(), "*.ke.com".to_string()]
    }

    #[test]
    fn test_is_allowed_exact() {
        let url = Url::parse("https://lianjia.com/").unwrap();
        assert!(is_allowed(&url, &allowed()));
    }

    #[test]
    fn test_is_allowed_rejects_subdomain_without_wildcard() {
        let url = Url::parse("https://bj.lianjia.com/").unwrap();
        assert!(!is_allowed(&url, &allowed()));
    }

    #[test]
    fn test_is_allowed_wildcard() {
        let url = Url::parse("https://bj.ke.com/ershoufang/").unwrap();
        assert!(is_allowed(&url, &allowed()));
    }

    #[test]
    fn test_is_allowed_ignores_port() {
        let allowed = vec!["127.0.0.1".to_string()];
        let url = Url::parse("http://127.0.0.1:8080/ershoufang/").unwrap();
        assert!(is_allowed(&url, &allowed));
    }

    #[test]
    fn test_is_allowed_empty_list() {
        let url = Url::parse("https://lianjia.com/").unwrap();
        assert!(!is_allowed(&url, &[]));
    }

    #[test]
    fn test_join_suffix() {
        assert_eq!(
            join_suffix("https://bj.lianjia.com", "/ershoufang/dongcheng/"),
            "https://bj.lianjia.com/ershoufang/dongcheng/"
        );
    }

    #[test]
    fn test_page_url_sequence() {
        let base = "https://bj.lianjia.com/ershoufang/andingmen/";
        let pages: Vec<String> = (1..=3).map(|i| page_url(base, i)).collect();
        assert_eq!(
            pages,
            vec![
                "https://bj.lianjia.com/ershoufang/andingmen/pg1/",
                "https://bj.lianjia.com/ershoufang/andingmen/pg2/",
                "https://bj.lianjia.com/ershoufang/andingmen/pg3/",
            ]
        );
    }
}
