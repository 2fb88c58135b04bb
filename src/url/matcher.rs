/// Checks if a domain matches an allowed-domain pattern
///
/// Two kinds of pattern are supported:
/// 1. Exact match: "lianjia.com" matches only "lianjia.com"
/// 2. Wildcard match: "*.lianjia.com" matches "lianjia.com" and any
///    subdomain such as "bj.lianjia.com"
///
/// # Examples
///
/// ```
/// use lianjia_harvest::url::matches_wildcard;
///
/// assert!(matches_wildcard("lianjia.com", "lianjia.com"));
/// assert!(!matches_wildcard("lianjia.com", "bj.lianjia.com"));
///
/// assert!(matches_wildcard("*.lianjia.com", "lianjia.com"));
/// assert!(matches_wildcard("*.lianjia.com", "bj.lianjia.com"));
/// assert!(!matches_wildcard("*.lianjia.com", "notlianjia.com"));
/// ```
pub fn matches_wildcard(pattern: &str, candidate: &str) -> bool {
    match pattern.strip_prefix("*.") {
        Some(base) => {
            candidate == base
                || candidate
                    .strip_suffix(base)
                    .map_or(false, |prefix| prefix.ends_with('.'))
        }
        None => candidate == pattern,
    }
}
