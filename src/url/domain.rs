use url::Url;

/// Extracts the lowercase host of a URL
///
/// Ports are not part of the result, so a mock server on
/// `127.0.0.1:8080` is matched by the pattern `127.0.0.1`.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use lianjia_harvest::url::extract_domain;
///
/// let url = Url::parse("https://BJ.Lianjia.com/ershoufang/").unwrap();
/// assert_eq!(extract_domain(&url), Some("bj.lianjia.com".to_string()));
/// ```
pub fn extract_domain(url: &Url) -> Option<String> {
    url.host_str().map(|h| h.to_lowercase())
}
