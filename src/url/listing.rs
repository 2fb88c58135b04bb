use regex::Regex;

/// Number of decimal digits in a listing ID
const LISTING_ID_DIGITS: usize = 12;

/// Structural pattern accepting listing detail URLs
///
/// A detail URL is the site base, the listing path prefix, exactly twelve
/// decimal digits, and `.html`. Anything else is rejected.
#[derive(Debug, Clone)]
pub struct ListingUrlPattern {
    regex: Regex,
}

impl ListingUrlPattern {
    /// Builds the pattern for a site base URL and listing path prefix
    ///
    /// # Examples
    ///
    /// ```
    /// use lianjia_harvest::url::ListingUrlPattern;
    ///
    /// let pattern = ListingUrlPattern::new("https://bj.lianjia.com", "/ershoufang/").unwrap();
    /// assert!(pattern.matches("https://bj.lianjia.com/ershoufang/101111350123.html"));
    /// assert!(!pattern.matches("https://bj.lianjia.com/ershoufang/abc.html"));
    /// ```
    pub fn new(base_url: &str, listing_path: &str) -> Result<Self, regex::Error> {
        let source = format!(
            r"^{}{}\d{{{}}}\.html$",
            regex::escape(base_url),
            regex::escape(listing_path),
            LISTING_ID_DIGITS
        );
        Ok(Self {
            regex: Regex::new(&source)?,
        })
    }

    /// Returns true if the href is a listing detail URL
    pub fn matches(&self, href: &str) -> bool {
        self.regex.is_match(href)
    }

    /// Returns the listing ID of a matching href
    pub fn listing_id<'a>(&self, href: &'a str) -> Option<&'a str> {
        if !self.matches(href) {
            return None;
        }
        let stem = href.strip_suffix(".html")?;
        Some(&stem[stem.len() - LISTING_ID_DIGITS..])
    }
}
