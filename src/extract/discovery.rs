//! Discovery extractors for the four URL-producing stages
//!
//! An absent container is not an error: it simply yields no URLs.

use crate::extract::{ExtractError, Selectors};
use crate::url::{join_suffix, page_url, ListingUrlPattern};
use scraper::Html;
use serde::Deserialize;

/// Pagination state embedded in the `page-data` attribute
///
/// The site renders it as `{"totalPage":12,"curPage":1}`; only the total
/// is read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct PageData {
    #[serde(rename = "totalPage")]
    pub total_page: u32,
}

/// Lazily generated page URLs `pg1/..=pgN/` below one sub-area URL
///
/// URLs are built one at a time, so a huge page count costs nothing until
/// the consumer pulls them.
#[derive(Debug, Clone)]
pub struct PageLinks {
    sub_area_url: String,
    next: u64,
    total: u64,
}

impl PageLinks {
    fn new(sub_area_url: &str, total_page: u32) -> Self {
        Self {
            sub_area_url: sub_area_url.to_string(),
            next: 1,
            total: u64::from(total_page),
        }
    }

    /// Number of URLs not yet produced
    pub fn remaining(&self) -> u64 {
        (self.total + 1).saturating_sub(self.next)
    }
}

impl Iterator for PageLinks {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        if self.next > self.total {
            return None;
        }
        // next <= total <= u32::MAX here
        let index = self.next as u32;
        self.next += 1;
        Some(page_url(&self.sub_area_url, index))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = usize::try_from(self.remaining()).unwrap_or(usize::MAX);
        (remaining, Some(remaining))
    }
}

/// Area stage: absolute URLs of every area link on the seed page
///
/// # Arguments
///
/// * `document` - The parsed seed page
/// * `selectors` - Compiled selectors
/// * `base_url` - Site base the relative hrefs are appended to
pub fn area_links(document: &Html, selectors: &Selectors, base_url: &str) -> Vec<String> {
    document
        .select(&selectors.area_links)
        .filter_map(|a| a.value().attr("href"))
        .filter(|href| !href.is_empty())
        .map(|href| join_suffix(base_url, href))
        .collect()
}

/// Sub-area stage: raw hrefs of the sub-area block on an area page
///
/// Hrefs are returned as written in the page (path only), since they are
/// the deduplication keys. Duplicates are kept here.
pub fn sub_area_hrefs(document: &Html, selectors: &Selectors) -> Vec<String> {
    document
        .select(&selectors.sub_area_links)
        .filter_map(|a| a.value().attr("href"))
        .filter(|href| !href.is_empty())
        .map(str::to_string)
        .collect()
}

/// Reads the total page count from the pagination container
///
/// # Returns
///
/// * `Ok(None)` - The page has no pagination container
/// * `Ok(Some(PageData))` - The embedded pagination state
/// * `Err(ExtractError::PageData)` - The attribute is missing or malformed
pub fn page_count(document: &Html, selectors: &Selectors) -> Result<Option<PageData>, ExtractError> {
    let container = match document.select(&selectors.page_box).next() {
        Some(container) => container,
        None => return Ok(None),
    };

    let raw = container.value().attr("page-data").unwrap_or("");
    serde_json::from_str::<PageData>(raw)
        .map(Some)
        .map_err(|source| ExtractError::PageData {
            raw: raw.to_string(),
            source,
        })
}

/// Page stage: one URL per page number below the current sub-area URL
///
/// A malformed page count is logged and treated as zero pages.
pub fn page_links(document: &Html, selectors: &Selectors, current_url: &str) -> PageLinks {
    let total_page = match page_count(document, selectors) {
        Ok(Some(data)) => data.total_page,
        Ok(None) => {
            tracing::debug!("No pagination container on {}", current_url);
            0
        }
        Err(e) => {
            tracing::warn!("{} on {}", e, current_url);
            0
        }
    };

    PageLinks::new(current_url, total_page)
}

/// Detail stage: listing links that match the structural pattern
///
/// Non-matching hrefs are skipped silently.
pub fn detail_links(
    document: &Html,
    selectors: &Selectors,
    pattern: &ListingUrlPattern,
) -> Vec<String> {
    document
        .select(&selectors.listing_links)
        .filter_map(|a| a.value().attr("href"))
        .filter(|href| {
            let accepted = pattern.matches(href);
            if !accepted {
                tracing::trace!("Skipping non-listing link {}", href);
            }
            accepted
        })
        .map(str::to_string)
        .collect()
}
