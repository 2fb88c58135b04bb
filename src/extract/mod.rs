//! Extraction of URLs and records from fetched documents
//!
//! Every extractor here is a pure function of a parsed document: the
//! discovery extractors return the URLs a stage found, and the house
//! extractor returns one populated record. Enqueueing, deduplication and
//! counting are left to the pipeline.

mod discovery;
mod house;
pub mod labels;
mod selectors;
pub mod text;

pub use discovery::{
    area_links, detail_links, page_count, page_links, sub_area_hrefs, PageData, PageLinks,
};
pub use house::{extract_house, split_location};
pub use selectors::Selectors;

use thiserror::Error;

/// Recoverable problems found while reading a document
///
/// These never abort a record or a stage; they are logged where they occur
/// and the affected fields keep their defaults.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Can't parse {field} from '{raw}'")]
    InvalidNumber { field: &'static str, raw: String },

    #[error("Malformed page-data '{raw}': {source}")]
    PageData {
        raw: String,
        source: serde_json::Error,
    },

    #[error("Location '{raw}' has {tokens} tokens, expected 1 to 3")]
    LocationFormat { raw: String, tokens: usize },
}
