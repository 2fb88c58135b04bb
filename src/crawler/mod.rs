//! Crawler module for staged fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching restricted to the allowed domains
//! - Bounded frontiers drained by paced workers
//! - Deduplication of discovered URLs
//! - The five-stage pipeline coordination

mod dedup;
mod fetcher;
mod frontier;
mod pipeline;

pub use dedup::DedupStore;
pub use fetcher::{build_http_client, FetchError, FetchedPage, Fetcher};
pub use frontier::{DrainReport, Frontier, FrontierError};
pub use pipeline::{run_crawl, Pipeline};
