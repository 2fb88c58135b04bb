//! Record types produced by the crawl
//!
//! - `House`: one listing, written as one CSV row

mod house;

pub use house::{House, COLUMN_COUNT, HEADER};
