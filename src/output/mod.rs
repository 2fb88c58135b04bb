//! Output module for listing records and run reporting
//!
//! This module handles:
//! - Writing listing records to the CSV sink
//! - Counting discoveries per stage
//! - Reporting the end-of-run summary

mod csv_sink;
pub mod stats;
mod traits;

pub use csv_sink::{CsvSink, UTF8_BOM};
pub use stats::{log_summary, print_summary, CrawlStatistics};
pub use traits::{CrawlSummary, RecordSink};
