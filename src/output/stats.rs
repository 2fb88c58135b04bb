//! Run statistics shared by the workers of every stage
//!
//! Counters are plain atomics: they are only read for progress lines and
//! the end-of-run summary.

use crate::output::CrawlSummary;
use crate::state::Stage;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Live counters of one run
#[derive(Debug, Default)]
pub struct CrawlStatistics {
    areas: AtomicU64,
    sub_areas: AtomicU64,
    pages: AtomicU64,
    details: AtomicU64,
    houses: AtomicU64,
    dropped: AtomicU64,
    failed_fetches: AtomicU64,
}

impl CrawlStatistics {
    pub fn new() -> Self {
        Self::default()
    }

    fn counter(&self, stage: Stage) -> &AtomicU64 {
        match stage {
            Stage::Area => &self.areas,
            Stage::SubArea => &self.sub_areas,
            Stage::Page => &self.pages,
            Stage::Detail => &self.details,
            Stage::House => &self.houses,
        }
    }

    /// Counts one item for `stage` and returns the new running total
    pub fn record(&self, stage: Stage) -> u64 {
        self.counter(stage).fetch_add(1, Ordering::Relaxed) + 1
    }

    /// Current count of `stage`
    pub fn count(&self, stage: Stage) -> u64 {
        self.counter(stage).load(Ordering::Relaxed)
    }

    /// Counts URLs that a full frontier refused
    pub fn record_dropped(&self, dropped: u64) {
        self.dropped.fetch_add(dropped, Ordering::Relaxed);
    }

    /// Counts fetches that failed while a frontier drained
    pub fn record_failed(&self, failed: usize) {
        self.failed_fetches
            .fetch_add(failed as u64, Ordering::Relaxed);
    }

    /// Snapshot of all counters
    pub fn summary(&self, elapsed: Duration) -> CrawlSummary {
        CrawlSummary {
            areas: self.count(Stage::Area),
            sub_areas: self.count(Stage::SubArea),
            pages: self.count(Stage::Page),
            details: self.count(Stage::Detail),
            houses: self.count(Stage::House),
            dropped: self.dropped.load(Ordering::Relaxed),
            failed_fetches: self.failed_fetches.load(Ordering::Relaxed),
            elapsed,
        }
    }
}

/// Logs the end-of-run summary
pub fn log_summary(summary: &CrawlSummary) {
    tracing::info!(
        "Crawl finished: {} areas, {} sub-areas, {} pages, {} details, {} houses",
        summary.areas,
        summary.sub_areas,
        summary.pages,
        summary.details,
        summary.houses
    );

    if summary.dropped > 0 {
        tracing::warn!("{} URLs dropped because a frontier was full", summary.dropped);
    }
    if summary.failed_fetches > 0 {
        tracing::warn!("{} fetches failed", summary.failed_fetches);
    }

    tracing::info!("Total process time: {:?}", summary.elapsed);
}

/// Prints the summary to stdout in a formatted manner
pub fn print_summary(summary: &CrawlSummary) {
    println!("=== Crawl Summary ===\n");

    println!("Discovered:");
    for stage in Stage::ALL {
        println!("  {:<10} {}", stage.as_str(), summary.count(stage));
    }
    println!();

    println!("Problems:");
    println!("  Dropped (frontier full): {}", summary.dropped);
    println!("  Failed fetches: {}", summary.failed_fetches);
    println!();

    println!("Elapsed: {:.1}s", summary.elapsed.as_secs_f64());
}
