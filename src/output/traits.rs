//! Record sink trait and the end-of-run summary type

use crate::model::House;
use crate::state::Stage;
use std::time::Duration;

/// Destination for completed listing records
///
/// Implementations are shared by every House-stage worker, so `emit` takes
/// `&self` and must serialize writes internally.
pub trait RecordSink {
    /// Writes one record and returns the identifier assigned to it
    fn emit(&self, house: House) -> crate::Result<u64>;

    /// Flushes buffered rows to the destination
    fn flush(&self) -> crate::Result<()>;
}

/// Counters reported at the end of a run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlSummary {
    /// Area URLs found on the seed page
    pub areas: u64,
    /// Distinct sub-area URLs queued
    pub sub_areas: u64,
    /// Listing page URLs queued
    pub pages: u64,
    /// Listing detail URLs queued
    pub details: u64,
    /// Records written to the sink
    pub houses: u64,

    /// URLs not queued because a frontier was full
    pub dropped: u64,
    /// URLs dropped after a failed fetch
    pub failed_fetches: u64,

    /// Wall-clock time of the whole run
    pub elapsed: Duration,
}

impl CrawlSummary {
    /// Counter of one stage
    pub fn count(&self, stage: Stage) -> u64 {
        match stage {
            Stage::Area => self.areas,
            Stage::SubArea => self.sub_areas,
            Stage::Page => self.pages,
            Stage::Detail => self.details,
            Stage::House => self.houses,
        }
    }
}
