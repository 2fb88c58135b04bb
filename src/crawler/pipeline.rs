//! Pipeline coordinator - the five-stage crawl script
//!
//! The pipeline fetches the seed page directly, then drains the four
//! frontiers one after another. Each frontier is filled only by the handlers
//! of the frontier drained before it, and a frontier is drained only after
//! the previous one has returned, so stages never overlap.

use crate::config::{Config, FrontierConfig};
use crate::crawler::dedup::DedupStore;
use crate::crawler::fetcher::{build_http_client, Fetcher};
use crate::crawler::frontier::{Frontier, FrontierError};
use crate::extract::{
    area_links, detail_links, extract_house, page_links, sub_area_hrefs, Selectors,
};
use crate::output::{log_summary, CrawlStatistics, CrawlSummary, CsvSink, RecordSink};
use crate::state::Stage;
use crate::url::{join_suffix, ListingUrlPattern};
use crate::Result;
use scraper::Html;
use std::path::Path;
use std::time::{Duration, Instant};

/// Main pipeline structure
///
/// Frontiers are named after the URLs they hold: `areas` holds area page
/// URLs found on the seed page, `details` holds listing detail URLs.
pub struct Pipeline {
    config: Config,
    fetcher: Fetcher,
    selectors: Selectors,
    listing_pattern: ListingUrlPattern,
    sink: Box<dyn RecordSink>,
    stats: CrawlStatistics,

    sub_areas_seen: DedupStore,
    details_seen: Option<DedupStore>,

    areas: Frontier,
    sub_areas: Frontier,
    pages: Frontier,
    details: Frontier,
}

impl Pipeline {
    /// Creates a pipeline writing to the configured CSV file
    ///
    /// The output file is opened here, before any request is made, so an
    /// unwritable destination aborts the run up front.
    ///
    /// # Errors
    ///
    /// Fails if the CSV file cannot be created, the HTTP client cannot be
    /// built or a selector or the listing pattern does not compile.
    pub fn new(config: Config) -> Result<Self> {
        let sink = CsvSink::create(Path::new(&config.output.csv_path))?;
        Self::with_sink(config, Box::new(sink))
    }

    /// Creates a pipeline writing to an arbitrary sink
    pub fn with_sink(config: Config, sink: Box<dyn RecordSink>) -> Result<Self> {
        let client = build_http_client(
            &config.user_agent,
            Duration::from_secs(config.crawl.request_timeout_secs),
        )?;
        let fetcher = Fetcher::new(client, config.site.allowed_domains.clone());
        let listing_pattern =
            ListingUrlPattern::new(&config.site.base_url, &config.site.listing_path)?;

        let frontiers = &config.frontier;
        let areas = Frontier::new(Stage::Area, frontiers.area.capacity);
        let sub_areas = Frontier::new(Stage::SubArea, frontiers.sub_area.capacity);
        let pages = Frontier::new(Stage::Page, frontiers.page.capacity);
        let details = Frontier::new(Stage::Detail, frontiers.detail.capacity);

        let details_seen = config.crawl.dedup_listings.then(DedupStore::new);

        Ok(Self {
            fetcher,
            selectors: Selectors::new()?,
            listing_pattern,
            sink,
            stats: CrawlStatistics::new(),
            sub_areas_seen: DedupStore::new(),
            details_seen,
            areas,
            sub_areas,
            pages,
            details,
            config,
        })
    }

    /// Runs all five stages and returns the run summary
    ///
    /// Fetch failures and full frontiers never abort the run; they are
    /// logged and counted in the summary.
    ///
    /// # Errors
    ///
    /// Only a failure to flush the sink at the end is returned.
    pub async fn run(&self) -> Result<CrawlSummary> {
        let start_time = Instant::now();
        let frontiers = &self.config.frontier;

        tracing::info!("Starting crawl at {}", self.config.site.seed_url());

        // Step 1: seed page -> area URLs
        self.seed().await;

        // Step 2: area pages -> sub-area URLs
        self.drain(&self.areas, &frontiers.area, |document, url| {
            self.on_area_page(document, url)
        })
        .await;

        // Step 3: sub-area pages -> listing page URLs
        self.drain(&self.sub_areas, &frontiers.sub_area, |document, url| {
            self.on_sub_area_page(document, url)
        })
        .await;

        // Step 4: listing pages -> detail URLs
        self.drain(&self.pages, &frontiers.page, |document, url| {
            self.on_listing_page(document, url)
        })
        .await;

        // Step 5: detail pages -> records
        self.drain(&self.details, &frontiers.detail, |document, url| {
            self.on_detail_page(document, url)
        })
        .await;

        self.sink.flush()?;

        let summary = self.stats.summary(start_time.elapsed());
        log_summary(&summary);
        Ok(summary)
    }

    /// Fetches the seed page directly and fills the area frontier
    async fn seed(&self) {
        let seed_url = self.config.site.seed_url();
        tracing::info!("Visiting {}", seed_url);

        match self.fetcher.fetch(&seed_url).await {
            Ok(page) => {
                let links = {
                    let document = Html::parse_document(&page.body);
                    area_links(&document, &self.selectors, &self.config.site.base_url)
                };
                if links.is_empty() {
                    tracing::warn!("No area links found on {}", seed_url);
                }
                for link in links {
                    self.push(&self.areas, link);
                }
            }
            Err(e) => {
                tracing::error!("Failed to fetch seed page: {}", e);
                self.stats.record_failed(1);
            }
        }
    }

    /// Drains one frontier with its configured workers and delay
    async fn drain<H>(&self, frontier: &Frontier, settings: &FrontierConfig, handler: H)
    where
        H: Fn(&Html, &str),
    {
        let stage = frontier.stage();
        tracing::info!("Crawling {} {} URLs", frontier.len(), stage);

        let report = frontier
            .run(&self.fetcher, settings.workers, settings.delay(), handler)
            .await;
        self.stats.record_failed(report.failed);

        tracing::info!(
            "Finished {} URLs: {} fetched, {} failed",
            stage,
            report.fetched,
            report.failed
        );
    }

    fn on_area_page(&self, document: &Html, _url: &str) {
        for href in sub_area_hrefs(document, &self.selectors) {
            if !self.sub_areas_seen.seen_and_mark(&href) {
                tracing::debug!("Skipping duplicate sub-area {}", href);
                continue;
            }
            self.push(&self.sub_areas, join_suffix(&self.config.site.base_url, &href));
        }
    }

    fn on_sub_area_page(&self, document: &Html, url: &str) {
        let mut links = page_links(document, &self.selectors, url);
        while let Some(link) = links.next() {
            if let Err(e) = self.try_push(&self.pages, link) {
                // Every later page of this sub-area would be refused too
                let dropped = links.remaining() + 1;
                tracing::warn!("{}; {} page URLs of {} dropped", e, dropped, url);
                self.stats.record_dropped(dropped);
                return;
            }
        }
    }

    fn on_listing_page(&self, document: &Html, _url: &str) {
        for link in detail_links(document, &self.selectors, &self.listing_pattern) {
            if let Some(seen) = &self.details_seen {
                let key = self.listing_pattern.listing_id(&link).unwrap_or(&link);
                if !seen.seen_and_mark(key) {
                    tracing::debug!("Skipping duplicate listing {}", link);
                    continue;
                }
            }
            self.push(&self.details, link);
        }
    }

    fn on_detail_page(&self, document: &Html, url: &str) {
        let house = extract_house(document, &self.selectors, url);
        let title = house.title.clone();

        match self.sink.emit(house) {
            Ok(id) => {
                self.stats.record(Stage::House);
                tracing::info!("Adding house [{}]: {} {}", id, title, url);
            }
            Err(e) => tracing::error!("Failed to write record for {}: {}", url, e),
        }
    }

    /// Enqueues a discovered URL, counting it or the drop
    fn push(&self, frontier: &Frontier, url: String) {
        if let Err(e) = self.try_push(frontier, url) {
            tracing::warn!("{}", e);
            self.stats.record_dropped(1);
        }
    }

    /// Enqueues and counts a discovered URL, leaving a refusal to the caller
    fn try_push(
        &self,
        frontier: &Frontier,
        url: String,
    ) -> std::result::Result<(), FrontierError> {
        let stage = frontier.stage();
        frontier.enqueue(url.clone())?;
        let count = self.stats.record(stage);
        tracing::info!("Adding {} URL [{}]: {}", stage, count, url);
        Ok(())
    }

    /// Current statistics, for progress reporting
    pub fn statistics(&self) -> &CrawlStatistics {
        &self.stats
    }
}

/// Runs a complete crawl with the given configuration
///
/// # Example
///
/// ```no_run
/// use lianjia_harvest::config::load_config;
/// use lianjia_harvest::crawler::run_crawl;
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = load_config(Path::new("lianjia.toml"))?;
/// let summary = run_crawl(config).await?;
/// println!("{} houses", summary.houses);
/// # Ok(())
/// # }
/// ```
pub async fn run_crawl(config: Config) -> Result<CrawlSummary> {
    let pipeline = Pipeline::new(config)?;
    pipeline.run().await
}
