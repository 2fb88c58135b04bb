//! Bounded frontier of URLs for one stage, drained by paced workers
//!
//! This module handles:
//! - Capacity-limited enqueueing
//! - Concurrent draining by a fixed number of workers
//! - Per-worker pacing between requests
//! - Completion detection (empty queue and nothing in flight)

use crate::crawler::fetcher::Fetcher;
use crate::state::{Stage, WorkerPace};
use scraper::Html;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::Notify;

#[derive(Debug, Error)]
pub enum FrontierError {
    #[error("{stage} frontier is full ({capacity} entries), dropping {url}")]
    CapacityExceeded {
        stage: Stage,
        capacity: usize,
        url: String,
    },
}

/// Outcome of draining a frontier
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DrainReport {
    /// URLs fetched and handed to the handler
    pub fetched: usize,
    /// URLs dropped after a fetch error
    pub failed: usize,
}

impl DrainReport {
    fn merge(mut self, other: DrainReport) -> Self {
        self.fetched += other.fetched;
        self.failed += other.failed;
        self
    }
}

#[derive(Debug, Default)]
struct QueueState {
    pending: VecDeque<String>,
    in_flight: usize,
}

/// Work queue of the URLs one stage must visit
///
/// The frontier is shared by reference between the workers draining it and
/// the handlers of the previous stage filling it.
#[derive(Debug)]
pub struct Frontier {
    stage: Stage,
    capacity: usize,
    state: Mutex<QueueState>,
    /// Signalled whenever a URL is queued or a fetch finishes
    changed: Notify,
}

impl Frontier {
    /// Creates an empty frontier holding at most `capacity` pending URLs
    pub fn new(stage: Stage, capacity: usize) -> Self {
        Self {
            stage,
            capacity,
            state: Mutex::new(QueueState::default()),
            changed: Notify::new(),
        }
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// Appends a URL
    ///
    /// # Errors
    ///
    /// Returns `FrontierError::CapacityExceeded` when the frontier already
    /// holds `capacity` pending URLs. The URL is not queued.
    pub fn enqueue(&self, url: String) -> Result<(), FrontierError> {
        let mut state = self.lock();
        if state.pending.len() >= self.capacity {
            return Err(FrontierError::CapacityExceeded {
                stage: self.stage,
                capacity: self.capacity,
                url,
            });
        }
        state.pending.push_back(url);
        drop(state);
        self.changed.notify_waiters();
        Ok(())
    }

    /// Number of pending URLs
    pub fn len(&self) -> usize {
        self.lock().pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drains the frontier with `workers` concurrent workers
    ///
    /// Each worker repeatedly takes one URL, waits until `delay` has passed
    /// since its own previous request, fetches the URL and hands the parsed
    /// document to `handler` together with the request URL. Fetch failures
    /// are logged and the URL is dropped without retry.
    ///
    /// Returns once the queue is empty and no worker has a URL in flight.
    pub async fn run<H>(
        &self,
        fetcher: &Fetcher,
        workers: usize,
        delay: Duration,
        handler: H,
    ) -> DrainReport
    where
        H: Fn(&Html, &str),
    {
        tracing::debug!(
            "Draining {} frontier: {} URLs, {} workers, {:?} delay",
            self.stage,
            self.len(),
            workers,
            delay
        );

        let tasks = (0..workers.max(1))
            .map(|worker_id| self.work(worker_id, fetcher, delay, &handler));

        futures::future::join_all(tasks)
            .await
            .into_iter()
            .fold(DrainReport::default(), DrainReport::merge)
    }

    async fn work<H>(
        &self,
        worker_id: usize,
        fetcher: &Fetcher,
        delay: Duration,
        handler: &H,
    ) -> DrainReport
    where
        H: Fn(&Html, &str),
    {
        let mut pace = WorkerPace::new(delay);
        let mut report = DrainReport::default();

        loop {
            // Registered before looking at the queue so no signal is missed
            let changed = self.changed.notified();
            let url = match self.take() {
                Next::Url(url) => url,
                Next::Wait => {
                    changed.await;
                    continue;
                }
                Next::Done => break,
            };

            pace.wait_turn().await;
            tracing::info!("Visiting {}", url);

            match fetcher.fetch(&url).await {
                Ok(page) => {
                    dispatch(&page.body, &url, handler);
                    report.fetched += 1;
                }
                Err(e) => {
                    tracing::warn!("Dropping {}: {}", url, e);
                    report.failed += 1;
                }
            }

            self.finish();
        }

        tracing::trace!(
            "{} worker {} finished after {} requests",
            self.stage,
            worker_id,
            pace.request_count
        );
        report
    }

    fn take(&self) -> Next {
        let mut state = self.lock();
        match state.pending.pop_front() {
            Some(url) => {
                state.in_flight += 1;
                Next::Url(url)
            }
            // Another worker's handler may still refill this frontier
            None if state.in_flight > 0 => Next::Wait,
            None => Next::Done,
        }
    }

    fn finish(&self) {
        let mut state = self.lock();
        state.in_flight = state.in_flight.saturating_sub(1);
        drop(state);
        self.changed.notify_waiters();
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, QueueState> {
        // A poisoned queue is still structurally valid
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

enum Next {
    Url(String),
    Wait,
    Done,
}

/// Parses the body and runs the handler; the document never outlives this call
fn dispatch<H>(body: &str, url: &str, handler: &H)
where
    H: Fn(&Html, &str),
{
    let document = Html::parse_document(body);
    handler(&document, url);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::UserAgentConfig;
    use crate::crawler::fetcher::build_http_client;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex as StdMutex;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn create_fetcher() -> Fetcher {
        let config = UserAgentConfig {
            crawler_name: "TestCrawler".to_string(),
            crawler_version: "1.0".to_string(),
            contact_url: "https://example.com/about".to_string(),
            contact_email: "admin@example.com".to_string(),
        };
        let client = build_http_client(&config, Duration::from_secs(5)).unwrap();
        Fetcher::new(client, vec!["127.0.0.1".to_string()])
    }

    #[test]
    fn test_new_frontier_is_empty() {
        let frontier = Frontier::new(Stage::Page, 10);
        assert!(frontier.is_empty());
        assert_eq!(frontier.stage(), Stage::Page);
    }

    #[test]
    fn test_enqueue_until_capacity() {
        let frontier = Frontier::new(Stage::Area, 2);
        assert!(frontier.enqueue("a".to_string()).is_ok());
        assert!(frontier.enqueue("b".to_string()).is_ok());

        let err = frontier.enqueue("c".to_string()).unwrap_err();
        assert!(matches!(
            err,
            FrontierError::CapacityExceeded {
                stage: Stage::Area,
                capacity: 2,
                ref url,
            } if url == "c"
        ));
        assert_eq!(frontier.len(), 2);
    }

    #[tokio::test]
    async fn test_run_on_empty_frontier_returns() {
        let frontier = Frontier::new(Stage::Detail, 10);
        let report = frontier
            .run(&create_fetcher(), 3, Duration::ZERO, |_, _| {})
            .await;
        assert_eq!(report, DrainReport::default());
    }

    #[tokio::test]
    async fn test_run_visits_every_url_once() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<p>ok</p>"))
            .mount(&server)
            .await;

        let frontier = Frontier::new(Stage::Page, 100);
        for i in 0..20 {
            frontier
                .enqueue(format!("{}/page/{}/", server.uri(), i))
                .unwrap();
        }

        let visited = StdMutex::new(Vec::new());
        let report = frontier
            .run(&create_fetcher(), 4, Duration::ZERO, |_, url| {
                visited.lock().unwrap().push(url.to_string());
            })
            .await;

        let mut visited = visited.into_inner().unwrap();
        visited.sort();
        visited.dedup();
        assert_eq!(visited.len(), 20);
        assert_eq!(report.fetched, 20);
        assert_eq!(report.failed, 0);
        assert!(frontier.is_empty());
    }

    #[tokio::test]
    async fn test_failed_fetch_is_dropped() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let frontier = Frontier::new(Stage::SubArea, 10);
        frontier.enqueue(format!("{}/broken/", server.uri())).unwrap();

        let calls = AtomicUsize::new(0);
        let report = frontier
            .run(&create_fetcher(), 2, Duration::ZERO, |_, _| {
                calls.fetch_add(1, Ordering::SeqCst);
            })
            .await;

        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(report.failed, 1);
        assert_eq!(server.received_requests().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_handler_feeds_next_frontier() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200).set_body_string("<a href='/x/'>x</a><a href='/y/'>y</a>"),
            )
            .mount(&server)
            .await;

        let current = Frontier::new(Stage::Area, 10);
        let next = Frontier::new(Stage::SubArea, 10);
        current.enqueue(format!("{}/seed/", server.uri())).unwrap();

        let selector = scraper::Selector::parse("a").unwrap();
        current
            .run(&create_fetcher(), 1, Duration::ZERO, |document, _| {
                for a in document.select(&selector) {
                    if let Some(href) = a.value().attr("href") {
                        next.enqueue(href.to_string()).unwrap();
                    }
                }
            })
            .await;

        assert_eq!(next.len(), 2);
    }

    #[tokio::test]
    async fn test_idle_worker_wakes_for_url_queued_mid_drain() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let frontier = Frontier::new(Stage::Page, 10);
        frontier.enqueue(format!("{}/first", server.uri())).unwrap();

        let refill = format!("{}/second", server.uri());
        let visited = StdMutex::new(Vec::new());
        let report = tokio::time::timeout(
            Duration::from_secs(5),
            frontier.run(&create_fetcher(), 2, Duration::ZERO, |_, url| {
                visited.lock().unwrap().push(url.to_string());
                if url.ends_with("/first") {
                    frontier.enqueue(refill.clone()).unwrap();
                }
            }),
        )
        .await
        .expect("drain did not finish");

        assert_eq!(report.fetched, 2);
        assert_eq!(visited.into_inner().unwrap().len(), 2);
        assert!(frontier.is_empty());
    }

    #[tokio::test]
    async fn test_worker_pacing_applies_between_requests() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let frontier = Frontier::new(Stage::Page, 10);
        for i in 0..3 {
            frontier.enqueue(format!("{}/{}", server.uri(), i)).unwrap();
        }

        let start = std::time::Instant::now();
        frontier
            .run(&create_fetcher(), 1, Duration::from_millis(50), |_, _| {})
            .await;

        // First request is immediate, the other two wait
        assert!(start.elapsed() >= Duration::from_millis(100));
    }
}
