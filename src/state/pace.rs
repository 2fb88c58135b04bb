use std::time::{Duration, Instant};

/// Tracks the request timing of a single worker
///
/// Pacing is per worker, not global: each worker waits `delay` after its
/// own previous request, so the aggregate rate grows with the worker count.
#[derive(Debug, Clone)]
pub struct WorkerPace {
    /// Minimum time between two requests of this worker
    delay: Duration,

    /// Timestamp of this worker's last request
    last_request_time: Option<Instant>,

    /// Number of requests this worker has made
    pub request_count: u32,
}

impl WorkerPace {
    /// Creates a pace tracker that has not made any request yet
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            last_request_time: None,
            request_count: 0,
        }
    }

    /// Calculates the time until the next request can be made
    ///
    /// Returns None if a request can be made now. The first request is
    /// never delayed.
    pub fn time_until_next_request(&self, now: Instant) -> Option<Duration> {
        let last = self.last_request_time?;
        let elapsed = now.saturating_duration_since(last);
        if elapsed < self.delay {
            Some(self.delay - elapsed)
        } else {
            None
        }
    }

    /// Records that a request was made
    pub fn record_request(&mut self, now: Instant) {
        self.request_count += 1;
        self.last_request_time = Some(now);
    }

    /// Sleeps until the delay since the previous request has elapsed, then
    /// records the new request
    pub async fn wait_turn(&mut self) {
        if let Some(wait) = self.time_until_next_request(Instant::now()) {
            tokio::time::sleep(wait).await;
        }
        self.record_request(Instant::now());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_request_not_delayed() {
        let pace = WorkerPace::new(Duration::from_secs(2));
        assert_eq!(pace.time_until_next_request(Instant::now()), None);
        assert_eq!(pace.request_count, 0);
    }

    #[test]
    fn test_request_too_soon() {
        let mut pace = WorkerPace::new(Duration::from_millis(1000));
        let now = Instant::now();
        pace.record_request(now);

        let wait = pace
            .time_until_next_request(now + Duration::from_millis(400))
            .unwrap();
        assert_eq!(wait, Duration::from_millis(600));
    }

    #[test]
    fn test_request_after_delay() {
        let mut pace = WorkerPace::new(Duration::from_millis(1000));
        let now = Instant::now();
        pace.record_request(now);

        assert_eq!(
            pace.time_until_next_request(now + Duration::from_millis(1000)),
            None
        );
    }

    #[test]
    fn test_zero_delay_never_waits() {
        let mut pace = WorkerPace::new(Duration::ZERO);
        let now = Instant::now();
        pace.record_request(now);
        assert_eq!(pace.time_until_next_request(now), None);
    }

    #[tokio::test]
    async fn test_wait_turn_spaces_requests() {
        let mut pace = WorkerPace::new(Duration::from_millis(50));
        let start = Instant::now();
        pace.wait_turn().await;
        pace.wait_turn().await;

        assert!(start.elapsed() >= Duration::from_millis(50));
        assert_eq!(pace.request_count, 2);
    }
}
