//! Mock HTTP source for testing
//!
//! Serves canned responses from memory so the scraper, the fetcher and the
//! end-to-end pipeline can be exercised without network access.
//!
//! # Example
//!
//! ```ignore
//! use sleep_remover::{HttpSource, MockSource};
//!
//! #[tokio::test]
//! async fn test_page() {
//!     let mock = MockSource::new().with_page("https://wiki/Language", "<html></html>");
//!     let html = mock.get_text("https://wiki/Language").await.unwrap();
//!     assert_eq!(html, "<html></html>");
//! }
//! ```

use crate::error::{SleepError, SleepResult};
use crate::source::HttpSource;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// What the mock answers for one URL
#[derive(Debug, Clone)]
pub enum MockResponse {
    /// 2xx with this body
    Body(String),
    /// Non-success HTTP status
    Status(u16),
    /// Transport failure
    Unreachable(String),
}

/// In-memory [`HttpSource`]
///
/// Unknown URLs answer 404. Every call is recorded so tests can assert on
/// call counts and on the peak number of requests in flight.
#[derive(Debug, Default)]
pub struct MockSource {
    responses: HashMap<String, MockResponse>,
    /// Optional simulated network delay applied to every request
    delay: Duration,
    calls: AtomicUsize,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
    requested: Mutex<Vec<String>>,
}

impl MockSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, url: &str, body: impl Into<String>) -> Self {
        self.responses
            .insert(url.to_string(), MockResponse::Body(body.into()));
        self
    }

    pub fn with_status(mut self, url: &str, status: u16) -> Self {
        self.responses
            .insert(url.to_string(), MockResponse::Status(status));
        self
    }

    pub fn with_unreachable(mut self, url: &str, message: &str) -> Self {
        self.responses.insert(
            url.to_string(),
            MockResponse::Unreachable(message.to_string()),
        );
        self
    }

    /// Delay every response, to simulate a slow network
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Number of `get_text` calls so far
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Highest number of requests that were in flight at the same time
    pub fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }

    /// URLs requested, in call order
    pub fn requested_urls(&self) -> Vec<String> {
        self.requested
            .lock()
            .map(|urls| urls.clone())
            .unwrap_or_default()
    }

    fn respond(&self, url: &str) -> SleepResult<String> {
        match self.responses.get(url) {
            Some(MockResponse::Body(body)) => Ok(body.clone()),
            Some(MockResponse::Status(status)) => Err(SleepError::Request {
                url: url.to_string(),
                status: *status,
            }),
            Some(MockResponse::Unreachable(message)) => Err(SleepError::Fetch {
                url: url.to_string(),
                message: message.clone(),
            }),
            None => Err(SleepError::Request {
                url: url.to_string(),
                status: 404,
            }),
        }
    }
}

/// Counts one request in flight until dropped, even when the caller gives up
struct InFlight<'a>(&'a AtomicUsize);

impl<'a> InFlight<'a> {
    fn enter(counter: &'a AtomicUsize) -> (Self, usize) {
        let now = counter.fetch_add(1, Ordering::SeqCst) + 1;
        (InFlight(counter), now)
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl HttpSource for MockSource {
    async fn get_text(&self, url: &str) -> SleepResult<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut urls) = self.requested.lock() {
            urls.push(url.to_string());
        }

        let (_guard, now) = InFlight::enter(&self.in_flight);
        self.peak_in_flight.fetch_max(now, Ordering::SeqCst);

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        self.respond(url)
    }

    fn source_name(&self) -> &str {
        "mock"
    }
}
