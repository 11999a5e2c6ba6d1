//! `reqwest`-backed [`HttpSource`]

use crate::error::{SleepError, SleepResult};
use crate::source::HttpSource;
use async_trait::async_trait;
use std::time::Duration;

/// GitHub's API rejects requests without a user agent
const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Real network source
///
/// Wraps a single shared `reqwest::Client` so the connection pool is reused
/// across the whole download wave.
#[derive(Clone, Debug)]
pub struct ReqwestSource {
    client: reqwest::Client,
}

impl ReqwestSource {
    /// Create a source whose every request is bounded by `timeout`
    ///
    /// # Returns
    ///
    /// * `Ok(Self)` - New source
    /// * `Err(SleepError)` - If the timeout is zero or the client cannot be built
    pub fn new(timeout: Duration) -> SleepResult<Self> {
        if timeout.is_zero() {
            return Err(SleepError::Config(
                "HTTP timeout must be non-zero".to_string(),
            ));
        }

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| SleepError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl HttpSource for ReqwestSource {
    async fn get_text(&self, url: &str) -> SleepResult<String> {
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SleepError::Request {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        Ok(response.text().await?)
    }

    fn source_name(&self) -> &str {
        "reqwest"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_with_timeout() {
        let source = ReqwestSource::new(Duration::from_secs(30));
        assert!(source.is_ok());
        assert_eq!(source.unwrap().source_name(), "reqwest");
    }

    #[test]
    fn test_new_rejects_zero_timeout() {
        match ReqwestSource::new(Duration::ZERO) {
            Err(SleepError::Config(msg)) => assert!(msg.contains("non-zero")),
            _ => panic!("Expected Config error"),
        }
    }

    #[test]
    fn test_user_agent_names_the_crate() {
        assert!(USER_AGENT.starts_with("sleep-remover/"));
    }

    #[tokio::test]
    #[ignore] // Run with: cargo test -- --ignored
    async fn test_real_wiki_page() {
        let source = ReqwestSource::new(Duration::from_secs(30)).unwrap();
        let html = source
            .get_text(crate::config::DEFAULT_WIKI_URL)
            .await
            .unwrap();
        assert!(html.contains("Current language list"));
    }

    #[tokio::test]
    #[ignore] // Run with: cargo test -- --ignored
    async fn test_real_missing_page_is_request_error() {
        let source = ReqwestSource::new(Duration::from_secs(30)).unwrap();
        let result = source
            .get_text("https://minecraft.wiki/w/This_page_does_not_exist_sleep_remover")
            .await;
        match result {
            Err(SleepError::Request { status, .. }) => assert_eq!(status, 404),
            other => panic!("Expected Request error, got {:?}", other),
        }
    }
}
