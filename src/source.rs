//! HTTP source abstraction
//!
//! The pipeline never talks to `reqwest` directly. Everything that needs a
//! remote document goes through [`HttpSource`], which keeps the scraping and
//! download logic testable against [`crate::mock::MockSource`].
//!
//! # Example
//!
//! ```ignore
//! use sleep_remover::{HttpSource, ReqwestSource};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let source = ReqwestSource::new(std::time::Duration::from_secs(30))?;
//!     let html = source.get_text("https://minecraft.wiki/w/Language").await?;
//!     println!("{} bytes", html.len());
//!     Ok(())
//! }
//! ```

use crate::error::SleepResult;
use async_trait::async_trait;

/// Generic trait for anything that can fetch a URL as text
///
/// Implementations must return `SleepError::Request` for non-success HTTP
/// statuses so callers can tell a reachable-but-failing server apart from
/// a transport failure.
#[async_trait]
pub trait HttpSource: Send + Sync {
    /// Fetch the body of `url` as UTF-8 text
    async fn get_text(&self, url: &str) -> SleepResult<String>;

    /// Name of this source, used in log lines
    fn source_name(&self) -> &str;
}

/// Host part of a URL, lowercased; `None` if the URL does not parse or has no host
pub fn host_of(url: &str) -> Option<String> {
    reqwest::Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(|h| h.to_lowercase()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_host_of_regular_url() {
        assert_eq!(
            host_of("https://raw.githubusercontent.com/a/b/main/en_gb.json"),
            Some("raw.githubusercontent.com".to_string())
        );
    }

    #[test]
    fn test_host_of_uppercase_host() {
        assert_eq!(
            host_of("https://Minecraft.Wiki/w/Language"),
            Some("minecraft.wiki".to_string())
        );
    }

    #[test]
    fn test_host_of_invalid_url() {
        assert_eq!(host_of("not a url"), None);
        assert_eq!(host_of(""), None);
    }
}
