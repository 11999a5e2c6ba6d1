use std::path::PathBuf;
use std::time::Duration;

/// Error types for the sleep-message pipeline
#[derive(Debug, thiserror::Error)]
pub enum SleepError {
    /// The remote resource could not be reached at all
    #[error("Failed to fetch {url}: {message}")]
    Fetch { url: String, message: String },

    /// The server answered with a non-success status
    #[error("Request to {url} failed with status {status}")]
    Request { url: String, status: u16 },

    /// The request did not complete within the configured timeout
    #[error("Request to {url} timed out after {timeout:?}")]
    Timeout { url: String, timeout: Duration },

    /// Malformed HTML or JSON, or an expected structure is missing
    #[error("Parse error: {0}")]
    Parse(String),

    /// The cache directory is missing a required document
    #[error("Cache error: {0}")]
    Cache(String),

    /// Filesystem failure
    #[error("I/O error at '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Invalid configuration value
    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl SleepError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        SleepError::Io {
            path: path.into(),
            source,
        }
    }
}

impl From<reqwest::Error> for SleepError {
    fn from(err: reqwest::Error) -> Self {
        let url = err
            .url()
            .map(|u| u.to_string())
            .unwrap_or_else(|| "<unknown>".to_string());
        match err.status() {
            Some(status) => SleepError::Request {
                url,
                status: status.as_u16(),
            },
            None => SleepError::Fetch {
                url,
                message: err.to_string(),
            },
        }
    }
}

/// Result type for pipeline operations
pub type SleepResult<T> = Result<T, SleepError>;
