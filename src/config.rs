//! Runtime configuration
//!
//! All paths and endpoints the pipeline touches live here so that nothing
//! depends on an implicit working-directory layout. Defaults match the public
//! Minecraft Wiki and the `all-minecraft-language` GitHub repository; every
//! value can be overridden from the environment with [`Config::from_env`].
//!
//! | Variable                        | Field                     |
//! |---------------------------------|---------------------------|
//! | `SLEEP_REMOVER_CACHE_DIR`       | `cache_dir`               |
//! | `SLEEP_REMOVER_WIKI_URL`        | `wiki_url`                |
//! | `SLEEP_REMOVER_LISTING_URL`     | `listing_url`             |
//! | `SLEEP_REMOVER_MAX_CONNECTIONS` | `limits.max_connections`  |
//! | `SLEEP_REMOVER_MAX_PER_HOST`    | `limits.max_per_host`     |
//! | `SLEEP_REMOVER_TIMEOUT_SECS`    | `limits.request_timeout`  |

use crate::error::{SleepError, SleepResult};
use std::path::PathBuf;
use std::time::Duration;
use tokio::sync::Semaphore;

pub const DEFAULT_WIKI_URL: &str = "https://minecraft.wiki/w/Language";
pub const DEFAULT_LISTING_URL: &str =
    "https://api.github.com/repos/toxicity188/all-minecraft-language/contents";
pub const DEFAULT_CACHE_DIR: &str = ".cache/languages";
pub const FALLBACK_LOCALE: &str = "en_gb";
pub const SLEEP_MESSAGE_KEY: &str = "sleep.players_sleeping";
/// Used when neither the language file nor the fallback document has the key
pub const DEFAULT_SLEEP_MESSAGE: &str = "%s/%s players sleeping";

/// Connection and timeout bounds for the download wave
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchLimits {
    /// Total requests in flight at once
    pub max_connections: usize,
    /// Requests in flight against a single host
    pub max_per_host: usize,
    /// Overall bound on a single request, body included
    pub request_timeout: Duration,
}

impl Default for FetchLimits {
    fn default() -> Self {
        Self {
            max_connections: 20,
            max_per_host: 10,
            request_timeout: Duration::from_secs(30),
        }
    }
}

impl FetchLimits {
    pub fn validate(&self) -> SleepResult<()> {
        if self.max_connections == 0 {
            return Err(SleepError::Config(
                "max_connections must be at least 1".to_string(),
            ));
        }
        if self.max_per_host == 0 {
            return Err(SleepError::Config(
                "max_per_host must be at least 1".to_string(),
            ));
        }
        if self.max_connections > Semaphore::MAX_PERMITS {
            return Err(SleepError::Config(format!(
                "max_connections must be at most {}",
                Semaphore::MAX_PERMITS
            )));
        }
        if self.max_per_host > Semaphore::MAX_PERMITS {
            return Err(SleepError::Config(format!(
                "max_per_host must be at most {}",
                Semaphore::MAX_PERMITS
            )));
        }
        if self.request_timeout.is_zero() {
            return Err(SleepError::Config(
                "request_timeout must be non-zero".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    /// Wiki page holding the "Current language list" table
    pub wiki_url: String,
    /// Directory-listing endpoint for the translation files
    pub listing_url: String,
    /// Where downloaded translation documents are kept between runs
    pub cache_dir: PathBuf,
    pub fallback_locale: String,
    pub message_key: String,
    pub limits: FetchLimits,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            wiki_url: DEFAULT_WIKI_URL.to_string(),
            listing_url: DEFAULT_LISTING_URL.to_string(),
            cache_dir: PathBuf::from(DEFAULT_CACHE_DIR),
            fallback_locale: FALLBACK_LOCALE.to_string(),
            message_key: SLEEP_MESSAGE_KEY.to_string(),
            limits: FetchLimits::default(),
        }
    }
}

impl Config {
    /// Build a configuration from defaults overridden by `SLEEP_REMOVER_*`
    /// environment variables
    pub fn from_env() -> SleepResult<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup<F>(lookup: F) -> SleepResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Config::default();

        if let Some(dir) = lookup("SLEEP_REMOVER_CACHE_DIR") {
            config.cache_dir = PathBuf::from(dir);
        }
        if let Some(url) = lookup("SLEEP_REMOVER_WIKI_URL") {
            config.wiki_url = url;
        }
        if let Some(url) = lookup("SLEEP_REMOVER_LISTING_URL") {
            config.listing_url = url;
        }
        if let Some(value) = lookup("SLEEP_REMOVER_MAX_CONNECTIONS") {
            config.limits.max_connections =
                parse_number("SLEEP_REMOVER_MAX_CONNECTIONS", &value)?;
        }
        if let Some(value) = lookup("SLEEP_REMOVER_MAX_PER_HOST") {
            config.limits.max_per_host = parse_number("SLEEP_REMOVER_MAX_PER_HOST", &value)?;
        }
        if let Some(value) = lookup("SLEEP_REMOVER_TIMEOUT_SECS") {
            let secs: u64 = parse_number("SLEEP_REMOVER_TIMEOUT_SECS", &value)?;
            config.limits.request_timeout = Duration::from_secs(secs);
        }

        config.limits.validate()?;
        Ok(config)
    }

    pub fn with_cache_dir(mut self, cache_dir: impl Into<PathBuf>) -> Self {
        self.cache_dir = cache_dir.into();
        self
    }

    /// Path of the cached document for `locale`
    pub fn cache_file(&self, locale: &str) -> PathBuf {
        self.cache_dir.join(format!("{}.json", locale))
    }
}

fn parse_number<T: std::str::FromStr>(name: &str, value: &str) -> SleepResult<T> {
    value
        .trim()
        .parse()
        .map_err(|_| SleepError::Config(format!("{} must be a number, got '{}'", name, value)))
}
