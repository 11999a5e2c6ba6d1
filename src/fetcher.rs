//! Concurrent download of translation files
//!
//! [`fetch_all`] dispatches every descriptor at once and joins the whole wave
//! before returning. Two semaphores bound the wave: one for the total number
//! of requests in flight, one per remote host. Each request is additionally
//! bounded by the overall request timeout. A failing item is logged and
//! counted, it never aborts the batch.

use crate::config::{Config, FetchLimits};
use crate::document::canonicalize_json;
use crate::error::{SleepError, SleepResult};
use crate::source::{HttpSource, host_of};
use futures::future::join_all;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::Semaphore;
use tracing::{debug, info, warn};

/// Not a translation file, even though the repository ships it
const NON_DATA_FILE: &str = "README.md";

/// A file to download: target file name and where to get it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteFile {
    pub name: String,
    pub download_url: String,
}

/// One entry of a directory-listing response; extra fields are ignored
#[derive(Debug, Deserialize)]
struct ListingEntry {
    name: String,
    download_url: Option<String>,
}

/// Outcome of the download phase
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadReport {
    /// Translation files present in the listing
    pub found: usize,
    /// Files written to the cache
    pub downloaded: usize,
    pub cache_dir: PathBuf,
}

/// Parse a directory listing and keep the translation files
///
/// Entries without a download URL (sub-directories) are dropped.
pub fn parse_listing(text: &str) -> SleepResult<Vec<RemoteFile>> {
    let entries: Vec<ListingEntry> = serde_json::from_str(text)
        .map_err(|e| SleepError::Parse(format!("Invalid directory listing: {}", e)))?;

    Ok(entries
        .into_iter()
        .filter(|entry| entry.name.ends_with(".json") && entry.name != NON_DATA_FILE)
        .filter_map(|entry| {
            entry.download_url.map(|download_url| RemoteFile {
                name: entry.name,
                download_url,
            })
        })
        .collect())
}

/// Fetch the remote directory listing
pub async fn list_remote_files(
    source: &dyn HttpSource,
    listing_url: &str,
) -> SleepResult<Vec<RemoteFile>> {
    let text = source.get_text(listing_url).await?;
    parse_listing(&text)
}

/// Download every file into `dest_dir`, returning how many succeeded
///
/// Invalid `limits` fail every item: nothing is requested and 0 is returned.
pub async fn fetch_all(
    source: &dyn HttpSource,
    files: &[RemoteFile],
    dest_dir: &Path,
    limits: &FetchLimits,
) -> usize {
    if files.is_empty() {
        return 0;
    }
    if let Err(e) = limits.validate() {
        warn!("Not downloading {} files: {}", files.len(), e);
        return 0;
    }

    if let Err(e) = tokio::fs::create_dir_all(dest_dir).await {
        warn!("Could not create {}: {}", dest_dir.display(), e);
    }

    let global = Semaphore::new(limits.max_connections);
    let mut per_host: HashMap<String, Semaphore> = HashMap::new();
    for file in files {
        per_host
            .entry(host_of(&file.download_url).unwrap_or_default())
            .or_insert_with(|| Semaphore::new(limits.max_per_host));
    }

    let total = files.len();
    let completed = AtomicUsize::new(0);

    let tasks = files.iter().map(|file| {
        let host = per_host.get(&host_of(&file.download_url).unwrap_or_default());
        let global = &global;
        let completed = &completed;
        async move {
            let result = fetch_one(source, file, dest_dir, limits, global, host).await;
            let done = completed.fetch_add(1, Ordering::Relaxed) + 1;
            match &result {
                Ok(()) => debug!("[{}/{}] Downloaded {}", done, total, file.name),
                Err(e) => warn!("[{}/{}] Failed to download {}: {}", done, total, file.name, e),
            }
            result.is_ok()
        }
    });

    join_all(tasks).await.into_iter().filter(|ok| *ok).count()
}

async fn fetch_one(
    source: &dyn HttpSource,
    file: &RemoteFile,
    dest_dir: &Path,
    limits: &FetchLimits,
    global: &Semaphore,
    host: Option<&Semaphore>,
) -> SleepResult<()> {
    validate_file_name(&file.name)?;

    let pool_closed = |_| SleepError::Fetch {
        url: file.download_url.clone(),
        message: "connection pool closed".to_string(),
    };
    let _host_permit = match host {
        Some(semaphore) => Some(semaphore.acquire().await.map_err(pool_closed)?),
        None => None,
    };
    let _permit = global.acquire().await.map_err(pool_closed)?;

    let body = tokio::time::timeout(limits.request_timeout, source.get_text(&file.download_url))
        .await
        .map_err(|_| SleepError::Timeout {
            url: file.download_url.clone(),
            timeout: limits.request_timeout,
        })??;

    let json = canonicalize_json(&body, &file.name)?;

    let path = dest_dir.join(&file.name);
    tokio::fs::write(&path, json)
        .await
        .map_err(|e| SleepError::io(&path, e))
}

/// File names come from the network and must stay inside the target directory
fn validate_file_name(name: &str) -> SleepResult<()> {
    let bad = name.is_empty()
        || name.contains('/')
        || name.contains('\\')
        || name == "."
        || name.contains("..");
    if bad {
        return Err(SleepError::Parse(format!("Refusing unsafe file name '{}'", name)));
    }
    Ok(())
}

/// Download all translation files listed at `config.listing_url` into the cache
pub async fn download_language_files(
    source: &dyn HttpSource,
    config: &Config,
) -> SleepResult<DownloadReport> {
    config.limits.validate()?;
    std::fs::create_dir_all(&config.cache_dir)
        .map_err(|e| SleepError::io(&config.cache_dir, e))?;

    let files = list_remote_files(source, &config.listing_url).await?;
    info!("Found {} language files to download", files.len());

    let downloaded = fetch_all(source, &files, &config.cache_dir, &config.limits).await;
    info!("Downloaded {}/{} language files", downloaded, files.len());

    Ok(DownloadReport {
        found: files.len(),
        downloaded,
        cache_dir: config.cache_dir.clone(),
    })
}
