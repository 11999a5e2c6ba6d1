//! Two-step run: optional download into the cache, then message processing
//! into `{output_path}/lang`.

use crate::config::Config;
use crate::error::SleepResult;
use crate::fetcher::{DownloadReport, download_language_files};
use crate::language_table::LanguageTable;
use crate::processor::{ProcessReport, process_sleep_messages};
use crate::source::HttpSource;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Namespace directory of the resource pack
    pub output_path: PathBuf,
    /// Reuse the existing cache instead of downloading
    pub skip_download: bool,
}

impl RunOptions {
    /// Directory the language documents are written to
    pub fn lang_dir(&self) -> PathBuf {
        lang_dir(&self.output_path)
    }
}

pub fn lang_dir(output_path: &Path) -> PathBuf {
    output_path.join("lang")
}

#[derive(Debug, Clone)]
pub struct RunReport {
    /// `None` when the download step was skipped
    pub download: Option<DownloadReport>,
    pub process: ProcessReport,
}

/// Step 1: refresh the cache, unless the options skip it
pub async fn download_step(
    source: &dyn HttpSource,
    config: &Config,
    options: &RunOptions,
) -> SleepResult<Option<DownloadReport>> {
    if options.skip_download {
        info!("Skipping download, using cache at {}", config.cache_dir.display());
        return Ok(None);
    }
    download_language_files(source, config).await.map(Some)
}

/// Step 2: write the rewritten messages into the options' `lang` directory
pub async fn process_step(
    source: &dyn HttpSource,
    table: &dyn LanguageTable,
    config: &Config,
    options: &RunOptions,
) -> SleepResult<ProcessReport> {
    process_sleep_messages(source, table, config, &options.lang_dir()).await
}

pub async fn run(
    source: &dyn HttpSource,
    table: &dyn LanguageTable,
    config: &Config,
    options: &RunOptions,
) -> SleepResult<RunReport> {
    let download = download_step(source, config, options).await?;
    let process = process_step(source, table, config, options).await?;

    Ok(RunReport { download, process })
}
