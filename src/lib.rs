//! Sleep Remover
//!
//! Builds the `lang/` directory of a Minecraft resource pack in which the
//! "players sleeping" status message (`sleep.players_sleeping`) has its
//! player-count placeholders replaced with question marks, for every
//! language the game ships.
//!
//! # Overview
//!
//! 1. **Language codes** - scraped from the Minecraft Wiki language table
//! 2. **Download** - every translation file is fetched concurrently into a cache
//! 3. **Processing** - the sleep message is resolved, rewritten and written
//!    out per language, then checked for leftover placeholders
//!
//! # Example
//!
//! ```ignore
//! use sleep_remover::{Config, ReqwestSource, RunOptions, WikiLanguageTable, run};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::from_env()?;
//!     let source = ReqwestSource::new(config.limits.request_timeout)?;
//!     let options = RunOptions { output_path: "pack/assets/minecraft".into(), skip_download: false };
//!
//!     let report = run(&source, &WikiLanguageTable::default(), &config, &options).await?;
//!     println!("{} languages written", report.process.processed);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod document;
pub mod error;
pub mod fetcher;
pub mod http_client;
pub mod language_code;
pub mod language_table;
pub mod mock;
pub mod pipeline;
pub mod placeholder;
pub mod processor;
pub mod source;


pub use config::{Config, FetchLimits};
pub use document::TranslationDocument;
pub use error::{SleepError, SleepResult};
pub use fetcher::{DownloadReport, RemoteFile, download_language_files, fetch_all, list_remote_files};
pub use http_client::ReqwestSource;
pub use language_code::LanguageCode;
pub use language_table::{LanguageTable, WikiLanguageTable, extract_language_codes};
pub use mock::{MockResponse, MockSource};
pub use pipeline::{RunOptions, RunReport, download_step, process_step, run};
pub use placeholder::{looks_unrewritten, rewrite_placeholders};
pub use processor::{MessageProcessor, ProcessReport, UnrewrittenMessage, process_sleep_messages};
pub use source::HttpSource;
