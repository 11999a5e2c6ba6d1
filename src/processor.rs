//! Sleep message processing
//!
//! For every language code the processor resolves the sleep message from the
//! cache, neutralizes its placeholders and writes a one-key document into the
//! output directory. Afterwards it re-reads what it wrote and reports any
//! message that still looks like it carries a placeholder. That last pass
//! never touches the files.
//!
//! Message resolution, first hit wins:
//! 1. `{cache_dir}/{code}.json`, if the file exists and has the key
//! 2. the fallback locale's document
//! 3. [`DEFAULT_SLEEP_MESSAGE`]

use crate::config::{Config, DEFAULT_SLEEP_MESSAGE};
use crate::document::TranslationDocument;
use crate::error::{SleepError, SleepResult};
use crate::language_code::LanguageCode;
use crate::language_table::{LanguageTable, extract_language_codes};
use crate::placeholder::{looks_unrewritten, rewrite_placeholders};
use crate::source::HttpSource;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// A written message that still seems to contain a placeholder
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnrewrittenMessage {
    pub code: LanguageCode,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessReport {
    /// Number of output documents written
    pub processed: usize,
    pub output_dir: PathBuf,
    pub unrewritten: Vec<UnrewrittenMessage>,
}

impl ProcessReport {
    pub fn is_clean(&self) -> bool {
        self.unrewritten.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct MessageProcessor {
    config: Config,
}

impl MessageProcessor {
    pub fn new(config: &Config) -> Self {
        Self {
            config: config.clone(),
        }
    }

    /// Sleep message of the fallback document
    ///
    /// # Errors
    ///
    /// `SleepError::Cache` if the fallback document is not in the cache. The
    /// download phase has to run at least once before processing.
    pub fn fallback_message(&self) -> SleepResult<String> {
        let path = self.config.cache_file(&self.config.fallback_locale);
        if !path.exists() {
            return Err(SleepError::Cache(format!(
                "Fallback file {}.json not found in {}. Run without --skip-download first.",
                self.config.fallback_locale,
                self.config.cache_dir.display()
            )));
        }

        let fallback = TranslationDocument::load(&path)?;
        Ok(fallback
            .get_message(&self.config.message_key)
            .unwrap_or(DEFAULT_SLEEP_MESSAGE)
            .to_string())
    }

    /// Source message for `code`, before rewriting
    pub fn resolve_message(&self, code: &LanguageCode, fallback: &str) -> SleepResult<String> {
        let path = self.config.cache_file(code.as_str());
        if !path.exists() {
            debug!("No cached file for {}, using fallback", code);
            return Ok(fallback.to_string());
        }

        let doc = TranslationDocument::load(&path)?;
        Ok(doc
            .get_message(&self.config.message_key)
            .unwrap_or(fallback)
            .to_string())
    }

    /// Write one output document per code into `output_dir`, then verify them
    pub fn process_all(
        &self,
        codes: &[LanguageCode],
        output_dir: &Path,
    ) -> SleepResult<ProcessReport> {
        let fallback = self.fallback_message()?;
        fs::create_dir_all(output_dir).map_err(|e| SleepError::io(output_dir, e))?;

        info!("Processing {} language codes", codes.len());
        for (i, code) in codes.iter().enumerate() {
            let source = self.resolve_message(code, &fallback)?;
            let rewritten = rewrite_placeholders(&source);
            debug!("[{}/{}] {}: {:?} -> {:?}", i + 1, codes.len(), code, source, rewritten);

            TranslationDocument::single(&self.config.message_key, &rewritten)
                .save(&output_dir.join(code.file_name()))?;
        }

        let unrewritten = self.verify_outputs(codes, output_dir)?;

        Ok(ProcessReport {
            processed: codes.len(),
            output_dir: output_dir.to_path_buf(),
            unrewritten,
        })
    }

    /// Re-read the output documents and collect suspicious messages
    pub fn verify_outputs(
        &self,
        codes: &[LanguageCode],
        output_dir: &Path,
    ) -> SleepResult<Vec<UnrewrittenMessage>> {
        let mut flagged = Vec::new();
        for code in codes {
            let path = output_dir.join(code.file_name());
            if !path.exists() {
                continue;
            }

            let doc = TranslationDocument::load(&path)?;
            let message = doc.get_message(&self.config.message_key).unwrap_or_default();
            if looks_unrewritten(message) {
                flagged.push(UnrewrittenMessage {
                    code: code.clone(),
                    message: message.to_string(),
                });
            }
        }
        Ok(flagged)
    }
}

/// Scrape the language codes, then process their sleep messages
pub async fn process_sleep_messages(
    source: &dyn HttpSource,
    table: &dyn LanguageTable,
    config: &Config,
    output_dir: &Path,
) -> SleepResult<ProcessReport> {
    let codes = extract_language_codes(source, &config.wiki_url, table).await?;
    MessageProcessor::new(config).process_all(&codes, output_dir)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const KEY: &str = "sleep.players_sleeping";

    fn codes(raw: &[&str]) -> Vec<LanguageCode> {
        raw.iter()
            .map(|c| LanguageCode::from_cell(c).unwrap())
            .collect()
    }

    fn write_cache(dir: &Path, locale: &str, message: Option<&str>) {
        let mut doc = TranslationDocument::new();
        doc.with_message("menu.quit", "Quit");
        if let Some(message) = message {
            doc.with_message(KEY, message);
        }
        doc.save(&dir.join(format!("{}.json", locale))).unwrap();
    }

    fn setup() -> (TempDir, Config, PathBuf) {
        let dir = TempDir::new().unwrap();
        let cache = dir.path().join("cache");
        fs::create_dir_all(&cache).unwrap();
        let output = dir.path().join("pack").join("lang");
        let config = Config::default().with_cache_dir(&cache);
        (dir, config, output)
    }

    fn output_message(output: &Path, code: &str) -> String {
        let doc = TranslationDocument::load(&output.join(format!("{}.json", code))).unwrap();
        assert_eq!(doc.len(), 1);
        doc.get_message(KEY).unwrap().to_string()
    }

    #[test]
    fn test_missing_fallback_is_cache_error() {
        let (_dir, config, output) = setup();
        let processor = MessageProcessor::new(&config);
        match processor.process_all(&codes(&["de_de"]), &output) {
            Err(SleepError::Cache(msg)) => assert!(msg.contains("en_gb.json")),
            other => panic!("Expected Cache error, got {:?}", other),
        }
        // Nothing is written when the precondition fails
        assert!(!output.exists());
    }

    #[test]
    fn test_language_file_message_is_rewritten() {
        let (_dir, config, output) = setup();
        write_cache(&config.cache_dir, "en_gb", Some("%s/%s players sleeping"));
        write_cache(&config.cache_dir, "de_de", Some("%s/%s Spieler schlafen"));

        let report = MessageProcessor::new(&config)
            .process_all(&codes(&["de_de", "en_gb"]), &output)
            .unwrap();

        assert_eq!(report.processed, 2);
        assert!(report.is_clean());
        assert_eq!(output_message(&output, "de_de"), "??? Spieler schlafen");
        assert_eq!(output_message(&output, "en_gb"), "??? players sleeping");
    }

    #[test]
    fn test_missing_language_file_uses_fallback() {
        let (_dir, config, output) = setup();
        write_cache(&config.cache_dir, "en_gb", Some("%1$s/%2$s are asleep"));

        MessageProcessor::new(&config)
            .process_all(&codes(&["qya_aa"]), &output)
            .unwrap();
        assert_eq!(output_message(&output, "qya_aa"), "??/?? are asleep");
    }

    #[test]
    fn test_missing_key_uses_fallback_then_default() {
        let (_dir, config, output) = setup();
        write_cache(&config.cache_dir, "en_gb", None);
        write_cache(&config.cache_dir, "fr_fr", None);

        let processor = MessageProcessor::new(&config);
        assert_eq!(processor.fallback_message().unwrap(), DEFAULT_SLEEP_MESSAGE);

        processor.process_all(&codes(&["fr_fr"]), &output).unwrap();
        assert_eq!(output_message(&output, "fr_fr"), "??? players sleeping");
    }

    #[test]
    fn test_resolve_message_verbatim_fallback() {
        let (_dir, config, _output) = setup();
        write_cache(&config.cache_dir, "en_gb", Some("%s of %s sleeping"));
        let processor = MessageProcessor::new(&config);
        let fallback = processor.fallback_message().unwrap();

        let message = processor
            .resolve_message(&codes(&["tlh_aa"])[0], &fallback)
            .unwrap();
        assert_eq!(message, "%s of %s sleeping");
    }

    #[test]
    fn test_unrewritten_placeholders_are_reported() {
        let (_dir, config, output) = setup();
        write_cache(&config.cache_dir, "en_gb", Some("%s/%s players sleeping"));
        write_cache(&config.cache_dir, "tr_tr", Some("%1$d/%2$d oyuncu uyuyor"));
        write_cache(&config.cache_dir, "pl_pl", Some("Śpiący gracze: %s"));

        let report = MessageProcessor::new(&config)
            .process_all(&codes(&["tr_tr", "pl_pl"]), &output)
            .unwrap();

        assert_eq!(
            report.unrewritten,
            vec![UnrewrittenMessage {
                code: codes(&["tr_tr"])[0].clone(),
                message: "%1$d/%2$d oyuncu uyuyor".to_string(),
            }]
        );
        // The file is left as written
        assert_eq!(output_message(&output, "tr_tr"), "%1$d/%2$d oyuncu uyuyor");
        assert_eq!(output_message(&output, "pl_pl"), "Śpiący gracze: ??");
    }

    #[test]
    fn test_output_is_overwritten_on_rerun() {
        let (_dir, config, output) = setup();
        write_cache(&config.cache_dir, "en_gb", Some("%s/%s players sleeping"));
        fs::create_dir_all(&output).unwrap();
        fs::write(output.join("en_gb.json"), "{\"stale\": \"yes\"}").unwrap();

        MessageProcessor::new(&config)
            .process_all(&codes(&["en_gb"]), &output)
            .unwrap();
        assert_eq!(output_message(&output, "en_gb"), "??? players sleeping");
    }

    #[test]
    fn test_output_keeps_unicode_literal() {
        let (_dir, config, output) = setup();
        write_cache(&config.cache_dir, "en_gb", Some("%s/%s players sleeping"));
        write_cache(&config.cache_dir, "zh_cn", Some("%s/%s 名玩家正在入睡"));

        MessageProcessor::new(&config)
            .process_all(&codes(&["zh_cn"]), &output)
            .unwrap();
        let raw = fs::read_to_string(output.join("zh_cn.json")).unwrap();
        assert_eq!(raw, "{\n  \"sleep.players_sleeping\": \"??? 名玩家正在入睡\"\n}");
    }

    #[test]
    fn test_malformed_language_file_is_parse_error() {
        let (_dir, config, output) = setup();
        write_cache(&config.cache_dir, "en_gb", Some("%s/%s players sleeping"));
        fs::write(config.cache_dir.join("nl_nl.json"), "{oops").unwrap();

        let result = MessageProcessor::new(&config).process_all(&codes(&["nl_nl"]), &output);
        assert!(matches!(result, Err(SleepError::Parse(_))));
    }
}
