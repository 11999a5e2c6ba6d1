//! Translation documents
//!
//! A translation document is a flat JSON object mapping translation keys to
//! strings, as shipped in Minecraft's `lang/*.json` files:
//! ```json
//! {
//!     "sleep.players_sleeping": "%s/%s players sleeping",
//!     "sleep.skipping_night": "Sleeping through this night"
//! }
//! ```
//!
//! Documents are written back in canonical form: key order as in the source,
//! two-space indentation, non-ASCII characters kept literally.

use crate::error::{SleepError, SleepResult};
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TranslationDocument(Map<String, Value>);

impl TranslationDocument {
    pub fn new() -> Self {
        TranslationDocument(Map::new())
    }

    /// Document holding a single key
    pub fn single(key: &str, message: &str) -> Self {
        let mut doc = TranslationDocument::new();
        doc.with_message(key, message);
        doc
    }

    pub fn with_message(&mut self, key: &str, message: &str) -> &mut Self {
        self.0
            .insert(key.to_owned(), Value::String(message.to_owned()));
        self
    }

    /// Parse JSON text; `origin` names the input in error messages
    pub fn parse(text: &str, origin: &str) -> SleepResult<Self> {
        let json: Value = serde_json::from_str(text)
            .map_err(|e| SleepError::Parse(format!("Failed to parse JSON from '{}': {}", origin, e)))?;

        match json {
            Value::Object(map) => Ok(TranslationDocument(map)),
            _ => Err(SleepError::Parse(format!(
                "Invalid JSON in '{}': root must be an object",
                origin
            ))),
        }
    }

    pub fn load(path: &Path) -> SleepResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| SleepError::io(path, e))?;
        Self::parse(&content, &path.display().to_string())
    }

    /// String value of `key`; `None` if absent or not a string
    pub fn get_message(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn to_canonical_json(&self) -> SleepResult<String> {
        serde_json::to_string_pretty(&self.0)
            .map_err(|e| SleepError::Parse(format!("Failed to serialize document: {}", e)))
    }

    pub fn save(&self, path: &Path) -> SleepResult<()> {
        let json = self.to_canonical_json()?;
        fs::write(path, json).map_err(|e| SleepError::io(path, e))
    }
}

/// Re-serialize arbitrary JSON text in canonical form
pub fn canonicalize_json(text: &str, origin: &str) -> SleepResult<String> {
    let json: Value = serde_json::from_str(text)
        .map_err(|e| SleepError::Parse(format!("Failed to parse JSON from '{}': {}", origin, e)))?;
    serde_json::to_string_pretty(&json)
        .map_err(|e| SleepError::Parse(format!("Failed to serialize '{}': {}", origin, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_and_get() {
        let doc = TranslationDocument::parse(
            r#"{"sleep.players_sleeping": "%s/%s joueurs dorment", "count": 3}"#,
            "fr_fr.json",
        )
        .unwrap();
        assert_eq!(doc.get_message("sleep.players_sleeping"), Some("%s/%s joueurs dorment"));
        // Non-string values are not messages
        assert_eq!(doc.get_message("count"), None);
        assert_eq!(doc.get_message("missing"), None);
        assert_eq!(doc.len(), 2);
    }

    #[test]
    fn test_parse_rejects_non_object() {
        match TranslationDocument::parse("[1, 2]", "list.json") {
            Err(SleepError::Parse(msg)) => assert!(msg.contains("root must be an object")),
            other => panic!("Expected Parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_rejects_malformed() {
        match TranslationDocument::parse("{\"a\": ", "broken.json") {
            Err(SleepError::Parse(msg)) => assert!(msg.contains("broken.json")),
            other => panic!("Expected Parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_canonical_form_keeps_order_and_unicode() {
        let doc = TranslationDocument::parse(r#"{"z": "ÿ", "a": "日本語"}"#, "x").unwrap();
        let json = doc.to_canonical_json().unwrap();
        assert_eq!(json, "{\n  \"z\": \"ÿ\",\n  \"a\": \"日本語\"\n}");
    }

    #[test]
    fn test_save_then_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("ru_ru.json");

        let mut doc = TranslationDocument::new();
        doc.with_message("sleep.players_sleeping", "%s/%s игроков спят")
            .with_message("sleep.skipping_night", "Пропуск ночи");
        doc.save(&path).unwrap();

        let reloaded = TranslationDocument::load(&path).unwrap();
        assert_eq!(reloaded, doc);
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let dir = TempDir::new().unwrap();
        let result = TranslationDocument::load(&dir.path().join("nope.json"));
        assert!(matches!(result, Err(SleepError::Io { .. })));
    }

    #[test]
    fn test_single() {
        let doc = TranslationDocument::single("sleep.players_sleeping", "???");
        assert_eq!(
            doc.to_canonical_json().unwrap(),
            "{\n  \"sleep.players_sleeping\": \"???\"\n}"
        );
    }

    #[test]
    fn test_canonicalize_json() {
        let out = canonicalize_json(r#"{"b":"ü","a":"1"}"#, "x").unwrap();
        assert_eq!(out, "{\n  \"b\": \"ü\",\n  \"a\": \"1\"\n}");
        assert!(canonicalize_json("not json", "x").is_err());
    }
}
