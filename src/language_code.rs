//! Language identifiers
//!
//! A language code is either a bare alphabetic token of at least two
//! characters (`lol`) or two such tokens joined by a single underscore
//! (`en_gb`). [`LanguageCode::from_cell`] applies the acceptance rules to the
//! raw text of a wiki table cell.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Marker the wiki appends to codes that only exist in Java Edition
const JAVA_ONLY_MARKER: &str = "[JEonly]";
/// Zero-width non-joiner the wiki puts in front of the marker
const ZWNJ: char = '\u{200C}';

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LanguageCode(String);

impl LanguageCode {
    /// Validate raw cell text and turn it into a code
    ///
    /// Rules, first match wins:
    /// 1. text carrying the Java-Edition-only marker: keep what precedes the
    ///    marker, accept only the `xx_yy` shape
    /// 2. no underscore: accept if alphabetic and at least two characters
    /// 3. one underscore: accept if both halves are alphabetic and at least
    ///    two characters each
    /// 4. anything else (including the `–` "no code" dash) is rejected
    pub fn from_cell(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }

        if let Some(idx) = raw.find(JAVA_ONLY_MARKER) {
            let code = raw[..idx].trim_end_matches(ZWNJ).trim();
            return is_pair(code).then(|| LanguageCode(code.to_string()));
        }

        match raw.matches('_').count() {
            0 if is_word(raw) => Some(LanguageCode(raw.to_string())),
            1 if is_pair(raw) => Some(LanguageCode(raw.to_string())),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// File name used for this code in the cache and output directories
    pub fn file_name(&self) -> String {
        format!("{}.json", self.0)
    }
}

impl fmt::Display for LanguageCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for LanguageCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

fn is_word(s: &str) -> bool {
    s.chars().count() >= 2 && s.chars().all(char::is_alphabetic)
}

fn is_pair(s: &str) -> bool {
    match s.split_once('_') {
        Some((lang, region)) => is_word(lang) && is_word(region),
        None => false,
    }
}
