//! Placeholder neutralization
//!
//! The sleep message carries printf-style placeholders for the sleeping and
//! total player counts. They are replaced with question-mark sentinels so the
//! client renders a fixed string. Passes run in this order:
//!
//! 1. `%s/%s` becomes `???`
//! 2. `%1$s`, `%2$s`, ... become `??`
//! 3. remaining `%s` become `??`
//! 4. `%d` becomes `??`
//!
//! The paired form must go first, otherwise pass 3 would consume its halves.

use regex::Regex;
use std::sync::LazyLock;

pub const PAIR_SENTINEL: &str = "???";
pub const SINGLE_SENTINEL: &str = "??";

static INDEXED_PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"%\d+\$s").unwrap_or_else(|e| panic!("invalid placeholder pattern: {}", e))
});

/// Replace every recognized placeholder in `message` with a sentinel
pub fn rewrite_placeholders(message: &str) -> String {
    let rewritten = message.replace("%s/%s", PAIR_SENTINEL);
    let rewritten = INDEXED_PLACEHOLDER.replace_all(&rewritten, SINGLE_SENTINEL);
    rewritten
        .replace("%s", SINGLE_SENTINEL)
        .replace("%d", SINGLE_SENTINEL)
}

/// Coarse check for a message that may still hold a placeholder
///
/// True when the message has a `%` and, anywhere, an `s` or a `d`. This is a
/// diagnostic and can report false positives such as `"100% sleeping"`.
pub fn looks_unrewritten(message: &str) -> bool {
    message.contains('%') && (message.contains('s') || message.contains('d'))
}
