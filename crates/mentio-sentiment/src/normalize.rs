//! Text normalization and content fingerprinting.
//!
//! Cleaning strips everything that isn't opinion-bearing language — URLs,
//! hashtag/mention markers, stray symbols — and collapses whitespace. The
//! fingerprint is a SHA-256 digest of the cleaned text and serves as the
//! dedup and analysis-cache key: two raw mentions with identical cleaned
//! text are one logical item.

use std::sync::OnceLock;

use regex::Regex;
use sha2::{Digest, Sha256};

fn url_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"https?://\S+|www\.\S+").expect("static regex"))
}

fn marker_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // Hashtag and @-mention markers; the tag word itself is kept for
    // hashtags since it often carries content ("#battery").
    RE.get_or_init(|| Regex::new(r"@\w+|#").expect("static regex"))
}

fn symbol_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"[^\w\s.,!?'\-]").expect("static regex")
    })
}

/// Clean a raw mention's text. Returns `None` when nothing linguistic
/// remains — such input is filtered, not an error.
#[must_use]
pub fn normalize(raw: &str) -> Option<String> {
    let without_urls = url_re().replace_all(raw, " ");
    let without_markers = marker_re().replace_all(&without_urls, " ");
    let without_symbols = symbol_re().replace_all(&without_markers, " ");

    let cleaned = without_symbols
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");

    if cleaned.is_empty() {
        None
    } else {
        Some(cleaned)
    }
}

/// Stable content fingerprint: SHA-256 hex of the cleaned text.
#[must_use]
pub fn fingerprint(cleaned: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(cleaned.as_bytes());
    let digest = hasher.finalize();
    digest.iter().map(|b| format!("{b:02x}")).collect()
}
