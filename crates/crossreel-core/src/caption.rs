//! Caption and title helpers
//!
//! Source captions come from scraped social posts and routinely consist of
//! nothing but tracking links. These helpers strip URLs, collapse whitespace,
//! and produce a platform-safe title prefix.

use std::sync::LazyLock;

use regex::Regex;

/// Maximum title length accepted by the resumable-upload platform.
pub const MAX_TITLE_CHARS: usize = 100;

static URL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"https?://\S+").expect("valid URL regex"));
static WHITESPACE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid whitespace regex"));

/// Strip URLs and whitespace artifacts from a caption.
///
/// If nothing remains, falls back to an author-derived caption, or a generic
/// one when no author is known.
pub fn clean_caption(text: &str, author: &str) -> String {
    let cleaned = URL_RE.replace_all(text, "");
    let cleaned = WHITESPACE_RE.replace_all(cleaned.trim(), " ");
    let cleaned = cleaned.trim();

    if !cleaned.is_empty() {
        return cleaned.to_string();
    }

    if !author.is_empty() {
        return format!("🎬 Video by {}", author);
    }
    "🎬 Check out this video!".to_string()
}

/// Title for the resumable-upload platform: the exact first
/// [`MAX_TITLE_CHARS`] characters of the caption, on char boundaries.
pub fn video_title(caption: &str) -> String {
    caption.chars().take(MAX_TITLE_CHARS).collect()
}
