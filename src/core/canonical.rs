//! URL recognition and canonicalization.
//!
//! YouTube links arrive in several equivalent shapes (embed iframes, watch
//! pages, youtu.be short links); all are rewritten to one canonical
//! `watch?v=` form so downstream deduplication and storage see a single URL
//! per video. Anything unrecognized passes through unchanged.

use std::sync::LazyLock;

use regex::Regex;

static YOUTUBE_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:embed/|v=|youtu\.be/)([A-Za-z0-9_-]{6,})").unwrap());

static HTTP_URL_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)^https?://").unwrap());

/// Extract a YouTube video id from any recognized URL shape.
pub fn youtube_id(url: &str) -> Option<&str> {
    YOUTUBE_ID_RE
        .captures(url)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
}

/// Rewrite a recognizable video URL to its canonical `watch?v=` form.
///
/// Unrecognized input comes back unchanged; this never fails. Idempotent:
/// a canonical link canonicalizes to itself.
pub fn canonicalize_video_url(url: &str) -> String {
    match youtube_id(url) {
        Some(id) => format!("https://www.youtube.com/watch?v={id}"),
        None => url.to_string(),
    }
}

/// Scheme check applied to every URL-typed field before emission.
pub fn is_http_url(s: &str) -> bool {
    HTTP_URL_RE.is_match(s)
}
