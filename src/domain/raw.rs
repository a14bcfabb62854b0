//! Raw scrape output as produced by the external fetch/extraction layer.
//!
//! Every field is optional or defaulted: scrape data is loosely shaped and
//! classification decides at the boundary what is usable. Candidate lists
//! arrive pre-filtered (the ignore-list lives with the extractor, not here).

use serde::Deserialize;

/// One scraped page plus everything resolved from it.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawPage {
    pub url: Option<String>,

    pub title: Option<String>,

    pub description: Option<String>,

    /// Candidate video page URLs still awaiting resolution by the fetcher.
    /// Carried for completeness; assembly consumes only `video_data`.
    pub videos: Vec<String>,

    /// Linked documents (PDFs), shortened links already resolved upstream
    pub documents: Vec<RawDocument>,

    /// Image observations from `<img>` tags and image-suffixed anchors
    pub images: Vec<RawImage>,

    /// Fully resolved videos with metadata
    #[serde(rename = "videoData")]
    pub video_data: Vec<RawVideo>,
}

/// A candidate document link.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawDocument {
    pub title: Option<String>,
    pub filepath: Option<String>,
    pub url: Option<String>,
}

/// One image observation. The same URL may be observed several times
/// (inline tag, anchor) with different metadata; deduplication picks one.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawImage {
    pub url: Option<String>,
    pub alt: Option<String>,
    pub width: Option<i64>,
    pub height: Option<i64>,
}

impl RawImage {
    /// Pixel area when both dimensions are known and positive, else the one
    /// known dimension, else 1. Never zero or negative: the `Size` column
    /// must always pass the importer's positivity check.
    pub fn computed_size(&self) -> i64 {
        let w = self.width.filter(|v| *v > 0);
        let h = self.height.filter(|v| *v > 0);
        match (w, h) {
            (Some(w), Some(h)) => w * h,
            (Some(d), None) | (None, Some(d)) => d,
            (None, None) => 1,
        }
    }
}

/// A video resolved by the external fetcher (title/duration via metadata
/// extraction, filepath when the file was downloaded locally).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawVideo {
    pub title: Option<String>,
    pub filepath: Option<String>,
    pub duration: Option<f64>,
    pub link: Option<String>,
}
