//! The six-collection record set handed to the database importer.
//!
//! Field and collection names are serialized exactly as the importer binds
//! them to columns (case-sensitive), hence the per-field renames and the
//! lower-case `pdf` collection key.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Maximum length of `Resource.Author` (varchar(50)).
pub const AUTHOR_MAX: usize = 50;

/// Maximum length of `Resource.Topic` and `Resource.Keywords` (varchar(25)).
pub const TOPIC_MAX: usize = 25;

/// Maximum length of `Note.Body` and `pdf.Body` (varchar(2048)).
pub const BODY_MAX: usize = 2048;

/// One complete exportable record set.
///
/// Collections are append-only across incremental runs: records are created
/// once during normalization and never edited in place afterwards.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Artifact {
    #[serde(rename = "Resource", default)]
    pub resources: Vec<Resource>,

    #[serde(rename = "Note", default)]
    pub notes: Vec<NoteRow>,

    #[serde(rename = "pdf", default)]
    pub pdfs: Vec<PdfRow>,

    #[serde(rename = "Image", default)]
    pub images: Vec<ImageRow>,

    #[serde(rename = "Video", default)]
    pub videos: Vec<VideoRow>,

    #[serde(rename = "Website", default)]
    pub websites: Vec<WebsiteRow>,
}

impl Artifact {
    /// Every `ResourceID` present anywhere in the artifact.
    ///
    /// Used to pre-seed the id allocator before appending to an existing
    /// record set.
    pub fn all_resource_ids(&self) -> impl Iterator<Item = i32> + '_ {
        self.resources
            .iter()
            .map(|r| r.resource_id)
            .chain(self.notes.iter().map(|r| r.resource_id))
            .chain(self.pdfs.iter().map(|r| r.resource_id))
            .chain(self.images.iter().map(|r| r.resource_id))
            .chain(self.videos.iter().map(|r| r.resource_id))
            .chain(self.websites.iter().map(|r| r.resource_id))
    }

    /// Total number of records across all six collections.
    pub fn len(&self) -> usize {
        self.resources.len()
            + self.notes.len()
            + self.pdfs.len()
            + self.images.len()
            + self.videos.len()
            + self.websites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Header record identifying one piece of captured content.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Resource {
    /// Primary identity, unique across the whole artifact
    #[serde(rename = "ResourceID")]
    pub resource_id: i32,

    /// Date the artifact was captured
    #[serde(rename = "Date")]
    pub date: NaiveDate,

    /// Date the content is "for" (defaults to the capture date)
    #[serde(rename = "DateFor")]
    pub date_for: NaiveDate,

    #[serde(rename = "Author")]
    pub author: String,

    #[serde(rename = "Topic")]
    pub topic: String,

    #[serde(rename = "Keywords")]
    pub keywords: Option<String>,

    /// Decimal in 0.0..=9.9 with one fractional digit (numeric(2,1))
    #[serde(rename = "Rating")]
    pub rating: Option<f64>,

    #[serde(rename = "Format")]
    pub format: Format,

    #[serde(rename = "isVerified")]
    pub is_verified: Option<bool>,
}

/// Content format of a resource; selects which detail table applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Format {
    Note,
    Video,
    Website,
    Pdf,
    Image,
}

/// Textual body or attached caption/alt-text for a resource.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NoteRow {
    #[serde(rename = "ResourceID")]
    pub resource_id: i32,

    #[serde(rename = "Body")]
    pub body: String,
}

/// Document detail: identifying text (path/URL/title) plus optional link.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PdfRow {
    #[serde(rename = "ResourceID")]
    pub resource_id: i32,

    #[serde(rename = "Body")]
    pub body: String,

    #[serde(rename = "Link", default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

/// Image detail.
///
/// `Width`/`Height`/`Size` keys are omitted entirely when unknown, matching
/// what the importer expects from the scraper output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageRow {
    #[serde(rename = "ResourceID")]
    pub resource_id: i32,

    #[serde(rename = "Link")]
    pub link: String,

    #[serde(rename = "Width", default, skip_serializing_if = "Option::is_none")]
    pub width: Option<i64>,

    #[serde(rename = "Height", default, skip_serializing_if = "Option::is_none")]
    pub height: Option<i64>,

    /// Pixel area (or a single known dimension), floored at 1
    #[serde(rename = "Size", default, skip_serializing_if = "Option::is_none")]
    pub size: Option<i64>,
}

/// Video detail. `Duration` is seconds; 0 marks "metadata unavailable".
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoRow {
    #[serde(rename = "ResourceID")]
    pub resource_id: i32,

    #[serde(rename = "Duration")]
    pub duration: i64,

    #[serde(rename = "Link")]
    pub link: Option<String>,
}

/// Website detail.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebsiteRow {
    #[serde(rename = "ResourceID")]
    pub resource_id: i32,

    #[serde(rename = "Link")]
    pub link: String,
}
