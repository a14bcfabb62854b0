//! Domain types for the normalization pipeline.
//!
//! This module contains the data structures on both sides of the core:
//! - Raw: loosely shaped scrape output from the external fetcher
//! - Artifact: the typed six-collection record set shaped for SQL import

pub mod artifact;
pub mod raw;

// Re-export commonly used types
pub use artifact::{
    Artifact, Format, ImageRow, NoteRow, PdfRow, Resource, VideoRow, WebsiteRow, AUTHOR_MAX,
    BODY_MAX, TOPIC_MAX,
};
pub use raw::{RawDocument, RawImage, RawPage, RawVideo};
