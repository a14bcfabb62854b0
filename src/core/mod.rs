//! Core normalization and validation logic.
//!
//! This module contains:
//! - Ids: collision-free ResourceID allocation
//! - Canonical: URL recognition and YouTube canonicalization
//! - Classify: raw artifact -> Resource header + detail record
//! - Dedupe: collapsing equivalent image/video observations
//! - Assemble: composing one pass into the six-collection artifact
//! - Validate: the independent schema check

pub mod assemble;
pub mod canonical;
pub mod classify;
pub mod dedupe;
pub mod ids;
pub mod validate;

// Re-export commonly used types
pub use assemble::{assemble, extend_artifact, AssembleOptions};
pub use canonical::{canonicalize_video_url, is_http_url, youtube_id};
pub use classify::{
    classify_document, classify_image, classify_note, classify_page, classify_video, truncate,
    Classified, Detail,
};
pub use dedupe::{dedupe_images, TitleSet};
pub use ids::{AllocationError, IdAllocator, DEFAULT_MAX_ATTEMPTS};
pub use validate::{validate, validate_records, Issue, Report, COLLECTIONS};
