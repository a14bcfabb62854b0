//! lobster-ingest - scrape normalization and artifact validation
//!
//! Converts heterogeneous content harvested from web pages (page metadata,
//! resolved videos, linked documents, image observations) into the
//! six-collection record set the Lobster Notes importer consumes, and
//! independently validates any such record set against the import schema.
//!
//! # Architecture
//!
//! The core is a pure, synchronous pipeline over in-memory structures:
//! classification assigns each raw artifact a `Resource` header plus a
//! detail record, deduplication collapses equivalent observations, and
//! assembly threads a single id allocator through one append-only pass.
//! Validation is a separate total pass that works on raw JSON, so it can
//! check hand-authored artifacts the typed decoder would reject.
//!
//! Fetching pages, extracting tags, and the SQL import itself are external
//! collaborators; this crate begins at their output and ends at theirs.
//!
//! # Modules
//!
//! - `domain`: Raw scrape input and the typed six-collection artifact
//! - `core`: Ids, canonicalization, classification, dedup, assembly, validation
//! - `cli`: The `assemble` and `validate` subcommands
//!
//! # Usage
//!
//! ```bash
//! # Normalize scrape output, merging into an existing artifact
//! lobster-ingest assemble scrape.json -o artifact.json
//!
//! # Validate before import (exit 0 ok, 1 errors, 2 unreadable)
//! lobster-ingest validate artifact.json
//! ```

pub mod cli;
pub mod core;
pub mod domain;

// Re-export main types at crate root for convenience
pub use crate::core::{
    assemble, canonicalize_video_url, dedupe_images, extend_artifact, validate, validate_records,
    AllocationError, AssembleOptions, IdAllocator, Issue, Report, TitleSet,
};
pub use crate::domain::{Artifact, Format, RawImage, RawPage, Resource};
