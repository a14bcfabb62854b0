//! Collapsing equivalent raw observations.
//!
//! The extractor reports the same image once per anchor it was reached
//! through, and video pages resurface across incremental runs. Images are
//! collapsed by exact URL equality, keeping the observation with the larger
//! computed size; videos are skipped by normalized title.

use std::collections::{HashMap, HashSet};

use crate::core::classify::truncate;
use crate::domain::{Artifact, Format, RawImage, TOPIC_MAX};

/// Collapse image candidates sharing a URL.
///
/// The candidate with the strictly greater computed size wins; ties keep the
/// first-seen observation. Output preserves first-seen order, so the result
/// is deterministic for any input order of equivalent candidates. Candidates
/// without a URL have nothing to key on and pass through unchanged.
pub fn dedupe_images(candidates: Vec<RawImage>) -> Vec<RawImage> {
    let mut slot_by_url: HashMap<String, usize> = HashMap::new();
    let mut kept: Vec<RawImage> = Vec::new();

    for candidate in candidates {
        let Some(url) = candidate.url.clone() else {
            kept.push(candidate);
            continue;
        };
        match slot_by_url.get(&url) {
            Some(&slot) => {
                if candidate.computed_size() > kept[slot].computed_size() {
                    kept[slot] = candidate;
                }
            }
            None => {
                slot_by_url.insert(url, kept.len());
                kept.push(candidate);
            }
        }
    }

    kept
}

/// Normalized video titles already recorded, used to skip re-adding the same
/// video across incremental runs.
#[derive(Debug, Default)]
pub struct TitleSet {
    seen: HashSet<String>,
}

impl TitleSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed from the video-format resources of an existing artifact.
    pub fn seed_from_artifact(&mut self, artifact: &Artifact) {
        self.seen.extend(
            artifact
                .resources
                .iter()
                .filter(|r| r.format == Format::Video)
                .map(|r| normalize_title(&r.topic))
                .filter(|t| !t.is_empty()),
        );
    }

    /// Test-and-record: returns true when the title was already present,
    /// meaning the candidate should be skipped.
    ///
    /// The normalized title is inserted regardless of the outcome, so the
    /// set always reflects the new steady state. Titles that normalize to
    /// nothing never match.
    pub fn check_and_insert(&mut self, title: &str) -> bool {
        let normalized = normalize_title(title);
        if normalized.is_empty() {
            return false;
        }
        !self.seen.insert(normalized)
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}

/// The dedup key for a video title.
///
/// Truncated to the Topic length before case folding, because the only form
/// of a title that survives in a saved artifact is its Topic, which is
/// already truncated. Keying on the same prefix keeps in-run and cross-run
/// lookups consistent; the cost is that titles sharing their first
/// [`TOPIC_MAX`] characters collapse into one.
fn normalize_title(title: &str) -> String {
    truncate(title, TOPIC_MAX).to_lowercase()
}
