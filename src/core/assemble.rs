//! Record set assembly.
//!
//! Composes the classifier, deduplicator, and id allocator into one pure
//! pass over raw scrape output. Assembly only ever appends: re-running
//! against an existing artifact preserves every previously emitted record
//! and every previously allocated id. One allocator and one title set are
//! threaded through a whole run; file I/O stays in the CLI layer.

use chrono::NaiveDate;
use tracing::{debug, info};

use super::classify::{
    classify_document, classify_image, classify_page, classify_video, Classified, Detail,
};
use super::dedupe::{dedupe_images, TitleSet};
use super::ids::{AllocationError, IdAllocator};
use crate::domain::{Artifact, RawPage};

/// Values the classifier stamps on every emitted `Resource` header.
///
/// Explicit configuration rather than constants, so hosts embedding the
/// pipeline can brand their records; the defaults mirror the scraper's
/// historical output.
#[derive(Debug, Clone)]
pub struct AssembleOptions {
    /// `Resource.Author` for every emitted header
    pub author: String,

    /// `Resource.Rating` for every emitted header
    pub rating: Option<f64>,

    /// `Resource.isVerified` for every emitted header
    pub verified: bool,

    /// Capture date, stamped as both `Date` and `DateFor`
    pub capture_date: NaiveDate,
}

impl Default for AssembleOptions {
    fn default() -> Self {
        Self {
            author: "lobster notes web scraper".to_string(),
            rating: Some(9.9),
            verified: false,
            capture_date: chrono::Local::now().date_naive(),
        }
    }
}

/// Assemble a fresh artifact from raw scrape output.
pub fn assemble(pages: &[RawPage], opts: &AssembleOptions) -> Result<Artifact, AllocationError> {
    let mut artifact = Artifact::default();
    extend_artifact(&mut artifact, pages, opts)?;
    Ok(artifact)
}

/// Append the records for `pages` to an existing artifact.
///
/// The allocator is pre-seeded with every `ResourceID` already present, and
/// the video title set with the topics of existing video resources, so an
/// incremental run neither collides with nor repeats prior output.
pub fn extend_artifact(
    artifact: &mut Artifact,
    pages: &[RawPage],
    opts: &AssembleOptions,
) -> Result<(), AllocationError> {
    let mut ids = IdAllocator::new();
    ids.seed_from_artifact(artifact);

    let mut titles = TitleSet::new();
    titles.seed_from_artifact(artifact);

    for page in pages {
        add_page(artifact, page, opts, &mut ids, &mut titles)?;
    }

    Ok(())
}

fn add_page(
    artifact: &mut Artifact,
    page: &RawPage,
    opts: &AssembleOptions,
    ids: &mut IdAllocator,
    titles: &mut TitleSet,
) -> Result<(), AllocationError> {
    let before = artifact.len();

    if let Some(classified) = classify_page(page, opts, ids)? {
        push(artifact, classified);
    }

    if !page.videos.is_empty() {
        debug!(
            candidates = page.videos.len(),
            "unresolved video page urls left to the fetcher"
        );
    }

    for video in &page.video_data {
        if let Some(title) = video.title.as_deref() {
            if titles.check_and_insert(title) {
                debug!(title, "skipping already recorded video");
                continue;
            }
        }
        if let Some(classified) = classify_video(video, opts, ids)? {
            push(artifact, classified);
        }
    }

    for doc in &page.documents {
        if let Some(classified) = classify_document(doc, opts, ids)? {
            push(artifact, classified);
        }
    }

    for img in dedupe_images(page.images.clone()) {
        if let Some(classified) = classify_image(&img, opts, ids)? {
            push(artifact, classified);
        }
    }

    info!(
        url = page.url.as_deref().unwrap_or("<no url>"),
        records = artifact.len() - before,
        "assembled page"
    );

    Ok(())
}

fn push(artifact: &mut Artifact, classified: Classified) {
    artifact.resources.push(classified.resource);
    match classified.detail {
        Some(Detail::Pdf(row)) => artifact.pdfs.push(row),
        Some(Detail::Image(row)) => artifact.images.push(row),
        Some(Detail::Video(row)) => artifact.videos.push(row),
        Some(Detail::Website(row)) => artifact.websites.push(row),
        None => {}
    }
    if let Some(note) = classified.note {
        artifact.notes.push(note);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{RawImage, RawVideo};

    fn opts() -> AssembleOptions {
        AssembleOptions {
            capture_date: NaiveDate::from_ymd_opt(2025, 3, 4).unwrap(),
            ..Default::default()
        }
    }

    fn page_with_videos(titles: &[&str]) -> RawPage {
        RawPage {
            url: Some("https://example.org".to_string()),
            title: Some("Page".to_string()),
            video_data: titles
                .iter()
                .map(|t| RawVideo {
                    title: Some(t.to_string()),
                    duration: Some(60.0),
                    link: Some("https://youtu.be/dQw4w9WgXcQ".to_string()),
                    ..Default::default()
                })
                .collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_assembly_is_referentially_complete() {
        let page = RawPage {
            url: Some("https://example.org/calc".to_string()),
            title: Some("Calc".to_string()),
            description: Some("desc".to_string()),
            images: vec![RawImage {
                url: Some("https://example.org/fig.png".to_string()),
                alt: Some("fig".to_string()),
                width: Some(2),
                height: Some(3),
            }],
            ..Default::default()
        };

        let artifact = assemble(std::slice::from_ref(&page), &opts()).unwrap();
        let header_ids: Vec<i32> = artifact.resources.iter().map(|r| r.resource_id).collect();

        for id in artifact.all_resource_ids() {
            assert!(header_ids.contains(&id), "dangling ResourceID {id}");
        }
    }

    #[test]
    fn test_duplicate_video_titles_collapse() {
        let artifact = assemble(
            &[page_with_videos(&["Chain Rule", "chain rule ", "Other"])],
            &opts(),
        )
        .unwrap();

        assert_eq!(artifact.videos.len(), 2);
    }

    #[test]
    fn test_extend_preserves_existing_records() {
        let mut artifact = assemble(&[page_with_videos(&["Chain Rule"])], &opts()).unwrap();
        let original_headers: Vec<i32> =
            artifact.resources.iter().map(|r| r.resource_id).collect();
        let original_len = artifact.len();

        extend_artifact(&mut artifact, &[page_with_videos(&["Product Rule"])], &opts()).unwrap();

        assert!(artifact.len() > original_len);
        // prior records sit untouched at the front of their collections
        let headers_now: Vec<i32> = artifact.resources.iter().map(|r| r.resource_id).collect();
        assert_eq!(&headers_now[..original_headers.len()], &original_headers[..]);
    }

    #[test]
    fn test_extend_skips_videos_already_in_artifact() {
        let mut artifact = assemble(&[page_with_videos(&["Chain Rule"])], &opts()).unwrap();
        assert_eq!(artifact.videos.len(), 1);

        extend_artifact(&mut artifact, &[page_with_videos(&["CHAIN RULE"])], &opts()).unwrap();

        // second run re-adds the page but not the video
        assert_eq!(artifact.videos.len(), 1);
    }

    #[test]
    fn test_unusable_artifacts_do_not_abort_the_pass() {
        let page = RawPage {
            title: Some("Page".to_string()),
            images: vec![RawImage::default(), RawImage {
                url: Some("https://example.org/ok.png".to_string()),
                ..Default::default()
            }],
            ..Default::default()
        };

        let artifact = assemble(std::slice::from_ref(&page), &opts()).unwrap();
        // the empty image observation is dropped, the rest survives
        assert_eq!(artifact.images.len(), 1);
        assert_eq!(artifact.resources.len(), 2);
    }
}
