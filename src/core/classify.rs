//! Raw artifact classification.
//!
//! Each raw scrape artifact (page, resolved video, document, image) becomes
//! one `Resource` header plus at most one format-specific detail record, and
//! sometimes an attached `Note` (page description, video filepath, image alt
//! text). String limits are enforced here by silent truncation, never left
//! for validation to reject. An artifact from which no usable `Topic` can be
//! derived is dropped entirely rather than emitted malformed.

use tracing::debug;

use super::assemble::AssembleOptions;
use super::canonical::{canonicalize_video_url, is_http_url};
use super::ids::{AllocationError, IdAllocator};
use crate::domain::{
    Format, ImageRow, NoteRow, PdfRow, RawDocument, RawImage, RawPage, RawVideo, Resource,
    VideoRow, WebsiteRow, AUTHOR_MAX, BODY_MAX, TOPIC_MAX,
};

/// Output of classifying one raw artifact.
#[derive(Debug, Clone)]
pub struct Classified {
    pub resource: Resource,

    /// The format-specific detail row, when one could be produced
    pub detail: Option<Detail>,

    /// Attached note (description, alt text, filepath marker)
    pub note: Option<NoteRow>,
}

/// A detail record destined for one of the typed collections.
#[derive(Debug, Clone)]
pub enum Detail {
    Pdf(PdfRow),
    Image(ImageRow),
    Video(VideoRow),
    Website(WebsiteRow),
}

/// Trim and cut a string to at most `max` characters.
///
/// Silent and total: characters beyond the limit are dropped, not rejected.
/// Trailing whitespace exposed by the cut is removed so the result is a
/// fixed point of the function.
pub fn truncate(s: &str, max: usize) -> String {
    let trimmed = s.trim();
    if trimmed.chars().count() <= max {
        trimmed.to_string()
    } else {
        let cut: String = trimmed.chars().take(max).collect();
        cut.trim_end().to_string()
    }
}

fn header(id: i32, topic: String, format: Format, opts: &AssembleOptions) -> Resource {
    Resource {
        resource_id: id,
        date: opts.capture_date,
        date_for: opts.capture_date,
        author: truncate(&opts.author, AUTHOR_MAX),
        topic,
        keywords: None,
        rating: opts.rating,
        format,
        is_verified: Some(opts.verified),
    }
}

/// Truncated, non-empty topic candidate from an optional source string.
fn topic_from(source: Option<&str>) -> Option<String> {
    source
        .map(|s| truncate(s, TOPIC_MAX))
        .filter(|t| !t.is_empty())
}

/// Classify the scraped page itself into a `Website` resource.
///
/// The page URL becomes a `Website` detail when it passes the scheme check;
/// the meta description, when present, becomes an attached `Note`.
pub fn classify_page(
    page: &RawPage,
    opts: &AssembleOptions,
    ids: &mut IdAllocator,
) -> Result<Option<Classified>, AllocationError> {
    let topic = topic_from(page.title.as_deref()).or_else(|| topic_from(page.url.as_deref()));
    let Some(topic) = topic else {
        debug!("skipping page with neither title nor url");
        return Ok(None);
    };

    let id = ids.allocate()?;
    let detail = page
        .url
        .as_deref()
        .filter(|u| is_http_url(u))
        .map(|u| Detail::Website(WebsiteRow {
            resource_id: id,
            link: u.to_string(),
        }));
    let note = page
        .description
        .as_deref()
        .and_then(|d| classify_note(id, d));

    Ok(Some(Classified {
        resource: header(id, topic, Format::Website, opts),
        detail,
        note,
    }))
}

/// Classify a resolved video into a `Video` resource.
///
/// The link is canonicalized first and kept only when it is an http(s) URL.
/// A missing or non-positive duration becomes 0 so the `Duration` column is
/// always present; a locally downloaded file leaves a `filepath:` note.
pub fn classify_video(
    video: &RawVideo,
    opts: &AssembleOptions,
    ids: &mut IdAllocator,
) -> Result<Option<Classified>, AllocationError> {
    let link = video
        .link
        .as_deref()
        .map(canonicalize_video_url)
        .filter(|l| is_http_url(l));

    let topic = topic_from(video.title.as_deref()).or_else(|| topic_from(link.as_deref()));
    let Some(topic) = topic else {
        debug!("skipping video with neither title nor usable link");
        return Ok(None);
    };

    let id = ids.allocate()?;
    let duration = video
        .duration
        .filter(|d| *d > 0.0)
        .map(|d| d as i64)
        .unwrap_or(0);
    let note = video
        .filepath
        .as_deref()
        .and_then(|p| classify_note(id, &format!("filepath:{p}")));

    Ok(Some(Classified {
        resource: header(id, topic, Format::Video, opts),
        detail: Some(Detail::Video(VideoRow {
            resource_id: id,
            duration,
            link,
        })),
        note,
    }))
}

/// Classify a linked document into a `Pdf` resource.
///
/// `Body` is the best identifying string: local path, else source URL, else
/// title.
pub fn classify_document(
    doc: &RawDocument,
    opts: &AssembleOptions,
    ids: &mut IdAllocator,
) -> Result<Option<Classified>, AllocationError> {
    let topic = topic_from(doc.title.as_deref())
        .or_else(|| topic_from(doc.url.as_deref()))
        .or_else(|| topic_from(doc.filepath.as_deref()));
    let Some(topic) = topic else {
        debug!("skipping document with no identifying text");
        return Ok(None);
    };

    let body = doc
        .filepath
        .as_deref()
        .or(doc.url.as_deref())
        .or(doc.title.as_deref())
        .map(|b| truncate(b, BODY_MAX))
        .unwrap_or_default();

    let id = ids.allocate()?;
    let link = doc
        .url
        .as_deref()
        .filter(|u| is_http_url(u))
        .map(str::to_string);

    Ok(Some(Classified {
        resource: header(id, topic, Format::Pdf, opts),
        detail: Some(Detail::Pdf(PdfRow {
            resource_id: id,
            body,
            link,
        })),
        note: None,
    }))
}

/// Classify an image observation into an `Image` resource.
///
/// `Topic` prefers alt text, falling back to the URL's path basename. The
/// detail row is emitted only when the URL passes the scheme check; when it
/// cannot be, surviving alt text is attached as a standalone `Note` instead
/// so the observation is not lost.
pub fn classify_image(
    img: &RawImage,
    opts: &AssembleOptions,
    ids: &mut IdAllocator,
) -> Result<Option<Classified>, AllocationError> {
    let topic = topic_from(img.alt.as_deref())
        .or_else(|| topic_from(img.url.as_deref().and_then(path_basename)))
        .or_else(|| topic_from(img.url.as_deref()));
    let Some(topic) = topic else {
        debug!("skipping image with neither alt text nor url");
        return Ok(None);
    };

    let id = ids.allocate()?;
    let detail = img
        .url
        .as_deref()
        .filter(|u| is_http_url(u))
        .map(|u| Detail::Image(ImageRow {
            resource_id: id,
            link: u.to_string(),
            width: img.width.filter(|v| *v > 0),
            height: img.height.filter(|v| *v > 0),
            size: Some(img.computed_size()),
        }));
    let note = if detail.is_none() {
        img.alt.as_deref().and_then(|a| classify_note(id, a))
    } else {
        None
    };

    Ok(Some(Classified {
        resource: header(id, topic, Format::Image, opts),
        detail,
        note,
    }))
}

/// Standalone note attached to an owning resource.
///
/// Returns None when nothing survives truncation, so empty bodies are never
/// emitted.
pub fn classify_note(owner_id: i32, text: &str) -> Option<NoteRow> {
    let body = truncate(text, BODY_MAX);
    (!body.is_empty()).then_some(NoteRow {
        resource_id: owner_id,
        body,
    })
}

/// Last path segment of a URL, ignoring query and fragment.
fn path_basename(url: &str) -> Option<&str> {
    let rest = url.split_once("://").map(|(_, r)| r).unwrap_or(url);
    let path = rest.split(['?', '#']).next().unwrap_or(rest);
    // Strip the host: everything before the first '/'
    let (_, path) = path.split_once('/')?;
    path.rsplit('/').next().filter(|s| !s.is_empty())
}
