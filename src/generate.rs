//! HTML gallery generation.
//!
//! Renders one self-contained `index.html`: the date range header, a daily
//! trivia line, the gallery grid (or a status message), and one detail
//! overlay per displayed entry.
//!
//! ## Overlays
//!
//! Each overlay is a `section.overlay` with an id of the form `entry-N`.
//! Thumbnails link to that anchor and CSS `:target` shows it. The backdrop
//! and the close button both link back to `#gallery`, which hides it again.
//! `static/overlay.js` reloads embedded players when their overlay closes so
//! playback stops, and maps Escape to close.
//!
//! ## Media
//!
//! Both thumbnails and overlays render through [`render_media`], which takes
//! the [`Media`] decision from [`crate::media::select_media`] and a
//! [`Presentation`]. The two presentations differ only in labels and in the
//! overlay's extra "open externally" link for thumbnail-only videos.
//!
//! Uses [maud](https://maud.lambda.xyz/); all interpolated feed text is
//! escaped.

use crate::gallery::{DateRange, Gallery, GalleryView};
use crate::media::{Media, select_media};
use crate::overlay::OverlayView;
use crate::types::Entry;
use maud::{DOCTYPE, Markup, PreEscaped, html};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

const CSS_STATIC: &str = include_str!("../static/style.css");
const JS: &str = include_str!("../static/overlay.js");

const IFRAME_ALLOW: &str = "accelerometer; autoplay; encrypted-media; gyroscope; picture-in-picture";

/// Where a piece of media is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presentation {
    Thumbnail,
    Detail,
}

/// Page-level inputs besides the gallery itself.
pub struct PageContext<'a> {
    pub title: &'a str,
    pub range: &'a DateRange,
    /// Feed location shown in the header.
    pub source: &'a str,
    pub fact: Option<&'a str>,
    /// Color variables; the static stylesheet is appended.
    pub color_css: &'a str,
}

/// Write `index.html` for the gallery into `output_dir`.
pub fn generate(
    gallery: &Gallery,
    page: &PageContext,
    output_dir: &Path,
) -> Result<PathBuf, GenerateError> {
    fs::create_dir_all(output_dir)?;
    let html = render_page(gallery.view(), page);
    let path = output_dir.join("index.html");
    fs::write(&path, html.into_string())?;
    Ok(path)
}

/// Anchor id of the overlay for the entry at 0-based `index`.
pub fn entry_anchor(index: usize) -> String {
    format!("entry-{}", index + 1)
}

// ============================================================================
// HTML Components
// ============================================================================

fn base_document(title: &str, css: &str, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) }
                style { (PreEscaped(css)) }
            }
            body {
                (content)
            }
        }
    }
}

fn site_header(page: &PageContext) -> Markup {
    html! {
        header.site-header {
            h1 { (page.title) }
            p.range {
                "Showing " time datetime=(page.range.start()) { (page.range.start()) }
                " to " time datetime=(page.range.end()) { (page.range.end()) }
            }
            p.source { "Feed: " (page.source) }
        }
    }
}

/// Renders the media element for a display decision.
pub fn render_media(media: &Media, presentation: Presentation, title: &str) -> Markup {
    let detail = presentation == Presentation::Detail;
    html! {
        @match media {
            Media::Image { src } => {
                img src=(src) alt=(alt_text(title, "APOD image")) loading="lazy";
            }
            Media::Embed { src } => {
                iframe src=(src)
                    allow=(IFRAME_ALLOW)
                    loading="lazy"
                    title=(alt_text(title, "APOD video"))
                    allowfullscreen[detail] {}
            }
            Media::VideoThumbnail { src, link } => {
                img src=(src) alt=(alt_text(title, "APOD video thumbnail")) loading="lazy";
                @if detail {
                    a.external href=(link) target="_blank" rel="noopener" { "Open video in new tab" }
                }
            }
            Media::Link { href } => {
                a.external href=(href) target="_blank" rel="noopener" {
                    @if detail { "Open video in new tab" } @else { "Open video" }
                }
            }
            Media::Unsupported => {
                p.unsupported {
                    @if detail { "Unsupported media type" } @else { "Unsupported media" }
                }
            }
        }
    }
}

fn alt_text<'a>(title: &'a str, fallback: &'a str) -> &'a str {
    if title.is_empty() { fallback } else { title }
}

/// Renders one gallery card.
///
/// Still images open the overlay when clicked. Embedded players and
/// external links stay interactive, so only the caption opens the overlay.
pub fn render_thumb(entry: &Entry, index: usize) -> Markup {
    let media = select_media(entry);
    let anchor = entry_anchor(index);
    let title = entry.display_title();
    let opens_overlay = matches!(
        media,
        Media::Image { .. } | Media::VideoThumbnail { .. } | Media::Unsupported
    );

    html! {
        article.gallery-item data-media=(media.kind()) {
            div.thumb-media {
                @if opens_overlay {
                    a href={ "#" (anchor) } {
                        (render_media(&media, Presentation::Thumbnail, title))
                    }
                } @else {
                    (render_media(&media, Presentation::Thumbnail, title))
                }
            }
            a.thumb-caption href={ "#" (anchor) } {
                p.thumb-title { (title) }
                p.thumb-date { (entry.date_key().unwrap_or_default()) }
            }
        }
    }
}

/// Renders a detail overlay. A closed (invisible) view renders nothing.
pub fn render_overlay(view: &OverlayView, anchor: &str) -> Markup {
    html! {
        @if view.visible {
            section.overlay id=(anchor) role="dialog" aria-modal="true" aria-label=(alt_text(&view.title, "Entry details")) {
                a.overlay-backdrop href="#gallery" aria-label="Close" {}
                div.overlay-panel {
                    a.overlay-close href="#gallery" aria-label="Close" { "×" }
                    h2.overlay-title { (view.title) }
                    p.overlay-date { (view.date) }
                    div.overlay-media {
                        @if let Some(media) = &view.media {
                            (render_media(media, Presentation::Detail, &view.title))
                        }
                    }
                    p.overlay-explanation { (view.explanation) }
                }
            }
        }
    }
}

fn render_status(view: &GalleryView) -> Markup {
    html! {
        @if let Some(message) = view.status_message() {
            p class=(if view.is_error() { "status error" } else { "status" }) { (message) }
        }
    }
}

// ============================================================================
// Page Renderer
// ============================================================================

/// Renders the full gallery page for the current view.
pub fn render_page(view: &GalleryView, page: &PageContext) -> Markup {
    let css = format!("{}\n\n{}", page.color_css, CSS_STATIC);
    let entries = view.entries();

    let content = html! {
        (site_header(page))
        @if let Some(fact) = page.fact {
            aside.fact { (crate::trivia::format_fact(fact)) }
        }
        main id="gallery" class="gallery" {
            (render_status(view))
            @if !entries.is_empty() {
                div.gallery-grid {
                    @for (idx, entry) in entries.iter().enumerate() {
                        (render_thumb(entry, idx))
                    }
                }
            }
        }
        @for (idx, entry) in entries.iter().enumerate() {
            (render_overlay(&OverlayView::of(entry), &entry_anchor(idx)))
        }
        script { (PreEscaped(JS)) }
    };

    base_document(page.title, &css, content)
}

// ============================================================================
// Tests
// ============================================================================
