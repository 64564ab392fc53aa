//! CLI output formatting.
//!
//! Every command has a `format_*` function returning lines (pure, no I/O,
//! easy to test) and a `print_*` wrapper that writes them to stdout.
//!
//! # Output Format
//!
//! ## List
//!
//! ```text
//! Feed: data.json
//! Range: 2024-03-01 → 2024-03-07
//! 001 2024-03-07 Pillars of Creation
//!     image: https://apod.example/pillars_hd.jpg
//!     Gas and dust in the Eagle Nebula...
//! 002 2024-03-05 Launch
//!     embed: https://www.youtube.com/embed/ABC123
//!
//! 2 entries
//! ```
//!
//! ## Show
//!
//! ```text
//! Pillars of Creation
//! 2024-03-07
//! image: https://apod.example/pillars_hd.jpg
//!
//! Gas and dust in the Eagle Nebula, imaged in infrared.
//! ```

use crate::feed::FeedSource;
use crate::gallery::{DateRange, GalleryView};
use crate::media::{Media, select_media};
use crate::overlay::OverlayView;
use std::path::Path;

// ============================================================================
// Shared display helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Truncate text to `max` characters, appending `...` if truncated.
fn truncate_desc(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}

/// One-line description of a media decision: kind and target URL(s).
fn media_line(media: &Media) -> String {
    match media {
        Media::Image { src } | Media::Embed { src } => format!("{}: {}", media.kind(), src),
        Media::VideoThumbnail { src, link } => {
            format!("{}: {} \u{2192} {}", media.kind(), src, link)
        }
        Media::Link { href } => format!("{}: {}", media.kind(), href),
        Media::Unsupported => media.kind().to_string(),
    }
}

fn header_lines(range: &DateRange, source: &FeedSource) -> Vec<String> {
    vec![
        format!("Feed: {}", source),
        format!("Range: {} \u{2192} {}", range.start(), range.end()),
    ]
}

// ============================================================================
// list
// ============================================================================

/// Format the filtered entries, or the status message when there are none.
pub fn format_list_output(
    view: &GalleryView,
    range: &DateRange,
    source: &FeedSource,
) -> Vec<String> {
    let mut lines = header_lines(range, source);

    if let Some(message) = view.status_message() {
        lines.push(message);
        return lines;
    }

    let entries = view.entries();
    for (i, entry) in entries.iter().enumerate() {
        let title = entry.display_title();
        let date = entry.date_key().unwrap_or_default();
        if title.is_empty() {
            lines.push(format!("{} {}", format_index(i + 1), date));
        } else {
            lines.push(format!("{} {} {}", format_index(i + 1), date, title));
        }
        lines.push(format!("    {}", media_line(&select_media(entry))));
        if let Some(explanation) = &entry.explanation {
            let truncated = truncate_desc(explanation.trim(), 60);
            if !truncated.is_empty() {
                lines.push(format!("    {}", truncated));
            }
        }
    }

    lines.push(String::new());
    let noun = if entries.len() == 1 { "entry" } else { "entries" };
    lines.push(format!("{} {}", entries.len(), noun));
    lines
}

pub fn print_list_output(view: &GalleryView, range: &DateRange, source: &FeedSource) {
    for line in format_list_output(view, range, source) {
        println!("{}", line);
    }
}

// ============================================================================
// show
// ============================================================================

/// Format the open overlay for the terminal. A closed overlay yields nothing.
pub fn format_overlay(view: &OverlayView) -> Vec<String> {
    if !view.visible {
        return Vec::new();
    }
    let mut lines = Vec::new();
    if !view.title.is_empty() {
        lines.push(view.title.clone());
    }
    if !view.date.is_empty() {
        lines.push(view.date.clone());
    }
    if let Some(media) = &view.media {
        lines.push(media_line(media));
    }
    if !view.explanation.is_empty() {
        lines.push(String::new());
        lines.push(view.explanation.clone());
    }
    lines
}

pub fn print_overlay(view: &OverlayView) {
    for line in format_overlay(view) {
        println!("{}", line);
    }
}

// ============================================================================
// build
// ============================================================================

/// Format the build summary.
pub fn format_build_output(view: &GalleryView, index_path: &Path) -> Vec<String> {
    let mut lines = Vec::new();
    match view.status_message() {
        Some(message) => lines.push(message),
        None => {
            let count = view.entries().len();
            let noun = if count == 1 { "entry" } else { "entries" };
            lines.push(format!("Rendered {} {}", count, noun));
        }
    }
    lines.push(format!("Gallery \u{2192} {}", index_path.display()));
    lines
}

pub fn print_build_output(view: &GalleryView, index_path: &Path) {
    for line in format_build_output(view, index_path) {
        println!("{}", line);
    }
}

/// Format a status line for the current view, if it has one.
pub fn format_status(view: &GalleryView) -> Option<String> {
    view.status_message()
}

/// Print the status line to stderr so it does not mix with listings.
pub fn print_status(view: &GalleryView) {
    if let Some(line) = format_status(view) {
        eprintln!("{}", line);
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Entry, MediaType};

    fn range() -> DateRange {
        DateRange::new("2024-03-01", "2024-03-07").unwrap()
    }

    fn source() -> FeedSource {
        FeedSource::parse("data.json")
    }

    fn entry(date: &str, title: Option<&str>, explanation: Option<&str>) -> Entry {
        Entry {
            date: Some(date.to_string()),
            title: title.map(String::from),
            explanation: explanation.map(String::from),
            media_type: MediaType::Image,
            url: Some("https://a.test/x.jpg".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn format_index_pads() {
        assert_eq!(format_index(1), "001");
        assert_eq!(format_index(42), "042");
        assert_eq!(format_index(100), "100");
    }

    #[test]
    fn truncate_desc_short() {
        assert_eq!(truncate_desc("Short text", 40), "Short text");
    }

    #[test]
    fn truncate_desc_long() {
        let text = "a".repeat(50);
        assert_eq!(truncate_desc(&text, 40), format!("{}...", "a".repeat(40)));
    }

    #[test]
    fn truncate_desc_multibyte() {
        assert_eq!(truncate_desc("ééééé", 2), "éé...");
    }

    #[test]
    fn media_line_variants() {
        assert_eq!(
            media_line(&Media::Embed {
                src: "https://www.youtube.com/embed/A".to_string()
            }),
            "embed: https://www.youtube.com/embed/A"
        );
        assert_eq!(
            media_line(&Media::VideoThumbnail {
                src: "t.jpg".to_string(),
                link: "v".to_string()
            }),
            "video-thumbnail: t.jpg \u{2192} v"
        );
        assert_eq!(media_line(&Media::Unsupported), "unsupported");
    }

    #[test]
    fn list_output_entries() {
        let view = GalleryView::Entries(vec![
            entry("2024-03-05", Some("Orion"), Some("A nebula.")),
            entry("2024-03-02", None, None),
        ]);
        let lines = format_list_output(&view, &range(), &source());
        assert_eq!(lines[0], "Feed: data.json");
        assert_eq!(lines[1], "Range: 2024-03-01 \u{2192} 2024-03-07");
        assert_eq!(lines[2], "001 2024-03-05 Orion");
        assert_eq!(lines[3], "    image: https://a.test/x.jpg");
        assert_eq!(lines[4], "    A nebula.");
        assert_eq!(lines[5], "002 2024-03-02");
        assert_eq!(lines.last().unwrap(), "2 entries");
    }

    #[test]
    fn list_output_status() {
        let lines = format_list_output(&GalleryView::EmptyRange, &range(), &source());
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[2], "No entries found for this range.");
    }

    #[test]
    fn overlay_output() {
        let view = OverlayView::of(&entry("2024-03-05", Some("Orion"), Some("A nebula.")));
        let lines = format_overlay(&view);
        assert_eq!(
            lines,
            vec![
                "Orion",
                "2024-03-05",
                "image: https://a.test/x.jpg",
                "",
                "A nebula."
            ]
        );
    }

    #[test]
    fn closed_overlay_output_is_empty() {
        assert!(format_overlay(&OverlayView::default()).is_empty());
    }

    #[test]
    fn build_output_counts_entries() {
        let view = GalleryView::Entries(vec![entry("2024-03-05", Some("Orion"), None)]);
        let lines = format_build_output(&view, Path::new("dist/index.html"));
        assert_eq!(lines, vec!["Rendered 1 entry", "Gallery \u{2192} dist/index.html"]);
    }

    #[test]
    fn build_output_reports_status() {
        let lines = format_build_output(&GalleryView::EmptyFeed, Path::new("dist/index.html"));
        assert_eq!(lines[0], "No entries available in feed.");
    }

    #[test]
    fn status_line_only_for_status_views() {
        assert_eq!(format_status(&GalleryView::Loading).as_deref(), Some("Loading..."));
        assert_eq!(format_status(&GalleryView::Entries(vec![])), None);
    }
}
