//! Detail overlay state.
//!
//! ```text
//!            open(entry)
//!   Closed ───────────────▶ Open(entry)
//!      ▲                        │
//!      └── close() / backdrop ──┘
//! ```
//!
//! Clicks inside the content panel leave the overlay open. Closing drops the
//! entry, which empties every field of [`OverlayView`] including the media,
//! so an embedded player never survives a close.

use crate::media::{Media, select_media};
use crate::types::Entry;

/// Where a click inside the overlay landed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickTarget {
    /// The dimmed region around the content panel.
    Backdrop,
    /// Anything inside the content panel.
    Content,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub enum Overlay {
    #[default]
    Closed,
    Open(Entry),
}

/// Everything the overlay displays.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OverlayView {
    pub visible: bool,
    pub title: String,
    pub date: String,
    pub explanation: String,
    pub media: Option<Media>,
}

impl Overlay {
    pub fn is_open(&self) -> bool {
        matches!(self, Overlay::Open(_))
    }

    /// Show an entry, replacing whatever was open before.
    pub fn open(&mut self, entry: Entry) {
        *self = Overlay::Open(entry);
    }

    pub fn close(&mut self) {
        *self = Overlay::Closed;
    }

    /// Handle a click; only the backdrop dismisses.
    pub fn click(&mut self, target: ClickTarget) {
        if target == ClickTarget::Backdrop {
            self.close();
        }
    }

    pub fn view(&self) -> OverlayView {
        match self {
            Overlay::Closed => OverlayView::default(),
            Overlay::Open(entry) => OverlayView::of(entry),
        }
    }
}

impl OverlayView {
    /// Full-detail view of an entry.
    pub fn of(entry: &Entry) -> Self {
        Self {
            visible: true,
            title: entry.display_title().to_string(),
            date: entry.date_key().unwrap_or_default().to_string(),
            explanation: entry.explanation.clone().unwrap_or_default(),
            media: Some(select_media(entry)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::MediaType;

    fn entry() -> Entry {
        Entry {
            date: Some("2024-03-01T00:00:00".to_string()),
            title: Some("Pillars of Creation".to_string()),
            explanation: Some("Gas and dust.".to_string()),
            media_type: MediaType::Image,
            url: Some("https://a.test/p.jpg".to_string()),
            hdurl: Some("https://a.test/p_hd.jpg".to_string()),
            thumbnail_url: None,
        }
    }

    #[test]
    fn starts_closed() {
        let overlay = Overlay::default();
        assert!(!overlay.is_open());
        assert_eq!(overlay.view(), OverlayView::default());
    }

    #[test]
    fn open_populates_fields() {
        let mut overlay = Overlay::default();
        overlay.open(entry());
        let view = overlay.view();
        assert!(view.visible);
        assert_eq!(view.title, "Pillars of Creation");
        assert_eq!(view.date, "2024-03-01");
        assert_eq!(view.explanation, "Gas and dust.");
        assert_eq!(
            view.media,
            Some(Media::Image {
                src: "https://a.test/p_hd.jpg".to_string()
            })
        );
    }

    #[test]
    fn open_then_close_restores_empty_view() {
        let mut overlay = Overlay::default();
        let before = overlay.view();
        overlay.open(entry());
        overlay.close();
        assert_eq!(overlay.view(), before);
        assert_eq!(overlay.view().media, None);
    }

    #[test]
    fn backdrop_click_closes() {
        let mut overlay = Overlay::default();
        overlay.open(entry());
        overlay.click(ClickTarget::Backdrop);
        assert!(!overlay.is_open());
    }

    #[test]
    fn content_click_keeps_open() {
        let mut overlay = Overlay::default();
        overlay.open(entry());
        overlay.click(ClickTarget::Content);
        assert!(overlay.is_open());
    }

    #[test]
    fn missing_optional_fields_render_blank() {
        let mut overlay = Overlay::default();
        overlay.open(Entry {
            media_type: MediaType::Video,
            ..Default::default()
        });
        let view = overlay.view();
        assert_eq!(view.title, "");
        assert_eq!(view.date, "");
        assert_eq!(view.explanation, "");
        assert_eq!(
            view.media,
            Some(Media::Link {
                href: "#".to_string()
            })
        );
    }

    #[test]
    fn reopening_replaces_entry() {
        let mut overlay = Overlay::default();
        overlay.open(entry());
        overlay.open(Entry {
            title: Some("Second".to_string()),
            ..Default::default()
        });
        assert_eq!(overlay.view().title, "Second");
    }
}
