//! # APOD Gallery
//!
//! A static gallery generator for daily astronomy-picture-style feeds. It
//! loads a JSON array of dated entries, keeps the ones inside a date range,
//! and renders a single HTML page of thumbnails with a detail overlay per
//! entry.
//!
//! # Pipeline
//!
//! ```text
//! 1. Load      feed URL / data.json  →  Vec<Entry>     (retry + backoff)
//! 2. Select    entries + DateRange   →  GalleryView    (filter, newest first)
//! 3. Render    GalleryView           →  dist/index.html (thumbnails + overlays)
//! ```
//!
//! A failed load never aborts the pipeline: the gallery shows the error
//! message in place of the grid, the same way it shows "no entries" states.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`feed`] | Fetches the feed with retry and exponential backoff, validates its shape |
//! | [`types`] | The feed [`Entry`](types::Entry) record and its media type |
//! | [`gallery`] | Date-range filtering and the [`Gallery`](gallery::Gallery) session state |
//! | [`media`] | Image / embed / thumbnail / link decision and embed URL normalization |
//! | [`overlay`] | Detail overlay state machine |
//! | [`generate`] | HTML rendering with Maud |
//! | [`config`] | `gallery.toml` loading, validation, and color CSS |
//! | [`trivia`] | Daily "Did you know?" fact |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Only Known Hosts Are Embedded
//!
//! Feeds link videos from arbitrary hosts. Only URLs on a small allow-list
//! of rewrite rules ([`media::EMBED_RULES`]) are played inline; the rest fall
//! back to a still frame plus link, or a bare link. The page never shows a
//! player that cannot play.
//!
//! ## String Dates
//!
//! Entry dates are compared as `YYYY-MM-DD` strings, which order the same way
//! as the calendar. Only user-supplied bounds are parsed, to reject typos.
//!
//! ## Overlays Without a Framework
//!
//! Overlays are plain `:target` sections, so the page works with scripting
//! disabled. A few lines of JavaScript only stop embedded players on close.

pub mod config;
pub mod feed;
pub mod gallery;
pub mod generate;
pub mod media;
pub mod output;
pub mod overlay;
pub mod trivia;
pub mod types;
