//! Date-range filtering and the gallery session state.
//!
//! Dates are compared as `YYYY-MM-DD` strings. ISO-8601 date-only strings
//! sort lexicographically in chronological order, so no calendar parsing is
//! needed on the feed side; user input is still validated with chrono so a
//! malformed bound cannot silently change the comparison.
//!
//! [`Gallery`] owns everything that changes during a session: the loaded
//! entries, the current [`GalleryView`], and the detail [`Overlay`]. Each load
//! replaces the entries wholesale.

use crate::feed::{FeedLoader, FeedSource, LoadOutcome, Transport};
use crate::overlay::{ClickTarget, Overlay};
use crate::types::Entry;
use chrono::{Days, NaiveDate};
use thiserror::Error;
use tracing::debug;

const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DateRangeError {
    #[error("invalid date '{0}': expected YYYY-MM-DD")]
    InvalidDate(String),
}

/// Inclusive `[start, end]` range of `YYYY-MM-DD` dates.
///
/// A start after the end is allowed and simply matches nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateRange {
    start: String,
    end: String,
}

impl DateRange {
    pub fn new(start: &str, end: &str) -> Result<Self, DateRangeError> {
        Ok(Self {
            start: canonical_date(start)?,
            end: canonical_date(end)?,
        })
    }

    /// The `days`-day window ending on `today`, e.g. 6 → "6 days ago" to today.
    pub fn ending_on(today: NaiveDate, days: u32) -> Self {
        let start = today
            .checked_sub_days(Days::new(u64::from(days)))
            .unwrap_or(NaiveDate::MIN);
        Self {
            start: start.format(DATE_FORMAT).to_string(),
            end: today.format(DATE_FORMAT).to_string(),
        }
    }

    pub fn start(&self) -> &str {
        &self.start
    }

    pub fn end(&self) -> &str {
        &self.end
    }

    pub fn contains(&self, date_key: &str) -> bool {
        date_key >= self.start.as_str() && date_key <= self.end.as_str()
    }
}

/// Parse and re-format so only zero-padded `YYYY-MM-DD` survives.
fn canonical_date(input: &str) -> Result<String, DateRangeError> {
    let trimmed = input.trim();
    let date = NaiveDate::parse_from_str(trimmed, DATE_FORMAT)
        .map_err(|_| DateRangeError::InvalidDate(input.to_string()))?;
    let formatted = date.format(DATE_FORMAT).to_string();
    if formatted != trimmed {
        return Err(DateRangeError::InvalidDate(input.to_string()));
    }
    Ok(formatted)
}

/// Entries dated within `range`, newest first.
///
/// Undated entries are dropped. The sort is stable, so entries sharing a
/// date keep their feed order.
pub fn select<'a>(entries: &'a [Entry], range: &DateRange) -> Vec<&'a Entry> {
    let mut kept: Vec<&Entry> = entries
        .iter()
        .filter(|e| e.date_key().is_some_and(|key| range.contains(key)))
        .collect();
    kept.sort_by(|a, b| b.date.cmp(&a.date));
    kept
}

/// What the gallery area currently shows.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum GalleryView {
    /// Nothing loaded yet.
    #[default]
    Idle,
    Loading,
    FeedError(String),
    /// The feed loaded but had no entries at all.
    EmptyFeed,
    /// The feed had entries, none of them in the requested range.
    EmptyRange,
    Entries(Vec<Entry>),
}

impl GalleryView {
    /// Inline status text, or `None` when entries are shown.
    pub fn status_message(&self) -> Option<String> {
        match self {
            GalleryView::Idle | GalleryView::Entries(_) => None,
            GalleryView::Loading => Some("Loading...".to_string()),
            GalleryView::FeedError(msg) => Some(format!("Error fetching feed: {msg}")),
            GalleryView::EmptyFeed => Some("No entries available in feed.".to_string()),
            GalleryView::EmptyRange => Some("No entries found for this range.".to_string()),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(
            self,
            GalleryView::FeedError(_) | GalleryView::EmptyFeed | GalleryView::EmptyRange
        )
    }

    /// Entries on display; empty for every status view.
    pub fn entries(&self) -> &[Entry] {
        match self {
            GalleryView::Entries(entries) => entries,
            _ => &[],
        }
    }
}

/// Session state for one gallery: loaded entries, current view, overlay.
#[derive(Debug, Default)]
pub struct Gallery {
    entries: Vec<Entry>,
    view: GalleryView,
    overlay: Overlay,
    loading: bool,
}

impl Gallery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a load as started. Returns `false` (and changes nothing) if one
    /// is already in flight.
    pub fn begin_load(&mut self) -> bool {
        if self.loading {
            debug!("load already in flight, ignoring trigger");
            return false;
        }
        self.loading = true;
        self.view = GalleryView::Loading;
        true
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Load the feed and show `range` of it. Returns `false` without
    /// fetching if another load is still in flight.
    pub async fn refresh<T: Transport>(
        &mut self,
        loader: &FeedLoader<T>,
        source: &FeedSource,
        range: &DateRange,
    ) -> bool {
        if !self.begin_load() {
            return false;
        }
        let outcome = loader.load_or_empty(source).await;
        self.finish_load(outcome, range);
        true
    }

    /// Replace the entries with a load result and recompute the view.
    pub fn finish_load(&mut self, outcome: LoadOutcome, range: &DateRange) {
        self.loading = false;
        self.overlay.close();
        self.entries = outcome.entries;
        match outcome.error {
            Some(err) => self.view = GalleryView::FeedError(err.to_string()),
            None => self.apply_range(range),
        }
    }

    /// Re-filter the loaded entries without fetching again.
    pub fn apply_range(&mut self, range: &DateRange) {
        self.view = if self.entries.is_empty() {
            GalleryView::EmptyFeed
        } else {
            let kept: Vec<Entry> = select(&self.entries, range).into_iter().cloned().collect();
            if kept.is_empty() {
                GalleryView::EmptyRange
            } else {
                GalleryView::Entries(kept)
            }
        };
    }

    pub fn view(&self) -> &GalleryView {
        &self.view
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn overlay(&self) -> &Overlay {
        &self.overlay
    }

    /// Open the overlay for the visible entry at `index`.
    pub fn select(&mut self, index: usize) -> bool {
        match self.view.entries().get(index) {
            Some(entry) => {
                self.overlay.open(entry.clone());
                true
            }
            None => false,
        }
    }

    pub fn dismiss(&mut self, target: ClickTarget) {
        self.overlay.click(target);
    }
}
