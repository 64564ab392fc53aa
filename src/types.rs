//! Feed record types shared by the loader, the gallery, and the renderer.
//!
//! Entries are deserialized once per load and never mutated afterwards.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Media kind of a feed entry.
///
/// Unrecognized values are preserved in [`MediaType::Other`] so they can be
/// reported, but they always render as unsupported media.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum MediaType {
    Image,
    Video,
    Other(String),
}

impl Default for MediaType {
    fn default() -> Self {
        MediaType::Other(String::new())
    }
}

impl From<String> for MediaType {
    fn from(value: String) -> Self {
        match value.as_str() {
            "image" => MediaType::Image,
            "video" => MediaType::Video,
            _ => MediaType::Other(value),
        }
    }
}

impl From<MediaType> for String {
    fn from(value: MediaType) -> Self {
        match value {
            MediaType::Image => "image".to_string(),
            MediaType::Video => "video".to_string(),
            MediaType::Other(raw) => raw,
        }
    }
}

/// One dated media item from the feed.
///
/// Every field is optional and tolerant of the wrong JSON type: a value that
/// is not a string reads as absent (or, for `media_type`, as an unrecognized
/// kind), so one odd field never drops the whole entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    /// ISO date; only the first 10 characters (`YYYY-MM-DD`) are significant.
    #[serde(default, deserialize_with = "lenient_string")]
    pub date: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub explanation: Option<String>,
    #[serde(default, deserialize_with = "lenient_media_type")]
    pub media_type: MediaType,
    /// Primary media reference (image source or video page).
    #[serde(default, deserialize_with = "lenient_string")]
    pub url: Option<String>,
    /// Higher-resolution image, preferred over `url` for images.
    #[serde(default, deserialize_with = "lenient_string")]
    pub hdurl: Option<String>,
    /// Still frame for videos that cannot be embedded.
    #[serde(default, deserialize_with = "lenient_string")]
    pub thumbnail_url: Option<String>,
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => Some(s),
        _ => None,
    })
}

/// `null` reads as an empty unrecognized kind; other non-strings keep their
/// JSON text so listings can still show what the feed sent.
fn lenient_media_type<'de, D>(deserializer: D) -> Result<MediaType, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => MediaType::from(s),
        Some(other) => MediaType::Other(other.to_string()),
        None => MediaType::default(),
    })
}

impl Entry {
    /// The `YYYY-MM-DD` part of the date, used for range checks and display.
    pub fn date_key(&self) -> Option<&str> {
        self.date.as_deref().map(truncate_date)
    }

    /// Title for display; empty when the feed omits it.
    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or_default()
    }
}

/// Truncate a date string to its first 10 characters.
pub fn truncate_date(date: &str) -> &str {
    match date.char_indices().nth(10) {
        Some((idx, _)) => &date[..idx],
        None => date,
    }
}
