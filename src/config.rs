//! Gallery configuration.
//!
//! Loaded from `gallery.toml` in the working directory (or the path given
//! with `--config`). User values are merged over stock defaults, unknown keys
//! are rejected, and the result is validated.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! title = "Astronomy Picture Gallery"
//! range_days = 6            # default window: 6 days ago through today
//!
//! [feed]
//! url = "data.json"         # http(s) URL or local file
//! attempts = 3              # fetch attempts before giving up
//! base_delay_ms = 300       # backoff: base_delay_ms * 2^attempt
//! timeout_secs = 10         # per-request timeout
//!
//! [colors.light]
//! background = "#ffffff"
//! text = "#111111"
//! text_muted = "#666666"
//! border = "#e0e0e0"
//! link = "#1d4ed8"
//! error = "#dc143c"
//!
//! [colors.dark]
//! background = "#0b0d17"
//! text = "#eeeeee"
//! text_muted = "#9aa0b4"
//! border = "#2a2f45"
//! link = "#93c5fd"
//! error = "#ff6b81"
//!
//! [trivia]
//! facts = ["A day on Venus is longer than a year on Venus.", "..."]
//! ```
//!
//! The feed location can also be set with `--feed` or the `APOD_FEED_URL`
//! environment variable, both of which take precedence over `feed.url`.

use crate::feed::RetryPolicy;
use crate::trivia::DEFAULT_FACTS;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Config file looked up in the working directory when `--config` is absent.
pub const CONFIG_FILENAME: &str = "gallery.toml";

/// Upper bound for `range_days`, about ten years.
const MAX_RANGE_DAYS: u32 = 3650;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("TOML serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GalleryConfig {
    /// Page heading and document title.
    pub title: String,
    /// Length of the default date window, in days before today.
    pub range_days: u32,
    pub feed: FeedConfig,
    pub colors: ColorConfig,
    pub trivia: TriviaConfig,
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            title: "Astronomy Picture Gallery".to_string(),
            range_days: 6,
            feed: FeedConfig::default(),
            colors: ColorConfig::default(),
            trivia: TriviaConfig::default(),
        }
    }
}

impl GalleryConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.feed.attempts == 0 {
            return Err(ConfigError::Validation(
                "feed.attempts must be at least 1".into(),
            ));
        }
        if self.feed.url.trim().is_empty() {
            return Err(ConfigError::Validation("feed.url must not be empty".into()));
        }
        if self.feed.timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "feed.timeout_secs must be non-zero".into(),
            ));
        }
        if self.range_days > MAX_RANGE_DAYS {
            return Err(ConfigError::Validation(format!(
                "range_days must be at most {MAX_RANGE_DAYS}"
            )));
        }
        if self.trivia.facts.is_empty() {
            return Err(ConfigError::Validation(
                "trivia.facts must not be empty".into(),
            ));
        }
        Ok(())
    }
}

/// Feed location and retry settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FeedConfig {
    pub url: String,
    pub attempts: u32,
    pub base_delay_ms: u64,
    pub timeout_secs: u64,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            url: "data.json".to_string(),
            attempts: 3,
            base_delay_ms: 300,
            timeout_secs: 10,
        }
    }
}

impl FeedConfig {
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            attempts: self.attempts,
            base_delay: Duration::from_millis(self.base_delay_ms),
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TriviaConfig {
    pub facts: Vec<String>,
}

impl Default for TriviaConfig {
    fn default() -> Self {
        Self {
            facts: DEFAULT_FACTS.iter().map(|f| f.to_string()).collect(),
        }
    }
}

/// Color configuration for light and dark modes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColorConfig {
    pub light: ColorScheme,
    pub dark: ColorScheme,
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            light: ColorScheme::default_light(),
            dark: ColorScheme::default_dark(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColorScheme {
    pub background: String,
    pub text: String,
    /// Dates, captions, trivia.
    pub text_muted: String,
    pub border: String,
    pub link: String,
    /// Status messages for fetch errors and empty results.
    pub error: String,
}

impl ColorScheme {
    pub fn default_light() -> Self {
        Self {
            background: "#ffffff".to_string(),
            text: "#111111".to_string(),
            text_muted: "#666666".to_string(),
            border: "#e0e0e0".to_string(),
            link: "#1d4ed8".to_string(),
            error: "#dc143c".to_string(),
        }
    }

    pub fn default_dark() -> Self {
        Self {
            background: "#0b0d17".to_string(),
            text: "#eeeeee".to_string(),
            text_muted: "#9aa0b4".to_string(),
            border: "#2a2f45".to_string(),
            link: "#93c5fd".to_string(),
            error: "#ff6b81".to_string(),
        }
    }
}

impl Default for ColorScheme {
    fn default() -> Self {
        Self::default_light()
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    Ok(toml::Value::try_from(GalleryConfig::default())?)
}

/// Recursively merge `overlay` on top of `base`.
///
/// Tables merge key-by-key; any other overlay value replaces the base value.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Read a config file as a raw TOML value. `Ok(None)` if it does not exist.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<GalleryConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: GalleryConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `path`, falling back to stock defaults if it is missing.
pub fn load_config(path: &Path) -> Result<GalleryConfig, ConfigError> {
    let base = stock_defaults_value()?;
    let overlay = load_raw_config(path)?;
    resolve_config(base, overlay)
}

/// Returns a fully-commented stock `gallery.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# APOD Gallery Configuration
# ==========================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Unknown keys will cause an error.

# Page heading and document title.
title = "Astronomy Picture Gallery"

# Default date window when --start/--end are not given:
# from `range_days` days ago through today.
range_days = 6

# ---------------------------------------------------------------------------
# Feed
# ---------------------------------------------------------------------------
[feed]
# JSON array of entries. An http(s) URL or a local file path.
# Overridden by --feed or the APOD_FEED_URL environment variable.
url = "data.json"

# Fetch attempts before the feed is reported unavailable.
attempts = 3

# Backoff between attempts: base_delay_ms * 2^attempt (300, 600, ...).
base_delay_ms = 300

# Per-request timeout in seconds.
timeout_secs = 10

# ---------------------------------------------------------------------------
# Colors - Light mode (prefers-color-scheme: light)
# ---------------------------------------------------------------------------
[colors.light]
background = "#ffffff"
text = "#111111"
text_muted = "#666666"    # Dates, captions, trivia
border = "#e0e0e0"
link = "#1d4ed8"
error = "#dc143c"         # Fetch errors, empty results

# ---------------------------------------------------------------------------
# Colors - Dark mode (prefers-color-scheme: dark)
# ---------------------------------------------------------------------------
[colors.dark]
background = "#0b0d17"
text = "#eeeeee"
text_muted = "#9aa0b4"
border = "#2a2f45"
link = "#93c5fd"
error = "#ff6b81"

# ---------------------------------------------------------------------------
# Trivia
# ---------------------------------------------------------------------------
[trivia]
# One fact is shown per day, rotating through the list.
facts = [
    "A day on Venus is longer than a year on Venus.",
    "Neutron stars can spin hundreds of times per second.",
    "There are more trees on Earth than stars in the Milky Way (estimated).",
    "The International Space Station travels at about 28,000 km/h.",
    "Light from the Sun takes about 8 minutes to reach Earth.",
]
"##
}

/// Generate CSS custom properties from color config.
pub fn generate_color_css(colors: &ColorConfig) -> String {
    format!(
        r#":root {{
    --color-bg: {light_bg};
    --color-text: {light_text};
    --color-text-muted: {light_muted};
    --color-border: {light_border};
    --color-link: {light_link};
    --color-error: {light_error};
}}

@media (prefers-color-scheme: dark) {{
    :root {{
        --color-bg: {dark_bg};
        --color-text: {dark_text};
        --color-text-muted: {dark_muted};
        --color-border: {dark_border};
        --color-link: {dark_link};
        --color-error: {dark_error};
    }}
}}"#,
        light_bg = colors.light.background,
        light_text = colors.light.text,
        light_muted = colors.light.text_muted,
        light_border = colors.light.border,
        light_link = colors.light.link,
        light_error = colors.light.error,
        dark_bg = colors.dark.background,
        dark_text = colors.dark.text,
        dark_muted = colors.dark.text_muted,
        dark_border = colors.dark.border,
        dark_link = colors.dark.link,
        dark_error = colors.dark.error,
    )
}
