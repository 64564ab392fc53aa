//! Feed loading with retry and exponential backoff.
//!
//! A load is a single sequential run of up to [`RetryPolicy::attempts`]
//! fetches. Every failed attempt except the last is followed by a delay of
//! `base_delay * 2^attempt_index`:
//!
//! ```text
//! attempt 0 ──fail──▶ sleep 300ms ──▶ attempt 1 ──fail──▶ sleep 600ms ──▶ attempt 2 ──fail──▶ Unavailable
//! ```
//!
//! Transport failures and non-success HTTP statuses are both retried. Once a
//! body arrives it must be a JSON array; anything else is [`FeedError::Malformed`]
//! and is not retried.
//!
//! The fetch itself goes through the [`Transport`] trait so the retry logic
//! can be exercised without a network. [`FeedClient`] is the production
//! transport: reqwest for `http(s)://` sources, tokio fs for local files.

use crate::types::Entry;
use std::fmt;
use std::future::Future;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Failure of a single fetch attempt. Always retried.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AttemptError {
    #[error("transport error: {0}")]
    Transport(String),
    #[error("HTTP {code} {reason}")]
    Status { code: u16, reason: String },
    #[error("IO error: {0}")]
    Io(String),
}

#[derive(Error, Debug)]
pub enum FeedError {
    #[error("feed unavailable after {attempts} attempt(s): {source}")]
    Unavailable {
        attempts: u32,
        #[source]
        source: AttemptError,
    },
    #[error("malformed feed: {0}")]
    Malformed(String),
    #[error("HTTP client error: {0}")]
    Client(String),
}

/// Where the feed is read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedSource {
    Url(String),
    File(PathBuf),
}

impl FeedSource {
    /// `http://` and `https://` locations are URLs; everything else is a path.
    pub fn parse(location: &str) -> Self {
        let lower = location.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            FeedSource::Url(location.to_string())
        } else {
            FeedSource::File(PathBuf::from(location))
        }
    }
}

impl fmt::Display for FeedSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeedSource::Url(url) => write!(f, "{url}"),
            FeedSource::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Attempt count and base delay for exponential backoff.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub attempts: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: 3,
            base_delay: Duration::from_millis(300),
        }
    }
}

impl RetryPolicy {
    /// Delay to wait after the failed attempt with the given 0-based index.
    pub fn delay_for(&self, attempt_index: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt_index);
        self.base_delay.saturating_mul(factor)
    }
}

/// A single fetch of the raw feed body.
pub trait Transport {
    fn fetch(&self, source: &FeedSource) -> impl Future<Output = Result<String, AttemptError>>;
}

/// Production transport backed by a reqwest client.
pub struct FeedClient {
    client: reqwest::Client,
}

impl FeedClient {
    pub fn new(timeout: Duration) -> Result<Self, FeedError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| FeedError::Client(e.to_string()))?;
        Ok(Self { client })
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl Transport for FeedClient {
    async fn fetch(&self, source: &FeedSource) -> Result<String, AttemptError> {
        match source {
            FeedSource::File(path) => tokio::fs::read_to_string(path)
                .await
                .map_err(|e| AttemptError::Io(format!("{}: {e}", path.display()))),
            FeedSource::Url(url) => {
                let response = self
                    .client
                    .get(url)
                    .header(reqwest::header::CACHE_CONTROL, "no-cache")
                    .send()
                    .await
                    .map_err(|e| AttemptError::Transport(e.to_string()))?;
                let status = response.status();
                if !status.is_success() {
                    return Err(AttemptError::Status {
                        code: status.as_u16(),
                        reason: status.canonical_reason().unwrap_or_default().to_string(),
                    });
                }
                response
                    .text()
                    .await
                    .map_err(|e| AttemptError::Transport(e.to_string()))
            }
        }
    }
}

/// Result of a load at the UI boundary: never fails, but may carry an error
/// alongside an empty entry list.
#[derive(Debug, Default)]
pub struct LoadOutcome {
    pub entries: Vec<Entry>,
    pub error: Option<FeedError>,
}

pub struct FeedLoader<T> {
    transport: T,
    policy: RetryPolicy,
}

impl<T: Transport> FeedLoader<T> {
    pub fn new(transport: T, policy: RetryPolicy) -> Self {
        Self { transport, policy }
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Fetch the raw body, retrying with backoff until the attempts run out.
    pub async fn fetch_with_retry(&self, source: &FeedSource) -> Result<String, FeedError> {
        let attempts = self.policy.attempts.max(1);
        let mut attempt = 0;
        loop {
            debug!(%source, attempt, "fetching feed");
            match self.transport.fetch(source).await {
                Ok(body) => return Ok(body),
                Err(err) => {
                    if attempt + 1 >= attempts {
                        warn!(%source, attempts, error = %err, "feed unavailable");
                        return Err(FeedError::Unavailable {
                            attempts,
                            source: err,
                        });
                    }
                    let delay = self.policy.delay_for(attempt);
                    warn!(%source, attempt, error = %err, ?delay, "feed attempt failed, retrying");
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
            }
        }
    }

    /// Load and validate the feed.
    pub async fn load(&self, source: &FeedSource) -> Result<Vec<Entry>, FeedError> {
        let body = self.fetch_with_retry(source).await?;
        let entries = parse_entries(&body)?;
        info!(%source, count = entries.len(), "feed loaded");
        Ok(entries)
    }

    /// Load the feed, folding any failure into an empty result plus error.
    pub async fn load_or_empty(&self, source: &FeedSource) -> LoadOutcome {
        match self.load(source).await {
            Ok(entries) => LoadOutcome {
                entries,
                error: None,
            },
            Err(err) => LoadOutcome {
                entries: Vec::new(),
                error: Some(err),
            },
        }
    }
}

/// Parse a feed body into entries.
///
/// The top-level value must be an array. Elements that are not objects are
/// skipped; inside an object, wrongly typed fields read as missing.
pub fn parse_entries(body: &str) -> Result<Vec<Entry>, FeedError> {
    let value: serde_json::Value = serde_json::from_str(body)
        .map_err(|e| FeedError::Malformed(format!("invalid JSON: {e}")))?;
    let serde_json::Value::Array(items) = value else {
        return Err(FeedError::Malformed(
            "feed did not return an array".to_string(),
        ));
    };

    let mut entries = Vec::with_capacity(items.len());
    for (index, item) in items.into_iter().enumerate() {
        if !item.is_object() {
            warn!(index, "skipping feed element that is not an object");
            continue;
        }
        match serde_json::from_value::<Entry>(item) {
            Ok(entry) => entries.push(entry),
            Err(err) => warn!(index, error = %err, "skipping malformed feed element"),
        }
    }
    Ok(entries)
}
