//! Media selection: deciding how an entry is displayed.
//!
//! The same decision tree drives gallery thumbnails and the detail overlay:
//!
//! | `media_type` | Condition | Result |
//! |---|---|---|
//! | `image` | `hdurl` or `url` present | [`Media::Image`] (prefers `hdurl`) |
//! | `video` | `url` matches an [`EmbedRule`] | [`Media::Embed`] with normalized URL |
//! | `video` | `thumbnail_url` present | [`Media::VideoThumbnail`] |
//! | `video` | otherwise | [`Media::Link`] to `url` |
//! | anything else | | [`Media::Unsupported`] |
//!
//! Only hosts on the embed allow-list are played inline. Everything else
//! degrades to a still frame plus link, or a bare link, so a gallery never
//! dead-ends on media it cannot play.
//!
//! "Present" means non-empty with an `http(s)` scheme or no scheme at all;
//! a `javascript:` or `data:` URL is treated like a missing one.

use crate::types::{Entry, MediaType};

/// Link target used when a video entry has no usable URL.
pub const MISSING_LINK: &str = "#";

/// Display decision for one entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Media {
    Image { src: String },
    Embed { src: String },
    VideoThumbnail { src: String, link: String },
    Link { href: String },
    Unsupported,
}

impl Media {
    /// Short label for CLI listings.
    pub fn kind(&self) -> &'static str {
        match self {
            Media::Image { .. } => "image",
            Media::Embed { .. } => "embed",
            Media::VideoThumbnail { .. } => "video-thumbnail",
            Media::Link { .. } => "link",
            Media::Unsupported => "unsupported",
        }
    }
}

/// A recognized embeddable video URL form.
///
/// `host` matches the URL's host exactly or as a parent domain
/// (`www.youtube.com` matches `youtube.com`), and `path` must prefix
/// everything after the host. When `rewrite` is set, host and path are
/// replaced by it to reach the embeddable form.
#[derive(Debug, Clone, Copy)]
pub struct EmbedRule {
    pub host: &'static str,
    pub path: &'static str,
    pub rewrite: Option<&'static str>,
}

/// Allow-list of embeddable video URL forms, checked in order.
pub const EMBED_RULES: &[EmbedRule] = &[
    EmbedRule {
        host: "youtube.com",
        path: "/embed/",
        rewrite: None,
    },
    EmbedRule {
        host: "youtube.com",
        path: "/watch?v=",
        rewrite: Some("www.youtube.com/embed/"),
    },
    EmbedRule {
        host: "youtu.be",
        path: "/",
        rewrite: Some("www.youtube.com/embed/"),
    },
    EmbedRule {
        host: "player.vimeo.com",
        path: "/video/",
        rewrite: None,
    },
];

/// Normalize a video URL to its embeddable form, if it is on the allow-list.
pub fn embed_url(url: &str) -> Option<String> {
    let (scheme, host, rest) = split_http_url(url)?;
    let rule = EMBED_RULES
        .iter()
        .find(|rule| host_matches(host, rule.host) && rest.starts_with(rule.path))?;
    let Some(prefix) = rule.rewrite else {
        return Some(url.to_string());
    };
    let mut embed = format!("{scheme}{prefix}{}", &rest[rule.path.len()..]);
    // `watch?v=ID&t=10` becomes `embed/ID&t=10`; the leftover parameters need a `?`.
    if !embed.contains('?') {
        if let Some(amp) = embed.find('&') {
            embed.replace_range(amp..amp + 1, "?");
        }
    }
    Some(embed)
}

/// Split an `http(s)` URL into scheme (with `://`), host, and the rest.
fn split_http_url(url: &str) -> Option<(&str, &str, &str)> {
    let scheme_len = ["https://", "http://"]
        .iter()
        .find(|scheme| {
            url.get(..scheme.len())
                .is_some_and(|head| head.eq_ignore_ascii_case(scheme))
        })?
        .len();
    let after = &url[scheme_len..];
    let host_end = after.find(['/', '?', '#']).unwrap_or(after.len());
    Some((&url[..scheme_len], &after[..host_end], &after[host_end..]))
}

fn host_matches(host: &str, domain: &str) -> bool {
    let host = host.to_ascii_lowercase();
    host == domain
        || host
            .strip_suffix(domain)
            .is_some_and(|sub| sub.ends_with('.'))
}

/// `http(s)` URLs and relative references are usable; any other scheme
/// (`javascript:`, `data:`) is not.
pub fn is_safe_url(url: &str) -> bool {
    match url.find([':', '/', '?', '#']) {
        Some(idx) if url[idx..].starts_with(':') => {
            let scheme = &url[..idx];
            scheme.eq_ignore_ascii_case("http") || scheme.eq_ignore_ascii_case("https")
        }
        _ => true,
    }
}

/// Choose how to display an entry.
pub fn select_media(entry: &Entry) -> Media {
    match &entry.media_type {
        MediaType::Image => match usable(&entry.hdurl).or(usable(&entry.url)) {
            Some(src) => Media::Image {
                src: src.to_string(),
            },
            None => Media::Unsupported,
        },
        MediaType::Video => {
            let url = usable(&entry.url);
            if let Some(src) = url.and_then(embed_url) {
                return Media::Embed { src };
            }
            let link = url.unwrap_or(MISSING_LINK).to_string();
            match usable(&entry.thumbnail_url) {
                Some(thumb) => Media::VideoThumbnail {
                    src: thumb.to_string(),
                    link,
                },
                None => Media::Link { href: link },
            }
        }
        MediaType::Other(_) => Media::Unsupported,
    }
}

/// Empty strings and unsafe schemes count as missing.
fn usable(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .filter(|s| !s.is_empty() && is_safe_url(s))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn video(url: Option<&str>, thumbnail: Option<&str>) -> Entry {
        Entry {
            date: Some("2024-03-01".to_string()),
            media_type: MediaType::Video,
            url: url.map(String::from),
            thumbnail_url: thumbnail.map(String::from),
            ..Default::default()
        }
    }

    fn image(url: Option<&str>, hdurl: Option<&str>) -> Entry {
        Entry {
            media_type: MediaType::Image,
            url: url.map(String::from),
            hdurl: hdurl.map(String::from),
            ..Default::default()
        }
    }

    // =========================================================================
    // Images
    // =========================================================================

    #[test]
    fn image_prefers_hdurl() {
        let entry = image(Some("https://a.test/small.jpg"), Some("https://a.test/big.jpg"));
        assert_eq!(
            select_media(&entry),
            Media::Image {
                src: "https://a.test/big.jpg".to_string()
            }
        );
    }

    #[test]
    fn image_falls_back_to_url() {
        let entry = image(Some("https://a.test/small.jpg"), None);
        assert_eq!(
            select_media(&entry),
            Media::Image {
                src: "https://a.test/small.jpg".to_string()
            }
        );
    }

    #[test]
    fn image_treats_empty_hdurl_as_missing() {
        let entry = image(Some("https://a.test/small.jpg"), Some(""));
        assert_eq!(
            select_media(&entry),
            Media::Image {
                src: "https://a.test/small.jpg".to_string()
            }
        );
    }

    #[test]
    fn image_without_any_source_is_unsupported() {
        assert_eq!(select_media(&image(None, None)), Media::Unsupported);
    }

    // =========================================================================
    // Embed URL normalization
    // =========================================================================

    #[test]
    fn watch_url_rewritten_to_embed() {
        assert_eq!(
            embed_url("https://www.youtube.com/watch?v=ABC123").as_deref(),
            Some("https://www.youtube.com/embed/ABC123")
        );
    }

    #[test]
    fn watch_url_extra_params_become_query() {
        assert_eq!(
            embed_url("https://www.youtube.com/watch?v=ABC123&t=42").as_deref(),
            Some("https://www.youtube.com/embed/ABC123?t=42")
        );
    }

    #[test]
    fn short_link_rewritten_to_long_host() {
        assert_eq!(
            embed_url("https://youtu.be/ABC123").as_deref(),
            Some("https://www.youtube.com/embed/ABC123")
        );
    }

    #[test]
    fn short_link_keeps_existing_query() {
        assert_eq!(
            embed_url("https://youtu.be/ABC123?t=5&si=x").as_deref(),
            Some("https://www.youtube.com/embed/ABC123?t=5&si=x")
        );
    }

    #[test]
    fn embed_url_passes_through() {
        let url = "https://www.youtube.com/embed/ABC123?rel=0";
        assert_eq!(embed_url(url).as_deref(), Some(url));
    }

    #[test]
    fn vimeo_player_passes_through() {
        let url = "https://player.vimeo.com/video/123456";
        assert_eq!(embed_url(url).as_deref(), Some(url));
    }

    #[test]
    fn unknown_host_is_not_embeddable() {
        assert_eq!(embed_url("https://videos.example.org/clip.mp4"), None);
        assert_eq!(embed_url("https://www.youtube.com/channel/xyz"), None);
    }

    #[test]
    fn pattern_outside_host_is_not_embeddable() {
        assert_eq!(embed_url("https://evil.example/?r=youtube.com/embed/x"), None);
        assert_eq!(embed_url("https://evil.example/youtu.be/x"), None);
        assert_eq!(embed_url("https://notyoutube.com/embed/x"), None);
        assert_eq!(embed_url("https://youtube.com.evil.example/embed/x"), None);
        assert_eq!(embed_url("https://youtube.com@evil.example/embed/x"), None);
    }

    #[test]
    fn subdomains_and_scheme_case_are_accepted() {
        assert_eq!(
            embed_url("HTTPS://m.YouTube.com/watch?v=ABC123").as_deref(),
            Some("HTTPS://www.youtube.com/embed/ABC123")
        );
        let url = "https://youtube.com/embed/ABC123";
        assert_eq!(embed_url(url).as_deref(), Some(url));
    }

    #[test]
    fn non_http_urls_are_not_embeddable() {
        assert_eq!(embed_url("javascript:alert('youtube.com/embed/x')"), None);
        assert_eq!(embed_url("//www.youtube.com/embed/x"), None);
    }

    // =========================================================================
    // URL safety
    // =========================================================================

    #[test]
    fn safe_url_schemes() {
        assert!(is_safe_url("https://a.test/x.jpg"));
        assert!(is_safe_url("HTTP://a.test/x.jpg"));
        assert!(is_safe_url("images/x.jpg"));
        assert!(is_safe_url("/x.jpg?at=12:00"));
        assert!(is_safe_url("//cdn.test/x.jpg"));
        assert!(!is_safe_url("javascript:alert(1)"));
        assert!(!is_safe_url("JavaScript:alert(1)"));
        assert!(!is_safe_url(" javascript:alert(1)"));
        assert!(!is_safe_url("data:text/html,<script>"));
    }

    #[test]
    fn script_video_url_links_nowhere() {
        let entry = video(Some("javascript:alert(1)"), Some("javascript:alert(2)"));
        assert_eq!(
            select_media(&entry),
            Media::Link {
                href: MISSING_LINK.to_string()
            }
        );
    }

    #[test]
    fn script_image_url_falls_back() {
        let entry = image(Some("https://a.test/small.jpg"), Some("javascript:alert(1)"));
        assert_eq!(
            select_media(&entry),
            Media::Image {
                src: "https://a.test/small.jpg".to_string()
            }
        );
        assert_eq!(
            select_media(&image(Some("data:image/svg+xml,<svg/>"), None)),
            Media::Unsupported
        );
    }

    // =========================================================================
    // Video decision tree
    // =========================================================================

    #[test]
    fn embeddable_video_wins_over_thumbnail() {
        let entry = video(
            Some("https://www.youtube.com/watch?v=ABC123"),
            Some("https://img.test/t.jpg"),
        );
        match select_media(&entry) {
            Media::Embed { src } => assert!(src.ends_with("embed/ABC123")),
            other => panic!("expected embed, got {other:?}"),
        }
    }

    #[test]
    fn non_embeddable_video_uses_thumbnail() {
        let entry = video(
            Some("https://videos.example.org/clip"),
            Some("https://img.test/t.jpg"),
        );
        assert_eq!(
            select_media(&entry),
            Media::VideoThumbnail {
                src: "https://img.test/t.jpg".to_string(),
                link: "https://videos.example.org/clip".to_string(),
            }
        );
    }

    #[test]
    fn non_embeddable_video_without_thumbnail_is_link() {
        let entry = video(Some("https://videos.example.org/clip"), None);
        assert_eq!(
            select_media(&entry),
            Media::Link {
                href: "https://videos.example.org/clip".to_string()
            }
        );
    }

    #[test]
    fn video_without_url_links_nowhere() {
        assert_eq!(
            select_media(&video(None, None)),
            Media::Link {
                href: MISSING_LINK.to_string()
            }
        );
    }

    #[test]
    fn unrecognized_media_type_is_unsupported() {
        let entry = Entry {
            media_type: MediaType::Other("interactive".to_string()),
            url: Some("https://a.test/app".to_string()),
            ..Default::default()
        };
        assert_eq!(select_media(&entry), Media::Unsupported);
    }

    #[test]
    fn kind_labels() {
        assert_eq!(Media::Unsupported.kind(), "unsupported");
        assert_eq!(
            Media::Link {
                href: "#".to_string()
            }
            .kind(),
            "link"
        );
    }
}
