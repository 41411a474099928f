//! Media reference extraction.
//!
//! Runs on the original export text, before [`super::blocks`] deletes the
//! social blocks and swaps video embeds for placeholders. Running it later
//! would find nothing.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;
use tracing::debug;

/// Opening `wp:embed` sentinel; group 1 is everything up to `-->`.
static RE_EMBED_OPEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<!--\s*wp:embed\b([^>]*?)-->").unwrap());

/// Descriptor whose `url` (before any nested object closes) names a video provider.
static RE_VIDEO_DESCRIPTOR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"\A\s*\{[^}]*"url"\s*:\s*"([^"]*(?:youtube|youtu\.be)[^"]*)""#).unwrap()
});

/// Reel identifier anywhere in the text (embed blockquotes repeat it several times).
static RE_SOCIAL_ID: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"instagram\.com/reel/([^/?&"'\s<>]+)"#).unwrap());

/// Media found in one source document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MediaRefs {
    /// Video URLs in document order, entity-decoded.
    pub videos: Vec<String>,
    /// Canonical social-post URLs, one per distinct identifier.
    pub social: Vec<String>,
}

/// Video URL named by an embed descriptor, still entity-encoded.
///
/// Both the extractor and the block pass decide "is this a video" here, so
/// the Nth video block always pairs with the Nth extracted URL.
pub(crate) fn video_url(descriptor: &str) -> Option<&str> {
    RE_VIDEO_DESCRIPTOR
        .captures(descriptor)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Collect video and social references from the raw export text.
///
/// Social references keep first-seen order, so repeated runs over the same
/// document emit them identically.
pub fn extract_media(raw: &str) -> MediaRefs {
    let videos: Vec<String> = RE_EMBED_OPEN
        .captures_iter(raw)
        .filter_map(|caps| video_url(caps.get(1)?.as_str()))
        .map(|url| html_escape::decode_html_entities(url).into_owned())
        .collect();

    let mut seen = HashSet::new();
    let social: Vec<String> = RE_SOCIAL_ID
        .captures_iter(raw)
        .filter_map(|caps| {
            let id = caps.get(1)?.as_str();
            seen.insert(id)
                .then(|| format!("https://www.instagram.com/reel/{id}/"))
        })
        .collect();

    debug!(
        "Extracted {} video and {} social references",
        videos.len(),
        social.len()
    );
    MediaRefs { videos, social }
}
