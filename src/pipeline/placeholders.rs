//! Placeholder resolution: final video and social directives.
//!
//! Video placeholders are swapped for directives by index. Social posts have
//! no position of their own in the converted text, so all of them go in one
//! group after the first heading and its following paragraph.

use super::media::MediaRefs;
use crate::config::MigrationConfig;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use tracing::debug;

static RE_VIDEO_PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"__VIDEO_EMBED_(\d+)__").unwrap());

static RE_HEADING_LINE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^#{1,6}\s+\S").unwrap());

/// Three or more line breaks, counting whitespace-only lines as empty.
static RE_EXCESS_NEWLINES: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\n(?:[ \t]*\n){2,}").unwrap());

/// Internal marker for the `idx`-th video block.
pub fn video_placeholder(idx: usize) -> String {
    format!("__VIDEO_EMBED_{idx}__")
}

/// Result of [`resolve_placeholders`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved {
    pub text: String,
    /// Number of placeholders that became a directive.
    pub videos_embedded: usize,
}

/// Resolve video placeholders, insert social directives and tidy whitespace.
pub fn resolve_placeholders(text: &str, media: &MediaRefs, config: &MigrationConfig) -> Resolved {
    let mut videos_embedded = 0;
    let text = RE_VIDEO_PLACEHOLDER.replace_all(text, |caps: &Captures<'_>| {
        let url = caps[1]
            .parse::<usize>()
            .ok()
            .and_then(|idx| media.videos.get(idx));
        match url {
            Some(url) => {
                videos_embedded += 1;
                directive(&config.video_component, url)
            }
            None => String::new(),
        }
    });

    let text = if media.social.is_empty() {
        text.into_owned()
    } else {
        let block = media
            .social
            .iter()
            .map(|url| directive(&config.social_component, url))
            .collect::<Vec<_>>()
            .join("\n\n");
        insert_social_block(&text, &block)
    };

    Resolved {
        text: collapse_newlines(&text),
        videos_embedded,
    }
}

/// Self-closing component carrying a `url` attribute.
fn directive(component: &str, url: &str) -> String {
    format!("<{component} url=\"{}\" />", url.replace('"', "%22"))
}

fn insert_social_block(text: &str, block: &str) -> String {
    match social_anchor(text) {
        Some(pos) => {
            debug!("Inserting social directives after first heading and paragraph");
            format!("{}\n\n{block}\n\n{}", &text[..pos], &text[pos..])
        }
        None => {
            debug!("No heading followed by a paragraph; prepending social directives");
            format!("{block}\n\n{text}")
        }
    }
}

/// Byte offset just past the paragraph that follows the first heading.
///
/// Headings followed directly by another heading are skipped. The paragraph
/// runs until the next blank line or heading.
fn social_anchor(text: &str) -> Option<usize> {
    let mut lines: Vec<(usize, &str)> = Vec::new();
    let mut offset = 0;
    for raw in text.split_inclusive('\n') {
        let line = raw.strip_suffix('\n').unwrap_or(raw);
        lines.push((offset + line.len(), line));
        offset += raw.len();
    }

    let is_blank = |line: &str| line.trim().is_empty();
    let is_heading = |line: &str| RE_HEADING_LINE.is_match(line);

    for (i, &(_, line)) in lines.iter().enumerate() {
        if !is_heading(line) {
            continue;
        }
        let start = (i + 1..lines.len()).find(|&j| !is_blank(lines[j].1))?;
        if is_heading(lines[start].1) {
            continue;
        }
        let mut end = start;
        while end + 1 < lines.len() && !is_blank(lines[end + 1].1) && !is_heading(lines[end + 1].1)
        {
            end += 1;
        }
        return Some(lines[end].0);
    }
    None
}

/// Collapse 3+ consecutive line breaks to 2 and trim the document.
pub fn collapse_newlines(input: &str) -> String {
    RE_EXCESS_NEWLINES
        .replace_all(input, "\n\n")
        .trim()
        .to_string()
}
