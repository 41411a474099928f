//! Inline formatting: emphasis, links, breaks, entities, leftover tags.
//!
//! Applied to each list item on its own and then to the whole document. The
//! final tag strip guarantees nothing tag-shaped reaches the output, so a
//! second pass over already-formatted text changes nothing.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

static RE_BOLD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)<(?:strong|b)(?:\s[^>]*)?>(.*?)</(?:strong|b)\s*>").unwrap()
});

static RE_ITALIC: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)<(?:em|i)(?:\s[^>]*)?>(.*?)</(?:em|i)\s*>").unwrap());

static RE_LINK: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)<a\s+([^>]*)>(.*?)</a\s*>").unwrap());

static RE_HREF: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"href\s*=\s*(?:"([^"]*)"|'([^']*)')"#).unwrap());

static RE_BREAK: Lazy<Regex> = Lazy::new(|| Regex::new(r"<br\s*/?>").unwrap());

static RE_ANY_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]+>").unwrap());

/// Convert inline HTML to Markdown and strip whatever markup remains.
///
/// Order matters: emphasis and links are rewritten while their tags are
/// still present, entities are decoded after that, and the tag strip runs
/// last so decoded text cannot smuggle markup through.
pub fn format_inline(input: &str) -> String {
    let s = RE_BOLD.replace_all(input, "**${1}**");
    let s = RE_ITALIC.replace_all(&s, "*${1}*");
    let s = RE_LINK.replace_all(&s, |caps: &Captures<'_>| {
        let text = &caps[2];
        match href(&caps[1]) {
            Some(url) => format!("[{text}]({url})"),
            None => text.to_string(),
        }
    });
    let s = RE_BREAK.replace_all(&s, "\n");
    let s = html_escape::decode_html_entities(&s).into_owned();
    strip_tags(&s)
}

/// Remove every tag, keeping the text between them.
pub fn strip_tags(input: &str) -> String {
    RE_ANY_TAG.replace_all(input, "").into_owned()
}

/// Non-empty `href` value from an anchor's attribute list.
fn href(attrs: &str) -> Option<&str> {
    let caps = RE_HREF.captures(attrs)?;
    caps.get(1)
        .or_else(|| caps.get(2))
        .map(|m| m.as_str().trim())
        .filter(|url| !url.is_empty())
}
