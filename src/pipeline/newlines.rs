//! Newline repair for the JSON export.
//!
//! The export serialised every real line break as a literal `n`, so block
//! markup arrives as `<!-- /wp:paragraph -->nn<!-- wp:heading -->`. Only runs
//! of `n` that sit on a tag boundary are restored; an `n` inside prose is
//! indistinguishable from a real letter and is left alone.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

static RE_BETWEEN_TAGS: Lazy<Regex> = Lazy::new(|| Regex::new(r">(n+)<").unwrap());
static RE_LEADING: Lazy<Regex> = Lazy::new(|| Regex::new(r"\A(n+)<").unwrap());
static RE_TRAILING: Lazy<Regex> = Lazy::new(|| Regex::new(r">(n+)\z").unwrap());

/// Replace each tag-boundary run of `n` with the same number of line breaks.
pub fn fix_newlines(input: &str) -> String {
    let s = RE_BETWEEN_TAGS.replace_all(input, |caps: &Captures<'_>| {
        format!(">{}<", "\n".repeat(caps[1].len()))
    });
    let s = RE_LEADING.replace(&s, |caps: &Captures<'_>| {
        format!("{}<", "\n".repeat(caps[1].len()))
    });
    let s = RE_TRAILING.replace(&s, |caps: &Captures<'_>| {
        format!(">{}", "\n".repeat(caps[1].len()))
    });
    s.into_owned()
}
