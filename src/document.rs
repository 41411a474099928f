//! Destination document helpers: front matter in, front matter out.
//!
//! A destination is an MDX file whose `---` header is kept byte-for-byte.
//! The only field read from it is `heroImage`, the lead image used to
//! suppress a duplicate inline copy. Finding and writing the files is left
//! to the caller.

use crate::convert::Transformer;
use crate::error::MigrateError;
use crate::output::MigrationStats;
use serde_yaml::Value;

/// Front-matter key holding the lead image path.
pub const LEAD_IMAGE_KEY: &str = "heroImage";

/// A destination document with its body replaced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigratedDocument {
    /// Original header plus the converted body.
    pub content: String,
    pub stats: MigrationStats,
}

/// Split `---\n<header>\n---\n<body>` into header and body.
///
/// The header is returned without its delimiters. An absent or empty
/// header is [`MigrateError::MissingFrontMatter`].
pub fn split_front_matter(content: &str) -> Result<(&str, &str), MigrateError> {
    let rest = content
        .strip_prefix("---\n")
        .or_else(|| content.strip_prefix("---\r\n"))
        .ok_or(MigrateError::MissingFrontMatter)?;

    // The closing delimiter may directly follow an empty header.
    let (header, after) = if let Some(after) = rest.strip_prefix("---") {
        ("", after)
    } else {
        let end = rest.find("\n---").ok_or(MigrateError::MissingFrontMatter)?;
        (rest[..end].trim_end_matches('\r'), &rest[end + 4..])
    };

    if header.trim().is_empty() {
        return Err(MigrateError::MissingFrontMatter);
    }

    let body = after
        .strip_prefix("\r\n")
        .or_else(|| after.strip_prefix('\n'))
        .unwrap_or(after);
    Ok((header, body))
}

/// Read the lead image path from a header, if it has a non-empty one.
pub fn lead_image(header: &str) -> Result<Option<String>, MigrateError> {
    let value: Value = serde_yaml::from_str(header)?;
    Ok(value
        .get(LEAD_IMAGE_KEY)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string))
}

/// Join an untouched header and a converted body.
pub fn assemble(header: &str, body: &str) -> String {
    format!("---\n{header}\n---\n\n{body}\n")
}

/// Replace the body of `existing` with the conversion of `raw_document`.
///
/// The lead image comes from the existing header, so suppression is scoped
/// to this destination only.
pub fn migrate_document(
    existing: &str,
    raw_document: &str,
    transformer: &Transformer,
) -> Result<MigratedDocument, MigrateError> {
    let (header, _) = split_front_matter(existing)?;
    let lead = lead_image(header)?.unwrap_or_default();
    let out = transformer.transform_with_stats(raw_document, &lead);
    Ok(MigratedDocument {
        content: assemble(header, &out.body),
        stats: out.stats,
    })
}
