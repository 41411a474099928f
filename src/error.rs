//! Error types for the wp2mdx library.
//!
//! The conversion core ([`crate::convert::transform`]) is total: malformed or
//! unrecognised markup degrades to dropped or unconverted text and is never
//! reported as an error. [`MigrateError`] therefore only covers the
//! caller-side conditions around the core: loading the image table,
//! validating configuration, and reading a destination's front matter.

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the wp2mdx library.
#[derive(Debug, Error)]
pub enum MigrateError {
    // ── Image table errors ────────────────────────────────────────────────
    /// The image table file could not be read.
    #[error("Failed to read image map '{path}': {source}")]
    ImageMapRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The image table file is not a JSON object of filename → path strings.
    #[error("Image map '{path}' is not a JSON object of strings: {source}")]
    ImageMapParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    // ── Destination document errors ───────────────────────────────────────
    /// The destination document does not start with a `---` delimited header.
    #[error("Document has no front matter (expected a leading '---' block)")]
    MissingFrontMatter,

    /// The front matter exists but is not valid YAML.
    #[error("Front matter is not valid YAML: {0}")]
    FrontMatterParse(#[from] serde_yaml::Error),

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}
