//! Pipeline stages for WordPress-to-MDX conversion.
//!
//! Each submodule implements one transformation step and is independently
//! testable.
//!
//! ## Data Flow
//!
//! ```text
//! raw ──┬─▶ media ─────────────────────────────┐
//!       │  (original text)                     │
//!       └─▶ newlines ─▶ blocks ─▶ inline ─▶ placeholders ─▶ body
//!                      (images)
//! ```
//!
//! 1. [`newlines`]: restore line breaks the export flattened to `n`
//! 2. [`media`]: collect video and social references; must see the
//!    raw text before [`blocks`] deletes or replaces those blocks
//! 3. [`images`]: filename → local asset lookup with lead-image dedup
//! 4. [`blocks`]: ordered structural rewrites (quotes, embeds, images,
//!    sentinels, figures, rules, headings, lists, paragraphs)
//! 5. [`inline`]: emphasis, links, breaks, entities, tag strip
//! 6. [`placeholders`]: final video/social directives and whitespace cleanup

pub mod blocks;
pub mod images;
pub mod inline;
pub mod media;
pub mod newlines;
pub mod placeholders;
