//! # wp2mdx
//!
//! Convert WordPress block-editor markup from a JSON export into the body of
//! an existing MDX content file.
//!
//! The export carries each post as block markup: HTML fragments wrapped in
//! `<!-- wp:kind {...} -->` sentinels. This crate rewrites the block
//! vocabulary a blog actually uses (paragraphs, headings, lists, separators,
//! images, galleries, video embeds, social quote blocks) into Markdown plus
//! two self-closing components, and drops everything else.
//!
//! ## Pipeline Overview
//!
//! ```text
//! raw export body
//!  │
//!  ├─ 1. Media     collect YouTube URLs and Instagram reels (raw text)
//!  ├─ 2. Newlines  restore line breaks flattened to literal `n`
//!  ├─ 3. Blocks    quotes, embeds, images, sentinels, headings, lists, …
//!  ├─ 4. Inline    emphasis, links, breaks, entities, tag strip
//!  └─ 5. Resolve   <YouTubeEmbed/> / <InstagramEmbed/> directives, whitespace
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use wp2mdx::transform;
//!
//! let raw = "<!-- wp:heading --><h2>Title</h2><!-- /wp:heading -->\
//!            <!-- wp:paragraph --><p>Hello <strong>world</strong>.</p><!-- /wp:paragraph -->";
//! assert_eq!(transform(raw, ""), "## Title\n\nHello **world**.");
//! ```
//!
//! Images are only kept when they map to a migrated asset:
//!
//! ```rust
//! use wp2mdx::{ImageMap, MigrationConfig, Transformer};
//!
//! let config = MigrationConfig::builder()
//!     .image_map(ImageMap::from_pairs([("plan.jpg", "/images/site/plan.jpg")]))
//!     .build()
//!     .unwrap();
//! let raw = r#"<!-- wp:image --><figure><img src="https://old.site/wp-content/uploads/plan-1024x683.jpg"/><figcaption>Site plan</figcaption></figure><!-- /wp:image -->"#;
//! let body = Transformer::new(config).transform(raw, "/images/site/hero.jpg");
//! assert_eq!(body, "![Site plan](/images/site/plan.jpg)");
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod convert;
pub mod document;
pub mod error;
pub mod output;
pub mod pipeline;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{ImageMap, MigrationConfig, MigrationConfigBuilder};
pub use convert::{transform, Transformer};
pub use document::{assemble, lead_image, migrate_document, split_front_matter, MigratedDocument};
pub use error::MigrateError;
pub use output::{MigrationStats, TransformOutput};
