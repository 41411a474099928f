//! Conversion entry points.
//!
//! [`Transformer`] holds a validated [`MigrationConfig`] and converts one
//! exported post body at a time. Conversion is synchronous and total: it
//! always returns text, and skipped media shows up in [`MigrationStats`]
//! rather than as an error.

use crate::config::MigrationConfig;
use crate::output::{MigrationStats, TransformOutput};
use crate::pipeline::{blocks, images::ImageLocator, inline, media, placeholders};
use tracing::{debug, info};

/// Convert a raw export body with the default configuration.
///
/// The default image map is empty, so every image block is dropped. Use
/// [`Transformer`] with a populated [`crate::ImageMap`] to keep images.
///
/// `lead_image` is the destination's hero asset path, or `""` if it has none.
///
/// Converting the output again returns it unchanged only when it carries no
/// media directives. Directives are not block markup, so a second pass
/// strips them like any other tag.
pub fn transform(raw_document: &str, lead_image: &str) -> String {
    Transformer::default().transform(raw_document, lead_image)
}

/// Converts exported WordPress block markup into an MDX body.
#[derive(Debug, Clone, Default)]
pub struct Transformer {
    config: MigrationConfig,
}

impl Transformer {
    pub fn new(config: MigrationConfig) -> Self {
        Self { config }
    }

    /// Convert one document, returning only the body.
    ///
    /// Expects raw export markup. See [`transform`] for what happens to
    /// already converted text.
    pub fn transform(&self, raw_document: &str, lead_image: &str) -> String {
        self.transform_with_stats(raw_document, lead_image).body
    }

    /// Convert one document and report what happened to its media.
    pub fn transform_with_stats(&self, raw_document: &str, lead_image: &str) -> TransformOutput {
        // ── Step 1: Extract media from the untouched text ────────────────────
        let refs = media::extract_media(raw_document);

        // ── Step 2: Block rewrites ───────────────────────────────────────────
        let locator = ImageLocator::new(&self.config.image_map, lead_image)
            .match_size_variants(self.config.match_size_variants);
        let mut stats = MigrationStats {
            videos_found: refs.videos.len(),
            social_posts: refs.social.len(),
            ..MigrationStats::default()
        };
        let text = blocks::transform_blocks(raw_document, &refs, &locator, &mut stats);

        // ── Step 3: Inline formatting over the whole document ────────────────
        let text = inline::format_inline(&text);

        // ── Step 4: Directives and whitespace ────────────────────────────────
        let resolved = placeholders::resolve_placeholders(&text, &refs, &self.config);
        stats.videos_embedded = resolved.videos_embedded;

        debug!(
            "Images: {} embedded, {} unmapped, {} lead duplicates",
            stats.images_embedded, stats.images_unmapped, stats.images_lead_duplicate
        );
        info!(
            "Converted document: {} bytes, {} video(s), {} social post(s)",
            resolved.text.len(),
            stats.videos_embedded,
            stats.social_posts
        );

        TransformOutput {
            body: resolved.text,
            stats,
        }
    }
}
