//! Output types returned by the conversion entry points.

use serde::{Deserialize, Serialize};

/// Converted body plus what happened to the media along the way.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransformOutput {
    /// The Markdown body, trimmed, without front matter.
    pub body: String,
    pub stats: MigrationStats,
}

/// Per-document counters.
///
/// Skipped media is never an error; these counts are how a caller reports it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MigrationStats {
    /// Video references extracted from the raw document.
    pub videos_found: usize,
    /// Video directives written to the body.
    pub videos_embedded: usize,
    /// Distinct social posts inserted.
    pub social_posts: usize,
    /// Image directives written to the body.
    pub images_embedded: usize,
    /// Images dropped because their filename is not in the image map.
    pub images_unmapped: usize,
    /// Images dropped because they resolve to the lead image.
    pub images_lead_duplicate: usize,
}

impl MigrationStats {
    /// Add another document's counters to this one.
    pub fn accumulate(&mut self, other: &MigrationStats) {
        self.videos_found += other.videos_found;
        self.videos_embedded += other.videos_embedded;
        self.social_posts += other.social_posts;
        self.images_embedded += other.images_embedded;
        self.images_unmapped += other.images_unmapped;
        self.images_lead_duplicate += other.images_lead_duplicate;
    }

    /// Total images seen in image and gallery blocks.
    pub fn images_seen(&self) -> usize {
        self.images_embedded + self.images_unmapped + self.images_lead_duplicate
    }
}
