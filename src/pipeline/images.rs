//! Image location: map an uploaded image URL to a migrated local asset.
//!
//! Lookups go by filename only (the last path segment), so scheme, host and
//! upload folder never matter. An image that resolves to the destination's
//! lead image is skipped because the page template already renders it.

use crate::config::ImageMap;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::trace;

static RE_URL_FILENAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:(?:https?:)?//[^/?#]+)?/?(?:[^?#]*/)?([^/?#]+)").unwrap()
});

/// WordPress edit suffix, e.g. `-e1752380840864`.
static RE_EDIT_SUFFIX: Lazy<Regex> = Lazy::new(|| Regex::new(r"-e\d+").unwrap());

/// WordPress size suffix, e.g. `-1024x683` or `-1536x1043-1`.
static RE_SIZE_SUFFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"-\d{2,4}x\d{2,4}(?:-\d)?$").unwrap());

/// Outcome of locating one image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageResolution<'a> {
    /// The image maps to this local asset path.
    Resolved(&'a str),
    /// No table entry for the filename.
    Unmapped,
    /// The asset is the destination's lead image.
    LeadImage,
}

/// Resolves image URLs for one destination document.
#[derive(Debug, Clone, Copy)]
pub struct ImageLocator<'a> {
    map: &'a ImageMap,
    lead_image: &'a str,
    match_size_variants: bool,
}

impl<'a> ImageLocator<'a> {
    /// `lead_image` may be empty when the destination has none.
    pub fn new(map: &'a ImageMap, lead_image: &'a str) -> Self {
        Self {
            map,
            lead_image: lead_image.trim(),
            match_size_variants: true,
        }
    }

    pub fn match_size_variants(mut self, v: bool) -> Self {
        self.match_size_variants = v;
        self
    }

    pub fn locate(&self, url: &str) -> ImageResolution<'a> {
        let Some(filename) = filename_from_url(url) else {
            trace!("No filename in image URL {url:?}");
            return ImageResolution::Unmapped;
        };

        let mapped = self.map.get(filename).or_else(|| {
            if !self.match_size_variants {
                return None;
            }
            let base = strip_size_suffix(filename);
            (base != filename).then(|| self.map.get(&base)).flatten()
        });

        match mapped {
            None => {
                trace!("Image {filename} is not in the image map");
                ImageResolution::Unmapped
            }
            Some(path) if !self.lead_image.is_empty() && path == self.lead_image => {
                trace!("Image {filename} is the lead image {path}");
                ImageResolution::LeadImage
            }
            Some(path) => ImageResolution::Resolved(path),
        }
    }
}

/// Last path segment of a URL, without query or fragment.
pub fn filename_from_url(url: &str) -> Option<&str> {
    RE_URL_FILENAME
        .captures(url.trim())
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Remove WordPress edit and size suffixes from a filename.
///
/// `Construction-03-e1752380840864-1024x682.jpg` → `Construction-03.jpg`
pub fn strip_size_suffix(filename: &str) -> String {
    let (stem, ext) = match filename.rfind('.') {
        Some(dot) if dot > 0 => filename.split_at(dot),
        _ => (filename, ""),
    };
    let stem = RE_EDIT_SUFFIX.replace_all(stem, "");
    let stem = RE_SIZE_SUFFIX.replace(&stem, "");
    format!("{stem}{ext}")
}
