//! Configuration types for a WordPress-to-MDX migration.
//!
//! All conversion behaviour is controlled through [`MigrationConfig`], built
//! via its [`MigrationConfigBuilder`]. The image table is part of the config
//! rather than a global so each run (and each test) can supply its own.

use crate::error::MigrateError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Default component emitted for embedded videos.
pub const DEFAULT_VIDEO_COMPONENT: &str = "YouTubeEmbed";

/// Default component emitted for embedded social posts.
pub const DEFAULT_SOCIAL_COMPONENT: &str = "InstagramEmbed";

/// Configuration for converting one or more exported posts.
///
/// # Example
/// ```rust
/// use wp2mdx::{ImageMap, MigrationConfig};
///
/// let images = ImageMap::from_pairs([
///     ("Vibe-11.jpg", "/images/case-studies/vibe-hotel/Vibe-11.jpg"),
/// ]);
/// let config = MigrationConfig::builder()
///     .image_map(images)
///     .video_component("YouTubeEmbed")
///     .build()
///     .unwrap();
/// assert_eq!(config.image_map.len(), 1);
/// ```
///
/// Deserialising goes through the same validation as [`MigrationConfigBuilder::build`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ConfigFile")]
pub struct MigrationConfig {
    /// External filename → local asset path. Default: empty.
    ///
    /// Images whose filename is not in the table are dropped from the output.
    pub image_map: ImageMap,

    /// Component name for the video directive. Default: `YouTubeEmbed`.
    pub video_component: String,

    /// Component name for the social-post directive. Default: `InstagramEmbed`.
    pub social_component: String,

    /// Retry unmapped filenames with WordPress size suffixes removed. Default: true.
    ///
    /// WordPress serves resized copies such as `photo-1024x683.jpg` while the
    /// migrated asset is usually the original `photo.jpg`.
    pub match_size_variants: bool,
}

impl Default for MigrationConfig {
    fn default() -> Self {
        Self {
            image_map: ImageMap::default(),
            video_component: DEFAULT_VIDEO_COMPONENT.to_string(),
            social_component: DEFAULT_SOCIAL_COMPONENT.to_string(),
            match_size_variants: true,
        }
    }
}

impl MigrationConfig {
    /// Create a new builder for `MigrationConfig`.
    pub fn builder() -> MigrationConfigBuilder {
        MigrationConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`MigrationConfig`].
#[derive(Debug)]
pub struct MigrationConfigBuilder {
    config: MigrationConfig,
}

impl MigrationConfigBuilder {
    pub fn image_map(mut self, map: ImageMap) -> Self {
        self.config.image_map = map;
        self
    }

    pub fn video_component(mut self, name: impl Into<String>) -> Self {
        self.config.video_component = name.into();
        self
    }

    pub fn social_component(mut self, name: impl Into<String>) -> Self {
        self.config.social_component = name.into();
        self
    }

    pub fn match_size_variants(mut self, v: bool) -> Self {
        self.config.match_size_variants = v;
        self
    }

    /// Build the configuration, validating component names.
    pub fn build(self) -> Result<MigrationConfig, MigrateError> {
        let c = &self.config;
        validate_component("video", &c.video_component)?;
        validate_component("social", &c.social_component)?;
        Ok(self.config)
    }
}

/// Unvalidated config as read from a file; missing fields take defaults.
#[derive(Deserialize)]
#[serde(default)]
struct ConfigFile {
    image_map: ImageMap,
    video_component: String,
    social_component: String,
    match_size_variants: bool,
}

impl Default for ConfigFile {
    fn default() -> Self {
        let d = MigrationConfig::default();
        Self {
            image_map: d.image_map,
            video_component: d.video_component,
            social_component: d.social_component,
            match_size_variants: d.match_size_variants,
        }
    }
}

impl TryFrom<ConfigFile> for MigrationConfig {
    type Error = MigrateError;

    fn try_from(file: ConfigFile) -> Result<Self, Self::Error> {
        MigrationConfig::builder()
            .image_map(file.image_map)
            .video_component(file.video_component)
            .social_component(file.social_component)
            .match_size_variants(file.match_size_variants)
            .build()
    }
}

/// Component names must start with an uppercase letter so MDX treats them as
/// components instead of HTML elements.
fn validate_component(kind: &str, name: &str) -> Result<(), MigrateError> {
    let mut chars = name.chars();
    let valid = match chars.next() {
        Some(first) => {
            first.is_ascii_uppercase() && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        None => false,
    };
    if valid {
        Ok(())
    } else {
        Err(MigrateError::InvalidConfig(format!(
            "{kind} component must be a capitalised identifier, got '{name}'"
        )))
    }
}

// ── Image table ──────────────────────────────────────────────────────────

/// Static lookup from an external filename (last URL path segment) to a local
/// asset path.
///
/// Keys are filenames only, so two URLs on different hosts or upload folders
/// that share a filename resolve to the same asset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageMap(BTreeMap<String, String>);

impl ImageMap {
    /// Build a table from `(filename, local_path)` pairs.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Parse a JSON object of `"filename": "/local/path"` entries.
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Load the table from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, MigrateError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| MigrateError::ImageMapRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_json_str(&raw).map_err(|e| MigrateError::ImageMapParse {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Look up the local path for a filename.
    pub fn get(&self, filename: &str) -> Option<&str> {
        self.0.get(filename).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ImageMap {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self::from_pairs(iter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn default_components() {
        let c = MigrationConfig::default();
        assert_eq!(c.video_component, "YouTubeEmbed");
        assert_eq!(c.social_component, "InstagramEmbed");
        assert!(c.match_size_variants);
        assert!(c.image_map.is_empty());
    }

    #[test]
    fn builder_rejects_lowercase_component() {
        let err = MigrationConfig::builder()
            .video_component("iframe")
            .build()
            .unwrap_err();
        assert!(matches!(err, MigrateError::InvalidConfig(_)));
    }

    #[test]
    fn builder_rejects_empty_component() {
        let err = MigrationConfig::builder()
            .social_component("")
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("social"));
    }

    #[test]
    fn image_map_from_json_str() {
        let map = ImageMap::from_json_str(r#"{"a.jpg": "/images/a.jpg"}"#).unwrap();
        assert_eq!(map.get("a.jpg"), Some("/images/a.jpg"));
        assert_eq!(map.get("b.jpg"), None);
    }

    #[test]
    fn image_map_from_json_file() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        write!(tmp, r#"{{"hero.jpg": "/images/x/hero.jpg"}}"#).unwrap();
        let map = ImageMap::from_json_file(tmp.path()).unwrap();
        assert_eq!(map.get("hero.jpg"), Some("/images/x/hero.jpg"));
    }

    #[test]
    fn image_map_file_missing() {
        let err = ImageMap::from_json_file("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, MigrateError::ImageMapRead { .. }));
    }

    #[test]
    fn image_map_file_not_an_object() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        write!(tmp, "[1, 2, 3]").unwrap();
        let err = ImageMap::from_json_file(tmp.path()).unwrap_err();
        assert!(matches!(err, MigrateError::ImageMapParse { .. }));
    }

    #[test]
    fn config_deserialises_with_defaults() {
        let c: MigrationConfig =
            serde_json::from_str(r#"{"image_map": {"a.png": "/images/a.png"}}"#).unwrap();
        assert_eq!(c.video_component, "YouTubeEmbed");
        assert_eq!(c.image_map.len(), 1);
        assert!(c.match_size_variants);
    }

    #[test]
    fn config_deserialise_validates_components() {
        let err = serde_json::from_str::<MigrationConfig>(r#"{"video_component": "iframe"}"#)
            .unwrap_err();
        assert!(err.to_string().contains("capitalised identifier"), "got: {err}");

        let c: MigrationConfig =
            serde_json::from_str(r#"{"social_component": "Reel", "match_size_variants": false}"#)
                .unwrap();
        assert_eq!(c.social_component, "Reel");
        assert!(!c.match_size_variants);
    }
}
