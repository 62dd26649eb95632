//! Studio configuration for `eidcard.toml`.
//!
//! Everything has a sensible default; an absent file means "run with the
//! defaults", not an error.
//!
//! # Sections
//!
//! | Section       | Purpose                                          |
//! |---------------|--------------------------------------------------|
//! | `[templates]` | Template store root directory                    |
//! | `[font]`      | Font file registered with the rasterizer         |
//! | `[share]`     | Base URL share links are built against           |
//! | `[render]`    | Export supersampling factor                      |

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Largest accepted supersampling factor; anything above this allocates
/// surfaces far beyond what a card export needs.
const MAX_SCALE: u32 = 8;

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error when reading `{0}`")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("Config file parsing error")]
    Toml(#[from] toml::de::Error),

    #[error("Config validation error: {0}")]
    Validation(String),
}

// ============================================================================
// root configuration
// ============================================================================

/// Root configuration structure representing eidcard.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StudioConfig {
    #[serde(default)]
    pub templates: TemplatesConfig,

    #[serde(default)]
    pub font: FontConfig,

    #[serde(default)]
    pub share: ShareConfig,

    #[serde(default)]
    pub render: RenderConfig,
}

/// `[templates]` - where the template store lives.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TemplatesConfig {
    /// Root directory the catalog paths are resolved against.
    #[serde(default = "default_templates_dir")]
    pub dir: PathBuf,
}

/// `[font]` - font registered with the rasterizer for text layers.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FontConfig {
    /// Path to a TTF/OTF file; `None` renders text with whatever the
    /// system font database resolves.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

/// `[share]` - deep-link construction.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ShareConfig {
    /// Base URL prefixed to share links. Empty produces relative links.
    #[serde(default)]
    pub base_url: String,
}

/// `[render]` - export quality.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RenderConfig {
    /// Supersampling factor for PNG exports.
    #[serde(default = "default_scale")]
    pub scale: u32,
}

fn default_templates_dir() -> PathBuf {
    PathBuf::from("templates")
}

fn default_scale() -> u32 {
    crate::raster::DEFAULT_SCALE
}

impl Default for TemplatesConfig {
    fn default() -> Self {
        Self {
            dir: default_templates_dir(),
        }
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            scale: default_scale(),
        }
    }
}

impl StudioConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw =
            fs::read_to_string(path).map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;
        let config: Self = toml::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Check invariants that serde defaults cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.render.scale == 0 || self.render.scale > MAX_SCALE {
            return Err(ConfigError::Validation(format!(
                "render.scale must be between 1 and {MAX_SCALE}, got {}",
                self.render.scale
            )));
        }
        if let Some(path) = &self.font.path {
            if path.as_os_str().is_empty() {
                return Err(ConfigError::Validation(
                    "font.path must not be empty when set".to_string(),
                ));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_are_usable() {
        let config = StudioConfig::default();
        assert_eq!(config.templates.dir, PathBuf::from("templates"));
        assert_eq!(config.render.scale, 4);
        assert!(config.font.path.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn loads_partial_file_with_defaults_filled_in() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("eidcard.toml");
        let mut f = std::fs::File::create(&path).unwrap();
        writeln!(f, "[share]\nbase_url = \"https://cards.example\"").unwrap();

        let config = StudioConfig::load(&path).unwrap();
        assert_eq!(config.share.base_url, "https://cards.example");
        assert_eq!(config.render.scale, 4);
    }

    #[test]
    fn invalid_scale_fails_validation() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("eidcard.toml");
        let mut f = std::fs::File::create(&path).unwrap();
        writeln!(f, "[render]\nscale = 64").unwrap();

        assert!(matches!(
            StudioConfig::load(&path),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let err = toml::from_str::<StudioConfig>("[render]\nscael = 4").unwrap_err();
        assert!(err.to_string().contains("scael"));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        assert!(matches!(
            StudioConfig::load(Path::new("/nonexistent/eidcard.toml")),
            Err(ConfigError::Io(..))
        ));
    }
}
