//! Site configuration.
//!
//! Every tunable lives in [`SiteConfig`], which round-trips through JSON.
//! All fields are optional in the file; anything left out keeps its default.
//!
//! ```json
//! {
//!   "window": { "width": 1200, "height": 800 },
//!   "field": { "capacity": 8000, "particle": { "friction": 0.9 } },
//!   "seed": 42
//! }
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use rand::rngs::SmallRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{Error, Result};
use crate::field::{FieldConfig, ParticleField};
use crate::presentation::PresentationConfig;
use crate::raster::{RasterConfig, TextRasterizer};

/// Window settings for the desktop runner.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub vsync: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "inkfield".into(),
            width: 1200,
            height: 800,
            vsync: true,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    pub window: WindowConfig,
    pub field: FieldConfig,
    pub raster: RasterConfig,
    pub presentation: PresentationConfig,
    /// Extra font file to register before shaping.
    pub font_path: Option<PathBuf>,
    /// Seed for the jitter RNG. Entropy when unset.
    pub seed: Option<u64>,
}

impl SiteConfig {
    /// Empty particle field, seeded if a seed is set.
    pub fn particle_field(&self) -> ParticleField {
        match self.seed {
            Some(seed) => ParticleField::with_rng(self.field.clone(), SmallRng::seed_from_u64(seed)),
            None => ParticleField::new(self.field.clone()),
        }
    }

    /// Rasterizer bounded by the field capacity.
    pub fn rasterizer(&self) -> TextRasterizer {
        TextRasterizer::new(self.raster.clone(), self.field.capacity)
    }

    /// Save the configuration to a JSON file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self).map_err(|source| Error::Json {
            path: path.to_path_buf(),
            source,
        })?;
        fs::write(path, json).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load a configuration from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = serde_json::from_str(&json).map_err(|source| Error::Json {
            path: path.to_path_buf(),
            source,
        })?;
        info!(path = %path.display(), "loaded config");
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_object_is_default() {
        let config: SiteConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, SiteConfig::default());
    }

    #[test]
    fn test_nested_partial_override() {
        let config: SiteConfig =
            serde_json::from_str(r##"{ "field": { "particle": { "friction": 0.9 } }, "raster": { "ink_color": "#112233" } }"##)
                .unwrap();
        assert_eq!(config.field.particle.friction, 0.9);
        assert_eq!(config.field.particle.stiffness, 0.08);
        assert_eq!(config.field.capacity, 10_000);
        assert_eq!(config.raster.ink_color, crate::surface::Color::rgb(0x11, 0x22, 0x33));
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let err = SiteConfig::load("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }
}
