//! # Scene
//!
//! The street scene and everything that drives it per frame.
//!
//! ## Module Layout
//!
//! - [`world`]: the [`Scene`] orchestrator (initialize, resize, draw, dispose)
//! - [`geometry`]: procedural surface, buildings and streetlights, plus model placement
//! - [`animation`]: the fixed-step path the primary model follows
//! - [`scaling`]: scale selections for streetlights and the animated model
//! - [`controls`]: host input translated into scene changes
//! - [`host`]: ownership of the active scene and transactional replacement

pub mod animation;
pub mod controls;
pub mod geometry;
pub mod host;
pub mod scaling;
pub mod world;


pub use host::SceneHost;
pub use world::Scene;

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::assets::AssetError;
use crate::config::{Config, ConfigError};

/// Scene construction errors
///
/// Only construction and initialization can fail; drawing never does.
#[derive(Error, Debug)]
pub enum SceneError {
    /// A model or texture could not be loaded
    #[error("Asset error: {0}")]
    Asset(#[from] AssetError),

    /// The scene configuration could not be read
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// The configuration describes an unusable scene
    #[error("Invalid scene configuration: {0}")]
    InvalidConfig(String),
}

/// # Scene Configuration
///
/// Everything the host decides before a scene exists: where the assets live,
/// which two models to load, the initial viewport and the overlay text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Directory holding both models
    pub model_dir: PathBuf,
    /// Animated model file name
    pub primary_model: String,
    /// Static model file name
    pub secondary_model: String,
    /// Directory holding the texture images
    pub texture_dir: PathBuf,
    /// Initial viewport width in pixels
    pub width: u32,
    /// Initial viewport height in pixels
    pub height: u32,
    /// Lines drawn by the text overlay, top to bottom
    pub overlay_lines: Vec<String>,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            model_dir: PathBuf::from("Models"),
            primary_model: "chopper.obj".to_string(),
            secondary_model: "streetlight.obj".to_string(),
            texture_dir: PathBuf::from("images"),
            width: 800,
            height: 600,
            overlay_lines: vec![
                "Street Scene".to_string(),
                "____________".to_string(),
                "V: start/stop animation".to_string(),
                "E/D S/F: orbit  +/-: dolly".to_string(),
            ],
        }
    }
}

impl Config for SceneConfig {}

impl SceneConfig {
    /// Config that uses one model file for both the primary and secondary model
    ///
    /// This is what a "load model" request from the host produces. Returns
    /// `None` when `path` has no file name.
    pub fn single_model(&self, path: &Path) -> Option<Self> {
        let file_name = path.file_name()?.to_string_lossy().into_owned();
        let model_dir = path.parent().map_or_else(PathBuf::new, Path::to_path_buf);
        Some(Self {
            model_dir,
            primary_model: file_name.clone(),
            secondary_model: file_name,
            ..self.clone()
        })
    }

    /// Reject configurations that cannot produce a scene
    pub fn validate(&self) -> Result<(), SceneError> {
        if self.primary_model.is_empty() || self.secondary_model.is_empty() {
            return Err(SceneError::InvalidConfig("both model file names are required".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod config_tests {
    use super::*;

    #[test]
    fn test_single_model_uses_file_for_both() {
        let config = SceneConfig::default();
        let replaced = config.single_model(Path::new("/assets/cars/truck.obj")).unwrap();

        assert_eq!(replaced.model_dir, PathBuf::from("/assets/cars"));
        assert_eq!(replaced.primary_model, "truck.obj");
        assert_eq!(replaced.secondary_model, "truck.obj");
        assert_eq!(replaced.texture_dir, config.texture_dir);
        assert_eq!(replaced.width, config.width);
    }

    #[test]
    fn test_single_model_needs_a_file_name() {
        assert!(SceneConfig::default().single_model(Path::new("/")).is_none());
    }

    #[test]
    fn test_validate_rejects_empty_names() {
        let config = SceneConfig { primary_model: String::new(), ..SceneConfig::default() };
        assert!(matches!(config.validate(), Err(SceneError::InvalidConfig(_))));
        assert!(SceneConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_toml_falls_back_to_defaults() {
        let config: SceneConfig = toml::from_str("width = 1024\nprimary_model = \"bike.obj\"\n").unwrap();
        assert_eq!(config.width, 1024);
        assert_eq!(config.primary_model, "bike.obj");
        assert_eq!(config.height, 600);
    }
}
