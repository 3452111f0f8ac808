//! Active-scene ownership
//!
//! [`SceneHost`] holds the one scene the host draws. Replacing it is
//! transactional: the new scene is loaded and initialized completely before
//! the old one is disposed, so a failed replacement leaves the running scene
//! untouched.

use std::path::Path;

use crate::assets::MeshProvider;
use crate::render::GraphicsContext;
use super::{Scene, SceneConfig, SceneError};

/// Owner of the active scene
#[derive(Debug)]
pub struct SceneHost {
    scene: Scene,
    config: SceneConfig,
}

impl SceneHost {
    /// Build and initialize the first scene
    pub fn start(
        ctx: &mut dyn GraphicsContext,
        config: &SceneConfig,
        provider: &dyn MeshProvider,
    ) -> Result<Self, SceneError> {
        let scene = Self::build(ctx, config, provider)?;
        Ok(Self { scene, config: config.clone() })
    }

    fn build(
        ctx: &mut dyn GraphicsContext,
        config: &SceneConfig,
        provider: &dyn MeshProvider,
    ) -> Result<Scene, SceneError> {
        let mut scene = Scene::new(config, provider)?;
        scene.initialize(ctx)?;
        Ok(scene)
    }

    /// The active scene
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// The active scene, mutably
    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    /// Configuration the active scene was built from
    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    /// Swap in a scene built from `config`
    ///
    /// The replacement keeps the current viewport size. On error the active
    /// scene is left exactly as it was and its lighting and projection are
    /// written back to the context.
    pub fn replace(
        &mut self,
        ctx: &mut dyn GraphicsContext,
        config: &SceneConfig,
        provider: &dyn MeshProvider,
    ) -> Result<(), SceneError> {
        let projection = self.scene.projection();
        let config = SceneConfig {
            width: projection.width(),
            height: projection.height(),
            ..config.clone()
        };

        let replacement = match Self::build(ctx, &config, provider) {
            Ok(scene) => scene,
            Err(err) => {
                log::warn!("Scene replacement failed, keeping the active scene: {}", err);
                self.scene.restore_state(ctx);
                return Err(err);
            }
        };

        let previous = std::mem::replace(&mut self.scene, replacement);
        previous.dispose(ctx);
        self.config = config;
        log::info!("Scene replaced");
        Ok(())
    }

    /// Replace the scene with one that uses `model_path` for both models
    pub fn load_model(
        &mut self,
        ctx: &mut dyn GraphicsContext,
        model_path: &Path,
        provider: &dyn MeshProvider,
    ) -> Result<(), SceneError> {
        let config = self
            .config
            .single_model(model_path)
            .ok_or_else(|| SceneError::InvalidConfig(format!("{} names no model file", model_path.display())))?;
        self.replace(ctx, &config, provider)
    }

    /// Dispose the active scene
    pub fn shutdown(self, ctx: &mut dyn GraphicsContext) {
        self.scene.dispose(ctx);
    }
}
