//! # Scene Orchestrator
//!
//! [`Scene`] owns every piece of per-scene state (both model handles, the
//! texture set, lighting, camera, projection, animation and scale selection)
//! and sequences them into one deterministic call stream per frame.
//!
//! ## Lifecycle
//!
//! 1. [`Scene::new`] loads both models; nothing touches the graphics context yet
//! 2. [`Scene::initialize`] sets pipeline state, uploads textures, configures lights
//! 3. [`Scene::resize`], [`Scene::draw`] and [`Scene::advance`] as the host sees fit
//! 4. [`Scene::dispose`] frees textures and models exactly once
//!
//! ## Frame Structure
//!
//! ```text
//! clear -> identity -> push -> camera -> surface -> buildings -> streetlights
//!       -> models -> pop -> overlay -> animation halt check -> flush
//! ```
//!
//! Textured groups are bracketed by enabling and disabling `Texture2D`; the
//! models draw untextured with their own materials.

use std::path::PathBuf;
use std::time::Duration;

use crate::assets::{AssetError, MeshProvider, ModelHandle};
use crate::foundation::math::Rgba;
use crate::render::camera::{CameraRig, Projection};
use crate::render::context::{
    Capability, ClearMask, ColorMaterialMode, Face, GraphicsContext, ShadeModel, Winding,
};
use crate::render::lighting::{AmbientPalette, ColorChannel, LightingController};
use crate::render::texture::TextureManager;
use super::animation::AnimationController;
use super::controls::SceneCommand;
use super::geometry;
use super::scaling::{ScaleSelection, ScaleStep};
use super::{SceneConfig, SceneError};

/// Clear color
pub const SKY_COLOR: Rgba = Rgba::new(0.0, 0.0, 0.9, 0.1);

/// Current color while drawing the untinted geometry
const BASE_COLOR: Rgba = Rgba::gray(0.1);

/// The street scene
#[derive(Debug)]
pub struct Scene {
    primary: ModelHandle,
    secondary: ModelHandle,
    textures: TextureManager,
    lighting: LightingController,
    camera: CameraRig,
    projection: Projection,
    animation: AnimationController,
    scale: ScaleSelection,
    texture_dir: PathBuf,
    overlay_lines: Vec<String>,
}

impl Scene {
    /// Load both models described by `config`
    ///
    /// If the secondary model fails, the already loaded primary is released
    /// before the error is returned.
    pub fn new(config: &SceneConfig, provider: &dyn MeshProvider) -> Result<Self, SceneError> {
        config.validate()?;

        let primary = ModelHandle::load(provider, &config.model_dir, &config.primary_model)?;
        let secondary = ModelHandle::load(provider, &config.model_dir, &config.secondary_model)?;

        Ok(Self {
            primary,
            secondary,
            textures: TextureManager::new(),
            lighting: LightingController::new(),
            camera: CameraRig::new(),
            projection: Projection::new(config.width, config.height),
            animation: AnimationController::new(),
            scale: ScaleSelection::default(),
            texture_dir: config.texture_dir.clone(),
            overlay_lines: config.overlay_lines.clone(),
        })
    }

    /// One-time graphics setup
    ///
    /// On failure no texture objects are left behind.
    pub fn initialize(&mut self, ctx: &mut dyn GraphicsContext) -> Result<(), SceneError> {
        Self::configure_pipeline(ctx);

        self.textures.setup(ctx, &self.texture_dir)?;
        self.lighting.setup(ctx);

        if let Err(err) = self.initialize_models(ctx) {
            log::warn!("Model setup failed, releasing textures: {}", err);
            self.textures.release(ctx);
            return Err(err.into());
        }

        let (width, height) = (self.projection.width(), self.projection.height());
        self.resize(ctx, width, height);
        log::info!(
            "Scene initialized with {:?} and {:?}",
            self.primary.source(),
            self.secondary.source()
        );
        Ok(())
    }

    fn configure_pipeline(ctx: &mut dyn GraphicsContext) {
        ctx.enable(Capability::DepthTest);
        ctx.front_face(Winding::CounterClockwise);
        ctx.cull_face(Face::Back);
        ctx.enable(Capability::CullFace);

        ctx.enable(Capability::Normalize);
        ctx.enable(Capability::AutoNormal);
        ctx.enable(Capability::ColorMaterial);
        ctx.color_material(Face::Front, ColorMaterialMode::AmbientAndDiffuse);
        ctx.shade_model(ShadeModel::Smooth);
        ctx.clear_color(SKY_COLOR);
    }

    fn initialize_models(&mut self, ctx: &mut dyn GraphicsContext) -> Result<(), AssetError> {
        self.primary.initialize(ctx)?;
        self.secondary.initialize(ctx)
    }

    /// New viewport size; recomputes the projection, leaves model-view alone
    pub fn resize(&mut self, ctx: &mut dyn GraphicsContext, width: u32, height: u32) {
        self.projection.resize(width, height);
        ctx.viewport(0, 0, width, height);
        self.projection.apply(ctx);
        log::debug!("Viewport resized to {}x{}", width, height);
    }

    /// Re-issue lighting and projection after another scene wrote to the context
    pub fn restore_state(&self, ctx: &mut dyn GraphicsContext) {
        self.lighting.setup(ctx);
        ctx.viewport(0, 0, self.projection.width(), self.projection.height());
        self.projection.apply(ctx);
        log::debug!("Scene state restored with {:?} ambient", self.lighting.ambient());
    }

    /// Draw one frame
    pub fn draw(&mut self, ctx: &mut dyn GraphicsContext) {
        ctx.clear(ClearMask::COLOR | ClearMask::DEPTH);

        ctx.load_identity();
        ctx.push_matrix();
        self.camera.apply(ctx);
        ctx.color(BASE_COLOR);

        ctx.enable(Capability::Texture2D);
        geometry::draw_surface(ctx, &self.textures);
        ctx.disable(Capability::Texture2D);

        ctx.enable(Capability::Texture2D);
        geometry::draw_buildings(ctx, &self.textures);
        ctx.disable(Capability::Texture2D);

        ctx.enable(Capability::Texture2D);
        geometry::draw_streetlights(ctx, &self.textures, &self.scale);
        ctx.disable(Capability::Texture2D);

        geometry::draw_models(ctx, &self.primary, &self.secondary, &self.animation.state(), &self.scale);
        ctx.pop_matrix();

        geometry::draw_overlay(ctx, &self.projection, &self.overlay_lines);

        if !self.animation.is_running() {
            self.animation.reset();
        }

        ctx.flush();
        log::trace!("Frame drawn, animation {:?}", self.animation.phase());
    }

    /// Forward elapsed host time to the animation; returns the ticks that ran
    pub fn advance(&mut self, elapsed: Duration) -> u32 {
        self.animation.advance(elapsed)
    }

    /// Start or stop the animation
    pub fn set_running(&mut self, running: bool) {
        self.animation.set_running(running);
    }

    /// Whether the animation runs
    pub fn is_running(&self) -> bool {
        self.animation.is_running()
    }

    /// Set the camera pitch; `false` if out of range
    pub fn set_pitch(&mut self, degrees: f32) -> bool {
        self.camera.set_pitch(degrees)
    }

    /// Set the camera yaw; `false` if out of range
    pub fn set_yaw(&mut self, degrees: f32) -> bool {
        self.camera.set_yaw(degrees)
    }

    /// Set the dolly distance; `false` if out of range
    pub fn set_distance(&mut self, distance: f32) -> bool {
        self.camera.set_distance(distance)
    }

    /// Select the streetlight height scale
    pub fn set_vertical_scale(&mut self, step: ScaleStep) {
        self.scale.vertical = step;
    }

    /// Select the uniform scale of streetlights and the animated model
    pub fn set_uniform_scale(&mut self, step: ScaleStep) {
        self.scale.uniform = step;
    }

    /// Select an ambient preset for the global light
    pub fn set_ambient_palette(&mut self, ctx: &mut dyn GraphicsContext, palette: AmbientPalette) {
        self.lighting.set_ambient_palette(ctx, palette);
    }

    /// Nudge one channel of the global light's ambient term
    pub fn adjust_ambient_channel(&mut self, ctx: &mut dyn GraphicsContext, channel: ColorChannel, delta: f32) {
        self.lighting.adjust_ambient_channel(ctx, channel, delta);
    }

    /// Carry out a host command; returns whether it changed anything
    pub fn apply(&mut self, ctx: &mut dyn GraphicsContext, command: SceneCommand) -> bool {
        if command.blocked_while_running() && self.is_running() {
            log::debug!("Ignoring {:?} while the animation runs", command);
            return false;
        }

        match command {
            SceneCommand::Pitch(delta) => self.camera.adjust_pitch(delta),
            SceneCommand::Yaw(delta) => self.camera.adjust_yaw(delta),
            SceneCommand::Dolly(delta) => self.camera.adjust_distance(delta),
            SceneCommand::NudgeAmbient(channel, delta) => {
                self.adjust_ambient_channel(ctx, channel, delta);
                true
            }
            SceneCommand::SelectPalette(palette) => {
                self.set_ambient_palette(ctx, palette);
                true
            }
            SceneCommand::SelectVerticalScale(step) => {
                self.set_vertical_scale(step);
                true
            }
            SceneCommand::SelectUniformScale(step) => {
                self.set_uniform_scale(step);
                true
            }
            SceneCommand::ToggleAnimation => {
                self.set_running(!self.is_running());
                true
            }
        }
    }

    /// Camera state
    pub fn camera(&self) -> &CameraRig {
        &self.camera
    }

    /// Viewport and projection
    pub fn projection(&self) -> &Projection {
        &self.projection
    }

    /// Animation controller
    pub fn animation(&self) -> &AnimationController {
        &self.animation
    }

    /// Lighting state
    pub fn lighting(&self) -> &LightingController {
        &self.lighting
    }

    /// Texture set
    pub fn textures(&self) -> &TextureManager {
        &self.textures
    }

    /// Scale selections
    pub fn scale(&self) -> ScaleSelection {
        self.scale
    }

    /// Animated model
    pub fn primary(&self) -> &ModelHandle {
        &self.primary
    }

    /// Static model
    pub fn secondary(&self) -> &ModelHandle {
        &self.secondary
    }

    /// Free the texture set and both models
    pub fn dispose(mut self, ctx: &mut dyn GraphicsContext) {
        self.textures.release(ctx);
        self.primary.release();
        self.secondary.release();
        log::info!("Scene disposed");
    }
}
