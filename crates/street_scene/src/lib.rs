//! # Street Scene
//!
//! A small fixed-function scene renderer: textured ground and road, procedural
//! buildings, two streetlights carrying real spotlights, and two loaded models,
//! one of which drives along a scripted path.
//!
//! ## Features
//!
//! - **Backend-agnostic**: all drawing goes through the [`GraphicsContext`] trait
//! - **Deterministic frames**: every frame issues the same ordered call sequence
//! - **Fixed-step animation**: the host feeds elapsed time, the scene ticks at 20 ms
//! - **Transactional replacement**: a failed scene load never disturbs the active scene
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use street_scene::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = SceneConfig::default();
//!     let mut ctx = RecordingContext::new();
//!     let mut host = SceneHost::start(&mut ctx, &config, &ObjMeshProvider)?;
//!
//!     host.scene_mut().set_running(true);
//!     host.scene_mut().advance(std::time::Duration::from_millis(16));
//!     host.scene_mut().draw(&mut ctx);
//!
//!     host.shutdown(&mut ctx);
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod foundation;
pub mod config;
pub mod assets;
pub mod render;
pub mod scene;

pub use render::context::GraphicsContext;
pub use scene::{Scene, SceneConfig, SceneError, SceneHost};

/// Common imports for scene users
pub mod prelude {
    pub use crate::{
        assets::{MeshProvider, ModelAsset, ModelHandle, ObjMeshProvider},
        config::Config,
        foundation::math::{Rgba, Vec3, Mat4},
        render::{
            GraphicsContext, RecordingContext,
            camera::{CameraRig, Projection},
            lighting::{AmbientPalette, ColorChannel},
        },
        scene::{
            Scene, SceneConfig, SceneError, SceneHost,
            animation::AnimationPhase,
            controls::SceneCommand,
            scaling::ScaleStep,
        },
    };
}
