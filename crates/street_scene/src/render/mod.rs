//! Rendering state
//!
//! Everything here is pipeline state the scene owns between frames: the
//! texture set, the two light slots and the camera/projection. Geometry lives
//! in [`crate::scene`].

pub mod context;
pub mod recording;
pub mod texture;
pub mod lighting;
pub mod camera;

pub use context::GraphicsContext;
pub use recording::RecordingContext;
pub use texture::{TextureManager, TextureSlot};
pub use lighting::LightingController;
pub use camera::{CameraRig, Projection};
