//! # Camera and Projection
//!
//! The scene is viewed from a fixed look-at frame; the user orbits it by
//! pitching and yawing the world and dollies by pushing it away from the eye.
//!
//! ## Design Principles
//! - **Bounded state**: pitch, yaw and distance each have a closed valid range;
//!   out-of-range requests are rejected, never wrapped or clamped into range
//! - **Independent projection**: the viewport only feeds the perspective
//!   matrix, so resizing never disturbs the camera orientation

use std::ops::RangeInclusive;

use nalgebra::Perspective3;

use crate::foundation::math::{utils, Mat4, Vec3};
use super::context::{GraphicsContext, MatrixMode};

/// Valid pitch angles in degrees
pub const PITCH_RANGE: RangeInclusive<f32> = -5.0..=90.0;

/// Valid yaw angles in degrees
pub const YAW_RANGE: RangeInclusive<f32> = -90.0..=90.0;

/// Valid dolly distances in world units
pub const DISTANCE_RANGE: RangeInclusive<f32> = 500.0..=1300.0;

/// Dolly distance at startup
pub const INITIAL_DISTANCE: f32 = 900.0;

/// Vertical field of view in degrees
pub const FIELD_OF_VIEW: f32 = 60.0;

/// Near clipping plane
pub const NEAR_PLANE: f32 = 0.5;

/// Far clipping plane
pub const FAR_PLANE: f32 = 20000.0;

/// Orbiting look-at camera
///
/// Applies, in order: look-at from `eye` towards `center`, a translation of
/// `-distance` along Z, a pitch rotation about X and a yaw rotation about Y.
#[derive(Debug, Clone, PartialEq)]
pub struct CameraRig {
    /// Eye position
    pub eye: Vec3,
    /// Point looked at
    pub center: Vec3,
    /// Up vector
    pub up: Vec3,
    pitch: f32,
    yaw: f32,
    distance: f32,
}

impl Default for CameraRig {
    fn default() -> Self {
        Self::new()
    }
}

impl CameraRig {
    /// Camera at the street-level eye point, looking down -Z
    pub fn new() -> Self {
        Self {
            eye: Vec3::new(90.0, 80.0, 0.0),
            center: Vec3::new(90.0, 80.0, -1.0),
            up: Vec3::y(),
            pitch: 0.0,
            yaw: 0.0,
            distance: INITIAL_DISTANCE,
        }
    }

    /// Pitch in degrees
    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    /// Yaw in degrees
    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    /// Dolly distance
    pub fn distance(&self) -> f32 {
        self.distance
    }

    /// Set the pitch; returns `false` and keeps the old value when out of range
    pub fn set_pitch(&mut self, degrees: f32) -> bool {
        Self::set_bounded(&mut self.pitch, degrees, &PITCH_RANGE, "pitch")
    }

    /// Set the yaw; returns `false` and keeps the old value when out of range
    pub fn set_yaw(&mut self, degrees: f32) -> bool {
        Self::set_bounded(&mut self.yaw, degrees, &YAW_RANGE, "yaw")
    }

    /// Set the dolly distance; returns `false` and keeps the old value when out of range
    pub fn set_distance(&mut self, distance: f32) -> bool {
        Self::set_bounded(&mut self.distance, distance, &DISTANCE_RANGE, "distance")
    }

    /// Change the pitch by `delta` if the result stays in range
    pub fn adjust_pitch(&mut self, delta: f32) -> bool {
        self.set_pitch(self.pitch + delta)
    }

    /// Change the yaw by `delta` if the result stays in range
    pub fn adjust_yaw(&mut self, delta: f32) -> bool {
        self.set_yaw(self.yaw + delta)
    }

    /// Change the distance by `delta` if the result stays in range
    pub fn adjust_distance(&mut self, delta: f32) -> bool {
        self.set_distance(self.distance + delta)
    }

    fn set_bounded(slot: &mut f32, value: f32, range: &RangeInclusive<f32>, name: &str) -> bool {
        if range.contains(&value) {
            *slot = value;
            log::trace!("Camera {} set to {}", name, value);
            true
        } else {
            log::debug!("Rejected camera {} {} outside {:?}", name, value, range);
            false
        }
    }

    /// Multiply the viewing transform onto the current model-view matrix
    pub fn apply(&self, ctx: &mut dyn GraphicsContext) {
        ctx.look_at(self.eye, self.center, self.up);
        ctx.translate(Vec3::new(0.0, 0.0, -self.distance));
        ctx.rotate(self.pitch, Vec3::x());
        ctx.rotate(self.yaw, Vec3::y());
    }
}

/// Viewport size and the perspective derived from it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Projection {
    width: u32,
    height: u32,
}

impl Projection {
    /// Projection for a viewport in pixels
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Viewport width
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Viewport height
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Width over height; a zero width or height counts as one pixel
    #[allow(clippy::cast_precision_loss)]
    pub fn aspect(&self) -> f32 {
        self.width.max(1) as f32 / self.height.max(1) as f32
    }

    /// Store a new viewport size
    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
    }

    /// Perspective matrix for the current viewport
    pub fn matrix(&self) -> Mat4 {
        Perspective3::new(self.aspect(), utils::deg_to_rad(FIELD_OF_VIEW), NEAR_PLANE, FAR_PLANE).to_homogeneous()
    }

    /// Replace the projection matrix with the perspective for this viewport
    ///
    /// Leaves the model-view stack selected, without touching its contents.
    pub fn apply(&self, ctx: &mut dyn GraphicsContext) {
        ctx.matrix_mode(MatrixMode::Projection);
        ctx.load_identity();
        ctx.perspective(FIELD_OF_VIEW, self.aspect(), NEAR_PLANE, FAR_PLANE);
        ctx.matrix_mode(MatrixMode::ModelView);
    }
}
