//! Math utilities and types
//!
//! Provides the vector/matrix aliases used by the scene, an RGBA color value and
//! the handful of helpers the fixed-function pipeline needs.

pub use nalgebra::{Vector3, Matrix4};

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// 4x4 matrix type
pub type Mat4 = Matrix4<f32>;

/// 3D point type
pub type Point3 = nalgebra::Point3<f32>;

/// Linear RGBA color with components nominally in `[0, 1]`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    /// Red component
    pub r: f32,
    /// Green component
    pub g: f32,
    /// Blue component
    pub b: f32,
    /// Alpha component
    pub a: f32,
}

impl Rgba {
    /// Create a color from its four components
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Opaque color from three components
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self::new(r, g, b, 1.0)
    }

    /// Opaque gray with all color channels set to `value`
    pub const fn gray(value: f32) -> Self {
        Self::rgb(value, value, value)
    }
}

/// Math utility functions
pub mod utils {
    use super::Vec3;

    /// Convert degrees to radians
    pub fn deg_to_rad(degrees: f32) -> f32 {
        degrees.to_radians()
    }

    /// Unit normal of the plane through three points, wound counter-clockwise
    ///
    /// Returns +Y for degenerate (collinear) input so callers always get a
    /// usable lighting normal.
    pub fn face_normal(a: Vec3, b: Vec3, c: Vec3) -> Vec3 {
        let normal = (b - a).cross(&(c - a));
        normal.try_normalize(f32::EPSILON).unwrap_or_else(Vec3::y)
    }
}
