//! Graphics context abstraction
//!
//! The scene talks to the graphics pipeline only through [`GraphicsContext`],
//! a fixed-function interface in the style of legacy OpenGL: matrix stacks,
//! immediate-mode primitives, texture objects and fixed light slots.
//!
//! The scene never reads state back. Each frame is a fixed, deterministic
//! sequence of calls, which is what lets [`RecordingContext`] stand in for a
//! real driver in tests.
//!
//! [`RecordingContext`]: crate::render::RecordingContext

use bitflags::bitflags;
use crate::foundation::math::{Rgba, Vec3};

/// Opaque texture object name issued by the context
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureId(pub u32);

/// Pipeline capabilities toggled with enable/disable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    /// Depth testing
    DepthTest,
    /// Face culling
    CullFace,
    /// Renormalize normals after the model-view transform
    Normalize,
    /// Generate normals for evaluated surfaces
    AutoNormal,
    /// Material tracks the current color
    ColorMaterial,
    /// 2D texturing
    Texture2D,
    /// Fixed-function lighting
    Lighting,
    /// A single light slot
    Light(LightId),
}

/// Fixed light slots
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LightId {
    /// First light slot
    Light0,
    /// Second light slot
    Light1,
}

/// Matrix stack selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatrixMode {
    /// Model-view stack
    ModelView,
    /// Projection stack
    Projection,
    /// Texture-coordinate stack
    Texture,
}

impl MatrixMode {
    /// All stacks, in a fixed order
    pub const ALL: [Self; 3] = [Self::ModelView, Self::Projection, Self::Texture];
}

/// Immediate-mode primitive kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Primitive {
    /// Independent triangles
    Triangles,
    /// Independent quads
    Quads,
}

/// Polygon winding considered front-facing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Winding {
    /// Clockwise
    Clockwise,
    /// Counter-clockwise
    CounterClockwise,
}

/// Polygon faces
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Face {
    /// Front faces
    Front,
    /// Back faces
    Back,
    /// Both
    FrontAndBack,
}

/// Shading model
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShadeModel {
    /// One color per primitive
    Flat,
    /// Interpolated vertex colors
    Smooth,
}

/// Material parameters driven by the current color
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorMaterialMode {
    /// Ambient and diffuse follow the current color
    AmbientAndDiffuse,
    /// Only diffuse follows the current color
    Diffuse,
}

/// Texture sampling filter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextureFilter {
    /// Nearest texel
    Nearest,
    /// Bilinear
    Linear,
}

/// Texture coordinate wrapping
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextureWrap {
    /// Tile the texture
    Repeat,
    /// Clamp to the edge texel
    ClampToEdge,
}

/// How texture color combines with the lit fragment color
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextureEnvMode {
    /// Multiply
    Modulate,
    /// Add
    Add,
    /// Replace
    Replace,
}

bitflags! {
    /// Buffers cleared at the start of a frame
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ClearMask: u32 {
        /// Color buffer
        const COLOR = 0b01;
        /// Depth buffer
        const DEPTH = 0b10;
    }
}

/// A single light parameter write
///
/// Positions and spot directions are transformed by the model-view matrix
/// current at the time of the call, exactly like the fixed-function pipeline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LightParam {
    /// Homogeneous position; `w = 0` makes the light directional
    Position([f32; 4]),
    /// Ambient intensity
    Ambient(Rgba),
    /// Diffuse intensity
    Diffuse(Rgba),
    /// Specular intensity
    Specular(Rgba),
    /// Spot axis
    SpotDirection(Vec3),
    /// Spot half-angle in degrees; 180 means an omnidirectional light
    SpotCutoff(f32),
    /// Spot intensity falloff exponent
    SpotExponent(f32),
}

/// Font used by the overlay text
#[derive(Debug, Clone, PartialEq)]
pub struct TextStyle {
    /// Font face name
    pub face: String,
    /// Font size in the current model-view units
    pub size: f32,
    /// Outline deviation of generated glyph geometry
    pub deviation: f32,
    /// Glyph extrusion depth
    pub extrusion: f32,
}

/// Fixed-function graphics pipeline
///
/// Matrix operations post-multiply the top of the stack selected by
/// [`GraphicsContext::matrix_mode`]. Angles are in degrees.
pub trait GraphicsContext {
    // === Global state ===

    /// Enable a capability
    fn enable(&mut self, capability: Capability);

    /// Disable a capability
    fn disable(&mut self, capability: Capability);

    /// Select the front-facing winding
    fn front_face(&mut self, winding: Winding);

    /// Select which faces are culled when culling is enabled
    fn cull_face(&mut self, face: Face);

    /// Select flat or smooth shading
    fn shade_model(&mut self, model: ShadeModel);

    /// Select which material parameters follow the current color
    fn color_material(&mut self, face: Face, mode: ColorMaterialMode);

    /// Set the color used when clearing
    fn clear_color(&mut self, color: Rgba);

    /// Clear the selected buffers
    fn clear(&mut self, mask: ClearMask);

    /// Set the viewport rectangle in pixels
    fn viewport(&mut self, x: i32, y: i32, width: u32, height: u32);

    /// Submit all pending commands
    fn flush(&mut self);

    // === Matrix stack ===

    /// Select the matrix stack subsequent matrix calls operate on
    fn matrix_mode(&mut self, mode: MatrixMode);

    /// Duplicate the top of the current stack
    fn push_matrix(&mut self);

    /// Discard the top of the current stack
    fn pop_matrix(&mut self);

    /// Replace the top of the current stack with identity
    fn load_identity(&mut self);

    /// Multiply by a translation
    fn translate(&mut self, offset: Vec3);

    /// Multiply by a rotation of `degrees` around `axis`
    fn rotate(&mut self, degrees: f32, axis: Vec3);

    /// Multiply by a (possibly non-uniform) scale
    fn scale(&mut self, factors: Vec3);

    /// Multiply by a right-handed viewing transform
    fn look_at(&mut self, eye: Vec3, center: Vec3, up: Vec3);

    /// Multiply by a perspective projection
    fn perspective(&mut self, fov_y_degrees: f32, aspect: f32, near: f32, far: f32);

    /// Multiply by a 2D orthographic projection
    fn ortho_2d(&mut self, left: f32, right: f32, bottom: f32, top: f32);

    // === Immediate mode ===

    /// Start a primitive batch
    fn begin(&mut self, primitive: Primitive);

    /// Finish the current primitive batch
    fn end(&mut self);

    /// Emit a vertex
    fn vertex(&mut self, position: Vec3);

    /// Set the current normal
    fn normal(&mut self, normal: Vec3);

    /// Set the current texture coordinate
    fn tex_coord(&mut self, u: f32, v: f32);

    /// Set the current color
    fn color(&mut self, color: Rgba);

    // === Solids ===

    /// Draw a cube spanning `-1..1` on every axis
    fn draw_box(&mut self);

    /// Draw a cylinder of radius 1 from `z = 0` to `z = 1`
    fn draw_cylinder(&mut self, textured: bool);

    /// Draw extruded text starting at the current origin
    fn draw_text_3d(&mut self, style: &TextStyle, text: &str);

    // === Textures ===

    /// Allocate `count` texture names
    fn gen_textures(&mut self, count: usize) -> Vec<TextureId>;

    /// Bind a texture to the 2D target
    fn bind_texture(&mut self, texture: TextureId);

    /// Upload RGBA8 pixels to the bound texture and build its mipmap chain
    fn upload_mipmapped_rgba(&mut self, width: u32, height: u32, pixels: &[u8]);

    /// Set min/mag filters of the bound texture
    fn texture_filter(&mut self, min: TextureFilter, mag: TextureFilter);

    /// Set S/T wrapping of the bound texture
    fn texture_wrap(&mut self, s: TextureWrap, t: TextureWrap);

    /// Set the texture environment mode
    fn texture_env_mode(&mut self, mode: TextureEnvMode);

    /// Free texture names
    fn delete_textures(&mut self, textures: &[TextureId]);

    // === Lighting ===

    /// Set the global ambient term of the light model
    fn light_model_ambient(&mut self, color: Rgba);

    /// Write one parameter of a light slot
    fn light(&mut self, light: LightId, param: LightParam);
}
