//! Headless recording context
//!
//! [`RecordingContext`] implements [`GraphicsContext`] without a GPU. It keeps
//! real matrix stacks (so it knows where every solid lands in world space),
//! counts stack underflows, and records every call in order. Tests use it to
//! check draw order and stack balance; the replay binary uses it to run frames
//! without a window.

use std::collections::HashMap;

use nalgebra::{Orthographic3, Perspective3, Rotation3, Unit};

use crate::foundation::math::{utils, Mat4, Point3, Rgba, Vec3};
use super::context::{
    Capability, ClearMask, ColorMaterialMode, Face, GraphicsContext, LightId, LightParam,
    MatrixMode, Primitive, ShadeModel, TextStyle, TextureEnvMode, TextureFilter, TextureId,
    TextureWrap, Winding,
};

/// Axis-aligned bounds of a drawn solid, in the space the model-view maps to
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    /// Minimum corner
    pub min: Vec3,
    /// Maximum corner
    pub max: Vec3,
}

impl Bounds {
    /// Bounds of `points` after transforming them by `matrix`
    fn of_transformed(matrix: &Mat4, points: &[Point3]) -> Self {
        let mut min = Vec3::repeat(f32::MAX);
        let mut max = Vec3::repeat(f32::MIN);
        for point in points {
            let p = matrix.transform_point(point).coords;
            min = min.inf(&p);
            max = max.sup(&p);
        }
        Self { min, max }
    }

    /// Smallest bounds containing both
    pub fn union(&self, other: &Self) -> Self {
        Self { min: self.min.inf(&other.min), max: self.max.sup(&other.max) }
    }

    /// Size along each axis
    pub fn extent(&self) -> Vec3 {
        self.max - self.min
    }
}

/// One recorded call
#[derive(Debug, Clone, PartialEq)]
pub enum GlCall {
    /// `enable`
    Enable(Capability),
    /// `disable`
    Disable(Capability),
    /// `front_face`
    FrontFace(Winding),
    /// `cull_face`
    CullFace(Face),
    /// `shade_model`
    ShadeModel(ShadeModel),
    /// `color_material`
    ColorMaterial(Face, ColorMaterialMode),
    /// `clear_color`
    ClearColor(Rgba),
    /// `clear`
    Clear(ClearMask),
    /// `viewport`
    Viewport { width: u32, height: u32 },
    /// `flush`
    Flush,
    /// `matrix_mode`
    MatrixMode(MatrixMode),
    /// `push_matrix` on the given stack
    PushMatrix(MatrixMode),
    /// `pop_matrix` on the given stack
    PopMatrix(MatrixMode),
    /// `load_identity` on the given stack
    LoadIdentity(MatrixMode),
    /// `translate`
    Translate(Vec3),
    /// `rotate`
    Rotate(f32, Vec3),
    /// `scale`
    Scale(Vec3),
    /// `look_at`
    LookAt { eye: Vec3, center: Vec3, up: Vec3 },
    /// `perspective`
    Perspective { fov_y: f32, aspect: f32, near: f32, far: f32 },
    /// `ortho_2d`
    Ortho2d { right: f32, top: f32 },
    /// `begin`
    Begin(Primitive),
    /// `end`
    End,
    /// `vertex`
    Vertex(Vec3),
    /// `normal`
    Normal(Vec3),
    /// `tex_coord`
    TexCoord(f32, f32),
    /// `color`
    Color(Rgba),
    /// `draw_box` with its world bounds
    DrawBox(Bounds),
    /// `draw_cylinder` with its world bounds
    DrawCylinder(Bounds),
    /// `draw_text_3d`
    Text(String),
    /// `gen_textures`
    GenTextures(Vec<TextureId>),
    /// `bind_texture`
    BindTexture(TextureId),
    /// `upload_mipmapped_rgba`
    UploadTexture { width: u32, height: u32 },
    /// `texture_filter`
    TextureFilter(TextureFilter, TextureFilter),
    /// `texture_wrap`
    TextureWrap(TextureWrap, TextureWrap),
    /// `texture_env_mode`
    TextureEnvMode(TextureEnvMode),
    /// `delete_textures`
    DeleteTextures(Vec<TextureId>),
    /// `light_model_ambient`
    LightModelAmbient(Rgba),
    /// `light`
    Light(LightId, LightParam),
}

/// A context that records calls and tracks matrix stacks
#[derive(Debug)]
pub struct RecordingContext {
    calls: Vec<GlCall>,
    mode: MatrixMode,
    current: HashMap<MatrixMode, Mat4>,
    saved: HashMap<MatrixMode, Vec<Mat4>>,
    underflows: usize,
    next_texture: u32,
}

impl Default for RecordingContext {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordingContext {
    /// Create a context with identity matrices and empty stacks
    pub fn new() -> Self {
        Self {
            calls: Vec::new(),
            mode: MatrixMode::ModelView,
            current: MatrixMode::ALL.iter().map(|&mode| (mode, Mat4::identity())).collect(),
            saved: MatrixMode::ALL.iter().map(|&mode| (mode, Vec::new())).collect(),
            underflows: 0,
            next_texture: 1,
        }
    }

    /// Every call recorded so far, in order
    pub fn calls(&self) -> &[GlCall] {
        &self.calls
    }

    /// Forget recorded calls; matrix state is kept
    pub fn clear_calls(&mut self) {
        self.calls.clear();
    }

    /// Number of recorded calls matching `predicate`
    pub fn count(&self, predicate: impl Fn(&GlCall) -> bool) -> usize {
        self.calls.iter().filter(|call| predicate(call)).count()
    }

    /// Number of saved entries on a stack
    pub fn stack_depth(&self, mode: MatrixMode) -> usize {
        self.saved.get(&mode).map_or(0, Vec::len)
    }

    /// Pops issued against an empty stack
    pub fn underflows(&self) -> usize {
        self.underflows
    }

    /// Currently selected stack
    pub fn current_mode(&self) -> MatrixMode {
        self.mode
    }

    /// Top of a stack
    pub fn matrix(&self, mode: MatrixMode) -> Mat4 {
        self.current.get(&mode).copied().unwrap_or_else(Mat4::identity)
    }

    /// Union of the world bounds of every box and cylinder drawn so far
    pub fn solid_bounds(&self) -> Option<Bounds> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                GlCall::DrawBox(bounds) | GlCall::DrawCylinder(bounds) => Some(*bounds),
                _ => None,
            })
            .reduce(|acc, bounds| acc.union(&bounds))
    }

    fn top_mut(&mut self) -> &mut Mat4 {
        self.current.entry(self.mode).or_insert_with(Mat4::identity)
    }

    fn multiply(&mut self, matrix: &Mat4) {
        let top = self.top_mut();
        *top *= matrix;
    }

    fn model_view(&self) -> Mat4 {
        self.matrix(MatrixMode::ModelView)
    }
}

impl GraphicsContext for RecordingContext {
    fn enable(&mut self, capability: Capability) {
        self.calls.push(GlCall::Enable(capability));
    }

    fn disable(&mut self, capability: Capability) {
        self.calls.push(GlCall::Disable(capability));
    }

    fn front_face(&mut self, winding: Winding) {
        self.calls.push(GlCall::FrontFace(winding));
    }

    fn cull_face(&mut self, face: Face) {
        self.calls.push(GlCall::CullFace(face));
    }

    fn shade_model(&mut self, model: ShadeModel) {
        self.calls.push(GlCall::ShadeModel(model));
    }

    fn color_material(&mut self, face: Face, mode: ColorMaterialMode) {
        self.calls.push(GlCall::ColorMaterial(face, mode));
    }

    fn clear_color(&mut self, color: Rgba) {
        self.calls.push(GlCall::ClearColor(color));
    }

    fn clear(&mut self, mask: ClearMask) {
        self.calls.push(GlCall::Clear(mask));
    }

    fn viewport(&mut self, _x: i32, _y: i32, width: u32, height: u32) {
        self.calls.push(GlCall::Viewport { width, height });
    }

    fn flush(&mut self) {
        self.calls.push(GlCall::Flush);
    }

    fn matrix_mode(&mut self, mode: MatrixMode) {
        self.mode = mode;
        self.calls.push(GlCall::MatrixMode(mode));
    }

    fn push_matrix(&mut self) {
        let top = self.matrix(self.mode);
        self.saved.entry(self.mode).or_default().push(top);
        self.calls.push(GlCall::PushMatrix(self.mode));
    }

    fn pop_matrix(&mut self) {
        let popped = self.saved.entry(self.mode).or_default().pop();
        match popped {
            Some(matrix) => *self.top_mut() = matrix,
            None => {
                self.underflows += 1;
                log::warn!("Matrix stack underflow on {:?}", self.mode);
            }
        }
        self.calls.push(GlCall::PopMatrix(self.mode));
    }

    fn load_identity(&mut self) {
        *self.top_mut() = Mat4::identity();
        self.calls.push(GlCall::LoadIdentity(self.mode));
    }

    fn translate(&mut self, offset: Vec3) {
        self.multiply(&Mat4::new_translation(&offset));
        self.calls.push(GlCall::Translate(offset));
    }

    fn rotate(&mut self, degrees: f32, axis: Vec3) {
        let rotation = Rotation3::from_axis_angle(&Unit::new_normalize(axis), utils::deg_to_rad(degrees));
        self.multiply(&rotation.to_homogeneous());
        self.calls.push(GlCall::Rotate(degrees, axis));
    }

    fn scale(&mut self, factors: Vec3) {
        self.multiply(&Mat4::new_nonuniform_scaling(&factors));
        self.calls.push(GlCall::Scale(factors));
    }

    fn look_at(&mut self, eye: Vec3, center: Vec3, up: Vec3) {
        let view = Mat4::look_at_rh(&Point3::from(eye), &Point3::from(center), &up);
        self.multiply(&view);
        self.calls.push(GlCall::LookAt { eye, center, up });
    }

    fn perspective(&mut self, fov_y_degrees: f32, aspect: f32, near: f32, far: f32) {
        let projection = Perspective3::new(aspect, utils::deg_to_rad(fov_y_degrees), near, far);
        self.multiply(&projection.to_homogeneous());
        self.calls.push(GlCall::Perspective { fov_y: fov_y_degrees, aspect, near, far });
    }

    fn ortho_2d(&mut self, left: f32, right: f32, bottom: f32, top: f32) {
        let projection = Orthographic3::new(left, right, bottom, top, -1.0, 1.0);
        self.multiply(&projection.to_homogeneous());
        self.calls.push(GlCall::Ortho2d { right, top });
    }

    fn begin(&mut self, primitive: Primitive) {
        self.calls.push(GlCall::Begin(primitive));
    }

    fn end(&mut self) {
        self.calls.push(GlCall::End);
    }

    fn vertex(&mut self, position: Vec3) {
        self.calls.push(GlCall::Vertex(position));
    }

    fn normal(&mut self, normal: Vec3) {
        self.calls.push(GlCall::Normal(normal));
    }

    fn tex_coord(&mut self, u: f32, v: f32) {
        self.calls.push(GlCall::TexCoord(u, v));
    }

    fn color(&mut self, color: Rgba) {
        self.calls.push(GlCall::Color(color));
    }

    fn draw_box(&mut self) {
        let corners: Vec<Point3> = (0..8)
            .map(|i| {
                let pick = |bit: u32| if i & bit == 0 { -1.0 } else { 1.0 };
                Point3::new(pick(1), pick(2), pick(4))
            })
            .collect();
        let bounds = Bounds::of_transformed(&self.model_view(), &corners);
        self.calls.push(GlCall::DrawBox(bounds));
    }

    fn draw_cylinder(&mut self, _textured: bool) {
        let corners: Vec<Point3> = (0..8)
            .map(|i| {
                let pick = |bit: u32, low: f32| if i & bit == 0 { low } else { 1.0 };
                Point3::new(pick(1, -1.0), pick(2, -1.0), pick(4, 0.0))
            })
            .collect();
        let bounds = Bounds::of_transformed(&self.model_view(), &corners);
        self.calls.push(GlCall::DrawCylinder(bounds));
    }

    fn draw_text_3d(&mut self, _style: &TextStyle, text: &str) {
        self.calls.push(GlCall::Text(text.to_string()));
    }

    fn gen_textures(&mut self, count: usize) -> Vec<TextureId> {
        let ids: Vec<TextureId> = (0..count)
            .map(|_| {
                let id = TextureId(self.next_texture);
                self.next_texture += 1;
                id
            })
            .collect();
        self.calls.push(GlCall::GenTextures(ids.clone()));
        ids
    }

    fn bind_texture(&mut self, texture: TextureId) {
        self.calls.push(GlCall::BindTexture(texture));
    }

    fn upload_mipmapped_rgba(&mut self, width: u32, height: u32, _pixels: &[u8]) {
        self.calls.push(GlCall::UploadTexture { width, height });
    }

    fn texture_filter(&mut self, min: TextureFilter, mag: TextureFilter) {
        self.calls.push(GlCall::TextureFilter(min, mag));
    }

    fn texture_wrap(&mut self, s: TextureWrap, t: TextureWrap) {
        self.calls.push(GlCall::TextureWrap(s, t));
    }

    fn texture_env_mode(&mut self, mode: TextureEnvMode) {
        self.calls.push(GlCall::TextureEnvMode(mode));
    }

    fn delete_textures(&mut self, textures: &[TextureId]) {
        self.calls.push(GlCall::DeleteTextures(textures.to_vec()));
    }

    fn light_model_ambient(&mut self, color: Rgba) {
        self.calls.push(GlCall::LightModelAmbient(color));
    }

    fn light(&mut self, light: LightId, param: LightParam) {
        self.calls.push(GlCall::Light(light, param));
    }
}
