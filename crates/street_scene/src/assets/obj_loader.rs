//! OBJ file loader for 3D models
//!
//! Reads positions, normals, texture coordinates and polygon faces from
//! Wavefront OBJ files. Polygons are fan-triangulated; faces that carry no
//! normals get their computed face normal.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use crate::assets::{AssetError, MeshProvider, ModelAsset};
use crate::foundation::math::{utils, Vec3};
use crate::render::context::Primitive;
use crate::render::GraphicsContext;

/// Triangle-list vertex
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObjVertex {
    /// Position in model space
    pub position: Vec3,
    /// Unit normal
    pub normal: Vec3,
    /// Texture coordinate
    pub tex_coord: [f32; 2],
}

/// A model backed by a Wavefront OBJ file
#[derive(Debug)]
pub struct ObjModel {
    path: PathBuf,
    vertices: Vec<ObjVertex>,
    ready: bool,
}

impl ObjModel {
    /// Create an unloaded model for `path`
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into(), vertices: Vec::new(), ready: false }
    }

    /// Triangle vertices, three per triangle
    pub fn vertices(&self) -> &[ObjVertex] {
        &self.vertices
    }

    /// Number of triangles
    pub fn triangle_count(&self) -> usize {
        self.vertices.len() / 3
    }

    /// Parse OBJ text into a triangle list
    pub fn parse<R: BufRead>(reader: R) -> Result<Vec<ObjVertex>, AssetError> {
        let mut positions: Vec<Vec3> = Vec::new();
        let mut normals: Vec<Vec3> = Vec::new();
        let mut tex_coords: Vec<[f32; 2]> = Vec::new();
        let mut vertices = Vec::new();

        for (line_number, line) in reader.lines().enumerate() {
            let line = line?;
            let line = line.trim();

            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let mut parts = line.split_whitespace();
            let Some(keyword) = parts.next() else {
                continue;
            };
            let args: Vec<&str> = parts.collect();

            match keyword {
                "v" => positions.push(parse_vec3(&args, line_number)?),
                "vn" => normals.push(parse_vec3(&args, line_number)?),
                "vt" => {
                    let uv = parse_floats(&args, 2, line_number)?;
                    tex_coords.push([uv[0], uv[1]]);
                }
                "f" => {
                    if args.len() < 3 {
                        return Err(AssetError::InvalidFormat(format!(
                            "line {}: face needs at least three vertices", line_number + 1
                        )));
                    }

                    let corners = args
                        .iter()
                        .map(|corner| parse_corner(corner, &positions, &normals, &tex_coords, line_number))
                        .collect::<Result<Vec<_>, _>>()?;

                    // Fan triangulation
                    for i in 1..corners.len() - 1 {
                        let triangle = [corners[0], corners[i], corners[i + 1]];
                        let face_normal = utils::face_normal(
                            triangle[0].0.position,
                            triangle[1].0.position,
                            triangle[2].0.position,
                        );
                        for (mut vertex, has_normal) in triangle {
                            if !has_normal {
                                vertex.normal = face_normal;
                            }
                            vertices.push(vertex);
                        }
                    }
                }
                _ => {
                    // Ignore groups, materials, smoothing
                }
            }
        }

        if vertices.is_empty() {
            return Err(AssetError::InvalidFormat("No faces found in OBJ file".to_string()));
        }

        Ok(vertices)
    }
}

fn parse_floats(args: &[&str], count: usize, line_number: usize) -> Result<Vec<f32>, AssetError> {
    if args.len() < count {
        return Err(AssetError::InvalidFormat(format!(
            "line {}: expected {} values, found {}", line_number + 1, count, args.len()
        )));
    }
    args[..count]
        .iter()
        .map(|value| {
            value.parse::<f32>().map_err(|_| {
                AssetError::InvalidFormat(format!("line {}: invalid number '{}'", line_number + 1, value))
            })
        })
        .collect()
}

fn parse_vec3(args: &[&str], line_number: usize) -> Result<Vec3, AssetError> {
    let v = parse_floats(args, 3, line_number)?;
    Ok(Vec3::new(v[0], v[1], v[2]))
}

/// Resolve one `v/vt/vn` face corner; also reports whether it carried a normal
fn parse_corner(
    corner: &str,
    positions: &[Vec3],
    normals: &[Vec3],
    tex_coords: &[[f32; 2]],
    line_number: usize,
) -> Result<(ObjVertex, bool), AssetError> {
    let mut indices = corner.split('/');
    let invalid = || AssetError::InvalidFormat(format!("line {}: bad face corner '{}'", line_number + 1, corner));

    let position = indices
        .next()
        .and_then(|idx| resolve_index(idx, positions.len()))
        .map(|idx| positions[idx])
        .ok_or_else(invalid)?;

    let tex_coord = indices
        .next()
        .and_then(|idx| resolve_index(idx, tex_coords.len()))
        .map_or([0.0, 0.0], |idx| tex_coords[idx]);

    let normal = indices
        .next()
        .and_then(|idx| resolve_index(idx, normals.len()))
        .map(|idx| normals[idx]);

    Ok((
        ObjVertex { position, normal: normal.unwrap_or_else(Vec3::y), tex_coord },
        normal.is_some(),
    ))
}

/// OBJ indices are 1-based; negative values count back from the end
fn resolve_index(raw: &str, len: usize) -> Option<usize> {
    let index: i64 = raw.parse().ok()?;
    let resolved = match index {
        0 => return None,
        i if i > 0 => usize::try_from(i - 1).ok()?,
        i => len.checked_sub(usize::try_from(i.unsigned_abs()).ok()?)?,
    };
    (resolved < len).then_some(resolved)
}

impl ModelAsset for ObjModel {
    fn load(&mut self) -> Result<(), AssetError> {
        if !self.path.is_file() {
            return Err(AssetError::NotFound(self.path.display().to_string()));
        }
        let file = File::open(&self.path)?;
        self.vertices = Self::parse(BufReader::new(file))?;
        log::info!("Loaded {:?}: {} triangles", self.path, self.triangle_count());
        Ok(())
    }

    fn initialize_graphics_resources(&mut self, _ctx: &mut dyn GraphicsContext) -> Result<(), AssetError> {
        if self.vertices.is_empty() {
            return Err(AssetError::GraphicsSetup(format!("{} was not loaded", self.path.display())));
        }
        self.ready = true;
        Ok(())
    }

    fn draw(&self, ctx: &mut dyn GraphicsContext) {
        if !self.ready {
            return;
        }
        ctx.begin(Primitive::Triangles);
        for vertex in &self.vertices {
            ctx.normal(vertex.normal);
            ctx.tex_coord(vertex.tex_coord[0], vertex.tex_coord[1]);
            ctx.vertex(vertex.position);
        }
        ctx.end();
    }

    fn release(&mut self) {
        self.vertices = Vec::new();
        self.ready = false;
    }
}

/// Mesh provider reading OBJ files from disk
#[derive(Debug, Clone, Copy, Default)]
pub struct ObjMeshProvider;

impl MeshProvider for ObjMeshProvider {
    fn open(&self, directory: &Path, file_name: &str) -> Result<Box<dyn ModelAsset>, AssetError> {
        Ok(Box::new(ObjModel::new(directory.join(file_name))))
    }
}
