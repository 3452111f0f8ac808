//! # Procedural Geometry
//!
//! The static part of the street is composed from quads, unit boxes and a
//! cylinder, placed with the model-view stack and textured with the texture
//! stack. Every function here leaves all matrix stacks as it found them and
//! returns with the model-view stack selected.
//!
//! World layout, before the camera transform:
//!
//! - Ground and road: a 5000×5000 plane 100 units below the origin
//! - Buildings: two blocks either side of the road and a brick wall across its far end
//! - Streetlights: two lamps facing each other across the road, each carrying the spotlight
//! - Models: the static model by the roadside and the animated one on the road

use crate::assets::ModelHandle;
use crate::foundation::math::{utils, Rgba, Vec3};
use crate::render::camera::Projection;
use crate::render::context::{GraphicsContext, MatrixMode, Primitive, TextStyle};
use crate::render::lighting::LightingController;
use crate::render::texture::{TextureManager, TextureSlot};
use super::animation::AnimationState;
use super::scaling::ScaleSelection;

/// Scale shared by the surface, buildings and streetlights
const WORLD_SCALE: f32 = 50.0;

/// Scale applied to both models
const MODEL_SCALE: f32 = 40.0;

/// Run `body` between a push and a pop of the model-view stack
fn with_pushed(ctx: &mut dyn GraphicsContext, body: impl FnOnce(&mut dyn GraphicsContext)) {
    ctx.push_matrix();
    body(&mut *ctx);
    ctx.pop_matrix();
}

/// Run `body` with an extra texture-coordinate transform on top of the texture stack
///
/// `transform` runs with the texture stack selected, `body` with the
/// model-view stack selected.
fn with_texture_transform(
    ctx: &mut dyn GraphicsContext,
    transform: impl FnOnce(&mut dyn GraphicsContext),
    body: impl FnOnce(&mut dyn GraphicsContext),
) {
    ctx.matrix_mode(MatrixMode::Texture);
    ctx.push_matrix();
    transform(&mut *ctx);
    ctx.matrix_mode(MatrixMode::ModelView);

    body(&mut *ctx);

    ctx.matrix_mode(MatrixMode::Texture);
    ctx.pop_matrix();
    ctx.matrix_mode(MatrixMode::ModelView);
}

/// A lit, textured quad; the normal comes from the first three corners
fn textured_quad(ctx: &mut dyn GraphicsContext, corners: [(Vec3, [f32; 2]); 4]) {
    ctx.begin(Primitive::Quads);
    ctx.normal(utils::face_normal(corners[0].0, corners[1].0, corners[2].0));
    for (position, [u, v]) in corners {
        ctx.tex_coord(u, v);
        ctx.vertex(position);
    }
    ctx.end();
}

/// Ground plane with the road laid on top
pub fn draw_surface(ctx: &mut dyn GraphicsContext, textures: &TextureManager) {
    with_pushed(ctx, |ctx| {
        ctx.translate(Vec3::new(0.0, -100.0, 0.0));
        ctx.scale(Vec3::repeat(WORLD_SCALE));

        textures.bind(ctx, TextureSlot::Asphalt);
        textured_quad(ctx, [
            (Vec3::new(-50.0, 0.0, -50.0), [-2.0, -2.0]),
            (Vec3::new(-50.0, 0.0, 50.0), [-2.0, 2.0]),
            (Vec3::new(50.0, 0.0, 50.0), [2.0, 2.0]),
            (Vec3::new(50.0, 0.0, -50.0), [2.0, -2.0]),
        ]);

        // Lifted to avoid z-fighting with the ground
        ctx.translate(Vec3::new(0.0, 0.01, 0.0));

        with_texture_transform(
            ctx,
            |ctx| ctx.scale(Vec3::new(1.0, 10.0, 1.0)),
            |ctx| {
                textures.bind(ctx, TextureSlot::Road);
                textured_quad(ctx, [
                    (Vec3::new(-4.5, 0.0, -50.0), [0.0, 1.0]),
                    (Vec3::new(-4.5, 0.0, 50.0), [0.0, 0.0]),
                    (Vec3::new(4.5, 0.0, 50.0), [1.0, 0.0]),
                    (Vec3::new(4.5, 0.0, -50.0), [1.0, 1.0]),
                ]);
            },
        );
    });
}

fn building_block(ctx: &mut dyn GraphicsContext) {
    with_pushed(ctx, |ctx| {
        ctx.scale(Vec3::new(3.0, 12.0, 8.0));
        ctx.draw_box();
    });
}

/// Two facades along the road and a brick wall closing it off
pub fn draw_buildings(ctx: &mut dyn GraphicsContext, textures: &TextureManager) {
    with_pushed(ctx, |ctx| {
        textures.bind(ctx, TextureSlot::Building);

        with_texture_transform(
            ctx,
            |ctx| ctx.rotate(-90.0, Vec3::z()),
            |ctx| {
                ctx.scale(Vec3::repeat(WORLD_SCALE));
                ctx.translate(Vec3::new(-10.0, 10.1, 0.0));
                building_block(ctx);

                ctx.translate(Vec3::new(20.0, 0.0, 0.0));
                building_block(ctx);

                textures.bind(ctx, TextureSlot::Brick);
                with_texture_transform(
                    ctx,
                    |ctx| ctx.scale(Vec3::new(1.0, 5.0, 1.0)),
                    |ctx| {
                        ctx.translate(Vec3::new(-10.0, 0.0, -21.0));
                        ctx.rotate(90.0, Vec3::y());
                        ctx.scale(Vec3::new(1.0, 1.0, 4.0));
                        building_block(ctx);
                    },
                );
            },
        );
    });
}

/// One lamp: pole, arm, spotlight and shade
fn streetlight_fixture(ctx: &mut dyn GraphicsContext, textures: &TextureManager) {
    with_pushed(ctx, |ctx| {
        textures.bind(ctx, TextureSlot::Tree);

        with_pushed(ctx, |ctx| {
            ctx.scale(Vec3::new(0.1, 5.0, 0.1));
            ctx.draw_box();
        });

        ctx.translate(Vec3::new(0.5, 4.92, 0.0));
        with_pushed(ctx, |ctx| {
            ctx.scale(Vec3::new(0.5, 0.1, 0.1));
            ctx.draw_box();
        });

        ctx.translate(Vec3::new(0.4, -0.5, 0.0));
        LightingController::place_spot(ctx);

        ctx.scale(Vec3::new(0.3, 0.5, 0.3));
        ctx.rotate(90.0, Vec3::x());
        ctx.rotate(180.0, Vec3::y());
        ctx.draw_cylinder(true);
    });
}

/// Both streetlights, the second mirrored 10 units to the right
pub fn draw_streetlights(ctx: &mut dyn GraphicsContext, textures: &TextureManager, scale: &ScaleSelection) {
    with_pushed(ctx, |ctx| {
        ctx.scale(scale.uniform_vector());
        ctx.scale(scale.vertical_vector());
        ctx.scale(Vec3::repeat(WORLD_SCALE));
        ctx.translate(Vec3::new(-5.0, 3.0, 0.0));
        streetlight_fixture(ctx, textures);

        ctx.translate(Vec3::new(10.0, 0.0, 0.0));
        ctx.rotate(180.0, Vec3::y());
        streetlight_fixture(ctx, textures);
    });
}

/// The static model and the animated one
pub fn draw_models(
    ctx: &mut dyn GraphicsContext,
    primary: &ModelHandle,
    secondary: &ModelHandle,
    animation: &AnimationState,
    scale: &ScaleSelection,
) {
    with_pushed(ctx, |ctx| {
        ctx.scale(Vec3::repeat(MODEL_SCALE));
        ctx.translate(Vec3::new(4.9, -2.4, -2.0));

        with_pushed(ctx, |ctx| {
            ctx.rotate(-90.0, Vec3::x());
            ctx.scale(Vec3::repeat(0.018));
            secondary.draw(ctx);
        });

        ctx.translate(Vec3::new(animation.x, -0.7, animation.z));
        ctx.scale(scale.uniform_vector());
        ctx.rotate(animation.rotation, Vec3::y());
        ctx.scale(Vec3::repeat(0.5));
        primary.draw(ctx);
    });
}

/// Overlay text color
pub const OVERLAY_COLOR: Rgba = Rgba::rgb(0.0, 0.0, 1.0);

/// Glyph height in pixels
const GLYPH_SIZE: f32 = 14.0;
/// Distance between baselines, in glyph heights
const LINE_SPACING: f32 = 1.3;
/// Pixels between the text block and the right/bottom window edges
const OVERLAY_MARGIN: f32 = 20.0;
/// Width reserved for the text block, in pixels
const OVERLAY_WIDTH: f32 = 280.0;

fn overlay_style() -> TextStyle {
    TextStyle { face: "Verdana".to_string(), size: 1.0, deviation: 1.0, extrusion: 0.1 }
}

/// Text block in the lower right corner, drawn in window coordinates
///
/// The projection is swapped for a pixel-space orthographic one and restored
/// from the stack afterwards.
#[allow(clippy::cast_precision_loss)]
pub fn draw_overlay(ctx: &mut dyn GraphicsContext, projection: &Projection, lines: &[String]) {
    if lines.is_empty() {
        return;
    }
    let width = projection.width() as f32;
    let height = projection.height() as f32;

    ctx.matrix_mode(MatrixMode::Projection);
    ctx.push_matrix();
    ctx.load_identity();
    ctx.ortho_2d(0.0, width, 0.0, height);
    ctx.matrix_mode(MatrixMode::ModelView);

    with_pushed(ctx, |ctx| {
        ctx.load_identity();
        ctx.color(OVERLAY_COLOR);

        let block_height = LINE_SPACING * (lines.len() - 1) as f32;
        ctx.translate(Vec3::new(
            (width - OVERLAY_WIDTH).max(0.0),
            OVERLAY_MARGIN + block_height * GLYPH_SIZE,
            0.0,
        ));
        ctx.scale(Vec3::repeat(GLYPH_SIZE));

        let style = overlay_style();
        for (row, line) in lines.iter().enumerate() {
            with_pushed(ctx, |ctx| {
                ctx.translate(Vec3::new(0.0, -LINE_SPACING * row as f32, 0.0));
                ctx.draw_text_3d(&style, line);
            });
        }
    });

    ctx.matrix_mode(MatrixMode::Projection);
    ctx.pop_matrix();
    ctx.matrix_mode(MatrixMode::ModelView);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::context::LightParam;
    use crate::render::lighting::SPOT_LIGHT;
    use crate::render::recording::{GlCall, RecordingContext};
    use crate::scene::scaling::ScaleStep;
    use approx::assert_relative_eq;

    fn assert_balanced(ctx: &RecordingContext) {
        for mode in MatrixMode::ALL {
            assert_eq!(ctx.stack_depth(mode), 0, "{:?} stack left unbalanced", mode);
        }
        assert_eq!(ctx.underflows(), 0);
        assert_eq!(ctx.current_mode(), MatrixMode::ModelView);
    }

    fn streetlight_extent(scale: ScaleSelection) -> Vec3 {
        let mut ctx = RecordingContext::new();
        draw_streetlights(&mut ctx, &TextureManager::new(), &scale);
        ctx.solid_bounds().unwrap().extent()
    }

    #[test]
    fn test_every_group_is_balanced() {
        let textures = TextureManager::new();
        let mut ctx = RecordingContext::new();

        draw_surface(&mut ctx, &textures);
        assert_balanced(&ctx);
        draw_buildings(&mut ctx, &textures);
        assert_balanced(&ctx);
        draw_streetlights(&mut ctx, &textures, &ScaleSelection::default());
        assert_balanced(&ctx);
        draw_overlay(&mut ctx, &Projection::new(800, 600), &["a".to_string(), "b".to_string()]);
        assert_balanced(&ctx);
    }

    #[test]
    fn test_surface_normals_face_up() {
        let mut ctx = RecordingContext::new();
        draw_surface(&mut ctx, &TextureManager::new());

        let normals: Vec<Vec3> = ctx
            .calls()
            .iter()
            .filter_map(|call| match call {
                GlCall::Normal(n) => Some(*n),
                _ => None,
            })
            .collect();
        assert_eq!(normals.len(), 2);
        for normal in normals {
            assert_relative_eq!(normal, Vec3::y(), epsilon = 1e-6);
        }
    }

    #[test]
    fn test_building_texture_transforms_are_nested() {
        let mut ctx = RecordingContext::new();
        draw_buildings(&mut ctx, &TextureManager::new());

        assert_eq!(ctx.count(|c| *c == GlCall::PushMatrix(MatrixMode::Texture)), 2);
        assert_eq!(ctx.count(|c| *c == GlCall::PopMatrix(MatrixMode::Texture)), 2);
        assert_eq!(ctx.count(|c| matches!(c, GlCall::DrawBox(_))), 3);
    }

    #[test]
    fn test_vertical_scale_stretches_only_height() {
        let normal = streetlight_extent(ScaleSelection::default());
        let tall = streetlight_extent(ScaleSelection { vertical: ScaleStep::Double, ..ScaleSelection::default() });

        assert_relative_eq!(tall.x, normal.x, epsilon = 1e-2);
        assert_relative_eq!(tall.y, normal.y * 2.0, epsilon = 1e-2);
        assert_relative_eq!(tall.z, normal.z, epsilon = 1e-2);
    }

    #[test]
    fn test_uniform_scale_stretches_every_axis() {
        let normal = streetlight_extent(ScaleSelection::default());
        let big = streetlight_extent(ScaleSelection { uniform: ScaleStep::Triple, ..ScaleSelection::default() });

        assert_relative_eq!(big, normal * 3.0, epsilon = 1e-2);
    }

    #[test]
    fn test_spot_is_placed_per_lamp() {
        let mut ctx = RecordingContext::new();
        draw_streetlights(&mut ctx, &TextureManager::new(), &ScaleSelection::default());

        let placements = ctx.count(|c| matches!(c, GlCall::Light(light, LightParam::Position(_)) if *light == SPOT_LIGHT));
        assert_eq!(placements, 2);
        assert_eq!(ctx.count(|c| matches!(c, GlCall::DrawCylinder(_))), 2);
    }

    #[test]
    fn test_lamps_mirror_across_road() {
        let mut ctx = RecordingContext::new();
        draw_streetlights(&mut ctx, &TextureManager::new(), &ScaleSelection::default());

        let shades: Vec<_> = ctx
            .calls()
            .iter()
            .filter_map(|call| match call {
                GlCall::DrawCylinder(bounds) => Some((bounds.min.x + bounds.max.x) / 2.0),
                _ => None,
            })
            .collect();
        // Pole bases sit at x = -250 and x = 250; each shade hangs towards the road centre
        assert!(shades[0] > -250.0);
        assert!(shades[1] < 250.0);
        assert_relative_eq!(shades[0], -shades[1], epsilon = 1e-2);
    }

    #[test]
    fn test_overlay_restores_projection() {
        let mut ctx = RecordingContext::new();
        let projection = Projection::new(640, 480);
        projection.apply(&mut ctx);
        let perspective = ctx.matrix(MatrixMode::Projection);

        draw_overlay(&mut ctx, &projection, &["line".to_string()]);

        assert_eq!(ctx.matrix(MatrixMode::Projection), perspective);
        assert!(ctx.calls().contains(&GlCall::Ortho2d { right: 640.0, top: 480.0 }));
        assert!(ctx.calls().contains(&GlCall::Text("line".to_string())));
    }

    #[test]
    fn test_empty_overlay_draws_nothing() {
        let mut ctx = RecordingContext::new();
        draw_overlay(&mut ctx, &Projection::new(640, 480), &[]);
        assert!(ctx.calls().is_empty());
    }
}
