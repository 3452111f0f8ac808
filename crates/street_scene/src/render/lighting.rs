//! Lighting system
//!
//! Two fixed light slots:
//! - **Light 0**: a global point light high above the scene whose ambient term
//!   is user-adjustable (palette presets or per-channel nudges)
//! - **Light 1**: a warm spotlight shared by both streetlights; its position
//!   and direction are re-issued under each lamp's transform while drawing
//!
//! Light parameters are immutable [`LightSource`] values handed to
//! [`configure_light`]. The adjustable ambient color is the only mutable
//! lighting state and lives in [`LightingController`].

use crate::foundation::math::{Rgba, Vec3};
use super::context::{Capability, GraphicsContext, LightId, LightParam};

/// Slot of the global light
pub const GLOBAL_LIGHT: LightId = LightId::Light0;

/// Slot of the streetlight spot
pub const SPOT_LIGHT: LightId = LightId::Light1;

/// Light-model ambient term applied to the whole scene
pub const GLOBAL_AMBIENT: Rgba = Rgba::gray(0.3);

/// Amount one ambient nudge adds to a channel
pub const AMBIENT_NUDGE: f32 = 0.1;

/// Spotlight cone parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpotCone {
    /// Half-angle in degrees; 180 means no cone
    pub cutoff: f32,
    /// Falloff exponent towards the cone edge
    pub exponent: f32,
}

impl SpotCone {
    /// Omnidirectional light
    pub const NONE: Self = Self { cutoff: 180.0, exponent: 0.0 };
}

/// Immutable description of one light slot
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightSource {
    /// Homogeneous position, if fixed at setup time
    pub position: Option<[f32; 4]>,
    /// Ambient intensity
    pub ambient: Rgba,
    /// Diffuse intensity
    pub diffuse: Rgba,
    /// Specular intensity
    pub specular: Rgba,
    /// Cone
    pub cone: SpotCone,
}

impl LightSource {
    /// Global light with the given ambient term
    pub const fn global(ambient: Rgba) -> Self {
        Self {
            position: Some([100.0, 500.0, 200.0, 1.0]),
            ambient,
            diffuse: Rgba::gray(0.7),
            specular: Rgba::gray(0.8),
            cone: SpotCone::NONE,
        }
    }

    /// Warm streetlight spot; positioned per lamp while drawing
    pub const fn streetlight() -> Self {
        let warm = Rgba::rgb(1.0, 1.0, 0.0);
        Self {
            position: None,
            ambient: warm,
            diffuse: warm,
            specular: warm,
            cone: SpotCone { cutoff: 40.0, exponent: 5.0 },
        }
    }
}

/// Write every parameter of `source` into `light`
pub fn configure_light(ctx: &mut dyn GraphicsContext, light: LightId, source: &LightSource) {
    if let Some(position) = source.position {
        ctx.light(light, LightParam::Position(position));
    }
    ctx.light(light, LightParam::Ambient(source.ambient));
    ctx.light(light, LightParam::Diffuse(source.diffuse));
    ctx.light(light, LightParam::Specular(source.specular));
    ctx.light(light, LightParam::SpotCutoff(source.cone.cutoff));
    if source.cone.cutoff < SpotCone::NONE.cutoff {
        ctx.light(light, LightParam::SpotExponent(source.cone.exponent));
    }
}

/// Named ambient presets for the global light
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AmbientPalette {
    /// Dim neutral
    #[default]
    White,
    /// Yellow
    Yellow,
    /// Red
    Red,
    /// Green
    Green,
    /// Blue
    Blue,
}

impl AmbientPalette {
    /// All presets in selection order
    pub const ALL: [Self; 5] = [Self::White, Self::Yellow, Self::Red, Self::Green, Self::Blue];

    /// Ambient color of the preset
    pub const fn color(self) -> Rgba {
        match self {
            Self::White => Rgba::gray(0.1),
            Self::Yellow => Rgba::rgb(0.5, 0.5, 0.0),
            Self::Red => Rgba::rgb(0.5, 0.0, 0.0),
            Self::Green => Rgba::rgb(0.0, 0.5, 0.0),
            Self::Blue => Rgba::rgb(0.0, 0.0, 0.5),
        }
    }
}

/// Adjustable color channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorChannel {
    /// Red
    Red,
    /// Green
    Green,
    /// Blue
    Blue,
}

/// Next value of a nudged ambient channel
///
/// Reaching 1.0 wraps to 0.0 instead of clamping; the result is never negative.
pub fn wrap_channel(value: f32, delta: f32) -> f32 {
    let next = value + delta;
    if next >= 1.0 {
        0.0
    } else {
        next.max(0.0)
    }
}

/// Owner of the adjustable lighting state
#[derive(Debug, Clone)]
pub struct LightingController {
    ambient: Rgba,
}

impl Default for LightingController {
    fn default() -> Self {
        Self::new()
    }
}

impl LightingController {
    /// Controller starting from the white preset
    pub const fn new() -> Self {
        Self { ambient: AmbientPalette::White.color() }
    }

    /// Current ambient term of the global light
    pub const fn ambient(&self) -> Rgba {
        self.ambient
    }

    /// Configure both lights and enable lighting
    pub fn setup(&self, ctx: &mut dyn GraphicsContext) {
        ctx.light_model_ambient(GLOBAL_AMBIENT);

        configure_light(ctx, GLOBAL_LIGHT, &LightSource::global(self.ambient));
        ctx.enable(Capability::Light(GLOBAL_LIGHT));

        configure_light(ctx, SPOT_LIGHT, &LightSource::streetlight());
        ctx.enable(Capability::Light(SPOT_LIGHT));

        ctx.enable(Capability::Lighting);
        log::debug!("Lighting configured with ambient {:?}", self.ambient);
    }

    /// Replace the global ambient term with a preset
    pub fn set_ambient_palette(&mut self, ctx: &mut dyn GraphicsContext, palette: AmbientPalette) {
        self.apply_ambient(ctx, palette.color());
    }

    /// Nudge one ambient channel, wrapping at 1.0
    pub fn adjust_ambient_channel(&mut self, ctx: &mut dyn GraphicsContext, channel: ColorChannel, delta: f32) {
        let mut ambient = self.ambient;
        let value = match channel {
            ColorChannel::Red => &mut ambient.r,
            ColorChannel::Green => &mut ambient.g,
            ColorChannel::Blue => &mut ambient.b,
        };
        *value = wrap_channel(*value, delta);
        self.apply_ambient(ctx, ambient);
    }

    /// Point the spotlight straight down from just above the current origin
    pub fn place_spot(ctx: &mut dyn GraphicsContext) {
        ctx.light(SPOT_LIGHT, LightParam::SpotDirection(Vec3::new(0.0, -1.0, 0.0)));
        ctx.light(SPOT_LIGHT, LightParam::Position([0.0, 4.0, 0.0, 1.0]));
    }

    fn apply_ambient(&mut self, ctx: &mut dyn GraphicsContext, ambient: Rgba) {
        self.ambient = ambient;
        ctx.light(GLOBAL_LIGHT, LightParam::Ambient(ambient));
        log::debug!("Global ambient set to {:?}", ambient);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::recording::{GlCall, RecordingContext};
    use approx::assert_relative_eq;

    #[test]
    fn test_ten_nudges_wrap_once() {
        let mut ctx = RecordingContext::new();
        let mut lighting = LightingController::new();
        let mut seen = Vec::new();

        for _ in 0..10 {
            lighting.adjust_ambient_channel(&mut ctx, ColorChannel::Red, AMBIENT_NUDGE);
            seen.push(lighting.ambient().r);
        }

        let expected = [0.2, 0.3, 0.4, 0.5, 0.6, 0.7, 0.8, 0.9, 0.0, 0.1];
        for (value, expected) in seen.iter().zip(expected) {
            assert_relative_eq!(*value, expected, epsilon = 1e-5);
        }
        assert_eq!(seen[8], 0.0);
    }

    #[test]
    fn test_wrap_threshold_is_inclusive() {
        assert_eq!(wrap_channel(0.5, 0.5), 0.0);
        assert_relative_eq!(wrap_channel(0.5, 0.49), 0.99, epsilon = 1e-6);
        assert_eq!(wrap_channel(0.05, -0.1), 0.0);
    }

    #[test]
    fn test_nudge_touches_only_its_channel() {
        let mut ctx = RecordingContext::new();
        let mut lighting = LightingController::new();
        lighting.adjust_ambient_channel(&mut ctx, ColorChannel::Blue, AMBIENT_NUDGE);

        let ambient = lighting.ambient();
        assert_relative_eq!(ambient.r, 0.1);
        assert_relative_eq!(ambient.g, 0.1);
        assert_relative_eq!(ambient.b, 0.2);
        assert_eq!(ctx.calls(), &[GlCall::Light(GLOBAL_LIGHT, LightParam::Ambient(ambient))]);
    }

    #[test]
    fn test_palette_then_nudge_last_write_wins() {
        let mut ctx = RecordingContext::new();
        let mut lighting = LightingController::new();

        lighting.set_ambient_palette(&mut ctx, AmbientPalette::Red);
        assert_eq!(lighting.ambient(), Rgba::rgb(0.5, 0.0, 0.0));

        lighting.adjust_ambient_channel(&mut ctx, ColorChannel::Green, AMBIENT_NUDGE);
        assert_relative_eq!(lighting.ambient().r, 0.5);
        assert_relative_eq!(lighting.ambient().g, 0.1);

        lighting.set_ambient_palette(&mut ctx, AmbientPalette::Blue);
        assert_eq!(lighting.ambient(), AmbientPalette::Blue.color());
    }

    #[test]
    fn test_setup_configures_spot_cone() {
        let mut ctx = RecordingContext::new();
        LightingController::new().setup(&mut ctx);

        assert!(ctx.calls().contains(&GlCall::Light(SPOT_LIGHT, LightParam::SpotCutoff(40.0))));
        assert!(ctx.calls().contains(&GlCall::Light(SPOT_LIGHT, LightParam::SpotExponent(5.0))));
        assert!(ctx.calls().contains(&GlCall::Light(GLOBAL_LIGHT, LightParam::SpotCutoff(180.0))));
        assert!(!ctx.calls().contains(&GlCall::Light(GLOBAL_LIGHT, LightParam::SpotExponent(0.0))));
        assert_eq!(ctx.calls().last(), Some(&GlCall::Enable(Capability::Lighting)));
    }
}
