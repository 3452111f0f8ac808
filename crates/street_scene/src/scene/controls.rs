//! Host input as scene changes
//!
//! The host maps keys and widgets to [`SceneCommand`]s; [`Scene::apply`]
//! carries them out. Camera and ambient-nudge commands are ignored while the
//! animation runs, so the view stays put during the drive-by.
//!
//! [`Scene::apply`]: crate::scene::Scene::apply

use crate::render::lighting::{AmbientPalette, ColorChannel, AMBIENT_NUDGE};
use super::scaling::ScaleStep;

/// Degrees per pitch or yaw command
pub const ORBIT_STEP: f32 = 5.0;

/// World units per dolly command
pub const DOLLY_STEP: f32 = 50.0;

/// A single user-driven change
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SceneCommand {
    /// Change the pitch by this many degrees
    Pitch(f32),
    /// Change the yaw by this many degrees
    Yaw(f32),
    /// Change the dolly distance
    Dolly(f32),
    /// Nudge one ambient channel
    NudgeAmbient(ColorChannel, f32),
    /// Select an ambient preset
    SelectPalette(AmbientPalette),
    /// Select the streetlight height scale
    SelectVerticalScale(ScaleStep),
    /// Select the shared uniform scale
    SelectUniformScale(ScaleStep),
    /// Start or stop the animation
    ToggleAnimation,
}

impl SceneCommand {
    /// Tilt the view down
    pub const PITCH_DOWN: Self = Self::Pitch(-ORBIT_STEP);
    /// Tilt the view up
    pub const PITCH_UP: Self = Self::Pitch(ORBIT_STEP);
    /// Turn left
    pub const YAW_LEFT: Self = Self::Yaw(-ORBIT_STEP);
    /// Turn right
    pub const YAW_RIGHT: Self = Self::Yaw(ORBIT_STEP);
    /// Move closer
    pub const DOLLY_IN: Self = Self::Dolly(-DOLLY_STEP);
    /// Move away
    pub const DOLLY_OUT: Self = Self::Dolly(DOLLY_STEP);

    /// Nudge a channel by the standard increment
    pub const fn nudge(channel: ColorChannel) -> Self {
        Self::NudgeAmbient(channel, AMBIENT_NUDGE)
    }

    /// Whether the command is dropped while the animation runs
    pub const fn blocked_while_running(&self) -> bool {
        matches!(self, Self::Pitch(_) | Self::Yaw(_) | Self::Dolly(_) | Self::NudgeAmbient(..))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blocking_rules() {
        assert!(SceneCommand::PITCH_UP.blocked_while_running());
        assert!(SceneCommand::DOLLY_IN.blocked_while_running());
        assert!(SceneCommand::nudge(ColorChannel::Red).blocked_while_running());
        assert!(!SceneCommand::ToggleAnimation.blocked_while_running());
        assert!(!SceneCommand::SelectPalette(AmbientPalette::Green).blocked_while_running());
        assert!(!SceneCommand::SelectUniformScale(ScaleStep::Triple).blocked_while_running());
    }
}
