//! # Model Animation
//!
//! The primary model drives towards the camera along the road, turns a quarter
//! circle and leaves along the cross street, then starts over. Motion happens
//! in fixed 20 ms ticks; the host only reports elapsed time through
//! [`AnimationController::advance`].
//!
//! ## Phases
//!
//! ```text
//! Idle --start--> Approaching --z < -13--> Turning --> Departing --x <= -30--+
//!                      ^                                                     |
//!                      +-------------------- reset --------------------------+
//! ```
//!
//! Stopping from any phase resets the path and returns to `Idle`.

use std::time::Duration;

use crate::foundation::time::FixedTimestep;

/// Tick length of the animation
pub const TICK: Duration = Duration::from_millis(20);

/// Starting X offset
pub const START_X: f32 = -3.0;
/// Starting Z offset
pub const START_Z: f32 = 15.0;
/// Z travelled per approaching tick
pub const APPROACH_STEP: f32 = 0.3;
/// Z the model must pass before it turns
pub const TURN_Z: f32 = -13.0;
/// Heading after the turn, in degrees about Y
pub const TURN_ANGLE: f32 = 90.0;
/// X travelled per departing tick
pub const DEPART_STEP: f32 = 0.6;
/// X at which the path restarts
pub const END_X: f32 = -30.0;

/// Where the animated model currently is along its path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnimationPhase {
    /// Not running
    Idle,
    /// Moving towards -Z
    Approaching,
    /// Turning onto the cross street
    Turning,
    /// Moving towards -X
    Departing,
}

/// Offsets and heading applied to the primary model
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationState {
    /// X offset
    pub x: f32,
    /// Z offset
    pub z: f32,
    /// Heading in degrees about Y
    pub rotation: f32,
}

impl AnimationState {
    /// Start of the path
    pub const INITIAL: Self = Self { x: START_X, z: START_Z, rotation: 0.0 };
}

impl Default for AnimationState {
    fn default() -> Self {
        Self::INITIAL
    }
}

/// Fixed-step state machine moving the primary model
#[derive(Debug, Clone)]
pub struct AnimationController {
    phase: AnimationPhase,
    state: AnimationState,
    timestep: FixedTimestep,
}

impl Default for AnimationController {
    fn default() -> Self {
        Self::new()
    }
}

impl AnimationController {
    /// Stopped controller at the start of the path
    pub fn new() -> Self {
        Self {
            phase: AnimationPhase::Idle,
            state: AnimationState::INITIAL,
            timestep: FixedTimestep::new(TICK),
        }
    }

    /// Current phase
    pub fn phase(&self) -> AnimationPhase {
        self.phase
    }

    /// Current offsets and heading
    pub fn state(&self) -> AnimationState {
        self.state
    }

    /// Whether the path is being followed
    pub fn is_running(&self) -> bool {
        self.phase != AnimationPhase::Idle
    }

    /// Start or stop the animation
    ///
    /// Starting an idle controller begins approaching from the start of the
    /// path. Stopping resets the path immediately and drops any partial tick.
    pub fn set_running(&mut self, running: bool) {
        match (running, self.is_running()) {
            (true, false) => {
                self.reset();
                self.phase = AnimationPhase::Approaching;
                log::debug!("Animation started");
            }
            (false, true) => {
                self.reset();
                self.phase = AnimationPhase::Idle;
                log::debug!("Animation stopped");
            }
            _ => {}
        }
    }

    /// Put the model back at the start of the path without changing the phase
    pub fn reset(&mut self) {
        self.state = AnimationState::INITIAL;
        self.timestep.reset();
    }

    /// Feed elapsed host time; returns how many ticks ran
    pub fn advance(&mut self, elapsed: Duration) -> u32 {
        if !self.is_running() {
            return 0;
        }
        let ticks = self.timestep.accumulate(elapsed);
        for _ in 0..ticks {
            self.tick();
        }
        ticks
    }

    /// Run one fixed step
    pub fn tick(&mut self) {
        match self.phase {
            AnimationPhase::Idle => {}
            AnimationPhase::Approaching => {
                self.state.z -= APPROACH_STEP;
                if self.state.z < TURN_Z {
                    self.phase = AnimationPhase::Turning;
                }
            }
            AnimationPhase::Turning => {
                self.state.rotation = TURN_ANGLE;
                self.phase = AnimationPhase::Departing;
            }
            AnimationPhase::Departing => {
                self.state.x -= DEPART_STEP;
                if self.state.x <= END_X {
                    self.state = AnimationState::INITIAL;
                    self.phase = AnimationPhase::Approaching;
                    log::trace!("Animation path restarted");
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn run_until(controller: &mut AnimationController, phase: AnimationPhase) -> usize {
        for ticks in 1..=1000 {
            controller.tick();
            if controller.phase() == phase {
                return ticks;
            }
        }
        panic!("never reached {:?}", phase);
    }

    #[test]
    fn test_idle_controller_ignores_time() {
        let mut controller = AnimationController::new();
        assert_eq!(controller.advance(Duration::from_secs(1)), 0);
        assert_eq!(controller.state(), AnimationState::INITIAL);
    }

    #[test]
    fn test_advance_runs_whole_ticks() {
        let mut controller = AnimationController::new();
        controller.set_running(true);

        assert_eq!(controller.advance(Duration::from_millis(50)), 2);
        assert_relative_eq!(controller.state().z, START_Z - 2.0 * APPROACH_STEP, epsilon = 1e-5);
        assert_eq!(controller.advance(Duration::from_millis(10)), 1);
    }

    #[test]
    fn test_turn_happens_past_threshold() {
        let mut controller = AnimationController::new();
        controller.set_running(true);

        let ticks = run_until(&mut controller, AnimationPhase::Turning);
        assert!((93..=95).contains(&ticks));
        assert!(controller.state().z < TURN_Z);
        assert_eq!(controller.state().rotation, 0.0);

        controller.tick();
        assert_eq!(controller.phase(), AnimationPhase::Departing);
        assert_eq!(controller.state().rotation, TURN_ANGLE);
    }

    #[test]
    fn test_full_cycle_returns_to_start() {
        let mut controller = AnimationController::new();
        controller.set_running(true);

        run_until(&mut controller, AnimationPhase::Departing);
        let departing_ticks = run_until(&mut controller, AnimationPhase::Approaching);

        assert!((44..=46).contains(&departing_ticks));
        assert_eq!(controller.state(), AnimationState { x: -3.0, z: 15.0, rotation: 0.0 });
    }

    #[test]
    fn test_stop_resets_mid_cycle() {
        let mut controller = AnimationController::new();
        controller.set_running(true);
        run_until(&mut controller, AnimationPhase::Departing);
        controller.tick();
        controller.advance(Duration::from_millis(15));

        controller.set_running(false);
        assert_eq!(controller.phase(), AnimationPhase::Idle);
        assert_eq!(controller.state(), AnimationState::INITIAL);

        controller.set_running(true);
        assert_eq!(controller.advance(Duration::from_millis(15)), 0);
    }

    #[test]
    fn test_start_twice_keeps_progress() {
        let mut controller = AnimationController::new();
        controller.set_running(true);
        controller.tick();
        controller.set_running(true);
        assert_relative_eq!(controller.state().z, START_Z - APPROACH_STEP, epsilon = 1e-5);
    }
}
