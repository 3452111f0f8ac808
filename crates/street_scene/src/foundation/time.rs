//! Time management utilities

use std::time::Duration;

/// Fixed-step accumulator
///
/// Converts variable host frame times into a whole number of fixed ticks.
/// Leftover time carries over to the next call.
#[derive(Debug, Clone)]
pub struct FixedTimestep {
    step: Duration,
    accumulated: Duration,
    total_ticks: u64,
}

impl FixedTimestep {
    /// Create an accumulator that ticks every `step`
    ///
    /// A zero step is bumped to one millisecond so `accumulate` always terminates.
    pub fn new(step: Duration) -> Self {
        Self {
            step: step.max(Duration::from_millis(1)),
            accumulated: Duration::ZERO,
            total_ticks: 0,
        }
    }

    /// Add elapsed time and return how many whole ticks are now due
    pub fn accumulate(&mut self, delta: Duration) -> u32 {
        self.accumulated += delta;
        let mut ticks = 0;
        while self.accumulated >= self.step {
            self.accumulated -= self.step;
            ticks += 1;
        }
        self.total_ticks += u64::from(ticks);
        ticks
    }

    /// Drop any partially accumulated time
    pub fn reset(&mut self) {
        self.accumulated = Duration::ZERO;
    }

    /// Tick length
    pub fn step(&self) -> Duration {
        self.step
    }

    /// Time accumulated towards the next tick
    pub fn pending(&self) -> Duration {
        self.accumulated
    }

    /// Ticks produced since creation
    pub fn total_ticks(&self) -> u64 {
        self.total_ticks
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accumulate_carries_remainder() {
        let mut timestep = FixedTimestep::new(Duration::from_millis(20));
        assert_eq!(timestep.accumulate(Duration::from_millis(15)), 0);
        assert_eq!(timestep.accumulate(Duration::from_millis(15)), 1);
        assert_eq!(timestep.pending(), Duration::from_millis(10));
        assert_eq!(timestep.accumulate(Duration::from_millis(50)), 3);
        assert_eq!(timestep.total_ticks(), 4);
    }

    #[test]
    fn test_reset_discards_partial_tick() {
        let mut timestep = FixedTimestep::new(Duration::from_millis(20));
        timestep.accumulate(Duration::from_millis(19));
        timestep.reset();
        assert_eq!(timestep.accumulate(Duration::from_millis(1)), 0);
    }

    #[test]
    fn test_zero_step_is_bumped() {
        let timestep = FixedTimestep::new(Duration::ZERO);
        assert_eq!(timestep.step(), Duration::from_millis(1));
    }
}
