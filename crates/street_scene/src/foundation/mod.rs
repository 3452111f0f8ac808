//! Shared building blocks
//!
//! - [`math`]: nalgebra aliases, colors and normal helpers
//! - [`time`]: fixed-step accumulation of host frame time
//! - [`logging`]: log macros and logger setup

pub mod math;
pub mod time;
pub mod logging;
