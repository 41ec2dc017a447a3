//! Testing utilities for axispan.
//!
//! [`PanTestRule`] owns a runtime and a simulated frame clock so tests can
//! drive gestures and trajectories deterministically, one 16 ms frame at a
//! time, without a platform event loop.

mod assertions;
mod testing;

pub use assertions::*;
pub use testing::*;
