//! The pan controller and its building blocks.

use std::fmt;

pub mod axis_state;
pub mod callbacks;
pub mod config;
pub mod controller;
mod session;

pub use axis_state::AxisState;
pub use callbacks::{GestureClaim, GestureSnapshot, PanCallbacks, ReleaseDecision};
pub use config::{AxisConfig, Bounds, Overshoot, PanConfig, ParseOptionError, ReleaseMode};
pub use controller::PanController;

/// One of the two independently animated axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
}

impl Axis {
    pub const ALL: [Axis; 2] = [Axis::X, Axis::Y];
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::X => f.write_str("x"),
            Axis::Y => f.write_str("y"),
        }
    }
}
