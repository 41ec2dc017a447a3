//! Gesture-driven axis animation for axispan.
//!
//! A [`PanController`] turns a two-dimensional drag into motion of one or two
//! animated scalars. Each axis has its own bounds, overshoot policy and
//! release behavior: free decay, snapping to a grid, or springing back to the
//! origin. Raw pointer input goes through [`nodes::input`] first.

pub mod error;
pub mod gesture_constants;
pub mod nodes;
pub mod pan;
pub mod velocity_tracker;

pub use error::{ConfigError, PanError};
pub use gesture_constants::DRAG_THRESHOLD;
pub use nodes::input::{
    DragGestureDetector, PanGestureEvent, Point, PointerDispatcher, PointerEvent,
    PointerEventKind, PointerId,
};
pub use pan::{
    Axis, AxisConfig, AxisState, Bounds, GestureClaim, GestureSnapshot, Overshoot, PanCallbacks,
    PanConfig, PanController, ParseOptionError, ReleaseDecision, ReleaseMode,
};
pub use velocity_tracker::VelocityTracker1D;

pub mod prelude {
    pub use crate::nodes::input::prelude::*;
    pub use crate::pan::{
        Axis, AxisConfig, GestureSnapshot, Overshoot, PanCallbacks, PanConfig, PanController,
        ReleaseDecision, ReleaseMode,
    };
    pub use crate::{ConfigError, PanError};
}
