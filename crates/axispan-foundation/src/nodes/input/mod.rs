//! Pointer input: raw events, their queue, and the drag detector that turns
//! them into pan gesture phases.

pub mod dispatcher;
pub mod drag;
pub mod types;

pub use dispatcher::PointerDispatcher;
pub use drag::{DragGestureDetector, PanGestureEvent};
pub use types::{Point, PointerEvent, PointerEventKind, PointerId};

pub mod prelude {
    pub use super::dispatcher::PointerDispatcher;
    pub use super::drag::{DragGestureDetector, PanGestureEvent};
    pub use super::types::{Point, PointerEvent, PointerEventKind, PointerId};
}
