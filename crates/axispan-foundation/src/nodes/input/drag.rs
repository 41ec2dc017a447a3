//! Drag detection: raw pointer events in, pan gesture phases out.
//!
//! Tracks a single pointer. Displacements are cumulative from where the
//! pointer went down; velocities come from a [`VelocityTracker1D`] per axis.
//! Whether a press becomes a gesture is up to the [`GestureClaim`] passed in.

use smallvec::SmallVec;

use crate::nodes::input::types::{Point, PointerEvent, PointerEventKind, PointerId};
use crate::pan::{GestureClaim, GestureSnapshot};
use crate::velocity_tracker::VelocityTracker1D;

/// Gesture phase produced by [`DragGestureDetector`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PanGestureEvent {
    Grant,
    Move(GestureSnapshot),
    Release(GestureSnapshot),
}

#[derive(Debug, Clone)]
struct TrackedPointer {
    id: PointerId,
    origin: Point,
    granted: bool,
    tracker_x: VelocityTracker1D,
    tracker_y: VelocityTracker1D,
}

impl TrackedPointer {
    fn record(&mut self, event: &PointerEvent) {
        let time = event.time_ms as i64;
        self.tracker_x.add_data_point(time, event.position.x);
        self.tracker_y.add_data_point(time, event.position.y);
    }

    fn snapshot(&self, position: Point, with_velocity: bool) -> GestureSnapshot {
        let delta = position - self.origin;
        let (vx, vy) = if with_velocity {
            (
                self.tracker_x.calculate_velocity(),
                self.tracker_y.calculate_velocity(),
            )
        } else {
            (0.0, 0.0)
        };
        GestureSnapshot {
            dx: delta.x,
            dy: delta.y,
            x0: self.origin.x,
            y0: self.origin.y,
            vx,
            vy,
        }
    }
}

/// Turns one pointer's Down/Move/Up/Cancel stream into grant, move, and
/// release phases. Every granted gesture ends in exactly one release.
#[derive(Debug, Clone, Default)]
pub struct DragGestureDetector {
    pointer: Option<TrackedPointer>,
}

impl DragGestureDetector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_tracking(&self) -> bool {
        self.pointer.is_some()
    }

    pub fn is_granted(&self) -> bool {
        self.pointer.as_ref().is_some_and(|pointer| pointer.granted)
    }

    /// Forget the tracked pointer without emitting a release.
    pub fn reset(&mut self) {
        self.pointer = None;
    }

    pub fn on_pointer_event(
        &mut self,
        event: &PointerEvent,
        claim: &mut dyn GestureClaim,
    ) -> SmallVec<[PanGestureEvent; 2]> {
        let mut out = SmallVec::new();
        match event.kind {
            PointerEventKind::Down => {
                if let Some(pointer) = self.pointer.as_ref() {
                    log::trace!(
                        "ignoring pointer {} while tracking pointer {}",
                        event.id,
                        pointer.id
                    );
                    return out;
                }
                let mut pointer = TrackedPointer {
                    id: event.id,
                    origin: event.position,
                    granted: false,
                    tracker_x: VelocityTracker1D::new(),
                    tracker_y: VelocityTracker1D::new(),
                };
                pointer.record(event);
                if claim.claim_on_start() {
                    pointer.granted = true;
                    out.push(PanGestureEvent::Grant);
                }
                self.pointer = Some(pointer);
            }
            PointerEventKind::Move => {
                let Some(pointer) = self.tracked_mut(event.id) else {
                    return out;
                };
                pointer.record(event);
                let snapshot = pointer.snapshot(event.position, true);
                if !pointer.granted {
                    if !claim.claim_on_move(&snapshot) {
                        return out;
                    }
                    pointer.granted = true;
                    out.push(PanGestureEvent::Grant);
                }
                out.push(PanGestureEvent::Move(snapshot));
            }
            PointerEventKind::Up | PointerEventKind::Cancel => {
                if self.tracked_mut(event.id).is_none() {
                    return out;
                }
                let Some(mut pointer) = self.pointer.take() else {
                    return out;
                };
                let fling = event.kind == PointerEventKind::Up;
                if fling {
                    pointer.record(event);
                }
                if pointer.granted {
                    out.push(PanGestureEvent::Release(
                        pointer.snapshot(event.position, fling),
                    ));
                }
            }
        }
        out
    }

    fn tracked_mut(&mut self, id: PointerId) -> Option<&mut TrackedPointer> {
        self.pointer.as_mut().filter(|pointer| pointer.id == id)
    }
}
