//! Shared gesture constants for pointer handling and pan defaults.
//!
//! Distances are in logical pixels, velocities in pixels per millisecond.

/// Drag threshold in logical pixels.
///
/// A press that has not moved further than this from its down position is
/// still a tap; once crossed, the default move predicate claims the gesture.
pub const DRAG_THRESHOLD: f64 = 8.0;

/// Direction lock distance used when none is configured.
///
/// Zero resolves the lock on the first move that has any displacement.
pub const DEFAULT_DIRECTION_LOCK_DISTANCE: f64 = 0.0;

/// Overshoot reduction factor used when none is configured. A factor of one
/// applies the full out-of-bounds displacement.
pub const DEFAULT_OVERSHOOT_REDUCTION_FACTOR: f64 = 1.0;
