//! Capability contract for the animated scalar a gesture drives.
//!
//! The controller never owns the value directly; it talks to a backend through
//! this trait so hosts can plug in their own animation engine. [`AnimatedValue`]
//! is the frame-clock implementation shipped with this crate.
//!
//! [`AnimatedValue`]: crate::AnimatedValue

use crate::decay_spec::ExponentialDecaySpec;
use crate::error::AnimationError;
use crate::spring::SpringSpec;

/// Identifies one started trajectory on one value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TrajectoryHandle(pub(crate) u64);

impl TrajectoryHandle {
    pub fn id(&self) -> u64 {
        self.0
    }
}

/// Identifies one tick listener registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Subscription(pub(crate) u64);

/// What a trajectory reports on every frame it advances.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickEvent {
    pub trajectory: TrajectoryHandle,
    /// Value as returned by [`AnimatedValueBackend::value`] after this tick.
    pub value: f64,
    /// Instantaneous velocity in units/ms.
    pub velocity: f64,
    /// True on the last tick; listeners are dropped right after it.
    pub finished: bool,
}

pub type TickListener = Box<dyn FnMut(TickEvent) + 'static>;

/// Mutable scalar with offset bookkeeping and cancellable trajectories.
///
/// Methods take `&self`: implementations are shared handles, the way an
/// animated value is shared between the gesture layer and whatever renders it.
pub trait AnimatedValueBackend {
    /// Current reading, offset included.
    fn value(&self) -> f64;

    /// Offset currently captured.
    fn offset(&self) -> f64;

    fn apply_delta(&self, delta: f64);

    /// Set the reading to `value` (offset kept). Stops any running trajectory.
    fn set_value(&self, value: f64);

    /// Move the live value into the offset and zero the live part.
    fn capture_offset(&self);

    /// Merge the offset back into the live value. Leaves the reading unchanged.
    fn flatten_offset(&self);

    /// Start a free decay. Any running trajectory is cancelled first.
    fn start_decay(
        &self,
        velocity: f64,
        spec: ExponentialDecaySpec,
    ) -> Result<TrajectoryHandle, AnimationError>;

    /// Start a spring toward `target`. Any running trajectory is cancelled first.
    fn start_spring(
        &self,
        target: f64,
        velocity: f64,
        spec: SpringSpec,
    ) -> Result<TrajectoryHandle, AnimationError>;

    /// Stop `handle` if it is still running. Unknown handles are ignored.
    fn cancel(&self, handle: TrajectoryHandle);

    /// Call `listener` on every tick of `handle`.
    fn on_tick(&self, handle: TrajectoryHandle, listener: TickListener) -> Subscription;

    fn unsubscribe(&self, subscription: Subscription);

    fn is_animating(&self) -> bool;
}
