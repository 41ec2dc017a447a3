//! Animation system for axispan
//!
//! Provides the exponential decay model and momentum solver used to predict
//! where a released drag comes to rest, spring physics for settling onto a
//! target, and [`AnimatedValue`], a frame-clock driven scalar implementing the
//! [`AnimatedValueBackend`] contract the gesture layer talks to.

mod animation;
mod backend;
pub mod decay_spec;
mod error;
mod spring;

pub use animation::AnimatedValue;
pub use backend::{AnimatedValueBackend, Subscription, TickEvent, TickListener, TrajectoryHandle};
pub use decay_spec::{
    closest_center, ExponentialDecaySpec, FloatDecayAnimationSpec, MomentumSolver,
    DEFAULT_DECELERATION, FRAME_MILLIS,
};
pub use error::AnimationError;
pub use spring::SpringSpec;
