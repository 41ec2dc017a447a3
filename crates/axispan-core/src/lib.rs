//! Cooperative runtime for the axispan gesture controller.
//!
//! A single-threaded frame-callback queue plus a [`FrameClock`] façade.
//! Trajectories schedule themselves one frame at a time and are cancelled by
//! dropping their [`FrameCallbackRegistration`].

mod frame_clock;
mod runtime;

pub use frame_clock::{FrameCallbackRegistration, FrameClock};
pub use runtime::{Runtime, RuntimeHandle};

pub(crate) type FrameCallbackId = u64;

/// Nanoseconds per millisecond, for hosts that keep frame time in millis.
pub const NANOS_PER_MILLI: u64 = 1_000_000;
