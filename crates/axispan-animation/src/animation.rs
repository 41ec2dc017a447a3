//! Frame-clock driven implementation of [`AnimatedValueBackend`].
//!
//! An [`AnimatedValue`] is a shared handle: clones observe and mutate the same
//! scalar. At most one trajectory runs at a time. Each trajectory schedules
//! itself one frame ahead on the [`FrameClock`] and re-schedules until it
//! settles, so cancelling means dropping the pending registration.

use std::cell::RefCell;
use std::rc::Rc;

use axispan_core::{FrameCallbackRegistration, FrameClock};
use rustc_hash::FxHashMap;

use crate::backend::{
    AnimatedValueBackend, Subscription, TickEvent, TickListener, TrajectoryHandle,
};
use crate::decay_spec::{ExponentialDecaySpec, FloatDecayAnimationSpec};
use crate::error::AnimationError;
use crate::spring::{SpringSimulation, SpringSpec};

#[derive(Debug, Clone, Copy)]
enum Motion {
    Decay {
        spec: ExponentialDecaySpec,
        start_value: f64,
        velocity: f64,
    },
    Spring(SpringSimulation),
}

struct ActiveTrajectory {
    handle: TrajectoryHandle,
    motion: Motion,
    start_time_nanos: Option<u64>,
    last_time_nanos: Option<u64>,
    registration: Option<FrameCallbackRegistration>,
}

struct ListenerEntry {
    trajectory: TrajectoryHandle,
    callback: Rc<RefCell<TickListener>>,
}

struct AnimatedValueInner {
    clock: FrameClock,
    value: f64,
    offset: f64,
    active: Option<ActiveTrajectory>,
    next_trajectory_id: u64,
    listeners: FxHashMap<u64, ListenerEntry>,
    next_subscription_id: u64,
}

impl AnimatedValueInner {
    fn reading(&self) -> f64 {
        self.value + self.offset
    }

    fn stop_active(&mut self) -> Option<TrajectoryHandle> {
        let active = self.active.take()?;
        if let Some(registration) = active.registration {
            registration.cancel();
        }
        let handle = active.handle;
        self.listeners.retain(|_, entry| entry.trajectory != handle);
        log::trace!("stopped trajectory {}", handle.id());
        Some(handle)
    }

    fn allocate_handle(&mut self) -> TrajectoryHandle {
        let id = self.next_trajectory_id;
        self.next_trajectory_id += 1;
        TrajectoryHandle(id)
    }
}

/// Shared animated scalar driven by a [`FrameClock`].
pub struct AnimatedValue {
    inner: Rc<RefCell<AnimatedValueInner>>,
}

impl AnimatedValue {
    /// Create a value resting at `initial` with no offset.
    pub fn new(initial: f64, clock: FrameClock) -> Self {
        let inner = AnimatedValueInner {
            clock,
            value: initial,
            offset: 0.0,
            active: None,
            next_trajectory_id: 1,
            listeners: FxHashMap::default(),
            next_subscription_id: 1,
        };
        Self {
            inner: Rc::new(RefCell::new(inner)),
        }
    }

    /// Handle of the running trajectory, if any.
    pub fn active_trajectory(&self) -> Option<TrajectoryHandle> {
        self.inner.borrow().active.as_ref().map(|active| active.handle)
    }

    /// Number of live tick listeners.
    pub fn listener_count(&self) -> usize {
        self.inner.borrow().listeners.len()
    }

    fn start(&self, motion: Motion) -> Result<TrajectoryHandle, AnimationError> {
        let handle = {
            let mut inner = self.inner.borrow_mut();
            if !inner.clock.runtime_handle().is_alive() {
                return Err(AnimationError::RuntimeUnavailable);
            }
            inner.stop_active();
            let handle = inner.allocate_handle();
            inner.active = Some(ActiveTrajectory {
                handle,
                motion,
                start_time_nanos: None,
                last_time_nanos: None,
                registration: None,
            });
            handle
        };
        Self::schedule_frame(&self.inner);
        Ok(handle)
    }

    fn schedule_frame(this: &Rc<RefCell<AnimatedValueInner>>) {
        let clock = {
            let inner = this.borrow();
            match inner.active.as_ref() {
                Some(active) if active.registration.is_none() => inner.clock.clone(),
                _ => return,
            }
        };
        let weak = Rc::downgrade(this);
        let registration = clock.with_frame_nanos(move |time| {
            if let Some(strong) = weak.upgrade() {
                Self::on_frame(&strong, time);
            }
        });
        if let Some(active) = this.borrow_mut().active.as_mut() {
            active.registration = Some(registration);
        }
    }

    fn on_frame(this: &Rc<RefCell<AnimatedValueInner>>, frame_time_nanos: u64) {
        let event = {
            let mut inner = this.borrow_mut();
            let offset = inner.offset;
            let Some(active) = inner.active.as_mut() else {
                return;
            };
            if let Some(registration) = active.registration.take() {
                registration.disarm();
            }
            let start_time = *active.start_time_nanos.get_or_insert(frame_time_nanos);
            let last_time = active.last_time_nanos.replace(frame_time_nanos);

            let (reading, velocity, finished) = match &mut active.motion {
                Motion::Decay {
                    spec,
                    start_value,
                    velocity,
                } => {
                    let elapsed_millis =
                        frame_time_nanos.saturating_sub(start_time) as f64 / 1_000_000.0;
                    let x = spec.value_at(elapsed_millis, *start_value, *velocity);
                    let v = spec.velocity_at(elapsed_millis, *start_value, *velocity);
                    (x, v, v.abs() < spec.abs_velocity_threshold())
                }
                Motion::Spring(simulation) => {
                    let elapsed_millis = last_time
                        .map(|last| frame_time_nanos.saturating_sub(last) as f64 / 1_000_000.0)
                        .unwrap_or(0.0);
                    simulation.advance(elapsed_millis);
                    if simulation.is_settled() {
                        simulation.position = simulation.target;
                        simulation.velocity = 0.0;
                        (simulation.target, 0.0, true)
                    } else {
                        (simulation.position, simulation.velocity, false)
                    }
                }
            };
            let handle = active.handle;
            inner.value = reading - offset;
            if finished {
                inner.active = None;
            }
            TickEvent {
                trajectory: handle,
                value: reading,
                velocity,
                finished,
            }
        };

        if !event.finished {
            Self::schedule_frame(this);
        }
        Self::dispatch(this, event);
    }

    fn dispatch(this: &Rc<RefCell<AnimatedValueInner>>, event: TickEvent) {
        let mut targets: Vec<(u64, Rc<RefCell<TickListener>>)> = this
            .borrow()
            .listeners
            .iter()
            .filter(|(_, entry)| entry.trajectory == event.trajectory)
            .map(|(id, entry)| (*id, Rc::clone(&entry.callback)))
            .collect();
        targets.sort_by_key(|(id, _)| *id);

        for (id, callback) in targets {
            // A previous listener may have cancelled the trajectory or unsubscribed us.
            if !this.borrow().listeners.contains_key(&id) {
                continue;
            }
            let mut listener = callback.borrow_mut();
            (*listener)(event);
        }

        if event.finished {
            this.borrow_mut()
                .listeners
                .retain(|_, entry| entry.trajectory != event.trajectory);
        }
    }
}

impl AnimatedValueBackend for AnimatedValue {
    fn value(&self) -> f64 {
        self.inner.borrow().reading()
    }

    fn offset(&self) -> f64 {
        self.inner.borrow().offset
    }

    fn apply_delta(&self, delta: f64) {
        self.inner.borrow_mut().value += delta;
    }

    fn set_value(&self, value: f64) {
        let mut inner = self.inner.borrow_mut();
        inner.stop_active();
        inner.value = value - inner.offset;
    }

    fn capture_offset(&self) {
        let mut inner = self.inner.borrow_mut();
        inner.offset += inner.value;
        inner.value = 0.0;
    }

    fn flatten_offset(&self) {
        let mut inner = self.inner.borrow_mut();
        inner.value += inner.offset;
        inner.offset = 0.0;
    }

    fn start_decay(
        &self,
        velocity: f64,
        spec: ExponentialDecaySpec,
    ) -> Result<TrajectoryHandle, AnimationError> {
        if !velocity.is_finite() {
            return Err(AnimationError::InvalidVelocity { velocity });
        }
        let start_value = self.value();
        if !start_value.is_finite() {
            return Err(AnimationError::InvalidValue { value: start_value });
        }
        let handle = self.start(Motion::Decay {
            spec,
            start_value,
            velocity,
        })?;
        log::debug!(
            "decay {} from {start_value} at {velocity} units/ms",
            handle.id()
        );
        Ok(handle)
    }

    fn start_spring(
        &self,
        target: f64,
        velocity: f64,
        spec: SpringSpec,
    ) -> Result<TrajectoryHandle, AnimationError> {
        if !target.is_finite() {
            return Err(AnimationError::InvalidTarget { target });
        }
        if !velocity.is_finite() {
            return Err(AnimationError::InvalidVelocity { velocity });
        }
        let position = self.value();
        if !position.is_finite() {
            return Err(AnimationError::InvalidValue { value: position });
        }
        let handle = self.start(Motion::Spring(SpringSimulation::new(
            spec, position, target, velocity,
        )))?;
        log::debug!(
            "spring {} from {position} to {target} at {velocity} units/ms",
            handle.id()
        );
        Ok(handle)
    }

    fn cancel(&self, handle: TrajectoryHandle) {
        let mut inner = self.inner.borrow_mut();
        let is_active = inner
            .active
            .as_ref()
            .is_some_and(|active| active.handle == handle);
        if is_active {
            inner.stop_active();
        }
    }

    fn on_tick(&self, handle: TrajectoryHandle, listener: TickListener) -> Subscription {
        let mut inner = self.inner.borrow_mut();
        let id = inner.next_subscription_id;
        inner.next_subscription_id += 1;
        inner.listeners.insert(
            id,
            ListenerEntry {
                trajectory: handle,
                callback: Rc::new(RefCell::new(listener)),
            },
        );
        Subscription(id)
    }

    fn unsubscribe(&self, subscription: Subscription) {
        self.inner.borrow_mut().listeners.remove(&subscription.0);
    }

    fn is_animating(&self) -> bool {
        self.inner.borrow().active.is_some()
    }
}

impl Clone for AnimatedValue {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl std::fmt::Debug for AnimatedValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("AnimatedValue")
            .field("value", &inner.value)
            .field("offset", &inner.offset)
            .field("trajectory", &inner.active.as_ref().map(|a| a.handle))
            .finish()
    }
}

#[cfg(test)]
#[path = "tests/animation_tests.rs"]
mod tests;
