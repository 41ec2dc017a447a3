//! One axis of a pan gesture: drag deltas with overshoot resistance, and the
//! release state machine (decay, snap, spring-origin, overshoot recovery).
//!
//! Every trajectory an axis starts is owned through a single
//! `ActiveTrajectory`. Starting another cancels the backend trajectory and
//! drops its tick subscription first, so two processes never write the same
//! value. What a tick should do is decided by the `TrajectoryWatch` captured
//! when the trajectory was started.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use axispan_animation::{
    AnimatedValueBackend, AnimationError, MomentumSolver, SpringSpec, Subscription, TickEvent,
    TrajectoryHandle,
};
use smallvec::SmallVec;

use crate::error::PanError;
use crate::pan::callbacks::PanCallbacks;
use crate::pan::config::{AxisConfig, Bounds, Overshoot, PanConfig, ReleaseMode};
use crate::pan::Axis;

/// State shared by both axes of one controller.
pub(crate) struct PanShared {
    pub(crate) solver: MomentumSolver,
    pub(crate) overshoot_spring: SpringSpec,
    pub(crate) spring_origin: SpringSpec,
    pub(crate) snap_spring: SpringSpec,
    pub(crate) callbacks: Rc<RefCell<PanCallbacks>>,
    /// Backend failures raised from inside a tick, where nobody can receive a `Result`.
    pub(crate) deferred_errors: RefCell<SmallVec<[PanError; 2]>>,
}

impl PanShared {
    pub(crate) fn new(config: &PanConfig, callbacks: Rc<RefCell<PanCallbacks>>) -> Self {
        Self {
            solver: MomentumSolver::new(config.decay),
            overshoot_spring: config.overshoot_spring,
            spring_origin: config.spring_origin,
            snap_spring: config.snap_spring,
            callbacks,
            deferred_errors: RefCell::new(SmallVec::new()),
        }
    }

    pub(crate) fn take_deferred_errors(&self) -> SmallVec<[PanError; 2]> {
        std::mem::take(&mut *self.deferred_errors.borrow_mut())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum WatchKind {
    /// Clear the active slot once the trajectory finishes.
    Settle,
    /// Free decay; leaving the bounds hands over to overshoot recovery.
    Decay { release_velocity: f64 },
    /// Decay heading for a grid point; entering the window hands over to the snap spring.
    SnapDecay {
        target: f64,
        half_window: f64,
        crossing_velocity: f64,
    },
    /// Spring landing on a grid point.
    SnapSpring { target: f64 },
}

/// Per-trajectory tick policy.
#[derive(Debug, Clone, Copy, PartialEq)]
struct TrajectoryWatch {
    bounds: Bounds,
    overshoot: Overshoot,
    kind: WatchKind,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct ActiveTrajectory {
    handle: TrajectoryHandle,
    subscription: Subscription,
}

struct AxisInner<B: AnimatedValueBackend> {
    axis: Axis,
    config: AxisConfig,
    value: B,
    shared: Rc<PanShared>,
    active: Option<ActiveTrajectory>,
    /// Overshoot notifications raised while the axis was borrowed; fired once it is released.
    pending_overshoots: usize,
    this: Weak<RefCell<AxisInner<B>>>,
}

/// Live state of one axis.
pub struct AxisState<B: AnimatedValueBackend + 'static> {
    inner: Rc<RefCell<AxisInner<B>>>,
}

impl<B: AnimatedValueBackend + 'static> AxisState<B> {
    pub(crate) fn new(axis: Axis, config: AxisConfig, value: B, shared: Rc<PanShared>) -> Self {
        let inner = Rc::new_cyclic(|this| {
            RefCell::new(AxisInner {
                axis,
                config,
                value,
                shared,
                active: None,
                pending_overshoots: 0,
                this: this.clone(),
            })
        });
        Self { inner }
    }

    pub fn axis(&self) -> Axis {
        self.inner.borrow().axis
    }

    pub fn config(&self) -> AxisConfig {
        self.inner.borrow().config
    }

    /// Current reading of the animated value.
    pub fn value(&self) -> f64 {
        self.inner.borrow().value.value()
    }

    /// Trajectory this axis currently owns, if any.
    pub fn active_trajectory(&self) -> Option<TrajectoryHandle> {
        self.inner.borrow().active.map(|active| active.handle)
    }

    pub fn is_settling(&self) -> bool {
        self.inner.borrow().active.is_some()
    }

    pub(crate) fn grant(&self) {
        let mut inner = self.inner.borrow_mut();
        inner.cancel_active();
        match inner.config.mode {
            Some(ReleaseMode::SpringOrigin) => inner.value.set_value(0.0),
            Some(ReleaseMode::Snap | ReleaseMode::Decay) => inner.value.capture_offset(),
            None => {}
        }
    }

    /// Apply one incremental drag delta, resisting or stopping at the bounds.
    pub(crate) fn apply_move(&self, delta: f64) {
        let inner = self.inner.borrow();
        if !delta.is_finite() {
            log::warn!("{} ignoring non-finite drag delta {delta}", inner.axis);
            return;
        }
        let current = inner.value.value();
        let candidate = constrain_drag(current + delta, &inner.config);
        inner.value.apply_delta(candidate - current);
    }

    pub(crate) fn release(&self, velocity: f64) -> Result<(), PanError> {
        let result = self.inner.borrow_mut().release(velocity);
        AxisInner::fire_pending_overshoots(&self.inner);
        result
    }
}

impl<B: AnimatedValueBackend + 'static> AxisInner<B> {
    fn release(&mut self, velocity: f64) -> Result<(), PanError> {
        self.cancel_active();
        self.value.flatten_offset();
        let value = self.value.value();
        log::debug!("{} released at {value} with {velocity} units/ms", self.axis);

        if let Some(bound) = self.config.bounds.violated_bound(value) {
            return self.recover_overshoot(bound, velocity);
        }
        match self.config.mode {
            None => Ok(()),
            Some(ReleaseMode::Decay) => self.start_decay(
                velocity,
                WatchKind::Decay {
                    release_velocity: velocity,
                },
            ),
            Some(ReleaseMode::Snap) => self.start_snap(value, velocity),
            Some(ReleaseMode::SpringOrigin) => {
                let spec = self.shared.spring_origin;
                self.start_spring(0.0, velocity, spec, WatchKind::Settle)
            }
        }
    }

    fn cancel_active(&mut self) {
        if let Some(active) = self.active.take() {
            self.value.unsubscribe(active.subscription);
            self.value.cancel(active.handle);
            log::trace!("{} cancelled trajectory {}", self.axis, active.handle.id());
        }
    }

    fn watch(&mut self, handle: TrajectoryHandle, kind: WatchKind) {
        let watch = TrajectoryWatch {
            bounds: self.config.bounds,
            overshoot: self.config.overshoot,
            kind,
        };
        let this = self.this.clone();
        let subscription = self.value.on_tick(
            handle,
            Box::new(move |event| {
                if let Some(axis) = this.upgrade() {
                    AxisInner::on_tick(&axis, watch, event);
                }
            }),
        );
        self.active = Some(ActiveTrajectory {
            handle,
            subscription,
        });
    }

    fn animation_error(&self, source: AnimationError) -> PanError {
        PanError::Animation {
            axis: self.axis,
            source,
        }
    }

    fn start_spring(
        &mut self,
        target: f64,
        velocity: f64,
        spec: SpringSpec,
        kind: WatchKind,
    ) -> Result<(), PanError> {
        self.cancel_active();
        let handle = self
            .value
            .start_spring(target, velocity, spec)
            .map_err(|source| self.animation_error(source))?;
        self.watch(handle, kind);
        Ok(())
    }

    fn start_decay(&mut self, velocity: f64, kind: WatchKind) -> Result<(), PanError> {
        self.cancel_active();
        let handle = self
            .value
            .start_decay(velocity, self.shared.solver.spec())
            .map_err(|source| self.animation_error(source))?;
        self.watch(handle, kind);
        Ok(())
    }

    fn start_snap(&mut self, x0: f64, velocity: f64) -> Result<(), PanError> {
        if !velocity.is_finite() {
            return Err(self.animation_error(AnimationError::InvalidVelocity { velocity }));
        }
        let solver = self.shared.solver;
        let spacing = self.config.snap_spacing;
        let rest = solver
            .rest_position(x0, velocity)
            .map_err(|source| self.animation_error(source))?;
        let target = snap_target(self.config.bounds, rest, spacing);
        let half_window = spacing / 2.0;
        let crossing_velocity = solver
            .velocity_at_bounds(x0, velocity, target - half_window, target + half_window)
            .map_err(|source| self.animation_error(source))?;
        log::debug!(
            "{} snapping toward {target} (rest {rest}, window entry at {crossing_velocity} units/ms)",
            self.axis
        );
        self.start_decay(
            velocity,
            WatchKind::SnapDecay {
                target,
                half_window,
                crossing_velocity,
            },
        )
    }

    fn notify_overshoot(&mut self) {
        log::debug!("{} overshoot", self.axis);
        self.pending_overshoots += 1;
    }

    /// Run the host's overshoot hook for every queued notification, with the
    /// axis no longer borrowed so the hook may query it.
    fn fire_pending_overshoots(this: &Rc<RefCell<Self>>) {
        let (count, shared) = {
            let mut inner = this.borrow_mut();
            (
                std::mem::take(&mut inner.pending_overshoots),
                Rc::clone(&inner.shared),
            )
        };
        for _ in 0..count {
            shared.callbacks.borrow_mut().overshoot();
        }
    }

    /// The value sits past `bound`: notify, then correct according to the overshoot policy.
    fn recover_overshoot(&mut self, bound: f64, velocity: f64) -> Result<(), PanError> {
        self.notify_overshoot();
        match self.config.overshoot {
            Overshoot::Spring => {
                let spec = self.shared.overshoot_spring;
                self.start_spring(bound, velocity, spec, WatchKind::Settle)
            }
            Overshoot::Clamp => {
                self.cancel_active();
                self.value.set_value(bound);
                Ok(())
            }
            Overshoot::None => Ok(()),
        }
    }

    /// A decay crossed `bound` mid-flight.
    fn leave_bounds(
        &mut self,
        event: TickEvent,
        bound: f64,
        release_velocity: f64,
    ) -> Result<(), PanError> {
        if self.config.overshoot != Overshoot::None {
            return self.recover_overshoot(bound, release_velocity);
        }
        // Uncorrected: notify once and let the decay run out unobserved.
        self.notify_overshoot();
        if let Some(active) = self.active.take() {
            self.value.unsubscribe(active.subscription);
        }
        if !event.finished {
            self.watch(event.trajectory, WatchKind::Settle);
        }
        Ok(())
    }

    /// A snap decay crossed `bound` before reaching its window. Land on the grid
    /// point anyway, starting from the bound when clamped.
    fn overshoot_snap(
        &mut self,
        overshoot: Overshoot,
        bound: f64,
        target: f64,
        velocity: f64,
    ) -> Result<(), PanError> {
        self.notify_overshoot();
        let spec = self.shared.snap_spring;
        let kind = WatchKind::SnapSpring { target };
        match overshoot {
            Overshoot::Clamp => {
                self.cancel_active();
                self.value.set_value(bound);
                if bound == target {
                    return Ok(());
                }
                self.start_spring(target, 0.0, spec, kind)
            }
            Overshoot::Spring | Overshoot::None => self.start_spring(target, velocity, spec, kind),
        }
    }

    fn on_tick(this: &Rc<RefCell<Self>>, watch: TrajectoryWatch, event: TickEvent) {
        {
            let mut inner = this.borrow_mut();
            let owned = inner
                .active
                .is_some_and(|active| active.handle == event.trajectory);
            if !owned {
                return;
            }
            if let Err(err) = inner.advance(watch, event) {
                log::warn!("{err}");
                inner.shared.deferred_errors.borrow_mut().push(err);
            }
        }
        Self::fire_pending_overshoots(this);
    }

    fn advance(&mut self, watch: TrajectoryWatch, event: TickEvent) -> Result<(), PanError> {
        let value = event.value;
        match watch.kind {
            WatchKind::Settle => {}
            WatchKind::Decay { release_velocity } => {
                if let Some(bound) = watch.bounds.violated_bound(value) {
                    return self.leave_bounds(event, bound, release_velocity);
                }
            }
            WatchKind::SnapDecay {
                target,
                half_window,
                crossing_velocity,
            } => {
                if watch.overshoot != Overshoot::None {
                    if let Some(bound) = watch.bounds.violated_bound(value) {
                        return self.overshoot_snap(watch.overshoot, bound, target, event.velocity);
                    }
                }
                let spec = self.shared.snap_spring;
                if value > target - half_window && value < target + half_window {
                    log::trace!("{} entered snap window of {target} at {value}", self.axis);
                    return self.start_spring(
                        target,
                        crossing_velocity,
                        spec,
                        WatchKind::SnapSpring { target },
                    );
                }
                if event.finished {
                    log::trace!("{} decay stopped short of {target} at {value}", self.axis);
                    return self.start_spring(target, 0.0, spec, WatchKind::SnapSpring { target });
                }
            }
            WatchKind::SnapSpring { target } => {
                if watch.overshoot == Overshoot::Clamp {
                    if let Some(bound) = watch.bounds.violated_bound(value) {
                        log::trace!("{} snap spring pinned at {bound}", self.axis);
                        self.cancel_active();
                        self.value.set_value(bound);
                        if bound != target {
                            let spec = self.shared.snap_spring;
                            return self.start_spring(
                                target,
                                0.0,
                                spec,
                                WatchKind::SnapSpring { target },
                            );
                        }
                        return Ok(());
                    }
                }
            }
        }
        if event.finished {
            self.active = None;
        }
        Ok(())
    }
}

/// Apply the overshoot policy to a value produced by a drag.
fn constrain_drag(candidate: f64, config: &AxisConfig) -> f64 {
    let Bounds { min, max } = config.bounds;
    let factor = config.overshoot_reduction_factor;
    match config.overshoot {
        Overshoot::Spring if candidate > max => max + (candidate - max) / factor,
        Overshoot::Spring if candidate < min => min - (min - candidate) / factor,
        Overshoot::Clamp => config.bounds.clamp(candidate),
        _ => candidate,
    }
}

/// Grid point a snap release should land on.
///
/// The rest position is clamped into the bounds and quantized. A grid point
/// that still falls outside (bounds not aligned to the grid) is stepped one
/// spacing back inside, or pinned to the bound when the range is narrower
/// than one spacing.
fn snap_target(bounds: Bounds, rest: f64, spacing: f64) -> f64 {
    let center = axispan_animation::closest_center(bounds.clamp(rest), spacing);
    if center > bounds.max {
        let stepped = center - spacing;
        if stepped >= bounds.min {
            stepped
        } else {
            bounds.max
        }
    } else if center < bounds.min {
        let stepped = center + spacing;
        if stepped <= bounds.max {
            stepped
        } else {
            bounds.min
        }
    } else {
        center
    }
}

impl<B: AnimatedValueBackend + 'static> std::fmt::Debug for AxisState<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("AxisState")
            .field("axis", &inner.axis)
            .field("value", &inner.value.value())
            .field("active", &inner.active.map(|active| active.handle))
            .finish()
    }
}

#[cfg(test)]
#[path = "../tests/axis_state_tests.rs"]
mod tests;
