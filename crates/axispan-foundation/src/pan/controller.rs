//! Top-level gesture dispatcher.
//!
//! Consumes grant, move and release phases (directly, or from raw pointer
//! events through a [`DragGestureDetector`]), resolves the direction lock and
//! routes each phase to the enabled axes.

use std::cell::RefCell;
use std::rc::Rc;

use axispan_animation::AnimatedValueBackend;
use smallvec::SmallVec;

use crate::error::PanError;
use crate::nodes::input::{DragGestureDetector, PanGestureEvent, PointerDispatcher, PointerEvent};
use crate::pan::axis_state::{AxisState, PanShared};
use crate::pan::callbacks::{GestureSnapshot, PanCallbacks, ReleaseDecision};
use crate::pan::config::PanConfig;
use crate::pan::session::GestureSession;
use crate::pan::Axis;

/// Drives one or two animated values from a drag gesture.
pub struct PanController<B: AnimatedValueBackend + 'static> {
    config: PanConfig,
    x: Option<AxisState<B>>,
    y: Option<AxisState<B>>,
    shared: Rc<PanShared>,
    session: Option<GestureSession>,
    detector: DragGestureDetector,
}

impl<B: AnimatedValueBackend + 'static> PanController<B> {
    pub fn new(config: PanConfig, pan_x: B, pan_y: B) -> Result<Self, PanError> {
        Self::with_callbacks(config, pan_x, pan_y, PanCallbacks::default())
    }

    /// Validate `config` and build a controller. Values of disabled axes are dropped.
    pub fn with_callbacks(
        config: PanConfig,
        pan_x: B,
        pan_y: B,
        callbacks: PanCallbacks,
    ) -> Result<Self, PanError> {
        config.validate()?;
        let shared = Rc::new(PanShared::new(&config, Rc::new(RefCell::new(callbacks))));
        let x = config
            .horizontal
            .then(|| AxisState::new(Axis::X, config.x, pan_x, Rc::clone(&shared)));
        let y = config
            .vertical
            .then(|| AxisState::new(Axis::Y, config.y, pan_y, Rc::clone(&shared)));
        Ok(Self {
            config,
            x,
            y,
            shared,
            session: None,
            detector: DragGestureDetector::new(),
        })
    }

    pub fn config(&self) -> &PanConfig {
        &self.config
    }

    /// State of `axis`, or `None` when that axis is disabled.
    pub fn axis(&self, axis: Axis) -> Option<&AxisState<B>> {
        match axis {
            Axis::X => self.x.as_ref(),
            Axis::Y => self.y.as_ref(),
        }
    }

    /// Direction of the current gesture; between gestures, the forced direction if any.
    pub fn direction(&self) -> Option<Axis> {
        match self.session.as_ref() {
            Some(session) => session.direction(),
            None => self.config.forced_direction(),
        }
    }

    pub fn is_gesture_active(&self) -> bool {
        self.session.is_some()
    }

    /// Backend failures raised while a trajectory was ticking, oldest first.
    pub fn take_deferred_errors(&self) -> Vec<PanError> {
        self.shared.take_deferred_errors().into_vec()
    }

    pub fn on_grant(&mut self) {
        if self.session.is_some() {
            log::warn!("grant while a gesture is active; starting over");
        }
        self.shared.callbacks.borrow_mut().grant();
        for state in [self.x.as_ref(), self.y.as_ref()].into_iter().flatten() {
            state.grant();
        }
        let session = GestureSession::new(self.config.forced_direction());
        log::debug!("gesture granted (direction {:?})", session.direction());
        self.session = Some(session);
    }

    /// Route a move. `snapshot.dx`/`dy` are cumulative since the grant.
    pub fn on_move(&mut self, snapshot: GestureSnapshot) {
        let Some(session) = self.session.as_mut() else {
            log::warn!("move without a granted gesture ignored");
            return;
        };
        if !snapshot.dx.is_finite() || !snapshot.dy.is_finite() {
            log::warn!(
                "move with non-finite displacement ({}, {}) ignored",
                snapshot.dx,
                snapshot.dy
            );
            return;
        }
        let resolved = session.resolve_direction(
            snapshot.dx,
            snapshot.dy,
            self.config.direction_lock_distance,
        );
        if let Some(axis) = resolved {
            log::debug!("direction resolved to {axis} at ({}, {})", snapshot.dx, snapshot.dy);
            self.shared
                .callbacks
                .borrow_mut()
                .direction_changed(axis, &snapshot);
        }
        self.shared.callbacks.borrow_mut().moved(&snapshot);

        let lock = self.config.lock_direction;
        for (axis, state) in [(Axis::X, self.x.as_ref()), (Axis::Y, self.y.as_ref())] {
            let Some(state) = state else {
                continue;
            };
            if !session.delivers(axis, lock) {
                continue;
            }
            let delta = session.take_delta(axis, snapshot.displacement(axis));
            log::trace!("{axis} move by {delta}");
            state.apply_move(delta);
        }
    }

    /// End the gesture and start each delivered axis's release behavior.
    ///
    /// Every axis is processed even if an earlier one fails; the first
    /// failure is returned.
    pub fn on_release(&mut self, snapshot: GestureSnapshot) -> Result<(), PanError> {
        let session = self.session.take().unwrap_or_else(|| {
            log::warn!("release without a granted gesture");
            GestureSession::new(self.config.forced_direction())
        });

        let decision = self.shared.callbacks.borrow_mut().release(&snapshot);
        if decision == ReleaseDecision::Cancel {
            log::debug!("release cancelled by host");
            return Ok(());
        }

        let lock = self.config.lock_direction;
        let mut result = Ok(());
        for (axis, state) in [(Axis::X, self.x.as_ref()), (Axis::Y, self.y.as_ref())] {
            let Some(state) = state else {
                continue;
            };
            if !session.delivers(axis, lock) {
                continue;
            }
            let decision = self.shared.callbacks.borrow_mut().release_axis(axis, &snapshot);
            if decision == ReleaseDecision::Cancel {
                log::debug!("{axis} release cancelled by host");
                continue;
            }
            if let Err(err) = state.release(snapshot.velocity(axis)) {
                log::warn!("{err}");
                if result.is_ok() {
                    result = Err(err);
                }
            }
        }
        result
    }

    /// Feed one raw pointer event through the drag detector.
    pub fn handle_pointer_event(&mut self, event: PointerEvent) -> Result<(), PanError> {
        let phases: SmallVec<[PanGestureEvent; 2]> = {
            let mut callbacks = self.shared.callbacks.borrow_mut();
            let phases = self.detector.on_pointer_event(&event, &mut *callbacks);
            phases
        };
        let mut result = Ok(());
        for phase in phases {
            match phase {
                PanGestureEvent::Grant => self.on_grant(),
                PanGestureEvent::Move(snapshot) => self.on_move(snapshot),
                PanGestureEvent::Release(snapshot) => {
                    if let Err(err) = self.on_release(snapshot) {
                        if result.is_ok() {
                            result = Err(err);
                        }
                    }
                }
            }
        }
        result
    }

    /// Process every queued pointer event; the first failure is returned.
    pub fn drain_pointer_events(&mut self, dispatcher: &PointerDispatcher) -> Result<(), PanError> {
        let mut result = Ok(());
        dispatcher.drain(|event| {
            if let Err(err) = self.handle_pointer_event(event) {
                if result.is_ok() {
                    result = Err(err);
                }
            }
        });
        result
    }
}

impl<B: AnimatedValueBackend + 'static> std::fmt::Debug for PanController<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PanController")
            .field("config", &self.config)
            .field("x", &self.x)
            .field("y", &self.y)
            .field("direction", &self.direction())
            .finish()
    }
}

#[cfg(test)]
#[path = "../tests/controller_tests.rs"]
mod tests;
