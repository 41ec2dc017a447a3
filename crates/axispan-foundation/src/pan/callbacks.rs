//! Host hooks fired by the controller.

use crate::gesture_constants::DRAG_THRESHOLD;
use crate::pan::Axis;

/// Gesture state handed to host hooks.
///
/// `dx`/`dy` are cumulative from where the gesture started (`x0`, `y0`);
/// velocities are in units per millisecond.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GestureSnapshot {
    pub dx: f64,
    pub dy: f64,
    pub x0: f64,
    pub y0: f64,
    pub vx: f64,
    pub vy: f64,
}

impl GestureSnapshot {
    pub fn displacement(&self, axis: Axis) -> f64 {
        match axis {
            Axis::X => self.dx,
            Axis::Y => self.dy,
        }
    }

    pub fn velocity(&self, axis: Axis) -> f64 {
        match axis {
            Axis::X => self.vx,
            Axis::Y => self.vy,
        }
    }
}

/// Answer of a release hook.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReleaseDecision {
    #[default]
    Proceed,
    /// Skip the release behavior. The offset stays captured.
    Cancel,
}

type Hook = Box<dyn FnMut()>;
type SnapshotHook = Box<dyn FnMut(&GestureSnapshot)>;
type DirectionHook = Box<dyn FnMut(Axis, &GestureSnapshot)>;
type ReleaseHook = Box<dyn FnMut(&GestureSnapshot) -> ReleaseDecision>;
type StartPredicate = Box<dyn FnMut() -> bool>;
type MovePredicate = Box<dyn FnMut(&GestureSnapshot) -> bool>;

/// Optional host callbacks. Unset hooks are no-ops.
///
/// Hooks fired from `on_grant`, `on_move` or `on_release` run while the
/// controller is mid-dispatch; they must not call back into the controller
/// that invoked them. An overshoot raised by an animation tick fires outside
/// any dispatch.
#[derive(Default)]
pub struct PanCallbacks {
    on_grant: Option<Hook>,
    on_move: Option<SnapshotHook>,
    on_direction_change: Option<DirectionHook>,
    on_overshoot: Option<Hook>,
    on_release: Option<ReleaseHook>,
    on_release_x: Option<ReleaseHook>,
    on_release_y: Option<ReleaseHook>,
    should_claim_on_start: Option<StartPredicate>,
    should_claim_on_move: Option<MovePredicate>,
}

impl PanCallbacks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_on_grant(mut self, hook: impl FnMut() + 'static) -> Self {
        self.on_grant = Some(Box::new(hook));
        self
    }

    pub fn with_on_move(mut self, hook: impl FnMut(&GestureSnapshot) + 'static) -> Self {
        self.on_move = Some(Box::new(hook));
        self
    }

    pub fn with_on_direction_change(
        mut self,
        hook: impl FnMut(Axis, &GestureSnapshot) + 'static,
    ) -> Self {
        self.on_direction_change = Some(Box::new(hook));
        self
    }

    /// Fires whenever an axis leaves its bounds during release handling or a trajectory.
    ///
    /// The hook runs after the axis has applied its correction and is no
    /// longer borrowed, so it may read [`AxisState::value`] and friends.
    ///
    /// [`AxisState::value`]: crate::pan::AxisState::value
    pub fn with_on_overshoot(mut self, hook: impl FnMut() + 'static) -> Self {
        self.on_overshoot = Some(Box::new(hook));
        self
    }

    pub fn with_on_release(
        mut self,
        hook: impl FnMut(&GestureSnapshot) -> ReleaseDecision + 'static,
    ) -> Self {
        self.on_release = Some(Box::new(hook));
        self
    }

    pub fn with_on_release_x(
        mut self,
        hook: impl FnMut(&GestureSnapshot) -> ReleaseDecision + 'static,
    ) -> Self {
        self.on_release_x = Some(Box::new(hook));
        self
    }

    pub fn with_on_release_y(
        mut self,
        hook: impl FnMut(&GestureSnapshot) -> ReleaseDecision + 'static,
    ) -> Self {
        self.on_release_y = Some(Box::new(hook));
        self
    }

    pub fn with_should_claim_on_start(mut self, predicate: impl FnMut() -> bool + 'static) -> Self {
        self.should_claim_on_start = Some(Box::new(predicate));
        self
    }

    pub fn with_should_claim_on_move(
        mut self,
        predicate: impl FnMut(&GestureSnapshot) -> bool + 'static,
    ) -> Self {
        self.should_claim_on_move = Some(Box::new(predicate));
        self
    }

    pub(crate) fn grant(&mut self) {
        if let Some(hook) = self.on_grant.as_mut() {
            hook();
        }
    }

    pub(crate) fn moved(&mut self, snapshot: &GestureSnapshot) {
        if let Some(hook) = self.on_move.as_mut() {
            hook(snapshot);
        }
    }

    pub(crate) fn direction_changed(&mut self, axis: Axis, snapshot: &GestureSnapshot) {
        if let Some(hook) = self.on_direction_change.as_mut() {
            hook(axis, snapshot);
        }
    }

    pub(crate) fn overshoot(&mut self) {
        if let Some(hook) = self.on_overshoot.as_mut() {
            hook();
        }
    }

    pub(crate) fn release(&mut self, snapshot: &GestureSnapshot) -> ReleaseDecision {
        self.on_release
            .as_mut()
            .map_or(ReleaseDecision::Proceed, |hook| hook(snapshot))
    }

    pub(crate) fn release_axis(&mut self, axis: Axis, snapshot: &GestureSnapshot) -> ReleaseDecision {
        let hook = match axis {
            Axis::X => self.on_release_x.as_mut(),
            Axis::Y => self.on_release_y.as_mut(),
        };
        hook.map_or(ReleaseDecision::Proceed, |hook| hook(snapshot))
    }
}

/// Decides whether a pointer stream becomes a pan gesture.
pub trait GestureClaim {
    /// Asked when a pointer goes down.
    fn claim_on_start(&mut self) -> bool;

    /// Asked on every move of an unclaimed pointer.
    fn claim_on_move(&mut self, snapshot: &GestureSnapshot) -> bool;
}

impl GestureClaim for PanCallbacks {
    fn claim_on_start(&mut self) -> bool {
        self.should_claim_on_start
            .as_mut()
            .is_some_and(|predicate| predicate())
    }

    fn claim_on_move(&mut self, snapshot: &GestureSnapshot) -> bool {
        match self.should_claim_on_move.as_mut() {
            Some(predicate) => predicate(snapshot),
            None => snapshot.dx.hypot(snapshot.dy) > DRAG_THRESHOLD,
        }
    }
}

impl std::fmt::Debug for PanCallbacks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PanCallbacks")
            .field("on_grant", &self.on_grant.is_some())
            .field("on_move", &self.on_move.is_some())
            .field("on_direction_change", &self.on_direction_change.is_some())
            .field("on_overshoot", &self.on_overshoot.is_some())
            .field("on_release", &self.on_release.is_some())
            .field("on_release_x", &self.on_release_x.is_some())
            .field("on_release_y", &self.on_release_y.is_some())
            .finish()
    }
}
