use super::*;

use crate::error::ConfigError;
use crate::nodes::input::PointerEvent;
use crate::pan::config::{AxisConfig, Overshoot, ReleaseMode};
use axispan_animation::AnimatedValue;
use axispan_core::Runtime;
use std::cell::Cell;

const FRAME_NANOS: u64 = 16_000_000;

fn values(runtime: &Runtime) -> (AnimatedValue, AnimatedValue) {
    (
        AnimatedValue::new(0.0, runtime.frame_clock()),
        AnimatedValue::new(0.0, runtime.frame_clock()),
    )
}

fn moved(dx: f64, dy: f64) -> GestureSnapshot {
    GestureSnapshot {
        dx,
        dy,
        ..Default::default()
    }
}

fn roomy(mode: ReleaseMode) -> AxisConfig {
    AxisConfig::default()
        .with_bounds(-1_000.0, 1_000.0)
        .with_overshoot(Overshoot::Clamp)
        .with_mode(mode)
}

fn both_axes(mode: ReleaseMode) -> PanConfig {
    PanConfig::new()
        .with_horizontal(true)
        .with_vertical(true)
        .with_x(roomy(mode))
        .with_y(roomy(mode))
}

#[test]
fn invalid_config_fails_construction() {
    let runtime = Runtime::new();
    let (x, y) = values(&runtime);
    let config = PanConfig::new()
        .with_horizontal(true)
        .with_x(AxisConfig::default().with_bounds(5.0, 1.0));
    let err = PanController::new(config, x, y).unwrap_err();
    assert!(matches!(
        err,
        PanError::Config(ConfigError::InvalidBounds { axis: Axis::X, .. })
    ));
}

#[test]
fn disabled_axes_have_no_state() {
    let runtime = Runtime::new();
    let (x, y) = values(&runtime);
    let config = PanConfig::new()
        .with_vertical(true)
        .with_y(roomy(ReleaseMode::Decay));
    let controller = PanController::new(config, x, y).expect("valid config");
    assert!(controller.axis(Axis::X).is_none());
    assert!(controller.axis(Axis::Y).is_some());
    assert_eq!(controller.direction(), Some(Axis::Y));
}

#[test]
fn direction_lock_resolves_once() {
    let runtime = Runtime::new();
    let (x, y) = values(&runtime);
    let changes = Rc::new(RefCell::new(Vec::new()));
    let log = Rc::clone(&changes);
    let callbacks = PanCallbacks::new()
        .with_on_direction_change(move |axis, snapshot| log.borrow_mut().push((axis, snapshot.dx)));
    let config = both_axes(ReleaseMode::Decay)
        .with_lock_direction(true)
        .with_direction_lock_distance(100.0);
    let mut controller =
        PanController::with_callbacks(config, x.clone(), y.clone(), callbacks).expect("valid");

    controller.on_grant();
    assert_eq!(controller.direction(), None);
    controller.on_move(moved(12.0, 3.0));
    assert_eq!(controller.direction(), Some(Axis::X));
    controller.on_move(moved(12.0, 20.0));
    assert_eq!(controller.direction(), Some(Axis::X));

    assert_eq!(*changes.borrow(), vec![(Axis::X, 12.0)]);
    assert_eq!(x.value(), 12.0);
    assert_eq!(y.value(), 0.0);
}

#[test]
fn locked_axis_receives_pending_displacement_once_selected() {
    let runtime = Runtime::new();
    let (x, y) = values(&runtime);
    let config = both_axes(ReleaseMode::Decay)
        .with_lock_direction(true)
        .with_direction_lock_distance(400.0);
    let mut controller = PanController::new(config, x.clone(), y.clone()).expect("valid");
    controller.on_grant();
    controller.on_move(moved(5.0, 5.0));
    assert_eq!((x.value(), y.value()), (0.0, 0.0));
    controller.on_move(moved(30.0, 4.0));
    assert_eq!(x.value(), 30.0);
    assert_eq!(y.value(), 0.0);
    controller.on_move(moved(35.0, 40.0));
    assert_eq!(x.value(), 35.0);
    assert_eq!(y.value(), 0.0);
}

#[test]
fn unlocked_moves_deliver_incremental_deltas() {
    let runtime = Runtime::new();
    let (x, y) = values(&runtime);
    let on_move_calls = Rc::new(Cell::new(0));
    let counter = Rc::clone(&on_move_calls);
    let callbacks = PanCallbacks::new().with_on_move(move |_| counter.set(counter.get() + 1));
    let mut controller =
        PanController::with_callbacks(both_axes(ReleaseMode::Decay), x.clone(), y.clone(), callbacks)
            .expect("valid");
    controller.on_grant();
    controller.on_move(moved(10.0, 5.0));
    controller.on_move(moved(25.0, -5.0));
    assert_eq!(x.value(), 25.0);
    assert_eq!(y.value(), -5.0);
    assert_eq!(on_move_calls.get(), 2);
}

#[test]
fn release_resets_direction() {
    let runtime = Runtime::new();
    let (x, y) = values(&runtime);
    let mut controller = PanController::new(both_axes(ReleaseMode::Decay), x, y).expect("valid");
    controller.on_grant();
    controller.on_move(moved(0.0, 30.0));
    assert_eq!(controller.direction(), Some(Axis::Y));
    controller.on_release(moved(0.0, 30.0)).expect("release");
    assert!(!controller.is_gesture_active());
    assert_eq!(controller.direction(), None);
}

#[test]
fn host_release_cancel_skips_both_axes() {
    let runtime = Runtime::new();
    let (x, y) = values(&runtime);
    let callbacks = PanCallbacks::new().with_on_release(|_| ReleaseDecision::Cancel);
    let mut controller = PanController::with_callbacks(
        both_axes(ReleaseMode::SpringOrigin),
        x.clone(),
        y.clone(),
        callbacks,
    )
    .expect("valid");
    controller.on_grant();
    controller.on_move(moved(40.0, 60.0));
    controller.on_release(moved(40.0, 60.0)).expect("release");
    assert!(!x.is_animating());
    assert!(!y.is_animating());
    assert_eq!((x.value(), y.value()), (40.0, 60.0));
}

#[test]
fn axis_release_cancel_skips_only_that_axis() {
    let runtime = Runtime::new();
    let (x, y) = values(&runtime);
    let callbacks = PanCallbacks::new().with_on_release_x(|_| ReleaseDecision::Cancel);
    let mut controller = PanController::with_callbacks(
        both_axes(ReleaseMode::SpringOrigin),
        x.clone(),
        y.clone(),
        callbacks,
    )
    .expect("valid");
    controller.on_grant();
    controller.on_move(moved(40.0, 60.0));
    controller.on_release(moved(40.0, 60.0)).expect("release");
    assert!(!x.is_animating());
    assert!(y.is_animating());
    assert!(controller.axis(Axis::Y).is_some_and(|axis| axis.is_settling()));
}

#[test]
fn unresolved_lock_releases_nothing() {
    let runtime = Runtime::new();
    let (x, y) = values(&runtime);
    let config = both_axes(ReleaseMode::Decay)
        .with_lock_direction(true)
        .with_direction_lock_distance(10_000.0);
    let mut controller = PanController::new(config, x.clone(), y.clone()).expect("valid");
    controller.on_grant();
    controller.on_move(moved(3.0, 4.0));
    controller
        .on_release(GestureSnapshot {
            dx: 3.0,
            dy: 4.0,
            vx: 1.0,
            vy: 1.0,
            ..Default::default()
        })
        .expect("release");
    assert!(!x.is_animating());
    assert!(!y.is_animating());
}

#[test]
fn regrant_cancels_in_flight_release() {
    let runtime = Runtime::new();
    let (x, y) = values(&runtime);
    let config = PanConfig::new().with_horizontal(true).with_x(
        AxisConfig::default()
            .with_bounds(0.0, 300.0)
            .with_overshoot(Overshoot::Clamp)
            .with_mode(ReleaseMode::Snap)
            .with_snap_spacing(100.0),
    );
    let mut controller = PanController::new(config, x.clone(), y).expect("valid");
    controller.on_grant();
    controller.on_move(moved(40.0, 0.0));
    controller
        .on_release(GestureSnapshot {
            dx: 40.0,
            vx: 5.0,
            ..Default::default()
        })
        .expect("release");
    let mut frame_time = FRAME_NANOS;
    runtime.drain_frame_callbacks(frame_time);
    frame_time += FRAME_NANOS;
    runtime.drain_frame_callbacks(frame_time);
    assert!(x.is_animating());

    controller.on_grant();
    let frozen = x.value();
    assert!(!x.is_animating());
    assert!(!runtime.has_frame_callbacks());
    assert_eq!(x.value(), frozen);
}

#[test]
fn overshoot_on_release_reaches_host() {
    let runtime = Runtime::new();
    let (x, y) = values(&runtime);
    let overshoots = Rc::new(Cell::new(0));
    let counter = Rc::clone(&overshoots);
    let callbacks = PanCallbacks::new().with_on_overshoot(move || counter.set(counter.get() + 1));
    let config = PanConfig::new().with_horizontal(true).with_x(
        AxisConfig::default()
            .with_bounds(0.0, 100.0)
            .with_overshoot(Overshoot::Spring)
            .with_overshoot_reduction_factor(2.0)
            .with_mode(ReleaseMode::Decay),
    );
    let mut controller = PanController::with_callbacks(config, x.clone(), y, callbacks).expect("valid");
    controller.on_grant();
    controller.on_move(moved(160.0, 0.0));
    assert_eq!(x.value(), 130.0);
    controller.on_release(moved(160.0, 0.0)).expect("release");
    assert_eq!(overshoots.get(), 1);

    let mut frame_time = 0;
    while runtime.has_frame_callbacks() {
        frame_time += FRAME_NANOS;
        runtime.drain_frame_callbacks(frame_time);
        assert!(frame_time < 1_000 * FRAME_NANOS, "spring never settled");
    }
    assert_eq!(x.value(), 100.0);
}

#[test]
fn backend_refusal_surfaces_from_release() {
    let (x, y) = {
        let runtime = Runtime::new();
        values(&runtime)
    };
    let config = PanConfig::new()
        .with_horizontal(true)
        .with_x(roomy(ReleaseMode::SpringOrigin));
    let mut controller = PanController::new(config, x.clone(), y).expect("valid");
    controller.on_grant();
    controller.on_move(moved(25.0, 0.0));
    let err = controller
        .on_release(moved(25.0, 0.0))
        .expect_err("runtime is gone");
    assert_eq!(
        err,
        PanError::Animation {
            axis: Axis::X,
            source: axispan_animation::AnimationError::RuntimeUnavailable
        }
    );
    assert_eq!(x.value(), 25.0);
}

#[test]
fn pointer_events_drive_the_gesture() {
    let runtime = Runtime::new();
    let (x, y) = values(&runtime);
    let grants = Rc::new(Cell::new(0));
    let counter = Rc::clone(&grants);
    let callbacks = PanCallbacks::new().with_on_grant(move || counter.set(counter.get() + 1));
    let config = PanConfig::new()
        .with_horizontal(true)
        .with_x(roomy(ReleaseMode::Decay));
    let mut controller = PanController::with_callbacks(config, x.clone(), y, callbacks).expect("valid");

    let dispatcher = PointerDispatcher::new();
    dispatcher.push_event(PointerEvent::down(1, 100.0, 100.0, 0));
    dispatcher.push_event(PointerEvent::moved(1, 104.0, 100.0, 5));
    dispatcher.push_event(PointerEvent::moved(1, 120.0, 100.0, 10));
    dispatcher.push_event(PointerEvent::moved(1, 140.0, 100.0, 20));
    controller
        .drain_pointer_events(&dispatcher)
        .expect("no release yet");
    assert_eq!(grants.get(), 1);
    assert!(controller.is_gesture_active());
    assert_eq!(x.value(), 40.0);

    controller
        .handle_pointer_event(PointerEvent::up(1, 160.0, 100.0, 30))
        .expect("release");
    assert!(!controller.is_gesture_active());
    assert!(x.is_animating());
    assert!(controller.take_deferred_errors().is_empty());
}

#[test]
fn non_finite_moves_never_reach_the_axes() {
    let runtime = Runtime::new();
    let (x, y) = values(&runtime);
    let config = PanConfig::new().with_horizontal(true).with_x(
        AxisConfig::default()
            .with_bounds(0.0, 300.0)
            .with_overshoot(Overshoot::Spring)
            .with_mode(ReleaseMode::Snap)
            .with_snap_spacing(100.0),
    );
    let mut controller = PanController::new(config, x.clone(), y).expect("valid");
    controller.on_grant();
    controller.on_move(moved(f64::NAN, 0.0));
    controller.on_move(moved(30.0, f64::INFINITY));
    assert_eq!(x.value(), 0.0);

    controller
        .on_release(GestureSnapshot {
            vx: 1.0,
            ..Default::default()
        })
        .expect("release");
    let mut frame_time = 0;
    while runtime.has_frame_callbacks() {
        frame_time += FRAME_NANOS;
        runtime.drain_frame_callbacks(frame_time);
        assert!(frame_time < 2_000 * FRAME_NANOS, "snap never settled");
    }
    assert_eq!(x.value(), 300.0);
}
