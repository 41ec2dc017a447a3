use std::cell::{Cell, RefCell};
use std::rc::Rc;

use axispan_animation::{closest_center, AnimatedValueBackend, MomentumSolver};
use axispan_foundation::prelude::*;
use axispan_foundation::Bounds;
use axispan_testing::{
    assert_approx_eq, assert_on_grid, assert_within_bounds, PanTestRule,
};

fn snap_axis() -> AxisConfig {
    AxisConfig::default()
        .with_bounds(0.0, 300.0)
        .with_overshoot(Overshoot::Clamp)
        .with_mode(ReleaseMode::Snap)
        .with_snap_spacing(100.0)
}

#[test]
fn clamped_drag_never_leaves_bounds() {
    let rule = PanTestRule::new();
    let config = PanConfig::new().with_horizontal(true).with_x(
        AxisConfig::default()
            .with_bounds(-50.0, 120.0)
            .with_overshoot(Overshoot::Clamp)
            .with_mode(ReleaseMode::Decay),
    );
    let (mut controller, x, _) = rule
        .controller(config, PanCallbacks::new(), (10.0, 0.0))
        .expect("valid config");
    let bounds = Bounds::new(-50.0, 120.0);

    controller.on_grant();
    let mut dx = 0.0;
    // Deterministic zig-zag with growing amplitude.
    for step in 0..200 {
        let amplitude = 3.0 * step as f64;
        dx += if step % 3 == 0 { -amplitude } else { amplitude * 0.7 };
        controller.on_move(GestureSnapshot {
            dx,
            ..Default::default()
        });
        assert_within_bounds(x.value(), bounds, &format!("step {step}"));
    }
}

#[test]
fn spring_overshoot_is_monotone_and_bounded() {
    let rule = PanTestRule::new();
    let k = 3.0;
    let config = PanConfig::new().with_vertical(true).with_y(
        AxisConfig::default()
            .with_bounds(0.0, 200.0)
            .with_overshoot(Overshoot::Spring)
            .with_overshoot_reduction_factor(k),
    );
    let (mut controller, _, y) = rule
        .controller(config, PanCallbacks::new(), (0.0, 200.0))
        .expect("valid config");

    let excursion = 60.0;
    let ceiling = 200.0 + excursion / (k - 1.0);
    controller.on_grant();
    assert_approx_eq(y.value(), 200.0, 1e-9, "start on the bound");
    controller.on_move(GestureSnapshot {
        dy: excursion,
        ..Default::default()
    });
    assert_approx_eq(y.value(), 200.0 + excursion / k, 1e-9, "first excursion");

    let mut previous = y.value();
    for step in 2..100 {
        controller.on_move(GestureSnapshot {
            dy: excursion * step as f64,
            ..Default::default()
        });
        let value = y.value();
        assert!(value >= previous);
        assert!(value <= ceiling + 1e-9, "{value} above {ceiling}");
        previous = value;
    }
    assert_approx_eq(previous, ceiling, 1e-6, "converges to the ceiling");
}

#[test]
fn direction_lock_fires_exactly_once() {
    let rule = PanTestRule::new();
    let changes = Rc::new(RefCell::new(Vec::new()));
    let seen = Rc::clone(&changes);
    let callbacks = PanCallbacks::new().with_on_direction_change(move |axis, snapshot| {
        seen.borrow_mut().push((axis, snapshot.dx, snapshot.dy))
    });
    let roomy = AxisConfig::default()
        .with_bounds(-1_000.0, 1_000.0)
        .with_mode(ReleaseMode::Decay);
    let config = PanConfig::new()
        .with_horizontal(true)
        .with_vertical(true)
        .with_lock_direction(true)
        .with_direction_lock_distance(100.0)
        .with_x(roomy)
        .with_y(roomy);
    let (mut controller, x, y) = rule
        .controller(config, callbacks, (0.0, 0.0))
        .expect("valid config");

    rule.drag(&mut controller, &[(12.0, 3.0), (12.0, 20.0)]);
    assert_eq!(controller.direction(), Some(Axis::X));
    assert_eq!(*changes.borrow(), vec![(Axis::X, 12.0, 3.0)]);
    assert_eq!(x.value(), 12.0);
    assert_eq!(y.value(), 0.0);

    // The next gesture resolves afresh.
    controller
        .on_release(GestureSnapshot {
            dx: 12.0,
            dy: 20.0,
            ..Default::default()
        })
        .expect("release");
    rule.drag(&mut controller, &[(1.0, 30.0)]);
    assert_eq!(controller.direction(), Some(Axis::Y));
    assert_eq!(changes.borrow().len(), 2);
}

#[test]
fn regrant_stops_snap_before_another_tick() {
    let mut rule = PanTestRule::new();
    let config = PanConfig::new().with_horizontal(true).with_x(snap_axis());
    let (mut controller, x, _) = rule
        .controller(config, PanCallbacks::new(), (0.0, 0.0))
        .expect("valid config");
    rule.fling(&mut controller, &[(40.0, 0.0)], (5.0, 0.0))
        .expect("release");
    rule.advance_frame();
    rule.advance_frame();
    let handle = x.active_trajectory().expect("snap decay running");

    let ticks = Rc::new(Cell::new(0));
    let counter = Rc::clone(&ticks);
    x.on_tick(handle, Box::new(move |_| counter.set(counter.get() + 1)));

    controller.on_grant();
    let frozen = x.value();
    assert_eq!(rule.pump_until_idle(), 0);
    assert_eq!(ticks.get(), 0);
    assert_eq!(x.value(), frozen);
    assert!(controller.axis(Axis::X).is_some_and(|axis| !axis.is_settling()));
}

#[test]
fn snap_fling_settles_on_grid_inside_bounds() {
    let mut rule = PanTestRule::new();
    let config = PanConfig::new()
        .with_horizontal(true)
        .with_x(snap_axis())
        .with_deceleration(0.997)
        .expect("valid deceleration");
    let (mut controller, x, _) = rule
        .controller(config, PanCallbacks::new(), (0.0, 0.0))
        .expect("valid config");

    rule.fling(&mut controller, &[(15.0, 0.0), (40.0, 0.0)], (5.0, 0.0))
        .expect("release");
    let bounds = Bounds::new(0.0, 300.0);
    let frames = rule.pump_until_idle_observing(|| {
        assert_within_bounds(x.value(), bounds, "during snap");
    });
    assert!(frames > 0);

    let rest = MomentumSolver::new(config.decay)
        .rest_position(40.0, 5.0)
        .expect("converges");
    let expected = closest_center(bounds.clamp(rest), 100.0);
    assert_eq!(expected, 300.0);
    assert_eq!(x.value(), expected);
    assert_on_grid(x.value(), 100.0, "final value");
}

#[test]
fn gentle_snap_fling_picks_nearest_grid_point() {
    let mut rule = PanTestRule::new();
    let config = PanConfig::new().with_horizontal(true).with_x(snap_axis());
    let (mut controller, x, _) = rule
        .controller(config, PanCallbacks::new(), (100.0, 0.0))
        .expect("valid config");

    rule.fling(&mut controller, &[(20.0, 0.0)], (0.2, 0.0))
        .expect("release");
    rule.pump_until_idle_observing(|| {
        assert_within_bounds(x.value(), Bounds::new(0.0, 300.0), "during snap");
    });
    let rest = MomentumSolver::default()
        .rest_position(120.0, 0.2)
        .expect("converges");
    assert_eq!(x.value(), closest_center(rest, 100.0));
    assert_eq!(x.value(), 200.0);
}

#[test]
fn overshoot_notifications_have_no_payload_and_fire_per_event() {
    let mut rule = PanTestRule::new();
    let overshoots = Rc::new(Cell::new(0));
    let counter = Rc::clone(&overshoots);
    let callbacks = PanCallbacks::new().with_on_overshoot(move || counter.set(counter.get() + 1));
    let config = PanConfig::new().with_horizontal(true).with_x(
        AxisConfig::default()
            .with_bounds(0.0, 100.0)
            .with_overshoot(Overshoot::Spring)
            .with_mode(ReleaseMode::Decay),
    );
    let (mut controller, x, _) = rule
        .controller(config, callbacks, (50.0, 0.0))
        .expect("valid config");

    rule.fling(&mut controller, &[(10.0, 0.0)], (3.0, 0.0))
        .expect("release");
    rule.pump_until_idle();
    assert_eq!(overshoots.get(), 1);
    assert_eq!(x.value(), 100.0);

    rule.fling(&mut controller, &[(-200.0, 0.0)], (0.0, 0.0))
        .expect("release");
    assert_eq!(overshoots.get(), 2);
    rule.pump_until_idle();
    assert_eq!(x.value(), 0.0);
}
