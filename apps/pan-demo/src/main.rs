//! Simulated swipes against two pan controllers, printed frame by frame.

use axispan_animation::{AnimatedValue, AnimatedValueBackend};
use axispan_core::{Runtime, NANOS_PER_MILLI};
use axispan_foundation::prelude::*;

const FRAME_MILLIS: u64 = 16;
const PAGE_WIDTH: f64 = 320.0;
const PAGES: usize = 5;

fn main() -> anyhow::Result<()> {
    #[cfg(feature = "logging")]
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    println!("=== axispan pan demo ===");
    let runtime = Runtime::new();
    let mut clock = SimulatedClock::default();

    pager(&runtime, &mut clock)?;
    spring_back_card(&runtime, &mut clock)?;
    Ok(())
}

/// Horizontal pager: pages are `PAGE_WIDTH` apart and a fling snaps onto one.
fn pager(runtime: &Runtime, clock: &mut SimulatedClock) -> anyhow::Result<()> {
    println!("\n-- pager ({PAGES} pages of {PAGE_WIDTH}) --");
    let last_page = -(PAGE_WIDTH * (PAGES - 1) as f64);
    let config = PanConfig::new().with_horizontal(true).with_x(
        AxisConfig::default()
            .with_bounds(last_page, 0.0)
            .with_overshoot(Overshoot::Spring)
            .with_overshoot_reduction_factor(3.0)
            .with_mode(ReleaseMode::Snap)
            .with_snap_spacing(PAGE_WIDTH),
    );
    let callbacks = PanCallbacks::new()
        .with_on_grant(|| log::info!("pager grabbed"))
        .with_on_overshoot(|| log::info!("pager hit an edge"))
        .with_on_release(|snapshot| {
            log::info!("pager released at vx {:.3} units/ms", snapshot.vx);
            ReleaseDecision::Proceed
        });
    let x = AnimatedValue::new(0.0, runtime.frame_clock());
    let y = AnimatedValue::new(0.0, runtime.frame_clock());
    let mut controller = PanController::with_callbacks(config, x.clone(), y, callbacks)?;

    // A quick leftward swipe.
    let dispatcher = PointerDispatcher::new();
    swipe(&dispatcher, clock, (300.0, 200.0), (-24.0, 0.0), 8);
    controller.drain_pointer_events(&dispatcher)?;
    println!("released at {:.1}", x.value());
    run_until_idle(runtime, clock, "x", &x);
    println!("pager settled on page {}", page_index(x.value()));

    // Pulling right on the first page overshoots and springs back.
    controller.on_grant();
    controller.on_move(GestureSnapshot {
        dx: 900.0,
        ..Default::default()
    });
    println!("pulled past the first page to {:.1}", x.value());
    controller.on_release(GestureSnapshot {
        dx: 900.0,
        ..Default::default()
    })?;
    run_until_idle(runtime, clock, "x", &x);
    println!("pager settled on page {}", page_index(x.value()));

    report_deferred(&controller);
    Ok(())
}

/// Vertical card that always springs back to where it started.
fn spring_back_card(runtime: &Runtime, clock: &mut SimulatedClock) -> anyhow::Result<()> {
    println!("\n-- spring-back card --");
    let config = PanConfig::new().with_vertical(true).with_y(
        AxisConfig::default()
            .with_bounds(-150.0, 150.0)
            .with_overshoot(Overshoot::Clamp)
            .with_mode(ReleaseMode::SpringOrigin),
    );
    let x = AnimatedValue::new(0.0, runtime.frame_clock());
    let y = AnimatedValue::new(0.0, runtime.frame_clock());
    let mut controller = PanController::new(config, x, y.clone())?;

    let dispatcher = PointerDispatcher::new();
    swipe(&dispatcher, clock, (100.0, 100.0), (0.0, 40.0), 6);
    controller.drain_pointer_events(&dispatcher)?;
    println!("card released at {:.1} (clamped to 150)", y.value());
    run_until_idle(runtime, clock, "y", &y);

    report_deferred(&controller);
    Ok(())
}

#[derive(Debug, Default)]
struct SimulatedClock {
    millis: u64,
}

impl SimulatedClock {
    fn tick(&mut self) -> u64 {
        self.millis += FRAME_MILLIS;
        self.millis
    }
}

/// Queue a down, `steps` moves of `step` each one frame apart, and an up.
fn swipe(
    dispatcher: &PointerDispatcher,
    clock: &mut SimulatedClock,
    (x0, y0): (f64, f64),
    step: (f64, f64),
    steps: usize,
) {
    dispatcher.push_event(PointerEvent::down(1, x0, y0, clock.millis));
    let (mut x, mut y) = (x0, y0);
    for _ in 0..steps {
        x += step.0;
        y += step.1;
        dispatcher.push_event(PointerEvent::moved(1, x, y, clock.tick()));
    }
    dispatcher.push_event(PointerEvent::up(1, x, y, clock.millis));
}

fn run_until_idle(runtime: &Runtime, clock: &mut SimulatedClock, label: &str, value: &AnimatedValue) {
    let mut frames = 0;
    while runtime.has_frame_callbacks() {
        let now = clock.tick();
        runtime.drain_frame_callbacks(now * NANOS_PER_MILLI);
        frames += 1;
        if frames % 5 == 0 || !runtime.has_frame_callbacks() {
            println!("  t={now:>5}ms {label}={:>8.2}", value.value());
        }
    }
    println!("  idle after {frames} frames");
}

fn page_index(x: f64) -> i64 {
    (-x / PAGE_WIDTH).round() as i64
}

fn report_deferred(controller: &PanController<AnimatedValue>) {
    for err in controller.take_deferred_errors() {
        log::warn!("animation failed mid-flight: {err}");
    }
}
