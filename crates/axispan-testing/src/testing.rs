use axispan_animation::{AnimatedValue, AnimatedValueBackend, FRAME_MILLIS};
use axispan_core::{FrameClock, Runtime, NANOS_PER_MILLI};
use axispan_foundation::{
    GestureSnapshot, PanCallbacks, PanConfig, PanController, PanError, PointerEvent,
};

/// Frames [`PanTestRule::pump_until_idle`] runs before declaring a trajectory stuck.
pub const MAX_PUMP_FRAMES: usize = 10_000;

/// Nanoseconds in one simulated frame.
pub const FRAME_NANOS: u64 = FRAME_MILLIS as u64 * NANOS_PER_MILLI;

/// Install `env_logger` once for the test binary. Output is captured per test.
pub fn init_test_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Headless harness for exercising pan controllers in tests.
///
/// Owns the runtime every animated value it hands out is bound to, and a
/// frame clock that only moves when the test says so.
pub struct PanTestRule {
    runtime: Runtime,
    frame_time_nanos: u64,
    frames: u64,
}

impl PanTestRule {
    pub fn new() -> Self {
        init_test_logging();
        Self {
            runtime: Runtime::new(),
            frame_time_nanos: 0,
            frames: 0,
        }
    }

    pub fn runtime(&self) -> &Runtime {
        &self.runtime
    }

    pub fn frame_clock(&self) -> FrameClock {
        self.runtime.frame_clock()
    }

    pub fn animated_value(&self, initial: f64) -> AnimatedValue {
        AnimatedValue::new(initial, self.frame_clock())
    }

    /// Build a controller over two fresh values starting at `x` and `y`.
    ///
    /// The values are returned alongside so tests can observe them directly.
    pub fn controller(
        &self,
        config: PanConfig,
        callbacks: PanCallbacks,
        (x, y): (f64, f64),
    ) -> Result<(PanController<AnimatedValue>, AnimatedValue, AnimatedValue), PanError> {
        let pan_x = self.animated_value(x);
        let pan_y = self.animated_value(y);
        let controller =
            PanController::with_callbacks(config, pan_x.clone(), pan_y.clone(), callbacks)?;
        Ok((controller, pan_x, pan_y))
    }

    /// Simulated time of the last drained frame.
    pub fn frame_time_millis(&self) -> f64 {
        self.frame_time_nanos as f64 / NANOS_PER_MILLI as f64
    }

    /// Frames drained so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Step the clock one frame and run whatever was scheduled for it.
    ///
    /// Returns whether anything was scheduled.
    pub fn advance_frame(&mut self) -> bool {
        let pending = self.runtime.has_frame_callbacks();
        self.frame_time_nanos += FRAME_NANOS;
        self.frames += 1;
        self.runtime.drain_frame_callbacks(self.frame_time_nanos);
        pending
    }

    /// Advance frames until nothing is scheduled. Returns the frames drained.
    pub fn pump_until_idle(&mut self) -> usize {
        self.pump_until_idle_observing(|| {})
    }

    /// Like [`pump_until_idle`](Self::pump_until_idle), calling `observe` after every frame.
    ///
    /// # Panics
    ///
    /// Panics if work is still scheduled after [`MAX_PUMP_FRAMES`].
    pub fn pump_until_idle_observing(&mut self, mut observe: impl FnMut()) -> usize {
        let mut drained = 0;
        while self.runtime.has_frame_callbacks() {
            if drained >= MAX_PUMP_FRAMES {
                panic!("pump_until_idle still busy after {MAX_PUMP_FRAMES} frames");
            }
            self.advance_frame();
            observe();
            drained += 1;
        }
        log::trace!("idle after {drained} frames");
        drained
    }

    /// Grant a gesture and move it through the cumulative `path`.
    pub fn drag<B: AnimatedValueBackend + 'static>(
        &self,
        controller: &mut PanController<B>,
        path: &[(f64, f64)],
    ) {
        controller.on_grant();
        for &(dx, dy) in path {
            controller.on_move(GestureSnapshot {
                dx,
                dy,
                ..Default::default()
            });
        }
    }

    /// [`drag`](Self::drag) through `path`, then release with `velocity` (units/ms).
    pub fn fling<B: AnimatedValueBackend + 'static>(
        &self,
        controller: &mut PanController<B>,
        path: &[(f64, f64)],
        (vx, vy): (f64, f64),
    ) -> Result<(), PanError> {
        self.drag(controller, path);
        let (dx, dy) = path.last().copied().unwrap_or_default();
        controller.on_release(GestureSnapshot {
            dx,
            dy,
            vx,
            vy,
            ..Default::default()
        })
    }

    /// Feed raw pointer events through the controller's drag detector.
    pub fn send_pointer_events<B: AnimatedValueBackend + 'static>(
        &self,
        controller: &mut PanController<B>,
        events: &[PointerEvent],
    ) -> Result<(), PanError> {
        events
            .iter()
            .try_for_each(|event| controller.handle_pointer_event(*event))
    }
}

impl Default for PanTestRule {
    fn default() -> Self {
        Self::new()
    }
}
