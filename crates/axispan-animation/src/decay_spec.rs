//! Exponential decay for released drags, plus the momentum solver used to
//! predict where a fling will come to rest.
//!
//! Velocity is retained multiplicatively once per millisecond, so after `t`
//! milliseconds it has shrunk to `v·dᵗ ≈ v·e^(-(1-d)·t)`. Integrating gives the
//! closed form
//!
//! ```text
//! x(t) = x0 + v / (1 - d) · (1 - e^(-(1 - d)·t))
//! ```
//!
//! which converges to `x0 + v / (1 - d)`. The solver walks that curve in
//! display-frame steps instead of jumping to the asymptote so the results
//! match what the frame-driven trajectory actually reaches.

use crate::error::AnimationError;

/// Length of one display frame in milliseconds.
pub const FRAME_MILLIS: f64 = 16.0;

/// Per-millisecond velocity retention used when none is configured.
pub const DEFAULT_DECELERATION: f64 = 0.997;

/// Position change per frame below which a decay counts as settled.
pub const CONVERGENCE_DISTANCE: f64 = 0.1;

/// Speed (units/ms) below which a decay is considered stopped short of a window.
pub const STOPPED_VELOCITY: f64 = 0.1;

/// Upper bound on solver iterations (about 27 minutes of simulated frames).
/// Valid decelerations converge long before this.
pub const MAX_SOLVER_STEPS: usize = 100_000;

/// Trait for decay animation specifications.
///
/// A decay animation has no fixed target: it starts with a velocity and
/// decelerates to zero. Times are in milliseconds, velocities in units/ms.
pub trait FloatDecayAnimationSpec {
    /// Velocity threshold below which the animation is considered finished.
    fn abs_velocity_threshold(&self) -> f64;

    /// Position after `play_time_millis`.
    fn value_at(&self, play_time_millis: f64, initial_value: f64, initial_velocity: f64) -> f64;

    /// Velocity after `play_time_millis`.
    fn velocity_at(&self, play_time_millis: f64, initial_value: f64, initial_velocity: f64)
        -> f64;

    /// Asymptotic resting position.
    fn target_value(&self, initial_value: f64, initial_velocity: f64) -> f64;
}

/// Geometric velocity decay with a fixed per-millisecond retention.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExponentialDecaySpec {
    deceleration: f64,
}

impl ExponentialDecaySpec {
    /// Create a spec, rejecting retentions that would never settle.
    pub fn new(deceleration: f64) -> Result<Self, AnimationError> {
        if !deceleration.is_finite() || deceleration <= 0.0 || deceleration >= 1.0 {
            return Err(AnimationError::InvalidDeceleration { deceleration });
        }
        Ok(Self { deceleration })
    }

    pub fn deceleration(&self) -> f64 {
        self.deceleration
    }

    fn rate(&self) -> f64 {
        1.0 - self.deceleration
    }
}

impl Default for ExponentialDecaySpec {
    fn default() -> Self {
        Self {
            deceleration: DEFAULT_DECELERATION,
        }
    }
}

impl FloatDecayAnimationSpec for ExponentialDecaySpec {
    fn abs_velocity_threshold(&self) -> f64 {
        CONVERGENCE_DISTANCE / FRAME_MILLIS
    }

    fn value_at(&self, play_time_millis: f64, initial_value: f64, initial_velocity: f64) -> f64 {
        let rate = self.rate();
        initial_value + (initial_velocity / rate) * (1.0 - (-rate * play_time_millis).exp())
    }

    fn velocity_at(
        &self,
        play_time_millis: f64,
        _initial_value: f64,
        initial_velocity: f64,
    ) -> f64 {
        initial_velocity * (-self.rate() * play_time_millis).exp()
    }

    fn target_value(&self, initial_value: f64, initial_velocity: f64) -> f64 {
        initial_value + initial_velocity / self.rate()
    }
}

/// Nearest multiple of `spacing` to `x`.
///
/// The remainder is taken against the floor so negative positions behave the
/// same as positive ones; an exact half rounds toward the higher grid line.
pub fn closest_center(x: f64, spacing: f64) -> f64 {
    let lower = (x / spacing).floor() * spacing;
    if x - lower < spacing / 2.0 {
        lower
    } else {
        lower + spacing
    }
}

/// Frame-stepped queries against a decay curve.
#[derive(Debug, Clone, Copy, Default)]
pub struct MomentumSolver {
    spec: ExponentialDecaySpec,
}

impl MomentumSolver {
    pub fn new(spec: ExponentialDecaySpec) -> Self {
        Self { spec }
    }

    pub fn spec(&self) -> ExponentialDecaySpec {
        self.spec
    }

    /// Where a fling released at `x0` with `velocity` comes to rest.
    ///
    /// Steps one frame at a time until the per-frame movement drops below
    /// [`CONVERGENCE_DISTANCE`].
    pub fn rest_position(&self, x0: f64, velocity: f64) -> Result<f64, AnimationError> {
        check_finite(x0, velocity)?;
        let mut t = 0.0;
        let mut previous = x0;
        for _ in 0..MAX_SOLVER_STEPS {
            t += FRAME_MILLIS;
            let x = self.spec.value_at(t, x0, velocity);
            if (x - previous).abs() < CONVERGENCE_DISTANCE {
                return Ok(x);
            }
            previous = x;
        }
        Err(self.diverged(x0, velocity))
    }

    /// Grid point nearest to the resting position.
    pub fn snap_center(&self, x0: f64, velocity: f64, spacing: f64) -> Result<f64, AnimationError> {
        Ok(closest_center(self.rest_position(x0, velocity)?, spacing))
    }

    /// Velocity of the decay at the first frame that lands strictly inside
    /// `(low, high)`.
    ///
    /// If the decay slows below [`STOPPED_VELOCITY`] before reaching the
    /// window, that near-zero velocity is returned instead.
    pub fn velocity_at_bounds(
        &self,
        x0: f64,
        velocity: f64,
        low: f64,
        high: f64,
    ) -> Result<f64, AnimationError> {
        check_finite(x0, velocity)?;
        let mut t = 0.0;
        let mut previous = x0;
        for _ in 0..MAX_SOLVER_STEPS {
            t += FRAME_MILLIS;
            let x = self.spec.value_at(t, x0, velocity);
            let frame_velocity = (x - previous) / FRAME_MILLIS;
            if x > low && x < high {
                return Ok(frame_velocity);
            }
            if frame_velocity.abs() < STOPPED_VELOCITY {
                return Ok(frame_velocity);
            }
            previous = x;
        }
        Err(self.diverged(x0, velocity))
    }

    fn diverged(&self, x0: f64, velocity: f64) -> AnimationError {
        log::error!(
            "momentum solver exceeded {MAX_SOLVER_STEPS} steps (x0 {x0}, velocity {velocity}, deceleration {})",
            self.spec.deceleration()
        );
        AnimationError::SolverDiverged {
            steps: MAX_SOLVER_STEPS,
        }
    }
}

fn check_finite(x0: f64, velocity: f64) -> Result<(), AnimationError> {
    if !x0.is_finite() {
        return Err(AnimationError::InvalidValue { value: x0 });
    }
    if !velocity.is_finite() {
        return Err(AnimationError::InvalidVelocity { velocity });
    }
    Ok(())
}
