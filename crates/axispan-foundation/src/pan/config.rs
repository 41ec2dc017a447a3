//! Host-facing configuration for a [`PanController`](crate::PanController).
//!
//! Plain structs with `Default` and `with_*` builders. String-valued host
//! options parse through [`FromStr`].

use std::fmt;
use std::str::FromStr;

use axispan_animation::{ExponentialDecaySpec, SpringSpec};

use crate::error::ConfigError;
use crate::gesture_constants::{
    DEFAULT_DIRECTION_LOCK_DISTANCE, DEFAULT_OVERSHOOT_REDUCTION_FACTOR,
};
use crate::pan::Axis;

/// What happens when a gesture or release pushes past the bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Overshoot {
    /// Rubber-band while dragging, spring back to the violated bound on release.
    Spring,
    /// Hard stop at the bound.
    Clamp,
    /// No correction; the overshoot notification still fires.
    #[default]
    None,
}

/// Behavior of an axis when the gesture is released.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReleaseMode {
    /// Free exponential decay.
    Decay,
    /// Decay onto the nearest grid point.
    Snap,
    /// Spring back to zero.
    SpringOrigin,
}

/// Unrecognized host string for [`Overshoot`] or [`ReleaseMode`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseOptionError {
    kind: &'static str,
    value: String,
}

impl fmt::Display for ParseOptionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown {} `{}`", self.kind, self.value)
    }
}

impl std::error::Error for ParseOptionError {}

impl FromStr for Overshoot {
    type Err = ParseOptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "spring" => Ok(Overshoot::Spring),
            "clamp" => Ok(Overshoot::Clamp),
            "none" => Ok(Overshoot::None),
            other => Err(ParseOptionError {
                kind: "overshoot",
                value: other.to_string(),
            }),
        }
    }
}

impl FromStr for ReleaseMode {
    type Err = ParseOptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "decay" => Ok(ReleaseMode::Decay),
            "snap" => Ok(ReleaseMode::Snap),
            "spring-origin" => Ok(ReleaseMode::SpringOrigin),
            other => Err(ParseOptionError {
                kind: "release mode",
                value: other.to_string(),
            }),
        }
    }
}

/// Closed range `[min, max]` an axis value is expected to stay in.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Bounds {
    pub min: f64,
    pub max: f64,
}

impl Bounds {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    /// The bound `value` has crossed, if any.
    pub fn violated_bound(&self, value: f64) -> Option<f64> {
        if value < self.min {
            Some(self.min)
        } else if value > self.max {
            Some(self.max)
        } else {
            None
        }
    }

    pub fn clamp(&self, value: f64) -> f64 {
        value.max(self.min).min(self.max)
    }

    fn is_valid(&self) -> bool {
        self.min.is_finite() && self.max.is_finite() && self.min <= self.max
    }
}

/// Per-axis bounds and release behavior.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisConfig {
    pub bounds: Bounds,
    pub overshoot: Overshoot,
    /// `None` leaves the value where the release put it.
    pub mode: Option<ReleaseMode>,
    /// Grid spacing for [`ReleaseMode::Snap`].
    pub snap_spacing: f64,
    /// Divisor applied to the out-of-bounds part of a drag under [`Overshoot::Spring`].
    pub overshoot_reduction_factor: f64,
}

impl Default for AxisConfig {
    fn default() -> Self {
        Self {
            bounds: Bounds::default(),
            overshoot: Overshoot::default(),
            mode: None,
            snap_spacing: 0.0,
            overshoot_reduction_factor: DEFAULT_OVERSHOOT_REDUCTION_FACTOR,
        }
    }
}

impl AxisConfig {
    pub fn with_bounds(mut self, min: f64, max: f64) -> Self {
        self.bounds = Bounds::new(min, max);
        self
    }

    pub fn with_overshoot(mut self, overshoot: Overshoot) -> Self {
        self.overshoot = overshoot;
        self
    }

    pub fn with_mode(mut self, mode: ReleaseMode) -> Self {
        self.mode = Some(mode);
        self
    }

    pub fn with_snap_spacing(mut self, spacing: f64) -> Self {
        self.snap_spacing = spacing;
        self
    }

    pub fn with_overshoot_reduction_factor(mut self, factor: f64) -> Self {
        self.overshoot_reduction_factor = factor;
        self
    }

    pub fn validate(&self, axis: Axis) -> Result<(), ConfigError> {
        if !self.bounds.is_valid() {
            return Err(ConfigError::InvalidBounds {
                axis,
                min: self.bounds.min,
                max: self.bounds.max,
            });
        }
        if self.mode == Some(ReleaseMode::Snap)
            && !(self.snap_spacing.is_finite() && self.snap_spacing > 0.0)
        {
            return Err(ConfigError::InvalidSnapSpacing {
                axis,
                spacing: self.snap_spacing,
            });
        }
        let factor = self.overshoot_reduction_factor;
        if !(factor.is_finite() && factor > 0.0) {
            return Err(ConfigError::InvalidReductionFactor { axis, factor });
        }
        Ok(())
    }
}

/// Full controller configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanConfig {
    pub horizontal: bool,
    pub vertical: bool,
    pub lock_direction: bool,
    /// Distance along one axis that resolves the direction lock.
    pub direction_lock_distance: f64,
    pub x: AxisConfig,
    pub y: AxisConfig,
    pub decay: ExponentialDecaySpec,
    /// Spring back to a violated bound.
    pub overshoot_spring: SpringSpec,
    /// Spring used by [`ReleaseMode::SpringOrigin`].
    pub spring_origin: SpringSpec,
    /// Spring that lands a snap release on its grid point.
    pub snap_spring: SpringSpec,
}

impl Default for PanConfig {
    fn default() -> Self {
        Self {
            horizontal: false,
            vertical: false,
            lock_direction: false,
            direction_lock_distance: DEFAULT_DIRECTION_LOCK_DISTANCE,
            x: AxisConfig::default(),
            y: AxisConfig::default(),
            decay: ExponentialDecaySpec::default(),
            overshoot_spring: SpringSpec::default(),
            spring_origin: SpringSpec::default(),
            snap_spring: SpringSpec::default(),
        }
    }
}

impl PanConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_horizontal(mut self, horizontal: bool) -> Self {
        self.horizontal = horizontal;
        self
    }

    pub fn with_vertical(mut self, vertical: bool) -> Self {
        self.vertical = vertical;
        self
    }

    pub fn with_lock_direction(mut self, lock: bool) -> Self {
        self.lock_direction = lock;
        self
    }

    pub fn with_direction_lock_distance(mut self, distance: f64) -> Self {
        self.direction_lock_distance = distance;
        self
    }

    pub fn with_x(mut self, config: AxisConfig) -> Self {
        self.x = config;
        self
    }

    pub fn with_y(mut self, config: AxisConfig) -> Self {
        self.y = config;
        self
    }

    /// Set the per-millisecond velocity retention of release decays.
    pub fn with_deceleration(mut self, deceleration: f64) -> Result<Self, ConfigError> {
        self.decay = ExponentialDecaySpec::new(deceleration)?;
        Ok(self)
    }

    pub fn with_overshoot_spring(mut self, spec: SpringSpec) -> Self {
        self.overshoot_spring = spec;
        self
    }

    pub fn with_spring_origin(mut self, spec: SpringSpec) -> Self {
        self.spring_origin = spec;
        self
    }

    pub fn with_snap_spring(mut self, spec: SpringSpec) -> Self {
        self.snap_spring = spec;
        self
    }

    pub fn axis(&self, axis: Axis) -> &AxisConfig {
        match axis {
            Axis::X => &self.x,
            Axis::Y => &self.y,
        }
    }

    pub fn is_axis_enabled(&self, axis: Axis) -> bool {
        match axis {
            Axis::X => self.horizontal,
            Axis::Y => self.vertical,
        }
    }

    /// Direction fixed by the enabled axes alone, when exactly one is enabled.
    pub fn forced_direction(&self) -> Option<Axis> {
        match (self.horizontal, self.vertical) {
            (true, false) => Some(Axis::X),
            (false, true) => Some(Axis::Y),
            _ => None,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let distance = self.direction_lock_distance;
        if distance.is_nan() || distance < 0.0 {
            return Err(ConfigError::InvalidLockDistance { distance });
        }
        for axis in [Axis::X, Axis::Y] {
            if self.is_axis_enabled(axis) {
                self.axis(axis).validate(axis)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axispan_animation::AnimationError;

    #[test]
    fn parses_host_strings() {
        assert_eq!("spring".parse::<Overshoot>(), Ok(Overshoot::Spring));
        assert_eq!("clamp".parse::<Overshoot>(), Ok(Overshoot::Clamp));
        assert_eq!("none".parse::<Overshoot>(), Ok(Overshoot::None));
        assert_eq!("snap".parse::<ReleaseMode>(), Ok(ReleaseMode::Snap));
        assert_eq!(
            "spring-origin".parse::<ReleaseMode>(),
            Ok(ReleaseMode::SpringOrigin)
        );
        let err = "bounce".parse::<Overshoot>().unwrap_err();
        assert_eq!(err.to_string(), "unknown overshoot `bounce`");
    }

    #[test]
    fn defaults_match_unset_host_props() {
        let config = PanConfig::default();
        assert!(!config.horizontal && !config.vertical);
        assert_eq!(config.direction_lock_distance, 0.0);
        assert_eq!(config.x.bounds, Bounds::new(0.0, 0.0));
        assert_eq!(config.x.overshoot, Overshoot::None);
        assert_eq!(config.x.mode, None);
        assert_eq!(config.x.overshoot_reduction_factor, 1.0);
        assert_eq!(config.decay.deceleration(), 0.997);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn forced_direction_follows_enabled_axes() {
        assert_eq!(
            PanConfig::new().with_horizontal(true).forced_direction(),
            Some(Axis::X)
        );
        assert_eq!(
            PanConfig::new().with_vertical(true).forced_direction(),
            Some(Axis::Y)
        );
        let both = PanConfig::new().with_horizontal(true).with_vertical(true);
        assert_eq!(both.forced_direction(), None);
    }

    #[test]
    fn validate_rejects_inverted_bounds() {
        let config = PanConfig::new()
            .with_horizontal(true)
            .with_x(AxisConfig::default().with_bounds(10.0, -10.0));
        assert_eq!(
            config.validate(),
            Err(ConfigError::InvalidBounds {
                axis: Axis::X,
                min: 10.0,
                max: -10.0
            })
        );
    }

    #[test]
    fn validate_ignores_disabled_axes() {
        let config = PanConfig::new()
            .with_horizontal(true)
            .with_y(AxisConfig::default().with_bounds(f64::NAN, 0.0));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn validate_rejects_snap_without_spacing() {
        let config = PanConfig::new().with_vertical(true).with_y(
            AxisConfig::default()
                .with_bounds(0.0, 100.0)
                .with_mode(ReleaseMode::Snap),
        );
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidSnapSpacing { axis: Axis::Y, .. })
        ));
    }

    #[test]
    fn validate_rejects_bad_factor_and_lock_distance() {
        let config = PanConfig::new()
            .with_horizontal(true)
            .with_x(AxisConfig::default().with_overshoot_reduction_factor(0.0));
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidReductionFactor { .. })
        ));
        let config = PanConfig::new().with_direction_lock_distance(-1.0);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidLockDistance { .. })
        ));
    }

    #[test]
    fn deceleration_outside_unit_interval_is_rejected() {
        assert_eq!(
            PanConfig::new().with_deceleration(1.0),
            Err(ConfigError::Deceleration(
                AnimationError::InvalidDeceleration { deceleration: 1.0 }
            ))
        );
        assert!(PanConfig::new().with_deceleration(0.99).is_ok());
    }

    #[test]
    fn violated_bound_picks_the_crossed_side() {
        let bounds = Bounds::new(-5.0, 5.0);
        assert_eq!(bounds.violated_bound(-6.0), Some(-5.0));
        assert_eq!(bounds.violated_bound(6.0), Some(5.0));
        assert_eq!(bounds.violated_bound(5.0), None);
        assert_eq!(bounds.clamp(9.0), 5.0);
    }
}
