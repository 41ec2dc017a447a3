use std::fmt;

use axispan_animation::AnimationError;

use crate::pan::Axis;

/// Rejections raised while validating a [`PanConfig`](crate::PanConfig).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConfigError {
    /// `min > max`, or a bound that is not finite.
    InvalidBounds { axis: Axis, min: f64, max: f64 },
    /// Snap release needs a positive, finite grid spacing.
    InvalidSnapSpacing { axis: Axis, spacing: f64 },
    InvalidReductionFactor { axis: Axis, factor: f64 },
    InvalidLockDistance { distance: f64 },
    Deceleration(AnimationError),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidBounds { axis, min, max } => {
                write!(f, "{axis} bounds [{min}, {max}] are not a finite, ordered range")
            }
            ConfigError::InvalidSnapSpacing { axis, spacing } => {
                write!(f, "{axis} snap spacing {spacing} must be positive and finite")
            }
            ConfigError::InvalidReductionFactor { axis, factor } => {
                write!(
                    f,
                    "{axis} overshoot reduction factor {factor} must be positive and finite"
                )
            }
            ConfigError::InvalidLockDistance { distance } => {
                write!(f, "direction lock distance {distance} must be non-negative")
            }
            ConfigError::Deceleration(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Deceleration(err) => Some(err),
            _ => None,
        }
    }
}

impl From<AnimationError> for ConfigError {
    fn from(err: AnimationError) -> Self {
        ConfigError::Deceleration(err)
    }
}

/// Errors surfaced by [`PanController`](crate::PanController).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PanError {
    Config(ConfigError),
    /// The animated value refused to start a trajectory for `axis`.
    Animation { axis: Axis, source: AnimationError },
}

impl fmt::Display for PanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PanError::Config(err) => write!(f, "invalid pan configuration: {err}"),
            PanError::Animation { axis, source } => {
                write!(f, "{axis} trajectory failed to start: {source}")
            }
        }
    }
}

impl std::error::Error for PanError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PanError::Config(err) => Some(err),
            PanError::Animation { source, .. } => Some(source),
        }
    }
}

impl From<ConfigError> for PanError {
    fn from(err: ConfigError) -> Self {
        PanError::Config(err)
    }
}
