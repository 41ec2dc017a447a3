/// Rejections raised when configuring or starting a trajectory.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AnimationError {
    /// Deceleration outside the open interval `(0, 1)`; the decay would never settle.
    InvalidDeceleration { deceleration: f64 },
    InvalidVelocity { velocity: f64 },
    InvalidTarget { target: f64 },
    /// The value a trajectory would start from is NaN or infinite.
    InvalidValue { value: f64 },
    /// A momentum solver loop ran past its iteration cap.
    SolverDiverged { steps: usize },
    /// The runtime backing the frame clock has been dropped.
    RuntimeUnavailable,
}

impl std::fmt::Display for AnimationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AnimationError::InvalidDeceleration { deceleration } => {
                write!(f, "deceleration {deceleration} must lie strictly between 0 and 1")
            }
            AnimationError::InvalidVelocity { velocity } => {
                write!(f, "trajectory velocity {velocity} is not finite")
            }
            AnimationError::InvalidTarget { target } => {
                write!(f, "spring target {target} is not finite")
            }
            AnimationError::InvalidValue { value } => {
                write!(f, "starting value {value} is not finite")
            }
            AnimationError::SolverDiverged { steps } => {
                write!(f, "momentum solver did not converge within {steps} steps")
            }
            AnimationError::RuntimeUnavailable => {
                write!(f, "frame clock runtime is no longer alive")
            }
        }
    }
}

impl std::error::Error for AnimationError {}
