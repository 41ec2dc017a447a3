/// Spring animation configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpringSpec {
    /// Damping ratio. 1.0 = critically damped, < 1.0 = under-damped (bouncy), > 1.0 = over-damped.
    pub damping_ratio: f64,
    /// Stiffness constant in 1/s². Higher values = faster animation.
    pub stiffness: f64,
    /// Speed (units/ms) below which the spring may stop.
    pub velocity_threshold: f64,
    /// Distance from the target below which the spring may stop.
    pub position_threshold: f64,
}

impl SpringSpec {
    /// Create a spring with default material design values.
    pub fn default_spring() -> Self {
        Self {
            damping_ratio: 1.0,
            stiffness: 1500.0,
            velocity_threshold: 0.001,
            position_threshold: 0.01,
        }
    }

    /// Create a bouncy spring.
    pub fn bouncy() -> Self {
        Self {
            damping_ratio: 0.5,
            ..Self::default_spring()
        }
    }

    /// Create a stiff spring (fast, no bounce).
    pub fn stiff() -> Self {
        Self {
            stiffness: 3000.0,
            ..Self::default_spring()
        }
    }

    pub fn with_damping_ratio(mut self, damping_ratio: f64) -> Self {
        self.damping_ratio = damping_ratio;
        self
    }

    pub fn with_stiffness(mut self, stiffness: f64) -> Self {
        self.stiffness = stiffness;
        self
    }
}

impl Default for SpringSpec {
    fn default() -> Self {
        Self::default_spring()
    }
}

/// Integration sub-step in seconds. Kept well below one frame so stiff,
/// heavily damped springs stay stable.
const SPRING_TIMESTEP_SECS: f64 = 0.001;

/// Damped harmonic oscillator toward a fixed target.
///
/// Velocity is stored in units/ms to match gesture velocities; the physics
/// runs in seconds.
#[derive(Debug, Clone, Copy)]
pub(crate) struct SpringSimulation {
    pub(crate) spec: SpringSpec,
    pub(crate) target: f64,
    pub(crate) position: f64,
    pub(crate) velocity: f64,
}

impl SpringSimulation {
    pub(crate) fn new(spec: SpringSpec, position: f64, target: f64, velocity: f64) -> Self {
        Self {
            spec,
            target,
            position,
            velocity,
        }
    }

    /// Advance by `elapsed_millis` using semi-implicit Euler sub-steps.
    pub(crate) fn advance(&mut self, elapsed_millis: f64) {
        let dt = elapsed_millis / 1000.0;
        let stiffness = self.spec.stiffness;
        let damping = 2.0 * self.spec.damping_ratio * stiffness.sqrt();
        let mut velocity = self.velocity * 1000.0;
        let mut elapsed = 0.0;
        while elapsed < dt {
            let step = SPRING_TIMESTEP_SECS.min(dt - elapsed);
            let displacement = self.position - self.target;
            let force = -stiffness * displacement - damping * velocity;
            velocity += force * step;
            self.position += velocity * step;
            elapsed += step;
        }
        self.velocity = velocity / 1000.0;
    }

    pub(crate) fn is_settled(&self) -> bool {
        self.velocity.abs() < self.spec.velocity_threshold
            && (self.position - self.target).abs() < self.spec.position_threshold
    }
}
