//! Spring physics
//!
//! A second-order damped spring integrated with RK4:
//!
//! ```text
//! a = (-stiffness * (x - target) - damping * v) / mass
//! ```
//!
//! Springs are interruptible. Changing the target mid-flight keeps the
//! current value and velocity, so motion bends toward the new target instead
//! of snapping.

use serde::{Deserialize, Serialize};

/// Largest integration step in seconds; longer frames are subdivided
const MAX_SUBSTEP: f32 = 1.0 / 240.0;

/// Longest frame simulated in one `step`; longer gaps are treated as this
pub const MAX_FRAME_DT: f32 = 0.1;

/// Default distance/speed below which a spring is considered at rest
pub const DEFAULT_PRECISION: f32 = 0.01;

/// Spring parameters
///
/// `tension`/`friction` are accepted as aliases for `stiffness`/`damping`
/// when deserializing.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpringConfig {
    #[serde(alias = "tension")]
    pub stiffness: f32,
    #[serde(alias = "friction")]
    pub damping: f32,
    #[serde(default = "default_mass")]
    pub mass: f32,
}

fn default_mass() -> f32 {
    1.0
}

impl SpringConfig {
    pub const fn new(stiffness: f32, damping: f32, mass: f32) -> Self {
        Self {
            stiffness,
            damping,
            mass,
        }
    }

    /// Damping ratio; `>= 1.0` means the spring never overshoots
    pub fn damping_ratio(&self) -> f32 {
        self.damping / (2.0 * (self.stiffness * self.mass).sqrt())
    }

    fn acceleration(&self, displacement: f32, velocity: f32) -> f32 {
        (-self.stiffness * displacement - self.damping * velocity) / self.mass
    }
}

impl Default for SpringConfig {
    fn default() -> Self {
        Self::new(170.0, 26.0, 1.0)
    }
}

/// A single animated scalar
#[derive(Clone, Debug)]
pub struct Spring {
    config: SpringConfig,
    value: f32,
    velocity: f32,
    target: f32,
    precision: f32,
}

impl Spring {
    /// Create a spring resting at `initial`
    pub fn new(config: SpringConfig, initial: f32) -> Self {
        Self {
            config,
            value: initial,
            velocity: 0.0,
            target: initial,
            precision: DEFAULT_PRECISION,
        }
    }

    /// Override the rest threshold (same unit as the value)
    pub fn with_precision(mut self, precision: f32) -> Self {
        self.precision = precision.abs().max(f32::EPSILON);
        self
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    pub fn velocity(&self) -> f32 {
        self.velocity
    }

    pub fn target(&self) -> f32 {
        self.target
    }

    /// Retarget the spring
    ///
    /// Returns `false` when the target is unchanged, in which case nothing
    /// about the simulation is touched. Value and velocity always carry over.
    pub fn set_target(&mut self, target: f32) -> bool {
        if target == self.target {
            return false;
        }
        self.target = target;
        true
    }

    /// Whether the spring is at rest on its target
    pub fn is_settled(&self) -> bool {
        self.velocity.abs() < self.precision && (self.target - self.value).abs() < self.precision
    }

    /// Advance the simulation by `dt` seconds
    ///
    /// Returns `true` while the spring is still moving.
    pub fn step(&mut self, dt: f32) -> bool {
        if dt <= 0.0 || !dt.is_finite() {
            return !self.is_settled();
        }
        if self.is_settled() {
            // Settled springs rest exactly on target
            self.value = self.target;
            self.velocity = 0.0;
            return false;
        }

        let dt = dt.min(MAX_FRAME_DT);
        let substeps = (dt / MAX_SUBSTEP).ceil().max(1.0) as u32;
        let h = dt / substeps as f32;
        for _ in 0..substeps {
            self.rk4(h);
        }

        if self.is_settled() {
            self.value = self.target;
            self.velocity = 0.0;
            return false;
        }
        true
    }

    fn rk4(&mut self, h: f32) {
        let cfg = self.config;
        let x = self.value - self.target;
        let v = self.velocity;

        let k1x = v;
        let k1v = cfg.acceleration(x, v);

        let k2x = v + 0.5 * h * k1v;
        let k2v = cfg.acceleration(x + 0.5 * h * k1x, k2x);

        let k3x = v + 0.5 * h * k2v;
        let k3v = cfg.acceleration(x + 0.5 * h * k2x, k3x);

        let k4x = v + h * k3v;
        let k4v = cfg.acceleration(x + h * k3x, k4x);

        self.value += h / 6.0 * (k1x + 2.0 * k2x + 2.0 * k3x + k4x);
        self.velocity += h / 6.0 * (k1v + 2.0 * k2v + 2.0 * k3v + k4v);
    }
}
