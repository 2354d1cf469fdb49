//! Numeric spring integration
//!
//! A scalar value is pulled toward a target by a damped spring, stepped once
//! per display frame with a semi-implicit Euler scheme. The damping ratio is
//! derived from a deceleration rate so a released fling decays like a
//! scroll view would.

use std::f32::consts::PI;

/// Deceleration rates matching platform scroll views (per millisecond)
pub struct DecelerationRate;

impl DecelerationRate {
    pub const NORMAL: f32 = 0.998;
    pub const FAST: f32 = 0.99;
}

/// Above this speed (points/s) the damping ratio follows the deceleration rate
const FLING_VELOCITY: f32 = 300.0;

/// Configuration for a spring animation
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SpringConfig {
    /// Per-millisecond decay rate used for the damping ratio of fast releases
    pub deceleration_rate: f32,
    /// Period of the undamped oscillation in seconds
    pub response_time: f32,
    /// Physical pixels per point; the animation stops within one pixel
    pub display_scale: f32,
}

impl SpringConfig {
    pub fn new(deceleration_rate: f32, response_time: f32, display_scale: f32) -> Self {
        Self {
            deceleration_rate,
            response_time,
            display_scale,
        }
    }

    /// The default panel attraction spring
    pub fn attraction() -> Self {
        Self::new(DecelerationRate::FAST + 0.001, 0.4, 1.0)
    }

    /// Snappier spring for short programmatic moves
    pub fn snappy() -> Self {
        Self::new(DecelerationRate::FAST, 0.25, 1.0)
    }

    pub fn with_display_scale(mut self, display_scale: f32) -> Self {
        self.display_scale = display_scale;
        self
    }

    pub fn frequency(&self) -> f32 {
        1.0 / self.response_time
    }

    /// Angular frequency in radians per second
    pub fn omega(&self) -> f32 {
        2.0 * PI * self.frequency()
    }

    /// Damping ratio for a release at `initial_velocity`
    ///
    /// Critically damped for slow releases.
    pub fn zeta(&self, initial_velocity: f32) -> f32 {
        if initial_velocity.abs() > FLING_VELOCITY {
            let duration = 0.001;
            self.deceleration_rate.ln() / (-2.0 * PI * self.frequency() * duration)
        } else {
            1.0
        }
    }

    /// Stop threshold in points
    fn pixel(&self) -> f32 {
        if self.display_scale > 0.0 {
            1.0 / self.display_scale
        } else {
            1.0
        }
    }
}

impl Default for SpringConfig {
    fn default() -> Self {
        Self::attraction()
    }
}

/// Outcome of one animator step
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SpringStep {
    /// Not running; nothing changed
    Idle,
    /// The value moved
    Update(f32),
    /// The animation settled and snapped to the target. Reported exactly once.
    Finished(f32),
}

/// A frame-driven spring animator for one scalar value
#[derive(Clone, Debug)]
pub struct SpringAnimator {
    value: f32,
    velocity: f32,
    target: f32,
    zeta: f32,
    omega: f32,
    pixel: f32,
    running: bool,
    completed: bool,
}

impl SpringAnimator {
    pub fn new(value: f32, velocity: f32, target: f32, config: SpringConfig) -> Self {
        Self {
            value,
            velocity,
            target,
            zeta: config.zeta(velocity),
            omega: config.omega(),
            pixel: config.pixel(),
            running: false,
            completed: false,
        }
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

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    /// Damping ratio chosen at construction
    pub fn zeta(&self) -> f32 {
        self.zeta
    }

    /// Start the animation. Returns false if it is already running or done.
    pub fn start(&mut self) -> bool {
        if self.running || self.completed {
            return false;
        }
        tracing::trace!(
            "spring start: value={} velocity={} target={}",
            self.value,
            self.velocity,
            self.target
        );
        self.running = true;
        true
    }

    /// Stop the animation
    ///
    /// With `without_finishing` the value stays where it is and no completion
    /// is reported. Otherwise `Finished` is returned once with the current
    /// value. Stopping a stopped animator is a no-op.
    pub fn stop(&mut self, without_finishing: bool) -> SpringStep {
        if !self.running {
            return SpringStep::Idle;
        }
        self.running = false;
        if without_finishing {
            tracing::trace!("spring interrupted at {}", self.value);
            return SpringStep::Idle;
        }
        self.completed = true;
        SpringStep::Finished(self.value)
    }

    /// Advance by `h` seconds
    pub fn step(&mut self, h: f32) -> SpringStep {
        if !self.running {
            return SpringStep::Idle;
        }
        let h = if h.is_finite() { h.max(0.0) } else { 0.0 };

        let pre = self.value;
        let (x, v) = integrate(self.value, self.velocity, self.target, self.zeta, self.omega, h);
        self.value = x;
        self.velocity = v;

        tracing::trace!(
            "spring step: h={:.4} x={:.3} v={:.3} target={}",
            h,
            x,
            v,
            self.target
        );

        if (self.target - x).abs() <= self.pixel && (pre - x).abs() / self.pixel <= 1.0 {
            self.value = self.target;
            self.velocity = 0.0;
            self.running = false;
            self.completed = true;
            return SpringStep::Finished(self.target);
        }
        SpringStep::Update(x)
    }
}

/// One semi-implicit spring step
///
/// `x` value, `v` velocity, `xt` target, `zeta` damping ratio,
/// `omega` angular frequency, `h` time step.
fn integrate(x: f32, v: f32, xt: f32, zeta: f32, omega: f32, h: f32) -> (f32, f32) {
    let f = 1.0 + 2.0 * h * zeta * omega;
    let h2 = h * h;
    let o2 = omega * omega;
    let det = f + h2 * o2;
    let x = (f * x + h * v + h2 * o2 * xt) / det;
    let v = (v + h * o2 * (xt - x)) / det;
    (x, v)
}
