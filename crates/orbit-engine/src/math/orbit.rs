use glam::DVec3;

/// How far the orbit angle moves on each frame.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum AngleStep {
    /// Fixed radians per rendered frame. Rotation speed follows the frame rate.
    PerFrame(f64),

    /// Radians per second of frame time. Rotation speed is frame-rate independent.
    PerSecond(f64),
}

impl AngleStep {
    /// Angle delta for a frame that took `dt` seconds.
    #[inline]
    pub fn delta(self, dt: f64) -> f64 {
        match self {
            AngleStep::PerFrame(rad) => rad,
            AngleStep::PerSecond(rad_per_s) => rad_per_s * dt,
        }
    }
}

impl Default for AngleStep {
    fn default() -> Self {
        AngleStep::PerFrame(0.001)
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct OrbitConfig {
    /// Distance from the origin to the eye.
    pub radius: f64,
    pub step: AngleStep,
}

impl Default for OrbitConfig {
    fn default() -> Self {
        Self {
            radius: 2.0,
            step: AngleStep::default(),
        }
    }
}

/// Eye circling the origin in the XZ plane.
///
/// The angle only ever grows; it is never wrapped, so after `n` per-frame
/// steps it equals `n * step` up to rounding.
#[derive(Debug, Clone)]
pub struct Orbit {
    config: OrbitConfig,
    angle: f64,
}

impl Orbit {
    pub fn new(config: OrbitConfig) -> Self {
        Self { config, angle: 0.0 }
    }

    #[inline]
    pub fn angle(&self) -> f64 {
        self.angle
    }

    #[inline]
    pub fn config(&self) -> &OrbitConfig {
        &self.config
    }

    /// Advances the angle by one frame of `dt` seconds.
    pub fn advance(&mut self, dt: f64) {
        self.angle += self.config.step.delta(dt);
    }

    /// Eye position for the current angle.
    pub fn eye(&self) -> DVec3 {
        eye_at(self.angle, self.config.radius)
    }
}

/// `(cos(angle) * radius, 0, sin(angle) * radius)`.
#[inline]
pub fn eye_at(angle: f64, radius: f64) -> DVec3 {
    DVec3::new(angle.cos() * radius, 0.0, angle.sin() * radius)
}
