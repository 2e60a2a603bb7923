//! Camera and transform math.
//!
//! Conventions follow OpenGL: right-handed world space, column-major matrices,
//! clip-space depth in `[-1, 1]`.

mod orbit;
mod perspective;
mod transform;

pub use orbit::{AngleStep, Orbit, OrbitConfig};
pub use perspective::Perspective;
pub use transform::{compose_mvp, look_at_origin};
