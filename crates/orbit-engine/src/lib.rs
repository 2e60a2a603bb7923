//! Orbit engine crate.
//!
//! Window/context runtime, OpenGL device access and the small amount of camera
//! math needed to render a scene from an orbiting eye.

pub mod core;
pub mod device;
pub mod input;
pub mod logging;
pub mod math;
pub mod shader;
pub mod time;
pub mod window;
