//! Window + runtime loop.
//!
//! Owns the `winit` event loop, the window and its OpenGL context, and drives
//! a [`core::App`](crate::core::App) once per frame.

mod runtime;

pub use runtime::{Runtime, RuntimeConfig};
