//! GPU access.
//!
//! [`GpuApi`] is the seam between rendering code and OpenGL. [`GlGpu`] is the
//! real implementation over `glow`; [`RecordingGpu`] (feature `recording`)
//! records calls for headless tests.

mod api;
mod error;
mod gl;
#[cfg(any(test, feature = "recording"))]
mod recording;

pub use api::{BlendFactor, BlendFunc, GpuApi, PipelineState, VertexAttrib};
pub use error::StartupError;
pub use gl::{GlGpu, MIN_GL_VERSION};
#[cfg(any(test, feature = "recording"))]
pub use recording::{GpuCall, ObjectKind, RecHandle, RecUniform, RecordingGpu};
