//! GLSL program sources.
//!
//! Sources are plain text read from disk; compilation happens in
//! [`GpuApi::create_program`](crate::device::GpuApi::create_program).

mod source;

pub use source::ProgramSource;
