use std::fmt::Debug;
use std::ops::Range;

use anyhow::Result;
use glam::Mat4;

use crate::shader::ProgramSource;

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum BlendFactor {
    Zero,
    One,
    SrcAlpha,
    OneMinusSrcAlpha,
}

/// Source/destination factors for `dst = src * s + dst * d`.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct BlendFunc {
    pub src: BlendFactor,
    pub dst: BlendFactor,
}

impl BlendFunc {
    /// Classic "over" blending for straight alpha.
    pub const ALPHA: BlendFunc = BlendFunc {
        src: BlendFactor::SrcAlpha,
        dst: BlendFactor::OneMinusSrcAlpha,
    };
}

/// Fixed pipeline state applied once after startup.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PipelineState {
    pub clear_color: [f32; 4],
    pub blend: Option<BlendFunc>,
    pub depth_test: bool,
}

/// Float vertex attribute sourced from an array buffer.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct VertexAttrib {
    pub index: u32,
    pub components: i32,
    pub normalized: bool,
    /// Bytes between consecutive vertices; 0 means tightly packed.
    pub stride: i32,
    pub offset: i32,
}

impl VertexAttrib {
    /// Tightly packed, non-normalized `vec3` at `index`.
    pub const fn packed_vec3(index: u32) -> Self {
        Self {
            index,
            components: 3,
            normalized: false,
            stride: 0,
            offset: 0,
        }
    }
}

/// The slice of OpenGL the renderer uses.
///
/// Handles are plain copyable names; the implementor does not track
/// ownership. Whoever creates an object is responsible for deleting it exactly
/// once, with the context current.
pub trait GpuApi {
    type VertexArray: Copy + Debug;
    type Buffer: Copy + Debug;
    type Program: Copy + Debug;
    type Uniform: Debug;

    fn create_vertex_array(&mut self) -> Result<Self::VertexArray>;
    fn bind_vertex_array(&mut self, vao: Self::VertexArray);
    fn delete_vertex_array(&mut self, vao: Self::VertexArray);

    /// Creates an array buffer and uploads `bytes` with static usage.
    fn create_static_buffer(&mut self, bytes: &[u8]) -> Result<Self::Buffer>;
    fn delete_buffer(&mut self, buffer: Self::Buffer);

    /// Compiles both stages and links them. Stage objects do not outlive the call.
    fn create_program(&mut self, source: &ProgramSource) -> Result<Self::Program>;
    fn delete_program(&mut self, program: Self::Program);
    fn uniform_location(&mut self, program: Self::Program, name: &str) -> Option<Self::Uniform>;

    fn apply_pipeline_state(&mut self, state: &PipelineState);
    fn clear(&mut self);

    fn enable_attrib(&mut self, buffer: Self::Buffer, attrib: &VertexAttrib);
    fn disable_attrib(&mut self, index: u32);

    fn use_program(&mut self, program: Self::Program);
    /// Uploads a column-major matrix to a uniform of the program in use.
    fn set_uniform_mat4(&mut self, uniform: &Self::Uniform, value: &Mat4);
    fn draw_triangles(&mut self, vertices: Range<i32>);
}
