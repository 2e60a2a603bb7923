use std::ffi::{c_void, CStr};
use std::ops::Range;

use anyhow::{anyhow, bail, Result};
use glam::Mat4;
use glow::HasContext;

use super::api::{BlendFactor, GpuApi, PipelineState, VertexAttrib};
use super::error::StartupError;
use crate::shader::ProgramSource;

/// Oldest context version the renderer accepts.
pub const MIN_GL_VERSION: (u32, u32) = (3, 3);

/// Strings reported by the driver after loading.
struct GlInfo {
    version: (u32, u32),
    version_string: String,
    renderer: String,
    vendor: String,
}

/// [`GpuApi`] backed by a loaded `glow` context.
///
/// The owning thread must keep the GL context current for as long as this
/// value is used.
pub struct GlGpu {
    gl: glow::Context,
    depth_test: bool,
}

impl GlGpu {
    /// Resolves OpenGL entry points through `loader`.
    ///
    /// # Safety
    ///
    /// A context must be current on this thread and `loader` must return
    /// addresses valid for that context.
    pub unsafe fn load<F>(mut loader: F) -> Result<Self, StartupError>
    where
        F: FnMut(&CStr) -> *const c_void,
    {
        if loader(c"glGetString").is_null() {
            return Err(StartupError::Loader(
                "glGetString could not be resolved".to_string(),
            ));
        }

        let gl = unsafe { glow::Context::from_loader_function_cstr(&mut loader) };
        Self::from_context(gl)
    }

    fn from_context(gl: glow::Context) -> Result<Self, StartupError> {
        let info = unsafe {
            let v = gl.version();
            GlInfo {
                version: (v.major, v.minor),
                version_string: gl.get_parameter_string(glow::VERSION),
                renderer: gl.get_parameter_string(glow::RENDERER),
                vendor: gl.get_parameter_string(glow::VENDOR),
            }
        };

        if info.version < MIN_GL_VERSION {
            return Err(StartupError::Loader(format!(
                "OpenGL {}.{} or newer is required, context reports {}",
                MIN_GL_VERSION.0, MIN_GL_VERSION.1, info.version_string
            )));
        }

        log::info!(
            "OpenGL {} ({}, {})",
            info.version_string,
            info.renderer,
            info.vendor
        );

        Ok(Self {
            gl,
            depth_test: false,
        })
    }

    unsafe fn compile_stage(&self, stage: u32, source: &str, label: &str) -> Result<glow::Shader> {
        let gl = &self.gl;
        unsafe {
            let shader = gl
                .create_shader(stage)
                .map_err(|e| anyhow!("failed to create {} shader for {label}: {e}", stage_name(stage)))?;
            gl.shader_source(shader, source);
            gl.compile_shader(shader);

            if !gl.get_shader_compile_status(shader) {
                let info_log = gl.get_shader_info_log(shader);
                gl.delete_shader(shader);
                bail!("{} shader of {label} failed to compile: {info_log}", stage_name(stage));
            }

            Ok(shader)
        }
    }
}

impl GpuApi for GlGpu {
    type VertexArray = glow::VertexArray;
    type Buffer = glow::Buffer;
    type Program = glow::Program;
    type Uniform = glow::UniformLocation;

    fn create_vertex_array(&mut self) -> Result<glow::VertexArray> {
        unsafe { self.gl.create_vertex_array() }
            .map_err(|e| anyhow!("failed to create vertex array: {e}"))
    }

    fn bind_vertex_array(&mut self, vao: glow::VertexArray) {
        unsafe { self.gl.bind_vertex_array(Some(vao)) }
    }

    fn delete_vertex_array(&mut self, vao: glow::VertexArray) {
        unsafe { self.gl.delete_vertex_array(vao) }
    }

    fn create_static_buffer(&mut self, bytes: &[u8]) -> Result<glow::Buffer> {
        let gl = &self.gl;
        unsafe {
            let buffer = gl
                .create_buffer()
                .map_err(|e| anyhow!("failed to create buffer: {e}"))?;
            gl.bind_buffer(glow::ARRAY_BUFFER, Some(buffer));
            gl.buffer_data_u8_slice(glow::ARRAY_BUFFER, bytes, glow::STATIC_DRAW);
            log::debug!("uploaded {} bytes to static array buffer", bytes.len());
            Ok(buffer)
        }
    }

    fn delete_buffer(&mut self, buffer: glow::Buffer) {
        unsafe { self.gl.delete_buffer(buffer) }
    }

    fn create_program(&mut self, source: &ProgramSource) -> Result<glow::Program> {
        let label = source.label();
        unsafe {
            let vertex = self.compile_stage(glow::VERTEX_SHADER, source.vertex(), label)?;
            let fragment = match self.compile_stage(glow::FRAGMENT_SHADER, source.fragment(), label) {
                Ok(shader) => shader,
                Err(e) => {
                    self.gl.delete_shader(vertex);
                    return Err(e);
                }
            };

            let gl = &self.gl;
            let program = match gl.create_program() {
                Ok(program) => program,
                Err(e) => {
                    gl.delete_shader(vertex);
                    gl.delete_shader(fragment);
                    bail!("failed to create program {label}: {e}");
                }
            };

            gl.attach_shader(program, vertex);
            gl.attach_shader(program, fragment);
            gl.link_program(program);

            let linked = gl.get_program_link_status(program);
            let info_log = if linked { String::new() } else { gl.get_program_info_log(program) };

            gl.detach_shader(program, vertex);
            gl.detach_shader(program, fragment);
            gl.delete_shader(vertex);
            gl.delete_shader(fragment);

            if !linked {
                gl.delete_program(program);
                bail!("program {label} failed to link: {info_log}");
            }

            log::debug!("linked program {label}");
            Ok(program)
        }
    }

    fn delete_program(&mut self, program: glow::Program) {
        unsafe { self.gl.delete_program(program) }
    }

    fn uniform_location(&mut self, program: glow::Program, name: &str) -> Option<glow::UniformLocation> {
        unsafe { self.gl.get_uniform_location(program, name) }
    }

    fn apply_pipeline_state(&mut self, state: &PipelineState) {
        let gl = &self.gl;
        let [r, g, b, a] = state.clear_color;
        unsafe {
            gl.clear_color(r, g, b, a);

            match state.blend {
                Some(func) => {
                    gl.enable(glow::BLEND);
                    gl.blend_func(gl_blend_factor(func.src), gl_blend_factor(func.dst));
                }
                None => gl.disable(glow::BLEND),
            }

            if state.depth_test {
                gl.enable(glow::DEPTH_TEST);
                gl.depth_func(glow::LESS);
            } else {
                gl.disable(glow::DEPTH_TEST);
            }
        }
        self.depth_test = state.depth_test;
    }

    fn clear(&mut self) {
        let mut mask = glow::COLOR_BUFFER_BIT;
        if self.depth_test {
            mask |= glow::DEPTH_BUFFER_BIT;
        }
        unsafe { self.gl.clear(mask) }
    }

    fn enable_attrib(&mut self, buffer: glow::Buffer, attrib: &VertexAttrib) {
        let gl = &self.gl;
        unsafe {
            gl.enable_vertex_attrib_array(attrib.index);
            gl.bind_buffer(glow::ARRAY_BUFFER, Some(buffer));
            gl.vertex_attrib_pointer_f32(
                attrib.index,
                attrib.components,
                glow::FLOAT,
                attrib.normalized,
                attrib.stride,
                attrib.offset,
            );
        }
    }

    fn disable_attrib(&mut self, index: u32) {
        unsafe { self.gl.disable_vertex_attrib_array(index) }
    }

    fn use_program(&mut self, program: glow::Program) {
        unsafe { self.gl.use_program(Some(program)) }
    }

    fn set_uniform_mat4(&mut self, uniform: &glow::UniformLocation, value: &Mat4) {
        unsafe {
            self.gl
                .uniform_matrix_4_f32_slice(Some(uniform), false, &value.to_cols_array())
        }
    }

    fn draw_triangles(&mut self, vertices: Range<i32>) {
        let count = vertices.end - vertices.start;
        if count <= 0 {
            return;
        }
        unsafe { self.gl.draw_arrays(glow::TRIANGLES, vertices.start, count) }
    }
}

fn gl_blend_factor(f: BlendFactor) -> u32 {
    match f {
        BlendFactor::Zero => glow::ZERO,
        BlendFactor::One => glow::ONE,
        BlendFactor::SrcAlpha => glow::SRC_ALPHA,
        BlendFactor::OneMinusSrcAlpha => glow::ONE_MINUS_SRC_ALPHA,
    }
}

fn stage_name(stage: u32) -> &'static str {
    match stage {
        glow::VERTEX_SHADER => "vertex",
        glow::FRAGMENT_SHADER => "fragment",
        _ => "unknown",
    }
}
