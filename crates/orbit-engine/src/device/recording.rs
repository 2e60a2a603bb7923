use std::collections::BTreeMap;
use std::ops::Range;

use anyhow::{bail, Result};
use glam::Mat4;

use super::api::{GpuApi, PipelineState, VertexAttrib};
use crate::shader::ProgramSource;

/// Kind of object a [`RecordingGpu`] handed out.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd)]
pub enum ObjectKind {
    VertexArray,
    Buffer,
    Program,
}

/// Handle issued by [`RecordingGpu`]. Ids are unique across kinds.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct RecHandle(pub u32);

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct RecUniform {
    pub program: RecHandle,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum GpuCall {
    CreateVertexArray(RecHandle),
    BindVertexArray(RecHandle),
    DeleteVertexArray(RecHandle),
    CreateBuffer { buffer: RecHandle, len: usize },
    DeleteBuffer(RecHandle),
    CreateProgram { program: RecHandle, label: String },
    DeleteProgram(RecHandle),
    UniformLocation { program: RecHandle, name: String },
    ApplyPipelineState(PipelineState),
    Clear,
    EnableAttrib { buffer: RecHandle, attrib: VertexAttrib },
    DisableAttrib(u32),
    UseProgram(RecHandle),
    SetUniformMat4 { uniform: RecUniform, value: Mat4 },
    DrawTriangles(Range<i32>),
}

/// Headless [`GpuApi`] that records every call.
///
/// Tracks which objects are alive so tests can assert that everything created
/// was released exactly once. Deleting an unknown or already deleted handle is
/// recorded as a bad release rather than panicking.
#[derive(Debug, Default)]
pub struct RecordingGpu {
    calls: Vec<GpuCall>,
    next_id: u32,
    live: BTreeMap<RecHandle, ObjectKind>,
    created: BTreeMap<RecHandle, ObjectKind>,
    bad_releases: Vec<RecHandle>,
    buffers: BTreeMap<RecHandle, Vec<u8>>,
    fail_program: Option<String>,
}

impl RecordingGpu {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes `create_program` fail for sources whose label contains `needle`.
    pub fn fail_program_containing(mut self, needle: impl Into<String>) -> Self {
        self.fail_program = Some(needle.into());
        self
    }

    pub fn calls(&self) -> &[GpuCall] {
        &self.calls
    }

    pub fn clear_calls(&mut self) {
        self.calls.clear();
    }

    /// Objects created and not yet deleted.
    pub fn live_objects(&self) -> Vec<(RecHandle, ObjectKind)> {
        self.live.iter().map(|(h, k)| (*h, *k)).collect()
    }

    /// Every object ever created, deleted or not.
    pub fn created_objects(&self) -> Vec<(RecHandle, ObjectKind)> {
        self.created.iter().map(|(h, k)| (*h, *k)).collect()
    }

    pub fn created_count(&self, kind: ObjectKind) -> usize {
        self.created.values().filter(|k| **k == kind).count()
    }

    /// Deletes of handles that were never created, already deleted, or of
    /// the wrong kind.
    pub fn bad_releases(&self) -> &[RecHandle] {
        &self.bad_releases
    }

    /// Bytes uploaded to `buffer` at creation.
    pub fn buffer_contents(&self, buffer: RecHandle) -> Option<&[u8]> {
        self.buffers.get(&buffer).map(Vec::as_slice)
    }

    /// Number of times `handle` was passed to a delete call.
    pub fn release_count(&self, handle: RecHandle) -> usize {
        self.calls
            .iter()
            .filter(|c| match c {
                GpuCall::DeleteVertexArray(h) | GpuCall::DeleteBuffer(h) | GpuCall::DeleteProgram(h) => {
                    *h == handle
                }
                _ => false,
            })
            .count()
    }

    fn issue(&mut self, kind: ObjectKind) -> RecHandle {
        self.next_id += 1;
        let handle = RecHandle(self.next_id);
        self.live.insert(handle, kind);
        self.created.insert(handle, kind);
        handle
    }

    fn release(&mut self, handle: RecHandle, kind: ObjectKind) {
        match self.live.get(&handle) {
            Some(k) if *k == kind => {
                self.live.remove(&handle);
            }
            _ => self.bad_releases.push(handle),
        }
    }
}

impl GpuApi for RecordingGpu {
    type VertexArray = RecHandle;
    type Buffer = RecHandle;
    type Program = RecHandle;
    type Uniform = RecUniform;

    fn create_vertex_array(&mut self) -> Result<RecHandle> {
        let vao = self.issue(ObjectKind::VertexArray);
        self.calls.push(GpuCall::CreateVertexArray(vao));
        Ok(vao)
    }

    fn bind_vertex_array(&mut self, vao: RecHandle) {
        self.calls.push(GpuCall::BindVertexArray(vao));
    }

    fn delete_vertex_array(&mut self, vao: RecHandle) {
        self.calls.push(GpuCall::DeleteVertexArray(vao));
        self.release(vao, ObjectKind::VertexArray);
    }

    fn create_static_buffer(&mut self, bytes: &[u8]) -> Result<RecHandle> {
        let buffer = self.issue(ObjectKind::Buffer);
        self.buffers.insert(buffer, bytes.to_vec());
        self.calls.push(GpuCall::CreateBuffer {
            buffer,
            len: bytes.len(),
        });
        Ok(buffer)
    }

    fn delete_buffer(&mut self, buffer: RecHandle) {
        self.calls.push(GpuCall::DeleteBuffer(buffer));
        self.release(buffer, ObjectKind::Buffer);
    }

    fn create_program(&mut self, source: &ProgramSource) -> Result<RecHandle> {
        if let Some(needle) = &self.fail_program {
            if source.label().contains(needle.as_str()) {
                bail!("program {} failed to link: injected failure", source.label());
            }
        }

        let program = self.issue(ObjectKind::Program);
        self.calls.push(GpuCall::CreateProgram {
            program,
            label: source.label().to_string(),
        });
        Ok(program)
    }

    fn delete_program(&mut self, program: RecHandle) {
        self.calls.push(GpuCall::DeleteProgram(program));
        self.release(program, ObjectKind::Program);
    }

    fn uniform_location(&mut self, program: RecHandle, name: &str) -> Option<RecUniform> {
        self.calls.push(GpuCall::UniformLocation {
            program,
            name: name.to_string(),
        });
        self.live.contains_key(&program).then(|| RecUniform {
            program,
            name: name.to_string(),
        })
    }

    fn apply_pipeline_state(&mut self, state: &PipelineState) {
        self.calls.push(GpuCall::ApplyPipelineState(*state));
    }

    fn clear(&mut self) {
        self.calls.push(GpuCall::Clear);
    }

    fn enable_attrib(&mut self, buffer: RecHandle, attrib: &VertexAttrib) {
        self.calls.push(GpuCall::EnableAttrib {
            buffer,
            attrib: *attrib,
        });
    }

    fn disable_attrib(&mut self, index: u32) {
        self.calls.push(GpuCall::DisableAttrib(index));
    }

    fn use_program(&mut self, program: RecHandle) {
        self.calls.push(GpuCall::UseProgram(program));
    }

    fn set_uniform_mat4(&mut self, uniform: &RecUniform, value: &Mat4) {
        self.calls.push(GpuCall::SetUniformMat4 {
            uniform: uniform.clone(),
            value: *value,
        });
    }

    fn draw_triangles(&mut self, vertices: Range<i32>) {
        self.calls.push(GpuCall::DrawTriangles(vertices));
    }
}
