use std::ops::Range;

use anyhow::Result;
use bytemuck::{Pod, Zeroable};
use glam::Mat4;
use orbit_engine::device::{GpuApi, VertexAttrib};
use orbit_engine::math::{compose_mvp, look_at_origin, Orbit};
use orbit_engine::shader::ProgramSource;

use crate::config::{SceneConfig, SceneSources};

/// Position-only vertex. Must stay in sync with [`POSITION_ATTRIB`].
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
}

const fn v(x: f32, y: f32, z: f32) -> Vertex {
    Vertex { position: [x, y, z] }
}

#[rustfmt::skip]
pub const VERTICES: [Vertex; 6] = [
    // red
    v(-0.75, -0.75,  0.0),
    v(-0.75,  0.75,  0.0),
    v( 0.75,  0.4,   0.3),
    // blue
    v( 0.75, -0.75,  0.0),
    v( 0.75,  0.75,  0.0),
    v(-0.75, -0.3,  -0.3),
];

pub const RED_VERTICES: Range<i32> = 0..3;
pub const BLUE_VERTICES: Range<i32> = 3..6;

pub const POSITION_ATTRIB: VertexAttrib = VertexAttrib::packed_vec3(0);
pub const MVP_UNIFORM: &str = "MVP";

/// One program drawing one slice of the shared vertex buffer.
struct TrianglePass<G: GpuApi> {
    program: G::Program,
    mvp: Option<G::Uniform>,
    vertices: Range<i32>,
}

impl<G: GpuApi> TrianglePass<G> {
    fn new(gpu: &mut G, source: &ProgramSource, vertices: Range<i32>) -> Result<Self> {
        let program = gpu.create_program(source)?;
        let mvp = gpu.uniform_location(program, MVP_UNIFORM);
        if mvp.is_none() {
            log::warn!("program {} has no active {MVP_UNIFORM} uniform", source.label());
        }

        Ok(Self {
            program,
            mvp,
            vertices,
        })
    }

    fn draw(&self, gpu: &mut G, mvp: &Mat4) {
        gpu.use_program(self.program);
        if let Some(uniform) = &self.mvp {
            gpu.set_uniform_mat4(uniform, mvp);
        }
        gpu.draw_triangles(self.vertices.clone());
    }

    fn release(self, gpu: &mut G) {
        gpu.delete_program(self.program);
    }
}

/// GPU objects plus camera state for the two blended triangles.
///
/// Every object is created in [`TwoTriangles::create`] and deleted in
/// [`TwoTriangles::release`], which consumes the scene.
pub struct TwoTriangles<G: GpuApi> {
    vao: G::VertexArray,
    vbo: G::Buffer,
    red: TrianglePass<G>,
    blue: TrianglePass<G>,
    orbit: Orbit,
    projection: Mat4,
    model: Mat4,
}

impl<G: GpuApi> TwoTriangles<G> {
    /// Creates the vertex array, both programs and the vertex buffer, then
    /// applies the pipeline state. On error, anything already created is
    /// deleted before returning.
    pub fn create(gpu: &mut G, sources: &SceneSources, config: &SceneConfig) -> Result<Self> {
        let vao = gpu.create_vertex_array()?;
        gpu.bind_vertex_array(vao);

        let red = match TrianglePass::new(gpu, &sources.red, RED_VERTICES) {
            Ok(pass) => pass,
            Err(e) => {
                gpu.delete_vertex_array(vao);
                return Err(e);
            }
        };

        let blue = match TrianglePass::new(gpu, &sources.blue, BLUE_VERTICES) {
            Ok(pass) => pass,
            Err(e) => {
                red.release(gpu);
                gpu.delete_vertex_array(vao);
                return Err(e);
            }
        };

        let vbo = match gpu.create_static_buffer(bytemuck::cast_slice(&VERTICES)) {
            Ok(buffer) => buffer,
            Err(e) => {
                blue.release(gpu);
                red.release(gpu);
                gpu.delete_vertex_array(vao);
                return Err(e);
            }
        };

        gpu.apply_pipeline_state(&config.pipeline_state());
        log::info!("scene ready: {} vertices, 2 programs", VERTICES.len());

        Ok(Self {
            vao,
            vbo,
            red,
            blue,
            orbit: Orbit::new(config.orbit),
            projection: config.perspective.matrix(),
            model: Mat4::IDENTITY,
        })
    }

    /// Current orbit angle in radians.
    pub fn angle(&self) -> f64 {
        self.orbit.angle()
    }

    pub fn orbit(&self) -> &Orbit {
        &self.orbit
    }

    pub fn projection(&self) -> &Mat4 {
        &self.projection
    }

    /// MVP for the current angle.
    pub fn mvp(&self) -> Mat4 {
        let view = look_at_origin(self.orbit.eye());
        compose_mvp(&self.projection, &view, &self.model)
    }

    /// Draws one frame from the current angle, then advances the angle by
    /// one step of `dt` seconds. Returns the MVP that was drawn with.
    pub fn render_frame(&mut self, gpu: &mut G, dt: f64) -> Mat4 {
        gpu.clear();

        let mvp = self.mvp();
        self.orbit.advance(dt);

        gpu.enable_attrib(self.vbo, &POSITION_ATTRIB);
        self.red.draw(gpu, &mvp);
        self.blue.draw(gpu, &mvp);
        gpu.disable_attrib(POSITION_ATTRIB.index);

        mvp
    }

    /// Deletes every GPU object the scene owns.
    pub fn release(self, gpu: &mut G) {
        gpu.delete_buffer(self.vbo);
        gpu.delete_vertex_array(self.vao);
        self.red.release(gpu);
        self.blue.release(gpu);
        log::debug!("scene resources released");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::DVec3;
    use orbit_engine::device::{BlendFunc, GpuCall, ObjectKind, RecUniform, RecordingGpu};
    use orbit_engine::math::Perspective;

    fn sources() -> SceneSources {
        let vs = "#version 330 core\nuniform mat4 MVP;\nvoid main() {}\n";
        SceneSources {
            red: ProgramSource::new("vs+red", vs, "void main() {}"),
            blue: ProgramSource::new("vs+blue", vs, "void main() {}"),
        }
    }

    fn scene(gpu: &mut RecordingGpu) -> TwoTriangles<RecordingGpu> {
        TwoTriangles::create(gpu, &sources(), &SceneConfig::default()).unwrap()
    }

    #[test]
    fn vertex_layout_matches_attribute() {
        assert_eq!(std::mem::size_of::<Vertex>(), 12);
        assert_eq!(POSITION_ATTRIB.components, 3);
        assert_eq!(POSITION_ATTRIB.stride, 0);
        assert!(!POSITION_ATTRIB.normalized);
        assert_eq!(RED_VERTICES.end, BLUE_VERTICES.start);
        assert_eq!(BLUE_VERTICES.end as usize, VERTICES.len());
    }

    #[test]
    fn uploads_all_six_vertices() {
        let mut gpu = RecordingGpu::new();
        let s = scene(&mut gpu);

        let bytes = gpu.buffer_contents(s.vbo).unwrap();
        assert_eq!(bytes.len(), 6 * 3 * 4);

        let floats: Vec<f32> = bytes
            .chunks_exact(4)
            .map(|c| f32::from_ne_bytes([c[0], c[1], c[2], c[3]]))
            .collect();
        assert_eq!(&floats[..3], &[-0.75f32, -0.75, 0.0]);
        assert_eq!(&floats[15..], &[-0.75f32, -0.3, -0.3]);

        s.release(&mut gpu);
    }

    #[test]
    fn applies_blend_state_once() {
        let mut gpu = RecordingGpu::new();
        let s = scene(&mut gpu);

        let states: Vec<_> = gpu
            .calls()
            .iter()
            .filter_map(|c| match c {
                GpuCall::ApplyPipelineState(st) => Some(*st),
                _ => None,
            })
            .collect();

        assert_eq!(states.len(), 1);
        assert_eq!(states[0].blend, Some(BlendFunc::ALPHA));
        assert!(!states[0].depth_test);
        assert_eq!(states[0].clear_color, [0.0, 0.4, 0.4, 0.0]);

        s.release(&mut gpu);
    }

    #[test]
    fn every_object_is_released_exactly_once() {
        let mut gpu = RecordingGpu::new();
        let mut s = scene(&mut gpu);
        for _ in 0..3 {
            s.render_frame(&mut gpu, 1.0 / 60.0);
        }

        assert_eq!(gpu.created_count(ObjectKind::VertexArray), 1);
        assert_eq!(gpu.created_count(ObjectKind::Buffer), 1);
        assert_eq!(gpu.created_count(ObjectKind::Program), 2);

        let created = gpu.live_objects();
        s.release(&mut gpu);

        assert!(gpu.live_objects().is_empty());
        assert!(gpu.bad_releases().is_empty());
        for (handle, _) in created {
            assert_eq!(gpu.release_count(handle), 1, "{handle:?}");
        }
    }

    #[test]
    fn failed_second_program_leaks_nothing() {
        let mut gpu = RecordingGpu::new().fail_program_containing("blue");
        let result = TwoTriangles::create(&mut gpu, &sources(), &SceneConfig::default());

        assert!(result.is_err());
        assert_eq!(gpu.created_count(ObjectKind::Program), 1);
        assert!(gpu.live_objects().is_empty());
        assert!(gpu.bad_releases().is_empty());
    }

    #[test]
    fn failed_first_program_leaks_nothing() {
        let mut gpu = RecordingGpu::new().fail_program_containing("red");
        assert!(TwoTriangles::create(&mut gpu, &sources(), &SceneConfig::default()).is_err());
        assert!(gpu.live_objects().is_empty());
    }

    #[test]
    fn frame_draws_red_then_blue() {
        let mut gpu = RecordingGpu::new();
        let mut s = scene(&mut gpu);
        gpu.clear_calls();

        let mvp = s.render_frame(&mut gpu, 0.0);

        let red = s.red.program;
        let blue = s.blue.program;
        let uniform = |program| RecUniform {
            program,
            name: MVP_UNIFORM.to_string(),
        };

        assert_eq!(
            gpu.calls(),
            &[
                GpuCall::Clear,
                GpuCall::EnableAttrib {
                    buffer: s.vbo,
                    attrib: POSITION_ATTRIB,
                },
                GpuCall::UseProgram(red),
                GpuCall::SetUniformMat4 {
                    uniform: uniform(red),
                    value: mvp,
                },
                GpuCall::DrawTriangles(0..3),
                GpuCall::UseProgram(blue),
                GpuCall::SetUniformMat4 {
                    uniform: uniform(blue),
                    value: mvp,
                },
                GpuCall::DrawTriangles(3..6),
                GpuCall::DisableAttrib(0),
            ]
        );

        s.release(&mut gpu);
    }

    #[test]
    fn first_frame_looks_from_positive_x() {
        let mut gpu = RecordingGpu::new();
        let mut s = scene(&mut gpu);

        let mvp = s.render_frame(&mut gpu, 0.0);
        let expected = compose_mvp(
            &Perspective::default().matrix(),
            &look_at_origin(DVec3::new(2.0, 0.0, 0.0)),
            &Mat4::IDENTITY,
        );

        assert_eq!(mvp, expected);
        assert!((s.angle() - 0.001).abs() < 1e-12);

        s.release(&mut gpu);
    }

    #[test]
    fn projection_is_constant_across_frames() {
        let mut gpu = RecordingGpu::new();
        let mut s = scene(&mut gpu);

        let before = *s.projection();
        for _ in 0..10 {
            s.render_frame(&mut gpu, 0.0);
        }
        assert_eq!(*s.projection(), before);

        s.release(&mut gpu);
    }

    #[test]
    fn thousand_frames_reach_one_radian() {
        let mut gpu = RecordingGpu::new();
        let mut s = scene(&mut gpu);

        for _ in 0..1000 {
            s.render_frame(&mut gpu, 1.0 / 60.0);
        }

        let angle = s.angle();
        assert!((angle - 1.0).abs() < 1e-9, "angle = {angle}");

        let eye = s.orbit().eye();
        assert_eq!(eye, DVec3::new(angle.cos() * 2.0, 0.0, angle.sin() * 2.0));

        let draws = gpu
            .calls()
            .iter()
            .filter(|c| matches!(c, GpuCall::DrawTriangles(_)))
            .count();
        assert_eq!(draws, 2000);

        s.release(&mut gpu);
        assert!(gpu.live_objects().is_empty());
    }
}
