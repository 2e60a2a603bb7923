use std::path::{Path, PathBuf};

use anyhow::Result;
use orbit_engine::device::{BlendFunc, PipelineState};
use orbit_engine::logging::LoggingConfig;
use orbit_engine::math::{OrbitConfig, Perspective};
use orbit_engine::shader::ProgramSource;
use orbit_engine::window::RuntimeConfig;

pub const WINDOW_TITLE: &str = "Homework 1 - Two triangles";

/// Shader file names, resolved against [`DemoConfig::shader_dir`].
#[derive(Debug, Clone)]
pub struct ShaderFiles {
    pub vertex: PathBuf,
    pub red_fragment: PathBuf,
    pub blue_fragment: PathBuf,
}

impl Default for ShaderFiles {
    fn default() -> Self {
        Self {
            vertex: "SimpleVertexShader.vertexshader".into(),
            red_fragment: "RedTriangle.fragmentshader".into(),
            blue_fragment: "BlueTriangle.fragmentshader".into(),
        }
    }
}

/// Camera, projection and fixed pipeline state for the scene.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneConfig {
    pub clear_color: [f32; 4],
    pub depth_test: bool,
    pub orbit: OrbitConfig,
    pub perspective: Perspective,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            clear_color: [0.0, 0.4, 0.4, 0.0],
            depth_test: false,
            orbit: OrbitConfig::default(),
            perspective: Perspective::default(),
        }
    }
}

impl SceneConfig {
    pub fn pipeline_state(&self) -> PipelineState {
        PipelineState {
            clear_color: self.clear_color,
            blend: Some(BlendFunc::ALPHA),
            depth_test: self.depth_test,
        }
    }
}

/// The two programs the scene draws with.
#[derive(Debug, Clone)]
pub struct SceneSources {
    pub red: ProgramSource,
    pub blue: ProgramSource,
}

/// Top-level configuration. Everything is fixed at build time; there are no
/// flags or config files.
#[derive(Debug, Clone)]
pub struct DemoConfig {
    pub runtime: RuntimeConfig,
    pub logging: LoggingConfig,
    pub shader_dir: PathBuf,
    pub shaders: ShaderFiles,
    pub scene: SceneConfig,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            runtime: RuntimeConfig {
                title: WINDOW_TITLE.to_string(),
                ..RuntimeConfig::default()
            },
            logging: LoggingConfig::default(),
            shader_dir: Path::new(env!("CARGO_MANIFEST_DIR")).join("shaders"),
            shaders: ShaderFiles::default(),
            scene: SceneConfig::default(),
        }
    }
}

impl DemoConfig {
    /// Reads both programs' sources. The vertex stage is shared.
    pub fn load_sources(&self) -> Result<SceneSources> {
        let dir = &self.shader_dir;
        let vertex = dir.join(&self.shaders.vertex);

        Ok(SceneSources {
            red: ProgramSource::from_files(&vertex, dir.join(&self.shaders.red_fragment))?,
            blue: ProgramSource::from_files(&vertex, dir.join(&self.shaders.blue_fragment))?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use orbit_engine::math::AngleStep;

    #[test]
    fn defaults_match_the_demo() {
        let cfg = DemoConfig::default();
        assert_eq!(cfg.runtime.title, WINDOW_TITLE);
        assert_eq!(cfg.runtime.gl_version, (3, 3));
        assert_eq!(cfg.scene.clear_color, [0.0, 0.4, 0.4, 0.0]);
        assert_eq!(cfg.scene.orbit.radius, 2.0);
        assert_eq!(cfg.scene.orbit.step, AngleStep::PerFrame(0.001));
        assert_eq!(cfg.scene.perspective, Perspective::default());
    }

    #[test]
    fn pipeline_blends_without_depth_test() {
        let state = SceneConfig::default().pipeline_state();
        assert_eq!(state.blend, Some(BlendFunc::ALPHA));
        assert!(!state.depth_test);
    }

    #[test]
    fn bundled_shaders_load() {
        let sources = DemoConfig::default().load_sources().unwrap();

        assert_eq!(
            sources.red.label(),
            "SimpleVertexShader.vertexshader+RedTriangle.fragmentshader"
        );
        assert_eq!(sources.red.vertex(), sources.blue.vertex());
        assert!(sources.red.vertex().contains("uniform mat4 MVP"));
        assert_ne!(sources.red.fragment(), sources.blue.fragment());
    }

    #[test]
    fn missing_shader_dir_is_an_error() {
        let cfg = DemoConfig {
            shader_dir: PathBuf::from("/definitely/not/here"),
            ..DemoConfig::default()
        };
        assert!(cfg.load_sources().is_err());
    }
}
