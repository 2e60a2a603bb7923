//! Two alpha-blended triangles seen from a camera orbiting the origin.

mod app;
pub mod config;
pub mod scene;

use anyhow::Result;
use orbit_engine::device::GlGpu;
use orbit_engine::window::Runtime;

pub use app::TwoTrianglesApp;
pub use config::DemoConfig;

/// Opens the window and renders until Escape or a close request.
pub fn run(config: DemoConfig) -> Result<()> {
    let runtime = config.runtime.clone();
    Runtime::run(runtime, TwoTrianglesApp::<GlGpu>::new(config))
}
