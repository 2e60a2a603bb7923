use anyhow::Result;
use orbit_engine::core::{App, AppControl, FrameCtx};
use orbit_engine::device::GpuApi;

use crate::config::DemoConfig;
use crate::scene::TwoTriangles;

/// Drives [`TwoTriangles`] from the runtime callbacks.
pub struct TwoTrianglesApp<G: GpuApi> {
    config: DemoConfig,
    scene: Option<TwoTriangles<G>>,
}

impl<G: GpuApi> TwoTrianglesApp<G> {
    pub fn new(config: DemoConfig) -> Self {
        Self {
            config,
            scene: None,
        }
    }
}

impl<G: GpuApi> App<G> for TwoTrianglesApp<G> {
    fn on_start(&mut self, gpu: &mut G) -> Result<()> {
        let sources = self.config.load_sources()?;
        self.scene = Some(TwoTriangles::create(gpu, &sources, &self.config.scene)?);
        Ok(())
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, G>) -> AppControl {
        let Some(scene) = self.scene.as_mut() else {
            return AppControl::Exit;
        };

        scene.render_frame(ctx.gpu, ctx.time.dt);

        if ctx.time.frame_index % 1000 == 0 {
            log::trace!("frame {} angle {:.3}", ctx.time.frame_index, scene.angle());
        }

        AppControl::Continue
    }

    fn on_exit(&mut self, gpu: &mut G) {
        if let Some(scene) = self.scene.take() {
            scene.release(gpu);
        }
    }
}
