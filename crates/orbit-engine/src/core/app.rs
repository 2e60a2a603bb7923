use anyhow::Result;

use crate::device::GpuApi;

use super::ctx::FrameCtx;

/// Control directive returned by app callbacks.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AppControl {
    Continue,
    Exit,
}

/// Application contract driven by [`Runtime`](crate::window::Runtime) through
/// an [`AppHost`](super::AppHost).
///
/// Every callback runs on the thread that owns the GL context, with the
/// context current. The runtime drives apps over [`GlGpu`](crate::device::GlGpu);
/// tests can use any other [`GpuApi`].
pub trait App<G: GpuApi> {
    /// Called once after the context is created and OpenGL is loaded.
    ///
    /// An error aborts startup; `on_exit` is not called afterwards, so the
    /// implementation must release whatever it created before failing.
    fn on_start(&mut self, gpu: &mut G) -> Result<()>;

    /// Called once per frame, before the back buffer is swapped.
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, G>) -> AppControl;

    /// Called once before the context is destroyed, if `on_start` succeeded.
    fn on_exit(&mut self, gpu: &mut G);
}
