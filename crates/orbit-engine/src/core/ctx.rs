use crate::device::GpuApi;
use crate::time::FrameTime;

/// Per-frame context passed to [`App::on_frame`](super::App::on_frame).
pub struct FrameCtx<'a, G: GpuApi> {
    pub gpu: &'a mut G,
    pub time: FrameTime,
}
