use anyhow::{ensure, Result};

use crate::device::GpuApi;
use crate::time::FrameTime;

use super::app::{App, AppControl};
use super::ctx::FrameCtx;

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
enum Phase {
    Idle,
    Running,
    Stopped,
}

/// Owns an [`App`] and enforces its callback order, independent of any
/// window system.
///
/// `on_start` runs at most once. `on_frame` runs only while started.
/// `on_exit` runs at most once, and only after a successful `on_start`.
pub struct AppHost<A> {
    app: A,
    phase: Phase,
}

impl<A> AppHost<A> {
    pub fn new(app: A) -> Self {
        Self {
            app,
            phase: Phase::Idle,
        }
    }

    pub fn is_running(&self) -> bool {
        self.phase == Phase::Running
    }

    /// Runs `on_start`. A failed start counts as stopped, so a later
    /// [`stop`](Self::stop) does not call `on_exit`.
    pub fn start<G>(&mut self, gpu: &mut G) -> Result<()>
    where
        G: GpuApi,
        A: App<G>,
    {
        ensure!(self.phase == Phase::Idle, "application was already started");

        match self.app.on_start(gpu) {
            Ok(()) => {
                self.phase = Phase::Running;
                Ok(())
            }
            Err(e) => {
                self.phase = Phase::Stopped;
                Err(e)
            }
        }
    }

    /// Runs one `on_frame`. Asks to exit without calling the app when it is
    /// not running.
    pub fn frame<G>(&mut self, gpu: &mut G, time: FrameTime) -> AppControl
    where
        G: GpuApi,
        A: App<G>,
    {
        if !self.is_running() {
            return AppControl::Exit;
        }

        let mut ctx = FrameCtx { gpu, time };
        self.app.on_frame(&mut ctx)
    }

    /// Runs `on_exit` if the app is running. Safe to call more than once.
    pub fn stop<G>(&mut self, gpu: &mut G)
    where
        G: GpuApi,
        A: App<G>,
    {
        let was_running = self.is_running();
        self.phase = Phase::Stopped;

        if was_running {
            self.app.on_exit(gpu);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use anyhow::bail;

    use super::*;
    use crate::device::{RecHandle, RecordingGpu};
    use crate::time::FrameClock;

    type Log = Rc<RefCell<Vec<&'static str>>>;

    /// Owns one buffer between start and exit; optionally fails after
    /// creating (and dropping) a vertex array.
    struct BufferApp {
        log: Log,
        fail_start: bool,
        buffer: Option<RecHandle>,
    }

    impl BufferApp {
        fn new(log: &Log, fail_start: bool) -> Self {
            Self {
                log: Rc::clone(log),
                fail_start,
                buffer: None,
            }
        }
    }

    impl App<RecordingGpu> for BufferApp {
        fn on_start(&mut self, gpu: &mut RecordingGpu) -> Result<()> {
            self.log.borrow_mut().push("start");
            if self.fail_start {
                let vao = gpu.create_vertex_array()?;
                gpu.delete_vertex_array(vao);
                bail!("no shaders");
            }
            self.buffer = Some(gpu.create_static_buffer(&[0; 12])?);
            Ok(())
        }

        fn on_frame(&mut self, _ctx: &mut FrameCtx<'_, RecordingGpu>) -> AppControl {
            self.log.borrow_mut().push("frame");
            AppControl::Continue
        }

        fn on_exit(&mut self, gpu: &mut RecordingGpu) {
            self.log.borrow_mut().push("exit");
            if let Some(buffer) = self.buffer.take() {
                gpu.delete_buffer(buffer);
            }
        }
    }

    fn tick() -> FrameTime {
        FrameClock::new().tick()
    }

    #[test]
    fn stopping_twice_releases_once() {
        let log = Log::default();
        let mut gpu = RecordingGpu::new();
        let mut host = AppHost::new(BufferApp::new(&log, false));

        host.start(&mut gpu).unwrap();
        assert_eq!(host.frame(&mut gpu, tick()), AppControl::Continue);
        host.stop(&mut gpu);
        host.stop(&mut gpu);

        assert_eq!(*log.borrow(), ["start", "frame", "exit"]);
        for (handle, _) in gpu.created_objects() {
            assert_eq!(gpu.release_count(handle), 1, "{handle:?}");
        }
        assert!(gpu.live_objects().is_empty());
        assert!(gpu.bad_releases().is_empty());
    }

    #[test]
    fn failed_start_never_calls_on_exit() {
        let log = Log::default();
        let mut gpu = RecordingGpu::new();
        let mut host = AppHost::new(BufferApp::new(&log, true));

        assert!(host.start(&mut gpu).is_err());
        assert!(!host.is_running());
        assert_eq!(host.frame(&mut gpu, tick()), AppControl::Exit);
        host.stop(&mut gpu);
        host.stop(&mut gpu);

        assert_eq!(*log.borrow(), ["start"]);
        assert!(gpu.live_objects().is_empty());
        assert!(gpu.bad_releases().is_empty());
    }

    #[test]
    fn frames_need_a_started_app() {
        let log = Log::default();
        let mut gpu = RecordingGpu::new();
        let mut host = AppHost::new(BufferApp::new(&log, false));

        assert_eq!(host.frame(&mut gpu, tick()), AppControl::Exit);

        host.start(&mut gpu).unwrap();
        host.stop(&mut gpu);
        assert_eq!(host.frame(&mut gpu, tick()), AppControl::Exit);

        assert_eq!(*log.borrow(), ["start", "exit"]);
    }

    #[test]
    fn stop_before_start_does_nothing() {
        let log = Log::default();
        let mut gpu = RecordingGpu::new();
        let mut host = AppHost::new(BufferApp::new(&log, false));

        host.stop(&mut gpu);

        assert!(log.borrow().is_empty());
        assert!(gpu.calls().is_empty());
    }

    #[test]
    fn start_runs_at_most_once() {
        let log = Log::default();
        let mut gpu = RecordingGpu::new();
        let mut host = AppHost::new(BufferApp::new(&log, false));

        host.start(&mut gpu).unwrap();
        assert!(host.start(&mut gpu).is_err());
        host.stop(&mut gpu);
        assert!(host.start(&mut gpu).is_err());

        assert_eq!(*log.borrow(), ["start", "exit"]);
    }
}
