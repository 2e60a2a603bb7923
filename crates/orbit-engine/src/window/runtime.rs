use std::num::NonZeroU32;

use anyhow::{Context, Result};
use glutin::config::{Config, ConfigTemplateBuilder};
use glutin::context::{ContextApi, ContextAttributesBuilder, GlProfile, PossiblyCurrentContext, Version};
use glutin::display::GetGlDisplay;
use glutin::prelude::*;
use glutin::surface::{Surface, SwapInterval, WindowSurface};
use glutin_winit::{DisplayBuilder, GlWindow as _};
use raw_window_handle::HasWindowHandle;
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::{ElementState, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

use crate::core::{App, AppControl, AppHost};
use crate::device::{GlGpu, StartupError};
use crate::input::{InputEvent, InputState, Key};
use crate::time::FrameClock;

/// Window and context configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub title: String,
    pub size: LogicalSize<f64>,
    /// Requested OpenGL core-profile version.
    pub gl_version: (u8, u8),
    /// Requested MSAA sample count. The closest config not above it is used.
    pub samples: u8,
    pub vsync: bool,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            title: "orbit".to_string(),
            size: LogicalSize::new(1024.0, 768.0),
            gl_version: (3, 3),
            samples: 4,
            vsync: true,
        }
    }
}

/// Entry point for the render loop.
pub struct Runtime;

impl Runtime {
    /// Opens the window, runs `app` until it or the user asks to stop, then
    /// tears everything down.
    ///
    /// Startup failures come back as a [`StartupError`] inside the returned
    /// `anyhow::Error`.
    pub fn run<A>(config: RuntimeConfig, app: A) -> Result<()>
    where
        A: App<GlGpu> + 'static,
    {
        let event_loop = EventLoop::new().map_err(|e| StartupError::EventLoop(e.to_string()))?;
        let mut state = AppState::new(config, app);

        event_loop
            .run_app(&mut state)
            .context("winit event loop terminated with error")?;

        match state.failure.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

/// Everything tied to the one window.
///
/// Field order is drop order: GL objects go before the surface and context,
/// the context before the window it renders into.
struct GlWindow {
    gpu: GlGpu,
    surface: Surface<WindowSurface>,
    context: PossiblyCurrentContext,
    window: Window,
    input: InputState,
    clock: FrameClock,
}

struct AppState<A> {
    config: RuntimeConfig,
    host: AppHost<A>,
    window: Option<GlWindow>,
    exit_requested: bool,
    failure: Option<anyhow::Error>,
}

impl<A: App<GlGpu>> AppState<A> {
    fn new(config: RuntimeConfig, app: A) -> Self {
        Self {
            config,
            host: AppHost::new(app),
            window: None,
            exit_requested: false,
            failure: None,
        }
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: anyhow::Error) {
        log::debug!("stopping: {err:#}");
        if self.failure.is_none() {
            self.failure = Some(err);
        }
        self.shutdown();
        event_loop.exit();
    }

    /// Releases app resources while the context is still current, then drops
    /// the window. Safe to call more than once.
    fn shutdown(&mut self) {
        self.exit_requested = true;

        let Some(mut w) = self.window.take() else {
            return;
        };

        self.host.stop(&mut w.gpu);

        log::debug!("rendered {} frames", w.clock.frames());
        drop(w);
        log::info!("window closed");
    }

    fn create_window(&self, event_loop: &ActiveEventLoop) -> Result<GlWindow, StartupError> {
        let cfg = &self.config;
        let (major, minor) = cfg.gl_version;
        let wanted_samples = cfg.samples;

        let attrs = Window::default_attributes()
            .with_title(cfg.title.clone())
            .with_inner_size(cfg.size)
            .with_resizable(false);

        let template = ConfigTemplateBuilder::new().with_alpha_size(8);

        let (window, gl_config) = DisplayBuilder::new()
            .with_window_attributes(Some(attrs))
            .build(event_loop, template, |configs| pick_config(configs, wanted_samples))
            .map_err(|e| StartupError::Window(e.to_string()))?;

        let window = window.ok_or_else(|| StartupError::Window("no window was created".to_string()))?;
        log::debug!(
            "framebuffer config: {} samples (requested {wanted_samples})",
            gl_config.num_samples()
        );

        let raw_handle = window
            .window_handle()
            .map_err(|e| StartupError::Window(e.to_string()))?
            .as_raw();

        let display = gl_config.display();
        let context_attrs = ContextAttributesBuilder::new()
            .with_profile(GlProfile::Core)
            .with_context_api(ContextApi::OpenGl(Some(Version::new(major, minor))))
            .build(Some(raw_handle));

        let not_current = unsafe { display.create_context(&gl_config, &context_attrs) }.map_err(|e| {
            StartupError::Window(format!("OpenGL {major}.{minor} core context unavailable: {e}"))
        })?;

        let surface_attrs = window
            .build_surface_attributes(Default::default())
            .map_err(|e| StartupError::Window(e.to_string()))?;
        let surface = unsafe { display.create_window_surface(&gl_config, &surface_attrs) }
            .map_err(|e| StartupError::Window(e.to_string()))?;

        let context = not_current
            .make_current(&surface)
            .map_err(|e| StartupError::Window(e.to_string()))?;

        if cfg.vsync {
            if let Err(e) = surface.set_swap_interval(&context, SwapInterval::Wait(NonZeroU32::MIN)) {
                log::warn!("vsync unavailable: {e}");
            }
        }

        let gpu = unsafe { GlGpu::load(|name| display.get_proc_address(name)) }?;

        log::info!(
            "opened \"{}\" at {}x{}",
            cfg.title,
            cfg.size.width,
            cfg.size.height
        );

        Ok(GlWindow {
            gpu,
            surface,
            context,
            window,
            input: InputState::default(),
            clock: FrameClock::new(),
        })
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let Some(w) = self.window.as_mut() else {
            return;
        };

        let time = w.clock.tick();
        let control = self.host.frame(&mut w.gpu, time);

        w.window.pre_present_notify();
        let swapped = w.surface.swap_buffers(&w.context);

        if let Err(e) = swapped {
            self.fail(event_loop, anyhow::Error::new(e).context("failed to swap buffers"));
            return;
        }

        if control == AppControl::Exit {
            self.exit_requested = true;
        }
    }
}

impl<A: App<GlGpu>> ApplicationHandler for AppState<A> {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() || self.exit_requested {
            return;
        }

        let mut w = match self.create_window(event_loop) {
            Ok(w) => w,
            Err(e) => {
                self.fail(event_loop, e.into());
                return;
            }
        };

        if let Err(e) = self.host.start(&mut w.gpu) {
            self.window = Some(w);
            self.fail(event_loop, e.context("application startup failed"));
            return;
        }

        w.clock = FrameClock::new();
        w.window.request_redraw();
        self.window = Some(w);
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        let Some(w) = self.window.as_mut() else {
            return;
        };

        match event {
            WindowEvent::CloseRequested => w.input.apply_event(InputEvent::CloseRequested),

            WindowEvent::KeyboardInput { event, .. } => {
                let key = map_key(event.physical_key);
                let ev = match event.state {
                    ElementState::Pressed => InputEvent::KeyPressed(key),
                    ElementState::Released => InputEvent::KeyReleased(key),
                };
                w.input.apply_event(ev);
            }

            WindowEvent::RedrawRequested => self.redraw(event_loop),

            _ => {}
        }
    }

    /// End of one loop iteration: events are polled and the frame is swapped.
    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        let exit = self.exit_requested || self.window.as_ref().is_some_and(|w| w.input.should_exit());

        if exit {
            self.shutdown();
            event_loop.exit();
            return;
        }

        event_loop.set_control_flow(ControlFlow::Wait);

        if let Some(w) = &self.window {
            w.window.request_redraw();
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        self.shutdown();
    }
}

/// Picks the config whose sample count is closest to `wanted`.
///
/// # Panics
///
/// If the display offers no config matching the template (8-bit alpha).
/// `DisplayBuilder::build` gives the picker no way to report an error, and
/// there is no config to fall back to.
fn pick_config(configs: Box<dyn Iterator<Item = Config> + '_>, wanted: u8) -> Config {
    closest_samples(configs, |c| c.num_samples(), wanted)
        .expect("display offers no framebuffer config with an 8-bit alpha channel")
}

/// The item whose sample count is closest to `wanted` without going over; if
/// every item exceeds it, the one with the fewest samples. `None` when empty.
fn closest_samples<T>(items: impl Iterator<Item = T>, samples: impl Fn(&T) -> u8, wanted: u8) -> Option<T> {
    items.max_by_key(|item| sample_rank(samples(item), wanted))
}

fn sample_rank(samples: u8, wanted: u8) -> (bool, u8) {
    if samples <= wanted {
        (true, samples)
    } else {
        (false, u8::MAX - samples)
    }
}

fn map_key(key: PhysicalKey) -> Key {
    match key {
        PhysicalKey::Code(KeyCode::Escape) => Key::Escape,
        _ => Key::Other,
    }
}
