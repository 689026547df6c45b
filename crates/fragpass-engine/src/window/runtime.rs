use std::collections::HashMap;
use std::sync::Arc;

use anyhow::{Context as _, Result};
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

use crate::context::Context;
use crate::core::{App, AppControl};
use crate::device::GpuInit;
use crate::pass::Canvas;
use crate::scheduler::TickOutcome;

/// One window opened by the runtime.
#[derive(Debug, Clone)]
pub struct WindowConfig {
    pub title: String,
    pub initial_size: LogicalSize<f64>,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "fragpass".to_string(),
            initial_size: LogicalSize::new(1280.0, 720.0),
        }
    }
}

/// Runtime configuration: the windows to open, in canvas order.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub windows: Vec<WindowConfig>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            windows: vec![WindowConfig::default()],
        }
    }
}

/// Entry point for the runtime.
///
/// Opens the configured windows, hands them to [`App::start`] as canvases and
/// then drives [`Context::tick`] once per frame until every window is closed.
pub struct Runtime;

impl Runtime {
    pub fn run<A>(config: RuntimeConfig, gpu_init: GpuInit, app: A) -> Result<()>
    where
        A: 'static + App,
    {
        let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
        let mut state = AppState::new(config, gpu_init, app);

        event_loop
            .run_app(&mut state)
            .context("winit event loop terminated with error")?;

        Ok(())
    }
}

struct AppState<A>
where
    A: App + 'static,
{
    config: RuntimeConfig,
    app: A,
    ctx: Context,

    windows: HashMap<WindowId, Arc<Window>>,
    /// Window whose redraws drive the tick. Other windows are drawn by the same tick.
    primary: Option<WindowId>,
    started: bool,
    exit_requested: bool,
}

impl<A> AppState<A>
where
    A: App + 'static,
{
    fn new(config: RuntimeConfig, gpu_init: GpuInit, app: A) -> Self {
        Self {
            config,
            app,
            ctx: Context::new(gpu_init),
            windows: HashMap::new(),
            primary: None,
            started: false,
            exit_requested: false,
        }
    }

    fn request_exit(&mut self) {
        self.exit_requested = true;
    }

    fn open_windows(&mut self, event_loop: &ActiveEventLoop) -> Result<Vec<Canvas>> {
        let mut canvases = Vec::with_capacity(self.config.windows.len());

        for config in &self.config.windows {
            let attrs = Window::default_attributes()
                .with_title(config.title.clone())
                .with_inner_size(config.initial_size);

            let window = Arc::new(
                event_loop
                    .create_window(attrs)
                    .context("failed to create window")?,
            );

            let id = window.id();
            self.primary.get_or_insert(id);
            self.windows.insert(id, window.clone());
            canvases.push(Canvas::window(window));
        }

        Ok(canvases)
    }

    fn start(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let canvases = self.open_windows(event_loop)?;
        pollster::block_on(self.app.start(&mut self.ctx, &canvases))
            .context("application failed to start")?;
        Ok(())
    }

    fn close_window(&mut self, id: WindowId) {
        let removed = self.ctx.remove_window_passes(id);
        log::debug!("window {id:?} closed, dropped {removed} pass(es)");
        self.windows.remove(&id);

        if self.primary == Some(id) {
            self.primary = self.windows.keys().next().copied();
            if let Some(next) = self.primary.and_then(|p| self.windows.get(&p)) {
                next.request_redraw();
            }
        }

        if self.windows.is_empty() {
            self.request_exit();
        }
    }

    fn drive_tick(&mut self) {
        match self.ctx.tick() {
            Ok(TickOutcome::Continue) => {
                if let Some(w) = self.primary.and_then(|p| self.windows.get(&p)) {
                    w.request_redraw();
                }
            }
            Ok(TickOutcome::Idle | TickOutcome::Stopped) => {}
            Err(e) => {
                log::error!("frame failed: {e:#}");
                self.request_exit();
            }
        }
    }
}

impl<A> ApplicationHandler for AppState<A>
where
    A: App + 'static,
{
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.started {
            return;
        }
        self.started = true;

        if let Err(e) = self.start(event_loop) {
            log::error!("failed to start: {e:#}");
            self.request_exit();
            event_loop.exit();
            return;
        }

        if let Some(w) = self.primary.and_then(|p| self.windows.get(&p)) {
            w.request_redraw();
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.exit_requested {
            event_loop.exit();
            return;
        }

        // Ticks re-arm themselves by requesting a redraw of the primary window.
        event_loop.set_control_flow(ControlFlow::Wait);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: WindowId,
        event: WindowEvent,
    ) {
        if self.exit_requested {
            event_loop.exit();
            return;
        }

        if self.app.on_window_event(window_id, &event) == AppControl::Exit {
            self.request_exit();
            event_loop.exit();
            return;
        }

        match &event {
            WindowEvent::CloseRequested => self.close_window(window_id),

            WindowEvent::Resized(new_size) => {
                self.ctx.resize(window_id, *new_size);
            }

            WindowEvent::ScaleFactorChanged { .. } => {
                if let Some(w) = self.windows.get(&window_id) {
                    let size = w.inner_size();
                    self.ctx.resize(window_id, size);
                }
            }

            WindowEvent::RedrawRequested if self.primary == Some(window_id) => {
                self.drive_tick();
            }

            _ => {}
        }

        if self.exit_requested {
            event_loop.exit();
        }
    }
}
