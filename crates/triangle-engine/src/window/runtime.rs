use anyhow::{Context, Result};
use ouroboros::self_referencing;

use winit::application::ApplicationHandler;
use winit::dpi::{LogicalSize, PhysicalSize};
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

use crate::core::{App, AppControl, FrameCtx};
use crate::device::{Gpu, GpuInit};

use super::dispatch::{Dispatcher, LoopEvent, LoopStep, Presenter};

/// Window/runtime configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub title: String,
    pub initial_size: LogicalSize<f64>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            title: "hello-triangle".to_string(),
            initial_size: LogicalSize::new(800.0, 600.0),
        }
    }
}

/// Entry point for the runtime.
pub struct Runtime;

impl Runtime {
    /// Opens the window and runs the event loop until it is closed.
    ///
    /// Startup failures (no adapter, no surface) are returned once the loop
    /// has shut down.
    pub fn run<A>(config: RuntimeConfig, gpu_init: GpuInit, app: A) -> Result<()>
    where
        A: App + 'static,
    {
        let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
        // Redraws happen on demand only.
        event_loop.set_control_flow(ControlFlow::Wait);

        let mut state = AppState::new(config, gpu_init, app);

        event_loop
            .run_app(&mut state)
            .context("winit event loop terminated with error")?;

        match state.error.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

#[self_referencing]
struct WindowEntry {
    dispatcher: Dispatcher,

    window: Window,

    #[borrows(window)]
    #[covariant]
    gpu: Gpu<'this>,
}

/// Presenter backed by the live window, GPU context and app.
struct WindowPresenter<'a, 'w, A> {
    window: &'a Window,
    gpu: &'a mut Gpu<'w>,
    app: &'a mut A,
    frame_index: u64,
}

impl<A: App> Presenter for WindowPresenter<'_, '_, A> {
    fn reconfigure(&mut self, size: PhysicalSize<u32>) {
        self.gpu.resize(size);
        self.app.on_resize(size);
    }

    fn present(&mut self) -> AppControl {
        let mut ctx = FrameCtx {
            window: self.window,
            gpu: &mut *self.gpu,
            frame_index: self.frame_index,
        };
        self.app.on_frame(&mut ctx)
    }

    fn request_redraw(&mut self) {
        self.window.request_redraw();
    }
}

struct AppState<A>
where
    A: App + 'static,
{
    config: RuntimeConfig,
    gpu_init: GpuInit,
    app: A,

    entry: Option<WindowEntry>,
    /// First startup error; reported by `Runtime::run`.
    error: Option<anyhow::Error>,
    finished: bool,
}

impl<A> AppState<A>
where
    A: App + 'static,
{
    fn new(config: RuntimeConfig, gpu_init: GpuInit, app: A) -> Self {
        Self {
            config,
            gpu_init,
            app,
            entry: None,
            error: None,
            finished: false,
        }
    }

    fn create_window_entry(&self, event_loop: &ActiveEventLoop) -> Result<WindowEntry> {
        let attrs = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(self.config.initial_size);

        let window = event_loop
            .create_window(attrs)
            .context("failed to create window")?;

        let dispatcher = Dispatcher::new(window.inner_size());
        let gpu_init = self.gpu_init.clone();

        WindowEntryTryBuilder {
            dispatcher,
            window,
            gpu_builder: |w| pollster::block_on(Gpu::new(w, gpu_init)),
        }
        .try_build()
    }

    /// Releases the window and GPU context and stops the event loop.
    fn shutdown(&mut self, event_loop: &ActiveEventLoop) {
        if let Some(entry) = self.entry.take() {
            let counters = entry.borrow_dispatcher().counters();
            log::info!(
                "exiting after {} presented frames ({} skipped, {} surface reconfigurations)",
                counters.presented,
                counters.skipped,
                counters.reconfigures
            );
            self.app.on_close();
        }

        self.finished = true;
        event_loop.exit();
    }
}

impl<A> ApplicationHandler for AppState<A>
where
    A: App + 'static,
{
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.entry.is_some() || self.finished {
            return;
        }

        match self.create_window_entry(event_loop) {
            Ok(entry) => {
                entry.with_window(|w| w.request_redraw());
                self.entry = Some(entry);
            }
            Err(err) => {
                log::error!("startup failed: {err:#}");
                self.error = Some(err);
                self.shutdown(event_loop);
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: WindowId,
        event: WindowEvent,
    ) {
        // Split borrows to avoid `self` capture inside `ouroboros` closures.
        let (app, entry) = (&mut self.app, &mut self.entry);

        let Some(entry) = entry.as_mut() else {
            return;
        };

        if entry.with_window(|w| w.id()) != window_id {
            return;
        }

        let Some(loop_event) =
            entry.with_window(|w| LoopEvent::from_window_event(&event, || w.inner_size()))
        else {
            return;
        };

        let step = entry.with_mut(|fields| {
            let mut presenter = WindowPresenter {
                window: fields.window,
                gpu: fields.gpu,
                app,
                frame_index: fields.dispatcher.counters().presented,
            };
            fields.dispatcher.dispatch(&mut presenter, loop_event)
        });

        if step == LoopStep::Exit {
            self.shutdown(event_loop);
        }
    }
}
