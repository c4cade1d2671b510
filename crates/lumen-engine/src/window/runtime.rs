use ouroboros::self_referencing;

use winit::application::ApplicationHandler;
use winit::dpi::{LogicalSize, PhysicalSize};
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

use crate::core::{App, AppControl, AppCtx, WindowCtx};
use crate::device::GpuInit;
use crate::engine::Engine;
use crate::input::platform::translate_key_event;
use crate::input::InputState;

use super::error::RuntimeError;

/// Window/runtime configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub title: String,
    pub initial_size: LogicalSize<f64>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            title: "lumen".to_string(),
            initial_size: LogicalSize::new(512.0, 512.0),
        }
    }
}

/// Entry point for the runtime.
pub struct Runtime;

impl Runtime {
    /// Opens one window, drives `app` until it exits or the window closes,
    /// then releases the engine before returning.
    pub fn run<A>(config: RuntimeConfig, gpu_init: GpuInit, app: A) -> Result<(), RuntimeError>
    where
        A: App + 'static,
    {
        let event_loop = EventLoop::new()?;
        let mut state = AppState::new(config, gpu_init, app);

        let result = event_loop.run_app(&mut state);
        state.teardown();
        result?;

        match state.failure.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

#[self_referencing]
struct WindowEntry {
    input: InputState,

    window: Window,

    #[borrows(window)]
    #[covariant]
    engine: Engine<'this>,
}

impl WindowEntry {
    fn id(&self) -> WindowId {
        self.borrow_window().id()
    }

    fn request_redraw(&self) {
        self.borrow_window().request_redraw();
    }

    /// Runs `f` with a context over this window's engine and input.
    fn dispatch<R>(&mut self, f: impl FnOnce(&mut AppCtx<'_, '_>) -> R) -> R {
        self.with_mut(|fields| {
            let mut ctx = AppCtx {
                window: WindowCtx {
                    id: fields.window.id(),
                    window: fields.window,
                },
                engine: fields.engine,
                input: fields.input,
            };
            f(&mut ctx)
        })
    }

    fn resize(&mut self, size: PhysicalSize<u32>) {
        self.with_engine_mut(|engine| engine.resize(size));
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
    failure: Option<RuntimeError>,
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
            failure: None,
        }
    }

    /// Records the first failure and stops the loop. The caller of
    /// [`Runtime::run`] reports it.
    fn fail(&mut self, event_loop: &ActiveEventLoop, err: RuntimeError) {
        log::debug!("stopping: {err}");
        if self.failure.is_none() {
            self.failure = Some(err);
        }
        event_loop.exit();
    }

    fn create_window_entry(&mut self, event_loop: &ActiveEventLoop) -> Result<(), RuntimeError> {
        let attrs = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(self.config.initial_size);

        let window = event_loop
            .create_window(attrs)
            .map_err(RuntimeError::WindowCreation)?;

        let mut input = InputState::default();
        input.set_focused(true);

        let gpu_init = self.gpu_init.clone();
        let mut entry = WindowEntryTryBuilder {
            input,
            window,
            engine_builder: |w| pollster::block_on(Engine::new(w, gpu_init)),
        }
        .try_build()
        .map_err(RuntimeError::GpuInit)?;

        let app = &mut self.app;
        entry
            .dispatch(|ctx| app.on_init(ctx))
            .map_err(RuntimeError::Setup)?;

        log::info!("window {:?} ready", entry.id());
        self.entry = Some(entry);
        Ok(())
    }

    /// Drops the window entry and with it every engine object.
    fn teardown(&mut self) {
        if let Some(entry) = self.entry.take() {
            let stats = entry.borrow_engine().frame_stats();
            log::info!(
                "shutting down: {} frames presented, {} skipped",
                stats.presented,
                stats.skipped
            );
            drop(entry);
        }
    }
}

impl<A> ApplicationHandler for AppState<A>
where
    A: App + 'static,
{
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.entry.is_some() || self.failure.is_some() {
            return;
        }

        if let Err(e) = self.create_window_entry(event_loop) {
            self.fail(event_loop, e);
            return;
        }

        if let Some(entry) = &self.entry {
            entry.request_redraw();
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        event_loop.set_control_flow(ControlFlow::Wait);

        // Continuous redraw; FIFO presentation paces the loop.
        if let Some(entry) = &self.entry {
            entry.request_redraw();
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, window_id: WindowId, event: WindowEvent) {
        let app = &mut self.app;
        let Some(entry) = self.entry.as_mut().filter(|e| e.id() == window_id) else {
            return;
        };

        let control = match event {
            WindowEvent::CloseRequested => AppControl::Exit,

            WindowEvent::Focused(focused) => {
                entry.with_input_mut(|input| input.set_focused(focused));
                AppControl::Continue
            }

            WindowEvent::KeyboardInput { event, .. } => {
                let ev = translate_key_event(&event);
                entry.with_input_mut(|input| input.apply_key(&ev));
                entry.dispatch(|ctx| app.on_key(ctx, &ev))
            }

            WindowEvent::Resized(size) => {
                entry.resize(size);
                entry.dispatch(|ctx| app.on_resize(ctx, size));
                entry.request_redraw();
                AppControl::Continue
            }

            WindowEvent::ScaleFactorChanged { .. } => {
                let size = entry.borrow_window().inner_size();
                entry.resize(size);
                entry.dispatch(|ctx| app.on_resize(ctx, size));
                entry.request_redraw();
                AppControl::Continue
            }

            WindowEvent::RedrawRequested => {
                entry.borrow_window().pre_present_notify();
                let control = entry.dispatch(|ctx| app.on_frame(ctx));

                if let Some(err) = entry.with_engine_mut(|engine| engine.take_fatal_error()) {
                    self.fail(event_loop, RuntimeError::Surface(err));
                    return;
                }
                control
            }

            _ => AppControl::Continue,
        };

        if control == AppControl::Exit {
            log::info!("exit requested");
            event_loop.exit();
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        self.teardown();
    }
}
