use anyhow::{anyhow, Context, Result};
use ouroboros::self_referencing;

use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

use crate::core::MeshViewer;
use crate::device::GpuInit;
use crate::mesh::MeshSource;
use crate::render::{FrameScheduler, ShaderAsset, TickOutcome};
use crate::time::FrameClock;

/// Window/runtime configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub title: String,
    /// Read once; the surface and depth target keep this size.
    pub initial_size: LogicalSize<f64>,
    pub shader: ShaderAsset,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            title: "meshview".to_string(),
            initial_size: LogicalSize::new(1024.0, 1024.0),
            shader: ShaderAsset::default(),
        }
    }
}

/// Entry point for the runtime.
pub struct Runtime;

impl Runtime {
    /// Opens one window, renders the mesh produced by `source` until the
    /// window is closed, and returns.
    ///
    /// Setup failures end the event loop and are returned as errors; logging
    /// them is left to the caller.
    pub fn run<S>(config: RuntimeConfig, gpu_init: GpuInit, source: S) -> Result<()>
    where
        S: MeshSource + 'static,
    {
        let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
        let mut state = AppState::new(config, gpu_init, source);

        event_loop
            .run_app(&mut state)
            .context("winit event loop terminated with error")?;

        match state.failure.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

#[self_referencing]
struct WindowEntry {
    clock: FrameClock,
    scheduler: FrameScheduler,

    window: Window,

    #[borrows(window)]
    #[covariant]
    viewer: MeshViewer<'this>,
}

struct AppState<S>
where
    S: MeshSource + 'static,
{
    config: RuntimeConfig,
    gpu_init: GpuInit,
    source: S,

    entry: Option<WindowEntry>,
    failure: Option<anyhow::Error>,
}

impl<S> AppState<S>
where
    S: MeshSource + 'static,
{
    fn new(config: RuntimeConfig, gpu_init: GpuInit, source: S) -> Self {
        Self {
            config,
            gpu_init,
            source,
            entry: None,
            failure: None,
        }
    }

    fn create_window_entry(&self, event_loop: &ActiveEventLoop) -> Result<WindowEntry> {
        let attrs = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(self.config.initial_size)
            .with_resizable(false);

        let window = event_loop
            .create_window(attrs)
            .context("failed to create window")?;

        let gpu_init = self.gpu_init.clone();
        let shader = &self.config.shader;
        let source: &dyn MeshSource = &self.source;

        let entry = WindowEntryTryBuilder {
            clock: FrameClock::new(),
            scheduler: FrameScheduler::new(),
            window,
            viewer_builder: |w| pollster::block_on(MeshViewer::new(w, gpu_init, shader, source)),
        }
        .try_build()
        .context("renderer setup failed")?;

        Ok(entry)
    }

    /// Stops the scheduler, releases the window and its GPU state, and ends the loop.
    fn shutdown(&mut self, event_loop: &ActiveEventLoop) {
        if let Some(mut entry) = self.entry.take() {
            entry.with_scheduler_mut(|s| s.stop());
            drop(entry);
        }
        event_loop.exit();
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: anyhow::Error) {
        log::debug!("shutting down after failure");
        self.failure = Some(err);
        self.shutdown(event_loop);
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let Some(entry) = self.entry.as_mut() else {
            return;
        };

        let outcome = entry.with_mut(|fields| {
            let ft = fields.clock.tick();
            let mut ctx = fields.viewer.context();
            fields.scheduler.tick(&mut ctx, ft.timestamp_ms)
        });

        match outcome {
            TickOutcome::Rearm => entry.with_window(|w| w.request_redraw()),
            TickOutcome::Idle => {}
            TickOutcome::Halt => {
                self.fail(event_loop, halted_error());
            }
        }
    }
}

/// The scheduler only halts on its own for `SurfaceErrorAction::Fatal`,
/// which the surface layer reports for out-of-memory.
fn halted_error() -> anyhow::Error {
    anyhow!("frame loop halted: surface out of memory")
}

impl<S> ApplicationHandler for AppState<S>
where
    S: MeshSource + 'static,
{
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.entry.is_some() || self.failure.is_some() {
            return;
        }

        let mut entry = match self.create_window_entry(event_loop) {
            Ok(entry) => entry,
            Err(e) => {
                self.fail(event_loop, e);
                return;
            }
        };

        entry.with_mut(|fields| {
            fields.scheduler.mark_ready();
            fields.clock.reset();
        });
        entry.with_window(|w| w.request_redraw());

        self.entry = Some(entry);
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        // Redraws are re-armed from the tick itself.
        event_loop.set_control_flow(ControlFlow::Wait);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                log::info!("window closed");
                self.shutdown(event_loop);
            }

            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(KeyCode::Escape),
                        state: ElementState::Pressed,
                        ..
                    },
                ..
            } => {
                log::info!("escape pressed");
                self.shutdown(event_loop);
            }

            WindowEvent::RedrawRequested => self.redraw(event_loop),

            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn halt_reports_out_of_memory() {
        let msg = format!("{:#}", halted_error());
        assert!(msg.contains("out of memory"));
        assert!(!msg.contains("lost"));
    }
}
