use super::bindings::BufferRole;
use super::frame;
use super::renderer::MeshRenderer;
use super::resources::QueueWriter;
use super::scheduler::{FrameBackend, FrameStatus};
use super::writer::BufferWriter;
use crate::device::{Gpu, SurfaceErrorAction};

/// Per-tick view of the long-lived setup state.
///
/// Lifetimes:
/// - `'a` is the duration of the tick
/// - `'w` is the window-borrow lifetime carried by `Gpu<'w>`
pub struct RenderContext<'a, 'w> {
    pub gpu: &'a mut Gpu<'w>,
    pub renderer: &'a MeshRenderer,
}

impl<'a, 'w> RenderContext<'a, 'w> {
    #[inline]
    pub fn new(gpu: &'a mut Gpu<'w>, renderer: &'a MeshRenderer) -> Self {
        Self { gpu, renderer }
    }
}

impl BufferWriter for RenderContext<'_, '_> {
    fn write(&mut self, role: BufferRole, bytes: &[u8]) {
        QueueWriter {
            queue: self.gpu.queue(),
            buffers: self.renderer.resources().buffers(),
        }
        .write(role, bytes);
    }
}

impl FrameBackend for RenderContext<'_, '_> {
    fn submit_frame(&mut self) -> FrameStatus {
        let mut gpu_frame = match self.gpu.begin_frame() {
            Ok(f) => f,
            Err(err) => {
                log::warn!("surface acquisition failed: {err}");
                return match self.gpu.handle_surface_error(err) {
                    SurfaceErrorAction::Fatal => FrameStatus::Fatal,
                    SurfaceErrorAction::Reconfigured | SurfaceErrorAction::SkipFrame => {
                        FrameStatus::Skipped
                    }
                };
            }
        };

        frame::encode_pass(
            self.renderer.plan(),
            &mut gpu_frame.encoder,
            &gpu_frame.view,
            &self.renderer.pass_resources(),
        );

        self.gpu.submit(gpu_frame);
        FrameStatus::Submitted
    }
}
