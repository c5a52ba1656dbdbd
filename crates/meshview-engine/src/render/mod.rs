//! GPU rendering subsystem.
//!
//! Setup builds, in order: storage/uniform buffers and the bind group
//! (`resources`), the shader module and both pipelines (`shader`,
//! `pipelines`), and the depth target (`depth`). `MeshRenderer` owns all of
//! it. Each frame, `FrameScheduler` drives a `RenderContext` through one
//! uniform write and one render pass.
//!
//! Convention:
//! - no vertex buffers; shaders pull indices and positions from storage
//!   buffers by `vertex_index`
//! - edges are drawn before triangles in the same pass

pub mod bindings;
mod ctx;
pub mod depth;
pub mod frame;
pub mod pipelines;
mod renderer;
pub mod resources;
pub mod scheduler;
pub mod shader;
pub mod writer;

pub use bindings::BufferRole;
pub use ctx::RenderContext;
pub use depth::DepthTarget;
pub use frame::{DrawCall, DrawTarget, FramePlan, FrameUniform, Viewport};
pub use pipelines::MeshPipelines;
pub use renderer::MeshRenderer;
pub use resources::{BufferLayout, DrawCounts, MeshResources};
pub use scheduler::{FrameBackend, FrameScheduler, FrameStatus, SchedulerState, TickOutcome};
pub use shader::ShaderAsset;
pub use writer::BufferWriter;
