//! GPU device + surface management.
//!
//! This module is responsible for:
//! - negotiating the wgpu Instance/Adapter/Device/Queue
//! - creating & configuring the Surface and choosing its preferred format
//! - acquiring frames and providing encoders/views for rendering

mod error;
mod frame;
mod gpu;
mod init;
mod surface;

pub use error::SurfaceErrorAction;
pub use frame::GpuFrame;
pub use gpu::Gpu;
pub use init::GpuInit;
