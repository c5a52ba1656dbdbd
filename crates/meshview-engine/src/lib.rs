//! meshview engine crate.
//!
//! Owns the GPU setup and the frame loop for drawing one triangulated 2-D mesh:
//! device acquisition, storage/uniform buffers, the edge + triangle pipelines,
//! the depth target and the per-frame scheduler.

pub mod core;
pub mod device;
pub mod error;
pub mod logging;
pub mod mesh;
pub mod render;
pub mod time;
pub mod window;

pub use error::SetupError;
