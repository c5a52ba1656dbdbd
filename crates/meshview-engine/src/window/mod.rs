//! Window + runtime loop.
//!
//! Owns the `winit` EventLoop and Window, runs setup once the window exists,
//! and drives the frame scheduler from redraw events.

mod runtime;

pub use runtime::{Runtime, RuntimeConfig};
