//! Time subsystem.
//!
//! Supplies the per-frame clock that drives the frame scheduler:
//! - one `FrameClock` per render loop
//! - call `tick()` once per frame to obtain a monotonic `FrameTime`

mod frame_clock;

pub use frame_clock::{FrameClock, FrameTime};
