//! Frame scheduler: the render loop as an explicit state machine.
//!
//! `Uninitialized -> Ready -> Rendering*`, and any state `-> Stopped`.
//! A tick writes the uniform, submits one frame and reports whether the loop
//! should be re-armed for the next display refresh.

use super::frame::FrameUniform;
use super::writer::{self, BufferWriter};

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum SchedulerState {
    /// Setup has not finished; ticks are ignored.
    Uninitialized,
    /// Setup finished; waiting for the first tick.
    Ready,
    /// At least one tick has run.
    Rendering,
    /// Terminal. Ticks are ignored and the loop is never re-armed.
    Stopped,
}

/// Result of submitting one frame.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum FrameStatus {
    Submitted,
    /// The surface could not provide an image this tick; try again next tick.
    Skipped,
    /// The surface is unusable; stop the loop.
    Fatal,
}

/// What the caller should do after a tick.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum TickOutcome {
    /// Schedule the next tick.
    Rearm,
    /// The tick did nothing because setup has not finished.
    Idle,
    /// The scheduler is stopped; do not schedule again.
    Halt,
}

/// GPU side of a tick: buffer writes plus encode/submit of the frame.
pub trait FrameBackend: BufferWriter {
    /// Acquires the current surface image, records the render pass and submits it.
    fn submit_frame(&mut self) -> FrameStatus;
}

#[derive(Debug)]
pub struct FrameScheduler {
    state: SchedulerState,
    last_uniform: Option<FrameUniform>,
    ticks: u64,
}

impl FrameScheduler {
    pub fn new() -> Self {
        Self {
            state: SchedulerState::Uninitialized,
            last_uniform: None,
            ticks: 0,
        }
    }

    pub fn state(&self) -> SchedulerState {
        self.state
    }

    /// Last value written to the uniform buffer.
    pub fn last_uniform(&self) -> Option<FrameUniform> {
        self.last_uniform
    }

    /// Number of ticks that submitted work.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Marks setup as complete. Only valid from `Uninitialized`.
    pub fn mark_ready(&mut self) {
        if self.state == SchedulerState::Uninitialized {
            self.state = SchedulerState::Ready;
        } else {
            log::debug!("mark_ready ignored in state {:?}", self.state);
        }
    }

    /// Stops the loop. Idempotent.
    pub fn stop(&mut self) {
        if self.state != SchedulerState::Stopped {
            log::info!("frame scheduler stopped after {} ticks", self.ticks);
            self.state = SchedulerState::Stopped;
        }
    }

    pub fn is_running(&self) -> bool {
        matches!(self.state, SchedulerState::Ready | SchedulerState::Rendering)
    }

    /// Runs one tick at `timestamp_ms`:
    /// 1. overwrite the uniform with `timestamp_ms * 0.001`
    /// 2. encode and submit the frame
    /// 3. report whether to re-arm
    pub fn tick<B: FrameBackend + ?Sized>(&mut self, backend: &mut B, timestamp_ms: f64) -> TickOutcome {
        match self.state {
            SchedulerState::Uninitialized => return TickOutcome::Idle,
            SchedulerState::Stopped => return TickOutcome::Halt,
            SchedulerState::Ready | SchedulerState::Rendering => {}
        }

        self.state = SchedulerState::Rendering;

        let uniform = FrameUniform::from_timestamp_ms(timestamp_ms);
        writer::write_uniform(backend, uniform);
        self.last_uniform = Some(uniform);

        match backend.submit_frame() {
            FrameStatus::Submitted => {
                self.ticks += 1;
                log::trace!("tick {} t={:.3}s", self.ticks, uniform.time);
            }
            FrameStatus::Skipped => log::debug!("frame skipped at t={:.3}s", uniform.time),
            FrameStatus::Fatal => {
                log::error!("surface is unusable; stopping the frame loop");
                self.stop();
            }
        }

        if self.is_running() {
            TickOutcome::Rearm
        } else {
            TickOutcome::Halt
        }
    }
}

impl Default for FrameScheduler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::{MeshSource, UnitSquareMesher};
    use crate::render::bindings::BufferRole;
    use crate::render::writer::recording::RecordingWriter;
    use crate::render::writer::upload_mesh;

    #[derive(Default)]
    struct FakeBackend {
        writer: RecordingWriter,
        /// Call names in order.
        calls: Vec<&'static str>,
        status: Option<FrameStatus>,
    }

    impl BufferWriter for FakeBackend {
        fn write(&mut self, role: BufferRole, bytes: &[u8]) {
            self.calls.push("write");
            self.writer.write(role, bytes);
        }
    }

    impl FrameBackend for FakeBackend {
        fn submit_frame(&mut self) -> FrameStatus {
            self.calls.push("submit");
            self.status.unwrap_or(FrameStatus::Submitted)
        }
    }

    fn ready() -> FrameScheduler {
        let mut s = FrameScheduler::new();
        s.mark_ready();
        s
    }

    #[test]
    fn starts_uninitialized_and_ignores_ticks() {
        let mut s = FrameScheduler::new();
        let mut b = FakeBackend::default();
        assert_eq!(s.state(), SchedulerState::Uninitialized);
        assert_eq!(s.tick(&mut b, 10.0), TickOutcome::Idle);
        assert!(b.calls.is_empty());
    }

    #[test]
    fn tick_writes_uniform_before_submitting() {
        let mut s = ready();
        let mut b = FakeBackend::default();
        assert_eq!(s.tick(&mut b, 1000.0), TickOutcome::Rearm);
        assert_eq!(b.calls, vec!["write", "submit"]);
        assert_eq!(s.state(), SchedulerState::Rendering);
        assert_eq!(s.last_uniform(), Some(FrameUniform { time: 1.0 }));
        assert_eq!(b.writer.last(BufferRole::Uniform).unwrap(), &1.0f32.to_ne_bytes());
    }

    #[test]
    fn repeated_ticks_only_touch_the_uniform() {
        let mesh = UnitSquareMesher::default().generate().unwrap();
        let mut b = FakeBackend::default();
        upload_mesh(&mut b, &mesh);
        let uploaded = b.writer.writes.clone();

        let mut s = ready();
        s.tick(&mut b, 16.0);
        s.tick(&mut b, 33.0);

        // Setup writes are untouched; every later write targets the uniform.
        assert_eq!(&b.writer.writes[..3], &uploaded[..]);
        assert!(b.writer.writes[3..].iter().all(|(r, _)| *r == BufferRole::Uniform));
        assert_eq!(b.writer.writes.len(), 5);
        assert_eq!(s.ticks(), 2);
    }

    #[test]
    fn uniform_tracks_increasing_timestamps() {
        let mut s = ready();
        let mut b = FakeBackend::default();
        let mut prev = f32::MIN;
        for ts in [0.0, 16.7, 33.3, 50.0, 1000.0, 123_456.0] {
            s.tick(&mut b, ts);
            let t = s.last_uniform().unwrap().time;
            assert!(t >= prev);
            assert!((t as f64 - ts * 0.001).abs() < 1e-4);
            prev = t;
        }
    }

    #[test]
    fn stop_prevents_rearm_and_further_work() {
        let mut s = ready();
        let mut b = FakeBackend::default();
        assert_eq!(s.tick(&mut b, 1.0), TickOutcome::Rearm);
        s.stop();
        assert!(!s.is_running());
        let calls = b.calls.len();
        assert_eq!(s.tick(&mut b, 2.0), TickOutcome::Halt);
        assert_eq!(b.calls.len(), calls);
        assert_eq!(s.state(), SchedulerState::Stopped);
    }

    #[test]
    fn fatal_frame_stops_the_loop() {
        let mut s = ready();
        let mut b = FakeBackend {
            status: Some(FrameStatus::Fatal),
            ..FakeBackend::default()
        };
        assert_eq!(s.tick(&mut b, 5.0), TickOutcome::Halt);
        assert_eq!(s.state(), SchedulerState::Stopped);
        assert_eq!(s.ticks(), 0);
    }

    #[test]
    fn skipped_frame_still_rearms() {
        let mut s = ready();
        let mut b = FakeBackend {
            status: Some(FrameStatus::Skipped),
            ..FakeBackend::default()
        };
        assert_eq!(s.tick(&mut b, 5.0), TickOutcome::Rearm);
        assert_eq!(s.ticks(), 0);
    }

    #[test]
    fn mark_ready_after_stop_is_ignored() {
        let mut s = ready();
        s.stop();
        s.mark_ready();
        assert_eq!(s.state(), SchedulerState::Stopped);
    }
}
