use std::time::Instant;

/// Frame timing snapshot.
#[derive(Debug, Copy, Clone)]
pub struct FrameTime {
    /// Milliseconds since the clock origin. Monotonically non-decreasing
    /// across ticks of the same clock.
    pub timestamp_ms: f64,
}

/// Frame clock producing `FrameTime` snapshots.
///
/// The timestamp plays the role of a display callback's frame time: it is
/// measured from the clock origin (creation or last `reset`) and never
/// decreases.
#[derive(Debug, Clone)]
pub struct FrameClock {
    origin: Instant,
}

impl FrameClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }

    /// Moves the origin to now.
    ///
    /// Called once setup finishes so the first frame starts near t = 0.
    pub fn reset(&mut self) {
        self.origin = Instant::now();
    }

    /// Samples the clock.
    pub fn tick(&self) -> FrameTime {
        FrameTime {
            timestamp_ms: Instant::now()
                .saturating_duration_since(self.origin)
                .as_secs_f64()
                * 1000.0,
        }
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}
