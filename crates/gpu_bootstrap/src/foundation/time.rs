//! Time management utilities

use std::time::{Duration, Instant};

/// Monotonic clock for the lifecycle loop
///
/// The start timestamp is captured once; every tick derives the elapsed
/// duration from it rather than accumulating per-frame deltas.
#[derive(Debug, Clone, Copy)]
pub struct FrameClock {
    start: Instant,
    frame_count: u64,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::start()
    }
}

impl FrameClock {
    /// Capture the start timestamp
    pub fn start() -> Self {
        Self {
            start: Instant::now(),
            frame_count: 0,
        }
    }

    /// Record one frame and return the time since the clock started
    pub fn tick(&mut self) -> Duration {
        self.frame_count += 1;
        self.elapsed()
    }

    /// Time since the clock started
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Number of frames recorded with [`FrameClock::tick`]
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }
}
