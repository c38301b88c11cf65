//! Per-frame lifecycle loop
//!
//! Two states. `Running` polls the window, reports elapsed time and idles
//! for a fixed interval. A close request moves the loop to `Closing`, which
//! is terminal: the loop returns and never polls again.

use std::thread;
use std::time::Duration;

use crate::foundation::time::FrameClock;
use crate::window::{FramebufferResize, Windowing};

/// Loop state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    /// Polling and reporting each iteration
    Running,
    /// Close was requested; terminal
    Closing,
}

/// Summary returned once the loop exits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoopReport {
    /// Completed iterations
    pub iterations: u64,
    /// Elapsed time reported by the last iteration
    pub elapsed: Duration,
    /// Resize notifications seen (recorded only)
    pub resizes: u32,
    /// Most recent framebuffer size reported by the window
    pub last_resize: Option<FramebufferResize>,
}

/// Coarse, rate-limited event loop
#[derive(Debug)]
pub struct LifecycleLoop {
    interval: Duration,
    state: LoopState,
}

impl LifecycleLoop {
    /// Create a loop that idles `interval` between iterations
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            state: LoopState::Running,
        }
    }

    /// Current state
    pub fn state(&self) -> LoopState {
        self.state
    }

    /// Run until the window asks to close, logging elapsed time per iteration
    pub fn run<W: Windowing>(&mut self, window: &mut W) -> LoopReport {
        self.run_with(window, |iteration, elapsed| {
            log::info!("Frame {}: {:.3}s elapsed", iteration, elapsed.as_secs_f64());
        })
    }

    /// Run until the window asks to close, handing each elapsed time to `report`
    pub fn run_with<W, F>(&mut self, window: &mut W, mut report: F) -> LoopReport
    where
        W: Windowing,
        F: FnMut(u64, Duration),
    {
        let mut clock = FrameClock::start();
        let mut summary = LoopReport {
            iterations: 0,
            elapsed: Duration::ZERO,
            resizes: 0,
            last_resize: None,
        };

        while self.state == LoopState::Running {
            if window.should_close() {
                log::info!("Close requested after {} iterations", summary.iterations);
                self.state = LoopState::Closing;
                break;
            }

            if let Some(resize) = window.poll_events() {
                log::debug!("Framebuffer resized to {}x{}", resize.width, resize.height);
                summary.resizes += 1;
                summary.last_resize = Some(resize);
            }

            let elapsed = clock.tick();
            summary.iterations = clock.frame_count();
            summary.elapsed = elapsed;
            report(summary.iterations, elapsed);

            thread::sleep(self.interval);
        }

        summary
    }
}
