//=========================================================================
// Frame Time
//=========================================================================
//
// Per-tick clock value threaded opaquely through Update/Animate/Draw.
//
// Flow:
//   FrameClock::tick() → FrameTime (copied into every worker task)
//
//=========================================================================

//=== External Dependencies ===============================================

use std::time::{Duration, Instant};

//=== FrameTime ===========================================================

/// Clock value for a single frame.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FrameTime {
    /// Time since the previous frame.
    pub elapsed: Duration,

    /// Time since the clock started.
    pub total: Duration,

    /// Zero-based frame counter.
    pub frame: u64,
}

impl FrameTime {
    /// Builds a frame time from explicit values (tests, replays).
    pub fn new(elapsed: Duration, total: Duration, frame: u64) -> Self {
        Self {
            elapsed,
            total,
            frame,
        }
    }

    /// Elapsed time in seconds.
    pub fn delta_seconds(&self) -> f32 {
        self.elapsed.as_secs_f32()
    }
}

//=== FrameClock ==========================================================

/// Wall-clock source of [`FrameTime`] values for the embedding loop.
pub struct FrameClock {
    start: Instant,
    last: Instant,
    frame: u64,
}

impl FrameClock {
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            start: now,
            last: now,
            frame: 0,
        }
    }

    /// Advances the clock and returns this frame's time.
    pub fn tick(&mut self) -> FrameTime {
        let now = Instant::now();
        let time = FrameTime {
            elapsed: now - self.last,
            total: now - self.start,
            frame: self.frame,
        };
        self.last = now;
        self.frame += 1;
        time
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
