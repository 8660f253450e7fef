//! Time management utilities

use std::time::Instant;

/// High-precision frame timer
///
/// Tracks elapsed seconds for the last frame and total seconds since
/// creation. Supports both wall-clock stepping (`tick`) and manual
/// stepping (`advance`) for headless runs and tests.
pub struct Timer {
    last_frame: Instant,
    delta_time: f32,
    total_time: f32,
    frame_count: u64,
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
}

impl Timer {
    /// Create a new timer
    #[must_use]
    pub fn new() -> Self {
        Self {
            last_frame: Instant::now(),
            delta_time: 0.0,
            total_time: 0.0,
            frame_count: 0,
        }
    }

    /// Update the timer from the wall clock (call once per frame)
    pub fn tick(&mut self) {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_frame);
        self.last_frame = now;
        self.step(elapsed.as_secs_f32());
    }

    /// Advance the timer by an explicit time step in seconds
    pub fn advance(&mut self, delta_seconds: f32) {
        self.last_frame = Instant::now();
        self.step(delta_seconds);
    }

    fn step(&mut self, delta: f32) {
        self.delta_time = delta;
        self.total_time += delta;
        self.frame_count += 1;
    }

    /// Time since the last frame in seconds
    #[must_use]
    pub fn delta_time(&self) -> f32 {
        self.delta_time
    }

    /// Total elapsed time since timer creation in seconds
    #[must_use]
    pub fn total_time(&self) -> f32 {
        self.total_time
    }

    /// Number of frames stepped so far
    #[must_use]
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }
}
