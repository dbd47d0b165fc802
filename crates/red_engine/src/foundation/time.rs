//! Time management utilities

use std::time::{Duration, Instant};

/// High-precision timer for frame timing
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
    pub fn new() -> Self {
        Self {
            last_frame: Instant::now(),
            delta_time: 0.0,
            total_time: 0.0,
            frame_count: 0,
        }
    }

    /// Update the timer (should be called once per frame)
    pub fn update(&mut self) -> Duration {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_frame);
        self.delta_time = elapsed.as_secs_f32();
        self.total_time += self.delta_time;
        self.last_frame = now;
        self.frame_count += 1;
        elapsed
    }

    /// Get the time since the last frame in seconds
    pub fn delta_time(&self) -> f32 {
        self.delta_time
    }

    /// Get the total elapsed time since timer creation
    pub fn total_time(&self) -> f32 {
        self.total_time
    }

    /// Get the current frame count
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Get the current FPS (based on last frame time)
    pub fn current_fps(&self) -> f32 {
        if self.delta_time > 0.0 {
            1.0 / self.delta_time
        } else {
            0.0
        }
    }
}

/// Fixed-step accumulator for physics updates
///
/// Wall-clock frame time is capped at `max_frame_time` before being added, so a
/// long stall produces a bounded number of catch-up steps.
#[derive(Debug, Clone)]
pub struct FixedTimestep {
    step: f64,
    max_frame_time: f64,
    accumulator: f64,
}

impl FixedTimestep {
    /// Create an accumulator for `step` second updates
    pub fn new(step: f32, max_frame_time: f32) -> Self {
        assert!(step > 0.0, "Fixed timestep must be positive!");
        Self {
            step: f64::from(step),
            max_frame_time: f64::from(max_frame_time),
            accumulator: 0.0,
        }
    }

    /// Fixed step length in seconds
    #[allow(clippy::cast_possible_truncation)]
    pub fn step(&self) -> f32 {
        self.step as f32
    }

    /// Add a frame's elapsed time and return how many fixed steps are due
    pub fn advance(&mut self, frame_time: f32) -> u32 {
        self.accumulator += f64::from(frame_time).clamp(0.0, self.max_frame_time);
        let mut steps = 0;
        while self.accumulator >= self.step {
            self.accumulator -= self.step;
            steps += 1;
        }
        steps
    }

    /// Fraction of a step left over in the accumulator
    #[allow(clippy::cast_possible_truncation)]
    pub fn alpha(&self) -> f32 {
        (self.accumulator / self.step) as f32
    }

    /// Drop any accumulated time
    pub fn reset(&mut self) {
        self.accumulator = 0.0;
    }
}

/// Holds the main loop to a target frame rate by sleeping out each frame
#[derive(Debug, Clone)]
pub struct FrameLimiter {
    frame_budget: Duration,
    frame_start: Instant,
}

impl FrameLimiter {
    /// Limiter for `target_fps` frames per second; zero is treated as one
    pub fn new(target_fps: u32) -> Self {
        Self {
            frame_budget: Duration::from_secs(1) / target_fps.max(1),
            frame_start: Instant::now(),
        }
    }

    /// Wall-clock time one frame may take
    pub fn frame_budget(&self) -> Duration {
        self.frame_budget
    }

    /// Time left in the budget after `elapsed`
    pub fn remaining(&self, elapsed: Duration) -> Duration {
        self.frame_budget.saturating_sub(elapsed)
    }

    /// Sleep until the current frame used its budget, then start the next one
    pub fn wait(&mut self) {
        let remaining = self.remaining(self.frame_start.elapsed());
        if !remaining.is_zero() {
            std::thread::sleep(remaining);
        }
        self.frame_start = Instant::now();
    }
}
