//! Time management utilities

use std::time::Instant;

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
    pub fn update(&mut self) {
        let now = Instant::now();
        self.advance(now.duration_since(self.last_frame).as_secs_f32());
        self.last_frame = now;
    }
    
    /// Advance the timer by a known frame duration (headless hosts, tests)
    pub fn advance(&mut self, delta_time: f32) {
        self.delta_time = delta_time.max(0.0);
        self.total_time += self.delta_time;
        self.frame_count += 1;
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
    
    /// Get the average FPS since timer creation
    pub fn average_fps(&self) -> f32 {
        if self.total_time > 0.0 {
            self.frame_count as f32 / self.total_time
        } else {
            0.0
        }
    }
}

/// Fixed-timestep accumulator for physics ticks
///
/// Frame time is accumulated and consumed in whole `step` sized ticks. The
/// number of ticks per frame is capped so a long stall does not trigger a
/// spiral of catch-up steps; the excess time is dropped.
#[derive(Debug, Clone)]
pub struct FixedTimestep {
    step: f32,
    max_steps: u32,
    accumulator: f32,
}

impl FixedTimestep {
    /// Create an accumulator ticking every `step` seconds, at most `max_steps` per frame
    pub fn new(step: f32, max_steps: u32) -> Self {
        Self {
            step,
            max_steps: max_steps.max(1),
            accumulator: 0.0,
        }
    }
    
    /// Length of one tick in seconds
    pub fn step(&self) -> f32 {
        self.step
    }
    
    /// Time carried over to the next frame
    pub fn accumulated(&self) -> f32 {
        self.accumulator
    }
    
    /// Add a frame's elapsed time and return how many ticks to run
    pub fn accumulate(&mut self, delta_time: f32) -> u32 {
        self.accumulator += delta_time.max(0.0);
        
        let mut steps = 0;
        while self.accumulator >= self.step && steps < self.max_steps {
            self.accumulator -= self.step;
            steps += 1;
        }
        
        if steps == self.max_steps && self.accumulator >= self.step {
            log::warn!(
                "Dropping {:.4}s of simulation time after {} physics steps",
                self.accumulator,
                steps
            );
            self.accumulator %= self.step;
        }
        
        steps
    }
    
    /// Discard any accumulated time
    pub fn reset(&mut self) {
        self.accumulator = 0.0;
    }
}
