//! Frame timing.
//!
//! The particle physics is per-frame, not per-second, so the clock is only
//! used for the time-based decorations and for reporting FPS.
//!
//! ```ignore
//! let mut clock = FrameClock::new();
//!
//! // Once per redraw:
//! clock.tick();
//! scene.update(clock.elapsed(), ready);
//! ```

use std::time::{Duration, Instant};

/// Elapsed time, frame count and a smoothed FPS figure.
#[derive(Clone, Debug)]
pub struct FrameClock {
    start: Instant,
    last_frame: Instant,
    elapsed: Duration,
    delta: Duration,
    frame: u64,
    fps: f32,
    fps_frames: u64,
    fps_since: Instant,
    fps_interval: Duration,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::starting_at(Instant::now())
    }

    /// Clock whose zero is `start`.
    pub fn starting_at(start: Instant) -> Self {
        Self {
            start,
            last_frame: start,
            elapsed: Duration::ZERO,
            delta: Duration::ZERO,
            frame: 0,
            fps: 0.0,
            fps_frames: 0,
            fps_since: start,
            fps_interval: Duration::from_millis(500),
        }
    }

    /// Advance to the current instant.
    pub fn tick(&mut self) {
        self.tick_at(Instant::now());
    }

    /// Advance to `now`. Instants earlier than the last tick count as no time.
    pub fn tick_at(&mut self, now: Instant) {
        self.delta = now.saturating_duration_since(self.last_frame);
        self.elapsed = now.saturating_duration_since(self.start);
        self.last_frame = now.max(self.last_frame);
        self.frame += 1;

        let window = now.saturating_duration_since(self.fps_since);
        if window >= self.fps_interval {
            let frames = self.frame - self.fps_frames;
            self.fps = frames as f32 / window.as_secs_f32();
            self.fps_frames = self.frame;
            self.fps_since = now;
        }
    }

    /// Time since the clock started, as of the last tick.
    #[inline]
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Time between the last two ticks.
    #[inline]
    pub fn delta(&self) -> Duration {
        self.delta
    }

    #[inline]
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Frames per second over the last measurement window.
    #[inline]
    pub fn fps(&self) -> f32 {
        self.fps
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}
