//! Frame rate statistics.

use std::time::{Duration, Instant};

/// Minimum gap between recomputations of the current rate.
const RATE_WINDOW: Duration = Duration::from_millis(100);

/// Snapshot of frame-rate statistics.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FrameRate {
    /// Frames recorded so far.
    pub frames: u64,
    /// Frames per second since the first frame.
    pub average_fps: f64,
    /// Frames per second over the last completed window.
    pub current_fps: f64,
}

/// Counts delivered frames and derives average and current FPS.
///
/// The current rate is recomputed only once more than 100 ms have passed
/// since the previous recomputation, which smooths out delivery jitter.
#[derive(Debug, Default)]
pub struct FrameRateTracker {
    started: Option<Instant>,
    frames: u64,
    window_start: Option<Instant>,
    window_frames: u64,
    current_fps: f64,
}

impl FrameRateTracker {
    /// Creates a tracker with no frames recorded.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a frame delivered at `at`.
    pub fn record(&mut self, at: Instant) -> FrameRate {
        let started = *self.started.get_or_insert(at);
        self.frames += 1;
        let window_start = match self.window_start {
            Some(start) => start,
            None => {
                self.window_start = Some(at);
                self.window_frames = self.frames;
                at
            }
        };

        let elapsed = at.saturating_duration_since(window_start);
        if elapsed > RATE_WINDOW {
            self.current_fps = (self.frames - self.window_frames) as f64 / elapsed.as_secs_f64();
            self.window_frames = self.frames;
            self.window_start = Some(at);
        }

        let total = at.saturating_duration_since(started).as_secs_f64();
        FrameRate {
            frames: self.frames,
            average_fps: if total > 0.0 { self.frames as f64 / total } else { 0.0 },
            current_fps: self.current_fps,
        }
    }

    /// Frames recorded so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Forgets every recorded frame.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
