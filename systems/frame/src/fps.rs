//! Rolling-window frames-per-second accounting.

use std::collections::VecDeque;
use std::time::Duration;

const TRAILING_WINDOW: Duration = Duration::from_secs(1);

/// Tracks the average frames-per-second over a trailing one-second window.
#[derive(Debug, Default)]
pub struct FpsCounter {
    frame_times: VecDeque<Duration>,
    window_duration: Duration,
}

impl FpsCounter {
    /// Creates a counter with an empty window.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one frame of the provided duration.
    ///
    /// Zero-length frames are ignored; a repeated timestamp is not a new
    /// frame. Frames older than the trailing window fall off the far end.
    pub fn record_frame(&mut self, frame: Duration) {
        if frame.is_zero() {
            return;
        }

        self.frame_times.push_back(frame);
        self.window_duration = self.window_duration.saturating_add(frame);

        while self.window_duration > TRAILING_WINDOW {
            if let Some(removed) = self.frame_times.pop_front() {
                self.window_duration = self.window_duration.saturating_sub(removed);
            } else {
                break;
            }
        }
    }

    /// Average frames-per-second across the current window.
    ///
    /// Always finite and non-negative; an empty window reports zero.
    #[must_use]
    pub fn frames_per_second(&self) -> f32 {
        let seconds = self.window_duration.as_secs_f32();
        if seconds <= f32::EPSILON {
            return 0.0;
        }
        self.frame_times.len() as f32 / seconds
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_window_reports_zero() {
        let counter = FpsCounter::new();
        assert_eq!(counter.frames_per_second(), 0.0);
    }

    #[test]
    fn steady_cadence_approximates_frame_rate() {
        let mut counter = FpsCounter::new();
        for _ in 0..60 {
            counter.record_frame(Duration::from_millis(16));
        }

        let fps = counter.frames_per_second();
        assert!((fps - 62.5).abs() < 1.0, "unexpected fps {fps}");
    }

    #[test]
    fn zero_length_frames_are_ignored() {
        let mut counter = FpsCounter::new();
        counter.record_frame(Duration::ZERO);
        assert_eq!(counter.frames_per_second(), 0.0);
    }

    #[test]
    fn old_frames_fall_out_of_the_window() {
        let mut counter = FpsCounter::new();
        for _ in 0..10 {
            counter.record_frame(Duration::from_millis(100));
        }
        // A slow second of frames displaces the earlier fast ones.
        for _ in 0..4 {
            counter.record_frame(Duration::from_millis(250));
        }

        let fps = counter.frames_per_second();
        assert!(fps <= 10.0, "stale frames still counted: {fps}");
        assert!(fps >= 0.0);
    }
}
