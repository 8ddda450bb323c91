#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Frame pacing and input tracking for the Wayfinder engine.
//!
//! The engine accumulates elapsed time between host ticks, recomputes a
//! rolling frames-per-second figure, and gates expensive work behind the
//! configured render interval. Input handlers only update snapshots; all
//! decisions based on them happen inside the tick.

mod fps;
mod input;

pub use fps::FpsCounter;
pub use input::InputTracker;

use std::time::Duration;

use glam::Vec2;
use wayfinder_core::{GridCoord, GridDimensions, KeyCode, Viewport};

const FPS_REPORT_INTERVAL: Duration = Duration::from_secs(1);

/// Outcome of advancing the clock by one host tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TickReport {
    /// Simulated time that passed since the previous tick; never negative,
    /// zero for repeated or non-increasing timestamps.
    pub elapsed: Duration,
    /// True when the render-interval gate opened on this tick.
    pub render_due: bool,
    /// True at most once per second, for periodic diagnostics.
    pub fps_report_due: bool,
    /// Rolling average frames-per-second at this tick.
    pub frames_per_second: f32,
}

/// Tracks tick timing and decides when render passes may run.
#[derive(Debug)]
pub struct FrameClock {
    last_timestamp: Option<f64>,
    render_interval: Duration,
    render_elapsed: Duration,
    fps_report_elapsed: Duration,
    rendered_once: bool,
    fps: FpsCounter,
}

impl FrameClock {
    /// Creates a clock gated by the provided render interval.
    ///
    /// The gate starts open so the first tick always produces a frame.
    #[must_use]
    pub fn new(render_interval: Duration) -> Self {
        Self {
            last_timestamp: None,
            render_interval,
            render_elapsed: render_interval,
            fps_report_elapsed: Duration::ZERO,
            rendered_once: false,
            fps: FpsCounter::new(),
        }
    }

    /// Advances the clock to the provided host timestamp in milliseconds.
    ///
    /// Repeated or non-increasing timestamps produce zero elapsed time and
    /// never open the render gate a second time. The gate opens at most once
    /// per render interval and its accumulator is consumed on dispatch.
    pub fn advance(&mut self, timestamp_ms: f64) -> TickReport {
        let elapsed = match self.last_timestamp {
            Some(last) if timestamp_ms > last => {
                let delta_ms = timestamp_ms - last;
                if delta_ms.is_finite() {
                    Duration::from_secs_f64(delta_ms / 1000.0)
                } else {
                    Duration::ZERO
                }
            }
            Some(_) => Duration::ZERO,
            None => Duration::ZERO,
        };

        // The reference never moves backwards, so a stale timestamp cannot
        // manufacture elapsed time once the host clock recovers.
        self.last_timestamp = Some(match self.last_timestamp {
            Some(last) => last.max(timestamp_ms),
            None => timestamp_ms,
        });

        self.fps.record_frame(elapsed);
        self.render_elapsed = self.render_elapsed.saturating_add(elapsed);
        self.fps_report_elapsed = self.fps_report_elapsed.saturating_add(elapsed);

        let advancing = !elapsed.is_zero() || !self.rendered_once;
        let render_due = advancing && self.render_elapsed >= self.render_interval;
        if render_due {
            self.render_elapsed = Duration::ZERO;
            self.rendered_once = true;
        }

        let fps_report_due = self.fps_report_elapsed >= FPS_REPORT_INTERVAL;
        if fps_report_due {
            self.fps_report_elapsed = Duration::ZERO;
        }

        TickReport {
            elapsed,
            render_due,
            fps_report_due,
            frames_per_second: self.fps.frames_per_second(),
        }
    }
}

/// Engine state owning input snapshots and frame pacing.
#[derive(Debug)]
pub struct Engine {
    clock: FrameClock,
    input: InputTracker,
}

impl Engine {
    /// Creates engine state gated by the provided render interval.
    #[must_use]
    pub fn new(render_interval: Duration) -> Self {
        Self {
            clock: FrameClock::new(render_interval),
            input: InputTracker::new(),
        }
    }

    /// Advances frame timing; see [`FrameClock::advance`].
    pub fn tick(&mut self, timestamp_ms: f64) -> TickReport {
        self.clock.advance(timestamp_ms)
    }

    /// Records a key press.
    pub fn key_down(&mut self, code: KeyCode) {
        self.input.key_down(code);
    }

    /// Records a key release.
    pub fn key_up(&mut self, code: KeyCode) {
        self.input.key_up(code);
    }

    /// Reports whether the key is currently held.
    #[must_use]
    pub fn is_pressed(&self, code: KeyCode) -> bool {
        self.input.is_pressed(code)
    }

    /// Consumes the one-shot edge latch for the key.
    pub fn take_just_pressed(&mut self, code: KeyCode) -> bool {
        self.input.take_just_pressed(code)
    }

    /// Records the pointer position in viewport units.
    pub fn pointer_moved(&mut self, position: Vec2) {
        self.input.pointer_moved(position);
    }

    /// Last known pointer position.
    #[must_use]
    pub fn pointer(&self) -> Option<Vec2> {
        self.input.pointer()
    }

    /// Grid cell under the pointer, if any.
    #[must_use]
    pub fn pointer_cell(&self, viewport: Viewport, dims: GridDimensions) -> Option<GridCoord> {
        self.input.pointer_cell(viewport, dims)
    }
}
