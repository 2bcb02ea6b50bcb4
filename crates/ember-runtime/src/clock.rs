//! Frame clock producing frame-relative deltas

use std::time::Instant;

/// Default maximum delta ratio: 250ms at 60Hz
const DEFAULT_MAX_RATIO: f32 = 15.0;

#[derive(Debug, Clone, Copy, PartialEq)]
enum Mode {
    /// Every tick returns the same delta
    Fixed(f32),
    /// Delta measured from wall-clock time between ticks
    RealTime,
}

/// Tracks frame timing and reports each frame's delta as a ratio of the
/// target frame time, so 1.0 means "exactly one frame at the target rate".
pub struct FrameClock {
    /// Target refresh rate (default: 60Hz)
    pub target_hz: f64,
    /// Largest delta ratio a single tick may report
    pub max_ratio: f32,
    /// Total elapsed time in seconds
    pub total_time: f64,
    /// Delta ratio reported by the last tick
    pub delta: f32,
    /// Ticks so far
    pub frame: u64,
    mode: Mode,
    last_instant: Option<Instant>,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self {
            target_hz: 60.0,
            max_ratio: DEFAULT_MAX_RATIO,
            total_time: 0.0,
            delta: 1.0,
            frame: 0,
            mode: Mode::RealTime,
            last_instant: None,
        }
    }
}

impl FrameClock {
    /// Wall-clock driven clock targeting 60Hz
    pub fn new() -> Self {
        Self::default()
    }

    /// Wall-clock driven clock with a custom target rate
    pub fn with_target_hz(hz: f64) -> Self {
        Self {
            target_hz: hz,
            ..Self::default()
        }
    }

    /// Clock that reports `dt` on every tick regardless of real time
    pub fn fixed(dt: f32) -> Self {
        Self {
            mode: Mode::Fixed(dt),
            delta: dt,
            ..Self::default()
        }
    }

    pub fn is_fixed(&self) -> bool {
        matches!(self.mode, Mode::Fixed(_))
    }

    /// Target frame time in seconds
    pub fn frame_time(&self) -> f64 {
        1.0 / self.target_hz
    }

    /// Advance the clock. Call once per frame; returns the frame delta ratio.
    pub fn tick(&mut self) -> f32 {
        self.tick_at(Instant::now())
    }

    /// Advance the clock as if the frame started at `now`
    pub fn tick_at(&mut self, now: Instant) -> f32 {
        self.frame += 1;

        self.delta = match self.mode {
            Mode::Fixed(dt) => {
                self.total_time += dt as f64 * self.frame_time();
                dt
            }
            Mode::RealTime => match self.last_instant.replace(now) {
                // No previous frame to measure against
                None => 1.0,
                Some(last) => {
                    let elapsed = now.saturating_duration_since(last).as_secs_f64();
                    self.total_time += elapsed;
                    ((elapsed / self.frame_time()) as f32).min(self.max_ratio)
                }
            },
        };
        self.delta
    }
}
