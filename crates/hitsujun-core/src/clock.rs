//! Virtual playback time.
//!
//! [`AnimationClock`] accumulates virtual milliseconds from wall-clock
//! samples taken on every scheduling tick, scaled by a user
//! [`SpeedFactor`]. Wall-clock time that passes while the clock is not
//! playing is never counted: resuming re-samples the reference instant.
//!
//! Instants come from the `web-time` crate, which uses `performance.now()`
//! on WASM and `std::time::Instant` on native. Every operation takes the
//! current instant as an argument so hosts (and tests) control the time
//! source.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use web_time::Instant;

/// User-facing playback speed multiplier.
///
/// Always finite and strictly positive. Anything else supplied by a
/// control surface falls back to [`SpeedFactor::DEFAULT`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "f64", into = "f64")]
pub struct SpeedFactor(f64);

impl SpeedFactor {
    /// Normal speed (1×).
    pub const DEFAULT: Self = Self(1.0);

    /// Create a multiplier, coercing non-finite or non-positive values to 1.0.
    #[must_use]
    pub fn new(value: f64) -> Self {
        if value.is_finite() && value > 0.0 {
            Self(value)
        } else {
            Self::DEFAULT
        }
    }

    /// Parse control-surface text. Unparseable input yields 1.0.
    #[must_use]
    pub fn parse(text: &str) -> Self {
        text.trim().parse::<f64>().map_or(Self::DEFAULT, Self::new)
    }

    /// The multiplier value.
    #[must_use]
    pub const fn get(self) -> f64 {
        self.0
    }
}

impl Default for SpeedFactor {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl From<f64> for SpeedFactor {
    fn from(value: f64) -> Self {
        Self::new(value)
    }
}

impl From<SpeedFactor> for f64 {
    fn from(speed: SpeedFactor) -> Self {
        speed.0
    }
}

/// Lifecycle of a playback clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClockState {
    /// Reset and never started.
    #[default]
    Idle,
    /// Consuming ticks.
    Playing,
    /// Halted by the user; resumable.
    Paused,
    /// Halted because every timeline completed.
    Finished,
}

/// Accumulator of virtual elapsed time.
#[derive(Debug, Clone, Default)]
pub struct AnimationClock {
    elapsed_ms: f64,
    last_sample: Option<Instant>,
    speed: SpeedFactor,
    state: ClockState,
}

impl AnimationClock {
    /// A reset clock running at `speed`.
    #[must_use]
    pub fn new(speed: SpeedFactor) -> Self {
        Self {
            speed,
            ..Self::default()
        }
    }

    /// Virtual milliseconds accumulated since the last reset.
    #[must_use]
    pub const fn elapsed_ms(&self) -> f64 {
        self.elapsed_ms
    }

    /// Current lifecycle state.
    #[must_use]
    pub const fn state(&self) -> ClockState {
        self.state
    }

    /// Returns `true` while ticks advance the clock.
    #[must_use]
    pub const fn is_playing(&self) -> bool {
        matches!(self.state, ClockState::Playing)
    }

    /// Current speed multiplier.
    #[must_use]
    pub const fn speed(&self) -> SpeedFactor {
        self.speed
    }

    /// Change the multiplier; applies from the next tick onward.
    pub fn set_speed(&mut self, speed: impl Into<SpeedFactor>) {
        self.speed = speed.into();
    }

    /// Start or resume at `now`.
    ///
    /// The reference instant is re-sampled so time spent idle or paused
    /// contributes nothing. Returns `false` if the clock was already
    /// playing (the reference instant is left untouched).
    pub fn start(&mut self, now: Instant) -> bool {
        if self.is_playing() {
            return false;
        }
        self.state = ClockState::Playing;
        self.last_sample = Some(now);
        true
    }

    /// Advance by the wall-clock delta since the previous sample, scaled
    /// by the speed multiplier, and return the new elapsed value.
    ///
    /// Has no effect unless playing. A `now` earlier than the previous
    /// sample counts as a zero delta.
    pub fn tick(&mut self, now: Instant) -> f64 {
        if !self.is_playing() {
            return self.elapsed_ms;
        }
        if let Some(last) = self.last_sample {
            let delta = now.saturating_duration_since(last);
            self.elapsed_ms += duration_ms(delta) * self.speed.get();
        }
        self.last_sample = Some(now);
        self.elapsed_ms
    }

    /// Stop consuming ticks. Returns `false` if the clock was not playing.
    pub fn pause(&mut self) -> bool {
        if !self.is_playing() {
            return false;
        }
        self.state = ClockState::Paused;
        self.last_sample = None;
        true
    }

    /// Mark playback complete; the elapsed value is kept.
    pub fn finish(&mut self) {
        self.state = ClockState::Finished;
        self.last_sample = None;
    }

    /// Zero the elapsed time and return to [`ClockState::Idle`].
    pub fn reset(&mut self) {
        self.elapsed_ms = 0.0;
        self.last_sample = None;
        self.state = ClockState::Idle;
    }
}

/// Convert a `Duration` to fractional milliseconds.
fn duration_ms(d: Duration) -> f64 {
    d.as_secs_f64() * 1000.0
}
