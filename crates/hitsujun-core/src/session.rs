//! Playback session: one document, two timelines, one clock.
//!
//! [`PlaybackSession`] owns every piece of mutable playback state: the
//! [`AnimationClock`] and the latest [`TimelineFrame`] of both the
//! parse-order and the optimized timeline. The host scheduler drives it
//! by calling [`PlaybackSession::tick`] once per frame with the
//! [`TickToken`] handed out by the previous call.
//!
//! Only the most recently issued token is valid. Pausing or resetting
//! invalidates it, so a frame callback that was already queued when the
//! user paused is recognised as stale and ignored without touching any
//! state.

use serde::{Deserialize, Serialize};
use web_time::Instant;

use crate::clock::{AnimationClock, ClockState, SpeedFactor};
use crate::config::{ConfigError, PlaybackConfig};
use crate::sequence::{original_order, sequence};
use crate::stats::{ComparisonSummary, compare};
use crate::timeline::{TimelineFrame, evaluate};
use crate::types::{Order, StrokeDocument};

/// Permission to run one scheduled tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TickToken {
    generation: u64,
}

/// Result of delivering a tick to the session.
#[derive(Debug, Clone, PartialEq)]
pub enum TickOutcome {
    /// The token was invalidated by a pause, reset, or later token.
    /// Nothing changed; the host must not reschedule.
    Stale,
    /// At least one timeline is unfinished; schedule the next tick with
    /// this token.
    Continue(TickToken),
    /// Both timelines finished on this tick.
    Finished(ComparisonSummary),
}

/// Which of the two timelines a value belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Track {
    /// Parse order, all forward.
    Original,
    /// Travel-optimized order.
    Optimized,
}

/// Shared playback state for one loaded document.
#[derive(Debug, Clone)]
pub struct PlaybackSession {
    document: StrokeDocument,
    original: Order,
    optimized: Order,
    config: PlaybackConfig,
    clock: AnimationClock,
    original_frame: TimelineFrame,
    optimized_frame: TimelineFrame,
    summary: Option<ComparisonSummary>,
    generation: u64,
}

impl PlaybackSession {
    /// Sequence `document` and build a reset session.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the pen speeds in `config` are unusable.
    pub fn new(document: StrokeDocument, config: PlaybackConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let original = original_order(&document.segments);
        let optimized = sequence(&document.segments);
        let mut session = Self {
            clock: AnimationClock::new(config.speed),
            document,
            original,
            optimized,
            config,
            original_frame: TimelineFrame::default(),
            optimized_frame: TimelineFrame::default(),
            summary: None,
            generation: 0,
        };
        session.reset();
        tracing::info!(
            segments = session.document.segments.len(),
            "document loaded into playback session"
        );
        Ok(session)
    }

    /// Replace the document, re-sequence it, and reset playback.
    ///
    /// Any outstanding tick token becomes stale.
    pub fn load(&mut self, document: StrokeDocument) {
        self.original = original_order(&document.segments);
        self.optimized = sequence(&document.segments);
        self.document = document;
        self.reset();
        tracing::info!(
            segments = self.document.segments.len(),
            "document replaced"
        );
    }

    /// The loaded document.
    #[must_use]
    pub const fn document(&self) -> &StrokeDocument {
        &self.document
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &PlaybackConfig {
        &self.config
    }

    /// The order of `track`.
    #[must_use]
    pub const fn order(&self, track: Track) -> &Order {
        match track {
            Track::Original => &self.original,
            Track::Optimized => &self.optimized,
        }
    }

    /// The latest evaluated frame of `track`.
    #[must_use]
    pub const fn frame(&self, track: Track) -> &TimelineFrame {
        match track {
            Track::Original => &self.original_frame,
            Track::Optimized => &self.optimized_frame,
        }
    }

    /// Virtual milliseconds since the last reset.
    #[must_use]
    pub const fn elapsed_ms(&self) -> f64 {
        self.clock.elapsed_ms()
    }

    /// Clock lifecycle state.
    #[must_use]
    pub const fn state(&self) -> ClockState {
        self.clock.state()
    }

    /// The comparison, once both timelines have finished.
    #[must_use]
    pub const fn summary(&self) -> Option<&ComparisonSummary> {
        self.summary.as_ref()
    }

    /// Change the speed multiplier; non-positive or non-finite values
    /// fall back to 1.0. Applies from the next tick.
    pub fn set_speed(&mut self, speed: impl Into<SpeedFactor>) {
        let speed = speed.into();
        self.config.speed = speed;
        self.clock.set_speed(speed);
    }

    /// Start or resume playback at `now`.
    ///
    /// A finished session is reset first, so playing again replays from
    /// the beginning. Returns the token for the first tick, or `None` if
    /// playback was already running (the pending token stays valid).
    pub fn play(&mut self, now: Instant) -> Option<TickToken> {
        if self.clock.state() == ClockState::Finished {
            self.reset();
        }
        if !self.clock.start(now) {
            return None;
        }
        tracing::debug!(elapsed_ms = self.clock.elapsed_ms(), "playback started");
        Some(self.issue_token())
    }

    /// Halt playback and invalidate the pending tick.
    ///
    /// Returns `false` if playback was not running.
    pub fn pause(&mut self) -> bool {
        if !self.clock.pause() {
            return false;
        }
        self.generation += 1;
        tracing::debug!(elapsed_ms = self.clock.elapsed_ms(), "playback paused");
        true
    }

    /// Cancel the pending tick, zero the clock, and rebuild both frames
    /// from the existing orders. Idempotent.
    pub fn reset(&mut self) {
        self.generation += 1;
        self.clock.reset();
        self.summary = None;
        self.evaluate_frames(0.0);
    }

    /// Reset, then immediately start playing at `now`.
    pub fn reset_and_play(&mut self, now: Instant) -> TickToken {
        self.reset();
        self.clock.start(now);
        self.issue_token()
    }

    /// Run one scheduled tick at `now`.
    ///
    /// Advances the clock, re-evaluates both timelines at the new elapsed
    /// time, and reports whether to keep scheduling.
    pub fn tick(&mut self, token: TickToken, now: Instant) -> TickOutcome {
        if token.generation != self.generation || !self.clock.is_playing() {
            tracing::trace!(
                token = token.generation,
                current = self.generation,
                "ignoring stale tick"
            );
            return TickOutcome::Stale;
        }

        let elapsed = self.clock.tick(now);
        self.evaluate_frames(elapsed);
        tracing::trace!(
            elapsed_ms = elapsed,
            original = self.original_frame.traveled_distance,
            optimized = self.optimized_frame.traveled_distance,
            "tick"
        );

        if self.original_frame.finished && self.optimized_frame.finished {
            self.clock.finish();
            self.generation += 1;
            let summary = compare(
                self.original_frame.traveled_distance,
                self.optimized_frame.traveled_distance,
            );
            tracing::info!(
                elapsed_ms = elapsed,
                original = summary.original_distance,
                optimized = summary.optimized_distance,
                "playback finished"
            );
            self.summary = Some(summary);
            TickOutcome::Finished(summary)
        } else {
            TickOutcome::Continue(self.issue_token())
        }
    }

    fn issue_token(&mut self) -> TickToken {
        self.generation += 1;
        TickToken {
            generation: self.generation,
        }
    }

    fn evaluate_frames(&mut self, elapsed_ms: f64) {
        let segments = &self.document.segments;
        self.original_frame = evaluate(segments, &self.original, elapsed_ms, &self.config);
        self.optimized_frame = evaluate(segments, &self.optimized, elapsed_ms, &self.config);
    }
}
