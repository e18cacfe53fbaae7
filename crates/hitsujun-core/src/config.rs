//! Playback configuration.

use serde::{Deserialize, Serialize};

use crate::clock::SpeedFactor;

/// Errors raised by [`PlaybackConfig::validate`].
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    /// A pen speed is zero, negative, or not finite.
    #[error("{field} must be a finite positive number, got {value}")]
    NonPositiveSpeed {
        /// Name of the offending field.
        field: &'static str,
        /// The rejected value.
        value: f64,
    },
}

/// Pen speeds and the user speed multiplier.
///
/// Pen speeds are in document units per virtual millisecond. At the
/// defaults a 100-unit stroke takes one virtual second to draw.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackConfig {
    /// Drawing speed while the pen is down.
    pub stroke_speed: f64,
    /// Travel speed while the pen is up.
    pub travel_speed: f64,
    /// User multiplier applied to wall-clock time.
    pub speed: SpeedFactor,
}

impl PlaybackConfig {
    /// Default drawing speed (units per ms).
    pub const DEFAULT_STROKE_SPEED: f64 = 0.1;
    /// Default pen-up travel speed (units per ms).
    pub const DEFAULT_TRAVEL_SPEED: f64 = 0.1;

    /// Check that both pen speeds are usable divisors.
    ///
    /// The user multiplier is never rejected; it is coerced on construction.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NonPositiveSpeed`] naming the first bad field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("stroke_speed", self.stroke_speed),
            ("travel_speed", self.travel_speed),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::NonPositiveSpeed { field, value });
            }
        }
        Ok(())
    }
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            stroke_speed: Self::DEFAULT_STROKE_SPEED,
            travel_speed: Self::DEFAULT_TRAVEL_SPEED,
            speed: SpeedFactor::DEFAULT,
        }
    }
}
