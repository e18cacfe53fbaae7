//! hitsujun-core: stroke ordering and playback evaluation (sans-IO).
//!
//! Given the measured segments of a vector drawing, this crate:
//!
//! 1. builds the parse-order sequence and a travel-minimizing sequence
//!    ([`sequence`]),
//! 2. evaluates either sequence at any virtual time into per-stroke and
//!    per-connector progress ([`timeline`]),
//! 3. accumulates virtual time from wall-clock ticks with pause and speed
//!    control ([`clock`]),
//! 4. compares the finished travel distances ([`stats`]).
//!
//! [`PlaybackSession`] ties these together for a host scheduler.
//!
//! This crate has **no I/O dependencies**. Parsing documents lives in
//! `hitsujun-extract`; drawing frames lives in `hitsujun-export`.

pub mod clock;
pub mod config;
pub mod sequence;
pub mod session;
pub mod stats;
pub mod timeline;
pub mod travel;
pub mod types;

#[cfg(test)]
mod fixtures;

pub use clock::{AnimationClock, ClockState, SpeedFactor};
pub use config::{ConfigError, PlaybackConfig};
pub use sequence::{original_order, sequence};
pub use session::{PlaybackSession, TickOutcome, TickToken, Track};
pub use stats::{ComparisonSummary, Reduction, compare};
pub use timeline::{EntryProgress, TimelineFrame, evaluate, total_duration};
pub use travel::{TravelEdge, total_travel, travel_edges};
pub use types::{Direction, Order, OrderEntry, Point, StrokeDocument, StrokeSegment, ViewBox};

/// Re-export `kurbo` so downstream crates share the geometry types.
pub use kurbo;

/// Re-export the wall-clock instant type every clock operation takes.
pub use web_time::Instant;
