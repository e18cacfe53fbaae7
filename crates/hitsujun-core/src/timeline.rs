//! Time-indexed playback evaluation.
//!
//! [`evaluate`] maps an order and a virtual elapsed time to the progress
//! of every stroke and connector. It is a pure function: the same inputs
//! always produce the same [`TimelineFrame`], so a timeline can be seeked,
//! resumed, or replayed by evaluating at any time value.
//!
//! The walk starts from the first entry on every call. For each entry it
//! first spends the pen-up travel time from the previous exit point
//! (`distance / travel_speed`), then the drawing time
//! (`length / stroke_speed`). The first phase the remaining budget cannot
//! cover is reported as partial and the walk stops.

use serde::{Deserialize, Serialize};

use crate::config::PlaybackConfig;
use crate::travel::edge_between;
use crate::types::{Direction, Order, StrokeSegment};

/// Reveal state of one order entry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EntryProgress {
    /// Segment drawn by this entry.
    pub segment_id: usize,
    /// Direction it is drawn in.
    pub direction: Direction,
    /// Progress of the connector leading into this entry, `0.0..=1.0`.
    ///
    /// `None` for the first entry, which has no incoming connector.
    pub travel: Option<f64>,
    /// Fraction of the stroke drawn, `0.0..=1.0`.
    pub draw: f64,
}

impl EntryProgress {
    /// Returns `true` once the stroke is completely drawn.
    #[must_use]
    pub fn is_drawn(&self) -> bool {
        self.draw >= 1.0
    }
}

/// Snapshot of one timeline at a given virtual time.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TimelineFrame {
    /// `true` once every entry is drawn.
    pub finished: bool,
    /// Pen-up distance covered so far, including a partial connector.
    pub traveled_distance: f64,
    /// Per-entry progress, parallel to the order's entries.
    pub entries: Vec<EntryProgress>,
}

impl TimelineFrame {
    /// Index of the entry currently travelling or drawing, if unfinished.
    #[must_use]
    pub fn active_index(&self) -> Option<usize> {
        if self.finished {
            return None;
        }
        self.entries.iter().position(|e| !e.is_drawn())
    }
}

/// Evaluate `order` at `elapsed_ms` virtual milliseconds.
///
/// `segments` is indexed by segment id. Negative elapsed values behave
/// like zero. An empty order is finished at every time, with zero
/// distance.
#[must_use]
pub fn evaluate(
    segments: &[StrokeSegment],
    order: &Order,
    elapsed_ms: f64,
    config: &PlaybackConfig,
) -> TimelineFrame {
    let mut entries: Vec<EntryProgress> = order
        .iter()
        .enumerate()
        .map(|(i, entry)| EntryProgress {
            segment_id: entry.segment_id,
            direction: entry.direction,
            travel: (i > 0).then_some(0.0),
            draw: 0.0,
        })
        .collect();

    let mut budget = elapsed_ms.max(0.0);
    let mut traveled = 0.0;
    let order_entries = order.entries();

    for i in 0..order_entries.len() {
        if i > 0 {
            let edge = edge_between(segments, i - 1, order_entries[i - 1], order_entries[i]);
            let travel_time = edge.distance / config.travel_speed;
            if budget < travel_time {
                let progress = budget / travel_time;
                entries[i].travel = Some(progress);
                traveled += edge.distance * progress;
                return TimelineFrame {
                    finished: false,
                    traveled_distance: traveled,
                    entries,
                };
            }
            budget -= travel_time;
            traveled += edge.distance;
            entries[i].travel = Some(1.0);
        }

        let draw_time = segments[order_entries[i].segment_id].length / config.stroke_speed;
        if budget < draw_time {
            entries[i].draw = budget / draw_time;
            return TimelineFrame {
                finished: false,
                traveled_distance: traveled,
                entries,
            };
        }
        budget -= draw_time;
        entries[i].draw = 1.0;
    }

    TimelineFrame {
        finished: true,
        traveled_distance: traveled,
        entries,
    }
}

/// Virtual milliseconds needed to play `order` to completion.
#[must_use]
pub fn total_duration(segments: &[StrokeSegment], order: &Order, config: &PlaybackConfig) -> f64 {
    let entries = order.entries();
    let drawing: f64 = entries
        .iter()
        .map(|e| segments[e.segment_id].length / config.stroke_speed)
        .sum();
    let travelling: f64 = entries
        .windows(2)
        .enumerate()
        .map(|(i, pair)| edge_between(segments, i, pair[0], pair[1]).distance / config.travel_speed)
        .sum();
    drawing + travelling
}
