//! Stroke sequencing: choose a visiting order and direction for every
//! segment so the total pen-up travel is small.
//!
//! Uses a multi-start nearest-neighbor greedy heuristic over
//! direction-augmented nodes. Every `(segment, direction)` pair is tried as
//! the starting entry (2N starts); from each start, the tour repeatedly
//! appends the unvisited `(segment, direction)` whose entry point is closest
//! to the current exit point. The shortest of the 2N tours wins.
//!
//! Ties are broken by scan order: candidates are scanned in ascending id,
//! `Forward` before `Reverse`, and a candidate replaces the current best
//! only when strictly closer. The same strict rule selects between tours,
//! so the earliest start wins a tie. The output is fully deterministic.
//!
//! Cost is O(N³): 2N starts × N steps × N candidates per step.

use crate::types::{Direction, Order, OrderEntry, Point, StrokeSegment};

/// The parse-order sequence: every segment forward, by ascending id.
#[must_use = "returns the parse-order sequence"]
pub fn original_order(segments: &[StrokeSegment]) -> Order {
    Order::new(
        (0..segments.len())
            .map(|id| OrderEntry::new(id, Direction::Forward))
            .collect(),
    )
}

/// Compute a travel-minimizing order over `segments`.
///
/// `segments` is indexed by id. Never fails: an empty slice yields an empty
/// order and a single segment yields one forward entry.
#[must_use = "returns the optimized stroke order"]
#[tracing::instrument(skip_all, fields(segments = segments.len()))]
pub fn sequence(segments: &[StrokeSegment]) -> Order {
    let mut best: Option<(f64, Vec<OrderEntry>)> = None;

    for start_id in 0..segments.len() {
        for start_direction in Direction::ALL {
            let (total, tour) = greedy_tour(segments, OrderEntry::new(start_id, start_direction));
            let improves = best
                .as_ref()
                .is_none_or(|(best_total, _)| total < *best_total);
            if improves {
                best = Some((total, tour));
            }
        }
    }

    match best {
        Some((total, tour)) => {
            tracing::debug!(total_travel = total, "selected best greedy tour");
            Order::new(tour)
        }
        None => Order::default(),
    }
}

/// Roll out one greedy tour from `start`, returning its travel total and
/// the visited entries.
fn greedy_tour(segments: &[StrokeSegment], start: OrderEntry) -> (f64, Vec<OrderEntry>) {
    let n = segments.len();
    let mut visited = vec![false; n];
    let mut tour = Vec::with_capacity(n);
    let mut total = 0.0;

    visited[start.segment_id] = true;
    tour.push(start);
    let mut exit = segments[start.segment_id].exit_point(start.direction);

    for _ in 1..n {
        // At least one segment is unvisited on every iteration, so a
        // candidate is always found; `break` keeps this total without
        // panicking.
        let Some((next, distance)) = nearest_entry(segments, &visited, exit) else {
            break;
        };

        visited[next.segment_id] = true;
        tour.push(next);
        total += distance;
        exit = segments[next.segment_id].exit_point(next.direction);
    }

    (total, tour)
}

/// Find the unvisited `(segment, direction)` whose entry point is nearest
/// to `exit`, keeping the first candidate found on ties.
fn nearest_entry(
    segments: &[StrokeSegment],
    visited: &[bool],
    exit: Point,
) -> Option<(OrderEntry, f64)> {
    let mut best: Option<OrderEntry> = None;
    let mut best_dist = f64::INFINITY;

    for (id, segment) in segments.iter().enumerate() {
        if visited[id] {
            continue;
        }
        for direction in Direction::ALL {
            let dist = exit.distance(segment.entry_point(direction));
            if dist < best_dist {
                best_dist = dist;
                best = Some(OrderEntry::new(id, direction));
            }
        }
    }

    best.map(|entry| (entry, best_dist))
}
