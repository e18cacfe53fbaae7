//! Pen-up travel between consecutive entries of an [`Order`].
//!
//! A travel edge joins the previous entry's exit point to the current
//! entry's entry point. Edges are derived on demand and never stored.

use serde::{Deserialize, Serialize};

use crate::types::{Order, OrderEntry, Point, StrokeSegment};

/// The straight pen-up move leading into entry `to_index` of an order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TravelEdge {
    /// Index (within the order) of the entry being left.
    pub from_index: usize,
    /// Index (within the order) of the entry being entered.
    pub to_index: usize,
    /// Exit point of the previous entry.
    pub from: Point,
    /// Entry point of the next entry.
    pub to: Point,
    /// Euclidean length of the move.
    pub distance: f64,
}

/// Build the travel edge between two consecutive entries.
///
/// `segments` is indexed by segment id.
#[must_use]
pub fn edge_between(
    segments: &[StrokeSegment],
    from_index: usize,
    prev: OrderEntry,
    next: OrderEntry,
) -> TravelEdge {
    let from = segments[prev.segment_id].exit_point(prev.direction);
    let to = segments[next.segment_id].entry_point(next.direction);
    TravelEdge {
        from_index,
        to_index: from_index + 1,
        from,
        to,
        distance: from.distance(to),
    }
}

/// All travel edges of `order`, in playback order.
///
/// An order of `n` entries has `n - 1` edges (none when `n < 2`).
#[must_use]
pub fn travel_edges(segments: &[StrokeSegment], order: &Order) -> Vec<TravelEdge> {
    order
        .entries()
        .windows(2)
        .enumerate()
        .map(|(i, pair)| edge_between(segments, i, pair[0], pair[1]))
        .collect()
}

/// Sum of all travel edge distances of `order`.
///
/// Accumulates left to right, the same order the timeline walk uses, so
/// a finished timeline reports exactly this value.
#[must_use]
pub fn total_travel(segments: &[StrokeSegment], order: &Order) -> f64 {
    travel_edges(segments, order)
        .iter()
        .fold(0.0, |acc, edge| acc + edge.distance)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{line, three_segment_scenario};
    use crate::types::Direction;

    #[test]
    fn empty_and_single_orders_have_no_edges() {
        let segments = vec![line(0, (0.0, 0.0), (1.0, 0.0))];
        assert!(travel_edges(&segments, &Order::default()).is_empty());
        let single = Order::new(vec![OrderEntry::new(0, Direction::Forward)]);
        assert!(travel_edges(&segments, &single).is_empty());
        assert!(total_travel(&segments, &single).abs() < f64::EPSILON);
    }

    #[test]
    fn edge_uses_exit_and_entry_points() {
        let segments = vec![
            line(0, (0.0, 0.0), (10.0, 0.0)),
            line(1, (20.0, 0.0), (30.0, 0.0)),
        ];
        let order = Order::new(vec![
            OrderEntry::new(0, Direction::Reverse),
            OrderEntry::new(1, Direction::Reverse),
        ]);
        let edges = travel_edges(&segments, &order);
        assert_eq!(edges.len(), 1);
        assert_eq!(edges[0].from, Point::new(0.0, 0.0));
        assert_eq!(edges[0].to, Point::new(30.0, 0.0));
        assert!((edges[0].distance - 30.0).abs() < 1e-12);
        assert_eq!((edges[0].from_index, edges[0].to_index), (0, 1));
    }

    #[test]
    fn parse_order_scenario_total() {
        let segments = three_segment_scenario();
        let order = crate::sequence::original_order(&segments);
        let expected = 10.0 + 100.0_f64.hypot(70.0);
        approx::assert_relative_eq!(total_travel(&segments, &order), expected, epsilon = 1e-9);
    }
}
