//! Test-only segment builders shared by the unit tests.

use kurbo::BezPath;

use crate::types::{Point, StrokeSegment};

/// A straight segment from `start` to `end`.
pub fn line(id: usize, start: (f64, f64), end: (f64, f64)) -> StrokeSegment {
    let start = Point::new(start.0, start.1);
    let end = Point::new(end.0, end.1);
    line_with_length(id, start, end, start.distance(end))
}

/// A segment with the given endpoints and an arbitrary reported length.
pub fn line_with_length(id: usize, start: Point, end: Point, length: f64) -> StrokeSegment {
    let mut forward = BezPath::new();
    forward.move_to(kurbo::Point::from(start));
    forward.line_to(kurbo::Point::from(end));
    let mut reverse = BezPath::new();
    reverse.move_to(kurbo::Point::from(end));
    reverse.line_to(kurbo::Point::from(start));
    StrokeSegment {
        id,
        length,
        start,
        end,
        forward,
        reverse,
    }
}

/// Three vertical strokes of length 10: two stacked near the origin, one
/// far away at (100, 100).
pub fn three_segment_scenario() -> Vec<StrokeSegment> {
    vec![
        line(0, (0.0, 0.0), (0.0, 10.0)),
        line(1, (0.0, 20.0), (0.0, 30.0)),
        line(2, (100.0, 100.0), (100.0, 110.0)),
    ]
}
