//! Shared types for the hitsujun stroke model.

use kurbo::BezPath;
use serde::{Deserialize, Serialize};

/// A 2D point in document coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal position (user units from the left edge).
    pub x: f64,
    /// Vertical position (user units from the top edge).
    pub y: f64,
}

impl Point {
    /// Create a new point.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Squared Euclidean distance to another point.
    ///
    /// Avoids the square root for comparison purposes.
    #[must_use]
    pub fn distance_squared(self, other: Self) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx.mul_add(dx, dy * dy)
    }

    /// Euclidean distance to another point.
    #[must_use]
    pub fn distance(self, other: Self) -> f64 {
        self.distance_squared(other).sqrt()
    }

    /// Linear interpolation towards `other`; `t = 0` is `self`, `t = 1` is `other`.
    #[must_use]
    pub fn lerp(self, other: Self, t: f64) -> Self {
        Self::new(
            (other.x - self.x).mul_add(t, self.x),
            (other.y - self.y).mul_add(t, self.y),
        )
    }
}

impl From<kurbo::Point> for Point {
    fn from(p: kurbo::Point) -> Self {
        Self::new(p.x, p.y)
    }
}

impl From<Point> for kurbo::Point {
    fn from(p: Point) -> Self {
        Self::new(p.x, p.y)
    }
}

/// Traversal direction of a segment within an [`Order`].
///
/// Variants are declared in scan order: the sequencer tries `Forward`
/// before `Reverse` for every candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Traced start → end along the original geometry.
    #[default]
    Forward,
    /// Traced end → start along the resampled reverse geometry.
    Reverse,
}

impl Direction {
    /// Both directions, in the order the sequencer scans them.
    pub const ALL: [Self; 2] = [Self::Forward, Self::Reverse];

    /// Returns `true` for [`Direction::Reverse`].
    #[must_use]
    pub const fn is_reverse(self) -> bool {
        matches!(self, Self::Reverse)
    }
}

/// Immutable geometry facts for one curve primitive.
///
/// Produced once by the geometry extractor and never mutated. The
/// `reverse` geometry traces the same path with its endpoints swapped
/// (within sampling tolerance).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrokeSegment {
    /// Stable id: the primitive's index in document parse order.
    pub id: usize,
    /// Total arc length (`>= 0`).
    pub length: f64,
    /// Point at arc length 0.
    pub start: Point,
    /// Point at the total arc length.
    pub end: Point,
    /// The curve as it appears in the document.
    pub forward: BezPath,
    /// Piecewise-linear resampling of the curve traced backward.
    pub reverse: BezPath,
}

impl StrokeSegment {
    /// Where the pen lands when this segment is entered in `direction`.
    #[must_use]
    pub const fn entry_point(&self, direction: Direction) -> Point {
        match direction {
            Direction::Forward => self.start,
            Direction::Reverse => self.end,
        }
    }

    /// Where the pen lifts when this segment is left in `direction`.
    #[must_use]
    pub const fn exit_point(&self, direction: Direction) -> Point {
        match direction {
            Direction::Forward => self.end,
            Direction::Reverse => self.start,
        }
    }

    /// The geometry drawn when the segment plays in `direction`.
    #[must_use]
    pub const fn geometry(&self, direction: Direction) -> &BezPath {
        match direction {
            Direction::Forward => &self.forward,
            Direction::Reverse => &self.reverse,
        }
    }
}

/// One step of an [`Order`]: which segment to draw and in which direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OrderEntry {
    /// Id of the segment (its index in the document's segment list).
    pub segment_id: usize,
    /// Traversal direction.
    pub direction: Direction,
}

impl OrderEntry {
    /// Create a new entry.
    #[must_use]
    pub const fn new(segment_id: usize, direction: Direction) -> Self {
        Self {
            segment_id,
            direction,
        }
    }
}

/// A full visiting sequence over a document's segments.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Order(Vec<OrderEntry>);

impl Order {
    /// Create an order from its entries.
    #[must_use]
    pub const fn new(entries: Vec<OrderEntry>) -> Self {
        Self(entries)
    }

    /// Returns `true` if the order has no entries.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of entries.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns a slice of all entries.
    #[must_use]
    pub fn entries(&self) -> &[OrderEntry] {
        &self.0
    }

    /// Iterate over entries in playback order.
    pub fn iter(&self) -> std::slice::Iter<'_, OrderEntry> {
        self.0.iter()
    }

    /// Returns `true` if every id in `0..n` appears exactly once.
    #[must_use]
    pub fn is_permutation_of(&self, n: usize) -> bool {
        if self.0.len() != n {
            return false;
        }
        let mut seen = vec![false; n];
        for entry in &self.0 {
            match seen.get_mut(entry.segment_id) {
                Some(slot) if !*slot => *slot = true,
                _ => return false,
            }
        }
        true
    }
}

impl<'a> IntoIterator for &'a Order {
    type Item = &'a OrderEntry;
    type IntoIter = std::slice::Iter<'a, OrderEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// The visible area of the source document in user units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewBox {
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    /// Width.
    pub width: f64,
    /// Height.
    pub height: f64,
}

impl Default for ViewBox {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            width: 100.0,
            height: 100.0,
        }
    }
}

/// Every measured segment of a loaded document, in parse order.
///
/// `segments[i].id == i` for all `i`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StrokeDocument {
    /// Coordinate space the segments live in.
    pub view_box: ViewBox,
    /// Measured segments, indexed by id.
    pub segments: Vec<StrokeSegment>,
}

impl StrokeDocument {
    /// Create a document, renumbering segment ids to match their position.
    #[must_use]
    pub fn new(view_box: ViewBox, mut segments: Vec<StrokeSegment>) -> Self {
        for (i, segment) in segments.iter_mut().enumerate() {
            segment.id = i;
        }
        Self { view_box, segments }
    }

    /// Returns `true` if the document has no segments.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::fixtures::line;

    #[test]
    fn point_distance() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(3.0, 4.0);
        assert!((a.distance_squared(b) - 25.0).abs() < f64::EPSILON);
        assert!((a.distance(b) - 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn point_lerp_endpoints_and_midpoint() {
        let a = Point::new(0.0, 10.0);
        let b = Point::new(10.0, 30.0);
        assert_eq!(a.lerp(b, 0.0), a);
        assert_eq!(a.lerp(b, 1.0), b);
        assert_eq!(a.lerp(b, 0.5), Point::new(5.0, 20.0));
    }

    #[test]
    fn entry_and_exit_follow_direction() {
        let s = line(0, (1.0, 2.0), (3.0, 4.0));
        assert_eq!(s.entry_point(Direction::Forward), s.start);
        assert_eq!(s.exit_point(Direction::Forward), s.end);
        assert_eq!(s.entry_point(Direction::Reverse), s.end);
        assert_eq!(s.exit_point(Direction::Reverse), s.start);
        assert_eq!(s.geometry(Direction::Reverse), &s.reverse);
    }

    #[test]
    fn permutation_check() {
        let order = Order::new(vec![
            OrderEntry::new(1, Direction::Forward),
            OrderEntry::new(0, Direction::Reverse),
        ]);
        assert!(order.is_permutation_of(2));
        assert!(!order.is_permutation_of(3));

        let duplicate = Order::new(vec![
            OrderEntry::new(0, Direction::Forward),
            OrderEntry::new(0, Direction::Reverse),
        ]);
        assert!(!duplicate.is_permutation_of(2));

        let out_of_range = Order::new(vec![OrderEntry::new(5, Direction::Forward)]);
        assert!(!out_of_range.is_permutation_of(1));
    }

    #[test]
    fn document_renumbers_ids() {
        let doc = StrokeDocument::new(
            ViewBox::default(),
            vec![
                line(7, (0.0, 0.0), (1.0, 0.0)),
                line(7, (0.0, 1.0), (1.0, 1.0)),
            ],
        );
        assert_eq!(doc.segments[0].id, 0);
        assert_eq!(doc.segments[1].id, 1);
    }

    #[test]
    fn direction_serializes_lowercase() {
        let json = serde_json::to_string(&Direction::Reverse).unwrap();
        assert_eq!(json, "\"reverse\"");
    }
}
