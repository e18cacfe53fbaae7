//! Arc-length measurement and backward resampling of a single path.
//!
//! [`MeasuredPath`] answers "where is the pen after travelling `s` units
//! along this path", the same question a browser answers with
//! `getTotalLength` / `getPointAtLength`. Gaps between subpaths are not
//! part of the length.

use kurbo::{BezPath, ParamCurve, ParamCurveArclen, PathEl, PathSeg, Point};

/// One drawable piece of a path with its arc-length offset.
#[derive(Debug, Clone)]
struct Piece {
    seg: PathSeg,
    offset: f64,
    length: f64,
}

/// A path with precomputed per-segment arc lengths.
#[derive(Debug, Clone)]
pub struct MeasuredPath {
    pieces: Vec<Piece>,
    total: f64,
    /// Where a path with no drawable pieces sits (its first move-to).
    anchor: Point,
    accuracy: f64,
}

impl MeasuredPath {
    /// Measure every segment of `path` to within `accuracy` units.
    #[must_use]
    pub fn new(path: &BezPath, accuracy: f64) -> Self {
        let anchor = path
            .elements()
            .iter()
            .find_map(|el| match el {
                PathEl::MoveTo(p) => Some(*p),
                _ => None,
            })
            .unwrap_or(Point::ZERO);

        let mut pieces = Vec::new();
        let mut total = 0.0;
        for seg in path.segments() {
            let length = seg.arclen(accuracy);
            pieces.push(Piece {
                seg,
                offset: total,
                length,
            });
            total += length;
        }

        Self {
            pieces,
            total,
            anchor,
            accuracy,
        }
    }

    /// Total arc length.
    #[must_use]
    pub const fn length(&self) -> f64 {
        self.total
    }

    /// The point `s` units along the path, clamped to `0..=length`.
    #[must_use]
    pub fn point_at_length(&self, s: f64) -> Point {
        let s = s.clamp(0.0, self.total);
        let Some(first) = self.pieces.first() else {
            return self.anchor;
        };
        if s <= 0.0 {
            return first.seg.eval(0.0);
        }

        let piece = self
            .pieces
            .iter()
            .find(|p| p.length > 0.0 && s <= p.offset + p.length)
            .or_else(|| self.pieces.last())
            .unwrap_or(first);

        if piece.length <= 0.0 {
            return piece.seg.eval(1.0);
        }
        let local = (s - piece.offset).clamp(0.0, piece.length);
        let t = piece.seg.inv_arclen(local, self.accuracy);
        piece.seg.eval(t)
    }

    /// Sample the path backward at roughly `step`-unit intervals and join
    /// the samples into a polyline.
    ///
    /// Uses `n = ceil(length / step)` intervals (at least one), sampling
    /// at `length - j * length / n` for `j = 0..=n`. The result starts at
    /// the path's end point and finishes at its start point.
    #[must_use]
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    pub fn reversed(&self, step: f64) -> BezPath {
        let n = ((self.total / step).ceil() as usize).max(1);
        let interval = self.total / n as f64;

        let mut out = BezPath::new();
        out.move_to(self.point_at_length(self.total));
        for j in 1..=n {
            out.line_to(self.point_at_length((j as f64).mul_add(-interval, self.total)));
        }
        out
    }
}
