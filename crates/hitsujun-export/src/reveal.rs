//! Partial geometry for progressively revealed strokes and connectors.

use hitsujun_core::{Point, TravelEdge};
use kurbo::{BezPath, ParamCurve, ParamCurveArclen, PathSeg};

/// The leading `fraction` (by arc length) of `path`.
///
/// `fraction <= 0` yields an empty path and `fraction >= 1` the whole
/// path. Subpath breaks inside the kept portion are preserved.
#[must_use]
pub fn trim(path: &BezPath, fraction: f64, accuracy: f64) -> BezPath {
    if fraction >= 1.0 {
        return path.clone();
    }
    let mut out = BezPath::new();
    if fraction <= 0.0 {
        return out;
    }

    let total: f64 = path.segments().map(|seg| seg.arclen(accuracy)).sum();
    let mut remaining = total * fraction;
    let mut pen: Option<kurbo::Point> = None;

    for seg in path.segments() {
        let start = seg.start();
        if pen != Some(start) {
            out.move_to(start);
        }
        let length = seg.arclen(accuracy);
        if remaining >= length {
            push_segment(&mut out, seg);
            remaining -= length;
            pen = Some(seg.end());
        } else {
            let t = seg.inv_arclen(remaining, accuracy);
            push_segment(&mut out, seg.subsegment(0.0..t));
            break;
        }
    }
    out
}

fn push_segment(out: &mut BezPath, seg: PathSeg) {
    match seg {
        PathSeg::Line(l) => out.line_to(l.p1),
        PathSeg::Quad(q) => out.quad_to(q.p1, q.p2),
        PathSeg::Cubic(c) => out.curve_to(c.p1, c.p2, c.p3),
    }
}

/// Where the pen is along `edge` at travel `progress` (`0.0..=1.0`).
#[must_use]
pub fn connector_tip(edge: &TravelEdge, progress: f64) -> Point {
    edge.from.lerp(edge.to, progress.clamp(0.0, 1.0))
}

#[cfg(test)]
mod tests {
    use kurbo::Shape;

    use super::*;

    fn l_shape() -> BezPath {
        let mut path = BezPath::new();
        path.move_to((0.0, 0.0));
        path.line_to((10.0, 0.0));
        path.line_to((10.0, 10.0));
        path
    }

    #[test]
    fn trim_extremes() {
        let path = l_shape();
        assert!(trim(&path, 0.0, 1e-6).elements().is_empty());
        assert_eq!(trim(&path, 1.0, 1e-6), path);
    }

    #[test]
    fn trim_three_quarters_ends_midway_down() {
        let trimmed = trim(&l_shape(), 0.75, 1e-6);
        let bbox = trimmed.bounding_box();
        assert!((bbox.x1 - 10.0).abs() < 1e-6);
        assert!((bbox.y1 - 5.0).abs() < 1e-6);
    }

    #[test]
    fn trim_quarter_stays_on_first_leg() {
        let trimmed = trim(&l_shape(), 0.25, 1e-6);
        let bbox = trimmed.bounding_box();
        assert!((bbox.x1 - 5.0).abs() < 1e-6);
        assert!(bbox.y1.abs() < 1e-6);
    }

    #[test]
    fn connector_tip_interpolates() {
        let edge = TravelEdge {
            from_index: 0,
            to_index: 1,
            from: Point::new(0.0, 0.0),
            to: Point::new(10.0, 20.0),
            distance: 500.0_f64.sqrt(),
        };
        assert_eq!(connector_tip(&edge, 0.5), Point::new(5.0, 10.0));
        assert_eq!(connector_tip(&edge, 2.0), Point::new(10.0, 20.0));
    }
}
