//! SVG document traversal via `usvg`.
//!
//! `usvg` normalizes the document: shapes become paths, `use` elements are
//! expanded, styles are resolved, and every path carries its absolute
//! transform. Invisible elements are dropped during normalization.
//!
//! Paths are reported in the document's user space (the `viewBox`
//! coordinates), not in the `width`/`height` viewport usvg renders into.

use std::borrow::Cow;

use kurbo::{Affine, BezPath, Rect};
use usvg::roxmltree;
use usvg::tiny_skia_path::PathSegment;

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// A path primitive in document coordinates, in parse order.
#[derive(Debug, Clone)]
pub struct SourcePath {
    /// The element id, if the document gave one.
    pub id: Option<String>,
    /// Geometry with the absolute transform applied.
    pub path: BezPath,
}

/// Parse `data` and return the user-space view rectangle and every path in
/// document order (depth-first).
///
/// The list reflects the normalized tree, not the raw markup: `rect`,
/// `circle`, `line` and the other basic shapes are converted to paths, `use`
/// references are expanded in place, and content under `defs`, `clipPath`,
/// `mask` or with `display="none"` is skipped. Positions in the list can
/// therefore differ from a count of the document's `<path>` elements.
///
/// # Errors
///
/// Returns the `usvg` parse error if `data` is not an SVG document.
pub fn parse_paths(data: &[u8]) -> Result<(Rect, Vec<SourcePath>), usvg::Error> {
    let data = if data.starts_with(&GZIP_MAGIC) {
        Cow::Owned(usvg::decompress_svgz(data)?)
    } else {
        Cow::Borrowed(data)
    };
    let text = std::str::from_utf8(&data).map_err(|_| usvg::Error::NotAnUtf8Str)?;
    let xml = roxmltree::Document::parse_with_options(
        text,
        roxmltree::ParsingOptions {
            allow_dtd: true,
            ..roxmltree::ParsingOptions::default()
        },
    )?;
    let tree = usvg::Tree::from_xmltree(&xml, &usvg::Options::default())?;

    let size = tree.size();
    let svg = xml.root_element();
    let (view, to_viewport) = user_space(
        svg.attribute("viewBox"),
        svg.attribute("preserveAspectRatio"),
        f64::from(size.width()),
        f64::from(size.height()),
    );
    let to_user = if to_viewport.determinant().abs() > f64::EPSILON {
        to_viewport.inverse()
    } else {
        Affine::IDENTITY
    };

    let mut paths = Vec::new();
    collect_paths(tree.root(), to_user, &mut paths);

    Ok((view, paths))
}

fn collect_paths(group: &usvg::Group, to_user: Affine, out: &mut Vec<SourcePath>) {
    for node in group.children() {
        match node {
            usvg::Node::Group(g) => collect_paths(g, to_user, out),
            usvg::Node::Path(p) => {
                let transform = to_user * to_affine(p.abs_transform());
                let path = transform * to_bez_path(p.data());
                let id = (!p.id().is_empty()).then(|| p.id().to_owned());
                out.push(SourcePath { id, path });
            }
            _ => {}
        }
    }
}

/// The user-space rectangle and the transform usvg applies to map it onto
/// the `width` x `height` viewport. Without a usable `viewBox` the user
/// space is the viewport itself.
fn user_space(
    view_box: Option<&str>,
    aspect: Option<&str>,
    width: f64,
    height: f64,
) -> (Rect, Affine) {
    let Some(rect) = view_box.and_then(parse_view_box) else {
        return (Rect::new(0.0, 0.0, width, height), Affine::IDENTITY);
    };

    let (mut sx, mut sy) = (width / rect.width(), height / rect.height());
    let (fx, fy) = match parse_aspect(aspect.unwrap_or_default()) {
        Some((fx, fy, slice)) => {
            let s = if slice { sx.max(sy) } else { sx.min(sy) };
            (sx, sy) = (s, s);
            (fx, fy)
        }
        None => (0.0, 0.0),
    };
    let tx = fx.mul_add(rect.width().mul_add(-sx, width), -rect.x0 * sx);
    let ty = fy.mul_add(rect.height().mul_add(-sy, height), -rect.y0 * sy);
    (rect, Affine::new([sx, 0.0, 0.0, sy, tx, ty]))
}

/// `min-x min-y width height`, separated by whitespace and/or commas.
fn parse_view_box(value: &str) -> Option<Rect> {
    let mut numbers = value
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|t| !t.is_empty())
        .map(str::parse::<f64>);
    let mut next = || numbers.next()?.ok();
    let (x, y, w, h) = (next()?, next()?, next()?, next()?);
    (w > 0.0 && h > 0.0).then(|| Rect::new(x, y, x + w, y + h))
}

/// `preserveAspectRatio` as alignment fractions plus the slice flag, or
/// `None` for `none` (non-uniform scaling).
fn parse_aspect(value: &str) -> Option<(f64, f64, bool)> {
    let mut tokens = value.split_whitespace().filter(|t| *t != "defer");
    let align = tokens.next().unwrap_or("xMidYMid");
    if align == "none" {
        return None;
    }
    let slice = tokens.next() == Some("slice");
    let fraction = |s: &str| match s {
        "Min" => 0.0,
        "Max" => 1.0,
        _ => 0.5,
    };
    let (fx, fy) = align
        .strip_prefix('x')
        .and_then(|rest| rest.split_once('Y'))
        .map_or((0.5, 0.5), |(x, y)| (fraction(x), fraction(y)));
    Some((fx, fy, slice))
}

/// Convert a `tiny-skia` path into a `kurbo` path.
fn to_bez_path(data: &usvg::tiny_skia_path::Path) -> BezPath {
    let mut path = BezPath::new();
    for segment in data.segments() {
        match segment {
            PathSegment::MoveTo(p) => path.move_to(pt(p)),
            PathSegment::LineTo(p) => path.line_to(pt(p)),
            PathSegment::QuadTo(c, p) => path.quad_to(pt(c), pt(p)),
            PathSegment::CubicTo(c1, c2, p) => path.curve_to(pt(c1), pt(c2), pt(p)),
            PathSegment::Close => path.close_path(),
        }
    }
    path
}

fn pt(p: usvg::tiny_skia_path::Point) -> kurbo::Point {
    kurbo::Point::new(f64::from(p.x), f64::from(p.y))
}

/// `tiny-skia` maps `x' = sx*x + kx*y + tx`, `y' = ky*x + sy*y + ty`.
fn to_affine(t: usvg::Transform) -> Affine {
    Affine::new([
        f64::from(t.sx),
        f64::from(t.ky),
        f64::from(t.kx),
        f64::from(t.sy),
        f64::from(t.tx),
        f64::from(t.ty),
    ])
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    #[test]
    fn paths_in_document_order_with_transforms() {
        let svg = br#"<svg xmlns="http://www.w3.org/2000/svg" width="100" height="50">
            <path id="a" d="M0 0 L10 0" stroke="black" fill="none"/>
            <g transform="translate(20 5)">
                <path d="M0 0 L0 10" stroke="black" fill="none"/>
            </g>
        </svg>"#;
        let (view, paths) = parse_paths(svg).unwrap();
        assert_eq!(view, Rect::new(0.0, 0.0, 100.0, 50.0));
        assert_eq!(paths.len(), 2);
        assert_eq!(paths[0].id.as_deref(), Some("a"));
        assert_eq!(paths[1].id, None);

        let bbox = kurbo::Shape::bounding_box(&paths[1].path);
        assert!((bbox.x0 - 20.0).abs() < 1e-6);
        assert!((bbox.y0 - 5.0).abs() < 1e-6);
        assert!((bbox.y1 - 15.0).abs() < 1e-6);
    }

    #[test]
    fn scaled_viewport_keeps_user_units() {
        let svg = br#"<svg xmlns="http://www.w3.org/2000/svg" width="327" height="327" viewBox="0 0 109 109">
            <path d="M10 10 L10 20" stroke="black" fill="none"/>
        </svg>"#;
        let (view, paths) = parse_paths(svg).unwrap();
        assert_eq!(view, Rect::new(0.0, 0.0, 109.0, 109.0));
        let bbox = kurbo::Shape::bounding_box(&paths[0].path);
        assert_abs_diff_eq!(bbox.x0, 10.0, epsilon = 1e-3);
        assert_abs_diff_eq!(bbox.y0, 10.0, epsilon = 1e-3);
        assert_abs_diff_eq!(bbox.y1, 20.0, epsilon = 1e-3);
    }

    #[test]
    fn offset_view_box_with_letterboxing() {
        // 20x10 user units into 100x100: meet scales by 5 and centres
        // vertically, leaving 25 px above and below.
        let (view, transform) = user_space(Some("10,20 20 10"), None, 100.0, 100.0);
        assert_eq!(view, Rect::new(10.0, 20.0, 30.0, 30.0));
        let p = transform * kurbo::Point::new(10.0, 20.0);
        assert_abs_diff_eq!(p.x, 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(p.y, 25.0, epsilon = 1e-9);

        let (_, stretched) = user_space(Some("0 0 20 10"), Some("none"), 100.0, 100.0);
        let q = stretched * kurbo::Point::new(20.0, 10.0);
        assert_abs_diff_eq!(q.x, 100.0, epsilon = 1e-9);
        assert_abs_diff_eq!(q.y, 100.0, epsilon = 1e-9);
    }

    #[test]
    fn unusable_view_box_falls_back_to_viewport() {
        let (view, transform) = user_space(Some("0 0 0 10"), None, 40.0, 30.0);
        assert_eq!(view, Rect::new(0.0, 0.0, 40.0, 30.0));
        assert_eq!(transform, Affine::IDENTITY);
        assert!(parse_view_box("1 2 three 4").is_none());
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(parse_paths(b"this is not an svg document").is_err());
    }
}
