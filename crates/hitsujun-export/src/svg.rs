//! SVG frame serializer.
//!
//! Builds the document with the [`svg`] crate. Every pane has two layers:
//! pen-up connectors underneath, strokes on top. A stroke is revealed by
//! setting `stroke-dasharray` to its length and `stroke-dashoffset` to
//! `length * (1 - draw)`, so one dash slides into view as `draw` grows.
//! Reverse entries draw the resampled reverse geometry, which makes the
//! dash grow from the segment's end point.
//!
//! Under each pane a caption band shows the pane title and the live pen-up
//! distance.

use svg::Document;
use svg::node::element::{Description, Element, Group, Line, Path, Rectangle, Title};
use svg::node::{Node, Text};

use hitsujun_core::{ComparisonSummary, StrokeDocument, ViewBox, travel_edges};

use crate::reveal::connector_tip;
use crate::{FrameStyle, PANE_GAP_RATIO, Pane};

/// Caption band height as a fraction of the view box height.
const CAPTION_RATIO: f64 = 0.18;

/// Optional `<title>` and `<desc>` for the emitted document.
///
/// Text values are XML-escaped by the `svg` crate.
#[derive(Debug, Clone, Default)]
pub struct SvgMetadata<'a> {
    /// Emitted as `<title>`, typically the source file stem.
    pub title: Option<&'a str>,
    /// Emitted as `<desc>`.
    pub description: Option<&'a str>,
}

/// Render one timeline at its current progress.
///
/// # Examples
///
/// ```
/// use hitsujun_core::{PlaybackConfig, StrokeDocument, ViewBox, evaluate, original_order};
/// use hitsujun_export::{FrameStyle, Pane, SvgMetadata, frame_to_svg};
///
/// let document = StrokeDocument::new(ViewBox::default(), Vec::new());
/// let order = original_order(&document.segments);
/// let frame = evaluate(&document.segments, &order, 0.0, &PlaybackConfig::default());
/// let pane = Pane { title: "original", order: &order, frame: &frame };
/// let svg = frame_to_svg(&document, pane, &FrameStyle::default(), &SvgMetadata::default());
/// assert!(svg.starts_with("<?xml"));
/// assert!(svg.contains("travel: 0px"));
/// ```
#[must_use]
pub fn frame_to_svg(
    document: &StrokeDocument,
    pane: Pane<'_>,
    style: &FrameStyle,
    metadata: &SvgMetadata<'_>,
) -> String {
    let label = distance_label(pane.frame.traveled_distance);
    let doc = document_shell(document.view_box, 1, style, metadata)
        .add(pane_group(document, pane, &label, 0.0, style));
    finish(&doc)
}

/// Render the parse-order and optimized timelines side by side.
///
/// When `summary` is given (both timelines finished), the optimized pane's
/// distance label shows the comparison, e.g. `travel: 82px (-56px, -41%)`.
#[must_use]
pub fn comparison_to_svg(
    document: &StrokeDocument,
    original: Pane<'_>,
    optimized: Pane<'_>,
    summary: Option<&ComparisonSummary>,
    style: &FrameStyle,
    metadata: &SvgMetadata<'_>,
) -> String {
    let view_box = document.view_box;
    let offset = view_box.width * (1.0 + PANE_GAP_RATIO);

    let original_label = distance_label(original.frame.traveled_distance);
    let optimized_label = summary.map_or_else(
        || distance_label(optimized.frame.traveled_distance),
        |summary| format!("travel: {summary}"),
    );

    let doc = document_shell(view_box, 2, style, metadata)
        .add(pane_group(document, original, &original_label, 0.0, style))
        .add(pane_group(
            document,
            optimized,
            &optimized_label,
            offset,
            style,
        ));
    finish(&doc)
}

fn distance_label(distance: f64) -> String {
    format!("travel: {:.0}px", distance.round())
}

/// The `<svg>` root sized for `panes` panes plus their caption bands.
#[allow(clippy::cast_precision_loss)]
fn document_shell(
    view_box: ViewBox,
    panes: usize,
    style: &FrameStyle,
    metadata: &SvgMetadata<'_>,
) -> Document {
    let n = panes.max(1) as f64;
    let width = view_box.width.mul_add(n, view_box.width * PANE_GAP_RATIO * (n - 1.0));
    let height = view_box.height * (1.0 + CAPTION_RATIO);

    let mut doc = Document::new()
        .set("width", width)
        .set("height", height)
        .set(
            "viewBox",
            format!("{} {} {width} {height}", view_box.x, view_box.y),
        );

    if let Some(title) = metadata.title {
        doc = doc.add(Title::new(title));
    }
    if let Some(description) = metadata.description {
        doc = doc.add(Description::new().add(Text::new(description)));
    }
    if let Some(background) = &style.background {
        doc = doc.add(
            Rectangle::new()
                .set("x", view_box.x)
                .set("y", view_box.y)
                .set("width", width)
                .set("height", height)
                .set("fill", background.as_str()),
        );
    }
    doc
}

/// Connectors, strokes, and caption of one pane, shifted right by `offset_x`.
fn pane_group(
    document: &StrokeDocument,
    pane: Pane<'_>,
    label: &str,
    offset_x: f64,
    style: &FrameStyle,
) -> Group {
    let segments = &document.segments;
    let view_box = document.view_box;

    let mut connectors = Group::new()
        .set("class", "connectors")
        .set("fill", "none")
        .set("stroke", style.connector_color.as_str())
        .set("stroke-width", style.connector_width)
        .set("stroke-dasharray", style.connector_dash);
    let mut strokes = Group::new()
        .set("class", "strokes")
        .set("fill", "none")
        .set("stroke", style.stroke_color.as_str())
        .set("stroke-width", style.stroke_width)
        .set("stroke-linecap", "round")
        .set("stroke-linejoin", "round");

    let edges = travel_edges(segments, pane.order);

    for (i, (entry, progress)) in pane.order.iter().zip(&pane.frame.entries).enumerate() {
        if let Some(travel) = progress.travel
            && travel > 0.0
            && let Some(edge) = i.checked_sub(1).and_then(|j| edges.get(j))
        {
            let tip = connector_tip(edge, travel);
            connectors = connectors.add(
                Line::new()
                    .set("x1", edge.from.x)
                    .set("y1", edge.from.y)
                    .set("x2", tip.x)
                    .set("y2", tip.y),
            );
        }

        if progress.draw <= 0.0 {
            continue;
        }
        let Some(segment) = segments.get(entry.segment_id) else {
            continue;
        };
        let mut path = Path::new()
            .set("d", segment.geometry(entry.direction).to_svg())
            .set("data-segment", segment.id.to_string());
        if segment.length > 0.0 {
            let length = segment.length;
            path = path
                .set("stroke-dasharray", format!("{length} {length}"))
                .set("stroke-dashoffset", length * (1.0 - progress.draw.min(1.0)));
        }
        strokes = strokes.add(path);
    }

    let caption = view_box.height * CAPTION_RATIO;
    let font_size = caption * 0.36;
    let text_x = view_box.x + caption * 0.1;
    let captions = Group::new()
        .set("class", "caption")
        .set("font-family", "sans-serif")
        .set("font-size", font_size)
        .set("fill", style.stroke_color.as_str())
        .add(text_element(text_x, view_box.y + view_box.height + caption * 0.42, pane.title))
        .add(text_element(text_x, view_box.y + view_box.height + caption * 0.88, label));

    let mut group = Group::new().add(connectors).add(strokes).add(captions);
    if offset_x != 0.0 {
        group = group.set("transform", format!("translate({offset_x} 0)"));
    }
    group
}

fn text_element(x: f64, y: f64, content: &str) -> Element {
    let mut text = Element::new("text");
    text.assign("x", x);
    text.assign("y", y);
    text.append(Text::new(content));
    text
}

fn finish(doc: &Document) -> String {
    // The svg crate omits the XML declaration, so we prepend it.
    format!("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n{doc}\n")
}

#[cfg(test)]
mod tests {
    use hitsujun_core::kurbo::BezPath;
    use hitsujun_core::{
        Direction, Order, OrderEntry, PlaybackConfig, Point, StrokeSegment, compare, evaluate,
        original_order,
    };

    use super::*;

    fn line(id: usize, start: (f64, f64), end: (f64, f64)) -> StrokeSegment {
        let mut forward = BezPath::new();
        forward.move_to(start);
        forward.line_to(end);
        let mut reverse = BezPath::new();
        reverse.move_to(end);
        reverse.line_to(start);
        let start = Point::new(start.0, start.1);
        let end = Point::new(end.0, end.1);
        StrokeSegment {
            id,
            length: start.distance(end),
            start,
            end,
            forward,
            reverse,
        }
    }

    fn document() -> StrokeDocument {
        StrokeDocument::new(
            ViewBox::default(),
            vec![
                line(0, (0.0, 0.0), (0.0, 10.0)),
                line(1, (0.0, 20.0), (0.0, 30.0)),
                line(2, (100.0, 100.0), (100.0, 110.0)),
            ],
        )
    }

    fn render(document: &StrokeDocument, order: &Order, elapsed_ms: f64) -> String {
        let frame = evaluate(&document.segments, order, elapsed_ms, &PlaybackConfig::default());
        let pane = Pane {
            title: "original",
            order,
            frame: &frame,
        };
        frame_to_svg(document, pane, &FrameStyle::default(), &SvgMetadata::default())
    }

    #[test]
    fn nothing_drawn_at_time_zero() {
        let document = document();
        let svg = render(&document, &original_order(&document.segments), 0.0);
        // The first stroke has no connector and starts at draw 0: skipped.
        assert!(!svg.contains("data-segment"));
        assert!(!svg.contains("<line"));
    }

    #[test]
    fn partial_stroke_uses_dash_offset() {
        let document = document();
        // 50 ms at 0.1 units/ms = 5 of 10 units drawn.
        let svg = render(&document, &original_order(&document.segments), 50.0);
        assert!(svg.contains(r#"stroke-dasharray="10 10""#), "{svg}");
        assert!(svg.contains(r#"stroke-dashoffset="5""#), "{svg}");
    }

    #[test]
    fn connector_drawn_to_travel_progress() {
        let document = document();
        // S0 done at 100 ms, then half of the 10-unit gap at 150 ms.
        let svg = render(&document, &original_order(&document.segments), 150.0);
        assert_eq!(svg.matches("<line").count(), 1);
        assert!(svg.contains(r#"y1="10""#));
        assert!(svg.contains(r#"y2="15""#));
        assert!(svg.contains("travel: 5px"));
    }

    #[test]
    fn finished_frame_has_every_stroke_and_connector() {
        let document = document();
        let svg = render(&document, &original_order(&document.segments), 1e9);
        assert_eq!(svg.matches("data-segment").count(), 3);
        assert_eq!(svg.matches("<line").count(), 2);
        assert_eq!(svg.matches(r#"stroke-dashoffset="0""#).count(), 3);
    }

    #[test]
    fn reverse_entry_draws_reverse_geometry() {
        let document = document();
        let order = Order::new(vec![OrderEntry::new(0, Direction::Reverse)]);
        let svg = render(&document, &order, 1e9);
        assert!(svg.contains(r#"d="M0,10 L0,0""#) || svg.contains(r#"d="M0 10L0 0""#), "{svg}");
    }

    #[test]
    fn metadata_and_background() {
        let document = document();
        let order = original_order(&document.segments);
        let frame = evaluate(&document.segments, &order, 0.0, &PlaybackConfig::default());
        let pane = Pane {
            title: "original",
            order: &order,
            frame: &frame,
        };
        let metadata = SvgMetadata {
            title: Some("ki & co"),
            description: Some("stroke order"),
        };
        let svg = frame_to_svg(&document, pane, &FrameStyle::default(), &metadata);
        assert!(svg.contains("<title>ki &amp; co</title>"));
        assert!(svg.contains("<desc>stroke order</desc>"));
        assert!(svg.contains("<rect"));

        let transparent = FrameStyle {
            background: None,
            ..FrameStyle::default()
        };
        let svg = frame_to_svg(&document, pane, &transparent, &SvgMetadata::default());
        assert!(!svg.contains("<rect"));
    }

    #[test]
    fn comparison_shows_summary_on_optimized_pane() {
        let document = document();
        let segments = &document.segments;
        let config = PlaybackConfig::default();
        let original = original_order(segments);
        let optimized = hitsujun_core::sequence(segments);
        let original_frame = evaluate(segments, &original, 1e9, &config);
        let optimized_frame = evaluate(segments, &optimized, 1e9, &config);
        let summary = compare(
            original_frame.traveled_distance,
            optimized_frame.traveled_distance,
        );

        let svg = comparison_to_svg(
            &document,
            Pane {
                title: "original",
                order: &original,
                frame: &original_frame,
            },
            Pane {
                title: "optimized",
                order: &optimized,
                frame: &optimized_frame,
            },
            Some(&summary),
            &FrameStyle::default(),
            &SvgMetadata::default(),
        );
        assert_eq!(svg.matches("data-segment").count(), 6);
        assert!(svg.contains("translate("));
        assert!(svg.contains(&format!("travel: {summary}")));
    }
}
