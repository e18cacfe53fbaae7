//! PNG frame rasterizer.
//!
//! Draws the same scene as [`crate::svg`] with `tiny-skia`, minus the
//! caption text. Partial strokes are trimmed to their revealed arc length
//! instead of relying on dash offsets.

use hitsujun_core::kurbo::{BezPath, PathEl};
use hitsujun_core::{StrokeDocument, travel_edges};
use image::{ImageEncoder, Rgba, RgbaImage};
use tiny_skia::{
    Color, LineCap, LineJoin, Paint, PathBuilder, Pixmap, Stroke, StrokeDash, Transform,
};

use crate::reveal::{connector_tip, trim};
use crate::{ExportError, FrameStyle, PANE_GAP_RATIO, Pane};

/// Rasterize one timeline at `scale` pixels per document unit.
///
/// # Errors
///
/// Returns [`ExportError::InvalidSize`] when the scaled view box is empty
/// or too large, [`ExportError::InvalidColor`] for an unparsable style
/// colour, and [`ExportError::Encode`] if PNG encoding fails.
pub fn frame_to_png(
    document: &StrokeDocument,
    pane: Pane<'_>,
    style: &FrameStyle,
    scale: f64,
) -> Result<Vec<u8>, ExportError> {
    render(document, &[pane], style, scale)
}

/// Rasterize both timelines side by side.
///
/// # Errors
///
/// Same as [`frame_to_png`].
pub fn comparison_to_png(
    document: &StrokeDocument,
    original: Pane<'_>,
    optimized: Pane<'_>,
    style: &FrameStyle,
    scale: f64,
) -> Result<Vec<u8>, ExportError> {
    render(document, &[original, optimized], style, scale)
}

#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
fn render(
    document: &StrokeDocument,
    panes: &[Pane<'_>],
    style: &FrameStyle,
    scale: f64,
) -> Result<Vec<u8>, ExportError> {
    let view_box = document.view_box;
    let n = panes.len().max(1) as f64;
    let pane_offset = view_box.width * (1.0 + PANE_GAP_RATIO);
    let width_units = view_box.width.mul_add(n, view_box.width * PANE_GAP_RATIO * (n - 1.0));

    let width = pixels(width_units * scale);
    let height = pixels(view_box.height * scale);
    let Some(mut pixmap) = Pixmap::new(width, height) else {
        return Err(ExportError::InvalidSize { width, height });
    };

    if let Some(background) = &style.background {
        pixmap.fill(parse_color(background)?);
    }

    let mut stroke_paint = Paint::default();
    stroke_paint.set_color(parse_color(&style.stroke_color)?);
    stroke_paint.anti_alias = true;
    let stroke = Stroke {
        width: style.stroke_width as f32,
        line_cap: LineCap::Round,
        line_join: LineJoin::Round,
        ..Stroke::default()
    };

    let mut connector_paint = Paint::default();
    connector_paint.set_color(parse_color(&style.connector_color)?);
    connector_paint.anti_alias = true;
    let dash = style.connector_dash as f32;
    let connector = Stroke {
        width: style.connector_width as f32,
        dash: StrokeDash::new(vec![dash, dash], 0.0),
        ..Stroke::default()
    };

    for (k, pane) in panes.iter().enumerate() {
        let transform = Transform::from_row(
            scale as f32,
            0.0,
            0.0,
            scale as f32,
            ((k as f64).mul_add(pane_offset, -view_box.x) * scale) as f32,
            (-view_box.y * scale) as f32,
        );
        let segments = &document.segments;
        let edges = travel_edges(segments, pane.order);

        for (i, (entry, progress)) in pane.order.iter().zip(&pane.frame.entries).enumerate() {
            if let Some(travel) = progress.travel
                && travel > 0.0
                && let Some(edge) = i.checked_sub(1).and_then(|j| edges.get(j))
            {
                let tip = connector_tip(edge, travel);
                let mut pb = PathBuilder::new();
                pb.move_to(edge.from.x as f32, edge.from.y as f32);
                pb.line_to(tip.x as f32, tip.y as f32);
                if let Some(path) = pb.finish() {
                    pixmap.stroke_path(&path, &connector_paint, &connector, transform, None);
                }
            }

            if progress.draw <= 0.0 {
                continue;
            }
            let Some(segment) = segments.get(entry.segment_id) else {
                continue;
            };
            let revealed = trim(segment.geometry(entry.direction), progress.draw, style.accuracy);
            if let Some(path) = to_skia_path(&revealed) {
                pixmap.stroke_path(&path, &stroke_paint, &stroke, transform, None);
            }
        }
    }

    encode(&pixmap)
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn pixels(size: f64) -> u32 {
    if size.is_finite() && size > 0.0 {
        size.round().min(f64::from(u32::MAX)) as u32
    } else {
        0
    }
}

#[allow(clippy::cast_possible_truncation)]
fn to_skia_path(path: &BezPath) -> Option<tiny_skia::Path> {
    let f = |v: f64| v as f32;
    let mut pb = PathBuilder::new();
    for el in path.elements() {
        match *el {
            PathEl::MoveTo(p) => pb.move_to(f(p.x), f(p.y)),
            PathEl::LineTo(p) => pb.line_to(f(p.x), f(p.y)),
            PathEl::QuadTo(c, p) => pb.quad_to(f(c.x), f(c.y), f(p.x), f(p.y)),
            PathEl::CurveTo(c1, c2, p) => {
                pb.cubic_to(f(c1.x), f(c1.y), f(c2.x), f(c2.y), f(p.x), f(p.y));
            }
            PathEl::ClosePath => pb.close(),
        }
    }
    pb.finish()
}

/// Parse `#rrggbb` or `#rrggbbaa`.
fn parse_color(text: &str) -> Result<Color, ExportError> {
    let invalid = || ExportError::InvalidColor(text.to_owned());
    let hex = text.strip_prefix('#').ok_or_else(invalid)?;
    let channel = |i: usize| {
        hex.get(i..i + 2)
            .and_then(|h| u8::from_str_radix(h, 16).ok())
            .ok_or_else(invalid)
    };
    let alpha = match hex.len() {
        6 => 255,
        8 => channel(6)?,
        _ => return Err(invalid()),
    };
    Ok(Color::from_rgba8(channel(0)?, channel(2)?, channel(4)?, alpha))
}

/// Un-premultiply the pixmap and encode it as PNG.
#[allow(clippy::cast_possible_truncation)]
fn encode(pixmap: &Pixmap) -> Result<Vec<u8>, ExportError> {
    let (width, height) = (pixmap.width(), pixmap.height());
    let data = pixmap.data();
    let mut img = RgbaImage::new(width, height);
    for (i, pixel) in img.pixels_mut().enumerate() {
        let off = i * 4;
        let a = data[off + 3];
        if a == 0 {
            *pixel = Rgba([0, 0, 0, 0]);
        } else {
            let r = u16::from(data[off]) * 255 / u16::from(a);
            let g = u16::from(data[off + 1]) * 255 / u16::from(a);
            let b = u16::from(data[off + 2]) * 255 / u16::from(a);
            *pixel = Rgba([r as u8, g as u8, b as u8, a]);
        }
    }

    let mut buf = Vec::new();
    image::codecs::png::PngEncoder::new(&mut buf).write_image(
        img.as_raw(),
        width,
        height,
        image::ExtendedColorType::Rgba8,
    )?;
    Ok(buf)
}
