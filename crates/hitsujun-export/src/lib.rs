//! hitsujun-export: render playback frames (sans-IO).
//!
//! Turns a [`StrokeDocument`](hitsujun_core::StrokeDocument), an [`Order`] and the [`TimelineFrame`]
//! evaluated for it into an image of the drawing in progress:
//!
//! - [`frame_to_svg`] / [`comparison_to_svg`] emit SVG text where each
//!   stroke is revealed through `stroke-dasharray` / `stroke-dashoffset`
//!   and pen-up moves are dashed connectors.
//! - [`frame_to_png`] / [`comparison_to_png`] rasterize the same scene with
//!   `tiny-skia`, trimming every stroke to its revealed arc length, and
//!   return encoded PNG bytes.
//!
//! Nothing here touches the filesystem; callers decide where bytes go.

pub mod png;
pub mod reveal;
pub mod svg;

use hitsujun_core::{Order, TimelineFrame};

pub use png::{comparison_to_png, frame_to_png};
pub use svg::{SvgMetadata, comparison_to_svg, frame_to_svg};

/// Errors that can occur while rasterizing a frame.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    /// The requested raster size is zero or too large.
    #[error("invalid raster size {width}x{height}")]
    InvalidSize {
        /// Requested width in pixels.
        width: u32,
        /// Requested height in pixels.
        height: u32,
    },

    /// A style colour is not a `#rrggbb` or `#rrggbbaa` hex string.
    #[error("invalid colour {0:?}, expected #rrggbb or #rrggbbaa")]
    InvalidColor(String),

    /// PNG encoding failed.
    #[error("PNG encoding failed: {0}")]
    Encode(#[from] image::ImageError),
}

/// One timeline to draw: its order and the frame evaluated for it.
#[derive(Debug, Clone, Copy)]
pub struct Pane<'a> {
    /// Caption shown above the distance label.
    pub title: &'a str,
    /// The order the frame was evaluated for.
    pub order: &'a Order,
    /// Progress of every entry of `order`.
    pub frame: &'a TimelineFrame,
}

/// Colours and widths used by every renderer.
///
/// Colours are CSS hex strings (`#rrggbb`); widths are in document units.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameStyle {
    /// Page background, or `None` for transparent.
    pub background: Option<String>,
    /// Pen colour for drawn strokes.
    pub stroke_color: String,
    /// Pen width for drawn strokes.
    pub stroke_width: f64,
    /// Colour of the dashed pen-up connectors.
    pub connector_color: String,
    /// Width of the dashed pen-up connectors.
    pub connector_width: f64,
    /// Dash and gap length of the connectors.
    pub connector_dash: f64,
    /// Arc-length accuracy used when trimming strokes for raster output.
    pub accuracy: f64,
}

impl Default for FrameStyle {
    fn default() -> Self {
        Self {
            background: Some("#ffffff".to_owned()),
            stroke_color: "#222222".to_owned(),
            stroke_width: 3.0,
            connector_color: "#e0457b".to_owned(),
            connector_width: 1.0,
            connector_dash: 2.0,
            accuracy: 1e-3,
        }
    }
}

/// Gap between side-by-side panes as a fraction of the view box width.
const PANE_GAP_RATIO: f64 = 0.05;
