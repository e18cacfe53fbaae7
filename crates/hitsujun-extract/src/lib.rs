//! hitsujun-extract: turn an SVG document into measured strokes (sans-IO).
//!
//! Every path primitive of the document becomes one
//! [`StrokeSegment`](hitsujun_core::StrokeSegment), numbered in document
//! order. For each path this crate measures the arc length, finds the
//! points at length 0 and at the full length, and builds the reverse
//! geometry by sampling the curve backward at roughly
//! [`ExtractConfig::resample_step`] intervals.
//!
//! The reverse geometry is a piecewise-linear approximation, not an exact
//! reversal of the curve; consumers draw it as-is.

pub mod measure;
pub mod svg;

use serde::{Deserialize, Serialize};

use hitsujun_core::{Point, StrokeDocument, StrokeSegment, ViewBox};

pub use measure::MeasuredPath;

/// Errors that can occur while loading a document.
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    /// The input bytes were empty.
    #[error("input document is empty")]
    EmptyData,

    /// The input is not a recognizable SVG document.
    #[error("not a recognizable SVG document: {0}")]
    InputFormat(#[from] usvg::Error),

    /// Extraction settings are unusable.
    #[error("invalid extraction configuration: {0}")]
    InvalidConfig(String),
}

/// Measurement settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractConfig {
    /// Approximate spacing, in document units, between samples of the
    /// reverse geometry.
    pub resample_step: f64,
    /// Arc-length accuracy in document units.
    pub accuracy: f64,
}

impl ExtractConfig {
    /// Default reverse-geometry sample spacing.
    pub const DEFAULT_RESAMPLE_STEP: f64 = 2.0;
    /// Default arc-length accuracy.
    pub const DEFAULT_ACCURACY: f64 = 1e-3;

    fn validate(&self) -> Result<(), ExtractError> {
        if !(self.resample_step.is_finite() && self.resample_step > 0.0) {
            return Err(ExtractError::InvalidConfig(format!(
                "resample_step must be a finite positive number, got {}",
                self.resample_step
            )));
        }
        if !(self.accuracy.is_finite() && self.accuracy > 0.0) {
            return Err(ExtractError::InvalidConfig(format!(
                "accuracy must be a finite positive number, got {}",
                self.accuracy
            )));
        }
        Ok(())
    }
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            resample_step: Self::DEFAULT_RESAMPLE_STEP,
            accuracy: Self::DEFAULT_ACCURACY,
        }
    }
}

/// Parse and measure every path of an SVG document.
///
/// A document without any path is not an error: it yields an empty
/// [`StrokeDocument`].
///
/// # Errors
///
/// Returns [`ExtractError::EmptyData`] if `data` is empty,
/// [`ExtractError::InputFormat`] if it is not an SVG document, and
/// [`ExtractError::InvalidConfig`] for non-positive settings.
#[tracing::instrument(skip_all, fields(bytes = data.len()))]
pub fn extract(data: &[u8], config: &ExtractConfig) -> Result<StrokeDocument, ExtractError> {
    config.validate()?;
    if data.is_empty() {
        return Err(ExtractError::EmptyData);
    }

    let (view, paths) = svg::parse_paths(data)?;

    let segments: Vec<StrokeSegment> = paths
        .iter()
        .enumerate()
        .map(|(id, source)| {
            let segment = measure_segment(id, &source.path, config);
            tracing::debug!(
                id,
                element = source.id.as_deref(),
                length = segment.length,
                "segment measured"
            );
            segment
        })
        .collect();

    let view_box = ViewBox {
        x: view.x0,
        y: view.y0,
        width: view.width(),
        height: view.height(),
    };
    tracing::info!(
        segments = segments.len(),
        width = view_box.width,
        height = view_box.height,
        "document measured"
    );

    Ok(StrokeDocument::new(view_box, segments))
}

/// Measure one path into a segment.
#[must_use]
pub fn measure_segment(id: usize, path: &kurbo::BezPath, config: &ExtractConfig) -> StrokeSegment {
    let measured = MeasuredPath::new(path, config.accuracy);
    let length = measured.length();
    StrokeSegment {
        id,
        length,
        start: Point::from(measured.point_at_length(0.0)),
        end: Point::from(measured.point_at_length(length)),
        forward: path.clone(),
        reverse: measured.reversed(config.resample_step),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    #[test]
    fn empty_data_rejected() {
        assert!(matches!(
            extract(&[], &ExtractConfig::default()),
            Err(ExtractError::EmptyData)
        ));
    }

    #[test]
    fn zero_step_rejected() {
        let config = ExtractConfig {
            resample_step: 0.0,
            ..ExtractConfig::default()
        };
        assert!(matches!(
            extract(b"<svg/>", &config),
            Err(ExtractError::InvalidConfig(_))
        ));
    }

    #[test]
    fn measured_segment_endpoints() {
        let mut path = kurbo::BezPath::new();
        path.move_to((0.0, 0.0));
        path.line_to((0.0, 10.0));
        let segment = measure_segment(3, &path, &ExtractConfig::default());
        assert_eq!(segment.id, 3);
        assert!((segment.length - 10.0).abs() < 1e-9);
        assert_eq!(segment.start, Point::new(0.0, 0.0));
        assert!((segment.end.y - 10.0).abs() < 1e-9);
        // 10 units at step 2 -> 5 intervals -> 6 samples.
        assert_eq!(segment.reverse.elements().len(), 6);
    }

    #[test]
    fn view_box_units_survive_a_scaled_viewport() {
        let svg = br#"<svg xmlns="http://www.w3.org/2000/svg" width="327" height="327" viewBox="0 0 109 109">
            <path d="M10 10 L10 20" stroke="black" fill="none"/>
        </svg>"#;
        let document = extract(svg, &ExtractConfig::default()).unwrap();
        assert_eq!(
            document.view_box,
            ViewBox {
                x: 0.0,
                y: 0.0,
                width: 109.0,
                height: 109.0,
            }
        );
        let segment = &document.segments[0];
        assert_abs_diff_eq!(segment.length, 10.0, epsilon = 1e-3);
        assert_abs_diff_eq!(segment.start.x, 10.0, epsilon = 1e-3);
        assert_abs_diff_eq!(segment.start.y, 10.0, epsilon = 1e-3);
        assert_abs_diff_eq!(segment.end.x, 10.0, epsilon = 1e-3);
        assert_abs_diff_eq!(segment.end.y, 20.0, epsilon = 1e-3);
    }
}
