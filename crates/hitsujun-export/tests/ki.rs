//! Integration test: render the ki example through a full playback.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use std::path::PathBuf;

use hitsujun_core::{
    PlaybackConfig, StrokeDocument, compare, evaluate, original_order, sequence, total_duration,
};
use hitsujun_export::{
    FrameStyle, Pane, SvgMetadata, comparison_to_png, comparison_to_svg, frame_to_svg,
};
use hitsujun_extract::{ExtractConfig, extract};

fn ki() -> StrokeDocument {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../../assets/examples/ki.svg");
    let data =
        std::fs::read(&path).unwrap_or_else(|e| panic!("cannot read {}: {e}", path.display()));
    extract(&data, &ExtractConfig::default()).expect("ki.svg parses")
}

#[test]
fn strokes_appear_progressively() {
    let document = ki();
    let config = PlaybackConfig::default();
    let order = original_order(&document.segments);
    let duration = total_duration(&document.segments, &order, &config);
    assert!(duration > 0.0);

    let mut previous = 0;
    for step in 0..=10 {
        let elapsed = duration * f64::from(step) / 10.0;
        let frame = evaluate(&document.segments, &order, elapsed, &config);
        let pane = Pane {
            title: "original",
            order: &order,
            frame: &frame,
        };
        let svg = frame_to_svg(&document, pane, &FrameStyle::default(), &SvgMetadata::default());
        let drawn = svg.matches("data-segment").count();
        assert!(drawn >= previous, "stroke count went backward at step {step}");
        previous = drawn;
    }
    assert_eq!(previous, document.segments.len());
}

#[test]
fn finished_comparison_renders_both_formats() {
    let document = ki();
    let config = PlaybackConfig::default();
    let segments = &document.segments;
    let original = original_order(segments);
    let optimized = sequence(segments);
    let original_frame = evaluate(segments, &original, f64::MAX, &config);
    let optimized_frame = evaluate(segments, &optimized, f64::MAX, &config);
    assert!(original_frame.finished && optimized_frame.finished);

    let summary = compare(
        original_frame.traveled_distance,
        optimized_frame.traveled_distance,
    );
    let original_pane = Pane {
        title: "original",
        order: &original,
        frame: &original_frame,
    };
    let optimized_pane = Pane {
        title: "optimized",
        order: &optimized,
        frame: &optimized_frame,
    };

    let svg = comparison_to_svg(
        &document,
        original_pane,
        optimized_pane,
        Some(&summary),
        &FrameStyle::default(),
        &SvgMetadata {
            title: Some("ki"),
            description: None,
        },
    );
    assert!(svg.contains("<title>ki</title>"));
    assert_eq!(svg.matches("data-segment").count(), 2 * segments.len());

    let png = comparison_to_png(
        &document,
        original_pane,
        optimized_pane,
        &FrameStyle::default(),
        2.0,
    )
    .unwrap();
    assert_eq!(&png[1..4], b"PNG");
}
