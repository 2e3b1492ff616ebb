use glam::Vec2;
use sumi_core::config::HighlightConfig;
use sumi_core::highlight::{HighlightMode, RadialHighlight};
use sumi_core::input::{Bounds, PointerSample, PointerTracker};

// ---------------------------------------------------------------------------
// Pointer normalisation
// ---------------------------------------------------------------------------

#[test]
fn test_local_and_normalized_coordinates() {
    let bounds = Bounds::new(100.0, 50.0, 200.0, 100.0);
    let sample = PointerSample::from_client(Vec2::new(150.0, 75.0), bounds);
    assert_eq!(sample.local, Vec2::new(50.0, 25.0));
    assert_eq!(sample.normalized, Vec2::new(0.25, 0.25));
}

#[test]
fn test_positions_outside_bounds_are_not_clamped() {
    let bounds = Bounds::new(100.0, 100.0, 100.0, 100.0);
    let sample = PointerSample::from_client(Vec2::new(50.0, 350.0), bounds);
    assert_eq!(sample.local, Vec2::new(-50.0, 250.0));
    assert_eq!(sample.normalized, Vec2::new(-0.5, 2.5));
}

#[test]
fn test_zero_extent_normalizes_to_centre() {
    let bounds = Bounds::new(10.0, 10.0, 0.0, 40.0);
    let sample = PointerSample::from_client(Vec2::new(30.0, 20.0), bounds);
    assert_eq!(sample.normalized.x, 0.5);
    assert_eq!(sample.normalized.y, 0.25);
    assert!(sample.is_finite());
}

#[test]
fn test_tracker_keeps_latest_and_drops_non_finite() {
    let mut tracker = PointerTracker::new();
    let cell = tracker.cell();
    assert_eq!(cell.latest(), PointerSample::default());
    assert_eq!(cell.latest().normalized, Vec2::splat(0.5));

    let bounds = Bounds::viewport(1000.0, 500.0);
    tracker.on_pointer_move(Vec2::new(10.0, 10.0), bounds);
    tracker.on_pointer_move(Vec2::new(500.0, 250.0), bounds);
    // Intermediate positions are not queued; the reader sees the last write.
    assert_eq!(cell.latest().local, Vec2::new(500.0, 250.0));

    let kept = tracker.on_pointer_move(Vec2::new(f32::NAN, 1.0), bounds);
    assert_eq!(kept.local, Vec2::new(500.0, 250.0));
    assert_eq!(tracker.moves(), 2);
}

// ---------------------------------------------------------------------------
// Radial highlight
// ---------------------------------------------------------------------------

#[test]
fn test_percent_highlight_tracks_immediately() {
    let mut highlight = RadialHighlight::new(HighlightConfig::default());
    assert_eq!(highlight.props().mx, "50.00%");

    let bounds = Bounds::new(0.0, 0.0, 400.0, 200.0);
    highlight.update(PointerSample::from_client(Vec2::new(100.0, 150.0), bounds));

    let props = highlight.props();
    assert_eq!(props.mx, "25.00%");
    assert_eq!(props.my, "75.00%");
    assert!(!highlight.step(1.0 / 60.0), "percent mode does not ease");
}

#[test]
fn test_cursor_highlight_eases_in_pixels() {
    let mut highlight = RadialHighlight::new(HighlightConfig::cursor());
    assert_eq!(highlight.mode(), HighlightMode::Pixels);

    highlight.update(PointerSample::from_client(Vec2::new(100.0, 0.0), Bounds::viewport(800.0, 600.0)));
    assert_eq!(highlight.position(), Vec2::ZERO);

    assert!(highlight.step(1.0 / 60.0));
    assert!((highlight.position().x - 10.0).abs() < 1e-3, "{:?}", highlight.position());

    for _ in 0..300 {
        highlight.step(1.0 / 60.0);
    }
    assert_eq!(highlight.position(), Vec2::new(100.0, 0.0));
    assert_eq!(highlight.props().mx, "100.00px");
    assert!(!highlight.step(1.0 / 60.0));
}

#[test]
fn test_highlight_easing_is_frame_rate_independent() {
    let sample = PointerSample::from_client(Vec2::new(100.0, 0.0), Bounds::viewport(800.0, 600.0));
    let mut at_60 = RadialHighlight::new(HighlightConfig::cursor());
    let mut at_120 = RadialHighlight::new(HighlightConfig::cursor());
    at_60.update(sample);
    at_120.update(sample);

    at_60.step(1.0 / 60.0);
    at_120.step(1.0 / 120.0);
    at_120.step(1.0 / 120.0);

    assert!((at_60.position().x - at_120.position().x).abs() < 1e-3);
}
