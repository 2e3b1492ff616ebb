mod common;

use common::{Op, RecordingTarget};
use glam::Vec2;
use sumi_core::config::{RakeConfig, MAX_TEETH_PER_SIDE};
use sumi_core::ink::{Gesture, InkCanvas};
use sumi_core::raster::{BlendMode, Color, PixelSurface};
use sumi_core::surface::{Layout, SurfaceController};

fn canvas() -> InkCanvas {
    InkCanvas::new(RakeConfig::default(), 11)
}

fn line_count(target: &RecordingTarget) -> usize {
    target.count(|op| matches!(op, Op::Line { .. }))
}

#[test]
fn test_gesture_draws_only_while_active() {
    let mut ink = canvas();
    let mut target = RecordingTarget::new();
    let strokes_per_segment = 1 + ink.config().tooth_count();

    ink.pointer_down(Vec2::new(10.0, 10.0));
    assert!(ink.is_active());
    assert!(ink.pointer_move(Vec2::new(50.0, 10.0), &mut target));
    ink.pointer_up();

    assert_eq!(ink.gesture(), Gesture::Idle);
    assert_eq!(line_count(&target), strokes_per_segment);
    assert_eq!(strokes_per_segment, 4);

    // Moving without a new press draws nothing.
    target.take();
    assert!(!ink.pointer_move(Vec2::new(90.0, 10.0), &mut target));
    assert!(target.ops.is_empty());
}

#[test]
fn test_primary_stroke_then_offset_teeth() {
    let mut ink = canvas();
    let mut target = RecordingTarget::new();
    ink.pointer_down(Vec2::new(10.0, 10.0));
    ink.pointer_move(Vec2::new(50.0, 10.0), &mut target);

    let lines = target.lines();
    assert_eq!(lines[0], (Vec2::new(10.0, 10.0), Vec2::new(50.0, 10.0)));

    let wave_from = (10.0f32 * 0.05).sin() * 3.0;
    let wave_to = (50.0f32 * 0.05).sin() * 3.0;
    for (i, dx) in [-12.0, 0.0, 12.0].into_iter().enumerate() {
        let (from, to) = lines[i + 1];
        assert!((from - Vec2::new(10.0 + dx, 10.0 + wave_from)).length() < 1e-4);
        assert!((to - Vec2::new(50.0 + dx, 10.0 + wave_to)).length() < 1e-4);
    }
}

#[test]
fn test_strokes_multiply_then_restore_source_over() {
    let mut ink = canvas();
    let mut target = RecordingTarget::new();
    ink.pointer_down(Vec2::ZERO);
    ink.pointer_move(Vec2::new(5.0, 5.0), &mut target);

    assert_eq!(target.ops.first(), Some(&Op::Blend(BlendMode::Multiply)));
    assert_eq!(target.ops.last(), Some(&Op::Blend(BlendMode::SourceOver)));
    for op in &target.ops {
        if let Op::Line { stroke, .. } = op {
            assert_eq!(stroke.width, 8.0);
            assert_eq!(stroke.color, Color::rgba(0, 0, 0, 0.6));
        }
    }
}

#[test]
fn test_each_move_is_one_segment_from_last_point() {
    let mut ink = canvas();
    let mut target = RecordingTarget::new();
    ink.pointer_down(Vec2::new(0.0, 0.0));
    for x in [10.0, 20.0, 30.0] {
        ink.pointer_move(Vec2::new(x, 0.0), &mut target);
    }

    let primaries: Vec<_> = target.lines().into_iter().step_by(4).collect();
    assert_eq!(
        primaries,
        vec![
            (Vec2::new(0.0, 0.0), Vec2::new(10.0, 0.0)),
            (Vec2::new(10.0, 0.0), Vec2::new(20.0, 0.0)),
            (Vec2::new(20.0, 0.0), Vec2::new(30.0, 0.0)),
        ]
    );
    assert_eq!(ink.stroke_count(), 3);
}

#[test]
fn test_leave_ends_gesture() {
    let mut ink = canvas();
    let mut target = RecordingTarget::new();
    ink.pointer_down(Vec2::new(1.0, 1.0));
    ink.pointer_leave();
    assert!(!ink.is_active());
    assert!(!ink.pointer_move(Vec2::new(9.0, 9.0), &mut target));
}

#[test]
fn test_initialize_paints_paper_and_grain_once() {
    let mut ink = canvas();
    let mut target = RecordingTarget::new();
    ink.initialize(Vec2::new(300.0, 200.0), &mut target);

    let rects: Vec<_> = target
        .ops
        .iter()
        .filter_map(|op| match op {
            Op::Rect { origin, size, color } => Some((*origin, *size, *color)),
            _ => None,
        })
        .collect();
    assert_eq!(rects.len(), 1 + 120);
    assert_eq!(rects[0], (Vec2::ZERO, Vec2::new(300.0, 200.0), Color::WHITE));
    for (origin, size, color) in &rects[1..] {
        assert_eq!(*size, Vec2::ONE);
        assert_eq!(color.a, 0.02);
        assert!(origin.x >= 0.0 && origin.x < 300.0 && origin.y >= 0.0 && origin.y < 200.0);
    }
}

#[test]
fn test_repeated_passes_accumulate_density() {
    let mut controller = SurfaceController::new();
    let mut surface = PixelSurface::new();
    let mut ink = canvas();
    controller.initialize(Layout::new(100.0, 60.0, 1.0), &mut surface).unwrap();
    ink.initialize(controller.css_size(), &mut surface);

    let probe = Vec2::new(50.5, 30.5);
    // White paper, possibly under one faint grain dot.
    let base = surface.pixel_at_css(probe).map(|p| p[0]).unwrap_or(0);
    assert!(base >= 250, "paper at probe: {base}");

    ink.pointer_down(Vec2::new(20.0, 30.0));
    ink.pointer_move(Vec2::new(80.0, 30.0), &mut surface);
    ink.pointer_up();
    let once = surface.pixel_at_css(probe).map(|p| p[0]).unwrap_or(255);
    assert!(once < base);

    ink.pointer_down(Vec2::new(20.0, 30.0));
    ink.pointer_move(Vec2::new(80.0, 30.0), &mut surface);
    let twice = surface.pixel_at_css(probe).map(|p| p[0]).unwrap_or(255);
    assert!(twice < once, "second pass should darken: {twice} vs {once}");
}

#[test]
fn test_reinitialize_discards_strokes() {
    let mut controller = SurfaceController::new();
    let mut surface = PixelSurface::new();
    let mut ink = canvas();
    controller.initialize(Layout::new(100.0, 60.0, 1.0), &mut surface).unwrap();
    ink.initialize(controller.css_size(), &mut surface);

    ink.pointer_down(Vec2::new(20.0, 30.0));
    ink.pointer_move(Vec2::new(80.0, 30.0), &mut surface);

    controller.on_resize(Layout::new(100.0, 60.0, 2.0), &mut surface).unwrap();
    ink.initialize(controller.css_size(), &mut surface);
    assert_eq!(ink.stroke_count(), 0);

    // Gesture survives, but the next move only re-anchors.
    assert!(ink.is_active());
    assert!(!ink.pointer_move(Vec2::new(60.0, 30.0), &mut surface));
    assert!(ink.pointer_move(Vec2::new(70.0, 30.0), &mut surface));
}

#[test]
fn test_unvalidated_wide_rake_is_capped() {
    let mut config = RakeConfig::default();
    config.teeth_per_side = u32::MAX;
    let ink = InkCanvas::new(config, 3);

    let teeth = ink.teeth(Vec2::new(0.0, 0.0), Vec2::new(10.0, 0.0));
    assert_eq!(teeth.len(), MAX_TEETH_PER_SIDE as usize * 2 + 1);
    assert_eq!(teeth.len(), ink.config().tooth_count());
    assert_eq!(teeth[0].0.x, -(MAX_TEETH_PER_SIDE as f32) * 12.0);
}
