use glam::Vec2;
use sumi_core::config::TiltConfig;
use sumi_core::tilt::{TiltPose, TiltResponder};

const FRAME: f32 = 1.0 / 60.0;

fn settle(tilt: &mut TiltResponder, frames: usize) {
    for _ in 0..frames {
        tilt.step(FRAME);
    }
}

#[test]
fn test_mapping_endpoints() {
    let tilt = TiltResponder::new(TiltConfig::default());

    let top_left = tilt.target_for(Vec2::new(0.0, 0.0));
    assert_eq!(top_left.rotate_x, 10.0);
    assert_eq!(top_left.rotate_y, -10.0);
    assert_eq!(top_left.shadow, Vec2::new(24.0, 24.0));

    let bottom_right = tilt.target_for(Vec2::new(1.0, 1.0));
    assert_eq!(bottom_right.rotate_x, -10.0);
    assert_eq!(bottom_right.rotate_y, 10.0);
    assert_eq!(bottom_right.shadow, Vec2::new(-24.0, -24.0));

    let centre = tilt.target_for(Vec2::splat(0.5));
    assert_eq!(centre.rotate_x, 0.0);
    assert_eq!(centre.rotate_y, 0.0);
    assert_eq!(centre.scale, 1.03);
}

#[test]
fn test_mapping_is_monotonic_and_clamped() {
    let tilt = TiltResponder::new(TiltConfig::default());
    let mut last = f32::NEG_INFINITY;
    for i in 0..=20 {
        let u = i as f32 / 20.0;
        let y = tilt.target_for(Vec2::new(u, 0.5)).rotate_y;
        assert!(y >= last, "rotate_y not monotonic at u={u}");
        last = y;
    }

    let outside = tilt.target_for(Vec2::new(3.0, -2.0));
    assert_eq!(outside.rotate_y, 10.0);
    assert_eq!(outside.rotate_x, 10.0);
}

#[test]
fn test_spring_converges_without_overshoot() {
    let mut tilt = TiltResponder::new(TiltConfig::default());
    tilt.pointer_move(Vec2::new(0.0, 1.0));

    for _ in 0..120 {
        tilt.step(FRAME);
        let pose = tilt.pose();
        assert!(pose.rotate_x >= -10.0 - 1e-3, "overshot: {}", pose.rotate_x);
        assert!(pose.rotate_y >= -10.0 - 1e-3, "overshot: {}", pose.rotate_y);
        assert!(pose.rotate_x <= 1e-3 && pose.rotate_y <= 1e-3);
    }

    assert!(tilt.is_settled());
    let pose = tilt.pose();
    assert_eq!(pose.rotate_x, -10.0);
    assert_eq!(pose.rotate_y, -10.0);
    assert_eq!(pose.scale, 1.03);
}

#[test]
fn test_smoothing_is_gradual() {
    let mut tilt = TiltResponder::new(TiltConfig::default());
    tilt.pointer_move(Vec2::new(1.0, 0.5));
    tilt.step(FRAME);

    let y = tilt.pose().rotate_y;
    assert!(y > 0.0 && y < 5.0, "one frame should move part of the way: {y}");
    assert!(!tilt.is_settled());
}

#[test]
fn test_leave_returns_to_rest() {
    let mut tilt = TiltResponder::new(TiltConfig::default());
    tilt.pointer_move(Vec2::new(0.9, 0.1));
    settle(&mut tilt, 30);
    assert!(tilt.is_hovered());

    tilt.leave();
    assert!(!tilt.is_hovered());
    settle(&mut tilt, 120);
    assert!(tilt.is_settled());
    assert_eq!(tilt.pose(), TiltPose::REST);
}

#[test]
fn test_frame_rate_does_not_change_outcome_much() {
    let mut at_60 = TiltResponder::new(TiltConfig::default());
    let mut at_144 = TiltResponder::new(TiltConfig::default());
    at_60.pointer_move(Vec2::new(1.0, 0.0));
    at_144.pointer_move(Vec2::new(1.0, 0.0));

    // A quarter second either way.
    for _ in 0..15 {
        at_60.step(1.0 / 60.0);
    }
    for _ in 0..36 {
        at_144.step(1.0 / 144.0);
    }

    let a = at_60.pose().rotate_y;
    let b = at_144.pose().rotate_y;
    assert!((a - b).abs() < 0.25, "60 Hz {a} vs 144 Hz {b}");
}

#[test]
fn test_non_finite_input_ignored() {
    let mut tilt = TiltResponder::new(TiltConfig::default());
    tilt.pointer_move(Vec2::new(f32::NAN, 0.5));
    tilt.step(f32::NAN);
    tilt.step(-1.0);
    assert!(!tilt.is_hovered());
    assert!(tilt.is_settled());
}

#[test]
fn test_style_strings_follow_pose() {
    let mut tilt = TiltResponder::new(TiltConfig::default());
    assert_eq!(
        tilt.css_transform(),
        "perspective(800px) rotateX(0.000deg) rotateY(0.000deg) scale(1.0000)"
    );
    assert_eq!(tilt.box_shadow(), "0.00px 0.00px 0 0 #000");

    tilt.pointer_move(Vec2::new(1.0, 1.0));
    settle(&mut tilt, 180);
    assert_eq!(
        tilt.css_transform(),
        "perspective(800px) rotateX(-10.000deg) rotateY(10.000deg) scale(1.0300)"
    );
    assert_eq!(tilt.box_shadow(), "-24.00px -24.00px 0 0 #000");
}
