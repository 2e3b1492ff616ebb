use glam::Vec2;
use std::f32::consts::TAU;

use crate::math::cycle_phase;

/// Vertical flutter cycle, radians per second.
const FLUTTER_RATE: f32 = 1.7;

/// Gusting breeze for the petal field.
///
/// A horizontal push that breathes between 20% and 100% of `wind` on a slow
/// cycle, phase-shifted per particle by `hash` so the field does not move in
/// lockstep, plus a small vertical flutter keyed to the particle's x so
/// neighbouring petals bob differently.
///
/// # Arguments
///
/// * `pos` - Particle position, surface-local pixels.
/// * `hash` - Per-particle phase in \[0,1).
/// * `time` - Seconds since the field started.
/// * `wind` - Peak horizontal gust, pixels per reference frame².
/// * `gust_frequency` - Gust cycle, radians per second.
/// * `flutter` - Peak vertical flutter, pixels per reference frame².
pub fn compute_wind(
    pos: Vec2,
    hash: f32,
    time: f64,
    wind: f32,
    gust_frequency: f32,
    flutter: f32,
) -> Vec2 {
    let phase = hash * TAU;
    let gust = 0.6 + 0.4 * (cycle_phase(time, gust_frequency) + phase).sin();
    let bob = (cycle_phase(time, FLUTTER_RATE) + pos.x * 0.01 + phase).sin();
    let out = Vec2::new(wind * gust, flutter * bob);
    if out.is_finite() {
        out
    } else {
        Vec2::ZERO
    }
}
