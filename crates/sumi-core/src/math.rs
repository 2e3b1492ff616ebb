/// Refresh rate the per-frame tuning constants were chosen for.
pub const REFERENCE_HZ: f32 = 60.0;

/// Longest step the simulation will take in one tick, in seconds.
///
/// A backgrounded tab can report a multi-second gap between frames; anything
/// longer than this is treated as a dropped frame rather than simulated.
pub const MAX_STEP_SECONDS: f32 = 0.1;

/// Number of reference frames covered by `dt` seconds.
///
/// Non-finite and negative deltas count as zero frames.
#[inline]
pub fn reference_frames(dt: f32) -> f32 {
    if !dt.is_finite() {
        return 0.0;
    }
    dt.clamp(0.0, MAX_STEP_SECONDS) * REFERENCE_HZ
}

/// Per-frame multiplicative factor applied over a fractional frame count.
#[inline]
pub fn per_frame(factor: f32, frames: f32) -> f32 {
    if factor == 1.0 {
        1.0
    } else {
        factor.powf(frames)
    }
}

/// Exponential approach rate `rate` (fraction per reference frame) scaled to
/// `frames` frames.
#[inline]
pub fn approach(rate: f32, frames: f32) -> f32 {
    1.0 - per_frame(1.0 - rate, frames)
}

/// `num / den`, or `fallback` when the denominator is zero or not finite.
#[inline]
pub fn safe_ratio(num: f32, den: f32, fallback: f32) -> f32 {
    if den.is_finite() && den.abs() > f32::EPSILON && num.is_finite() {
        num / den
    } else {
        fallback
    }
}

/// Linear map from `[in_start, in_end]` to `[out_start, out_end]`, clamped
/// to the output range.
#[inline]
pub fn map_clamped(x: f32, in_start: f32, in_end: f32, out_start: f32, out_end: f32) -> f32 {
    let t = safe_ratio(x - in_start, in_end - in_start, 0.5).clamp(0.0, 1.0);
    mix(out_start, out_end, t)
}

/// Phase in `[0, 2π)` of an oscillation at `rate` radians per second after
/// `time` seconds. Reduced in `f64` so long-running pages keep full `f32`
/// resolution.
#[inline]
pub fn cycle_phase(time: f64, rate: f32) -> f32 {
    let phase = (time * f64::from(rate)).rem_euclid(std::f64::consts::TAU);
    if phase.is_finite() {
        phase as f32
    } else {
        0.0
    }
}

/// GLSL-style `mix(a, b, t)` for scalars.
#[inline]
pub fn mix(a: f32, b: f32, t: f32) -> f32 {
    a * (1.0 - t) + b * t
}
