use glam::Vec2;

/// Pointer pull parameters for one step.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AttractionParams {
    /// Pointer position, surface-local pixels.
    pub position: Vec2,
    /// Acceleration per pixel of distance.
    pub coefficient: f32,
    /// Falloff radius; infinite means the pull is purely linear.
    pub radius: f32,
}

/// Acceleration pulling a particle at `pos` toward the pointer.
///
/// Linear in the offset (`(pointer - pos) * coefficient`), optionally faded
/// with `exp(-(d / radius)^1.25)` so distant particles ignore the pointer.
/// There is no division by distance, so a particle sitting on the pointer
/// gets exactly zero. A non-finite pointer yields no force.
pub fn compute_attraction(pos: Vec2, params: &AttractionParams) -> Vec2 {
    if !params.position.is_finite() || params.coefficient == 0.0 {
        return Vec2::ZERO;
    }
    let to_pointer = params.position - pos;
    let falloff = if params.radius.is_finite() && params.radius > 0.0 {
        let dist = to_pointer.length();
        (-(dist / params.radius).powf(1.25)).exp()
    } else {
        1.0
    };
    to_pointer * params.coefficient * falloff
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(radius: f32) -> AttractionParams {
        AttractionParams {
            position: Vec2::new(100.0, 0.0),
            coefficient: 0.001,
            radius,
        }
    }

    #[test]
    fn test_pulls_toward_pointer() {
        let acc = compute_attraction(Vec2::ZERO, &params(f32::INFINITY));
        assert!(acc.x > 0.0);
        assert_eq!(acc.y, 0.0);
        assert!((acc.x - 0.1).abs() < 1e-6);
    }

    #[test]
    fn test_zero_on_pointer() {
        let acc = compute_attraction(Vec2::new(100.0, 0.0), &params(50.0));
        assert_eq!(acc, Vec2::ZERO);
    }

    #[test]
    fn test_falloff_weakens_distant_particles() {
        let near = compute_attraction(Vec2::new(90.0, 0.0), &params(50.0));
        let far = compute_attraction(Vec2::new(-400.0, 0.0), &params(50.0));
        // Linear growth is outweighed by the exponential fade.
        assert!(far.length() < near.length());
    }

    #[test]
    fn test_non_finite_pointer_is_ignored() {
        let mut p = params(f32::INFINITY);
        p.position = Vec2::new(f32::NAN, 0.0);
        assert_eq!(compute_attraction(Vec2::ZERO, &p), Vec2::ZERO);
    }
}
