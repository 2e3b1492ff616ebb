use glam::Vec2;

use crate::config::TiltConfig;
use crate::math::{map_clamped, MAX_STEP_SECONDS};

/// Longest single spring integration step, seconds.
const MAX_SUBSTEP: f32 = 1.0 / 120.0;

/// Distance and speed below which a spring counts as at rest.
const REST_EPSILON: f32 = 1e-3;

/// One-dimensional damped spring.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Spring {
    pub value: f32,
    pub velocity: f32,
    pub target: f32,
}

impl Spring {
    pub fn at(value: f32) -> Self {
        Self {
            value,
            velocity: 0.0,
            target: value,
        }
    }

    /// Semi-implicit Euler step of `dt` seconds.
    fn integrate(&mut self, stiffness: f32, damping: f32, mass: f32, dt: f32) {
        let force = -stiffness * (self.value - self.target) - damping * self.velocity;
        self.velocity += force / mass * dt;
        self.value += self.velocity * dt;
    }

    fn is_settled(&self, tolerance: f32) -> bool {
        (self.value - self.target).abs() < tolerance && self.velocity.abs() < tolerance
    }

    fn snap(&mut self) {
        self.value = self.target;
        self.velocity = 0.0;
    }
}

/// Card pose ready to be written to style properties.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TiltPose {
    /// Degrees around the X axis; positive tips the top edge away.
    pub rotate_x: f32,
    /// Degrees around the Y axis.
    pub rotate_y: f32,
    /// Shadow offset, CSS pixels.
    pub shadow: Vec2,
    pub scale: f32,
}

impl TiltPose {
    pub const REST: Self = Self {
        rotate_x: 0.0,
        rotate_y: 0.0,
        shadow: Vec2::ZERO,
        scale: 1.0,
    };

    pub fn css_transform(&self, perspective: f32) -> String {
        format!(
            "perspective({perspective}px) rotateX({:.3}deg) rotateY({:.3}deg) scale({:.4})",
            self.rotate_x, self.rotate_y, self.scale
        )
    }

    pub fn box_shadow(&self) -> String {
        format!("{:.2}px {:.2}px 0 0 #000", self.shadow.x, self.shadow.y)
    }
}

/// Maps a normalised pointer position to a spring-smoothed card tilt.
pub struct TiltResponder {
    config: TiltConfig,
    rotate_x: Spring,
    rotate_y: Spring,
    shadow_x: Spring,
    shadow_y: Spring,
    scale: Spring,
    hovered: bool,
}

impl TiltResponder {
    pub fn new(config: TiltConfig) -> Self {
        Self {
            config,
            rotate_x: Spring::at(0.0),
            rotate_y: Spring::at(0.0),
            shadow_x: Spring::at(0.0),
            shadow_y: Spring::at(0.0),
            scale: Spring::at(1.0),
            hovered: false,
        }
    }

    pub fn config(&self) -> &TiltConfig {
        &self.config
    }

    pub fn is_hovered(&self) -> bool {
        self.hovered
    }

    /// Unsmoothed pose for a normalised pointer position `(u, v)`.
    pub fn target_for(&self, normalized: Vec2) -> TiltPose {
        let angle = self.config.max_angle;
        let shadow = self.config.shadow_offset;
        TiltPose {
            rotate_x: map_clamped(normalized.y, 0.0, 1.0, angle, -angle),
            rotate_y: map_clamped(normalized.x, 0.0, 1.0, -angle, angle),
            shadow: Vec2::new(
                map_clamped(normalized.x, 0.0, 1.0, shadow, -shadow),
                map_clamped(normalized.y, 0.0, 1.0, shadow, -shadow),
            ),
            scale: self.config.hover_scale,
        }
    }

    /// Retarget toward the pointer. Non-finite input is ignored.
    pub fn pointer_move(&mut self, normalized: Vec2) {
        if !normalized.is_finite() {
            return;
        }
        self.hovered = true;
        let target = self.target_for(normalized);
        self.retarget(target);
    }

    /// Pointer left the card: ease back to rest.
    pub fn leave(&mut self) {
        self.hovered = false;
        self.retarget(TiltPose::REST);
    }

    /// Advance the springs by `dt` seconds, in substeps no longer than
    /// 1/120 s.
    pub fn step(&mut self, dt: f32) {
        if !dt.is_finite() || dt <= 0.0 {
            return;
        }
        let dt = dt.min(MAX_STEP_SECONDS);
        let steps = (dt / MAX_SUBSTEP).ceil().max(1.0) as u32;
        let h = dt / steps as f32;

        let mass = self.config.mass;
        let stiffness = self.config.stiffness;
        // damping = ratio * 2 * sqrt(k * m)
        let damping = self.config.damping_ratio * 2.0 * (stiffness * mass).sqrt();

        for _ in 0..steps {
            for spring in self.springs_mut() {
                spring.integrate(stiffness, damping, mass, h);
            }
        }
        for spring in self.springs_mut() {
            if spring.is_settled(REST_EPSILON) {
                spring.snap();
            }
        }
    }

    pub fn pose(&self) -> TiltPose {
        TiltPose {
            rotate_x: self.rotate_x.value,
            rotate_y: self.rotate_y.value,
            shadow: Vec2::new(self.shadow_x.value, self.shadow_y.value),
            scale: self.scale.value,
        }
    }

    /// Every spring at its target with no residual velocity.
    pub fn is_settled(&self) -> bool {
        [
            &self.rotate_x,
            &self.rotate_y,
            &self.shadow_x,
            &self.shadow_y,
            &self.scale,
        ]
        .iter()
        .all(|s| s.value == s.target && s.velocity == 0.0)
    }

    pub fn css_transform(&self) -> String {
        self.pose().css_transform(self.config.perspective)
    }

    pub fn box_shadow(&self) -> String {
        self.pose().box_shadow()
    }

    fn retarget(&mut self, pose: TiltPose) {
        self.rotate_x.target = pose.rotate_x;
        self.rotate_y.target = pose.rotate_y;
        self.shadow_x.target = pose.shadow.x;
        self.shadow_y.target = pose.shadow.y;
        self.scale.target = pose.scale;
    }

    fn springs_mut(&mut self) -> [&mut Spring; 5] {
        [
            &mut self.rotate_x,
            &mut self.rotate_y,
            &mut self.shadow_x,
            &mut self.shadow_y,
            &mut self.scale,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pose_strings() {
        let pose = TiltPose {
            rotate_x: 5.0,
            rotate_y: -2.5,
            shadow: Vec2::new(-12.0, 6.0),
            scale: 1.03,
        };
        assert_eq!(
            pose.css_transform(800.0),
            "perspective(800px) rotateX(5.000deg) rotateY(-2.500deg) scale(1.0300)"
        );
        assert_eq!(pose.box_shadow(), "-12.00px 6.00px 0 0 #000");
    }

    #[test]
    fn test_rest_is_settled() {
        let tilt = TiltResponder::new(TiltConfig::default());
        assert!(tilt.is_settled());
        assert_eq!(tilt.pose(), TiltPose::REST);
    }
}
