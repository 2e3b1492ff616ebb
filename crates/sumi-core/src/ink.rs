use glam::Vec2;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::config::{RakeConfig, MAX_TEETH_PER_SIDE};
use crate::raster::{BlendMode, DrawTarget};

/// Drawing gesture state.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Gesture {
    Idle,
    /// Pointer is down; `last` is the previous stroke point, if any.
    Active { last: Option<Vec2> },
}

/// Persistent rake-stroke canvas.
///
/// Strokes accumulate until the surface is (re)initialised, which repaints
/// the paper and discards them.
pub struct InkCanvas {
    config: RakeConfig,
    gesture: Gesture,
    extent: Vec2,
    rng: SmallRng,
    strokes: u64,
}

impl InkCanvas {
    pub fn new(config: RakeConfig, seed: u64) -> Self {
        Self {
            config,
            gesture: Gesture::Idle,
            extent: Vec2::ZERO,
            rng: SmallRng::seed_from_u64(seed),
            strokes: 0,
        }
    }

    pub fn config(&self) -> &RakeConfig {
        &self.config
    }

    pub fn gesture(&self) -> Gesture {
        self.gesture
    }

    pub fn is_active(&self) -> bool {
        matches!(self.gesture, Gesture::Active { .. })
    }

    /// Segments drawn since the last initialisation.
    pub fn stroke_count(&self) -> u64 {
        self.strokes
    }

    /// Paint the paper: background fill plus scattered grain.
    ///
    /// Call after every surface (re)allocation; any gesture in progress keeps
    /// going but its next segment starts fresh.
    pub fn initialize<T: DrawTarget + ?Sized>(&mut self, extent: Vec2, target: &mut T) {
        self.extent = if extent.is_finite() {
            extent.max(Vec2::ZERO)
        } else {
            Vec2::ZERO
        };
        self.strokes = 0;
        if let Gesture::Active { last } = &mut self.gesture {
            *last = None;
        }

        target.set_blend(BlendMode::SourceOver);
        target.fill_rect(Vec2::ZERO, self.extent, self.config.paper);
        if self.extent.x <= 0.0 || self.extent.y <= 0.0 {
            return;
        }
        for _ in 0..self.config.grain_count {
            let at = Vec2::new(
                self.rng.random_range(0.0..self.extent.x),
                self.rng.random_range(0.0..self.extent.y),
            );
            target.fill_rect(at, Vec2::ONE, self.config.grain);
        }
    }

    pub fn pointer_down(&mut self, position: Vec2) {
        let last = position.is_finite().then_some(position);
        self.gesture = Gesture::Active { last };
    }

    /// Extend the active stroke to `position`. Returns whether anything was
    /// drawn.
    pub fn pointer_move<T: DrawTarget + ?Sized>(&mut self, position: Vec2, target: &mut T) -> bool {
        let Gesture::Active { last } = self.gesture else {
            return false;
        };
        if !position.is_finite() {
            return false;
        }
        self.gesture = Gesture::Active {
            last: Some(position),
        };
        let Some(from) = last else {
            return false;
        };

        target.set_blend(BlendMode::Multiply);
        target.stroke_line(from, position, &self.config.stroke);
        for (a, b) in self.teeth(from, position) {
            target.stroke_line(a, b, &self.config.stroke);
        }
        target.set_blend(BlendMode::SourceOver);
        self.strokes += 1;
        true
    }

    pub fn pointer_up(&mut self) {
        self.gesture = Gesture::Idle;
    }

    /// Leaving the surface ends the gesture just like releasing the button.
    pub fn pointer_leave(&mut self) {
        self.gesture = Gesture::Idle;
    }

    /// Offset segments drawn alongside the primary stroke, one per rake
    /// tooth (the centre tooth is waved but not shifted).
    pub fn teeth(&self, from: Vec2, to: Vec2) -> Vec<(Vec2, Vec2)> {
        let side = i64::from(self.config.teeth_per_side.min(MAX_TEETH_PER_SIDE));
        (-side..=side)
            .map(|i| {
                let dx = i as f32 * self.config.tooth_spacing;
                (self.tooth_point(from, dx), self.tooth_point(to, dx))
            })
            .collect()
    }

    fn tooth_point(&self, p: Vec2, dx: f32) -> Vec2 {
        let wave = (p.x * self.config.wave_frequency).sin() * self.config.wave_amplitude;
        Vec2::new(p.x + dx, p.y + wave)
    }
}
