use glam::Vec2;

use crate::config::HighlightConfig;
use crate::input::PointerSample;
use crate::math::{approach, reference_frames};

/// Unit the highlight centre is published in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HighlightMode {
    /// Percent of the reference element, `u × 100`.
    Percent,
    /// Pixels from the reference element's top-left corner.
    Pixels,
}

/// Values for the `--mx` / `--my` custom properties.
#[derive(Clone, Debug, PartialEq)]
pub struct HighlightProps {
    pub mx: String,
    pub my: String,
}

/// Pointer-following centre for a radial-gradient highlight.
pub struct RadialHighlight {
    config: HighlightConfig,
    target: Vec2,
    current: Vec2,
}

impl RadialHighlight {
    /// Starts centred (50 %) in percent mode, at the origin in pixel mode.
    pub fn new(config: HighlightConfig) -> Self {
        let start = match config.mode {
            HighlightMode::Percent => Vec2::splat(50.0),
            HighlightMode::Pixels => Vec2::ZERO,
        };
        Self {
            config,
            target: start,
            current: start,
        }
    }

    pub fn mode(&self) -> HighlightMode {
        self.config.mode
    }

    /// Whether `step` is needed to reach the pointer.
    pub fn eases(&self) -> bool {
        self.config.follow_rate.is_some()
    }

    pub fn update(&mut self, sample: PointerSample) {
        if !sample.is_finite() {
            return;
        }
        self.target = match self.config.mode {
            HighlightMode::Percent => sample.normalized * 100.0,
            HighlightMode::Pixels => sample.local,
        };
        if !self.eases() {
            self.current = self.target;
        }
    }

    /// Ease toward the target. Returns whether the centre moved.
    pub fn step(&mut self, dt: f32) -> bool {
        let Some(rate) = self.config.follow_rate else {
            return false;
        };
        let before = self.current;
        let t = approach(rate, reference_frames(dt));
        self.current += (self.target - self.current) * t;
        if self.current.distance_squared(self.target) < 1e-4 {
            self.current = self.target;
        }
        self.current != before
    }

    pub fn position(&self) -> Vec2 {
        self.current
    }

    pub fn target(&self) -> Vec2 {
        self.target
    }

    pub fn props(&self) -> HighlightProps {
        let unit = match self.config.mode {
            HighlightMode::Percent => "%",
            HighlightMode::Pixels => "px",
        };
        HighlightProps {
            mx: format!("{:.2}{unit}", self.current.x),
            my: format!("{:.2}{unit}", self.current.y),
        }
    }
}
