#![allow(dead_code)]

use glam::Vec2;
use sumi_core::raster::{BlendMode, Color, DrawTarget, Stroke};
use sumi_core::surface::SurfaceBuffer;

/// One recorded drawing call.
#[derive(Clone, Debug, PartialEq)]
pub enum Op {
    Reallocate(SurfaceBuffer),
    Clear,
    Blend(BlendMode),
    Rect { origin: Vec2, size: Vec2, color: Color },
    Circle { center: Vec2, radius: f32, color: Color },
    Ellipse { center: Vec2, radii: Vec2, rotation: f32, color: Color },
    Line { from: Vec2, to: Vec2, stroke: Stroke },
}

/// `DrawTarget` that records every call instead of rasterising.
#[derive(Default)]
pub struct RecordingTarget {
    pub ops: Vec<Op>,
}

impl RecordingTarget {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn take(&mut self) -> Vec<Op> {
        std::mem::take(&mut self.ops)
    }

    pub fn count(&self, pred: impl Fn(&Op) -> bool) -> usize {
        self.ops.iter().filter(|op| pred(op)).count()
    }

    pub fn lines(&self) -> Vec<(Vec2, Vec2)> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                Op::Line { from, to, .. } => Some((*from, *to)),
                _ => None,
            })
            .collect()
    }

    pub fn circles(&self) -> Vec<(Vec2, f32, Color)> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                Op::Circle { center, radius, color } => Some((*center, *radius, *color)),
                _ => None,
            })
            .collect()
    }
}

impl DrawTarget for RecordingTarget {
    fn reallocate(&mut self, buffer: &SurfaceBuffer) {
        self.ops.push(Op::Reallocate(*buffer));
    }

    fn clear(&mut self) {
        self.ops.push(Op::Clear);
    }

    fn set_blend(&mut self, mode: BlendMode) {
        self.ops.push(Op::Blend(mode));
    }

    fn fill_rect(&mut self, origin: Vec2, size: Vec2, color: Color) {
        self.ops.push(Op::Rect { origin, size, color });
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color) {
        self.ops.push(Op::Circle { center, radius, color });
    }

    fn fill_ellipse(&mut self, center: Vec2, radii: Vec2, rotation: f32, color: Color) {
        self.ops.push(Op::Ellipse {
            center,
            radii,
            rotation,
            color,
        });
    }

    fn stroke_line(&mut self, from: Vec2, to: Vec2, stroke: &Stroke) {
        self.ops.push(Op::Line {
            from,
            to,
            stroke: *stroke,
        });
    }
}

pub const FRAME: f32 = 1.0 / 60.0;
