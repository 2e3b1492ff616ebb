use std::f64::consts::TAU;

use glam::Vec2;
use sumi_core::raster::{BlendMode, Color, DrawTarget, Stroke};
use sumi_core::surface::SurfaceBuffer;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::error::MountError;

/// [`DrawTarget`] over a `<canvas>` 2d context.
pub struct CanvasTarget {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    /// CSS extent of the current backing buffer.
    extent: Vec2,
}

impl CanvasTarget {
    pub fn new(canvas: HtmlCanvasElement, id: &str) -> Result<Self, MountError> {
        let ctx = canvas
            .get_context("2d")
            .ok()
            .flatten()
            .and_then(|ctx| ctx.dyn_into::<CanvasRenderingContext2d>().ok())
            .ok_or_else(|| MountError::NoContext(id.to_owned()))?;
        Ok(Self {
            canvas,
            ctx,
            extent: Vec2::ZERO,
        })
    }
}

fn warn_on_err(op: &str, result: Result<(), JsValue>) {
    if let Err(err) = result {
        log::warn!("canvas {op} failed: {err:?}");
    }
}

impl DrawTarget for CanvasTarget {
    fn reallocate(&mut self, buffer: &SurfaceBuffer) {
        // Resizing the element's buffer also resets the context state.
        self.canvas.set_width(buffer.device_width);
        self.canvas.set_height(buffer.device_height);
        let dpr = buffer.pixel_ratio as f64;
        warn_on_err("setTransform", self.ctx.set_transform(dpr, 0.0, 0.0, dpr, 0.0, 0.0));
        self.ctx.set_line_cap("round");
        self.extent = buffer.css_size();
    }

    fn clear(&mut self) {
        self.ctx
            .clear_rect(0.0, 0.0, self.extent.x as f64, self.extent.y as f64);
    }

    fn set_blend(&mut self, mode: BlendMode) {
        warn_on_err(
            "globalCompositeOperation",
            self.ctx.set_global_composite_operation(mode.css()),
        );
    }

    fn fill_rect(&mut self, origin: Vec2, size: Vec2, color: Color) {
        self.ctx.set_fill_style_str(&color.css());
        self.ctx
            .fill_rect(origin.x as f64, origin.y as f64, size.x as f64, size.y as f64);
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color) {
        if !(radius > 0.0) {
            return;
        }
        self.ctx.set_fill_style_str(&color.css());
        self.ctx.begin_path();
        warn_on_err(
            "arc",
            self.ctx
                .arc(center.x as f64, center.y as f64, radius as f64, 0.0, TAU),
        );
        self.ctx.fill();
    }

    fn fill_ellipse(&mut self, center: Vec2, radii: Vec2, rotation: f32, color: Color) {
        if !(radii.x > 0.0 && radii.y > 0.0) {
            return;
        }
        self.ctx.set_fill_style_str(&color.css());
        self.ctx.begin_path();
        warn_on_err(
            "ellipse",
            self.ctx.ellipse(
                center.x as f64,
                center.y as f64,
                radii.x as f64,
                radii.y as f64,
                rotation as f64,
                0.0,
                TAU,
            ),
        );
        self.ctx.fill();
    }

    fn stroke_line(&mut self, from: Vec2, to: Vec2, stroke: &Stroke) {
        self.ctx.set_stroke_style_str(&stroke.color.css());
        self.ctx.set_line_width(stroke.width as f64);
        self.ctx.set_line_cap("round");
        self.ctx.begin_path();
        self.ctx.move_to(from.x as f64, from.y as f64);
        self.ctx.line_to(to.x as f64, to.y as f64);
        self.ctx.stroke();
    }
}
