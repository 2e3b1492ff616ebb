use glam::Vec2;

use crate::surface::SurfaceBuffer;

/// 8-bit RGB with a straight (non-premultiplied) alpha in [0,1].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Color {
    pub const BLACK: Color = Color::rgba(0, 0, 0, 1.0);
    pub const WHITE: Color = Color::rgba(255, 255, 255, 1.0);
    pub const TRANSPARENT: Color = Color::rgba(0, 0, 0, 0.0);

    pub const fn rgba(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Same colour with a different alpha, clamped to [0,1].
    pub fn with_alpha(self, a: f32) -> Self {
        let a = if a.is_finite() { a.clamp(0.0, 1.0) } else { 0.0 };
        Self { a, ..self }
    }

    /// CSS `rgba()` notation, as accepted by `fillStyle`/`strokeStyle`.
    pub fn css(&self) -> String {
        format!("rgba({},{},{},{})", self.r, self.g, self.b, self.a)
    }
}

/// Compositing operator for subsequent fills and strokes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum BlendMode {
    /// Standard source-over alpha blending.
    #[default]
    SourceOver,
    /// Darkens on overlap: backdrop × source, weighted by source alpha.
    Multiply,
}

impl BlendMode {
    /// Name used by `globalCompositeOperation`.
    pub fn css(&self) -> &'static str {
        match self {
            BlendMode::SourceOver => "source-over",
            BlendMode::Multiply => "multiply",
        }
    }
}

/// Line style for [`DrawTarget::stroke_line`]. Caps are always round.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Stroke {
    pub width: f32,
    pub color: Color,
}

/// A 2D raster target addressed in CSS pixels.
///
/// Mirrors the subset of `CanvasRenderingContext2d` the engine needs. After
/// [`DrawTarget::reallocate`] one drawing unit is one CSS pixel, whatever the
/// device pixel ratio.
pub trait DrawTarget {
    /// Resize the backing store to `buffer`'s device size and install the
    /// CSS-to-device scale. Discards existing content.
    fn reallocate(&mut self, buffer: &SurfaceBuffer);
    /// Erase everything to transparent.
    fn clear(&mut self);
    fn set_blend(&mut self, mode: BlendMode);
    fn fill_rect(&mut self, origin: Vec2, size: Vec2, color: Color);
    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color);
    /// Filled ellipse with semi-axes `radii`, rotated by `rotation` radians.
    fn fill_ellipse(&mut self, center: Vec2, radii: Vec2, rotation: f32, color: Color);
    fn stroke_line(&mut self, from: Vec2, to: Vec2, stroke: &Stroke);
}

/// Software RGBA8 surface implementing [`DrawTarget`].
///
/// Used as the headless render target: a pixel is covered when its centre
/// falls inside the shape, no anti-aliasing.
pub struct PixelSurface {
    width: u32,
    height: u32,
    scale: f32,
    blend: BlendMode,
    pixels: Vec<u8>,
}

impl PixelSurface {
    pub fn new() -> Self {
        Self {
            width: 0,
            height: 0,
            scale: 1.0,
            blend: BlendMode::SourceOver,
            pixels: Vec::new(),
        }
    }

    pub fn from_buffer(buffer: &SurfaceBuffer) -> Self {
        let mut surface = Self::new();
        surface.reallocate(buffer);
        surface
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// CSS-to-device scale currently installed.
    #[inline]
    pub fn scale(&self) -> f32 {
        self.scale
    }

    /// Raw RGBA bytes, row-major, ready for `ImageData`.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// RGBA of the device pixel at (x, y), or `None` outside the buffer.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = self.pixel_index(x, y);
        let mut out = [0u8; 4];
        out.copy_from_slice(&self.pixels[idx..idx + 4]);
        Some(out)
    }

    /// RGBA at a CSS-pixel position.
    pub fn pixel_at_css(&self, point: Vec2) -> Option<[u8; 4]> {
        let device = point * self.scale;
        if device.x < 0.0 || device.y < 0.0 {
            return None;
        }
        self.pixel(device.x as u32, device.y as u32)
    }

    #[inline]
    fn pixel_index(&self, x: u32, y: u32) -> usize {
        ((y as usize) * (self.width as usize) + x as usize) * 4
    }

    /// Device-pixel range covering CSS span `[min, max]` along one axis.
    fn device_span(&self, min: f32, max: f32, limit: u32) -> (u32, u32) {
        let lo = (min * self.scale).floor().max(0.0);
        let hi = (max * self.scale).ceil().min(limit as f32);
        if !(lo < hi) {
            return (0, 0);
        }
        (lo as u32, hi as u32)
    }

    /// Blend `color` into every device pixel whose centre (in CSS units)
    /// satisfies `inside`, scanning only the CSS bounding box `[min, max]`.
    fn fill_where<F>(&mut self, min: Vec2, max: Vec2, color: Color, inside: F)
    where
        F: Fn(Vec2) -> bool,
    {
        if color.a <= 0.0 || self.pixels.is_empty() {
            return;
        }
        let (x0, x1) = self.device_span(min.x, max.x, self.width);
        let (y0, y1) = self.device_span(min.y, max.y, self.height);
        let inv = 1.0 / self.scale;
        for y in y0..y1 {
            for x in x0..x1 {
                let centre = Vec2::new(x as f32 + 0.5, y as f32 + 0.5) * inv;
                if inside(centre) {
                    let idx = self.pixel_index(x, y);
                    blend_pixel(&mut self.pixels[idx..idx + 4], color, self.blend);
                }
            }
        }
    }
}

impl Default for PixelSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl DrawTarget for PixelSurface {
    fn reallocate(&mut self, buffer: &SurfaceBuffer) {
        self.width = buffer.device_width;
        self.height = buffer.device_height;
        self.scale = buffer.pixel_ratio;
        self.blend = BlendMode::SourceOver;
        self.pixels = vec![0; buffer.pixel_count() * 4];
    }

    fn clear(&mut self) {
        self.pixels.fill(0);
    }

    fn set_blend(&mut self, mode: BlendMode) {
        self.blend = mode;
    }

    fn fill_rect(&mut self, origin: Vec2, size: Vec2, color: Color) {
        let min = origin.min(origin + size);
        let max = origin.max(origin + size);
        self.fill_where(min, max, color, |p| {
            p.x >= min.x && p.x < max.x && p.y >= min.y && p.y < max.y
        });
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color) {
        if !(radius > 0.0) {
            return;
        }
        let r2 = radius * radius;
        let extent = Vec2::splat(radius);
        self.fill_where(center - extent, center + extent, color, |p| {
            p.distance_squared(center) <= r2
        });
    }

    fn fill_ellipse(&mut self, center: Vec2, radii: Vec2, rotation: f32, color: Color) {
        if !(radii.x > 0.0 && radii.y > 0.0) {
            return;
        }
        let (sin, cos) = rotation.sin_cos();
        let extent = Vec2::splat(radii.x.max(radii.y));
        self.fill_where(center - extent, center + extent, color, |p| {
            let d = p - center;
            // Rotate into the ellipse frame.
            let local = Vec2::new(d.x * cos + d.y * sin, -d.x * sin + d.y * cos);
            let n = local / radii;
            n.length_squared() <= 1.0
        });
    }

    fn stroke_line(&mut self, from: Vec2, to: Vec2, stroke: &Stroke) {
        let half = stroke.width * 0.5;
        if !(half > 0.0) {
            return;
        }
        let extent = Vec2::splat(half);
        let min = from.min(to) - extent;
        let max = from.max(to) + extent;
        let h2 = half * half;
        self.fill_where(min, max, stroke.color, |p| {
            distance_squared_to_segment(p, from, to) <= h2
        });
    }
}

/// Squared distance from `p` to the segment `[a, b]`.
pub fn distance_squared_to_segment(p: Vec2, a: Vec2, b: Vec2) -> f32 {
    let ab = b - a;
    let len2 = ab.length_squared();
    if len2 <= f32::EPSILON {
        return p.distance_squared(a);
    }
    let t = ((p - a).dot(ab) / len2).clamp(0.0, 1.0);
    p.distance_squared(a + ab * t)
}

/// Composite `color` onto one RGBA8 pixel.
fn blend_pixel(dst: &mut [u8], color: Color, mode: BlendMode) {
    let sa = color.a.clamp(0.0, 1.0);
    let da = dst[3] as f32 / 255.0;
    let src = [color.r, color.g, color.b];

    let out_a = sa + da * (1.0 - sa);
    if out_a <= 0.0 {
        dst.fill(0);
        return;
    }
    for c in 0..3 {
        let cs = src[c] as f32 / 255.0;
        let cb = dst[c] as f32 / 255.0;
        // Source colour after mixing with the backdrop (W3C compositing).
        let mixed = match mode {
            BlendMode::SourceOver => cs,
            BlendMode::Multiply => (1.0 - da) * cs + da * cs * cb,
        };
        let out = (mixed * sa + cb * da * (1.0 - sa)) / out_a;
        dst[c] = (out * 255.0).round().clamp(0.0, 255.0) as u8;
    }
    dst[3] = (out_a * 255.0).round().clamp(0.0, 255.0) as u8;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_over_onto_transparent_keeps_source() {
        let mut px = [0u8; 4];
        blend_pixel(&mut px, Color::rgba(10, 20, 30, 1.0), BlendMode::SourceOver);
        assert_eq!(px, [10, 20, 30, 255]);
    }

    #[test]
    fn test_multiply_darkens_and_accumulates() {
        let mut px = [255, 255, 255, 255];
        let ink = Color::rgba(0, 0, 0, 0.6);
        blend_pixel(&mut px, ink, BlendMode::Multiply);
        let once = px[0];
        assert!(once < 255);
        blend_pixel(&mut px, ink, BlendMode::Multiply);
        assert!(px[0] < once, "second pass should be darker: {} vs {}", px[0], once);
        assert_eq!(px[3], 255);
    }

    #[test]
    fn test_segment_distance_handles_degenerate_segment() {
        let d = distance_squared_to_segment(Vec2::new(3.0, 4.0), Vec2::ZERO, Vec2::ZERO);
        assert!((d - 25.0).abs() < 1e-5);
    }
}
