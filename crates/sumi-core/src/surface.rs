use glam::Vec2;

use crate::error::SurfaceError;
use crate::raster::DrawTarget;

/// Largest backing-buffer side, in device pixels.
pub const MAX_DEVICE_SIDE: u32 = 8192;

/// An element's layout box in CSS pixels plus the display density.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Layout {
    pub css_width: f32,
    pub css_height: f32,
    pub pixel_ratio: f32,
}

impl Layout {
    pub fn new(css_width: f32, css_height: f32, pixel_ratio: f32) -> Self {
        Self {
            css_width,
            css_height,
            pixel_ratio,
        }
    }
}

/// Backing store dimensions for one drawable surface.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SurfaceBuffer {
    pub css_width: f32,
    pub css_height: f32,
    pub pixel_ratio: f32,
    pub device_width: u32,
    pub device_height: u32,
}

impl SurfaceBuffer {
    /// Size a buffer for `layout`: device size is `round(css × dpr)` per axis.
    pub fn from_layout(layout: Layout) -> Result<Self, SurfaceError> {
        let Layout {
            css_width,
            css_height,
            pixel_ratio,
        } = layout;
        if !pixel_ratio.is_finite() || pixel_ratio <= 0.0 {
            return Err(SurfaceError::InvalidPixelRatio(pixel_ratio));
        }
        if !css_width.is_finite() || !css_height.is_finite() || css_width < 0.0 || css_height < 0.0 {
            return Err(SurfaceError::InvalidLayout {
                width: css_width,
                height: css_height,
            });
        }
        let device_width = device_side(css_width, pixel_ratio);
        let device_height = device_side(css_height, pixel_ratio);
        if device_width > MAX_DEVICE_SIDE || device_height > MAX_DEVICE_SIDE {
            return Err(SurfaceError::TooLarge {
                width: device_width,
                height: device_height,
                max: MAX_DEVICE_SIDE,
            });
        }
        Ok(Self {
            css_width,
            css_height,
            pixel_ratio,
            device_width,
            device_height,
        })
    }

    /// Drawing-space extent (CSS pixels).
    pub fn css_size(&self) -> Vec2 {
        Vec2::new(self.css_width, self.css_height)
    }

    pub fn pixel_count(&self) -> usize {
        self.device_width as usize * self.device_height as usize
    }

    pub fn is_empty(&self) -> bool {
        self.device_width == 0 || self.device_height == 0
    }
}

fn device_side(css: f32, pixel_ratio: f32) -> u32 {
    let side = (css * pixel_ratio).round();
    if side >= u32::MAX as f32 {
        u32::MAX
    } else {
        side as u32
    }
}

/// What a sizing call did to the backing store.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SurfaceChange {
    /// First allocation.
    Allocated,
    /// Existing content was discarded and the buffer rebuilt.
    Reallocated,
    /// Same layout and density; nothing touched.
    Unchanged,
}

impl SurfaceChange {
    /// Whether previous content is gone and base content must be repainted.
    pub fn is_fresh(&self) -> bool {
        !matches!(self, SurfaceChange::Unchanged)
    }
}

/// Owns the sizing of one surface's backing buffer.
#[derive(Debug, Default)]
pub struct SurfaceController {
    buffer: Option<SurfaceBuffer>,
}

impl SurfaceController {
    pub fn new() -> Self {
        Self { buffer: None }
    }

    /// Size the buffer for `layout` and install the CSS-pixel transform on
    /// `target`. Always rebuilds, destroying previous content.
    pub fn initialize<T: DrawTarget + ?Sized>(
        &mut self,
        layout: Layout,
        target: &mut T,
    ) -> Result<SurfaceChange, SurfaceError> {
        let buffer = SurfaceBuffer::from_layout(layout)?;
        let change = if self.buffer.is_some() {
            SurfaceChange::Reallocated
        } else {
            SurfaceChange::Allocated
        };
        self.install(buffer, target);
        Ok(change)
    }

    /// Re-run sizing after a resize notification. A layout that maps to the
    /// same buffer leaves the target untouched.
    pub fn on_resize<T: DrawTarget + ?Sized>(
        &mut self,
        layout: Layout,
        target: &mut T,
    ) -> Result<SurfaceChange, SurfaceError> {
        let buffer = SurfaceBuffer::from_layout(layout)?;
        match self.buffer {
            Some(current) if current == buffer => Ok(SurfaceChange::Unchanged),
            Some(_) => {
                self.install(buffer, target);
                Ok(SurfaceChange::Reallocated)
            }
            None => {
                self.install(buffer, target);
                Ok(SurfaceChange::Allocated)
            }
        }
    }

    /// Forget the buffer on unmount.
    pub fn release(&mut self) {
        self.buffer = None;
    }

    pub fn buffer(&self) -> Option<&SurfaceBuffer> {
        self.buffer.as_ref()
    }

    /// CSS extent of the current buffer, zero before initialisation.
    pub fn css_size(&self) -> Vec2 {
        self.buffer.map(|b| b.css_size()).unwrap_or(Vec2::ZERO)
    }

    fn install<T: DrawTarget + ?Sized>(&mut self, buffer: SurfaceBuffer, target: &mut T) {
        log::debug!(
            "surface {}x{} css @ {}x -> {}x{} device",
            buffer.css_width,
            buffer.css_height,
            buffer.pixel_ratio,
            buffer.device_width,
            buffer.device_height
        );
        target.reallocate(&buffer);
        self.buffer = Some(buffer);
    }
}
