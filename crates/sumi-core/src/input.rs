use std::cell::Cell;
use std::rc::Rc;

use glam::Vec2;

use crate::math::safe_ratio;

/// A reference element's bounding box in viewport (client) coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl Bounds {
    pub fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Bounds anchored at the viewport origin, for viewport-relative tracking.
    pub fn viewport(width: f32, height: f32) -> Self {
        Self::new(0.0, 0.0, width, height)
    }
}

/// Latest pointer position relative to a reference element.
///
/// `local` is in CSS pixels from the element's top-left corner and is NOT
/// clamped: it goes negative or past the element size while the pointer is
/// outside. `normalized` is `local / size` per axis; an axis with zero extent
/// normalises to 0.5.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerSample {
    pub local: Vec2,
    pub normalized: Vec2,
}

impl Default for PointerSample {
    fn default() -> Self {
        Self {
            local: Vec2::ZERO,
            normalized: Vec2::splat(0.5),
        }
    }
}

impl PointerSample {
    pub fn from_client(client: Vec2, bounds: Bounds) -> Self {
        let local = client - Vec2::new(bounds.left, bounds.top);
        let normalized = Vec2::new(
            safe_ratio(local.x, bounds.width, 0.5),
            safe_ratio(local.y, bounds.height, 0.5),
        );
        Self { local, normalized }
    }

    pub fn is_finite(&self) -> bool {
        self.local.is_finite() && self.normalized.is_finite()
    }
}

/// Shared latest-value cell between one surface's input handler (writer)
/// and its frame tick (reader). Never blocks, never queues.
#[derive(Clone, Debug, Default)]
pub struct PointerCell(Rc<Cell<PointerSample>>);

impl PointerCell {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn latest(&self) -> PointerSample {
        self.0.get()
    }

    #[inline]
    pub fn write(&self, sample: PointerSample) {
        self.0.set(sample);
    }
}

/// Normalises raw client coordinates and publishes them to a [`PointerCell`].
#[derive(Debug, Default)]
pub struct PointerTracker {
    cell: PointerCell,
    moves: u64,
}

impl PointerTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a pointer move. Non-finite input is dropped and the previous
    /// sample kept.
    pub fn on_pointer_move(&mut self, client: Vec2, bounds: Bounds) -> PointerSample {
        let sample = PointerSample::from_client(client, bounds);
        if sample.is_finite() {
            self.cell.write(sample);
            self.moves += 1;
        }
        self.cell.latest()
    }

    pub fn latest(&self) -> PointerSample {
        self.cell.latest()
    }

    /// Reader handle for the frame tick.
    pub fn cell(&self) -> PointerCell {
        self.cell.clone()
    }

    /// Number of accepted move events.
    pub fn moves(&self) -> u64 {
        self.moves
    }
}
