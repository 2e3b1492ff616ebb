use glam::Vec2;

/// Life below which a decaying particle is culled.
pub const LIFE_THRESHOLD: f32 = 0.05;

/// One simulated particle: 36 bytes, plain `f32`s so the live slice can be
/// handed to JavaScript as a `Float32Array` view.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Particle {
    /// Surface-local CSS pixels.
    pub position: Vec2,
    /// CSS pixels per reference frame.
    pub velocity: Vec2,
    /// In (0, 1]; decays multiplicatively for decaying variants.
    pub life: f32,
    pub size: f32,
    /// Rotation in radians (petals only).
    pub angle: f32,
    /// Radians per reference frame (petals only).
    pub spin: f32,
    /// Per-particle random phase in [0, 1).
    pub hash: f32,
}

impl Particle {
    pub fn new(position: Vec2, velocity: Vec2, size: f32) -> Self {
        Self {
            position,
            velocity,
            life: 1.0,
            size,
            angle: 0.0,
            spin: 0.0,
            hash: 0.0,
        }
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.life >= LIFE_THRESHOLD
    }

    /// Number of `f32` lanes per particle in the exported buffer.
    pub const FLOATS: usize = std::mem::size_of::<Particle>() / std::mem::size_of::<f32>();
}

/// Shape each variant renders its particles as.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Shape {
    Circle,
    /// Ellipse elongated along the particle's angle.
    Petal,
}
