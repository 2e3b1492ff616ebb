use glam::Vec2;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::config::{PetalConfig, PhysicsConfig, TrailConfig};
use crate::forces::pointer::{compute_attraction, AttractionParams};
use crate::forces::wind::compute_wind;
use crate::math::{per_frame, reference_frames, REFERENCE_HZ};
use crate::particle::{Particle, Shape};
use crate::raster::{BlendMode, DrawTarget};

/// Which behaviour a [`ParticleSystem`] runs.
#[derive(Clone, Debug, PartialEq)]
pub enum Variant {
    /// Decaying ink dots spawned under the pointer.
    Trail(TrailConfig),
    /// Constant ambient petal population with wind, wrap-around and
    /// reseeding.
    Petals(PetalConfig),
}

/// Bounded, ordered particle store plus its per-frame physics.
///
/// Order is insertion order: overflow evicts from the front, so the oldest
/// particles go first.
pub struct ParticleSystem {
    variant: Variant,
    physics: PhysicsConfig,
    particles: Vec<Particle>,
    capacity: usize,
    /// Surface extent in CSS pixels; zero until the host sizes the surface.
    extent: Vec2,
    rng: SmallRng,
    /// Seconds simulated so far.
    time: f64,
    /// Seconds since the last reseeding pass.
    since_reseed: f32,
}

impl ParticleSystem {
    pub fn new(variant: Variant, seed: u64) -> Self {
        let physics = match &variant {
            Variant::Trail(c) => c.physics.clone(),
            Variant::Petals(c) => c.physics.clone(),
        };
        let capacity = physics.max_particles.max(1);
        Self {
            variant,
            physics,
            particles: Vec::with_capacity(capacity),
            capacity,
            extent: Vec2::ZERO,
            rng: SmallRng::seed_from_u64(seed),
            time: 0.0,
            since_reseed: 0.0,
        }
    }

    pub fn trail(config: TrailConfig, seed: u64) -> Self {
        Self::new(Variant::Trail(config), seed)
    }

    /// A petal field. Petals are scattered once the extent is known.
    pub fn petals(config: PetalConfig, seed: u64) -> Self {
        Self::new(Variant::Petals(config), seed)
    }

    pub fn variant(&self) -> &Variant {
        &self.variant
    }

    pub fn shape(&self) -> Shape {
        match self.variant {
            Variant::Trail(_) => Shape::Circle,
            Variant::Petals(_) => Shape::Petal,
        }
    }

    /// Whether particles lose life every step and get culled.
    pub fn decays(&self) -> bool {
        self.physics.decay < 1.0
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// The live particles as a flat `f32` buffer, [`Particle::FLOATS`] lanes
    /// per particle.
    pub fn as_floats(&self) -> &[f32] {
        bytemuck::cast_slice(&self.particles)
    }

    pub fn extent(&self) -> Vec2 {
        self.extent
    }

    /// Change the hard cap. Oldest particles are evicted immediately if the
    /// store is over the new cap.
    pub fn set_capacity(&mut self, capacity: usize) {
        self.capacity = capacity.max(1);
        self.evict_overflow();
    }

    /// Tell the system the surface's CSS extent (after initialise/resize).
    ///
    /// A petal field that is still empty is scattered across the new extent.
    pub fn set_extent(&mut self, extent: Vec2) {
        self.extent = if extent.is_finite() {
            extent.max(Vec2::ZERO)
        } else {
            Vec2::ZERO
        };
        if matches!(self.variant, Variant::Petals(_)) && self.particles.is_empty() {
            self.top_up();
        }
    }

    /// Append `n` fresh particles at (x, y), evicting the oldest beyond the
    /// cap.
    pub fn spawn(&mut self, x: f32, y: f32, n: usize) {
        let position = Vec2::new(x, y);
        if !position.is_finite() || n == 0 {
            return;
        }
        // Particles that would be evicted by this same call are never built.
        let n = n.min(self.capacity);
        for _ in 0..n {
            let particle = self.fresh_particle(position);
            self.particles.push(particle);
        }
        self.evict_overflow();
    }

    /// Advance the simulation by `dt` seconds with the pointer at `pointer`
    /// (surface-local pixels).
    pub fn step(&mut self, pointer: Vec2, dt: f32) {
        let frames = reference_frames(dt);
        if frames <= 0.0 {
            return;
        }
        let seconds = frames / REFERENCE_HZ;
        self.time += f64::from(seconds);

        let ctx = StepContext {
            frames,
            time: self.time,
            attraction: AttractionParams {
                position: pointer,
                coefficient: self.physics.attraction,
                radius: self.physics.attraction_radius,
            },
            damping: per_frame(self.physics.damping, frames),
            gravity: self.physics.gravity,
            decay: per_frame(self.physics.decay, frames),
            max_speed: self.physics.max_speed,
            wind: match &self.variant {
                Variant::Petals(c) => Some((c.wind, c.gust_frequency, c.flutter)),
                Variant::Trail(_) => None,
            },
        };

        // ==== 1. FORCES + INTEGRATION ====
        #[cfg(feature = "parallel")]
        self.particles
            .par_iter_mut()
            .for_each(|p| integrate(p, &ctx));
        #[cfg(not(feature = "parallel"))]
        self.particles.iter_mut().for_each(|p| integrate(p, &ctx));

        // ==== 2. PETALS: WRAP + RESEED ====
        if let Variant::Petals(config) = &self.variant {
            let interval = config.reseed_interval;
            let fraction = config.reseed_fraction;
            self.wrap_edges();
            self.since_reseed += seconds;
            if self.since_reseed >= interval {
                self.since_reseed = 0.0;
                self.reseed(fraction);
            }
            self.top_up();
        }
    }

    /// Drop decayed particles. Non-decaying variants are left alone.
    pub fn cull(&mut self) {
        if !self.decays() {
            return;
        }
        self.particles.retain(Particle::is_alive);
    }

    /// Draw every surviving particle with alpha derived from its life.
    pub fn render<T: DrawTarget + ?Sized>(&self, target: &mut T) {
        target.set_blend(BlendMode::SourceOver);
        match &self.variant {
            Variant::Trail(config) => {
                for p in &self.particles {
                    if !p.is_alive() {
                        continue;
                    }
                    let color = config.ink.with_alpha(config.ink.a * p.life);
                    target.fill_circle(p.position, p.size, color);
                }
            }
            Variant::Petals(config) => {
                for p in &self.particles {
                    let color = config.color.with_alpha(config.color.a * p.life);
                    let radii = Vec2::new(p.size * config.aspect, p.size);
                    target.fill_ellipse(p.position, radii, p.angle, color);
                }
            }
        }
    }

    /// Paint the start-of-frame background for this variant: a translucent
    /// wash for the trail (leaving ink ghosts behind), a hard clear for
    /// petals.
    pub fn begin_frame<T: DrawTarget + ?Sized>(&self, target: &mut T) {
        match &self.variant {
            Variant::Trail(config) => {
                target.set_blend(BlendMode::SourceOver);
                target.fill_rect(Vec2::ZERO, self.extent, config.wash);
            }
            Variant::Petals(_) => target.clear(),
        }
    }

    /// One full frame: background, step, cull, render.
    pub fn frame<T: DrawTarget + ?Sized>(&mut self, target: &mut T, pointer: Vec2, dt: f32) {
        self.begin_frame(target);
        self.step(pointer, dt);
        self.cull();
        self.render(target);
    }

    /// Remove every particle; a petal field is re-scattered.
    pub fn reset(&mut self) {
        self.particles.clear();
        self.since_reseed = 0.0;
        if matches!(self.variant, Variant::Petals(_)) {
            self.top_up();
        }
    }

    fn fresh_particle(&mut self, position: Vec2) -> Particle {
        match &self.variant {
            Variant::Trail(config) => {
                let half = config.spread * 0.5;
                let velocity = Vec2::new(
                    self.rng.random_range(-half..=half),
                    self.rng.random_range(-half..=half),
                );
                let size = sample(&mut self.rng, config.size_min, config.size_max);
                let mut p = Particle::new(position, velocity, size);
                p.hash = self.rng.random::<f32>();
                p
            }
            Variant::Petals(config) => {
                let velocity = Vec2::new(
                    self.rng.random_range(-0.25..=0.25),
                    self.rng.random_range(0.0..=0.5),
                );
                let size = sample(&mut self.rng, config.size_min, config.size_max);
                let mut p = Particle::new(position, velocity, size);
                p.angle = self.rng.random_range(0.0..std::f32::consts::TAU);
                let spin = sample(&mut self.rng, config.spin_min, config.spin_max);
                p.spin = if self.rng.random::<bool>() { spin } else { -spin };
                p.hash = self.rng.random::<f32>();
                p
            }
        }
    }

    fn evict_overflow(&mut self) {
        if self.particles.len() > self.capacity {
            let excess = self.particles.len() - self.capacity;
            self.particles.drain(..excess);
            log::trace!("evicted {excess} oldest particles");
        }
    }

    /// Wrap petals that drifted past an edge to the opposite side.
    fn wrap_edges(&mut self) {
        let extent = self.extent;
        if extent.x <= 0.0 || extent.y <= 0.0 {
            return;
        }
        for p in &mut self.particles {
            let margin = p.size * 3.0;
            let span = extent + Vec2::splat(margin * 2.0);
            if p.position.x < -margin {
                p.position.x += span.x;
            } else if p.position.x > extent.x + margin {
                p.position.x -= span.x;
            }
            if p.position.y < -margin {
                p.position.y += span.y;
            } else if p.position.y > extent.y + margin {
                p.position.y -= span.y;
            }
        }
    }

    /// Recycle the oldest `fraction` of petals as new ones entering from the
    /// top edge.
    fn reseed(&mut self, fraction: f32) {
        if self.extent.x <= 0.0 || self.extent.y <= 0.0 {
            return;
        }
        let recycled = ((self.particles.len() as f32) * fraction).round() as usize;
        let recycled = recycled.min(self.particles.len());
        if recycled == 0 {
            return;
        }
        self.particles.drain(..recycled);
        for _ in 0..recycled {
            let x = self.rng.random_range(0.0..=self.extent.x);
            let mut p = self.fresh_particle(Vec2::new(x, 0.0));
            p.position.y = -p.size * 3.0;
            self.particles.push(p);
        }
        log::trace!("reseeded {recycled} petals");
    }

    /// Scatter petals over the whole surface until the ambient count is met.
    fn top_up(&mut self) {
        let Variant::Petals(config) = &self.variant else {
            return;
        };
        if self.extent.x <= 0.0 || self.extent.y <= 0.0 {
            return;
        }
        let target = config.count.min(self.capacity);
        while self.particles.len() < target {
            let position = Vec2::new(
                self.rng.random_range(0.0..=self.extent.x),
                self.rng.random_range(0.0..=self.extent.y),
            );
            let p = self.fresh_particle(position);
            self.particles.push(p);
        }
    }
}

/// Snapshot of everything [`integrate`] needs, shared read-only across
/// particles.
struct StepContext {
    frames: f32,
    time: f64,
    attraction: AttractionParams,
    /// Damping over this step.
    damping: f32,
    gravity: f32,
    /// Life multiplier over this step.
    decay: f32,
    max_speed: f32,
    /// (strength, gust frequency, flutter) for petals.
    wind: Option<(f32, f32, f32)>,
}

/// Apply forces, integrate and decay one particle (semi-implicit Euler in
/// reference-frame units).
fn integrate(p: &mut Particle, ctx: &StepContext) {
    let mut acc = compute_attraction(p.position, &ctx.attraction);
    acc.y += ctx.gravity;
    if let Some((wind, gust_frequency, flutter)) = ctx.wind {
        acc += compute_wind(p.position, p.hash, ctx.time, wind, gust_frequency, flutter);
    }

    let mut vel = (p.velocity + acc * ctx.frames) * ctx.damping;
    let speed = vel.length();
    if speed > ctx.max_speed {
        vel = vel / speed * ctx.max_speed;
    }
    if !vel.is_finite() {
        vel = Vec2::ZERO;
    }

    p.velocity = vel;
    p.position += vel * ctx.frames;
    p.angle = (p.angle + p.spin * ctx.frames) % std::f32::consts::TAU;
    p.life = (p.life * ctx.decay).min(1.0);
}

/// Uniform sample in `[min, max)`, or `min` for an empty range.
fn sample(rng: &mut SmallRng, min: f32, max: f32) -> f32 {
    if max > min {
        rng.random_range(min..max)
    } else {
        min
    }
}
