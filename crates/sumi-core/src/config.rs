use crate::error::ConfigError;
use crate::highlight::HighlightMode;
use crate::raster::{Color, Stroke};

/// Per-frame physics constants, tuned for a 60 Hz refresh and scaled by
/// elapsed time at step time.
#[derive(Clone, Debug, PartialEq)]
pub struct PhysicsConfig {
    /// Pull toward the pointer, per reference frame², per pixel of distance.
    pub attraction: f32,
    /// Falloff radius for the pointer pull; `f32::INFINITY` pulls everywhere.
    pub attraction_radius: f32,
    /// Velocity multiplier per reference frame.
    pub damping: f32,
    /// Downward bias, pixels per reference frame².
    pub gravity: f32,
    /// Life multiplier per reference frame; 1.0 disables decay.
    pub decay: f32,
    /// Hard cap on live particles.
    pub max_particles: usize,
    /// Speed cap, pixels per reference frame.
    pub max_speed: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            attraction: 0.0008,
            attraction_radius: f32::INFINITY,
            damping: 0.99,
            gravity: 0.0,
            decay: 0.985,
            max_particles: 400,
            max_speed: 40.0,
        }
    }
}

impl PhysicsConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        // Anything near 0.5 px/frame² per px overshoots the pointer.
        check_range("attraction", self.attraction, 0.0, 0.05)?;
        if !(self.attraction_radius > 0.0) {
            return Err(ConfigError::OutOfRange {
                field: "attraction_radius",
                value: self.attraction_radius,
                min: f32::MIN_POSITIVE,
                max: f32::INFINITY,
            });
        }
        check_range("damping", self.damping, 0.5, 1.0)?;
        check_range("gravity", self.gravity, -1.0, 1.0)?;
        check_range("decay", self.decay, 0.5, 1.0)?;
        check_range("max_speed", self.max_speed, 0.0, 1000.0)?;
        check_nonzero("max_particles", self.max_particles)
    }
}

/// Ambient ink trail: bursts of decaying dots spawned on every pointer move.
#[derive(Clone, Debug, PartialEq)]
pub struct TrailConfig {
    pub physics: PhysicsConfig,
    /// Particles spawned per pointer move.
    pub burst: usize,
    /// Width of the uniform initial velocity range per axis.
    pub spread: f32,
    pub size_min: f32,
    pub size_max: f32,
    /// Ink colour; its alpha is the alpha of a fresh particle.
    pub ink: Color,
    /// Translucent wash painted over the surface at the start of each frame.
    pub wash: Color,
}

impl Default for TrailConfig {
    fn default() -> Self {
        Self {
            physics: PhysicsConfig::default(),
            burst: 4,
            spread: 0.6,
            size_min: 1.0,
            size_max: 3.0,
            ink: Color::rgba(0, 0, 0, 0.6),
            wash: Color::rgba(255, 255, 255, 0.4),
        }
    }
}

impl TrailConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.physics.validate()?;
        check_range("spread", self.spread, 0.0, 100.0)?;
        check_sizes(self.size_min, self.size_max)
    }
}

/// Wind-blown petal field: a constant ambient population that never decays.
#[derive(Clone, Debug, PartialEq)]
pub struct PetalConfig {
    pub physics: PhysicsConfig,
    /// Ambient population kept alive by reseeding.
    pub count: usize,
    /// Horizontal gust strength, pixels per reference frame².
    pub wind: f32,
    /// Angular frequency of the gust cycle, radians per second.
    pub gust_frequency: f32,
    /// Vertical flutter strength, pixels per reference frame².
    pub flutter: f32,
    /// Spin range, radians per reference frame.
    pub spin_min: f32,
    pub spin_max: f32,
    pub size_min: f32,
    pub size_max: f32,
    /// Long-axis to short-axis ratio of the rendered ellipse.
    pub aspect: f32,
    pub color: Color,
    /// Seconds between reseeding passes.
    pub reseed_interval: f32,
    /// Fraction of the population recycled per reseeding pass.
    pub reseed_fraction: f32,
}

impl Default for PetalConfig {
    fn default() -> Self {
        Self {
            physics: PhysicsConfig {
                attraction: 0.0005,
                attraction_radius: 160.0,
                damping: 0.99,
                gravity: 0.02,
                decay: 1.0,
                max_particles: 300,
                max_speed: 12.0,
            },
            count: 300,
            wind: 0.012,
            gust_frequency: 0.35,
            flutter: 0.01,
            spin_min: 0.025,
            spin_max: 0.125,
            size_min: 2.0,
            size_max: 4.5,
            aspect: 2.5,
            color: Color::rgba(0, 0, 0, 0.35),
            reseed_interval: 6.0,
            reseed_fraction: 0.05,
        }
    }
}

impl PetalConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.physics.validate()?;
        check_nonzero("count", self.count)?;
        if self.count > self.physics.max_particles {
            return Err(ConfigError::OutOfRange {
                field: "count",
                value: self.count as f32,
                min: 1.0,
                max: self.physics.max_particles as f32,
            });
        }
        check_range("wind", self.wind, -1.0, 1.0)?;
        check_range("gust_frequency", self.gust_frequency, 0.0, 100.0)?;
        check_range("flutter", self.flutter, 0.0, 1.0)?;
        check_range("spin_max", self.spin_max, 0.0, 1.0)?;
        check_range("spin_min", self.spin_min, 0.0, self.spin_max)?;
        check_range("aspect", self.aspect, 1.0, 20.0)?;
        check_range("reseed_interval", self.reseed_interval, 0.1, 3600.0)?;
        check_range("reseed_fraction", self.reseed_fraction, 0.0, 1.0)?;
        check_sizes(self.size_min, self.size_max)
    }
}

/// Widest rake accepted by [`RakeConfig::validate`].
pub const MAX_TEETH_PER_SIDE: u32 = 16;

/// Zen-garden rake: stroke style, tooth layout and paper texture.
#[derive(Clone, Debug, PartialEq)]
pub struct RakeConfig {
    pub stroke: Stroke,
    /// Teeth either side of the centre tooth; `1` gives three teeth.
    pub teeth_per_side: u32,
    /// Horizontal spacing between teeth, CSS pixels.
    pub tooth_spacing: f32,
    /// Radians per pixel of x for the vertical tooth wave.
    pub wave_frequency: f32,
    pub wave_amplitude: f32,
    pub paper: Color,
    /// Grain dots scattered on (re)initialisation.
    pub grain_count: usize,
    pub grain: Color,
}

impl Default for RakeConfig {
    fn default() -> Self {
        Self {
            stroke: Stroke {
                width: 8.0,
                color: Color::rgba(0, 0, 0, 0.6),
            },
            teeth_per_side: 1,
            tooth_spacing: 12.0,
            wave_frequency: 0.05,
            wave_amplitude: 3.0,
            paper: Color::WHITE,
            grain_count: 120,
            grain: Color::rgba(0, 0, 0, 0.02),
        }
    }
}

impl RakeConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_range("stroke.width", self.stroke.width, 0.1, 256.0)?;
        check_range(
            "teeth_per_side",
            self.teeth_per_side as f32,
            0.0,
            MAX_TEETH_PER_SIDE as f32,
        )?;
        check_range("tooth_spacing", self.tooth_spacing, 0.0, 256.0)?;
        check_range("wave_frequency", self.wave_frequency, 0.0, 10.0)?;
        check_range("wave_amplitude", self.wave_amplitude, 0.0, 256.0)
    }

    /// Offset strokes drawn alongside each primary segment. Unvalidated
    /// configs are capped at [`MAX_TEETH_PER_SIDE`].
    pub fn tooth_count(&self) -> usize {
        self.teeth_per_side.min(MAX_TEETH_PER_SIDE) as usize * 2 + 1
    }
}

/// Card tilt response.
#[derive(Clone, Debug, PartialEq)]
pub struct TiltConfig {
    /// Peak rotation either way, degrees.
    pub max_angle: f32,
    /// Peak shadow offset either way, CSS pixels.
    pub shadow_offset: f32,
    /// Scale while the pointer is over the card.
    pub hover_scale: f32,
    pub stiffness: f32,
    /// 1.0 is critically damped.
    pub damping_ratio: f32,
    pub mass: f32,
    /// CSS perspective distance, pixels.
    pub perspective: f32,
}

impl Default for TiltConfig {
    fn default() -> Self {
        Self {
            max_angle: 10.0,
            shadow_offset: 24.0,
            hover_scale: 1.03,
            stiffness: 200.0,
            damping_ratio: 1.0,
            mass: 1.0,
            perspective: 800.0,
        }
    }
}

impl TiltConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_range("max_angle", self.max_angle, 0.0, 90.0)?;
        check_range("shadow_offset", self.shadow_offset, 0.0, 512.0)?;
        check_range("hover_scale", self.hover_scale, 0.1, 10.0)?;
        check_range("stiffness", self.stiffness, 1.0, 10_000.0)?;
        check_range("damping_ratio", self.damping_ratio, 0.05, 10.0)?;
        check_range("mass", self.mass, 0.01, 100.0)?;
        check_range("perspective", self.perspective, 1.0, 100_000.0)
    }
}

/// Radial highlight centre published as `--mx` / `--my`.
#[derive(Clone, Debug, PartialEq)]
pub struct HighlightConfig {
    pub mode: HighlightMode,
    /// Fraction of the remaining distance covered per reference frame;
    /// `None` jumps straight to the pointer.
    pub follow_rate: Option<f32>,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            mode: HighlightMode::Percent,
            follow_rate: None,
        }
    }
}

impl HighlightConfig {
    /// The global cursor follower: viewport pixels, eased.
    pub fn cursor() -> Self {
        Self {
            mode: HighlightMode::Pixels,
            follow_rate: Some(0.1),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        match self.follow_rate {
            Some(rate) => check_range("follow_rate", rate, 0.001, 1.0),
            None => Ok(()),
        }
    }
}

fn check_range(field: &'static str, value: f32, min: f32, max: f32) -> Result<(), ConfigError> {
    if !value.is_finite() {
        log::warn!("rejected {field} = {value}");
        return Err(ConfigError::NonFinite { field, value });
    }
    if value < min || value > max {
        log::warn!("rejected {field} = {value}");
        return Err(ConfigError::OutOfRange {
            field,
            value,
            min,
            max,
        });
    }
    Ok(())
}

fn check_nonzero(field: &'static str, value: usize) -> Result<(), ConfigError> {
    if value == 0 {
        return Err(ConfigError::Zero { field });
    }
    Ok(())
}

fn check_sizes(size_min: f32, size_max: f32) -> Result<(), ConfigError> {
    check_range("size_min", size_min, 0.0, 256.0)?;
    check_range("size_max", size_max, size_min, 256.0)
}
