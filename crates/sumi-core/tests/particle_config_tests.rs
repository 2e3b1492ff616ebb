use glam::Vec2;
use sumi_core::config::{
    HighlightConfig, PetalConfig, PhysicsConfig, RakeConfig, TiltConfig, TrailConfig, MAX_TEETH_PER_SIDE,
};
use sumi_core::error::ConfigError;
use sumi_core::particle::{Particle, LIFE_THRESHOLD};

#[test]
fn test_particle_new_initializes_correctly() {
    let p = Particle::new(Vec2::new(1.0, 2.0), Vec2::new(0.1, -0.1), 2.5);

    assert_eq!(p.position, Vec2::new(1.0, 2.0), "position");
    assert_eq!(p.velocity, Vec2::new(0.1, -0.1), "velocity");
    assert_eq!(p.life, 1.0, "fresh particles start at full life");
    assert_eq!(p.size, 2.5, "size");
    assert_eq!(p.angle, 0.0, "angle");
    assert_eq!(p.spin, 0.0, "spin");
    assert!(p.is_alive());
}

#[test]
fn test_particle_is_nine_floats() {
    assert_eq!(Particle::FLOATS, 9);
    assert_eq!(std::mem::size_of::<Particle>(), 36);
}

#[test]
fn test_life_threshold_boundary() {
    let mut p = Particle::new(Vec2::ZERO, Vec2::ZERO, 1.0);
    p.life = LIFE_THRESHOLD;
    assert!(p.is_alive(), "exactly at the threshold survives");
    p.life = LIFE_THRESHOLD - 1e-4;
    assert!(!p.is_alive());
}

#[test]
fn test_defaults_validate() {
    assert_eq!(PhysicsConfig::default().validate(), Ok(()));
    assert_eq!(TrailConfig::default().validate(), Ok(()));
    assert_eq!(PetalConfig::default().validate(), Ok(()));
    assert_eq!(RakeConfig::default().validate(), Ok(()));
    assert_eq!(TiltConfig::default().validate(), Ok(()));
    assert_eq!(HighlightConfig::default().validate(), Ok(()));
    assert_eq!(HighlightConfig::cursor().validate(), Ok(()));
}

#[test]
fn test_default_constants() {
    let trail = TrailConfig::default();
    assert_eq!(trail.physics.decay, 0.985);
    assert_eq!(trail.physics.damping, 0.99);
    assert_eq!(trail.physics.max_particles, 400);
    assert_eq!(trail.burst, 4);

    let petals = PetalConfig::default();
    assert_eq!(petals.physics.decay, 1.0, "petals never decay");
    assert_eq!(petals.physics.gravity, 0.02);
    assert_eq!(petals.count, 300);

    let rake = RakeConfig::default();
    assert_eq!(rake.tooth_count(), 3);
    assert_eq!(rake.stroke.width, 8.0);
    assert_eq!(rake.grain_count, 120);
}

#[test]
fn test_rejects_non_finite() {
    let mut config = PhysicsConfig::default();
    config.damping = f32::NAN;
    assert!(matches!(
        config.validate(),
        Err(ConfigError::NonFinite { field: "damping", .. })
    ));
}

#[test]
fn test_rejects_unstable_attraction() {
    let mut config = TrailConfig::default();
    config.physics.attraction = 0.5;
    assert!(matches!(
        config.validate(),
        Err(ConfigError::OutOfRange { field: "attraction", .. })
    ));
}

#[test]
fn test_rejects_zero_cap() {
    let mut config = PhysicsConfig::default();
    config.max_particles = 0;
    assert_eq!(
        config.validate(),
        Err(ConfigError::Zero {
            field: "max_particles"
        })
    );
}

#[test]
fn test_rejects_petal_count_over_cap() {
    let mut config = PetalConfig::default();
    config.count = 301;
    assert!(matches!(
        config.validate(),
        Err(ConfigError::OutOfRange { field: "count", .. })
    ));
}

#[test]
fn test_rejects_inverted_ranges() {
    let mut trail = TrailConfig::default();
    trail.size_min = 5.0;
    trail.size_max = 2.0;
    assert!(matches!(
        trail.validate(),
        Err(ConfigError::OutOfRange { field: "size_max", .. })
    ));

    let mut petals = PetalConfig::default();
    petals.spin_min = 0.5;
    assert!(matches!(
        petals.validate(),
        Err(ConfigError::OutOfRange { field: "spin_min", .. })
    ));
}

#[test]
fn test_rejects_oversized_rake() {
    let mut rake = RakeConfig::default();
    rake.teeth_per_side = MAX_TEETH_PER_SIDE;
    assert!(rake.validate().is_ok());
    assert_eq!(rake.tooth_count(), 33);

    rake.teeth_per_side = u32::MAX;
    assert!(matches!(
        rake.validate(),
        Err(ConfigError::OutOfRange {
            field: "teeth_per_side",
            ..
        })
    ));
    assert_eq!(rake.tooth_count(), 33);
}

#[test]
fn test_error_messages() {
    let err = ConfigError::OutOfRange {
        field: "decay",
        value: 2.0,
        min: 0.5,
        max: 1.0,
    };
    assert_eq!(err.to_string(), "decay = 2 is outside 0.5..=1");
}
