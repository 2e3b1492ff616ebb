use thiserror::Error;

/// Rejected tuning constants.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("{field} must be finite, got {value}")]
    NonFinite { field: &'static str, value: f32 },
    #[error("{field} = {value} is outside {min}..={max}")]
    OutOfRange {
        field: &'static str,
        value: f32,
        min: f32,
        max: f32,
    },
    #[error("{field} must be at least 1")]
    Zero { field: &'static str },
}

/// Backing buffer sizing failures.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SurfaceError {
    #[error("device pixel ratio must be finite and positive, got {0}")]
    InvalidPixelRatio(f32),
    #[error("layout size must be finite and non-negative, got {width}x{height}")]
    InvalidLayout { width: f32, height: f32 },
    #[error("backing buffer {width}x{height} exceeds the {max}px side limit")]
    TooLarge { width: u32, height: u32, max: u32 },
}
