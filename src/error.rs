use thiserror::Error;

/// Fatal rendering and configuration errors.
///
/// These are programmer or configuration mistakes, surfaced at the point
/// of detection and never retried. An intersection-distance tie is *not*
/// an error: `pick_closest_intersection` reports the tied count and the
/// ambiguous-pixel pass resolves it.
#[derive(Debug, Error, PartialEq)]
pub enum TracerError {
    #[error("refractive index {0} outside allowed range 1.0..9.0")]
    InvalidRefraction(f64),

    #[error("negative color component")]
    NegativeColor,

    #[error("reflection color component outside range 0.0..1.0")]
    ReflectionColorRange,

    #[error("gloss factor {0} outside range 0.0..1.0")]
    InvalidGlossFactor(f64),

    #[error("opacity {0} outside range 0.0..1.0")]
    InvalidOpacity(f64),

    #[error("pixel coordinate ({0}, {1}) out of bounds")]
    PixelOutOfBounds(usize, usize),

    #[error("no refracted ray direction exists at boundary")]
    Refraction,
}
