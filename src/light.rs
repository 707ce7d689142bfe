use crate::color::Color;
use crate::vector::Vector;

/// A point light source.
///
/// All light sources are single points with an inherent color; luminosity
/// is folded into the color at construction (see `Color::rgb_scaled`).
/// There are no area lights, so shadows have hard edges.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LightSource {
    pub location: Vector,
    pub color: Color,
}

impl LightSource {
    pub fn new(location: Vector, color: Color) -> LightSource {
        LightSource { location, color }
    }
}
