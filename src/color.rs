use std::ops::{ Add, AddAssign, Sub, Mul, MulAssign, Div, DivAssign };

use crate::feq;
use crate::consts::MIN_OPTICAL_INTENSITY;
use crate::error::TracerError;

/// A color as non-negative red-green-blue intensities.
///
/// Components are open-ended above 1.0; the final image is scaled against
/// its brightest component before conversion to byte channels, so a color
/// here is an amount of light rather than a display value.
///
/// # Examples
///
/// Construct the color red:
///
/// ```
/// # #![allow(unused)]
/// # use csg_tracer::color::Color;
/// let red = Color::rgb(1.0, 0.0, 0.0);
/// assert_eq!(red, Color::rgb_scaled(2.0, 0.0, 0.0, 0.5));
/// ```
#[derive(Copy, Clone, Debug, Default, PartialOrd)]
pub struct Color {
    pub red: f64,
    pub green: f64,
    pub blue: f64,
}

/// Partial equality on two colors.
///
/// Colors are compared component-wise, accounting for possible floating
/// point error in comparisons.
impl PartialEq for Color {
    fn eq(&self, other: &Color) -> bool {
        feq(self.red, other.red) &&
            feq(self.green, other.green) &&
            feq(self.blue, other.blue)
    }
}

/// Conversion from a vector of floats, as deserialized from a scene
/// description.
///
/// Takes the first `n` elements for the `red`, `green` and `blue` fields,
/// in that order. Missing elements default to zero.
impl From<&Vec<f64>> for Color {
    fn from(v: &Vec<f64>) -> Color {
        match v.len() {
            0 => Default::default(),
            1 => Color { red: v[0], ..Default::default() },
            2 => Color { red: v[0], green: v[1], ..Default::default() },
            _ => Color { red: v[0], green: v[1], blue: v[2] }
        }
    }
}

impl Color {
    /// Creates a color with red, green and blue values.
    pub fn rgb(red: f64, green: f64, blue: f64) -> Color {
        Color { red, green, blue }
    }

    /// Creates a color with all components scaled by a luminosity factor.
    pub fn rgb_scaled(red: f64, green: f64, blue: f64, luminosity: f64) -> Color {
        Color {
            red: luminosity * red,
            green: luminosity * green,
            blue: luminosity * blue,
        }
    }

    /// The color black.
    pub fn black() -> Color {
        Color {
            red: 0.0,
            green: 0.0,
            blue: 0.0
        }
    }

    /// The color white.
    pub fn white() -> Color {
        Color {
            red: 1.0,
            green: 1.0,
            blue: 1.0
        }
    }

    /// Checks that no component has gone negative.
    ///
    /// A negative component means some calculation produced light that
    /// takes brightness away, which is a fatal bookkeeping error.
    pub fn validate(&self) -> Result<(), TracerError> {
        if self.red < 0.0 || self.green < 0.0 || self.blue < 0.0 {
            return Err(TracerError::NegativeColor);
        }

        Ok(())
    }

    /// Whether a ray carrying this much light is still worth tracing.
    ///
    /// Rays dimmer than the minimum optical intensity in every component
    /// contribute nothing visible, so recursion stops for them.
    pub fn is_significant(&self) -> bool {
        self.red >= MIN_OPTICAL_INTENSITY
            || self.green >= MIN_OPTICAL_INTENSITY
            || self.blue >= MIN_OPTICAL_INTENSITY
    }
}

/// Adds two colors together, component by component.
impl Add<Color> for Color {
    type Output = Color;

    fn add(self, other: Color) -> Self::Output {
        Color {
            red: self.red + other.red,
            green: self.green + other.green,
            blue: self.blue + other.blue,
        }
    }
}

impl AddAssign<Color> for Color {
    fn add_assign(&mut self, other: Color) {
        self.red += other.red;
        self.green += other.green;
        self.blue += other.blue;
    }
}

/// Subtracts one color from another, component by component.
impl Sub<Color> for Color {
    type Output = Color;

    fn sub(self, other: Color) -> Self::Output {
        Color {
            red: self.red - other.red,
            green: self.green - other.green,
            blue: self.blue - other.blue,
        }
    }
}

/// Multiplies a color by a scalar.
impl Mul<f64> for Color {
    type Output = Color;

    fn mul(self, other: f64) -> Self::Output {
        Color {
            red: self.red * other,
            green: self.green * other,
            blue: self.blue * other,
        }
    }
}

/// Multiplies a scalar by a color.
impl Mul<Color> for f64 {
    type Output = Color;

    fn mul(self, other: Color) -> Self::Output {
        Color {
            red: self * other.red,
            green: self * other.green,
            blue: self * other.blue,
        }
    }
}

/// Multiplies a color by a color, component by component.
///
/// This is how a surface filters the light falling on it: each component
/// of the incoming light is scaled by the surface's matching component.
impl Mul<Color> for Color {
    type Output = Color;

    fn mul(self, other: Color) -> Self::Output {
        Color {
            red: self.red * other.red,
            green: self.green * other.green,
            blue: self.blue * other.blue,
        }
    }
}

impl MulAssign<f64> for Color {
    fn mul_assign(&mut self, other: f64) {
        self.red *= other;
        self.green *= other;
        self.blue *= other;
    }
}

/// Divides a color by a scalar, e.g. when averaging several samples.
impl Div<f64> for Color {
    type Output = Color;

    fn div(self, other: f64) -> Self::Output {
        Color {
            red: self.red / other,
            green: self.green / other,
            blue: self.blue / other,
        }
    }
}

impl DivAssign<f64> for Color {
    fn div_assign(&mut self, other: f64) {
        self.red /= other;
        self.green /= other;
        self.blue /= other;
    }
}

/* Tests */

#[test]
fn add_colors() {
    let c1 = Color::rgb(0.9, 0.6, 0.75);
    let c2 = Color::rgb(0.7, 0.1, 0.25);

    assert_eq!(c1 + c2, Color::rgb(1.6, 0.7, 1.0));
}

#[test]
fn subtract_colors() {
    let c1 = Color::rgb(0.9, 0.6, 0.75);
    let c2 = Color::rgb(0.7, 0.1, 0.25);

    assert_eq!(c1 - c2, Color::rgb(0.2, 0.5, 0.5));
}

#[test]
fn multiply_color_by_scalar() {
    let c = Color::rgb(0.2, 0.3, 0.4);

    assert_eq!(c * 2.0, Color::rgb(0.4, 0.6, 0.8));
    assert_eq!(2.0 * c, Color::rgb(0.4, 0.6, 0.8));
}

#[test]
fn multiply_colors() {
    let c1 = Color::rgb(1.0, 0.2, 0.4);
    let c2 = Color::rgb(0.9, 1.0, 0.1);

    assert_eq!(c1 * c2, Color::rgb(0.9, 0.2, 0.04));
}

#[test]
fn divide_color_by_scalar() {
    let c = Color::rgb(0.4, 0.6, 0.8);

    assert_eq!(c / 2.0, Color::rgb(0.2, 0.3, 0.4));
}

#[test]
fn luminosity_scales_at_construction() {
    let c = Color::rgb_scaled(0.9, 0.9, 0.9, 0.1);

    assert_eq!(c, Color::rgb(0.09, 0.09, 0.09));
}

#[test]
fn validate_accepts_non_negative_components() {
    assert_eq!(Color::rgb(0.0, 0.5, 2.0).validate(), Ok(()));
}

#[test]
fn validate_rejects_negative_components() {
    assert_eq!(
        Color::rgb(0.1, -0.001, 0.1).validate(),
        Err(TracerError::NegativeColor)
    );
}

#[test]
fn faint_colors_are_insignificant() {
    assert!(Color::rgb(0.5, 0.0, 0.0).is_significant());
    assert!(Color::rgb(0.0, 0.0012, 0.0).is_significant());
    assert!(!Color::rgb(0.0009, 0.0009, 0.0009).is_significant());
}

#[test]
fn color_from_float_list() {
    let c: Color = (&vec![0.1, 0.2, 0.3]).into();

    assert_eq!(c, Color::rgb(0.1, 0.2, 0.3));
}
