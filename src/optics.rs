use crate::color::Color;
use crate::error::TracerError;

/// Describes how a point on a surface interacts with light.
///
/// `matte_color` scales scattered (diffuse) reflection, `gloss_color`
/// scales mirror reflection, and `opacity` is the fraction of incoming
/// light that is reflected at all; the remaining `1 - opacity` is
/// transmitted into the solid and refracted.
///
/// Reflection colors are weights, so every component must stay within
/// [0, 1]; the setters enforce this.
#[derive(Clone, Debug, PartialEq)]
pub struct Optics {
    matte_color: Color,
    gloss_color: Color,
    opacity: f64,
}

/// A completely dull, fully opaque white surface.
impl Default for Optics {
    fn default() -> Optics {
        Optics {
            matte_color: Color::white(),
            gloss_color: Color::black(),
            opacity: 1.0,
        }
    }
}

impl Optics {
    pub fn new(matte_color: Color, gloss_color: Color, opacity: f64)
        -> Result<Optics, TracerError> {
        let mut optics: Optics = Default::default();
        optics.set_matte_color(matte_color)?;
        optics.set_gloss_color(gloss_color)?;
        optics.set_opacity(opacity)?;

        Ok(optics)
    }

    /// Balances matte against gloss with a single factor.
    ///
    /// With `gloss_factor` 0 the surface is completely dull, with 1 it is
    /// a perfect mirror: the matte color becomes `(1 - f) * raw_matte`
    /// and the gloss color `f * raw_gloss`.
    pub fn set_matte_gloss_balance(&mut self, gloss_factor: f64,
        raw_matte_color: &Color, raw_gloss_color: &Color)
        -> Result<(), TracerError> {
        // Make sure the raw colors are valid weights before mixing them.
        validate_reflection_color(raw_matte_color)?;
        validate_reflection_color(raw_gloss_color)?;

        if gloss_factor < 0.0 || gloss_factor > 1.0 {
            return Err(TracerError::InvalidGlossFactor(gloss_factor));
        }

        self.matte_color = (1.0 - gloss_factor) * *raw_matte_color;
        self.gloss_color = gloss_factor * *raw_gloss_color;
        Ok(())
    }

    pub fn set_matte_color(&mut self, matte_color: Color)
        -> Result<(), TracerError> {
        validate_reflection_color(&matte_color)?;
        self.matte_color = matte_color;
        Ok(())
    }

    pub fn set_gloss_color(&mut self, gloss_color: Color)
        -> Result<(), TracerError> {
        validate_reflection_color(&gloss_color)?;
        self.gloss_color = gloss_color;
        Ok(())
    }

    pub fn set_opacity(&mut self, opacity: f64) -> Result<(), TracerError> {
        if opacity < 0.0 || opacity > 1.0 {
            return Err(TracerError::InvalidOpacity(opacity));
        }

        self.opacity = opacity;
        Ok(())
    }

    pub fn matte_color(&self) -> Color {
        self.matte_color
    }

    pub fn gloss_color(&self) -> Color {
        self.gloss_color
    }

    pub fn opacity(&self) -> f64 {
        self.opacity
    }
}

/// Reflection colors are per-component weights on reflected light, so
/// each component must lie within [0, 1].
fn validate_reflection_color(color: &Color) -> Result<(), TracerError> {
    color.validate()?;

    if color.red > 1.0 || color.green > 1.0 || color.blue > 1.0 {
        return Err(TracerError::ReflectionColorRange);
    }

    Ok(())
}

/* Tests */

#[test]
fn default_optics_are_opaque_matte_white() {
    let optics: Optics = Default::default();

    assert_eq!(optics.matte_color(), Color::white());
    assert_eq!(optics.gloss_color(), Color::black());
    assert_eq!(optics.opacity(), 1.0);
}

#[test]
fn matte_gloss_balance_splits_raw_colors() {
    let mut optics: Optics = Default::default();
    optics.set_matte_gloss_balance(
        0.25,
        &Color::rgb(0.8, 0.4, 0.0),
        &Color::white(),
    ).unwrap();

    assert_eq!(optics.matte_color(), Color::rgb(0.6, 0.3, 0.0));
    assert_eq!(optics.gloss_color(), Color::rgb(0.25, 0.25, 0.25));
}

#[test]
fn gloss_factor_outside_unit_range_is_rejected() {
    let mut optics: Optics = Default::default();
    let result = optics.set_matte_gloss_balance(
        1.5,
        &Color::white(),
        &Color::white(),
    );

    assert_eq!(result, Err(TracerError::InvalidGlossFactor(1.5)));
}

#[test]
fn negative_reflection_color_is_rejected() {
    let mut optics: Optics = Default::default();

    assert_eq!(
        optics.set_matte_color(Color::rgb(-0.1, 0.0, 0.0)),
        Err(TracerError::NegativeColor)
    );
}

#[test]
fn oversized_reflection_color_is_rejected() {
    let mut optics: Optics = Default::default();

    assert_eq!(
        optics.set_gloss_color(Color::rgb(0.0, 1.2, 0.0)),
        Err(TracerError::ReflectionColorRange)
    );
}

#[test]
fn opacity_outside_unit_range_is_rejected() {
    let mut optics: Optics = Default::default();

    assert_eq!(optics.set_opacity(-0.5), Err(TracerError::InvalidOpacity(-0.5)));
    assert_eq!(optics.set_opacity(1.5), Err(TracerError::InvalidOpacity(1.5)));
    assert_eq!(optics.set_opacity(0.5), Ok(()));
}
