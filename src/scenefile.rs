use std::fs;
use std::path::Path;

use serde::{ Serialize, Deserialize };
use thiserror::Error;

use crate::color::Color;
use crate::error::TracerError;
use crate::light::LightSource;
use crate::scene::Scene;
use crate::solid::Solid;
use crate::vector::Vector;

/// Errors produced while loading a scene description.
#[derive(Debug, Error)]
pub enum SceneFileError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid scene configuration: {0}")]
    Config(#[from] TracerError),

    #[error("unknown solid type `{0}`")]
    UnknownSolidType(String),

    #[error("solid type `{0}` is missing required field `{1}`")]
    MissingField(String, &'static str),

    #[error("solid type `{0}` takes exactly {1} children")]
    WrongChildCount(String, usize),
}

/// A JSON description of a renderable scene.
///
/// Points and colors are plain arrays of up to three numbers. A minimal
/// description looks like:
///
/// ```json
/// {
///     "width": 320, "height": 240,
///     "lights": [
///         { "location": [50.0, 0.0, 50.0], "color": [0.9, 0.9, 0.9] }
///     ],
///     "solids": [
///         { "ty": "sphere", "center": [0.0, 0.0, -50.0], "radius": 10.0,
///           "matte": [1.0, 0.0, 0.0] }
///     ]
/// }
/// ```
#[derive(Clone, Serialize, Deserialize)]
pub struct SceneFile {
    pub width: usize,
    pub height: usize,

    #[serde(default = "default_zoom")]
    pub zoom: f64,

    #[serde(default = "default_quality")]
    pub quality: usize,

    #[serde(default)]
    pub background: Vec<f64>,

    pub ambient_refraction: Option<f64>,

    pub lights: Vec<LightJson>,
    pub solids: Vec<SolidJson>,
}

fn default_zoom() -> f64 {
    1.0
}

fn default_quality() -> usize {
    1
}

#[derive(Clone, Serialize, Deserialize)]
pub struct LightJson {
    pub location: Vec<f64>,
    pub color: Vec<f64>,

    /// Optional luminosity multiplier folded into the color.
    pub luminosity: Option<f64>,
}

#[derive(Clone, Serialize, Deserialize)]
pub struct SolidJson {
    /// One of "sphere", "union", "intersection", "difference" or
    /// "complement".
    pub ty: String,

    #[serde(default)]
    pub center: Vec<f64>,

    pub radius: Option<f64>,

    /// Operands for the CSG operator types.
    pub children: Option<Vec<SolidJson>>,

    pub matte: Option<Vec<f64>>,
    pub gloss: Option<Vec<f64>>,
    #[serde(default)]
    pub gloss_factor: f64,

    pub opacity: Option<f64>,
    pub refraction: Option<f64>,

    /// Rotation in degrees about the x, y and z axes, applied in that
    /// order about the solid's own center.
    pub rotate: Option<Vec<f64>>,

    /// Translation deltas applied after rotation.
    pub translate: Option<Vec<f64>>,

    /// Optional debugging name for the solid.
    pub tag: Option<String>,
}

impl SceneFile {
    /// Loads a scene description from a JSON file.
    pub fn load(path: &Path) -> Result<SceneFile, SceneFileError> {
        let text = fs::read_to_string(path)?;
        SceneFile::parse(&text)
    }

    /// Parses a scene description from JSON text.
    pub fn parse(text: &str) -> Result<SceneFile, SceneFileError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Builds the renderable scene this description names.
    pub fn into_scene(self) -> Result<Scene, SceneFileError> {
        let mut scene = Scene::new((&self.background).into());

        if let Some(refraction) = self.ambient_refraction {
            scene.set_ambient_refraction(refraction)?;
        }

        for light in &self.lights {
            let color: Color = (&light.color).into();
            let luminosity = light.luminosity.unwrap_or(1.0);
            scene.add_light_source(LightSource::new(
                (&light.location).into(),
                luminosity * color,
            ));
        }

        for solid in self.solids {
            scene.add_solid(build_solid(solid)?);
        }

        Ok(scene)
    }
}

fn build_solid(json: SolidJson) -> Result<Solid, SceneFileError> {
    let center: Vector = (&json.center).into();

    let mut solid = match json.ty.as_str() {
        "sphere" => {
            let radius = json.radius.ok_or_else(||
                SceneFileError::MissingField(json.ty.clone(), "radius"))?;
            Solid::sphere(center, radius)
        },

        "union" | "intersection" | "difference" => {
            let ty_for_err = json.ty.clone();
            let mut children = json.children.ok_or_else(||
                SceneFileError::MissingField(ty_for_err, "children"))?;
            if children.len() != 2 {
                return Err(SceneFileError::WrongChildCount(json.ty, 2));
            }

            let (left, right) = match (children.pop(), children.pop()) {
                (Some(second), Some(first)) =>
                    (build_solid(first)?, build_solid(second)?),
                _ => return Err(SceneFileError::WrongChildCount(json.ty, 2)),
            };

            match json.ty.as_str() {
                "union" => Solid::set_union(center, left, right),
                "intersection" =>
                    Solid::set_intersection(center, left, right),
                _ => Solid::set_difference(center, left, right),
            }
        },

        "complement" => {
            let ty_for_err = json.ty.clone();
            let mut children = json.children.ok_or_else(||
                SceneFileError::MissingField(ty_for_err, "children"))?;
            if children.len() != 1 {
                return Err(SceneFileError::WrongChildCount(json.ty, 1));
            }

            let other = match children.pop() {
                Some(child) => build_solid(child)?,
                None => return Err(
                    SceneFileError::WrongChildCount(json.ty, 1)),
            };
            Solid::set_complement(other)
        },

        _ => return Err(SceneFileError::UnknownSolidType(json.ty)),
    };

    if let Some(matte) = &json.matte {
        let matte_color: Color = matte.into();
        let gloss_color: Color = match &json.gloss {
            Some(gloss) => gloss.into(),
            None => Color::black(),
        };
        solid.set_matte_gloss_balance(
            json.gloss_factor, &matte_color, &gloss_color)?;
    }

    if let Some(opacity) = json.opacity {
        solid.set_opacity(opacity)?;
    }

    if let Some(refraction) = json.refraction {
        solid.set_refraction(refraction)?;
    }

    if let Some(rotate) = &json.rotate {
        let angles: Vector = rotate.into();
        solid.rotate_x(angles.x).rotate_y(angles.y).rotate_z(angles.z);
    }

    if let Some(translate) = &json.translate {
        let delta: Vector = translate.into();
        solid.translate(delta.x, delta.y, delta.z);
    }

    if let Some(tag) = &json.tag {
        solid.set_tag(tag);
    }

    Ok(solid)
}

/* Tests */

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::Canvas;

    const DEMO_SCENE: &str = r#"{
        "width": 16, "height": 16,
        "zoom": 2.0, "quality": 2,
        "background": [0.0, 0.0, 0.1],
        "lights": [
            { "location": [50.0, 0.0, 50.0], "color": [0.9, 0.9, 0.9] },
            { "location": [-2.0, 0.0, 5.0], "color": [1.0, 1.0, 1.0],
              "luminosity": 0.5 }
        ],
        "solids": [
            { "ty": "sphere", "center": [0.0, 0.0, -40.0], "radius": 5.0,
              "matte": [1.0, 0.0, 0.0] },
            { "ty": "difference", "center": [10.0, 0.0, -40.0],
              "children": [
                  { "ty": "sphere", "center": [10.0, 0.0, -40.0],
                    "radius": 5.0, "matte": [0.0, 1.0, 0.0] },
                  { "ty": "sphere", "center": [10.0, 0.0, -35.0],
                    "radius": 3.0 }
              ],
              "rotate": [0.0, 30.0, 0.0] }
        ]
    }"#;

    #[test]
    fn parse_and_build_a_scene() {
        let file = SceneFile::parse(DEMO_SCENE).unwrap();

        assert_eq!(file.width, 16);
        assert_eq!(file.quality, 2);
        assert_eq!(file.lights.len(), 2);

        let scene = file.into_scene().unwrap();
        let mut canvas = Canvas::new(16, 16);
        scene.render(&mut canvas, 16, 16, 2.0, 2).unwrap();
    }

    #[test]
    fn zoom_and_quality_have_defaults() {
        let file = SceneFile::parse(r#"{
            "width": 8, "height": 8,
            "lights": [], "solids": []
        }"#).unwrap();

        assert_eq!(file.zoom, 1.0);
        assert_eq!(file.quality, 1);
        assert!(file.background.is_empty());
    }

    #[test]
    fn unknown_solid_types_are_rejected() {
        let file = SceneFile::parse(r#"{
            "width": 8, "height": 8,
            "lights": [],
            "solids": [ { "ty": "torus" } ]
        }"#).unwrap();

        match file.into_scene() {
            Err(SceneFileError::UnknownSolidType(ty)) =>
                assert_eq!(ty, "torus"),
            other => panic!("expected UnknownSolidType, got {:?}",
                other.map(|_| ())),
        }
    }

    #[test]
    fn spheres_require_a_radius() {
        let file = SceneFile::parse(r#"{
            "width": 8, "height": 8,
            "lights": [],
            "solids": [ { "ty": "sphere" } ]
        }"#).unwrap();

        match file.into_scene() {
            Err(SceneFileError::MissingField(ty, field)) => {
                assert_eq!(ty, "sphere");
                assert_eq!(field, "radius");
            },
            other => panic!("expected MissingField, got {:?}",
                other.map(|_| ())),
        }
    }

    #[test]
    fn operators_require_two_children() {
        let file = SceneFile::parse(r#"{
            "width": 8, "height": 8,
            "lights": [],
            "solids": [
                { "ty": "union", "children": [
                    { "ty": "sphere", "radius": 1.0 }
                ] }
            ]
        }"#).unwrap();

        assert!(matches!(
            file.into_scene(),
            Err(SceneFileError::WrongChildCount(_, 2))
        ));
    }

    #[test]
    fn bad_refraction_in_a_description_is_a_config_error() {
        let file = SceneFile::parse(r#"{
            "width": 8, "height": 8,
            "lights": [],
            "solids": [
                { "ty": "sphere", "radius": 1.0, "refraction": 20.0 }
            ]
        }"#).unwrap();

        assert!(matches!(
            file.into_scene(),
            Err(SceneFileError::Config(TracerError::InvalidRefraction(_)))
        ));
    }
}
