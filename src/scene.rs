use log::debug;

use crate::consts::{ EPSILON, SMALL_SHIFT, MAX_OPTICAL_RECURSION_DEPTH,
    REFRACTION_VACUUM };
use crate::buffer::ImageBuffer;
use crate::canvas::PixelSink;
use crate::color::Color;
use crate::error::TracerError;
use crate::intersect::{ Intersection, IntersectionList,
    pick_closest_intersection };
use crate::light::LightSource;
use crate::solid::{ Solid, validate_refraction };
use crate::vector::Vector;

/// The result of tracing one ray: the color it contributes, and whether
/// any closest-intersection pick along the way was a distance tie. The
/// flag follows the ray through reflection and refraction, so one
/// ambiguous bounce marks the whole pixel.
#[derive(Copy, Clone, Debug)]
struct Traced {
    color: Color,
    ambiguous: bool,
}

/// A renderable collection of solids and the light sources that
/// illuminate them.
///
/// The scene owns every solid added to it; the whole forest is dropped
/// with the scene. The camera is fixed at the origin looking down the -z
/// axis with +y upward; magnification comes from the zoom factor passed
/// to `render`.
pub struct Scene {
    /// All solid objects in the scene, in insertion order.
    solids: Vec<Solid>,

    /// All point light sources in the scene.
    lights: Vec<LightSource>,

    /// The color for rays that hit no solid at all.
    background_color: Color,

    /// The refractive index of space not occupied by any solid. Vacuum
    /// unless overridden, e.g. to render a scene immersed in water.
    ambient_refraction: f64,

    /// Output pixels whose traced color should be reported via `log`.
    debug_points: Vec<(usize, usize)>,
}

impl Scene {
    pub fn new(background_color: Color) -> Scene {
        Scene {
            solids: Vec::new(),
            lights: Vec::new(),
            background_color,
            ambient_refraction: REFRACTION_VACUUM,
            debug_points: Vec::new(),
        }
    }

    /// Transfers ownership of a solid to the scene.
    pub fn add_solid(&mut self, solid: Solid) {
        self.solids.push(solid);
    }

    pub fn add_light_source(&mut self, light: LightSource) {
        self.lights.push(light);
    }

    /// Overrides the refractive index of unoccupied space.
    pub fn set_ambient_refraction(&mut self, refraction: f64)
        -> Result<(), TracerError> {
        validate_refraction(refraction)?;
        self.ambient_refraction = refraction;
        Ok(())
    }

    /// Requests a `log` trace of the named output pixel during `render`.
    pub fn add_debug_point(&mut self, i: usize, j: usize) {
        self.debug_points.push((i, j));
    }

    /// Renders the scene and streams the finished image into `sink`.
    ///
    /// `pixels_wide` and `pixels_high` give the image size, `zoom` the
    /// magnification of the projection, and `anti_alias_factor` the
    /// per-axis sub-ray count per pixel. Oversampling cost grows with the
    /// square of the factor, so values from 1 (fastest, jagged edges) to
    /// 4 (sixteen times slower, much smoother) are the useful range.
    ///
    /// The call is synchronous: it returns only once every pixel,
    /// including the ambiguous-pixel resolution pass, has reached the
    /// sink.
    pub fn render(&self, sink: &mut dyn PixelSink, pixels_wide: usize,
        pixels_high: usize, zoom: f64, anti_alias_factor: usize)
        -> Result<(), TracerError> {
        let mut buffer = ImageBuffer::new(pixels_wide, pixels_high);

        // Sub-rays are aimed through the cells of an oversampled grid,
        // anti_alias_factor times larger than the image on each axis.
        let large_wide = (anti_alias_factor * pixels_wide) as f64;
        let large_high = (anti_alias_factor * pixels_high) as f64;
        let smaller_dim = pixels_wide.min(pixels_high) as f64;
        let large_zoom = anti_alias_factor as f64 * zoom * smaller_dim;

        let camera = Vector::new(0.0, 0.0, 0.0);
        let full_intensity = Color::white();
        let sub_rays = (anti_alias_factor * anti_alias_factor) as f64;

        for i in 0..pixels_wide {
            for j in 0..pixels_high {
                let mut color_sum = Color::black();
                let mut ambiguous = false;

                for di in 0..anti_alias_factor {
                    let x = (anti_alias_factor * i + di) as f64;
                    for dj in 0..anti_alias_factor {
                        let y = (anti_alias_factor * j + dj) as f64;
                        let direction = Vector::new(
                            (x - large_wide / 2.0) / large_zoom,
                            (large_high / 2.0 - y) / large_zoom,
                            -1.0,
                        );

                        let traced = self.trace_ray(
                            camera,
                            direction,
                            self.ambient_refraction,
                            full_intensity,
                            0,
                        )?;
                        color_sum += traced.color;
                        ambiguous = ambiguous || traced.ambiguous;
                    }
                }

                let pixel = buffer.pixel_mut(i, j)?;
                pixel.color = color_sum / sub_rays;
                pixel.is_ambiguous = ambiguous;

                if self.debug_points.contains(&(i, j)) {
                    debug!("pixel ({}, {}): color {:?}, ambiguous {}",
                        i, j, pixel.color, ambiguous);
                }
            }
        }

        buffer.resolve_ambiguous_pixels();

        // Scale the image against its brightest component, then hand the
        // clamped byte channels to the sink.
        let max_color_value = buffer.max_color_value()?;
        for i in 0..pixels_wide {
            for j in 0..pixels_high {
                let color = buffer.pixel(i, j)?.color;
                sink.set_pixel(
                    i,
                    j,
                    convert_pixel_value(color.red, max_color_value),
                    convert_pixel_value(color.green, max_color_value),
                    convert_pixel_value(color.blue, max_color_value),
                );
            }
        }

        Ok(())
    }

    /// Traces a single ray through the solid forest.
    ///
    /// `ray_intensity` is how much light the ray can still deliver; it
    /// shrinks with every bounce. `refractive_index` names the medium the
    /// ray is currently traveling through.
    fn trace_ray(&self, vantage: Vector, direction: Vector,
        refractive_index: f64, ray_intensity: Color, recursion_depth: usize)
        -> Result<Traced, TracerError> {
        let mut list = IntersectionList::new();
        for solid in &self.solids {
            solid.append_all_intersections(vantage, direction, &mut list);
        }

        match pick_closest_intersection(&list) {
            None => Ok(Traced {
                color: ray_intensity * self.background_color,
                ambiguous: false,
            }),

            Some(closest) => {
                let lit = self.calculate_lighting(
                    &closest.intersection,
                    direction,
                    refractive_index,
                    ray_intensity,
                    recursion_depth + 1,
                )?;
                Ok(Traced {
                    color: lit.color,
                    ambiguous: lit.ambiguous || closest.tally > 1,
                })
            },
        }
    }

    /// The full illumination of an intersection: matte lighting from
    /// every visible light source, a mirror bounce for the gloss and
    /// Fresnel components, and a transmitted ray through partially
    /// transparent surfaces.
    fn calculate_lighting(&self, intersection: &Intersection,
        direction: Vector, refractive_index: f64, ray_intensity: Color,
        recursion_depth: usize) -> Result<Traced, TracerError> {
        let mut result = Traced {
            color: Color::black(),
            ambiguous: false,
        };

        // Stop bouncing once too deep or too faint to matter; a mirror
        // box would otherwise recurse forever.
        if recursion_depth > MAX_OPTICAL_RECURSION_DEPTH
            || !ray_intensity.is_significant() {
            return Ok(result);
        }

        let optics = intersection.solid.surface_optics(
            intersection.point, intersection.context);
        let opacity = optics.opacity();
        let transparency = 1.0 - opacity;

        if opacity > 0.0 {
            // The opaque fraction scatters light directly toward the
            // camera.
            let matte = self.calculate_matte(intersection);
            result.color +=
                opacity * optics.matte_color() * ray_intensity * matte;
        }

        let mut refraction_factor = 0.0;
        if transparency > 0.0 {
            let (refracted, factor) = self.calculate_refraction(
                intersection,
                direction,
                refractive_index,
                transparency * ray_intensity,
                recursion_depth,
            )?;
            result.color += refracted.color;
            result.ambiguous = result.ambiguous || refracted.ambiguous;
            refraction_factor = factor;
        }

        // Two things make a mirror bounce: partial reflection at the
        // refractive boundary, and the surface's own gloss.
        let mut reflection_weight =
            Color::white() * (transparency * refraction_factor);
        reflection_weight += opacity * optics.gloss_color();
        let reflection_intensity = reflection_weight * ray_intensity;

        if reflection_intensity.is_significant() {
            let reflected = self.calculate_reflection(
                intersection,
                direction,
                refractive_index,
                reflection_intensity,
                recursion_depth,
            )?;
            result.color += reflected.color;
            result.ambiguous = result.ambiguous || reflected.ambiguous;
        }

        Ok(result)
    }

    /// Lambertian lighting with inverse-square falloff, summed over every
    /// light source with a clear line of sight to the surface point.
    fn calculate_matte(&self, intersection: &Intersection) -> Color {
        let mut color_sum = Color::black();

        for source in &self.lights {
            if !self.has_clear_line_of_sight(
                intersection.point, source.location) {
                continue;
            }

            let direction = source.location - intersection.point;
            let incidence =
                intersection.surface_normal.dot(&direction.normalize());
            if incidence > 0.0 {
                let intensity = incidence / direction.magnitude_squared();
                color_sum += intensity * source.color;
            }
        }

        color_sum
    }

    /// Follows the mirror bounce of an incident ray.
    fn calculate_reflection(&self, intersection: &Intersection,
        incident_dir: Vector, refractive_index: f64, ray_intensity: Color,
        recursion_depth: usize) -> Result<Traced, TracerError> {
        // Mirror the incident direction across the surface normal.
        let normal = intersection.surface_normal;
        let perp = 2.0 * incident_dir.dot(&normal);
        let reflect_dir = incident_dir - perp * normal;

        self.trace_ray(
            intersection.point,
            reflect_dir,
            refractive_index,
            ray_intensity,
            recursion_depth,
        )
    }

    /// Follows the transmitted ray through a refractive boundary.
    ///
    /// Returns the traced transmission and the Fresnel reflection factor:
    /// the fraction of the remaining intensity that bounces off the
    /// boundary instead of passing through. Under total internal
    /// reflection the transmission is black and the factor is 1.
    fn calculate_refraction(&self, intersection: &Intersection,
        direction: Vector, source_refractive_index: f64, ray_intensity: Color,
        recursion_depth: usize) -> Result<(Traced, f64), TracerError> {
        // A unit direction keeps the angle/dot-product relation simple.
        let dir_unit = direction.normalize();

        let mut cos_a1 = dir_unit.dot(&intersection.surface_normal);
        let sin_a1 = if cos_a1 <= -1.0 {
            cos_a1 = -1.0;
            0.0
        } else if cos_a1 >= 1.0 {
            cos_a1 = 1.0;
            0.0
        } else {
            (1.0 - cos_a1 * cos_a1).sqrt()
        };

        // Which solid is the ray about to travel through? Probe just past
        // the surface to find the destination refractive index.
        let test_point = intersection.point + SMALL_SHIFT * dir_unit;
        let target_refractive_index = match self.primary_container(test_point) {
            Some(container) => container.refractive_index(),
            None => self.ambient_refraction,
        };

        let ratio = source_refractive_index / target_refractive_index;
        let sin_a2 = ratio * sin_a1;
        if sin_a2 <= -1.0 || sin_a2 >= 1.0 {
            // Total internal reflection: the caller routes all remaining
            // intensity into the mirror bounce.
            let traced = Traced {
                color: Color::black(),
                ambiguous: false,
            };
            return Ok((traced, 1.0));
        }

        // The refracted ray is dir + k*normal for the k that bends it by
        // the refraction angle; of the two roots, keep the one that
        // continues forward.
        let radicand = 1.0 / (ratio * ratio) - sin_a1 * sin_a1;
        let root = radicand.max(0.0).sqrt();

        let mut max_alignment = -0.0001;
        let mut refract_dir = Vector::new(0.0, 0.0, 0.0);
        for &k in &[-cos_a1 - root, -cos_a1 + root] {
            let attempt = dir_unit + k * intersection.surface_normal;
            let alignment = dir_unit.dot(&attempt);
            if alignment > max_alignment {
                max_alignment = alignment;
                refract_dir = attempt;
            }
        }

        if max_alignment <= 0.0 {
            return Err(TracerError::Refraction);
        }

        let mut cos_a2 = (1.0 - sin_a2 * sin_a2).sqrt();
        if cos_a1 < 0.0 {
            cos_a2 = -cos_a2;
        }

        // Fresnel reflectance as the mean of the two polarizations.
        let r_s = polarized_reflection(
            source_refractive_index,
            target_refractive_index,
            cos_a1.abs(),
            cos_a2.abs(),
        );
        let r_p = polarized_reflection(
            source_refractive_index,
            target_refractive_index,
            cos_a2.abs(),
            cos_a1.abs(),
        );
        let reflection_factor = (r_s + r_p) / 2.0;

        let next_intensity = (1.0 - reflection_factor) * ray_intensity;
        let traced = self.trace_ray(
            intersection.point,
            refract_dir,
            target_refractive_index,
            next_intensity,
            recursion_depth,
        )?;

        Ok((traced, reflection_factor))
    }

    /// The solid whose volume contains `point` (first match in scene
    /// order), or `None` when the point floats in unoccupied space.
    fn primary_container(&self, point: Vector) -> Option<&Solid> {
        self.solids.iter().find(|solid| solid.contains(point))
    }

    /// True when no solid blocks the segment between the two points.
    /// Intersections within epsilon of `point1` are the surface the
    /// shadow ray starts on, not an occluder.
    fn has_clear_line_of_sight(&self, point1: Vector, point2: Vector)
        -> bool {
        let direction = point2 - point1;
        let gap_distance_squared = direction.magnitude_squared();

        for solid in &self.solids {
            if let Some(closest) =
                solid.find_closest_intersection(point1, direction) {
                if closest.intersection.distance_squared
                    < gap_distance_squared {
                    return false;
                }
            }
        }

        true
    }
}

/// One polarization component of the Fresnel reflectance at a boundary
/// between media with refractive indices `n1` and `n2`, given the angle
/// cosines on either side.
fn polarized_reflection(n1: f64, n2: f64, cos_a1: f64, cos_a2: f64) -> f64 {
    let left = n1 * cos_a1;
    let right = n2 * cos_a2;
    let numer = left - right;
    let denom = (left + right) * (left + right);

    if denom < EPSILON {
        // Grazing enough that the formula degenerates; treat it as a
        // complete reflection.
        return 1.0;
    }

    let reflection = (numer * numer) / denom;
    reflection.min(1.0)
}

/// Converts one floating point color component to a byte channel value,
/// scaled against the brightest component in the image and clamped to
/// the displayable range.
pub fn convert_pixel_value(color_component: f64, max_color_value: f64) -> u8 {
    let pixel_value = 255.0 * color_component / max_color_value;
    pixel_value.max(0.0).min(255.0) as u8
}

/* Tests */
