use std::fmt;

use crate::consts::{ EPSILON, SMALL_SHIFT, REFRACTION_GLASS,
    REFRACTION_MINIMUM, REFRACTION_MAXIMUM };
use crate::color::Color;
use crate::error::TracerError;
use crate::intersect::{ Intersection, IntersectionList, ClosestIntersection,
    pick_closest_intersection };
use crate::optics::Optics;
use crate::vector::Vector;

/// Checks that a refractive index lies in the physically supported range.
pub fn validate_refraction(refraction: f64) -> Result<(), TracerError> {
    if refraction < REFRACTION_MINIMUM || refraction > REFRACTION_MAXIMUM {
        return Err(TracerError::InvalidRefraction(refraction));
    }

    Ok(())
}

/// A surface-point-dependent optics function, for solids whose color or
/// gloss varies across their surface.
pub type SurfaceFn = Box<dyn Fn(Vector, Option<usize>) -> Optics + Send + Sync>;

/// The closed set of solid variants.
///
/// Composite variants own their children exclusively; dropping the root
/// of a tree drops the whole tree.
#[derive(Debug)]
pub enum SolidKind {
    /// A sphere of some radius around the solid's center.
    Sphere { radius: f64 },

    /// Every point inside either child.
    Union(Box<Solid>, Box<Solid>),

    /// Every point inside both children.
    Intersection(Box<Solid>, Box<Solid>),

    /// Every point *not* inside the child. A sphere's complement is all
    /// of space outside the sphere.
    Complement(Box<Solid>),
}

/// A solid body that rays can hit and points can be inside of.
///
/// Solids can answer three geometric questions: where a ray crosses their
/// surface, whether a point is inside their volume, and what their surface
/// looks like at a point. Everything else -- rotation, translation,
/// refraction, optics -- is configuration.
///
/// Binary operators require both operands to implement containment
/// correctly; combining a solid whose containment is not meaningful gives
/// undefined results. This is a caller contract, not checked at runtime.
pub struct Solid {
    kind: SolidKind,

    /// The point in space this solid rotates and translates around.
    center: Vector,

    /// The refractive index, uniform throughout the solid's volume.
    refractive_index: f64,

    /// Whether containment queries are meaningful for this solid. Every
    /// built-in variant keeps this true; `contains` reports false for
    /// anything marked otherwise.
    is_fully_enclosed: bool,

    /// Optical properties used across the whole surface, unless a painted
    /// surface function overrides them.
    uniform_optics: Optics,

    /// When present, computes optics from the surface point instead of
    /// using `uniform_optics`. Keep the refractive index uniform even for
    /// painted surfaces, or the results look strange.
    surface_fn: Option<SurfaceFn>,

    /// A name for debugging.
    tag: String,
}

impl fmt::Debug for Solid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Solid")
            .field("kind", &self.kind)
            .field("center", &self.center)
            .field("refractive_index", &self.refractive_index)
            .field("tag", &self.tag)
            .finish()
    }
}

impl Solid {
    fn with_kind(kind: SolidKind, center: Vector, tag: &str) -> Solid {
        Solid {
            kind,
            center,
            refractive_index: REFRACTION_GLASS,
            is_fully_enclosed: true,
            uniform_optics: Default::default(),
            surface_fn: None,
            tag: String::from(tag),
        }
    }

    /// Creates a sphere with the given center and radius.
    pub fn sphere(center: Vector, radius: f64) -> Solid {
        Solid::with_kind(SolidKind::Sphere { radius }, center, "sphere")
    }

    /// Combines two solids into the set of points inside either.
    ///
    /// The operator owns both children. Rotations and translations apply
    /// to both children in tandem, about the operator's `center`.
    pub fn set_union(center: Vector, left: Solid, right: Solid) -> Solid {
        Solid::with_kind(
            SolidKind::Union(Box::new(left), Box::new(right)),
            center,
            "union",
        )
    }

    /// Combines two solids into the set of points inside both.
    pub fn set_intersection(center: Vector, left: Solid, right: Solid)
        -> Solid {
        Solid::with_kind(
            SolidKind::Intersection(Box::new(left), Box::new(right)),
            center,
            "intersection",
        )
    }

    /// The set of points in `left` but not in `right`.
    ///
    /// Built as the intersection of `left` with the complement of
    /// `right`; there is no independent difference algorithm. The
    /// synthesized complement node owns `right`.
    pub fn set_difference(center: Vector, left: Solid, right: Solid) -> Solid {
        let mut solid = Solid::set_intersection(
            center,
            left,
            Solid::set_complement(right),
        );
        solid.tag = String::from("difference");
        solid
    }

    /// Toggles the inside/outside of a solid, keeping its center.
    pub fn set_complement(other: Solid) -> Solid {
        let center = other.center;
        Solid::with_kind(
            SolidKind::Complement(Box::new(other)),
            center,
            "complement",
        )
    }

    pub fn center(&self) -> Vector {
        self.center
    }

    pub fn refractive_index(&self) -> f64 {
        self.refractive_index
    }

    pub fn is_fully_enclosed(&self) -> bool {
        self.is_fully_enclosed
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn set_tag(&mut self, tag: &str) {
        self.tag = String::from(tag);
    }

    /// Sets the refractive index of this solid's volume.
    pub fn set_refraction(&mut self, refraction: f64)
        -> Result<(), TracerError> {
        validate_refraction(refraction)?;
        self.refractive_index = refraction;
        Ok(())
    }

    /// Defines the optical properties used everywhere on the surface.
    /// All writes must happen before rendering starts.
    pub fn set_uniform_optics(&mut self, optics: Optics) {
        self.uniform_optics = optics;
        self.surface_fn = None;
    }

    /// Installs a painted surface: optics derived from the surface point.
    pub fn set_surface_fn(&mut self, surface_fn: SurfaceFn) {
        self.surface_fn = Some(surface_fn);
    }

    /// Balances shiny (gloss) against dull (matte) reflection for the
    /// whole surface; see `Optics::set_matte_gloss_balance`.
    pub fn set_matte_gloss_balance(&mut self, gloss_factor: f64,
        raw_matte_color: &Color, raw_gloss_color: &Color)
        -> Result<(), TracerError> {
        self.uniform_optics.set_matte_gloss_balance(
            gloss_factor, raw_matte_color, raw_gloss_color)
    }

    /// A completely dull surface of the given color.
    pub fn set_full_matte(&mut self, matte_color: &Color)
        -> Result<(), TracerError> {
        // Gloss factor zero makes the gloss color irrelevant.
        self.set_matte_gloss_balance(0.0, matte_color, &Color::black())
    }

    pub fn set_opacity(&mut self, opacity: f64) -> Result<(), TracerError> {
        self.uniform_optics.set_opacity(opacity)
    }

    /// The optical properties at a point on the surface: uniform unless a
    /// painted surface function was installed.
    pub fn surface_optics(&self, surface_point: Vector,
        context: Option<usize>) -> Optics {
        match &self.surface_fn {
            Some(paint) => paint(surface_point, context),
            None => self.uniform_optics.clone(),
        }
    }

    /// True when `point` lies inside this solid's volume.
    pub fn contains(&self, point: Vector) -> bool {
        if !self.is_fully_enclosed {
            return false;
        }

        match &self.kind {
            SolidKind::Sphere { radius } => {
                // Allow a little slack beyond the radius so rounding
                // error cannot exclude a point lying on the surface.
                let r = radius + EPSILON;
                (point - self.center).magnitude_squared() <= r * r
            },

            SolidKind::Union(left, right) =>
                left.contains(point) || right.contains(point),

            SolidKind::Intersection(left, right) =>
                left.contains(point) && right.contains(point),

            SolidKind::Complement(other) => !other.contains(point),
        }
    }

    /// Appends every intersection of the given ray with this solid's
    /// surface to `list`, in no particular order, without clearing `list`
    /// first. The ray starts at `vantage` and runs along `direction`,
    /// which need not be a unit vector.
    pub fn append_all_intersections<'a>(&'a self, vantage: Vector,
        direction: Vector, list: &mut IntersectionList<'a>) {
        match &self.kind {
            SolidKind::Sphere { radius } => {
                self.append_sphere_intersections(
                    *radius, vantage, direction, list);
            },

            SolidKind::Union(left, right) => {
                // A crossing of one child's surface that lies inside the
                // other child is interior to the union, hence invisible.
                append_exterior_intersections(
                    left, right, vantage, direction, list);
                append_exterior_intersections(
                    right, left, vantage, direction, list);
            },

            SolidKind::Intersection(left, right) => {
                append_overlapping_intersections(
                    left, right, vantage, direction, list);
                append_overlapping_intersections(
                    right, left, vantage, direction, list);
            },

            SolidKind::Complement(other) => {
                // Same crossings as the child, seen from the other side:
                // every surface normal flips.
                let appended_from = list.len();
                other.append_all_intersections(vantage, direction, list);
                for x in &mut list[appended_from..] {
                    x.surface_normal = -x.surface_normal;
                    x.tag = "complement";
                }
            },
        }
    }

    /// Finds the intersection nearest `vantage` along `direction`, if
    /// any, with the count of distance ties as reported by
    /// `pick_closest_intersection`.
    pub fn find_closest_intersection(&self, vantage: Vector,
        direction: Vector) -> Option<ClosestIntersection> {
        let mut list = IntersectionList::new();
        self.append_all_intersections(vantage, direction, &mut list);
        pick_closest_intersection(&list)
    }

    /// Substituting the parametric ray into the sphere equation gives a
    /// quadratic in t; each real positive root is a surface crossing. A
    /// tangent hit (zero discriminant) appends a single intersection.
    fn append_sphere_intersections<'a>(&'a self, radius: f64,
        vantage: Vector, direction: Vector,
        list: &mut IntersectionList<'a>) {
        let displacement = vantage - self.center;
        let a = direction.magnitude_squared();
        let b = 2.0 * direction.dot(&displacement);
        let c = displacement.magnitude_squared() - radius * radius;

        let radicand = b * b - 4.0 * a * c;
        if radicand < 0.0 {
            return;
        }

        let root = radicand.sqrt();
        let denom = 2.0 * a;
        self.push_sphere_intersection(
            (-b - root) / denom, vantage, direction, list);
        if radicand > 0.0 {
            self.push_sphere_intersection(
                (-b + root) / denom, vantage, direction, list);
        }
    }

    fn push_sphere_intersection<'a>(&'a self, t: f64, vantage: Vector,
        direction: Vector, list: &mut IntersectionList<'a>) {
        // Requiring more than epsilon travel keeps a ray leaving a
        // surface from immediately hitting that same surface.
        if t <= EPSILON {
            return;
        }

        let vantage_to_surface = t * direction;
        let point = vantage + vantage_to_surface;
        list.push(Intersection {
            distance_squared: vantage_to_surface.magnitude_squared(),
            point,
            surface_normal: (point - self.center).normalize(),
            solid: self,
            context: None,
            tag: "sphere",
        });
    }

    /// Rotates the solid counterclockwise about a line through its own
    /// center parallel to the x axis, as seen from the positive axis
    /// direction. The angle is in degrees. Returns `self` for chaining.
    pub fn rotate_x(&mut self, angle_degrees: f64) -> &mut Solid {
        let radians = angle_degrees.to_radians();
        let a = radians.cos();
        let b = radians.sin();
        let center = self.center;

        match &mut self.kind {
            // Rotating a sphere has no effect on its appearance.
            SolidKind::Sphere { .. } => {},

            SolidKind::Union(left, right)
            | SolidKind::Intersection(left, right) => {
                nested_rotate_x(left, angle_degrees, a, b, center);
                nested_rotate_x(right, angle_degrees, a, b, center);
            },

            SolidKind::Complement(other) => {
                other.rotate_x(angle_degrees);
            },
        }

        self
    }

    /// Rotates about the y axis; see `rotate_x`.
    pub fn rotate_y(&mut self, angle_degrees: f64) -> &mut Solid {
        let radians = angle_degrees.to_radians();
        let a = radians.cos();
        let b = radians.sin();
        let center = self.center;

        match &mut self.kind {
            SolidKind::Sphere { .. } => {},

            SolidKind::Union(left, right)
            | SolidKind::Intersection(left, right) => {
                nested_rotate_y(left, angle_degrees, a, b, center);
                nested_rotate_y(right, angle_degrees, a, b, center);
            },

            SolidKind::Complement(other) => {
                other.rotate_y(angle_degrees);
            },
        }

        self
    }

    /// Rotates about the z axis; see `rotate_x`.
    pub fn rotate_z(&mut self, angle_degrees: f64) -> &mut Solid {
        let radians = angle_degrees.to_radians();
        let a = radians.cos();
        let b = radians.sin();
        let center = self.center;

        match &mut self.kind {
            SolidKind::Sphere { .. } => {},

            SolidKind::Union(left, right)
            | SolidKind::Intersection(left, right) => {
                nested_rotate_z(left, angle_degrees, a, b, center);
                nested_rotate_z(right, angle_degrees, a, b, center);
            },

            SolidKind::Complement(other) => {
                other.rotate_z(angle_degrees);
            },
        }

        self
    }

    /// Moves the solid, and its center of rotation, by the given deltas.
    /// Returns `self` for chaining.
    pub fn translate(&mut self, dx: f64, dy: f64, dz: f64) -> &mut Solid {
        self.center.x += dx;
        self.center.y += dy;
        self.center.z += dz;

        match &mut self.kind {
            SolidKind::Sphere { .. } => {},

            SolidKind::Union(left, right)
            | SolidKind::Intersection(left, right) => {
                left.translate(dx, dy, dz);
                right.translate(dx, dy, dz);
            },

            SolidKind::Complement(other) => {
                other.translate(dx, dy, dz);
            },
        }

        self
    }

    /// Moves the solid's center to an absolute location.
    pub fn move_to(&mut self, cx: f64, cy: f64, cz: f64) -> &mut Solid {
        let center = self.center;
        self.translate(cx - center.x, cy - center.y, cz - center.z)
    }
}

/// Appends the intersections of `solid` that do not lie inside `other`,
/// for set unions: surface crossings interior to the other operand are
/// not visible from outside.
fn append_exterior_intersections<'a>(solid: &'a Solid, other: &'a Solid,
    vantage: Vector, direction: Vector, list: &mut IntersectionList<'a>) {
    let mut temp = IntersectionList::new();
    solid.append_all_intersections(vantage, direction, &mut temp);

    for x in temp {
        if !other.contains(x.point) {
            list.push(x);
        }
    }
}

/// Appends the intersections of `solid` that lie inside `other`, for set
/// intersections.
///
/// A crossing exactly on `other`'s boundary can fail the containment test
/// even though the ray genuinely enters both solids there; probing a
/// small step to either side along the ray settles whether the coincident
/// boundary is real.
fn append_overlapping_intersections<'a>(solid: &'a Solid, other: &'a Solid,
    vantage: Vector, direction: Vector, list: &mut IntersectionList<'a>) {
    let unit = direction.normalize();
    let mut temp = IntersectionList::new();
    solid.append_all_intersections(vantage, direction, &mut temp);

    for x in temp {
        if other.contains(x.point) {
            list.push(x);
        } else {
            let ahead = x.point + SMALL_SHIFT * unit;
            let behind = x.point - SMALL_SHIFT * unit;
            if (solid.contains(ahead) && other.contains(ahead))
                || (solid.contains(behind) && other.contains(behind)) {
                list.push(x);
            }
        }
    }
}

// Rotating a composite decomposes per child into two steps: the child
// spins about its own center, then the child's center swings around the
// shared pivot. `a` and `b` are the cosine and sine of the angle.

fn nested_rotate_x(nested: &mut Solid, angle_degrees: f64, a: f64, b: f64,
    center: Vector) {
    let d = nested.center() - center;
    nested.rotate_x(angle_degrees);
    nested.move_to(
        center.x + d.x,
        center.y + a * d.y - b * d.z,
        center.z + a * d.z + b * d.y,
    );
}

fn nested_rotate_y(nested: &mut Solid, angle_degrees: f64, a: f64, b: f64,
    center: Vector) {
    let d = nested.center() - center;
    nested.rotate_y(angle_degrees);
    nested.move_to(
        center.x + a * d.x + b * d.z,
        center.y + d.y,
        center.z + a * d.z - b * d.x,
    );
}

fn nested_rotate_z(nested: &mut Solid, angle_degrees: f64, a: f64, b: f64,
    center: Vector) {
    let d = nested.center() - center;
    nested.rotate_z(angle_degrees);
    nested.move_to(
        center.x + a * d.x - b * d.y,
        center.y + a * d.y + b * d.x,
        center.z + d.z,
    );
}

/* Tests */

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sphere_contains_interior_points() {
        let sphere = Solid::sphere(Vector::new(1.0, 2.0, 3.0), 2.0);

        assert!(sphere.contains(Vector::new(1.0, 2.0, 3.0)));
        assert!(sphere.contains(Vector::new(2.9, 2.0, 3.0)));
    }

    #[test]
    fn sphere_excludes_exterior_points() {
        let sphere = Solid::sphere(Vector::new(1.0, 2.0, 3.0), 2.0);

        assert!(!sphere.contains(Vector::new(3.1, 2.0, 3.0)));
        assert!(!sphere.contains(Vector::new(0.0, 0.0, 0.0)));
    }

    #[test]
    fn complement_negates_containment() {
        let sphere = Solid::sphere(Vector::new(0.0, 0.0, -5.0), 1.0);
        let complement = Solid::set_complement(
            Solid::sphere(Vector::new(0.0, 0.0, -5.0), 1.0));

        for point in &[
            Vector::new(0.0, 0.0, -5.0),
            Vector::new(0.5, 0.0, -5.0),
            Vector::new(3.0, 0.0, -5.0),
            Vector::new(0.0, 0.0, 0.0),
        ] {
            assert_eq!(complement.contains(*point), !sphere.contains(*point));
        }
    }

    #[test]
    fn union_contains_points_of_either_child() {
        let a = Solid::sphere(Vector::new(-2.0, 0.0, 0.0), 1.0);
        let b = Solid::sphere(Vector::new(2.0, 0.0, 0.0), 1.0);
        let union = Solid::set_union(Vector::new(0.0, 0.0, 0.0), a, b);

        assert!(union.contains(Vector::new(-2.0, 0.0, 0.0)));
        assert!(union.contains(Vector::new(2.0, 0.0, 0.0)));
        assert!(!union.contains(Vector::new(0.0, 0.0, 0.0)));
    }

    #[test]
    fn intersection_contains_points_of_both_children() {
        let a = Solid::sphere(Vector::new(-0.5, 0.0, 0.0), 1.0);
        let b = Solid::sphere(Vector::new(0.5, 0.0, 0.0), 1.0);
        let isect = Solid::set_intersection(Vector::new(0.0, 0.0, 0.0), a, b);

        assert!(isect.contains(Vector::new(0.0, 0.0, 0.0)));
        assert!(!isect.contains(Vector::new(-1.2, 0.0, 0.0)));
        assert!(!isect.contains(Vector::new(1.2, 0.0, 0.0)));
    }

    #[test]
    fn difference_contains_left_without_right() {
        let left = Solid::sphere(Vector::new(0.0, 0.0, -10.0), 2.0);
        let right = Solid::sphere(Vector::new(0.0, 0.0, -8.0), 2.0);
        let difference = Solid::set_difference(
            Vector::new(0.0, 0.0, -9.0), left, right);

        assert!(difference.contains(Vector::new(0.0, 0.0, -11.0)));
        assert!(!difference.contains(Vector::new(0.0, 0.0, -9.0)));
        assert!(!difference.contains(Vector::new(0.0, 0.0, -7.0)));
    }

    #[test]
    fn ray_through_sphere_center_hits_twice() {
        let sphere = Solid::sphere(Vector::new(0.0, 0.0, -10.0), 1.0);
        let direction = Vector::new(0.0, 0.0, -1.0);

        let mut list = IntersectionList::new();
        sphere.append_all_intersections(
            Vector::new(0.0, 0.0, 0.0), direction, &mut list);

        assert_eq!(list.len(), 2);

        let closest = pick_closest_intersection(&list).unwrap();
        assert_eq!(closest.tally, 1);
        assert_eq!(closest.intersection.distance_squared, 81.0);

        // The near surface faces the vantage point.
        assert_eq!(closest.intersection.surface_normal, -direction);
    }

    #[test]
    fn ray_missing_sphere_finds_nothing() {
        let sphere = Solid::sphere(Vector::new(0.0, 0.0, -10.0), 1.0);

        let mut list = IntersectionList::new();
        sphere.append_all_intersections(
            Vector::new(0.0, 0.0, 0.0), Vector::new(0.0, 1.0, 0.0), &mut list);

        assert!(list.is_empty());
    }

    #[test]
    fn tangent_ray_hits_once() {
        let sphere = Solid::sphere(Vector::new(0.0, 0.0, 0.0), 1.0);

        let mut list = IntersectionList::new();
        sphere.append_all_intersections(
            Vector::new(1.0, 0.0, 5.0), Vector::new(0.0, 0.0, -1.0),
            &mut list);

        assert_eq!(list.len(), 1);
        assert_eq!(list[0].point, Vector::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn intersections_behind_vantage_are_skipped() {
        let sphere = Solid::sphere(Vector::new(0.0, 0.0, 10.0), 1.0);

        let mut list = IntersectionList::new();
        sphere.append_all_intersections(
            Vector::new(0.0, 0.0, 0.0), Vector::new(0.0, 0.0, -1.0),
            &mut list);

        assert!(list.is_empty());
    }

    #[test]
    fn union_discards_interior_crossings() {
        let a = Solid::sphere(Vector::new(0.0, 0.0, -10.0), 2.0);
        let b = Solid::sphere(Vector::new(0.0, 0.0, -8.0), 2.0);
        let union = Solid::set_union(Vector::new(0.0, 0.0, -9.0), a, b);

        let mut list = IntersectionList::new();
        union.append_all_intersections(
            Vector::new(0.0, 0.0, 0.0), Vector::new(0.0, 0.0, -1.0),
            &mut list);

        // Only the outermost crossings at z = -6 and z = -12 survive.
        assert_eq!(list.len(), 2);
        let mut z_values: Vec<f64> = list.iter().map(|x| x.point.z).collect();
        z_values.sort_by(|p, q| p.partial_cmp(q).unwrap());
        assert!(crate::feq(z_values[0], -12.0));
        assert!(crate::feq(z_values[1], -6.0));
    }

    #[test]
    fn intersection_keeps_only_overlapping_crossings() {
        let a = Solid::sphere(Vector::new(0.0, 0.0, -10.0), 2.0);
        let b = Solid::sphere(Vector::new(0.0, 0.0, -8.0), 2.0);
        let isect = Solid::set_intersection(Vector::new(0.0, 0.0, -9.0), a, b);

        let mut list = IntersectionList::new();
        isect.append_all_intersections(
            Vector::new(0.0, 0.0, 0.0), Vector::new(0.0, 0.0, -1.0),
            &mut list);

        // The lens between the spheres spans z = -8 to z = -10.
        assert_eq!(list.len(), 2);
        let mut z_values: Vec<f64> = list.iter().map(|x| x.point.z).collect();
        z_values.sort_by(|p, q| p.partial_cmp(q).unwrap());
        assert!(crate::feq(z_values[0], -10.0));
        assert!(crate::feq(z_values[1], -8.0));
    }

    #[test]
    fn complement_flips_surface_normals() {
        let solid = Solid::set_complement(
            Solid::sphere(Vector::new(0.0, 0.0, -10.0), 1.0));

        let mut list = IntersectionList::new();
        solid.append_all_intersections(
            Vector::new(0.0, 0.0, 0.0), Vector::new(0.0, 0.0, -1.0),
            &mut list);

        assert_eq!(list.len(), 2);
        for x in &list {
            // Normals now point toward the sphere's center.
            let inward = (Vector::new(0.0, 0.0, -10.0) - x.point).normalize();
            assert_eq!(x.surface_normal, inward);
        }
    }

    #[test]
    fn difference_carves_a_bite_out_of_a_sphere() {
        let left = Solid::sphere(Vector::new(0.0, 0.0, -10.0), 2.0);
        let right = Solid::sphere(Vector::new(0.0, 0.0, -7.0), 2.0);
        let difference = Solid::set_difference(
            Vector::new(0.0, 0.0, -10.0), left, right);

        let mut list = IntersectionList::new();
        difference.append_all_intersections(
            Vector::new(0.0, 0.0, 0.0), Vector::new(0.0, 0.0, -1.0),
            &mut list);

        // The ray enters the carved face at z = -9 (the removed sphere's
        // far surface) and leaves at z = -12.
        assert_eq!(list.len(), 2);
        let mut z_values: Vec<f64> = list.iter().map(|x| x.point.z).collect();
        z_values.sort_by(|p, q| p.partial_cmp(q).unwrap());
        assert!(crate::feq(z_values[0], -12.0));
        assert!(crate::feq(z_values[1], -9.0));
    }

    #[test]
    fn rotation_leaves_spheres_unchanged() {
        let mut sphere = Solid::sphere(Vector::new(1.0, 2.0, 3.0), 2.0);
        sphere.rotate_x(45.0).rotate_y(90.0).rotate_z(135.0);

        assert_eq!(sphere.center(), Vector::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn composite_rotation_swings_children_around_shared_center() {
        let a = Solid::sphere(Vector::new(1.0, 0.0, 0.0), 0.5);
        let b = Solid::sphere(Vector::new(-1.0, 0.0, 0.0), 0.5);
        let mut union = Solid::set_union(Vector::new(0.0, 0.0, 0.0), a, b);

        union.rotate_z(90.0);

        assert!(union.contains(Vector::new(0.0, 1.0, 0.0)));
        assert!(union.contains(Vector::new(0.0, -1.0, 0.0)));
        assert!(!union.contains(Vector::new(1.0, 0.0, 0.0)));
    }

    #[test]
    fn composite_rotation_honors_offset_pivot() {
        let a = Solid::sphere(Vector::new(3.0, 0.0, 0.0), 0.5);
        let b = Solid::sphere(Vector::new(5.0, 0.0, 0.0), 0.5);
        let mut union = Solid::set_union(Vector::new(4.0, 0.0, 0.0), a, b);

        union.rotate_y(180.0);

        // Each child ends up mirrored through the pivot at x = 4.
        assert!(union.contains(Vector::new(5.0, 0.0, 0.0)));
        assert!(union.contains(Vector::new(3.0, 0.0, 0.0)));
    }

    #[test]
    fn nested_composite_rotation_uses_outermost_pivot() {
        let innermost = Solid::sphere(Vector::new(3.0, 0.0, 0.0), 0.5);
        let partner = Solid::sphere(Vector::new(2.0, 0.0, 0.0), 0.5);
        let inner = Solid::set_union(
            Vector::new(2.0, 0.0, 0.0), innermost, partner);
        let lone = Solid::sphere(Vector::new(-1.0, 0.0, 0.0), 0.5);
        let mut outer = Solid::set_union(
            Vector::new(0.0, 0.0, 0.0), inner, lone);

        outer.rotate_z(90.0);

        // Every leaf rotates as if about the outer center directly.
        assert!(outer.contains(Vector::new(0.0, 3.0, 0.0)));
        assert!(outer.contains(Vector::new(0.0, 2.0, 0.0)));
        assert!(outer.contains(Vector::new(0.0, -1.0, 0.0)));
        assert!(!outer.contains(Vector::new(3.0, 0.0, 0.0)));
    }

    #[test]
    fn translation_moves_composites_in_tandem() {
        let a = Solid::sphere(Vector::new(1.0, 0.0, 0.0), 0.5);
        let b = Solid::sphere(Vector::new(-1.0, 0.0, 0.0), 0.5);
        let mut union = Solid::set_union(Vector::new(0.0, 0.0, 0.0), a, b);

        union.translate(0.0, 10.0, 0.0);

        assert_eq!(union.center(), Vector::new(0.0, 10.0, 0.0));
        assert!(union.contains(Vector::new(1.0, 10.0, 0.0)));
        assert!(union.contains(Vector::new(-1.0, 10.0, 0.0)));
        assert!(!union.contains(Vector::new(1.0, 0.0, 0.0)));
    }

    #[test]
    fn move_to_places_center_absolutely() {
        let mut sphere = Solid::sphere(Vector::new(1.0, 2.0, 3.0), 1.0);
        sphere.move_to(0.0, 0.0, -5.0);

        assert_eq!(sphere.center(), Vector::new(0.0, 0.0, -5.0));
        assert!(sphere.contains(Vector::new(0.0, 0.0, -5.5)));
    }

    #[test]
    fn refraction_is_validated_on_configuration() {
        let mut sphere = Solid::sphere(Default::default(), 1.0);

        assert_eq!(
            sphere.set_refraction(0.5),
            Err(TracerError::InvalidRefraction(0.5))
        );
        assert_eq!(
            sphere.set_refraction(9.5),
            Err(TracerError::InvalidRefraction(9.5))
        );
        assert_eq!(sphere.set_refraction(1.333), Ok(()));
        assert_eq!(sphere.refractive_index(), 1.333);
    }

    #[test]
    fn painted_surface_overrides_uniform_optics() {
        let mut sphere = Solid::sphere(Default::default(), 1.0);
        sphere.set_surface_fn(Box::new(|point, _context| {
            let color = if point.x >= 0.0 {
                Color::rgb(1.0, 0.0, 0.0)
            } else {
                Color::rgb(0.0, 0.0, 1.0)
            };
            let mut optics: Optics = Default::default();
            optics.set_matte_color(color).unwrap();
            optics
        }));

        let east = sphere.surface_optics(Vector::new(1.0, 0.0, 0.0), None);
        let west = sphere.surface_optics(Vector::new(-1.0, 0.0, 0.0), None);
        assert_eq!(east.matte_color(), Color::rgb(1.0, 0.0, 0.0));
        assert_eq!(west.matte_color(), Color::rgb(0.0, 0.0, 1.0));
    }
}
