use crate::consts::EPSILON;
use crate::solid::Solid;
use crate::vector::Vector;

/// A single crossing of a ray and a solid's surface.
///
/// The `solid` parameter is a non-owning reference back to the solid that
/// was hit, so the shader can ask it for surface optics and a refractive
/// index later.
#[derive(Copy, Clone, Debug)]
pub struct Intersection<'a> {
    /// The square of the distance from the vantage point to the
    /// intersection point.
    pub distance_squared: f64,

    /// The location of the intersection point.
    pub point: Vector,

    /// The unit vector perpendicular to the surface at `point`.
    pub surface_normal: Vector,

    /// The solid whose surface the ray crossed.
    pub solid: &'a Solid,

    /// An opaque token a solid may attach to pass surface detail from
    /// intersection finding to its optics lookup. Usually `None`.
    pub context: Option<usize>,

    /// Which piece of intersection code produced this entry; useful when
    /// debugging which of multiple surfaces was involved.
    pub tag: &'static str,
}

pub type IntersectionList<'a> = Vec<Intersection<'a>>;

/// The nearest entry of an intersection list, along with how many entries
/// were tied for nearest.
#[derive(Copy, Clone, Debug)]
pub struct ClosestIntersection<'a> {
    pub intersection: Intersection<'a>,

    /// The number of intersections within tolerance of the minimum
    /// distance. 1 is the common, unambiguous case.
    pub tally: usize,
}

/// Picks the intersection closest to the vantage point.
///
/// Returns `None` for an empty list. Otherwise the tally counts how many
/// entries lie within a small relative tolerance of the minimum distance:
/// a tally of 2 or more means the pick between them is arbitrary (for
/// example a ray passing through the exact edge where two surfaces meet),
/// and the caller should treat the result as ambiguous and defer to the
/// ambiguous-pixel resolution pass.
pub fn pick_closest_intersection<'a>(list: &[Intersection<'a>])
    -> Option<ClosestIntersection<'a>> {
    let mut closest = list.first()?;
    for candidate in &list[1..] {
        if candidate.distance_squared < closest.distance_squared {
            closest = candidate;
        }
    }

    // A relative tolerance that degrades to an absolute one close to the
    // vantage point.
    let tolerance = EPSILON * closest.distance_squared.max(1.0);
    let tally = list.iter()
        .filter(|x| x.distance_squared - closest.distance_squared < tolerance)
        .count();

    Some(ClosestIntersection { intersection: *closest, tally })
}

/* Tests */

#[cfg(test)]
fn dummy_intersection(solid: &Solid, distance_squared: f64) -> Intersection {
    Intersection {
        distance_squared,
        point: Default::default(),
        surface_normal: Vector::new(0.0, 0.0, 1.0),
        solid,
        context: None,
        tag: "test",
    }
}

#[test]
fn empty_list_picks_nothing() {
    let list: IntersectionList = Vec::new();

    assert!(pick_closest_intersection(&list).is_none());
}

#[test]
fn single_entry_is_unambiguous() {
    let sphere = Solid::sphere(Default::default(), 1.0);
    let list = vec![dummy_intersection(&sphere, 4.0)];

    let closest = pick_closest_intersection(&list).unwrap();
    assert_eq!(closest.tally, 1);
    assert_eq!(closest.intersection.distance_squared, 4.0);
}

#[test]
fn nearest_of_distinct_distances_wins() {
    let sphere = Solid::sphere(Default::default(), 1.0);
    let list = vec![
        dummy_intersection(&sphere, 9.0),
        dummy_intersection(&sphere, 4.0),
        dummy_intersection(&sphere, 16.0),
    ];

    let closest = pick_closest_intersection(&list).unwrap();
    assert_eq!(closest.tally, 1);
    assert_eq!(closest.intersection.distance_squared, 4.0);
}

#[test]
fn tied_distances_are_reported() {
    let sphere = Solid::sphere(Default::default(), 1.0);
    let list = vec![
        dummy_intersection(&sphere, 9.0),
        dummy_intersection(&sphere, 4.0),
        dummy_intersection(&sphere, 4.0),
    ];

    let closest = pick_closest_intersection(&list).unwrap();
    assert_eq!(closest.tally, 2);
    assert_eq!(closest.intersection.distance_squared, 4.0);
}

// Two identical spheres in the same place tie for every ray that hits
// them; the tie is reported, not hidden.
#[test]
fn coincident_spheres_are_ambiguous() {
    let center = Vector::new(0.0, 0.0, -10.0);
    let a = Solid::sphere(center, 2.0);
    let b = Solid::sphere(center, 2.0);

    let vantage = Vector::new(0.0, 0.0, 0.0);
    let direction = Vector::new(0.0, 0.0, -1.0);

    let mut list = IntersectionList::new();
    a.append_all_intersections(vantage, direction, &mut list);
    b.append_all_intersections(vantage, direction, &mut list);

    let closest = pick_closest_intersection(&list).unwrap();
    assert!(closest.tally >= 2);
}
