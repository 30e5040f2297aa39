use crate::vector::Vector3;
use crate::ray::Ray;
use crate::sphere::Sphere;

/// An intersection.
///
/// This structure assumes that some ray produced an intersection. Parameter `t`
/// is analogous to `t` for a ray (the offset from the ray origin).
///
/// `what` borrows the sphere that was hit and `index` is its position in the
/// world, which is what breaks ties between equally distant hits.
#[derive(Copy, Clone, Debug)]
pub struct Intersection<'a> {
    pub t: f64,
    pub what: &'a Sphere,
    pub index: usize,
}

impl<'a> Intersection<'a> {
    pub fn new(t: f64, what: &'a Sphere, index: usize) -> Intersection<'a> {
        Intersection { t, what, index }
    }
}

/// Finds the closest intersection of a ray among a list of spheres.
///
/// A root counts when it lies strictly inside `(t_min, t_max)` and is strictly
/// smaller than the best root found so far. Spheres are visited in order and,
/// for each sphere, the larger root `t1` is offered before `t2`. Because the
/// comparison is strict, the first root to reach a given distance keeps it:
/// an earlier sphere wins an exact tie against a later one.
pub fn closest_intersection<'a>(spheres: &'a [Sphere], ray: &Ray,
    t_min: f64, t_max: f64) -> Option<Intersection<'a>> {
    let mut closest: Option<Intersection<'a>> = None;
    let mut closest_t = f64::INFINITY;

    for (index, sphere) in spheres.iter().enumerate() {
        let (t1, t2) = match sphere.intersect(ray) {
            Some(roots) => roots,
            None => continue,
        };

        for &t in [t1, t2].iter() {
            if t_min < t && t < t_max && t < closest_t {
                closest_t = t;
                closest = Some(Intersection::new(t, sphere, index));
            }
        }
    }

    closest
}

/// A record for computations associated with an `Intersection`.
#[derive(Clone, Debug)]
pub struct IntersectionComputation<'a> {
    /// The "time" of the ray intersection.
    pub t: f64,

    /// The sphere being intersected.
    pub obj: &'a Sphere,

    /// The point where the intersection occurs.
    pub point: Vector3,

    /// The outward unit normal of the sphere at `point`.
    pub normalv: Vector3,

    /// The unit vector pointing back along the ray, towards the viewer.
    pub eyev: Vector3,
}

impl<'a> IntersectionComputation<'a> {
    /// Creates a new intersection computation, given a ray and intersection.
    pub fn new(r: &Ray, hit: &Intersection<'a>) -> IntersectionComputation<'a> {
        let point = r.position(hit.t);
        let normalv = hit.what.normal_at(point);
        let eyev = (-r.direction).normalize();

        IntersectionComputation {
            t: hit.t,
            obj: hit.what,
            point,
            normalv,
            eyev,
        }
    }

    /// The direction a mirror reflection leaves the surface in.
    pub fn reflectv(&self) -> Vector3 {
        self.eyev.reflect(&self.normalv)
    }
}

#[cfg(test)]
use crate::color::Color;

#[test]
fn closest_of_two_spheres() {
    let spheres = [
        Sphere::new(Vector3::new(0.0, 0.0, 10.0), 1.0, Color::red()),
        Sphere::new(Vector3::new(0.0, 0.0, 5.0), 1.0, Color::blue()),
    ];
    let r = Ray::new(Vector3::zero(), Vector3::new(0.0, 0.0, 1.0));

    let hit = closest_intersection(&spheres, &r, 1.0, f64::INFINITY).unwrap();
    assert_eq!(hit.t, 4.0);
    assert_eq!(hit.index, 1);
    assert!(std::ptr::eq(hit.what, &spheres[1]));
}

#[test]
fn range_bounds_are_exclusive() {
    let spheres = [Sphere::new(Vector3::new(0.0, 0.0, 5.0), 1.0, Color::red())];
    let r = Ray::new(Vector3::zero(), Vector3::new(0.0, 0.0, 1.0));

    // t = 4 sits on t_min and is rejected, t = 6 is next.
    assert_eq!(closest_intersection(&spheres, &r, 4.0, f64::INFINITY).unwrap().t, 6.0);

    // t = 6 sits on t_max and is rejected too.
    assert!(closest_intersection(&spheres, &r, 4.0, 6.0).is_none());
}

#[test]
fn hits_behind_origin_are_ignored() {
    let spheres = [Sphere::new(Vector3::new(0.0, 0.0, -5.0), 1.0, Color::red())];
    let r = Ray::new(Vector3::zero(), Vector3::new(0.0, 0.0, 1.0));

    assert!(closest_intersection(&spheres, &r, 0.001, f64::INFINITY).is_none());
}

#[test]
fn inside_sphere_hits_far_wall() {
    let spheres = [Sphere::default()];
    let r = Ray::new(Vector3::zero(), Vector3::new(0.0, 0.0, 1.0));

    assert_eq!(closest_intersection(&spheres, &r, 0.001, f64::INFINITY).unwrap().t, 1.0);
}

#[test]
fn first_sphere_wins_a_tie() {
    // Two identical spheres give bit-identical roots.
    let spheres = [
        Sphere::new(Vector3::new(0.0, 0.0, 5.0), 1.0, Color::red()),
        Sphere::new(Vector3::new(0.0, 0.0, 5.0), 1.0, Color::blue()),
    ];
    let r = Ray::new(Vector3::zero(), Vector3::new(0.0, 0.0, 1.0));

    let hit = closest_intersection(&spheres, &r, 0.001, f64::INFINITY).unwrap();
    assert_eq!(hit.index, 0);
    assert_eq!(hit.what.color, Color::red());
}

#[test]
fn no_spheres_no_hit() {
    let r = Ray::new(Vector3::zero(), Vector3::new(0.0, 0.0, 1.0));

    assert!(closest_intersection(&[], &r, 0.001, f64::INFINITY).is_none());
}

#[test]
fn precompute_hit_state() {
    let s = Sphere::new(Vector3::new(0.0, 0.0, 5.0), 1.0, Color::red());
    let r = Ray::new(Vector3::zero(), Vector3::new(0.0, 0.0, 2.0));
    let i = Intersection::new(2.0, &s, 0);

    let comps = IntersectionComputation::new(&r, &i);
    assert_eq!(comps.point, Vector3::new(0.0, 0.0, 4.0));
    assert_eq!(comps.normalv, Vector3::new(0.0, 0.0, -1.0));
    assert_eq!(comps.eyev, Vector3::new(0.0, 0.0, -1.0));
    assert_eq!(comps.reflectv(), Vector3::new(0.0, 0.0, -1.0));
}
