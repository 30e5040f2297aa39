use crate::vector::Vector3;
use crate::color::Color;
use crate::ray::Ray;

/// A sphere, the only kind of shape the tracer knows about.
///
/// Surface properties live on the sphere itself:
///
/// * `specular` is the Phong exponent of the highlight. `None` turns the
///   highlight off entirely (a matte surface).
/// * `reflective` is the share of the final color taken from the mirror
///   reflection, between `0.0` (fully diffuse) and `1.0` (a perfect mirror).
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Sphere {
    pub center: Vector3,
    pub radius: f64,
    pub color: Color,
    pub specular: Option<f64>,
    pub reflective: f64,
}

impl Default for Sphere {
    fn default() -> Sphere {
        Sphere {
            center: Vector3::zero(),
            radius: 1.0,
            color: Color::white(),
            specular: None,
            reflective: 0.0,
        }
    }
}

impl Sphere {
    /// Creates a matte, non-reflective sphere.
    pub fn new(center: Vector3, radius: f64, color: Color) -> Sphere {
        Sphere { center, radius, color, ..Default::default() }
    }

    /// Sets the Phong exponent of the highlight.
    pub fn with_specular(mut self, specular: f64) -> Sphere {
        self.specular = Some(specular);
        self
    }

    /// Sets how much of the sphere's color comes from its reflection.
    pub fn with_reflective(mut self, reflective: f64) -> Sphere {
        self.reflective = reflective;
        self
    }

    /// Intersects a ray with the sphere.
    ///
    /// Solves `|o + td - c|^2 = r^2` for `t`. Returns `None` when the ray
    /// misses (negative discriminant). Otherwise both roots are returned as
    /// `(t1, t2)` with `t1 = (-b + sqrt(D)) / 2a` and `t2 = (-b - sqrt(D)) / 2a`,
    /// so `t1 >= t2`. A tangent ray yields two equal roots. Roots are not
    /// filtered; negative ones lie behind the ray origin and it is up to the
    /// caller to decide which range is acceptable.
    pub fn intersect(&self, ray: &Ray) -> Option<(f64, f64)> {
        let oc = ray.origin - self.center;

        let a = ray.direction.dot(&ray.direction);
        let b = 2.0 * oc.dot(&ray.direction);
        let c = oc.dot(&oc) - self.radius * self.radius;

        let discriminant = b * b - 4.0 * a * c;
        if discriminant < 0.0 {
            return None;
        }

        let t1 = (-b + discriminant.sqrt()) / (2.0 * a);
        let t2 = (-b - discriminant.sqrt()) / (2.0 * a);
        Some((t1, t2))
    }

    /// Returns the outward unit normal at a point on the surface.
    pub fn normal_at(&self, point: Vector3) -> Vector3 {
        (point - self.center).normalize()
    }
}

#[test]
fn ray_through_center() {
    let s = Sphere::new(Vector3::new(0.0, 0.0, 5.0), 1.0, Color::red());
    let r = Ray::new(Vector3::zero(), Vector3::new(0.0, 0.0, 1.0));

    assert_eq!(s.intersect(&r), Some((6.0, 4.0)));
}

#[test]
fn ray_through_center_off_axis() {
    // Unit direction, distance to center is 13.
    let s = Sphere::new(Vector3::new(3.0, 4.0, 12.0), 2.5, Color::red());
    let d = Vector3::new(3.0, 4.0, 12.0).normalize();
    let r = Ray::new(Vector3::zero(), d);

    let (t1, t2) = s.intersect(&r).expect("Ray through center should hit.");
    assert!(crate::feq(t1, 13.0 + 2.5));
    assert!(crate::feq(t2, 13.0 - 2.5));
}

#[test]
fn ray_is_tangent_to_sphere() {
    let s = Sphere::new(Vector3::new(0.0, -1.0, 3.0), 1.0, Color::red());
    let r = Ray::new(Vector3::zero(), Vector3::new(0.0, 0.0, 1.0));

    assert_eq!(s.intersect(&r), Some((3.0, 3.0)));
}

#[test]
fn ray_misses_sphere() {
    let s = Sphere::new(Vector3::new(0.0, 2.0, 5.0), 1.0, Color::red());
    let r = Ray::new(Vector3::zero(), Vector3::new(0.0, 0.0, 1.0));

    assert_eq!(s.intersect(&r), None);
}

#[test]
fn ray_is_inside_sphere() {
    let s = Sphere::default();
    let r = Ray::new(Vector3::zero(), Vector3::new(0.0, 0.0, 1.0));

    assert_eq!(s.intersect(&r), Some((1.0, -1.0)));
}

#[test]
fn sphere_is_behind_ray() {
    let s = Sphere::default();
    let r = Ray::new(Vector3::new(0.0, 0.0, 5.0), Vector3::new(0.0, 0.0, 1.0));

    assert_eq!(s.intersect(&r), Some((-4.0, -6.0)));
}

#[test]
fn unnormalized_direction_scales_roots() {
    let s = Sphere::new(Vector3::new(0.0, 0.0, 5.0), 1.0, Color::red());
    let r = Ray::new(Vector3::zero(), Vector3::new(0.0, 0.0, 2.0));

    assert_eq!(s.intersect(&r), Some((3.0, 2.0)));
}

#[test]
fn normal_on_sphere() {
    let s = Sphere::new(Vector3::new(1.0, 1.0, 1.0), 2.0, Color::red());

    assert_eq!(s.normal_at(Vector3::new(1.0, 3.0, 1.0)), Vector3::new(0.0, 1.0, 0.0));
}

#[test]
fn builder_style_surface() {
    let s = Sphere::new(Vector3::zero(), 1.0, Color::blue())
        .with_specular(500.0)
        .with_reflective(0.3);

    assert_eq!(s.specular, Some(500.0));
    assert_eq!(s.reflective, 0.3);
}
