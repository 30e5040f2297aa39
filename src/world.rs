use log::debug;

use crate::consts::SURFACE_EPSILON;
use crate::vector::Vector3;
use crate::ray::Ray;
use crate::color::Color;
use crate::sphere::Sphere;
use crate::light::{ Light, diffuse, specular };
use crate::intersect::{ Intersection, IntersectionComputation, closest_intersection };

/// A world with spheres and lights.
///
/// Worlds collect all objects as well as lights for rendering, and most of the
/// ray tracer logic is performed here. A `World` is assembled once through a
/// `WorldBuilder` and offers no way to change it afterwards, so it can be
/// shared freely while rendering.
///
/// The order of `spheres` is significant: when two spheres are hit at exactly
/// the same distance, the one added first is the one that is seen.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct World {
    spheres: Vec<Sphere>,
    lights: Vec<Light>,
}

/// Collects spheres and lights for a `World`.
///
/// # Examples
///
/// ```
/// # use sphere_tracer::vector::Vector3;
/// # use sphere_tracer::color::Color;
/// # use sphere_tracer::sphere::Sphere;
/// # use sphere_tracer::light::Light;
/// # use sphere_tracer::world::WorldBuilder;
/// let world = WorldBuilder::new()
///     .sphere(Sphere::new(Vector3::new(0.0, -1.0, 3.0), 1.0, Color::red()))
///     .light(Light::ambient(1.0))
///     .build();
///
/// assert_eq!(world.spheres().len(), 1);
/// assert_eq!(world.lights().len(), 1);
/// ```
#[derive(Clone, Debug, Default)]
pub struct WorldBuilder {
    spheres: Vec<Sphere>,
    lights: Vec<Light>,
}

impl WorldBuilder {
    pub fn new() -> WorldBuilder {
        Default::default()
    }

    /// Appends a sphere.
    pub fn sphere(mut self, sphere: Sphere) -> WorldBuilder {
        self.spheres.push(sphere);
        self
    }

    /// Appends a light.
    pub fn light(mut self, light: Light) -> WorldBuilder {
        self.lights.push(light);
        self
    }

    /// Freezes the collected spheres and lights into a `World`.
    pub fn build(self) -> World {
        debug!("Built world with {} spheres and {} lights.",
            self.spheres.len(), self.lights.len());

        World { spheres: self.spheres, lights: self.lights }
    }
}

impl World {
    /// Creates an empty world, with nothing to hit and nothing to light it.
    pub fn empty() -> World {
        Default::default()
    }

    pub fn spheres(&self) -> &[Sphere] {
        &self.spheres
    }

    pub fn lights(&self) -> &[Light] {
        &self.lights
    }

    /// Finds the closest sphere a ray hits with `t_min < t < t_max`.
    ///
    /// See `closest_intersection` for how ties are broken.
    pub fn intersect(&self, r: &Ray, t_min: f64, t_max: f64)
        -> Option<Intersection<'_>> {
        closest_intersection(&self.spheres, r, t_min, t_max)
    }

    /// Determines whether anything blocks the light vector `lightv` leaving
    /// `point`.
    ///
    /// Only occluders with `SURFACE_EPSILON < t < t_max` count. The small lower
    /// bound keeps a surface from shadowing itself.
    pub fn is_shadowed(&self, point: Vector3, lightv: Vector3, t_max: f64) -> bool {
        let r = Ray::new(point, lightv);
        self.intersect(&r, SURFACE_EPSILON, t_max).is_some()
    }

    /// Calculates the light intensity reaching a point.
    ///
    /// `normalv` is the outward unit normal at `point`, `eyev` the unit vector
    /// back towards the viewer, and `shininess` the surface's Phong exponent
    /// (`None` for no highlight).
    ///
    /// Ambient lights always contribute. Point and directional lights add a
    /// diffuse and a specular term unless something sits between the point
    /// and the light; a shadow only ever removes the blocked light's share.
    /// The result is not clamped and can exceed `1.0`.
    pub fn compute_lighting(&self, point: Vector3, normalv: Vector3,
        eyev: Vector3, shininess: Option<f64>) -> f64 {
        let mut intensity = 0.0;

        for light in self.lights.iter() {
            let (lightv, t_max) = match light.incidence(point) {
                Some(incidence) => incidence,
                None => {
                    intensity += light.intensity();
                    continue;
                }
            };

            if self.is_shadowed(point, lightv, t_max) {
                continue;
            }

            intensity += diffuse(light.intensity(), normalv, lightv);
            if let Some(s) = shininess {
                intensity += specular(light.intensity(), normalv, lightv, eyev, s);
            }
        }

        intensity
    }

    /// Calculates the color for a hit, ignoring reflections.
    pub fn shade_hit(&self, comps: &IntersectionComputation) -> Color {
        let intensity = self.compute_lighting(comps.point, comps.normalv,
            comps.eyev, comps.obj.specular);

        comps.obj.color * intensity
    }

    /// Determines the color seen along a ray.
    ///
    /// Only hits with `t_min < t < t_max` are considered; a ray that hits
    /// nothing sees `background`. Reflective spheres blend their shaded color
    /// with the color seen along the mirrored ray, which is traced with one
    /// less level of `depth`. At depth zero reflections are skipped, so a ray
    /// causes at most `depth + 1` traces.
    pub fn trace_ray(&self, r: &Ray, t_min: f64, t_max: f64, depth: u32,
        background: Color) -> Color {
        let hit = match self.intersect(r, t_min, t_max) {
            Some(hit) => hit,
            None => return background,
        };

        let comps = IntersectionComputation::new(r, &hit);
        let local = self.shade_hit(&comps);

        let reflective = comps.obj.reflective;
        if depth == 0 || reflective <= 0.0 {
            return local;
        }

        let reflected_ray = Ray::new(comps.point, comps.reflectv());
        let reflected = self.trace_ray(&reflected_ray, SURFACE_EPSILON,
            f64::INFINITY, depth - 1, background);

        local.blend(&reflected, reflective)
    }
}

#[cfg(test)]
fn ambient_world(intensity: f64) -> World {
    WorldBuilder::new()
        .sphere(Sphere::new(Vector3::new(0.0, -1.0, 3.0), 1.0, Color::red()))
        .light(Light::ambient(intensity))
        .build()
}

#[cfg(test)]
fn forward() -> Ray {
    Ray::new(Vector3::zero(), Vector3::new(0.0, 0.0, 1.0))
}

#[test]
fn builder_keeps_order() {
    let a = Sphere::new(Vector3::new(0.0, 0.0, 5.0), 1.0, Color::red());
    let b = Sphere::new(Vector3::new(0.0, 0.0, 9.0), 1.0, Color::blue());
    let w = WorldBuilder::new()
        .sphere(a)
        .light(Light::ambient(0.2))
        .sphere(b)
        .light(Light::point(0.6, Vector3::new(2.0, 1.0, 0.0)))
        .build();

    assert_eq!(w.spheres(), &[a, b]);
    assert_eq!(w.lights()[0], Light::ambient(0.2));
    assert_eq!(w.lights()[1], Light::point(0.6, Vector3::new(2.0, 1.0, 0.0)));
}

#[test]
fn miss_returns_background_exactly() {
    let w = ambient_world(1.0);
    let background = Color::rgb(12.0, 34.0, 56.0);
    let r = Ray::new(Vector3::zero(), Vector3::new(0.0, 1.0, 1.0));

    let c = w.trace_ray(&r, 1.0, f64::INFINITY, 3, background);
    assert_eq!((c.r, c.g, c.b), (12.0, 34.0, 56.0));
}

#[test]
fn empty_world_is_background() {
    let w = World::empty();

    assert_eq!(w.trace_ray(&forward(), 1.0, f64::INFINITY, 3, Color::white()),
        Color::white());
}

#[test]
fn ambient_only_scales_color() {
    let w = WorldBuilder::new()
        .sphere(Sphere::new(Vector3::new(0.0, 0.0, 5.0), 1.0,
            Color::rgb(200.0, 100.0, 50.0)).with_specular(10.0))
        .light(Light::ambient(0.25))
        .build();

    let c = w.trace_ray(&forward(), 1.0, f64::INFINITY, 0, Color::black());
    assert_eq!((c.r, c.g, c.b), (50.0, 25.0, 12.5));
}

#[test]
fn red_sphere_under_full_ambient() {
    let w = ambient_world(1.0);

    let c = w.trace_ray(&forward(), 1.0, f64::INFINITY, 3, Color::black());
    assert_eq!(c.clamp().to_rgb8(), [255, 0, 0]);
}

#[test]
fn point_light_head_on() {
    let w = WorldBuilder::new()
        .sphere(Sphere::new(Vector3::new(0.0, 0.0, 5.0), 1.0, Color::white()))
        .light(Light::point(0.6, Vector3::new(0.0, 0.0, 0.0)))
        .build();

    // Hit at (0, 0, 4), normal and light vector both point at the eye.
    assert_eq!(w.trace_ray(&forward(), 1.0, f64::INFINITY, 0, Color::black()),
        Color::white() * 0.6);
}

#[test]
fn specular_adds_highlight() {
    let matte = Sphere::new(Vector3::new(0.0, 0.0, 5.0), 1.0, Color::white());
    let shiny = matte.with_specular(100.0);
    let light = Light::point(0.5, Vector3::zero());

    let w = WorldBuilder::new().sphere(matte).light(light).build();
    let p = Vector3::new(0.0, 0.0, 4.0);
    let n = Vector3::new(0.0, 0.0, -1.0);
    assert!(crate::feq(w.compute_lighting(p, n, n, matte.specular), 0.5));

    // Eye sits exactly on the mirrored light vector.
    let w = WorldBuilder::new().sphere(shiny).light(light).build();
    assert!(crate::feq(w.compute_lighting(p, n, n, shiny.specular), 1.0));
}

#[test]
fn occluder_removes_only_its_light() {
    let point = Light::point(0.6, Vector3::new(0.0, 0.0, -10.0));
    let other = Light::directional(0.2, Vector3::new(0.0, 1.0, -1.0));
    let surface = Sphere::new(Vector3::new(0.0, 0.0, 1.0), 1.0, Color::white());
    let blocker = Sphere::new(Vector3::new(0.0, 0.0, -5.0), 1.0, Color::white());

    let p = Vector3::new(0.0, 0.0, 0.0);
    let n = Vector3::new(0.0, 0.0, -1.0);

    let open = WorldBuilder::new()
        .sphere(surface)
        .light(Light::ambient(0.1)).light(point).light(other)
        .build();
    let blocked = WorldBuilder::new()
        .sphere(surface).sphere(blocker)
        .light(Light::ambient(0.1)).light(point).light(other)
        .build();

    let lit = open.compute_lighting(p, n, n, None);
    let shadowed = blocked.compute_lighting(p, n, n, None);

    // 0.1 ambient + 0.6 point + 0.2 * cos(45) directional
    let directional = 0.2 * 2.0f64.sqrt() / 2.0;
    assert!(crate::feq(lit, 0.1 + 0.6 + directional));
    assert!(crate::feq(shadowed, 0.1 + directional));
}

#[test]
fn occluder_behind_point_light_casts_no_shadow() {
    let p = Vector3::new(0.0, 0.0, 0.0);
    let n = Vector3::new(0.0, 0.0, -1.0);

    // The light sits at z = -3, the sphere further out at z = -10.
    let w = WorldBuilder::new()
        .sphere(Sphere::new(Vector3::new(0.0, 0.0, -10.0), 1.0, Color::white()))
        .light(Light::point(1.0, Vector3::new(0.0, 0.0, -3.0)))
        .build();

    assert!(crate::feq(w.compute_lighting(p, n, n, None), 1.0));
}

#[test]
fn directional_light_shadowed_at_any_distance() {
    let p = Vector3::new(0.0, 0.0, 0.0);
    let n = Vector3::new(0.0, 0.0, -1.0);

    let w = WorldBuilder::new()
        .sphere(Sphere::new(Vector3::new(0.0, 0.0, -1000.0), 1.0, Color::white()))
        .light(Light::directional(1.0, Vector3::new(0.0, 0.0, -1.0)))
        .build();

    assert_eq!(w.compute_lighting(p, n, n, None), 0.0);
}

#[test]
fn surface_does_not_shadow_itself() {
    let s = Sphere::new(Vector3::new(0.0, 0.0, 5.0), 1.0, Color::white());
    let w = WorldBuilder::new()
        .sphere(s)
        .light(Light::point(1.0, Vector3::new(0.0, 0.0, -5.0)))
        .build();

    let p = Vector3::new(0.0, 0.0, 4.0);
    assert!(!w.is_shadowed(p, Vector3::new(0.0, 0.0, -9.0), 1.0));
}

#[test]
fn non_reflective_ignores_depth() {
    let w = WorldBuilder::new()
        .sphere(Sphere::new(Vector3::new(0.0, 0.0, 5.0), 1.0, Color::red())
            .with_specular(50.0))
        .sphere(Sphere::new(Vector3::new(0.0, 0.0, -5.0), 1.0, Color::blue())
            .with_reflective(0.8))
        .light(Light::ambient(0.2))
        .light(Light::point(0.6, Vector3::new(1.0, 2.0, 0.0)))
        .build();

    let shallow = w.trace_ray(&forward(), 1.0, f64::INFINITY, 0, Color::black());
    for depth in 1..6 {
        let c = w.trace_ray(&forward(), 1.0, f64::INFINITY, depth, Color::black());
        assert_eq!((c.r, c.g, c.b), (shallow.r, shallow.g, shallow.b));
    }
}

#[test]
fn mirror_at_depth_zero_is_local_color() {
    let w = WorldBuilder::new()
        .sphere(Sphere::new(Vector3::new(0.0, 0.0, 5.0), 1.0, Color::red())
            .with_reflective(1.0))
        .sphere(Sphere::new(Vector3::new(0.0, 0.0, -5.0), 1.0, Color::blue()))
        .light(Light::ambient(0.5))
        .build();

    let c = w.trace_ray(&forward(), 1.0, f64::INFINITY, 0, Color::black());
    assert_eq!((c.r, c.g, c.b), (127.5, 0.0, 0.0));
}

#[test]
fn mirror_shows_what_it_faces() {
    let w = WorldBuilder::new()
        .sphere(Sphere::new(Vector3::new(0.0, 0.0, 5.0), 1.0, Color::red())
            .with_reflective(1.0))
        .sphere(Sphere::new(Vector3::new(0.0, 0.0, -5.0), 1.0, Color::blue()))
        .light(Light::ambient(0.5))
        .build();

    // The reflected ray leaves (0, 0, 4) towards -z and hits the blue sphere.
    let c = w.trace_ray(&forward(), 1.0, f64::INFINITY, 1, Color::black());
    assert_eq!(c, Color::rgb(0.0, 0.0, 127.5));
}

#[test]
fn partial_mirror_blends() {
    let w = WorldBuilder::new()
        .sphere(Sphere::new(Vector3::new(0.0, 0.0, 5.0), 1.0, Color::red())
            .with_reflective(0.25))
        .light(Light::ambient(1.0))
        .build();

    // The reflection escapes to the background.
    let background = Color::rgb(0.0, 100.0, 0.0);
    let c = w.trace_ray(&forward(), 1.0, f64::INFINITY, 3, background);
    assert_eq!(c, Color::rgb(255.0 * 0.75, 25.0, 0.0));
}

#[test]
fn facing_mirrors_terminate() {
    let w = WorldBuilder::new()
        .sphere(Sphere::new(Vector3::new(0.0, 0.0, 5.0), 1.0, Color::red())
            .with_reflective(1.0))
        .sphere(Sphere::new(Vector3::new(0.0, 0.0, -5.0), 1.0, Color::blue())
            .with_reflective(1.0))
        .light(Light::ambient(1.0))
        .build();

    // Bounces back and forth until depth runs out on the red sphere.
    let c = w.trace_ray(&forward(), 1.0, f64::INFINITY, 4, Color::black());
    assert_eq!(c, Color::red());

    let c = w.trace_ray(&forward(), 1.0, f64::INFINITY, 5, Color::black());
    assert_eq!(c, Color::blue());
}

#[test]
fn tracing_is_deterministic() {
    let w = WorldBuilder::new()
        .sphere(Sphere::new(Vector3::new(0.3, -0.2, 4.0), 1.0, Color::rgb(10.0, 200.0, 90.0))
            .with_specular(500.0).with_reflective(0.4))
        .sphere(Sphere::new(Vector3::new(0.0, -5001.0, 0.0), 5000.0, Color::rgb(255.0, 255.0, 0.0))
            .with_specular(1000.0).with_reflective(0.5))
        .light(Light::ambient(0.2))
        .light(Light::point(0.6, Vector3::new(2.0, 1.0, 0.0)))
        .light(Light::directional(0.2, Vector3::new(1.0, 4.0, 4.0)))
        .build();

    let r = Ray::new(Vector3::zero(), Vector3::new(0.1, -0.3, 1.0));
    let a = w.trace_ray(&r, 1.0, f64::INFINITY, 3, Color::white());
    let b = w.trace_ray(&r, 1.0, f64::INFINITY, 3, Color::white());

    assert_eq!(a.r.to_bits(), b.r.to_bits());
    assert_eq!(a.g.to_bits(), b.g.to_bits());
    assert_eq!(a.b.to_bits(), b.b.to_bits());
}
