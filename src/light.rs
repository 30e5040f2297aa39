use crate::vector::Vector3;

/// A light source.
///
/// Each kind carries only the fields it uses. Intensities are plain scalars;
/// a sphere's color is scaled by the sum of the intensities reaching it, so
/// intensities across a scene usually add up to about `1.0`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Light {
    /// Uniform light reaching every point, regardless of orientation or
    /// occluders.
    Ambient { intensity: f64 },

    /// Light radiating from a single point in space.
    Point { intensity: f64, position: Vector3 },

    /// Light arriving from infinitely far away along `direction`. The vector
    /// points *towards* the light, not away from it.
    Directional { intensity: f64, direction: Vector3 },
}

impl Light {
    pub fn ambient(intensity: f64) -> Light {
        Light::Ambient { intensity }
    }

    pub fn point(intensity: f64, position: Vector3) -> Light {
        Light::Point { intensity, position }
    }

    pub fn directional(intensity: f64, direction: Vector3) -> Light {
        Light::Directional { intensity, direction }
    }

    pub fn intensity(&self) -> f64 {
        match *self {
            Light::Ambient { intensity } => intensity,
            Light::Point { intensity, .. } => intensity,
            Light::Directional { intensity, .. } => intensity,
        }
    }

    /// The light vector seen from `point`, and how far along it an occluder
    /// may sit and still cast a shadow.
    ///
    /// For a point light the vector reaches the light exactly at `t = 1`, so
    /// anything past the light is ignored. Directional light has no end.
    /// Ambient light has no direction and is never shadowed.
    pub fn incidence(&self, point: Vector3) -> Option<(Vector3, f64)> {
        match *self {
            Light::Ambient { .. } => None,
            Light::Point { position, .. } => Some((position - point, 1.0)),
            Light::Directional { direction, .. } => Some((direction, f64::INFINITY)),
        }
    }
}

/// The Lambertian share of a light reaching a surface.
///
/// Returns `intensity * cos(theta)` between the normal and the light vector,
/// or `0.0` when the light is behind the surface. Neither vector needs to be
/// normalized.
pub fn diffuse(intensity: f64, normalv: Vector3, lightv: Vector3) -> f64 {
    let n_dot_l = normalv.dot(&lightv);
    if n_dot_l > 0.0 {
        intensity * n_dot_l / (normalv.length() * lightv.length())
    } else {
        0.0
    }
}

/// The Phong highlight of a light, seen along `viewv`.
///
/// The light vector is mirrored about the normal; the closer the mirrored
/// vector lines up with the view vector, the brighter the highlight.
/// `specular` is the shininess exponent. Returns `0.0` when the reflection
/// points away from the viewer.
pub fn specular(intensity: f64, normalv: Vector3, lightv: Vector3,
    viewv: Vector3, specular: f64) -> f64 {
    let reflectv = lightv.reflect(&normalv);
    let r_dot_v = reflectv.dot(&viewv);

    if r_dot_v > 0.0 {
        intensity * (r_dot_v / (reflectv.length() * viewv.length())).powf(specular)
    } else {
        0.0
    }
}

#[test]
fn incidence_by_kind() {
    let p = Vector3::new(1.0, 0.0, 0.0);

    assert_eq!(Light::ambient(0.2).incidence(p), None);
    assert_eq!(
        Light::point(0.6, Vector3::new(2.0, 1.0, 0.0)).incidence(p),
        Some((Vector3::new(1.0, 1.0, 0.0), 1.0))
    );

    let (l, t_max) = Light::directional(0.2, Vector3::new(1.0, 4.0, 4.0))
        .incidence(p)
        .unwrap();
    assert_eq!(l, Vector3::new(1.0, 4.0, 4.0));
    assert!(t_max.is_infinite());
}

#[test]
fn intensity_of_each_kind() {
    assert_eq!(Light::ambient(0.1).intensity(), 0.1);
    assert_eq!(Light::point(0.5, Vector3::zero()).intensity(), 0.5);
    assert_eq!(Light::directional(0.3, Vector3::new(0.0, 1.0, 0.0)).intensity(), 0.3);
}

#[test]
fn diffuse_head_on() {
    let n = Vector3::new(0.0, 1.0, 0.0);
    let l = Vector3::new(0.0, 5.0, 0.0);

    assert!(crate::feq(diffuse(0.6, n, l), 0.6));
}

#[test]
fn diffuse_at_60_degrees() {
    let n = Vector3::new(0.0, 1.0, 0.0);
    let l = Vector3::new(3.0f64.sqrt(), 1.0, 0.0);

    assert!(crate::feq(diffuse(1.0, n, l), 0.5));
}

#[test]
fn diffuse_behind_surface() {
    let n = Vector3::new(0.0, 1.0, 0.0);
    let l = Vector3::new(0.0, -1.0, 0.0);

    assert_eq!(diffuse(1.0, n, l), 0.0);
}

#[test]
fn specular_eye_in_reflection() {
    let n = Vector3::new(0.0, 1.0, 0.0);
    let l = Vector3::new(-1.0, 1.0, 0.0);
    let v = Vector3::new(1.0, 1.0, 0.0);

    assert!(crate::feq(specular(0.5, n, l, v, 10.0), 0.5));
}

#[test]
fn specular_eye_offset() {
    let n = Vector3::new(0.0, 1.0, 0.0);
    let l = Vector3::new(-1.0, 1.0, 0.0);
    let v = Vector3::new(0.0, 1.0, 0.0);

    // cos(45 degrees) squared
    assert!(crate::feq(specular(1.0, n, l, v, 2.0), 0.5));
}

#[test]
fn specular_reflection_away_from_eye() {
    let n = Vector3::new(0.0, 1.0, 0.0);
    let l = Vector3::new(-1.0, 1.0, 0.0);
    let v = Vector3::new(-1.0, 0.0, 0.0);

    assert_eq!(specular(1.0, n, l, v, 10.0), 0.0);
}
